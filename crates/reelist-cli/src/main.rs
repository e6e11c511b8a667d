use clap::{ArgAction, Parser, Subcommand};
use commands::{config, context::AppContext, home, search, show, watchlist};
use reelist_config::{Config, PathManager};
use reelist_models::MovieId;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "reelist")]
#[command(about = "Reelist - browse the movie catalog and keep a personal watchlist")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show trending and popular movies
    Home,
    /// Search the catalog by title
    Search {
        /// Search terms
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Show a movie's details and whether it is on the watchlist
    Show {
        /// Catalog movie id (e.g. 27205)
        id: MovieId,

        /// Add the movie to the watchlist, or remove it if already there
        #[arg(long, action = ArgAction::SetTrue)]
        toggle: bool,
    },
    /// Manage the local watchlist
    Watchlist {
        #[command(subcommand)]
        cmd: Option<WatchlistCommands>,
    },
    /// Show or change configuration
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
pub enum WatchlistCommands {
    /// List saved movies (default)
    List,
    /// Fetch a movie from the catalog and save it
    Add { id: MovieId },
    /// Remove a saved movie
    Remove { id: MovieId },
    /// Remove every saved movie
    Clear {
        /// Skip the confirmation prompt
        #[arg(long, action = ArgAction::SetTrue)]
        yes: bool,
    },
    /// Check that the stored snapshot can be read
    Verify,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration (masks the API key)
    Show {
        /// Show the API key unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Print the config, credentials and snapshot locations
    Path,
    /// Store the TMDB API key
    #[command(long_about = "Store the TMDB API key in the credentials file. Create one at https://www.themoviedb.org/settings/api. The TMDB_API_KEY environment variable takes precedence over the stored key.")]
    Tmdb {
        /// TMDB API key (if not provided, will prompt)
        #[arg(long)]
        api_key: Option<String>,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let paths = PathManager::default();
    let loaded = Config::load_or_default(&paths.config_file());
    let (log_file, log_json) = match &loaded {
        Ok(config) => (config.logging.file.clone(), config.logging.json),
        Err(_) => (None, None),
    };
    logging::init_logging_with_file(cli.verbose, cli.quiet, log_file, log_json)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let config = loaded.map_err(|e| {
        color_eyre::eyre::eyre!("Failed to load config from {}: {}", paths.config_file().display(), e)
    })?;
    config
        .validate()
        .map_err(|e| color_eyre::eyre::eyre!("Invalid configuration: {}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);
    let ctx = AppContext::new(paths, config);

    match cli.command {
        Commands::Home => home::run_home(&ctx, &output).await,
        Commands::Search { query } => search::run_search(&ctx, &query.join(" "), &output).await,
        Commands::Show { id, toggle } => show::run_show(&ctx, id, toggle, &output).await,
        Commands::Watchlist { cmd } => {
            let cmd = cmd.unwrap_or(WatchlistCommands::List);
            watchlist::run_watchlist(&ctx, cmd, &output).await
        }
        Commands::Config { cmd } => {
            let cmd = cmd.unwrap_or(ConfigCommands::Show { full: false });
            config::run_config(&ctx, cmd, &output).await
        }
    }
}
