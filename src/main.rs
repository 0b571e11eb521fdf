use clap::{Parser, Subcommand, ValueHint};
use clap_complete::Shell;
use tracing_subscriber::EnvFilter;

use gitexplore::{Config, FailurePolicy, Favorites, FileStore, GitHubClient};

mod commands;

#[derive(Parser)]
#[command(name = "gitexplore")]
#[command(about = "Search GitHub repositories and keep your favorites offline", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Log debug output to stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Override the GitHub API base URL
    #[arg(long, global = true, value_hint = ValueHint::Url)]
    api_base: Option<String>,

    /// Override the search debounce window in milliseconds
    #[arg(long, global = true)]
    debounce_ms: Option<u64>,

    /// Show search errors instead of keeping the last results quietly
    #[arg(long, global = true)]
    show_errors: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search repositories once
    #[command(short_flag = 's', visible_alias = "find")]
    Search {
        /// Search text, passed to GitHub as-is (e.g. "tokio language:rust")
        query: String,
    },
    /// Search as you type: every stdin line is a new query
    #[command(short_flag = 'w')]
    Watch,
    /// Show a repository's details
    #[command(short_flag = 'd')]
    Details {
        /// Repository as owner/name
        repo: String,
    },
    /// Manage favorites
    #[command(short_flag = 'f', visible_alias = "fav")]
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
    /// Generate shell completion scripts
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum FavoritesAction {
    /// List saved favorites
    List,
    /// Add a repository (does nothing if already saved)
    Add { repo: String },
    /// Add a repository, or remove it if already saved
    Toggle { repo: String },
    /// Remove a favorite by id
    Remove { id: u64 },
    /// Show a saved favorite without touching the network
    Show { id: u64 },
}

fn init_tracing(verbose: bool) {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) if verbose => EnvFilter::new("gitexplore=debug"),
        Err(_) => EnvFilter::new("gitexplore=warn"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Config {
    let mut config = Config::load().unwrap_or_else(|e| commands::fail(&e.to_string()));
    if let Some(base) = &cli.api_base {
        config.api_base = base.clone();
    }
    if let Some(ms) = cli.debounce_ms {
        config.debounce_ms = ms;
    }
    if cli.show_errors {
        config.failure_policy = FailurePolicy::Surface;
    }
    config
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Commands::Completions { shell } = &cli.command {
        commands::generate_completions(*shell);
        return;
    }

    let config = load_config(&cli);
    let store_path = config
        .store_path()
        .unwrap_or_else(|e| commands::fail(&e.to_string()));
    let favorites = Favorites::load(FileStore::new(store_path)).await;
    let client = GitHubClient::from_config(&config)
        .unwrap_or_else(|e| commands::fail(&format!("Can't create HTTP client: {}", e)));

    match cli.command {
        Commands::Search { query } => commands::search_repos(&client, &favorites, &query).await,
        Commands::Watch => commands::watch(client, &favorites, &config).await,
        Commands::Details { repo } => commands::show_details(&client, &repo).await,
        Commands::Favorites { action } => match action {
            FavoritesAction::List => commands::list_favorites(&favorites),
            FavoritesAction::Add { repo } => {
                commands::add_favorite(&client, &favorites, &repo, false).await
            }
            FavoritesAction::Toggle { repo } => {
                commands::add_favorite(&client, &favorites, &repo, true).await
            }
            FavoritesAction::Remove { id } => commands::remove_favorite(&favorites, id).await,
            FavoritesAction::Show { id } => commands::show_favorite(&favorites, id),
        },
        Commands::Completions { .. } => unreachable!("handled above"),
    }
}
