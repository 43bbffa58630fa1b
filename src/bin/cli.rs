//! ReelVault CLI
//!
//! Local entry point: save shared links and organize the vault.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use reelvault::{
    error::{AppError, Result},
    models::{CollectionDraft, Config, ReelUpdate, Tier},
    pipeline::{self, SaveOutcome, SaveReelPipeline},
    services::{
        CreateCollectionOutcome, FeaturePolicy, LibraryService, MetadataFetcher, ReelFilter,
        ReelQuery, format_limit,
    },
    storage::LocalStorage,
};

/// ReelVault - save short videos from any app
#[derive(Parser, Debug)]
#[command(name = "reelvault", version, about = "Personal vault for shared reels")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, global = true, default_value = "reelvault.toml")]
    config: PathBuf,

    /// Path to the vault file (overrides vault.data_file)
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    /// Subscription tier (overrides vault.tier)
    #[arg(short, long, global = true)]
    tier: Option<Tier>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Save one or more shared links
    Save {
        #[arg(required = true)]
        urls: Vec<String>,
    },

    /// Save every link listed in a file, one per line
    Import { file: PathBuf },

    /// List saved reels, newest first
    List {
        /// Only reels in this collection
        #[arg(long, conflicts_with = "uncategorized")]
        collection: Option<u64>,

        /// Only reels outside any collection
        #[arg(long)]
        uncategorized: bool,

        /// Text to look for in titles and tags
        #[arg(short, long)]
        search: Option<String>,

        /// Only reels carrying this tag (repeatable, any match)
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Only reels whose link mentions this platform, e.g. `tiktok`
        #[arg(short, long)]
        platform: Option<String>,
    },

    /// List every tag in use
    Tags,

    /// Show one reel in detail
    Show { id: String },

    /// Edit the title or notes of a reel
    Edit {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long, conflicts_with = "clear_notes")]
        notes: Option<String>,

        #[arg(long)]
        clear_notes: bool,
    },

    /// Move reels into a collection, or `none` to uncategorize them
    Move {
        collection: String,

        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Delete reels
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Manage collections
    #[command(subcommand)]
    Collections(CollectionsCommand),

    /// Show tier limits, usage and premium features
    Tier,

    /// Validate the configuration file
    Validate,
}

#[derive(Subcommand, Debug)]
enum CollectionsCommand {
    /// List collections with their item counts
    List,

    /// Create a collection
    Create {
        #[arg(long)]
        name: String,

        /// Hex color such as #FF6B9D
        #[arg(long, default_value = "#FF6B9D")]
        color: String,

        #[arg(long, default_value = "📁")]
        icon: String,
    },

    /// Change the name, color or icon of a collection
    Update {
        id: u64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        color: Option<String>,

        #[arg(long)]
        icon: Option<String>,
    },

    /// Delete a collection; its reels become uncategorized
    Delete { id: u64 },
}

/// Initialize logging with the given default filter.
fn init_logging(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn parse_collection_target(target: &str) -> Result<Option<u64>> {
    if target.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    target.parse().map(Some).map_err(|_| {
        AppError::validation(format!(
            "Expected a collection id or 'none', got '{target}'"
        ))
    })
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        "debug".to_string()
    } else {
        Config::load(&cli.config)
            .map(|c| c.logging.level)
            .unwrap_or_else(|_| "info".to_string())
    };
    init_logging(&level);

    let config = resolve_config(&cli.config, cli.tier)?;
    if let Command::Validate = cli.command {
        return print_config(&config);
    }

    let data_path = cli
        .data
        .unwrap_or_else(|| PathBuf::from(&config.vault.data_file));
    run(cli.command, &config, data_path).await
}

/// Load the configuration, apply the tier override and validate it.
///
/// Every command refuses to run on an invalid configuration.
fn resolve_config(path: &Path, tier: Option<Tier>) -> Result<Config> {
    let mut config = Config::load_or_default(path);
    if let Some(tier) = tier {
        config.vault.tier = tier;
    }

    if let Err(e) = config.validate() {
        log::error!("Config validation failed: {}", e);
        return Err(e);
    }
    Ok(config)
}

fn print_config(config: &Config) -> Result<()> {
    log::info!("✓ Config OK");
    println!("{}", config.to_toml()?);
    Ok(())
}

/// Run a command against the vault at `data_path`.
async fn run(command: Command, config: &Config, data_path: PathBuf) -> Result<()> {
    let store = Arc::new(LocalStorage::open(&data_path).await?);
    let policy = FeaturePolicy::new(config.vault.tier);
    let library = LibraryService::new(Arc::clone(&store), policy);

    log::debug!("Vault {} on tier {}", data_path.display(), policy.tier());

    match command {
        Command::Save { urls } => {
            let fetcher = Arc::new(MetadataFetcher::from_config(&config.fetcher)?);
            let saver = SaveReelPipeline::new(store, fetcher, policy);
            for url in urls {
                let outcome = saver.save(&url).await;
                println!("{outcome}");
                if let SaveOutcome::Success(reel) = &outcome {
                    println!("  id: {}  tags: {}", reel.id, reel.tags.join(", "));
                }
            }
        }

        Command::Import { file } => {
            let text = tokio::fs::read_to_string(&file).await?;
            let urls = pipeline::parse_url_list(&text);
            if urls.is_empty() {
                log::warn!("No links found in {}", file.display());
                return Ok(());
            }

            let fetcher = Arc::new(MetadataFetcher::from_config(&config.fetcher)?);
            let saver = SaveReelPipeline::new(store, fetcher, policy);
            let (summary, results) =
                pipeline::run_import(&saver, urls, config.vault.import_concurrency).await;
            for (url, outcome) in &results {
                println!("{url}: {outcome}");
            }
            println!("{summary}");
        }

        Command::List {
            collection,
            uncategorized,
            search,
            tags,
            platform,
        } => {
            let scope = match (collection, uncategorized) {
                (Some(id), _) => ReelFilter::Collection(id),
                (None, true) => ReelFilter::Uncategorized,
                (None, false) => ReelFilter::All,
            };
            let query = ReelQuery {
                scope,
                search,
                tags,
                platform,
            };
            let reels = library.search_reels(&query).await?;
            if reels.is_empty() {
                println!("No matching reels.");
            }
            for reel in reels {
                println!("{reel}");
            }
        }

        Command::Tags => {
            let tags = library.available_tags().await?;
            if tags.is_empty() {
                println!("No tags yet.");
            }
            for tag in tags {
                println!("{tag}");
            }
        }

        Command::Show { id } => {
            let reel = library.get_reel(&id).await?;
            println!("{}", serde_json::to_string_pretty(&reel)?);
            if let Some(saved) = reel.created_at_utc() {
                println!("Saved {}", saved.format("%Y-%m-%d %H:%M UTC"));
            }
        }

        Command::Edit {
            id,
            title,
            notes,
            clear_notes,
        } => {
            let notes = if clear_notes { Some(None) } else { notes.map(Some) };
            let update = ReelUpdate {
                title,
                notes,
                collection_id: None,
            };
            let reel = library.update_reel(&id, update).await?;
            println!("{reel}");
        }

        Command::Move { collection, ids } => {
            let target = parse_collection_target(&collection)?;
            let moved = library.move_reels(&ids, target).await?;
            println!("Moved {moved} reel(s)");
        }

        Command::Delete { ids } => {
            let removed = library.delete_reels(&ids).await?;
            println!("Deleted {removed} reel(s)");
        }

        Command::Collections(sub) => match sub {
            CollectionsCommand::List => {
                let collections = library.list_collections().await?;
                if collections.is_empty() {
                    println!("No collections yet.");
                }
                for collection in collections {
                    println!("{collection}");
                }
            }
            CollectionsCommand::Create { name, color, icon } => {
                let outcome = library
                    .create_collection(CollectionDraft::new(name, color, icon))
                    .await;
                println!("{outcome}");
                if let CreateCollectionOutcome::Error(message) = outcome {
                    return Err(AppError::store(message));
                }
            }
            CollectionsCommand::Update {
                id,
                name,
                color,
                icon,
            } => {
                let current = library.get_collection(id).await?;
                let draft = CollectionDraft::new(
                    name.unwrap_or(current.name),
                    color.unwrap_or(current.color),
                    icon.unwrap_or(current.icon),
                );
                let updated = library.update_collection(id, draft).await?;
                println!("{updated}");
            }
            CollectionsCommand::Delete { id } => {
                let uncategorized = library.delete_collection(id).await?;
                println!("Deleted collection {id}; {uncategorized} reel(s) now uncategorized");
            }
        },

        Command::Tier => {
            let usage = library.usage().await?;
            let yes_no = |flag: bool| if flag { "yes" } else { "no" };
            println!("Tier: {}", policy.tier());
            println!(
                "Reels: {} / {}",
                usage.reels,
                format_limit(policy.max_saved_items())
            );
            println!(
                "Collections: {} / {}",
                usage.collections,
                format_limit(policy.max_collections())
            );
            println!("Advanced search: {}", yes_no(policy.has_advanced_search()));
            println!("Cloud sync: {}", yes_no(policy.has_cloud_sync()));
            println!("AI assistant: {}", yes_no(policy.has_ai_access()));
        }

        Command::Validate => print_config(config)?,
    }

    Ok(())
}
