use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use marvel_gallery::{
    cache::{SessionStore, open_session_store},
    config::Config,
    gallery::{GalleryAggregator, GalleryRequest, LetterGroup, SessionGalleryStore},
    services::CharacterClient,
    views::{
        Debouncer, DetailNavigator, Route, SortKey, SortOrder, render_detail, render_list, sorted,
    },
};

#[derive(Parser)]
#[command(name = "marvel-gallery")]
#[command(version)]
#[command(about = "Browse the Marvel character catalog from the terminal")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Log level
    #[arg(short = 'v', long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search characters whose name starts with QUERY
    List {
        query: Option<String>,

        #[arg(long, default_value_t = SortKey::Name)]
        sort: SortKey,

        #[arg(long, default_value_t = SortOrder::Asc)]
        order: SortOrder,

        #[arg(long, default_value_t = 0)]
        offset: u32,

        /// Page size (defaults to list.limit)
        #[arg(long)]
        limit: Option<u32>,

        /// Read queries from stdin, one per line, debounced
        #[arg(short, long)]
        interactive: bool,
    },
    /// Load the letter-grouped gallery, continuing from the saved session
    Gallery {
        /// Replace the active letter groups (AF, GL, MR, SZ); repeatable
        #[arg(long = "group", value_name = "GROUP")]
        groups: Vec<LetterGroup>,

        /// Switch a letter group on or off; repeatable
        #[arg(long = "toggle", value_name = "GROUP")]
        toggles: Vec<LetterGroup>,

        /// Only show characters with a description; kept from the session
        /// when omitted
        #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
        need_description: Option<bool>,

        /// Number of load-more passes after the initial load
        #[arg(long, default_value_t = 0)]
        load_more: u32,
    },
    /// Show one character, optionally stepping through an order
    Detail {
        id: i64,

        /// Display order the character was opened from
        #[arg(long, value_delimiter = ',')]
        ids: Vec<i64>,

        /// Position of ID within --ids
        #[arg(long)]
        index: Option<usize>,

        #[arg(long)]
        step: Option<Step>,
    },
    /// Resolve an application path and run the matching view
    Route { path: String },
    /// Session cache maintenance
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
    /// Write the default configuration to --config
    InitConfig,
}

#[derive(Subcommand)]
enum CacheAction {
    /// Remove every cached response and the saved gallery state
    Clear,
}

#[derive(Clone, Copy, ValueEnum)]
enum Step {
    Next,
    Prev,
}

struct App {
    config: Config,
    store: Arc<dyn SessionStore>,
    client: Arc<CharacterClient>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_filter = format!("marvel_gallery={}", cli.log_level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Command::InitConfig = cli.command {
        return Config::write_default(&cli.config);
    }

    let config = Config::load_from_file(&cli.config)?;
    let store = open_session_store(&config.storage).await?;
    let client = Arc::new(CharacterClient::from_config(&config.api, store.clone())?);
    info!(
        "marvel-gallery v{} using source '{}'{}",
        env!("CARGO_PKG_VERSION"),
        client.source_name(),
        if client.is_mock() { " (mock data)" } else { "" }
    );

    let app = App {
        config,
        store,
        client,
    };

    match cli.command {
        Command::List {
            query,
            sort,
            order,
            offset,
            limit,
            interactive,
        } => {
            let limit = limit.unwrap_or(app.config.list.limit);
            if interactive {
                interactive_list(&app, sort, order, limit).await
            } else {
                run_list(&app, query.as_deref().unwrap_or(""), sort, order, offset, limit).await
            }
        }
        Command::Gallery {
            groups,
            toggles,
            need_description,
            load_more,
        } => {
            let request = GalleryRequest {
                groups,
                toggles,
                need_description,
                load_more,
            };
            run_gallery(&app, &request).await
        }
        Command::Detail {
            id,
            ids,
            index,
            step,
        } => run_detail(&app, id, ids, index, step).await,
        Command::Route { path } => run_route(&app, &path).await,
        Command::Cache {
            action: CacheAction::Clear,
        } => {
            app.client.clear_cache().await?;
            app.store.clear().await?;
            println!("Session cache cleared");
            Ok(())
        }
        Command::InitConfig => Ok(()),
    }
}

async fn run_list(
    app: &App,
    query: &str,
    sort: SortKey,
    order: SortOrder,
    offset: u32,
    limit: u32,
) -> Result<()> {
    let result = app
        .client
        .search_characters(query, offset, limit)
        .await
        .with_context(|| format!("search for '{query}' failed"))?;

    let characters = sorted(result.results, sort, order);
    print!("{}", render_list(&characters));
    println!(
        "Showing {} of {} (offset {}, sorted by {} {})",
        result.count, result.total, offset, sort, order
    );
    Ok(())
}

async fn interactive_list(app: &App, sort: SortKey, order: SortOrder, limit: u32) -> Result<()> {
    let mut debouncer = Debouncer::new(app.config.list.debounce_duration()?);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => debouncer.submit(line),
                None => break,
            },
            Some(query) = debouncer.next() => {
                run_list(app, query.trim(), sort, order, 0, limit).await?;
            }
        }
    }

    let mut pending = debouncer.close();
    while let Some(query) = pending.recv().await {
        run_list(app, query.trim(), sort, order, 0, limit).await?;
    }
    Ok(())
}

async fn run_gallery(app: &App, request: &GalleryRequest) -> Result<()> {
    let state_store = Arc::new(SessionGalleryStore::new(app.store.clone()));
    let gallery =
        GalleryAggregator::restore(app.client.clone(), state_store, &app.config.gallery).await;

    let passes = gallery.apply(request).await;
    let failed: usize = passes.iter().map(|p| p.failed.len()).sum();
    info!("Gallery ran {} passes ({} failed partitions)", passes.len(), failed);

    let displayed = gallery.displayed().await;
    print!("{}", render_list(&displayed));

    let active = gallery.groups().await;
    let labels: Vec<String> = active.iter().map(|g| g.to_string()).collect();
    println!(
        "{} characters shown; groups [{}]; offsets {:?}",
        displayed.len(),
        labels.join(", "),
        gallery.offsets().await
    );
    Ok(())
}

async fn run_detail(
    app: &App,
    id: i64,
    ids: Vec<i64>,
    index: Option<usize>,
    step: Option<Step>,
) -> Result<()> {
    let mut navigator = match index {
        Some(index) => DetailNavigator::new(ids, index),
        None => DetailNavigator::at_id(ids, id),
    };

    let mut target = navigator.current_id().unwrap_or(id);
    if let Some(step) = step {
        let moved = match step {
            Step::Next => navigator.next(),
            Step::Prev => navigator.prev(),
        };
        match moved {
            Some(moved) => {
                target = moved.current_id().unwrap_or(target);
                navigator = moved;
            }
            None => warn!("No display order given; staying on {}", target),
        }
    }

    match app.client.get_character_by_id(target).await? {
        Some(character) => print!("{}", render_detail(&character, &navigator)),
        None => println!("Character {target} not found"),
    }
    Ok(())
}

async fn run_route(app: &App, path: &str) -> Result<()> {
    let route = Route::parse(path);
    info!("Route {} resolved to {}", path, route);
    match route {
        Route::List => {
            run_list(
                app,
                "",
                SortKey::default(),
                SortOrder::default(),
                0,
                app.config.list.limit,
            )
            .await
        }
        Route::Gallery => run_gallery(app, &GalleryRequest::default()).await,
        Route::Detail(id) => run_detail(app, id, Vec::new(), None, None).await,
    }
}
