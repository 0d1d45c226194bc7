use anyhow::{Result, bail};
use clap::{Parser, Subcommand};

use hn_browse::api::{ApiService, StoryListType};
use hn_browse::config::AppConfig;
use hn_browse::internal::detail::StoryDetailView;
use hn_browse::internal::listing::ListingStore;
use hn_browse::internal::render::{
    CommentView, RenderOptions, render_comments, render_story_header, render_story_row,
};

/// Browse Hacker News stories and comment threads from the terminal
#[derive(Parser, Debug)]
#[command(name = "hn-browse")]
#[command(version)]
struct Args {
    /// Path to a config.ron file (defaults to the usual lookup locations)
    #[arg(long, global = true)]
    config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List stories from a ranked category
    List {
        /// top, new, best, ask, show or job
        #[arg(short, long, default_value = "top")]
        category: StoryListType,

        /// Number of pages to load
        #[arg(short, long, default_value_t = 1)]
        pages: usize,
    },
    /// Show a story with its comments
    Story {
        /// Story id
        id: String,

        /// Load every comment instead of the first few threads
        #[arg(long)]
        all: bool,

        /// Show replies instead of collapsed toggles
        #[arg(long)]
        expand: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => AppConfig::load_from(path).unwrap_or_default(),
        None => AppConfig::load(),
    };
    let _guard = init_tracing(&config);

    let api = ApiService::from_config(&config)?;
    let opts = RenderOptions::default();

    match args.command {
        Command::List { category, pages } => list(&api, &config, category, pages, &opts).await,
        Command::Story { id, all, expand } => story(&api, &config, &id, all, expand, &opts).await,
    }
}

async fn list(
    api: &ApiService,
    config: &AppConfig,
    category: StoryListType,
    pages: usize,
    opts: &RenderOptions,
) -> Result<()> {
    let mut store = ListingStore::from_config(config);

    for _ in 0..pages {
        if !store.has_more(category) {
            break;
        }
        store.fetch_more(api, category).await;
        if let Some(error) = store.error() {
            bail!("{}", error);
        }
    }

    for (i, story) in store.stories(category).iter().enumerate() {
        for line in render_story_row(i + 1, story, opts) {
            println!("{}", line);
        }
    }
    if !store.has_more(category) {
        println!("\n(end of {} stories)", category);
    }
    Ok(())
}

async fn story(
    api: &ApiService,
    config: &AppConfig,
    raw_id: &str,
    all: bool,
    expand: bool,
    opts: &RenderOptions,
) -> Result<()> {
    let mut view = StoryDetailView::from_config(config);
    view.load_raw(api, raw_id).await?;

    if all && view.can_show_all() {
        let added = view.expand_all(api).await?;
        tracing::info!(added, "loaded remaining comments");
    }

    let Some(story) = view.story.as_ref() else {
        bail!("Story unavailable.");
    };

    for line in render_story_header(story, opts) {
        println!("{}", line);
    }
    println!("\nComments ({})\n", story.descendants);

    let mut comment_view = CommentView::new();
    if expand {
        comment_view.expand_all(&view.comments);
    }
    for line in render_comments(&view.comments, &comment_view, opts) {
        println!("{}", line);
    }

    if view.can_show_all() {
        println!("\n(showing {} threads, pass --all for every comment)", view.comments.len());
    }
    Ok(())
}

/// Install the global subscriber. `RUST_LOG` wins over the config filter.
///
/// With a configured log directory output goes to a daily rolling file and
/// the returned guard must live until exit so buffered lines get flushed.
fn init_tracing(config: &AppConfig) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let env_filter = match std::env::var("RUST_LOG") {
        Ok(_) => tracing_subscriber::EnvFilter::from_default_env(),
        Err(_) => tracing_subscriber::EnvFilter::new(config.logging.filter_directives()),
    };

    match config.logging.log_directory.as_deref() {
        Some(log_dir) => {
            let file_appender = tracing_appender::rolling::daily(log_dir, "hn-browse.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(non_blocking)
                .with_ansi(false)
                .compact()
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .compact()
                .init();
            None
        }
    }
}
