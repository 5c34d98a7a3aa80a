use clap::{Parser, Subcommand};
use post_index::config::{self, AppConfig};
use post_index::logging::{self, LogConfig, LogFormat};
use post_index::output;
use post_index::query::SearchMode;
use post_index::router::Route;
use post_index::session::{Event, Session, View};
use post_index::source::FileSource;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "post-index")]
#[command(about = "Browse, filter and search a blog's posts")]
#[command(long_about = "\
Browse, filter and search a blog's posts

Posts come from a JSON array. Each post needs an id, title, category and
date; excerpt, content, author and tags are optional:

  [
    {
      \"id\": 1,
      \"title\": \"Getting Started with CSS Grid\",
      \"excerpt\": \"Learn how to build two-dimensional layouts.\",
      \"content\": \"<p>CSS Grid is a layout system...</p>\",
      \"category\": \"Web Development\",
      \"author\": \"Jane Doe\",
      \"date\": \"2024-01-15\",
      \"tags\": [\"css\", \"layout\"]
    }
  ]

Search ranks matches by field: title 10, excerpt 5, tags 4, category 3,
content 2. Ties keep load order.

Run 'post-index gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file (optional; stock defaults apply when absent)
    #[arg(long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// JSON post array (overrides source.posts from config)
    #[arg(long, global = true)]
    posts: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List posts, optionally narrowed to one category
    List {
        /// Category to show ("all" for every post)
        #[arg(long, default_value = "all")]
        category: String,
    },
    /// Search posts by keyword
    Search {
        /// Case-insensitive search term
        term: String,
        /// Keep matches in load order instead of ranking them
        #[arg(long, conflicts_with = "scores")]
        simple: bool,
        /// Show each match's score
        #[arg(long)]
        scores: bool,
    },
    /// Show the page for a location, e.g. "?post=2"
    Show {
        /// Query string or URL
        location: String,
    },
    /// List the category filter options
    Categories,
    /// Validate the post file without displaying it
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let format = if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    logging::init_logging(&LogConfig::from_verbosity(cli.verbose).with_format(format))?;

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let mut app_config = config::load_config(&cli.config)?;
    if let Command::Search { simple: true, .. } = cli.command {
        app_config.search.mode = SearchMode::Simple;
    }
    let source = FileSource::new(posts_path(&cli, &app_config));

    let location = match &cli.command {
        Command::Show { location } => location.clone(),
        _ => Route::Home.encode(),
    };
    let mut session = Session::from_config(&app_config, location);

    if matches!(session.load(&source), View::LoadFailed { .. }) {
        output::print_view(&session.view());
        return Err(format!("could not load posts from {}", source.path().display()).into());
    }

    match cli.command {
        Command::List { category } => {
            if let Some(view) = session.dispatch(Event::CategorySelected(category), Instant::now())
            {
                output::print_view(&view);
            }
        }
        Command::Search { term, scores, .. } => {
            info!(mode = ?session.engine().settings().mode, term = %term, "searching");
            if scores {
                output::print_scored(&session.engine().scored(&term));
            } else {
                let now = Instant::now();
                session.dispatch(Event::SearchInput(term), now);
                let due = session.next_deadline().unwrap_or(now);
                if let Some(view) = session.dispatch(Event::Tick, due) {
                    output::print_view(&view);
                }
            }
        }
        Command::Show { .. } => {
            output::print_view(&session.view());
        }
        Command::Categories => {
            let engine = session.engine();
            let active = engine.state().active_category();
            for line in output::format_categories(&engine.categories(), active) {
                println!("{}", line);
            }
        }
        Command::Check => {
            let engine = session.engine();
            let posts = engine.store().map_or(0, |store| store.len());
            let categories = engine.categories().len() - 1;
            info!(posts, categories, "check passed");
            println!("==> {} posts in {} categories", posts, categories);
            println!("==> Posts are valid");
        }
        // Printed before any posts were loaded.
        Command::GenConfig => {}
    }

    Ok(())
}

/// The post file: `--posts` if given, otherwise `source.posts` from config.
fn posts_path(cli: &Cli, app_config: &AppConfig) -> PathBuf {
    cli.posts
        .clone()
        .unwrap_or_else(|| Path::new(&app_config.source.posts).to_path_buf())
}
