use agro_radar::app::{App, AppEvent, ViewPhase};
use agro_radar::config::{Config, EndpointKind};
use agro_radar::feed::{build_http_client, FeedClient, API_URL_ENV};
use agro_radar::filter::CategoryMode;
use agro_radar::plain::render_plain;
use agro_radar::theme::ThemeVariant;
use agro_radar::ui;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EndpointArg {
    /// Plain listing (`/api/articles`)
    Articles,
    /// Aggregated feed with a hero article (`/api/output`)
    Output,
}

#[derive(Parser, Debug)]
#[command(
    name = "agro-radar",
    version,
    about = "Terminal reader for the AGRO-RADAR 360 agribusiness news feed"
)]
struct Args {
    /// API base URL (overrides AGRO_RADAR_API_URL and the config file)
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Which endpoint to read
    #[arg(long, value_enum)]
    endpoint: Option<EndpointArg>,

    /// Number of articles requested from the listing endpoint (0 = server default)
    #[arg(long)]
    limit: Option<u32>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Config file (default: ~/.config/agro-radar/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Use the fixed category list instead of deriving it from the articles
    #[arg(long)]
    fixed_categories: bool,

    /// Initially selected category
    #[arg(long, value_name = "NAME")]
    category: Option<String>,

    /// Load once, print the articles as plain text and exit
    #[arg(long)]
    print: bool,
}

/// Default config file path (~/.config/agro-radar/config.toml)
fn default_config_path() -> Option<PathBuf> {
    let home = std::env::var_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("agro-radar")
            .join("config.toml"),
    )
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match args.config.clone().or_else(default_config_path) {
        Some(path) => Config::load(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => {
            tracing::debug!("HOME not set and no --config given, using defaults");
            Config::default()
        }
    };

    let env_url = std::env::var(API_URL_ENV).ok();
    config.api_url = config.resolve_api_url(args.api_url.as_deref(), env_url.as_deref());
    if let Some(endpoint) = args.endpoint {
        config.endpoint = match endpoint {
            EndpointArg::Articles => EndpointKind::Articles,
            EndpointArg::Output => EndpointKind::Output,
        };
    }
    if let Some(limit) = args.limit {
        config.limit = limit;
    }
    if let Some(timeout) = args.timeout {
        config.timeout_secs = timeout;
    }
    Ok(config)
}

fn build_app(args: &Args, config: &Config) -> Result<App> {
    let http = build_http_client().context("Failed to build HTTP client")?;
    let client = FeedClient::new(http, &config.api_url, config.feed_endpoint(), config.timeout())
        .with_context(|| format!("Invalid API URL: {}", config.api_url))?;

    let mode = if args.fixed_categories {
        match config.category_mode() {
            CategoryMode::Derived => CategoryMode::default_fixed(),
            fixed => fixed,
        }
    } else {
        config.category_mode()
    };

    tracing::info!(
        url = %client.url(),
        endpoint = ?client.endpoint(),
        derived_categories = mode.is_derived(),
        "Feed view configured"
    );

    let mut app = App::new(client, mode);

    match ThemeVariant::from_str_name(&config.theme) {
        Some(variant) => app.set_theme(variant),
        None => tracing::warn!(theme = %config.theme, "Unknown theme, using dark"),
    }

    for warning in app.keybindings.apply_overrides(&config.keybindings) {
        tracing::warn!("{}", warning);
    }

    if let Some(category) = &args.category {
        app.selected_category = category.trim().to_string();
        // Derived options are only known after the load; fixed ones are now.
        if !app.category_mode.is_derived() && app.reconcile_category() {
            tracing::warn!(category = %category, "Category not in the fixed list, showing all");
        }
    }

    Ok(app)
}

/// One activation without a terminal: wait for the result and print it.
async fn print_once(app: &mut App) -> bool {
    let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(4);
    app.activate(&event_tx);

    while let Some(event) = event_rx.recv().await {
        let applied = match event {
            AppEvent::FeedLoaded { generation, result } => {
                app.apply_feed_result(generation, result)
            }
            AppEvent::TaskPanicked {
                task,
                generation,
                error,
            } => app.apply_task_panic(generation, task, &error),
        };
        if applied {
            break;
        }
    }
    app.deactivate();

    let text = render_plain(app);
    if app.phase() == ViewPhase::Error {
        eprint!("{}", text);
        return false;
    }
    print!("{}", text);
    true
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout belongs to the TUI
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let mut app = build_app(&args, &config)?;

    if args.print {
        if !print_once(&mut app).await {
            std::process::exit(1);
        }
        return Ok(());
    }

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);
    ui::run(&mut app, event_tx, event_rx).await?;

    Ok(())
}
