//! Metasearch-RS: cross-engine search bar
//!
//! Usage:
//!   metasearch serve
//!   metasearch resolve "https://www.google.com/search?q=cats" --json
//!   metasearch userscript --script dist/metasearch.js > metasearch.user.js
//!   metasearch config show

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use metasearch_rs::{
    config::{ConfigData, ConfigManager, FileStore, Settings},
    resolve, userscript,
    web::{create_router, AppState},
    Device,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use url::Url;

#[derive(Parser)]
#[command(name = "metasearch", version)]
#[command(about = "Rerun the query of a search results page on other engines")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to settings.yml
    #[arg(short, long, env = "METASEARCH_SETTINGS_PATH", global = true)]
    settings: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service
    Serve,
    /// Print the bar for a results page
    Resolve {
        /// URL of the results page
        url: String,
        /// Apply mobile overrides
        #[arg(long)]
        mobile: bool,
        /// Apply dark-mode icon colors
        #[arg(long)]
        dark: bool,
        /// Print JSON instead of a link list
        #[arg(long)]
        json: bool,
    },
    /// Print the userscript header, or a complete userscript
    Userscript {
        /// Compiled script body to prepend the header to
        #[arg(long)]
        script: Option<PathBuf>,
    },
    /// Manage the stored engine configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the active configuration as JSON
    Show,
    /// Replace the stored configuration with the built-in defaults
    Reset,
    /// Validate and store a configuration file (`{"engines": [...]}`)
    Import {
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (settings, source) = load_settings(cli.settings.as_deref())?;

    let default_level = if settings.general.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match source {
        Some(path) => info!("Loaded settings from: {}", path.display()),
        None => info!("No settings file found, using defaults"),
    }

    match cli.command {
        Commands::Serve => serve(settings).await,
        Commands::Resolve {
            url,
            mobile,
            dark,
            json,
        } => {
            let device = Device {
                touch: mobile,
                dark_mode: dark,
            };
            resolve_url(&settings, &url, device, json)
        }
        Commands::Userscript { script } => {
            let config = config_manager(&settings).load_configuration();
            let output = match script {
                Some(path) => {
                    let body = std::fs::read_to_string(&path)
                        .with_context(|| format!("failed to read {}", path.display()))?;
                    userscript::bundle(&config.engines, &body)?
                }
                None => userscript::header(&config.engines)?,
            };
            println!("{}", output);
            Ok(())
        }
        Commands::Config { command } => run_config(&settings, command),
    }
}

async fn serve(settings: Settings) -> Result<()> {
    info!("Starting Metasearch-RS v{}", metasearch_rs::VERSION);

    let addr = SocketAddr::new(settings.server.bind_address.parse()?, settings.server.port);
    info!("Engine configuration stored at {}", settings.storage.resolved_path().display());

    let state = AppState::new(settings)?;
    let app = create_router(state);

    info!("Starting server on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn resolve_url(settings: &Settings, url: &str, device: Device, json: bool) -> Result<()> {
    let url = Url::parse(url).with_context(|| format!("invalid url: {}", url))?;
    let config = config_manager(settings).load_configuration();

    let resolution = resolve(&config.engines, &url, device, &settings.ui);
    if json {
        println!("{}", serde_json::to_string_pretty(&resolution)?);
        return Ok(());
    }

    match resolution {
        Some(resolution) => {
            println!("{} -> {:?}", resolution.engine, resolution.query);
            for link in resolution.links {
                let shortcut = link.shortcut.map(String::from).unwrap_or_default();
                println!("  [{:>1}] {:<16} {}", shortcut, link.title, link.href);
            }
        }
        None => println!("No engine recognises this page"),
    }
    Ok(())
}

fn run_config(settings: &Settings, command: ConfigCommands) -> Result<()> {
    let manager = config_manager(settings);
    match command {
        ConfigCommands::Show => {
            let config = manager.load_configuration();
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigCommands::Reset => manager.reset_configuration()?,
        ConfigCommands::Import { file } => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let config = ConfigData::from_json(&raw)?;
            manager.save_configuration(&config)?;
        }
    }
    Ok(())
}

fn config_manager(settings: &Settings) -> ConfigManager {
    let store = Arc::new(FileStore::new(settings.storage.resolved_path()));
    ConfigManager::with_key(store, settings.storage.key.clone())
}

/// Load settings from the first settings file found, or defaults
fn load_settings(explicit: Option<&std::path::Path>) -> Result<(Settings, Option<PathBuf>)> {
    if let Some(path) = explicit {
        let mut settings = Settings::from_file(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?;
        settings.merge_env();
        return Ok((settings, Some(path.to_path_buf())));
    }

    let paths = [
        PathBuf::from("settings.yml"),
        PathBuf::from("config/settings.yml"),
        dirs::config_dir()
            .map(|p| p.join("metasearch-rs/settings.yml"))
            .unwrap_or_default(),
    ];

    for path in paths.iter() {
        if path.is_file() {
            let mut settings = Settings::from_file(path)
                .with_context(|| format!("failed to load settings from {}", path.display()))?;
            settings.merge_env();
            return Ok((settings, Some(path.clone())));
        }
    }

    let mut settings = Settings::default();
    settings.merge_env();
    Ok((settings, None))
}
