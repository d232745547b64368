use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};

use flatpanel::config::DEFAULT_SETTINGS_PATH;
use flatpanel::{FlatPanelConfig, Session, Settings};

#[derive(Parser)]
#[command(name = "flatpanel")]
#[command(about = "Sets up your desktop for a flat panel flight simulator")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Load a flat panel aircraft from a .json config file
    #[arg(short, long, value_name = "CONFIG")]
    load: Option<PathBuf>,

    /// Restore the last stored original theme
    #[arg(short, long, conflicts_with = "load")]
    restore: bool,

    /// Only write the composed panel background to this file
    #[arg(long, value_name = "OUT", requires = "load")]
    render: Option<PathBuf>,

    /// Application settings file path
    #[arg(short, long, default_value = DEFAULT_SETTINGS_PATH)]
    settings: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!("flatpanel={log_level}"))
        .with_target(false)
        .init();

    info!("🛩️  Starting flatpanel v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(cli).await {
        error!("❌ {:#}", e);
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load(&cli.settings).await?;
    let session = Session::new(settings);

    if cli.restore {
        session.restore_original_theme().await?;
        println!("Restored original theme");
        return Ok(());
    }

    let Some(config_path) = cli.load else {
        println!("Nothing to do, pass --load CONFIG or --restore (see --help)");
        return Ok(());
    };

    let config = FlatPanelConfig::load(&config_path).await?;
    let config = Session::prompt_for_values(config).await?;

    if let Some(output) = cli.render {
        let written = session.render(&config, &output).await?;
        println!("Generated panel background {}", written.display());
        return Ok(());
    }

    println!("Loading: {}", config.display_name());
    session.run(&config).await?;
    println!("Restored original theme");
    Ok(())
}
