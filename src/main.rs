//! # gridshell
//!
//! Opens a Wayland window and runs the demo shell in it.

use anyhow::{Context, Result};
use clap::Parser;
use gridshell::{DemoShell, DisplaySession, FrameDriver, ShellConfig, StopReason, TouchArbiter};
use log::{error, info, warn};

#[derive(Parser)]
#[command(name = "gridshell")]
#[command(about = "A minimal Wayland shell with grid-laid interactive boxes")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "~/.config/gridshell/gridshell.toml")]
    config: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Initial window width
    #[arg(long)]
    width: Option<u32>,

    /// Initial window height
    #[arg(long)]
    height: Option<u32>,

    /// Window title
    #[arg(long)]
    title: Option<String>,

    /// Select GPU backend: auto, vulkan, gl
    #[arg(long)]
    backend: Option<String>,

    /// Present mode: auto, fifo, mailbox, immediate
    #[arg(long)]
    present_mode: Option<String>,
}

impl Cli {
    fn apply_overrides(&self, config: &mut ShellConfig) {
        if let Some(width) = self.width {
            config.window.width = width;
        }
        if let Some(height) = self.height {
            config.window.height = height;
        }
        if let Some(title) = &self.title {
            config.window.title = title.clone();
        }
        if let Some(backend) = &self.backend {
            config.render.backend = backend.clone();
        }
        if let Some(mode) = &self.present_mode {
            config.render.present_mode = mode.clone();
        }
        if self.debug {
            config.general.debug = true;
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Read the config before the logger exists so `general.debug` applies
    let loaded = ShellConfig::load(&cli.config);
    let debug = cli.debug || loaded.as_ref().is_ok_and(|c| c.general.debug);
    let filter = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    info!("🚀 Starting gridshell");
    info!(
        "📄 Version: {} ({}, {}, built {})",
        gridshell::VERSION,
        option_env!("GRIDSHELL_TARGET").unwrap_or("unknown target"),
        option_env!("GRIDSHELL_GIT_COMMIT").unwrap_or("unknown commit"),
        option_env!("GRIDSHELL_BUILD_DATE").unwrap_or("unknown date")
    );

    let mut config = match loaded {
        Ok(config) => {
            info!("✅ Configuration loaded from: {}", cli.config);
            config
        }
        Err(e) => {
            warn!("⚠️ Failed to load configuration: {:#}", e);
            info!("📝 Using default configuration");
            ShellConfig::default()
        }
    };
    cli.apply_overrides(&mut config);
    config.validate().context("Invalid configuration after CLI overrides")?;

    let options = config.session_options()?;
    let session = match DisplaySession::initialize(&options) {
        Ok(session) => session,
        Err(e) => {
            error!("❌ Failed to initialize display session: {}", e);
            return Err(e).context("display session initialization failed");
        }
    };

    let shell = DemoShell::new(TouchArbiter::new(), options.gpu.clear_color);
    let mut driver = FrameDriver::new(session, shell);
    let reason = driver.run()?;

    match reason {
        StopReason::Status(code) if code != 0 => {
            anyhow::bail!("shell stopped with status {}", code)
        }
        other => info!("✅ gridshell exited ({:?})", other),
    }
    Ok(())
}
