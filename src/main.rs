use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use dialog_broker::demo::DemoScenario;
use dialog_broker::ui::components::theme::list_builtin;
use dialog_broker::ui::terminal_guard::install_panic_hook;
use dialog_broker::{util, App, Config};

#[derive(Parser)]
#[command(name = "dialog-broker")]
#[command(about = "Awaitable modal dialogs in the terminal")]
#[command(version)]
struct Cli {
    /// Scripted scenario to run
    #[arg(short, long, value_enum, default_value_t = DemoScenario::Confirm)]
    demo: DemoScenario,

    /// Config file (defaults to ~/.dialog-broker/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Data directory for logs and config (defaults to ~/.dialog-broker)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Print the built-in themes and exit
    #[arg(long)]
    list_themes: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.list_themes {
        for theme in list_builtin() {
            let kind = if theme.is_light { "light" } else { "dark" };
            println!("{:<16} {} ({kind})", theme.name, theme.display_name);
        }
        return Ok(());
    }

    util::init_data_dir(cli.data_dir);

    // Initialize logging to file (~/.dialog-broker/logs/dialog-broker.log)
    fs::create_dir_all(util::logs_dir())?;
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(util::log_file_path())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(log_file)
        .with_ansi(false) // Disable ANSI colors in log file
        .init();

    let config = match cli.config {
        Some(path) => Config::load_from(&path),
        None => Config::load(),
    }
    .context("loading configuration")?;

    install_panic_hook();

    let mut app = App::new(config);
    app.start_demo(cli.demo);
    app.run().await
}
