use anyhow::{Context, Result};
use clap::Parser;

use study_core::tracing_setup::init_tracing;
use study_tui::cli::Cli;
use study_tui::runtime::run_app;
use study_tui::ui::{self, App};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.log_file.as_deref()).context("failed to open log file")?;

    let storage = cli.storage();
    let config = cli.apply(storage.config.clone());
    tracing::info!(config_path = %storage.path().display(), ?config, "starting study browser");

    // Set up panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = crossterm::execute!(
            std::io::stdout(),
            crossterm::terminal::LeaveAlternateScreen,
            crossterm::event::DisableMouseCapture
        );
        eprintln!("\n\n=== PANIC ===");
        eprintln!("{}", panic_info);
        eprintln!("=============\n");
        original_hook(panic_info);
    }));

    let mut app = App::new(&config);
    let mut terminal = ui::init_terminal()?;

    let result = run_app(&mut terminal, &mut app).await;

    ui::restore_terminal()?;

    if let Err(err) = result {
        tracing::error!(error = %err, "event loop exited with an error");
        eprintln!("Error: {err}");
    }

    Ok(())
}
