//! Ratatui-based terminal dashboard for Toma.
//!
//! Two-panel layout mirroring the web dashboard:
//! - Left: collapsible navigation sidebar with the account footer
//! - Right: the current page (integration settings, password reset forms)
//!
//! Requests run on background tasks and report back over a channel, so the
//! UI keeps drawing while the portal API answers.

mod app;
mod components;
mod event;
pub mod theme;
mod ui;

pub use app::App;
pub use theme::ThemeMode;

use crate::commands::Context;
use anyhow::Result;
use crossterm::{
    cursor::Show,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use portal_api::PortalApi;
use portal_core::{ResetLink, Route};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::sync::Arc;
use std::time::Instant;
use std::{io, panic};

/// Restore terminal to normal state. Called on normal exit and on panic;
/// errors are ignored because the terminal may be partially set up.
fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
}

/// Restore the terminal before the panic message is printed.
fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        restore_terminal();
        original_hook(panic_info);
    }));
}

/// Run the dashboard starting at `route`. Returns a message to print once
/// the terminal is back to normal.
pub async fn run(
    ctx: Context,
    route: Route,
    link: Option<ResetLink>,
    theme_mode: ThemeMode,
) -> Result<Option<String>> {
    install_panic_hook();

    let result = run_with_terminal(ctx, route, link, theme_mode).await;

    // Always restore, even if setup failed partway through.
    restore_terminal();

    result
}

async fn run_with_terminal(
    ctx: Context,
    route: Route,
    link: Option<ResetLink>,
    theme_mode: ThemeMode,
) -> Result<Option<String>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let api: Arc<dyn PortalApi> = ctx.client.clone();
    let mut app = App::new(api, ctx.session.clone(), theme_mode, route, link);
    run_app(&mut terminal, &mut app).await?;

    Ok(app.exit_message.take())
}

/// Main application loop.
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Fold in finished requests
        while let Ok(result) = app.task_rx.try_recv() {
            app.handle_task(result);
        }

        app.tick(Instant::now());
        if app.should_quit {
            break;
        }

        terminal.draw(|f| ui::render(f, app))?;

        if event::handle_events(app)? {
            break;
        }
    }

    Ok(())
}
