//! Full-screen terminal implementation of [`PickPresenter`].
//!
//! Each pick enters raw mode and the alternate screen, runs a blocking input
//! loop on tokio's blocking pool, and restores the terminal before returning.
//! Restoration happens in `Drop`, so it also runs on errors and panics.

use std::io::{self, Stdout};
use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use gluetty_engine::{PickPresenter, PickRequest, PickResponse};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, warn};

use crate::picker::{KeyOutcome, PickerState};
use crate::theme::{DraculaTheme, Theme};
use crate::view;

#[derive(Debug, Clone)]
pub struct TerminalPresenter {
    theme: Arc<dyn Theme>,
}

impl TerminalPresenter {
    pub fn new() -> Self {
        Self::with_theme(Arc::new(DraculaTheme::new()))
    }

    pub fn with_theme(theme: Arc<dyn Theme>) -> Self {
        Self { theme }
    }
}

impl Default for TerminalPresenter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl PickPresenter for TerminalPresenter {
    async fn pick(&self, request: PickRequest) -> Result<PickResponse> {
        let theme = self.theme.clone();
        let title = request.title.clone();
        let response = tokio::task::spawn_blocking(move || run_picker(request, theme.as_ref()))
            .await
            .context("picker task failed")??;
        debug!(title = %title, ?response, "pick finished");
        Ok(response)
    }
}

fn run_picker(request: PickRequest, theme: &dyn Theme) -> Result<PickResponse> {
    let mut session = TerminalSession::enter()?;
    let mut state = PickerState::new(request);

    loop {
        session
            .terminal
            .draw(|frame| {
                let area = frame.area();
                view::render(frame, area, &state, theme);
            })
            .context("failed to draw picker")?;

        // Resize and other events just fall through to a redraw.
        if let Event::Key(key) = event::read().context("failed to read terminal input")?
            && let KeyOutcome::Respond(response) = state.handle_key(key)
        {
            return Ok(response);
        }
    }
}

/// Raw mode plus alternate screen for as long as the value lives.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("failed to enable raw mode")?;
        let setup = || -> Result<Terminal<CrosstermBackend<Stdout>>> {
            let mut stdout = io::stdout();
            execute!(stdout, EnterAlternateScreen)?;
            Ok(Terminal::new(CrosstermBackend::new(stdout))?)
        };
        match setup() {
            Ok(terminal) => Ok(Self { terminal }),
            Err(error) => {
                restore_terminal();
                Err(error.context("failed to set up terminal"))
            }
        }
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        restore_terminal();
        if let Err(error) = self.terminal.show_cursor() {
            warn!(error = %error, "failed to show cursor");
        }
    }
}

fn restore_terminal() {
    if let Err(error) = disable_raw_mode() {
        warn!(error = %error, "failed to disable raw mode");
    }
    if let Err(error) = execute!(io::stdout(), LeaveAlternateScreen) {
        warn!(error = %error, "failed to leave alternate screen");
    }
}
