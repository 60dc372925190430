use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use linguist_core::analysis::Analyzer;
use linguist_core::analysis::gemini::GeminiBackend;
use linguist_core::errors::AnalysisError;
use linguist_core::models::AnalysisResult;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::path::Path;
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Duration;
use tracing::debug;

use super::{build_analyzer, load_config};
use crate::form::{FormAction, FormState, render};

type Outcome = Result<AnalysisResult, AnalysisError>;

pub fn run(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let analyzer = Arc::new(build_analyzer(&config)?);
    let mut state = FormState::new(analyzer.credential());
    let tick = Duration::from_millis(config.ui.tick_ms.max(10));

    enable_raw_mode().context("enabling raw mode (is stdout a terminal?)")?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen, EnableBracketedPaste) {
        let _ = disable_raw_mode();
        return Err(e).context("initializing terminal");
    }
    let mut terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
        Ok(t) => t,
        Err(e) => {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableBracketedPaste);
            return Err(e).context("initializing terminal");
        }
    };

    let result = run_event_loop(&mut terminal, &mut state, &analyzer, tick);

    // Always attempt cleanup, even when the loop failed
    let cleanup = restore_terminal(&mut terminal);
    result.and(cleanup)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Single-threaded loop. The blocking analysis runs on a worker thread and
/// reports back over a channel; `state.loading` keeps it to one at a time.
fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut FormState,
    analyzer: &Arc<Analyzer<GeminiBackend>>,
    tick: Duration,
) -> Result<()> {
    let (tx, rx) = mpsc::channel::<Outcome>();

    loop {
        while let Ok(outcome) = rx.try_recv() {
            state.finish(outcome);
        }
        if state.loading {
            state.tick();
        }

        terminal.draw(|frame| render::draw(frame, state))?;

        if !event::poll(tick)? {
            continue;
        }

        let action = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => state.on_key(key),
            Event::Paste(text) => {
                state.insert_str(&text);
                FormAction::None
            }
            _ => FormAction::None,
        };

        match action {
            FormAction::None => {}
            FormAction::Quit => return Ok(()),
            FormAction::Submit(text) => {
                debug!(chars = text.len(), "submitting conversation");
                let analyzer = Arc::clone(analyzer);
                let tx = tx.clone();
                thread::spawn(move || {
                    // Receiver only goes away when the form is closing
                    let _ = tx.send(analyzer.analyze(&text));
                });
            }
        }
    }
}
