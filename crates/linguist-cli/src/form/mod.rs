pub mod render;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use linguist_core::credential::Credential;
use linguist_core::errors::AnalysisError;
use linguist_core::models::{AnalysisResult, RequiredField};

/// Card titles, in display order. Insights get their own panel.
pub const CARDS: [(RequiredField, &str); 5] = [
    (RequiredField::InterestLevel, "Interest Level"),
    (RequiredField::FlirtingScore, "Flirting Score"),
    (RequiredField::RedFlags, "Red Flags"),
    (RequiredField::Mood, "Mood"),
    (RequiredField::GhostingRisk, "Ghosting Risk"),
];

pub const INSIGHTS_TITLE: &str = "AI Insights";

const EMPTY_INPUT_MESSAGE: &str = "Please enter some text to analyze";
const FALLBACK_ERROR_MESSAGE: &str = "Analysis failed. Please try again.";

/// What the event loop should do after a key press.
#[derive(Debug, PartialEq)]
pub enum FormAction {
    None,
    /// Run an analysis on this text.
    Submit(String),
    Quit,
}

/// Transient state of the form. Nothing here outlives the session.
#[derive(Debug, Default)]
pub struct FormState {
    pub input: String,
    pub loading: bool,
    pub result: Option<AnalysisResult>,
    pub error: Option<String>,
    pub spinner_frame: usize,
}

impl FormState {
    /// Fresh form. A missing key is reported straight away; its shape is
    /// left to the analyzer, which checks on every submit.
    pub fn new(credential: &Credential) -> Self {
        let error = (!credential.is_configured()).then(|| {
            format!(
                "Please set your Gemini API key in the {} environment variable.",
                credential.source()
            )
        });
        Self {
            error,
            ..Self::default()
        }
    }

    pub fn can_submit(&self) -> bool {
        !self.loading && !self.input.trim().is_empty()
    }

    /// Start an analysis. Returns the text to send, or `None` when nothing
    /// should be sent (a request is in flight, or the input is blank).
    pub fn begin_submit(&mut self) -> Option<String> {
        if self.loading {
            return None;
        }
        if self.input.trim().is_empty() {
            self.error = Some(EMPTY_INPUT_MESSAGE.to_string());
            return None;
        }
        self.loading = true;
        self.error = None;
        Some(self.input.clone())
    }

    /// Record the outcome of the in-flight analysis.
    pub fn finish(&mut self, outcome: Result<AnalysisResult, AnalysisError>) {
        match outcome {
            Ok(result) => {
                self.result = Some(result);
                self.error = None;
            }
            Err(e) => {
                let message = if e.message.is_empty() {
                    FALLBACK_ERROR_MESSAGE.to_string()
                } else {
                    e.message
                };
                self.error = Some(message);
                self.result = None;
            }
        }
        self.loading = false;
    }

    pub fn tick(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }

    /// Insert pasted text, normalising line endings.
    pub fn insert_str(&mut self, text: &str) {
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        self.input.push_str(&normalized);
    }

    pub fn on_key(&mut self, key: KeyEvent) -> FormAction {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => FormAction::Quit,
            KeyCode::Char('c') if ctrl => FormAction::Quit,
            KeyCode::Char('s') if ctrl => match self.begin_submit() {
                Some(text) => FormAction::Submit(text),
                None => FormAction::None,
            },
            KeyCode::Char('l') if ctrl => {
                self.input.clear();
                FormAction::None
            }
            KeyCode::Char(_) if ctrl => FormAction::None,
            KeyCode::Char(c) => {
                self.input.push(c);
                FormAction::None
            }
            KeyCode::Enter => {
                self.input.push('\n');
                FormAction::None
            }
            KeyCode::Backspace => {
                self.input.pop();
                FormAction::None
            }
            _ => FormAction::None,
        }
    }
}
