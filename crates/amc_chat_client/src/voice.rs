//! Single-shot speech-to-text input.
//!
//! Recognition is a platform capability: either a [`SpeechRecognizer`] is
//! available or it is not. [`VoiceInput`] drives one capture at a time and
//! exposes whether it is listening.

use async_trait::async_trait;
use log::{debug, warn};
use tokio::process::Command;
use tokio::sync::watch;

use crate::locale::Language;

/// Voice capture failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VoiceError {
    #[error("speech recognition is not available")]
    Unsupported,
    #[error("speech recognition failed: {0}")]
    Recognition(String),
}

impl VoiceError {
    /// Localized alert text for the user.
    pub fn alert(&self, language: Language) -> &'static str {
        match self {
            VoiceError::Unsupported => language.voice_unsupported(),
            VoiceError::Recognition(_) => language.voice_failed(),
        }
    }
}

/// A platform speech recognizer. One call is one non-continuous session.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Listen once in `locale` (e.g. `am-ET`). `Ok(None)` means the session
    /// ended without any speech.
    async fn recognize(&self, locale: &str) -> Result<Option<String>, VoiceError>;
}

/// Whether this platform can recognize speech.
pub enum VoiceCapability {
    Available(Box<dyn SpeechRecognizer>),
    Unavailable,
}

impl VoiceCapability {
    /// Capability backed by an external command, or `Unavailable` when no
    /// command is configured.
    pub fn from_command(command: Option<&str>) -> Self {
        match command.map(str::trim).filter(|c| !c.is_empty()) {
            Some(c) => VoiceCapability::Available(Box::new(CommandRecognizer::new(c))),
            None => VoiceCapability::Unavailable,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, VoiceCapability::Available(_))
    }
}

impl std::fmt::Debug for VoiceCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VoiceCapability::Available(_) => f.write_str("Available"),
            VoiceCapability::Unavailable => f.write_str("Unavailable"),
        }
    }
}

/// Runs a speech-to-text program and reads the transcript from its stdout.
///
/// The command line is split on whitespace (no shell quoting) and `{locale}`
/// in any argument is replaced by the requested locale. The first non-empty
/// output line is the transcript.
#[derive(Debug, Clone)]
pub struct CommandRecognizer {
    command: String,
}

impl CommandRecognizer {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    fn argv(&self, locale: &str) -> Vec<String> {
        self.command
            .split_whitespace()
            .map(|part| part.replace("{locale}", locale))
            .collect()
    }
}

#[async_trait]
impl SpeechRecognizer for CommandRecognizer {
    async fn recognize(&self, locale: &str) -> Result<Option<String>, VoiceError> {
        let argv = self.argv(locale);
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| VoiceError::Recognition("empty recognizer command".into()))?;
        debug!("voice: running {} {:?}", program, args);
        let output = Command::new(program)
            .args(args)
            .output()
            .await
            .map_err(|e| VoiceError::Recognition(e.to_string()))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VoiceError::Recognition(format!(
                "{} exited with {}: {}",
                program,
                output.status,
                stderr.trim()
            )));
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .map(str::to_string))
    }
}

/// Listening state of a [`VoiceInput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Idle,
    Listening,
}

/// Voice input control: Idle → Listening → Idle.
///
/// State changes are published on a watch channel so the view can show a
/// listening indicator while a capture is running (see [`VoiceInput::subscribe`]).
/// Starting while already listening is not guarded here; callers disable the
/// trigger while [`VoiceInput::is_listening`] is true.
#[derive(Debug)]
pub struct VoiceInput {
    capability: VoiceCapability,
    state: watch::Sender<VoiceState>,
}

impl VoiceInput {
    pub fn new(capability: VoiceCapability) -> Self {
        let (state, _) = watch::channel(VoiceState::Idle);
        Self { capability, state }
    }

    pub fn state(&self) -> VoiceState {
        *self.state.borrow()
    }

    pub fn is_listening(&self) -> bool {
        self.state() == VoiceState::Listening
    }

    /// Receiver that sees every state change, including those made while
    /// `start_capture` is awaiting the recognizer.
    pub fn subscribe(&self) -> watch::Receiver<VoiceState> {
        self.state.subscribe()
    }

    pub fn capability(&self) -> &VoiceCapability {
        &self.capability
    }

    /// Run one capture in `language`. A transcript is passed to `on_result`.
    ///
    /// Does nothing when `disabled`. Errors carry the alert to show via
    /// [`VoiceError::alert`]; the state is back to Idle whatever happens.
    pub async fn start_capture<F>(
        &mut self,
        language: Language,
        disabled: bool,
        on_result: F,
    ) -> Result<(), VoiceError>
    where
        F: FnOnce(String),
    {
        if disabled {
            return Ok(());
        }
        let recognizer = match &self.capability {
            VoiceCapability::Available(r) => r,
            VoiceCapability::Unavailable => return Err(VoiceError::Unsupported),
        };

        self.state.send_replace(VoiceState::Listening);
        let result = recognizer.recognize(language.speech_locale()).await;
        self.state.send_replace(VoiceState::Idle);

        match result {
            Ok(Some(transcript)) => {
                on_result(transcript);
                Ok(())
            }
            Ok(None) => {
                debug!("voice: ended without speech");
                Ok(())
            }
            Err(e) => {
                warn!("voice: {}", e);
                Err(e)
            }
        }
    }
}
