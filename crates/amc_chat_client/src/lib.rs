//! Bilingual (Amharic/English) news Q&A chat client: config, HTTP API client,
//! answer formatting, chat state, and voice input. Used by the `amc-chat` binary.

pub mod chat;
pub mod client;
pub mod config;
pub mod format;
pub mod locale;
pub mod messages;
pub mod voice;

pub use chat::{
    ChatSession, Connection, Message, RejectReason, Sender, SubmitOutcome, Transcript,
    TranscriptObserver,
};
pub use client::{resolve_base_url, Client, ClientError, DEFAULT_PORT};
pub use config::{default_config_path, ChatSection, Config, ConfigError, ServerSection, VoiceSection};
pub use format::{classify_line, format_answer, format_lines, render_message, Line};
pub use locale::Language;
pub use messages::{Answer, Article};
pub use voice::{SpeechRecognizer, VoiceCapability, VoiceError, VoiceInput, VoiceState};
