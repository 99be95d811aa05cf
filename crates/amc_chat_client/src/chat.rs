//! Chat state: transcript, connection flag, loading flag, and the submit flow.
//!
//! [`ChatSession`] is owned by the top-level view. The view reads its state and
//! drives it through `check_connection`, `submit` and the setters; appended
//! messages are reported back through a [`TranscriptObserver`].

use log::{debug, info, warn};

use crate::client::{Client, ClientError};
use crate::format::format_answer;
use crate::locale::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

/// One transcript entry. Never changed once appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub sender: Sender,
    /// Text is a formatted answer and is rendered line by line.
    pub is_news: bool,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::User,
            is_news: false,
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::Bot,
            is_news: false,
        }
    }

    pub fn news(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::Bot,
            is_news: true,
        }
    }
}

/// Append-only, ordered list of messages for the session.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Append and return the new entry's index.
    fn push(&mut self, message: Message) -> usize {
        self.messages.push(message);
        self.messages.len() - 1
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}

/// View hook called after every append, so the view can bring the newest
/// entry into sight.
pub trait TranscriptObserver {
    fn appended(&mut self, index: usize, message: &Message);
}

impl TranscriptObserver for () {
    fn appended(&mut self, _index: usize, _message: &Message) {}
}

/// Server reachability as last observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connection {
    /// No check has finished yet.
    Unknown,
    Connected,
    Unreachable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Input is empty or whitespace.
    Empty,
    /// Server not known to be reachable.
    Disconnected,
    /// A request is already in flight.
    Busy,
}

/// Result of [`ChatSession::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing was sent and nothing appended.
    Rejected(RejectReason),
    /// A formatted answer was appended.
    Answered,
    /// A localized error reply was appended.
    Failed,
}

/// State container for one chat session.
#[derive(Debug)]
pub struct ChatSession {
    client: Client,
    language: Language,
    transcript: Transcript,
    input: String,
    loading: bool,
    connection: Connection,
    notice: Option<String>,
    next_request: u64,
}

impl ChatSession {
    pub fn new(client: Client, language: Language) -> Self {
        Self {
            client,
            language,
            transcript: Transcript::default(),
            input: String::new(),
            loading: false,
            connection: Connection::Unknown,
            notice: None,
            next_request: 0,
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn connection(&self) -> Connection {
        self.connection
    }

    pub fn is_connected(&self) -> bool {
        self.connection == Connection::Connected
    }

    /// Error notice shown above the transcript, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Input, send, and voice controls are usable.
    pub fn input_enabled(&self) -> bool {
        self.is_connected() && !self.loading
    }

    /// Ping the health endpoint and update the connection flag.
    pub async fn check_connection(&mut self) -> Connection {
        match self.client.health().await {
            Ok(()) => {
                info!("connected to {}", self.client.base_url());
                self.connection = Connection::Connected;
                self.notice = None;
            }
            Err(e) => {
                warn!("server {} unreachable: {}", self.client.base_url(), e);
                self.connection = Connection::Unreachable;
                self.notice = Some(self.language.disconnected_notice().to_string());
            }
        }
        self.connection
    }

    /// Send the current input as a question.
    ///
    /// On every accepted path the input is cleared and the loading flag reset
    /// exactly once, after the reply has been appended.
    pub async fn submit(&mut self, observer: &mut dyn TranscriptObserver) -> SubmitOutcome {
        if self.input.trim().is_empty() {
            return SubmitOutcome::Rejected(RejectReason::Empty);
        }
        if !self.is_connected() {
            return SubmitOutcome::Rejected(RejectReason::Disconnected);
        }
        if self.loading {
            return SubmitOutcome::Rejected(RejectReason::Busy);
        }

        self.loading = true;
        self.notice = None;
        let language = self.language;
        let question = self.input.clone();
        self.next_request += 1;
        let seq = self.next_request;
        debug!("request #{}: {:?} ({})", seq, question, language);

        self.append(Message::user(question.clone()), observer);

        let outcome = match self.client.ask(&question, language).await {
            Ok(answer) => {
                debug!("request #{} answered", seq);
                self.append(Message::news(format_answer(&answer, language)), observer);
                SubmitOutcome::Answered
            }
            Err(e) => {
                warn!("request #{} failed: {}", seq, e);
                self.notice = Some(e.to_string());
                self.append(Message::bot(language.ask_failed(&failure_detail(&e))), observer);
                SubmitOutcome::Failed
            }
        };

        self.input.clear();
        self.loading = false;
        outcome
    }

    fn append(&mut self, message: Message, observer: &mut dyn TranscriptObserver) {
        let index = self.transcript.push(message);
        if let Some(m) = self.transcript.last() {
            observer.appended(index, m);
        }
    }
}

/// Short description of a failure, as shown in English error replies.
fn failure_detail(err: &ClientError) -> String {
    match err {
        ClientError::Unreachable(_) => "Failed to reach the server".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recorder(Vec<(usize, Sender)>);

    impl TranscriptObserver for Recorder {
        fn appended(&mut self, index: usize, message: &Message) {
            self.0.push((index, message.sender));
        }
    }

    fn offline_session() -> ChatSession {
        ChatSession::new(Client::new("http://127.0.0.1:9"), Language::En)
    }

    #[tokio::test]
    async fn whitespace_input_is_rejected() {
        let mut session = offline_session();
        session.connection = Connection::Connected;
        session.set_input("   \t ");
        let mut rec = Recorder(Vec::new());
        assert_eq!(
            session.submit(&mut rec).await,
            SubmitOutcome::Rejected(RejectReason::Empty)
        );
        assert!(session.transcript().is_empty());
        assert!(rec.0.is_empty());
    }

    #[tokio::test]
    async fn busy_session_rejects_second_submit() {
        let mut session = offline_session();
        session.connection = Connection::Connected;
        session.loading = true;
        session.set_input("again");
        assert_eq!(
            session.submit(&mut ()).await,
            SubmitOutcome::Rejected(RejectReason::Busy)
        );
        assert_eq!(session.input(), "again");
        assert!(session.transcript().is_empty());
    }

    #[test]
    fn input_enabled_needs_connection_and_idle() {
        let mut session = offline_session();
        assert!(!session.input_enabled());
        session.connection = Connection::Connected;
        assert!(session.input_enabled());
        session.loading = true;
        assert!(!session.input_enabled());
    }

    #[test]
    fn message_constructors() {
        assert_eq!(Message::user("q").sender, Sender::User);
        assert!(!Message::bot("oops").is_news);
        let news = Message::news("📰 x");
        assert_eq!(news.sender, Sender::Bot);
        assert!(news.is_news);
    }
}
