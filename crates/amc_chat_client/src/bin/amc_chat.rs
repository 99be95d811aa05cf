//! amc-chat: terminal chat front end for the AMC news Q&A service.
//! Checks the server, then reads questions from stdin (or one question from the
//! command line), prints the transcript as it grows.

use amc_chat_client::chat::{ChatSession, Connection, Message, RejectReason, Sender, SubmitOutcome};
use amc_chat_client::config::{self, Config};
use amc_chat_client::format::{render_message, Line};
use amc_chat_client::voice::{VoiceCapability, VoiceError, VoiceInput, VoiceState};
use amc_chat_client::{resolve_base_url, Client, Language, TranscriptObserver, DEFAULT_PORT};
use chrono::Datelike;
use clap::Parser;
use colored::Colorize;
use log::debug;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser, Debug)]
#[command(author, version, about = "Ask the AMC news service in Amharic or English", long_about = None)]
struct Args {
    /// Config file (default: ~/.amc-chat/config.yaml)
    #[arg(long, env = "AMC_CHAT_CONFIG")]
    config: Option<PathBuf>,

    /// Host this client runs on; the API is expected on the same host
    #[arg(long, env = "AMC_CHAT_HOST")]
    host: Option<String>,

    /// API port (default 5000)
    #[arg(long)]
    port: Option<u16>,

    /// Full API base URL, overrides --host and --port
    #[arg(long, env = "AMC_CHAT_BASE_URL")]
    base_url: Option<String>,

    /// Language of questions and replies (am, en)
    #[arg(long, short)]
    language: Option<Language>,

    /// Ask this question, print the reply, and exit
    question: Vec<String>,
}

fn load_config(args: &Args) -> Config {
    let result = match &args.config {
        Some(path) => config::load(path).map_err(|e| (path.clone(), e)),
        None => match config::default_config_path() {
            Some(path) => config::load_or_default(&path).map_err(|e| (path, e)),
            None => Ok(Config::default()),
        },
    };
    result.unwrap_or_else(|(path, e)| {
        eprintln!("Error: failed to load config from {}: {}", path.display(), e);
        process::exit(1);
    })
}

fn base_url(args: &Args, cfg: &Config) -> String {
    if let Some(url) = &args.base_url {
        return url.clone();
    }
    if args.host.is_some() || args.port.is_some() {
        let host = args
            .host
            .as_deref()
            .or(cfg.server.host.as_deref())
            .unwrap_or("localhost");
        return resolve_base_url(host, args.port.or(cfg.server.port).unwrap_or(DEFAULT_PORT));
    }
    cfg.base_url()
}

/// Prints transcript entries as they are appended.
struct TerminalView {
    language: Language,
}

impl TranscriptObserver for TerminalView {
    fn appended(&mut self, _index: usize, message: &Message) {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        match message.sender {
            Sender::User => {
                let _ = writeln!(out, "{} {}", "›".red().bold(), message.text);
                let _ = writeln!(out, "{}", self.language.thinking().dimmed());
            }
            Sender::Bot => {
                for line in render_message(message) {
                    let _ = writeln!(out, "{}", styled(&line));
                }
                let _ = writeln!(out);
            }
        }
        let _ = out.flush();
    }
}

fn styled(line: &Line) -> String {
    match line {
        Line::Header(text) => text.bold().to_string(),
        Line::Link { title, url } => format!(
            "🔹 {} {}",
            title.blue().underline(),
            format!("<{}>", url).dimmed()
        ),
        Line::ListItem(text) => format!("    {}", text),
        Line::Metadata(text) => format!("    {}", text.dimmed()),
        Line::Plain(text) => text.clone(),
    }
}

const USAGE: &str = "commands: /retry, /lang am|en, /voice, /quit";

fn print_notice(session: &ChatSession) {
    let lang = session.language();
    let notice = match session.connection() {
        Connection::Connected => session.notice().unwrap_or(lang.disconnected_notice()),
        Connection::Unreachable | Connection::Unknown => lang.disconnected_notice(),
    };
    println!("{}", notice.red());
    println!("  /retry  {}", lang.retry_label());
}

fn print_status(session: &ChatSession) {
    match session.connection() {
        Connection::Connected => println!("{}", session.language().welcome().dimmed()),
        Connection::Unreachable | Connection::Unknown => print_notice(session),
    }
}

fn prompt(session: &ChatSession) {
    let lang = session.language();
    if session.input().is_empty() {
        print!("[{}] {} › ", lang, lang.placeholder().dimmed());
    } else {
        print!("[{}] ({}) › ", lang, lang.send_label());
    }
    let _ = io::stdout().flush();
}

async fn ask_once(mut session: ChatSession, question: String) -> i32 {
    if session.check_connection().await != Connection::Connected {
        eprintln!("{}", session.language().disconnected_notice());
        eprintln!("Error: cannot connect to {}", session.client().base_url());
        return 1;
    }
    session.set_input(question);
    let mut view = TerminalView {
        language: session.language(),
    };
    match session.submit(&mut view).await {
        SubmitOutcome::Answered => 0,
        SubmitOutcome::Failed => {
            if let Some(notice) = session.notice() {
                eprintln!("Error: {}", notice);
            }
            1
        }
        SubmitOutcome::Rejected(reason) => {
            eprintln!("Error: question not sent ({:?})", reason);
            1
        }
    }
}

async fn run_interactive(mut session: ChatSession, mut voice: VoiceInput) {
    let lang = session.language();
    println!("{} · {}", lang.app_title().bold(), lang.app_subtitle());
    session.check_connection().await;
    print_status(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt(&session);
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                eprintln!("Error: failed to read input: {}", e);
                break;
            }
        };
        let line = line.trim_end_matches(&['\r', '\n'][..]);
        let (command, arg) = match line.trim().split_once(' ') {
            Some((c, a)) => (c, a.trim()),
            None => (line.trim(), ""),
        };

        match command {
            "/quit" | "/exit" => break,
            "/retry" => {
                session.check_connection().await;
                print_status(&session);
            }
            "/lang" => match arg.parse::<Language>() {
                Ok(l) => {
                    session.set_language(l);
                    println!("{}", l.native_name());
                }
                Err(e) => eprintln!("{}", e),
            },
            "/voice" => {
                if !session.input_enabled() {
                    println!("{}", session.language().voice_title(true).dimmed());
                    continue;
                }
                let language = session.language();
                match capture_voice(&mut voice, language).await {
                    Ok(Some(t)) => {
                        println!("🎤 {}", t);
                        session.set_input(t);
                    }
                    Ok(None) => {}
                    Err(e) => eprintln!("{}", e.alert(language).yellow()),
                }
            }
            other if other.starts_with('/') => {
                eprintln!("unknown command: {}", other);
                eprintln!("{}", USAGE);
            }
            _ => {
                if !line.trim().is_empty() {
                    session.set_input(line);
                }
                submit(&mut session).await;
            }
        }
    }

    let year = chrono::Local::now().year();
    println!("{}", session.language().footer(year).dimmed());
}

/// Run one voice capture, printing the listening indicator while the
/// recognizer is active.
async fn capture_voice(voice: &mut VoiceInput, language: Language) -> Result<Option<String>, VoiceError> {
    let mut states = voice.subscribe();
    let mut transcript = None;
    let result = {
        let capture = voice.start_capture(language, false, |t| transcript = Some(t));
        tokio::pin!(capture);
        loop {
            tokio::select! {
                biased;
                result = &mut capture => break result,
                Ok(()) = states.changed() => {
                    if *states.borrow_and_update() == VoiceState::Listening {
                        println!("🎤 {}", language.voice_title(false).dimmed());
                    }
                }
            }
        }
    };
    result.map(|()| transcript)
}

async fn submit(session: &mut ChatSession) {
    let mut view = TerminalView {
        language: session.language(),
    };
    match session.submit(&mut view).await {
        SubmitOutcome::Rejected(RejectReason::Disconnected) => print_notice(session),
        SubmitOutcome::Rejected(reason) => debug!("submit rejected: {:?}", reason),
        SubmitOutcome::Failed => {
            if let Some(notice) = session.notice() {
                eprintln!("{}", notice.red());
            }
        }
        SubmitOutcome::Answered => {}
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();
    if !io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let cfg = load_config(&args);
    let url = base_url(&args, &cfg);
    let language = args.language.unwrap_or_else(|| cfg.language());
    debug!("api base url: {}, language: {}", url, language);

    let session = ChatSession::new(Client::new(url), language);

    if !args.question.is_empty() {
        let question = args.question.join(" ");
        process::exit(ask_once(session, question).await);
    }

    let voice = VoiceInput::new(VoiceCapability::from_command(cfg.voice.command.as_deref()));
    run_interactive(session, voice).await;
}
