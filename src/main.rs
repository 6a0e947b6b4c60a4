//! tutor-chat - terminal client for the guided-hint tutor
//!
//! Lines typed on stdin are sent to the tutor. A line ending with `\`
//! continues on the next line. Commands start with `/`; a line starting
//! with `//` is sent as a message beginning with `/`.

use hint_tutor::session::SessionSnapshot;
use hint_tutor::{
    HelpLevel, HttpBackend, LoggingBackend, Role, SessionController, SessionRuntime,
    SessionUpdate, TutorConfig,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const BUSY_INDICATOR: &str = "… génération de l'indice …";

const HELP: &str = "\
Commandes :
  /1 /2 /3        choisir le niveau d'aide
  /niveau N       idem
  /historique     afficher la conversation
  /renvoyer       renvoyer le message refusé pendant une génération
  //texte         envoyer un message commençant par /
  /aide           cette aide
  /quitter        quitter";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Level(u8),
    History,
    Resend,
    Help,
    Quit,
    Unknown(String),
    Message(String),
}

fn parse_command(input: &str) -> Command {
    let trimmed = input.trim();
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Command::Message(input.to_string());
    };
    if rest.starts_with('/') {
        return Command::Message(rest.to_string());
    }

    let mut parts = rest.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(n @ ("1" | "2" | "3")), None) => Command::Level(n.parse().unwrap_or_default()),
        (Some("niveau" | "level"), Some(n)) => n
            .parse()
            .map_or_else(|_| Command::Unknown(trimmed.to_string()), Command::Level),
        (Some("historique" | "history"), None) => Command::History,
        (Some("renvoyer" | "resend"), None) => Command::Resend,
        (Some("aide" | "help"), None) => Command::Help,
        (Some("quitter" | "quit"), None) => Command::Quit,
        _ => Command::Unknown(trimmed.to_string()),
    }
}

fn print_transcript(snapshot: &SessionSnapshot) {
    println!("Niveau d'aide : {}", snapshot.level);
    if snapshot.transcript.is_empty() {
        println!("(conversation vide)");
    }
    for turn in &snapshot.transcript {
        println!("{} : {}", turn.role().label(), turn.content());
    }
    if snapshot.busy {
        println!("{BUSY_INDICATOR}");
    }
    if !snapshot.draft.is_empty() {
        println!("Message en attente (/renvoyer) : {}", snapshot.draft);
    }
}

async fn print_updates(mut updates: broadcast::Receiver<SessionUpdate>) {
    loop {
        match updates.recv().await {
            // The student already sees what they typed
            Ok(SessionUpdate::TurnAppended { turn }) if turn.role() == Role::Tutor => {
                println!("\n{} : {}\n", turn.role().label(), turn.content());
            }
            Ok(SessionUpdate::BusyChanged { busy: true }) => println!("{BUSY_INDICATOR}"),
            Ok(SessionUpdate::LevelChanged { level }) => println!("Niveau d'aide : {level}"),
            Ok(SessionUpdate::Rejected { error }) => println!("({error})"),
            Ok(_) => {}
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Display fell behind session updates");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so they do not interleave with the chat
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hint_tutor=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = TutorConfig::from_env();
    let backend = HttpBackend::new(&config.backend_url, config.request_timeout)?;

    match backend.health().await {
        Ok(true) => tracing::info!(url = %config.backend_url, "Tutor backend healthy"),
        Ok(false) => tracing::warn!(url = %config.backend_url, "Tutor backend reports unhealthy"),
        Err(e) => tracing::warn!(url = %config.backend_url, error = %e, "Tutor backend health check failed"),
    }

    let controller = SessionController::new(LoggingBackend::new(backend));
    let (handle, runtime) = SessionRuntime::spawn(controller);
    let printer = tokio::spawn(print_updates(handle.subscribe()));

    println!("Tuteur IA — Indices guidés");
    println!("L'IA ne donne pas la solution, elle guide par paliers d'aide.");
    println!("Niveau d'aide : {}  (/aide pour les commandes)", HelpLevel::default());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending = String::new();
    while let Some(line) = lines.next_line().await? {
        if let Some(head) = line.strip_suffix('\\') {
            pending.push_str(head);
            pending.push('\n');
            continue;
        }
        pending.push_str(&line);
        let input = std::mem::take(&mut pending);

        match parse_command(&input) {
            Command::Level(n) => handle.change_level(n).await?,
            Command::History => print_transcript(&handle.snapshot().await?),
            Command::Resend => handle.submit_draft().await?,
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
            Command::Unknown(cmd) => println!("Commande inconnue : {cmd}\n{HELP}"),
            Command::Message(text) => handle.send_message(text).await?,
        }
    }

    // Let an in-flight exchange finish and print before exiting
    drop(handle);
    runtime.await?;
    printer.await?;

    Ok(())
}
