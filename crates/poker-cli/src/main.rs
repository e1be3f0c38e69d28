//! poker: headless planning-poker room client.
//!
//! Joins a room over WebSocket, prints the live vote table and consensus
//! analysis on every update, and accepts commands on stdin. Identity is
//! remembered across runs in the platform config directory.

use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use poker_consensus::{analyze, by_name, scales, VotingScale};
use poker_protocol::{ResultsPayload, SettingsPayload};
use poker_session::{
    DetailsStore, FileDetailsStore, RoomSession, RoomStateStore, SessionConfig, SessionEvent,
    UserDetails,
};

#[derive(Parser)]
#[command(name = "poker", about = "Headless planning-poker room client")]
struct Args {
    /// Room to join. Defaults to the remembered room, else a fresh UUID.
    #[arg(short, long)]
    room: Option<String>,

    /// Display name. Defaults to the remembered name.
    #[arg(short, long)]
    name: Option<String>,

    /// Voting scale for the room.
    #[arg(short, long)]
    scale: Option<String>,

    /// Server host.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server port.
    #[arg(long, default_value_t = 8000)]
    port: u16,

    /// Connect over TLS (wss).
    #[arg(long)]
    secure: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "poker_cli=info".into()),
        )
        .init();

    let args = Args::parse();

    let storage = match FileDetailsStore::new() {
        Ok(store) => Some(store),
        Err(e) => {
            tracing::warn!(error = %e, "No persistent session storage");
            None
        }
    };
    let remembered = storage.as_ref().and_then(|s| s.load().ok().flatten());

    let voter = match args
        .name
        .or_else(|| remembered.as_ref().map(|d| d.voter.clone()))
    {
        Some(name) if !name.trim().is_empty() => name.trim().to_string(),
        _ => {
            eprintln!("--name is required on first run");
            std::process::exit(2);
        }
    };
    let room_id = args
        .room
        .or_else(|| remembered.as_ref().map(|d| d.room_id.clone()))
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let scale_name = args
        .scale
        .or_else(|| remembered.as_ref().map(|d| d.voting_card.clone()))
        .unwrap_or_else(|| scales::DEFAULT.name.to_string());

    if let Err(e) = by_name(&scale_name) {
        eprintln!("{e}");
        std::process::exit(2);
    }

    if let Some(store) = &storage {
        if let Err(e) = store.save(&UserDetails::new(&voter, &room_id, &scale_name)) {
            tracing::warn!(error = %e, "Could not remember session details");
        }
    }

    let config = SessionConfig {
        host: args.host,
        port: args.port,
        secure: args.secure,
        ..Default::default()
    };
    let state_store = Arc::new(RoomStateStore::new());
    let (session, mut events) =
        RoomSession::connect(config, &room_id, &voter, Arc::clone(&state_store));

    println!("Joining room {room_id} as {voter} (scale: {scale_name})");
    println!("Commands: vote <value> | reveal | clear | scale <name> | exit");

    let mut votes_rx = state_store.votes();
    let mut settings_rx = state_store.settings();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(SessionEvent::Opened) => tracing::info!("Connected"),
                Some(SessionEvent::DuplicateName) => {
                    println!("That name is taken in this room. Rerun with a different --name.");
                    break;
                }
                Some(SessionEvent::VotesCleared) => println!("Votes cleared."),
                Some(SessionEvent::RevealAcknowledged) => println!("Votes revealed."),
                Some(SessionEvent::RoomExited) => {
                    println!("Left the room.");
                    break;
                }
                Some(SessionEvent::Error(message)) => {
                    tracing::warn!(message = %message, "Session error");
                }
                Some(SessionEvent::Closed { code }) => {
                    tracing::info!(code = ?code, "Session closed");
                    break;
                }
                None => break,
            },
            changed = votes_rx.changed() => match changed {
                Ok(()) => render(&votes_rx.borrow().clone(), &state_store.current_settings()),
                // The store burned its channels on disconnect; re-attach
                // for a possible next session.
                Err(_) => votes_rx = state_store.votes(),
            },
            changed = settings_rx.changed() => match changed {
                Ok(()) => render(&state_store.current_votes(), &settings_rx.borrow().clone()),
                Err(_) => settings_rx = state_store.settings(),
            },
            line = lines.next_line() => match line {
                Ok(Some(line)) => handle_command(&session, storage.as_ref(), &voter, &room_id, &line).await,
                _ => break,
            },
        }
    }
}

async fn handle_command(
    session: &RoomSession,
    storage: Option<&FileDetailsStore>,
    voter: &str,
    room_id: &str,
    line: &str,
) {
    let mut parts = line.trim().split_whitespace();
    let sent = match parts.next() {
        Some("vote") => match parts.next() {
            Some(value) => session.cast_vote(value, None).await,
            None => {
                println!("Usage: vote <value>");
                return;
            }
        },
        Some("reveal") => session.reveal_votes().await,
        Some("clear") => session.clear_votes().await,
        Some("scale") => {
            let name = parts.collect::<Vec<_>>().join(" ");
            match by_name(&name) {
                Ok(scale) => {
                    if let Some(store) = storage {
                        let _ = store.save(&UserDetails::new(voter, room_id, scale.name));
                    }
                    session.change_scale(scale.name).await
                }
                Err(e) => {
                    println!("{e}");
                    return;
                }
            }
        }
        Some("exit") => session.exit_room().await,
        Some(other) => {
            println!("Unknown command: {other}");
            return;
        }
        None => return,
    };
    if sent.is_err() {
        println!("Not connected.");
    }
}

fn active_scale(settings: &SettingsPayload) -> &'static VotingScale {
    by_name(&settings.voting_card).unwrap_or(scales::DEFAULT)
}

fn render(results: &ResultsPayload, settings: &SettingsPayload) {
    let mut voters: Vec<_> = results.votes.values().collect();
    voters.sort_by(|a, b| a.voter.cmp(&b.voter));

    println!();
    for entry in &voters {
        let shown = if entry.vote.is_empty() {
            "…"
        } else if settings.reveal {
            entry.vote.as_str()
        } else {
            "✓"
        };
        match &entry.emoji {
            Some(emoji) => println!("  {:<20} {shown} {emoji}", entry.voter),
            None => println!("  {:<20} {shown}", entry.voter),
        }
    }

    if !settings.reveal {
        return;
    }

    let scale = active_scale(settings);
    let analysis = analyze(&results.votes, scale);

    for group in analysis.grouped.iter().filter(|g| g.count > 0) {
        println!("  {:>5} | {}", group.value, "█".repeat(group.count));
    }

    let stats = &analysis.statistics;
    println!(
        "  mean {:.1}  median {:.1}  mode {:?}  range {}",
        stats.mean, stats.median, stats.mode, stats.range
    );

    let consensus = &analysis.consensus;
    println!(
        "  consensus: {} ({}%, mode {}%)",
        consensus.level, consensus.consensus_pct, consensus.mode_pct
    );
    println!("  {}", consensus.recommendation);
}
