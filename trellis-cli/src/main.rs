use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;
use trellis_client::{
    ClientConfig, LocalMedia, RoomEvent, RoomLocator, RoomSession, RtcConnector, SessionCommand,
    SignalChannel,
};
use trellis_core::{IceServerConfig, RoomId};

#[derive(Parser)]
#[command(name = "trellis")]
#[command(about = "Headless full-mesh call client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a room and print its invite link without joining it.
    Create {
        /// Base URL the invite link should point at.
        #[arg(long, default_value = "https://localhost/call")]
        base: String,
    },

    /// Connect to the relay and join a room, printing events until Ctrl-C.
    Join {
        /// Room identifier, or a full invite link carrying ?room=.
        room: String,

        #[arg(long, default_value = "ws://localhost:8080/signal")]
        signal_url: String,

        #[arg(long, default_value = "stun:stun.l.google.com:19302")]
        ice_server: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match Cli::parse().command {
        Commands::Create { base } => {
            let room = RoomId::generate();
            let link = RoomLocator::share_link(&base, &room);
            println!("{}", "Room created. Share this link:".green().bold());
            println!("   {}", link.cyan());
        }

        Commands::Join {
            room,
            signal_url,
            ice_server,
        } => {
            let room = RoomLocator::from_location(&room).unwrap_or_else(|| RoomId::from(room));
            join_room(room, signal_url, ice_server).await?;
        }
    }

    Ok(())
}

async fn join_room(room: RoomId, signal_url: String, ice_servers: Vec<String>) -> Result<()> {
    let config = ClientConfig {
        signal_url,
        ice_servers: ice_servers.into_iter().map(IceServerConfig::stun).collect(),
    };

    let (channel, channel_rx) = SignalChannel::connect(&config.signal_url).await?;
    let connector = Arc::new(RtcConnector::new(config.ice_servers.clone()));

    let (command_tx, command_rx) = mpsc::channel(16);
    let (session, mut events) = RoomSession::new(
        Arc::new(channel),
        connector,
        LocalMedia::new(Vec::new()),
        channel_rx,
        command_rx,
    );
    tokio::spawn(session.run());

    command_tx.send(SessionCommand::Join(room)).await?;

    loop {
        tokio::select! {
            event = events.recv() => {
                match event {
                    Some(RoomEvent::IdentityAssigned(id)) => {
                        println!("{} {}", "identity:".bold(), id);
                    }
                    Some(RoomEvent::MembershipChanged { room, membership }) => {
                        println!("{} {} ({:?})", "room:".bold(), room, membership);
                    }
                    Some(RoomEvent::StreamAdded { peer, stream }) => {
                        println!("{} {} -> {}", "stream:".green(), peer, stream.id);
                    }
                    Some(RoomEvent::StreamRemoved { peer }) => {
                        println!("{} {}", "stream gone:".yellow(), peer);
                    }
                    Some(RoomEvent::Error(e)) => {
                        eprintln!("{} {}", "error:".red().bold(), e);
                    }
                    Some(RoomEvent::SessionEnded) | None => {
                        println!("{}", "session ended".yellow());
                        return Ok(());
                    }
                }
            }

            _ = tokio::signal::ctrl_c() => {
                let _ = command_tx.send(SessionCommand::Leave).await;
            }
        }
    }
}
