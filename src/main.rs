//! avatar-host: headless host for the cartoon avatar
//!
//! Runs the animation runtime at the configured frame rate and reads
//! conversation events from stdin, one per line:
//! - `greet`: the avatar opens the conversation (wave)
//! - `reply <model output>`: a language-model reply (nods when happy)
//! - `speak` / `done`: utterance playback started / ended
//! - anything else: an animation name (`wave`, `nod`, `speaking`, `idle`)
//!
//! With `AVATAR_EMIT_POSES=1` every frame's pose is written to stdout as
//! a JSON line for an external renderer. Logs go to stderr.

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cartoon_avatar::conversation::{self, AvatarReply, ConversationEvent};
use cartoon_avatar::lifecycle::ShutdownSignal;
use cartoon_avatar::{runtime, AvatarHandle, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "avatar-host starting");

    let config = Config::load().context("failed to load configuration")?;
    info!(
        frame_rate = config.frame_rate,
        gesture_ms = config.gesture_duration.as_millis() as u64,
        emit_poses = config.emit_poses,
        "configuration loaded"
    );

    let shutdown = ShutdownSignal::new();
    let (handle, runtime_task) = runtime::spawn(&config);

    let mut events = handle.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => info!(%event, "animation event"),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(skipped = n, "animation event receiver lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    if config.emit_poses {
        let mut poses = handle.poses();
        tokio::spawn(async move {
            while poses.changed().await.is_ok() {
                let line = serde_json::to_string(&*poses.borrow_and_update());
                match line {
                    Ok(line) => println!("{line}"),
                    Err(e) => warn!(?e, "failed to encode pose"),
                }
            }
        });
    }

    // Open the conversation the way the chat loop does
    dispatch(&handle, ConversationEvent::Greeting).await?;

    tokio::select! {
        result = read_commands(&handle) => {
            if let Err(e) = result {
                warn!(?e, "command input failed");
            }
            info!("command input closed");
        }

        _ = shutdown.wait() => {
            info!("shutdown signal received");
        }
    }

    info!("shutting down...");
    // The runtime may already be gone; stopping twice is harmless
    let _ = handle.shutdown().await;
    runtime_task.await.context("avatar runtime panicked")?;

    info!("avatar-host stopped");
    Ok(())
}

/// Read line commands from stdin until EOF
async fn read_commands(handle: &AvatarHandle) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
        match word {
            "greet" => dispatch(handle, ConversationEvent::Greeting).await?,
            "reply" => {
                let reply = AvatarReply::parse(rest);
                info!(emotion = ?reply.emotion, response = %reply.response, "model reply");
                dispatch(handle, ConversationEvent::Reply(reply)).await?;
            }
            "speak" => dispatch(handle, ConversationEvent::UtteranceStarted).await?,
            "done" => dispatch(handle, ConversationEvent::UtteranceEnded).await?,
            name => handle.set_animation_named(name).await?,
        }
    }

    Ok(())
}

async fn dispatch(handle: &AvatarHandle, event: ConversationEvent) -> Result<()> {
    if let Some(state) = conversation::animation_for(&event) {
        handle.set_animation(state).await?;
    }
    Ok(())
}
