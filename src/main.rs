//! trackbot - IRC bot hosting the track plugin.
//!
//! Usage: `trackbot [config.toml]`

use futures_util::StreamExt;
use irc::client::Client;
use irc::proto::Command;
use slircd_track::TrackPlugin;
use slircd_track::config::Config;
use slircd_track::host::{ModuleManager, handle_message};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    info!(
        server = %config.irc.server,
        port = config.irc.port,
        nick = %config.irc.nickname,
        "Starting trackbot"
    );

    let manager = Arc::new(ModuleManager::new(config.bot.command_prefix.clone()));
    let track = TrackPlugin::load(&config.track).await;
    manager.register(Arc::new(track))?;

    let mut client = Client::from_config(config.irc.to_client_config()).await?;
    client.identify()?;
    let mut stream = client.stream()?;
    let sender = Arc::new(client.sender());

    loop {
        tokio::select! {
            next = stream.next() => match next {
                Some(Ok(message)) => {
                    // Each message runs in its own task so a slow store call
                    // does not hold back the next event.
                    let manager = Arc::clone(&manager);
                    let sender = Arc::clone(&sender);
                    let own_nick = client.current_nickname().to_string();
                    tokio::spawn(async move {
                        handle_message(&manager, sender.as_ref(), &own_nick, &message).await;
                    });
                }
                Some(Err(e)) => {
                    error!(error = %e, "Connection error");
                    break;
                }
                None => {
                    warn!("Connection closed by server");
                    break;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, shutting down");
                break;
            }
        }
    }

    // Detach plugins (and close their stores) before leaving the network.
    manager.unload_all().await;

    if let Err(e) = client.send(Command::QUIT(Some("trackbot shutting down".to_string()))) {
        warn!(error = %e, "Failed to send QUIT");
    }

    info!("Shutdown complete");
    Ok(())
}
