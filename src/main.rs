mod auth;
mod callback;
mod cli;
mod error;
mod logging;
mod model;
mod player;
mod services;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use auth::AuthSession;
use callback::CallbackServer;
use cli::Args;
use model::TrackQueue;
use player::{DaemonConfig, PlayerHandle, QueueBuilder, QueueDaemon, TokioClock, TrackResolver};
use services::{FlowClient, PlaybackControl, RecommendationSource, SpotifyClient};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Err(e) = logging::init_logging() {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!("=== Flowplay Agent Starting ===");

    // Step 1: authorization handshake. The callback listener hands the
    // browser redirect's code to the session; a failed exchange halts
    // startup before the daemon ever runs.
    let session = AuthSession::new(&args.client_id, &args.client_secret, &args.redirect_uri());
    let server = CallbackServer::bind(args.callback_addr).await?;

    let url = session.authorize_url()?;
    println!(
        "Listening on http://{}/callback\nAuthorize this agent by opening:\n\n  {url}\n",
        server.local_addr()
    );
    tracing::info!(%url, "Waiting for authorization callback");

    let code = server.wait_for_code().await?;
    session.set_authorization_code(code).await;
    session.exchange_code_for_token().await?;
    anyhow::ensure!(session.has_token().await, "no access token after exchange");

    // Step 2: wire the pipeline around the shared queue.
    let spotify = SpotifyClient::new(session.into_client());
    match spotify.playback_state().await {
        Ok(state) => tracing::info!(is_playing = state.is_playing, "Playback service authorized"),
        Err(e) => {
            tracing::error!(error = %e, "Playback service check failed");
            return Err(anyhow::anyhow!("playback service init failed"));
        }
    }

    let resolver = TrackResolver::new(spotify.clone());
    let flow = FlowClient::new(&args.flow_api_base, &args.listener_id);
    let queue = TrackQueue::new();
    let handle = PlayerHandle::new(queue.clone(), resolver.clone(), spotify.clone());

    // Step 3: populate the queue before the daemon starts, from manual
    // seeds and one initial flow batch. Refills are suppressed until the
    // daemon has seen the queue non-empty, so this is where the first
    // material comes from.
    for id in &args.seed_track {
        handle.enqueue_track(model::TrackRef::new(id.as_str())).await;
    }

    for query in &args.seed {
        match handle.search_and_enqueue(query).await {
            Ok(track) => tracing::info!(%query, %track, "Seed query enqueued"),
            Err(e) if e.is_recoverable() => {
                tracing::warn!(%query, error = %e, "Seed query skipped")
            }
            Err(e) => return Err(e.into()),
        }
    }

    let builder = QueueBuilder::new(resolver);
    match flow.fetch_batch().await {
        Ok(items) => {
            let report = builder.build_from_recommendations(items, &queue).await;
            tracing::info!(
                enqueued = report.enqueued,
                skipped = report.skipped,
                "Initial flow batch enqueued"
            );
        }
        Err(e) => tracing::warn!(error = %e, "Initial flow fetch failed, queue starts empty"),
    }

    if queue.is_empty().await {
        tracing::warn!(
            "Queue is empty at daemon start; refills stay suppressed until something is enqueued"
        );
    }

    // Step 4: run the daemon for the life of the process. Ctrl-C pauses
    // the remote device on the way out; there is no cooperative shutdown
    // inside the loop itself.
    let config = DaemonConfig {
        poll_interval: Duration::from_millis(args.poll_interval_ms),
        finish_poll_limit: args.max_finish_polls,
    };
    let daemon = QueueDaemon::new(queue, spotify, flow, builder, Arc::new(TokioClock), config);

    tokio::select! {
        _ = daemon.run() => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted, pausing playback before exit");
            handle.pause().await;
        }
    }

    tracing::info!("Flowplay agent shutting down");
    Ok(())
}
