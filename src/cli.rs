//! CLI argument parser for the flowplay agent

use std::net::SocketAddr;

use clap::Parser;

/// Continuous-playback agent: drains a local queue onto a remote playback
/// device and refills it from a remote recommendation feed.
#[derive(Parser, Debug)]
#[command(name = "flowplay")]
#[command(about = "Continuous-playback agent driven by a remote recommendation feed")]
#[command(version)]
pub struct Args {
    /// Spotify application client id
    #[arg(long, env = "SPOTIFY_CLIENT_ID")]
    pub client_id: String,

    /// Spotify application client secret
    #[arg(long, env = "SPOTIFY_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: String,

    /// Listener whose flow feed refills the queue
    #[arg(long, env = "DEEZER_LISTENER_ID")]
    pub listener_id: String,

    /// Bind address for the one-shot authorization callback listener
    #[arg(long, default_value = "127.0.0.1:8898")]
    pub callback_addr: SocketAddr,

    /// Base URL of the recommendation API
    #[arg(long, env = "DEEZER_API_BASE", default_value = "https://api.deezer.com")]
    pub flow_api_base: String,

    /// Daemon poll interval in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub poll_interval_ms: u64,

    /// Give up waiting for a track to finish after this many state polls
    /// (unset: wait as long as the device keeps reporting playback)
    #[arg(long)]
    pub max_finish_polls: Option<u32>,

    /// Free-text query resolved and enqueued before the daemon starts
    /// (repeatable)
    #[arg(long = "seed")]
    pub seed: Vec<String>,

    /// Known track id enqueued as-is before the daemon starts (repeatable)
    #[arg(long = "seed-track")]
    pub seed_track: Vec<String>,
}

impl Args {
    /// Redirect URI registered with the authorization service. Must point
    /// at the callback listener.
    pub fn redirect_uri(&self) -> String {
        format!("http://{}/callback", self.callback_addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec![
            "flowplay",
            "--client-id",
            "id",
            "--client-secret",
            "secret",
            "--listener-id",
            "42",
        ];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn defaults_match_the_registered_redirect() {
        let args = parse(&[]);
        assert_eq!(args.redirect_uri(), "http://127.0.0.1:8898/callback");
        assert_eq!(args.flow_api_base, "https://api.deezer.com");
        assert_eq!(args.poll_interval_ms, 1000);
        assert_eq!(args.max_finish_polls, None);
        assert!(args.seed.is_empty());
        assert!(args.seed_track.is_empty());
    }

    #[test]
    fn seeds_are_repeatable_and_ordered() {
        let args = parse(&["--seed", "first song", "--seed", "second song"]);
        assert_eq!(args.seed, vec!["first song", "second song"]);
    }

    #[test]
    fn redirect_uri_follows_the_callback_addr() {
        let args = parse(&["--callback-addr", "0.0.0.0:9001"]);
        assert_eq!(args.redirect_uri(), "http://0.0.0.0:9001/callback");
    }
}
