//! # Redomi
//!
//! Share a song link, get the same song on every streaming platform.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use redomi_core::{AllPlatforms, PlatformKeys, PlatformRegistry, PlatformSelector};
use redomi_session::{ResolutionSession, ResolutionState};
use redomi_songlink::{SongLinkClient, SongLinkConfig};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "redomi", version, about = "Find a song on every streaming platform")]
struct Cli {
    /// Song link from any supported platform.
    #[arg(required_unless_present = "platforms")]
    url: Option<String>,

    /// Only show these platforms (comma-separated keys, e.g. spotify,deezer).
    #[arg(long, value_delimiter = ',')]
    only: Vec<String>,

    /// Country the links should be valid in (two-letter code).
    #[arg(long, env = "REDOMI_USER_COUNTRY")]
    country: Option<String>,

    /// song.link API base URL.
    #[arg(long, env = "REDOMI_API_URL")]
    api_url: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, env = "REDOMI_TIMEOUT_SECS")]
    timeout: Option<u64>,

    /// Print the final state as JSON.
    #[arg(long)]
    json: bool,

    /// List the known platforms and exit.
    #[arg(long)]
    platforms: bool,
}

impl Cli {
    fn config(&self) -> SongLinkConfig {
        let mut config = SongLinkConfig::from_env();
        if let Some(api_url) = &self.api_url {
            config = config.with_api_url(api_url.clone());
        }
        if let Some(country) = &self.country {
            config = config.with_user_country(country.clone());
        }
        if let Some(secs) = self.timeout {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        config
    }

    fn selector(&self, registry: &PlatformRegistry) -> Box<dyn PlatformSelector> {
        if self.only.is_empty() {
            return Box::new(AllPlatforms);
        }
        for key in &self.only {
            if registry.get(key).is_none() {
                warn!("Unknown platform key '{key}', see --platforms");
            }
        }
        Box::new(PlatformKeys::new(self.only.iter().cloned()))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "redomi=info,redomi_session=info,redomi_songlink=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let registry = PlatformRegistry::builtin();

    if cli.platforms {
        for platform in &registry {
            println!("{:<14} {}", platform.matching_key, platform.title);
        }
        return Ok(());
    }

    let Some(url) = cli.url.as_deref() else {
        bail!("a song link is required");
    };

    info!("Starting Redomi v{}", env!("CARGO_PKG_VERSION"));

    let client = SongLinkClient::with_config(cli.config()).context("failed to set up client")?;
    let selector = cli.selector(&registry);
    let session = ResolutionSession::new(Arc::new(client), registry);

    let outcome = session.resolve(url, &*selector).await;
    let state = session.state();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        print_state(&state);
    }

    outcome
        .map(|_| ())
        .with_context(|| format!("could not resolve {url}"))
}

fn print_state(state: &ResolutionState) {
    if let Some(song) = &state.song_info {
        println!("{} - {}", song.title, song.artist_name);
    }
    if let Some(page) = &state.page_url {
        println!("{page}");
    }
    if state.platforms.is_empty() {
        println!("No result found");
        return;
    }
    println!();
    for platform in &state.platforms {
        println!("{:<14} {}", platform.title(), platform.link);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_only_splits_on_commas() {
        let cli = Cli::parse_from([
            "redomi",
            "https://open.spotify.com/track/abc",
            "--only",
            "spotify,deezer",
        ]);
        assert_eq!(cli.only, ["spotify", "deezer"]);
        assert!(!cli.json);
    }

    #[test]
    fn test_platforms_without_url() {
        let cli = Cli::parse_from(["redomi", "--platforms"]);
        assert!(cli.platforms);
        assert!(cli.url.is_none());
    }

    #[test]
    fn test_selector_from_only() {
        let registry = PlatformRegistry::builtin();
        let cli = Cli::parse_from(["redomi", "https://x.test/a", "--only", "deezer"]);
        let selector = cli.selector(&registry);

        assert!(selector.is_eligible(registry.get("deezer").unwrap()));
        assert!(!selector.is_eligible(registry.get("spotify").unwrap()));
    }
}
