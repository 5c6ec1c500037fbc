//! Seam between the orchestrator and whatever resolves song links.

use async_trait::async_trait;

use crate::{Resolution, Result};

/// Resolves a song URL on one platform into links on every platform.
#[async_trait]
pub trait SongResolver: Send + Sync {
    async fn resolve(&self, input_url: &str) -> Result<Resolution>;
}

