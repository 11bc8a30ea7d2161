use async_trait::async_trait;

use crate::api::ProviderSession;
use crate::config::{AizhongConfig, ProviderConfig};
use crate::error::AizhongResult;
use crate::models::{Credential, Snapshot};
use crate::refresh::traits::SnapshotSource;
use crate::snapshot::build_snapshot;

/// Snapshot source backed by the provider's HTTP portal.
///
/// Each fetch opens a fresh [`ProviderSession`], runs the five-step pipeline
/// and both data fetches inside it, and drops the session when done, so no
/// cookie or token state leaks from one cycle into the next.
pub struct ApiSnapshotSource {
    provider: ProviderConfig,
    credential: Credential,
}

impl ApiSnapshotSource {
    pub fn new(provider: ProviderConfig, credential: Credential) -> Self {
        Self {
            provider,
            credential,
        }
    }

    pub fn from_config(config: &AizhongConfig) -> Self {
        Self::new(config.provider.clone(), config.credential())
    }
}

#[async_trait]
impl SnapshotSource for ApiSnapshotSource {
    fn source_name(&self) -> &str {
        "aizhong"
    }

    async fn fetch_snapshot(&self) -> AizhongResult<Snapshot> {
        let session = ProviderSession::open(&self.provider)?;
        let state = session.establish(&self.credential).await?;

        let bindings = session.fetch_balances(&state, &self.credential.phone).await?;
        let notices = session
            .fetch_interruptions(&state, &self.credential.phone)
            .await?;

        Ok(build_snapshot(bindings, notices))
    }
}
