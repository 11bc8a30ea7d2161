use async_trait::async_trait;

use crate::error::AizhongResult;
use crate::models::Snapshot;

/// Anything that can produce a complete per-sub-account snapshot.
///
/// A coordinator calls this once per cycle and publishes the result whole;
/// implementations own the entire session and fetch sequence behind it.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    fn source_name(&self) -> &str;

    async fn fetch_snapshot(&self) -> AizhongResult<Snapshot>;
}
