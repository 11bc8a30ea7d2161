pub mod coordinator;
pub mod source;
pub mod traits;
pub mod types;

pub use coordinator::AccountCoordinator;
pub use source::ApiSnapshotSource;
pub use traits::SnapshotSource;
pub use types::{RefreshHistory, RefreshHistoryEntry, RefreshReport, RefreshStatus};
