pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod refresh;
pub mod registry;
pub mod snapshot;

pub use api::{
    AuthorizationGrant, BindingRecord, ConsumptionEntry, CustomerIdentity, GatewayEnvelope,
    PortalEnvelope, ProviderSession, RawInterruptionNotice,
};
pub use config::{
    ensure_config_dir, get_config_dir, AccountConfig, AizhongConfig, LoggingConfig,
    ProviderConfig, RefreshConfig,
};
pub use error::{AizhongError, AizhongResult};
pub use models::{
    mask_account_name, Credential, InterruptionNotice, SessionState, Snapshot, SubAccountRecord,
    BALANCE_UNIT, NOTICE_UNIT,
};
pub use refresh::{
    AccountCoordinator, ApiSnapshotSource, RefreshHistory, RefreshHistoryEntry, RefreshReport,
    RefreshStatus, SnapshotSource,
};
pub use registry::CoordinatorRegistry;
pub use snapshot::build_snapshot;
