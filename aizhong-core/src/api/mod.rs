pub mod data;
pub mod endpoints;
pub mod envelope;
pub mod records;
pub mod session;

pub use envelope::{GatewayEnvelope, PortalEnvelope};
pub use records::{
    AuthorizationGrant, BindingRecord, ConsumptionEntry, CustomerIdentity, InterruptionData,
    RawInterruptionNotice,
};
pub use session::ProviderSession;
