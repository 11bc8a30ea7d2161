//! Domain types for the aizhong account monitor.
//!
//! Everything the provider reports is funneled into [`Snapshot`], an ordered
//! map from masked account-name to [`SubAccountRecord`]. Balances are kept as
//! the decimal strings the provider sends; no arithmetic is ever done on them.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Currency unit for prepaid balances (Chinese yuan).
pub const BALANCE_UNIT: &str = "元";

/// Count unit for interruption notices.
pub const NOTICE_UNIT: &str = "条";

/// Phone + password pair collected once at setup.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credential {
    pub phone: String,
    pub password: String,
}

impl Credential {
    pub fn new(phone: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            phone: phone.into(),
            password: password.into(),
        }
    }
}

// Keeps the password out of debug logs.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("phone", &self.phone)
            .field("password", &"***")
            .finish()
    }
}

/// Identifiers accumulated by the session pipeline.
///
/// Each pipeline step either replaces the token or contributes an identifier;
/// a fully populated value is only constructed once all five steps have
/// succeeded, so no field can be read before the step that produces it ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// Final bearer token from the authorization exchange.
    pub token: String,
    /// Customer id from the customer lookup.
    pub customer_id: String,
    /// Account number from the authorization exchange.
    pub account_no: String,
}

impl SessionState {
    pub fn new(
        token: impl Into<String>,
        customer_id: impl Into<String>,
        account_no: impl Into<String>,
    ) -> Self {
        Self {
            token: token.into(),
            customer_id: customer_id.into(),
            account_no: account_no.into(),
        }
    }
}

/// One service-interruption announcement, every field passed through verbatim.
///
/// The provider omits fields freely, so all of them are optional; an absent
/// field stays absent rather than being substituted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterruptionNotice {
    pub notice_type: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub reason: Option<String>,
    pub scope: Option<String>,
}

/// Merged readings for one metered service line, keyed by masked account name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubAccountRecord {
    /// Prepaid water balance as a decimal string, in [`BALANCE_UNIT`].
    pub water_balance: Option<String>,
    /// Prepaid gas balance as a decimal string, in [`BALANCE_UNIT`].
    pub gas_balance: Option<String>,
    /// Interruption notices attached to this sub-account, in arrival order.
    pub interruption_notices: Vec<InterruptionNotice>,
}

impl SubAccountRecord {
    /// Number of attached interruption notices, in [`NOTICE_UNIT`].
    pub fn notice_count(&self) -> usize {
        self.interruption_notices.len()
    }
}

/// The complete per-sub-account state from one successful refresh cycle.
///
/// A BTreeMap so that iteration and serialization order are deterministic:
/// aggregating identical provider responses twice yields byte-identical
/// serialized snapshots.
pub type Snapshot = BTreeMap<String, SubAccountRecord>;

/// Mask an account-name label for use as a snapshot key.
///
/// Counted in characters, not bytes (labels are typically Chinese names):
/// length ≤ 1 is returned unchanged, length 2 keeps only the second
/// character, anything longer keeps the first and last characters with `*`
/// filling the middle. Deterministic for identical input across runs.
pub fn mask_account_name(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    match chars.len() {
        0 | 1 => raw.to_string(),
        2 => chars[1].to_string(),
        len => {
            let mut masked = String::with_capacity(len);
            masked.push(chars[0]);
            for _ in 0..len - 2 {
                masked.push('*');
            }
            masked.push(chars[len - 1]);
            masked
        }
    }
}
