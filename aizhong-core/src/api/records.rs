//! Wire-level payload shapes for the provider's endpoints.
//!
//! Fields the pipeline depends on stay `Option` here; the session steps check
//! them and turn an absence into a protocol failure naming the missing path.
//! Everything else is passed through verbatim.

use serde::Deserialize;

use crate::api::endpoints::{CONS_TYPE_GAS, CONS_TYPE_WATER, ENERGY_TYPE_WATER};
use crate::models::InterruptionNotice;

/// `data` payload of the login step.
#[derive(Debug, Deserialize)]
pub struct LoginData {
    pub token: Option<String>,
}

/// `data` payload of the customer lookup.
#[derive(Debug, Deserialize)]
pub struct CustomerInfoData {
    #[serde(rename = "custInfoList", default)]
    pub cust_info_list: Vec<CustomerInfoRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CustomerInfoRecord {
    #[serde(rename = "custId")]
    pub cust_id: Option<String>,
    #[serde(rename = "custNo")]
    pub cust_no: Option<String>,
}

/// Identifiers extracted from the first customer record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerIdentity {
    pub cust_id: String,
    pub cust_no: String,
}

/// `data` payload of the account switch.
#[derive(Debug, Deserialize)]
pub struct SwitchData {
    pub token: Option<String>,
}

/// `DATA` payload of the authorization exchange.
#[derive(Debug, Deserialize)]
pub struct AuthorizationData {
    #[serde(rename = "Authorization")]
    pub authorization: Option<String>,
    #[serde(rename = "accountNo")]
    pub account_no: Option<String>,
}

/// Validated output of the authorization exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationGrant {
    pub token: String,
    pub account_no: String,
}

/// One element of the balance fetch's `DATA` array: a consumption point bound
/// to the account, with its service type and prepaid balance.
#[derive(Debug, Clone, Deserialize)]
pub struct BindingRecord {
    #[serde(rename = "CONS_LIST", default)]
    pub cons_list: Vec<ConsumptionEntry>,
    #[serde(rename = "CONS_TYPE_NAME")]
    pub cons_type_name: Option<String>,
    #[serde(rename = "PREPAY_BAL")]
    pub prepay_balance: Option<String>,
}

impl BindingRecord {
    /// Raw account-name label of the first consumption entry, if any.
    ///
    /// Records with an empty consumption sub-list have no label and are
    /// skipped by the aggregator.
    pub fn account_label(&self) -> Option<&str> {
        self.cons_list.first().and_then(|e| e.acct_name.as_deref())
    }

    pub fn is_water(&self) -> bool {
        self.cons_type_name.as_deref() == Some(CONS_TYPE_WATER)
    }

    pub fn is_gas(&self) -> bool {
        self.cons_type_name.as_deref() == Some(CONS_TYPE_GAS)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConsumptionEntry {
    #[serde(rename = "ACCT_NAME")]
    pub acct_name: Option<String>,
}

/// `DATA` payload of the interruption fetch. `RTN_RESULT` is required on a
/// success-coded response; its absence is a protocol failure.
#[derive(Debug, Deserialize)]
pub struct InterruptionData {
    #[serde(rename = "RTN_RESULT")]
    pub rtn_result: Option<Vec<RawInterruptionNotice>>,
}

/// One interruption announcement as the portal reports it.
#[derive(Debug, Clone, Deserialize)]
pub struct RawInterruptionNotice {
    #[serde(rename = "ENERGY_TYPE_NAME")]
    pub energy_type_name: Option<String>,
    #[serde(rename = "GAS_STOP_TYPE_NAME")]
    pub stop_type_name: Option<String>,
    #[serde(rename = "PLAN_BGN_TIME")]
    pub plan_begin_time: Option<String>,
    #[serde(rename = "PLAN_END_TIME")]
    pub plan_end_time: Option<String>,
    #[serde(rename = "GAS_STOP_REA_NAME")]
    pub stop_reason_name: Option<String>,
    #[serde(rename = "GAS_STOP_RANGE")]
    pub stop_range: Option<String>,
}

impl RawInterruptionNotice {
    /// Whether this notice concerns water service. Only water notices are
    /// attached to sub-accounts.
    pub fn is_water(&self) -> bool {
        self.energy_type_name.as_deref() == Some(ENERGY_TYPE_WATER)
    }
}

impl From<RawInterruptionNotice> for InterruptionNotice {
    fn from(raw: RawInterruptionNotice) -> Self {
        InterruptionNotice {
            notice_type: raw.stop_type_name,
            start_time: raw.plan_begin_time,
            end_time: raw.plan_end_time,
            reason: raw.stop_reason_name,
            scope: raw.stop_range,
        }
    }
}
