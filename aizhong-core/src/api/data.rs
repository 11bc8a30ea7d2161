//! The two data fetches that follow a completed session pipeline.

use serde_json::json;
use tracing::debug;

use crate::api::endpoints::{
    APP_VERSION, BALANCE_PATH, INTERRUPTION_PATH, ORG_NO, RELE_STYLE, SERVICE_ID, SERVICE_SID,
    SERVICE_SN,
};
use crate::api::envelope::PortalEnvelope;
use crate::api::records::{BindingRecord, InterruptionData, RawInterruptionNotice};
use crate::api::session::ProviderSession;
use crate::error::{AizhongError, AizhongResult};
use crate::models::SessionState;

impl ProviderSession {
    /// Fetch the binding records carrying per-consumption-point balances.
    ///
    /// This endpoint is not code-gated: the portal's record list is iterated
    /// as-is, and an absent list means the account has no bindings.
    pub async fn fetch_balances(
        &self,
        state: &SessionState,
        phone: &str,
    ) -> AizhongResult<Vec<BindingRecord>> {
        debug!(path = BALANCE_PATH, "Fetching prepaid balances");

        let body = json!({
            "REGION": "",
            "custId": state.customer_id,
            "phone": phone,
            "accountNo": state.account_no,
        });
        let envelope: PortalEnvelope<Vec<BindingRecord>> =
            self.post(BALANCE_PATH, Some(&state.token), &body).await?;

        let records = envelope.data_or_default();
        debug!(count = records.len(), "Balance records received");
        Ok(records)
    }

    /// Fetch planned service-interruption announcements.
    ///
    /// The request envelope is a block of fixed provider constants; only the
    /// session identifiers vary. A non-success `CODE` fails the cycle with
    /// the portal's description.
    pub async fn fetch_interruptions(
        &self,
        state: &SessionState,
        phone: &str,
    ) -> AizhongResult<Vec<RawInterruptionNotice>> {
        debug!(path = INTERRUPTION_PATH, "Fetching interruption notices");

        let body = json!({
            "DATA": {
                "ORG_NO": ORG_NO,
                "RELE_STYLE": RELE_STYLE,
                "zsazVersion": APP_VERSION,
            },
            "SERVICE_ID": SERVICE_ID,
            "SN": SERVICE_SN,
            "SID": SERVICE_SID,
            "custId": state.customer_id,
            "phone": phone,
            "accountNo": state.account_no,
        });
        let envelope: PortalEnvelope<InterruptionData> = self
            .post(INTERRUPTION_PATH, Some(&state.token), &body)
            .await?;
        let data = envelope.into_data(
            "interruption fetch",
            AizhongError::InterruptionFetchRejected,
        )?;
        let notices = data
            .rtn_result
            .ok_or_else(|| AizhongError::missing_field("interruption fetch", "DATA.RTN_RESULT"))?;

        debug!(count = notices.len(), "Interruption notices received");
        Ok(notices)
    }
}
