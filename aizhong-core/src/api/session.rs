//! The five-step session pipeline.
//!
//! Obtaining a usable portal authorization takes a chain of dependent calls:
//! login issues a gateway token, a throwaway cart probe primes the server-side
//! session, the customer lookup yields the customer identifiers, the account
//! switch re-issues the token for that customer, and the authorization
//! exchange finally trades it for the portal token plus account number. Each
//! step's output is a required input to the next, so the chain short-circuits
//! on the first failure.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info};

use crate::api::endpoints::{
    ACCOUNT_SWITCH_PATH, AUTHORIZATION_PATH, CART_PROBE_PATH, CUSTOMER_LOOKUP_PATH, LOGIN_PATH,
    LOGIN_TYPE, PUSH_CLIENT_ID,
};
use crate::api::envelope::{GatewayEnvelope, PortalEnvelope};
use crate::api::records::{
    AuthorizationData, AuthorizationGrant, CustomerIdentity, CustomerInfoData, LoginData,
    SwitchData,
};
use crate::config::ProviderConfig;
use crate::error::{AizhongError, AizhongResult};
use crate::models::{Credential, SessionState};

/// One refresh cycle's connection scope against the provider.
///
/// Holds the HTTP client for the cycle: a cookie store keeps the provider's
/// server-side session continuous across all calls, and dropping the value at
/// the end of the cycle releases the connection scope on success and failure
/// paths alike. Every request carries the configured timeout.
pub struct ProviderSession {
    client: Client,
    base_url: String,
}

impl ProviderSession {
    /// Open a fresh connection scope. Nothing is sent until the first step.
    pub fn open(config: &ProviderConfig) -> AizhongResult<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(super) async fn post<B, R>(&self, path: &str, token: Option<&str>, body: &B) -> AizhongResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let mut request = self.client.post(self.url(path)).json(body);
        if let Some(token) = token {
            // The provider expects the bare token value, not a Bearer scheme.
            request = request.header("Authorization", token);
        }
        let response = request.send().await?.error_for_status()?;
        Ok(response.json().await?)
    }

    /// Run all five steps in order and assemble the resulting session state.
    pub async fn establish(&self, credential: &Credential) -> AizhongResult<SessionState> {
        let token = self.login(credential).await?;
        self.probe_cart(&token).await?;
        let customer = self.lookup_customer(&token, &credential.phone).await?;
        let token = self.switch_account(&token, &customer.cust_no).await?;
        let grant = self
            .exchange_authorization(&token, &customer.cust_id, &credential.phone)
            .await?;

        info!("Provider session established");
        Ok(SessionState::new(
            grant.token,
            customer.cust_id,
            grant.account_no,
        ))
    }

    /// Step 1: submit phone + password to the app gateway.
    pub async fn login(&self, credential: &Credential) -> AizhongResult<String> {
        debug!(path = LOGIN_PATH, "Logging in to app gateway");

        let body = json!({
            "type": LOGIN_TYPE,
            "phone": credential.phone,
            "password": credential.password,
        });
        let envelope: GatewayEnvelope<LoginData> = self.post(LOGIN_PATH, None, &body).await?;
        let data = envelope.into_data("login", AizhongError::LoginRejected)?;

        data.token
            .ok_or_else(|| AizhongError::missing_field("login", "data.token"))
    }

    /// Step 2: authenticated call whose response is discarded.
    ///
    /// The provider's session is stateful: skipping this call makes later
    /// steps fail, so a transport-level error here is fatal to the cycle.
    pub async fn probe_cart(&self, token: &str) -> AizhongResult<()> {
        debug!(path = CART_PROBE_PATH, "Priming provider session");

        self.client
            .get(self.url(CART_PROBE_PATH))
            .header("Authorization", token)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }

    /// Step 3: look up the customer records bound to the phone number and
    /// take the first.
    pub async fn lookup_customer(
        &self,
        token: &str,
        phone: &str,
    ) -> AizhongResult<CustomerIdentity> {
        debug!(path = CUSTOMER_LOOKUP_PATH, "Looking up customer records");

        let body = json!({ "phone": phone });
        let envelope: GatewayEnvelope<CustomerInfoData> =
            self.post(CUSTOMER_LOOKUP_PATH, Some(token), &body).await?;
        let data = envelope.into_data("customer lookup", AizhongError::CustomerLookupRejected)?;

        let record = data
            .cust_info_list
            .into_iter()
            .next()
            .ok_or(AizhongError::CustomerNotFound)?;

        let cust_id = record.cust_id.ok_or_else(|| {
            AizhongError::missing_field("customer lookup", "custInfoList[0].custId")
        })?;
        let cust_no = record.cust_no.ok_or_else(|| {
            AizhongError::missing_field("customer lookup", "custInfoList[0].custNo")
        })?;

        Ok(CustomerIdentity { cust_id, cust_no })
    }

    /// Step 4: switch the session to the customer number; the gateway
    /// re-issues the token.
    pub async fn switch_account(&self, token: &str, cust_no: &str) -> AizhongResult<String> {
        debug!(path = ACCOUNT_SWITCH_PATH, "Switching to customer account");

        let body = json!({ "custNo": cust_no });
        let envelope: GatewayEnvelope<SwitchData> =
            self.post(ACCOUNT_SWITCH_PATH, Some(token), &body).await?;
        let data = envelope.into_data("account switch", AizhongError::AccountSwitchRejected)?;

        data.token
            .ok_or_else(|| AizhongError::missing_field("account switch", "data.token"))
    }

    /// Step 5: trade the gateway token for the portal authorization and the
    /// account number. This is the first portal-enveloped response.
    pub async fn exchange_authorization(
        &self,
        token: &str,
        cust_id: &str,
        phone: &str,
    ) -> AizhongResult<AuthorizationGrant> {
        debug!(path = AUTHORIZATION_PATH, "Exchanging portal authorization");

        let body = json!({
            "custId": cust_id,
            "token": token,
            "pushClientid": PUSH_CLIENT_ID,
            "phone": phone,
        });
        let envelope: PortalEnvelope<AuthorizationData> =
            self.post(AUTHORIZATION_PATH, Some(token), &body).await?;
        let data =
            envelope.into_data("authorization exchange", AizhongError::AuthorizationRejected)?;

        let portal_token = data.authorization.ok_or_else(|| {
            AizhongError::missing_field("authorization exchange", "DATA.Authorization")
        })?;
        let account_no = data.account_no.ok_or_else(|| {
            AizhongError::missing_field("authorization exchange", "DATA.accountNo")
        })?;

        Ok(AuthorizationGrant {
            token: portal_token,
            account_no,
        })
    }
}
