//! The provider's two response envelope shapes.
//!
//! Every endpoint wraps its payload in one of two envelopes that differ in
//! field naming and success value: the app gateway uses
//! `{"code": "200", "message": …, "data": …}`, the CIS portal uses
//! `{"CODE": "0", "DESC": …, "DATA": …}`. Modeling them as two separate types
//! keeps the asymmetry explicit; each step names itself and supplies the error
//! its rejection maps to, so a failure always carries the provider's own
//! message.

use serde::Deserialize;

use crate::api::endpoints::{GATEWAY_OK, PORTAL_OK};
use crate::error::{AizhongError, AizhongResult};

const NO_MESSAGE: &str = "provider returned no message";

/// App gateway envelope (login, customer lookup, account switch).
#[derive(Debug, Deserialize)]
pub struct GatewayEnvelope<T> {
    pub code: Option<String>,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> GatewayEnvelope<T> {
    pub fn is_success(&self) -> bool {
        self.code.as_deref() == Some(GATEWAY_OK)
    }

    /// Unwrap the payload of a successful response.
    ///
    /// A non-success `code` is mapped through `reject`, preserving the
    /// provider's `message` verbatim; a success without `data` is a protocol
    /// failure naming the step.
    pub fn into_data<F>(self, step: &str, reject: F) -> AizhongResult<T>
    where
        F: FnOnce(String) -> AizhongError,
    {
        if !self.is_success() {
            return Err(reject(
                self.message.unwrap_or_else(|| NO_MESSAGE.to_string()),
            ));
        }
        self.data
            .ok_or_else(|| AizhongError::missing_field(step, "data"))
    }
}

/// CIS portal envelope (authorization exchange, balance fetch, interruption
/// fetch). Note the distinct field casing and success value.
#[derive(Debug, Deserialize)]
pub struct PortalEnvelope<T> {
    #[serde(rename = "CODE")]
    pub code: Option<String>,
    #[serde(rename = "DESC")]
    pub desc: Option<String>,
    #[serde(rename = "DATA")]
    pub data: Option<T>,
}

impl<T> PortalEnvelope<T> {
    pub fn is_success(&self) -> bool {
        self.code.as_deref() == Some(PORTAL_OK)
    }

    /// Unwrap the payload of a successful response, like
    /// [`GatewayEnvelope::into_data`] but gated on `CODE` and reporting the
    /// provider's `DESC` on rejection.
    pub fn into_data<F>(self, step: &str, reject: F) -> AizhongResult<T>
    where
        F: FnOnce(String) -> AizhongError,
    {
        if !self.is_success() {
            return Err(reject(self.desc.unwrap_or_else(|| NO_MESSAGE.to_string())));
        }
        self.data
            .ok_or_else(|| AizhongError::missing_field(step, "DATA"))
    }

    /// Payload regardless of `CODE`, defaulting when `DATA` is absent.
    ///
    /// The balance endpoint is not code-gated: its record list is simply
    /// iterated, and a missing list means no bindings.
    pub fn data_or_default(self) -> T
    where
        T: Default,
    {
        self.data.unwrap_or_default()
    }
}
