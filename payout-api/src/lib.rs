//! # Remittance API client
//!
//! Thin HTTP wrapper over the payout platform API. All authenticated calls
//! carry `Authorization: Bearer <token>`; failures are classified by status
//! code into [`ApiError`] so the bot can map each class to its own reply.
//!
//! ## Modules
//!
//! - [`error`] – [`ApiError`] taxonomy
//! - [`types`] – wire DTOs (camelCase)

mod error;
pub mod types;

pub use error::{ApiError, Result};
pub use types::{
    AccountRef, BatchErrorDetail, BatchPayeeRequest, BatchRequestItem, BatchResponse,
    BatchResponseItem, BatchTransferRequest, Kyc, KycDetail, KycPage, OtpRequested, Profile,
    TokenBalance, Transfer, TransferPage, TransferRequest, Wallet, WalletBalances,
};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Default bound on every outbound request.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Error envelope the API uses for non-success statuses. `message` is a
/// single string or, on validation failures, an array of strings.
#[derive(Debug, Default, serde::Deserialize)]
struct ErrorBody {
    message: Option<MessageField>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(untagged)]
enum MessageField {
    One(String),
    Many(Vec<String>),
}

impl ErrorBody {
    fn messages(self) -> Vec<String> {
        match self.message {
            Some(MessageField::One(s)) => vec![s],
            Some(MessageField::Many(v)) => v,
            None => Vec::new(),
        }
    }

    fn message_text(self) -> String {
        self.messages().join("; ")
    }
}

/// Client for the payout platform API.
#[derive(Clone)]
pub struct CopperxClient {
    http: reqwest::Client,
    base_url: String,
}

impl CopperxClient {
    /// Creates a client with the default request timeout.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Creates a client with an explicit per-request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Requests an email OTP. Returns the `sid` to echo back on authenticate.
    pub async fn request_otp(&self, email: &str) -> Result<OtpRequested> {
        debug!(email = %email, "requesting email OTP");
        let resp = self
            .http
            .post(self.url("/auth/email-otp/request"))
            .json(&serde_json::json!({ "email": email }))
            .send()
            .await?;
        decode(resp).await
    }

    /// Exchanges email + OTP + sid for an authentication payload. The full
    /// response is returned opaquely; callers persist it as-is and only ever
    /// read `accessToken` out of it.
    pub async fn authenticate_otp(
        &self,
        email: &str,
        otp: &str,
        sid: &str,
    ) -> Result<serde_json::Value> {
        debug!(email = %email, "authenticating email OTP");
        let resp = self
            .http
            .post(self.url("/auth/email-otp/authenticate"))
            .json(&serde_json::json!({ "email": email, "otp": otp, "sid": sid }))
            .send()
            .await?;
        decode(resp).await
    }

    /// `GET /auth/me`.
    pub async fn profile(&self, token: &str) -> Result<Profile> {
        self.get_authed("/auth/me", token, &[]).await
    }

    /// `GET /wallets/balances`.
    pub async fn balances(&self, token: &str) -> Result<Vec<WalletBalances>> {
        self.get_authed("/wallets/balances", token, &[]).await
    }

    /// `GET /wallets`.
    pub async fn wallets(&self, token: &str) -> Result<Vec<Wallet>> {
        self.get_authed("/wallets", token, &[]).await
    }

    /// `POST /wallets/default`.
    pub async fn set_default_wallet(&self, token: &str, wallet_id: &str) -> Result<()> {
        let resp = self
            .http
            .post(self.url("/wallets/default"))
            .bearer_auth(token)
            .json(&serde_json::json!({ "walletId": wallet_id }))
            .send()
            .await?;
        decode::<serde_json::Value>(resp).await.map(|_| ())
    }

    /// `GET /transfers?page&limit&sync=true`.
    pub async fn transfers(&self, token: &str, page: u32, limit: u32) -> Result<TransferPage> {
        self.get_authed(
            "/transfers",
            token,
            &[
                ("page", page.to_string()),
                ("limit", limit.to_string()),
                ("sync", "true".to_string()),
            ],
        )
        .await
    }

    /// `POST /transfers/send`.
    pub async fn send_transfer(&self, token: &str, req: &TransferRequest) -> Result<Transfer> {
        self.post_authed("/transfers/send", token, req).await
    }

    /// `POST /transfers/wallet-withdraw`.
    pub async fn wallet_withdraw(&self, token: &str, req: &TransferRequest) -> Result<Transfer> {
        self.post_authed("/transfers/wallet-withdraw", token, req)
            .await
    }

    /// `POST /transfers/send-batch`.
    pub async fn send_batch(
        &self,
        token: &str,
        req: &BatchTransferRequest,
    ) -> Result<BatchResponse> {
        self.post_authed("/transfers/send-batch", token, req).await
    }

    /// `GET /kycs`.
    pub async fn kyc_status(&self, token: &str) -> Result<KycPage> {
        self.get_authed("/kycs", token, &[]).await
    }

    async fn get_authed<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let resp = self
            .http
            .get(self.url(path))
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;
        decode(resp).await
    }

    async fn post_authed<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &B,
    ) -> Result<T> {
        let resp = self
            .http
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        decode(resp).await
    }
}

/// Reads the response body and either deserializes a success payload or
/// classifies the failure by status code.
async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    let status = resp.status();
    let body = resp.text().await?;
    if status.is_success() {
        return serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()));
    }
    let parsed: ErrorBody = serde_json::from_str(&body).unwrap_or_default();
    Err(match status.as_u16() {
        401 => ApiError::AuthExpired,
        422 => ApiError::Validation(parsed.messages()),
        s => ApiError::Remote {
            status: s,
            message: parsed.message_text(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_single_message() {
        let body: ErrorBody = serde_json::from_str(r#"{"message":"boom"}"#).unwrap();
        assert_eq!(body.messages(), vec!["boom".to_string()]);
    }

    #[test]
    fn error_body_message_array() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"message":["amount too small","bad address"]}"#).unwrap();
        assert_eq!(body.messages().len(), 2);
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let client = CopperxClient::new("https://api.example.com/api/").unwrap();
        assert_eq!(client.url("/auth/me"), "https://api.example.com/api/auth/me");
    }
}
