//! Wire types for the remittance API. Field names follow the remote
//! camelCase schema; only the fields the bot touches are modeled.

use serde::{Deserialize, Serialize};

/// `GET /auth/me` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
    pub role: String,
    pub status: String,
    #[serde(rename = "type")]
    pub account_type: String,
    pub wallet_address: Option<String>,
    pub wallet_account_type: Option<String>,
}

/// One token balance inside a wallet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBalance {
    pub balance: String,
    pub symbol: String,
}

/// `GET /wallets/balances` item: a network and its token balances.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletBalances {
    pub network: String,
    #[serde(default)]
    pub balances: Vec<TokenBalance>,
}

/// `GET /wallets` item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub id: String,
    pub network: String,
    pub wallet_address: String,
    pub wallet_type: String,
    #[serde(default)]
    pub is_default: bool,
    pub created_at: String,
}

/// Source/destination account reference on a transfer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRef {
    pub wallet_address: Option<String>,
}

/// A transfer as returned by the listing and submission endpoints.
/// Withdrawal-only fields (`mode`, `sourceOfFunds`, ...) are optional and
/// absent on plain transfers. `amount` is in 10^-8 base units.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    pub id: String,
    #[serde(rename = "type")]
    pub transfer_type: String,
    pub status: String,
    pub amount: f64,
    pub currency: String,
    #[serde(default)]
    pub total_fee: f64,
    #[serde(default)]
    pub fee_currency: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub source_country: Option<String>,
    #[serde(default)]
    pub destination_country: Option<String>,
    #[serde(default)]
    pub source_account: Option<AccountRef>,
    #[serde(default)]
    pub destination_account: Option<AccountRef>,
    #[serde(default)]
    pub payment_url: Option<String>,
    #[serde(default)]
    pub invoice_url: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub purpose_code: Option<String>,
    #[serde(default)]
    pub source_of_funds: Option<String>,
    #[serde(default)]
    pub recipient_relationship: Option<String>,
}

/// `GET /transfers` envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferPage {
    pub data: Vec<Transfer>,
    pub count: i64,
    #[serde(default)]
    pub has_more: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KycDetail {
    #[serde(default)]
    pub kyc_url: Option<String>,
}

/// `GET /kycs` item; only the summary fields the bot renders.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kyc {
    pub status: String,
    #[serde(rename = "type")]
    pub kyc_type: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub kyc_provider_code: Option<String>,
    #[serde(default)]
    pub kyc_detail: Option<KycDetail>,
}

/// `GET /kycs` envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KycPage {
    pub data: Vec<Kyc>,
}

/// `POST /auth/email-otp/request` response; `sid` is echoed back when
/// authenticating the OTP.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpRequested {
    #[serde(default)]
    pub email: Option<String>,
    pub sid: String,
}

/// Body for `POST /transfers/send` and `POST /transfers/wallet-withdraw`.
/// `amount` is a decimal string in 10^-8 base units.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub wallet_address: String,
    pub amount: String,
    pub purpose_code: String,
    pub currency: String,
}

/// One payee request inside a batch submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchPayeeRequest {
    pub wallet_address: String,
    pub email: String,
    pub payee_id: String,
    pub amount: String,
    pub purpose_code: String,
    pub currency: String,
}

/// Batch item: client-generated request id plus the payee request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRequestItem {
    pub request_id: String,
    pub request: BatchPayeeRequest,
}

/// Body for `POST /transfers/send-batch`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchTransferRequest {
    pub requests: Vec<BatchRequestItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchErrorDetail {
    #[serde(default)]
    pub message: Option<String>,
}

/// Per-request outcome inside a batch response: either a transfer or an
/// error, keyed by the submitted request id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResponseItem {
    pub request_id: String,
    #[serde(default)]
    pub response: Option<Transfer>,
    #[serde(default)]
    pub error: Option<BatchErrorDetail>,
}

/// `POST /transfers/send-batch` envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResponse {
    pub responses: Vec<BatchResponseItem>,
}
