//! Remote-operation seam. The engine talks to the remittance API through
//! this trait so tests can substitute a mock.

use async_trait::async_trait;
use payout_api::{
    BatchResponse, BatchTransferRequest, CopperxClient, KycPage, OtpRequested, Profile, Transfer,
    TransferPage, TransferRequest, Wallet, WalletBalances,
};

type ApiResult<T> = payout_api::Result<T>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PayoutApi: Send + Sync {
    async fn request_otp(&self, email: &str) -> ApiResult<OtpRequested>;
    async fn authenticate_otp(
        &self,
        email: &str,
        otp: &str,
        sid: &str,
    ) -> ApiResult<serde_json::Value>;
    async fn profile(&self, token: &str) -> ApiResult<Profile>;
    async fn balances(&self, token: &str) -> ApiResult<Vec<WalletBalances>>;
    async fn wallets(&self, token: &str) -> ApiResult<Vec<Wallet>>;
    async fn set_default_wallet(&self, token: &str, wallet_id: &str) -> ApiResult<()>;
    async fn transfers(&self, token: &str, page: u32, limit: u32) -> ApiResult<TransferPage>;
    async fn send_transfer(&self, token: &str, req: &TransferRequest) -> ApiResult<Transfer>;
    async fn wallet_withdraw(&self, token: &str, req: &TransferRequest) -> ApiResult<Transfer>;
    async fn send_batch(&self, token: &str, req: &BatchTransferRequest)
        -> ApiResult<BatchResponse>;
    async fn kyc_status(&self, token: &str) -> ApiResult<KycPage>;
}

#[async_trait]
impl PayoutApi for CopperxClient {
    async fn request_otp(&self, email: &str) -> ApiResult<OtpRequested> {
        CopperxClient::request_otp(self, email).await
    }

    async fn authenticate_otp(
        &self,
        email: &str,
        otp: &str,
        sid: &str,
    ) -> ApiResult<serde_json::Value> {
        CopperxClient::authenticate_otp(self, email, otp, sid).await
    }

    async fn profile(&self, token: &str) -> ApiResult<Profile> {
        CopperxClient::profile(self, token).await
    }

    async fn balances(&self, token: &str) -> ApiResult<Vec<WalletBalances>> {
        CopperxClient::balances(self, token).await
    }

    async fn wallets(&self, token: &str) -> ApiResult<Vec<Wallet>> {
        CopperxClient::wallets(self, token).await
    }

    async fn set_default_wallet(&self, token: &str, wallet_id: &str) -> ApiResult<()> {
        CopperxClient::set_default_wallet(self, token, wallet_id).await
    }

    async fn transfers(&self, token: &str, page: u32, limit: u32) -> ApiResult<TransferPage> {
        CopperxClient::transfers(self, token, page, limit).await
    }

    async fn send_transfer(&self, token: &str, req: &TransferRequest) -> ApiResult<Transfer> {
        CopperxClient::send_transfer(self, token, req).await
    }

    async fn wallet_withdraw(&self, token: &str, req: &TransferRequest) -> ApiResult<Transfer> {
        CopperxClient::wallet_withdraw(self, token, req).await
    }

    async fn send_batch(
        &self,
        token: &str,
        req: &BatchTransferRequest,
    ) -> ApiResult<BatchResponse> {
        CopperxClient::send_batch(self, token, req).await
    }

    async fn kyc_status(&self, token: &str) -> ApiResult<KycPage> {
        CopperxClient::kyc_status(self, token).await
    }
}
