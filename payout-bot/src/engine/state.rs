//! Per-user conversation state: one tagged variant per flow kind, each
//! carrying only its own fields, plus the in-process store keyed by user id.

use payout_api::{BatchPayeeRequest, BatchRequestItem, TransferRequest};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

pub const DEFAULT_PURPOSE: &str = "self";
pub const DEFAULT_CURRENCY: &str = "USDC";

/// Login flow position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginState {
    AwaitingEmail,
    AwaitingOtp { email: String, sid: String },
}

/// Steps shared by the send and withdraw flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStep {
    WalletAddress,
    Amount,
    Confirm,
}

/// Send/withdraw flow: snapshotted bearer token plus the request under
/// construction (`amount` stays empty until the amount step completes).
#[derive(Debug, Clone)]
pub struct TransferState {
    pub token: String,
    pub step: TransferStep,
    pub request: TransferRequest,
}

impl TransferState {
    pub fn new(token: String) -> Self {
        TransferState {
            token,
            step: TransferStep::WalletAddress,
            request: TransferRequest {
                wallet_address: String::new(),
                amount: String::new(),
                purpose_code: DEFAULT_PURPOSE.to_string(),
                currency: DEFAULT_CURRENCY.to_string(),
            },
        }
    }
}

/// Batch flow steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStep {
    WalletAddress,
    Email,
    PayeeId,
    Amount,
    Confirm,
}

/// Fields collected so far for the batch request under construction.
#[derive(Debug, Clone, Default)]
pub struct BatchDraft {
    pub request_id: String,
    pub wallet_address: String,
    pub email: String,
    pub payee_id: String,
}

impl BatchDraft {
    /// Finishes the draft into a queueable batch item.
    pub fn into_item(self, amount: String) -> BatchRequestItem {
        BatchRequestItem {
            request_id: self.request_id,
            request: BatchPayeeRequest {
                wallet_address: self.wallet_address,
                email: self.email,
                payee_id: self.payee_id,
                amount,
                purpose_code: DEFAULT_PURPOSE.to_string(),
                currency: DEFAULT_CURRENCY.to_string(),
            },
        }
    }
}

/// Batch flow: accumulated requests plus the draft in progress. The vector
/// supports multiple requests per submission even though the flow collects
/// one before confirming.
#[derive(Debug, Clone)]
pub struct BatchState {
    pub token: String,
    pub step: BatchStep,
    pub requests: Vec<BatchRequestItem>,
    pub draft: BatchDraft,
}

impl BatchState {
    pub fn new(token: String) -> Self {
        BatchState {
            token,
            step: BatchStep::WalletAddress,
            requests: Vec::new(),
            draft: BatchDraft::default(),
        }
    }
}

/// The per-user multi-step flow record. At most one exists per user;
/// starting a new flow replaces any prior one.
#[derive(Debug, Clone)]
pub enum ConversationState {
    Login(LoginState),
    Send(TransferState),
    Withdraw(TransferState),
    Batch(BatchState),
}

/// In-process store of active conversation states, keyed by user id.
/// `take` removes-and-returns under one lock acquisition so a concurrent
/// duplicate confirm observes no state.
#[derive(Clone, Default)]
pub struct FlowStore {
    inner: Arc<Mutex<HashMap<i64, ConversationState>>>,
}

impl FlowStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, user_id: i64) -> Option<ConversationState> {
        self.inner.lock().await.get(&user_id).cloned()
    }

    pub async fn set(&self, user_id: i64, state: ConversationState) {
        self.inner.lock().await.insert(user_id, state);
    }

    /// Atomically removes and returns the user's state.
    pub async fn take(&self, user_id: i64) -> Option<ConversationState> {
        self.inner.lock().await.remove(&user_id)
    }

    /// Removes and returns the user's state only when `pred` accepts it,
    /// under one lock acquisition. A non-matching state is left untouched,
    /// so a stray confirm never disturbs a different active flow.
    pub async fn take_if<F>(&self, user_id: i64, pred: F) -> Option<ConversationState>
    where
        F: FnOnce(&ConversationState) -> bool,
    {
        let mut map = self.inner.lock().await;
        match map.get(&user_id) {
            Some(state) if pred(state) => map.remove(&user_id),
            _ => None,
        }
    }

    pub async fn clear(&self, user_id: i64) {
        self.inner.lock().await.remove(&user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn take_is_consume_once() {
        let store = FlowStore::new();
        store
            .set(7, ConversationState::Login(LoginState::AwaitingEmail))
            .await;

        assert!(store.take(7).await.is_some());
        assert!(store.take(7).await.is_none());
    }

    #[tokio::test]
    async fn set_overwrites_existing_state() {
        let store = FlowStore::new();
        store
            .set(7, ConversationState::Send(TransferState::new("T".into())))
            .await;
        store
            .set(7, ConversationState::Batch(BatchState::new("T".into())))
            .await;

        match store.get(7).await {
            Some(ConversationState::Batch(b)) => {
                assert_eq!(b.step, BatchStep::WalletAddress);
                assert!(b.requests.is_empty());
            }
            other => panic!("expected batch state, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn take_if_only_removes_matching_state() {
        let store = FlowStore::new();
        store
            .set(7, ConversationState::Send(TransferState::new("T".into())))
            .await;

        assert!(store
            .take_if(7, |s| matches!(s, ConversationState::Batch(_)))
            .await
            .is_none());
        assert!(store.get(7).await.is_some());

        assert!(store
            .take_if(7, |s| matches!(s, ConversationState::Send(_)))
            .await
            .is_some());
        assert!(store.get(7).await.is_none());
    }

    #[test]
    fn draft_into_item_applies_defaults() {
        let draft = BatchDraft {
            request_id: "r-1".to_string(),
            wallet_address: "0xAA".to_string(),
            email: "a@b.com".to_string(),
            payee_id: "P1".to_string(),
        };
        let item = draft.into_item("500000000".to_string());
        assert_eq!(item.request.purpose_code, "self");
        assert_eq!(item.request.currency, "USDC");
        assert_eq!(item.request.amount, "500000000");
    }
}
