//! The conversation engine: routes inbound events through the session
//! guard, the per-user flow state, and the remote API, and produces
//! transport-neutral replies.

use crate::core::types::{Action, Command, Event, Reply, EngineOutput};
use crate::engine::amount::{parse_base_units, MIN_BASE_UNITS};
use crate::engine::api::PayoutApi;
use crate::engine::guard::resolve_token;
use crate::engine::render;
use crate::engine::state::{
    BatchState, BatchStep, ConversationState, FlowStore, LoginState, TransferState, TransferStep,
};
use payout_api::BatchTransferRequest;
use session_store::SessionStore;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Transfers listed per history page.
const PAGE_LIMIT: u32 = 10;

pub struct ConversationEngine {
    api: Arc<dyn PayoutApi>,
    sessions: Arc<dyn SessionStore>,
    flows: FlowStore,
}

impl ConversationEngine {
    pub fn new(api: Arc<dyn PayoutApi>, sessions: Arc<dyn SessionStore>) -> Self {
        ConversationEngine {
            api,
            sessions,
            flows: FlowStore::new(),
        }
    }

    /// Handles one inbound event. Never fails; every error becomes a reply.
    pub async fn handle(&self, user_id: i64, event: Event) -> EngineOutput {
        match event {
            Event::Command(command) => {
                // A fresh command always abandons whatever flow was active.
                self.flows.clear(user_id).await;
                self.handle_command(user_id, command).await
            }
            Event::Text(text) => self.handle_text(user_id, &text).await,
            Event::Action(action) => self.handle_action(user_id, action).await,
        }
    }

    async fn token(&self, user_id: i64) -> Result<String, EngineOutput> {
        resolve_token(self.sessions.as_ref(), user_id)
            .await
            .map_err(EngineOutput::reply)
    }

    async fn handle_command(&self, user_id: i64, command: Command) -> EngineOutput {
        info!(user_id, ?command, "step: handling command");
        match command {
            Command::Start => EngineOutput::reply(render::welcome()),
            Command::Login => {
                self.flows
                    .set(user_id, ConversationState::Login(LoginState::AwaitingEmail))
                    .await;
                EngineOutput::reply(render::email_prompt())
            }
            Command::Logout => match self.sessions.delete(user_id).await {
                Ok(()) => EngineOutput::reply(render::logged_out()),
                Err(e) => {
                    warn!(user_id, error = %e, "step: logout failed");
                    EngineOutput::reply(Reply::text(
                        "⚠️ Session storage is temporarily unavailable. Please try again in a moment.",
                    ))
                }
            },
            Command::Balance => {
                let token = match self.token(user_id).await {
                    Ok(t) => t,
                    Err(out) => return out,
                };
                match self.api.balances(&token).await {
                    Ok(balances) => EngineOutput::reply(render::balances(&balances)),
                    Err(e) => EngineOutput::reply(render::api_failure(&e, "Fetching balances", false)),
                }
            }
            Command::Wallets => {
                let token = match self.token(user_id).await {
                    Ok(t) => t,
                    Err(out) => return out,
                };
                match self.api.wallets(&token).await {
                    Ok(wallets) => EngineOutput::reply(render::wallets(&wallets)),
                    Err(e) => EngineOutput::reply(render::api_failure(&e, "Fetching wallets", false)),
                }
            }
            Command::Transfers => {
                let token = match self.token(user_id).await {
                    Ok(t) => t,
                    Err(out) => return out,
                };
                match self.api.transfers(&token, 1, PAGE_LIMIT).await {
                    Ok(page) => EngineOutput::reply(render::transfers_page(&page, 1, PAGE_LIMIT)),
                    Err(e) => {
                        EngineOutput::reply(render::api_failure(&e, "Fetching transfers", false))
                    }
                }
            }
            Command::Profile => {
                let token = match self.token(user_id).await {
                    Ok(t) => t,
                    Err(out) => return out,
                };
                match self.api.profile(&token).await {
                    Ok(profile) => EngineOutput::reply(render::profile(&profile)),
                    Err(e) => EngineOutput::reply(render::api_failure(&e, "Fetching profile", false)),
                }
            }
            Command::KycStatus => {
                let token = match self.token(user_id).await {
                    Ok(t) => t,
                    Err(out) => return out,
                };
                match self.api.kyc_status(&token).await {
                    Ok(page) => EngineOutput::reply(render::kyc(&page)),
                    Err(e) => {
                        EngineOutput::reply(render::api_failure(&e, "Fetching KYC status", false))
                    }
                }
            }
            Command::Send => {
                let token = match self.token(user_id).await {
                    Ok(t) => t,
                    Err(out) => return out,
                };
                self.flows
                    .set(user_id, ConversationState::Send(TransferState::new(token)))
                    .await;
                EngineOutput::reply(render::wallet_address_prompt())
            }
            Command::Withdraw => {
                let token = match self.token(user_id).await {
                    Ok(t) => t,
                    Err(out) => return out,
                };
                self.flows
                    .set(
                        user_id,
                        ConversationState::Withdraw(TransferState::new(token)),
                    )
                    .await;
                EngineOutput::reply(render::wallet_address_prompt())
            }
            Command::SendBatch => {
                let token = match self.token(user_id).await {
                    Ok(t) => t,
                    Err(out) => return out,
                };
                self.flows
                    .set(user_id, ConversationState::Batch(BatchState::new(token)))
                    .await;
                EngineOutput::reply(render::wallet_address_prompt())
            }
        }
    }

    async fn handle_text(&self, user_id: i64, text: &str) -> EngineOutput {
        let Some(state) = self.flows.get(user_id).await else {
            // Free text outside any flow is ignored.
            return EngineOutput::none();
        };
        let text = text.trim();
        match state {
            ConversationState::Login(login) => self.login_step(user_id, login, text).await,
            ConversationState::Send(transfer) => {
                self.transfer_step(user_id, transfer, text, false).await
            }
            ConversationState::Withdraw(transfer) => {
                self.transfer_step(user_id, transfer, text, true).await
            }
            ConversationState::Batch(batch) => self.batch_step(user_id, batch, text).await,
        }
    }

    async fn login_step(&self, user_id: i64, login: LoginState, text: &str) -> EngineOutput {
        match login {
            LoginState::AwaitingEmail => {
                info!(user_id, "step: requesting OTP");
                match self.api.request_otp(text).await {
                    Ok(requested) => {
                        self.flows
                            .set(
                                user_id,
                                ConversationState::Login(LoginState::AwaitingOtp {
                                    email: text.to_string(),
                                    sid: requested.sid,
                                }),
                            )
                            .await;
                        EngineOutput::reply(render::otp_prompt())
                    }
                    Err(e) => {
                        warn!(user_id, error = %e, "step: OTP request failed");
                        EngineOutput::reply(render::otp_request_failed())
                    }
                }
            }
            LoginState::AwaitingOtp { email, sid } => {
                info!(user_id, "step: authenticating OTP");
                match self.api.authenticate_otp(&email, text, &sid).await {
                    Ok(auth) => {
                        let payload = auth.to_string();
                        if let Err(e) = self.sessions.set(user_id, &payload).await {
                            warn!(user_id, error = %e, "step: session persist failed");
                            self.flows.clear(user_id).await;
                            return EngineOutput::reply(Reply::text(
                                "⚠️ Login succeeded but the session could not be stored. Please try /login again.",
                            ));
                        }
                        self.flows.clear(user_id).await;
                        EngineOutput::reply(render::login_success())
                    }
                    Err(e) => {
                        warn!(user_id, error = %e, "step: OTP authentication failed");
                        // The OTP step stays active so the user can retype.
                        self.flows
                            .set(
                                user_id,
                                ConversationState::Login(LoginState::AwaitingOtp { email, sid }),
                            )
                            .await;
                        EngineOutput::reply(render::invalid_otp())
                    }
                }
            }
        }
    }

    async fn transfer_step(
        &self,
        user_id: i64,
        mut state: TransferState,
        text: &str,
        withdraw: bool,
    ) -> EngineOutput {
        match state.step {
            TransferStep::WalletAddress => {
                state.request.wallet_address = text.to_string();
                state.step = TransferStep::Amount;
                let reply = if withdraw {
                    render::withdraw_amount_prompt()
                } else {
                    render::send_amount_prompt()
                };
                self.store_transfer(user_id, state, withdraw).await;
                EngineOutput::reply(reply)
            }
            TransferStep::Amount => {
                let Some(base_units) = parse_base_units(text) else {
                    return EngineOutput::reply(render::invalid_amount());
                };
                if base_units < MIN_BASE_UNITS {
                    let action = if withdraw { "withdrawal" } else { "transfer" };
                    return EngineOutput::reply(render::below_minimum(action));
                }
                state.request.amount = base_units.to_string();
                state.step = TransferStep::Confirm;
                let reply = if withdraw {
                    render::withdraw_confirmation(&state.request)
                } else {
                    render::send_confirmation(&state.request)
                };
                self.store_transfer(user_id, state, withdraw).await;
                EngineOutput::reply(reply)
            }
            // Awaiting the button press; stray text changes nothing.
            TransferStep::Confirm => EngineOutput::none(),
        }
    }

    async fn store_transfer(&self, user_id: i64, state: TransferState, withdraw: bool) {
        let state = if withdraw {
            ConversationState::Withdraw(state)
        } else {
            ConversationState::Send(state)
        };
        self.flows.set(user_id, state).await;
    }

    async fn batch_step(&self, user_id: i64, mut state: BatchState, text: &str) -> EngineOutput {
        match state.step {
            BatchStep::WalletAddress => {
                state.draft.request_id = Uuid::new_v4().to_string();
                state.draft.wallet_address = text.to_string();
                state.step = BatchStep::Email;
                self.flows.set(user_id, ConversationState::Batch(state)).await;
                EngineOutput::reply(render::batch_email_prompt())
            }
            BatchStep::Email => {
                state.draft.email = text.to_string();
                state.step = BatchStep::PayeeId;
                self.flows.set(user_id, ConversationState::Batch(state)).await;
                EngineOutput::reply(render::batch_payee_prompt())
            }
            BatchStep::PayeeId => {
                state.draft.payee_id = text.to_string();
                state.step = BatchStep::Amount;
                self.flows.set(user_id, ConversationState::Batch(state)).await;
                EngineOutput::reply(render::send_amount_prompt())
            }
            BatchStep::Amount => {
                let Some(base_units) = parse_base_units(text) else {
                    return EngineOutput::reply(render::invalid_amount());
                };
                if base_units < MIN_BASE_UNITS {
                    return EngineOutput::reply(render::below_minimum("transfer"));
                }
                let item = std::mem::take(&mut state.draft).into_item(base_units.to_string());
                let reply = render::batch_confirmation(&item);
                state.requests.push(item);
                state.step = BatchStep::Confirm;
                self.flows.set(user_id, ConversationState::Batch(state)).await;
                EngineOutput::reply(reply)
            }
            BatchStep::Confirm => EngineOutput::none(),
        }
    }

    async fn handle_action(&self, user_id: i64, action: Action) -> EngineOutput {
        info!(user_id, ?action, "step: handling callback action");
        match action {
            Action::Menu(command) => {
                self.flows.clear(user_id).await;
                self.handle_command(user_id, command).await
            }
            Action::Cancel => match self.flows.take(user_id).await {
                Some(_) => EngineOutput::replies(render::operation_cancelled()),
                None => EngineOutput::ack("No active operation to cancel."),
            },
            Action::ConfirmSend(confirmed) => {
                self.confirm_transfer(user_id, confirmed, false).await
            }
            Action::ConfirmWithdraw(confirmed) => {
                self.confirm_transfer(user_id, confirmed, true).await
            }
            Action::ConfirmBatch(confirmed) => self.confirm_batch(user_id, confirmed).await,
            Action::SetDefaultWallet(wallet_id) => {
                self.set_default_wallet(user_id, &wallet_id).await
            }
            Action::TransfersPrev(page) => {
                self.transfers_nav(user_id, page.saturating_sub(1).max(1)).await
            }
            Action::TransfersNext(page) => self.transfers_nav(user_id, page + 1).await,
        }
    }

    /// Handles the send/withdraw confirm buttons. The state is taken
    /// atomically so a duplicate press finds nothing and only acks.
    async fn confirm_transfer(
        &self,
        user_id: i64,
        confirmed: bool,
        withdraw: bool,
    ) -> EngineOutput {
        let (label, cancelled_text, restart) = if withdraw {
            ("Withdrawal", "❌ Withdrawal cancelled.", "/walletwithdraw")
        } else {
            ("Transfer", "❌ Transfer cancelled.", "/send")
        };

        // Remove-if-matching under one lock: an absent or different flow
        // only acks, and the store is never mutated for it.
        let taken = self
            .flows
            .take_if(user_id, |state| match state {
                ConversationState::Send(s) => !withdraw && s.step == TransferStep::Confirm,
                ConversationState::Withdraw(s) => withdraw && s.step == TransferStep::Confirm,
                _ => false,
            })
            .await;
        let state = match taken {
            Some(ConversationState::Send(s)) | Some(ConversationState::Withdraw(s)) => s,
            _ => {
                return EngineOutput::ack(format!(
                    "❌ Session expired. Please start over with {restart}"
                ));
            }
        };

        if !confirmed {
            return EngineOutput::reply(Reply::text(cancelled_text).as_edit());
        }

        info!(user_id, withdraw, "step: submitting transfer");
        let result = if withdraw {
            self.api.wallet_withdraw(&state.token, &state.request).await
        } else {
            self.api.send_transfer(&state.token, &state.request).await
        };
        match result {
            Ok(transfer) => {
                let reply = if withdraw {
                    render::withdraw_success(&transfer)
                } else {
                    render::transfer_success(&transfer)
                };
                EngineOutput::reply(reply)
            }
            Err(e) => {
                warn!(user_id, error = %e, "step: transfer submission failed");
                EngineOutput::reply(render::api_failure(&e, label, true))
            }
        }
    }

    async fn confirm_batch(&self, user_id: i64, confirmed: bool) -> EngineOutput {
        let taken = self
            .flows
            .take_if(user_id, |state| {
                matches!(state, ConversationState::Batch(s) if s.step == BatchStep::Confirm)
            })
            .await;
        let Some(ConversationState::Batch(state)) = taken else {
            return EngineOutput::ack("❌ Session expired. Please start over with /sendbatch");
        };

        if !confirmed {
            return EngineOutput::reply(Reply::text("❌ Batch transfer cancelled.").as_edit());
        }

        info!(user_id, requests = state.requests.len(), "step: submitting batch");
        let body = BatchTransferRequest {
            requests: state.requests,
        };
        match self.api.send_batch(&state.token, &body).await {
            Ok(response) => EngineOutput::reply(render::batch_success(&response)),
            Err(e) => {
                warn!(user_id, error = %e, "step: batch submission failed");
                EngineOutput::reply(render::api_failure(&e, "Batch transfer", true))
            }
        }
    }

    async fn set_default_wallet(&self, user_id: i64, wallet_id: &str) -> EngineOutput {
        let token = match self.token(user_id).await {
            Ok(t) => t,
            Err(out) => return out,
        };
        match self.api.set_default_wallet(&token, wallet_id).await {
            Ok(()) => {
                // Re-fetch so the listing reflects the new default.
                let output = match self.api.wallets(&token).await {
                    Ok(wallets) => EngineOutput::reply(render::wallets(&wallets)),
                    Err(e) => {
                        EngineOutput::reply(render::api_failure(&e, "Fetching wallets", false))
                    }
                };
                output.with_ack("✅ Default wallet updated successfully!")
            }
            Err(e) => {
                warn!(user_id, wallet_id, error = %e, "step: set default wallet failed");
                EngineOutput::ack("❌ Failed to set default wallet")
            }
        }
    }

    async fn transfers_nav(&self, user_id: i64, page: u32) -> EngineOutput {
        let token = match self.token(user_id).await {
            Ok(t) => t,
            Err(out) => return out,
        };
        match self.api.transfers(&token, page, PAGE_LIMIT).await {
            Ok(result) if result.data.is_empty() => {
                EngineOutput::ack("No more transfers to show")
            }
            Ok(result) => {
                EngineOutput::reply(render::transfers_page(&result, page, PAGE_LIMIT).as_edit())
            }
            Err(e) => EngineOutput::reply(render::api_failure(&e, "Fetching transfers", false)),
        }
    }
}
