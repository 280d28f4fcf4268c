//! Message rendering: every user-visible text and keyboard the bot
//! produces. Pure functions over API data so the engine tests can assert
//! on content without a transport.

use crate::core::types::{Action, Button, Command, Keyboard, Reply};
use crate::engine::amount::{format_remote_amount, MIN_BASE_UNITS, UNITS_PER_TOKEN};
use chrono::DateTime;
use payout_api::{
    ApiError, BatchRequestItem, BatchResponse, KycPage, Profile, Transfer, TransferPage,
    TransferRequest, Wallet, WalletBalances,
};

/// Networks labelled as testnets in listings.
const TESTNET_NETWORKS: &[&str] = &["80002"];

const KYC_PORTAL_URL: &str = "https://copperx.io";

fn opt(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("N/A")
}

/// Renders an ISO-8601 timestamp as "YYYY-MM-DD HH:MM UTC", or passes the
/// raw value through when it does not parse.
fn format_date(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => dt.format("%Y-%m-%d %H:%M UTC").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Trims a float to a compact decimal string (fees arrive already scaled).
fn format_float(value: f64) -> String {
    let s = format!("{value:.8}");
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

fn min_amount_display() -> String {
    (MIN_BASE_UNITS / UNITS_PER_TOKEN).to_string()
}

pub fn main_menu_keyboard() -> Keyboard {
    vec![
        vec![
            Button::action("👤 Profile", &Action::Menu(Command::Profile)),
            Button::action("💰 Balance", &Action::Menu(Command::Balance)),
            Button::action("👛 Wallets", &Action::Menu(Command::Wallets)),
        ],
        vec![
            Button::action("📤 Send", &Action::Menu(Command::Send)),
            Button::action("📥 Withdraw", &Action::Menu(Command::Withdraw)),
        ],
        vec![
            Button::action("📦 Batch Send", &Action::Menu(Command::SendBatch)),
            Button::action("💸 Transfers", &Action::Menu(Command::Transfers)),
        ],
        vec![
            Button::action("🔑 Login", &Action::Menu(Command::Login)),
            Button::action("🚪 Logout", &Action::Menu(Command::Logout)),
        ],
        vec![Button::action("🔍 KYC Status", &Action::Menu(Command::KycStatus))],
    ]
}

fn cancel_keyboard() -> Keyboard {
    vec![vec![Button::action("❌ Cancel", &Action::Cancel)]]
}

fn prompt(text: impl Into<String>) -> Reply {
    Reply::text(text).with_keyboard(cancel_keyboard())
}

pub fn welcome() -> Reply {
    Reply::text("Welcome to Copperx Bot! Use /login to authenticate.")
        .with_keyboard(main_menu_keyboard())
}

pub fn main_menu() -> Reply {
    Reply::text("What would you like to do?").with_keyboard(main_menu_keyboard())
}

pub fn email_prompt() -> Reply {
    prompt("Please enter your email address:")
}

pub fn otp_prompt() -> Reply {
    prompt("OTP sent to your email. Please enter the OTP:")
}

pub fn otp_request_failed() -> Reply {
    Reply::text("Error sending OTP. Please try again.")
}

pub fn invalid_otp() -> Reply {
    prompt("Invalid OTP. Please try again.")
}

pub fn login_success() -> Reply {
    Reply::text("✅ Login successful! You are now authenticated.\n\nWhat would you like to do?")
        .with_keyboard(main_menu_keyboard())
}

pub fn logged_out() -> Reply {
    Reply::text("✅ You have been logged out successfully.")
}

pub fn wallet_address_prompt() -> Reply {
    prompt("Please enter the recipient's wallet address:")
}

pub fn send_amount_prompt() -> Reply {
    prompt(format!(
        "Please enter the amount to send (minimum {} USDC):",
        min_amount_display()
    ))
}

pub fn withdraw_amount_prompt() -> Reply {
    prompt(format!(
        "Please enter the amount to withdraw (minimum {} USDC):",
        min_amount_display()
    ))
}

pub fn below_minimum(action: &str) -> Reply {
    prompt(format!(
        "❌ Minimum {action} amount is {} USDC. Please enter a larger amount:",
        min_amount_display()
    ))
}

pub fn invalid_amount() -> Reply {
    prompt("❌ That doesn't look like a valid amount. Please enter a number:")
}

pub fn batch_email_prompt() -> Reply {
    prompt("Please enter the recipient's email address:")
}

pub fn batch_payee_prompt() -> Reply {
    prompt("Please enter the payee ID:")
}

pub fn operation_cancelled() -> Vec<Reply> {
    vec![
        Reply::text("Operation cancelled.").as_edit(),
        main_menu(),
    ]
}

fn confirm_keyboard(yes: Action, no: Action) -> Keyboard {
    vec![vec![
        Button::action("✅ Confirm", &yes),
        Button::action("❌ Cancel", &no),
    ]]
}

pub fn send_confirmation(req: &TransferRequest) -> Reply {
    let mut text = "📝 *Please confirm your transfer:*\n\n".to_string();
    text += &format!("🔹 *To:* `{}`", req.wallet_address);
    text += &format!(
        "\n💵 *Amount:* {} {}",
        format_remote_amount(req.amount.parse::<f64>().unwrap_or(0.0)),
        req.currency
    );
    text += &format!("\n🎯 *Purpose:* {}", req.purpose_code);
    text += "\n💸 *Fee:* Will be calculated";
    Reply::markdown(text).with_keyboard(confirm_keyboard(
        Action::ConfirmSend(true),
        Action::ConfirmSend(false),
    ))
}

pub fn withdraw_confirmation(req: &TransferRequest) -> Reply {
    let mut text = "📝 *Please confirm your withdrawal:*\n\n".to_string();
    text += &format!("🔹 *To:* `{}`", req.wallet_address);
    text += &format!(
        "\n💵 *Amount:* {} {}",
        format_remote_amount(req.amount.parse::<f64>().unwrap_or(0.0)),
        req.currency
    );
    text += &format!("\n🎯 *Purpose:* {}", req.purpose_code);
    text += "\n💸 *Fee:* Will be calculated";
    Reply::markdown(text).with_keyboard(confirm_keyboard(
        Action::ConfirmWithdraw(true),
        Action::ConfirmWithdraw(false),
    ))
}

pub fn batch_confirmation(item: &BatchRequestItem) -> Reply {
    let req = &item.request;
    let mut text = "📝 *Please confirm your batch transfer:*\n\n".to_string();
    text += &format!("🔹 *To:* `{}`", req.wallet_address);
    text += &format!("\n📧 *Email:* {}", req.email);
    text += &format!("\n👤 *Payee ID:* {}", req.payee_id);
    text += &format!(
        "\n💵 *Amount:* {} {}",
        format_remote_amount(req.amount.parse::<f64>().unwrap_or(0.0)),
        req.currency
    );
    text += &format!("\n🎯 *Purpose:* {}", req.purpose_code);
    text += "\n💸 *Fee:* Will be calculated";
    Reply::markdown(text).with_keyboard(confirm_keyboard(
        Action::ConfirmBatch(true),
        Action::ConfirmBatch(false),
    ))
}

pub fn profile(profile: &Profile) -> Reply {
    let mut text = "👤 *Your Profile*\n\n".to_string();
    text += &format!(
        "*Name:* {} {}\n",
        opt(&profile.first_name),
        opt(&profile.last_name)
    );
    text += &format!("*Email:* {}\n", profile.email);
    text += &format!("*Role:* {}\n", profile.role);
    text += &format!("*Status:* {}\n", profile.status);
    text += &format!("*Type:* {}\n", profile.account_type);
    text += "\n💼 *Wallet Details*\n";
    text += &format!(
        "*Address:* `{}`\n",
        profile.wallet_address.as_deref().unwrap_or("Not set")
    );
    text += &format!(
        "*Type:* {}\n",
        profile.wallet_account_type.as_deref().unwrap_or("Not set")
    );
    Reply::markdown(text)
}

pub fn balances(wallets: &[WalletBalances]) -> Reply {
    if wallets.iter().all(|w| w.balances.is_empty()) {
        return Reply::text("💰 Your wallet has no funds.");
    }
    let mut text = "💰 *Your Balances:*\n".to_string();
    for wallet in wallets {
        let testnet = if TESTNET_NETWORKS.contains(&wallet.network.as_str()) {
            " (Testnet)"
        } else {
            ""
        };
        text += &format!("\n🔹 *{}{} Wallet*", wallet.network, testnet);
        for balance in &wallet.balances {
            text += &format!("\n{}: {}", balance.symbol, balance.balance);
        }
        text += "\n";
    }
    Reply::markdown(text)
}

pub fn wallets(wallets: &[Wallet]) -> Reply {
    if wallets.is_empty() {
        return Reply::text("👛 You have no wallets.");
    }
    let mut text = "👛 *Your Wallets:*".to_string();
    let mut keyboard: Keyboard = Vec::new();
    for wallet in wallets {
        text += &format!("\n\n🔹 *{} Wallet*", wallet.network);
        text += &format!("\nAddress: `{}`", wallet.wallet_address);
        text += &format!("\nType: {}", wallet.wallet_type);
        text += &format!("\nDefault: {}", if wallet.is_default { "✅" } else { "❌" });
        keyboard.push(vec![Button::action(
            format!(
                "Set {} as Default {}",
                wallet.network,
                if wallet.is_default { "✅" } else { "" }
            )
            .trim_end(),
            &Action::SetDefaultWallet(wallet.id.clone()),
        )]);
    }
    Reply::markdown(text).with_keyboard(keyboard)
}

/// Renders one page of the transfer history. `page` is 1-based; the nav
/// buttons embed it so the next press needs no message parsing.
pub fn transfers_page(page_data: &TransferPage, page: u32, limit: u32) -> Reply {
    if page_data.data.is_empty() {
        return Reply::text("💸 No transfers found.");
    }
    let mut text = "💸 *Your Recent Transfers:*\n".to_string();
    for transfer in &page_data.data {
        text += &format!("\n🔹 *Transfer ID:* {}", transfer.id);
        text += &format!("\nType: {}", transfer.transfer_type);
        text += &format!("\nStatus: {}", transfer.status);
        text += &format!(
            "\nAmount: {} {}",
            format_remote_amount(transfer.amount),
            transfer.currency
        );
        text += &format!(
            "\nFee: {} {}",
            format_float(transfer.total_fee),
            opt(&transfer.fee_currency)
        );
        text += &format!("\nDate: {}", format_date(&transfer.created_at));
        text += &format!(
            "\nFrom: {}",
            transfer
                .source_country
                .as_deref()
                .map(str::to_uppercase)
                .unwrap_or_else(|| "N/A".to_string())
        );
        text += &format!(
            "\nTo: {}",
            transfer
                .destination_country
                .as_deref()
                .map(str::to_uppercase)
                .unwrap_or_else(|| "N/A".to_string())
        );
        text += "\n";
    }

    let total_pages = ((page_data.count.max(0) as u32) + limit - 1) / limit.max(1);
    text += &format!("\n📊 Page {} of {}", page, total_pages.max(1));

    let mut row = Vec::new();
    if page > 1 {
        row.push(Button::action("⬅️ Previous", &Action::TransfersPrev(page)));
    }
    if page_data.has_more {
        row.push(Button::action("Next ➡️", &Action::TransfersNext(page)));
    }
    let reply = Reply::markdown(text);
    if row.is_empty() {
        reply
    } else {
        reply.with_keyboard(vec![row])
    }
}

pub fn transfer_success(transfer: &Transfer) -> Reply {
    let mut text = "✅ *Transfer Initiated Successfully!*\n\n".to_string();
    text += &format!("🔹 *Transfer ID:* {}", transfer.id);
    text += &common_transfer_lines(transfer);
    Reply::markdown(text).as_edit()
}

pub fn withdraw_success(withdrawal: &Transfer) -> Reply {
    let mut text = "✅ *Withdrawal Initiated Successfully!*\n\n".to_string();
    text += &format!("🔹 *Withdrawal ID:* {}", withdrawal.id);
    text += &format!("\nType: {}", withdrawal.transfer_type);
    text += &format!("\nStatus: {}", withdrawal.status);
    text += &format!(
        "\nAmount: {} {}",
        format_remote_amount(withdrawal.amount),
        withdrawal.currency
    );
    text += &format!(
        "\nFee: {} {}",
        format_float(withdrawal.total_fee),
        opt(&withdrawal.fee_currency)
    );
    text += &format!("\nMode: {}", opt(&withdrawal.mode));
    text += &format!("\nPurpose: {}", opt(&withdrawal.purpose_code));
    text += &format!("\nSource of Funds: {}", opt(&withdrawal.source_of_funds));
    text += &format!(
        "\nRecipient Relationship: {}",
        opt(&withdrawal.recipient_relationship)
    );
    text += &endpoint_lines(withdrawal);
    if let Some(url) = &withdrawal.invoice_url {
        text += &format!("\n\n📄 Invoice URL: {url}");
    }
    Reply::markdown(text).as_edit()
}

fn common_transfer_lines(transfer: &Transfer) -> String {
    let mut text = String::new();
    text += &format!("\nType: {}", transfer.transfer_type);
    text += &format!("\nStatus: {}", transfer.status);
    text += &format!(
        "\nAmount: {} {}",
        format_remote_amount(transfer.amount),
        transfer.currency
    );
    text += &format!(
        "\nFee: {} {}",
        format_float(transfer.total_fee),
        opt(&transfer.fee_currency)
    );
    text += &endpoint_lines(transfer);
    text
}

fn endpoint_lines(transfer: &Transfer) -> String {
    let mut text = String::new();
    text += "\n\n📤 *From Wallet:*";
    text += &format!(
        "\n`{}`",
        transfer
            .source_account
            .as_ref()
            .and_then(|a| a.wallet_address.as_deref())
            .unwrap_or("N/A")
    );
    text += "\n\n📥 *To Wallet:*";
    text += &format!(
        "\n`{}`",
        transfer
            .destination_account
            .as_ref()
            .and_then(|a| a.wallet_address.as_deref())
            .unwrap_or("N/A")
    );
    text += &format!("\nCreated: {}", format_date(&transfer.created_at));
    if let Some(url) = &transfer.payment_url {
        text += &format!("\n\n🔗 Payment URL: {url}");
    }
    text
}

pub fn batch_success(response: &BatchResponse) -> Reply {
    let mut text = "✅ *Batch Transfer Initiated Successfully!*\n\n".to_string();
    for (index, item) in response.responses.iter().enumerate() {
        text += &format!("\n🔹 *Transfer {}:*", index + 1);
        text += &format!("\nRequest ID: {}", item.request_id);
        text += &format!(
            "\nStatus: {}",
            item.response
                .as_ref()
                .map(|t| t.status.as_str())
                .unwrap_or("Failed")
        );
        if let Some(transfer) = &item.response {
            text += &format!(
                "\nAmount: {} {}",
                format_remote_amount(transfer.amount),
                transfer.currency
            );
            text += &format!(
                "\nFee: {} {}",
                format_float(transfer.total_fee),
                opt(&transfer.fee_currency)
            );
            text += &format!("\nCreated: {}", format_date(&transfer.created_at));
            if let Some(url) = &transfer.payment_url {
                text += &format!("\n🔗 Payment URL: {url}");
            }
        }
        if let Some(error) = &item.error {
            text += &format!(
                "\n❌ Error: {}",
                error.message.as_deref().unwrap_or("Unknown error")
            );
        }
        text += "\n";
    }
    Reply::markdown(text).as_edit()
}

pub fn kyc(page: &KycPage) -> Reply {
    let Some(kyc) = page.data.first() else {
        return Reply::markdown(format!(
            "❌ Please complete your KYC process at [Copperx.io]({KYC_PORTAL_URL})"
        ))
        .with_keyboard(vec![vec![Button::url("🔗 Complete KYC", KYC_PORTAL_URL)]]);
    };
    let mut text = "🔍 *KYC Status Information*\n\n".to_string();
    text += &format!("*Status:* {}\n", kyc.status.to_uppercase());
    text += &format!("*Type:* {}\n", kyc.kyc_type);
    text += &format!("*Country:* {}\n", opt(&kyc.country));
    text += &format!("*Provider:* {}\n", opt(&kyc.kyc_provider_code));
    let kyc_url = kyc.kyc_detail.as_ref().and_then(|d| d.kyc_url.clone());
    if let Some(url) = &kyc_url {
        text += &format!("\n🔗 [Complete KYC Process]({url})\n");
    }
    let reply = Reply::markdown(text);
    match kyc_url {
        Some(url) => reply.with_keyboard(vec![vec![Button::url("🔗 Complete KYC", url)]]),
        None => reply,
    }
}

/// Maps an API error to the reply for it. `action` names the operation in
/// user terms ("Transfer", "Withdrawal", ...). `edit` makes the reply edit
/// the confirmation message in place.
pub fn api_failure(error: &ApiError, action: &str, edit: bool) -> Reply {
    let reply = match error {
        ApiError::AuthExpired => Reply::text(
            "❌ Your session has expired. Please use /login to authenticate again.",
        ),
        ApiError::Validation(messages) => {
            let mut text = "❌ *Validation Error:*\n\n".to_string();
            for message in messages {
                text += &format!("• {message}\n");
            }
            text += "\nPlease check your input and try again.";
            Reply::markdown(text)
        }
        ApiError::Timeout => Reply::text(format!(
            "⚠️ {action} timed out. Please try again in a moment."
        )),
        ApiError::Remote { message, .. } => {
            Reply::text(format!("❌ {action} failed. {message}"))
        }
        ApiError::Transport(_) | ApiError::Decode(_) => Reply::text(format!(
            "⚠️ {action} failed. Please try again later."
        )),
    };
    if edit {
        reply.as_edit()
    } else {
        reply
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use payout_api::{TokenBalance, TransferPage};

    fn transfer(id: &str) -> Transfer {
        Transfer {
            id: id.to_string(),
            transfer_type: "send".to_string(),
            status: "pending".to_string(),
            amount: 500_000_000.0,
            currency: "USDC".to_string(),
            total_fee: 0.1,
            fee_currency: Some("USDC".to_string()),
            created_at: "2025-03-01T10:30:00+00:00".to_string(),
            source_country: Some("usa".to_string()),
            destination_country: None,
            source_account: None,
            destination_account: None,
            payment_url: None,
            invoice_url: None,
            mode: None,
            purpose_code: None,
            source_of_funds: None,
            recipient_relationship: None,
        }
    }

    #[test]
    fn balances_labels_testnet_network() {
        let reply = balances(&[WalletBalances {
            network: "80002".to_string(),
            balances: vec![TokenBalance {
                balance: "12.5".to_string(),
                symbol: "USDC".to_string(),
            }],
        }]);
        assert!(reply.text.contains("80002 (Testnet) Wallet"));
        assert!(reply.text.contains("USDC: 12.5"));
    }

    #[test]
    fn balances_empty_wallets() {
        let reply = balances(&[WalletBalances {
            network: "137".to_string(),
            balances: vec![],
        }]);
        assert_eq!(reply.text, "💰 Your wallet has no funds.");
    }

    #[test]
    fn transfers_page_scales_amount_and_counts_pages() {
        let page = TransferPage {
            data: vec![transfer("t-1")],
            count: 25,
            has_more: true,
        };
        let reply = transfers_page(&page, 1, 10);
        assert!(reply.text.contains("Amount: 5 USDC"));
        assert!(reply.text.contains("From: USA"));
        assert!(reply.text.contains("To: N/A"));
        assert!(reply.text.contains("Date: 2025-03-01 10:30 UTC"));
        assert!(reply.text.contains("📊 Page 1 of 3"));

        // Page 1: no Previous, only Next carrying the current page.
        let row = &reply.keyboard.as_ref().unwrap()[0];
        assert_eq!(row.len(), 1);
        assert_eq!(
            row[0],
            Button::action("Next ➡️", &Action::TransfersNext(1))
        );
    }

    #[test]
    fn transfers_middle_page_has_both_directions() {
        let page = TransferPage {
            data: vec![transfer("t-2")],
            count: 25,
            has_more: true,
        };
        let reply = transfers_page(&page, 2, 10);
        let row = &reply.keyboard.as_ref().unwrap()[0];
        assert_eq!(row.len(), 2);
        assert_eq!(row[0], Button::action("⬅️ Previous", &Action::TransfersPrev(2)));
        assert_eq!(row[1], Button::action("Next ➡️", &Action::TransfersNext(2)));
    }

    #[test]
    fn send_confirmation_shows_token_amount() {
        let req = TransferRequest {
            wallet_address: "0xAB".to_string(),
            amount: "150000000".to_string(),
            purpose_code: "self".to_string(),
            currency: "USDC".to_string(),
        };
        let reply = send_confirmation(&req);
        assert!(reply.text.contains("*Amount:* 1.5 USDC"));
        assert!(reply.text.contains("`0xAB`"));
        let row = &reply.keyboard.as_ref().unwrap()[0];
        assert_eq!(row[0], Button::action("✅ Confirm", &Action::ConfirmSend(true)));
        assert_eq!(row[1], Button::action("❌ Cancel", &Action::ConfirmSend(false)));
    }

    #[test]
    fn validation_errors_are_itemized() {
        let err = ApiError::Validation(vec![
            "amount must be positive".to_string(),
            "walletAddress must be an address".to_string(),
        ]);
        let reply = api_failure(&err, "Transfer", true);
        assert!(reply.text.contains("• amount must be positive"));
        assert!(reply.text.contains("• walletAddress must be an address"));
        assert!(reply.edit);
    }

    #[test]
    fn kyc_without_records_links_portal() {
        let reply = kyc(&KycPage { data: vec![] });
        assert!(reply.text.contains("complete your KYC process"));
        assert_eq!(
            reply.keyboard.as_ref().unwrap()[0][0],
            Button::url("🔗 Complete KYC", KYC_PORTAL_URL)
        );
    }
}
