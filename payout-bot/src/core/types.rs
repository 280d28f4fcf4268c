//! Core types: inbound events (commands, free text, callback actions) and
//! outbound content (replies, inline keyboards, engine output).

/// Splits `/cmd@bot args` into command name and args. Returns `None` for
/// non-command text.
pub fn parse_command(text: &str) -> Option<(&str, &str)> {
    if !text.starts_with('/') {
        return None;
    }

    let text = text.trim();
    let mut parts = text.splitn(2, |c: char| c.is_whitespace());
    let cmd = parts.next()?.trim_start_matches('/');
    let args = parts.next().unwrap_or("").trim();

    // Remove @botname suffix if present
    let cmd = cmd.split('@').next()?;

    Some((cmd, args))
}

/// Slash commands the bot understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Login,
    Logout,
    Balance,
    Wallets,
    Transfers,
    Send,
    Withdraw,
    SendBatch,
    Profile,
    KycStatus,
}

impl Command {
    /// Parses message text into a command, if it is one.
    pub fn parse(text: &str) -> Option<Command> {
        let (cmd, _args) = parse_command(text)?;
        match cmd {
            "start" => Some(Command::Start),
            "login" => Some(Command::Login),
            "logout" => Some(Command::Logout),
            "balance" => Some(Command::Balance),
            "wallets" => Some(Command::Wallets),
            "transfers" => Some(Command::Transfers),
            "send" => Some(Command::Send),
            "walletwithdraw" => Some(Command::Withdraw),
            "sendbatch" => Some(Command::SendBatch),
            "profile" => Some(Command::Profile),
            "kycstatus" => Some(Command::KycStatus),
            _ => None,
        }
    }

    /// Callback-data slug for the menu shortcut of this command.
    pub fn menu_slug(&self) -> &'static str {
        match self {
            Command::Start => "menu_start",
            Command::Login => "menu_login",
            Command::Logout => "menu_logout",
            Command::Balance => "menu_balance",
            Command::Wallets => "menu_wallets",
            Command::Transfers => "menu_transfers",
            Command::Send => "menu_send",
            Command::Withdraw => "menu_withdraw",
            Command::SendBatch => "menu_batch",
            Command::Profile => "menu_profile",
            Command::KycStatus => "menu_kyc",
        }
    }

    fn from_menu_slug(slug: &str) -> Option<Command> {
        match slug {
            "menu_start" => Some(Command::Start),
            "menu_login" => Some(Command::Login),
            "menu_logout" => Some(Command::Logout),
            "menu_balance" => Some(Command::Balance),
            "menu_wallets" => Some(Command::Wallets),
            "menu_transfers" => Some(Command::Transfers),
            "menu_send" => Some(Command::Send),
            "menu_withdraw" => Some(Command::Withdraw),
            "menu_batch" => Some(Command::SendBatch),
            "menu_profile" => Some(Command::Profile),
            "menu_kyc" => Some(Command::KycStatus),
            _ => None,
        }
    }
}

/// Button-press actions. Pagination actions carry the page the pressed
/// message was showing, so no state or rendered text is consulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SetDefaultWallet(String),
    TransfersPrev(u32),
    TransfersNext(u32),
    ConfirmSend(bool),
    ConfirmWithdraw(bool),
    ConfirmBatch(bool),
    Cancel,
    Menu(Command),
}

impl Action {
    /// Parses callback data into an action.
    pub fn parse(data: &str) -> Option<Action> {
        match data {
            "cancel_operation" => return Some(Action::Cancel),
            "confirm_transfer_yes" => return Some(Action::ConfirmSend(true)),
            "confirm_transfer_no" => return Some(Action::ConfirmSend(false)),
            "confirm_withdraw_yes" => return Some(Action::ConfirmWithdraw(true)),
            "confirm_withdraw_no" => return Some(Action::ConfirmWithdraw(false)),
            "confirm_batch_yes" => return Some(Action::ConfirmBatch(true)),
            "confirm_batch_no" => return Some(Action::ConfirmBatch(false)),
            _ => {}
        }
        if let Some(id) = data.strip_prefix("set_default_") {
            return Some(Action::SetDefaultWallet(id.to_string()));
        }
        if let Some(page) = data.strip_prefix("transfers_prev_") {
            return page.parse().ok().map(Action::TransfersPrev);
        }
        if let Some(page) = data.strip_prefix("transfers_next_") {
            return page.parse().ok().map(Action::TransfersNext);
        }
        Command::from_menu_slug(data).map(Action::Menu)
    }

    /// Callback data for this action; inverse of [`Action::parse`].
    pub fn data(&self) -> String {
        match self {
            Action::SetDefaultWallet(id) => format!("set_default_{id}"),
            Action::TransfersPrev(page) => format!("transfers_prev_{page}"),
            Action::TransfersNext(page) => format!("transfers_next_{page}"),
            Action::ConfirmSend(true) => "confirm_transfer_yes".to_string(),
            Action::ConfirmSend(false) => "confirm_transfer_no".to_string(),
            Action::ConfirmWithdraw(true) => "confirm_withdraw_yes".to_string(),
            Action::ConfirmWithdraw(false) => "confirm_withdraw_no".to_string(),
            Action::ConfirmBatch(true) => "confirm_batch_yes".to_string(),
            Action::ConfirmBatch(false) => "confirm_batch_no".to_string(),
            Action::Cancel => "cancel_operation".to_string(),
            Action::Menu(cmd) => cmd.menu_slug().to_string(),
        }
    }
}

/// One inbound event from the chat transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Command(Command),
    Text(String),
    Action(Action),
}

/// An inline keyboard button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Button {
    Callback { label: String, data: String },
    Url { label: String, url: String },
}

impl Button {
    pub fn callback(label: impl Into<String>, data: impl Into<String>) -> Self {
        Button::Callback {
            label: label.into(),
            data: data.into(),
        }
    }

    pub fn action(label: impl Into<String>, action: &Action) -> Self {
        Button::callback(label, action.data())
    }

    pub fn url(label: impl Into<String>, url: impl Into<String>) -> Self {
        Button::Url {
            label: label.into(),
            url: url.into(),
        }
    }
}

/// Rows of inline keyboard buttons.
pub type Keyboard = Vec<Vec<Button>>;

/// One outbound message. `edit` asks the dispatcher to edit the message the
/// triggering button was attached to instead of sending a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Option<Keyboard>,
    pub edit: bool,
    pub markdown: bool,
}

impl Reply {
    /// Plain-text reply.
    pub fn text(text: impl Into<String>) -> Self {
        Reply {
            text: text.into(),
            keyboard: None,
            edit: false,
            markdown: false,
        }
    }

    /// Markdown-formatted reply.
    pub fn markdown(text: impl Into<String>) -> Self {
        Reply {
            markdown: true,
            ..Reply::text(text)
        }
    }

    pub fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }

    pub fn as_edit(mut self) -> Self {
        self.edit = true;
        self
    }
}

/// Everything the engine produced for one inbound event: an optional
/// callback acknowledgement toast plus zero or more replies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineOutput {
    pub ack: Option<String>,
    pub replies: Vec<Reply>,
}

impl EngineOutput {
    /// No output at all (e.g. free text with no active flow).
    pub fn none() -> Self {
        Self::default()
    }

    pub fn reply(reply: Reply) -> Self {
        EngineOutput {
            ack: None,
            replies: vec![reply],
        }
    }

    pub fn replies(replies: Vec<Reply>) -> Self {
        EngineOutput { ack: None, replies }
    }

    pub fn ack(text: impl Into<String>) -> Self {
        EngineOutput {
            ack: Some(text.into()),
            replies: Vec::new(),
        }
    }

    pub fn with_ack(mut self, text: impl Into<String>) -> Self {
        self.ack = Some(text.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.ack.is_none() && self.replies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("/balance"), Some(("balance", "")));
        assert_eq!(parse_command("/send@mybot"), Some(("send", "")));
        assert_eq!(parse_command("/login extra args"), Some(("login", "extra args")));
        assert_eq!(parse_command("hello"), None);
        assert_eq!(parse_command(""), None);
    }

    #[test]
    fn test_command_parse() {
        assert_eq!(Command::parse("/start"), Some(Command::Start));
        assert_eq!(Command::parse("/walletwithdraw"), Some(Command::Withdraw));
        assert_eq!(Command::parse("/sendbatch"), Some(Command::SendBatch));
        assert_eq!(Command::parse("/kycstatus"), Some(Command::KycStatus));
        assert_eq!(Command::parse("/unknown"), None);
        assert_eq!(Command::parse("plain text"), None);
    }

    #[test]
    fn test_action_parse_roundtrip() {
        let actions = [
            Action::SetDefaultWallet("w-1".to_string()),
            Action::TransfersPrev(2),
            Action::TransfersNext(2),
            Action::ConfirmSend(true),
            Action::ConfirmSend(false),
            Action::ConfirmWithdraw(true),
            Action::ConfirmBatch(false),
            Action::Cancel,
            Action::Menu(Command::Balance),
            Action::Menu(Command::KycStatus),
        ];
        for action in actions {
            assert_eq!(Action::parse(&action.data()), Some(action.clone()));
        }
    }

    #[test]
    fn test_action_parse_rejects_garbage() {
        assert_eq!(Action::parse("transfers_next_"), None);
        assert_eq!(Action::parse("transfers_next_abc"), None);
        assert_eq!(Action::parse("noop"), None);
        assert_eq!(Action::parse(""), None);
    }
}
