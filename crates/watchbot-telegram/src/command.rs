//! Bot command parsing.

/// Commands the bot answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotCommand {
    /// On-demand status snapshot.
    Status,
    /// System info from the backend API.
    Info,
    /// Echo the caller's chat id.
    ChatId,
}

impl BotCommand {
    /// Parse the first word of a message. Accepts an optional `@botname`
    /// suffix and ignores trailing arguments. Anything else is `None`.
    pub fn parse(text: &str) -> Option<Self> {
        let word = text.split_whitespace().next()?;
        let name = word.strip_prefix('/')?;
        let name = name.split_once('@').map_or(name, |(cmd, _bot)| cmd);

        match name.to_ascii_lowercase().as_str() {
            "status" => Some(Self::Status),
            "info" => Some(Self::Info),
            "chatid" => Some(Self::ChatId),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Info => "info",
            Self::ChatId => "chatid",
        }
    }
}
