//! Input line parsing

use std::path::PathBuf;

/// The two screens of the front-end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    /// "Create new configuration"
    CreateConfiguration,
    /// "Start chatting"
    StartChatting,
}

impl Tab {
    /// Tab title
    pub fn title(&self) -> &'static str {
        match self {
            Self::CreateConfiguration => "Create new configuration",
            Self::StartChatting => "Start chatting",
        }
    }
}

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/help`
    Help,
    /// `/tab create|chat`
    Tab(Tab),
    /// `/options`
    Options,
    /// `/create`
    Create,
    /// `/configs`
    Configs,
    /// `/start [name]`
    Start(Option<String>),
    /// `/voice <path>`
    Voice(PathBuf),
    /// `/history`
    History,
    /// `/clear`
    Clear,
    /// `/reset`
    Reset,
    /// `/quit`
    Quit,
    /// Anything not starting with `/`
    Message(String),
    /// Unrecognized or malformed command, with a hint
    Invalid(String),
}

/// Help text listing every command
pub const HELP: &str = "\
Commands:
  /tab create|chat   switch tab (the chat tab refreshes the configuration list)
  /options           show the available configuration options
  /create            fill in and save a new configuration
  /configs           list saved configurations
  /start [name]      begin a conversation (defaults to the first configuration)
  /voice <file>      send a recorded audio clip (voice mode only)
  /history           show the transcript
  /clear             clear the transcript
  /reset             end the conversation and pick another configuration
  /quit              exit
Any other line is sent as a chat message.";

/// Parse a line; `None` for blank input
pub fn parse(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Some(Command::Message(line.to_string()));
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    let command = match name.to_lowercase().as_str() {
        "help" | "h" | "?" => Command::Help,
        "tab" => match arg.to_lowercase().as_str() {
            "create" | "config" | "new" => Command::Tab(Tab::CreateConfiguration),
            "chat" | "start" => Command::Tab(Tab::StartChatting),
            _ => Command::Invalid("usage: /tab create|chat".to_string()),
        },
        "options" => Command::Options,
        "create" | "new" => Command::Create,
        "configs" | "list" => Command::Configs,
        "start" => Command::Start(if arg.is_empty() {
            None
        } else {
            Some(arg.to_string())
        }),
        "voice" => {
            if arg.is_empty() {
                Command::Invalid("usage: /voice <audio file>".to_string())
            } else {
                Command::Voice(PathBuf::from(arg))
            }
        }
        "history" => Command::History,
        "clear" => Command::Clear,
        "reset" => Command::Reset,
        "quit" | "exit" | "q" => Command::Quit,
        other => Command::Invalid(format!("unknown command '/{}', try /help", other)),
    };
    Some(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_message() {
        assert_eq!(
            parse("  hello there "),
            Some(Command::Message("hello there".to_string()))
        );
        assert_eq!(parse("   "), None);
    }

    #[test]
    fn test_commands() {
        assert_eq!(parse("/tab chat"), Some(Command::Tab(Tab::StartChatting)));
        assert_eq!(parse("/TAB Create"), Some(Command::Tab(Tab::CreateConfiguration)));
        assert_eq!(parse("/start"), Some(Command::Start(None)));
        assert_eq!(parse("/start test"), Some(Command::Start(Some("test".to_string()))));
        assert_eq!(
            parse("/voice /tmp/my clip.wav"),
            Some(Command::Voice(PathBuf::from("/tmp/my clip.wav")))
        );
        assert_eq!(parse("/exit"), Some(Command::Quit));
    }

    #[test]
    fn test_invalid_commands() {
        assert!(matches!(parse("/voice"), Some(Command::Invalid(_))));
        assert!(matches!(parse("/tab nowhere"), Some(Command::Invalid(_))));
        assert!(matches!(parse("/dance"), Some(Command::Invalid(_))));
    }
}
