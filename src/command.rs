use crate::error::ChatError;

/// Slash commands a connected user can issue.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Join { room: String },
    Kick { target: String },
    Who,
    History,
    List,
    Quit,
    Help,
}

pub const HELP: &str =
    "Commands: /join <room>, /who, /history, /list, /kick <user>, /quit, /help";

impl Command {
    /// Parse a command from a "/" prefixed line.
    pub fn parse(input: &str) -> Result<Self, ChatError> {
        let input = input.trim();
        let Some(input) = input.strip_prefix('/') else {
            return Err(ChatError::Parse("commands start with /".into()));
        };

        let (cmd, args) = input
            .split_once(' ')
            .map(|(c, a)| (c, a.trim()))
            .unwrap_or((input, ""));

        match cmd {
            "join" => {
                if args.is_empty() {
                    return Err(ChatError::Parse("/join requires a room name".into()));
                }
                Ok(Command::Join {
                    room: args.to_string(),
                })
            }
            "kick" => {
                if args.is_empty() {
                    return Err(ChatError::Parse("/kick requires a username".into()));
                }
                Ok(Command::Kick {
                    target: args.to_string(),
                })
            }
            "who" => Ok(Command::Who),
            "history" => Ok(Command::History),
            "list" => Ok(Command::List),
            "quit" => Ok(Command::Quit),
            "help" => Ok(Command::Help),
            _ => Err(ChatError::Parse(format!("unknown command: /{cmd}"))),
        }
    }
}
