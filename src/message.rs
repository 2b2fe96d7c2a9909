use std::fmt;

/// A message travelling through a room.
///
/// Display format: `<username> message body here` for chat, `* text` for
/// system messages. The display form is what room history records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Chat { username: String, body: String },
    System(String),
}

impl Message {
    pub fn chat(username: impl Into<String>, body: impl Into<String>) -> Self {
        Message::Chat {
            username: username.into(),
            body: body.into(),
        }
    }

    /// A server-originated utterance.
    pub fn system(text: impl Into<String>) -> Self {
        Message::System(text.into())
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Chat { username, body } => write!(f, "<{username}> {body}"),
            Message::System(text) => write!(f, "* {text}"),
        }
    }
}
