use std::any::Any;
use std::sync::{Mutex, PoisonError};

use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::client::Client;
use crate::message::Message;
use crate::types::UserId;

/// A connected user. Room deliveries are rendered to lines and queued on
/// the connection's writer channel.
pub struct User {
    id: UserId,
    name: String,
    tx: UnboundedSender<String>,
    room: Mutex<String>,
}

impl User {
    pub fn new(id: UserId, name: impl Into<String>, tx: UnboundedSender<String>) -> Self {
        Self {
            id,
            name: name.into(),
            tx,
            room: Mutex::new(String::new()),
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    /// Name of the room this user is currently in.
    pub fn current_room(&self) -> String {
        self.room
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_room(&self, name: impl Into<String>) {
        *self.room.lock().unwrap_or_else(PoisonError::into_inner) = name.into();
    }

    /// Send a line to this user only.
    pub fn notify(&self, text: &str) {
        // Best-effort: if the writer is gone, so is the connection.
        let _ = self.tx.send(text.to_string());
    }
}

impl Client for User {
    fn equals(&self, other: &dyn Client) -> bool {
        other
            .as_any()
            .downcast_ref::<User>()
            .is_some_and(|user| user.id == self.id)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn receive(&self, message: &Message) {
        let _ = self.tx.send(message.to_string());
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for User {
    fn drop(&mut self) {
        debug!(user = %self.id, name = %self.name, "user dropped");
    }
}
