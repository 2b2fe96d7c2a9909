use std::any::Any;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::client::Client;
use crate::config::RoomConfig;
use crate::error::ChatError;
use crate::history::History;
use crate::message::Message;
use crate::registry::ClientList;

/// A named broadcast group.
///
/// Membership and history are locked independently; there is no room-wide
/// lock. A member removed while a broadcast is in flight may or may not
/// see that message, depending on when the broadcast took its snapshot.
pub struct Room {
    name: String,
    members: ClientList,
    history: History,
}

impl Room {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, &RoomConfig::default())
    }

    pub fn with_config(name: impl Into<String>, config: &RoomConfig) -> Self {
        Self {
            name: name.into(),
            members: ClientList::new(),
            history: History::with_limit(config.history_limit),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append `client` to the membership. Duplicates are kept.
    ///
    /// Do not add a room to itself, directly or through other rooms: a
    /// broadcast would then recurse without end.
    pub fn add(&self, client: Arc<dyn Client>) {
        debug!(room = %self.name, client = client.name(), "member added");
        self.members.add(client);
    }

    /// Remove every member equal to `client`. `false` if none matched.
    pub fn remove(&self, client: &dyn Client) -> bool {
        let found = self.members.remove(client);
        debug!(room = %self.name, client = client.name(), found, "member removed");
        found
    }

    /// Sorted member names.
    pub fn who(&self) -> Vec<String> {
        self.members.who()
    }

    pub fn present(&self, name: &str) -> bool {
        self.members.present(name)
    }

    pub fn get_client(&self, name: &str) -> Option<Arc<dyn Client>> {
        self.members.get_client(name)
    }

    /// Like [`Room::get_client`], for callers that want to use `?`.
    pub fn require_client(&self, name: &str) -> Result<Arc<dyn Client>, ChatError> {
        self.get_client(name)
            .ok_or_else(|| ChatError::UnknownUser(name.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn number_of_clients(&self) -> usize {
        self.members.len()
    }

    /// Broadcast `text` as a system message.
    pub fn tell(&self, text: impl Into<String>) {
        self.send(Message::system(text));
    }

    /// Deliver `message` to every current member, in insertion order, then
    /// record it in history.
    ///
    /// Delivery runs on the caller's thread over a snapshot of the member
    /// list, so members may join or leave the room from inside `receive`.
    /// A member that blocks or panics in `receive` stalls or aborts the
    /// rest of the fan-out; isolating members is the client's job.
    pub fn send(&self, message: Message) {
        let members = self.members.snapshot();
        trace!(room = %self.name, recipients = members.len(), "broadcast");
        for member in &members {
            member.receive(&message);
        }
        self.history.append(message);
    }

    /// History in display form, oldest first.
    pub fn get_messages(&self) -> Vec<String> {
        self.history.snapshot()
    }
}

impl Client for Room {
    /// Rooms are equal when their names match. Never equal to a non-room.
    fn equals(&self, other: &dyn Client) -> bool {
        other
            .as_any()
            .downcast_ref::<Room>()
            .is_some_and(|room| room.name == self.name)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn receive(&self, message: &Message) {
        self.send(message.clone());
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Debug for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Room")
            .field("name", &self.name)
            .field("members", &self.members.len())
            .field("history", &self.history.len())
            .finish()
    }
}
