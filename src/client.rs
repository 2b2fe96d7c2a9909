use std::any::Any;

use crate::message::Message;

/// Anything that can sit in a room's membership list.
///
/// Rooms hand out and store members as `Arc<dyn Client>`, so every
/// implementation must be shareable across the tasks that drive a room.
/// `Room` implements this trait too, which lets one room be a member of
/// another.
pub trait Client: Send + Sync {
    /// Structural equality. Used by `Room::remove`; semantics belong to the
    /// implementation (by id, by name, by connection).
    fn equals(&self, other: &dyn Client) -> bool;

    /// Display and lookup name. Not required to be unique.
    fn name(&self) -> &str;

    /// Deliver one message. Called synchronously from the broadcasting
    /// thread, so a blocking implementation holds up the whole fan-out.
    fn receive(&self, message: &Message);

    /// Concrete-type access for `equals` implementations.
    fn as_any(&self) -> &dyn Any;
}
