//! A named broadcast room for a line-based chat server.
//!
//! [`Room`] keeps an ordered, lock-guarded membership list and a message
//! history. Anything implementing [`Client`] can be a member, including
//! another room. The [`server`] module is a small TCP host built on top.

pub mod client;
pub mod command;
pub mod config;
pub mod error;
pub mod history;
pub mod message;
pub mod registry;
pub mod room;
pub mod server;
pub mod types;
pub mod user;

pub use client::Client;
pub use config::{RoomConfig, ServerConfig};
pub use error::ChatError;
pub use message::Message;
pub use room::Room;
