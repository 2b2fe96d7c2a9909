#![allow(dead_code)]

use std::any::Any;
use std::sync::{Arc, Mutex};

use chat_room::{Client, Message};

/// Test member: equal by `id`, records what it receives, and optionally
/// appends its name to a shared delivery log.
pub struct Probe {
    pub id: u32,
    pub name: String,
    inbox: Mutex<Vec<String>>,
    log: Option<Arc<Mutex<Vec<String>>>>,
}

impl Probe {
    pub fn new(id: u32, name: &str) -> Arc<Self> {
        Arc::new(Self {
            id,
            name: name.to_string(),
            inbox: Mutex::new(Vec::new()),
            log: None,
        })
    }

    pub fn logging(id: u32, name: &str, log: &Arc<Mutex<Vec<String>>>) -> Arc<Self> {
        Arc::new(Self {
            id,
            name: name.to_string(),
            inbox: Mutex::new(Vec::new()),
            log: Some(Arc::clone(log)),
        })
    }

    pub fn inbox(&self) -> Vec<String> {
        self.inbox.lock().unwrap().clone()
    }
}

impl Client for Probe {
    fn equals(&self, other: &dyn Client) -> bool {
        other
            .as_any()
            .downcast_ref::<Probe>()
            .is_some_and(|o| o.id == self.id)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn receive(&self, message: &Message) {
        self.inbox.lock().unwrap().push(message.to_string());
        if let Some(log) = &self.log {
            log.lock().unwrap().push(self.name.clone());
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
