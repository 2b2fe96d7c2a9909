/// Per-room options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomConfig {
    /// Keep at most this many messages. `None` keeps everything.
    pub history_limit: Option<usize>,
}

/// Server configuration. Built through [`ServerConfig::builder`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: String,
    pub port: u16,
    pub max_users: usize,
    pub motd: Option<String>,
    pub lobby: String,
    pub room: RoomConfig,
}

/// The builder accumulates optional values and produces a config.
pub struct ServerConfigBuilder {
    addr: String,
    port: u16,
    max_users: usize,
    motd: Option<String>,
    lobby: String,
    history_limit: Option<usize>,
}

impl ServerConfig {
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder {
            addr: "127.0.0.1".to_string(),
            port: 8080,
            max_users: 100,
            motd: None,
            lobby: "lobby".to_string(),
            history_limit: None,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.addr, self.port)
    }
}

impl ServerConfigBuilder {
    pub fn addr(mut self, addr: impl Into<String>) -> Self {
        self.addr = addr.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn max_users(mut self, max: usize) -> Self {
        self.max_users = max;
        self
    }

    pub fn motd(mut self, motd: impl Into<String>) -> Self {
        self.motd = Some(motd.into());
        self
    }

    pub fn lobby(mut self, name: impl Into<String>) -> Self {
        self.lobby = name.into();
        self
    }

    pub fn history_limit(mut self, limit: Option<usize>) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn build(self) -> ServerConfig {
        ServerConfig {
            addr: self.addr,
            port: self.port,
            max_users: self.max_users,
            motd: self.motd,
            lobby: self.lobby,
            room: RoomConfig {
                history_limit: self.history_limit,
            },
        }
    }
}
