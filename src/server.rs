use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{info, warn};

use crate::client::Client;
use crate::command::{Command, HELP};
use crate::config::ServerConfig;
use crate::error::ChatError;
use crate::message::Message;
use crate::room::Room;
use crate::types::UserId;
use crate::user::User;

/// Directory of rooms by name plus connection bookkeeping.
///
/// The lobby always exists. Any other room is created on first join and
/// dropped once its last member leaves.
pub struct Server {
    config: ServerConfig,
    rooms: Mutex<HashMap<String, Arc<Room>>>,
    online: AtomicUsize,
    next_user_id: AtomicU64,
}

impl Server {
    pub fn new(config: ServerConfig) -> Self {
        let lobby = Arc::new(Room::with_config(config.lobby.clone(), &config.room));
        let rooms = HashMap::from([(config.lobby.clone(), lobby)]);
        Self {
            config,
            rooms: Mutex::new(rooms),
            online: AtomicUsize::new(0),
            next_user_id: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    // Never held across an await.
    fn rooms(&self) -> MutexGuard<'_, HashMap<String, Arc<Room>>> {
        self.rooms.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn room(&self, name: &str) -> Option<Arc<Room>> {
        self.rooms().get(name).cloned()
    }

    /// Room names with member counts, sorted by name.
    pub fn room_list(&self) -> Vec<(String, usize)> {
        let mut list: Vec<_> = self
            .rooms()
            .iter()
            .map(|(name, room)| (name.clone(), room.number_of_clients()))
            .collect();
        list.sort();
        list
    }

    fn register(&self) -> Option<UserId> {
        let admitted = self
            .online
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                (n < self.config.max_users).then_some(n + 1)
            })
            .is_ok();
        admitted.then(|| UserId::new(self.next_user_id.fetch_add(1, Ordering::Relaxed)))
    }

    fn unregister(&self) {
        self.online.fetch_sub(1, Ordering::SeqCst);
    }

    /// Move `user` from its current room into `name`, creating the room if
    /// needed. Returns `false` if the user is already there.
    ///
    /// Membership and the user's recorded room change under the directory
    /// lock, so a concurrent kick always sees them agree.
    pub fn join(&self, user: &Arc<User>, name: &str) -> bool {
        let mut rooms = self.rooms();
        let from = user.current_room();
        if from == name {
            return false;
        }
        self.depart(&mut rooms, &from, &**user, "left");
        self.enter(&mut rooms, name, user.clone());
        user.set_room(name);
        true
    }

    /// Take `user` out of whatever room it is in.
    pub fn leave(&self, user: &User) {
        let mut rooms = self.rooms();
        let from = user.current_room();
        self.depart(&mut rooms, &from, user, "left");
        user.set_room("");
    }

    /// Remove the first member of `room_name` called `target` and send it
    /// back to the lobby.
    pub fn kick(&self, room_name: &str, target: &str) -> Result<(), ChatError> {
        let mut rooms = self.rooms();
        let room = rooms
            .get(room_name)
            .cloned()
            .ok_or_else(|| ChatError::UnknownRoom(room_name.to_string()))?;
        let client = room.require_client(target)?;

        self.depart(&mut rooms, room_name, client.as_ref(), "was kicked from");

        let lobby = self.config.lobby.as_str();
        self.enter(&mut rooms, lobby, client.clone());
        if let Some(user) = client.as_any().downcast_ref::<User>() {
            user.set_room(lobby);
            user.notify(&format!("* You were kicked from #{room_name}"));
            info!(room = room_name, user = %user.id(), target, "member kicked");
        }
        Ok(())
    }

    fn enter(&self, rooms: &mut HashMap<String, Arc<Room>>, name: &str, client: Arc<dyn Client>) {
        let room = rooms.entry(name.to_string()).or_insert_with(|| {
            info!(room = name, "room created");
            Arc::new(Room::with_config(name, &self.config.room))
        });
        room.tell(format!("{} joined #{name}", client.name()));
        room.add(client);
    }

    fn depart(
        &self,
        rooms: &mut HashMap<String, Arc<Room>>,
        name: &str,
        client: &dyn Client,
        verb: &str,
    ) {
        let Some(room) = rooms.get(name).cloned() else {
            return;
        };

        if room.remove(client) {
            room.tell(format!("{} {verb} #{name}", client.name()));
        }
        if room.is_empty() && name != self.config.lobby {
            rooms.remove(name);
            info!(room = name, "room closed");
        }
    }
}

/// Accept connections forever, one task per client.
pub async fn run(server: Arc<Server>, listener: TcpListener) -> Result<(), ChatError> {
    loop {
        let (stream, peer) = listener.accept().await?;
        let server = Arc::clone(&server);
        tokio::spawn(async move {
            if let Err(e) = handle_client(server, stream).await {
                warn!(%peer, error = %e, "client error");
            }
        });
    }
}

/// Handle a single client as a tokio task.
pub async fn handle_client(server: Arc<Server>, stream: TcpStream) -> Result<(), ChatError> {
    let peer = stream.peer_addr()?;
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);

    writer.write_all(b"Enter your username:\n").await?;

    let mut username = String::new();
    reader.read_line(&mut username).await?;
    let username = username.trim().to_string();
    if username.is_empty() {
        return Ok(());
    }

    let Some(user_id) = server.register() else {
        writer.write_all(b"* Server is full\n").await?;
        return Ok(());
    };

    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let user = Arc::new(User::new(user_id, username, tx));
    let lobby = server.config().lobby.clone();
    server.join(&user, &lobby);

    info!(user = %user_id, name = user.name(), %peer, "connected");

    if let Some(motd) = &server.config().motd {
        user.notify(motd);
    }
    user.notify(&format!("Welcome, {}! You're in #{lobby}.", user.name()));
    user.notify("Type a message or /help for commands.");

    // Writer task: drains the user's queue onto the socket.
    let mut writer_task = tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            if writer.write_all(format!("{line}\n").as_bytes()).await.is_err() {
                break;
            }
        }
    });

    let result = read_loop(&server, &user, &mut reader).await;

    info!(user = %user_id, name = user.name(), "disconnected");
    server.leave(&user);
    server.unregister();

    // Once the rooms let go of the user the queue closes and the writer
    // finishes on its own.
    drop(user);
    if timeout(Duration::from_secs(1), &mut writer_task).await.is_err() {
        writer_task.abort();
    }

    result
}

async fn read_loop<R>(server: &Server, user: &Arc<User>, reader: &mut R) -> Result<(), ChatError>
where
    R: AsyncBufReadExt + Unpin,
{
    let mut line = String::new();

    loop {
        line.clear();
        let bytes = reader.read_line(&mut line).await?;
        if bytes == 0 {
            return Ok(()); // client disconnected
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let current = user.current_room();

        if !trimmed.starts_with('/') {
            match server.room(&current) {
                Some(room) => room.send(Message::chat(user.name(), trimmed)),
                None => user.notify("* You are not in a room. Try /join <room>"),
            }
            continue;
        }

        let cmd = match Command::parse(trimmed) {
            Ok(cmd) => cmd,
            Err(e) => {
                user.notify(&format!("ERROR: {e}"));
                continue;
            }
        };

        match cmd {
            Command::Join { room } => {
                if server.join(user, &room) {
                    user.notify(&format!("* You joined #{room}"));
                } else {
                    user.notify(&format!("* You are already in #{room}"));
                }
            }
            Command::Who => {
                let names = server.room(&current).map(|r| r.who()).unwrap_or_default();
                user.notify(&format!("* In #{current}: {}", names.join(", ")));
            }
            Command::History => {
                if let Some(room) = server.room(&current) {
                    for entry in room.get_messages() {
                        user.notify(&entry);
                    }
                }
            }
            Command::List => {
                let rooms: Vec<String> = server
                    .room_list()
                    .into_iter()
                    .map(|(name, count)| format!("{name} ({count})"))
                    .collect();
                user.notify(&format!("* Rooms: {}", rooms.join(", ")));
            }
            Command::Kick { target } => {
                if current == server.config().lobby {
                    user.notify(&format!("* Cannot kick from #{current}"));
                } else if let Err(e) = server.kick(&current, &target) {
                    user.notify(&format!("ERROR: {e}"));
                }
            }
            Command::Help => user.notify(HELP),
            Command::Quit => {
                user.notify("* Goodbye!");
                return Ok(());
            }
        }
    }
}
