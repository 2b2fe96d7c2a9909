use std::sync::Arc;

use chat_room::ServerConfig;
use chat_room::error::ChatError;
use chat_room::server::{self, Server};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

/// Line-based chat server.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    #[arg(long, default_value = "127.0.0.1")]
    addr: String,

    #[arg(long, default_value_t = 8080)]
    port: u16,

    #[arg(long, default_value_t = 100)]
    max_users: usize,

    /// Message of the day shown to every new connection.
    #[arg(long)]
    motd: Option<String>,

    #[arg(long, default_value = "lobby")]
    lobby: String,

    /// Messages kept per room; unbounded when omitted.
    #[arg(long)]
    history_limit: Option<usize>,
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}

#[tokio::main]
async fn main() -> Result<(), ChatError> {
    init_tracing();

    let cli = Cli::parse();
    let mut builder = ServerConfig::builder()
        .addr(cli.addr)
        .port(cli.port)
        .max_users(cli.max_users)
        .lobby(cli.lobby)
        .history_limit(cli.history_limit);
    if let Some(motd) = cli.motd {
        builder = builder.motd(motd);
    }
    let config = builder.build();

    let listener = TcpListener::bind(config.bind_addr()).await?;
    info!("chat server listening on {}", listener.local_addr()?);

    server::run(Arc::new(Server::new(config)), listener).await
}
