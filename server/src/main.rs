use arena_server::config::ServerConfig;
use arena_server::map::MeshMap;
use arena_server::network::Server;
use arena_shared::Loadout;
use clap::Parser;
use log::{error, info};
use std::time::Duration;

/// Height of the arena floor. Players spawn just above it so they touch it.
const ARENA_FLOOR_Z: f32 = 0.2;
const ARENA_WALL_HEIGHT: f32 = 2.0;

#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Server IP address to bind to
    #[clap(short = 'H', long, default_value = "127.0.0.1")]
    host: String,
    /// Server port to listen on
    #[clap(short, long, default_value = "7777")]
    port: u16,
    /// Simulation step in milliseconds
    #[clap(short, long, default_value = "10")]
    tick_ms: u64,
    /// Match length in seconds
    #[clap(short, long, default_value = "180")]
    match_secs: u64,
    /// Input events buffered per tick before new ones are dropped
    #[clap(long, default_value = "200")]
    input_capacity: usize,
    /// Half the side length of the arena
    #[clap(long, default_value = "5.0")]
    map_size: f32,
    /// Floor cells per arena side
    #[clap(long, default_value = "20")]
    map_cells: u32,
    /// Comma-separated loadout ids for players 0, 1, 2, ...
    #[clap(short, long, value_delimiter = ',')]
    loadouts: Vec<Loadout>,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        ServerConfig {
            bind_addr: format!("{}:{}", args.host, args.port),
            tick: Duration::from_millis(args.tick_ms.max(1)),
            match_duration: Duration::from_secs(args.match_secs),
            input_capacity: args.input_capacity,
            arena_half_extent: args.map_size,
            arena_cells: args.map_cells,
            loadouts: args.loadouts,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from(Args::parse());
    let map = MeshMap::arena(
        config.arena_half_extent,
        config.arena_cells,
        ARENA_FLOOR_Z,
        ARENA_WALL_HEIGHT,
    );

    let server = Server::bind(config, map).await?;
    info!("Server is up");

    let stop = server.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, shutting down");
            stop.stop();
        }
    });

    match server.run().await {
        Ok(report) => {
            info!("Match finished after {} ticks", report.ticks);
            Ok(())
        }
        Err(e) => {
            error!("Fatal server error: {}", e);
            std::process::exit(1);
        }
    }
}
