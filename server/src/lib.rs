//! # Paint Arena Match Server
//!
//! Authoritative simulation core for a team paint shooter. Clients send their
//! input over UDP; the server advances the match at a fixed tick rate and sends
//! every connected client the complete game state after each tick.
//!
//! ## Core Responsibilities
//!
//! ### Input Ingestion
//! A listener task polls the socket without blocking and appends each input
//! datagram to a double-buffered queue. The first datagram from a player id
//! brings that player online and fixes the address snapshots are sent to.
//!
//! ### Authoritative Simulation
//! Once per tick the simulation swaps the queue halves, drains the retired one
//! and advances the world: respawn timers, movement against the map mesh,
//! projectile flight and hits, and territory painting on every contact.
//!
//! ### State Broadcasting
//! Every tick ends with a full snapshot sent to every online player. Nothing
//! is acknowledged or resent; a lost snapshot is superseded by the next one.
//!
//! ## Architecture Design
//!
//! ### Two Loops, One Hand-off
//! The listener and the simulation share only the input queue and the player
//! registry. The queue pairs an atomic active-half index with a lock per half,
//! so each event is drained by exactly one tick. The registry sits behind an
//! async read-write lock. Map, players and projectiles belong to the
//! simulation alone.
//!
//! ### Fixed Timestep
//! Wall-clock time accumulates until a full step is available, then exactly
//! one step runs. A slow iteration is worked off over the following ones, one
//! step each, so the tick counter never skips. The match clock counts down in
//! the same loop and ends the match after the step on which it reaches zero.
//!
//! ## Module Organization
//!
//! - `config`: server settings and their defaults
//! - `error`: fatal error type and transient error classification
//! - `input_queue`: double-buffered input hand-off
//! - `registry`: online players and their return addresses
//! - `scheduler`: fixed-timestep accumulator and match clock
//! - `map`: the map geometry boundary and an in-memory triangle mesh
//! - `player`: per-player movement, damage and respawn
//! - `projectile`: projectile launch, flight and the bounded arena
//! - `game`: the world that ties players, projectiles and map into one step
//! - `network`: socket listener, simulation loop and broadcast
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use arena_server::config::ServerConfig;
//! use arena_server::map::MeshMap;
//! use arena_server::network::Server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::default();
//!     let map = MeshMap::arena(5.0, 20, 0.2, 2.0);
//!
//!     let server = Server::bind(config, map).await?;
//!     let report = server.run().await?;
//!     println!("Green {:.2} / Pink {:.2}", report.scores.green, report.scores.pink);
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod game;
pub mod input_queue;
pub mod map;
pub mod network;
pub mod player;
pub mod projectile;
pub mod registry;
pub mod scheduler;
