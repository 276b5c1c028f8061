//! Server network layer: the input listener task and the fixed-tick
//! simulation loop that broadcasts a snapshot after every step.

use crate::config::ServerConfig;
use crate::error::{is_transient, ServerError};
use crate::game::World;
use crate::input_queue::InputQueue;
use crate::map::{MapGeometry, PaintScores};
use crate::registry::PlayerRegistry;
use crate::scheduler::{TickOutcome, TickScheduler};
use arena_shared::{Packet, PlayerId, Snapshot, MAX_PLAYERS};
use bincode::{deserialize, serialize};
use log::{debug, error, info, warn};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::UdpSocket;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::sleep;

/// Pause between polls when the socket has nothing to read.
const LISTEN_IDLE: Duration = Duration::from_micros(500);
/// Pause between scheduler polls when no step is due.
const TICK_IDLE: Duration = Duration::from_micros(500);

/// Outcome of a completed match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchReport {
    pub ticks: u64,
    pub scores: PaintScores,
}

/// Ends a running match early from outside the server, e.g. on Ctrl+C.
#[derive(Debug, Clone)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    /// The simulation finishes the tick in progress and returns its report.
    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }
}

/// Match server coordinating input ingestion, simulation and broadcast.
pub struct Server<M> {
    socket: Arc<UdpSocket>,
    registry: Arc<RwLock<PlayerRegistry>>,
    inputs: Arc<InputQueue>,
    /// Tells the listener task to exit. Set whenever `run` returns.
    shutdown: Arc<AtomicBool>,
    /// Early end requested through a [`StopHandle`].
    stop: Arc<AtomicBool>,
    world: World<M>,
    config: ServerConfig,
}

impl<M: MapGeometry> Server<M> {
    pub async fn bind(config: ServerConfig, map: M) -> Result<Self, ServerError> {
        let socket = Arc::new(UdpSocket::bind(&config.bind_addr).await?);
        info!("Server listening on {}", socket.local_addr()?);

        let mut world = World::new(map, config.tick);
        for (player_id, loadout) in (0..MAX_PLAYERS as PlayerId).zip(config.loadouts.iter()) {
            world.set_loadout(player_id, *loadout);
        }

        Ok(Server {
            socket,
            registry: Arc::new(RwLock::new(PlayerRegistry::new())),
            inputs: Arc::new(InputQueue::new(config.input_capacity)),
            shutdown: Arc::new(AtomicBool::new(false)),
            stop: Arc::new(AtomicBool::new(false)),
            world,
            config,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.socket.local_addr()?)
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle(Arc::clone(&self.stop))
    }

    /// Runs the match to completion.
    ///
    /// Returns the final scores once the match clock runs out or a stop is
    /// requested, or the first fatal transport error from either the listener
    /// or the broadcaster.
    pub async fn run(mut self) -> Result<MatchReport, ServerError> {
        let listener = self.spawn_listener();

        let result = tokio::select! {
            joined = listener => match joined {
                Ok(Ok(())) => Err(ServerError::ListenerExited),
                Ok(Err(e)) => Err(e),
                Err(e) => Err(ServerError::Listener(e)),
            },
            report = self.simulate() => report,
        };

        self.shutdown.store(true, Ordering::Release);
        result
    }

    /// Spawns the task that moves datagrams from the socket into the input
    /// queue and records who is online.
    fn spawn_listener(&self) -> JoinHandle<Result<(), ServerError>> {
        let socket = Arc::clone(&self.socket);
        let registry = Arc::clone(&self.registry);
        let inputs = Arc::clone(&self.inputs);
        let shutdown = Arc::clone(&self.shutdown);

        tokio::spawn(async move {
            let mut buffer = [0u8; 2048];

            while !shutdown.load(Ordering::Acquire) {
                let (len, addr) = match socket.try_recv_from(&mut buffer) {
                    Ok(received) => received,
                    Err(e) if is_transient(&e) => {
                        sleep(LISTEN_IDLE).await;
                        continue;
                    }
                    Err(e) => {
                        error!("Unexpected error while receiving input packet: {}", e);
                        return Err(e.into());
                    }
                };

                let input = match deserialize::<Packet>(&buffer[..len]) {
                    Ok(Packet::Input(input)) => input,
                    Ok(_) => {
                        warn!("Unexpected packet type from {}", addr);
                        continue;
                    }
                    Err(_) => {
                        warn!("Failed to deserialize packet from {}", addr);
                        continue;
                    }
                };

                if usize::from(input.player_id) >= MAX_PLAYERS {
                    warn!("Input for unknown player {} from {}", input.player_id, addr);
                    continue;
                }

                // Online before queued, so the tick draining this event sees it.
                let known = registry.read().await.is_online(input.player_id);
                if !known {
                    registry.write().await.mark_online(input.player_id, addr);
                }

                if !inputs.push(input) {
                    warn!(
                        "Input buffer full, dropped input from player {}",
                        input.player_id
                    );
                }
            }

            Ok(())
        })
    }

    async fn simulate(&mut self) -> Result<MatchReport, ServerError> {
        let mut scheduler = TickScheduler::new(self.config.tick, self.config.match_duration);
        let mut last_time = Instant::now();

        loop {
            if self.stop.load(Ordering::Acquire) {
                info!("Stop requested, ending match early");
                return Ok(MatchReport {
                    ticks: scheduler.ticks_completed(),
                    scores: self.world.scores(),
                });
            }

            let now = Instant::now();
            let elapsed = now.duration_since(last_time);
            last_time = now;

            match scheduler.advance(elapsed) {
                TickOutcome::Step { tick, last } => {
                    let tick_start = Instant::now();

                    let drained = self.inputs.swap_and_drain();
                    let online = self.registry.read().await.online_ids();
                    for player_id in online {
                        self.world.connect(player_id);
                    }

                    self.world.step(&drained);
                    self.world.stamp(tick, scheduler.clock());

                    debug!("Tick {} took {:?}", tick, tick_start.elapsed());

                    self.broadcast(self.world.snapshot()).await?;

                    if last {
                        let scores = self.world.scores();
                        info!(
                            "Match over. Green: {:.3} Pink: {:.3} None: {:.3}",
                            scores.green, scores.pink, scores.unpainted
                        );
                        return Ok(MatchReport {
                            ticks: scheduler.ticks_completed(),
                            scores,
                        });
                    }
                }
                TickOutcome::Idle => {}
                TickOutcome::Finished => {
                    return Ok(MatchReport {
                        ticks: scheduler.ticks_completed(),
                        scores: self.world.scores(),
                    });
                }
            }

            sleep(TICK_IDLE).await;
        }
    }

    /// Sends the snapshot to every online player.
    async fn broadcast(&self, snapshot: &Snapshot) -> Result<(), ServerError> {
        let addresses = self.registry.read().await.addresses();
        if addresses.is_empty() {
            return Ok(());
        }

        let data = serialize(&Packet::Snapshot(snapshot.clone()))?;
        send_to_all(&self.socket, &data, &addresses).await
    }
}

/// Sends `data` to each address in turn, waiting for the socket to accept it.
/// Any send failure is fatal.
async fn send_to_all(
    socket: &UdpSocket,
    data: &[u8],
    addresses: &[(PlayerId, SocketAddr)],
) -> Result<(), ServerError> {
    for (player_id, addr) in addresses {
        if let Err(e) = socket.send_to(data, *addr).await {
            error!(
                "Unexpected error while sending snapshot to player {} at {}: {}",
                player_id, addr, e
            );
            return Err(e.into());
        }
    }
    Ok(())
}
