//! Bot client that plays a match with random input, for exercising a running
//! server by hand.

use arena_shared::{InputEvent, Packet, PlayerId};
use bincode::{deserialize, serialize};
use clap::Parser;
use log::{info, warn};
use rand::Rng;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::{interval, Instant};

#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Server address to send input to
    #[clap(short, long, default_value = "127.0.0.1:7777")]
    server: SocketAddr,
    /// Player slot to play as
    #[clap(short = 'i', long, default_value = "0")]
    player_id: PlayerId,
    /// Inputs sent per second
    #[clap(short, long, default_value = "30")]
    rate: u32,
    /// Seconds to play before exiting
    #[clap(short, long, default_value = "10")]
    duration: u64,
}

fn random_input(player_id: PlayerId, rng: &mut impl Rng) -> InputEvent {
    InputEvent {
        player_id,
        up: rng.gen_bool(0.3),
        down: rng.gen_bool(0.3),
        left: rng.gen_bool(0.3),
        right: rng.gen_bool(0.3),
        shooting: rng.gen_bool(0.1),
        aim_angle: rng.gen_range(-180.0..180.0),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let socket = UdpSocket::bind("0.0.0.0:0").await?;
    info!(
        "Bot for player {} bound to {}, playing against {}",
        args.player_id,
        socket.local_addr()?,
        args.server
    );

    let mut rng = rand::thread_rng();
    let mut send_timer = interval(Duration::from_secs_f32(1.0 / args.rate.max(1) as f32));
    let deadline = Instant::now() + Duration::from_secs(args.duration);
    let mut buf = vec![0u8; 65536];
    let mut received = 0u64;

    while Instant::now() < deadline {
        tokio::select! {
            _ = send_timer.tick() => {
                let packet = Packet::Input(random_input(args.player_id, &mut rng));
                socket.send_to(&serialize(&packet)?, args.server).await?;
            }
            result = socket.recv_from(&mut buf) => {
                let (len, _) = result?;
                match deserialize::<Packet>(&buf[..len]) {
                    Ok(Packet::Snapshot(snapshot)) => {
                        received += 1;
                        let me = snapshot.players.get(usize::from(args.player_id));
                        if let (Some(me), 1) = (me, received % 100) {
                            info!(
                                "Tick {} [{}]: at {:?}, {} projectiles, {} paint points",
                                snapshot.tick,
                                snapshot.timer,
                                me.position,
                                snapshot.projectiles.len(),
                                snapshot.paint_points.len()
                            );
                        }
                    }
                    Ok(other) => warn!("Unexpected packet: {:?}", other),
                    Err(e) => warn!("Failed to deserialize snapshot: {}", e),
                }
            }
        }
    }

    info!("Bot finished, {} snapshots received", received);
    Ok(())
}
