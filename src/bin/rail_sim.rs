//! Track simulator for railcart.
//!
//! Builds a small preset layout in a [`MockLevel`], runs one cart over it and
//! prints its state every tick. Useful for comparing the two movement models
//! side by side.
//!
//! # Usage
//!
//! ```bash
//! cargo run --features cli --bin rail_sim -- --preset slope --mode continuous --ticks 30
//! RUST_LOG=railcart=trace cargo run --features cli --bin rail_sim -- --preset valley
//! ```

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use glam::{DVec3, IVec3};
use log::info;
use railcart::track::{RailBlock, RailShape};
use railcart::{CartKind, Config, EntityId, Minecart, MockLevel, MovementMode, Passenger};

/// Upper bound on simulated ticks.
const MAX_TICKS: u32 = 100_000;

#[derive(Parser)]
#[command(name = "rail_sim", about = "Run a minecart over a preset track layout")]
struct Cli {
    /// Track layout to build
    #[arg(long, value_enum, default_value_t = Preset::Straight)]
    preset: Preset,
    /// Movement model
    #[arg(long, value_enum, default_value_t = Mode::Continuous)]
    mode: Mode,
    /// Number of ticks to simulate
    #[arg(long, default_value_t = 40)]
    ticks: u32,
    /// Initial speed along +X, blocks per tick
    #[arg(long)]
    speed: Option<f64>,
    /// Seat a rider in the cart (lower friction)
    #[arg(long)]
    occupied: bool,
    /// Also print the render pose halfway between ticks
    #[arg(long)]
    render: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Preset {
    /// Flat east-west line
    Straight,
    /// Flat run into a one-block climb
    Slope,
    /// Stationary cart on powered rails next to a conductor
    Booster,
    /// Two opposing slopes around a flat dip
    Valley,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Legacy,
    Continuous,
}

impl From<Mode> for MovementMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Legacy => MovementMode::Legacy,
            Mode::Continuous => MovementMode::Continuous,
        }
    }
}

fn rail_line(level: &mut MockLevel, xs: std::ops::Range<i32>, y: i32, rail: RailBlock) {
    for x in xs {
        level.set_rail(IVec3::new(x, y, 0), rail);
    }
}

/// Builds the layout and returns the cart start position and default speed.
fn build(preset: Preset, level: &mut MockLevel) -> (DVec3, f64) {
    let flat = RailBlock::plain(RailShape::EastWest);
    match preset {
        Preset::Straight => {
            rail_line(level, -4..64, 0, flat);
            (DVec3::new(0.5, 0.1, 0.5), 0.4)
        }
        Preset::Slope => {
            rail_line(level, -4..4, 0, flat);
            level.set_rail(IVec3::new(4, 0, 0), RailBlock::plain(RailShape::AscendingEast));
            rail_line(level, 5..32, 1, flat);
            (DVec3::new(0.5, 0.1, 0.5), 0.4)
        }
        Preset::Booster => {
            level.set_solid(IVec3::new(-1, 0, 0));
            rail_line(level, 0..4, 0, RailBlock::powered(RailShape::EastWest, true));
            rail_line(level, 4..64, 0, flat);
            (DVec3::new(0.5, 0.1, 0.5), 0.0)
        }
        Preset::Valley => {
            rail_line(level, -4..0, 1, flat);
            level.set_rail(IVec3::new(0, 0, 0), RailBlock::plain(RailShape::AscendingWest));
            level.set_rail(IVec3::new(1, 0, 0), flat);
            level.set_rail(IVec3::new(2, 0, 0), RailBlock::plain(RailShape::AscendingEast));
            rail_line(level, 3..7, 1, flat);
            (DVec3::new(-0.5, 1.1, 0.5), 0.1)
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.ticks == 0 || cli.ticks > MAX_TICKS {
        bail!("--ticks must be between 1 and {MAX_TICKS}, got {}", cli.ticks);
    }

    let mut level = MockLevel::new();
    let (start, default_speed) = build(cli.preset, &mut level);
    let speed = cli.speed.unwrap_or(default_speed);
    if !speed.is_finite() || speed.abs() > 10.0 {
        bail!("--speed must be a finite value within 10 blocks per tick, got {speed}");
    }

    let config = Config::default().with_movement(cli.mode.into());
    let mut cart = Minecart::spawn(EntityId(1), CartKind::Rideable, start, config, &level);
    if cli.occupied {
        cart.body_mut().passenger = Some(Passenger::new(EntityId(2)));
    }
    cart.body_mut().motion.velocity = DVec3::new(speed, 0.0, 0.0);
    info!(
        "simulating {} ticks in {} mode from {:?}",
        cli.ticks,
        cart.mode().as_str(),
        start
    );

    println!("tick        x        y        z       vx       vy       vz    yaw  rail");
    for tick in 1..=cli.ticks {
        level.sync_cart(cart.body());
        cart.tick(&mut level);
        cart.render_tick();

        let body = cart.body();
        let (p, v) = (body.motion.position, body.motion.velocity);
        if !(p.is_finite() && v.is_finite()) {
            return Err(anyhow::anyhow!("non-finite state")).context(format!("tick {tick}"));
        }
        println!(
            "{tick:4} {:8.4} {:8.4} {:8.4} {:8.4} {:8.4} {:8.4} {:6.1}  {}",
            p.x,
            p.y,
            p.z,
            v.x,
            v.y,
            v.z,
            body.motion.yaw,
            if body.motion.on_rails { "on" } else { "off" }
        );
        if cli.render {
            let pose = cart.render_pose(0.5);
            println!(
                "     render {:8.4} {:8.4} {:8.4}",
                pose.position.x, pose.position.y, pose.position.z
            );
        }
    }

    Ok(())
}
