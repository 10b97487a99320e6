//! Built-in motion strategies and the wrapper that picks one per cart.
//!
//! [`MotionStrategy`] has generic methods, so it is not object safe. Carts
//! hold an [`AnyMotion`] instead, which forwards every call to the strategy
//! chosen from the configured [`MovementMode`].
//!
//! ```rust
//! use railcart::config::MovementMode;
//! use railcart::motion::AnyMotion;
//! use railcart::traits::MotionStrategy;
//!
//! let motion = AnyMotion::for_mode(MovementMode::Legacy);
//! assert_eq!(motion.mode(), MovementMode::Legacy);
//! ```

pub mod continuous;
pub mod legacy;

pub use continuous::ContinuousMotion;
pub use legacy::LegacyMotion;

use crate::config::{Config, MovementMode};
use crate::interpolation::RenderPose;
use crate::minecart::CartBody;
use crate::traits::{Level, MotionStrategy, RailLookup};

/// Either built-in strategy.
#[derive(Clone, Debug)]
pub enum AnyMotion {
    /// Single chord projection per tick.
    Legacy(LegacyMotion),
    /// Multi-pass track iteration.
    Continuous(ContinuousMotion),
}

impl AnyMotion {
    /// Fresh strategy for `mode`.
    pub fn for_mode(mode: MovementMode) -> Self {
        match mode {
            MovementMode::Legacy => AnyMotion::Legacy(LegacyMotion::new()),
            MovementMode::Continuous => AnyMotion::Continuous(ContinuousMotion::new()),
        }
    }
}

impl MotionStrategy for AnyMotion {
    fn mode(&self) -> MovementMode {
        match self {
            AnyMotion::Legacy(m) => m.mode(),
            AnyMotion::Continuous(m) => m.mode(),
        }
    }

    fn on_spawn<W: RailLookup + ?Sized>(&mut self, body: &mut CartBody, level: &W) {
        match self {
            AnyMotion::Legacy(m) => m.on_spawn(body, level),
            AnyMotion::Continuous(m) => m.on_spawn(body, level),
        }
    }

    fn tick<L: Level + ?Sized>(&mut self, body: &mut CartBody, config: &Config, level: &mut L) {
        match self {
            AnyMotion::Legacy(m) => m.tick(body, config, level),
            AnyMotion::Continuous(m) => m.tick(body, config, level),
        }
    }

    fn max_speed(&self, body: &CartBody, config: &Config) -> f64 {
        match self {
            AnyMotion::Legacy(m) => m.max_speed(body, config),
            AnyMotion::Continuous(m) => m.max_speed(body, config),
        }
    }

    fn slowdown_factor(&self, body: &CartBody, config: &Config) -> f64 {
        match self {
            AnyMotion::Legacy(m) => m.slowdown_factor(body, config),
            AnyMotion::Continuous(m) => m.slowdown_factor(body, config),
        }
    }

    fn render_tick(&mut self, body: &CartBody) {
        match self {
            AnyMotion::Legacy(m) => m.render_tick(body),
            AnyMotion::Continuous(m) => m.render_tick(body),
        }
    }

    fn render_pose(&self, partial: f32) -> Option<RenderPose> {
        match self {
            AnyMotion::Legacy(m) => m.render_pose(partial),
            AnyMotion::Continuous(m) => m.render_pose(partial),
        }
    }
}
