//! The per-tick motion strategy trait.
//!
//! A strategy owns everything that differs between movement algorithms:
//! how a tick advances the cart and how the render side smooths the result.
//! The cart's physical state lives in [`CartBody`] and is handed in on every
//! call, so a strategy never holds a reference to its cart.
//!
//! # Built-in Strategies
//!
//! | Strategy | Track handling | Render smoothing |
//! |----------|----------------|------------------|
//! | [`LegacyMotion`](crate::motion::LegacyMotion) | one chord projection per tick | [`LegacyLerp`](crate::interpolation::LegacyLerp) |
//! | [`ContinuousMotion`](crate::motion::ContinuousMotion) | multi-pass track iteration | [`StepInterpolationQueue`](crate::interpolation::StepInterpolationQueue) |
//!
//! [`AnyMotion`](crate::motion::AnyMotion) picks one from the configured
//! [`MovementMode`] when a cart is built.

use crate::config::{Config, MovementMode};
use crate::interpolation::RenderPose;
use crate::minecart::CartBody;
use crate::speed;
use crate::traits::{Level, RailLookup};

/// Per-tick driver of a cart.
pub trait MotionStrategy {
    /// Which algorithm this is.
    fn mode(&self) -> MovementMode;

    /// Called once when the cart is placed in the world.
    fn on_spawn<W: RailLookup + ?Sized>(&mut self, _body: &mut CartBody, _level: &W) {}

    /// Runs one simulation tick.
    fn tick<L: Level + ?Sized>(&mut self, body: &mut CartBody, config: &Config, level: &mut L);

    /// Top speed in blocks per tick.
    fn max_speed(&self, body: &CartBody, config: &Config) -> f64 {
        speed::max_speed(self.mode(), config, body.in_water)
    }

    /// Friction factor for the cart's current load.
    fn slowdown_factor(&self, body: &CartBody, config: &Config) -> f64 {
        speed::friction_factor(self.mode(), config, body.is_vehicle())
    }

    /// Advances the render-side smoothing by one tick.
    fn render_tick(&mut self, body: &CartBody);

    /// Smoothed pose `partial` ticks into the current render tick.
    fn render_pose(&self, partial: f32) -> Option<RenderPose>;
}
