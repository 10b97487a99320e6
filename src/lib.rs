//! # railcart
//!
//! Rail-constrained cart motion for voxel worlds: track snapping, the
//! per-tick speed pipeline, entity pushing and weighted step interpolation
//! for smooth rendering.
//!
//! ## Features
//!
//! - **Two movement models**: the classic single chord projection per tick
//!   ([`LegacyMotion`]) and multi-pass track iteration ([`ContinuousMotion`])
//!   that carries leftover movement across cells, corners and slopes
//! - **Ordered speed pipeline**: slope gravity, player nudge, unpowered-rail
//!   halt, friction and clamp, powered-rail boost, each applied at most once
//!   per tick
//! - **Render interpolation**: a weighted step queue that replays the exact
//!   path a cart took, with a delay window instead of a fixed lerp count
//! - **Engine-agnostic**: the world is reached only through the traits in
//!   [`traits`]
//!
//! ## Architecture
//!
//! - `track` - Rail shapes, exit offsets and powered rail rules
//! - `speed` - Pure speed functions used by both models
//! - `iteration` - Per-tick pass state and the stage pipeline
//! - `adjust` - Snapping a cart onto the chord of its rail
//! - `motion` - The two motion strategies and [`AnyMotion`]
//! - `interpolation` - Render-side queues
//! - `interaction` - Mounting and pushing nearby entities
//! - `minecart` - The cart itself: body, tick, free-fall, persistence
//! - `world` - Concrete worlds (an in-memory [`MockLevel`] for testing)
//!
//! ## Example
//!
//! ```rust
//! use railcart::{CartKind, Config, Minecart, MockLevel, MovementMode};
//! use railcart::track::{RailBlock, RailShape};
//! use railcart::traits::EntityId;
//! use glam::{DVec3, IVec3};
//!
//! let mut level = MockLevel::new();
//! for x in 0..16 {
//!     level.set_rail(IVec3::new(x, 0, 0), RailBlock::plain(RailShape::EastWest));
//! }
//!
//! for mode in [MovementMode::Legacy, MovementMode::Continuous] {
//!     let config = Config::default().with_movement(mode);
//!     let start = DVec3::new(0.5, 0.1, 0.5);
//!     let mut cart = Minecart::spawn(EntityId(1), CartKind::Rideable, start, config, &level);
//!     cart.body_mut().motion.velocity = DVec3::new(0.4, 0.0, 0.0);
//!
//!     for _ in 0..10 {
//!         cart.tick(&mut level);
//!         cart.render_tick();
//!     }
//!
//!     let pos = cart.body().motion.position;
//!     assert!(pos.x > 3.0);
//!     assert!((pos.z - 0.5).abs() < 1e-6);
//! }
//! ```

#![warn(missing_docs)]

/// Snapping onto rails and the shared rotation rules.
pub mod adjust;
/// Rule and vehicle configuration.
pub mod config;
/// Mounting and pushing of nearby entities.
pub mod interaction;
/// Render interpolation queues.
pub mod interpolation;
/// Track iteration state and the speed pipeline.
pub mod iteration;
/// Vector helpers and bounding boxes.
pub mod math;
/// The cart entity: body, tick and persistence.
pub mod minecart;
/// Built-in motion strategies.
pub mod motion;
/// Pure speed functions.
pub mod speed;
/// Rail shapes and rail blocks.
pub mod track;
/// World access and strategy traits.
pub mod traits;
/// World implementations.
pub mod world;

// Re-exports for convenience
pub use adjust::{adjust_to_rails, set_rotation};
pub use config::{Config, FrictionMode, MovementMode, RuleConfig, VehicleConfig};
pub use interpolation::{LegacyLerp, MinecartStep, RenderPose, StepInterpolationQueue};
pub use iteration::{SpeedStage, TrackIteration};
pub use minecart::{CartBody, CartKind, CartSnapshot, Minecart, MotionState, Passenger};
pub use motion::{AnyMotion, ContinuousMotion, LegacyMotion};
pub use track::{RailBlock, RailKind, RailShape};
pub use traits::{
    Collider, EntityAccess, EntityId, EntityKind, Level, MotionStrategy, Movement, NearbyEntity,
    RailLookup,
};
pub use world::MockLevel;
