//! Per-tick track iteration state and the ordered speed pipeline.
//!
//! A continuous tick may cross several rail cells. Each crossing is one
//! *pass*; the [`TrackIteration`] carries what is left of the tick's travel
//! budget from pass to pass along with the set of stages that already fired.
//!
//! # Stage order
//!
//! | # | Stage | Runs |
//! |---|-------|------|
//! | 1 | [`SpeedStage::Slope`] | until it changes the speed once |
//! | 2 | [`SpeedStage::PlayerInput`] | first pass only |
//! | 3 | [`SpeedStage::Halt`] | until it (or player input) changes the speed once |
//! | 4 | [`SpeedStage::SlowdownClamp`] | first pass only |
//! | 5 | [`SpeedStage::Boost`] | until it changes the speed once |
//!
//! "Changes the speed" means the squared horizontal length differs from the
//! input. A stage that fires on a later pass still counts as fired for the
//! rest of the tick.
//!
//! # Example
//!
//! ```rust
//! use railcart::iteration::{StageContext, TrackIteration, SpeedStage};
//! use railcart::track::{RailBlock, RailShape};
//! use glam::DVec3;
//!
//! let ctx = StageContext::new(RailBlock::powered(RailShape::EastWest, false))
//!     .with_friction(1.0)
//!     .with_max_speed(0.4);
//!
//! let mut iteration = TrackIteration::new();
//! let v = iteration.run_pipeline(DVec3::new(0.05, 0.0, 0.0), &ctx);
//! assert!((v.x - 0.025).abs() < 1e-9);
//! assert!(iteration.applied.contains(SpeedStage::Halt));
//!
//! // A second pass over another brake rail does not halve again.
//! iteration.first_iteration = false;
//! let v2 = iteration.run_pipeline(v, &ctx);
//! assert_eq!(v2, v);
//! ```

use glam::DVec3;
use log::warn;

use crate::math::{horizontal_distance, horizontal_distance_sqr, sanitize, EPSILON};
use crate::speed;
use crate::track::RailBlock;

/// One transform in the speed pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpeedStage {
    /// Pull toward the low end of a slope.
    Slope,
    /// Nudge from a riding player.
    PlayerInput,
    /// Brake on an unpowered powered rail.
    Halt,
    /// Friction and the max speed cap.
    SlowdownClamp,
    /// Powered rail acceleration.
    Boost,
}

impl SpeedStage {
    /// Stages in the order they are applied.
    pub const ORDER: [SpeedStage; 5] = [
        SpeedStage::Slope,
        SpeedStage::PlayerInput,
        SpeedStage::Halt,
        SpeedStage::SlowdownClamp,
        SpeedStage::Boost,
    ];

    /// Stages that only ever run on the first pass of a tick.
    #[inline]
    pub const fn first_pass_only(self) -> bool {
        matches!(self, SpeedStage::PlayerInput | SpeedStage::SlowdownClamp)
    }

    /// Marker recorded when this stage changes the speed.
    ///
    /// Player input shares the halt marker: a player pushing a stopped cart
    /// is not braked in the same tick.
    #[inline]
    pub const fn marker(self) -> Option<SpeedStage> {
        match self {
            SpeedStage::Slope => Some(SpeedStage::Slope),
            SpeedStage::PlayerInput | SpeedStage::Halt => Some(SpeedStage::Halt),
            SpeedStage::Boost => Some(SpeedStage::Boost),
            SpeedStage::SlowdownClamp => None,
        }
    }

    const fn bit(self) -> u8 {
        match self {
            SpeedStage::Slope => 1 << 0,
            SpeedStage::PlayerInput => 1 << 1,
            SpeedStage::Halt => 1 << 2,
            SpeedStage::SlowdownClamp => 1 << 3,
            SpeedStage::Boost => 1 << 4,
        }
    }

    /// Applies this stage's transform, ignoring gating.
    pub fn apply(self, v: DVec3, ctx: &StageContext) -> DVec3 {
        match self {
            SpeedStage::Slope => speed::slope_speed(v, ctx.rail.shape, ctx.in_water),
            SpeedStage::PlayerInput => match ctx.player_intent {
                Some(intent) => speed::player_input_nudge(v, intent),
                None => v,
            },
            SpeedStage::Halt => speed::halt_on_unpowered_rail(v, &ctx.rail),
            SpeedStage::SlowdownClamp => {
                let slowed = speed::natural_slowdown(v, ctx.friction, ctx.in_water);
                speed::clamp_length(slowed, ctx.max_speed)
            }
            SpeedStage::Boost => {
                speed::boost_on_powered_rail(v, &ctx.rail, ctx.boost, ctx.redstone_direction)
            }
        }
    }
}

/// Set of stage markers fired during the current tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AppliedStages(u8);

impl AppliedStages {
    /// Whether the marker is set.
    #[inline]
    pub fn contains(&self, stage: SpeedStage) -> bool {
        self.0 & stage.bit() != 0
    }

    /// Sets a marker.
    #[inline]
    pub fn insert(&mut self, stage: SpeedStage) {
        self.0 |= stage.bit();
    }

    /// Whether no marker is set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// Everything the stages read besides the velocity itself.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StageContext {
    /// Rail under the cart.
    pub rail: RailBlock,
    /// Whether the cart is in water.
    pub in_water: bool,
    /// Move intent of a riding player, if any.
    pub player_intent: Option<DVec3>,
    /// Friction factor.
    pub friction: f64,
    /// Speed cap.
    pub max_speed: f64,
    /// Powered rail boost.
    pub boost: f64,
    /// Launch direction for a stopped cart on an active powered rail.
    pub redstone_direction: DVec3,
}

impl StageContext {
    /// Context for a dry cart with no rider, no friction and no cap.
    pub fn new(rail: RailBlock) -> Self {
        Self {
            rail,
            in_water: false,
            player_intent: None,
            friction: 1.0,
            max_speed: f64::MAX,
            boost: 0.06,
            redstone_direction: DVec3::ZERO,
        }
    }

    /// Set water state
    pub fn with_water(mut self, in_water: bool) -> Self {
        self.in_water = in_water;
        self
    }

    /// Set the riding player's intent
    pub fn with_player_intent(mut self, intent: Option<DVec3>) -> Self {
        self.player_intent = intent;
        self
    }

    /// Set the friction factor
    pub fn with_friction(mut self, friction: f64) -> Self {
        self.friction = friction;
        self
    }

    /// Set the speed cap
    pub fn with_max_speed(mut self, max_speed: f64) -> Self {
        self.max_speed = max_speed;
        self
    }

    /// Set the boost amount
    pub fn with_boost(mut self, boost: f64) -> Self {
        self.boost = boost;
        self
    }

    /// Set the launch direction
    pub fn with_redstone_direction(mut self, dir: DVec3) -> Self {
        self.redstone_direction = dir;
        self
    }
}

/// State carried across the passes of one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackIteration {
    /// Horizontal travel still owed this tick.
    pub movement_left: f64,
    /// Whether this is the first pass.
    pub first_iteration: bool,
    /// Stage markers fired so far.
    pub applied: AppliedStages,
}

impl Default for TrackIteration {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackIteration {
    /// Fresh state for a new tick.
    pub fn new() -> Self {
        Self {
            movement_left: 0.0,
            first_iteration: true,
            applied: AppliedStages::default(),
        }
    }

    /// Whether another pass should run.
    #[inline]
    pub fn should_iterate(&self) -> bool {
        self.first_iteration || self.movement_left > EPSILON
    }

    /// Whether a stage is allowed to run on this pass.
    pub fn is_enabled(&self, stage: SpeedStage) -> bool {
        if stage.first_pass_only() {
            return self.first_iteration;
        }
        match stage.marker() {
            Some(marker) => !self.applied.contains(marker),
            None => true,
        }
    }

    /// Runs every enabled stage over `v`, in order.
    pub fn run_pipeline(&mut self, v: DVec3, ctx: &StageContext) -> DVec3 {
        let mut v = v;
        for stage in SpeedStage::ORDER {
            if !self.is_enabled(stage) {
                continue;
            }
            let (candidate, replaced) = sanitize(stage.apply(v, ctx));
            if replaced {
                warn!("non-finite velocity after {:?} stage, zeroed", stage);
            }
            match stage.marker() {
                None => v = candidate,
                Some(marker) => {
                    if horizontal_distance_sqr(candidate) != horizontal_distance_sqr(v) {
                        self.applied.insert(marker);
                        v = candidate;
                    }
                }
            }
        }
        v
    }

    /// Updates the travel budget from the pipeline result.
    ///
    /// The first pass takes the new horizontal speed as the budget; later
    /// passes only add what the pipeline changed.
    pub fn record_speed(&mut self, incoming: DVec3, adjusted: DVec3) {
        let new_speed = horizontal_distance(adjusted);
        if self.first_iteration {
            self.movement_left = new_speed;
        } else {
            self.movement_left += new_speed - horizontal_distance(incoming);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
