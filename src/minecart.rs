//! The cart itself: physical state, shared movement helpers and the host
//! that ties a body to its bound motion strategy.
//!
//! # Overview
//!
//! [`Minecart`] is what a game loop holds. It owns:
//! - a [`CartBody`] (position, velocity, rotation and host flags)
//! - the [`Config`] it was built with
//! - an [`AnyMotion`] bound once from `config.rules.movement`
//!
//! Each simulation tick the host records the old pose, hands the body to the
//! strategy, then refreshes water state. The render side calls
//! [`Minecart::render_tick`] once per client tick and
//! [`Minecart::render_pose`] once per frame.
//!
//! # Example
//!
//! ```rust
//! use railcart::config::Config;
//! use railcart::minecart::{CartKind, Minecart, Passenger};
//! use railcart::track::{RailBlock, RailShape};
//! use railcart::traits::EntityId;
//! use railcart::world::MockLevel;
//! use glam::{DVec3, IVec3};
//!
//! let mut level = MockLevel::new();
//! for x in 0..8 {
//!     level.set_rail(IVec3::new(x, 0, 0), RailBlock::plain(RailShape::EastWest));
//! }
//!
//! let mut cart = Minecart::spawn(
//!     EntityId(1),
//!     CartKind::Rideable,
//!     DVec3::new(0.5, 0.0, 0.5),
//!     Config::default(),
//!     &level,
//! );
//! cart.body_mut().passenger = Some(Passenger::new(EntityId(2)));
//! cart.body_mut().motion.velocity = DVec3::new(0.3, 0.0, 0.0);
//!
//! cart.tick(&mut level);
//! assert!((cart.body().motion.velocity.x - 0.3 * 0.997).abs() < 1e-9);
//! ```

use glam::{DVec3, IVec3};
use log::debug;

use crate::adjust::adjust_to_rails;
use crate::config::{Config, MovementMode};
use crate::interaction;
use crate::interpolation::{MinecartStep, RenderPose};
use crate::math::{cell_containing, horizontal, horizontal_distance, Aabb, EPSILON};
use crate::motion::AnyMotion;
use crate::traits::{EntityId, Level, MotionStrategy, RailLookup};

/// Width of a cart's collision box.
pub const CART_WIDTH: f64 = 0.98;

/// Height of a cart's collision box.
pub const CART_HEIGHT: f64 = 0.7;

/// Downward acceleration per tick.
pub const GRAVITY: f64 = 0.04;

/// Downward acceleration per tick in water.
pub const WATER_GRAVITY: f64 = 0.005;

// ============================================================================
// Motion state
// ============================================================================

/// Kinematic state mutated by the motion strategies.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct MotionState {
    /// Bottom-center position.
    pub position: DVec3,
    /// Velocity in blocks per tick.
    pub velocity: DVec3,
    /// Yaw in degrees.
    pub yaw: f32,
    /// Pitch in degrees.
    pub pitch: f32,
    /// Whether the last lookup found a rail.
    pub on_rails: bool,
    /// Whether the model is drawn back to front.
    pub flipped: bool,
}

impl MotionState {
    /// State at rest at `position`.
    pub fn at(position: DVec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Current pose.
    pub fn pose(&self) -> RenderPose {
        RenderPose {
            position: self.position,
            velocity: self.velocity,
            yaw: self.yaw,
            pitch: self.pitch,
        }
    }

    /// Step recording the current pose.
    pub fn step(&self, weight: f32) -> MinecartStep {
        MinecartStep::at(self.pose(), weight)
    }
}

// ============================================================================
// Body
// ============================================================================

/// Cart variant, as far as motion cares.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CartKind {
    /// Plain cart that carries a passenger.
    #[default]
    Rideable,
    /// Self-propelled cart.
    Furnace {
        /// Whether it is burning fuel.
        lit: bool,
    },
    /// Chest, hopper and similar cargo carts.
    Storage,
}

impl CartKind {
    /// Whether entities can ride it.
    #[inline]
    pub const fn is_rideable(self) -> bool {
        matches!(self, CartKind::Rideable)
    }

    /// Whether it is a furnace cart that is burning.
    #[inline]
    pub const fn is_active_furnace(self) -> bool {
        matches!(self, CartKind::Furnace { lit: true })
    }
}

/// An entity riding a cart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Passenger {
    /// Rider handle.
    pub id: EntityId,
    /// Whether the rider is a player.
    pub is_player: bool,
    /// Latest movement input of a player rider, in world space.
    pub move_intent: DVec3,
}

impl Passenger {
    /// Non-player rider.
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            is_player: false,
            move_intent: DVec3::ZERO,
        }
    }

    /// Player rider with a movement intent.
    pub fn player(id: EntityId, move_intent: DVec3) -> Self {
        Self {
            id,
            is_player: true,
            move_intent,
        }
    }
}

/// Motion state plus the host-side status flags the algorithms read.
#[derive(Clone, Debug, PartialEq)]
pub struct CartBody {
    /// Entity handle.
    pub id: EntityId,
    /// Cart variant.
    pub kind: CartKind,
    /// Kinematic state.
    pub motion: MotionState,
    /// Rider, if any.
    pub passenger: Option<Passenger>,
    /// Position at the start of the tick (or track pass).
    pub old_position: DVec3,
    /// Yaw at the start of the tick.
    pub old_yaw: f32,
    /// Blocked while moving down during the last move.
    pub on_ground: bool,
    /// Blocked along X or Z during the last move.
    pub horizontal_collision: bool,
    /// Blocked along Y during the last move.
    pub vertical_collision: bool,
    /// Whether the cart is in water.
    pub in_water: bool,
    /// Distance fallen since last touching ground or rail.
    pub fall_distance: f64,
    /// True until the first tick completes.
    pub first_tick: bool,
    /// False once the cart is removed.
    pub alive: bool,
}

impl CartBody {
    /// Fresh body at rest.
    pub fn new(id: EntityId, kind: CartKind, position: DVec3) -> Self {
        Self {
            id,
            kind,
            motion: MotionState::at(position),
            passenger: None,
            old_position: position,
            old_yaw: 0.0,
            on_ground: false,
            horizontal_collision: false,
            vertical_collision: false,
            in_water: false,
            fall_distance: 0.0,
            first_tick: true,
            alive: true,
        }
    }

    /// Whether something rides the cart.
    #[inline]
    pub fn is_vehicle(&self) -> bool {
        self.passenger.is_some()
    }

    /// Whether `id` rides this cart.
    #[inline]
    pub fn carries(&self, id: EntityId) -> bool {
        self.passenger.is_some_and(|p| p.id == id)
    }

    /// Move intent of a riding player.
    pub fn player_intent(&self) -> Option<DVec3> {
        self.passenger.filter(|p| p.is_player).map(|p| p.move_intent)
    }

    /// Current collision box.
    pub fn bounding_box(&self) -> Aabb {
        Aabb::standing_at(self.motion.position, CART_WIDTH, CART_HEIGHT)
    }

    /// Records the current pose as the pass origin.
    pub fn set_old_pos_and_rot(&mut self) {
        self.old_position = self.motion.position;
        self.old_yaw = self.motion.yaw;
    }

    /// Gravity for the current medium.
    pub fn gravity(&self) -> f64 {
        if self.in_water {
            WATER_GRAVITY
        } else {
            GRAVITY
        }
    }

    /// Applies one tick of gravity to the velocity.
    pub fn apply_gravity(&mut self) {
        self.motion.velocity.y -= self.gravity();
    }

    /// Cell whose rail governs the cart.
    ///
    /// The cart rides slightly above its rail, so a rail just below the
    /// cart's feet takes precedence over the cell it is in. The two
    /// strategies probe differently.
    pub fn current_block_pos_or_rail_below<W: RailLookup + ?Sized>(
        &self,
        level: &W,
        mode: MovementMode,
    ) -> IVec3 {
        let p = self.motion.position;
        let mut cell = cell_containing(p);
        match mode {
            MovementMode::Continuous => {
                let probe = (p.y - 0.1 - EPSILON).floor() as i32;
                if level.is_rail(IVec3::new(cell.x, probe, cell.z)) {
                    cell.y = probe;
                }
            }
            MovementMode::Legacy => {
                if level.is_rail(cell - IVec3::Y) {
                    cell.y -= 1;
                }
            }
        }
        cell
    }
}

// ============================================================================
// Shared movement
// ============================================================================

fn apply_move<L: Level + ?Sized>(body: &mut CartBody, level: &mut L, delta: DVec3) {
    let movement = level.resolve_movement(body.id, &body.bounding_box(), delta);
    let applied = movement.applied;
    body.motion.position += applied;
    body.horizontal_collision = movement.horizontal_collision;
    body.vertical_collision = movement.vertical_collision;
    body.on_ground = movement.on_ground;

    let v = &mut body.motion.velocity;
    if applied.x != delta.x {
        v.x = 0.0;
    }
    if applied.z != delta.z {
        v.z = 0.0;
    }
    if movement.vertical_collision {
        v.y = 0.0;
    }

    if body.on_ground {
        body.fall_distance = 0.0;
    } else if applied.y < 0.0 {
        body.fall_distance -= applied.y;
    }
}

/// Moves the cart through the collider.
///
/// In continuous mode the move is followed by a push/pickup round; if it
/// mounted someone without being blocked by anyone, the move is re-issued
/// toward the original target.
pub fn move_cart<L: Level + ?Sized>(
    body: &mut CartBody,
    mode: MovementMode,
    level: &mut L,
    delta: DVec3,
) {
    match mode {
        MovementMode::Continuous => {
            let target = body.motion.position + delta;
            apply_move(body, level, delta);
            if interaction::push_and_pickup(body, level) {
                let rest = target - body.motion.position;
                apply_move(body, level, rest);
            }
        }
        MovementMode::Legacy => apply_move(body, level, delta),
    }
}

/// Free-body motion when no rail is below the cart.
pub fn come_off_track<L: Level + ?Sized>(
    body: &mut CartBody,
    mode: MovementMode,
    config: &Config,
    level: &mut L,
    max_speed: f64,
) {
    if config.vehicle.steer_off_rail {
        if let Some(intent) = body.player_intent() {
            let dir = horizontal(intent).normalize_or_zero();
            if dir != DVec3::ZERO {
                let speed = horizontal_distance(body.motion.velocity);
                let v = &mut body.motion.velocity;
                v.x = dir.x * speed;
                v.z = dir.z * speed;
            }
        }
    }

    let v = &mut body.motion.velocity;
    v.x = v.x.clamp(-max_speed, max_speed);
    v.z = v.z.clamp(-max_speed, max_speed);
    if body.on_ground {
        body.motion.velocity *= 0.5;
    }

    let delta = body.motion.velocity;
    move_cart(body, mode, level, delta);

    if !body.on_ground {
        body.motion.velocity *= 0.95;
    }
}

// ============================================================================
// Host
// ============================================================================

/// Persisted cart state.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CartSnapshot {
    /// Position.
    pub position: DVec3,
    /// Velocity.
    pub velocity: DVec3,
    /// Yaw in degrees.
    pub yaw: f32,
    /// Pitch in degrees.
    pub pitch: f32,
    /// Model orientation flag.
    pub flipped: bool,
    /// Whether the cart has completed a tick.
    pub has_ticked: bool,
    /// Movement algorithm the cart was saved under.
    pub mode: MovementMode,
}

/// A cart bound to its motion strategy.
#[derive(Clone, Debug)]
pub struct Minecart {
    body: CartBody,
    config: Config,
    motion: AnyMotion,
}

impl Minecart {
    /// Builds a cart without touching the world.
    pub fn new(id: EntityId, kind: CartKind, position: DVec3, config: Config) -> Self {
        let motion = AnyMotion::for_mode(config.rules.movement);
        debug!("cart {:?} bound to {} motion", id, motion.mode().as_str());
        Self {
            body: CartBody::new(id, kind, position),
            config,
            motion,
        }
    }

    /// Builds a cart and places it in the world.
    ///
    /// Continuous carts snap onto the rail below them immediately.
    pub fn spawn<W: RailLookup + ?Sized>(
        id: EntityId,
        kind: CartKind,
        position: DVec3,
        config: Config,
        level: &W,
    ) -> Self {
        let mut cart = Self::new(id, kind, position, config);
        cart.motion.on_spawn(&mut cart.body, level);
        cart
    }

    /// Restores a saved cart.
    ///
    /// The cart keeps the movement mode it was saved under, whatever
    /// `config` selects for new carts.
    pub fn from_snapshot(id: EntityId, kind: CartKind, snapshot: &CartSnapshot, config: Config) -> Self {
        let mut cart = Self::new(id, kind, snapshot.position, config.with_movement(snapshot.mode));
        let motion = &mut cart.body.motion;
        motion.velocity = snapshot.velocity;
        motion.yaw = snapshot.yaw;
        motion.pitch = snapshot.pitch;
        motion.flipped = snapshot.flipped;
        cart.body.old_yaw = snapshot.yaw;
        cart.body.first_tick = !snapshot.has_ticked;
        cart
    }

    /// State to persist.
    pub fn snapshot(&self) -> CartSnapshot {
        let motion = &self.body.motion;
        CartSnapshot {
            position: motion.position,
            velocity: motion.velocity,
            yaw: motion.yaw,
            pitch: motion.pitch,
            flipped: motion.flipped,
            has_ticked: !self.body.first_tick,
            mode: self.motion.mode(),
        }
    }

    /// Runs one simulation tick.
    pub fn tick<L: Level + ?Sized>(&mut self, level: &mut L) {
        if !self.body.alive {
            return;
        }
        self.body.set_old_pos_and_rot();
        self.motion.tick(&mut self.body, &self.config, level);
        self.body.in_water = level.is_water(cell_containing(self.body.motion.position));
        self.body.first_tick = false;
    }

    /// Advances render-side smoothing by one client tick.
    pub fn render_tick(&mut self) {
        self.motion.render_tick(&self.body);
    }

    /// Pose to draw `partial` ticks into the current client tick.
    ///
    /// Falls back to the simulated pose when nothing is being smoothed.
    pub fn render_pose(&self, partial: f32) -> RenderPose {
        self.motion
            .render_pose(partial)
            .unwrap_or_else(|| self.body.motion.pose())
    }

    /// Physical state.
    pub fn body(&self) -> &CartBody {
        &self.body
    }

    /// Mutable physical state.
    pub fn body_mut(&mut self) -> &mut CartBody {
        &mut self.body
    }

    /// Configuration the cart was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Bound strategy.
    pub fn motion(&self) -> &AnyMotion {
        &self.motion
    }

    /// Bound movement algorithm.
    pub fn mode(&self) -> MovementMode {
        self.motion.mode()
    }

    /// Current top speed.
    pub fn max_speed(&self) -> f64 {
        self.motion.max_speed(&self.body, &self.config)
    }

    /// Snaps the cart onto a rail cell outside the normal tick.
    ///
    /// Continuous carts only; legacy carts are left untouched. The resulting
    /// step is queued for the renderer.
    pub fn snap_to_rail<W: RailLookup + ?Sized>(&mut self, level: &W) {
        let AnyMotion::Continuous(continuous) = &mut self.motion else {
            return;
        };
        let cell = self
            .body
            .current_block_pos_or_rail_below(level, MovementMode::Continuous);
        if let Some(step) = adjust_to_rails(&mut self.body.motion, cell, level.rail_at(cell), true) {
            continuous.queue_mut().push_step(step);
        }
    }

    /// Marks the cart as removed; further ticks do nothing.
    pub fn remove(&mut self) {
        self.body.alive = false;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::{RailBlock, RailShape};
    use crate::world::MockLevel;

    fn line(level: &mut MockLevel, y: i32) {
        for x in -4..8 {
            level.set_rail(IVec3::new(x, y, 0), RailBlock::plain(RailShape::EastWest));
        }
    }

    #[test]
    fn rail_below_lookup_modes() {
        let mut level = MockLevel::new();
        level.set_rail(IVec3::new(0, 0, 0), RailBlock::plain(RailShape::EastWest));

        let body = CartBody::new(EntityId(1), CartKind::Rideable, DVec3::new(0.5, 1.05, 0.5));
        assert_eq!(
            body.current_block_pos_or_rail_below(&level, MovementMode::Continuous),
            IVec3::new(0, 0, 0)
        );
        assert_eq!(
            body.current_block_pos_or_rail_below(&level, MovementMode::Legacy),
            IVec3::new(0, 0, 0)
        );

        // Continuous only looks a tenth of a block down
        let body = CartBody::new(EntityId(1), CartKind::Rideable, DVec3::new(0.5, 1.5, 0.5));
        assert_eq!(
            body.current_block_pos_or_rail_below(&level, MovementMode::Continuous),
            IVec3::new(0, 1, 0)
        );
        assert_eq!(
            body.current_block_pos_or_rail_below(&level, MovementMode::Legacy),
            IVec3::new(0, 0, 0)
        );
    }

    #[test]
    fn gravity_depends_on_water() {
        let mut body = CartBody::new(EntityId(1), CartKind::Rideable, DVec3::ZERO);
        body.apply_gravity();
        assert_eq!(body.motion.velocity.y, -GRAVITY);

        body.in_water = true;
        body.motion.velocity = DVec3::ZERO;
        body.apply_gravity();
        assert_eq!(body.motion.velocity.y, -WATER_GRAVITY);
    }

    #[test]
    fn player_intent_only_for_players() {
        let mut body = CartBody::new(EntityId(1), CartKind::Rideable, DVec3::ZERO);
        assert!(body.player_intent().is_none());

        body.passenger = Some(Passenger::new(EntityId(2)));
        assert!(body.player_intent().is_none());
        assert!(body.carries(EntityId(2)));

        body.passenger = Some(Passenger::player(EntityId(3), DVec3::X));
        assert_eq!(body.player_intent(), Some(DVec3::X));
    }

    #[test]
    fn come_off_track_clamps_and_drags() {
        let mut level = MockLevel::new();
        let mut body = CartBody::new(EntityId(1), CartKind::Rideable, DVec3::new(0.5, 10.0, 0.5));
        body.motion.velocity = DVec3::new(1.0, 0.0, -1.0);

        come_off_track(&mut body, MovementMode::Continuous, &Config::default(), &mut level, 0.4);
        assert!((body.motion.position.x - 0.9).abs() < 1e-9);
        assert!((body.motion.position.z - 0.1).abs() < 1e-9);
        assert!((body.motion.velocity.x - 0.38).abs() < 1e-9);
    }

    #[test]
    fn come_off_track_halves_on_ground() {
        let mut level = MockLevel::new();
        level.set_solid(IVec3::new(0, -1, 0));
        let mut body = CartBody::new(EntityId(1), CartKind::Rideable, DVec3::new(0.5, 0.0, 0.5));
        body.on_ground = true;
        body.motion.velocity = DVec3::new(0.2, -0.04, 0.0);

        come_off_track(&mut body, MovementMode::Legacy, &Config::default(), &mut level, 0.4);
        assert!(body.on_ground);
        assert!((body.motion.position.x - 0.6).abs() < 1e-9);
        assert!((body.motion.velocity.x - 0.1).abs() < 1e-9);
        assert_eq!(body.motion.velocity.y, 0.0);
    }

    #[test]
    fn steering_off_rail_is_opt_in() {
        let mut level = MockLevel::new();
        let config = Config::default()
            .with_vehicle(crate::config::VehicleConfig::default().with_steer_off_rail(true));
        let mut body = CartBody::new(EntityId(1), CartKind::Rideable, DVec3::new(0.5, 10.0, 0.5));
        body.passenger = Some(Passenger::player(EntityId(2), DVec3::Z));
        body.motion.velocity = DVec3::new(0.2, 0.0, 0.0);

        come_off_track(&mut body, MovementMode::Continuous, &config, &mut level, 0.4);
        assert!(body.motion.velocity.x.abs() < 1e-9);
        assert!(body.motion.velocity.z > 0.18);
    }

    #[test]
    fn wall_stops_movement() {
        let mut level = MockLevel::new();
        level.set_solid(IVec3::new(1, 0, 0));
        let mut body = CartBody::new(EntityId(1), CartKind::Storage, DVec3::new(0.5, 0.1, 0.5));
        body.motion.velocity = DVec3::new(0.3, 0.0, 0.0);

        move_cart(&mut body, MovementMode::Legacy, &mut level, DVec3::new(0.3, 0.0, 0.0));
        assert!(body.horizontal_collision);
        assert!((body.motion.position.x - (1.0 - CART_WIDTH / 2.0)).abs() < 1e-9);
        assert_eq!(body.motion.velocity.x, 0.0);
    }

    #[test]
    fn spawn_snaps_continuous_only() {
        let mut level = MockLevel::new();
        line(&mut level, 0);
        let start = DVec3::new(0.5, 0.0, 0.7);

        let cart = Minecart::spawn(EntityId(1), CartKind::Rideable, start, Config::default(), &level);
        assert!((cart.body().motion.position.z - 0.5).abs() < 1e-9);
        assert!((cart.body().motion.position.y - 0.1).abs() < 1e-9);
        assert!(cart.body().motion.on_rails);

        let legacy = Config::default().with_movement(MovementMode::Legacy);
        let cart = Minecart::spawn(EntityId(1), CartKind::Rideable, start, legacy, &level);
        assert_eq!(cart.body().motion.position, start);
    }

    #[test]
    fn snapshot_restores_state() {
        let mut level = MockLevel::new();
        line(&mut level, 0);
        let mut cart = Minecart::spawn(
            EntityId(1),
            CartKind::Rideable,
            DVec3::new(0.5, 0.1, 0.5),
            Config::default(),
            &level,
        );
        cart.body_mut().motion.velocity = DVec3::new(0.2, 0.0, 0.0);
        cart.tick(&mut level);

        let snap = cart.snapshot();
        assert!(snap.has_ticked);
        assert_eq!(snap.mode, MovementMode::Continuous);

        let restored = Minecart::from_snapshot(EntityId(1), CartKind::Rideable, &snap, Config::default());
        assert_eq!(restored.body().motion.position, cart.body().motion.position);
        assert_eq!(restored.body().motion.velocity, cart.body().motion.velocity);
        assert!(!restored.body().first_tick);
    }

    #[test]
    fn removed_cart_does_not_move() {
        let mut level = MockLevel::new();
        line(&mut level, 0);
        let mut cart = Minecart::new(EntityId(1), CartKind::Rideable, DVec3::new(0.5, 0.1, 0.5), Config::default());
        cart.body_mut().motion.velocity = DVec3::new(0.2, 0.0, 0.0);
        cart.remove();
        cart.tick(&mut level);
        assert_eq!(cart.body().motion.position, DVec3::new(0.5, 0.1, 0.5));
    }

    #[test]
    fn restored_cart_keeps_saved_mode() {
        let legacy = Minecart::new(
            EntityId(1),
            CartKind::Rideable,
            DVec3::new(0.5, 0.0625, 0.5),
            Config::default().with_movement(MovementMode::Legacy),
        );
        let snap = legacy.snapshot();

        let restored = Minecart::from_snapshot(EntityId(1), CartKind::Rideable, &snap, Config::default());
        assert_eq!(restored.mode(), MovementMode::Legacy);
        assert!(matches!(restored.motion(), AnyMotion::Legacy(_)));
        assert_eq!(restored.config().rules.movement, MovementMode::Legacy);
    }

    #[test]
    fn snap_to_rail_leaves_legacy_cart_alone() {
        let mut level = MockLevel::new();
        line(&mut level, 0);
        let start = DVec3::new(0.5, 0.0625, 0.8);
        let config = Config::default().with_movement(MovementMode::Legacy);
        let mut cart = Minecart::new(EntityId(1), CartKind::Rideable, start, config);

        cart.snap_to_rail(&level);
        assert_eq!(cart.body().motion.position, start);
    }

    #[test]
    fn snap_to_rail_centres_continuous_cart() {
        let mut level = MockLevel::new();
        line(&mut level, 0);
        let mut cart = Minecart::new(EntityId(1), CartKind::Rideable, DVec3::new(0.5, 0.0, 0.8), Config::default());

        cart.snap_to_rail(&level);
        let position = cart.body().motion.position;
        assert!((position.z - 0.5).abs() < 1e-9);
        assert!((position.y - 0.1).abs() < 1e-9);
    }

    #[test]
    fn render_pose_falls_back_to_body() {
        let cart = Minecart::new(EntityId(1), CartKind::Rideable, DVec3::new(3.0, 0.0, 0.0), Config::default());
        assert_eq!(cart.render_pose(0.5).position, DVec3::new(3.0, 0.0, 0.0));
    }
}
