//! Render-side smoothing of simulated motion.
//!
//! The continuous strategy records every movement it makes as a
//! [`MinecartStep`]. A step's `weight` is the distance it covers, so a tick
//! that crosses three cells produces three steps whose weights add up to the
//! tick's travel. The renderer plays the steps back over a fixed window of
//! [`LERP_TICKS`] ticks, spending time on each step in proportion to its
//! weight. Speed therefore looks constant even when the simulation moved in
//! uneven chunks.
//!
//! ```text
//!   pending:  [s1 s2 s3]      <- push_step() during simulation
//!                  |
//!   tick():   lerp_delay hits 0, window swaps
//!                  v
//!   active:   origin -> s1 -> s2 -> s3   (weights 0.2, 0.1, 0.3)
//!   query(p): progress = (3 - lerp_delay + p) / 3 of total weight
//! ```
//!
//! The legacy strategy uses [`LegacyLerp`] instead: a fixed number of equal
//! sub-steps toward the latest synced pose.
//!
//! Both queues are bounded. When the pending queue is full, the new step is
//! folded into the newest pending one so the final pose and total distance
//! survive.

use glam::DVec3;
use heapless::{Deque, Vec as HVec};

use crate::math::{lerp, rot_lerp};

/// Render ticks one window of steps is spread over.
pub const LERP_TICKS: i32 = 3;

/// Capacity of both the pending queue and the active window.
pub const QUEUE_CAPACITY: usize = 64;

/// Sub-steps added on top of the requested count by [`LegacyLerp::lerp_to`].
pub const LEGACY_EXTRA_STEPS: u32 = 2;

// ============================================================================
// Poses and steps
// ============================================================================

/// A pose the renderer can draw.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderPose {
    /// Position.
    pub position: DVec3,
    /// Velocity.
    pub velocity: DVec3,
    /// Yaw in degrees.
    pub yaw: f32,
    /// Pitch in degrees.
    pub pitch: f32,
}

impl RenderPose {
    /// Interpolates toward `end`, angles along the shortest arc.
    pub fn lerp(&self, end: &RenderPose, t: f32) -> RenderPose {
        let td = t as f64;
        RenderPose {
            position: lerp(td, self.position, end.position),
            velocity: lerp(td, self.velocity, end.velocity),
            yaw: rot_lerp(t, self.yaw, end.yaw),
            pitch: rot_lerp(t, self.pitch, end.pitch),
        }
    }
}

/// One recorded movement.
///
/// `weight == 0` is an instantaneous snap; a positive weight is the distance
/// (or unit nudge) the renderer spreads this step over.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MinecartStep {
    /// Position after the movement.
    pub position: DVec3,
    /// Velocity after the movement.
    pub velocity: DVec3,
    /// Yaw after the movement.
    pub yaw: f32,
    /// Pitch after the movement.
    pub pitch: f32,
    /// Interpolation weight.
    pub weight: f32,
}

impl MinecartStep {
    /// Step at `pose` with the given weight.
    pub fn at(pose: RenderPose, weight: f32) -> Self {
        Self {
            position: pose.position,
            velocity: pose.velocity,
            yaw: pose.yaw,
            pitch: pose.pitch,
            weight,
        }
    }

    /// Pose part of the step.
    pub fn pose(&self) -> RenderPose {
        RenderPose {
            position: self.position,
            velocity: self.velocity,
            yaw: self.yaw,
            pitch: self.pitch,
        }
    }

    fn absorb(&mut self, newer: MinecartStep) {
        let weight = self.weight + newer.weight;
        *self = MinecartStep { weight, ..newer };
    }
}

impl From<MinecartStep> for RenderPose {
    fn from(step: MinecartStep) -> Self {
        step.pose()
    }
}

// ============================================================================
// Weighted step queue
// ============================================================================

/// Pending steps plus the window currently being played back.
#[derive(Clone, Debug)]
pub struct StepInterpolationQueue {
    pending: Deque<MinecartStep, QUEUE_CAPACITY>,
    active: HVec<MinecartStep, QUEUE_CAPACITY>,
    total_weight: f64,
    lerp_delay: i32,
    origin: Option<RenderPose>,
}

impl Default for StepInterpolationQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl StepInterpolationQueue {
    /// Empty queue.
    pub fn new() -> Self {
        Self {
            pending: Deque::new(),
            active: HVec::new(),
            total_weight: 0.0,
            lerp_delay: 0,
            origin: None,
        }
    }

    /// Appends a step to the pending queue.
    ///
    /// A full queue folds the step into the newest pending one.
    pub fn push_step(&mut self, step: MinecartStep) {
        if let Err(step) = self.pending.push_back(step) {
            if let Some(newest) = self.pending.back_mut() {
                newest.absorb(step);
            }
        }
    }

    /// Advances one render tick.
    ///
    /// When the current window has run out, its final pose becomes the new
    /// origin and every pending step moves into the window. `current` is the
    /// pose drawn while idle; it is adopted as the origin only when there is
    /// nothing pending (or no origin yet).
    pub fn tick(&mut self, current: RenderPose) {
        self.lerp_delay = (self.lerp_delay - 1).max(0);
        if self.lerp_delay > 0 {
            return;
        }

        match self.active.last() {
            Some(last) => self.origin = Some(last.pose()),
            None if self.pending.is_empty() || self.origin.is_none() => self.origin = Some(current),
            None => {}
        }
        self.active.clear();
        if self.pending.is_empty() {
            return;
        }

        while let Some(step) = self.pending.pop_front() {
            if let Err(step) = self.active.push(step) {
                if let Some(newest) = self.active.last_mut() {
                    newest.absorb(step);
                }
            }
        }
        self.total_weight = self.active.iter().map(|s| s.weight as f64).sum();
        self.lerp_delay = if self.total_weight == 0.0 { 0 } else { LERP_TICKS };
    }

    /// Sets the pose the first window starts from, if none is set yet.
    ///
    /// Callers pass the pose from before the steps they are about to push.
    pub fn seed_origin(&mut self, pose: RenderPose) {
        if self.origin.is_none() && self.active.is_empty() {
            self.origin = Some(pose);
        }
    }

    /// Pose at `partial` ticks into the current render tick.
    ///
    /// `None` when no window is active.
    pub fn query(&self, partial: f32) -> Option<RenderPose> {
        let last_index = self.active.len().checked_sub(1)?;
        let progress = ((LERP_TICKS - self.lerp_delay) as f64 + partial as f64) / LERP_TICKS as f64;
        let target = progress * self.total_weight;

        let mut reached = 0.0;
        let mut found = None;
        for (i, step) in self.active.iter().enumerate() {
            let weight = step.weight as f64;
            if weight <= 0.0 {
                continue;
            }
            reached += weight;
            if reached >= target {
                let local = (target - (reached - weight)) / weight;
                found = Some((i, local as f32));
                break;
            }
        }

        let (index, t) = found.unwrap_or((last_index, 1.0));
        let current = self.active[index].pose();
        let previous = match index {
            0 => self.origin.unwrap_or_default(),
            i => self.active[i - 1].pose(),
        };
        Some(previous.lerp(&current, t))
    }

    /// Whether a window is being played back.
    #[inline]
    pub fn has_window(&self) -> bool {
        !self.active.is_empty()
    }

    /// Steps waiting for the next window.
    #[inline]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Steps in the current window.
    pub fn window(&self) -> &[MinecartStep] {
        &self.active
    }

    /// Sum of the current window's weights.
    #[inline]
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Render ticks left in the current window.
    #[inline]
    pub fn lerp_delay(&self) -> i32 {
        self.lerp_delay
    }

    /// Pose the current window starts from.
    #[inline]
    pub fn origin(&self) -> RenderPose {
        self.origin.unwrap_or_default()
    }

    /// Drops every step and the window.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.active.clear();
        self.total_weight = 0.0;
        self.lerp_delay = 0;
    }
}

// ============================================================================
// Legacy fixed-count lerp
// ============================================================================

/// Fixed-count interpolation toward the most recent synced pose.
#[derive(Clone, Debug, Default)]
pub struct LegacyLerp {
    steps: u32,
    target: RenderPose,
    previous: Option<RenderPose>,
    current: Option<RenderPose>,
}

impl LegacyLerp {
    /// Idle lerp with no pose yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts moving toward `target` over `steps + 2` ticks.
    ///
    /// The very first target is adopted immediately.
    pub fn lerp_to(&mut self, target: RenderPose, steps: u32) {
        if self.current.is_none() {
            self.current = Some(target);
            self.previous = Some(target);
        }
        self.target = target;
        self.steps = steps + LEGACY_EXTRA_STEPS;
    }

    /// Replaces the target velocity.
    pub fn lerp_motion(&mut self, velocity: DVec3) {
        self.target.velocity = velocity;
        if let Some(current) = self.current.as_mut() {
            current.velocity = velocity;
        }
    }

    /// Drops any remaining sub-steps.
    pub fn cancel(&mut self) {
        self.steps = 0;
    }

    /// Advances one render tick by `1 / steps` of the remaining distance.
    pub fn tick(&mut self) {
        let Some(current) = self.current else {
            return;
        };
        self.previous = Some(current);
        if self.steps == 0 {
            return;
        }

        let t = 1.0 / self.steps as f32;
        let next = RenderPose {
            position: lerp(t as f64, current.position, self.target.position),
            velocity: self.target.velocity,
            yaw: rot_lerp(t, current.yaw, self.target.yaw),
            pitch: current.pitch + t * (self.target.pitch - current.pitch),
        };
        self.current = Some(next);
        self.steps -= 1;
    }

    /// Pose between the last two render ticks.
    pub fn pose(&self, partial: f32) -> Option<RenderPose> {
        let current = self.current?;
        let previous = self.previous.unwrap_or(current);
        Some(previous.lerp(&current, partial))
    }

    /// Sub-steps left.
    #[inline]
    pub fn remaining_steps(&self) -> u32 {
        self.steps
    }

    /// Current target pose.
    #[inline]
    pub fn target(&self) -> RenderPose {
        self.target
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn step_x(x: f64, weight: f32) -> MinecartStep {
        MinecartStep {
            position: DVec3::new(x, 0.0, 0.0),
            weight,
            ..MinecartStep::default()
        }
    }

    fn x_at(queue: &StepInterpolationQueue, partial: f32) -> f64 {
        queue.query(partial).map(|p| p.position.x).unwrap_or(f64::NAN)
    }

    // =========================================================================
    // Windowing
    // =========================================================================

    #[test]
    fn empty_queue_has_no_pose() {
        let mut queue = StepInterpolationQueue::new();
        assert!(queue.query(0.5).is_none());
        queue.tick(RenderPose::default());
        assert!(queue.query(0.5).is_none());
        assert!(!queue.has_window());
    }

    #[test]
    fn tick_moves_pending_into_window() {
        let mut queue = StepInterpolationQueue::new();
        queue.push_step(step_x(1.0, 1.0));
        queue.push_step(step_x(2.0, 1.0));
        assert_eq!(queue.pending_len(), 2);

        queue.tick(RenderPose::default());
        assert_eq!(queue.pending_len(), 0);
        assert_eq!(queue.window().len(), 2);
        assert_eq!(queue.total_weight(), 2.0);
        assert_eq!(queue.lerp_delay(), LERP_TICKS);
    }

    #[test]
    fn window_holds_for_lerp_ticks() {
        let mut queue = StepInterpolationQueue::new();
        queue.push_step(step_x(1.0, 1.0));
        queue.tick(RenderPose::default());
        queue.push_step(step_x(2.0, 1.0));

        queue.tick(RenderPose::default());
        queue.tick(RenderPose::default());
        assert_eq!(queue.pending_len(), 1);

        queue.tick(RenderPose::default());
        assert_eq!(queue.pending_len(), 0);
        assert_eq!(queue.window()[0].position.x, 2.0);
    }

    #[test]
    fn zero_weight_window_snaps() {
        let mut queue = StepInterpolationQueue::new();
        queue.push_step(step_x(5.0, 0.0));
        queue.tick(RenderPose::default());
        assert_eq!(queue.lerp_delay(), 0);
        assert_eq!(x_at(&queue, 0.0), 5.0);
        assert_eq!(x_at(&queue, 1.0), 5.0);
    }

    // =========================================================================
    // Query
    // =========================================================================

    #[test]
    fn weights_share_time_proportionally() {
        let mut queue = StepInterpolationQueue::new();
        queue.push_step(step_x(1.0, 1.0));
        queue.push_step(step_x(4.0, 3.0));
        queue.tick(RenderPose::default());

        // progress 1/3 -> target 4/3 -> a ninth into the second step
        assert!((x_at(&queue, 1.0) - 4.0 / 3.0).abs() < 1e-5);
        // origin at start
        assert!((x_at(&queue, 0.0) - 0.0).abs() < 1e-6);
    }

    #[test]
    fn seeded_origin_survives_first_window() {
        let mut queue = StepInterpolationQueue::new();
        queue.seed_origin(step_x(0.5, 0.0).pose());
        queue.push_step(step_x(1.5, 1.0));
        queue.tick(step_x(1.5, 0.0).pose());

        assert!((x_at(&queue, 0.0) - 0.5).abs() < 1e-6);

        // Only the first origin is taken from the seed
        queue.seed_origin(step_x(9.0, 0.0).pose());
        assert!((queue.origin().position.x - 0.5).abs() < 1e-6);
    }

    #[test]
    fn boundary_continuity() {
        let mut queue = StepInterpolationQueue::new();
        queue.push_step(step_x(1.0, 0.5));
        queue.push_step(step_x(1.5, 0.5));
        queue.tick(RenderPose::default());

        queue.tick(RenderPose::default());
        queue.tick(RenderPose::default());
        // last tick of the window: partial 1 lands on the final step
        assert!((x_at(&queue, 1.0) - 1.5).abs() < 1e-6);

        queue.push_step(step_x(2.0, 0.5));
        queue.tick(RenderPose::default());
        // new window starts where the old one ended
        assert!((x_at(&queue, 0.0) - 1.5).abs() < 1e-6);
        assert_eq!(queue.origin().position.x, 1.5);
    }

    #[test]
    fn zero_weight_steps_are_skipped() {
        let mut queue = StepInterpolationQueue::new();
        queue.push_step(step_x(1.0, 1.0));
        queue.push_step(step_x(3.0, 0.0));
        queue.push_step(step_x(4.0, 1.0));
        queue.tick(RenderPose::default());

        queue.tick(RenderPose::default());
        queue.tick(RenderPose::default());
        // progress 2/3 -> target 4/3 -> a third of the way from the snap to 4.0
        assert!((x_at(&queue, 0.0) - (3.0 + 1.0 / 3.0)).abs() < 1e-5);
    }

    #[test]
    fn query_is_repeatable() {
        let mut queue = StepInterpolationQueue::new();
        queue.push_step(step_x(3.0, 1.0));
        queue.tick(RenderPose::default());
        assert_eq!(queue.query(0.25), queue.query(0.25));
    }

    #[test]
    fn angles_take_short_arc() {
        let mut queue = StepInterpolationQueue::new();
        let start = RenderPose {
            yaw: 170.0,
            ..RenderPose::default()
        };
        queue.push_step(MinecartStep {
            yaw: -170.0,
            weight: 1.0,
            ..MinecartStep::default()
        });
        queue.tick(start);
        queue.tick(start);
        let pose = queue.query(0.5).unwrap_or_default();
        assert!((crate::math::wrap_degrees(pose.yaw) + 180.0).abs() < 1e-3);
    }

    // =========================================================================
    // Capacity
    // =========================================================================

    #[test]
    fn overflow_folds_into_newest() {
        let mut queue = StepInterpolationQueue::new();
        for i in 0..(QUEUE_CAPACITY + 10) {
            queue.push_step(step_x(i as f64, 1.0));
        }
        assert_eq!(queue.pending_len(), QUEUE_CAPACITY);

        queue.tick(RenderPose::default());
        assert_eq!(queue.total_weight(), (QUEUE_CAPACITY + 10) as f64);
        let last = queue.window().last().copied().unwrap_or_default();
        assert_eq!(last.position.x, (QUEUE_CAPACITY + 9) as f64);
        assert_eq!(last.weight, 11.0);
    }

    // =========================================================================
    // Legacy lerp
    // =========================================================================

    #[test]
    fn legacy_first_target_snaps() {
        let mut lerp = LegacyLerp::new();
        assert!(lerp.pose(0.0).is_none());

        let target = RenderPose {
            position: DVec3::new(4.0, 0.0, 0.0),
            ..RenderPose::default()
        };
        lerp.lerp_to(target, 3);
        assert_eq!(lerp.remaining_steps(), 5);
        assert_eq!(lerp.pose(0.0).map(|p| p.position), Some(target.position));
    }

    #[test]
    fn legacy_converges_in_step_count() {
        let mut lerp = LegacyLerp::new();
        lerp.lerp_to(RenderPose::default(), 0);
        lerp.tick();
        lerp.tick();

        let target = RenderPose {
            position: DVec3::new(3.0, 0.0, 0.0),
            yaw: 90.0,
            ..RenderPose::default()
        };
        lerp.lerp_to(target, 1);

        lerp.tick();
        let first = lerp.pose(1.0).unwrap_or_default();
        assert!((first.position.x - 1.0).abs() < 1e-6);
        assert!((first.yaw - 30.0).abs() < 1e-4);

        lerp.tick();
        lerp.tick();
        let done = lerp.pose(1.0).unwrap_or_default();
        assert!((done.position.x - 3.0).abs() < 1e-6);
        assert_eq!(lerp.remaining_steps(), 0);
    }

    #[test]
    fn legacy_partial_blends_last_two_ticks() {
        let mut lerp = LegacyLerp::new();
        lerp.lerp_to(RenderPose::default(), 0);
        lerp.tick();
        lerp.tick();
        lerp.lerp_to(
            RenderPose {
                position: DVec3::new(2.0, 0.0, 0.0),
                ..RenderPose::default()
            },
            0,
        );
        lerp.tick();
        // moved 0 -> 1 this tick
        let mid = lerp.pose(0.5).unwrap_or_default();
        assert!((mid.position.x - 0.5).abs() < 1e-9);
    }
}
