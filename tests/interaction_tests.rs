//! Integration tests for mounting and pushing through full cart ticks

use glam::{DVec3, IVec3};
use railcart::math::Aabb;
use railcart::minecart::{CART_HEIGHT, CART_WIDTH};
use railcart::track::{RailBlock, RailShape};
use railcart::{
    CartKind, Config, EntityId, EntityKind, Minecart, MockLevel, MovementMode, NearbyEntity,
};

fn ew_line(level: &mut MockLevel, xs: std::ops::RangeInclusive<i32>) {
    for x in xs {
        level.set_rail(IVec3::new(x, 0, 0), RailBlock::plain(RailShape::EastWest));
    }
}

fn moving_cart(level: &MockLevel, id: u32, x: f64, speed: f64, mode: MovementMode) -> Minecart {
    let config = Config::default().with_movement(mode);
    let start = DVec3::new(x, 0.1, 0.5);
    let mut cart = Minecart::spawn(EntityId(id), CartKind::Rideable, start, config, level);
    cart.body_mut().motion.velocity = DVec3::new(speed, 0.0, 0.0);
    cart
}

fn footprint(cart: &Minecart) -> Aabb {
    Aabb::standing_at(cart.body().motion.position, CART_WIDTH, CART_HEIGHT)
}

/// Whether `west` has pushed into `east` beyond rounding.
fn overlapping(west: &Minecart, east: &Minecart) -> bool {
    footprint(west).max.x > footprint(east).min.x + 1e-9
}

// ============================================================================
// Mounting
// ============================================================================

#[test]
fn rolling_cart_picks_up_mob_on_track() {
    for mode in [MovementMode::Continuous, MovementMode::Legacy] {
        let mut level = MockLevel::new();
        ew_line(&mut level, -4..=16);
        let mob = level.add_entity(NearbyEntity::new(
            EntityId(5),
            EntityKind::Creature,
            DVec3::new(3.5, 0.1, 0.5),
        ));
        let mut cart = moving_cart(&level, 1, 0.5, 0.3, mode);

        for _ in 0..20 {
            cart.tick(&mut level);
        }

        assert!(cart.body().carries(mob), "{:?} cart did not mount the mob", mode);
        assert_eq!(level.entity(mob).and_then(|e| e.vehicle), Some(EntityId(1)));
    }
}

#[test]
fn player_on_track_is_never_mounted() {
    let mut level = MockLevel::new();
    ew_line(&mut level, -4..=16);
    let player = level.add_entity(NearbyEntity::new(
        EntityId(5),
        EntityKind::Player,
        DVec3::new(3.5, 0.1, 0.5),
    ));
    let mut cart = moving_cart(&level, 1, 0.5, 0.3, MovementMode::Legacy);

    for _ in 0..20 {
        cart.tick(&mut level);
    }

    assert!(!cart.body().is_vehicle());
    assert!(level.entity(player).is_some_and(|e| e.vehicle.is_none()));
    // Shoved along the direction of travel
    assert!(level.entity(player).is_some_and(|e| e.velocity.x > 0.0));
}

// ============================================================================
// Cart against cart
// ============================================================================

#[test]
fn head_on_carts_never_overlap_and_lose_speed() {
    let mut level = MockLevel::new();
    ew_line(&mut level, -10..=14);
    let mut a = moving_cart(&level, 1, 0.5, 0.2, MovementMode::Legacy);
    let mut b = moving_cart(&level, 2, 3.5, -0.2, MovementMode::Legacy);
    level.sync_cart(a.body());
    level.sync_cart(b.body());

    for _ in 0..60 {
        level.pull_cart(a.body_mut());
        a.tick(&mut level);
        level.sync_cart(a.body());

        level.pull_cart(b.body_mut());
        b.tick(&mut level);
        level.sync_cart(b.body());

        assert!(
            !overlapping(&a, &b),
            "carts overlap at {:?} and {:?}",
            a.body().motion.position,
            b.body().motion.position
        );
    }

    assert!(a.body().motion.position.x < b.body().motion.position.x);
    assert!(a.body().motion.velocity.length() < 0.1);
    assert!(b.body().motion.velocity.length() < 0.1);
}

#[test]
fn stationary_cart_blocks_continuous_cart() {
    let mut level = MockLevel::new();
    ew_line(&mut level, -4..=16);
    let parked = moving_cart(&level, 2, 4.5, 0.0, MovementMode::Continuous);
    level.sync_cart(parked.body());
    let mut cart = moving_cart(&level, 1, 0.5, 0.3, MovementMode::Continuous);

    for _ in 0..30 {
        level.pull_cart(cart.body_mut());
        cart.tick(&mut level);
        level.sync_cart(cart.body());
        assert!(!overlapping(&cart, &parked));
    }

    // The parked cart was shoved east by the impact
    assert!(level.entity(EntityId(2)).is_some_and(|e| e.velocity.x > 0.0));
}
