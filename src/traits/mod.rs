//! Trait definitions for world access and motion strategies.
//!
//! This module defines the seams that keep railcart independent of any
//! particular game engine:
//! - Read rails and block properties from whatever world representation
//! - Resolve collisions and entity pushes through the host
//! - Swap the per-tick motion algorithm without touching the cart
//!
//! # Submodules
//!
//! - `world`: Rail lookup and collision resolution
//! - `entities`: Nearby entity queries, mounting and impulses
//! - `motion`: The per-tick motion strategy
//!
//! # World Access
//!
//! The key world traits are:
//!
//! - [`RailLookup`]: Rail shape, power state, conductors and water
//! - [`Collider`]: Free-body movement against solid blocks
//! - [`EntityAccess`]: Entities near a cart
//! - [`Level`]: All three at once
//!
//! # Motion Strategies
//!
//! Cart movement uses the [`MotionStrategy`] trait, implemented by
//! [`LegacyMotion`](crate::motion::LegacyMotion) and
//! [`ContinuousMotion`](crate::motion::ContinuousMotion).

pub mod entities;
pub mod motion;
pub mod world;

pub use entities::*;
pub use motion::*;
pub use world::*;
