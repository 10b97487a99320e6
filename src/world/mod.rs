//! World implementations.
//!
//! This module contains concrete implementations of the traits defined in
//! [`crate::traits`]. Hosts embedding railcart bring their own; the in-memory
//! [`MockLevel`] drives the tests, the doc examples and the `rail_sim` binary.

pub mod mock;

pub use mock::*;
