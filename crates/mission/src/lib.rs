//! Conceptual sizing of a fixed-wing aircraft against a mission profile.
//!
//! The pieces nest: [`segment`] models compute per-phase fuel fractions and
//! required thrust-to-weight, [`profile`] chains the fractions through the
//! mission, [`constraint`] envelopes the thrust requirements over wing
//! loading, and [`convergence`] closes the (WSR, TWR) and takeoff-weight
//! loops. [`size_aircraft`] runs the whole chain.

pub mod aircraft;
pub mod builder;
pub mod constraint;
pub mod context;
pub mod convergence;
pub mod error;
pub mod profile;
pub mod report;
pub mod segment;

mod facade;

pub use facade::*;
