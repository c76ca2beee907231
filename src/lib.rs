//! Conceptual fixed-wing aircraft sizing.
//!
//! The physics lives in the member crates; this library stitches them
//! together so front-ends (the `size_aircraft` CLI, tests) share one entry
//! point.

pub use sizing_aerodynamics as aerodynamics;
pub use sizing_atmosphere as atmosphere;
pub use sizing_config as config;
pub use sizing_core as core;
pub use sizing_export as export;
pub use sizing_mission as mission;
pub use sizing_propulsion as propulsion;

pub use sizing_mission::{SizingCase, SizingResult, size_aircraft};
