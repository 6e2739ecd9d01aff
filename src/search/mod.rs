//! Candidate search
//!
//! - [`resolver`]: splits a surviving path into free digits, pinned digits and checks
//! - [`generator`]: odometer over the free digits
//! - [`driver`]: runs the odometer, completes each candidate and keeps the extremes
//!
//! Each survivor is scanned independently and the extremes are merged, so a
//! feasible number is one that satisfies every condition of at least one path.

pub mod driver;
pub mod generator;
pub mod resolver;

pub use driver::{search, Extremes};
pub use resolver::ResolutionPlan;
