//! Data collaborators for curvepick.
//!
//! - [`load`]: reads grid-aligned series tables and test points
//! - [`store`]: stores the raw tables and the matching/classification results
//!
//! Neither module is required by the matching crates; they only exchange plain
//! [`Series`](curvepick_core::Series), [`TestPoint`](curvepick_core::TestPoint),
//! and result values with them.

pub mod load;
pub mod store;
