//! Series derivation from daily records.
//!
//! Every function here is a total, pure transformation over in-memory data:
//! records are filtered by region, grouped by date, reduced to points, and
//! then differenced, smoothed or accumulated before being assembled into
//! labeled chart groups.

pub mod accumulate;
pub mod assemble;
pub mod diff;
pub mod dose;
pub mod group;
pub mod series;
pub mod sma;
pub mod types;
