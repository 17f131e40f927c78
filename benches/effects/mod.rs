//! Effect-node benchmarks.
//!
//! These go through the same path a host does: factory, then `process` on a
//! channel slice sized to the node's layout.

mod nodes;

pub use nodes::bench_effects;
