//!Structural features of sparse linear and mixed-integer programs.
//!
//!A problem is turned into a fixed-length vector of numbers describing the
//!shape of its constraints (packing, covering, knapsack, flow rows, ...),
//!the distribution of its coefficients and its sparsity.
//!This vector is meant to feed a classifier or an algorithm selector.
//!
//!# Example
//!
//!```rust
//!extern crate mip_features;
//!
//!use mip_features::*;
//!
//!pub fn main() {
//!    init_default_log();
//!
//!    // Three binary variables.
//!    let mut builder = ProblemBuilder::new();
//!    let _ = builder.add_columns(3, 1., VarType::Binary);
//!
//!    // x0 + x1 + x2 ≤ 1
//!    builder
//!        .add_row(Sense::LessEqual, 1., &[(0, 1.), (1, 1.), (2, 1.)])
//!        .unwrap();
//!    // 2 x0 + 3 x1 + 4 x2 ≤ 5
//!    builder
//!        .add_row(Sense::LessEqual, 5., &[(0, 2.), (1, 3.), (2, 4.)])
//!        .unwrap();
//!    let pb = builder.build();
//!
//!    let features = compute(&pb);
//!    assert_eq!(features[Feature::RowsPacking], 1.);
//!    assert_eq!(features[Feature::RowsKnapsack], 1.);
//!    assert_eq!(features[Feature::PercRowsKnapsack], 50.);
//!
//!    for (name, value) in features.named(FeatureTable::standard()) {
//!        println!("{name}: {value}");
//!    }
//!}
//!```
//!

#![warn(
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    //unused_qualifications,
    unused_labels,
    //unused_results
)]

pub mod columns;
pub mod compute;
pub use crate::compute::compute;
pub mod feature;
pub use crate::feature::{Feature, FeatureTable, FeatureVector};
pub mod histogram;
pub mod model;
pub use crate::model::{ModelError, ProblemBuilder, ProblemModel, Sense, SparseProblem, VarType};
pub mod rows;
pub use crate::rows::{RowPattern, classify_row};
pub mod snapshot;
pub mod summary;

#[macro_use]
extern crate serde_derive;

use log::LevelFilter;

fn init_log(level: LevelFilter) {
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .format_target(false)
        .try_init();
}
/// Log to the terminal from level `Info`.
pub fn init_default_log() {
    init_log(LevelFilter::Info)
}
/// Log to the terminal from level `Trace`.
pub fn init_debug_log() {
    init_log(LevelFilter::Trace)
}
