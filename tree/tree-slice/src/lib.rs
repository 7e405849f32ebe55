//! Distance slicing, per-slice clustering and base merging.
//!
//! Given the distance of every point from the tree's base, this crate turns
//! the cloud into skeleton nodes:
//!
//! - **Slice schedule** - slice widths that shrink from `maxbin` at the base
//!   to `minbin` at the tips and just cover the largest distance
//! - **Slice clustering** - each slice split into branch cross-sections with
//!   a pluggable [`SliceClustering`], by default [`ChebyshevDbscan`]
//! - **Base merging** - multiple cross-sections in the first slice collapsed
//!   into a single root node
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**. It can be used in:
//! - CLI tools
//! - Web applications (WASM)
//! - Servers
//! - Python bindings
//!
//! # Example
//!
//! ```
//! use tree_slice::{
//!     assign_slices, cluster_slices, merge_base_nodes, schedule_bins, BinParams,
//!     ChebyshevDbscan, ClusterParams,
//! };
//! use tree_types::Point3;
//!
//! // A vertical stem sampled every 2 mm; distance equals height
//! let positions: Vec<Point3<f64>> = (0..500)
//!     .map(|i| Point3::new(0.0, 0.0, f64::from(i) * 0.002))
//!     .collect();
//! let distances: Vec<Option<f64>> = positions.iter().map(|p| Some(p.z)).collect();
//!
//! let schedule = schedule_bins(0.998, &BinParams::default()).unwrap();
//! let slices = assign_slices(&distances, &schedule);
//! let clusters = cluster_slices(
//!     &positions,
//!     &distances,
//!     &slices,
//!     &schedule,
//!     &ClusterParams::default().with_min_pts(2),
//!     &ChebyshevDbscan,
//! )
//! .unwrap();
//! let merged = merge_base_nodes(clusters.table);
//!
//! assert_eq!(merged.table.in_slice(0).count(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod cluster;
mod error;
mod merge;
mod params;
mod schedule;

pub use cluster::{cluster_slices, ChebyshevDbscan, ClusterOutput, SliceClustering, SliceDiagnostic};
pub use error::{SliceError, SliceResult};
pub use merge::{merge_base_nodes, MergeOutcome};
pub use params::{BinParams, ClusterParams, EpsMode};
pub use schedule::{assign_slices, schedule_bins, BinSchedule};
