//! Skeleton extraction from single-tree point clouds.
//!
//! This umbrella crate runs the full pipeline and re-exports the tree-*
//! crates it is built from. Given a cloud of surface samples of one tree it
//! produces an ordered table of skeleton nodes, one per branch cross-section,
//! and a copy of the cloud in which every point knows its distance from the
//! base, its slice and its node.
//!
//! # Quick Start
//!
//! ```
//! use tree_skeleton::prelude::*;
//!
//! // A one-metre stem sampled as rings of 12 points
//! let mut coords = Vec::new();
//! for ring in 0..100 {
//!     for k in 0..12 {
//!         let a = f64::from(k) * std::f64::consts::TAU / 12.0;
//!         coords.push([0.01 * a.cos(), 0.01 * a.sin(), f64::from(ring) * 0.01]);
//!     }
//! }
//! let cloud = TreeCloud::from_coords(&coords);
//!
//! let skeleton = build_skeleton(&cloud, &SkeletonParams::default()).unwrap();
//! let root = skeleton.root().unwrap();
//! assert!(root.cz() < 0.02);
//! ```
//!
//! # Pipeline
//!
//! 1. [`geodesic`] - shortest-path distance of every point from the base
//!    over a repaired k-nearest-neighbour graph
//! 2. [`slice`] - slice widths shrinking away from the base; slice id per point
//! 3. [`slice`] - per-slice Chebyshev clustering into cross-sections, one
//!    node per cluster with enough points
//! 4. [`slice`] - the base slice's nodes merged into a single root
//!
//! # Module Organization
//!
//! - [`types`] - Core data structures: `TreeCloud`, `SkeletonNode`, `NodeTable`
//! - [`geodesic`] - Neighbour graph, connectivity repair, distance field
//! - [`slice`] - Slice schedule, clustering, base merging
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**. It can be used in:
//! - CLI tools
//! - Web applications (WASM)
//! - Servers
//! - Python bindings
//!
//! # Feature Flags
//!
//! - `serde` - `Serialize`/`Deserialize` for parameters, nodes and clouds

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod error;
mod params;
mod pipeline;

pub use error::{SkeletonError, SkeletonResult};
pub use params::SkeletonParams;
pub use pipeline::{build_skeleton, PipelineStage, Skeleton, Skeletonizer};

// =============================================================================
// Re-exports
// =============================================================================

/// Core data structures: `TreeCloud`, `SkeletonNode`, `NodeTable`.
pub use tree_types as types;

/// Neighbour graph, connectivity repair and distance field.
pub use tree_geodesic as geodesic;

/// Slice schedule, per-slice clustering and base merging.
pub use tree_slice as slice;

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for skeleton extraction.
///
/// # Usage
///
/// ```
/// use tree_skeleton::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use tree_types::{AugmentedCloud, CloudPoint, NodeTable, Point3, SkeletonNode, TreeCloud};

    // Parameters
    pub use tree_geodesic::{ConnectivityPolicy, GraphParams};
    pub use tree_slice::{BinParams, ClusterParams, EpsMode};

    // Pipeline
    pub use crate::{build_skeleton, Skeleton, SkeletonError, SkeletonParams, Skeletonizer};
}

// =============================================================================
// Tests
// =============================================================================
