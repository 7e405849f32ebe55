//! Core types for tree skeleton extraction.
//!
//! This crate provides the data model shared by the skeleton pipeline:
//!
//! - [`CloudPoint`] - A surface sample with optional downsampling flags
//! - [`TreeCloud`] - An ordered cloud of points; a point's index is its position
//! - [`AugmentedCloud`] - Per-point attributes assigned by the pipeline
//! - [`SkeletonNode`] - One branch cross-section summarised as a centre
//! - [`NodeTable`] - The ordered table of skeleton nodes
//! - [`PointIndex`] - R-tree neighbour queries over point coordinates
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**. It can be used in:
//! - CLI tools
//! - Web applications (WASM)
//! - Servers
//! - Python bindings
//!
//! # Units
//!
//! This library is **unit-agnostic**. All coordinates are `f64`; distances,
//! bin widths and clustering radii are expected in the same units as the cloud
//! (metres for typical terrestrial laser scans).
//!
//! # Coordinate System
//!
//! Uses a **right-handed coordinate system** with Z up. The default base
//! point of a tree is its lowest point.
//!
//! # Example
//!
//! ```
//! use tree_types::{NodeTable, Point3, TreeCloud};
//!
//! let cloud = TreeCloud::from_coords(&[[0.0, 0.0, 0.0], [0.0, 0.0, 1.0]]);
//! assert_eq!(cloud.len(), 2);
//! assert_eq!(cloud.lowest_point(), Some(0));
//!
//! let mut table = NodeTable::new();
//! let id = table.push_node(0, 0, Point3::new(0.0, 0.0, 0.5), 0.5, 2);
//! assert_eq!(id, 0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod augmented;
mod node;
mod point;
mod spatial;

pub use augmented::{AugmentedCloud, PointAttributes};
pub use node::{NodeTable, SkeletonNode};
pub use point::{CloudPoint, TreeCloud};
pub use spatial::PointIndex;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
