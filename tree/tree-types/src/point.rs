//! Point cloud types.

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single surface sample of a tree.
///
/// Besides its position a point may carry two flags written by an external
/// downsampler:
/// - `downsample`: the point was kept as the representative of its voxel
/// - `voxel_id`: identifier of the voxel the point falls into
///
/// When a cloud carries downsample flags, the distance graph is built over the
/// flagged points only and the remaining points inherit the distance of the
/// representative sharing their voxel.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CloudPoint {
    /// The 3D position of the point.
    pub position: Point3<f64>,

    /// Representative flag assigned by a downsampler.
    pub downsample: Option<bool>,

    /// Voxel identifier assigned by a downsampler.
    pub voxel_id: Option<u64>,
}

impl CloudPoint {
    /// Creates a new point with just a position.
    ///
    /// # Example
    ///
    /// ```
    /// use tree_types::{CloudPoint, Point3};
    ///
    /// let point = CloudPoint::new(Point3::new(1.0, 2.0, 3.0));
    /// assert!(point.downsample.is_none());
    /// ```
    #[must_use]
    pub const fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            downsample: None,
            voxel_id: None,
        }
    }

    /// Creates a point from x, y, z coordinates.
    #[must_use]
    pub const fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self::new(Point3::new(x, y, z))
    }

    /// Creates a point carrying downsampler output.
    ///
    /// # Example
    ///
    /// ```
    /// use tree_types::{CloudPoint, Point3};
    ///
    /// let point = CloudPoint::with_voxel(Point3::new(0.0, 0.0, 0.0), 7, true);
    /// assert_eq!(point.voxel_id, Some(7));
    /// assert!(point.is_representative());
    /// ```
    #[must_use]
    pub const fn with_voxel(position: Point3<f64>, voxel_id: u64, downsample: bool) -> Self {
        Self {
            position,
            downsample: Some(downsample),
            voxel_id: Some(voxel_id),
        }
    }

    /// Returns true if the point was kept by the downsampler.
    #[must_use]
    pub fn is_representative(&self) -> bool {
        self.downsample == Some(true)
    }

    /// Position as a plain array, the layout spatial indices expect.
    #[inline]
    #[must_use]
    pub fn coords(&self) -> [f64; 3] {
        [self.position.x, self.position.y, self.position.z]
    }
}

/// An ordered point cloud of a single tree.
///
/// The index of a point is its position in [`TreeCloud::points`]; every
/// per-point output of the pipeline is indexed the same way.
///
/// # Example
///
/// ```
/// use tree_types::{Point3, TreeCloud};
///
/// let cloud = TreeCloud::from_positions(&[
///     Point3::new(0.0, 0.0, 0.3),
///     Point3::new(0.0, 0.0, 0.1),
/// ]);
/// assert_eq!(cloud.lowest_point(), Some(1));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TreeCloud {
    /// Points of the cloud.
    pub points: Vec<CloudPoint>,
}

impl TreeCloud {
    /// Creates an empty cloud.
    #[must_use]
    pub const fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Creates a cloud from positions.
    #[must_use]
    pub fn from_positions(positions: &[Point3<f64>]) -> Self {
        Self {
            points: positions.iter().copied().map(CloudPoint::new).collect(),
        }
    }

    /// Creates a cloud from `[x, y, z]` triples.
    #[must_use]
    pub fn from_coords(coords: &[[f64; 3]]) -> Self {
        Self {
            points: coords
                .iter()
                .map(|&[x, y, z]| CloudPoint::from_coords(x, y, z))
                .collect(),
        }
    }

    /// Adds a point at the given position.
    pub fn push(&mut self, position: Point3<f64>) {
        self.points.push(CloudPoint::new(position));
    }

    /// Number of points.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the cloud has no points.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Position of the point at `index`.
    #[inline]
    #[must_use]
    pub fn position(&self, index: usize) -> Option<Point3<f64>> {
        self.points.get(index).map(|p| p.position)
    }

    /// All positions, in point order.
    #[must_use]
    pub fn positions(&self) -> Vec<Point3<f64>> {
        self.points.iter().map(|p| p.position).collect()
    }

    /// Index of the point with minimum z; ties resolve to the lowest index.
    ///
    /// Returns `None` for an empty cloud.
    #[must_use]
    pub fn lowest_point(&self) -> Option<usize> {
        self.points
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (i, p)| match best {
                Some((_, z)) if z <= p.position.z => best,
                _ => Some((i, p.position.z)),
            })
            .map(|(i, _)| i)
    }

    /// Returns true if any point carries a downsample flag.
    #[must_use]
    pub fn is_downsampled(&self) -> bool {
        self.points.iter().any(|p| p.downsample.is_some())
    }

    /// Indices of the points that take part in graph construction.
    ///
    /// For a downsampled cloud these are the representatives, otherwise every
    /// point.
    #[must_use]
    pub fn graph_indices(&self) -> Vec<usize> {
        if self.is_downsampled() {
            self.points
                .iter()
                .enumerate()
                .filter(|(_, p)| p.is_representative())
                .map(|(i, _)| i)
                .collect()
        } else {
            (0..self.points.len()).collect()
        }
    }
}

impl FromIterator<Point3<f64>> for TreeCloud {
    fn from_iter<I: IntoIterator<Item = Point3<f64>>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().map(CloudPoint::new).collect(),
        }
    }
}
