//! Distances from the base, one per cloud point.

/// Shortest-path distance of every point from the base.
///
/// Indexed like the cloud it was computed for. Points the base never reached
/// hold `f64::INFINITY`; [`get`](Self::get) and [`to_options`](Self::to_options)
/// turn those into `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceField {
    distances: Vec<f64>,
}

impl DistanceField {
    /// A field of `point_count` points, none of them reached yet.
    #[must_use]
    pub fn unreached(point_count: usize) -> Self {
        Self {
            distances: vec![f64::INFINITY; point_count],
        }
    }

    /// Wrap raw distances; non-finite values mean unreachable.
    #[must_use]
    pub const fn from_distances(distances: Vec<f64>) -> Self {
        Self { distances }
    }

    /// Distance of a point, infinite when unreached or out of range.
    #[inline]
    #[must_use]
    pub fn distance(&self, point: usize) -> f64 {
        self.distances.get(point).copied().unwrap_or(f64::INFINITY)
    }

    /// Distance of a point if the base reached it.
    #[inline]
    #[must_use]
    pub fn get(&self, point: usize) -> Option<f64> {
        self.distances.get(point).copied().filter(|d| d.is_finite())
    }

    /// Record a distance. Out-of-range indices are ignored.
    #[inline]
    pub fn set(&mut self, point: usize, distance: f64) {
        if let Some(slot) = self.distances.get_mut(point) {
            *slot = distance;
        }
    }

    /// Number of points covered.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    /// True for a field over no points.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    /// `(point, distance)` pairs for every reached point, in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.distances
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, d)| d.is_finite())
    }

    /// Per-point distances, `None` for unreached points.
    #[must_use]
    pub fn to_options(&self) -> Vec<Option<f64>> {
        (0..self.len()).map(|i| self.get(i)).collect()
    }

    /// Largest finite distance; 0 when only the base, or nothing, was reached.
    #[must_use]
    pub fn max_distance(&self) -> f64 {
        self.distances
            .iter()
            .copied()
            .filter(|d| d.is_finite())
            .fold(0.0, f64::max)
    }

    /// Number of reached points.
    #[must_use]
    pub fn reachable_count(&self) -> usize {
        self.distances.iter().filter(|d| d.is_finite()).count()
    }

    /// Indices of the points the base never reached.
    #[must_use]
    pub fn unreachable(&self) -> Vec<usize> {
        (0..self.len()).filter(|&i| self.get(i).is_none()).collect()
    }

    /// The reached point farthest from the base, lowest index on ties.
    #[must_use]
    pub fn farthest_point(&self) -> Option<(usize, f64)> {
        self.distances
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, d)| d.is_finite())
            .fold(None, |best, (i, d)| match best {
                Some((_, top)) if top >= d => best,
                _ => Some((i, d)),
            })
    }

    /// Distances divided by [`max_distance`](Self::max_distance).
    ///
    /// Unreached points stay infinite. When the maximum is 0 the field is
    /// returned as is.
    #[must_use]
    pub fn normalised(&self) -> Self {
        let max = self.max_distance();
        if max <= 0.0 {
            return self.clone();
        }
        Self {
            distances: self
                .distances
                .iter()
                .map(|&d| if d.is_finite() { d / max } else { d })
                .collect(),
        }
    }
}

impl From<Vec<f64>> for DistanceField {
    fn from(distances: Vec<f64>) -> Self {
        Self::from_distances(distances)
    }
}
