//! Slicing and clustering parameters and presets.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{invalid, SliceResult};

/// Parameters for the slice width schedule.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BinParams {
    /// Steepness of the width curve; 0 gives uniform `maxbin` widths.
    pub exponent: f64,

    /// Narrowest slice, reached at the far end of the tree.
    pub minbin: f64,

    /// Widest slice, used at the base.
    pub maxbin: f64,

    /// Bin count the search starts from.
    pub initial_bins: usize,

    /// Search steps before giving up.
    pub max_iterations: usize,
}

impl Default for BinParams {
    fn default() -> Self {
        Self {
            exponent: 2.0,
            minbin: 0.005,
            maxbin: 0.02,
            initial_bins: 50,
            max_iterations: 100_000,
        }
    }
}

impl BinParams {
    /// Equal-width slices of `width`.
    #[must_use]
    pub fn uniform(width: f64) -> Self {
        Self {
            exponent: 0.0,
            minbin: width,
            maxbin: width,
            ..Default::default()
        }
    }

    /// Coarser slices for large or sparsely sampled trees.
    #[must_use]
    pub fn coarse() -> Self {
        Self {
            minbin: 0.02,
            maxbin: 0.1,
            ..Default::default()
        }
    }

    /// Set the width range.
    #[must_use]
    pub const fn with_widths(mut self, minbin: f64, maxbin: f64) -> Self {
        self.minbin = minbin;
        self.maxbin = maxbin;
        self
    }

    /// Set the curve exponent.
    #[must_use]
    pub const fn with_exponent(mut self, exponent: f64) -> Self {
        self.exponent = exponent;
        self
    }

    /// Set the search budget.
    #[must_use]
    pub const fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Check that the parameters describe a usable width range.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::InvalidParameter`](crate::SliceError::InvalidParameter)
    /// if a width is not finite and positive, `minbin > maxbin`, the exponent
    /// is not finite, or a count is zero.
    pub fn validate(&self) -> SliceResult<()> {
        if !self.minbin.is_finite() || self.minbin <= 0.0 {
            return Err(invalid(format!("minbin must be finite and > 0 (got {})", self.minbin)));
        }
        if !self.maxbin.is_finite() || self.maxbin < self.minbin {
            return Err(invalid(format!(
                "maxbin must be finite and >= minbin {} (got {})",
                self.minbin, self.maxbin
            )));
        }
        if !self.exponent.is_finite() {
            return Err(invalid(format!("exponent must be finite (got {})", self.exponent)));
        }
        if self.initial_bins == 0 {
            return Err(invalid("initial_bins must be at least 1"));
        }
        if self.max_iterations == 0 {
            return Err(invalid("max_iterations must be at least 1"));
        }
        Ok(())
    }
}

/// How the clustering radius is chosen for each slice.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EpsMode {
    /// The same radius for every slice.
    Fixed(f64),
    /// Half the width of the slice being clustered.
    HalfBinWidth,
}

impl EpsMode {
    /// Radius for a slice of the given width.
    #[must_use]
    pub fn radius(self, slice_width: f64) -> f64 {
        match self {
            Self::Fixed(eps) => eps,
            Self::HalfBinWidth => slice_width / 2.0,
        }
    }
}

impl Default for EpsMode {
    fn default() -> Self {
        Self::Fixed(0.02)
    }
}

/// Parameters for per-slice clustering.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClusterParams {
    /// Neighbourhood radius under the Chebyshev metric, inclusive.
    pub eps: EpsMode,

    /// Fewest points a slice or a cluster needs to produce a node.
    pub min_pts: usize,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            eps: EpsMode::default(),
            min_pts: 10,
        }
    }
}

impl ClusterParams {
    /// Set a fixed clustering radius.
    #[must_use]
    pub const fn with_eps(mut self, eps: f64) -> Self {
        self.eps = EpsMode::Fixed(eps);
        self
    }

    /// Set the radius mode.
    #[must_use]
    pub const fn with_eps_mode(mut self, eps: EpsMode) -> Self {
        self.eps = eps;
        self
    }

    /// Set the minimum point count.
    #[must_use]
    pub const fn with_min_pts(mut self, min_pts: usize) -> Self {
        self.min_pts = min_pts;
        self
    }

    /// Check the clustering parameters.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::InvalidParameter`](crate::SliceError::InvalidParameter)
    /// if a fixed radius is negative or not finite, or `min_pts` is zero.
    pub fn validate(&self) -> SliceResult<()> {
        if let EpsMode::Fixed(eps) = self.eps {
            if !eps.is_finite() || eps < 0.0 {
                return Err(invalid(format!("eps must be finite and >= 0 (got {eps})")));
            }
        }
        if self.min_pts == 0 {
            return Err(invalid("min_pts must be at least 1"));
        }
        Ok(())
    }
}
