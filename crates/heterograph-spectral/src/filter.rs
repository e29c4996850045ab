//! Spectral band filtering of node features.
//!
//! Features are projected onto the Laplacian eigenbasis (`C = Uᵀ X`, one row
//! per frequency), a contiguous band of rows is zeroed, and the remainder is
//! projected back (`X' = U C'`). With `k < N` eigenvectors the reconstruction is
//! a projection onto span(U), so even the full band does not return `X`
//! itself.

use ndarray::{s, Array2};
use std::fmt;
use std::str::FromStr;

use crate::error::SpectralError;
use crate::spectrum::Spectrum;

/// Which end of the spectrum to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterMode {
    /// Keep the `cutoff` lowest-frequency components (rows `[0, cutoff)`).
    Low,
    /// Keep the components from `cutoff` upwards (rows `[cutoff, k)`).
    High,
}

impl FilterMode {
    /// Both modes, low first.
    pub const ALL: [FilterMode; 2] = [FilterMode::Low, FilterMode::High];

    /// Lower-case name as accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            FilterMode::Low => "low",
            FilterMode::High => "high",
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterMode {
    type Err = SpectralError;

    /// Accepts exactly `low` or `high`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(FilterMode::Low),
            "high" => Ok(FilterMode::High),
            other => Err(SpectralError::InvalidMode(other.to_string())),
        }
    }
}

/// Reconstruct `features` from one band of its spectral coefficients.
///
/// `features` is `N x F`; the result has the same shape. `cutoff = 0` in
/// [`FilterMode::Low`] and `cutoff = k` in [`FilterMode::High`] both return
/// the zero matrix.
///
/// # Errors
///
/// - [`SpectralError::ShapeMismatch`] if `features` has a different row count
///   than the eigenvectors.
/// - [`SpectralError::InvalidCutoff`] if `cutoff > k`.
pub fn filter(
    features: &Array2<f64>,
    spectrum: &Spectrum,
    mode: FilterMode,
    cutoff: usize,
) -> Result<Array2<f64>, SpectralError> {
    let u = spectrum.eigvecs();
    if features.nrows() != u.nrows() {
        return Err(SpectralError::shape_mismatch(format!(
            "features have {} rows, eigenvectors have {}",
            features.nrows(),
            u.nrows()
        )));
    }
    let k = spectrum.k();
    if cutoff > k {
        return Err(SpectralError::InvalidCutoff { cutoff, k });
    }

    let mut coeffs = u.t().dot(features);
    match mode {
        FilterMode::Low => coeffs.slice_mut(s![cutoff.., ..]).fill(0.0),
        FilterMode::High => coeffs.slice_mut(s![..cutoff, ..]).fill(0.0),
    }
    Ok(u.dot(&coeffs))
}

/// [`filter`] with the mode given by name.
///
/// # Errors
///
/// [`SpectralError::InvalidMode`] for any name other than `low` or `high`,
/// plus the errors of [`filter`].
pub fn filter_named(
    features: &Array2<f64>,
    spectrum: &Spectrum,
    mode: &str,
    cutoff: usize,
) -> Result<Array2<f64>, SpectralError> {
    filter(features, spectrum, mode.parse()?, cutoff)
}
