//! Volume banding.
//!
//! # Pipeline
//!
//! ```text
//! [Some(812.4), None, Some(12_050.0)]
//!   ① median fill   → [812.4, 6431.2, 12050.0]
//!   ② round (ties to even) → [812, 6431, 12050]
//!   ③ classify into half-open bands over the edges
//!        [0,1000) [1000,5000) [5000,10000) [10000,∞)
//! ```
//!
//! Band `i` of `n` takes colour `palette[i * palette.len() / n]`, spreading
//! the bands evenly across the palette from light to dark.

use log::debug;

use ev_core::BinConfig;

use crate::{BinError, BinResult};

/// One half-open volume band `[lower, upper)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Band {
    pub lower: f64,
    /// `None` for the last, unbounded band.
    pub upper: Option<f64>,
    pub color: String,
    /// Legend text, e.g. `">=1000 to <5000"` or `">=10000"`.
    pub label: String,
}

/// A rounded volume and the index of its band.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BinnedVolume {
    pub volume: i64,
    pub band:   usize,
}

/// Classifies volumes into ordered bands.  Construct once per run.
#[derive(Clone, Debug)]
pub struct VolumeBinner {
    edges: Vec<f64>,
    bands: Vec<Band>,
}

impl VolumeBinner {
    /// Build bands from lower `edges` (strictly increasing) and a palette.
    pub fn new(edges: Vec<f64>, palette: Vec<String>) -> BinResult<Self> {
        let increasing = edges.windows(2).all(|w| w[0] < w[1]);
        if edges.is_empty() || !increasing || edges.iter().any(|e| !e.is_finite()) {
            return Err(BinError::InvalidEdges(edges));
        }
        if palette.is_empty() {
            return Err(BinError::EmptyPalette);
        }

        let n = edges.len();
        let bands = edges
            .iter()
            .enumerate()
            .map(|(i, &lower)| {
                let upper = edges.get(i + 1).copied();
                let label = match upper {
                    Some(u) => format!(">={lower} to <{u}"),
                    None => format!(">={lower}"),
                };
                Band {
                    lower,
                    upper,
                    color: palette[i * palette.len() / n].clone(),
                    label,
                }
            })
            .collect();

        Ok(Self { edges, bands })
    }

    pub fn from_config(config: &BinConfig) -> BinResult<Self> {
        Self::new(config.edges.clone(), config.palette.clone())
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    /// Legend strings, one per band, in band order.
    pub fn labels(&self) -> Vec<&str> {
        self.bands.iter().map(|b| b.label.as_str()).collect()
    }

    /// Index of the band containing `value`.
    ///
    /// Total: values below the first edge land in the first band, and a
    /// value equal to an edge lands in the band that edge opens.
    pub fn classify(&self, value: f64) -> usize {
        self.edges.partition_point(|&e| e <= value).saturating_sub(1)
    }

    pub fn band_of(&self, value: f64) -> &Band {
        &self.bands[self.classify(value)]
    }

    /// Median-fill, round, and classify every value.  Output is parallel to
    /// `values`.
    pub fn bin(&self, values: &[Option<f64>]) -> Vec<BinnedVolume> {
        let filled = median_fill(values);
        let binned: Vec<BinnedVolume> = filled
            .into_iter()
            .map(|v| {
                let rounded = v.round_ties_even();
                BinnedVolume { volume: rounded as i64, band: self.classify(rounded) }
            })
            .collect();

        if log::log_enabled!(log::Level::Debug) {
            let mut counts = vec![0usize; self.bands.len()];
            for b in &binned {
                counts[b.band] += 1;
            }
            for (band, count) in self.bands.iter().zip(counts) {
                debug!("band {:<18} {count} rows", band.label);
            }
        }
        binned
    }
}

/// Median of the observed (non-missing, non-NaN) values.
///
/// Even counts average the two middle values.  `None` when nothing is
/// observed.
pub fn median(values: &[Option<f64>]) -> Option<f64> {
    let mut observed: Vec<f64> = values.iter().flatten().copied().filter(|v| !v.is_nan()).collect();
    if observed.is_empty() {
        return None;
    }
    observed.sort_by(f64::total_cmp);
    let mid = observed.len() / 2;
    Some(if observed.len() % 2 == 0 {
        (observed[mid - 1] + observed[mid]) / 2.0
    } else {
        observed[mid]
    })
}

/// Replace missing values with the median of the observed ones (0 when
/// nothing is observed).  Idempotent.
pub fn median_fill(values: &[Option<f64>]) -> Vec<f64> {
    let fill = median(values).unwrap_or(0.0);
    values
        .iter()
        .map(|v| match v {
            Some(x) if !x.is_nan() => *x,
            _ => fill,
        })
        .collect()
}
