use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::consts::DEFAULT_MAX_PERCENT_REMOVED;
use crate::error::{FlocError, Result};
use crate::record::ParticleRecord;

/// Matching windows for the cross-run repeat search.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DedupConfig {
    /// Maximum center offset (pixels, per axis) for two records to match.
    #[serde(default)]
    pub position_radius: f64,
    /// Maximum contour-area difference (pixels) for two records to match.
    #[serde(default)]
    pub area_radius: f64,
    /// Removal percentage above which the run is reported dirty.
    #[serde(default = "default_max_percent_removed")]
    pub max_percent_removed: f64,
}

fn default_max_percent_removed() -> f64 {
    DEFAULT_MAX_PERCENT_REMOVED
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            position_radius: 0.0,
            area_radius: 0.0,
            max_percent_removed: DEFAULT_MAX_PERCENT_REMOVED,
        }
    }
}

impl DedupConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("position_radius", self.position_radius),
            ("area_radius", self.area_radius),
            ("max_percent_removed", self.max_percent_removed),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(FlocError::InvalidConfig(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }
        Ok(())
    }

    fn matches(&self, base: &ParticleRecord, other: &ParticleRecord) -> bool {
        let (bx, by) = base.center();
        let (ox, oy) = other.center();
        (ox - bx).abs() <= self.position_radius
            && (oy - by).abs() <= self.position_radius
            && (other.contour_area - base.contour_area).abs() <= self.area_radius
    }
}

/// Indices of records that repeat an earlier record, ascending.
///
/// Every record, flagged or not, serves as a comparison base for the
/// records after it, so matches chain through flagged records.
pub fn find_repeats(records: &[ParticleRecord], config: &DedupConfig) -> Vec<usize> {
    (1..records.len())
        .filter(|&j| {
            records[..j]
                .iter()
                .any(|base| config.matches(base, &records[j]))
        })
        .collect()
}

/// Result of removing repeated particles.
#[derive(Clone, Debug, PartialEq)]
pub struct DedupOutcome {
    pub kept: Vec<ParticleRecord>,
    /// Indices into the input of the removed records.
    pub removed: Vec<usize>,
    pub percent_removed: f64,
    /// More than `max_percent_removed` of the records were repeats.
    ///
    /// Strict: a share exactly at the limit is clean, unlike the legacy
    /// repeat-removal script, which compared with `>=`.
    pub dirty: bool,
}

/// Drop every record that repeats an earlier one, keeping first occurrences.
pub fn remove_repeats(records: &[ParticleRecord], config: &DedupConfig) -> DedupOutcome {
    let removed = find_repeats(records, config);
    let percent_removed = if records.is_empty() {
        0.0
    } else {
        100.0 * removed.len() as f64 / records.len() as f64
    };
    let dirty = percent_removed > config.max_percent_removed;

    let mut flagged = removed.iter().copied().peekable();
    let kept = records
        .iter()
        .enumerate()
        .filter(|(i, _)| {
            if flagged.peek() == Some(i) {
                flagged.next();
                false
            } else {
                true
            }
        })
        .map(|(_, r)| r.clone())
        .collect();

    info!(
        total = records.len(),
        removed = removed.len(),
        percent_removed,
        "Removed repeated particles"
    );
    if dirty {
        warn!(
            percent_removed,
            limit = config.max_percent_removed,
            "Repeat rate exceeds limit; the sample cell may be dirty"
        );
    }

    DedupOutcome {
        kept,
        removed,
        percent_removed,
        dirty,
    }
}
