// Farm area invariant: arable + vegetation never exceeds total
//
// Updates are partial, so missing fields fall back to the stored record before
// the invariant is evaluated. A farm record always carries all three areas,
// which means the check can always be decided once merged.

use crate::error::{AgroError, AgroResult};

/// The three area figures of a farm, in hectares
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FarmAreas {
    pub total_area: f64,
    pub arable_area: f64,
    pub vegetation_area: f64,
}

impl FarmAreas {
    pub fn new(total_area: f64, arable_area: f64, vegetation_area: f64) -> Self {
        FarmAreas {
            total_area,
            arable_area,
            vegetation_area,
        }
    }

    /// Apply a partial update; absent fields keep their current value
    pub fn merged(
        &self,
        total_area: Option<f64>,
        arable_area: Option<f64>,
        vegetation_area: Option<f64>,
    ) -> FarmAreas {
        FarmAreas {
            total_area: total_area.unwrap_or(self.total_area),
            arable_area: arable_area.unwrap_or(self.arable_area),
            vegetation_area: vegetation_area.unwrap_or(self.vegetation_area),
        }
    }

    pub fn used_area(&self) -> f64 {
        self.arable_area + self.vegetation_area
    }

    pub fn validate(&self) -> AgroResult<()> {
        check_areas(self.total_area, self.arable_area, self.vegetation_area)
    }
}

/// Fails with `InvalidArea` when any area is negative or not finite, or when
/// `arable + vegetation > total`. The boundary `sum == total` is accepted.
pub fn check_areas(total_area: f64, arable_area: f64, vegetation_area: f64) -> AgroResult<()> {
    let invalid = || AgroError::InvalidArea {
        total: total_area,
        arable: arable_area,
        vegetation: vegetation_area,
    };

    let values = [total_area, arable_area, vegetation_area];
    if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
        return Err(invalid());
    }

    if arable_area + vegetation_area > total_area {
        return Err(invalid());
    }

    Ok(())
}

/// Resolve a partial update against the stored areas (if any) and check the result.
///
/// Returns the merged areas. Without a stored record every field must be
/// supplied; an undeterminable field is rejected instead of skipping the check.
pub fn check_update(
    existing: Option<&FarmAreas>,
    total_area: Option<f64>,
    arable_area: Option<f64>,
    vegetation_area: Option<f64>,
) -> AgroResult<FarmAreas> {
    let merged = match existing {
        Some(current) => current.merged(total_area, arable_area, vegetation_area),
        None => match (total_area, arable_area, vegetation_area) {
            (Some(t), Some(a), Some(v)) => FarmAreas::new(t, a, v),
            _ => {
                return Err(AgroError::InvalidArea {
                    total: total_area.unwrap_or(f64::NAN),
                    arable: arable_area.unwrap_or(f64::NAN),
                    vegetation: vegetation_area.unwrap_or(f64::NAN),
                })
            }
        },
    };

    merged.validate()?;
    Ok(merged)
}
