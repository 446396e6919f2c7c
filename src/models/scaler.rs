//! Age scaler fitted during training

use serde::Deserialize;

/// Single-column scaler applied to the age feature.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AgeScaler {
    /// Standardization: `(x - mean) / scale`
    Standard { mean: f64, scale: f64 },
    /// Min-max normalization into `feature_range`
    MinMax {
        data_min: f64,
        data_max: f64,
        #[serde(default = "default_feature_range")]
        feature_range: [f64; 2],
    },
}

fn default_feature_range() -> [f64; 2] {
    [0.0, 1.0]
}

impl AgeScaler {
    /// Scale a raw age value.
    pub fn transform(&self, age: f64) -> f64 {
        match *self {
            AgeScaler::Standard { mean, scale } => (age - mean) / non_zero(scale),
            AgeScaler::MinMax {
                data_min,
                data_max,
                feature_range: [lo, hi],
            } => {
                let unit = (age - data_min) / non_zero(data_max - data_min);
                unit * (hi - lo) + lo
            }
        }
    }

    /// Reject parameters that would make every transform non-finite.
    pub fn check(&self) -> Result<(), String> {
        let params: &[f64] = match self {
            AgeScaler::Standard { mean, scale } => &[*mean, *scale],
            AgeScaler::MinMax {
                data_min,
                data_max,
                feature_range,
            } => &[*data_min, *data_max, feature_range[0], feature_range[1]],
        };
        if params.iter().any(|p| !p.is_finite()) {
            return Err("scaler parameters must be finite".to_string());
        }
        if let AgeScaler::MinMax {
            data_min, data_max, ..
        } = self
        {
            if data_max < data_min {
                return Err(format!(
                    "data_max ({data_max}) is smaller than data_min ({data_min})"
                ));
            }
        }
        Ok(())
    }
}

// Constant columns are fitted with a unit scale.
fn non_zero(scale: f64) -> f64 {
    if scale == 0.0 {
        1.0
    } else {
        scale
    }
}
