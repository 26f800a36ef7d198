use serde::{Deserialize, Serialize};

/// Inbound body for both siting endpoints. `location` names a French place;
/// `model_id` optionally overrides the configured model for this call.
#[derive(Debug, Clone, Deserialize)]
pub struct LocationRequest {
    pub location: String,
    #[serde(default)]
    pub model_id: Option<String>,
}

/// Suitability weights for datacenter siting along three dimensions.
/// Invariant after `normalized()`: each weight lies in [0, 1] and the three
/// weights sum to 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub grid_weight: f64,
    pub water_weight: f64,
    pub elevation_weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
}

/// How far the raw weight sum may drift from 1.0 before we reject instead
/// of rescaling.
const SUM_TOLERANCE: f64 = 0.1;

impl ScoreResponse {
    /// Enforces the weight invariants on model output. Each weight must be
    /// finite and within [0, 1]; the sum must land within `1.0 ± SUM_TOLERANCE`
    /// and is rescaled to exactly 1.0. Anything else is a conformance failure.
    pub fn normalized(self) -> Result<Self, String> {
        for (name, value) in [
            ("grid_weight", self.grid_weight),
            ("water_weight", self.water_weight),
            ("elevation_weight", self.elevation_weight),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(format!("{name} out of range [0, 1]: {value}"));
            }
        }

        let sum = self.grid_weight + self.water_weight + self.elevation_weight;
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            return Err(format!("weights sum to {sum}, expected 1.0"));
        }

        Ok(ScoreResponse {
            grid_weight: self.grid_weight / sum,
            water_weight: self.water_weight / sum,
            elevation_weight: self.elevation_weight / sum,
            rationale: self.rationale,
        })
    }
}

/// Sourced findings about installing a datacenter at the requested location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InformationResponse {
    pub legislation: String,
    pub construction_challenges: String,
    pub environmental_factors: String,
}
