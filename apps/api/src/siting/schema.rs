//! Output schemas handed to the provider as forced-tool input schemas.
//! The provider constrains its own output against these, so the structured
//! result arrives as the tool invocation's `input` object.

use serde_json::{json, Value};

/// A machine-readable description of the structured output we expect back.
/// Submitted to the provider as a tool definition.
#[derive(Debug, Clone)]
pub struct OutputSchema {
    pub name: &'static str,
    pub description: &'static str,
    pub json_schema: Value,
}

/// Schema for the grid/water/elevation weighting assessment.
pub fn score_schema() -> OutputSchema {
    OutputSchema {
        name: "record_scores",
        description: "Record the final grid/water/elevation weights for the datacenter site.",
        json_schema: json!({
            "type": "object",
            "properties": {
                "grid_weight": {
                    "type": "number",
                    "description": "Weight of electrical grid access quality, between 0 and 1"
                },
                "water_weight": {
                    "type": "number",
                    "description": "Weight of water availability for cooling, between 0 and 1"
                },
                "elevation_weight": {
                    "type": "number",
                    "description": "Weight of elevation and flood risk, between 0 and 1"
                },
                "rationale": {
                    "type": "string",
                    "description": "Optional short justification of the weighting"
                }
            },
            "required": ["grid_weight", "water_weight", "elevation_weight"],
            "additionalProperties": false
        }),
    }
}

/// Schema for the legislation/construction/environment report.
pub fn information_schema() -> OutputSchema {
    OutputSchema {
        name: "record_information",
        description: "Record the sourced findings about installing a datacenter at the site.",
        json_schema: json!({
            "type": "object",
            "properties": {
                "legislation": {
                    "type": "string",
                    "description": "Applicable French legislation and regulatory constraints"
                },
                "construction_challenges": {
                    "type": "string",
                    "description": "Construction challenges and local opposition observed for similar projects"
                },
                "environmental_factors": {
                    "type": "string",
                    "description": "Environmental factors and incidents documented for similar projects"
                }
            },
            "required": ["legislation", "construction_challenges", "environmental_factors"],
            "additionalProperties": false
        }),
    }
}
