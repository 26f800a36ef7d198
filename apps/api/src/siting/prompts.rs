//! Prompt builders for the siting endpoints. Pure string construction —
//! geographic validity is the model's judgment, not ours; empty input is
//! rejected upstream by the handlers.

use crate::siting::schema::OutputSchema;

/// Builds the instruction for the grid/water/elevation weighting assessment.
/// Deterministic: same location and schema, same prompt.
pub fn build_score_prompt(location: &str, schema: &OutputSchema) -> String {
    format!(
        "I want to build a data center in {location}, France.\n\
         I need to assign a weight to the value of grid, water and elevation.\n\
         Make a small model. Make sure the sum is 1.\n\
         Match this json schema: {json_schema}\n\
         Return only JSON that matches the schema. If you compute intermediate \
         things, do not include them - just the final JSON.\n\
         Record the final object with the `{tool}` tool.",
        location = location,
        json_schema = schema.json_schema,
        tool = schema.name,
    )
}

/// Builds the instruction for the legislation/construction/environment report.
pub fn build_info_prompt(location: &str, schema: &OutputSchema) -> String {
    format!(
        "I am a foreigner who wants to install a data center in France.\n\
         I heard some things about France.\n\
         Location can be tough due to people being \"not in my backyard\".\n\
         Installation can be tough due to regulatory issues.\n\
         My team has mapped {location} as the place for installation of that data center.\n\
         Fill this data in the following json schema: {json_schema}\n\
         When it comes to the data, it needs to be sourced. Do not state a \
         \"potential risk\", state a risk that has occurred for similar projects.\n\
         Record the final object with the `{tool}` tool.",
        location = location,
        json_schema = schema.json_schema,
        tool = schema.name,
    )
}
