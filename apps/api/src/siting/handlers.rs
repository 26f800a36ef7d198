//! Axum route handlers for the siting endpoints.
//!
//! Each request is stateless: validate, build the prompt, invoke the
//! provider with the declared output schema, return the typed result.

use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::models::assessment::{InformationResponse, LocationRequest, ScoreResponse};
use crate::provider::{invoke_as, ProviderError};
use crate::siting::prompts::{build_info_prompt, build_score_prompt};
use crate::siting::schema::{information_schema, score_schema};
use crate::state::AppState;

/// POST /score
///
/// Returns grid/water/elevation suitability weights for a datacenter at the
/// requested French location. The weights sum to 1 after normalization.
pub async fn handle_score(
    State(state): State<AppState>,
    Json(request): Json<LocationRequest>,
) -> Result<Json<ScoreResponse>, AppError> {
    let location = validate_location(&request)?;

    let schema = score_schema();
    let prompt = build_score_prompt(location, &schema);

    let scores: ScoreResponse = invoke_as(
        state.provider.as_ref(),
        &prompt,
        &schema,
        request.model_id.as_deref(),
    )
    .await?;

    let scores = scores
        .normalized()
        .map_err(ProviderError::SchemaConformance)?;

    Ok(Json(scores))
}

/// POST /information
///
/// Returns a sourced report on legislation, construction challenges, and
/// environmental factors for the requested French location.
pub async fn handle_information(
    State(state): State<AppState>,
    Json(request): Json<LocationRequest>,
) -> Result<Json<InformationResponse>, AppError> {
    let location = validate_location(&request)?;

    let schema = information_schema();
    let prompt = build_info_prompt(location, &schema);

    let report: InformationResponse = invoke_as(
        state.provider.as_ref(),
        &prompt,
        &schema,
        request.model_id.as_deref(),
    )
    .await?;

    Ok(Json(report))
}

/// Rejects empty input and strips surrounding whitespace so the prompt never
/// embeds a padded location.
fn validate_location(request: &LocationRequest) -> Result<&str, AppError> {
    let location = request.location.trim();
    if location.is_empty() {
        return Err(AppError::Validation("location cannot be empty".to_string()));
    }
    Ok(location)
}
