use ovenpilot_protocol::{PidParams, ProfilePoint, Recipe};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("'profile' key does not exist in the recipe")]
    MissingProfile,
    #[error("profile editing is locked while the process is active")]
    EditingLocked,
}

/// Decode a recipe file.
///
/// The `profile` key is required; an import without it fails whole, with
/// no partial state applied. `pid_param` is optional and dropped silently
/// unless it carries numeric, finite kp/ki/kd — a partial parameter
/// block does not fail the import, the backend defaults cover it.
pub fn parse_recipe(data: &[u8]) -> Result<Recipe, RecipeError> {
    let value: serde_json::Value = serde_json::from_slice(data)?;
    let Some(profile_value) = value.get("profile") else {
        return Err(RecipeError::MissingProfile);
    };
    let profile: Vec<ProfilePoint> = serde_json::from_value(profile_value.clone())?;
    let pid_param = value
        .get("pid_param")
        .and_then(|v| serde_json::from_value::<PidParams>(v.clone()).ok())
        .filter(PidParams::is_finite);
    Ok(Recipe { profile, pid_param })
}
