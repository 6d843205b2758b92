//! Project naming rules.

use crate::error::CoreError;

/// Reject project names that are empty or whitespace-only.
pub fn validate_project_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(
            "Project name must not be empty".to_string(),
        ));
    }
    Ok(())
}
