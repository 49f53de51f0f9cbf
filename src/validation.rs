//! Validation of user-supplied CLI input.
//!
//! Work item ids become file names, so they are checked before any path is
//! built from them.

use anyhow::{bail, Result};

use crate::models::{TransitionError, WorkItemStatus};

/// Maximum allowed length for work item ids.
pub const MAX_ID_LENGTH: usize = 128;

/// Maximum allowed length for a status reason.
pub const MAX_REASON_LENGTH: usize = 500;

/// Reserved names that cannot be used as ids (case-insensitive).
const RESERVED_NAMES: &[&str] = &[
    ".", "..", "con", "prn", "aux", "nul", "com1", "com2", "com3", "com4", "com5", "com6", "com7",
    "com8", "com9", "lpt1", "lpt2", "lpt3", "lpt4", "lpt5", "lpt6", "lpt7", "lpt8", "lpt9",
];

/// Validates that a work item id is safe for use as a file name.
///
/// # Examples
///
/// ```
/// use pythia::validation::validate_id;
///
/// assert!(validate_id("task-2025-03-test").is_ok());
/// assert!(validate_id("").is_err());
/// assert!(validate_id("../etc/passwd").is_err());
/// ```
pub fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() {
        bail!("ID cannot be empty");
    }

    if id.len() > MAX_ID_LENGTH {
        bail!(
            "ID too long: {} characters (max {})",
            id.len(),
            MAX_ID_LENGTH
        );
    }

    let valid_chars = id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid_chars {
        bail!("ID '{id}' contains invalid characters. Use only alphanumeric characters, dashes (-), and underscores (_)");
    }

    let id_lower = id.to_lowercase();
    if RESERVED_NAMES.contains(&id_lower.as_str()) {
        bail!("ID '{id}' uses a reserved name");
    }

    Ok(())
}

pub fn validate_reason(reason: &str) -> Result<()> {
    if reason.contains('\n') {
        bail!("Reason must be a single line");
    }

    if reason.len() > MAX_REASON_LENGTH {
        bail!(
            "Reason too long: {} characters (max {})",
            reason.len(),
            MAX_REASON_LENGTH
        );
    }

    Ok(())
}

/// Parse a status argument from the command line.
///
/// Accepts the document labels (`In Progress`) as well as shell-friendly
/// spellings (`in-progress`, `in_progress`, `IN PROGRESS`). Anything else is
/// an [`TransitionError::InvalidStatus`].
pub fn parse_status_arg(s: &str) -> Result<WorkItemStatus, TransitionError> {
    let normalized = s.trim().replace(['-', '_'], " ").to_lowercase();
    WorkItemStatus::all()
        .iter()
        .copied()
        .find(|status| status.as_str().to_lowercase() == normalized)
        .ok_or_else(|| TransitionError::InvalidStatus(s.to_string()))
}

/// Clap value parser for validating id arguments.
///
/// ```ignore
/// #[arg(value_parser = clap_id_validator)]
/// id: String,
/// ```
pub fn clap_id_validator(s: &str) -> Result<String, String> {
    validate_id(s).map_err(|e| e.to_string())?;
    Ok(s.to_string())
}

/// Clap value parser for validating reason arguments.
pub fn clap_reason_validator(s: &str) -> Result<String, String> {
    validate_reason(s).map_err(|e| e.to_string())?;
    Ok(s.to_string())
}
