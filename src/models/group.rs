use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;

/// Name of the group that always exists and can never be deleted.
pub const DEFAULT_GROUP_NAME: &str = "General";

pub const MAX_GROUP_NAME_LEN: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Group {
    pub id: i64,
    pub name: String,
}

impl Group {
    pub fn is_default(&self) -> bool {
        is_reserved_group_name(&self.name)
    }
}

/// Form body for POST /add_group.
#[derive(Debug, Deserialize)]
pub struct CreateGroupForm {
    #[serde(default)]
    pub group_name: String,
}

/// The single reserved-name rule, shared by group creation and deletion.
pub fn is_reserved_group_name(name: &str) -> bool {
    name.trim().eq_ignore_ascii_case(DEFAULT_GROUP_NAME)
}

/// Trim a submitted group name and reject empty or reserved names.
/// Uniqueness is checked against storage by the caller.
pub fn validate_new_group_name(raw: &str) -> Result<String, AppError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Group name cannot be empty!".into()));
    }
    if is_reserved_group_name(name) {
        return Err(AppError::Validation(format!(
            "Cannot use \"{DEFAULT_GROUP_NAME}\" as group name!"
        )));
    }
    if name.chars().count() > MAX_GROUP_NAME_LEN {
        return Err(AppError::Validation(format!(
            "Group name cannot exceed {MAX_GROUP_NAME_LEN} characters!"
        )));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_name_ignores_case_and_whitespace() {
        for name in ["general", "General", "GENERAL", "  gEnErAl "] {
            assert!(is_reserved_group_name(name), "{name}");
            assert!(matches!(validate_new_group_name(name), Err(AppError::Validation(_))));
        }
        assert!(!is_reserved_group_name("Generals"));
    }

    #[test]
    fn names_are_trimmed() {
        assert_eq!(validate_new_group_name("  Work ").unwrap(), "Work");
    }

    #[test]
    fn empty_and_oversized_names_are_rejected() {
        assert!(validate_new_group_name("   ").is_err());
        assert!(validate_new_group_name(&"x".repeat(MAX_GROUP_NAME_LEN + 1)).is_err());
        assert!(validate_new_group_name(&"x".repeat(MAX_GROUP_NAME_LEN)).is_ok());
    }
}
