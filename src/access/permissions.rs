//! Permission names understood by the engine and the baseline.
//!
//! Bundle-granular names follow the pattern `<verb> any|own <bundle> datasheet`.

use crate::datasheet::DatasheetType;

pub const VIEW_REVISIONS: &str = "view datasheet revisions";
pub const REVERT_REVISIONS: &str = "revert datasheet revisions";
pub const DELETE_REVISIONS: &str = "delete datasheet revisions";

/// Global view permission
pub const VIEW_ANY: &str = "view datasheet";
/// Global create permission
pub const CREATE_ANY: &str = "create datasheet";
pub const VIEW_OWN_UNPUBLISHED: &str = "view own unpublished datasheet";

pub const UPDATE_ANY_SCHOOL: &str = "update any school datasheet";
pub const UPDATE_OWN_SCHOOL: &str = "update own school datasheet";

pub fn create(bundle: DatasheetType) -> String {
    format!("create {} datasheet", bundle)
}

pub fn view_any(bundle: DatasheetType) -> String {
    format!("view any {} datasheet", bundle)
}

pub fn view_own(bundle: DatasheetType) -> String {
    format!("view own {} datasheet", bundle)
}

pub fn update_any(bundle: DatasheetType) -> String {
    format!("update any {} datasheet", bundle)
}

pub fn update_own(bundle: DatasheetType) -> String {
    format!("update own {} datasheet", bundle)
}

pub fn delete_any(bundle: DatasheetType) -> String {
    format!("delete any {} datasheet", bundle)
}

pub fn delete_own(bundle: DatasheetType) -> String {
    format!("delete own {} datasheet", bundle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_school_bundle_names_match_constants() {
        assert_eq!(update_any(DatasheetType::School), UPDATE_ANY_SCHOOL);
        assert_eq!(update_own(DatasheetType::School), UPDATE_OWN_SCHOOL);
    }

    #[test]
    fn test_bundle_names() {
        assert_eq!(create(DatasheetType::National), "create national datasheet");
        assert_eq!(delete_own(DatasheetType::Local), "delete own local datasheet");
    }
}
