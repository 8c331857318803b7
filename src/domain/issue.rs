//! Validation issues and the per-field error map

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::path::FieldPath;

/// A single validation finding at a field path.
///
/// The `code` is an open string so schema engines can report their native
/// issue kinds; the built-in engine uses `invalid_type`, `required`,
/// `too_small`, `too_big`, `pattern`, `format`, `enum` and `custom`.
#[derive(Clone, Debug, PartialEq)]
pub struct Issue {
    pub path: FieldPath,
    pub message: String,
    pub code: String,
}

impl Issue {
    pub fn new(path: impl Into<FieldPath>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            code: code.into(),
        }
    }
}

/// Error attached to one field's error slot
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub code: String,
    pub message: String,
    /// Every message reported for the path when criteria mode is `All`;
    /// otherwise just the primary message
    pub messages: Vec<String>,
}

/// Which issues survive into a field's error slot
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CriteriaMode {
    /// Keep the first issue reported per path
    #[default]
    FirstError,
    /// Keep every message per path
    All,
}

/// Collapse an issue list into a path-keyed error map.
///
/// Issues at the root path carry no field and are skipped. When several
/// issues share a path, the first one supplies the slot's code and primary
/// message; later messages are retained only under [`CriteriaMode::All`].
pub fn issues_to_field_errors(
    issues: &[Issue],
    mode: CriteriaMode,
) -> BTreeMap<String, FieldError> {
    let mut errors: BTreeMap<String, FieldError> = BTreeMap::new();

    for issue in issues {
        if issue.path.is_root() {
            continue;
        }
        let key = issue.path.to_string();
        match errors.get_mut(&key) {
            Some(slot) if mode == CriteriaMode::All => {
                slot.messages.push(issue.message.clone());
            }
            Some(_) => {}
            None => {
                errors.insert(
                    key,
                    FieldError {
                        code: issue.code.clone(),
                        message: issue.message.clone(),
                        messages: vec![issue.message.clone()],
                    },
                );
            }
        }
    }

    errors
}
