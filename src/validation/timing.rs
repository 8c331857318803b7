//! Validation timing lookup

use serde::{Deserialize, Serialize};

/// When validation first runs for a field
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValidationMode {
    OnBlur,
    #[default]
    OnChange,
    OnSubmit,
    OnTouched,
    All,
}

/// A single validation trigger event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationTrigger {
    OnBlur,
    OnChange,
    OnSubmit,
    OnTouched,
    All,
}

/// When validation first runs, and when it re-runs after a failure
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValidationTiming {
    pub trigger: ValidationTrigger,
    pub retrigger: ValidationTrigger,
}

/// Map a validation mode to its timing pair.
///
/// Pure total lookup; re-validation after a failure is always `OnChange`
/// regardless of the initial mode.
pub fn resolve_validation_timing(mode: ValidationMode) -> ValidationTiming {
    let trigger = match mode {
        ValidationMode::OnBlur => ValidationTrigger::OnBlur,
        ValidationMode::OnChange => ValidationTrigger::OnChange,
        ValidationMode::OnSubmit => ValidationTrigger::OnSubmit,
        ValidationMode::OnTouched => ValidationTrigger::OnTouched,
        ValidationMode::All => ValidationTrigger::All,
    };
    ValidationTiming {
        trigger,
        retrigger: ValidationTrigger::OnChange,
    }
}
