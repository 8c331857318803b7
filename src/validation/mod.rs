//! Validation augmentation: custom messages, async validators, timing
//!
//! Layers over a schema engine's own parsing rules without changing what is
//! valid or invalid.

pub mod async_validators;
pub mod messages;
pub mod timing;

pub use async_validators::{
    validator_fn, AsyncFieldValidator, AsyncValidators, AsyncVerdict,
};
pub use messages::{with_custom_messages, CustomMessages, MessageOverride};
pub use timing::{
    resolve_validation_timing, ValidationMode, ValidationTiming, ValidationTrigger,
};
