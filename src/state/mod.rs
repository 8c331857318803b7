//! Live form state and the submit workflow
//!
//! [`FormEngine`] owns the single shared value/error structure: renderers
//! read it synchronously at render time and write to it only through the
//! engine's mutation methods. The one asynchronous boundary is the validator
//! fan-out; every pass is stamped with a generation counter so a superseded
//! pass's late results are discarded instead of racing the newer pass.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use serde_json::{Map, Value};

use crate::domain::{
    flatten_values, issues_to_field_errors, nest_values, CriteriaMode, DisplayCondition,
    FieldError, Issue,
};
use crate::error::FormError;
use crate::schema::{extract_fields, SchemaEngine};
use crate::validation::{
    resolve_validation_timing, with_custom_messages, AsyncValidators, CustomMessages,
    ValidationMode, ValidationTiming, ValidationTrigger,
};

/// Callback invoked with the submitted data once validation passes
pub type SubmitHandler = Arc<dyn Fn(Value) + Send + Sync>;

/// Interface to the live form state.
///
/// Field renderers receive a handle implementing this trait; reads are
/// snapshots, writes go through the engine's own mutation methods.
pub trait FormState: Send + Sync {
    /// Current value at a dotted path
    fn value(&self, path: &str) -> Option<Value>;

    /// Snapshot of every live value, keyed by dotted path
    fn values(&self) -> Map<String, Value>;

    /// Current error for one field, if visible
    fn error(&self, path: &str) -> Option<FieldError>;

    /// Snapshot of the whole-form error map
    fn errors(&self) -> BTreeMap<String, FieldError>;

    /// Whether a submission is in flight
    fn is_submitting(&self) -> bool;

    /// Change handler: store a new value (may trigger validation, per the
    /// configured timing)
    fn set_value(&self, path: &str, value: Value);

    /// Blur handler: mark the field as touched (may trigger validation)
    fn mark_blurred(&self, path: &str);
}

/// Configuration for a form engine
pub struct FormOptions {
    pub schema: Arc<dyn SchemaEngine>,
    pub custom_messages: Option<CustomMessages>,
    pub async_validators: AsyncValidators,
    pub on_submit: Option<SubmitHandler>,
    pub validation_mode: ValidationMode,
    pub criteria_mode: CriteriaMode,
    /// Errors become visible only after this long
    pub delay_error: Option<Duration>,
    pub should_focus_error: bool,
    /// Nested default data, layered over schema-declared defaults
    pub default_values: Option<Value>,
}

impl FormOptions {
    pub fn new(schema: Arc<dyn SchemaEngine>) -> Self {
        Self {
            schema,
            custom_messages: None,
            async_validators: AsyncValidators::new(),
            on_submit: None,
            validation_mode: ValidationMode::default(),
            criteria_mode: CriteriaMode::default(),
            delay_error: None,
            should_focus_error: true,
            default_values: None,
        }
    }
}

struct TimedError {
    error: FieldError,
    since: Instant,
}

struct EngineState {
    values: Map<String, Value>,
    errors: BTreeMap<String, TimedError>,
    touched: HashSet<String>,
    submitting: bool,
    generation: u64,
    focus_target: Option<String>,
}

/// The built-in form-state engine
pub struct FormEngine {
    schema: Arc<dyn SchemaEngine>,
    async_validators: AsyncValidators,
    on_submit: Option<SubmitHandler>,
    timing: ValidationTiming,
    criteria_mode: CriteriaMode,
    delay_error: Option<Duration>,
    should_focus_error: bool,
    conditions: Mutex<HashMap<String, DisplayCondition>>,
    inner: Mutex<EngineState>,
}

impl FormEngine {
    pub fn new(options: FormOptions) -> Self {
        let schema = match options.custom_messages {
            Some(messages) if !messages.is_empty() => {
                with_custom_messages(options.schema, messages)
            }
            _ => options.schema,
        };

        // Seed from schema-declared defaults, then layer caller defaults.
        let mut values = Map::new();
        for field in extract_fields(schema.root()) {
            if let Some(default) = field.node.default_value() {
                values.insert(field.name, default);
            }
        }
        if let Some(defaults) = &options.default_values {
            for (path, value) in flatten_values(defaults) {
                values.insert(path, value);
            }
        }

        Self {
            schema,
            async_validators: options.async_validators,
            on_submit: options.on_submit,
            timing: resolve_validation_timing(options.validation_mode),
            criteria_mode: options.criteria_mode,
            delay_error: options.delay_error,
            should_focus_error: options.should_focus_error,
            conditions: Mutex::new(HashMap::new()),
            inner: Mutex::new(EngineState {
                values,
                errors: BTreeMap::new(),
                touched: HashSet::new(),
                submitting: false,
                generation: 0,
                focus_target: None,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, EngineState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn condition_map(&self) -> MutexGuard<'_, HashMap<String, DisplayCondition>> {
        self.conditions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a visibility predicate for a path, replacing any previous one.
    ///
    /// A field whose predicate returns false contributes nothing: it is
    /// absent from the rendered tree, from validation, and from submitted
    /// data.
    pub fn register_condition(&self, path: impl Into<String>, condition: DisplayCondition) {
        self.condition_map().insert(path.into(), condition);
    }

    /// First failing field recorded by the last failed submit, when
    /// focus-on-error is enabled
    pub fn focus_target(&self) -> Option<String> {
        self.state().focus_target.clone()
    }

    fn hidden_paths(&self, values: &Map<String, Value>) -> HashSet<String> {
        self.condition_map()
            .iter()
            .filter(|(_, condition)| !condition(values))
            .map(|(path, _)| path.clone())
            .collect()
    }

    /// Nested data for validation/submission; hidden fields contribute
    /// nothing
    fn visible_data(&self, values: &Map<String, Value>) -> (Value, HashSet<String>) {
        let hidden = self.hidden_paths(values);
        let visible: Map<String, Value> = values
            .iter()
            .filter(|(path, _)| !hidden.contains(path.as_str()))
            .map(|(path, value)| (path.clone(), value.clone()))
            .collect();
        (nest_values(&visible), hidden)
    }

    fn begin_pass(&self) -> (Value, HashSet<String>, u64) {
        let (values, generation) = {
            let mut state = self.state();
            state.generation += 1;
            (state.values.clone(), state.generation)
        };
        let (data, hidden) = self.visible_data(&values);
        (data, hidden, generation)
    }

    async fn run_validators(&self, data: &Value, hidden: &HashSet<String>) -> Vec<Issue> {
        let mut issues = self.schema.validate(data);
        issues.extend(self.async_validators.run(data).await);
        issues.retain(|issue| !hidden.contains(&issue.path.to_string()));
        issues
    }

    fn apply_errors(&self, state: &mut EngineState, issues: &[Issue]) {
        let now = Instant::now();
        state.errors = issues_to_field_errors(issues, self.criteria_mode)
            .into_iter()
            .map(|(path, error)| (path, TimedError { error, since: now }))
            .collect();
    }

    /// Run a full validation pass (schema parse plus async validators) and
    /// apply the resulting errors.
    ///
    /// Returns [`FormError::Superseded`] when another pass started before
    /// this one settled; the stale results are discarded.
    pub async fn revalidate(&self) -> Result<Vec<Issue>, FormError> {
        let (data, hidden, generation) = self.begin_pass();
        let issues = self.run_validators(&data, &hidden).await;

        let mut state = self.state();
        if state.generation != generation {
            tracing::debug!("discarding superseded validation pass");
            return Err(FormError::Superseded);
        }
        self.apply_errors(&mut state, &issues);
        Ok(issues)
    }

    /// Validate everything, then invoke the submit callback only on success.
    ///
    /// While the pass is in flight the submitting flag is set and further
    /// submits are rejected.
    pub async fn submit(&self) -> Result<(), FormError> {
        {
            let mut state = self.state();
            if state.submitting {
                return Err(FormError::SubmitInProgress);
            }
            state.submitting = true;
        }

        let (data, hidden, generation) = self.begin_pass();
        let issues = self.run_validators(&data, &hidden).await;

        let callback = {
            let mut state = self.state();
            state.submitting = false;
            if state.generation != generation {
                tracing::debug!("discarding superseded submit pass");
                return Err(FormError::Superseded);
            }
            if !issues.is_empty() {
                self.apply_errors(&mut state, &issues);
                state.focus_target = if self.should_focus_error {
                    issues.first().map(|issue| issue.path.to_string())
                } else {
                    None
                };
                return Err(FormError::Validation(issues));
            }
            state.errors.clear();
            state.focus_target = None;
            self.on_submit.clone()
        };

        if let Some(callback) = callback {
            callback(data);
        }
        Ok(())
    }

    /// Synchronous single-field validation used by change/blur triggers.
    ///
    /// Runs the schema's own parse only; async validators take part in the
    /// asynchronous passes ([`FormEngine::revalidate`], [`FormEngine::submit`]).
    fn validate_field_sync(&self, path: &str) {
        let values = self.state().values.clone();
        let (data, hidden) = self.visible_data(&values);
        if hidden.contains(path) {
            self.state().errors.remove(path);
            return;
        }

        let issues: Vec<Issue> = self
            .schema
            .validate(&data)
            .into_iter()
            .filter(|issue| issue.path.to_string() == path)
            .collect();

        let mut state = self.state();
        if issues.is_empty() {
            state.errors.remove(path);
        } else if let Some(error) =
            issues_to_field_errors(&issues, self.criteria_mode).remove(path)
        {
            state.errors.insert(
                path.to_string(),
                TimedError {
                    error,
                    since: Instant::now(),
                },
            );
        }
    }

    fn should_validate_on_change(&self, path: &str) -> bool {
        let (has_error, touched) = {
            let state = self.state();
            (state.errors.contains_key(path), state.touched.contains(path))
        };
        if has_error && self.timing.retrigger == ValidationTrigger::OnChange {
            return true;
        }
        match self.timing.trigger {
            ValidationTrigger::OnChange | ValidationTrigger::All => true,
            ValidationTrigger::OnTouched => touched,
            ValidationTrigger::OnBlur | ValidationTrigger::OnSubmit => false,
        }
    }

    fn should_validate_on_blur(&self) -> bool {
        matches!(
            self.timing.trigger,
            ValidationTrigger::OnBlur | ValidationTrigger::OnTouched | ValidationTrigger::All
        )
    }

    fn error_if_visible(&self, slot: &TimedError) -> Option<FieldError> {
        if let Some(delay) = self.delay_error {
            if slot.since.elapsed() < delay {
                return None;
            }
        }
        Some(slot.error.clone())
    }
}

impl FormState for FormEngine {
    fn value(&self, path: &str) -> Option<Value> {
        self.state().values.get(path).cloned()
    }

    fn values(&self) -> Map<String, Value> {
        self.state().values.clone()
    }

    fn error(&self, path: &str) -> Option<FieldError> {
        let state = self.state();
        state.errors.get(path).and_then(|slot| self.error_if_visible(slot))
    }

    fn errors(&self) -> BTreeMap<String, FieldError> {
        let state = self.state();
        state
            .errors
            .iter()
            .filter_map(|(path, slot)| {
                self.error_if_visible(slot).map(|error| (path.clone(), error))
            })
            .collect()
    }

    fn is_submitting(&self) -> bool {
        self.state().submitting
    }

    fn set_value(&self, path: &str, value: Value) {
        self.state().values.insert(path.to_string(), value);
        if self.should_validate_on_change(path) {
            self.validate_field_sync(path);
        }
    }

    fn mark_blurred(&self, path: &str) {
        self.state().touched.insert(path.to_string());
        if self.should_validate_on_blur() {
            self.validate_field_sync(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::json_schema::JsonSchemaEngine;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn engine_for(schema: Value) -> Arc<dyn SchemaEngine> {
        Arc::new(JsonSchemaEngine::new(schema).expect("valid schema"))
    }

    fn person_schema() -> Arc<dyn SchemaEngine> {
        engine_for(json!({
            "type": "object",
            "properties": {
                "name": { "type": "string", "minLength": 1 },
                "age": { "type": "number", "minimum": 18, "default": 21 }
            },
            "required": ["name", "age"]
        }))
    }

    #[test]
    fn test_schema_defaults_seed_values() {
        let engine = FormEngine::new(FormOptions::new(person_schema()));
        assert_eq!(engine.value("age"), Some(json!(21)));
        assert_eq!(engine.value("name"), None);
    }

    #[test]
    fn test_caller_defaults_override_schema_defaults() {
        let mut options = FormOptions::new(person_schema());
        options.default_values = Some(json!({"age": 30, "name": "ada"}));
        let engine = FormEngine::new(options);
        assert_eq!(engine.value("age"), Some(json!(30)));
        assert_eq!(engine.value("name"), Some(json!("ada")));
    }

    #[test]
    fn test_on_change_mode_validates_on_set() {
        let engine = FormEngine::new(FormOptions::new(person_schema()));
        engine.set_value("age", json!(10));
        let error = engine.error("age").expect("error expected");
        assert_eq!(error.code, "too_small");
    }

    #[test]
    fn test_on_submit_mode_does_not_validate_on_set() {
        let mut options = FormOptions::new(person_schema());
        options.validation_mode = ValidationMode::OnSubmit;
        let engine = FormEngine::new(options);
        engine.set_value("age", json!(10));
        assert!(engine.error("age").is_none());
    }

    #[test]
    fn test_failed_field_revalidates_on_change_regardless_of_mode() {
        let mut options = FormOptions::new(person_schema());
        options.validation_mode = ValidationMode::OnBlur;
        let engine = FormEngine::new(options);

        engine.set_value("age", json!(10));
        assert!(engine.error("age").is_none());
        engine.mark_blurred("age");
        assert!(engine.error("age").is_some());

        // The error slot is live now, so a change re-validates immediately.
        engine.set_value("age", json!(30));
        assert!(engine.error("age").is_none());
    }

    #[tokio::test]
    async fn test_submit_invokes_callback_only_on_success() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let mut options = FormOptions::new(person_schema());
        options.on_submit = Some(Arc::new(move |data| {
            assert_eq!(data, json!({"name": "ada", "age": 21}));
            seen.fetch_add(1, Ordering::SeqCst);
        }));
        let engine = FormEngine::new(options);

        // name missing: validation fails, callback untouched
        let result = engine.submit().await;
        assert!(matches!(result, Err(FormError::Validation(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(engine.focus_target().as_deref(), Some("name"));

        engine.set_value("name", json!("ada"));
        engine.submit().await.expect("valid data submits");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(engine.focus_target().is_none());
        assert!(engine.errors().is_empty());
    }

    #[tokio::test]
    async fn test_hidden_field_does_not_block_submission() {
        let engine = FormEngine::new(FormOptions::new(person_schema()));
        // Hide the required name field whenever age is 21.
        engine.register_condition(
            "name",
            Arc::new(|values| values.get("age") != Some(&json!(21))),
        );
        engine.submit().await.expect("hidden required field is skipped");
    }

    #[tokio::test]
    async fn test_delay_error_gates_visibility() {
        let mut options = FormOptions::new(person_schema());
        options.delay_error = Some(Duration::from_millis(40));
        let engine = FormEngine::new(options);

        let _ = engine.submit().await;
        assert!(engine.error("name").is_none());
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(engine.error("name").is_some());
    }
}
