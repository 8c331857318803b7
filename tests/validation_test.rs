use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use schemaform::{
    resolve_validation_timing, with_custom_messages, AsyncValidators, AsyncVerdict, CriteriaMode,
    CustomMessages, FormEngine, FormError, FormOptions, FormState, JsonSchemaEngine,
    MessageOverride, SchemaEngine, ValidationMode, ValidationTrigger,
};
use serde_json::{json, Value};

fn json_engine(document: Value) -> Arc<dyn SchemaEngine> {
    Arc::new(JsonSchemaEngine::new(document).expect("valid schema"))
}

fn adult_schema() -> Arc<dyn SchemaEngine> {
    json_engine(json!({
        "type": "object",
        "properties": {
            "age": { "type": "number", "minimum": 18 },
            "name": { "type": "string" }
        },
        "required": ["age"]
    }))
}

#[test]
fn custom_message_replaces_native_message_at_mapped_path() {
    let engine = with_custom_messages(
        adult_schema(),
        CustomMessages::new().with("age", "Must be an adult"),
    );

    let issues = engine.validate(&json!({"age": 10, "name": 7}));
    let age = issues.iter().find(|i| i.path.to_string() == "age").expect("age issue");
    assert_eq!(age.message, "Must be an adult");
    assert_eq!(age.code, "too_small");

    // Paths absent from the map pass through unchanged.
    let name = issues.iter().find(|i| i.path.to_string() == "name").expect("name issue");
    assert_eq!(name.message, "expected a string");

    // Messages never change what is valid.
    assert!(engine.validate(&json!({"age": 30})).is_empty());
}

#[test]
fn computed_message_sees_the_original_issue() {
    let engine = with_custom_messages(
        adult_schema(),
        CustomMessages::new().with(
            "age",
            MessageOverride::computed(|issue| format!("age rejected ({})", issue.code)),
        ),
    );

    let issues = engine.validate(&json!({"age": 2}));
    assert_eq!(issues[0].message, "age rejected (too_small)");
}

fn email_schema() -> Arc<dyn SchemaEngine> {
    json_engine(json!({
        "type": "object",
        "properties": {
            "email": { "type": "string" }
        },
        "required": ["email"]
    }))
}

fn email_taken_validators() -> AsyncValidators {
    AsyncValidators::new().with_fn("email", |value| async move {
        if value == json!("a@b.com") {
            Ok(AsyncVerdict::Message("Email taken".to_string()))
        } else {
            Ok(AsyncVerdict::Valid)
        }
    })
}

#[tokio::test]
async fn async_validator_rejects_taken_email_on_submit() {
    let mut options = FormOptions::new(email_schema());
    options.async_validators = email_taken_validators();
    let engine = FormEngine::new(options);

    engine.set_value("email", json!("a@b.com"));
    let result = engine.submit().await;
    let Err(FormError::Validation(issues)) = result else {
        panic!("expected a validation failure");
    };
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].path.to_string(), "email");
    assert_eq!(issues[0].message, "Email taken");
    assert_eq!(
        engine.error("email").expect("error slot").message,
        "Email taken"
    );
}

#[tokio::test]
async fn async_validator_accepts_free_email() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let mut options = FormOptions::new(email_schema());
    options.async_validators = email_taken_validators();
    options.on_submit = Some(Arc::new(move |_| {
        seen.fetch_add(1, Ordering::SeqCst);
    }));
    let engine = FormEngine::new(options);

    engine.set_value("email", json!("c@d.com"));
    engine.submit().await.expect("free email submits");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn timing_lookup_is_total_with_constant_retrigger() {
    let modes = [
        (ValidationMode::OnBlur, ValidationTrigger::OnBlur),
        (ValidationMode::OnChange, ValidationTrigger::OnChange),
        (ValidationMode::OnSubmit, ValidationTrigger::OnSubmit),
        (ValidationMode::OnTouched, ValidationTrigger::OnTouched),
        (ValidationMode::All, ValidationTrigger::All),
    ];
    for (mode, expected) in modes {
        let timing = resolve_validation_timing(mode);
        assert_eq!(timing.trigger, expected);
        assert_eq!(timing.retrigger, ValidationTrigger::OnChange);
    }
}

#[tokio::test]
async fn superseded_validation_pass_is_discarded() {
    let mut options = FormOptions::new(email_schema());
    options.async_validators = AsyncValidators::new().with_fn("email", |value| async move {
        if value == json!("slow") {
            tokio::time::sleep(Duration::from_millis(80)).await;
            Ok(AsyncVerdict::Message("stale result".to_string()))
        } else {
            Ok(AsyncVerdict::Valid)
        }
    });
    let engine = Arc::new(FormEngine::new(options));

    engine.set_value("email", json!("slow"));
    let stale_pass = tokio::spawn({
        let engine = Arc::clone(&engine);
        async move { engine.revalidate().await }
    });

    // Let the first pass get in flight, then supersede it.
    tokio::time::sleep(Duration::from_millis(10)).await;
    engine.set_value("email", json!("fast"));
    engine.revalidate().await.expect("current pass applies");

    let result = stale_pass.await.expect("task completes");
    assert!(matches!(result, Err(FormError::Superseded)));
    assert!(engine.error("email").is_none(), "stale error must not surface");
}

#[tokio::test]
async fn criteria_mode_all_keeps_every_message() {
    let schema = json_engine(json!({
        "type": "object",
        "properties": {
            "code": { "type": "string", "minLength": 5, "pattern": "^[A-Z]+$" }
        }
    }));
    let mut options = FormOptions::new(schema);
    options.criteria_mode = CriteriaMode::All;
    options.validation_mode = ValidationMode::OnSubmit;
    let engine = FormEngine::new(options);

    engine.set_value("code", json!("ab"));
    let _ = engine.submit().await;
    let error = engine.error("code").expect("error slot");
    assert_eq!(error.messages.len(), 2);
    assert_eq!(error.message, "must be at least 5 character(s)");
}

#[tokio::test]
async fn submit_guard_rejects_reentrant_submit() {
    let mut options = FormOptions::new(email_schema());
    options.async_validators = AsyncValidators::new().with_fn("email", |_| async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        Ok(AsyncVerdict::Valid)
    });
    let engine = Arc::new(FormEngine::new(options));
    engine.set_value("email", json!("x@y.com"));

    let first = tokio::spawn({
        let engine = Arc::clone(&engine);
        async move { engine.submit().await }
    });
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(matches!(
        engine.submit().await,
        Err(FormError::SubmitInProgress)
    ));
    first.await.expect("task completes").expect("first submit succeeds");
}
