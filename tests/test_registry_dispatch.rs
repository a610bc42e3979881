use dynaform::core::error::AppError;
use dynaform::core::registry::{TransformRegistry, TransformStrategy};
use dynaform::core::rule::{OptionDescriptor, OptionRule, ValueKind};
use dynaform::core::transforms::default_registry;
use dynaform::core::types::{ErrorCategory, Transform};
use std::collections::BTreeSet;

struct MinimalStrategy;

impl TransformStrategy for MinimalStrategy {
    fn transform(&self) -> Transform {
        Transform::Sql
    }

    fn option_rule(&self) -> Result<OptionRule, AppError> {
        OptionRule::builder()
            .required(OptionDescriptor::new("query", ValueKind::Text))
            .build()
    }
}

#[test]
fn synthesized_field_set_matches_declared_options_for_every_variant() {
    let registry = default_registry().expect("registry");
    for transform in registry.transforms() {
        let strategy = registry.resolve(transform).expect("strategy");
        let rule = strategy.option_rule().expect("rule");
        let declared: BTreeSet<String> = rule.options.iter().map(|o| o.name.clone()).collect();
        let form = registry.form_structure(transform).expect("form");
        assert_eq!(
            form.option_field_names(),
            declared,
            "field set mismatch for {}",
            transform
        );
    }
}

#[test]
fn form_structure_is_named_after_the_transform_tag() {
    let registry = default_registry().expect("registry");
    let form = registry.form_structure(Transform::FieldMapper).expect("form");
    assert_eq!(form.name, "FIELDMAPPER");
}

#[test]
fn unknown_transform_is_a_registry_error() {
    let mut builder = TransformRegistry::builder();
    builder.register(MinimalStrategy).expect("register");
    let registry = builder.build();
    let err = registry
        .resolve(Transform::Copy)
        .err()
        .expect("resolution must fail");
    assert_eq!(err.category, ErrorCategory::RegistryError);
    assert_eq!(err.context.get("transform").map(String::as_str), Some("COPY"));
}

#[test]
fn duplicate_registration_without_replace_fails() {
    let mut builder = TransformRegistry::builder();
    builder.register(MinimalStrategy).expect("first");
    assert!(builder.register(MinimalStrategy).is_err());
}

#[test]
fn replacement_registration_is_explicit() {
    let mut builder = TransformRegistry::builder();
    builder.register(MinimalStrategy).expect("first");
    builder.register_replacing(MinimalStrategy);
    let registry = builder.build();
    assert_eq!(registry.len(), 1);
}

#[test]
fn resolution_is_safe_across_threads() {
    let registry = default_registry().expect("registry");
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let registry = registry.clone();
            std::thread::spawn(move || {
                for _ in 0..100 {
                    registry.resolve(Transform::Split).expect("resolve");
                    registry.form_structure(Transform::Filter).expect("form");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("thread");
    }
}
