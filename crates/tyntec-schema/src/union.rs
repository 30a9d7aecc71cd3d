//! Discriminated unions: one schema out of many, selected by a tag field.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::checker::{type_name, Checker};
use crate::error::IssueKind;

type VariantCheck<T> = Arc<dyn Fn(&mut Checker, &Map<String, Value>) -> Option<T> + Send + Sync>;

/// A validator that reads a discriminator field and hands the whole object to
/// the variant registered under that tag.
///
/// Tag lookup is exact string comparison. The first variant registered under a
/// tag wins; a union is expected to hold unique tags. There is no fallback
/// across variants: once a tag matches, the variant's issues are the result.
pub struct DiscriminatedUnion<T> {
    discriminator: &'static str,
    variants: Vec<(&'static str, VariantCheck<T>)>,
}

impl<T> DiscriminatedUnion<T> {
    pub fn new(discriminator: &'static str) -> Self {
        Self {
            discriminator,
            variants: Vec::new(),
        }
    }

    /// Append a variant. Order is kept for error reporting.
    pub fn variant(
        mut self,
        tag: &'static str,
        check: impl Fn(&mut Checker, &Map<String, Value>) -> Option<T> + Send + Sync + 'static,
    ) -> Self {
        self.variants.push((tag, Arc::new(check)));
        self
    }

    pub fn discriminator(&self) -> &'static str {
        self.discriminator
    }

    /// Known tags in registration order.
    pub fn tags(&self) -> Vec<&'static str> {
        self.variants.iter().map(|(tag, _)| *tag).collect()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.variants.iter().any(|(known, _)| *known == tag)
    }

    /// A union holding only the variants whose tag is listed, in this union's order.
    pub fn restrict(&self, tags: &[&str]) -> Self {
        Self {
            discriminator: self.discriminator,
            variants: self
                .variants
                .iter()
                .filter(|(tag, _)| tags.contains(tag))
                .map(|(tag, check)| (*tag, Arc::clone(check)))
                .collect(),
        }
    }

    /// Validate `value` as one of the variants.
    pub fn check(&self, checker: &mut Checker, value: &Value, expected: &str) -> Option<T> {
        let map = checker.object(value, expected)?;
        let variant = checker.at(self.discriminator, |c| self.select(c, map.get(self.discriminator)))?;
        variant(checker, map)
    }

    fn select(&self, checker: &mut Checker, tag: Option<&Value>) -> Option<VariantCheck<T>> {
        let allowed = || self.tags().join(", ");
        match tag {
            None => {
                checker.report(IssueKind::MissingField, format!("one of {}", allowed()), "nothing");
                None
            }
            Some(Value::String(tag)) => {
                let found = self
                    .variants
                    .iter()
                    .find(|(known, _)| *known == tag.as_str())
                    .map(|(_, check)| Arc::clone(check));
                if found.is_none() {
                    checker.report(
                        IssueKind::UnknownVariant {
                            tag: tag.clone(),
                            allowed: self.tags().iter().map(|t| t.to_string()).collect(),
                        },
                        format!("one of {}", allowed()),
                        format!("\"{tag}\""),
                    );
                }
                found
            }
            Some(other) => {
                checker.report(
                    IssueKind::WrongType,
                    format!("string tag, one of {}", allowed()),
                    type_name(other),
                );
                None
            }
        }
    }
}

impl<T> Clone for DiscriminatedUnion<T> {
    fn clone(&self) -> Self {
        Self {
            discriminator: self.discriminator,
            variants: self
                .variants
                .iter()
                .map(|(tag, check)| (*tag, Arc::clone(check)))
                .collect(),
        }
    }
}

impl<T> fmt::Debug for DiscriminatedUnion<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscriminatedUnion")
            .field("discriminator", &self.discriminator)
            .field("tags", &self.tags())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::config::RegistryConfig;

    #[derive(Debug, PartialEq)]
    enum Shape {
        Circle(f64),
        Label(String),
    }

    fn shapes() -> DiscriminatedUnion<Shape> {
        DiscriminatedUnion::new("kind")
            .variant("circle", |c, map| {
                let radius = c.required(map, "radius", "number", |c, v| c.number_in(v, 0.0, f64::MAX));
                Some(Shape::Circle(radius?))
            })
            .variant("label", |c, map| {
                let text = c.required_string(map, "text");
                Some(Shape::Label(text?))
            })
    }

    fn run(union: &DiscriminatedUnion<Shape>, value: Value) -> (Option<Shape>, Checker) {
        let mut c = Checker::new(RegistryConfig::default());
        let out = union.check(&mut c, &value, "shape object");
        (out, c)
    }

    #[test]
    fn dispatches_on_tag() {
        let (out, c) = run(&shapes(), json!({ "kind": "label", "text": "hi" }));
        assert_eq!(out, Some(Shape::Label("hi".to_string())));
        assert!(c.issues().is_empty());
    }

    #[test]
    fn unknown_tag_lists_allowed() {
        let (out, c) = run(&shapes(), json!({ "kind": "square" }));
        assert!(out.is_none());
        assert_eq!(c.issues().len(), 1);
        assert_eq!(c.issues()[0].path.to_string(), "kind");
        assert_eq!(
            c.issues()[0].kind,
            IssueKind::UnknownVariant {
                tag: "square".to_string(),
                allowed: vec!["circle".to_string(), "label".to_string()],
            }
        );
    }

    #[test]
    fn tag_match_is_case_sensitive() {
        let (out, c) = run(&shapes(), json!({ "kind": "Label", "text": "hi" }));
        assert!(out.is_none());
        assert!(matches!(c.issues()[0].kind, IssueKind::UnknownVariant { .. }));
    }

    #[test]
    fn matched_variant_issues_are_final() {
        // A `text` field would satisfy `label`, but the tag selects `circle`.
        let (out, c) = run(&shapes(), json!({ "kind": "circle", "text": "hi" }));
        assert!(out.is_none());
        assert_eq!(c.issues().len(), 1);
        assert_eq!(c.issues()[0].path.to_string(), "radius");
    }

    #[test]
    fn missing_and_non_string_tags() {
        let (_, c) = run(&shapes(), json!({ "text": "hi" }));
        assert_eq!(c.issues()[0].kind, IssueKind::MissingField);

        let (_, c) = run(&shapes(), json!({ "kind": 3 }));
        assert_eq!(c.issues()[0].kind, IssueKind::WrongType);

        let (_, c) = run(&shapes(), json!("label"));
        assert_eq!(c.issues()[0].kind, IssueKind::WrongType);
        assert!(c.issues()[0].path.is_root());
    }

    #[test]
    fn restrict_keeps_order_and_drops_others() {
        let only_label = shapes().restrict(&["label", "circle"]);
        assert_eq!(only_label.tags(), vec!["circle", "label"]);

        let only_label = shapes().restrict(&["label"]);
        assert_eq!(only_label.tags(), vec!["label"]);
        let (out, c) = run(&only_label, json!({ "kind": "circle", "radius": 1.0 }));
        assert!(out.is_none());
        assert_eq!(
            c.issues()[0].kind,
            IssueKind::UnknownVariant {
                tag: "circle".to_string(),
                allowed: vec!["label".to_string()],
            }
        );
    }
}
