//! Declarative form validation
//!
//! A [`RuleSet`] maps field names to [`FieldRule`]s. [`validate`] walks the
//! rules in insertion order against the current field values and collects
//! one human-readable error per failing field.
//!
//! Checks run in a fixed order: required, then max length, then pattern.
//! The first failing check wins and the rest are skipped for that field.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use regex::Regex;
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::message::{MessageSink, Severity};

/// Validation rules for a single field
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRule {
    /// Human-readable field name used in error messages
    pub label: String,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub max_length: Option<usize>,

    #[serde(default, deserialize_with = "deserialize_pattern")]
    pub pattern: Option<Regex>,

    /// Replaces the default pattern-mismatch message
    #[serde(default)]
    pub message: Option<String>,
}

impl FieldRule {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Run this rule's checks against an already trimmed value
    fn check(&self, value: &str) -> Result<(), String> {
        if value.is_empty() {
            if self.required {
                return Err(format!("{}을(를) 입력해주세요.", self.label));
            }
            return Ok(());
        }

        // A zero limit means "no limit", the same as leaving it unset
        if let Some(max) = self.max_length.filter(|&max| max > 0) {
            if value.chars().count() > max {
                return Err(format!("{}은(는) {}자 이하여야 합니다.", self.label, max));
            }
        }

        if let Some(ref pattern) = self.pattern {
            if !pattern.is_match(value) {
                return Err(self
                    .message
                    .clone()
                    .unwrap_or_else(|| format!("{} 형식이 올바르지 않습니다.", self.label)));
            }
        }

        Ok(())
    }
}

fn deserialize_pattern<'de, D>(deserializer: D) -> Result<Option<Regex>, D::Error>
where
    D: Deserializer<'de>,
{
    let source: Option<String> = Option::deserialize(deserializer)?;
    source
        .map(|s| Regex::new(&s).map_err(|e| de::Error::custom(format!("invalid pattern '{}': {}", s, e))))
        .transpose()
}

/// Ordered mapping of field name to rule.
///
/// Iteration follows insertion order. Inserting a name that is already
/// present replaces its rule without moving it.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<(String, FieldRule)>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn rule(mut self, field: impl Into<String>, rule: FieldRule) -> Self {
        self.insert(field, rule);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, rule: FieldRule) {
        let field = field.into();
        match self.rules.iter_mut().find(|(name, _)| *name == field) {
            Some((_, existing)) => *existing = rule,
            None => self.rules.push((field, rule)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&FieldRule> {
        self.rules
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, rule)| rule)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldRule)> {
        self.rules.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<'de> Deserialize<'de> for RuleSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RuleSetVisitor;

        impl<'de> Visitor<'de> for RuleSetVisitor {
            type Value = RuleSet;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of field names to validation rules")
            }

            fn visit_map<A>(self, mut map: A) -> Result<RuleSet, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut rules = RuleSet::new();
                while let Some((field, rule)) = map.next_entry::<String, FieldRule>()? {
                    rules.insert(field, rule);
                }
                Ok(rules)
            }
        }

        deserializer.deserialize_map(RuleSetVisitor)
    }
}

/// Read access to a form's current field values
pub trait FieldValues {
    /// Current value of the named field, `None` if the form has no such field
    fn value(&self, name: &str) -> Option<&str>;
}

impl FieldValues for HashMap<String, String> {
    fn value(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl FieldValues for BTreeMap<String, String> {
    fn value(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl FieldValues for [(&str, &str)] {
    fn value(&self, name: &str) -> Option<&str> {
        self.iter().find(|(n, _)| *n == name).map(|(_, v)| *v)
    }
}

impl<const N: usize> FieldValues for [(&str, &str); N] {
    fn value(&self, name: &str) -> Option<&str> {
        self.as_slice().value(name)
    }
}

/// Pass/fail marker attached to a validated field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldState {
    Valid,
    Invalid,
}

impl FieldState {
    /// CSS class the page puts on the input
    pub fn css_class(&self) -> &'static str {
        match self {
            FieldState::Valid => "is-valid",
            FieldState::Invalid => "is-invalid",
        }
    }
}

/// Outcome of one validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    /// One message per failing field, in rule order
    pub errors: Vec<String>,
    /// State of every field that was checked, in rule order
    pub states: Vec<(String, FieldState)>,
}

impl ValidationResult {
    pub fn state(&self, field: &str) -> Option<FieldState> {
        self.states
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, state)| *state)
    }

    /// All errors as a single newline-separated message
    pub fn joined_message(&self) -> String {
        self.errors.join("\n")
    }
}

/// Validate the form's fields against the rule set.
///
/// Rules naming a field the form does not have are skipped silently.
pub fn validate<F>(fields: &F, rules: &RuleSet) -> ValidationResult
where
    F: FieldValues + ?Sized,
{
    let mut result = ValidationResult {
        is_valid: true,
        ..ValidationResult::default()
    };

    for (name, rule) in rules.iter() {
        let Some(raw) = fields.value(name) else {
            continue;
        };

        match rule.check(raw.trim()) {
            Ok(()) => result.states.push((name.to_string(), FieldState::Valid)),
            Err(message) => {
                result.is_valid = false;
                result.errors.push(message);
                result.states.push((name.to_string(), FieldState::Invalid));
            }
        }
    }

    result
}

/// Validate, and on failure show every error through the sink as one
/// `Danger` notice.
pub fn validate_and_report<F>(
    fields: &F,
    rules: &RuleSet,
    sink: &mut dyn MessageSink,
) -> ValidationResult
where
    F: FieldValues + ?Sized,
{
    let result = validate(fields, rules);
    if !result.is_valid {
        sink.show(&result.joined_message(), Severity::Danger);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_required_empty() {
        let rules = RuleSet::new().rule("name", FieldRule::new("Name").required());
        let result = validate(&[("name", "")], &rules);

        assert!(!result.is_valid);
        assert_eq!(result.errors, vec!["Name을(를) 입력해주세요.".to_string()]);
        assert_eq!(result.state("name"), Some(FieldState::Invalid));
    }

    #[test]
    fn test_required_whitespace_only() {
        let rules = RuleSet::new().rule("name", FieldRule::new("이름").required());
        let result = validate(&[("name", "   ")], &rules);

        assert_eq!(result.errors, vec!["이름을(를) 입력해주세요.".to_string()]);
    }

    #[test]
    fn test_max_length() {
        let rules = RuleSet::new().rule("bio", FieldRule::new("Bio").max_length(5));

        let result = validate(&[("bio", "123456")], &rules);
        assert!(!result.is_valid);
        assert_eq!(result.errors, vec!["Bio은(는) 5자 이하여야 합니다.".to_string()]);

        let result = validate(&[("bio", "12345")], &rules);
        assert!(result.is_valid);
        assert_eq!(result.state("bio"), Some(FieldState::Valid));
    }

    #[test]
    fn test_max_length_counts_characters() {
        let rules = RuleSet::new().rule("title", FieldRule::new("제목").max_length(3));
        assert!(validate(&[("title", "가나다")], &rules).is_valid);
        assert!(!validate(&[("title", "가나다라")], &rules).is_valid);
    }

    #[test]
    fn test_zero_max_length_is_no_limit() {
        let rules = RuleSet::new().rule("bio", FieldRule::new("Bio").max_length(0));
        let long = "x".repeat(500);
        let result = validate(&[("bio", long.as_str())], &rules);
        assert!(result.is_valid);
        assert!(result.errors.is_empty());

        let rules: RuleSet =
            serde_json::from_str(r#"{ "bio": { "label": "Bio", "maxLength": 0 } }"#).unwrap();
        assert!(validate(&[("bio", "길고 긴 작가 소개")], &rules).is_valid);
    }

    #[test]
    fn test_max_length_ignores_surrounding_whitespace() {
        let rules = RuleSet::new().rule("bio", FieldRule::new("Bio").max_length(5));
        assert!(validate(&[("bio", "  12345  ")], &rules).is_valid);
    }

    #[test]
    fn test_pattern_default_and_custom_message() {
        let digits = Regex::new(r"^\d+$").unwrap();
        let rules = RuleSet::new()
            .rule("year", FieldRule::new("연도").pattern(digits.clone()))
            .rule(
                "price",
                FieldRule::new("가격")
                    .pattern(digits)
                    .message("가격은 숫자만 입력해주세요."),
            );

        let result = validate(&[("year", "20xx"), ("price", "abc")], &rules);
        assert_eq!(
            result.errors,
            vec![
                "연도 형식이 올바르지 않습니다.".to_string(),
                "가격은 숫자만 입력해주세요.".to_string(),
            ]
        );
    }

    #[test]
    fn test_first_failing_check_wins() {
        let rules = RuleSet::new().rule(
            "code",
            FieldRule::new("Code")
                .required()
                .max_length(3)
                .pattern(Regex::new(r"^[a-z]+$").unwrap()),
        );

        let result = validate(&[("code", "ABCDE")], &rules);
        assert_eq!(result.errors, vec!["Code은(는) 3자 이하여야 합니다.".to_string()]);
    }

    #[test]
    fn test_optional_empty_field_skips_pattern() {
        let rules = RuleSet::new().rule(
            "phone",
            FieldRule::new("전화번호").pattern(Regex::new(r"^\d{3}-\d{4}-\d{4}$").unwrap()),
        );

        let result = validate(&[("phone", "")], &rules);
        assert!(result.is_valid);
        assert_eq!(result.state("phone"), Some(FieldState::Valid));
    }

    #[test]
    fn test_missing_field_is_inert() {
        let rules = RuleSet::new()
            .rule("ghost", FieldRule::new("Ghost").required())
            .rule("name", FieldRule::new("Name").required());

        let result = validate(&[("name", "Kim")], &rules);
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
        assert_eq!(result.state("ghost"), None);
        assert_eq!(result.states, vec![("name".to_string(), FieldState::Valid)]);
    }

    #[test]
    fn test_errors_follow_rule_order() {
        let rules = RuleSet::new()
            .rule("b", FieldRule::new("B").required())
            .rule("a", FieldRule::new("A").required());

        let result = validate(&[("a", ""), ("b", "")], &rules);
        assert_eq!(
            result.errors,
            vec!["B을(를) 입력해주세요.".to_string(), "A을(를) 입력해주세요.".to_string()]
        );
    }

    #[test]
    fn test_reinsert_keeps_position() {
        let mut rules = RuleSet::new()
            .rule("first", FieldRule::new("First"))
            .rule("second", FieldRule::new("Second"));
        rules.insert("first", FieldRule::new("Renamed").required());

        let names: Vec<&str> = rules.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["first", "second"]);
        assert_eq!(rules.get("first").map(|r| r.label.as_str()), Some("Renamed"));
    }

    #[test]
    fn test_rule_set_from_json_keeps_order() {
        let json = r#"{
            "title": { "label": "제목", "required": true, "maxLength": 10 },
            "email": { "label": "이메일", "pattern": "^[^@]+@[^@]+$", "message": "이메일 형식" }
        }"#;
        let rules: RuleSet = serde_json::from_str(json).unwrap();

        let names: Vec<&str> = rules.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["title", "email"]);

        let title = rules.get("title").unwrap();
        assert!(title.required);
        assert_eq!(title.max_length, Some(10));

        let email = rules.get("email").unwrap();
        assert!(email.pattern.as_ref().unwrap().is_match("a@b"));
        assert_eq!(email.message.as_deref(), Some("이메일 형식"));
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let json = r#"{ "x": { "label": "X", "pattern": "([" } }"#;
        assert!(serde_json::from_str::<RuleSet>(json).is_err());
    }

    #[test]
    fn test_field_state_css_class() {
        assert_eq!(FieldState::Valid.css_class(), "is-valid");
        assert_eq!(FieldState::Invalid.css_class(), "is-invalid");
    }
}
