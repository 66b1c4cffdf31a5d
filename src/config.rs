use std::collections::BTreeSet;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{ExclusionError, Result};
use crate::pattern::QueryPattern;

/// Feature options as found in site configuration: `{ "exclude": { ... } }`.
/// Keys other than `exclude` are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureOptions {
    #[serde(default)]
    pub exclude: ExclusionConfig,
}

impl FeatureOptions {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ExclusionError::Options(e.to_string()))
    }
}

/// Declarative rules for pages on which a feature is disabled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExclusionConfig {
    /// Disable on the main page. When the current page is the main page
    /// this is the only rule consulted.
    #[serde(default)]
    pub mainpage: bool,
    /// Namespace ids on which the feature is disabled.
    #[serde(default)]
    pub namespaces: BTreeSet<i32>,
    /// Request parameter patterns, in definition order.
    #[serde(default)]
    pub querystring: QueryRules,
    /// Page titles, using canonical English names for special pages.
    #[serde(default)]
    pub pagetitles: Vec<String>,
}

impl ExclusionConfig {
    /// Compile every query pattern and report the first invalid one.
    ///
    /// Evaluation only compiles the entry it reaches, so a config that was
    /// never validated can still fail later for some requests.
    pub fn validate(&self) -> Result<()> {
        self.querystring
            .iter()
            .try_for_each(|rule| rule.compile().map(drop))
    }
}

/// One `querystring` entry: parameter name and the pattern its value is
/// tested against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRule {
    pub param: String,
    pub pattern: String,
}

impl QueryRule {
    pub fn new(param: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            param: param.into(),
            pattern: pattern.into(),
        }
    }

    pub fn compile(&self) -> Result<QueryPattern> {
        QueryPattern::compile(&self.param, &self.pattern)
    }
}

/// Ordered `querystring` map. A JSON object keeps the order its keys were
/// written in; a repeated key replaces the earlier pattern in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryRules(Vec<QueryRule>);

impl QueryRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, param: impl Into<String>, pattern: impl Into<String>) {
        let rule = QueryRule::new(param, pattern);
        match self.0.iter_mut().find(|r| r.param == rule.param) {
            Some(existing) => existing.pattern = rule.pattern,
            None => self.0.push(rule),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QueryRule> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryRules {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut rules = Self::new();
        for (param, pattern) in iter {
            rules.insert(param, pattern);
        }
        rules
    }
}

impl<'a> IntoIterator for &'a QueryRules {
    type Item = &'a QueryRule;
    type IntoIter = std::slice::Iter<'a, QueryRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for QueryRules {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for rule in self {
            map.serialize_entry(&rule.param, &rule.pattern)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for QueryRules {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct RulesVisitor;

        impl<'de> Visitor<'de> for RulesVisitor {
            type Value = QueryRules;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map from parameter name to pattern")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<QueryRules, A::Error> {
                let mut rules = QueryRules::new();
                while let Some((param, pattern)) = access.next_entry::<String, String>()? {
                    rules.insert(param, pattern);
                }
                Ok(rules)
            }
        }

        deserializer.deserialize_map(RulesVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_fields_default_to_empty() {
        let opts = FeatureOptions::from_json(r#"{"other": 1}"#).unwrap();
        assert!(!opts.exclude.mainpage);
        assert!(opts.exclude.namespaces.is_empty());
        assert!(opts.exclude.querystring.is_empty());
        assert!(opts.exclude.pagetitles.is_empty());
    }

    #[test]
    fn querystring_keeps_definition_order() {
        let opts = FeatureOptions::from_json(
            r#"{"exclude": {"querystring": {"diff": "*", "action": "edit", "oldid": ".+"}}}"#,
        )
        .unwrap();
        let params: Vec<&str> = opts.exclude.querystring.iter().map(|r| r.param.as_str()).collect();
        assert_eq!(params, vec!["diff", "action", "oldid"]);
    }

    #[test]
    fn serializes_back_to_site_layout() {
        let config = ExclusionConfig {
            mainpage: true,
            namespaces: [6].into_iter().collect(),
            querystring: [("action", "edit")].into_iter().collect(),
            pagetitles: vec!["Special:Preferences".into()],
        };
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "mainpage": true,
                "namespaces": [6],
                "querystring": {"action": "edit"},
                "pagetitles": ["Special:Preferences"]
            })
        );
    }

    #[test]
    fn rejects_wrong_shape() {
        let err = FeatureOptions::from_json(r#"{"exclude": {"namespaces": "six"}}"#).unwrap_err();
        assert!(matches!(err, ExclusionError::Options(_)));
    }

    #[test]
    fn validate_reports_first_invalid_pattern() {
        let config = ExclusionConfig {
            querystring: [("action", "edit"), ("diff", "(unclosed"), ("oldid", "[")]
                .into_iter()
                .collect(),
            ..Default::default()
        };
        match config.validate() {
            Err(ExclusionError::InvalidPattern { param, .. }) => assert_eq!(param, "diff"),
            other => panic!("expected invalid pattern, got {other:?}"),
        }
    }

    #[test]
    fn validate_accepts_wildcard() {
        let config = ExclusionConfig {
            querystring: [("diff", "*")].into_iter().collect(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
