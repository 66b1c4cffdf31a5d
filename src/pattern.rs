use regex::Regex;

use crate::errors::{ExclusionError, Result};

/// Legacy wildcard meaning "any non-empty value".
pub const WILDCARD: &str = "*";
const WILDCARD_REGEX: &str = ".+";

/// A compiled `querystring` pattern. Matching searches the value, it does not
/// need to cover all of it.
#[derive(Debug, Clone)]
pub struct QueryPattern {
    regex: Regex,
}

impl QueryPattern {
    pub fn compile(param: &str, pattern: &str) -> Result<Self> {
        let source = if pattern == WILDCARD { WILDCARD_REGEX } else { pattern };
        let regex = Regex::new(source).map_err(|source| ExclusionError::InvalidPattern {
            param: param.to_string(),
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self { regex })
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}
