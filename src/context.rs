use std::collections::HashMap;
use std::fmt;

use itertools::Itertools;

/// Read access to the parameters of the current request.
pub trait RequestContext {
    /// Raw, undecoded value of `name`, or `None` when the parameter is absent.
    fn raw_val(&self, name: &str) -> Option<&str>;
}

/// Request parameters parsed from a raw query string.
///
/// Values are kept exactly as they appear on the wire. A bare `name` has the
/// empty value and a later duplicate overrides an earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    order: Vec<String>,
    values: HashMap<String, String>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params = Self::new();
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            if name.is_empty() {
                continue;
            }
            params.set(name, value);
        }
        params
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        if !self.values.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.values.insert(name, value.into());
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl RequestContext for QueryParams {
    fn raw_val(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .order
            .iter()
            .map(|name| format!("{}={}", name, self.values[name]))
            .join("&");
        f.write_str(&joined)
    }
}
