use std::fmt;

use crate::namespace;

const MAX_KEY_BYTES: usize = 255;
const MAX_SPECIAL_KEY_BYTES: usize = 512;
const ILLEGAL: &[char] = &['<', '>', '[', ']', '|', '{', '}'];

/// A page reference: namespace id plus database key.
///
/// Database keys use underscores in place of spaces and start with an
/// uppercase letter. Equality ignores the fragment; in the Special namespace
/// keys compare case-insensitively, since special page names are.
#[derive(Debug, Clone)]
pub struct Title {
    namespace: i32,
    db_key: String,
    fragment: Option<String>,
}

impl Title {
    /// Build a title from parts without normalization or validation.
    pub fn make(namespace: i32, db_key: impl Into<String>) -> Self {
        Self {
            namespace,
            db_key: db_key.into(),
            fragment: None,
        }
    }

    /// Parse user-facing text such as `"Special:Preferences"` or
    /// `"Help talk:Editing/Tables#Syntax"`. Returns `None` for text that
    /// cannot name a page.
    pub fn new_from_text(text: &str) -> Option<Self> {
        let normalized = normalize(text);
        if normalized.is_empty() {
            return None;
        }

        let (namespace, rest) = split_namespace(&normalized);
        let (key, fragment) = match rest.split_once('#') {
            Some((key, fragment)) => (
                key.trim_end_matches('_'),
                Some(fragment.trim_matches('_').to_string()).filter(|f| !f.is_empty()),
            ),
            None => (rest, None),
        };

        if !is_valid_key(namespace, key) {
            return None;
        }

        Some(Self {
            namespace,
            db_key: capitalize_first(key),
            fragment,
        })
    }

    pub fn namespace(&self) -> i32 {
        self.namespace
    }

    pub fn db_key(&self) -> &str {
        &self.db_key
    }

    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    pub fn is_special_page(&self) -> bool {
        self.namespace == namespace::SPECIAL
    }

    /// The top-level page of a subpage hierarchy, without fragment.
    /// Namespaces without subpage support are returned as-is.
    pub fn root_title(&self) -> Title {
        let key = if namespace::has_subpages(self.namespace) {
            match self.db_key.split_once('/') {
                Some((root, _)) if !root.is_empty() => root,
                _ => &self.db_key,
            }
        } else {
            &self.db_key
        };
        Title::make(self.namespace, key)
    }

    pub fn equals(&self, other: &Title) -> bool {
        if self.namespace != other.namespace {
            return false;
        }
        if self.is_special_page() {
            self.db_key.to_lowercase() == other.db_key.to_lowercase()
        } else {
            self.db_key == other.db_key
        }
    }

    /// Prefixed text with spaces, e.g. `User talk:Example`.
    pub fn prefixed_text(&self) -> String {
        let key = self.db_key.replace('_', " ");
        match namespace::canonical_name(self.namespace) {
            Some(prefix) => format!("{}:{}", prefix.replace('_', " "), key),
            None => key,
        }
    }
}

impl PartialEq for Title {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Eq for Title {}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.prefixed_text())
    }
}

fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.trim().chars() {
        let c = if c == ' ' { '_' } else { c };
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }
    out.trim_matches('_').to_string()
}

fn split_namespace(text: &str) -> (i32, &str) {
    if let Some(rest) = text.strip_prefix(':') {
        return (namespace::MAIN, rest.trim_start_matches('_'));
    }
    if let Some((prefix, rest)) = text.split_once(':') {
        if let Some(ns) = namespace::lookup(prefix) {
            return (ns, rest.trim_start_matches('_'));
        }
    }
    (namespace::MAIN, text)
}

fn is_valid_key(namespace: i32, key: &str) -> bool {
    let limit = if namespace == namespace::SPECIAL {
        MAX_SPECIAL_KEY_BYTES
    } else {
        MAX_KEY_BYTES
    };
    if key.is_empty() || key.len() > limit || key.starts_with(':') {
        return false;
    }
    if key.chars().any(|c| ILLEGAL.contains(&c) || c.is_control()) {
        return false;
    }
    if key.contains("~~~") {
        return false;
    }
    let relative = key == "."
        || key == ".."
        || key.starts_with("./")
        || key.starts_with("../")
        || key.contains("/./")
        || key.contains("/../")
        || key.ends_with("/.")
        || key.ends_with("/..");
    !relative
}

fn capitalize_first(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
