use std::collections::HashMap;
use std::sync::Arc;

use itertools::Itertools;

use crate::errors::Result;

/// Outcome of resolving a special page key such as `Contribs/Alice`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedAlias {
    /// Canonical special page name, `None` if the alias is unknown.
    pub name: Option<String>,
    /// Trailing `/`-separated parameter, if any.
    pub param: Option<String>,
}

/// Maps special page aliases to their canonical names.
pub trait PageNameResolver: Send + Sync {
    fn resolve_alias(&self, raw_key: &str) -> Result<ResolvedAlias>;
}

/// Thread-safe alias table with case-insensitive lookup.
#[derive(Clone, Default)]
pub struct AliasTable {
    inner: Arc<HashMap<String, String>>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Core special pages and their common English aliases.
    pub fn with_builtins() -> Self {
        let mut table = Self::new();
        for (canonical, aliases) in builtins::PAGES {
            table.register(canonical, aliases);
        }
        table
    }

    /// Register `canonical` under its own name and every alias in `aliases`.
    pub fn register(&mut self, canonical: &str, aliases: &[&str]) {
        let map = Arc::make_mut(&mut self.inner);
        for alias in std::iter::once(&canonical).chain(aliases) {
            map.insert(fold(alias), canonical.to_string());
        }
    }

    pub fn canonical_names(&self) -> Vec<&str> {
        self.inner
            .values()
            .map(String::as_str)
            .sorted()
            .dedup()
            .collect()
    }

    fn lookup(&self, alias: &str) -> Option<&str> {
        self.inner.get(&fold(alias)).map(String::as_str)
    }
}

impl PageNameResolver for AliasTable {
    fn resolve_alias(&self, raw_key: &str) -> Result<ResolvedAlias> {
        let (alias, param) = match raw_key.split_once('/') {
            Some((alias, param)) => (alias, Some(param.to_string())),
            None => (raw_key, None),
        };
        Ok(ResolvedAlias {
            name: self.lookup(alias).map(str::to_string),
            param,
        })
    }
}

fn fold(alias: &str) -> String {
    alias.replace(' ', "_").to_lowercase()
}

mod builtins {
    pub(super) const PAGES: &[(&str, &[&str])] = &[
        ("Allpages", &["AllPages"]),
        ("Blankpage", &["BlankPage"]),
        ("Contributions", &["Contribs", "Contributions"]),
        ("CreateAccount", &["Create_account"]),
        ("Mypage", &["MyPage"]),
        ("Mytalk", &["MyTalk"]),
        ("Movepage", &["MovePage", "Move"]),
        ("Preferences", &["Prefs"]),
        ("Randompage", &["Random", "RandomPage"]),
        ("Recentchanges", &["RecentChanges", "Recent_changes"]),
        ("Search", &[]),
        ("Specialpages", &["SpecialPages"]),
        ("Upload", &[]),
        ("Userlogin", &["Login", "UserLogin", "Log_in"]),
        ("Userlogout", &["Logout", "UserLogout", "Log_out"]),
        ("Version", &[]),
        ("Watchlist", &[]),
        ("EditWatchlist", &[]),
        ("Whatlinkshere", &["WhatLinksHere"]),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn resolves_alias_and_param() {
        let table = AliasTable::with_builtins();
        let resolved = table.resolve_alias("Contribs/Alice/extra").unwrap();
        assert_eq!(resolved.name.as_deref(), Some("Contributions"));
        assert_eq!(resolved.param.as_deref(), Some("Alice/extra"));
    }

    #[test]
    fn lookup_ignores_case_and_spaces() {
        let table = AliasTable::with_builtins();
        assert_eq!(
            table.resolve_alias("recent changes").unwrap().name.as_deref(),
            Some("Recentchanges")
        );
        assert_eq!(table.resolve_alias("LOGIN").unwrap().name.as_deref(), Some("Userlogin"));
    }

    #[test]
    fn unknown_alias_keeps_param() {
        let table = AliasTable::with_builtins();
        let resolved = table.resolve_alias("NoSuchPage/x").unwrap();
        assert_eq!(resolved, ResolvedAlias { name: None, param: Some("x".into()) });
    }

    #[test]
    fn register_extends_clone_only() {
        let base = AliasTable::new();
        let mut custom = base.clone();
        custom.register("MySpecialPage", &["MSP"]);
        assert_eq!(custom.canonical_names(), vec!["MySpecialPage"]);
        assert!(base.canonical_names().is_empty());
    }
}
