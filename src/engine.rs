use tracing::{debug, trace, warn};

use crate::config::ExclusionConfig;
use crate::context::RequestContext;
use crate::errors::Result;
use crate::namespace;
use crate::page::PageIdentity;
use crate::resolver::PageNameResolver;
use crate::title::Title;

/// Decides whether a feature is disabled for one request.
///
/// Holds only the special page name resolver; configuration, request and page
/// are passed per call, so one evaluator can serve any number of requests.
pub struct ExclusionEvaluator<'r, R: PageNameResolver + ?Sized> {
    resolver: &'r R,
}

impl<'r, R: PageNameResolver + ?Sized> ExclusionEvaluator<'r, R> {
    pub fn new(resolver: &'r R) -> Self {
        Self { resolver }
    }

    /// Rules apply in order and the first one that applies decides:
    /// main page, page titles, namespaces, then query parameters.
    ///
    /// Fails only if the resolver fails or the query pattern that is reached
    /// is not a valid regular expression.
    pub fn should_disable<Q>(
        &self,
        config: &ExclusionConfig,
        request: &Q,
        page: Option<&dyn PageIdentity>,
    ) -> Result<bool>
    where
        Q: RequestContext + ?Sized,
    {
        if let Some(page) = page {
            if page.is_main_page() {
                debug!(excluded = config.mainpage, "main page rule decided");
                return Ok(config.mainpage);
            }
        }

        let canonical = match page {
            Some(page) => Some(self.canonical_title(page)?),
            None => None,
        };

        if let Some(canonical) = &canonical {
            if let Some(text) = matching_title(config, canonical) {
                debug!(title = %canonical, entry = %text, "page title rule decided");
                return Ok(true);
            }
        }

        if let Some(page) = page {
            if config.namespaces.contains(&page.namespace()) {
                debug!(namespace = page.namespace(), "namespace rule decided");
                return Ok(true);
            }
        }

        // Only the first configured parameter present on the request is
        // tested; later entries are never reached. Kept for compatibility.
        for rule in &config.querystring {
            let Some(value) = request.raw_val(&rule.param) else {
                trace!(param = %rule.param, "query parameter absent");
                continue;
            };
            let matched = rule.compile()?.is_match(value);
            debug!(param = %rule.param, matched, "query string rule decided");
            return Ok(matched);
        }

        Ok(false)
    }

    /// The root title, with special page aliases replaced by their canonical name.
    fn canonical_title(&self, page: &dyn PageIdentity) -> Result<Title> {
        let root = page.root_title();
        if !root.is_special_page() {
            return Ok(root);
        }
        let resolved = self.resolver.resolve_alias(root.db_key())?;
        Ok(match resolved.name {
            Some(name) => Title::make(namespace::SPECIAL, name),
            None => root,
        })
    }
}

/// First `pagetitles` entry naming `canonical`. Special page entries are
/// matched case-insensitively; malformed entries never match.
fn matching_title<'c>(config: &'c ExclusionConfig, canonical: &Title) -> Option<&'c str> {
    config
        .pagetitles
        .iter()
        .find(|text| {
            let candidate = if canonical.is_special_page() {
                Title::new_from_text(&text.to_lowercase())
            } else {
                Title::new_from_text(text)
            };
            match candidate {
                Some(excluded) => canonical.equals(&excluded),
                None => {
                    warn!(entry = %text, "ignoring malformed excluded page title");
                    false
                }
            }
        })
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QueryRules;
    use crate::context::QueryParams;
    use crate::errors::ExclusionError;
    use crate::page::CurrentPage;
    use crate::resolver::{AliasTable, ResolvedAlias};

    struct FailingResolver;

    impl PageNameResolver for FailingResolver {
        fn resolve_alias(&self, _raw_key: &str) -> Result<ResolvedAlias> {
            Err(ExclusionError::Resolver("alias service unavailable".into()))
        }
    }

    fn page(text: &str) -> CurrentPage {
        CurrentPage::from_text(text, "Main Page").unwrap()
    }

    #[test]
    fn main_page_short_circuits_everything() {
        let table = AliasTable::with_builtins();
        let ev = ExclusionEvaluator::new(&table);
        let config = ExclusionConfig {
            mainpage: false,
            namespaces: [0].into_iter().collect(),
            pagetitles: vec!["Main Page".into()],
            querystring: [("action", "*")].into_iter().collect(),
        };
        let request = QueryParams::parse("action=edit");
        let main = page("Main_Page");
        assert!(!ev.should_disable(&config, &request, Some(&main)).unwrap());
    }

    #[test]
    fn special_alias_is_canonicalized_before_title_check() {
        let table = AliasTable::with_builtins();
        let ev = ExclusionEvaluator::new(&table);
        let config = ExclusionConfig {
            pagetitles: vec!["Special:Contributions".into()],
            ..Default::default()
        };
        let contribs = page("Special:Contribs/Alice");
        let request = QueryParams::new();
        assert!(ev.should_disable(&config, &request, Some(&contribs)).unwrap());
    }

    #[test]
    fn resolver_is_not_consulted_for_content_pages() {
        let ev = ExclusionEvaluator::new(&FailingResolver);
        let config = ExclusionConfig::default();
        let request = QueryParams::new();
        let article = page("Rust (programming language)");
        assert!(!ev.should_disable(&config, &request, Some(&article)).unwrap());
    }

    #[test]
    fn resolver_failure_propagates() {
        let ev = ExclusionEvaluator::new(&FailingResolver);
        let config = ExclusionConfig::default();
        let request = QueryParams::new();
        let special = page("Special:Search");
        let err = ev.should_disable(&config, &request, Some(&special)).unwrap_err();
        assert!(matches!(err, ExclusionError::Resolver(_)));
    }

    #[test]
    fn malformed_title_entry_does_not_stop_later_entries() {
        let table = AliasTable::with_builtins();
        let ev = ExclusionEvaluator::new(&table);
        let config = ExclusionConfig {
            pagetitles: vec!["[[broken]]".into(), "".into(), "Help:Contents".into()],
            ..Default::default()
        };
        let request = QueryParams::new();
        assert!(ev.should_disable(&config, &request, Some(&page("Help:Contents"))).unwrap());
        assert!(!ev.should_disable(&config, &request, Some(&page("Help:Other"))).unwrap());
    }

    #[test]
    fn subpage_matches_root_title_entry() {
        let table = AliasTable::with_builtins();
        let ev = ExclusionEvaluator::new(&table);
        let config = ExclusionConfig {
            pagetitles: vec!["User:Alice".into()],
            ..Default::default()
        };
        let request = QueryParams::new();
        let sandbox = page("User:Alice/Sandbox");
        assert!(ev.should_disable(&config, &request, Some(&sandbox)).unwrap());
    }

    #[test]
    fn invalid_pattern_only_fails_when_reached() {
        let table = AliasTable::with_builtins();
        let ev = ExclusionEvaluator::new(&table);
        let querystring: QueryRules = [("action", "edit"), ("diff", "(")].into_iter().collect();
        let config = ExclusionConfig {
            querystring,
            ..Default::default()
        };

        let decided_earlier = QueryParams::parse("action=edit&diff=1");
        assert!(ev.should_disable(&config, &decided_earlier, None).unwrap());

        let reaches_bad = QueryParams::parse("diff=1");
        let err = ev.should_disable(&config, &reaches_bad, None).unwrap_err();
        assert!(matches!(err, ExclusionError::InvalidPattern { ref param, .. } if param == "diff"));
    }
}
