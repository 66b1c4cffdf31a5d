pub mod errors;
pub mod config;
pub mod context;
pub mod engine;
pub mod namespace;
pub mod page;
pub mod resolver;
pub mod title;
mod pattern;

pub use config::{ExclusionConfig, FeatureOptions, QueryRule, QueryRules};
pub use context::{QueryParams, RequestContext};
pub use engine::ExclusionEvaluator;
pub use errors::{ExclusionError, Result};
pub use page::{CurrentPage, PageIdentity};
pub use pattern::{QueryPattern, WILDCARD};
pub use resolver::{AliasTable, PageNameResolver, ResolvedAlias};
pub use title::Title;

/// Convenience: evaluate `options.exclude` with the given resolver.
pub fn should_disable<R, Q>(
    options: &FeatureOptions,
    resolver: &R,
    request: &Q,
    page: Option<&dyn PageIdentity>,
) -> Result<bool>
where
    R: PageNameResolver + ?Sized,
    Q: RequestContext + ?Sized,
{
    ExclusionEvaluator::new(resolver).should_disable(&options.exclude, request, page)
}
