use std::path::Path;

use clap::Parser;
use page_feature_exclusion::{
    AliasTable, CurrentPage, ExclusionError, FeatureOptions, PageIdentity, QueryParams,
};
use tracing_subscriber::EnvFilter;

/// Decide whether a page feature is disabled for a request.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Feature options: a JSON file path or an inline JSON document.
    #[arg(long)]
    options: String,
    /// Page title of the request (omit for requests without a page).
    #[arg(long)]
    title: Option<String>,
    /// Title of the site's main page.
    #[arg(long, default_value = "Main Page")]
    main_page: String,
    /// Raw query string, e.g. `action=edit&diff=5`.
    #[arg(long, default_value = "")]
    query: String,
    /// Only validate the options.
    #[arg(long)]
    check: bool,
}

fn main() {
    init_logging();

    let args = Args::parse();
    match run(&args) {
        Ok(out) => println!("{out}"),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn run(args: &Args) -> Result<String, ExclusionError> {
    let options = load_options(&args.options)?;
    options.exclude.validate()?;
    if args.check {
        return Ok("ok".into());
    }

    let page = match &args.title {
        Some(text) => Some(
            CurrentPage::from_text(text, &args.main_page)
                .ok_or_else(|| ExclusionError::Options(format!("invalid title: {text:?}")))?,
        ),
        None => None,
    };
    let request = QueryParams::parse(&args.query);
    let resolver = AliasTable::with_builtins();

    let disabled = page_feature_exclusion::should_disable(
        &options,
        &resolver,
        &request,
        page.as_ref().map(|p| p as &dyn PageIdentity),
    )?;
    Ok(disabled.to_string())
}

fn load_options(source: &str) -> Result<FeatureOptions, ExclusionError> {
    let trimmed = source.trim_start();
    if trimmed.starts_with('{') {
        return FeatureOptions::from_json(trimmed);
    }
    let path = Path::new(source);
    let json = std::fs::read_to_string(path)
        .map_err(|e| ExclusionError::Options(format!("{}: {e}", path.display())))?;
    tracing::debug!(path = %path.display(), "loaded options file");
    FeatureOptions::from_json(&json)
}
