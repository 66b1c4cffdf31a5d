//! Built-in namespaces: ids, display names and prefix lookup.

pub const MEDIA: i32 = -2;
pub const SPECIAL: i32 = -1;
pub const MAIN: i32 = 0;
pub const TALK: i32 = 1;
pub const USER: i32 = 2;
pub const USER_TALK: i32 = 3;
pub const PROJECT: i32 = 4;
pub const PROJECT_TALK: i32 = 5;
pub const FILE: i32 = 6;
pub const FILE_TALK: i32 = 7;
pub const MEDIAWIKI: i32 = 8;
pub const MEDIAWIKI_TALK: i32 = 9;
pub const TEMPLATE: i32 = 10;
pub const TEMPLATE_TALK: i32 = 11;
pub const HELP: i32 = 12;
pub const HELP_TALK: i32 = 13;
pub const CATEGORY: i32 = 14;
pub const CATEGORY_TALK: i32 = 15;

const CANONICAL: &[(i32, &str)] = &[
    (MEDIA, "Media"),
    (SPECIAL, "Special"),
    (TALK, "Talk"),
    (USER, "User"),
    (USER_TALK, "User_talk"),
    (PROJECT, "Project"),
    (PROJECT_TALK, "Project_talk"),
    (FILE, "File"),
    (FILE_TALK, "File_talk"),
    (MEDIAWIKI, "MediaWiki"),
    (MEDIAWIKI_TALK, "MediaWiki_talk"),
    (TEMPLATE, "Template"),
    (TEMPLATE_TALK, "Template_talk"),
    (HELP, "Help"),
    (HELP_TALK, "Help_talk"),
    (CATEGORY, "Category"),
    (CATEGORY_TALK, "Category_talk"),
];

const ALIASES: &[(&str, i32)] = &[("Image", FILE), ("Image_talk", FILE_TALK)];

/// Namespaces whose pages may have `/`-separated subpages.
const WITH_SUBPAGES: &[i32] = &[
    TALK,
    USER,
    USER_TALK,
    PROJECT,
    PROJECT_TALK,
    FILE_TALK,
    MEDIAWIKI,
    MEDIAWIKI_TALK,
    TEMPLATE,
    TEMPLATE_TALK,
    HELP,
    HELP_TALK,
    CATEGORY_TALK,
];

/// Canonical prefix for `ns`, `None` for the main namespace or unknown ids.
pub fn canonical_name(ns: i32) -> Option<&'static str> {
    CANONICAL
        .iter()
        .find(|(id, _)| *id == ns)
        .map(|(_, name)| *name)
}

/// Resolve a prefix (case-insensitive, spaces and underscores equivalent).
pub fn lookup(prefix: &str) -> Option<i32> {
    let wanted = prefix.trim().replace(' ', "_");
    CANONICAL
        .iter()
        .map(|(id, name)| (*name, *id))
        .chain(ALIASES.iter().copied())
        .find(|(name, _)| name.eq_ignore_ascii_case(&wanted))
        .map(|(_, id)| id)
}

pub fn has_subpages(ns: i32) -> bool {
    WITH_SUBPAGES.contains(&ns)
}
