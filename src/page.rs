use crate::title::Title;

/// The resolved page of the current request, as seen by the evaluator.
pub trait PageIdentity {
    /// Whether this is the site's designated main page.
    fn is_main_page(&self) -> bool;
    fn namespace(&self) -> i32;
    /// The page with subpage and fragment qualifiers stripped.
    fn root_title(&self) -> Title;
    fn is_special_page(&self) -> bool;
    fn db_key(&self) -> &str;
}

/// A [`Title`] paired with the knowledge of whether it is the main page.
#[derive(Debug, Clone)]
pub struct CurrentPage {
    title: Title,
    main_page: bool,
}

impl CurrentPage {
    /// Wrap `title`, flagging it as the main page when it equals `main_page`.
    pub fn new(title: Title, main_page: &Title) -> Self {
        let main_page = title.equals(main_page);
        Self { title, main_page }
    }

    /// Parse both titles from text; `None` if `text` is not a valid title.
    /// An unparsable `main_page_text` means no page is the main page.
    pub fn from_text(text: &str, main_page_text: &str) -> Option<Self> {
        let title = Title::new_from_text(text)?;
        let main_page = Title::new_from_text(main_page_text)
            .map(|main| title.equals(&main))
            .unwrap_or(false);
        Some(Self { title, main_page })
    }

    pub fn title(&self) -> &Title {
        &self.title
    }
}

impl PageIdentity for CurrentPage {
    fn is_main_page(&self) -> bool {
        self.main_page
    }

    fn namespace(&self) -> i32 {
        self.title.namespace()
    }

    fn root_title(&self) -> Title {
        self.title.root_title()
    }

    fn is_special_page(&self) -> bool {
        self.title.is_special_page()
    }

    fn db_key(&self) -> &str {
        self.title.db_key()
    }
}
