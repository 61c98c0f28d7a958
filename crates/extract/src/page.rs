// ABOUTME: Page input and extraction output types shared by every parser.
// ABOUTME: A Page is a fetched URL plus its decoded body; an Extraction is records plus follow-up links.

use scraper::Html;

use crate::record::EmittedRecord;

/// A fetched page.
#[derive(Debug, Clone)]
pub struct Page {
    /// The URL the page was requested from. Parsers derive ids from it.
    pub url: String,
    pub body: String,
}

impl Page {
    pub fn new(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            body: body.into(),
        }
    }

    /// Parses the body into an HTML document.
    pub fn document(&self) -> Html {
        Html::parse_document(&self.body)
    }
}

/// Output of one parser invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    /// Batches to emit, in the order they were assembled.
    pub records: Vec<EmittedRecord>,
    /// Hrefs (as found on the page, possibly relative) worth following.
    pub links: Vec<String>,
}

impl Extraction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a batch unless it carries no rows.
    pub fn push_record(&mut self, record: EmittedRecord) {
        if !record.payload.is_empty() {
            self.records.push(record);
        }
    }
}
