// ABOUTME: HTML helpers shared by the page parsers.
// ABOUTME: Hidden-table unwrapping, data-row selection, direct text lookup and href scanning.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

static DATA_ROWS: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"tbody tr:not([class*="thead"])"#).unwrap());
static LINKS: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

/// Strips HTML comment delimiters so that tables the site ships inside
/// `<!-- ... -->` become part of the document.
///
/// Must run on the raw document before table discovery.
pub fn unwrap_hidden_tables(html: &str) -> String {
    html.replace("<!--", "").replace("-->", "")
}

/// Data rows of a table body: every `tr` below a `tbody` whose class does
/// not mark it as a repeated header.
pub fn data_rows<'a>(table: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    table.select(&DATA_ROWS)
}

/// First text node directly inside `el`, untrimmed.
pub fn own_text(el: ElementRef<'_>) -> Option<String> {
    el.children()
        .find_map(|node| node.value().as_text().map(|t| t.to_string()))
}

/// First text node anywhere below `el`, in document order.
pub fn first_text(el: ElementRef<'_>) -> Option<String> {
    el.text().next().map(str::to_string)
}

/// Direct element children of `el` with the given tag name.
pub fn child_elements<'a>(
    el: ElementRef<'a>,
    tag: &'a str,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    el.children()
        .filter_map(ElementRef::wrap)
        .filter(move |child| child.value().name() == tag)
}

/// Every href on the page, in document order.
pub fn hrefs(doc: &Html) -> impl Iterator<Item = &str> {
    doc.select(&LINKS).filter_map(|a| a.value().attr("href"))
}
