// ABOUTME: Generic table-row field extractor keyed by each cell's data-stat label.
// ABOUTME: Captures cell text or link text, link targets, sort keys and cross-reference ids per parser rules.

//! Row field extraction.
//!
//! Every statistics cell on the site carries a `data-stat` attribute naming
//! what it holds. [`extract_row`] turns a row into ordered `(field, value)`
//! pairs:
//!
//! - `{role}`: the link's text when the cell holds a link, otherwise the
//!   cell's own first text node. Roles listed in
//!   [`CellRules::raw_markup_roles`] take the cell's serialized markup instead.
//! - `{role}_href`: the link target, when there is a link.
//! - `{role}_csk`: the sort-key attribute. With
//!   [`CellRules::seconds_played`] the `mp` sort key is stored as `sp`.
//! - `{role}{xref_suffix}`: the `data-append-csv` cross-reference id. The
//!   suffix differs per page type and is kept as each page has always
//!   written it.
//!
//! Cells without a `data-stat` attribute are skipped.

use scraper::ElementRef;
use tracing::debug;

use crate::html_utils::{child_elements, own_text};
use crate::record::Value;

/// Where a cell's hyperlink may sit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkScope {
    /// Only an `a` element that is a direct child of the cell.
    Child,
    /// Any `a` element below the cell.
    Descendant,
}

/// Per-page-type extraction rules.
#[derive(Debug, Clone, Copy)]
pub struct CellRules {
    pub link_scope: LinkScope,
    /// Store the `mp` sort key (seconds) as `sp`.
    pub seconds_played: bool,
    /// Suffix appended to the role for the `data-append-csv` attribute.
    pub xref_suffix: &'static str,
    /// Roles whose value is the cell's outer HTML even when it holds links.
    pub raw_markup_roles: &'static [&'static str],
    /// Log cells that lack a `data-stat` label.
    pub log_unlabelled: bool,
}

/// Box score rows: `mp` sort key becomes `sp`, cross-reference ids land in `{role}_id`.
pub const BOX_SCORE_RULES: CellRules = CellRules {
    link_scope: LinkScope::Child,
    seconds_played: true,
    xref_suffix: "_id",
    raw_markup_roles: &[],
    log_unlabelled: true,
};

/// Player index rows: colleges keep their raw markup, ids land in `{role}_data-append-csv`.
pub const PLAYER_LIST_RULES: CellRules = CellRules {
    link_scope: LinkScope::Descendant,
    seconds_played: false,
    xref_suffix: "_data-append-csv",
    raw_markup_roles: &["colleges"],
    log_unlabelled: false,
};

/// Player profile rows: ids land in `{role}_data_append_csv`.
pub const PLAYER_PROFILE_RULES: CellRules = CellRules {
    link_scope: LinkScope::Child,
    seconds_played: false,
    xref_suffix: "_data_append_csv",
    raw_markup_roles: &[],
    log_unlabelled: false,
};

const ROLE_ATTR: &str = "data-stat";
const SORT_KEY_ATTR: &str = "csk";
const XREF_ATTR: &str = "data-append-csv";

/// Extracts the fields of every `th`/`td` cell directly inside `row`.
pub fn extract_row(row: ElementRef<'_>, rules: &CellRules) -> Vec<(String, Value)> {
    let mut fields = Vec::new();
    for cell in row.children().filter_map(ElementRef::wrap) {
        let tag = cell.value().name();
        if tag != "th" && tag != "td" {
            continue;
        }
        extract_cell(cell, rules, &mut fields);
    }
    fields
}

/// Extracts one cell into `out`. Does nothing for unlabelled cells.
pub fn extract_cell(cell: ElementRef<'_>, rules: &CellRules, out: &mut Vec<(String, Value)>) {
    let attrs = cell.value();
    let Some(role) = attrs.attr(ROLE_ATTR) else {
        if rules.log_unlabelled {
            debug!(cell = %cell.html(), "skipping cell without data-stat");
        }
        return;
    };

    match find_link(cell, rules.link_scope) {
        Some(_) if rules.raw_markup_roles.contains(&role) => {
            out.push((role.to_string(), Value::Text(cell.html())));
        }
        Some(link) => {
            out.push((role.to_string(), own_text(link).into()));
            out.push((format!("{}_href", role), link.value().attr("href").into()));
        }
        None => {
            out.push((role.to_string(), own_text(cell).into()));
        }
    }

    if let Some(csk) = attrs.attr(SORT_KEY_ATTR) {
        let name = if rules.seconds_played && role == "mp" {
            "sp".to_string()
        } else {
            format!("{}_csk", role)
        };
        out.push((name, csk.into()));
    }

    if let Some(xref) = attrs.attr(XREF_ATTR) {
        out.push((format!("{}{}", role, rules.xref_suffix), xref.into()));
    }
}

fn find_link(cell: ElementRef<'_>, scope: LinkScope) -> Option<ElementRef<'_>> {
    match scope {
        LinkScope::Child => child_elements(cell, "a").next(),
        LinkScope::Descendant => cell
            .descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "a"),
    }
}
