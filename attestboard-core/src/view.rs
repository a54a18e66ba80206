//! Presentation models for the dashboard view.
//!
//! Pure data shaping: stat cards, table rows and pagination items computed
//! from already-fetched schemas. No fetching happens here.

use serde::Serialize;

use crate::{
    error::AttestboardError,
    types::{Schema, SchemaUid},
};

/// Default table page size.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Render state of a remote query.
///
/// Exactly one view is rendered per state; the data is only reachable
/// through `Ready`.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum QueryState<T> {
    Loading,
    Error { message: String },
    Ready { data: T },
}

impl<T> From<Result<T, AttestboardError>> for QueryState<T> {
    fn from(result: Result<T, AttestboardError>) -> Self {
        match result {
            Ok(data) => QueryState::Ready { data },
            Err(e) => QueryState::Error {
                message: e.to_string(),
            },
        }
    }
}

/// One stat card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StatCard {
    pub title: String,
    pub value: u64,
}

/// One row of the schema table.
#[derive(Clone, Debug, Serialize)]
pub struct SchemaRow {
    /// Display ordinal, e.g. `#12`.
    pub ordinal: String,
    /// Full uid, used for row navigation.
    pub uid: SchemaUid,
    /// Truncated uid for display.
    pub uid_display: String,
    /// Individual field-type badges.
    pub field_badges: Vec<String>,
    /// Attestation count as reported by the indexer.
    pub attestations: u64,
}

impl SchemaRow {
    fn from_schema(schema: &Schema) -> Self {
        Self {
            ordinal: format!("#{}", schema.index),
            uid: schema.uid.clone(),
            uid_display: truncate_middle(schema.uid.as_str(), 6, 4),
            field_badges: schema
                .field_types()
                .into_iter()
                .map(str::to_string)
                .collect(),
            attestations: schema.attestation_count,
        }
    }
}

/// Pagination widget items.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PageItem {
    Previous,
    Page { number: usize, active: bool },
    Ellipsis,
    Next,
}

/// The dashboard view model.
#[derive(Clone, Debug, Serialize)]
pub struct Dashboard {
    /// The three stat cards.
    pub stats: [StatCard; 3],
    /// Rows of the requested table page.
    pub rows: Vec<SchemaRow>,
    /// Requested page (1-based, clamped).
    pub page: usize,
    /// Total number of pages (at least 1).
    pub total_pages: usize,
    /// Pagination widget items.
    pub pagination: Vec<PageItem>,
}

impl Dashboard {
    /// Build the first page with the default page size.
    pub fn new(schemata: &[Schema]) -> Self {
        Self::for_page(schemata, 1, DEFAULT_PAGE_SIZE)
    }

    /// Build the full view for one table page.
    pub fn for_page(schemata: &[Schema], page: usize, per_page: usize) -> Self {
        let per_page = per_page.max(1);
        let total_pages = total_pages(schemata.len(), per_page);
        let page = page.clamp(1, total_pages);

        let rows = schemata
            .iter()
            .skip((page - 1) * per_page)
            .take(per_page)
            .map(SchemaRow::from_schema)
            .collect();

        Self {
            stats: stats(schemata),
            rows,
            page,
            total_pages,
            pagination: page_items(page, total_pages),
        }
    }
}

/// The three stat cards: schema total plus on-/off-chain attestation totals.
pub fn stats(schemata: &[Schema]) -> [StatCard; 3] {
    let off_chain: u64 = schemata
        .iter()
        .map(|s| s.attestations.iter().filter(|a| a.is_offchain).count() as u64)
        .sum();
    let on_chain: u64 = schemata
        .iter()
        .map(|s| s.attestations.iter().filter(|a| !a.is_offchain).count() as u64)
        .sum();

    [
        StatCard {
            title: "All Schemas".to_string(),
            value: schemata.len() as u64,
        },
        StatCard {
            title: "OnChain Attestation".to_string(),
            value: on_chain,
        },
        StatCard {
            title: "OffChain Attestation".to_string(),
            value: off_chain,
        },
    ]
}

/// Build the pagination item list: first and last page always visible, a
/// window around the current page, ellipses for the gaps.
pub fn page_items(current: usize, total: usize) -> Vec<PageItem> {
    let mut items = vec![PageItem::Previous];
    let mut last_shown = 0usize;

    for number in 1..=total {
        let in_window =
            number == 1 || number == total || (number + 1 >= current && number <= current + 1);
        if !in_window {
            continue;
        }
        if number > last_shown + 1 {
            items.push(PageItem::Ellipsis);
        }
        items.push(PageItem::Page {
            number,
            active: number == current,
        });
        last_shown = number;
    }

    items.push(PageItem::Next);
    items
}

/// Shorten a long identifier for display, keeping both ends.
pub fn truncate_middle(s: &str, front: usize, back: usize) -> String {
    if s.len() <= front + back + 3 {
        return s.to_string();
    }
    format!("{}...{}", &s[..front], &s[s.len() - back..])
}

fn total_pages(len: usize, per_page: usize) -> usize {
    if len == 0 {
        1
    } else {
        (len + per_page - 1) / per_page
    }
}
