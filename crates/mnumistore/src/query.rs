//! # Collection Query Engine
//!
//! Turns a store plus filters and a page request into the page of handles
//! to render and the total number of matches.
//!
//! Filtering is an AND of exact string equality on identity fields; there
//! is no partial, ranged or case-insensitive matching. The total always
//! counts the full filtered set, so it does not depend on the page asked
//! for.
//!
//! Results come in store enumeration order by default. For a directory
//! that order is whatever the filesystem returns, which is not stable
//! across platforms, so [`SortOrder::Name`] is available for callers that
//! need a deterministic listing.

use crate::error::{Result, StoreError};
use crate::model::{ResourceHandle, ResourceId, ResourceKind};
use crate::metadata::fallback_locale;
use crate::store::ResourceStore;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const DEFAULT_PER_PAGE: u32 = 10;
pub const MAX_PER_PAGE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Store enumeration order.
    #[default]
    Store,
    /// Ascending by id.
    Name,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Store => "store",
            SortOrder::Name => "name",
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "store" => Ok(SortOrder::Store),
            "name" => Ok(SortOrder::Name),
            other => Err(StoreError::InvalidArgument(format!(
                "unknown sort order: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    Name,
    TypeOrDomain,
    Locale,
    Fallback,
}

impl FilterField {
    /// Maps a public filter key to a field; `type` for calendars, `domain`
    /// and `fallback` for translations.
    pub fn parse(kind: ResourceKind, key: &str) -> Result<Self> {
        match key {
            "name" => Ok(FilterField::Name),
            "locale" => Ok(FilterField::Locale),
            "fallback" if kind == ResourceKind::Translation => Ok(FilterField::Fallback),
            k if k == kind.middle_field() => Ok(FilterField::TypeOrDomain),
            other => Err(StoreError::InvalidArgument(format!(
                "unknown {} filter: {}",
                kind, other
            ))),
        }
    }

    fn value<'a>(self, id: &'a ResourceId) -> &'a str {
        match self {
            FilterField::Name => &id.name,
            FilterField::TypeOrDomain => &id.type_or_domain,
            FilterField::Locale => &id.locale,
            FilterField::Fallback => fallback_locale(&id.locale),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    conditions: Vec<(FilterField, String)>,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: FilterField, value: impl Into<String>) -> Self {
        self.conditions.push((field, value.into()));
        self
    }

    /// Builds filters from public `(key, value)` pairs.
    pub fn from_pairs<K, V, I>(kind: ResourceKind, pairs: I) -> Result<Self>
    where
        K: AsRef<str>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut filters = Self::new();
        for (key, value) in pairs {
            filters = filters.with(FilterField::parse(kind, key.as_ref())?, value);
        }
        Ok(filters)
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn matches(&self, id: &ResourceId) -> bool {
        self.conditions
            .iter()
            .all(|(field, value)| field.value(id) == value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub filters: Filters,
    pub page: u32,
    pub per_page: u32,
    pub order: SortOrder,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            filters: Filters::new(),
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            order: SortOrder::Store,
        }
    }
}

impl ListQuery {
    /// Validates raw page parameters as they arrive from a request.
    pub fn new(page: i64, per_page: i64) -> Result<Self> {
        if page < 1 {
            return Err(StoreError::InvalidArgument(format!(
                "page must be at least 1, got {}",
                page
            )));
        }
        if per_page < 1 || per_page > i64::from(MAX_PER_PAGE) {
            return Err(StoreError::InvalidArgument(format!(
                "per_page must be between 1 and {}, got {}",
                MAX_PER_PAGE, per_page
            )));
        }
        let page = u32::try_from(page)
            .map_err(|_| StoreError::InvalidArgument(format!("page out of range: {}", page)))?;
        Ok(Self {
            page,
            per_page: per_page as u32,
            ..Self::default()
        })
    }

    pub fn with_filters(mut self, filters: Filters) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    pub fn validate(&self) -> Result<()> {
        Self::new(i64::from(self.page), i64::from(self.per_page)).map(|_| ())
    }

    pub fn offset(&self) -> usize {
        (self.page as usize - 1) * self.per_page as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub items: Vec<ResourceHandle>,
    pub total: usize,
}

/// Lists one page of `store` matching `query`.
///
/// Enumeration errors abort the listing.
pub fn list<S: ResourceStore + ?Sized>(store: &S, query: &ListQuery) -> Result<Listing> {
    query.validate()?;
    let offset = query.offset();
    let limit = query.per_page as usize;

    let matching = store
        .list()?
        .filter(|entry| entry.as_ref().map_or(true, |h| query.filters.matches(&h.id)));

    let listing = match query.order {
        SortOrder::Store => {
            let mut items = Vec::with_capacity(limit);
            let mut total = 0;
            for entry in matching {
                let handle = entry?;
                if total >= offset && items.len() < limit {
                    items.push(handle);
                }
                total += 1;
            }
            Listing { items, total }
        }
        SortOrder::Name => {
            let mut all = matching.collect::<Result<Vec<_>>>()?;
            all.sort_by(|a, b| a.id.to_string().cmp(&b.id.to_string()));
            let total = all.len();
            let items = all.into_iter().skip(offset).take(limit).collect();
            Listing { items, total }
        }
    };

    tracing::debug!(
        kind = %store.kind(),
        page = query.page,
        per_page = query.per_page,
        total = listing.total,
        returned = listing.items.len(),
        "listed resources"
    );
    Ok(listing)
}
