//! # API Facade
//!
//! [`DesignerApi`] is the single entry point for the two resource
//! collections. It picks the store for a kind, fills in listing defaults
//! and dispatches to [`crate::commands`]. It holds no business logic and
//! does no terminal or HTTP work.
//!
//! The facade is generic over the store and the dictionary:
//!
//! - Production: `DesignerApi<FsStore, Box<dyn Dictionary>>`, see
//!   [`DesignerApi::from_config`]
//! - Testing: `DesignerApi<InMemoryStore, StaticDictionary>`

use crate::commands::{self, create::NewResource, update::ResourceUpdate, CmdResult, View};
use crate::config::DesignerConfig;
use crate::dictionary::Dictionary;
use crate::error::{Result, StoreError};
use crate::mapper::{Fields, RenderContext};
use crate::model::ResourceKind;
use crate::pagination::PageInfo;
use crate::query::{Filters, ListQuery, SortOrder, DEFAULT_PER_PAGE};
use crate::store::fs::FsStore;
use crate::store::ResourceStore;

/// Raw listing parameters as a request carries them.
#[derive(Debug, Clone, Default)]
pub struct ListParams {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    /// Filter key/value pairs (`name`, `type`/`domain`, `locale`, `fallback`).
    pub filters: Vec<(String, String)>,
    pub order: Option<SortOrder>,
}

impl ListParams {
    /// The parameters as query pairs, for pagination links.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = self.filters.clone();
        if let Some(order) = self.order {
            pairs.push(("order".to_string(), order.to_string()));
        }
        if let Some(per_page) = self.per_page {
            pairs.push(("per_page".to_string(), per_page.to_string()));
        }
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        pairs
    }
}

pub struct DesignerApi<S: ResourceStore, D: Dictionary> {
    calendars: S,
    translations: S,
    dictionary: D,
    ctx: RenderContext,
    order: SortOrder,
    per_page: u32,
}

impl<S: ResourceStore, D: Dictionary> DesignerApi<S, D> {
    pub fn new(calendars: S, translations: S, dictionary: D, ctx: RenderContext) -> Result<Self> {
        if calendars.kind() != ResourceKind::Calendar || translations.kind() != ResourceKind::Translation {
            return Err(StoreError::InvalidArgument(
                "stores must hold calendars and translations respectively".into(),
            ));
        }
        Ok(Self {
            calendars,
            translations,
            dictionary,
            ctx,
            order: SortOrder::default(),
            per_page: DEFAULT_PER_PAGE,
        })
    }

    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    pub fn store(&self, kind: ResourceKind) -> &S {
        match kind {
            ResourceKind::Calendar => &self.calendars,
            ResourceKind::Translation => &self.translations,
        }
    }

    pub fn render_context(&self) -> &RenderContext {
        &self.ctx
    }

    fn view<'a>(&'a self, fields: &'a Fields) -> View<'a> {
        View::new(&self.ctx, &self.dictionary, fields)
    }

    /// Validates request parameters into a query, filling in the
    /// configured page size and order.
    pub fn query(&self, kind: ResourceKind, params: &ListParams) -> Result<ListQuery> {
        let page = params.page.unwrap_or(1);
        let per_page = params.per_page.unwrap_or(i64::from(self.per_page));
        let filters = Filters::from_pairs(
            kind,
            params.filters.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        )?;
        Ok(ListQuery::new(page, per_page)?
            .with_filters(filters)
            .with_order(params.order.unwrap_or(self.order)))
    }

    pub fn list(&self, kind: ResourceKind, params: &ListParams, fields: &Fields) -> Result<CmdResult> {
        let query = self.query(kind, params)?;
        commands::list::run(self.store(kind), &query, self.view(fields))
    }

    /// `X-WP-Total`, `X-WP-TotalPages` and `Link` values for a listing.
    pub fn page_headers(
        &self,
        kind: ResourceKind,
        page: &PageInfo,
        params: &ListParams,
    ) -> Vec<(&'static str, String)> {
        page.headers(&self.ctx.collection_url(kind), &params.query_pairs())
    }

    pub fn get(&self, kind: ResourceKind, id: &str, fields: &Fields) -> Result<CmdResult> {
        commands::get::run(self.store(kind), id, self.view(fields))
    }

    pub fn create(&self, input: &NewResource, fields: &Fields) -> Result<CmdResult> {
        commands::create::run(self.store(input.kind()), input, self.view(fields))
    }

    pub fn update(
        &self,
        kind: ResourceKind,
        id: &str,
        update: &ResourceUpdate,
        expected_version: Option<&str>,
        fields: &Fields,
    ) -> Result<CmdResult> {
        commands::update::run(self.store(kind), id, update, expected_version, self.view(fields))
    }

    pub fn delete(&self, kind: ResourceKind, id: &str) -> Result<CmdResult> {
        commands::delete::run(self.store(kind), id)
    }
}

impl DesignerApi<FsStore, Box<dyn Dictionary>> {
    /// Wires file stores under the configured data directory.
    pub fn from_config(config: &DesignerConfig) -> Result<Self> {
        let base = config.data_dir()?;
        tracing::debug!(data_dir = %base.display(), "opening stores");
        Ok(Self::new(
            FsStore::under(&base, ResourceKind::Calendar),
            FsStore::under(&base, ResourceKind::Translation),
            config.dictionary(),
            config.render_context()?,
        )?
        .with_order(config.sort_order()?)
        .with_per_page(config.default_per_page()?))
    }
}
