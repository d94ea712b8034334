//! Collection pagination metadata and the response headers derived from it.

use serde::Serialize;
use url::Url;

pub const TOTAL_HEADER: &str = "X-WP-Total";
pub const TOTAL_PAGES_HEADER: &str = "X-WP-TotalPages";
pub const LINK_HEADER: &str = "Link";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: u32,
    pub per_page: u32,
    pub total: usize,
    pub total_pages: u32,
}

impl PageInfo {
    pub fn new(page: u32, per_page: u32, total: usize) -> Self {
        let total_pages = if per_page == 0 {
            0
        } else {
            total.div_ceil(per_page as usize)
        };
        Self {
            page,
            per_page,
            total,
            total_pages: u32::try_from(total_pages).unwrap_or(u32::MAX),
        }
    }

    /// Previous page, pulled back onto the last existing page when the
    /// request went past the end.
    pub fn prev_page(&self) -> Option<u32> {
        (self.page > 1).then(|| (self.page - 1).min(self.total_pages).max(1))
    }

    pub fn next_page(&self) -> Option<u32> {
        (self.total_pages > self.page).then(|| self.page + 1)
    }

    /// `Link` header value, or `None` when there is neither a previous nor
    /// a next page.
    ///
    /// `params` are the request's query parameters; `page` among them is
    /// replaced, the rest are kept in order.
    pub fn link_header(&self, collection: &Url, params: &[(String, String)]) -> Option<String> {
        let mut links = Vec::new();
        if let Some(prev) = self.prev_page() {
            links.push(format!("<{}>; rel=\"prev\"", page_url(collection, params, prev)));
        }
        if let Some(next) = self.next_page() {
            links.push(format!("<{}>; rel=\"next\"", page_url(collection, params, next)));
        }
        (!links.is_empty()).then(|| links.join(", "))
    }

    pub fn headers(&self, collection: &Url, params: &[(String, String)]) -> Vec<(&'static str, String)> {
        let mut headers = vec![
            (TOTAL_HEADER, self.total.to_string()),
            (TOTAL_PAGES_HEADER, self.total_pages.to_string()),
        ];
        if let Some(link) = self.link_header(collection, params) {
            headers.push((LINK_HEADER, link));
        }
        headers
    }
}

fn page_url(collection: &Url, params: &[(String, String)], page: u32) -> Url {
    let mut url = collection.clone();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(params.iter().filter(|(key, _)| key != "page"))
        .append_pair("page", &page.to_string());
    url
}
