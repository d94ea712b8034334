use crate::commands::{CmdMessage, CmdResult, View};
use crate::error::{Result, StoreError};
use crate::pagination::PageInfo;
use crate::query::{self, ListQuery};
use crate::store::ResourceStore;

/// Lists one page of documents.
///
/// A file removed between enumeration and rendering is left out of the
/// page with a warning; the total still counts it.
pub fn run<S: ResourceStore + ?Sized>(store: &S, query: &ListQuery, view: View<'_>) -> Result<CmdResult> {
    let listing = query::list(store, query)?;
    let mut result = CmdResult {
        page: Some(PageInfo::new(query.page, query.per_page, listing.total)),
        ..CmdResult::default()
    };

    for handle in &listing.items {
        match view.render(store, handle) {
            Ok(doc) => result.documents.push(doc),
            Err(StoreError::NotFound(_)) => {
                tracing::warn!(resource = %handle, "resource disappeared while listing");
                result.add_message(CmdMessage::warning(format!(
                    "{} {} disappeared while listing",
                    handle.kind, handle.id
                )));
            }
            Err(err) => return Err(err),
        }
    }

    Ok(result)
}
