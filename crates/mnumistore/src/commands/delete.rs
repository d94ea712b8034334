use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::ResourceStore;

pub fn run<S: ResourceStore + ?Sized>(store: &S, id: &str) -> Result<CmdResult> {
    let handle = store.resolve(id)?;
    store.delete(&handle)?;
    tracing::info!(resource = %handle, "deleted");

    let mut result = CmdResult {
        deleted: true,
        ..CmdResult::default()
    };
    result.add_message(CmdMessage::success(format!(
        "Deleted {} {}",
        handle.kind, handle.id
    )));
    Ok(result)
}
