use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::DocumentPayload;
use crate::store::DocumentStore;

/// Creates the document or replaces its mutable fields if the name exists.
pub fn run<S: DocumentStore>(store: &S, payload: DocumentPayload) -> Result<CmdResult> {
    payload.validate()?;
    let doc = store.upsert(&payload)?;

    let verb = if doc.created == doc.updated {
        "created"
    } else {
        "updated"
    };
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Document {}: {}",
        verb, doc.name
    )));
    Ok(result.with_documents(vec![doc]))
}
