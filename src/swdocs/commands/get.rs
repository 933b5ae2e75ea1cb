use crate::commands::CmdResult;
use crate::error::Result;
use crate::store::DocumentStore;

pub fn run<S: DocumentStore>(store: &S, name: &str) -> Result<CmdResult> {
    let doc = store.get_by_name(name)?;
    Ok(CmdResult::default().with_documents(vec![doc]))
}
