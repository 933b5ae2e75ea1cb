use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::pattern::SearchPattern;
use crate::store::DocumentStore;

pub fn run<S: DocumentStore>(store: &S, term: &str) -> Result<CmdResult> {
    let pattern = SearchPattern::new(term);
    let summaries = store.search(&pattern)?;

    let mut result = CmdResult::default();
    if summaries.is_empty() {
        result.add_message(CmdMessage::info(format!(
            "No documents match '{}'.",
            term
        )));
    }
    Ok(result.with_summaries(summaries))
}
