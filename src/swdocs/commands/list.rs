use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::{DocumentStore, RecentOrder, RECENT_PAGE_SIZE};

pub fn run<S: DocumentStore>(store: &S, order: RecentOrder, limit: usize) -> Result<CmdResult> {
    let summaries = store.list_recent(order, limit)?;

    let mut result = CmdResult::default();
    if limit > RECENT_PAGE_SIZE {
        result.add_message(CmdMessage::warning(format!(
            "Listings show at most {} documents.",
            RECENT_PAGE_SIZE
        )));
    }
    if summaries.is_empty() {
        result.add_message(CmdMessage::info("No documents yet."));
    }
    Ok(result.with_summaries(summaries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn newest_first_and_capped() {
        let store = StoreFixture::new().with_docs(RECENT_PAGE_SIZE + 3).store;
        let result = run(&store, RecentOrder::Created, RECENT_PAGE_SIZE).unwrap();

        assert_eq!(result.summaries.len(), RECENT_PAGE_SIZE);
        assert_eq!(result.summaries[0].name, "doc-18");
        assert!(result.summaries[0].description.is_some());
        assert!(result.messages.is_empty());
    }

    #[test]
    fn empty_store_reports_it() {
        let store = StoreFixture::new().store;
        let result = run(&store, RecentOrder::Updated, 5).unwrap();
        assert!(result.summaries.is_empty());
        assert_eq!(result.messages[0].level, MessageLevel::Info);
    }

    #[test]
    fn oversized_limit_warns() {
        let store = StoreFixture::new().with_docs(2).store;
        let result = run(&store, RecentOrder::Created, 100).unwrap();
        assert_eq!(result.summaries.len(), 2);
        assert_eq!(result.messages[0].level, MessageLevel::Warning);
    }
}
