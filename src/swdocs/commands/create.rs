use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::DocumentPayload;
use crate::store::DocumentStore;

pub fn run<S: DocumentStore>(store: &S, payload: DocumentPayload) -> Result<CmdResult> {
    payload.validate()?;
    let doc = store.create(&payload)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Document created: {}",
        doc.name
    )));
    Ok(result.with_documents(vec![doc]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SwdocsError;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::memory::InMemoryStore;

    #[test]
    fn creates_document() {
        let store = InMemoryStore::new();
        let result = run(&store, DocumentPayload::new("kafka", "broker")).unwrap();

        assert_eq!(result.documents.len(), 1);
        assert_eq!(result.documents[0].name, "kafka");
        assert_eq!(result.documents[0].created, result.documents[0].updated);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn rejects_duplicate() {
        let store = StoreFixture::new().with_doc("kafka", "broker").store;
        let err = run(&store, DocumentPayload::new("kafka", "again")).unwrap_err();
        assert!(matches!(err, SwdocsError::DuplicateName(_)));
    }

    #[test]
    fn rejects_invalid_payload_before_store() {
        let store = InMemoryStore::new();
        let err = run(&store, DocumentPayload::new("  ", "blank")).unwrap_err();
        assert!(matches!(err, SwdocsError::Validation(_)));
        assert!(store.is_empty());
    }
}
