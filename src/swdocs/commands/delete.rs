use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::DocumentStore;

/// Deleting a name that does not exist is not an error.
pub fn run<S: DocumentStore>(store: &S, name: &str) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if store.delete(name)? {
        result.add_message(CmdMessage::success(format!("Document deleted: {}", name)));
        result.deleted.push(name.to_string());
    } else {
        result.add_message(CmdMessage::info(format!(
            "No document named {}; nothing to delete.",
            name
        )));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::get;
    use crate::error::SwdocsError;
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn delete_then_get_is_not_found() {
        let store = StoreFixture::new().with_doc("kafka", "broker").store;
        let result = run(&store, "kafka").unwrap();
        assert_eq!(result.deleted, vec!["kafka".to_string()]);

        assert!(matches!(
            get::run(&store, "kafka"),
            Err(SwdocsError::NotFound(_))
        ));
    }

    #[test]
    fn missing_name_succeeds() {
        let store = StoreFixture::new().store;
        let result = run(&store, "ghost").unwrap();
        assert!(result.deleted.is_empty());
        assert!(!result.has_errors());
    }
}
