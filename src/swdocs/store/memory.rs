use super::gate::{WriteGate, DEFAULT_WRITE_WAIT};
use super::{page_limit, DocumentStore, RecentOrder};
use crate::error::{Result, SwdocsError};
use crate::model::{Document, DocumentPayload, DocumentSummary};
use crate::pattern::SearchPattern;
use crate::timestamp::StampClock;
use parking_lot::RwLock;
use std::collections::BTreeMap;

struct MemWriter {
    next_id: i64,
    clock: StampClock,
}

/// Non-persistent store with the same contract as `SqliteStore`.
///
/// Writers queue on the same kind of gate; readers take a shared lock on the
/// map only for the duration of the copy they return.
pub struct InMemoryStore {
    writer: WriteGate<MemWriter>,
    docs: RwLock<BTreeMap<String, Document>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            writer: WriteGate::new(
                MemWriter {
                    next_id: 1,
                    clock: StampClock::new(),
                },
                DEFAULT_WRITE_WAIT,
            ),
            docs: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.docs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.read().is_empty()
    }
}

impl DocumentStore for InMemoryStore {
    fn create(&self, payload: &DocumentPayload) -> Result<Document> {
        self.writer.with(|w| {
            let mut docs = self.docs.write();
            if docs.contains_key(&payload.name) {
                return Err(SwdocsError::DuplicateName(payload.name.clone()));
            }
            let stamp = w.clock.tick();
            let doc = Document::from_payload(payload.clone(), w.next_id, stamp, stamp);
            w.next_id += 1;
            docs.insert(doc.name.clone(), doc.clone());
            Ok(doc)
        })
    }

    fn upsert(&self, payload: &DocumentPayload) -> Result<Document> {
        self.writer.with(|w| {
            let mut docs = self.docs.write();
            let stamp = w.clock.tick();
            let doc = match docs.get(&payload.name) {
                Some(existing) => {
                    Document::from_payload(payload.clone(), existing.id, existing.created, stamp)
                }
                None => {
                    let id = w.next_id;
                    w.next_id += 1;
                    Document::from_payload(payload.clone(), id, stamp, stamp)
                }
            };
            docs.insert(doc.name.clone(), doc.clone());
            Ok(doc)
        })
    }

    fn get_by_name(&self, name: &str) -> Result<Document> {
        self.docs
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| SwdocsError::NotFound(name.to_string()))
    }

    fn search(&self, pattern: &SearchPattern) -> Result<Vec<DocumentSummary>> {
        Ok(self
            .docs
            .read()
            .values()
            .filter(|doc| pattern.matches(&doc.name))
            .map(|doc| doc.summary().search_projection())
            .collect())
    }

    fn list_recent(&self, order: RecentOrder, limit: usize) -> Result<Vec<DocumentSummary>> {
        let docs = self.docs.read();
        let mut all: Vec<&Document> = docs.values().collect();
        all.sort_by(|a, b| {
            let (ka, kb) = match order {
                RecentOrder::Created => (a.created, b.created),
                RecentOrder::Updated => (a.updated, b.updated),
            };
            kb.cmp(&ka).then_with(|| b.id.cmp(&a.id))
        });
        Ok(all
            .into_iter()
            .take(page_limit(limit))
            .map(Document::summary)
            .collect())
    }

    fn delete(&self, name: &str) -> Result<bool> {
        self.writer
            .with(|_| Ok(self.docs.write().remove(name).is_some()))
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{Link, Section};

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        pub fn with_docs(self, count: usize) -> Self {
            for i in 0..count {
                let payload = DocumentPayload::new(
                    format!("doc-{}", i + 1),
                    format!("Description for doc {}", i + 1),
                );
                self.store.create(&payload).unwrap();
            }
            self
        }

        pub fn with_doc(self, name: &str, description: &str) -> Self {
            self.store
                .create(&DocumentPayload::new(name, description))
                .unwrap();
            self
        }

        pub fn with_linked_doc(self, name: &str) -> Self {
            let payload = DocumentPayload::new(name, "Linked").with_section(
                Section::new("Dashboards").with_link(Link::new("http://kibana", "Kibana")),
            );
            self.store.create(&payload).unwrap();
            self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::StoreFixture;
    use super::*;

    #[test]
    fn test_duplicate_create() {
        let store = StoreFixture::new().with_doc("kafka", "broker").store;
        match store.create(&DocumentPayload::new("kafka", "again")) {
            Err(SwdocsError::DuplicateName(name)) => assert_eq!(name, "kafka"),
            other => panic!("Expected DuplicateName, got {:?}", other),
        }
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_upsert_preserves_identity() {
        let store = InMemoryStore::new();
        let first = store.upsert(&DocumentPayload::new("kafka", "broker")).unwrap();
        let second = store.upsert(&DocumentPayload::new("kafka", "broker v2")).unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.created, second.created);
        assert!(second.updated > first.updated);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_ids_are_not_reused() {
        let store = StoreFixture::new().with_docs(2).store;
        store.delete("doc-2").unwrap();
        let doc = store.create(&DocumentPayload::new("doc-3", "")).unwrap();
        assert_eq!(doc.id, 3);
    }

    #[test]
    fn test_recent_order_and_cap() {
        let store = StoreFixture::new().with_docs(20).store;
        store.upsert(&DocumentPayload::new("doc-1", "touched")).unwrap();

        let by_created = store.list_recent(RecentOrder::Created, 100).unwrap();
        assert_eq!(by_created.len(), 15);
        assert_eq!(by_created[0].name, "doc-20");

        let by_updated = store.list_recent(RecentOrder::Updated, 5).unwrap();
        assert_eq!(by_updated.len(), 5);
        assert_eq!(by_updated[0].name, "doc-1");
        assert_eq!(by_updated[0].description.as_deref(), Some("touched"));
    }

    #[test]
    fn test_search_projection() {
        let store = StoreFixture::new().with_linked_doc("kafka").store;
        let found = store.search(&SearchPattern::new("%")).unwrap();
        assert_eq!(found.len(), 1);
        assert!(found[0].description.is_none());
        assert!(found[0].created.is_none());
    }

    #[test]
    fn test_delete_missing_is_ok() {
        let store = InMemoryStore::new();
        assert!(!store.delete("ghost").unwrap());
        assert!(store.is_empty());
    }
}
