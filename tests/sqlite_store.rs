use std::sync::Arc;
use std::thread;
use std::time::Duration;

use swdocs::error::SwdocsError;
use swdocs::model::{DocumentPayload, Link, Section};
use swdocs::pattern::SearchPattern;
use swdocs::store::sqlite::{SqliteOptions, SqliteStore};
use swdocs::store::{DocumentStore, RecentOrder, RECENT_PAGE_SIZE};
use tempfile::TempDir;

fn open_store() -> (TempDir, SqliteStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::open(SqliteOptions::new(dir.path().join("swdocs.db"))).unwrap();
    (dir, store)
}

#[test]
fn kafka_upsert_example() {
    let (_dir, store) = open_store();

    let first = store
        .upsert(&DocumentPayload::new("kafka", "broker"))
        .unwrap();
    assert_eq!(first.created, first.updated);
    assert!(first.sections.is_empty());

    let second = store
        .upsert(
            &DocumentPayload::new("kafka", "broker v2").with_section(
                Section::new("Dashboards").with_link(Link::new("http://x", "Kibana")),
            ),
        )
        .unwrap();
    assert_eq!(second.id, first.id);
    assert_eq!(second.created, first.created);
    assert!(second.updated > first.updated);
    assert_eq!(second.description, "broker v2");

    let stored = store.get_by_name("kafka").unwrap();
    assert_eq!(stored, second);
    assert_eq!(stored.sections.0[0].links[0].description, "Kibana");
}

#[test]
fn distinct_creates_succeed_and_duplicates_fail() {
    let (_dir, store) = open_store();

    let a = store.create(&DocumentPayload::new("a", "")).unwrap();
    let b = store.create(&DocumentPayload::new("b", "")).unwrap();
    assert_ne!(a.id, b.id);

    match store.create(&DocumentPayload::new("a", "again")) {
        Err(SwdocsError::DuplicateName(name)) => assert_eq!(name, "a"),
        other => panic!("Expected DuplicateName, got {:?}", other),
    }
    assert_eq!(store.get_by_name("a").unwrap().description, "");
}

#[test]
fn sections_round_trip() {
    let (_dir, store) = open_store();

    let payloads = [
        DocumentPayload::new("empty", ""),
        DocumentPayload::new("no-links", "").with_section(Section::new("Notes")),
        DocumentPayload::new("full", "everything")
            .with_user("ana")
            .with_section(
                Section::new("Dashboards")
                    .with_description("Where to look first")
                    .with_link(Link::new("http://grafana", "Grafana"))
                    .with_link(Link::new("http://kibana", "")),
            )
            .with_section(Section::new("Repos, \"quoted\"; and |delimited|")),
    ];

    for payload in &payloads {
        store.create(payload).unwrap();
        let stored = store.get_by_name(&payload.name).unwrap();
        assert_eq!(stored.sections, payload.sections);
        assert_eq!(stored.user, payload.user);
    }
}

#[test]
fn search_wildcards() {
    let (_dir, store) = open_store();
    for name in ["kafka", "kafka-connect", "zookeeper"] {
        store.create(&DocumentPayload::new(name, "")).unwrap();
    }

    let all = store.search(&SearchPattern::new("%")).unwrap();
    assert_eq!(all.len(), 3);

    let none = store.search(&SearchPattern::new("none-such%")).unwrap();
    assert!(none.is_empty());

    let names: Vec<String> = store
        .search(&SearchPattern::new("KAFKA"))
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, vec!["kafka", "kafka-connect"]);

    let exact = store.search(&SearchPattern::new("zookeepe_%")).unwrap();
    assert_eq!(exact.len(), 1);
    assert!(exact[0].description.is_none());
}

#[test]
fn plain_search_treats_underscore_literally() {
    let (_dir, store) = open_store();
    for name in ["team_kafka", "team-kafka", "teamXkafka"] {
        store.create(&DocumentPayload::new(name, "")).unwrap();
    }

    let names = |term: &str| -> Vec<String> {
        store
            .search(&SearchPattern::new(term))
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect()
    };

    assert_eq!(names("team_k"), vec!["team_kafka"]);
    assert_eq!(names("team-k"), vec!["team-kafka"]);
    assert_eq!(names("team_k%").len(), 3);
}

#[test]
fn repeated_identical_upsert_only_advances_updated() {
    let (_dir, store) = open_store();
    let payload = DocumentPayload::new("kafka", "broker")
        .with_user("ana")
        .with_section(
            Section::new("Dashboards")
                .with_description("Where to look first")
                .with_link(Link::new("http://kibana", "Kibana")),
        )
        .with_section(Section::new("Runbooks"));

    let first = store.upsert(&payload).unwrap();
    let second = store.upsert(&payload).unwrap();

    assert_eq!(second.id, first.id);
    assert_eq!(second.name, first.name);
    assert_eq!(second.created, first.created);
    assert_eq!(second.description, first.description);
    assert_eq!(second.sections, first.sections);
    assert_eq!(second.user, first.user);
    assert!(second.updated > first.updated);
    assert_eq!(store.get_by_name("kafka").unwrap(), second);
}

#[test]
fn delete_then_get_is_not_found() {
    let (_dir, store) = open_store();
    store.create(&DocumentPayload::new("kafka", "")).unwrap();

    assert!(store.delete("kafka").unwrap());
    assert!(matches!(
        store.get_by_name("kafka"),
        Err(SwdocsError::NotFound(_))
    ));
    assert!(!store.delete("kafka").unwrap());
}

#[test]
fn recent_listings_order_and_cap() {
    let (_dir, store) = open_store();
    for i in 0..RECENT_PAGE_SIZE + 5 {
        store
            .create(&DocumentPayload::new(format!("doc-{:02}", i), "v1"))
            .unwrap();
    }
    store.upsert(&DocumentPayload::new("doc-00", "v2")).unwrap();

    let by_created = store.list_recent(RecentOrder::Created, 100).unwrap();
    assert_eq!(by_created.len(), RECENT_PAGE_SIZE);
    assert_eq!(by_created[0].name, "doc-19");
    assert!(by_created.iter().all(|s| s.created.is_some()));

    let by_updated = store.list_recent(RecentOrder::Updated, 3).unwrap();
    assert_eq!(by_updated.len(), 3);
    assert_eq!(by_updated[0].name, "doc-00");
    assert_eq!(by_updated[0].description.as_deref(), Some("v2"));
    assert_eq!(by_updated[1].name, "doc-19");
}

#[test]
fn concurrent_upserts_leave_one_consistent_row() {
    let (_dir, store) = open_store();
    let store = Arc::new(store);
    let writers = 16;

    let handles: Vec<_> = (0..writers)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let payload = DocumentPayload::new("shared", format!("writer {}", i))
                    .with_section(
                        Section::new(format!("Section {}", i))
                            .with_link(Link::new(format!("http://host/{}", i), "")),
                    );
                store.upsert(&payload).unwrap()
            })
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let first_id = results[0].id;
    assert!(results.iter().all(|doc| doc.id == first_id));

    let mut stamps: Vec<_> = results.iter().map(|doc| doc.updated).collect();
    stamps.sort();
    stamps.dedup();
    assert_eq!(stamps.len(), writers, "every admitted write gets its own stamp");

    let last = results.iter().max_by_key(|doc| doc.updated).unwrap();
    let stored = store.get_by_name("shared").unwrap();
    assert_eq!(stored.updated, last.updated);
    assert_eq!(stored.description, last.description);
    assert_eq!(stored.sections, last.sections);

    let matching = store.search(&SearchPattern::new("shared")).unwrap();
    assert_eq!(matching.len(), 1);
}

#[test]
fn reads_proceed_alongside_writes() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(
        SqliteStore::open(
            SqliteOptions::new(dir.path().join("swdocs.db"))
                .with_read_pool_size(2)
                .with_write_wait(Duration::from_secs(10)),
        )
        .unwrap(),
    );
    store.create(&DocumentPayload::new("seed", "")).unwrap();

    let writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for i in 0..50 {
                store
                    .upsert(&DocumentPayload::new(format!("w-{}", i % 5), "x"))
                    .unwrap();
            }
        })
    };
    for _ in 0..50 {
        assert_eq!(store.get_by_name("seed").unwrap().name, "seed");
    }
    writer.join().unwrap();

    assert_eq!(store.search(&SearchPattern::new("w-%")).unwrap().len(), 5);
}
