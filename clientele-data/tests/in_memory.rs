use clientele_data::prelude::*;
use clientele_data::{InMemoryRepository, PersistenceErrorKind};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
struct Contact {
    id: Option<i64>,
    name: String,
    tier: Option<i64>,
}

impl Contact {
    fn new(name: &str, tier: Option<i64>) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            tier,
        }
    }
}

impl Entity for Contact {
    type Id = i64;

    fn table_name() -> &'static str {
        "contacts"
    }

    fn id_column() -> &'static str {
        "id"
    }

    fn columns() -> &'static [&'static str] {
        &["id", "name", "tier"]
    }

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn with_id(self, id: i64) -> Self {
        Self { id: Some(id), ..self }
    }
}

async fn seeded() -> InMemoryRepository<Contact> {
    let repo = InMemoryRepository::new();
    repo.save_all(&[
        Contact::new("Carol", Some(2)),
        Contact::new("alice", None),
        Contact::new("Bob", Some(1)),
    ])
    .await
    .unwrap();
    repo
}

#[tokio::test]
async fn test_save_assigns_sequential_ids() {
    let repo = InMemoryRepository::new();
    let a = repo.save(&Contact::new("A", None)).await.unwrap();
    let b = repo.save(&Contact::new("B", None)).await.unwrap();
    assert_eq!(a.id, Some(1));
    assert_eq!(b.id, Some(2));
    assert_eq!(repo.find_by_id(1).await.unwrap(), Some(a));
}

#[tokio::test]
async fn test_save_with_id_updates_in_place() {
    let repo = seeded().await;
    let mut bob = repo.get_by_id(3).await.unwrap();
    bob.name = "Robert".into();
    repo.save(&bob).await.unwrap();

    assert_eq!(repo.count().await.unwrap(), 3);
    assert_eq!(repo.get_by_id(3).await.unwrap().name, "Robert");
}

#[tokio::test]
async fn test_caller_supplied_id_advances_sequence() {
    let repo = InMemoryRepository::new();
    let manual = Contact::new("Manual", None).with_id(10);
    repo.save(&manual).await.unwrap();
    let next = repo.save(&Contact::new("Next", None)).await.unwrap();
    assert_eq!(next.id, Some(11));
}

#[tokio::test]
async fn test_exhausted_sequence_is_persistence_error() {
    let repo = InMemoryRepository::new();
    let last = Contact::new("Last", None).with_id(i64::MAX);
    repo.save(&last).await.unwrap();

    let err = repo.save(&Contact::new("Next", None)).await.unwrap_err();
    assert_eq!(err.persistence_kind(), Some(PersistenceErrorKind::Constraint));
    assert_eq!(repo.count().await.unwrap(), 1);
    assert_eq!(repo.find_by_id(i64::MAX).await.unwrap(), Some(last));
}

#[tokio::test]
async fn test_missing_id_is_empty_and_absent() {
    let repo = seeded().await;
    assert_eq!(repo.find_by_id(99).await.unwrap(), None);
    assert!(!repo.exists_by_id(99).await.unwrap());
    assert!(repo.get_by_id(99).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_find_all_in_id_order() {
    let repo = seeded().await;
    let ids: Vec<_> = repo.find_all().await.unwrap().iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![Some(1), Some(2), Some(3)]);
}

#[tokio::test]
async fn test_find_all_by_id_skips_missing_and_duplicates() {
    let repo = seeded().await;
    let found = repo.find_all_by_id(&[3, 42, 1, 3]).await.unwrap();
    let names: Vec<_> = found.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Carol", "Bob"]);
}

#[tokio::test]
async fn test_find_all_sorted() {
    let repo = seeded().await;

    let by_name = repo.find_all_sorted(&Sort::by("name")).await.unwrap();
    let names: Vec<_> = by_name.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Bob", "Carol", "alice"]);

    let by_tier = repo.find_all_sorted(&Sort::by_desc("tier")).await.unwrap();
    let names: Vec<_> = by_tier.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Carol", "Bob", "alice"]);
}

#[tokio::test]
async fn test_unknown_sort_column_rejected() {
    let repo = seeded().await;
    let err = repo.find_all_sorted(&Sort::by("email")).await.unwrap_err();
    assert_eq!(err.persistence_kind(), Some(PersistenceErrorKind::InvalidQuery));
}

#[tokio::test]
async fn test_find_all_paged() {
    let repo = seeded().await;
    let page = repo
        .find_all_paged(&Pageable::of(1, 2).sorted(Sort::by("name")))
        .await
        .unwrap();
    assert_eq!(page.total_elements, 3);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.content.len(), 1);
    assert_eq!(page.content[0].name, "alice");

    let beyond = repo.find_all_paged(&Pageable::of(5, 2)).await.unwrap();
    assert!(beyond.content.is_empty());
    assert_eq!(beyond.total_elements, 3);
}

#[tokio::test]
async fn test_delete_by_id_missing_policies() {
    let strict = seeded().await;
    assert!(strict.delete_by_id(99).await.unwrap_err().is_not_found());

    let lenient = seeded().await.with_missing_id_policy(MissingIdPolicy::Ignore);
    lenient.delete_by_id(99).await.unwrap();
    assert_eq!(lenient.count().await.unwrap(), 3);
}

#[tokio::test]
async fn test_delete_by_instance() {
    let repo = seeded().await;
    let carol = repo.get_by_id(1).await.unwrap();
    repo.delete(&carol).await.unwrap();
    assert!(!repo.exists_by_id(1).await.unwrap());

    let err = repo.delete(&Contact::new("unsaved", None)).await.unwrap_err();
    assert_eq!(err.persistence_kind(), Some(PersistenceErrorKind::InvalidEntity));
}

#[tokio::test]
async fn test_bulk_deletes_report_counts() {
    let repo = seeded().await;
    assert_eq!(repo.delete_all_by_id(&[1, 2, 77]).await.unwrap(), 2);
    assert_eq!(repo.delete_all().await.unwrap(), 1);
    assert_eq!(repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_clones_share_storage() {
    let repo = InMemoryRepository::new();
    let other = repo.clone();
    repo.save(&Contact::new("Shared", None)).await.unwrap();
    assert!(other.exists_by_id(1).await.unwrap());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_saves_get_unique_ids() {
    let repo = InMemoryRepository::<Contact>::new();
    let mut handles = Vec::new();
    for i in 0..32 {
        let repo = repo.clone();
        handles.push(tokio::spawn(async move {
            repo.save(&Contact::new(&format!("c{i}"), None)).await.unwrap().id
        }));
    }
    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap().unwrap());
    }
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 32);
    assert_eq!(repo.count().await.unwrap(), 32);
}
