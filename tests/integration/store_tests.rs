//! Repository tests against a live PostgreSQL
//!
//! Run with: DATABASE_URL=postgres://... cargo test --test store_tests -- --ignored

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use sqlx::{postgres::PgPoolOptions, Executor};

use library_loans_server::{
    config::LoansConfig,
    models::{collection::CollectionInput, loan::CreateLoan},
    repository::{LibraryStore, Repository},
    services::Services,
    AppError,
};

const SCHEMA: &str = include_str!("../../db/schema.sql");

static COUNTER: AtomicU32 = AtomicU32::new(0);

async fn repository() -> Repository {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("Failed to connect to database");

    // Tests run in parallel; serialize schema creation
    let mut tx = pool.begin().await.expect("Failed to open transaction");
    sqlx::query("SELECT pg_advisory_xact_lock(7007)")
        .execute(&mut *tx)
        .await
        .expect("Failed to take schema lock");
    (&mut *tx).execute(SCHEMA).await.expect("Failed to apply schema");
    tx.commit().await.expect("Failed to commit schema");

    Repository::new(pool)
}

fn unique(prefix: &str) -> String {
    format!(
        "{}-{}-{}",
        prefix,
        Utc::now().timestamp_nanos_opt().unwrap_or_default(),
        COUNTER.fetch_add(1, Ordering::Relaxed)
    )
}

fn jan(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
}

async fn collection(repo: &Repository, copies: i32) -> i32 {
    repo.create_collection(&CollectionInput {
        title: unique("Dune"),
        author: "Herbert".to_string(),
        total_copies: copies,
    })
    .await
    .expect("Failed to create collection")
    .id
}

async fn member(repo: &Repository) -> i32 {
    repo.find_or_create_member(&unique("member"))
        .await
        .expect("Failed to create member")
        .id
}

fn loan(collection_id: i32, member_id: i32) -> CreateLoan {
    CreateLoan {
        collection_id,
        member_id,
        loan_date: jan(1),
        due_date: jan(8),
    }
}

#[tokio::test]
#[ignore = "requires database"]
async fn new_collection_has_all_copies_available() {
    let repo = repository().await;
    let id = collection(&repo, 3).await;

    let created = repo.get_collection(id).await.unwrap();
    assert_eq!(created.total_copies, 3);
    assert_eq!(created.available_copies, 3);
}

#[tokio::test]
#[ignore = "requires database"]
async fn borrow_takes_one_copy_and_return_puts_it_back() {
    let repo = repository().await;
    let collection_id = collection(&repo, 2).await;
    let member_id = member(&repo).await;

    let loan_id = repo.create_loan(&loan(collection_id, member_id)).await.unwrap();

    let active = repo.get_loan(loan_id).await.unwrap();
    assert!(active.returned_date.is_none());
    assert_eq!(active.due_date, jan(8));
    assert_eq!(repo.get_collection(collection_id).await.unwrap().available_copies, 1);

    let returned = repo.return_loan(loan_id).await.unwrap();
    assert!(returned.returned_date.is_some());
    assert_eq!(repo.get_collection(collection_id).await.unwrap().available_copies, 2);
}

#[tokio::test]
#[ignore = "requires database"]
async fn last_copy_can_only_be_borrowed_once() {
    let repo = repository().await;
    let collection_id = collection(&repo, 1).await;
    let member_id = member(&repo).await;

    repo.create_loan(&loan(collection_id, member_id)).await.unwrap();
    let err = repo.create_loan(&loan(collection_id, member_id)).await.unwrap_err();

    assert!(matches!(err, AppError::OutOfStock(_)));
    assert_eq!(repo.get_collection(collection_id).await.unwrap().available_copies, 0);
}

#[tokio::test]
#[ignore = "requires database"]
async fn concurrent_borrows_of_last_copy_never_oversell() {
    let repo = repository().await;
    let collection_id = collection(&repo, 1).await;
    let first = member(&repo).await;
    let second = member(&repo).await;

    let first_loan = loan(collection_id, first);
    let second_loan = loan(collection_id, second);
    let (a, b) = tokio::join!(
        repo.create_loan(&first_loan),
        repo.create_loan(&second_loan),
    );

    let successes = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(successes, 1);
    assert!(matches!(a.err().or(b.err()), Some(AppError::OutOfStock(_))));
    assert_eq!(repo.get_collection(collection_id).await.unwrap().available_copies, 0);
}

#[tokio::test]
#[ignore = "requires database"]
async fn borrowing_unknown_collection_is_not_found() {
    let repo = repository().await;
    let member_id = member(&repo).await;

    let err = repo.create_loan(&loan(i32::MAX, member_id)).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
#[ignore = "requires database"]
async fn returning_twice_is_not_found_and_restocks_once() {
    let repo = repository().await;
    let collection_id = collection(&repo, 1).await;
    let member_id = member(&repo).await;
    let loan_id = repo.create_loan(&loan(collection_id, member_id)).await.unwrap();

    repo.return_loan(loan_id).await.unwrap();
    let err = repo.return_loan(loan_id).await.unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(repo.get_collection(collection_id).await.unwrap().available_copies, 1);
}

#[tokio::test]
#[ignore = "requires database"]
async fn member_name_resolves_to_one_id() {
    let repo = repository().await;
    let name = unique("Alice");

    let first = repo.find_or_create_member(&name).await.unwrap();
    let second = repo.find_or_create_member(&name).await.unwrap();
    assert_eq!(first.id, second.id);

    let (a, b) = tokio::join!(
        repo.find_or_create_member(&name),
        repo.find_or_create_member(&name),
    );
    assert_eq!(a.unwrap().id, first.id);
    assert_eq!(b.unwrap().id, first.id);
}

#[tokio::test]
#[ignore = "requires database"]
async fn member_without_active_loans_has_empty_list() {
    let repo = repository().await;
    let name = unique("Bob");
    repo.find_or_create_member(&name).await.unwrap();

    let loans = repo.active_loans_by_member(&name).await.unwrap();
    assert!(loans.is_empty());
}

#[tokio::test]
#[ignore = "requires database"]
async fn returned_loans_leave_member_list_but_stay_in_history() {
    let repo = repository().await;
    let collection_id = collection(&repo, 2).await;
    let name = unique("Carol");
    let member_id = repo.find_or_create_member(&name).await.unwrap().id;

    let kept = repo.create_loan(&loan(collection_id, member_id)).await.unwrap();
    let returned = repo.create_loan(&loan(collection_id, member_id)).await.unwrap();
    repo.return_loan(returned).await.unwrap();

    let active = repo.active_loans_by_member(&name).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, kept);
    assert_eq!(active[0].collection_id, collection_id);

    let history = repo.loan_history().await.unwrap();
    let mine: Vec<_> = history.iter().filter(|e| e.member_name == name).collect();
    assert_eq!(mine.len(), 2);
}

#[tokio::test]
#[ignore = "requires database"]
async fn update_leaves_available_copies_alone() {
    let repo = repository().await;
    let id = collection(&repo, 3).await;

    let updated = repo
        .update_collection(
            id,
            &CollectionInput {
                title: unique("Dune Messiah"),
                author: "Herbert".to_string(),
                total_copies: 5,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.total_copies, 5);
    assert_eq!(updated.available_copies, 3);
}

#[tokio::test]
#[ignore = "requires database"]
async fn resize_shifts_stock_and_refuses_to_go_negative() {
    let repo = repository().await;
    let id = collection(&repo, 2).await;
    let member_id = member(&repo).await;
    repo.create_loan(&loan(id, member_id)).await.unwrap();
    repo.create_loan(&loan(id, member_id)).await.unwrap();

    let grown = repo.resize_collection(id, 4).await.unwrap();
    assert_eq!(grown.total_copies, 4);
    assert_eq!(grown.available_copies, 2);

    let err = repo.resize_collection(id, 1).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(repo.get_collection(id).await.unwrap().total_copies, 4);

    let err = repo.resize_collection(i32::MAX, 1).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
#[ignore = "requires database"]
async fn resize_past_column_range_is_conflict() {
    let repo = repository().await;
    let id = collection(&repo, 3).await;
    repo.update_collection(
        id,
        &CollectionInput {
            title: unique("Dune"),
            author: "Herbert".to_string(),
            total_copies: 0,
        },
    )
    .await
    .unwrap();

    let err = repo.resize_collection(id, i32::MAX).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let unchanged = repo.get_collection(id).await.unwrap();
    assert_eq!(unchanged.total_copies, 0);
    assert_eq!(unchanged.available_copies, 3);
}

#[tokio::test]
#[ignore = "requires database"]
async fn delete_refuses_collections_with_loans() {
    let repo = repository().await;
    let lent = collection(&repo, 1).await;
    let member_id = member(&repo).await;
    repo.create_loan(&loan(lent, member_id)).await.unwrap();

    let err = repo.delete_collection(lent).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let unused = collection(&repo, 1).await;
    repo.delete_collection(unused).await.unwrap();
    assert!(matches!(
        repo.get_collection(unused).await.unwrap_err(),
        AppError::NotFound(_)
    ));
    assert!(matches!(
        repo.delete_collection(unused).await.unwrap_err(),
        AppError::NotFound(_)
    ));
}

#[tokio::test]
#[ignore = "requires database"]
async fn borrow_through_service_sets_due_date_a_week_later() {
    let repo = repository().await;
    let collection_id = collection(&repo, 3).await;
    let store: Arc<dyn LibraryStore> = Arc::new(repo.clone());
    let services = Services::new(store, LoansConfig::default());

    let receipt = services
        .loans
        .borrow(collection_id, &unique("Alice"), jan(1))
        .await
        .unwrap();

    assert_eq!(receipt.due_date, jan(8));
    assert_eq!(repo.get_collection(collection_id).await.unwrap().available_copies, 2);
    assert_eq!(repo.get_loan(receipt.loan_id).await.unwrap().due_date, jan(8));
}
