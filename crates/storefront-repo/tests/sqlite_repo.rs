#![cfg(feature = "sqlite")]

mod common;

use std::path::PathBuf;
use storefront_repo::sqlite::SqliteRepo;
use storefront_types::ports::catalog_repository::CatalogRepository;
use uuid::Uuid;

async fn temp_repo() -> (tempfile::TempDir, SqliteRepo) {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut path = PathBuf::from(dir.path());
    path.push(format!("storefront-{}.db", Uuid::new_v4()));
    let url = format!("sqlite://{}", path.display());
    let repo = SqliteRepo::new(&url).await.expect("open sqlite repo");
    (dir, repo)
}

#[tokio::test]
async fn sqlite_catalog_crud() {
    let (_dir, repo) = temp_repo().await;
    common::catalog_crud(repo).await;
}

#[tokio::test]
async fn sqlite_order_round_trip() {
    let (_dir, repo) = temp_repo().await;
    common::order_round_trip(repo).await;
}

#[tokio::test]
async fn sqlite_approved_order_takes_stock() {
    let (_dir, repo) = temp_repo().await;
    common::approved_order_takes_stock(repo).await;
}

#[tokio::test]
async fn sqlite_short_stock_rolls_back() {
    let (_dir, repo) = temp_repo().await;
    common::short_stock_rolls_back(repo).await;
}

#[tokio::test]
async fn sqlite_repeated_product_shares_stock() {
    let (_dir, repo) = temp_repo().await;
    common::repeated_product_shares_stock(repo).await;
}

#[tokio::test]
async fn sqlite_unknown_product_persists_nothing() {
    let (_dir, repo) = temp_repo().await;
    common::unknown_product_persists_nothing(repo).await;
}

#[tokio::test]
async fn sqlite_duplicate_order_number_conflicts() {
    let (_dir, repo) = temp_repo().await;
    common::duplicate_order_number_conflicts(repo).await;
}

#[tokio::test]
async fn sqlite_list_is_newest_first() {
    let (_dir, repo) = temp_repo().await;
    common::list_is_newest_first(repo).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn sqlite_last_unit_goes_to_one_buyer() {
    let (_dir, repo) = temp_repo().await;
    common::last_unit_goes_to_one_buyer(repo).await;
}

#[tokio::test]
async fn sqlite_reopen_keeps_data() {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = format!("sqlite://{}", dir.path().join("nested/shop.db").display());

    let first = SqliteRepo::new(&url).await.unwrap();
    let widget = first
        .create_product(common::new_product("Widget", 1000, 5))
        .await
        .unwrap();
    drop(first);

    let reopened = SqliteRepo::new(&url).await.unwrap();
    assert_eq!(reopened.get_product(widget.id).await.unwrap(), Some(widget));
}
