//! End-to-end tests against live PostgreSQL and MongoDB.
//!
//! Run with: TEST_POSTGRES_URL=... TEST_MONGO_URL=... cargo test -p blog-service -- --ignored

mod common;

use axum::http::StatusCode;
use blog_service::models::NewBlog;
use blog_service::services::seed::{generate_blogs, seed_mongo, seed_postgres};
use blog_service::services::RelationalBlogStore;
use common::TestApp;
use mongodb::bson::doc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serial_test::serial;

fn blogs(count: usize) -> Vec<NewBlog> {
    generate_blogs(&mut StdRng::seed_from_u64(9), count)
}

#[tokio::test]
#[ignore] // Requires databases
#[serial]
async fn sql_list_returns_at_most_limit_rows() {
    let app = TestApp::spawn().await;
    seed_postgres(&app.postgres, &blogs(30)).await.unwrap();

    let (status, body) = app.get("/sql/blog?limit=7&offset=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 7);

    let (_, again) = app.get("/sql/blog?limit=7&offset=2").await;
    assert_eq!(again["data"].as_array().unwrap().len(), 7);

    app.cleanup().await;
}

#[tokio::test]
#[ignore]
#[serial]
async fn sql_random_makes_new_rows_visible() {
    let app = TestApp::spawn().await;
    seed_postgres(&app.postgres, &blogs(5)).await.unwrap();

    // Change the source table without touching the view.
    app.postgres.replace_all(&blogs(12)).await.unwrap();
    let (_, stale) = app.get("/sql/blog?limit=100").await;
    assert_eq!(stale["data"].as_array().unwrap().len(), 5);

    let (status, body) = app.get("/sql/random").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "seed successfully");

    let (_, fresh) = app.get("/sql/blog?limit=100").await;
    assert_eq!(fresh["data"].as_array().unwrap().len(), 12);

    app.cleanup().await;
}

#[tokio::test]
#[ignore]
#[serial]
async fn refresh_through_store_matches_endpoint() {
    let app = TestApp::spawn().await;
    app.postgres.replace_all(&blogs(3)).await.unwrap();
    app.postgres.refresh_random().await.unwrap();

    let (_, body) = app.get("/sql/blog").await;
    let mut ids: Vec<i64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["id"].as_i64().unwrap())
        .collect();
    ids.sort();
    assert_eq!(ids, vec![1, 2, 3]);

    app.cleanup().await;
}

#[tokio::test]
#[ignore]
#[serial]
async fn mongo_list_pages_through_collection() {
    let app = TestApp::spawn().await;
    seed_mongo(&app.mongo, &blogs(25)).await.unwrap();

    let (status, body) = app.get("/mongo/blog?limit=10&offset=20").await;
    assert_eq!(status, StatusCode::OK);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 5);
    assert_eq!(data[0]["id"].as_str().unwrap().len(), 24);

    let (status, body) = app.get("/mongo/blog?limit=0").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());

    app.cleanup().await;
}

#[tokio::test]
#[ignore]
#[serial]
async fn mongo_random_leaves_collection_untouched() {
    let app = TestApp::spawn().await;
    seed_mongo(&app.mongo, &blogs(4)).await.unwrap();

    let (status, body) = app.get("/mongo/random").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "seed successfully");

    let count = app.mongo.blogs().count_documents(doc! {}, None).await.unwrap();
    assert_eq!(count, 4);

    app.cleanup().await;
}

#[tokio::test]
#[ignore]
#[serial]
async fn ready_reports_both_stores_up() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get("/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "OK");

    app.cleanup().await;
}
