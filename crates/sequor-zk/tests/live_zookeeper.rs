//! End-to-end tests against a live ZooKeeper server.
//!
//! All tests are ignored by default; run them with a local server on
//! `localhost:2181`:
//!
//! ```text
//! cargo test -p sequor-zk -- --ignored
//! ```
//!
//! Each test uses its own base path so runs do not interfere with each
//! other or with leftovers from earlier runs.

use sequor::{CoordinationConfig, SequenceGenerator};
use sequor_zk::ZkSession;

async fn generator_at(base_path: &str) -> SequenceGenerator<ZkSession> {
    let config = CoordinationConfig {
        base_path: String::from(base_path),
        ..CoordinationConfig::default()
    };
    sequor_zk::start(config)
        .await
        .expect("ZooKeeper must be reachable on localhost:2181")
}

#[tokio::test]
#[ignore = "requires a ZooKeeper server on localhost:2181"]
async fn issues_resets_and_deletes_against_a_live_server() {
    let generator = generator_at("/sequor-test/lifecycle").await;

    generator.delete("orders").await.unwrap();
    assert_eq!(generator.current_value("orders").await.unwrap(), 0);

    for expected in 1..=25 {
        assert_eq!(generator.generate_next("orders").await.unwrap(), expected);
    }
    assert_eq!(generator.current_value("orders").await.unwrap(), 25);

    generator.reset("orders", 1_000).await.unwrap();
    assert_eq!(generator.current_value("orders").await.unwrap(), 1_000);

    generator.delete("orders").await.unwrap();
    assert_eq!(generator.current_value("orders").await.unwrap(), 0);

    generator.delete("orders").await.unwrap();
}

#[tokio::test]
#[ignore = "requires a ZooKeeper server on localhost:2181"]
async fn a_second_session_observes_flushed_values_only() {
    let first = generator_at("/sequor-test/visibility").await;
    first.delete("orders").await.unwrap();

    // 12 issued values cross one flush boundary: the durable node lags at
    // 10 while the issuing instance has handed out 12.
    for _ in 0..12 {
        first.generate_next("orders").await.unwrap();
    }

    let second = generator_at("/sequor-test/visibility").await;
    assert_eq!(second.current_value("orders").await.unwrap(), 10);

    first.delete("orders").await.unwrap();
}

#[tokio::test]
#[ignore = "requires a ZooKeeper server on localhost:2181"]
async fn health_and_listing_reflect_the_live_namespace() {
    let generator = generator_at("/sequor-test/health").await;

    generator.generate_next("orders").await.unwrap();
    generator.generate_next("invoices").await.unwrap();

    assert!(generator.health_check().await);
    let keys = generator.list_keys().await.unwrap();
    assert!(keys.contains("orders"));
    assert!(keys.contains("invoices"));

    generator.delete("orders").await.unwrap();
    generator.delete("invoices").await.unwrap();
}
