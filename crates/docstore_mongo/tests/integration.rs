//! Contract suite run against a live MongoDB.
//!
//! These tests need a reachable server; set `DOCSTORE_MONGODB_URI`
//! (for example `mongodb://localhost:27017`) to enable them. Without
//! it every test passes vacuously, so CI without a database stays
//! green. Each run uses a fresh database name and drops it afterwards.

use docstore_mongo::MongoStore;
use docstore_testkit::suite;

async fn connect() -> Option<MongoStore> {
    let uri = std::env::var("DOCSTORE_MONGODB_URI").ok()?;
    let name = format!("docstore_test_{}", docstore_core::EntityId::new());
    Some(
        MongoStore::connect(&uri, &name)
            .await
            .expect("failed to connect to MongoDB"),
    )
}

async fn drop_database(uri: &str, name: &str) {
    let client = mongodb::Client::with_uri_str(uri)
        .await
        .expect("failed to reconnect for cleanup");
    client
        .database(name)
        .drop()
        .await
        .expect("failed to drop test database");
}

#[tokio::test]
async fn store_contract() {
    let Some(store) = connect().await else {
        return;
    };
    suite::check_store_contract(&store).await;

    let uri = std::env::var("DOCSTORE_MONGODB_URI").unwrap();
    drop_database(&uri, store.database_name()).await;
}

#[tokio::test]
async fn get_all_is_declined() {
    use docstore_core::{Store, StoreError};
    use docstore_testkit::fixtures::Customer;

    // Declining happens before any I/O, so no live server is needed;
    // client construction is lazy.
    let store = MongoStore::connect("mongodb://localhost:27017", "docstore_test_offline")
        .await
        .expect("client construction does not connect");

    let err = store.get_all::<Customer>().await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::NotSupported {
            backend: "mongodb",
            operation: "get_all",
        }
    ));
}
