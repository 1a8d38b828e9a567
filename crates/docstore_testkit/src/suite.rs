//! Backend-parity contract suite.
//!
//! One check per observable property of the store contract. Every
//! backend runs the same checks with the same inputs and must produce
//! the same outputs and error kinds; the in-memory backend defines the
//! reference behavior.

use crate::fixtures::{Account, Customer, Product};
use docstore_core::{Entity, EntityId, Filter, Reference, Store, StoreError};

/// Update followed by get returns an identifier-equal entity with all
/// declared fields at their last written values.
pub async fn check_round_trip<S: Store>(store: &S) {
    let customer = Customer::new("Alice", "Berlin");
    store.update(&customer).await.expect("update failed");

    let fetched: Customer = store.get(customer.id()).await.expect("get failed");
    assert_eq!(fetched, customer);
    assert_eq!(fetched.name, customer.name);
    assert_eq!(fetched.city, customer.city);
}

/// Updating an existing entity overwrites its declared fields.
pub async fn check_update_overwrites<S: Store>(store: &S) {
    let customer = Customer::new("Bob", "Berlin");
    store.update(&customer).await.expect("insert failed");

    let mut changed: Customer = store.get(customer.id()).await.expect("get failed");
    changed.city = "Oslo".into();
    store.update(&changed).await.expect("second update failed");

    let fetched: Customer = store.get(customer.id()).await.expect("get failed");
    assert_eq!(fetched.city, "Oslo");
    assert_eq!(fetched.name, "Bob");
}

/// Getting an identifier that was never written fails with
/// `UnknownEntity`.
pub async fn check_missing_get_fails<S: Store>(store: &S) {
    let err = store
        .get::<Customer>(EntityId::new())
        .await
        .expect_err("get of unused identifier must fail");
    assert!(matches!(err, StoreError::UnknownEntity { .. }), "{err}");
}

/// Delete removes the entity; deleting again fails.
pub async fn check_delete_semantics<S: Store>(store: &S) {
    let customer = Customer::new("Charlie", "Berlin");
    store.update(&customer).await.expect("update failed");

    store
        .delete::<Customer>(customer.id(), false)
        .await
        .expect("delete failed");

    let err = store
        .get::<Customer>(customer.id())
        .await
        .expect_err("deleted entity must be gone");
    assert!(matches!(err, StoreError::UnknownEntity { .. }), "{err}");

    let err = store
        .delete::<Customer>(customer.id(), false)
        .await
        .expect_err("repeat delete must fail");
    assert!(matches!(err, StoreError::UnknownEntity { .. }), "{err}");
}

/// Find returns exactly the entities whose fields equal the filter.
pub async fn check_find_exactness<S: Store>(store: &S) {
    let eve = Customer::new("Eve", "Berlin");
    let frank = Customer::new("Frank", "Berlin");
    store.update(&eve).await.expect("update failed");
    store.update(&frank).await.expect("update failed");

    let matches = store
        .find::<Customer>(&Filter::new().eq("name", "Eve"))
        .await
        .expect("find failed")
        .expect("filter must be evaluated");

    assert!(matches.contains_key(&eve.id()));
    assert!(!matches.contains_key(&frank.id()));
    assert_eq!(matches.get(&eve.id()), Some(&eve));
}

/// A filter nothing matches yields absence, not an error.
pub async fn check_find_one_absence<S: Store>(store: &S) {
    let found = store
        .find_one::<Customer>(&Filter::new().eq("name", "NoSuchName"))
        .await
        .expect("find_one failed");
    assert!(found.is_none());
}

/// When several entities match, find_one returns the one with the
/// smallest identifier.
pub async fn check_find_one_determinism<S: Store>(store: &S) {
    let mut ids = Vec::new();
    for city in ["Berlin", "Oslo", "Lima"] {
        let customer = Customer::new("Grace", city);
        ids.push(customer.id());
        store.update(&customer).await.expect("update failed");
    }
    ids.sort();

    for _ in 0..3 {
        let found = store
            .find_one::<Customer>(&Filter::new().eq("name", "Grace"))
            .await
            .expect("find_one failed")
            .expect("a match must exist");
        assert_eq!(found.id(), ids[0]);
    }
}

/// A failing validation hook surfaces as `Validation` and the entity
/// never reaches the backend.
pub async fn check_validation_precedes_write<S: Store>(store: &S) {
    let account = Account::new("Heidi", "not-an-address");
    let err = store
        .update(&account)
        .await
        .expect_err("invalid entity must be rejected");
    assert!(matches!(err, StoreError::Validation { .. }), "{err}");

    let err = store
        .get::<Account>(account.id())
        .await
        .expect_err("rejected entity must not be stored");
    assert!(matches!(err, StoreError::UnknownEntity { .. }), "{err}");
}

/// Typed references survive the storage round trip.
pub async fn check_reference_round_trip<S: Store>(store: &S) {
    let customer = Customer::new("Ivan", "Berlin");
    store.update(&customer).await.expect("update failed");

    let product = Product::new("widget", &customer);
    store.update(&product).await.expect("update failed");

    let fetched: Product = store.get(product.id()).await.expect("get failed");
    assert_eq!(fetched.customer, Reference::of(&customer).unwrap());
    assert_eq!(fetched.customer.target(), customer.id());
}

/// Runs the whole contract suite against one backend.
///
/// The backend should start from an empty database; checks share
/// collections but use disjoint field values.
pub async fn check_store_contract<S: Store>(store: &S) {
    check_round_trip(store).await;
    check_update_overwrites(store).await;
    check_missing_get_fails(store).await;
    check_delete_semantics(store).await;
    check_find_exactness(store).await;
    check_find_one_absence(store).await;
    check_find_one_determinism(store).await;
    check_validation_precedes_write(store).await;
    check_reference_round_trip(store).await;
}
