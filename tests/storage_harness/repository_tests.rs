//! Macro-generated conformance suite for `Repository<T>` implementations.
//!
//! `repository_tests!` validates one storage backend against the repository
//! contract the services rely on: lookup, filtered listing, conditional
//! updates and deletes, and atomic lifecycle transitions under concurrency.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//!
//! use storage_harness::*;
//!
//! repository_tests!(Repositories::in_memory());
//! ```
//!
//! # Generated Tests
//!
//! - `test_insert_and_find`: insert then retrieve, all fields intact
//! - `test_find_missing`: unknown id returns `None`
//! - `test_find_many_by_owner`: `owner_id` equality filter
//! - `test_find_many_ownerless`: `owner_id = null` matches catalog records
//! - `test_find_many_comparison`: `>=` on an entity field
//! - `test_update_fields_precondition`: write refused when state differs
//! - `test_delete_precondition`: delete refused when state differs
//! - `test_concurrent_disable_single_winner`: exactly one of N disables succeeds

/// Generate a `Repository<T>` conformance test suite.
///
/// `$factory` must evaluate to a fresh `Repositories`. It is re-evaluated for
/// each test to keep tests isolated.
#[macro_export]
macro_rules! repository_tests {
    ($factory:expr) => {
        mod repository_tests {
            use super::*;
            use shopfront::core::query::{Comparison, Condition, Filter};
            use shopfront::core::{
                FieldPatch, FieldValue, Repository, Resource, ShopError, StatePrecondition,
            };
            use shopfront::entities::{CartItem, ShoppingCartPatch};
            use shopfront::server::Services;
            use std::sync::Arc;

            #[tokio::test]
            async fn test_insert_and_find() {
                let repos = $factory;
                let owner = Uuid::new_v4();
                let record = repos.shopping_carts.insert(cart_with(owner, 2)).await.unwrap();

                let found = repos
                    .shopping_carts
                    .find_by_id(record.id())
                    .await
                    .unwrap()
                    .expect("inserted cart should be found");
                assert_eq!(found.id(), record.id());
                assert_eq!(found.owner_id, owner);
                assert_eq!(found.items, record.items);
                assert!(found.is_active());
            }

            #[tokio::test]
            async fn test_find_missing() {
                let repos = $factory;
                let found = repos.shopping_carts.find_by_id(Uuid::new_v4()).await.unwrap();
                assert!(found.is_none());
            }

            #[tokio::test]
            async fn test_find_many_by_owner() {
                let repos = $factory;
                let alice = Uuid::new_v4();
                let bob = Uuid::new_v4();
                repos.shopping_carts.insert(cart(alice)).await.unwrap();
                repos.shopping_carts.insert(cart(alice)).await.unwrap();
                repos.shopping_carts.insert(cart(bob)).await.unwrap();

                let mine = repos
                    .shopping_carts
                    .find_many(&Filter::new().and_eq("owner_id", alice))
                    .await
                    .unwrap();
                assert_eq!(mine.len(), 2);
                assert!(mine.iter().all(|c| c.owner_id == alice));
            }

            #[tokio::test]
            async fn test_find_many_ownerless() {
                let repos = $factory;
                repos.products.insert(product("Kettle", 2500)).await.unwrap();

                let found = repos
                    .products
                    .find_many(&Filter::new().and_eq("owner_id", FieldValue::Null))
                    .await
                    .unwrap();
                assert_eq!(found.len(), 1);
                assert_eq!(found[0].name, "Kettle");
            }

            #[tokio::test]
            async fn test_find_many_comparison() {
                let repos = $factory;
                for (name, price) in [("Mug", 800), ("Kettle", 2500), ("Toaster", 4000)] {
                    repos.products.insert(product(name, price)).await.unwrap();
                }

                let mut filter = Filter::new();
                filter.push(Condition::new("price_cents", Comparison::Gte, 2500i64));
                let mut names: Vec<_> = repos
                    .products
                    .find_many(&filter)
                    .await
                    .unwrap()
                    .into_iter()
                    .map(|p| p.name)
                    .collect();
                names.sort();
                assert_eq!(names, vec!["Kettle", "Toaster"]);
            }

            #[tokio::test]
            async fn test_update_fields_precondition() {
                let repos = $factory;
                let record = repos.shopping_carts.insert(cart(Uuid::new_v4())).await.unwrap();
                let patch = FieldPatch::Fields(ShoppingCartPatch {
                    items: Some(vec![CartItem {
                        product_id: Uuid::new_v4(),
                        quantity: 4,
                    }]),
                });

                let refused = repos
                    .shopping_carts
                    .update_fields(record.id(), StatePrecondition::Inactive, &patch)
                    .await
                    .unwrap();
                assert!(refused.is_none());

                let updated = repos
                    .shopping_carts
                    .update_fields(record.id(), StatePrecondition::Active, &patch)
                    .await
                    .unwrap()
                    .expect("active cart should accept the patch");
                assert_eq!(updated.item_count(), 4);
                assert_eq!(updated.owner_id, record.owner_id);

                let stored = repos
                    .shopping_carts
                    .find_by_id(record.id())
                    .await
                    .unwrap()
                    .unwrap();
                assert_eq!(stored.item_count(), 4);

                let missing = repos
                    .shopping_carts
                    .update_fields(Uuid::new_v4(), StatePrecondition::Any, &patch)
                    .await
                    .unwrap();
                assert!(missing.is_none());
            }

            #[tokio::test]
            async fn test_delete_precondition() {
                let repos = $factory;
                let record = repos.shopping_carts.insert(cart(Uuid::new_v4())).await.unwrap();

                repos
                    .shopping_carts
                    .update_fields(record.id(), StatePrecondition::Active, &FieldPatch::Active(false))
                    .await
                    .unwrap()
                    .expect("active cart should be disabled");

                assert!(
                    !repos
                        .shopping_carts
                        .delete(record.id(), StatePrecondition::Active)
                        .await
                        .unwrap()
                );
                assert!(
                    repos
                        .shopping_carts
                        .delete(record.id(), StatePrecondition::Inactive)
                        .await
                        .unwrap()
                );
                assert!(
                    repos
                        .shopping_carts
                        .find_by_id(record.id())
                        .await
                        .unwrap()
                        .is_none()
                );
            }

            #[tokio::test]
            async fn test_concurrent_disable_single_winner() {
                let services = Services::wire($factory);
                let owner = Identity::user(Uuid::new_v4());
                let record = services.shopping_carts.create(Default::default(), Some(&owner)).await.unwrap();

                let mut handles = Vec::new();
                for _ in 0..8 {
                    let carts = Arc::clone(&services.shopping_carts);
                    let id = record.id();
                    handles.push(tokio::spawn(async move { carts.disable(id, &owner).await }));
                }

                let mut successes = 0;
                for handle in handles {
                    match handle.await.unwrap() {
                        Ok(()) => successes += 1,
                        Err(ShopError::AlreadyDisabled { .. }) => {}
                        Err(other) => panic!("unexpected error: {other}"),
                    }
                }
                assert_eq!(successes, 1);
            }
        }
    };
}
