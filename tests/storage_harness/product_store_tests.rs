//! Macro-generated test suite for `ProductStore` contract validation.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//!
//! use storage_harness::*;
//! use catalog::storage::InMemoryProductStore;
//!
//! product_store_tests!(InMemoryProductStore::new());
//! ```
//!
//! # Generated Tests
//!
//! ## CRUD
//! - `test_insert_and_get`: insert then retrieve, all fields equal
//! - `test_get_nonexistent`: unknown id returns None
//! - `test_replace_existing` / `test_replace_nonexistent`
//! - `test_delete_existing` / `test_delete_nonexistent`
//!
//! ## Queries
//! - creator, price range, name and full-text filters
//! - sort by price in both directions
//! - pagination window and total count
//!
//! ## Edge Cases
//! - `test_find_on_empty_store`
//! - `test_concurrent_inserts`: parallel inserts from spawned tasks

/// Generate a full `ProductStore` conformance test suite.
///
/// `$factory` is re-evaluated for each test to ensure isolation. For the
/// concurrent test, the store must also implement `Clone + 'static`.
#[macro_export]
macro_rules! product_store_tests {
    ($factory:expr) => {
        mod product_store_contract_tests {
            use super::*;
            use catalog::core::query::ListParams;
            use catalog::core::store::ProductStore;
            use rust_decimal::Decimal;
            use uuid::Uuid;

            async fn seeded() -> impl ProductStore + Clone + 'static {
                let store = $factory;
                for (name, price, creator) in [
                    ("Desk lamp", 40, "Acme"),
                    ("Blue widget", 15, "Acme"),
                    ("Oak chair", 120, "Woodworks"),
                    ("Red widget", 25, "Globex"),
                ] {
                    store.insert(product(name, price, creator)).await.unwrap();
                }
                store
            }

            fn names(page: &catalog::core::query::ProductPage) -> Vec<&str> {
                page.items.iter().map(|p| p.name.as_str()).collect()
            }

            // ==================================================================
            // CRUD
            // ==================================================================

            #[tokio::test]
            async fn test_insert_and_get() {
                let store = $factory;
                let inserted = store.insert(product("Widget", 10, "Acme")).await.unwrap();

                let fetched = store.get(&inserted.id).await.unwrap();
                assert_eq!(fetched, Some(inserted));
            }

            #[tokio::test]
            async fn test_get_nonexistent() {
                let store = $factory;
                assert!(store.get(&Uuid::new_v4()).await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_replace_existing() {
                let store = $factory;
                let mut stored = store.insert(product("Widget", 10, "Acme")).await.unwrap();

                stored.name = "Renamed".to_string();
                stored.stock = 42;
                let replaced = store.replace(stored.clone()).await.unwrap();
                assert_eq!(replaced.as_ref().map(|p| p.name.as_str()), Some("Renamed"));

                let fetched = store.get(&stored.id).await.unwrap().unwrap();
                assert_eq!(fetched.name, "Renamed");
                assert_eq!(fetched.stock, 42);
            }

            #[tokio::test]
            async fn test_replace_nonexistent() {
                let store = $factory;
                let ghost = product("Ghost", 1, "Nobody");
                assert!(store.replace(ghost).await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_delete_existing() {
                let store = $factory;
                let stored = store.insert(product("Widget", 10, "Acme")).await.unwrap();

                assert!(store.delete(&stored.id).await.unwrap());
                assert!(store.get(&stored.id).await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_delete_nonexistent() {
                let store = $factory;
                assert!(!store.delete(&Uuid::new_v4()).await.unwrap());
            }

            // ==================================================================
            // Queries
            // ==================================================================

            #[tokio::test]
            async fn test_find_by_creator() {
                let store = seeded().await;
                let page = store
                    .find(&query(ListParams {
                        creator: Some("Acme".to_string()),
                        sort_by: Some("name".to_string()),
                        sort_order: Some("asc".to_string()),
                        ..Default::default()
                    }))
                    .await
                    .unwrap();

                assert_eq!(page.total, 2);
                assert_eq!(names(&page), vec!["Blue widget", "Desk lamp"]);
            }

            #[tokio::test]
            async fn test_find_price_range_is_inclusive() {
                let store = seeded().await;
                let page = store
                    .find(&query(ListParams {
                        min_price: Some(15.0),
                        max_price: Some(40.0),
                        sort_by: Some("price".to_string()),
                        sort_order: Some("asc".to_string()),
                        ..Default::default()
                    }))
                    .await
                    .unwrap();

                assert_eq!(names(&page), vec!["Blue widget", "Red widget", "Desk lamp"]);
            }

            #[tokio::test]
            async fn test_find_by_partial_name() {
                let store = seeded().await;
                let page = store
                    .find(&query(ListParams {
                        name: Some("WIDG".to_string()),
                        ..Default::default()
                    }))
                    .await
                    .unwrap();

                assert_eq!(page.total, 2);
                assert!(page.items.iter().all(|p| p.name.ends_with("widget")));
            }

            #[tokio::test]
            async fn test_find_full_text() {
                let store = seeded().await;
                let page = store
                    .find(&query(ListParams::search("lamp")))
                    .await
                    .unwrap();
                assert_eq!(names(&page), vec!["Desk lamp"]);

                let page = store
                    .find(&query(ListParams::search("lamp chair")))
                    .await
                    .unwrap();
                assert_eq!(page.total, 2);
            }

            #[tokio::test]
            async fn test_find_sort_descending() {
                let store = seeded().await;
                let page = store
                    .find(&query(ListParams {
                        sort_by: Some("price".to_string()),
                        sort_order: Some("desc".to_string()),
                        ..Default::default()
                    }))
                    .await
                    .unwrap();

                let prices: Vec<Decimal> = page.items.iter().map(|p| p.price).collect();
                assert_eq!(
                    prices,
                    vec![
                        Decimal::from(120),
                        Decimal::from(40),
                        Decimal::from(25),
                        Decimal::from(15)
                    ]
                );
            }

            #[tokio::test]
            async fn test_find_pagination_window() {
                let store = seeded().await;
                let page = store
                    .find(&query(ListParams {
                        sort_by: Some("price".to_string()),
                        sort_order: Some("asc".to_string()),
                        page: Some(2),
                        limit: Some(3),
                        ..Default::default()
                    }))
                    .await
                    .unwrap();

                assert_eq!(page.total, 4);
                assert_eq!(names(&page), vec!["Oak chair"]);
            }

            #[tokio::test]
            async fn test_find_on_empty_store() {
                let store = $factory;
                let page = store.find(&query(ListParams::default())).await.unwrap();

                assert_eq!(page.total, 0);
                assert!(page.items.is_empty());
            }

            // ==================================================================
            // Concurrency
            // ==================================================================

            #[tokio::test]
            async fn test_concurrent_inserts() {
                let store = $factory;

                let handles: Vec<_> = (0..10)
                    .map(|i| {
                        let store = store.clone();
                        tokio::spawn(async move {
                            store
                                .insert(product(&format!("Item {}", i), i + 1, "Acme"))
                                .await
                        })
                    })
                    .collect();

                for handle in handles {
                    handle.await.unwrap().unwrap();
                }

                let page = store.find(&query(ListParams::default())).await.unwrap();
                assert_eq!(page.total, 10);
            }
        }
    };
}
