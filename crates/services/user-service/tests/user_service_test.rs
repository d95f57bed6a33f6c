//! User lifecycle manager unit tests.
//!
//! The unit of work is replaced by a test double that hands the mock
//! store to transaction bodies, so the lifecycle protocol (duplicate
//! checks, scrubbing, cache interplay) runs exactly as in production
//! minus the database underneath.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use mockall::predicate::eq;
use uuid::Uuid;

use common::{AppError, AppResult, MockCacheStore};
use domain::User;
use user_service_lib::repository::{MockUserStore, TxFuture, UnitOfWork, UserStore};
use user_service_lib::service::{UserManager, UserService};

fn stored_user(id: Uuid, email: &str, name: &str) -> User {
    User {
        id,
        email: email.to_string(),
        password_hash: "$argon2id$stored-hash".to_string(),
        name: name.to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
        deleted_at: None,
    }
}

/// Unit of work that runs transaction bodies directly against the mock
/// store, without a database transaction underneath.
struct TestUnitOfWork {
    store: Arc<MockUserStore>,
}

impl TestUnitOfWork {
    fn new(store: MockUserStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserStore> {
        self.store.clone()
    }

    async fn transaction<F, T>(&self, body: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(&'a (dyn UserStore + 'a)) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        body(self.store.as_ref()).await
    }
}

fn manager(store: MockUserStore, cache: MockCacheStore) -> UserManager<TestUnitOfWork> {
    UserManager::new(Arc::new(TestUnitOfWork::new(store)), Arc::new(cache))
}

fn cache_key(id: &Uuid) -> String {
    format!("user:{}", id)
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn create_user_hashes_password_and_scrubs_result() {
    let mut store = MockUserStore::new();
    store
        .expect_find_by_email()
        .withf(|email| email == "alice@example.com")
        .returning(|_| Ok(None));
    store
        .expect_insert()
        .withf(|new_user| {
            new_user.email == "alice@example.com"
                && new_user.name == "Alice"
                && new_user.password_hash.starts_with("$argon2")
                && new_user.password_hash != "password123"
        })
        .returning(|new_user| {
            Ok(User {
                id: Uuid::new_v4(),
                email: new_user.email,
                password_hash: new_user.password_hash,
                name: new_user.name,
                created_at: Utc::now(),
                updated_at: Utc::now(),
                deleted_at: None,
            })
        });

    // No cache expectations: create must not touch the cache.
    let service = manager(store, MockCacheStore::new());
    let user = service
        .create_user(
            "alice@example.com".to_string(),
            "password123".to_string(),
            "Alice".to_string(),
        )
        .await
        .unwrap();

    assert_eq!(user.email, "alice@example.com");
    assert_eq!(user.name, "Alice");
    assert!(user.password_hash.is_empty());
}

#[tokio::test]
async fn create_user_with_taken_email_conflicts() {
    let mut store = MockUserStore::new();
    store
        .expect_find_by_email()
        .withf(|email| email == "alice@example.com")
        .returning(|email| Ok(Some(stored_user(Uuid::new_v4(), email, "Alice"))));
    // No insert expectation: a duplicate must never reach the insert.

    let service = manager(store, MockCacheStore::new());
    let result = service
        .create_user(
            "alice@example.com".to_string(),
            "password456".to_string(),
            "Bob".to_string(),
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Conflict(_)));
}

#[tokio::test]
async fn create_user_rejects_malformed_email_before_store() {
    // No store or cache expectations: validation fails first.
    let service = manager(MockUserStore::new(), MockCacheStore::new());
    let result = service
        .create_user(
            "not-an-email".to_string(),
            "password123".to_string(),
            "Alice".to_string(),
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn create_user_rejects_short_password_before_store() {
    let service = manager(MockUserStore::new(), MockCacheStore::new());
    let result = service
        .create_user(
            "alice@example.com".to_string(),
            "short".to_string(),
            "Alice".to_string(),
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn create_user_propagates_store_fault() {
    let mut store = MockUserStore::new();
    store
        .expect_find_by_email()
        .returning(|_| Err(AppError::from(sea_orm::DbErr::Custom("lost connection".into()))));

    let service = manager(store, MockCacheStore::new());
    let result = service
        .create_user(
            "alice@example.com".to_string(),
            "password123".to_string(),
            "Alice".to_string(),
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Database(_)));
}

// =============================================================================
// Get
// =============================================================================

#[tokio::test]
async fn get_user_serves_cache_hit_without_store() {
    let id = Uuid::new_v4();
    let snapshot = stored_user(id, "alice@example.com", "Alice").scrubbed();
    let bytes = serde_json::to_vec(&snapshot).unwrap();

    let mut cache = MockCacheStore::new();
    let key = cache_key(&id);
    cache
        .expect_get()
        .withf(move |k| k == key)
        .returning(move |_| Ok(Some(bytes.clone())));

    // No store expectations: a hit must not reach the store.
    let service = manager(MockUserStore::new(), cache);
    let user = service.get_user(id).await.unwrap();

    assert_eq!(user.id, id);
    assert_eq!(user.email, "alice@example.com");
    assert!(user.password_hash.is_empty());
}

#[tokio::test]
async fn get_user_miss_populates_cache_with_scrubbed_snapshot() {
    let id = Uuid::new_v4();

    let mut cache = MockCacheStore::new();
    cache.expect_get().returning(|_| Ok(None));
    let key = cache_key(&id);
    cache
        .expect_set()
        .withf(move |k, value, ttl| {
            let json = String::from_utf8_lossy(value);
            k == key && *ttl == 300 && !json.contains("argon2") && !json.contains("password_hash")
        })
        .returning(|_, _, _| Ok(()));

    let mut store = MockUserStore::new();
    store
        .expect_find_by_id()
        .with(eq(id))
        .returning(|id| Ok(Some(stored_user(id, "alice@example.com", "Alice"))));

    let service = manager(store, cache);
    let user = service.get_user(id).await.unwrap();

    assert_eq!(user.id, id);
    assert!(user.password_hash.is_empty());
}

#[tokio::test]
async fn get_user_treats_cache_error_as_miss() {
    let id = Uuid::new_v4();

    let mut cache = MockCacheStore::new();
    cache
        .expect_get()
        .returning(|_| Err(AppError::internal("redis down")));
    cache
        .expect_set()
        .returning(|_, _, _| Err(AppError::internal("redis still down")));

    let mut store = MockUserStore::new();
    store
        .expect_find_by_id()
        .returning(|id| Ok(Some(stored_user(id, "alice@example.com", "Alice"))));

    // Both the failed read and the failed write are absorbed.
    let service = manager(store, cache);
    let user = service.get_user(id).await.unwrap();
    assert_eq!(user.id, id);
}

#[tokio::test]
async fn get_user_discards_undecodable_cache_entry() {
    let id = Uuid::new_v4();

    let mut cache = MockCacheStore::new();
    cache
        .expect_get()
        .returning(|_| Ok(Some(b"{not json".to_vec())));
    cache.expect_set().returning(|_, _, _| Ok(()));

    let mut store = MockUserStore::new();
    store
        .expect_find_by_id()
        .returning(|id| Ok(Some(stored_user(id, "alice@example.com", "Alice"))));

    let service = manager(store, cache);
    assert!(service.get_user(id).await.is_ok());
}

#[tokio::test]
async fn get_user_not_found() {
    let id = Uuid::new_v4();

    let mut cache = MockCacheStore::new();
    cache.expect_get().returning(|_| Ok(None));
    // No set expectation: a miss on a missing user caches nothing.

    let mut store = MockUserStore::new();
    store.expect_find_by_id().returning(|_| Ok(None));

    let service = manager(store, cache);
    let result = service.get_user(id).await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound));
}

// =============================================================================
// Update
// =============================================================================

#[tokio::test]
async fn update_user_saves_and_invalidates_cache() {
    let id = Uuid::new_v4();

    let mut store = MockUserStore::new();
    store
        .expect_find_by_id()
        .with(eq(id))
        .returning(|id| Ok(Some(stored_user(id, "alice@example.com", "Alice"))));
    store
        .expect_save()
        .withf(|user| user.name == "Alicia" && user.password_hash == "$argon2id$stored-hash")
        .returning(|_| Ok(()));

    let mut cache = MockCacheStore::new();
    let key = cache_key(&id);
    cache
        .expect_delete()
        .withf(move |k| k == key)
        .times(1)
        .returning(|_| Ok(()));

    let service = manager(store, cache);
    let user = service
        .update_user(id, None, Some("Alicia".to_string()), None)
        .await
        .unwrap();

    assert_eq!(user.name, "Alicia");
    assert_eq!(user.email, "alice@example.com");
    assert!(user.password_hash.is_empty());
}

#[tokio::test]
async fn update_user_changing_email_to_taken_address_conflicts() {
    let id = Uuid::new_v4();

    let mut store = MockUserStore::new();
    store
        .expect_find_by_id()
        .returning(|id| Ok(Some(stored_user(id, "alice@example.com", "Alice"))));
    store
        .expect_find_by_email()
        .withf(|email| email == "bob@example.com")
        .returning(|email| Ok(Some(stored_user(Uuid::new_v4(), email, "Bob"))));
    // No save expectation and no cache expectations: the aborted
    // transaction must neither write nor invalidate.

    let service = manager(store, MockCacheStore::new());
    let result = service
        .update_user(id, Some("bob@example.com".to_string()), None, None)
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Conflict(_)));
}

#[tokio::test]
async fn update_user_replaces_hash_only_for_nonempty_password() {
    let id = Uuid::new_v4();

    let mut store = MockUserStore::new();
    store
        .expect_find_by_id()
        .returning(|id| Ok(Some(stored_user(id, "alice@example.com", "Alice"))));
    store
        .expect_save()
        .withf(|user| {
            user.password_hash.starts_with("$argon2")
                && user.password_hash != "$argon2id$stored-hash"
        })
        .returning(|_| Ok(()));

    let mut cache = MockCacheStore::new();
    cache.expect_delete().returning(|_| Ok(()));

    let service = manager(store, cache);
    let user = service
        .update_user(id, None, None, Some("new-password-1".to_string()))
        .await
        .unwrap();
    assert!(user.password_hash.is_empty());
}

#[tokio::test]
async fn update_user_empty_password_keeps_stored_hash() {
    let id = Uuid::new_v4();

    let mut store = MockUserStore::new();
    store
        .expect_find_by_id()
        .returning(|id| Ok(Some(stored_user(id, "alice@example.com", "Alice"))));
    store
        .expect_save()
        .withf(|user| user.password_hash == "$argon2id$stored-hash")
        .returning(|_| Ok(()));

    let mut cache = MockCacheStore::new();
    cache.expect_delete().returning(|_| Ok(()));

    let service = manager(store, cache);
    let result = service
        .update_user(id, None, None, Some(String::new()))
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn update_user_not_found() {
    let id = Uuid::new_v4();

    let mut store = MockUserStore::new();
    store.expect_find_by_id().returning(|_| Ok(None));

    let service = manager(store, MockCacheStore::new());
    let result = service
        .update_user(id, None, Some("Alicia".to_string()), None)
        .await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound));
}

#[tokio::test]
async fn update_user_absorbs_invalidation_failure() {
    let id = Uuid::new_v4();

    let mut store = MockUserStore::new();
    store
        .expect_find_by_id()
        .returning(|id| Ok(Some(stored_user(id, "alice@example.com", "Alice"))));
    store.expect_save().returning(|_| Ok(()));

    let mut cache = MockCacheStore::new();
    cache
        .expect_delete()
        .returning(|_| Err(AppError::internal("redis down")));

    // The committed write wins; the stale snapshot expires by TTL.
    let service = manager(store, cache);
    let result = service
        .update_user(id, None, Some("Alicia".to_string()), None)
        .await;
    assert!(result.is_ok());
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn delete_user_removes_record_and_invalidates_cache() {
    let id = Uuid::new_v4();

    let mut store = MockUserStore::new();
    store
        .expect_find_by_id()
        .with(eq(id))
        .returning(|id| Ok(Some(stored_user(id, "alice@example.com", "Alice"))));
    store.expect_delete().with(eq(id)).returning(|_| Ok(()));

    let mut cache = MockCacheStore::new();
    let key = cache_key(&id);
    cache
        .expect_delete()
        .withf(move |k| k == key)
        .times(1)
        .returning(|_| Ok(()));

    let service = manager(store, cache);
    assert!(service.delete_user(id).await.is_ok());
}

#[tokio::test]
async fn delete_user_twice_reports_not_found() {
    let id = Uuid::new_v4();

    let mut store = MockUserStore::new();
    // The record is already gone: the terminal state of a repeated delete.
    store.expect_find_by_id().returning(|_| Ok(None));

    let service = manager(store, MockCacheStore::new());
    let result = service.delete_user(id).await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound));
}

// =============================================================================
// Internal credential lookup
// =============================================================================

#[tokio::test]
async fn internal_email_lookup_keeps_hash_for_auth() {
    let mut store = MockUserStore::new();
    store
        .expect_find_by_email()
        .withf(|email| email == "alice@example.com")
        .returning(|email| Ok(Some(stored_user(Uuid::new_v4(), email, "Alice"))));

    let service = manager(store, MockCacheStore::new());
    let user = service
        .get_user_by_email_internal("alice@example.com")
        .await
        .unwrap();

    assert_eq!(user.password_hash, "$argon2id$stored-hash");
}
