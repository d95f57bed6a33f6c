//! Payment manager unit tests.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use common::{AppError, MockCacheStore};
use domain::Payment;
use payment_service_lib::client::MockUserDirectory;
use payment_service_lib::provider::{MockPaymentProvider, ProviderIntent};
use payment_service_lib::repository::MockPaymentStore;
use payment_service_lib::service::{PaymentManager, PaymentService};

fn stored_payment(provider_id: &str, status: &str) -> Payment {
    Payment {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        amount_minor: 1999,
        currency: "usd".to_string(),
        provider_id: provider_id.to_string(),
        status: status.to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn manager(
    store: MockPaymentStore,
    provider: MockPaymentProvider,
    users: MockUserDirectory,
    cache: MockCacheStore,
) -> PaymentManager {
    PaymentManager::new(
        Arc::new(store),
        Arc::new(provider),
        Arc::new(users),
        Arc::new(cache),
    )
}

#[tokio::test]
async fn create_intent_persists_provider_state() {
    let user_id = Uuid::new_v4();

    let mut users = MockUserDirectory::new();
    users.expect_user_exists().returning(|_| Ok(true));

    let mut provider = MockPaymentProvider::new();
    provider
        .expect_create_intent()
        .withf(|amount, currency| *amount == 1999 && currency == "usd")
        .returning(|_, _| {
            Ok(ProviderIntent {
                id: "pi_123".to_string(),
                client_secret: "pi_123_secret_abc".to_string(),
                status: "requires_payment_method".to_string(),
            })
        });

    let mut store = MockPaymentStore::new();
    store
        .expect_insert()
        .withf(move |new_payment| {
            new_payment.user_id == user_id
                && new_payment.amount_minor == 1999
                && new_payment.currency == "usd"
                && new_payment.provider_id == "pi_123"
                && new_payment.status == "requires_payment_method"
        })
        .returning(|new_payment| {
            Ok(Payment {
                id: Uuid::new_v4(),
                user_id: new_payment.user_id,
                amount_minor: new_payment.amount_minor,
                currency: new_payment.currency,
                provider_id: new_payment.provider_id,
                status: new_payment.status,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
        });

    let service = manager(store, provider, users, MockCacheStore::new());
    let (payment, client_secret) = service
        .create_payment_intent(user_id, 1999, "USD".to_string())
        .await
        .unwrap();

    assert_eq!(payment.provider_id, "pi_123");
    assert_eq!(client_secret, "pi_123_secret_abc");
}

#[tokio::test]
async fn create_intent_for_unknown_user_is_rejected() {
    let mut users = MockUserDirectory::new();
    users.expect_user_exists().returning(|_| Ok(false));

    // No provider or store expectations: nothing downstream may run.
    let service = manager(
        MockPaymentStore::new(),
        MockPaymentProvider::new(),
        users,
        MockCacheStore::new(),
    );
    let result = service
        .create_payment_intent(Uuid::new_v4(), 1999, "usd".to_string())
        .await;

    assert!(matches!(result.unwrap_err(), AppError::BadRequest(_)));
}

#[tokio::test]
async fn create_intent_validates_amount_and_currency() {
    let service = manager(
        MockPaymentStore::new(),
        MockPaymentProvider::new(),
        MockUserDirectory::new(),
        MockCacheStore::new(),
    );

    let result = service
        .create_payment_intent(Uuid::new_v4(), 0, "usd".to_string())
        .await;
    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));

    let result = service
        .create_payment_intent(Uuid::new_v4(), 1999, "dollars".to_string())
        .await;
    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn retrieve_serves_cache_hit_without_provider() {
    let snapshot = stored_payment("pi_123", "succeeded");
    let bytes = serde_json::to_vec(&snapshot).unwrap();

    let mut cache = MockCacheStore::new();
    cache
        .expect_get()
        .withf(|key| key == "payment:pi_123")
        .returning(move |_| Ok(Some(bytes.clone())));

    // No provider or store expectations: a hit stays local.
    let service = manager(
        MockPaymentStore::new(),
        MockPaymentProvider::new(),
        MockUserDirectory::new(),
        cache,
    );
    let payment = service.retrieve_payment_intent("pi_123").await.unwrap();

    assert_eq!(payment.status, "succeeded");
}

#[tokio::test]
async fn retrieve_refreshes_status_from_provider_and_caches() {
    let mut cache = MockCacheStore::new();
    cache.expect_get().returning(|_| Ok(None));
    cache
        .expect_set()
        .withf(|key, value, _ttl| {
            key == "payment:pi_123" && String::from_utf8_lossy(value).contains("succeeded")
        })
        .returning(|_, _, _| Ok(()));

    let mut provider = MockPaymentProvider::new();
    provider.expect_retrieve_intent().returning(|id| {
        Ok(ProviderIntent {
            id: id.to_string(),
            client_secret: String::new(),
            status: "succeeded".to_string(),
        })
    });

    let mut store = MockPaymentStore::new();
    store
        .expect_find_by_provider_id()
        .withf(|id| id == "pi_123")
        .returning(|id| Ok(Some(stored_payment(id, "requires_payment_method"))));
    store
        .expect_save()
        .withf(|payment| payment.status == "succeeded")
        .times(1)
        .returning(|_| Ok(()));

    let service = manager(store, provider, MockUserDirectory::new(), cache);
    let payment = service.retrieve_payment_intent("pi_123").await.unwrap();

    assert_eq!(payment.status, "succeeded");
}

#[tokio::test]
async fn retrieve_skips_save_when_status_unchanged() {
    let mut cache = MockCacheStore::new();
    cache.expect_get().returning(|_| Ok(None));
    cache.expect_set().returning(|_, _, _| Ok(()));

    let mut provider = MockPaymentProvider::new();
    provider.expect_retrieve_intent().returning(|id| {
        Ok(ProviderIntent {
            id: id.to_string(),
            client_secret: String::new(),
            status: "succeeded".to_string(),
        })
    });

    let mut store = MockPaymentStore::new();
    store
        .expect_find_by_provider_id()
        .returning(|id| Ok(Some(stored_payment(id, "succeeded"))));
    // No save expectation: an unchanged status writes nothing.

    let service = manager(store, provider, MockUserDirectory::new(), cache);
    assert!(service.retrieve_payment_intent("pi_123").await.is_ok());
}

#[tokio::test]
async fn retrieve_unknown_record_is_not_found() {
    let mut cache = MockCacheStore::new();
    cache.expect_get().returning(|_| Ok(None));

    let mut provider = MockPaymentProvider::new();
    provider.expect_retrieve_intent().returning(|id| {
        Ok(ProviderIntent {
            id: id.to_string(),
            client_secret: String::new(),
            status: "succeeded".to_string(),
        })
    });

    let mut store = MockPaymentStore::new();
    store.expect_find_by_provider_id().returning(|_| Ok(None));

    let service = manager(store, provider, MockUserDirectory::new(), cache);
    let result = service.retrieve_payment_intent("pi_123").await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound));
}
