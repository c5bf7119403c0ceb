//! End-to-end checkout against an in-memory store

use cafe_client::{CouponValidationResponse, InMemoryStore};
use cafe_ordering::{
    CartLedger, CheckoutDetails, CouponValidator, DeliveryZoneResolver, FileStorage, LinkOpener,
    NotificationDispatcher, OrderSubmitter, OrderingConfig, OrderingError, ValidationError,
};
use shared::models::{CouponInfo, DeliveryZone, OptionGroup, Product, ProductOption, SelectedOptions};
use shared::order::{CustomerInfo, FulfillmentType, OrderStatus, PaymentMethod};
use shared::Decimal;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[derive(Clone, Default)]
struct RecordingOpener {
    opened: Arc<Mutex<Vec<String>>>,
    blocked: bool,
}

impl LinkOpener for RecordingOpener {
    fn open(&self, url: &str) -> bool {
        self.opened.lock().unwrap().push(url.to_string());
        !self.blocked
    }
}

fn menu() -> (Product, Product) {
    let espresso = Product::new("espresso", "Espresso", dec("5.50"));
    let latte = Product::new("latte", "Latte", dec("8.00")).with_group(
        OptionGroup::new("size", "Tamanho", true)
            .with_option(ProductOption::new("m", "Médio", Decimal::ZERO))
            .with_option(ProductOption::new("g", "Grande", dec("2.00"))),
    );
    (espresso, latte)
}

fn grande() -> SelectedOptions {
    [("size".to_string(), "g".to_string())].into_iter().collect()
}

fn store() -> Arc<InMemoryStore> {
    Arc::new(
        InMemoryStore::new()
            .with_zones(vec![DeliveryZone::new("JARDIM AMERICA", dec("6.50"), 30, 45)])
            .with_coupon(
                "RETIRA5",
                CouponValidationResponse {
                    valid: true,
                    discount_amount: Some(dec("5.00")),
                    coupon: Some(CouponInfo {
                        code: "RETIRA5".into(),
                        kind: Some("fixo".into()),
                        value: Some(dec("5.00")),
                        tags: vec![shared::models::CouponTag::PickupOnly],
                    }),
                    message: None,
                },
            ),
    )
}

fn delivery_customer() -> CustomerInfo {
    let mut customer = CustomerInfo::new("Ana");
    customer.street = Some("Rua das Flores".into());
    customer.number = Some("10".into());
    customer.neighborhood = Some("Jardim América".into());
    customer
}

#[tokio::test]
async fn test_delivery_checkout_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let config = OrderingConfig::default()
        .with_store_phone("011987654321")
        .with_data_dir(temp_dir.path());
    let store = store();
    let opener = RecordingOpener::default();

    // Build the cart, then reload it from disk
    let (espresso, latte) = menu();
    {
        let mut cart = CartLedger::new(FileStorage::new(&config.data_dir));
        cart.add_item(&espresso, SelectedOptions::new(), None, 2).unwrap();
        cart.add_item(&latte, grande(), None, 1).unwrap();
    }
    let mut cart = CartLedger::restore(FileStorage::new(&config.data_dir));
    assert_eq!(cart.subtotal(), dec("21.00"));

    let mut resolver = DeliveryZoneResolver::new(store.clone());
    let zone = resolver.resolve("Jardim América").await.unwrap();
    assert!(zone.served);

    // Pickup-only coupon is refused during delivery checkout
    let validator = CouponValidator::new(store.clone());
    let err = validator
        .validate("retira5", cart.subtotal(), FulfillmentType::Delivery)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        OrderingError::Validation(ValidationError::CouponIneligible(_))
    ));

    let submitter = OrderSubmitter::new(
        store.clone(),
        NotificationDispatcher::new(opener.clone(), &config),
        config.store_phone.clone(),
    );
    let details = CheckoutDetails::new(FulfillmentType::Delivery, delivery_customer())
        .with_payment(PaymentMethod::Pix, None)
        .with_notification(true);

    let submitted = submitter
        .place_order(&mut cart, &details, None, Some(&zone))
        .await
        .unwrap();

    assert_eq!(submitted.order_id(), "1");
    assert_eq!(submitted.order.total, dec("27.50"));
    assert!(cart.is_empty());
    assert!(CartLedger::restore(FileStorage::new(&config.data_dir)).is_empty());

    let saved = store.saved_orders();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].status, OrderStatus::Received);
    assert_eq!(saved[0].delivery_fee, dec("6.50"));

    let opened = opener.opened.lock().unwrap().clone();
    assert_eq!(opened.len(), 1);
    assert!(opened[0].starts_with("https://wa.me/5511987654321?text="));
    assert!(!submitted.notification.unwrap().is_blocked());
}

#[tokio::test]
async fn test_dine_in_never_notifies() {
    let store = store();
    let opener = RecordingOpener::default();
    let config = OrderingConfig::default().with_store_phone("11987654321");
    let submitter = OrderSubmitter::new(
        store.clone(),
        NotificationDispatcher::new(opener.clone(), &config),
        config.store_phone.clone(),
    );

    let (espresso, _) = menu();
    let mut cart = CartLedger::new(cafe_ordering::MemoryStorage::new());
    cart.add_item(&espresso, SelectedOptions::new(), None, 1).unwrap();

    let mut customer = CustomerInfo::new("Bruno");
    customer.table = Some("7".into());
    let details = CheckoutDetails::new(FulfillmentType::DineIn, customer).with_notification(true);

    let submitted = submitter
        .place_order(&mut cart, &details, None, None)
        .await
        .unwrap();
    assert!(submitted.notification.is_none());
    assert!(opener.opened.lock().unwrap().is_empty());
    assert_eq!(store.saved_orders()[0].customer.table.as_deref(), Some("7"));
}

#[tokio::test]
async fn test_pickup_with_coupon_and_blocked_link() {
    let store = store();
    let opener = RecordingOpener {
        blocked: true,
        ..Default::default()
    };
    let config = OrderingConfig::default().with_store_phone("11987654321");
    let submitter = OrderSubmitter::new(
        store.clone(),
        NotificationDispatcher::new(opener, &config),
        config.store_phone.clone(),
    );

    let (espresso, latte) = menu();
    let mut cart = CartLedger::new(cafe_ordering::MemoryStorage::new());
    cart.add_item(&espresso, SelectedOptions::new(), None, 2).unwrap();
    cart.add_item(&latte, grande(), None, 1).unwrap();

    let coupon = CouponValidator::new(store.clone())
        .validate("RETIRA5", cart.subtotal(), FulfillmentType::Pickup)
        .await
        .unwrap();

    let details = CheckoutDetails::new(FulfillmentType::Pickup, CustomerInfo::new("Ana"))
        .with_notification(true);
    let submitted = submitter
        .place_order(&mut cart, &details, Some(&coupon), None)
        .await
        .unwrap();

    assert_eq!(submitted.order.discount, dec("5.00"));
    assert_eq!(submitted.order.total, dec("16.00"));
    // Blocked link is non-fatal: the order is already stored
    let notification = submitted.notification.unwrap();
    assert!(notification.is_blocked());
    assert_eq!(store.saved_orders().len(), 1);
}

#[tokio::test]
async fn test_failed_submission_keeps_cart() {
    let store = store();
    let config = OrderingConfig::default();
    let submitter = OrderSubmitter::new(
        store.clone(),
        NotificationDispatcher::new(RecordingOpener::default(), &config),
        "",
    );

    let (espresso, _) = menu();
    let mut cart = CartLedger::new(cafe_ordering::MemoryStorage::new());
    cart.add_item(&espresso, SelectedOptions::new(), None, 1).unwrap();
    let details = CheckoutDetails::new(FulfillmentType::Pickup, CustomerInfo::new("Ana"));

    store.reject_saves(Some("Planilha indisponível"));
    let err = submitter
        .place_order(&mut cart, &details, None, None)
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Planilha indisponível");
    assert_eq!(cart.item_count(), 1);

    store.reject_saves(None);
    store.set_offline(true);
    let err = submitter
        .place_order(&mut cart, &details, None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, OrderingError::Transport(_)));
    assert_eq!(cart.item_count(), 1);

    // User retries once the store is back
    store.set_offline(false);
    submitter
        .place_order(&mut cart, &details, None, None)
        .await
        .unwrap();
    assert!(cart.is_empty());
    assert_eq!(store.saved_orders().len(), 1);
}
