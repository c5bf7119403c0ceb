//! Canonical order payload
//!
//! Totals are frozen here: later cart changes never reach a built order.

use crate::cart::CartItem;
use crate::delivery::ZoneResolution;
use crate::error::ValidationError;
use chrono::Utc;
use rust_decimal::Decimal;
use shared::models::Coupon;
use shared::money::round_money;
use shared::order::{
    CustomerInfo, FulfillmentType, Order, OrderItemSnapshot, OrderStatus, PaymentMethod,
};

/// Everything the customer supplies at checkout besides the cart
#[derive(Debug, Clone, Default)]
pub struct CheckoutDetails {
    pub fulfillment: FulfillmentType,
    pub customer: CustomerInfo,
    pub payment_method: PaymentMethod,
    /// Cash only: amount the customer pays with
    pub change_for: Option<Decimal>,
    pub notes: Option<String>,
    /// Customer asked for the summary to be sent over the messaging channel
    pub notify_opt_in: bool,
}

impl CheckoutDetails {
    pub fn new(fulfillment: FulfillmentType, customer: CustomerInfo) -> Self {
        Self {
            fulfillment,
            customer,
            ..Default::default()
        }
    }

    pub fn with_payment(mut self, method: PaymentMethod, change_for: Option<Decimal>) -> Self {
        self.payment_method = method;
        self.change_for = change_for;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_notification(mut self, opt_in: bool) -> Self {
        self.notify_opt_in = opt_in;
        self
    }

    /// Customer-side checks that do not depend on the cart
    pub fn validate(&self, zone: Option<&ZoneResolution>) -> Result<(), ValidationError> {
        if self.customer.name.trim().is_empty() {
            return Err(ValidationError::MissingCustomerName);
        }
        if self.fulfillment == FulfillmentType::Delivery {
            if let Some(field) = self.customer.missing_address_field() {
                return Err(ValidationError::IncompleteAddress(field));
            }
            match zone {
                Some(zone) => zone.require_served()?,
                None => {
                    return Err(ValidationError::ZoneUnserved(
                        "Escolha o bairro de entrega".into(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Build the order payload from the cart and checkout inputs
///
/// `total = subtotal - discount + delivery_fee`, where the fee only applies
/// to delivery and the discount is re-clamped against the current subtotal.
pub fn build_payload(
    items: &[CartItem],
    details: &CheckoutDetails,
    coupon: Option<&Coupon>,
    zone: Option<&ZoneResolution>,
) -> Result<Order, ValidationError> {
    if items.is_empty() {
        return Err(ValidationError::EmptyCart);
    }
    details.validate(zone)?;

    let snapshots: Vec<OrderItemSnapshot> = items.iter().map(snapshot_item).collect();
    let subtotal = round_money(snapshots.iter().map(|i| i.line_total).sum());

    let (discount, coupon_code) = match coupon {
        Some(coupon) => {
            if !coupon.allows(details.fulfillment) {
                return Err(ValidationError::CouponIneligible(format!(
                    "O cupom {} não é válido para {}",
                    coupon.code,
                    details.fulfillment.label().to_lowercase()
                )));
            }
            (coupon.discount_for(subtotal), Some(coupon.code.clone()))
        }
        None => (Decimal::ZERO, None),
    };

    let delivery = match (details.fulfillment, zone) {
        (FulfillmentType::Delivery, Some(zone)) => Some(zone),
        _ => None,
    };
    let delivery_fee = delivery.map(|z| round_money(z.fee)).unwrap_or_default();
    let total = round_money(subtotal - discount + delivery_fee);

    let change_for = match details.payment_method {
        PaymentMethod::Cash => details.change_for.map(round_money),
        _ => None,
    };

    let mut customer = details.customer.clone();
    customer.name = customer.name.trim().to_string();
    if details.fulfillment != FulfillmentType::DineIn {
        customer.table = None;
    }

    Ok(Order {
        id: None,
        fulfillment: details.fulfillment,
        customer,
        items: snapshots,
        subtotal,
        discount,
        coupon_code,
        delivery_fee,
        delivery_zone: delivery.map(|z| z.zone_name.clone()),
        eta: delivery.map(|z| z.eta_label()).filter(|e| !e.is_empty()),
        total,
        payment_method: details.payment_method,
        change_for,
        status: OrderStatus::Received,
        created_at: Some(Utc::now()),
        notes: details
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string),
    })
}

fn snapshot_item(item: &CartItem) -> OrderItemSnapshot {
    OrderItemSnapshot {
        product_id: Some(item.product.id.clone()),
        name: item.product.name.clone(),
        quantity: item.quantity,
        unit_price: item.unit_price,
        line_total: item.line_total,
        options: item.option_labels(),
        note: item.note.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{CartLedger, MemoryStorage};
    use crate::delivery::resolve;
    use shared::models::{DeliveryZone, OptionGroup, Product, ProductOption, SelectedOptions};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn cart() -> CartLedger<MemoryStorage> {
        let espresso = Product::new("espresso", "Espresso", dec("5.50"));
        let latte = Product::new("latte", "Latte", dec("8.00")).with_group(
            OptionGroup::new("size", "Tamanho", true)
                .with_option(ProductOption::new("g", "Grande", dec("2.00"))),
        );
        let mut cart = CartLedger::new(MemoryStorage::new());
        cart.add_item(&espresso, SelectedOptions::new(), None, 2).unwrap();
        let size: SelectedOptions = [("size".to_string(), "g".to_string())].into_iter().collect();
        cart.add_item(&latte, size, Some("sem açúcar"), 1).unwrap();
        cart
    }

    fn delivery_customer() -> CustomerInfo {
        let mut customer = CustomerInfo::new(" Ana ");
        customer.street = Some("Rua das Flores".into());
        customer.number = Some("10".into());
        customer.neighborhood = Some("Jardim América".into());
        customer.table = Some("4".into());
        customer
    }

    fn zones() -> Vec<DeliveryZone> {
        vec![DeliveryZone::new("JARDIM AMERICA", dec("6.50"), 30, 45)]
    }

    #[test]
    fn test_delivery_payload_freezes_totals() {
        let cart = cart();
        let zone = resolve("Jardim América", &zones());
        let coupon = Coupon::clamped("CAFE2", dec("2.00"), dec("21.00"), Vec::new());
        let details = CheckoutDetails::new(FulfillmentType::Delivery, delivery_customer())
            .with_payment(PaymentMethod::Cash, Some(dec("50")));

        let order = build_payload(cart.items(), &details, Some(&coupon), Some(&zone)).unwrap();

        assert_eq!(order.id, None);
        assert_eq!(order.status, OrderStatus::Received);
        assert_eq!(order.subtotal, dec("21.00"));
        assert_eq!(order.discount, dec("2.00"));
        assert_eq!(order.delivery_fee, dec("6.50"));
        assert_eq!(order.total, dec("25.50"));
        assert_eq!(order.delivery_zone.as_deref(), Some("JARDIM AMERICA"));
        assert_eq!(order.eta.as_deref(), Some("30-45 min"));
        assert_eq!(order.change_for, Some(dec("50")));
        assert_eq!(order.customer.name, "Ana");
        assert_eq!(order.customer.table, None);
        assert_eq!(order.items[1].options, vec!["Tamanho: Grande".to_string()]);
        assert_eq!(order.items[1].note.as_deref(), Some("sem açúcar"));
        assert!(order.created_at.is_some());
    }

    #[test]
    fn test_pickup_ignores_zone_fee() {
        let cart = cart();
        let zone = resolve("Jardim América", &zones());
        let details = CheckoutDetails::new(FulfillmentType::Pickup, CustomerInfo::new("Ana"))
            .with_payment(PaymentMethod::Pix, Some(dec("50")));

        let order = build_payload(cart.items(), &details, None, Some(&zone)).unwrap();
        assert_eq!(order.delivery_fee, Decimal::ZERO);
        assert_eq!(order.delivery_zone, None);
        assert_eq!(order.total, dec("21.00"));
        assert_eq!(order.change_for, None);
    }

    #[test]
    fn test_unserved_zone_blocks_delivery_only() {
        let cart = cart();
        let zone = resolve("Bairro Distante", &zones());

        let delivery = CheckoutDetails::new(FulfillmentType::Delivery, delivery_customer());
        let err = build_payload(cart.items(), &delivery, None, Some(&zone)).unwrap_err();
        assert!(err.is_zone_unserved());

        let pickup = CheckoutDetails::new(FulfillmentType::Pickup, CustomerInfo::new("Ana"));
        assert!(build_payload(cart.items(), &pickup, None, Some(&zone)).is_ok());

        let dine_in = CheckoutDetails::new(FulfillmentType::DineIn, CustomerInfo::new("Ana"));
        assert!(build_payload(cart.items(), &dine_in, None, None).is_ok());
    }

    #[test]
    fn test_incomplete_address_and_missing_name() {
        let cart = cart();
        let zone = resolve("Jardim América", &zones());

        let mut customer = delivery_customer();
        customer.number = Some("  ".into());
        let details = CheckoutDetails::new(FulfillmentType::Delivery, customer);
        assert_eq!(
            build_payload(cart.items(), &details, None, Some(&zone)),
            Err(ValidationError::IncompleteAddress("número"))
        );

        let details = CheckoutDetails::new(FulfillmentType::Pickup, CustomerInfo::new(""));
        assert_eq!(
            build_payload(cart.items(), &details, None, None),
            Err(ValidationError::MissingCustomerName)
        );
    }

    #[test]
    fn test_empty_cart_rejected() {
        let details = CheckoutDetails::new(FulfillmentType::Pickup, CustomerInfo::new("Ana"));
        assert_eq!(
            build_payload(&[], &details, None, None),
            Err(ValidationError::EmptyCart)
        );
    }

    #[test]
    fn test_discount_reclamped_and_eligibility_rechecked() {
        let mut cart = cart();
        let coupon = Coupon::clamped("BIG", dec("21.00"), dec("21.00"), Vec::new());
        cart.remove_item(1).unwrap();

        let details = CheckoutDetails::new(FulfillmentType::Pickup, CustomerInfo::new("Ana"));
        let order = build_payload(cart.items(), &details, Some(&coupon), None).unwrap();
        assert_eq!(order.discount, dec("11.00"));
        assert_eq!(order.total, Decimal::ZERO);

        let pickup_only = Coupon::clamped(
            "RETIRA",
            dec("1.00"),
            dec("11.00"),
            vec![shared::models::CouponTag::PickupOnly],
        );
        let details = CheckoutDetails::new(FulfillmentType::DineIn, CustomerInfo::new("Ana"));
        assert!(matches!(
            build_payload(cart.items(), &details, Some(&pickup_only), None),
            Err(ValidationError::CouponIneligible(_))
        ));
    }
}
