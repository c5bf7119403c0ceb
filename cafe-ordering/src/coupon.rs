//! Coupon Validator
//!
//! The store decides whether a code is valid; eligibility against the
//! current fulfillment type is always re-checked locally, and a local
//! rejection overrides a "valid" verdict.

use crate::error::{OrderingError, OrderingResult, ValidationError};
use cafe_client::{CouponValidationResponse, RemoteStore};
use rust_decimal::Decimal;
use shared::models::{Coupon, CouponInfo, CouponTag};
use shared::money::round_money;
use shared::order::FulfillmentType;

/// Coupon validator bound to a remote store
pub struct CouponValidator<R> {
    store: R,
}

impl<R: RemoteStore> CouponValidator<R> {
    pub fn new(store: R) -> Self {
        Self { store }
    }

    /// Validate a code for a subtotal and fulfillment type
    ///
    /// The returned coupon's discount is clamped into `[0, subtotal]`.
    pub async fn validate(
        &self,
        code: &str,
        subtotal: Decimal,
        fulfillment: FulfillmentType,
    ) -> OrderingResult<Coupon> {
        let code = code.trim().to_uppercase();
        if code.is_empty() {
            return Err(ValidationError::EmptyCouponCode.into());
        }

        let verdict = self.store.validate_coupon(&code, subtotal).await?;
        let coupon = interpret(&code, subtotal, fulfillment, verdict)?;

        tracing::info!(
            code = %coupon.code,
            discount = %coupon.discount,
            fulfillment = fulfillment.label(),
            "Coupon applied"
        );
        Ok(coupon)
    }
}

/// Turn the store's verdict into an applied coupon
fn interpret(
    code: &str,
    subtotal: Decimal,
    fulfillment: FulfillmentType,
    verdict: CouponValidationResponse,
) -> Result<Coupon, OrderingError> {
    if !verdict.valid {
        let message = verdict
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| "Cupom inválido".to_string());
        tracing::debug!(code = %code, reason = %message, "Coupon rejected by store");
        return Err(ValidationError::CouponRejected(message).into());
    }

    let info = verdict.coupon.unwrap_or_default();
    let tags = info.tags.clone();
    let coupon_code = if info.code.trim().is_empty() {
        code.to_string()
    } else {
        info.code.trim().to_uppercase()
    };

    let discount = verdict
        .discount_amount
        .unwrap_or_else(|| discount_from_info(&info, subtotal));
    let coupon = Coupon::clamped(coupon_code, discount, subtotal, tags);

    if !coupon.allows(fulfillment) {
        let message = ineligible_message(&coupon.eligibility);
        tracing::debug!(
            code = %coupon.code,
            fulfillment = fulfillment.label(),
            "Coupon not eligible for fulfillment type"
        );
        return Err(ValidationError::CouponIneligible(message).into());
    }

    Ok(coupon)
}

/// Discount derived from the coupon record when the store omits the amount
///
/// `tipo = percentual` applies `valor` percent; anything else is a fixed amount.
fn discount_from_info(info: &CouponInfo, subtotal: Decimal) -> Decimal {
    let Some(value) = info.value else {
        return Decimal::ZERO;
    };
    let percent = info
        .kind
        .as_deref()
        .map(|k| {
            let k = k.trim().to_lowercase();
            k.starts_with("percent") || k == "%"
        })
        .unwrap_or(false);
    if percent {
        round_money(subtotal * value / Decimal::ONE_HUNDRED)
    } else {
        round_money(value)
    }
}

fn ineligible_message(tags: &[CouponTag]) -> String {
    let allowed: Vec<&str> = tags
        .iter()
        .filter_map(CouponTag::restricted_to)
        .map(|f| match f {
            FulfillmentType::Pickup => "retirada",
            FulfillmentType::Delivery => "delivery",
            FulfillmentType::DineIn => "consumo no local",
        })
        .collect();
    format!("Este cupom é válido apenas para pedidos de {}", allowed.join(" ou "))
}
