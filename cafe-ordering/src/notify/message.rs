//! Order summary text sent over the messaging channel

use shared::money::format_money;
use shared::order::{FulfillmentType, Order, PaymentMethod};
use std::fmt::Write;

/// Compose the human-readable order summary
///
/// Output depends only on the order, so the same order always yields the
/// same text.
pub fn compose_message(order: &Order) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = write_message(&mut out, order);
    out
}

fn write_message(out: &mut String, order: &Order) -> std::fmt::Result {
    let customer = &order.customer;

    // Header
    writeln!(out, "*Pedido #{}*", order.display_id())?;
    writeln!(out, "Cliente: {}", customer.name.trim())?;
    if let Some(phone) = non_blank(&customer.phone) {
        writeln!(out, "Telefone: {}", phone)?;
    }
    writeln!(out, "Tipo: {}", order.fulfillment.label())?;

    // Fulfillment block
    match order.fulfillment {
        FulfillmentType::Delivery => {
            writeln!(out, "Endereço: {}", customer.address_line())?;
            if let Some(neighborhood) = non_blank(&customer.neighborhood) {
                writeln!(out, "Bairro: {}", neighborhood)?;
            }
            if let Some(reference) = non_blank(&customer.reference) {
                writeln!(out, "Referência: {}", reference)?;
            }
            if let Some(zone) = non_blank(&order.delivery_zone) {
                match non_blank(&order.eta) {
                    Some(eta) => writeln!(out, "Zona: {} ({})", zone, eta)?,
                    None => writeln!(out, "Zona: {}", zone)?,
                }
            }
        }
        FulfillmentType::DineIn => {
            if let Some(table) = non_blank(&customer.table) {
                writeln!(out, "Mesa: {}", table)?;
            }
        }
        FulfillmentType::Pickup => {}
    }

    // Items
    writeln!(out)?;
    writeln!(out, "*Itens*")?;
    for item in &order.items {
        writeln!(
            out,
            "{}x {} - {}",
            item.quantity,
            item.name,
            format_money(item.line_total)
        )?;
        for label in &item.options {
            writeln!(out, "   {}", label)?;
        }
        if let Some(note) = non_blank(&item.note) {
            writeln!(out, "   Obs: {}", note)?;
        }
    }

    // Totals
    writeln!(out)?;
    writeln!(out, "Subtotal: {}", format_money(order.subtotal))?;
    if !order.discount.is_zero() {
        match non_blank(&order.coupon_code) {
            Some(code) => writeln!(out, "Desconto ({}): {}", code, format_money(-order.discount))?,
            None => writeln!(out, "Desconto: {}", format_money(-order.discount))?,
        }
    }
    if !order.delivery_fee.is_zero() {
        writeln!(out, "Taxa de entrega: {}", format_money(order.delivery_fee))?;
    }
    writeln!(out, "*Total: {}*", format_money(order.total))?;

    // Payment and notes
    writeln!(out)?;
    match (order.payment_method, order.change_for) {
        (PaymentMethod::Cash, Some(change_for)) => writeln!(
            out,
            "Pagamento: {} (troco para {})",
            order.payment_method.label(),
            format_money(change_for)
        )?,
        (method, _) => writeln!(out, "Pagamento: {}", method.label())?,
    }
    if let Some(notes) = non_blank(&order.notes) {
        writeln!(out, "Observações: {}", notes)?;
    }

    // Drop the trailing newline
    out.truncate(out.trim_end().len());
    Ok(())
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
