//! Discount tiers, catalog totals and es-CL amount formatting.

use indexmap::IndexMap;

use crate::errors::PricingError;

const GROUPING_SEPARATOR: char = '.';

/// Product name → unit price.
pub type Catalog = IndexMap<String, f64>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Discount {
    pub subtotal: f64,
    pub percent: u8,
    pub final_price: f64,
    pub savings: f64,
}

/// Tier for `subtotal`. Both boundaries are exclusive.
pub fn discount_percent(subtotal: f64) -> u8 {
    if subtotal > 100.0 {
        20
    } else if subtotal > 50.0 {
        10
    } else {
        0
    }
}

pub fn discount(subtotal: f64) -> Result<Discount, PricingError> {
    if !subtotal.is_finite() {
        return Err(PricingError::NotFinite);
    }
    if subtotal < 0.0 {
        return Err(PricingError::NegativeSubtotal(subtotal));
    }
    let percent = discount_percent(subtotal);
    let final_price = round2(subtotal * (1.0 - f64::from(percent) / 100.0));
    Ok(Discount {
        subtotal,
        percent,
        final_price,
        savings: round2(subtotal - final_price),
    })
}

/// Sums the catalog price of every ordered product, repeats included.
pub fn order_total<S: AsRef<str>>(order: &[S], catalog: &Catalog) -> Result<f64, PricingError> {
    order.iter().try_fold(0.0, |total, product| {
        let name = product.as_ref();
        catalog
            .get(name)
            .map(|price| total + price)
            .ok_or_else(|| PricingError::UnknownProduct(name.to_string()))
    })
}

pub fn quote<S: AsRef<str>>(order: &[S], catalog: &Catalog) -> Result<Discount, PricingError> {
    discount(order_total(order, catalog)?)
}

/// Integer with `.` thousands separators, e.g. `1.250.000`.
pub fn format_grouped(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (index, ch) in digits.chars().enumerate() {
        if index != 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(GROUPING_SEPARATOR);
        }
        grouped.push(ch);
    }
    if amount < 0 {
        grouped.insert(0, '-');
    }
    grouped
}

/// es-CL money body: grouped integer part, decimal comma only when needed.
pub fn format_amount(value: f64) -> String {
    let cents = (value * 100.0).round() as i64;
    let whole = format_grouped(cents / 100);
    let fraction = (cents % 100).abs();
    let sign = if cents < 0 && cents / 100 == 0 { "-" } else { "" };
    if fraction == 0 {
        format!("{sign}{whole}")
    } else {
        format!("{sign}{whole},{fraction:02}")
    }
}

/// Leading integer of `raw`, ignoring anything after the digits.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = rest
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(rest.len());
    let value: i64 = rest[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
