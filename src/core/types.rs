use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Postal address of a creditor, ultimate creditor, or debtor.
///
/// Maps onto the structured address block of the payment part (address
/// type `S`). Name, postal code, city, and country are mandatory for any
/// address that enters a payload; street and house number may be empty.
/// The country is never defaulted here — callers must resolve it to a
/// concrete ISO 3166-1 alpha-2 code before assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Name or company (max 70 characters on the wire).
    pub name: String,
    /// Street without house number (max 70 characters).
    pub street: Option<String>,
    /// House or building number (max 16 characters).
    pub house_number: Option<String>,
    /// Postal code (max 16 characters).
    pub postal_code: String,
    /// City / town (max 35 characters).
    pub city: String,
    /// Country code (ISO 3166-1 alpha-2, e.g. "CH").
    pub country: String,
}

/// A single invoice or quote position.
///
/// Immutable once included in a totals computation; recomputation produces
/// a fresh [`Totals`], items are never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// What was delivered or performed.
    pub description: String,
    /// Invoiced quantity, ≥ 0.
    pub quantity: Decimal,
    /// Net price per unit, ≥ 0.
    pub unit_price: Decimal,
    /// Per-line discount in percent (0–100), applied to the line gross.
    pub discount_percent: Option<Decimal>,
    /// VAT rate in percent; `None` inherits
    /// [`BillingConfig::default_tax_rate`].
    pub tax_rate: Option<Decimal>,
}

/// Aggregate discount, applied once after line items are summed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Discount {
    /// Percentage of the subtotal (0–100).
    Percent(Decimal),
    /// Fixed amount, ≥ 0; clamped to the subtotal when it exceeds it.
    Fixed(Decimal),
}

/// Result of a totals computation.
///
/// All fields carry exact decimal values — no intermediate rounding is
/// applied, so the figures reconcile exactly against the per-line values
/// under audit. Pass `grand_total` through
/// [`round_to_five_rappen`](crate::core::round_to_five_rappen) to obtain
/// the coin-compatible amount printed on the payment part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    /// Sum of all line nets (after per-line discounts).
    pub subtotal: Decimal,
    /// Aggregate discount actually applied, `0 ≤ discount_amount ≤ subtotal`.
    pub discount_amount: Decimal,
    /// Total VAT over the post-discount base.
    pub tax_amount: Decimal,
    /// `subtotal − discount_amount + tax_amount`.
    pub grand_total: Decimal,
    /// Discount-adjusted VAT per line, parallel to the input items.
    /// All zeros when tax is disabled.
    pub line_taxes: Vec<Decimal>,
}

/// Company-level configuration consumed by the totals engine.
///
/// Deliberately has no `Default`: every value is an opaque caller input
/// (tenant settings upstream) and is never invented here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingConfig {
    /// Whether VAT is charged at all. Checked once per computation, not
    /// per line.
    pub tax_enabled: bool,
    /// VAT rate in percent for lines that do not carry their own.
    pub default_tax_rate: Decimal,
    /// Invoice currency (ISO 4217, e.g. "CHF").
    pub currency: String,
    /// Issuer's home country (ISO 3166-1 alpha-2).
    pub home_country: String,
}
