use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use super::error::ZahlteilError;
use super::types::{BillingConfig, Discount, LineItem, Totals};

const HUNDRED: Decimal = dec!(100);

/// Compute subtotal, aggregate discount, per-line tax, and grand total for
/// a set of line items.
///
/// The pipeline runs in a fixed order — the order is significant because
/// tax authorities can audit the rounding trail:
///
/// 1. per line: `gross = quantity × unit_price`,
///    `net = gross × (1 − discount_percent/100)`
/// 2. `subtotal = Σ net`
/// 3. aggregate discount, clamped to `0..=subtotal`
/// 4. `net_after_discount = subtotal − discount_amount`
/// 5. a uniform discount factor (`net_after_discount / subtotal`, 1 when
///    the subtotal is zero) scales every line's pre-discount tax, so tax
///    is levied on the post-discount base without re-deriving each line's
///    allocation
/// 6. `grand_total = net_after_discount + tax_amount`
///
/// When `config.tax_enabled` is off, the flag is honored once for the
/// whole computation: `tax_amount` is zero and `line_taxes` is all zeros.
///
/// All arithmetic is exact [`Decimal`] arithmetic; nothing is rounded
/// here. Use [`round_to_five_rappen`] on the result for display or for
/// the payment-part amount.
///
/// ```
/// use rust_decimal_macros::dec;
/// use zahlteil::core::*;
///
/// let config = BillingConfig {
///     tax_enabled: true,
///     default_tax_rate: dec!(8.1),
///     currency: "CHF".into(),
///     home_country: "CH".into(),
/// };
/// let lines = vec![LineItemBuilder::new("Beratung", dec!(2), dec!(100)).build()];
/// let totals = compute_totals(&lines, None, &config).unwrap();
/// assert_eq!(totals.subtotal, dec!(200.00));
/// assert_eq!(totals.grand_total, dec!(216.200));
/// ```
pub fn compute_totals(
    lines: &[LineItem],
    discount: Option<&Discount>,
    config: &BillingConfig,
) -> Result<Totals, ZahlteilError> {
    let mut nets = Vec::with_capacity(lines.len());
    let mut subtotal = Decimal::ZERO;

    for (index, line) in lines.iter().enumerate() {
        if line.quantity.is_sign_negative() {
            return Err(ZahlteilError::InvalidLineItem {
                index,
                reason: format!("quantity {} must not be negative", line.quantity),
            });
        }
        if line.unit_price.is_sign_negative() {
            return Err(ZahlteilError::InvalidLineItem {
                index,
                reason: format!("unit price {} must not be negative", line.unit_price),
            });
        }
        if let Some(rate) = line.tax_rate {
            if rate.is_sign_negative() {
                return Err(ZahlteilError::InvalidLineItem {
                    index,
                    reason: format!("tax rate {rate} must not be negative"),
                });
            }
        }

        let gross = line.quantity * line.unit_price;
        let net = match line.discount_percent {
            Some(percent) => {
                if percent.is_sign_negative() || percent > HUNDRED {
                    return Err(ZahlteilError::DiscountOutOfRange(format!(
                        "line {index} discount {percent}% outside 0..=100"
                    )));
                }
                gross * (Decimal::ONE - percent / HUNDRED)
            }
            None => gross,
        };
        nets.push(net);
        subtotal += net;
    }

    let discount_amount = match discount {
        None => Decimal::ZERO,
        Some(Discount::Percent(percent)) => {
            if percent.is_sign_negative() || *percent > HUNDRED {
                return Err(ZahlteilError::DiscountOutOfRange(format!(
                    "{percent}% outside 0..=100"
                )));
            }
            subtotal * *percent / HUNDRED
        }
        Some(Discount::Fixed(amount)) => {
            if amount.is_sign_negative() {
                return Err(ZahlteilError::DiscountOutOfRange(format!(
                    "fixed discount {amount} must not be negative"
                )));
            }
            // A fixed discount may exceed the subtotal; it clamps instead
            // of failing so a generous voucher zeroes the invoice.
            *amount
        }
    }
    .min(subtotal);

    let net_after_discount = subtotal - discount_amount;
    let discount_factor = if subtotal.is_zero() {
        Decimal::ONE
    } else {
        net_after_discount / subtotal
    };

    let mut tax_amount = Decimal::ZERO;
    let line_taxes = if config.tax_enabled {
        nets.iter()
            .zip(lines)
            .map(|(net, line)| {
                let rate = line.tax_rate.unwrap_or(config.default_tax_rate);
                let tax = *net * rate / HUNDRED * discount_factor;
                tax_amount += tax;
                tax
            })
            .collect()
    } else {
        vec![Decimal::ZERO; lines.len()]
    };

    Ok(Totals {
        subtotal,
        discount_amount,
        tax_amount,
        grand_total: net_after_discount + tax_amount,
        line_taxes,
    })
}

/// Round a monetary amount to the nearest 0.05 (half-up).
///
/// Rappenrundung: cash amounts in CHF must be payable in 5-Rappen coins,
/// so the amount handed to the payment part is quantized while the exact
/// grand total remains the figure of record.
///
/// ```
/// use rust_decimal_macros::dec;
/// use zahlteil::core::round_to_five_rappen;
///
/// assert_eq!(round_to_five_rappen(dec!(242.325)), dec!(242.35));
/// assert_eq!(round_to_five_rappen(dec!(242.32)), dec!(242.30));
/// ```
pub fn round_to_five_rappen(amount: Decimal) -> Decimal {
    let step = dec!(0.05);
    (amount / step).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero) * step
}
