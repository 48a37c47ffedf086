//! # zahlteil
//!
//! Swiss QR-bill payment part ("Zahlteil") encoding and invoice totals:
//! QR-IBAN classification, QR reference with mod-10 recursive check
//! digit, Swiss QR Code payload assembly/decoding, and the
//! discount/tax/rounding pipeline that produces the slip amount.
//!
//! All monetary values use [`rust_decimal::Decimal`] — never floating
//! point. The payload follows the
//! [Swiss Implementation Guidelines QR-bill](https://www.six-group.com/en/products-services/banking-services/standardization.html)
//! (version 2.0). Everything is pure and synchronous: no I/O, no global
//! state, safe to call in parallel across unrelated documents.
//!
//! ## Quick Start
//!
//! ```rust
//! use rust_decimal_macros::dec;
//! use zahlteil::core::*;
//! use zahlteil::qr::*;
//!
//! let config = BillingConfig {
//!     tax_enabled: true,
//!     default_tax_rate: dec!(8.1),
//!     currency: "CHF".into(),
//!     home_country: "CH".into(),
//! };
//! let lines = vec![
//!     LineItemBuilder::new("Beratung", dec!(2), dec!(100.00)).build(),
//!     LineItemBuilder::new("Spesen", dec!(1), dec!(50.00)).build(),
//! ];
//! let totals = compute_totals(&lines, Some(&Discount::Percent(dec!(10))), &config).unwrap();
//! assert_eq!(totals.subtotal, dec!(250.00));
//!
//! let account = Account::parse("CH44 3199 9123 0008 8901 2").unwrap();
//! assert_eq!(account.kind(), AccountKind::QrIban);
//!
//! let creditor = AddressBuilder::new("Muster & Söhne AG", "8001", "Zürich", "CH")
//!     .street("Bahnhofstrasse")
//!     .house_number("7")
//!     .build();
//! let debtor = AddressBuilder::new("Pia Rutschmann", "9400", "Rorschach", "CH").build();
//!
//! let slip = PaymentSlipBuilder::new(
//!     account,
//!     creditor,
//!     round_to_five_rappen(totals.grand_total),
//!     "CHF",
//!     debtor,
//! )
//! .document_id("RE-2026-007")
//! .build()
//! .unwrap();
//!
//! let payload = slip.to_payload().unwrap();
//! assert!(payload.starts_with("SPC\r\n0200\r\n1\r\n"));
//! assert_eq!(PaymentSlip::from_payload(&payload).unwrap(), slip);
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` | Invoice types, totals engine, document numbering |
//! | `qr` (default) | QR-IBAN, QR reference, payload codec |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "qr")]
pub mod qr;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
