use rust_decimal::Decimal;
use thiserror::Error;

/// Which address block of a payment slip an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressRole {
    Creditor,
    UltimateCreditor,
    Debtor,
}

impl std::fmt::Display for AddressRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Creditor => "creditor",
            Self::UltimateCreditor => "ultimate creditor",
            Self::Debtor => "debtor",
        })
    }
}

/// Errors that can occur while classifying accounts, deriving references,
/// assembling or decoding payloads, or computing totals.
///
/// All failures stem from invalid input data, not from transient
/// conditions; nothing is retried internally and no partial result is ever
/// exposed alongside an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ZahlteilError {
    /// The account string does not satisfy the IBAN grammar (ISO 13616):
    /// country prefix, check digits, country-specific length, mod-97.
    #[error("invalid account format: {0}")]
    InvalidAccountFormat(String),

    /// The document identifier kept more than 26 digits after
    /// normalization and cannot fit a QR reference.
    #[error("document identifier keeps {0} digits after normalization, at most 26 fit a QR reference")]
    ReferenceTooLong(usize),

    /// A candidate QR reference is not 27 ASCII digits.
    #[error("invalid QR reference: {0}")]
    InvalidReferenceFormat(String),

    /// The trailing check digit of a candidate QR reference does not match
    /// the one derived from its first 26 digits.
    #[error("checksum mismatch in reference '{reference}': expected check digit {expected}, found {found}")]
    ChecksumMismatch {
        reference: String,
        expected: u8,
        found: u8,
    },

    /// A text field contains a character outside the permitted set of the
    /// payment standard. The field is named with a dotted path, e.g.
    /// `debtor.city`; nothing is transliterated.
    #[error("unsupported character {character:?} in {field}")]
    UnsupportedCharacter { field: String, character: char },

    /// A mandatory address element (name, postal code, city, country) is
    /// missing or not resolved to a concrete value for the given role.
    #[error("incomplete {role} address: {field} is required")]
    IncompleteAddress {
        role: AddressRole,
        field: &'static str,
    },

    /// A text field exceeds the maximum length the payment standard
    /// allows for it.
    #[error("{field} exceeds {max} characters")]
    FieldTooLong { field: String, max: usize },

    /// The slip amount is negative or larger than 999 999 999.99.
    #[error("amount {0} outside the permitted range 0.00..=999999999.99")]
    AmountOutOfRange(Decimal),

    /// Account kind and reference variant do not agree: a QR-IBAN must
    /// carry a QR reference, a plain IBAN must not.
    #[error("account and reference do not agree: {0}")]
    ReferenceMismatch(String),

    /// A discount percentage outside 0–100 or a negative fixed discount.
    #[error("discount out of range: {0}")]
    DiscountOutOfRange(String),

    /// A line item with a negative quantity, unit price, or tax rate.
    #[error("line {index}: {reason}")]
    InvalidLineItem { index: usize, reason: String },

    /// A payload being decoded is structurally broken (wrong marker,
    /// missing lines, unknown reference type, unparseable amount).
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// Document number sequencing error.
    #[error("numbering error: {0}")]
    Numbering(String),
}
