//! Swiss QR Code payload assembly and decoding.
//!
//! The payload is the text record embedded in the QR symbol of the
//! payment part: a fixed-order sequence of elements, one per line, joined
//! with CR+LF. Field order, character repertoire, and the address block
//! layout are dictated by the Swiss Implementation Guidelines QR-bill
//! (version 2.0); this module reproduces them exactly and never
//! transliterates or reorders anything.
//!
//! Assembly is a pure function: identical input yields byte-identical
//! output, so the same slip can be encoded concurrently for print and
//! archive without coordination.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::account::{Account, AccountKind};
use super::charset::ensure_permitted;
use super::reference::{QrReference, Reference};
use crate::core::{Address, AddressRole, ZahlteilError};

/// QRType marker, first payload line.
const QR_TYPE: &str = "SPC";
/// Payload structure version.
const VERSION: &str = "0200";
/// Coding type 1: Latin character set.
const CODING: &str = "1";
/// End-of-payment-data trailer.
const TRAILER: &str = "EPD";
/// Structured address marker.
const ADDRESS_STRUCTURED: &str = "S";
/// Line terminator between payload elements.
const TERMINATOR: &str = "\r\n";

const MAX_AMOUNT: Decimal = dec!(999999999.99);

const MAX_NAME_LEN: usize = 70;
const MAX_STREET_LEN: usize = 70;
const MAX_HOUSE_NUMBER_LEN: usize = 16;
const MAX_POSTAL_CODE_LEN: usize = 16;
const MAX_CITY_LEN: usize = 35;
const MAX_MESSAGE_LEN: usize = 140;
const MAX_BILLING_INFO_LEN: usize = 140;
const MAX_CREDITOR_REFERENCE_LEN: usize = 25;

/// Everything that goes into one payment part.
///
/// Built with [`PaymentSlipBuilder`]; encoded with
/// [`to_payload`](Self::to_payload), decoded with
/// [`from_payload`](Self::from_payload).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSlip {
    /// Creditor account; its kind dictates the reference variant.
    pub account: Account,
    /// Creditor (payee) address.
    pub creditor: Address,
    /// Ultimate creditor — rarely used, left blank on the wire when absent.
    pub ultimate_creditor: Option<Address>,
    /// Amount, written with exactly two decimals.
    pub amount: Decimal,
    /// Currency code (ISO 4217).
    pub currency: String,
    /// Debtor (payer) address.
    pub debtor: Address,
    /// Structured reference, matching the account kind.
    pub reference: Reference,
    /// Unstructured message.
    pub message: Option<String>,
    /// Structured billing information for the recipient's software.
    pub billing_info: Option<String>,
}

impl PaymentSlip {
    /// Serialize into the payload string consumed by the QR symbol
    /// encoder.
    ///
    /// Validates pairing of account and reference, the amount range, the
    /// permitted character set of every field, address completeness, and
    /// field lengths. The amount is written with exactly two decimals
    /// (half-up beyond two); country codes are written uppercase.
    pub fn to_payload(&self) -> Result<String, ZahlteilError> {
        self.validate()?;

        let mut lines: Vec<String> = Vec::with_capacity(32);
        lines.push(QR_TYPE.into());
        lines.push(VERSION.into());
        lines.push(CODING.into());
        lines.push(self.account.as_str().into());
        push_address(&mut lines, Some(&self.creditor));
        push_address(&mut lines, self.ultimate_creditor.as_ref());
        let amount = self
            .amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        lines.push(format!("{amount:.2}"));
        lines.push(self.currency.clone());
        push_address(&mut lines, Some(&self.debtor));
        let (token, value) = match &self.reference {
            Reference::Qr(reference) => ("QRR", reference.as_str().to_string()),
            Reference::Creditor(reference) => ("SCOR", reference.clone()),
            Reference::None => ("NON", String::new()),
        };
        lines.push(token.into());
        lines.push(value);
        lines.push(self.message.clone().unwrap_or_default());
        lines.push(TRAILER.into());
        if let Some(billing) = &self.billing_info {
            lines.push(billing.clone());
        }

        Ok(lines.join(TERMINATOR))
    }

    /// Decode a payload string back into a validated slip.
    ///
    /// Accepts CR+LF or bare LF line endings. The `SCOR` reference type
    /// (ISO 11649 creditor reference) is tolerated even though this
    /// library never generates it; combined-format (`K`) address blocks
    /// are rejected. Decoding runs the same validation as assembly, so a
    /// decoded slip re-encodes to an identical payload.
    pub fn from_payload(payload: &str) -> Result<Self, ZahlteilError> {
        let mut cursor = Cursor {
            lines: payload.lines(),
            line_no: 0,
        };

        let qr_type = cursor.next()?;
        if qr_type != QR_TYPE {
            return Err(ZahlteilError::MalformedPayload(format!(
                "unknown QRType marker '{qr_type}'"
            )));
        }
        let version = cursor.next()?;
        if version != VERSION {
            return Err(ZahlteilError::MalformedPayload(format!(
                "unsupported version '{version}'"
            )));
        }
        let coding = cursor.next()?;
        if coding != CODING {
            return Err(ZahlteilError::MalformedPayload(format!(
                "unsupported coding type '{coding}'"
            )));
        }

        let account = Account::parse(cursor.next()?)?;
        let creditor = parse_address(&mut cursor)?.ok_or(ZahlteilError::IncompleteAddress {
            role: AddressRole::Creditor,
            field: "name",
        })?;
        let ultimate_creditor = parse_address(&mut cursor)?;

        let amount_line = cursor.next()?;
        let amount: Decimal = amount_line.parse().map_err(|_| {
            ZahlteilError::MalformedPayload(format!("unparseable amount '{amount_line}'"))
        })?;
        let currency = cursor.next()?.to_string();

        let debtor = parse_address(&mut cursor)?.ok_or(ZahlteilError::IncompleteAddress {
            role: AddressRole::Debtor,
            field: "name",
        })?;

        let reference_type = cursor.next()?;
        let reference_value = cursor.next()?;
        let reference = match reference_type {
            "QRR" => Reference::Qr(QrReference::parse(reference_value)?),
            "SCOR" if reference_value.is_empty() => {
                return Err(ZahlteilError::MalformedPayload(
                    "SCOR reference type with empty reference".into(),
                ));
            }
            "SCOR" => Reference::Creditor(reference_value.to_string()),
            "NON" if reference_value.is_empty() => Reference::None,
            "NON" => {
                return Err(ZahlteilError::MalformedPayload(
                    "NON reference type with non-empty reference".into(),
                ));
            }
            other => {
                return Err(ZahlteilError::MalformedPayload(format!(
                    "unknown reference type '{other}'"
                )));
            }
        };

        let message = none_if_empty(cursor.next()?.to_string());
        let trailer = cursor.next()?;
        if trailer != TRAILER {
            return Err(ZahlteilError::MalformedPayload(format!(
                "expected trailer '{TRAILER}', found '{trailer}'"
            )));
        }
        let billing_info = cursor.lines.next().and_then(|l| none_if_empty(l.to_string()));
        if let Some(extra) = cursor.lines.next() {
            return Err(ZahlteilError::MalformedPayload(format!(
                "unexpected content after billing information: '{extra}'"
            )));
        }

        let slip = Self {
            account,
            creditor,
            ultimate_creditor,
            amount,
            currency,
            debtor,
            reference,
            message,
            billing_info,
        };
        slip.validate()?;
        Ok(slip)
    }

    /// Validation shared by assembly and decoding.
    fn validate(&self) -> Result<(), ZahlteilError> {
        match (self.account.kind(), &self.reference) {
            (AccountKind::QrIban, Reference::Qr(_)) => {}
            (AccountKind::QrIban, _) => {
                return Err(ZahlteilError::ReferenceMismatch(
                    "a QR-IBAN requires a QR reference".into(),
                ));
            }
            (AccountKind::Iban, Reference::Qr(_)) => {
                return Err(ZahlteilError::ReferenceMismatch(
                    "a QR reference requires a QR-IBAN".into(),
                ));
            }
            (AccountKind::Iban, _) => {}
        }

        if self.amount.is_sign_negative() || self.amount > MAX_AMOUNT {
            return Err(ZahlteilError::AmountOutOfRange(self.amount));
        }
        ensure_permitted("currency", &self.currency)?;

        validate_address(&self.creditor, AddressRole::Creditor)?;
        if let Some(ultimate) = &self.ultimate_creditor {
            validate_address(ultimate, AddressRole::UltimateCreditor)?;
        }
        validate_address(&self.debtor, AddressRole::Debtor)?;

        if let Reference::Creditor(reference) = &self.reference {
            ensure_permitted("reference", reference)?;
            ensure_length("reference", reference, MAX_CREDITOR_REFERENCE_LEN)?;
        }
        if let Some(message) = &self.message {
            ensure_permitted("message", message)?;
            ensure_length("message", message, MAX_MESSAGE_LEN)?;
        }
        if let Some(billing) = &self.billing_info {
            ensure_permitted("billing_info", billing)?;
            ensure_length("billing_info", billing, MAX_BILLING_INFO_LEN)?;
        }
        Ok(())
    }
}

/// Builder for [`PaymentSlip`].
///
/// [`document_id`](Self::document_id) routes the document identifier to
/// wherever the account kind demands: into a QR reference for a QR-IBAN,
/// into the unstructured message for a plain IBAN.
pub struct PaymentSlipBuilder {
    account: Account,
    creditor: Address,
    ultimate_creditor: Option<Address>,
    amount: Decimal,
    currency: String,
    debtor: Address,
    reference: Option<Reference>,
    document_id: Option<String>,
    message: Option<String>,
    billing_info: Option<String>,
}

impl PaymentSlipBuilder {
    pub fn new(
        account: Account,
        creditor: Address,
        amount: Decimal,
        currency: impl Into<String>,
        debtor: Address,
    ) -> Self {
        Self {
            account,
            creditor,
            ultimate_creditor: None,
            amount,
            currency: currency.into(),
            debtor,
            reference: None,
            document_id: None,
            message: None,
            billing_info: None,
        }
    }

    pub fn ultimate_creditor(mut self, address: Address) -> Self {
        self.ultimate_creditor = Some(address);
        self
    }

    /// Set an already-derived reference.
    pub fn reference(mut self, reference: Reference) -> Self {
        self.reference = Some(reference);
        self
    }

    /// Derive the reference from a document identifier at build time.
    ///
    /// Ignored when [`reference`](Self::reference) was set explicitly.
    pub fn document_id(mut self, document_id: impl Into<String>) -> Self {
        self.document_id = Some(document_id.into());
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn billing_info(mut self, billing_info: impl Into<String>) -> Self {
        self.billing_info = Some(billing_info.into());
        self
    }

    /// Resolve the reference and assemble the slip.
    ///
    /// Resolution never computes a checksum for a plain IBAN — the
    /// document identifier becomes the unstructured message instead
    /// (unless an explicit message was given).
    pub fn build(self) -> Result<PaymentSlip, ZahlteilError> {
        let reference = match (self.reference, &self.document_id) {
            (Some(reference), _) => reference,
            (None, Some(document_id)) => Reference::for_account(&self.account, document_id)?,
            (None, None) => Reference::None,
        };
        let message = match (&reference, self.message, self.document_id) {
            (Reference::None, None, Some(document_id)) => Some(document_id),
            (_, message, _) => message,
        };
        Ok(PaymentSlip {
            account: self.account,
            creditor: self.creditor,
            ultimate_creditor: self.ultimate_creditor,
            amount: self.amount,
            currency: self.currency,
            debtor: self.debtor,
            reference,
            message: message.and_then(none_if_empty),
            billing_info: self.billing_info.and_then(none_if_empty),
        })
    }
}

struct Cursor<'a> {
    lines: std::str::Lines<'a>,
    line_no: usize,
}

impl<'a> Cursor<'a> {
    fn next(&mut self) -> Result<&'a str, ZahlteilError> {
        self.line_no += 1;
        self.lines.next().ok_or_else(|| {
            ZahlteilError::MalformedPayload(format!("payload ends at line {}", self.line_no))
        })
    }
}

fn none_if_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

/// Write the 7-line address block: marker, name, street, house number,
/// postal code, city, country — or 7 empty lines when absent.
fn push_address(lines: &mut Vec<String>, address: Option<&Address>) {
    match address {
        Some(address) => {
            lines.push(ADDRESS_STRUCTURED.into());
            lines.push(address.name.clone());
            lines.push(address.street.clone().unwrap_or_default());
            lines.push(address.house_number.clone().unwrap_or_default());
            lines.push(address.postal_code.clone());
            lines.push(address.city.clone());
            lines.push(address.country.to_ascii_uppercase());
        }
        None => {
            for _ in 0..7 {
                lines.push(String::new());
            }
        }
    }
}

/// Read a 7-line address block; all-empty means absent.
fn parse_address(cursor: &mut Cursor<'_>) -> Result<Option<Address>, ZahlteilError> {
    let kind = cursor.next()?;
    let name = cursor.next()?;
    let street = cursor.next()?;
    let house_number = cursor.next()?;
    let postal_code = cursor.next()?;
    let city = cursor.next()?;
    let country = cursor.next()?;

    if kind.is_empty()
        && [name, street, house_number, postal_code, city, country]
            .iter()
            .all(|line| line.is_empty())
    {
        return Ok(None);
    }
    match kind {
        "S" => {}
        "K" => {
            return Err(ZahlteilError::MalformedPayload(
                "combined (K) address format is not supported".into(),
            ));
        }
        other => {
            return Err(ZahlteilError::MalformedPayload(format!(
                "unknown address type '{other}'"
            )));
        }
    }

    Ok(Some(Address {
        name: name.to_string(),
        street: none_if_empty(street.to_string()),
        house_number: none_if_empty(house_number.to_string()),
        postal_code: postal_code.to_string(),
        city: city.to_string(),
        country: country.to_string(),
    }))
}

fn validate_address(address: &Address, role: AddressRole) -> Result<(), ZahlteilError> {
    let require = |field: &'static str, value: &str| {
        if value.trim().is_empty() {
            Err(ZahlteilError::IncompleteAddress { role, field })
        } else {
            Ok(())
        }
    };
    require("name", &address.name)?;
    require("postal_code", &address.postal_code)?;
    require("city", &address.city)?;
    if address.country.len() != 2 || !address.country.bytes().all(|b| b.is_ascii_alphabetic()) {
        return Err(ZahlteilError::IncompleteAddress {
            role,
            field: "country",
        });
    }

    let path = |field: &str| format!("{}.{field}", role_path(role));
    ensure_permitted(&path("name"), &address.name)?;
    ensure_length(&path("name"), &address.name, MAX_NAME_LEN)?;
    if let Some(street) = &address.street {
        ensure_permitted(&path("street"), street)?;
        ensure_length(&path("street"), street, MAX_STREET_LEN)?;
    }
    if let Some(house_number) = &address.house_number {
        ensure_permitted(&path("house_number"), house_number)?;
        ensure_length(&path("house_number"), house_number, MAX_HOUSE_NUMBER_LEN)?;
    }
    ensure_permitted(&path("postal_code"), &address.postal_code)?;
    ensure_length(&path("postal_code"), &address.postal_code, MAX_POSTAL_CODE_LEN)?;
    ensure_permitted(&path("city"), &address.city)?;
    ensure_length(&path("city"), &address.city, MAX_CITY_LEN)?;
    Ok(())
}

fn role_path(role: AddressRole) -> &'static str {
    match role {
        AddressRole::Creditor => "creditor",
        AddressRole::UltimateCreditor => "ultimate_creditor",
        AddressRole::Debtor => "debtor",
    }
}

fn ensure_length(field: &str, value: &str, max: usize) -> Result<(), ZahlteilError> {
    if value.chars().count() > max {
        return Err(ZahlteilError::FieldTooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}
