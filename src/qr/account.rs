//! IBAN account handling and QR-IBAN classification.
//!
//! Whether a payment slip carries a structured QR reference is decided by
//! the creditor account alone: accounts whose institution identifier
//! (IID, positions 5–9) lies in the band 30000–31999 are QR-IBANs and
//! must be paired with a QR reference; every other account is a plain
//! IBAN and must not be.

use serde::{Deserialize, Serialize};

use crate::core::ZahlteilError;

/// Classification of an account, fixed at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountKind {
    /// Institution identifier in the reserved band 30000–31999; the slip
    /// must carry a QR reference.
    QrIban,
    /// Ordinary IBAN; the slip must not carry a QR reference.
    Iban,
}

/// The IID band reserved for QR-IBANs.
const QR_IID_BAND: std::ops::RangeInclusive<u32> = 30_000..=31_999;

/// IBAN lengths per ISO 13616 registry (SEPA area and neighbors).
/// Sorted by country code for binary search.
static IBAN_LENGTHS: &[(&str, usize)] = &[
    ("AT", 20),
    ("BE", 16),
    ("BG", 22),
    ("CH", 21),
    ("CY", 28),
    ("CZ", 24),
    ("DE", 22),
    ("DK", 18),
    ("EE", 20),
    ("ES", 24),
    ("FI", 18),
    ("FR", 27),
    ("GB", 22),
    ("GR", 27),
    ("HR", 21),
    ("HU", 28),
    ("IE", 22),
    ("IT", 27),
    ("LI", 21),
    ("LT", 20),
    ("LU", 20),
    ("LV", 21),
    ("MT", 31),
    ("NL", 18),
    ("NO", 15),
    ("PL", 28),
    ("PT", 25),
    ("RO", 24),
    ("SE", 24),
    ("SI", 19),
    ("SK", 24),
];

/// A validated account number with its classification.
///
/// Only constructible through [`Account::parse`], so every value in
/// circulation satisfies the IBAN grammar and carries its immutable
/// [`AccountKind`]. Serialized as the compact string; deserialization
/// re-validates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Account {
    value: String,
    kind: AccountKind,
}

impl Account {
    /// Parse and classify an account number.
    ///
    /// Accepts grouped display forms ("CH44 3199 9123 0008 8901 2");
    /// spaces are stripped and letters uppercased before validation.
    /// The grammar is checked (2-letter country, 2 check digits,
    /// alphanumeric body, country-specific total length) followed by the
    /// ISO 7064 mod-97 checksum.
    pub fn parse(input: &str) -> Result<Self, ZahlteilError> {
        let value: String = input
            .chars()
            .filter(|c| *c != ' ')
            .map(|c| c.to_ascii_uppercase())
            .collect();

        if !value.is_ascii() {
            return Err(ZahlteilError::InvalidAccountFormat(format!(
                "'{input}' contains non-ASCII characters"
            )));
        }
        if value.len() < 5 || value.len() > 34 {
            return Err(ZahlteilError::InvalidAccountFormat(format!(
                "'{input}' has {} significant characters, expected 5..=34",
                value.len()
            )));
        }
        if !value[..2].bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(ZahlteilError::InvalidAccountFormat(format!(
                "'{input}' does not start with a 2-letter country code"
            )));
        }
        if !value[2..4].bytes().all(|b| b.is_ascii_digit()) {
            return Err(ZahlteilError::InvalidAccountFormat(format!(
                "'{input}' has no numeric check digits at positions 3-4"
            )));
        }
        if let Some(bad) = value[4..].chars().find(|c| !c.is_ascii_alphanumeric()) {
            return Err(ZahlteilError::InvalidAccountFormat(format!(
                "'{input}' contains invalid character {bad:?}"
            )));
        }

        let country = &value[..2];
        let expected_len = IBAN_LENGTHS
            .binary_search_by_key(&country, |&(code, _)| code)
            .map(|i| IBAN_LENGTHS[i].1)
            .map_err(|_| {
                ZahlteilError::InvalidAccountFormat(format!("unknown country code '{country}'"))
            })?;
        if value.len() != expected_len {
            return Err(ZahlteilError::InvalidAccountFormat(format!(
                "'{input}' has length {}, {country} accounts have {expected_len} characters",
                value.len()
            )));
        }

        if mod97(&value) != 1 {
            return Err(ZahlteilError::InvalidAccountFormat(format!(
                "'{input}' fails the mod-97 check"
            )));
        }

        let kind = match institution_id(&value) {
            Some(iid) if QR_IID_BAND.contains(&iid) => AccountKind::QrIban,
            _ => AccountKind::Iban,
        };

        Ok(Self { value, kind })
    }

    /// The classification computed at parse time.
    pub fn kind(&self) -> AccountKind {
        self.kind
    }

    /// The compact, uppercase account string.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// The institution identifier (positions 5–9), when numeric.
    pub fn iid(&self) -> Option<u32> {
        institution_id(&self.value)
    }

    /// Display form grouped in blocks of 4: "CH44 3199 9123 0008 8901 2".
    ///
    /// For human display only; machine processing always uses the
    /// compact form.
    pub fn grouped(&self) -> String {
        let mut out = String::with_capacity(self.value.len() + self.value.len() / 4);
        for (i, ch) in self.value.chars().enumerate() {
            if i > 0 && i % 4 == 0 {
                out.push(' ');
            }
            out.push(ch);
        }
        out
    }
}

impl std::fmt::Display for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}

impl std::str::FromStr for Account {
    type Err = ZahlteilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Account {
    type Error = ZahlteilError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Account> for String {
    fn from(account: Account) -> Self {
        account.value
    }
}

fn institution_id(value: &str) -> Option<u32> {
    let window = value.get(4..9)?;
    if window.bytes().all(|b| b.is_ascii_digit()) {
        window.parse().ok()
    } else {
        None
    }
}

/// ISO 7064 mod-97 remainder over the rearranged account string.
/// Letters map to 10..=35; the input is already validated alphanumeric.
fn mod97(value: &str) -> u32 {
    let rearranged = value[4..].bytes().chain(value[..4].bytes());
    let mut remainder: u32 = 0;
    for byte in rearranged {
        remainder = if byte.is_ascii_digit() {
            (remainder * 10 + u32::from(byte - b'0')) % 97
        } else {
            (remainder * 100 + u32::from(byte - b'A') + 10) % 97
        };
    }
    remainder
}
