use chrono::{Datelike, NaiveDate};

use super::error::ZahlteilError;

/// Gapless document number sequence.
///
/// Generates document numbers in the format `{prefix}{year}-{sequential}`,
/// e.g. "RE-2026-001", "RE-2026-002". Swiss bookkeeping practice (GeBüV)
/// expects document numbers to be sequential without gaps; this struct
/// tracks the last issued number and ensures none are skipped.
///
/// The digits of a generated number are exactly what
/// [`QrReference::from_document_id`](crate::qr::QrReference::from_document_id)
/// normalizes into a QR reference, so a sequence is the natural upstream
/// of the reference generator.
#[derive(Debug, Clone)]
pub struct DocumentNumberSequence {
    prefix: String,
    year: i32,
    next_number: u64,
    zero_pad: usize,
}

impl DocumentNumberSequence {
    /// Create a new sequence starting at 1.
    pub fn new(prefix: impl Into<String>, year: i32) -> Self {
        Self {
            prefix: prefix.into(),
            year,
            next_number: 1,
            zero_pad: 3,
        }
    }

    /// Create a sequence continuing from a given number.
    pub fn starting_at(prefix: impl Into<String>, year: i32, next_number: u64) -> Self {
        Self {
            prefix: prefix.into(),
            year,
            next_number,
            zero_pad: 3,
        }
    }

    /// Set zero-padding width (default: 3, so "001").
    pub fn with_padding(mut self, width: usize) -> Self {
        self.zero_pad = width;
        self
    }

    /// Issue the next document number.
    pub fn next_number(&mut self) -> String {
        let num = self.next_number;
        self.next_number += 1;
        format!(
            "{}{}-{:0>width$}",
            self.prefix,
            self.year,
            num,
            width = self.zero_pad
        )
    }

    /// Preview the next number without consuming it.
    pub fn peek(&self) -> String {
        format!(
            "{}{}-{:0>width$}",
            self.prefix,
            self.year,
            self.next_number,
            width = self.zero_pad
        )
    }

    /// Current year of the sequence.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Advance to a new year, resetting the counter to 1.
    pub fn advance_year(&mut self, new_year: i32) -> Result<(), ZahlteilError> {
        if new_year <= self.year {
            return Err(ZahlteilError::Numbering(format!(
                "new year {new_year} must be greater than current year {}",
                self.year
            )));
        }
        self.year = new_year;
        self.next_number = 1;
        Ok(())
    }

    /// Auto-advance the year if the given date is in a later one.
    /// Returns true if the year was advanced.
    pub fn auto_advance(&mut self, date: NaiveDate) -> bool {
        if date.year() > self.year {
            self.year = date.year();
            self.next_number = 1;
            true
        } else {
            false
        }
    }
}
