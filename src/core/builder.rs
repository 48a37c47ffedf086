use rust_decimal::Decimal;

use super::types::{Address, LineItem};

/// Builder for [`Address`].
///
/// ```
/// use zahlteil::core::AddressBuilder;
///
/// let creditor = AddressBuilder::new("Muster & Söhne AG", "8001", "Zürich", "CH")
///     .street("Bahnhofstrasse")
///     .house_number("7")
///     .build();
/// assert_eq!(creditor.country, "CH");
/// ```
pub struct AddressBuilder {
    name: String,
    street: Option<String>,
    house_number: Option<String>,
    postal_code: String,
    city: String,
    country: String,
}

impl AddressBuilder {
    pub fn new(
        name: impl Into<String>,
        postal_code: impl Into<String>,
        city: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            street: None,
            house_number: None,
            postal_code: postal_code.into(),
            city: city.into(),
            country: country.into(),
        }
    }

    pub fn street(mut self, street: impl Into<String>) -> Self {
        self.street = Some(street.into());
        self
    }

    pub fn house_number(mut self, number: impl Into<String>) -> Self {
        self.house_number = Some(number.into());
        self
    }

    pub fn build(self) -> Address {
        Address {
            name: self.name,
            street: self.street,
            house_number: self.house_number,
            postal_code: self.postal_code,
            city: self.city,
            country: self.country,
        }
    }
}

/// Builder for [`LineItem`].
pub struct LineItemBuilder {
    description: String,
    quantity: Decimal,
    unit_price: Decimal,
    discount_percent: Option<Decimal>,
    tax_rate: Option<Decimal>,
}

impl LineItemBuilder {
    pub fn new(description: impl Into<String>, quantity: Decimal, unit_price: Decimal) -> Self {
        Self {
            description: description.into(),
            quantity,
            unit_price,
            discount_percent: None,
            tax_rate: None,
        }
    }

    /// Per-line discount in percent (0–100).
    pub fn discount_percent(mut self, percent: Decimal) -> Self {
        self.discount_percent = Some(percent);
        self
    }

    /// VAT rate in percent; lines without one inherit the configured
    /// default rate.
    pub fn tax_rate(mut self, rate: Decimal) -> Self {
        self.tax_rate = Some(rate);
        self
    }

    pub fn build(self) -> LineItem {
        LineItem {
            description: self.description,
            quantity: self.quantity,
            unit_price: self.unit_price,
            discount_percent: self.discount_percent,
            tax_rate: self.tax_rate,
        }
    }
}
