//! Value objects owned by the products bounded context.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use rightsflow_core::{DomainError, DomainResult, ValueObject};

/// Display name of a product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductName(String);

impl ProductName {
    pub const MIN_LENGTH: usize = 5;
    pub const MAX_LENGTH: usize = 50;

    pub fn parse(raw: &str) -> DomainResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid(
                "product.name.empty",
                "product name must not be empty",
            ));
        }

        let len = trimmed.chars().count();
        if len < Self::MIN_LENGTH || len > Self::MAX_LENGTH {
            return Err(DomainError::invalid(
                "product.name.length",
                format!(
                    "product name must be between {} and {} characters, got {len}",
                    Self::MIN_LENGTH,
                    Self::MAX_LENGTH
                ),
            ));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for ProductName {}

impl core::fmt::Display for ProductName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Free-form description of a product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Description(String);

impl Description {
    pub const MIN_LENGTH: usize = 10;
    pub const MAX_LENGTH: usize = 200;

    pub fn parse(raw: &str) -> DomainResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid(
                "product.description.empty",
                "description must not be empty",
            ));
        }

        let len = trimmed.chars().count();
        if len < Self::MIN_LENGTH || len > Self::MAX_LENGTH {
            return Err(DomainError::invalid(
                "product.description.length",
                format!(
                    "description must be between {} and {} characters, got {len}",
                    Self::MIN_LENGTH,
                    Self::MAX_LENGTH
                ),
            ));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for Description {}

/// Currency a price is denominated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    Euro,
    Dollar,
    BritishPound,
    Yen,
    BrazilianReal,
}

/// An amount of money in a given currency. Amounts are never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    amount: Decimal,
    currency: Currency,
}

impl Price {
    pub fn new(amount: Decimal, currency: Currency) -> DomainResult<Self> {
        if amount < Decimal::ZERO {
            return Err(DomainError::invalid(
                "product.price.negative",
                format!("price amount must not be negative, got {amount}"),
            ));
        }
        Ok(Self { amount, currency })
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }
}

impl ValueObject for Price {}
