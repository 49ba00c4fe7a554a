//! Product prices using decimal arithmetic.
//!
//! The boutique sells in a single currency, so a price is just a
//! non-negative decimal amount with a display rule.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product price in US dollars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Create a price, rejecting negative amounts.
    #[must_use]
    pub fn new(amount: Decimal) -> Option<Self> {
        (!amount.is_sign_negative() || amount.is_zero()).then_some(Self(amount))
    }

    /// Read a price from a feed value (JSON number or numeric string).
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        let amount = match value {
            serde_json::Value::Number(n) => n.to_string().parse::<Decimal>().ok()?,
            serde_json::Value::String(s) => s.trim().parse::<Decimal>().ok()?,
            _ => return None,
        };
        Self::new(amount)
    }

    /// The raw decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Format for display: whole amounts drop the cents (`$120`), anything
    /// else shows two decimal places (`$120.50`).
    #[must_use]
    pub fn display(&self) -> String {
        if self.0.fract().is_zero() {
            format!("${}", self.0.trunc())
        } else {
            format!("${:.2}", self.0)
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}
