use serde::{Deserialize, Serialize};

/// An interest or charge rate, in percent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Rate {
    pub value: f64,
    pub description: String,
}

impl Rate {
    pub fn new(value: f64, description: impl Into<String>) -> Self {
        Self {
            value,
            description: description.into(),
        }
    }
}

/// A rate that applies for a number of months, such as an introductory offer.
///
/// The rate fields sit at the top level of the JSON object next to `period`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RatePeriod {
    #[serde(flatten)]
    pub rate: Rate,
    pub period: Months,
}

impl RatePeriod {
    pub fn new(value: f64, description: impl Into<String>, period: Months) -> Self {
        Self {
            rate: Rate::new(value, description),
            period,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Months {
    pub value: i64,
    pub description: String,
}

impl Months {
    pub fn new(value: i64, description: impl Into<String>) -> Self {
        Self {
            value,
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Years {
    pub value: i64,
    pub description: String,
}

impl Years {
    pub fn new(value: i64, description: impl Into<String>) -> Self {
        Self {
            value,
            description: description.into(),
        }
    }
}

/// An amount in whole currency units.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Money {
    pub currency: String,
    pub amount: i64,
    pub description: String,
}

impl Money {
    pub fn new(currency: impl Into<String>, amount: i64, description: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
            amount,
            description: description.into(),
        }
    }
}

/// A product fee: either a fixed amount or a percentage of the amount
/// borrowed. Only one of the two is set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Fee {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed: Option<Money>,
    #[serde(skip_serializing_if = "is_zero")]
    pub variable: f64,
    pub description: String,
}

fn is_zero(v: &f64) -> bool {
    *v == 0.0
}

impl Fee {
    pub fn fixed(money: Money, description: impl Into<String>) -> Self {
        Self {
            fixed: Some(money),
            variable: 0.0,
            description: description.into(),
        }
    }

    pub fn variable(percent: f64, description: impl Into<String>) -> Self {
        Self {
            fixed: None,
            variable: percent,
            description: description.into(),
        }
    }

    /// What the fee costs on a loan of `loan_amount`, in whole units.
    ///
    /// A fixed fee costs its amount regardless of the loan. A variable fee
    /// costs its percentage of the loan, rounded up.
    pub fn cost(&self, loan_amount: i64) -> i64 {
        match &self.fixed {
            Some(money) => money.amount,
            None => ((loan_amount as f64 / 100.0) * self.variable).ceil() as i64,
        }
    }
}
