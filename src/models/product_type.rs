use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A family of products the service compares.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    BankAccount,
    CreditCard,
    Mortgage,
}

impl ProductType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::BankAccount => "bankaccount",
            ProductType::CreditCard => "creditcard",
            ProductType::Mortgage => "mortgage",
        }
    }
}

impl std::fmt::Display for ProductType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bankaccount" => Ok(ProductType::BankAccount),
            "creditcard" => Ok(ProductType::CreditCard),
            "mortgage" => Ok(ProductType::Mortgage),
            _ => Err(format!("Invalid ProductType: {}", s)),
        }
    }
}
