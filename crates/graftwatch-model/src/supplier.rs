use crate::ids::{ActivityCode, CompanyId};
use crate::money::Money;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Registry status of a supplier as published by the company registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CadastralStatus {
    Active,
    Suspended,
    Inapt,
    Closed,
}

impl CadastralStatus {
    pub fn parse(raw: &str) -> Result<Self, crate::ParseError> {
        match raw {
            "ACTIVE" => Ok(Self::Active),
            "SUSPENDED" => Ok(Self::Suspended),
            "INAPT" => Ok(Self::Inapt),
            "CLOSED" => Ok(Self::Closed),
            other => Err(crate::ParseError::InvalidId(format!(
                "unknown cadastral status: {other}"
            ))),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Suspended => "SUSPENDED",
            Self::Inapt => "INAPT",
            Self::Closed => "CLOSED",
        }
    }
}

/// Address without the complement field. Street carries the number; the
/// shared-address signal is computed by the pipeline on street + number only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

/// Aggregate root. Assembled lazily from the analytical store; alerts and
/// score are derived by the rule engine, never edited here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub company_id: CompanyId,
    pub legal_name: String,
    pub status: CadastralStatus,
    pub opened_on: Option<NaiveDate>,
    pub capital: Option<Money>,
    pub activity_code: Option<ActivityCode>,
    pub activity_desc: Option<String>,
    pub address: Option<Address>,
    /// How many other suppliers share this supplier's street + number.
    pub shared_address_count: u32,
    /// Registered employee head count; `None` when the labor source lacks
    /// the company.
    pub employee_count: Option<u32>,
    pub contract_count: u64,
    pub contracted_total: Money,
}

impl Supplier {
    pub fn new(
        company_id: CompanyId,
        legal_name: impl Into<String>,
        status: CadastralStatus,
    ) -> Result<Self, crate::ParseError> {
        let legal_name = legal_name.into();
        if legal_name.trim().is_empty() {
            return Err(crate::ParseError::MissingField("legal_name".to_string()));
        }
        Ok(Self {
            company_id,
            legal_name,
            status,
            opened_on: None,
            capital: None,
            activity_code: None,
            activity_desc: None,
            address: None,
            shared_address_count: 0,
            employee_count: None,
            contract_count: 0,
            contracted_total: Money::zero(),
        })
    }
}
