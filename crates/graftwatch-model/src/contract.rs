use crate::ids::{GovOrgCode, ParseError, TenderNumber};
use crate::money::Money;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One signed contract between a supplier and a government body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub org_code: GovOrgCode,
    pub value: Money,
    pub subject: Option<String>,
    pub tender_number: Option<TenderNumber>,
    pub signed_on: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
}

impl Contract {
    pub fn new(org_code: GovOrgCode, value: Money) -> Result<Self, ParseError> {
        if value.is_zero() {
            return Err(ParseError::OutOfBounds(
                "contract value must be positive".to_string(),
            ));
        }
        Ok(Self {
            org_code,
            value,
            subject: None,
            tender_number: None,
            signed_on: None,
            valid_until: None,
        })
    }
}
