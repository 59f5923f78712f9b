use crate::ids::{CompanyId, GovOrgCode, ParseError, PersonHash};
use crate::money::Money;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    pub party: Option<String>,
    pub office: Option<String>,
}

/// Electoral donation tied to a supplier, to one of its partners, or both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Donation {
    pub supplier: Option<CompanyId>,
    pub partner_hash: Option<PersonHash>,
    pub candidate: Candidate,
    pub amount: Money,
    pub election_year: i32,
    pub resource_type: Option<String>,
    /// Awarding body the candidate is cross-referenced to by the pipeline,
    /// when that linkage exists.
    pub linked_org: Option<GovOrgCode>,
}

impl Donation {
    pub fn new(
        supplier: Option<CompanyId>,
        partner_hash: Option<PersonHash>,
        candidate: Candidate,
        amount: Money,
        election_year: i32,
    ) -> Result<Self, ParseError> {
        if supplier.is_none() && partner_hash.is_none() {
            return Err(ParseError::MissingField(
                "donation needs a supplier or partner link".to_string(),
            ));
        }
        Ok(Self {
            supplier,
            partner_hash,
            candidate,
            amount,
            election_year,
            resource_type: None,
            linked_org: None,
        })
    }
}
