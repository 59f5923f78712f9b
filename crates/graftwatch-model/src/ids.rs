use serde::{Deserialize, Serialize};
use std::fmt;

pub const GOV_ORG_CODE_MAX_LEN: usize = 32;
pub const ACTIVITY_CODE_MAX_LEN: usize = 16;
pub const TENDER_NUMBER_MAX_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ParseError {
    #[error("invalid identifier: {0}")]
    InvalidId(String),
    #[error("value out of bounds: {0}")]
    OutOfBounds(String),
    #[error("missing required field: {0}")]
    MissingField(String),
}

/// Strip the punctuation callers are allowed to include in identifiers.
/// Only `.`, `/` and `-` are removed; anything else stays and fails the
/// digit check downstream.
#[must_use]
pub fn strip_id_punctuation(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '.' | '/' | '-'))
        .collect()
}

/// 14-digit national company identifier, validated by the published
/// two-check-digit weighted-modulo algorithm. Stored unformatted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyId(String);

impl CompanyId {
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let digits = strip_id_punctuation(raw);
        if digits.len() != 14 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseError::InvalidId(format!(
                "company id must be 14 digits, got {} characters",
                digits.len()
            )));
        }
        let d: Vec<u32> = digits.bytes().map(|b| u32::from(b - b'0')).collect();
        if d.iter().all(|&x| x == d[0]) {
            return Err(ParseError::InvalidId(
                "company id with all digits equal".to_string(),
            ));
        }
        if !company_check_digits_ok(&d) {
            return Err(ParseError::InvalidId(
                "company id check digits do not match".to_string(),
            ));
        }
        Ok(Self(digits))
    }

    /// Canonical 14-digit form, no punctuation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last four digits, the only form allowed in logs besides the full id.
    #[must_use]
    pub fn last_four(&self) -> &str {
        &self.0[10..]
    }
}

impl fmt::Display for CompanyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn company_check_digits_ok(d: &[u32]) -> bool {
    const W1: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
    const W2: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
    let rem = (0..12).map(|i| d[i] * W1[i]).sum::<u32>() % 11;
    let d13 = if rem < 2 { 0 } else { 11 - rem };
    if d[12] != d13 {
        return false;
    }
    let rem = (0..13).map(|i| d[i] * W2[i]).sum::<u32>() % 11;
    let d14 = if rem < 2 { 0 } else { 11 - rem };
    d[13] == d14
}

/// 11-digit national person identifier. Appears only transiently during
/// request handling; every persisted or transported form is [`PersonHash`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PersonId(String);

impl PersonId {
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let digits = strip_id_punctuation(raw);
        if digits.len() != 11 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseError::InvalidId(format!(
                "person id must be 11 digits, got {} characters",
                digits.len()
            )));
        }
        let d: Vec<u32> = digits.bytes().map(|b| u32::from(b - b'0')).collect();
        if d.iter().all(|&x| x == d[0]) {
            return Err(ParseError::InvalidId(
                "person id with all digits equal".to_string(),
            ));
        }
        if !person_check_digits_ok(&d) {
            return Err(ParseError::InvalidId(
                "person id check digits do not match".to_string(),
            ));
        }
        Ok(Self(digits))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn person_check_digits_ok(d: &[u32]) -> bool {
    let rem = (0..9).map(|i| d[i] * (10 - i as u32)).sum::<u32>() % 11;
    let d10 = if rem < 2 { 0 } else { 11 - rem };
    if d[9] != d10 {
        return false;
    }
    let rem = (0..10).map(|i| d[i] * (11 - i as u32)).sum::<u32>() % 11;
    let d11 = if rem < 2 { 0 } else { 11 - rem };
    d[10] == d11
}

/// Keyed hash of a person identifier as produced by the pipeline:
/// 64 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonHash(String);

impl PersonHash {
    /// HMAC-SHA256 over the canonical digits, hex-encoded. Must stay in
    /// lockstep with the pipeline's hashing of `dim_partner.person_hash`;
    /// the key lives only in environment configuration.
    #[must_use]
    pub fn derive(id: &PersonId, key: &[u8]) -> Self {
        use hmac::{Hmac, Mac};
        let mut mac = <Hmac<sha2::Sha256> as Mac>::new_from_slice(key)
            .expect("HMAC accepts keys of any length");
        mac.update(id.as_str().as_bytes());
        Self(hex::encode(mac.finalize().into_bytes()))
    }

    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        if raw.len() != 64 || !raw.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase())
        {
            return Err(ParseError::InvalidId(
                "person hash must be 64 lowercase hex characters".to_string(),
            ));
        }
        Ok(Self(raw.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

macro_rules! opaque_code {
    ($(#[$doc:meta])* $name:ident, $label:literal, $max:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn parse(raw: &str) -> Result<Self, ParseError> {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Err(ParseError::InvalidId(concat!($label, " must not be empty").to_string()));
                }
                if trimmed.len() > $max {
                    return Err(ParseError::InvalidId(format!(
                        concat!($label, " exceeds max length {}"),
                        $max
                    )));
                }
                Ok(Self(trimmed.to_string()))
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

opaque_code!(
    /// Government-body code as published by the procurement registry.
    GovOrgCode,
    "org code",
    GOV_ORG_CODE_MAX_LEN
);
opaque_code!(
    /// Primary economic-activity code of a supplier.
    ActivityCode,
    "activity code",
    ACTIVITY_CODE_MAX_LEN
);
opaque_code!(
    /// Procurement event number a contract was awarded under.
    TenderNumber,
    "tender number",
    TENDER_NUMBER_MAX_LEN
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn company_id_accepts_valid_and_strips_punctuation() {
        let id = CompanyId::parse("11.144.477/7000-61").expect("valid company id");
        assert_eq!(id.as_str(), "11144477700061");
        assert_eq!(id.last_four(), "0061");
        let canonical = CompanyId::parse(id.as_str()).expect("canonical round trip");
        assert_eq!(canonical, id);
    }

    #[test]
    fn company_id_rejects_bad_checksum_length_and_repeats() {
        assert!(CompanyId::parse("11144477700062").is_err());
        assert!(CompanyId::parse("1114447770006").is_err());
        assert!(CompanyId::parse("11111111111111").is_err());
        assert!(CompanyId::parse("1114447770006a").is_err());
    }

    #[test]
    fn person_id_checksum() {
        assert!(PersonId::parse("123.456.789-09").is_ok());
        assert!(PersonId::parse("12345678908").is_err());
        assert!(PersonId::parse("00000000000").is_err());
    }

    #[test]
    fn person_hash_shape() {
        let h = "a".repeat(64);
        assert!(PersonHash::parse(&h).is_ok());
        assert!(PersonHash::parse("A".repeat(64).as_str()).is_err());
        assert!(PersonHash::parse("abc").is_err());
    }

    #[test]
    fn derived_hash_is_deterministic_and_well_formed() {
        let id = PersonId::parse("12345678909").expect("person id");
        let a = PersonHash::derive(&id, b"secret-key");
        let b = PersonHash::derive(&id, b"secret-key");
        assert_eq!(a, b);
        assert!(PersonHash::parse(a.as_str()).is_ok());
        let other = PersonHash::derive(&id, b"another-key");
        assert_ne!(a, other);
    }

    #[test]
    fn opaque_codes_are_trimmed_and_bounded() {
        assert_eq!(GovOrgCode::parse(" 26000 ").expect("code").as_str(), "26000");
        assert!(GovOrgCode::parse("").is_err());
        assert!(TenderNumber::parse(&"x".repeat(TENDER_NUMBER_MAX_LEN + 1)).is_err());
    }
}
