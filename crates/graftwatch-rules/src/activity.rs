//! Curated activity-code classification shared by both rule dimensions.
//!
//! The table covers the activity codes that dominate government procurement.
//! It is maintained by hand; an unknown code simply classifies as `None` and
//! every predicate built on top of it degrades to inactive.

use graftwatch_model::ActivityCode;
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityCategory {
    Technology,
    Construction,
    RetailCommerce,
    Health,
    Food,
    Cleaning,
    Security,
    Consulting,
    Education,
}

impl ActivityCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Technology => "TECHNOLOGY",
            Self::Construction => "CONSTRUCTION",
            Self::RetailCommerce => "RETAIL_COMMERCE",
            Self::Health => "HEALTH",
            Self::Food => "FOOD",
            Self::Cleaning => "CLEANING",
            Self::Security => "SECURITY",
            Self::Consulting => "CONSULTING",
            Self::Education => "EDUCATION",
        }
    }

    /// Service activities tolerate lower declared capital than trading or
    /// construction businesses.
    #[must_use]
    pub const fn is_service(self) -> bool {
        !matches!(self, Self::RetailCommerce | Self::Construction)
    }
}

const CATEGORY_TABLE: &[(&str, ActivityCategory)] = &[
    ("6201-5", ActivityCategory::Technology),
    ("6202-3", ActivityCategory::Technology),
    ("6203-1", ActivityCategory::Technology),
    ("6204-0", ActivityCategory::Technology),
    ("6209-1", ActivityCategory::Technology),
    ("6311-9", ActivityCategory::Technology),
    ("6319-4", ActivityCategory::Technology),
    ("6399-2", ActivityCategory::Technology),
    ("4110-7", ActivityCategory::Construction),
    ("4120-4", ActivityCategory::Construction),
    ("4211-1", ActivityCategory::Construction),
    ("4212-0", ActivityCategory::Construction),
    ("4213-8", ActivityCategory::Construction),
    ("4221-9", ActivityCategory::Construction),
    ("4222-7", ActivityCategory::Construction),
    ("4291-0", ActivityCategory::Construction),
    ("4292-8", ActivityCategory::Construction),
    ("4299-5", ActivityCategory::Construction),
    ("4711-3", ActivityCategory::RetailCommerce),
    ("4712-1", ActivityCategory::RetailCommerce),
    ("4713-0", ActivityCategory::RetailCommerce),
    ("4721-1", ActivityCategory::RetailCommerce),
    ("4722-9", ActivityCategory::RetailCommerce),
    ("4731-8", ActivityCategory::RetailCommerce),
    ("4741-5", ActivityCategory::RetailCommerce),
    ("4742-3", ActivityCategory::RetailCommerce),
    ("4744-0", ActivityCategory::RetailCommerce),
    ("8610-1", ActivityCategory::Health),
    ("8621-6", ActivityCategory::Health),
    ("8622-4", ActivityCategory::Health),
    ("8630-5", ActivityCategory::Health),
    ("8640-2", ActivityCategory::Health),
    ("8650-0", ActivityCategory::Health),
    ("8660-7", ActivityCategory::Health),
    ("4771-7", ActivityCategory::Health),
    ("4773-3", ActivityCategory::Health),
    ("5611-2", ActivityCategory::Food),
    ("5612-1", ActivityCategory::Food),
    ("5620-1", ActivityCategory::Food),
    ("8121-4", ActivityCategory::Cleaning),
    ("8122-2", ActivityCategory::Cleaning),
    ("8129-0", ActivityCategory::Cleaning),
    ("8011-1", ActivityCategory::Security),
    ("8012-0", ActivityCategory::Security),
    ("7020-4", ActivityCategory::Consulting),
    ("7490-1", ActivityCategory::Consulting),
    ("6920-6", ActivityCategory::Consulting),
    ("8511-2", ActivityCategory::Education),
    ("8512-1", ActivityCategory::Education),
    ("8513-9", ActivityCategory::Education),
    ("8520-1", ActivityCategory::Education),
];

/// Pairs of categories that cannot plausibly serve each other's contracts.
const INCOMPATIBLE: &[(ActivityCategory, ActivityCategory)] = &[
    (ActivityCategory::Technology, ActivityCategory::Construction),
    (ActivityCategory::Technology, ActivityCategory::Health),
    (ActivityCategory::Technology, ActivityCategory::Food),
    (ActivityCategory::Technology, ActivityCategory::Cleaning),
    (ActivityCategory::RetailCommerce, ActivityCategory::Technology),
    (ActivityCategory::RetailCommerce, ActivityCategory::Construction),
    (ActivityCategory::RetailCommerce, ActivityCategory::Health),
    (ActivityCategory::RetailCommerce, ActivityCategory::Security),
    (ActivityCategory::Construction, ActivityCategory::Technology),
    (ActivityCategory::Construction, ActivityCategory::Health),
    (ActivityCategory::Construction, ActivityCategory::Food),
    (ActivityCategory::Construction, ActivityCategory::Security),
    (ActivityCategory::Food, ActivityCategory::Technology),
    (ActivityCategory::Food, ActivityCategory::Construction),
    (ActivityCategory::Food, ActivityCategory::Security),
    (ActivityCategory::Cleaning, ActivityCategory::Technology),
    (ActivityCategory::Cleaning, ActivityCategory::Construction),
    (ActivityCategory::Cleaning, ActivityCategory::Health),
    (ActivityCategory::Security, ActivityCategory::Technology),
    (ActivityCategory::Security, ActivityCategory::Construction),
    (ActivityCategory::Security, ActivityCategory::Health),
    (ActivityCategory::Security, ActivityCategory::Food),
    (ActivityCategory::Consulting, ActivityCategory::Construction),
    (ActivityCategory::Consulting, ActivityCategory::Health),
    (ActivityCategory::Consulting, ActivityCategory::Food),
    (ActivityCategory::Consulting, ActivityCategory::Cleaning),
    (ActivityCategory::Education, ActivityCategory::Construction),
    (ActivityCategory::Education, ActivityCategory::Health),
    (ActivityCategory::Education, ActivityCategory::Cleaning),
    (ActivityCategory::Education, ActivityCategory::Security),
    (ActivityCategory::Health, ActivityCategory::Construction),
    (ActivityCategory::Health, ActivityCategory::Food),
    (ActivityCategory::Health, ActivityCategory::Cleaning),
    (ActivityCategory::Health, ActivityCategory::Security),
];

/// Normalise a bare 7-digit subclass code into the hyphenated `NNNN-D`
/// class prefix the table is keyed on, keeping the subclass tail.
fn normalize_code(raw: &str) -> String {
    let stripped: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if stripped.contains('-') {
        return stripped;
    }
    if stripped.len() == 7 && stripped.bytes().all(|b| b.is_ascii_digit()) {
        return format!("{}-{}{}", &stripped[..4], &stripped[4..5], &stripped[5..]);
    }
    stripped
}

#[must_use]
pub fn category_of(code: &ActivityCode) -> Option<ActivityCategory> {
    let normalized = normalize_code(code.as_str());
    // Match on the leading `NNNN-D` group; the table keys carry only that
    // much precision.
    CATEGORY_TABLE
        .iter()
        .find(|(key, _)| normalized.starts_with(key))
        .map(|(_, category)| *category)
}

#[must_use]
pub fn incompatible(declared: ActivityCategory, subject: ActivityCategory) -> bool {
    declared != subject
        && INCOMPATIBLE
            .iter()
            .any(|&(a, b)| a == declared && b == subject)
}

const SUBJECT_KEYWORDS: &[(ActivityCategory, &[&str])] = &[
    (
        ActivityCategory::Technology,
        &["software", "information system", "network infrastructure", "data center", "computer"],
    ),
    (
        ActivityCategory::Construction,
        &["construction", "roadworks", "paving", "renovation", "civil engineering", "building works"],
    ),
    (
        ActivityCategory::Health,
        &["medicine", "hospital", "medical", "pharmaceutical", "laboratory"],
    ),
    (ActivityCategory::Food, &["meal", "food supply", "school lunch", "catering"]),
    (ActivityCategory::Cleaning, &["cleaning", "janitorial", "sanitation services"]),
    (
        ActivityCategory::Security,
        &["surveillance", "security guard", "electronic monitoring"],
    ),
    (ActivityCategory::Consulting, &["consulting", "advisory", "audit"]),
    (ActivityCategory::Education, &["training", "teaching", "course delivery"]),
];

/// Infer the category of a contract from its subject text. Keyword match on
/// the lowercased subject; first hit wins.
#[must_use]
pub fn infer_subject_category(subject: &str) -> Option<ActivityCategory> {
    let lower = subject.to_lowercase();
    for (category, keywords) in SUBJECT_KEYWORDS {
        if keywords.iter().any(|kw| lower.contains(kw)) {
            return Some(*category);
        }
    }
    None
}

/// Per-sector minimum plausible declared capital. Below this, with material
/// contracts, the low-capital signal activates.
#[must_use]
pub fn sector_capital_floor(category: Option<ActivityCategory>) -> Decimal {
    match category {
        Some(c) if !c.is_service() => Decimal::from(25_000),
        _ => Decimal::from(10_000),
    }
}
