// SPDX-License-Identifier: Apache-2.0

//! Dossier export encodings. JSON keeps the DTO's canonical field order;
//! CSV is a multi-section document with one header line per section and a
//! blank line between sections. PDF is deliberately not implemented.

use crate::dto::Dossier;
use crate::errors::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Pdf,
}

impl ExportFormat {
    pub fn parse(raw: &str) -> Result<Self, ApiError> {
        match raw {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "pdf" => Ok(Self::Pdf),
            _ => Err(ApiError::invalid_input("unknown export format")),
        }
    }

    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Csv => "text/csv",
            Self::Pdf => "application/pdf",
        }
    }
}

pub fn dossier_to_json(dossier: &Dossier) -> Result<String, ApiError> {
    serde_json::to_string_pretty(dossier).map_err(|_| ApiError::internal())
}

/// RFC-4180 style field quoting, applied only when needed.
fn csv_field(raw: &str) -> String {
    if raw.contains(',') || raw.contains('"') || raw.contains('\n') {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}

fn csv_row(out: &mut String, fields: &[&str]) {
    let encoded: Vec<String> = fields.iter().map(|f| csv_field(f)).collect();
    out.push_str(&encoded.join(","));
    out.push('\n');
}

/// Sections in contract order: cadastral, contracts, partners, sanctions,
/// donations, alerts. Each appears exactly once, even when empty.
#[must_use]
pub fn dossier_to_csv(dossier: &Dossier) -> String {
    let mut out = String::new();

    out.push_str("# CADASTRAL\n");
    csv_row(&mut out, &["field", "value"]);
    csv_row(&mut out, &["company_id", &dossier.company_id]);
    csv_row(&mut out, &["legal_name", &dossier.legal_name]);
    csv_row(&mut out, &["status", &dossier.status]);
    csv_row(&mut out, &["opened_on", dossier.opened_on.as_deref().unwrap_or("")]);
    csv_row(&mut out, &["capital", dossier.capital.as_deref().unwrap_or("")]);
    csv_row(
        &mut out,
        &["activity_code", dossier.activity_code.as_deref().unwrap_or("")],
    );
    csv_row(&mut out, &["contracted_total", &dossier.contracted_total]);
    out.push('\n');

    out.push_str("# CONTRACTS\n");
    csv_row(
        &mut out,
        &["org_code", "value", "signed_on", "tender_number", "subject"],
    );
    for c in &dossier.contracts {
        csv_row(
            &mut out,
            &[
                &c.org_code,
                &c.value,
                c.signed_on.as_deref().unwrap_or(""),
                c.tender_number.as_deref().unwrap_or(""),
                c.subject.as_deref().unwrap_or(""),
            ],
        );
    }
    out.push('\n');

    out.push_str("# PARTNERS\n");
    csv_row(
        &mut out,
        &["name", "qualification", "is_public_servant", "employing_body"],
    );
    for p in &dossier.partners {
        csv_row(
            &mut out,
            &[
                &p.name,
                p.qualification.as_deref().unwrap_or(""),
                if p.is_public_servant { "true" } else { "false" },
                p.employing_body.as_deref().unwrap_or(""),
            ],
        );
    }
    out.push('\n');

    out.push_str("# SANCTIONS\n");
    csv_row(
        &mut out,
        &["kind", "sanctioning_body", "starts_on", "ends_on", "active"],
    );
    for s in &dossier.sanctions {
        csv_row(
            &mut out,
            &[
                &s.kind,
                &s.sanctioning_body,
                &s.starts_on,
                s.ends_on.as_deref().unwrap_or(""),
                if s.active { "true" } else { "false" },
            ],
        );
    }
    out.push('\n');

    out.push_str("# DONATIONS\n");
    csv_row(
        &mut out,
        &["candidate", "party", "amount", "election_year", "via_partner"],
    );
    for d in &dossier.donations {
        csv_row(
            &mut out,
            &[
                &d.candidate_name,
                d.candidate_party.as_deref().unwrap_or(""),
                &d.amount,
                &d.election_year.to_string(),
                if d.via_partner { "true" } else { "false" },
            ],
        );
    }
    out.push('\n');

    out.push_str("# ALERTS\n");
    csv_row(&mut out, &["kind", "severity", "description"]);
    for a in &dossier.alerts {
        csv_row(&mut out, &[&a.kind, &a.severity, &a.description]);
    }

    out
}
