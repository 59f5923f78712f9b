#![forbid(unsafe_code)]
//! Wire contract of the query service: response DTOs, parameter validation,
//! the error taxonomy, and dossier export encoding. No IO here.

mod convert;
mod dto;
mod errors;
mod export;
pub mod params;

pub use convert::{
    alert_feed_item, contract_dto, dossier, graph_view, org_dashboard, stats, supplier_summary,
};
pub use dto::{
    AddressDto, AlertDto, AlertFeedItem, ContractDto, Dossier, DonationDto, GraphEdgeDto,
    GraphNodeDto, GraphView, IndicatorDto, OrgDashboardDto, OrgDto, OrgTopSupplierDto,
    PartnerDto, SanctionDto, ScoreDto, SourceDto, Stats, SupplierSummary, GRAPH_EDGE_KIND,
};
pub use errors::{ApiError, ApiErrorCode};
pub use export::{dossier_to_csv, dossier_to_json, ExportFormat};

pub const CRATE_NAME: &str = "graftwatch-api";
