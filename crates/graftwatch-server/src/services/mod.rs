//! Application services: thin orchestrators over the repository
//! capabilities and the pure rule engine. No business rules live here.

mod dossier;
mod graph;
mod listing;

pub use dossier::DossierService;
pub use graph::GraphService;
pub use listing::{ContractsService, FeedService, OrgService, RankingService, SearchService, StatsService};
