use graftwatch_api::{
    AlertFeedItem, ContractDto, OrgDashboardDto, Stats, SupplierSummary,
};
use graftwatch_model::{AlertKind, GovOrgCode};
use graftwatch_store::{
    AlertFeedReader, ContractFilter, ContractReader, OrgDashboardReader, StatsReader, StoreError,
    SupplierReader,
};
use std::sync::Arc;

/// Summaries ordered by score descending, total contracted value as the
/// tiebreak. Ordering itself lives in the repository.
pub struct RankingService {
    suppliers: Arc<dyn SupplierReader>,
}

impl RankingService {
    pub fn new(suppliers: Arc<dyn SupplierReader>) -> Self {
        Self { suppliers }
    }

    pub async fn ranking(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SupplierSummary>, StoreError> {
        let rows = self.suppliers.rank_by_score(limit, offset).await?;
        Ok(rows.iter().map(graftwatch_api::supplier_summary).collect())
    }
}

pub struct SearchService {
    suppliers: Arc<dyn SupplierReader>,
}

impl SearchService {
    pub fn new(suppliers: Arc<dyn SupplierReader>) -> Self {
        Self { suppliers }
    }

    pub async fn search(
        &self,
        query: &str,
        limit: i64,
    ) -> Result<Vec<SupplierSummary>, StoreError> {
        let rows = self.suppliers.search_by_name_or_id(query, limit).await?;
        Ok(rows.iter().map(graftwatch_api::supplier_summary).collect())
    }
}

pub struct FeedService {
    feed: Arc<dyn AlertFeedReader>,
}

impl FeedService {
    pub fn new(feed: Arc<dyn AlertFeedReader>) -> Self {
        Self { feed }
    }

    pub async fn feed(&self, limit: i64, offset: i64) -> Result<Vec<AlertFeedItem>, StoreError> {
        let rows = self.feed.alert_feed(limit, offset).await?;
        Ok(rows.iter().map(graftwatch_api::alert_feed_item).collect())
    }

    pub async fn feed_by_kind(
        &self,
        kind: AlertKind,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AlertFeedItem>, StoreError> {
        let rows = self.feed.alert_feed_by_kind(kind, limit, offset).await?;
        Ok(rows.iter().map(graftwatch_api::alert_feed_item).collect())
    }
}

pub struct ContractsService {
    contracts: Arc<dyn ContractReader>,
}

impl ContractsService {
    pub fn new(contracts: Arc<dyn ContractReader>) -> Self {
        Self { contracts }
    }

    pub async fn list(
        &self,
        filter: &ContractFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ContractDto>, StoreError> {
        let rows = self.contracts.contracts(filter, limit, offset).await?;
        Ok(rows.iter().map(graftwatch_api::contract_dto).collect())
    }
}

pub struct StatsService {
    stats: Arc<dyn StatsReader>,
}

impl StatsService {
    pub fn new(stats: Arc<dyn StatsReader>) -> Self {
        Self { stats }
    }

    pub async fn rollup(&self) -> Result<Stats, StoreError> {
        Ok(graftwatch_api::stats(self.stats.stats_rollup().await?))
    }
}

pub struct OrgService {
    orgs: Arc<dyn OrgDashboardReader>,
}

impl OrgService {
    pub fn new(orgs: Arc<dyn OrgDashboardReader>) -> Self {
        Self { orgs }
    }

    pub async fn dashboard(
        &self,
        code: &GovOrgCode,
    ) -> Result<Option<OrgDashboardDto>, StoreError> {
        let dashboard = self.orgs.org_dashboard(code).await?;
        Ok(dashboard.map(graftwatch_api::org_dashboard))
    }
}
