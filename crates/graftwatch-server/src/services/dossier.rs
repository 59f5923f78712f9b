use chrono::Utc;
use graftwatch_api::Dossier;
use graftwatch_model::CompanyId;
use graftwatch_rules::{
    compute_cumulative_score, detect_critical_alerts, AlertContext, RelatedSupplier, ScoreContext,
    StrawmanConfig,
};
use graftwatch_store::{
    ContractReader, DonationReader, PartnerReader, RelatedViewReader, SanctionReader, StoreError,
    SupplierReader,
};
use std::sync::Arc;

/// Assembles the complete dossier: fetch through the repositories, evaluate
/// both rule dimensions on the in-memory data, project to the wire shape.
pub struct DossierService {
    suppliers: Arc<dyn SupplierReader>,
    partners: Arc<dyn PartnerReader>,
    sanctions: Arc<dyn SanctionReader>,
    contracts: Arc<dyn ContractReader>,
    donations: Arc<dyn DonationReader>,
    related: Arc<dyn RelatedViewReader>,
    disclaimer: String,
    strawman: StrawmanConfig,
}

impl DossierService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        suppliers: Arc<dyn SupplierReader>,
        partners: Arc<dyn PartnerReader>,
        sanctions: Arc<dyn SanctionReader>,
        contracts: Arc<dyn ContractReader>,
        donations: Arc<dyn DonationReader>,
        related: Arc<dyn RelatedViewReader>,
        disclaimer: String,
        strawman: StrawmanConfig,
    ) -> Self {
        Self {
            suppliers,
            partners,
            sanctions,
            contracts,
            donations,
            related,
            disclaimer,
            strawman,
        }
    }

    pub async fn fetch(&self, id: &CompanyId) -> Result<Option<Dossier>, StoreError> {
        let Some(supplier) = self.suppliers.supplier_by_id(id).await? else {
            return Ok(None);
        };
        let links = self.partners.partners_of(id).await?;
        let sanctions = self.sanctions.sanctions_for(id).await?;
        let contracts = self.contracts.contracts_of(id).await?;
        let donations = self.donations.donations_for(id).await?;
        let related: Vec<RelatedSupplier> = self
            .related
            .related_suppliers(id)
            .await?
            .into_iter()
            .map(|row| RelatedSupplier {
                company_id: row.company_id,
                partner_hashes: row.partner_hashes,
                tender_numbers: row.tender_numbers,
            })
            .collect();

        let now = Utc::now();
        let reference = now.date_naive();
        let alerts = detect_critical_alerts(
            &supplier,
            &AlertContext {
                links: &links,
                contracts: &contracts,
                sanctions: &sanctions,
                donations: &donations,
                related: Some(&related),
                reference,
                detected_at: now,
                strawman: self.strawman.clone(),
            },
        );
        let score = compute_cumulative_score(
            &supplier,
            &ScoreContext {
                links: &links,
                contracts: &contracts,
                sanctions: &sanctions,
                reference,
                computed_at: now,
            },
        );

        Ok(Some(graftwatch_api::dossier(
            &supplier,
            &links,
            &sanctions,
            &contracts,
            &donations,
            &alerts,
            &score,
            reference,
            &self.disclaimer,
        )))
    }
}
