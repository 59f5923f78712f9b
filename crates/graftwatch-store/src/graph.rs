//! Bounded two-hop walk over the bipartite supplier/partner graph.
//!
//! The traversal lives in application code rather than a recursive SQL
//! query: level 0 is the seed supplier, level 1 its partners plus every
//! other supplier those partners belong to, level 2 the partners of the
//! level-1 suppliers plus their further suppliers. Nodes dedupe on
//! identity; the walk stops at `max_nodes` and reports whether more
//! candidates existed.
//!
//! Company nodes are identified by company id; person nodes by the keyed
//! person hash. Plain person identifiers never appear here.

use crate::contracts::GraphReader;
use crate::error::StoreError;
use crate::sqlite::SqliteStore;
use async_trait::async_trait;
use graftwatch_model::CompanyId;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use std::collections::{HashMap, HashSet};

pub const DEFAULT_GRAPH_MAX_NODES: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphNodeKind {
    Company,
    Person,
}

impl GraphNodeKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::Person => "person",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    pub id: String,
    pub kind: GraphNodeKind,
    pub label: String,
    pub score: Option<u8>,
    pub alert_count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphProjection {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub truncated: bool,
}

struct SupplierNodeRow {
    pk: i64,
    company_id: String,
    legal_name: String,
    score: i64,
    alert_count: i64,
}

struct PartnerLinkRow {
    partner_pk: i64,
    person_hash: String,
    name: String,
    qualification: Option<String>,
    capital_share: Option<String>,
    fk_supplier: i64,
}

struct SupplierOfPartnerRow {
    supplier: SupplierNodeRow,
    fk_partner: i64,
}

fn seed_supplier(conn: &Connection, id: &CompanyId) -> Result<Option<SupplierNodeRow>, StoreError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT pk_supplier, company_id, legal_name, risk_score, alert_count \
             FROM dim_supplier WHERE company_id = ?1",
        )
        .map_err(|err| StoreError::Prepare(err.to_string()))?;
    let mut rows = stmt.query([id.as_str()])?;
    match rows.next()? {
        Some(row) => Ok(Some(SupplierNodeRow {
            pk: row.get(0)?,
            company_id: row.get(1)?,
            legal_name: row.get(2)?,
            score: row.get::<_, Option<i64>>(3)?.unwrap_or(0),
            alert_count: row.get::<_, Option<i64>>(4)?.unwrap_or(0),
        })),
        None => Ok(None),
    }
}

fn partner_links(
    conn: &Connection,
    supplier_pks: &[i64],
) -> Result<Vec<PartnerLinkRow>, StoreError> {
    if supplier_pks.is_empty() {
        return Ok(Vec::new());
    }
    let placeholders = vec!["?"; supplier_pks.len()].join(",");
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT p.pk_partner, p.person_hash, p.name, b.qualification, b.capital_share, \
             b.fk_supplier \
             FROM dim_partner p \
             JOIN bridge_supplier_partner b ON p.pk_partner = b.fk_partner \
             WHERE b.fk_supplier IN ({placeholders}) \
             ORDER BY p.name ASC, p.pk_partner ASC"
        ))
        .map_err(|err| StoreError::Prepare(err.to_string()))?;
    let params: Vec<Value> = supplier_pks.iter().map(|pk| Value::Integer(*pk)).collect();
    let rows = stmt
        .query_map(params_from_iter(params), |row| {
            Ok(PartnerLinkRow {
                partner_pk: row.get(0)?,
                person_hash: row.get(1)?,
                name: row.get(2)?,
                qualification: row.get(3)?,
                capital_share: row.get(4)?,
                fk_supplier: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn suppliers_of_partners(
    conn: &Connection,
    partner_pks: &[i64],
) -> Result<Vec<SupplierOfPartnerRow>, StoreError> {
    if partner_pks.is_empty() {
        return Ok(Vec::new());
    }
    let placeholders = vec!["?"; partner_pks.len()].join(",");
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT s.pk_supplier, s.company_id, s.legal_name, s.risk_score, s.alert_count, \
             b.fk_partner \
             FROM dim_supplier s \
             JOIN bridge_supplier_partner b ON s.pk_supplier = b.fk_supplier \
             WHERE b.fk_partner IN ({placeholders}) \
             ORDER BY s.company_id ASC, s.pk_supplier ASC"
        ))
        .map_err(|err| StoreError::Prepare(err.to_string()))?;
    let params: Vec<Value> = partner_pks.iter().map(|pk| Value::Integer(*pk)).collect();
    let rows = stmt
        .query_map(params_from_iter(params), |row| {
            Ok(SupplierOfPartnerRow {
                supplier: SupplierNodeRow {
                    pk: row.get(0)?,
                    company_id: row.get(1)?,
                    legal_name: row.get(2)?,
                    score: row.get::<_, Option<i64>>(3)?.unwrap_or(0),
                    alert_count: row.get::<_, Option<i64>>(4)?.unwrap_or(0),
                },
                fk_partner: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

struct Walk {
    nodes: Vec<GraphNode>,
    kept_ids: HashSet<String>,
    truncated: bool,
    max_nodes: usize,
}

impl Walk {
    fn new(max_nodes: usize) -> Self {
        Self {
            nodes: Vec::new(),
            kept_ids: HashSet::new(),
            truncated: false,
            max_nodes,
        }
    }

    /// Returns true when the node is part of the kept set after the call.
    /// Marks the walk truncated when a new distinct node no longer fits.
    fn offer(&mut self, node: GraphNode) -> bool {
        if self.kept_ids.contains(&node.id) {
            return true;
        }
        if self.nodes.len() >= self.max_nodes {
            self.truncated = true;
            return false;
        }
        self.kept_ids.insert(node.id.clone());
        self.nodes.push(node);
        true
    }
}

fn company_node(row: &SupplierNodeRow) -> GraphNode {
    GraphNode {
        id: row.company_id.clone(),
        kind: GraphNodeKind::Company,
        label: row.legal_name.clone(),
        score: u8::try_from(row.score.clamp(0, 100)).ok(),
        alert_count: u32::try_from(row.alert_count.max(0)).ok(),
    }
}

#[async_trait]
impl GraphReader for SqliteStore {
    async fn graph_two_hops(
        &self,
        id: &CompanyId,
        max_nodes: usize,
    ) -> Result<Option<GraphProjection>, StoreError> {
        let conn = self.connection().lock().await;
        let Some(seed) = seed_supplier(&conn, id)? else {
            return Ok(None);
        };

        let mut walk = Walk::new(max_nodes.max(1));
        let mut pk_to_company: HashMap<i64, String> = HashMap::new();
        let mut pk_to_hash: HashMap<i64, String> = HashMap::new();
        let mut seen_suppliers: HashSet<i64> = HashSet::new();
        let mut seen_partners: HashSet<i64> = HashSet::new();
        // (person hash, company id, edge label)
        let mut candidate_edges: Vec<(String, String, Option<String>)> = Vec::new();

        pk_to_company.insert(seed.pk, seed.company_id.clone());
        seen_suppliers.insert(seed.pk);
        walk.offer(company_node(&seed));
        let mut frontier: Vec<i64> = vec![seed.pk];

        for _hop in 0..2 {
            if frontier.is_empty() || walk.truncated {
                break;
            }

            let links = partner_links(&conn, &frontier)?;
            let mut partner_frontier: Vec<i64> = Vec::new();
            for link in &links {
                pk_to_hash
                    .entry(link.partner_pk)
                    .or_insert_with(|| link.person_hash.clone());
                if let Some(company) = pk_to_company.get(&link.fk_supplier) {
                    let label = link
                        .capital_share
                        .clone()
                        .or_else(|| link.qualification.clone());
                    candidate_edges.push((link.person_hash.clone(), company.clone(), label));
                }
                let fresh = seen_partners.insert(link.partner_pk);
                let kept = walk.offer(GraphNode {
                    id: link.person_hash.clone(),
                    kind: GraphNodeKind::Person,
                    label: link.name.clone(),
                    score: None,
                    alert_count: None,
                });
                if fresh && kept {
                    partner_frontier.push(link.partner_pk);
                }
            }

            let mut next_suppliers: Vec<i64> = Vec::new();
            for row in suppliers_of_partners(&conn, &partner_frontier)? {
                let hash = match pk_to_hash.get(&row.fk_partner) {
                    Some(h) => h.clone(),
                    None => continue,
                };
                pk_to_company
                    .entry(row.supplier.pk)
                    .or_insert_with(|| row.supplier.company_id.clone());
                candidate_edges.push((hash, row.supplier.company_id.clone(), None));
                let fresh = seen_suppliers.insert(row.supplier.pk);
                let kept = walk.offer(company_node(&row.supplier));
                if fresh && kept {
                    next_suppliers.push(row.supplier.pk);
                }
            }
            frontier = next_suppliers;
        }

        // Edges are emitted only when both endpoints survived the cap, and
        // only once per (source, target) pair.
        let mut edges: Vec<GraphEdge> = Vec::new();
        let mut seen_pairs: HashSet<(String, String)> = HashSet::new();
        for (source, target, label) in candidate_edges {
            if !walk.kept_ids.contains(&source) || !walk.kept_ids.contains(&target) {
                continue;
            }
            if seen_pairs.insert((source.clone(), target.clone())) {
                edges.push(GraphEdge {
                    source,
                    target,
                    label,
                });
            }
        }

        Ok(Some(GraphProjection {
            nodes: walk.nodes,
            edges,
            truncated: walk.truncated,
        }))
    }
}
