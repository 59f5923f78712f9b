use graftwatch_api::GraphView;
use graftwatch_model::CompanyId;
use graftwatch_store::{GraphReader, StoreError};
use std::sync::Arc;

pub struct GraphService {
    graph: Arc<dyn GraphReader>,
    max_nodes: usize,
}

impl GraphService {
    pub fn new(graph: Arc<dyn GraphReader>, max_nodes: usize) -> Self {
        Self { graph, max_nodes }
    }

    pub async fn fetch(&self, id: &CompanyId) -> Result<Option<GraphView>, StoreError> {
        let projection = self.graph.graph_two_hops(id, self.max_nodes).await?;
        Ok(projection.map(graftwatch_api::graph_view))
    }
}
