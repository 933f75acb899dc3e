use super::client::ProxmoxClient;
use super::error::Result;
use super::models::{NodeSummary, VmSummary};
use super::path::ResourcePath;

impl ProxmoxClient {
    pub async fn get_nodes(&self) -> Result<Vec<NodeSummary>> {
        self.get(&ResourcePath::nodes()).await
    }

    pub async fn get_vms(&self, node: &str) -> Result<Vec<VmSummary>> {
        self.get(&ResourcePath::qemu(node)).await
    }
}
