use super::client::ProxmoxClient;
use super::error::Result;
use super::models::NetworkInterface;
use super::path::ResourcePath;

impl ProxmoxClient {
    // --- Network Management ---

    pub async fn get_network_interfaces(&self, node: &str) -> Result<Vec<NetworkInterface>> {
        self.get(&ResourcePath::network(node)).await
    }
}
