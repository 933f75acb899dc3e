use super::client::ProxmoxClient;
use super::error::Result;
use super::path::ResourcePath;
use reqwest::Response;

impl ProxmoxClient {
    /// Lists storage content with the raw response, so callers can report the status code.
    pub async fn get_storage_content(
        &self,
        node: &str,
        storage: &str,
        content_type: Option<&str>,
    ) -> Result<Response> {
        let path = ResourcePath::storage_content(node, storage);
        match content_type {
            Some(ct) => self.get_raw(&path, &[("content", ct)]).await,
            None => self.get_raw(&path, &[]).await,
        }
    }
}
