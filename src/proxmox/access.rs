use super::client::ProxmoxClient;
use super::error::Result;
use super::models::UserRecord;
use super::path::ResourcePath;

impl ProxmoxClient {
    pub async fn get_users(&self) -> Result<Vec<UserRecord>> {
        self.get(&ResourcePath::users()).await
    }
}
