use crate::proxmox::error::{ProxmoxError, Result};
use crate::proxmox::models::ApiData;
use crate::proxmox::path::ResourcePath;
use crate::settings::{ConnectionProfile, Credentials};
use log::{debug, info, warn};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

/// How requests are authenticated.
#[derive(Clone)]
enum Session {
    Ticket { ticket: String, csrf_token: String },
    ApiToken(String),
}

#[derive(Clone)]
pub struct ProxmoxClient {
    client: Client,
    base_url: Url,
    session: Option<Session>,
}

#[derive(Deserialize, Debug)]
struct TicketResponse {
    data: Option<TicketData>,
}

#[derive(Deserialize, Debug)]
struct TicketData {
    ticket: String,
    #[serde(rename = "CSRFPreventionToken", default)]
    csrf_token: String,
}

impl ProxmoxClient {
    pub fn new(host: &str, port: u16, verify_ssl: bool) -> Result<Self> {
        let scheme = if host.starts_with("http://") {
            "http"
        } else {
            "https"
        };

        let host_cleaned = if let Some(stripped) = host.strip_prefix("http://") {
            stripped
        } else if let Some(stripped) = host.strip_prefix("https://") {
            stripped
        } else {
            host
        };
        let host_cleaned = host_cleaned.trim_end_matches('/');

        let mut base_url = Url::parse(&format!("{}://{}/", scheme, host_cleaned))?;
        // An explicit port in the host wins over the configured one. `Url`
        // drops a scheme-default port, so look at the text itself.
        if !has_explicit_port(host_cleaned) && base_url.set_port(Some(port)).is_err() {
            return Err(ProxmoxError::Config(format!("Invalid host: {}", host)));
        }
        let base_url = base_url.join("api2/json/")?;

        if !verify_ssl {
            warn!("SSL certificate verification is disabled for {}", host_cleaned);
        }

        let client = Client::builder()
            .danger_accept_invalid_certs(!verify_ssl)
            .cookie_store(true)
            .build()?;

        Ok(Self {
            client,
            base_url,
            session: None,
        })
    }

    /// Builds a client and authenticates it with the profile's credentials.
    pub async fn connect(profile: &ConnectionProfile) -> Result<Self> {
        info!("Connecting to Proxmox at {}", profile.host);
        let mut client = Self::new(&profile.host, profile.port, profile.verify_ssl)?;

        match &profile.credentials {
            Credentials::ApiToken { name, value } => {
                info!("Using API Token authentication");
                client.set_api_token(&profile.user, name, value);
            }
            Credentials::Password(password) => client.login(&profile.user, password).await?,
        }

        Ok(client)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url_for(&self, path: &ResourcePath) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ProxmoxError::Config(format!("Invalid base URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(path.segments());
        Ok(url)
    }

    pub fn set_api_token(&mut self, user: &str, token_name: &str, token_value: &str) {
        self.session = Some(Session::ApiToken(format!(
            "PVEAPIToken={}!{}={}",
            user, token_name, token_value
        )));
    }

    /// Exchanges credentials for a ticket via `POST access/ticket`.
    pub async fn login(&mut self, user: &str, password: &str) -> Result<()> {
        let url = self.url_for(&ResourcePath::ticket())?;
        let params = [("username", user), ("password", password)];

        let resp = self
            .client
            .post(url)
            .form(&params)
            .send()
            .await
            .map_err(|e| ProxmoxError::Auth(format!("Login request failed: {}", e)))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(ProxmoxError::Auth(format!("{} - {}", status, text)));
        }

        let body: TicketResponse = resp
            .json()
            .await
            .map_err(|e| ProxmoxError::Auth(format!("Failed to parse login response: {}", e)))?;
        let data = body
            .data
            .ok_or_else(|| ProxmoxError::Auth("Login response contains no ticket".to_string()))?;

        self.session = Some(Session::Ticket {
            ticket: data.ticket,
            csrf_token: data.csrf_token,
        });

        info!("Successfully logged in as {}", user);
        Ok(())
    }

    /// The session ticket, for callers that must attach it themselves.
    pub fn ticket(&self) -> Result<&str> {
        match &self.session {
            Some(Session::Ticket { ticket, .. }) => Ok(ticket),
            Some(Session::ApiToken(_)) => Err(ProxmoxError::Auth(
                "a ticket session is required, but API token authentication is in use"
                    .to_string(),
            )),
            None => Err(ProxmoxError::Auth("not logged in".to_string())),
        }
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.session {
            Some(Session::ApiToken(token)) => req.header("Authorization", token),
            Some(Session::Ticket { ticket, csrf_token }) => req
                .header("CSRFPreventionToken", csrf_token)
                .header("Cookie", format!("PVEAuthCookie={}", ticket)),
            None => req,
        }
    }

    /// Sends an authenticated GET and hands back the response whatever its status.
    pub async fn get_raw(&self, path: &ResourcePath, query: &[(&str, &str)]) -> Result<Response> {
        let mut url = self.url_for(path)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        debug!("GET {}", url);
        let resp = self.authorize(self.client.get(url)).send().await?;
        Ok(resp)
    }

    /// GETs `path` and deserializes the `data` field of the response.
    pub async fn get<T: DeserializeOwned>(&self, path: &ResourcePath) -> Result<T> {
        let resp = self.get_raw(path, &[]).await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(ProxmoxError::Api(status, text));
        }

        let body = resp.bytes().await?;
        let envelope: ApiData<T> = serde_json::from_slice(&body)?;
        Ok(envelope.data)
    }
}

/// Whether the authority part of `host` carries a `:port`.
fn has_explicit_port(host: &str) -> bool {
    let authority = host.split('/').next().unwrap_or(host);
    // Skip a bracketed IPv6 literal, its colons are not port separators.
    let host_port = match authority.rfind(']') {
        Some(end) => &authority[end + 1..],
        None => authority,
    };
    host_port
        .rsplit_once(':')
        .is_some_and(|(_, port)| !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_defaults() {
        let client = ProxmoxClient::new("pve.local", 8006, true).unwrap();
        assert_eq!(client.base_url().as_str(), "https://pve.local:8006/api2/json/");
    }

    #[test]
    fn test_base_url_keeps_explicit_port() {
        let client = ProxmoxClient::new("http://127.0.0.1:9000/", 8006, false).unwrap();
        assert_eq!(client.base_url().as_str(), "http://127.0.0.1:9000/api2/json/");
    }

    #[test]
    fn test_base_url_keeps_default_scheme_port() {
        let client = ProxmoxClient::new("pve.local:443", 8006, true).unwrap();
        assert_eq!(client.base_url().as_str(), "https://pve.local/api2/json/");

        let client = ProxmoxClient::new("http://pve.local:80", 8006, true).unwrap();
        assert_eq!(client.base_url().as_str(), "http://pve.local/api2/json/");
    }

    #[test]
    fn test_base_url_ipv6() {
        let client = ProxmoxClient::new("[fd00::1]", 8006, true).unwrap();
        assert_eq!(client.base_url().as_str(), "https://[fd00::1]:8006/api2/json/");

        let client = ProxmoxClient::new("[fd00::1]:9000", 8006, true).unwrap();
        assert_eq!(client.base_url().as_str(), "https://[fd00::1]:9000/api2/json/");
    }

    #[test]
    fn test_url_for_encodes_segments() {
        let client = ProxmoxClient::new("pve.local", 8006, true).unwrap();
        let url = client
            .url_for(&ResourcePath::storage_content("pve1", "iso#store?x"))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://pve.local:8006/api2/json/nodes/pve1/storage/iso%23store%3Fx/content"
        );
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_ticket_requires_login() {
        let mut client = ProxmoxClient::new("pve.local", 8006, true).unwrap();
        assert!(matches!(client.ticket(), Err(ProxmoxError::Auth(_))));

        client.set_api_token("root@pam", "cli", "secret");
        assert!(matches!(client.ticket(), Err(ProxmoxError::Auth(_))));
    }
}
