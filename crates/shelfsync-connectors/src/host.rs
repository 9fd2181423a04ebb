//! Callbacks into the integration host platform.

use async_trait::async_trait;
use reqwest::Client;
use shelfsync_core::{Error, Result, ShelfsyncConfig};
use tracing::{debug, info};

/// Operations the host exposes to the connector.
#[async_trait]
pub trait HostClient: Send + Sync {
    /// Turn on this integration's connectors for a team.
    async fn enable_connectors(&self, team_id: &str) -> Result<()>;
}

/// Host client speaking the platform's HTTP API.
pub struct HttpHostClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpHostClient {
    pub fn new(client: Client, base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            token,
        }
    }

    pub fn from_config(config: &ShelfsyncConfig) -> Self {
        Self::new(
            Client::new(),
            config.host_api_url.clone(),
            config.host_token.clone(),
        )
    }

    fn enable_url(&self, team_id: &str) -> String {
        format!(
            "{}/api/v1/team/{}/integrations/connectors/enable",
            self.base_url.trim_end_matches('/'),
            team_id
        )
    }
}

#[async_trait]
impl HostClient for HttpHostClient {
    async fn enable_connectors(&self, team_id: &str) -> Result<()> {
        let url = self.enable_url(team_id);
        debug!("Enabling connectors via {}", url);

        let mut request = self.client.post(&url);
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Host(format!("Request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Host(format!(
                "Enable connectors for team {} returned {}: {}",
                team_id, status, body
            )));
        }

        info!("Connectors enabled for team {}", team_id);
        Ok(())
    }
}
