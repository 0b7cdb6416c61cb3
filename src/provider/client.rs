use std::time::Duration;

use reqwest::{Response, StatusCode};
use tokio::time::{sleep, Instant};
use tracing::debug;

use super::error::{ProviderError, ProviderResult};
use super::types::{
    ApiErrorBody, CreateDropletRequest, CreateTagRequest, Droplet, DropletListResponse,
    DropletResponse, SshKey, SshKeyListResponse, TagResource, TagResourcesRequest,
};

const DIGITALOCEAN_API_BASE: &str = "https://api.digitalocean.com/v2";

/// How often `wait_for_active` re-reads the droplet.
const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Client for the DigitalOcean droplet API, authenticated with a Bearer token.
pub struct DropletClient {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl DropletClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            token: token.into(),
            base_url: DIGITALOCEAN_API_BASE.to_string(),
        }
    }

    /// List all droplets on the account, in provider-assigned order.
    pub async fn list_droplets(&self) -> ProviderResult<Vec<Droplet>> {
        let url = format!("{}/droplets?per_page=200", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        let response = check_response(response).await?;

        let listing: DropletListResponse = response.json().await?;
        debug!("Fetched {} droplet(s)", listing.droplets.len());
        Ok(listing.droplets)
    }

    /// Fetch a single droplet by id.
    pub async fn get_droplet(&self, id: u64) -> ProviderResult<Droplet> {
        let url = format!("{}/droplets/{}", self.base_url, id);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        let response = check_response(response).await?;

        let body: DropletResponse = response.json().await?;
        Ok(body.droplet)
    }

    /// Create a droplet. The API answers immediately with the droplet in
    /// status "new"; use `wait_for_active` to block until it is usable.
    pub async fn create_droplet(&self, request: &CreateDropletRequest) -> ProviderResult<Droplet> {
        let url = format!("{}/droplets", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(request)
            .send()
            .await?;
        let response = check_response(response).await?;

        let body: DropletResponse = response.json().await?;
        debug!(id = body.droplet.id, name = %body.droplet.name, "Droplet created");
        Ok(body.droplet)
    }

    /// Delete a droplet by id. The API answers 204 with no body.
    pub async fn delete_droplet(&self, id: u64) -> ProviderResult<()> {
        let url = format!("{}/droplets/{}", self.base_url, id);

        let response = self
            .client
            .delete(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        check_response(response).await?;
        debug!(id, "Droplet deleted");
        Ok(())
    }

    /// List the SSH keys registered on the account.
    pub async fn list_ssh_keys(&self) -> ProviderResult<Vec<SshKey>> {
        let url = format!("{}/account/keys", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        let response = check_response(response).await?;

        let listing: SshKeyListResponse = response.json().await?;
        Ok(listing.ssh_keys)
    }

    /// Create a tag. A 409 means the tag already exists, which is fine for
    /// our only caller (`add_tag` attaches right after).
    pub async fn create_tag(&self, name: &str) -> ProviderResult<()> {
        let url = format!("{}/tags", self.base_url);
        let request = CreateTagRequest {
            name: name.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await?;

        if response.status() == StatusCode::CONFLICT {
            debug!(tag = name, "Tag already exists");
            return Ok(());
        }
        check_response(response).await?;
        Ok(())
    }

    /// Attach an existing tag to a droplet.
    pub async fn tag_droplet(&self, name: &str, droplet_id: u64) -> ProviderResult<()> {
        let url = format!("{}/tags/{}/resources", self.base_url, name);
        let request = TagResourcesRequest {
            resources: vec![TagResource {
                resource_id: droplet_id.to_string(),
                resource_type: "droplet".to_string(),
            }],
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await?;
        check_response(response).await?;
        Ok(())
    }

    /// Poll the droplet until it reports status "active" and has a public
    /// IPv4 address, or the timeout elapses.
    pub async fn wait_for_active(&self, id: u64, timeout: Duration) -> ProviderResult<Droplet> {
        let started = Instant::now();

        loop {
            let droplet = self.get_droplet(id).await?;
            if droplet.status == "active" && droplet.public_ipv4().is_some() {
                return Ok(droplet);
            }

            debug!(
                id,
                status = %droplet.status,
                elapsed_secs = started.elapsed().as_secs(),
                "Droplet not ready yet"
            );

            if started.elapsed() >= timeout {
                return Err(ProviderError::ActivationTimeout {
                    id,
                    timeout_secs: timeout.as_secs(),
                });
            }
            sleep(POLL_INTERVAL).await;
        }
    }
}

/// Turn a non-2xx response into `ProviderError::Api`, extracting the
/// `message` field DigitalOcean puts in its error bodies.
async fn check_response(response: Response) -> ProviderResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.bytes().await.unwrap_or_default();
    Err(api_error(status, &body))
}

fn api_error(status: StatusCode, body: &[u8]) -> ProviderError {
    let message = serde_json::from_slice::<ApiErrorBody>(body)
        .ok()
        .filter(|b| !b.message.is_empty())
        .map(|b| b.message)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());

    ProviderError::Api {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_uses_body_message() {
        let body = br#"{"id": "unauthorized", "message": "Unable to authenticate you"}"#;
        let err = api_error(StatusCode::UNAUTHORIZED, body);

        match err {
            ProviderError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Unable to authenticate you");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_api_error_falls_back_to_status_reason() {
        let err = api_error(StatusCode::SERVICE_UNAVAILABLE, b"<html>oops</html>");

        match err {
            ProviderError::Api { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "Service Unavailable");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
