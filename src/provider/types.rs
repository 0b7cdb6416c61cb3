use serde::{Deserialize, Serialize};

/// A droplet as returned by the DigitalOcean v2 API. Only the fields the
/// console displays or acts on are modeled; everything else is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Droplet {
    pub id: u64,
    pub name: String,
    pub status: String,
    pub created_at: String,
    pub memory: u64,
    pub vcpus: u64,
    pub disk: u64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub networks: Networks,
    pub region: Region,
    #[serde(default)]
    pub size_slug: String,
}

impl Droplet {
    /// The droplet's public IPv4 address, if one has been assigned yet.
    /// Droplets in status "new" typically have no public network for a while.
    pub fn public_ipv4(&self) -> Option<&str> {
        self.networks
            .v4
            .iter()
            .find(|n| n.kind == "public")
            .map(|n| n.ip_address.as_str())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Networks {
    #[serde(default)]
    pub v4: Vec<NetworkV4>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NetworkV4 {
    pub ip_address: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Region {
    pub slug: String,
    #[serde(default)]
    pub name: String,
}

/// An SSH key registered on the DigitalOcean account.
#[derive(Debug, Clone, Deserialize)]
pub struct SshKey {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub fingerprint: String,
}

/// Request body for `POST /v2/droplets`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateDropletRequest {
    pub name: String,
    pub region: String,
    pub size: String,
    pub image: String,
    pub ssh_keys: Vec<u64>,
    pub backups: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

// Response envelopes. The API wraps every payload in a named object.

#[derive(Debug, Deserialize)]
pub(crate) struct DropletListResponse {
    pub droplets: Vec<Droplet>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DropletResponse {
    pub droplet: Droplet,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SshKeyListResponse {
    pub ssh_keys: Vec<SshKey>,
}

/// Error body the API returns on non-2xx responses.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
}

/// Request body for `POST /v2/tags`.
#[derive(Debug, Serialize)]
pub(crate) struct CreateTagRequest {
    pub name: String,
}

/// Request body for `POST /v2/tags/{name}/resources`.
#[derive(Debug, Serialize)]
pub(crate) struct TagResourcesRequest {
    pub resources: Vec<TagResource>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TagResource {
    pub resource_id: String,
    pub resource_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const DROPLET_JSON: &str = r#"{
        "id": 3164444,
        "name": "example.com",
        "memory": 1024,
        "vcpus": 1,
        "disk": 25,
        "locked": false,
        "status": "active",
        "created_at": "2020-07-21T18:37:44Z",
        "features": ["backups", "ipv6"],
        "networks": {
            "v4": [
                {
                    "ip_address": "10.128.192.124",
                    "netmask": "255.255.0.0",
                    "gateway": "",
                    "type": "private"
                },
                {
                    "ip_address": "104.236.32.182",
                    "netmask": "255.255.192.0",
                    "gateway": "104.236.0.1",
                    "type": "public"
                }
            ],
            "v6": []
        },
        "region": {
            "name": "New York 3",
            "slug": "nyc3",
            "features": ["backups"],
            "available": true
        },
        "tags": ["web"],
        "size_slug": "s-1vcpu-1gb"
    }"#;

    #[test]
    fn test_droplet_deserialization() {
        let droplet: Droplet = serde_json::from_str(DROPLET_JSON).unwrap();

        assert_eq!(droplet.id, 3164444);
        assert_eq!(droplet.name, "example.com");
        assert_eq!(droplet.status, "active");
        assert_eq!(droplet.region.slug, "nyc3");
        assert_eq!(droplet.tags, vec!["web"]);
        assert_eq!(droplet.size_slug, "s-1vcpu-1gb");
    }

    #[test]
    fn test_public_ipv4_skips_private_networks() {
        let droplet: Droplet = serde_json::from_str(DROPLET_JSON).unwrap();
        assert_eq!(droplet.public_ipv4(), Some("104.236.32.182"));
    }

    #[test]
    fn test_public_ipv4_absent_on_fresh_droplet() {
        let json = r#"{
            "id": 1,
            "name": "fresh",
            "memory": 1024,
            "vcpus": 1,
            "disk": 25,
            "status": "new",
            "created_at": "2020-07-21T18:37:44Z",
            "region": {"slug": "nyc1"}
        }"#;
        let droplet: Droplet = serde_json::from_str(json).unwrap();

        assert_eq!(droplet.status, "new");
        assert_eq!(droplet.public_ipv4(), None);
        assert!(droplet.tags.is_empty());
    }

    #[test]
    fn test_create_request_omits_empty_tags() {
        let request = CreateDropletRequest {
            name: "worker-1".to_string(),
            region: "nyc1".to_string(),
            size: "s-1vcpu-1gb".to_string(),
            image: "ubuntu-20-04-x64".to_string(),
            ssh_keys: vec![512190],
            backups: false,
            tags: Vec::new(),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["name"], "worker-1");
        assert_eq!(json["ssh_keys"][0], 512190);
        assert!(json.get("tags").is_none());
    }
}
