//! [`ApimClient`]: `PolicyAccessor` over the Azure Resource Manager REST API

use async_trait::async_trait;
use policy_core::{PolicyAccessor, RemoteFault, WriteAck};
use reqwest::header::{ACCEPT, ETAG};
use reqwest::{Method, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::config::ApimConfig;
use crate::{Error, Result};

/// One page of an ARM collection response
#[derive(Debug, Deserialize)]
struct Page {
    #[serde(default)]
    value: Vec<Resource>,
    #[serde(rename = "nextLink")]
    next_link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Resource {
    name: Option<String>,
}

/// Talks to a single API Management service.
///
/// Listings follow `nextLink` paging and collect resource names. Policy
/// writes are unconditional `PUT`s of raw XML; the response `ETag` header is
/// reported as the resource version token.
pub struct ApimClient {
    http: reqwest::Client,
    config: ApimConfig,
    service_url: String,
}

impl ApimClient {
    pub fn new(config: ApimConfig) -> Result<Self> {
        config.validate()?;
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        let service_url = config.service_url();
        Ok(Self {
            http,
            config,
            service_url,
        })
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .bearer_auth(&self.config.access_token)
            .header(ACCEPT, "application/json")
    }

    /// Request against a path below the service resource
    fn service_request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.service_url, path);
        self.request(method, &url)
            .query(&[("api-version", self.config.api_version.as_str())])
    }

    /// Collect resource names from every page of a collection
    async fn list_names(&self, path: &str) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut response = self.service_request(Method::GET, path).send().await?;

        loop {
            let page: Page = success(response).await?.json().await?;
            names.extend(page.value.into_iter().filter_map(|r| r.name));

            match page.next_link.filter(|link| !link.is_empty()) {
                Some(link) => {
                    tracing::debug!("Following nextLink {}", link);
                    response = self.request(Method::GET, &link).send().await?;
                }
                None => break,
            }
        }

        Ok(names)
    }

    async fn put_policy(&self, path: &str, content: &str) -> std::result::Result<WriteAck, RemoteFault> {
        let body = json!({
            "properties": {
                "format": "rawxml",
                "value": content,
            }
        });

        let response = self
            .service_request(Method::PUT, path)
            .json(&body)
            .send()
            .await
            .map_err(|e| RemoteFault::new(e.to_string()))?;

        let status = response.status();
        let etag = response
            .headers()
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if status.is_success() {
            return Ok(WriteAck { etag });
        }

        let text = response.text().await.unwrap_or_default();
        let body = serde_json::from_str::<Value>(&text).ok();
        Err(RemoteFault::new(format!("HTTP {}", status.as_u16())).with_response(status.as_u16(), body))
    }
}

async fn success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(Error::Status {
            status: status.as_u16(),
            url: response.url().to_string(),
        })
    }
}

#[async_trait]
impl PolicyAccessor for ApimClient {
    async fn test_connection(&self) -> bool {
        let checked = match self.service_request(Method::GET, "").send().await {
            Ok(response) => success(response).await.map(|_| ()),
            Err(e) => Err(e.into()),
        };
        match checked {
            Ok(()) => {
                tracing::info!("Connected to API Management service {}", self.config.service_name);
                true
            }
            Err(e) => {
                tracing::error!("Connection check failed: {}", e);
                false
            }
        }
    }

    async fn list_apis(&self) -> Vec<String> {
        self.list_names("/apis").await.unwrap_or_else(|e| {
            tracing::warn!("Failed to list APIs: {}", e);
            Vec::new()
        })
    }

    async fn list_operations(&self, api_id: &str) -> Vec<String> {
        self.list_names(&format!("/apis/{}/operations", api_id))
            .await
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to list operations for {}: {}", api_id, e);
                Vec::new()
            })
    }

    async fn update_api_policy(&self, api_id: &str, content: &str) -> std::result::Result<WriteAck, RemoteFault> {
        self.put_policy(&format!("/apis/{}/policies/policy", api_id), content)
            .await
    }

    async fn update_operation_policy(
        &self,
        api_id: &str,
        operation_id: &str,
        content: &str,
    ) -> std::result::Result<WriteAck, RemoteFault> {
        self.put_policy(
            &format!("/apis/{}/operations/{}/policies/policy", api_id, operation_id),
            content,
        )
        .await
    }
}
