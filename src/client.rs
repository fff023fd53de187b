//! # Discovery Engine client
//!
//! Production [`DocumentLister`]: calls the `documents.list` REST method of a data
//! store's default branch.
//!
//! - Construct with [`DiscoveryEngineClient::new_from_env`], which reads the bearer
//!   token from `DATASTORE_ACCESS_TOKEN`.
//! - Regional data stores are served from `https://<location>-discoveryengine.googleapis.com`;
//!   `api_endpoint` overrides the base URL altogether.
//! - Every failure is mapped onto [`ListError`] and returned as-is; there is no retry.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error, info};

use crate::config::DatastoreConfig;
use crate::contract::{DocumentLister, DocumentPage, ListError, ListRequest};

pub const ACCESS_TOKEN_ENV: &str = "DATASTORE_ACCESS_TOKEN";

pub struct DiscoveryEngineClient {
    http: Client,
    documents_url: String,
    project_id: String,
    access_token: String,
}

impl DiscoveryEngineClient {
    pub fn new(
        datastore: &DatastoreConfig,
        access_token: String,
        api_endpoint: Option<&str>,
    ) -> Self {
        let base = match api_endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => datastore.location.endpoint(),
        };
        let documents_url = format!("{}/v1/{}/documents", base, datastore.branch_path());
        info!(url = %documents_url, "Initialised Discovery Engine client");
        Self {
            http: Client::new(),
            documents_url,
            project_id: datastore.project_id.clone(),
            access_token,
        }
    }

    pub fn new_from_env(
        datastore: &DatastoreConfig,
        api_endpoint: Option<&str>,
    ) -> Result<Self, ListError> {
        match std::env::var(ACCESS_TOKEN_ENV) {
            Ok(token) if !token.trim().is_empty() => {
                Ok(Self::new(datastore, token.trim().to_string(), api_endpoint))
            }
            _ => {
                error!("{ACCESS_TOKEN_ENV} missing in environment");
                Err(ListError::MissingCredentials)
            }
        }
    }

    pub fn documents_url(&self) -> &str {
        &self.documents_url
    }
}

#[async_trait]
impl DocumentLister for DiscoveryEngineClient {
    async fn list_documents(&self, req: ListRequest) -> Result<DocumentPage, ListError> {
        debug!(
            page_size = req.page_size,
            has_token = req.page_token.is_some(),
            "Requesting page of documents"
        );

        let mut query: Vec<(&str, String)> = vec![("pageSize", req.page_size.to_string())];
        if let Some(token) = req.page_token {
            query.push(("pageToken", token));
        }

        let response = self
            .http
            .get(&self.documents_url)
            .bearer_auth(&self.access_token)
            .header("x-goog-user-project", &self.project_id)
            .query(&query)
            .send()
            .await
            .map_err(|e| {
                error!(
                    error = ?e,
                    url = %self.documents_url,
                    "Failed to reach document listing API"
                );
                ListError::Transport(e)
            })?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            error!(
                status = %status,
                url = %self.documents_url,
                "Document listing API returned error. Response body: {body}"
            );
            return Err(ListError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str::<DocumentPage>(&body).map_err(|e| {
            error!(error = ?e, url = %self.documents_url, "Failed to parse document listing JSON");
            ListError::Decode(e.to_string())
        })
    }
}
