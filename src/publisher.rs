use crate::serializer::read_collection;
use anyhow::Result;
use log::{error, info};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::path::Path;

/// Postman API base URL
pub const POSTMAN_API_URL: &str = "https://api.getpostman.com";

/// Header carrying the Postman API key
const API_KEY_HEADER: &str = "X-Api-Key";

/// Uploads generated collections to the Postman API.
///
/// A publish is a single PUT that replaces the remote collection. Failures are reported
/// through [`PublishOutcome`] and never retried.
pub struct PostmanPublisher {
    client: Client,
    base_url: String,
    api_key: String,
}

/// Result of a publish attempt.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The API answered 200 OK
    Updated,
    /// The API answered with another status
    Rejected { status: u16, body: String },
    /// The request could not be sent or its response not read
    Failed(String),
}

impl PublishOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PublishOutcome::Updated)
    }
}

impl std::fmt::Display for PublishOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            PublishOutcome::Updated => write!(f, "updated"),
            PublishOutcome::Rejected { status, .. } => {
                write!(f, "rejected with status {}", status)
            }
            PublishOutcome::Failed(message) => write!(f, "failed: {}", message),
        }
    }
}

impl PostmanPublisher {
    /// Create a publisher for the public Postman API
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url: POSTMAN_API_URL.to_string(),
            api_key,
        }
    }

    /// Point the publisher at another API host
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// URL of the collection resource
    pub fn collection_url(&self, collection_uid: &str) -> String {
        format!("{}/collections/{}", self.base_url.trim_end_matches('/'), collection_uid)
    }

    /// Loads a generated collection file and publishes it.
    ///
    /// # Errors
    ///
    /// Returns an error only if the file cannot be read; remote failures are reported
    /// through the returned outcome.
    pub fn publish_file(&self, path: &Path, collection_uid: &str) -> Result<PublishOutcome> {
        let collection = read_collection(path)?;
        Ok(self.publish(&collection, collection_uid))
    }

    /// Replaces the remote collection with `collection`
    pub fn publish(&self, collection: &Value, collection_uid: &str) -> PublishOutcome {
        let url = self.collection_url(collection_uid);
        info!("Updating Postman collection {}", collection_uid);

        let payload = json!({ "collection": collection });
        let response = self
            .client
            .put(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&payload)
            .send();

        let outcome = match response {
            Ok(response) if response.status() == StatusCode::OK => PublishOutcome::Updated,
            Ok(response) => {
                let status = response.status().as_u16();
                let body = response.text().unwrap_or_default();
                PublishOutcome::Rejected { status, body }
            }
            Err(e) => PublishOutcome::Failed(e.to_string()),
        };

        match &outcome {
            PublishOutcome::Updated => info!("Success updating Postman collection"),
            PublishOutcome::Rejected { status, body } => {
                error!("Error updating Postman collection: {}", status);
                error!("{}", body);
            }
            PublishOutcome::Failed(message) => {
                error!("Error updating Postman collection: {}", message)
            }
        }

        outcome
    }
}
