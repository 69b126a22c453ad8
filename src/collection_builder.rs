use crate::body_generator::BodyGenerator;
use crate::error::Result;
use crate::extractor::{ApiGroup, Endpoint, ParamAnnotation, Parameter};
use log::debug;
use serde::{Deserialize, Serialize};

/// Postman Collection Format v2.1.0 schema URL
pub const POSTMAN_SCHEMA_URL: &str =
    "https://schema.getpostman.com/json/collection/v2.1.0/collection.json";

/// Collection variable every request URL is rooted at
pub const BASE_URL_VARIABLE: &str = "{{base_url}}";

/// Default collection name
pub const DEFAULT_COLLECTION_NAME: &str = "Spring API Collection";

/// Default collection description
pub const DEFAULT_COLLECTION_DESCRIPTION: &str = "Generated from Java Controllers";

/// Postman collection builder
pub struct CollectionBuilder {
    info: Info,
    folders: Vec<Folder>,
}

/// Complete Postman collection document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostmanCollection {
    pub info: Info,
    /// One folder per API
    pub item: Vec<Folder>,
}

/// Collection info block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    pub name: String,
    pub description: String,
    /// Schema URL identifying the collection format version
    pub schema: String,
}

/// A folder of requests, one per API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub name: String,
    pub item: Vec<Item>,
}

/// A single saved request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub request: Request,
    /// Saved example responses (always empty)
    pub response: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub method: String,
    pub header: Vec<KeyValue>,
    pub url: Url,
    pub body: Body,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Url {
    /// Full URL, e.g. `{{base_url}}/users/{id}`
    pub raw: String,
    pub host: Vec<String>,
    /// Path segments without leading or trailing slashes
    pub path: Vec<String>,
    pub query: Vec<KeyValue>,
    pub variable: Vec<KeyValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub mode: String,
    pub raw: String,
}

/// Key/value entry used for headers, query parameters and path variables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
    /// The declared Java type of the bound parameter
    pub description: String,
}

impl KeyValue {
    fn from_parameter(parameter: &Parameter) -> Self {
        Self {
            key: parameter.name.clone(),
            value: String::new(),
            description: parameter.declared_type.clone(),
        }
    }
}

impl CollectionBuilder {
    /// Create a new CollectionBuilder with default info
    pub fn new() -> Self {
        debug!("Initializing CollectionBuilder");
        Self {
            info: Info {
                name: DEFAULT_COLLECTION_NAME.to_string(),
                description: DEFAULT_COLLECTION_DESCRIPTION.to_string(),
                schema: POSTMAN_SCHEMA_URL.to_string(),
            },
            folders: Vec::new(),
        }
    }

    /// Set a custom collection name and description
    pub fn with_info(mut self, name: String, description: String) -> Self {
        self.info.name = name;
        self.info.description = description;
        self
    }

    /// Add one API group as a folder
    pub fn add_group(&mut self, group: &ApiGroup, body_gen: &BodyGenerator) -> Result<()> {
        debug!("Adding folder {} with {} endpoints", group.name, group.endpoints.len());

        let item = group
            .endpoints
            .iter()
            .map(|endpoint| Self::build_item(endpoint, body_gen))
            .collect::<Result<Vec<Item>>>()?;

        self.folders.push(Folder {
            name: group.name.clone(),
            item,
        });
        Ok(())
    }

    /// Build the final collection
    pub fn build(self) -> PostmanCollection {
        PostmanCollection {
            info: self.info,
            item: self.folders,
        }
    }

    fn build_item(endpoint: &Endpoint, body_gen: &BodyGenerator) -> Result<Item> {
        debug!("Adding request: {} {}", endpoint.method, endpoint.path);

        let mut request = Request {
            method: endpoint.method.as_str().to_string(),
            header: Vec::new(),
            url: Url {
                raw: format!("{}{}", BASE_URL_VARIABLE, endpoint.path),
                host: vec![BASE_URL_VARIABLE.to_string()],
                path: Self::path_segments(&endpoint.path),
                query: Vec::new(),
                variable: Vec::new(),
            },
            body: Body {
                mode: "raw".to_string(),
                raw: String::new(),
            },
        };

        for parameter in &endpoint.parameters {
            if parameter.has(ParamAnnotation::PathVariable) {
                request.url.variable.push(KeyValue::from_parameter(parameter));
            } else if parameter.has(ParamAnnotation::RequestParam) {
                request.url.query.push(KeyValue::from_parameter(parameter));
            } else if parameter.has(ParamAnnotation::RequestHeader) {
                request.header.push(KeyValue::from_parameter(parameter));
            } else if parameter.has(ParamAnnotation::RequestBody) {
                request.body.raw = body_gen.render_body(&parameter.declared_type)?;
            }
        }

        let name = endpoint
            .description
            .clone()
            .unwrap_or_else(|| endpoint.path.clone());

        Ok(Item {
            name,
            request,
            response: Vec::new(),
        })
    }

    /// `/users/{id}/` -> `["users", "{id}"]`
    fn path_segments(path: &str) -> Vec<String> {
        path.trim_matches('/').split('/').map(str::to_string).collect()
    }
}

impl Default for CollectionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
