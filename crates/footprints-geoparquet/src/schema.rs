//! JSON Schema sources and validation of `geo` metadata.

use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::{GeoParquetError, Result};

/// Somewhere JSON Schema documents can be loaded from, by URL
pub trait SchemaSource {
    fn fetch(&self, url: &str) -> Result<Value>;
}

impl<T: SchemaSource + ?Sized> SchemaSource for &T {
    fn fetch(&self, url: &str) -> Result<Value> {
        (**self).fetch(url)
    }
}

/// Fetches schemas over HTTP with a blocking client.
///
/// Each URL is requested at most once per source; batch stamping reuses the
/// document for every file.
pub struct HttpSchemaSource {
    client: reqwest::blocking::Client,
    cache: RefCell<HashMap<String, Value>>,
}

impl HttpSchemaSource {
    pub fn new() -> Self {
        Self::with_client(reqwest::blocking::Client::new())
    }

    pub fn with_client(client: reqwest::blocking::Client) -> Self {
        Self { client, cache: RefCell::new(HashMap::new()) }
    }

    fn download(&self, url: &str) -> Result<Value> {
        let fetch_error =
            |e: reqwest::Error| GeoParquetError::SchemaFetch { url: url.to_string(), reason: e.to_string() };

        tracing::debug!("Fetching JSON Schema from {}", url);
        self.client
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(fetch_error)?
            .json::<Value>()
            .map_err(fetch_error)
    }
}

impl Default for HttpSchemaSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaSource for HttpSchemaSource {
    fn fetch(&self, url: &str) -> Result<Value> {
        if let Some(schema) = self.cache.borrow().get(url) {
            return Ok(schema.clone());
        }

        let schema = self.download(url)?;
        self.cache.borrow_mut().insert(url.to_string(), schema.clone());
        Ok(schema)
    }
}

/// In-memory schema documents keyed by URL
#[derive(Debug, Clone, Default)]
pub struct StaticSchemaSource {
    documents: HashMap<String, Value>,
}

impl StaticSchemaSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, url: impl Into<String>, schema: Value) -> Self {
        self.documents.insert(url.into(), schema);
        self
    }
}

impl SchemaSource for StaticSchemaSource {
    fn fetch(&self, url: &str) -> Result<Value> {
        self.documents.get(url).cloned().ok_or_else(|| GeoParquetError::SchemaFetch {
            url: url.to_string(),
            reason: "no document registered for this URL".to_string(),
        })
    }
}

/// Validate `instance` against `schema`, collecting every violation
pub fn validate(schema: &Value, instance: &Value) -> Result<()> {
    let validator = jsonschema::validator_for(schema)
        .map_err(|e| GeoParquetError::InvalidSchema(e.to_string()))?;

    let errors: Vec<String> = validator.iter_errors(instance).map(|e| e.to_string()).collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(GeoParquetError::Validation { errors })
    }
}
