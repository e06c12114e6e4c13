//! Product catalog collaborator.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use common::Sku;
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Collaborator, IntegrationError};

/// A product as reported by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub sku: Sku,
    pub name: String,
    pub unit_price: Decimal,
    /// Inactive products resolve successfully; rejecting them is the
    /// caller's decision.
    #[serde(default)]
    pub is_active: bool,
}

/// Resolves a SKU to its authoritative name, price, and active flag.
///
/// One fresh lookup per line item per request; nothing is cached across
/// requests, so the staleness window is a single order creation.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn product_by_sku(&self, sku: &Sku) -> Result<Product, IntegrationError>;
}

/// HTTP client for the catalog service.
#[derive(Debug, Clone)]
pub struct HttpProductCatalog {
    client: reqwest::Client,
    base_url: String,
}

impl HttpProductCatalog {
    /// Creates a catalog client with a bounded per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl ProductCatalog for HttpProductCatalog {
    #[tracing::instrument(skip(self), fields(sku = %sku))]
    async fn product_by_sku(&self, sku: &Sku) -> Result<Product, IntegrationError> {
        let url = format!("{}/products/{}", self.base_url, sku);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| IntegrationError::from_request_error(Collaborator::Catalog, e))?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(IntegrationError::ProductNotFound { sku: sku.clone() }),
            status if status.is_success() => {
                response
                    .json::<Product>()
                    .await
                    .map_err(|e| IntegrationError::Unavailable {
                        collaborator: Collaborator::Catalog,
                        reason: format!("invalid response body: {e}"),
                    })
            }
            status => Err(IntegrationError::Unavailable {
                collaborator: Collaborator::Catalog,
                reason: format!("returned status {status}"),
            }),
        }
    }
}

#[derive(Debug, Default)]
struct InMemoryCatalogState {
    products: HashMap<String, Product>,
    unavailable: bool,
}

/// In-memory catalog for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProductCatalog {
    state: Arc<RwLock<InMemoryCatalogState>>,
}

impl InMemoryProductCatalog {
    /// Creates an empty in-memory catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a product.
    pub fn insert(&self, product: Product) {
        self.state
            .write()
            .unwrap()
            .products
            .insert(product.sku.as_str().to_string(), product);
    }

    /// Simulates the catalog being unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.write().unwrap().unavailable = unavailable;
    }
}

#[async_trait]
impl ProductCatalog for InMemoryProductCatalog {
    async fn product_by_sku(&self, sku: &Sku) -> Result<Product, IntegrationError> {
        let state = self.state.read().unwrap();

        if state.unavailable {
            return Err(IntegrationError::Unavailable {
                collaborator: Collaborator::Catalog,
                reason: "cannot connect".to_string(),
            });
        }

        state
            .products
            .get(sku.as_str())
            .cloned()
            .ok_or_else(|| IntegrationError::ProductNotFound { sku: sku.clone() })
    }
}
