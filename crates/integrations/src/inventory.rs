//! Stock/inventory collaborator.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use common::Sku;
use serde::{Deserialize, Serialize};

use crate::error::{Collaborator, IntegrationError};

/// Stock available at one distribution center.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CenterStock {
    pub distribution_center_code: String,
    /// Stock available for sale. Can go negative when reservations
    /// outrun physical stock.
    #[serde(default)]
    pub quantity_available: i64,
}

/// Stock levels for one SKU across distribution centers.
#[derive(Debug, Clone, Default, Deserialize)]
struct StockLevels {
    #[serde(default)]
    total_available: i64,
    #[serde(default)]
    distribution_centers: Vec<CenterStock>,
}

/// Outcome of a stock check: the selected center and the confirmation
/// recorded on the line item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockReservation {
    pub distribution_center_code: String,
    pub confirmed: bool,
}

/// Checks availability and selects a fulfilling distribution center.
///
/// This call records intent only; durably decrementing stock is owned by
/// the inventory collaborator downstream.
#[async_trait]
pub trait StockInventory: Send + Sync {
    async fn reserve(
        &self,
        sku: &Sku,
        quantity: u32,
        preferred_center: Option<&str>,
    ) -> Result<StockReservation, IntegrationError>;
}

/// Picks the distribution center to fulfill a request.
///
/// The preferred center wins when it has sufficient stock; otherwise the
/// center with the largest surplus (available − requested) is chosen,
/// with ties broken by center code ascending so the outcome is
/// deterministic.
fn select_center<'a>(
    centers: &'a [CenterStock],
    quantity: u32,
    preferred_center: Option<&str>,
) -> Option<&'a CenterStock> {
    let needed = i64::from(quantity);

    if let Some(preferred) = preferred_center
        && let Some(center) = centers
            .iter()
            .find(|c| c.distribution_center_code == preferred && c.quantity_available >= needed)
    {
        return Some(center);
    }

    centers
        .iter()
        .filter(|c| c.quantity_available >= needed)
        .max_by(|a, b| {
            (a.quantity_available - needed)
                .cmp(&(b.quantity_available - needed))
                .then_with(|| b.distribution_center_code.cmp(&a.distribution_center_code))
        })
}

fn reservation_from_levels(
    sku: &Sku,
    quantity: u32,
    preferred_center: Option<&str>,
    levels: StockLevels,
) -> Result<StockReservation, IntegrationError> {
    match select_center(&levels.distribution_centers, quantity, preferred_center) {
        Some(center) => Ok(StockReservation {
            distribution_center_code: center.distribution_center_code.clone(),
            confirmed: true,
        }),
        None => Err(IntegrationError::InsufficientStock {
            sku: sku.clone(),
            requested: quantity,
            available: levels.total_available,
            centers: levels.distribution_centers,
        }),
    }
}

/// HTTP client for the inventory service.
#[derive(Debug, Clone)]
pub struct HttpStockInventory {
    client: reqwest::Client,
    base_url: String,
}

impl HttpStockInventory {
    /// Creates an inventory client with a bounded per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl StockInventory for HttpStockInventory {
    #[tracing::instrument(skip(self), fields(sku = %sku, quantity))]
    async fn reserve(
        &self,
        sku: &Sku,
        quantity: u32,
        preferred_center: Option<&str>,
    ) -> Result<StockReservation, IntegrationError> {
        // Levels are always fetched for every center; preference is
        // applied locally so a preferred center without stock can still
        // fall back to another one.
        let url = format!("{}/inventory/stock-levels", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("product_sku", sku.as_str())])
            .send()
            .await
            .map_err(|e| IntegrationError::from_request_error(Collaborator::Inventory, e))?;

        if !response.status().is_success() {
            return Err(IntegrationError::Unavailable {
                collaborator: Collaborator::Inventory,
                reason: format!("returned status {}", response.status()),
            });
        }

        let levels =
            response
                .json::<StockLevels>()
                .await
                .map_err(|e| IntegrationError::Unavailable {
                    collaborator: Collaborator::Inventory,
                    reason: format!("invalid response body: {e}"),
                })?;

        reservation_from_levels(sku, quantity, preferred_center, levels)
    }
}

#[derive(Debug, Default)]
struct InMemoryInventoryState {
    stock: HashMap<String, Vec<CenterStock>>,
    unavailable: bool,
}

/// In-memory inventory for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStockInventory {
    state: Arc<RwLock<InMemoryInventoryState>>,
}

impl InMemoryStockInventory {
    /// Creates an empty in-memory inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the stock of a SKU at one distribution center.
    pub fn set_stock(&self, sku: &str, center_code: &str, quantity_available: i64) {
        let mut state = self.state.write().unwrap();
        let centers = state.stock.entry(sku.to_string()).or_default();
        match centers
            .iter_mut()
            .find(|c| c.distribution_center_code == center_code)
        {
            Some(center) => center.quantity_available = quantity_available,
            None => centers.push(CenterStock {
                distribution_center_code: center_code.to_string(),
                quantity_available,
            }),
        }
    }

    /// Simulates the inventory service being unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.write().unwrap().unavailable = unavailable;
    }
}

#[async_trait]
impl StockInventory for InMemoryStockInventory {
    async fn reserve(
        &self,
        sku: &Sku,
        quantity: u32,
        preferred_center: Option<&str>,
    ) -> Result<StockReservation, IntegrationError> {
        let state = self.state.read().unwrap();

        if state.unavailable {
            return Err(IntegrationError::Unavailable {
                collaborator: Collaborator::Inventory,
                reason: "cannot connect".to_string(),
            });
        }

        let centers = state.stock.get(sku.as_str()).cloned().unwrap_or_default();
        let levels = StockLevels {
            total_available: centers.iter().map(|c| c.quantity_available).sum(),
            distribution_centers: centers,
        };

        reservation_from_levels(sku, quantity, preferred_center, levels)
    }
}
