//! API client for the manager backend
//!
//! Only the tree and viewer widgets talk to the manager; the page controller
//! and form renderer never issue requests of their own.

use crate::types::*;
use gloo_net::http::{Request, Response};

const API_BASE: &str = "/api/manager";

/// Fetch every asset visible to the console
pub async fn list_assets() -> Result<Vec<Asset>, String> {
    let url = format!("{}/assets", API_BASE);
    fetch_json::<Vec<Asset>>(&url).await
}

/// Fetch a single asset by id
pub async fn get_asset(id: &str) -> Result<Asset, String> {
    let url = format!("{}/assets/{}", API_BASE, urlencoding::encode(id));
    fetch_json::<Asset>(&url).await
}

/// Create a new asset; the manager assigns the id
pub async fn create_asset(asset: &Asset) -> Result<Asset, String> {
    let url = format!("{}/assets", API_BASE);
    let response = Request::post(&url)
        .json(asset)
        .map_err(|e| format!("Failed to serialize body: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;
    parse_response::<Asset>(response).await
}

/// Update an existing asset
pub async fn update_asset(id: &str, asset: &Asset) -> Result<Asset, String> {
    let url = format!("{}/assets/{}", API_BASE, urlencoding::encode(id));
    let response = Request::put(&url)
        .json(asset)
        .map_err(|e| format!("Failed to serialize body: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;
    parse_response::<Asset>(response).await
}

/// Fetch the agent and asset type catalogs
pub async fn list_asset_types() -> Result<TypeCatalog, String> {
    let url = format!("{}/asset-types", API_BASE);
    fetch_json::<TypeCatalog>(&url).await
}

// ============================================================================
// Helper functions
// ============================================================================

async fn fetch_json<T: serde::de::DeserializeOwned>(url: &str) -> Result<T, String> {
    let response = Request::get(url)
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;
    parse_response::<T>(response).await
}

async fn parse_response<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, String> {
    let api_response: ApiResponse<T> = response
        .json()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))?;

    if api_response.success {
        api_response
            .data
            .ok_or_else(|| "No data in response".to_string())
    } else {
        Err(api_response
            .error
            .unwrap_or_else(|| "Unknown error".to_string()))
    }
}
