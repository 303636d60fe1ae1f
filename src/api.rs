//! # Recipe API
//!
//! The remote recipe service is an opaque collaborator with two JSON
//! endpoints:
//!
//! - `GET {api_url}/search?q={query}` returns `{"recipes": [...]}`
//! - `GET {api_url}/get?rId={id}` returns `{"recipe": {...}}`
//!
//! Any transport failure, non-success status, or body that isn't the
//! expected JSON is a
//! [`Network`](Error::Network) error, except a 404 (or an `error` body) on
//! the recipe endpoint, which is [`NotFound`](Error::NotFound). A search
//! with no hits is an empty list, not an error.

use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{RecipeDocument, RecipeResponse, RecipeSummary, SearchResponse};

/// Remote lookups the app needs.
///
/// Futures are not required to be `Send`; in the browser everything runs
/// on the one event-loop thread.
#[allow(async_fn_in_trait)]
pub trait RecipeApi {
    async fn search(&self, query: &str) -> Result<Vec<RecipeSummary>>;
    async fn recipe(&self, id: &str) -> Result<RecipeDocument>;
}

/// HTTP client for the forkify recipe API
#[derive(Debug, Clone)]
pub struct ForkifyApi {
    client: Client,
    base_url: String,
}

impl ForkifyApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        ForkifyApi {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl RecipeApi for ForkifyApi {
    async fn search(&self, query: &str) -> Result<Vec<RecipeSummary>> {
        let url = format!("{}/search", self.base_url);
        debug!("GET {url} q={query}");

        let resp = self.client.get(&url).query(&[("q", query)]).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        search_outcome(status, &body)
    }

    async fn recipe(&self, id: &str) -> Result<RecipeDocument> {
        let url = format!("{}/get", self.base_url);
        debug!("GET {url} rId={id}");

        let resp = self.client.get(&url).query(&[("rId", id)]).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        recipe_outcome(id, status, &body)
    }
}

/// Map a search response to results
pub fn search_outcome(status: StatusCode, body: &str) -> Result<Vec<RecipeSummary>> {
    // the service answers unknown queries with 404 rather than an empty list
    if status == StatusCode::NOT_FOUND {
        return Ok(Vec::new());
    }
    if !status.is_success() {
        return Err(Error::Network(format!("search answered {status}")));
    }
    let body: SearchResponse = decode(body)?;

    Ok(body.recipes.into_iter().map(RecipeSummary::from).collect())
}

/// Map a recipe response to a document
pub fn recipe_outcome(id: &str, status: StatusCode, body: &str) -> Result<RecipeDocument> {
    if status == StatusCode::NOT_FOUND {
        return Err(Error::NotFound(id.to_string()));
    }
    if !status.is_success() {
        return Err(Error::Network(format!("recipe {id} answered {status}")));
    }
    let body: RecipeResponse = decode(body)?;

    match body.recipe {
        Some(doc) => Ok(doc),
        None => {
            debug!("Recipe {id} missing: {:?}", body.error);
            Err(Error::NotFound(id.to_string()))
        }
    }
}

/// A body that isn't the expected JSON counts as a failed fetch
fn decode<T: serde::de::DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| Error::Network(format!("malformed response: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let api = ForkifyApi::new("https://example.com/api/");
        assert_eq!(api.base_url(), "https://example.com/api");
    }

    #[test]
    fn test_search_body_maps_to_summaries() {
        let body = r#"{"count":1,"recipes":[{"publisher":"Closet Cooking","title":"Pizza Dip","source_url":"http://x","recipe_id":"35477","image_url":"http://x/p.jpg","social_rank":99.9}]}"#;
        let parsed: SearchResponse = serde_json::from_str(body).unwrap();
        let summaries: Vec<RecipeSummary> =
            parsed.recipes.into_iter().map(RecipeSummary::from).collect();
        assert_eq!(summaries[0].id, "35477");
        assert_eq!(summaries[0].author, "Closet Cooking");
    }

    const PIZZA: &str = r#"{"recipe":{"recipe_id":"47746","title":"Best Pizza Dough Ever","publisher":"101 Cookbooks","ingredients":["4 1/2 cups flour"]}}"#;

    #[test]
    fn test_search_404_is_empty() {
        let results = search_outcome(StatusCode::NOT_FOUND, r#"{"error":"no recipes"}"#).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_search_ok() {
        let body = r#"{"recipes":[{"recipe_id":"1","title":"Pizza","publisher":"Ana"}]}"#;
        let results = search_outcome(StatusCode::OK, body).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].author, "Ana");
    }

    #[test]
    fn test_search_server_error_is_network() {
        let err = search_outcome(StatusCode::INTERNAL_SERVER_ERROR, "oops").unwrap_err();
        assert!(matches!(err, Error::Network(_)));
    }

    #[test]
    fn test_search_garbage_body_is_network() {
        let err = search_outcome(StatusCode::OK, "<html>").unwrap_err();
        assert!(matches!(err, Error::Network(_)));
    }

    #[test]
    fn test_recipe_ok() {
        let doc = recipe_outcome("47746", StatusCode::OK, PIZZA).unwrap();
        assert_eq!(doc.title, "Best Pizza Dough Ever");
        assert_eq!(doc.ingredients.len(), 1);
    }

    #[test]
    fn test_recipe_404_is_not_found() {
        let err = recipe_outcome("nope", StatusCode::NOT_FOUND, "").unwrap_err();
        assert!(matches!(err, Error::NotFound(ref id) if id == "nope"));
    }

    #[test]
    fn test_recipe_error_body_is_not_found() {
        let body = r#"{"error":"Couldn't find recipe with that id"}"#;
        let err = recipe_outcome("nope", StatusCode::OK, body).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_recipe_server_error_is_network() {
        let err = recipe_outcome("47746", StatusCode::BAD_GATEWAY, PIZZA).unwrap_err();
        assert!(matches!(err, Error::Network(_)));
    }

    #[test]
    fn test_error_body_has_no_recipe() {
        let body = r#"{"error":"Couldn't find recipe with that id"}"#;
        let parsed: RecipeResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.recipe.is_none());
        assert!(parsed.error.is_some());
    }
}
