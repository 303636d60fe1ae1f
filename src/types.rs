use serde::{Deserialize, Serialize};

/// Recipe identifier as handed out by the remote API
pub type RecipeId = String;

/// A liked recipe, persisted across sessions.
///
/// The image field is stored under `img`, which is what the browser app
/// has always written under the `"likes"` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LikeRecord {
    pub id: RecipeId,
    pub title: String,
    pub author: String,
    #[serde(rename = "img", alias = "imageUrl", alias = "image_url")]
    pub image_url: String,
}

/// One row of a search result list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeSummary {
    pub id: RecipeId,
    pub title: String,
    pub author: String,
    pub image_url: String,
}

/// Parsed ingredient line. `quantity` is absent when the line had no
/// numeric lead, in which case scaling leaves it alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub quantity: Option<f64>,
    pub unit: String,
    pub name: String,
}

/// Serving adjustment requested by the +/- buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Increase,
    Decrease,
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inc" | "increase" => Ok(Direction::Increase),
            "dec" | "decrease" => Ok(Direction::Decrease),
            other => Err(format!("unknown direction: {}", other)),
        }
    }
}

/// Search hit as the remote API returns it
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSummary {
    pub recipe_id: RecipeId,
    pub title: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub image_url: String,
}

impl From<ApiSummary> for RecipeSummary {
    fn from(hit: ApiSummary) -> Self {
        RecipeSummary {
            id: hit.recipe_id,
            title: hit.title,
            author: hit.publisher,
            image_url: hit.image_url,
        }
    }
}

/// Body of `GET /search`
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub recipes: Vec<ApiSummary>,
}

/// Recipe document as the remote API returns it
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeDocument {
    pub recipe_id: RecipeId,
    pub title: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub source_url: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub servings: Option<u32>,
    #[serde(default)]
    pub cooking_time: Option<u32>,
}

/// Body of `GET /get`
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeResponse {
    pub recipe: Option<RecipeDocument>,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_record_uses_img_key() {
        let like = LikeRecord {
            id: "r1".to_string(),
            title: "Tacos".to_string(),
            author: "Ana".to_string(),
            image_url: "img.png".to_string(),
        };
        let json = serde_json::to_value(&like).unwrap();
        assert_eq!(json["img"], "img.png");
        assert!(json.get("image_url").is_none());
    }

    #[test]
    fn like_record_accepts_image_url_alias() {
        let like: LikeRecord = serde_json::from_str(
            r#"{"id":"r1","title":"Tacos","author":"Ana","imageUrl":"img.png"}"#,
        )
        .unwrap();
        assert_eq!(like.image_url, "img.png");
    }

    #[test]
    fn recipe_document_tolerates_missing_fields() {
        let body = r#"{"recipe":{"recipe_id":"47746","title":"Best Pizza Dough Ever"}}"#;
        let resp: RecipeResponse = serde_json::from_str(body).unwrap();
        let doc = resp.recipe.unwrap();
        assert!(doc.ingredients.is_empty());
        assert_eq!(doc.servings, None);
    }

    #[test]
    fn direction_from_str() {
        assert_eq!("inc".parse::<Direction>(), Ok(Direction::Increase));
        assert_eq!("decrease".parse::<Direction>(), Ok(Direction::Decrease));
        assert!("sideways".parse::<Direction>().is_err());
    }
}
