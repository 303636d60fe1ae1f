use serde::Serialize;

use crate::parse::{parse_ingredients, UnitVocabulary};
use crate::types::{Direction, Ingredient, RecipeDocument, RecipeId};

/// Servings assumed when the document doesn't say
pub const DEFAULT_SERVINGS: u32 = 4;

/// Minutes per started group of three ingredients when the document has
/// no cooking time
const MINUTES_PER_PERIOD: u32 = 15;
const INGREDIENTS_PER_PERIOD: usize = 3;

/// The recipe currently open.
///
/// Quantities are always derived from `base_ingredients` and
/// `base_servings`, both captured at load, so any sequence of serving
/// changes lands on the same numbers as a single jump would.
#[derive(Debug, Clone, Serialize)]
pub struct RecipeSession {
    pub id: RecipeId,
    pub title: String,
    pub author: String,
    pub image_url: String,
    pub source_url: String,
    pub servings: u32,
    pub cook_time_minutes: u32,
    pub ingredients: Vec<Ingredient>,
    #[serde(skip)]
    raw_ingredients: Vec<String>,
    #[serde(skip)]
    raw_servings: Option<u32>,
    #[serde(skip)]
    raw_cook_time: Option<u32>,
    #[serde(skip)]
    base_servings: u32,
    #[serde(skip)]
    base_ingredients: Vec<Ingredient>,
}

impl RecipeSession {
    /// Session for a freshly fetched document. Ingredients are left raw
    /// until [`parse_ingredients`](Self::parse_ingredients) runs.
    pub fn from_document(doc: RecipeDocument) -> Self {
        RecipeSession {
            id: doc.recipe_id,
            title: doc.title,
            author: doc.publisher,
            image_url: doc.image_url,
            source_url: doc.source_url,
            servings: DEFAULT_SERVINGS,
            cook_time_minutes: 0,
            ingredients: Vec::new(),
            raw_ingredients: doc.ingredients,
            raw_servings: doc.servings,
            raw_cook_time: doc.cooking_time,
            base_servings: DEFAULT_SERVINGS,
            base_ingredients: Vec::new(),
        }
    }

    /// Document -> ready-to-render session: parse, then derive time and servings
    pub fn load(doc: RecipeDocument, units: &UnitVocabulary) -> Self {
        let mut session = Self::from_document(doc);
        session.parse_ingredients(units);
        session.calc_time();
        session.calc_servings();
        session
    }

    pub fn parse_ingredients(&mut self, units: &UnitVocabulary) {
        self.base_ingredients = parse_ingredients(&self.raw_ingredients, units);
        self.ingredients = self.base_ingredients.clone();
    }

    /// Copy the document's cooking time, or estimate 15 minutes per three
    /// ingredients when it has none
    pub fn calc_time(&mut self) {
        self.cook_time_minutes = self.raw_cook_time.unwrap_or_else(|| {
            let periods = self.raw_ingredients.len().div_ceil(INGREDIENTS_PER_PERIOD);
            periods as u32 * MINUTES_PER_PERIOD
        });
    }

    /// Copy the document's servings (at least 1) and make it the scaling
    /// baseline
    pub fn calc_servings(&mut self) {
        let servings = self.raw_servings.unwrap_or(DEFAULT_SERVINGS).max(1);
        self.servings = servings;
        self.base_servings = servings;
        self.rescale();
    }

    /// Step servings by one. Decreasing at 1 does nothing.
    pub fn update_servings(&mut self, direction: Direction) {
        let servings = match direction {
            Direction::Increase => self.servings.saturating_add(1),
            Direction::Decrease => self.servings.saturating_sub(1).max(1),
        };
        self.set_servings(servings);
    }

    /// Jump straight to `servings` (clamped to at least 1)
    pub fn set_servings(&mut self, servings: u32) {
        let servings = servings.max(1);
        if servings == self.servings {
            return;
        }
        self.servings = servings;
        self.rescale();
    }

    pub fn base_servings(&self) -> u32 {
        self.base_servings
    }

    fn rescale(&mut self) {
        let ratio = self.servings as f64 / self.base_servings as f64;
        self.ingredients = self
            .base_ingredients
            .iter()
            .map(|base| Ingredient {
                quantity: base.quantity.map(|q| q * ratio),
                ..base.clone()
            })
            .collect();
    }
}
