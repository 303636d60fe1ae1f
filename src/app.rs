//! Application state and interaction dispatch.
//!
//! One [`AppState`] lives for the whole page. Each user interaction maps to
//! one method here. The two that hit the network are split in halves:
//! `begin_*` stamps the request with a generation number and `finish_*`
//! applies the response only if no newer request of the same kind started
//! in the meantime. Without this a slow response for a recipe the user
//! already navigated away from would overwrite the one on screen.

use tracing::{debug, info, warn};

use crate::api::RecipeApi;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::likes::LikeStore;
use crate::list::{ListItem, ShoppingList};
use crate::recipe::RecipeSession;
use crate::search::{PageNav, SearchSession};
use crate::storage::KeyValueStore;
use crate::types::{Direction, LikeRecord, RecipeDocument, RecipeId, RecipeSummary};

/// Notice shown when a search fails for any reason
pub const SEARCH_FAILED: &str = "Something went wrong with the search..";
/// Notice shown when a recipe fails to load for any reason
pub const RECIPE_FAILED: &str = "Error processing recipe!";

/// A search that has been started but not applied
#[derive(Debug, Clone)]
pub struct PendingSearch {
    generation: u64,
    query: String,
}

impl PendingSearch {
    pub fn query(&self) -> &str {
        &self.query
    }
}

/// A recipe load that has been started but not applied
#[derive(Debug, Clone)]
pub struct PendingRecipe {
    generation: u64,
    id: RecipeId,
}

impl PendingRecipe {
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// What a like-button press did
#[derive(Debug, Clone, PartialEq)]
pub enum LikeToggle {
    Liked(LikeRecord),
    Unliked(RecipeId),
}

pub struct AppState<A, S> {
    api: A,
    config: Config,
    search: Option<SearchSession>,
    recipe: Option<RecipeSession>,
    likes: LikeStore<S>,
    list: Option<ShoppingList>,
    search_generation: u64,
    recipe_generation: u64,
}

impl<A: RecipeApi, S: KeyValueStore> AppState<A, S> {
    /// Build the state and restore persisted likes from `storage`
    pub fn new(api: A, storage: S, config: Config) -> Self {
        let likes = LikeStore::restore(storage, config.storage_key.clone());
        info!("App state ready with {} restored likes", likes.count());

        AppState {
            api,
            config,
            search: None,
            recipe: None,
            likes,
            list: None,
            search_generation: 0,
            recipe_generation: 0,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn search(&self) -> Option<&SearchSession> {
        self.search.as_ref()
    }

    pub fn recipe(&self) -> Option<&RecipeSession> {
        self.recipe.as_ref()
    }

    pub fn likes(&self) -> &LikeStore<S> {
        &self.likes
    }

    pub fn list(&self) -> Option<&ShoppingList> {
        self.list.as_ref()
    }

    // ---- search ----

    /// Start a search. Blank queries start nothing.
    pub fn begin_search(&mut self, query: &str) -> Option<PendingSearch> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        self.search_generation += 1;
        debug!("Search #{} for '{}'", self.search_generation, query);

        Some(PendingSearch {
            generation: self.search_generation,
            query: query.to_string(),
        })
    }

    /// Apply a search response. `Ok(false)` means a newer search superseded
    /// this one and the response was dropped.
    pub fn finish_search(
        &mut self,
        pending: PendingSearch,
        result: Result<Vec<RecipeSummary>>,
    ) -> Result<bool> {
        if pending.generation != self.search_generation {
            debug!("Dropping stale results for '{}'", pending.query);
            return Ok(false);
        }

        match result {
            Ok(results) => {
                info!("Search '{}' returned {} recipes", pending.query, results.len());
                self.search = Some(SearchSession::new(pending.query, results));
                Ok(true)
            }
            Err(e) => {
                warn!("Search '{}' failed: {}", pending.query, e);
                self.search = None;
                Err(e)
            }
        }
    }

    /// Run a whole search: begin, fetch, finish
    pub async fn submit_search(&mut self, query: &str) -> Result<bool> {
        let Some(pending) = self.begin_search(query) else {
            return Ok(false);
        };
        let result = self.api.search(pending.query()).await;
        self.finish_search(pending, result)
    }

    /// Current results, `page` counted from 1. Empty without a search.
    pub fn results_page(&self, page: usize) -> &[RecipeSummary] {
        match &self.search {
            Some(search) => search.page(page, self.config.page_size),
            None => &[],
        }
    }

    pub fn results_nav(&self, page: usize) -> Option<PageNav> {
        self.search
            .as_ref()
            .map(|search| search.nav(page, self.config.page_size))
    }

    // ---- recipe ----

    /// Start loading a recipe. A blank id starts nothing.
    pub fn begin_recipe(&mut self, id: &str) -> Option<PendingRecipe> {
        let id = id.trim().trim_start_matches('#');
        if id.is_empty() {
            return None;
        }
        self.recipe_generation += 1;

        Some(PendingRecipe {
            generation: self.recipe_generation,
            id: id.to_string(),
        })
    }

    /// Apply a recipe response, same contract as [`finish_search`](Self::finish_search)
    pub fn finish_recipe(
        &mut self,
        pending: PendingRecipe,
        result: Result<RecipeDocument>,
    ) -> Result<bool> {
        if pending.generation != self.recipe_generation {
            debug!("Dropping stale recipe {}", pending.id);
            return Ok(false);
        }

        match result {
            Ok(doc) => {
                let session = RecipeSession::load(doc, &self.config.units);
                info!(
                    "Loaded recipe {} ({} ingredients)",
                    session.id,
                    session.ingredients.len()
                );
                self.recipe = Some(session);
                Ok(true)
            }
            Err(e) => {
                warn!("Recipe {} failed to load: {}", pending.id, e);
                self.recipe = None;
                Err(e)
            }
        }
    }

    pub async fn open_recipe(&mut self, id: &str) -> Result<bool> {
        let Some(pending) = self.begin_recipe(id) else {
            return Ok(false);
        };
        let result = self.api.recipe(pending.id()).await;
        self.finish_recipe(pending, result)
    }

    pub fn update_servings(&mut self, direction: Direction) -> Result<&RecipeSession> {
        let recipe = self.recipe.as_mut().ok_or(Error::NoActiveRecipe)?;
        recipe.update_servings(direction);
        Ok(&*recipe)
    }

    // ---- likes ----

    /// Like the open recipe, or unlike it if it's already liked
    pub fn toggle_like(&mut self) -> Result<LikeToggle> {
        let recipe = self.recipe.as_ref().ok_or(Error::NoActiveRecipe)?;

        if self.likes.is_liked(&recipe.id) {
            self.likes.remove(&recipe.id);
            info!("Unliked {}", recipe.id);
            Ok(LikeToggle::Unliked(recipe.id.clone()))
        } else {
            let like = self
                .likes
                .add(&recipe.id, &recipe.title, &recipe.author, &recipe.image_url);
            info!("Liked {}", like.id);
            Ok(LikeToggle::Liked(like))
        }
    }

    pub fn is_liked(&self, id: &str) -> bool {
        self.likes.is_liked(id)
    }

    pub fn likes_snapshot(&self) -> Vec<LikeRecord> {
        self.likes.records().to_vec()
    }

    // ---- shopping list ----

    /// Put every ingredient of the open recipe on the shopping list
    pub fn add_recipe_to_list(&mut self) -> Result<Vec<ListItem>> {
        let recipe = self.recipe.as_ref().ok_or(Error::NoActiveRecipe)?;
        let list = self.list.get_or_insert_with(ShoppingList::new);

        let added: Vec<ListItem> = recipe
            .ingredients
            .iter()
            .map(|ing| list.add_item(ing.quantity, &ing.unit, &ing.name))
            .collect();
        debug!("Added {} items to the shopping list", added.len());
        Ok(added)
    }

    pub fn list_mut(&mut self) -> &mut ShoppingList {
        self.list.get_or_insert_with(ShoppingList::new)
    }
}
