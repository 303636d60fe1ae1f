use serde::Serialize;
use uuid::Uuid;

/// Shopping list entry. Quantity stays editable after it's added.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListItem {
    pub id: String,
    pub quantity: Option<f64>,
    pub unit: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ShoppingList {
    items: Vec<ListItem>,
}

impl ShoppingList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_item(&mut self, quantity: Option<f64>, unit: &str, name: &str) -> ListItem {
        let item = ListItem {
            id: Uuid::new_v4().to_string(),
            quantity,
            unit: unit.to_string(),
            name: name.to_string(),
        };
        self.items.push(item.clone());
        item
    }

    /// Unknown ids are ignored
    pub fn delete_item(&mut self, id: &str) {
        if let Some(index) = self.items.iter().position(|item| item.id == id) {
            self.items.remove(index);
        }
    }

    /// Returns false when no item has `id`
    pub fn update_quantity(&mut self, id: &str, quantity: f64) -> bool {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.quantity = Some(quantity);
                true
            }
            None => false,
        }
    }

    pub fn items(&self) -> &[ListItem] {
        &self.items
    }
}
