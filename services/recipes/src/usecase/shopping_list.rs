use std::collections::BTreeMap;

use uuid::Uuid;

use crate::domain::repository::ShoppingListSource;
use crate::domain::types::{CartIngredientLine, ShoppingListItem};
use crate::error::RecipesServiceError;

pub const SHOPPING_LIST_FILENAME: &str = "shopping_list.txt";

/// Sums amounts per (name, unit), sorted by name then unit.
pub fn aggregate(lines: Vec<CartIngredientLine>) -> Vec<ShoppingListItem> {
    let mut totals: BTreeMap<(String, String), i64> = BTreeMap::new();
    for line in lines {
        *totals
            .entry((line.name, line.measurement_unit))
            .or_default() += i64::from(line.amount);
    }
    totals
        .into_iter()
        .map(|((name, measurement_unit), total)| ShoppingListItem {
            name,
            measurement_unit,
            total,
        })
        .collect()
}

/// One `<name> (<unit>) - <total>` line per item.
pub fn render(items: &[ShoppingListItem]) -> String {
    items
        .iter()
        .map(|item| {
            format!(
                "{} ({}) - {}\n",
                item.name, item.measurement_unit, item.total
            )
        })
        .collect()
}

pub struct DownloadShoppingListUseCase<S: ShoppingListSource> {
    pub cart: S,
}

impl<S: ShoppingListSource> DownloadShoppingListUseCase<S> {
    pub async fn execute(&self, user_id: Uuid) -> Result<String, RecipesServiceError> {
        let lines = self.cart.cart_ingredients(user_id).await?;
        Ok(render(&aggregate(lines)))
    }
}
