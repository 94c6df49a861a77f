//! Frequency tallies over the meal window: most-logged foods with their
//! summed calories, and most-seen ingredient names.

use serde::Serialize;

use crate::meals::MealRecord;

const TOP_FOODS_LIMIT: usize = 5;
const TOP_INGREDIENTS_LIMIT: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopFood {
    pub name: String,
    pub count: u32,
    pub calories: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngredientInsight {
    pub name: String,
    pub count: u32,
}

/// Top 5 foods by occurrence count, calories summed per name. The sort is
/// stable, so equal counts keep first-seen order.
pub fn tally_top_foods(meals: &[MealRecord]) -> Vec<TopFood> {
    let mut tally: Vec<TopFood> = Vec::new();
    for meal in meals {
        for food in &meal.foods {
            match tally.iter_mut().find(|t| t.name == food.name) {
                Some(t) => {
                    t.count += 1;
                    t.calories += food.calories;
                }
                None => tally.push(TopFood {
                    name: food.name.clone(),
                    count: 1,
                    calories: food.calories,
                }),
            }
        }
    }
    tally.sort_by(|a, b| b.count.cmp(&a.count));
    tally.truncate(TOP_FOODS_LIMIT);
    tally
}

/// Top 4 ingredient names by occurrence count; same first-seen tie-break.
pub fn tally_ingredients(meals: &[MealRecord]) -> Vec<IngredientInsight> {
    let mut tally: Vec<IngredientInsight> = Vec::new();
    for meal in meals {
        for food in &meal.foods {
            for ingredient in &food.ingredients {
                let name = ingredient.name();
                match tally.iter_mut().find(|t| t.name == name) {
                    Some(t) => t.count += 1,
                    None => tally.push(IngredientInsight {
                        name: name.to_string(),
                        count: 1,
                    }),
                }
            }
        }
    }
    tally.sort_by(|a, b| b.count.cmp(&a.count));
    tally.truncate(TOP_INGREDIENTS_LIMIT);
    tally
}
