//! Single-pass bio-impact pipeline: meals -> aggregates -> driver sets ->
//! scores. Pure and synchronous; callers fetch the meal window and re-run the
//! whole computation whenever it changes.

use std::collections::BTreeMap;

use serde::Serialize;
use time::{macros::format_description, OffsetDateTime};

use crate::meals::MealRecord;

use super::rules::{
    category, contains_any, flags_for, Flag, CATEGORY_RULES, DYE_KEYWORDS,
    EMULSIFIER_KEYWORDS, FRUIT_KEYWORDS, GREEN_KEYWORDS, LATE_MEAL_HOUR, SODIUM_LIMIT_MG,
    SUGAR_LIMIT_G, SWEETENER_KEYWORDS,
};

/// A specific logged food implicated in a driver category.
#[derive(Debug, Clone, Serialize)]
pub struct CulpritFood {
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// Category that first implicated this food.
    pub driver: &'static str,
    pub flags: Vec<Flag>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct OrganEffects {
    pub heart: i32,
    pub liver: i32,
    pub kidney: i32,
    pub brain: i32,
    pub skin: i32,
}

/// Running tallies accumulated across every food in the window, regardless of
/// which rules fired.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct NutrientTotals {
    pub sugar: f64,
    pub sodium: f64,
    pub trans_fat: f64,
    pub saturated_fat: f64,
    pub additives: u32,
    pub dyes: u32,
    pub emulsifiers: u32,
    pub greens: u32,
    pub fruits: u32,
    pub late_meals: u32,
}

/// Full output of one engine pass.
#[derive(Debug, Clone, Serialize)]
pub struct BioImpact {
    pub energy: i32,
    pub recovery: i32,
    pub focus: i32,
    pub stability: i32,
    pub antioxidants: i32,
    pub digestion: i32,
    pub organ_effects: OrganEffects,
    /// Driver categories in order of first occurrence.
    pub negative_drivers: Vec<&'static str>,
    pub driver_foods: BTreeMap<&'static str, Vec<CulpritFood>>,
    pub totals: NutrientTotals,
}

impl BioImpact {
    /// All four gate metrics healthy: corrective insights are suppressed.
    pub fn is_optimized(&self) -> bool {
        self.stability >= 70 && self.recovery >= 70 && self.digestion >= 70
            && self.antioxidants >= 50
    }
}

#[derive(Default)]
struct DriverSet {
    order: Vec<&'static str>,
    foods: BTreeMap<&'static str, Vec<CulpritFood>>,
}

impl DriverSet {
    /// Register `name` as a culprit of `category`. Duplicate name+timestamp
    /// pairs within one category are skipped; a numeric threshold re-firing
    /// after a keyword match therefore adds nothing.
    fn add(
        &mut self,
        category: &'static str,
        name: &str,
        timestamp: OffsetDateTime,
        flags: &[Flag],
    ) {
        if !self.order.contains(&category) {
            self.order.push(category);
        }
        let list = self.foods.entry(category).or_default();
        if list.iter().any(|c| c.name == name && c.timestamp == timestamp) {
            return;
        }
        list.push(CulpritFood {
            name: name.to_string(),
            timestamp,
            driver: category,
            flags: flags.to_vec(),
        });
    }
}

/// Synthetic culprit name for a late meal, e.g. "10:00 PM Meal".
fn late_meal_label(timestamp: OffsetDateTime) -> String {
    let clock = format_description!("[hour repr:12 padding:none]:[minute] [period]");
    match timestamp.format(&clock) {
        Ok(t) => format!("{t} Meal"),
        Err(_) => "Late Meal".to_string(),
    }
}

fn score(v: f64) -> i32 {
    v.round().clamp(0.0, 100.0) as i32
}

/// Run the full pipeline over a meal window. Hour-of-day checks use the
/// offset each timestamp carries; shift timestamps to the user's zone before
/// calling if they were stored normalized to UTC.
pub fn compute_bio_impact(meals: &[MealRecord]) -> BioImpact {
    let mut protein = 0.0f64;
    let mut carbs = 0.0f64;
    let mut fat = 0.0f64;
    let mut totals = NutrientTotals::default();
    let mut drivers = DriverSet::default();

    for meal in meals {
        protein += meal.total_protein;
        carbs += meal.total_carbs;
        fat += meal.total_fat;

        if meal.timestamp.hour() >= LATE_MEAL_HOUR {
            totals.late_meals += 1;
            let label = late_meal_label(meal.timestamp);
            drivers.add(category::LATE_NIGHT, &label, meal.timestamp, &[]);
        }

        for food in &meal.foods {
            let name = food.name.to_lowercase();

            totals.sugar += food.sugar;
            totals.sodium += food.sodium;
            totals.trans_fat += food.trans_fat;
            totals.saturated_fat += food.saturated_fat;

            if contains_any(&name, GREEN_KEYWORDS) {
                totals.greens += 1;
            }
            if contains_any(&name, FRUIT_KEYWORDS) {
                totals.fruits += 1;
            }
            if contains_any(&name, SWEETENER_KEYWORDS) {
                totals.additives += 1;
            }
            if contains_any(&name, DYE_KEYWORDS) {
                totals.dyes += 1;
            }
            if contains_any(&name, EMULSIFIER_KEYWORDS) {
                totals.emulsifiers += 1;
            }

            let flags = flags_for(food);

            for rule in CATEGORY_RULES {
                if contains_any(&name, rule.keywords) {
                    drivers.add(rule.name, &food.name, meal.timestamp, &flags);
                }
            }
            if food.sugar > SUGAR_LIMIT_G {
                drivers.add(category::HIGH_SUGAR, &food.name, meal.timestamp, &flags);
            }
            if food.sodium > SODIUM_LIMIT_MG {
                drivers.add(category::PROCESSED_SODIUM, &food.name, meal.timestamp, &flags);
            }
        }
    }

    // denominator floored at 1 so an empty window yields zero ratios
    let macro_total = (protein + carbs + fat).max(1.0);
    let protein_ratio = protein / macro_total;
    let carb_ratio = carbs / macro_total;
    let fat_ratio = fat / macro_total;

    let greens = f64::from(totals.greens);
    let fruits = f64::from(totals.fruits);
    let dyes = f64::from(totals.dyes);
    let emulsifiers = f64::from(totals.emulsifiers);
    let additives = f64::from(totals.additives);
    let late_meals = f64::from(totals.late_meals);

    let energy = score(carb_ratio * 150.0 + greens * 5.0);
    let recovery = score(protein_ratio * 250.0);
    let focus = score((protein_ratio + fat_ratio) * 100.0 + 20.0 - dyes * 10.0);
    let stability = score(100.0 - carb_ratio * 50.0 + greens * 3.0);
    let antioxidants = (((totals.greens + totals.fruits) * 10).min(100)) as i32;
    let digestion = score(100.0 - late_meals * 20.0 - emulsifiers * 5.0);

    let kidney_protein_penalty = if protein > 200.0 {
        (protein - 200.0) / 2.0
    } else {
        0.0
    };
    let organ_effects = OrganEffects {
        heart: score(100.0 - totals.sodium / 100.0 - totals.trans_fat * 10.0
            - totals.saturated_fat / 2.0),
        liver: score(100.0 - totals.sugar / 2.0 - additives * 5.0 - totals.trans_fat * 15.0),
        kidney: score(100.0 - totals.sodium / 150.0 - kidney_protein_penalty),
        brain: score(100.0 - totals.sugar / 3.0 - dyes * 15.0 + greens * 2.0),
        skin: score(100.0 - totals.sugar / 2.0 - totals.saturated_fat / 3.0 + fruits * 3.0),
    };

    BioImpact {
        energy,
        recovery,
        focus,
        stability,
        antioxidants,
        digestion,
        organ_effects,
        negative_drivers: drivers.order,
        driver_foods: drivers.foods,
        totals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::rules::Severity;
    use crate::meals::{FoodItem, MealType};
    use time::macros::datetime;

    fn food(name: &str) -> FoodItem {
        FoodItem {
            name: name.to_string(),
            ..FoodItem::default()
        }
    }

    fn meal_at_hour(hour: u8, foods: Vec<FoodItem>) -> MealRecord {
        MealRecord {
            timestamp: datetime!(2025-06-01 00:00 UTC)
                .replace_hour(hour)
                .expect("valid hour"),
            meal_type: MealType::Snack,
            total_calories: 0.0,
            total_protein: 0.0,
            total_carbs: 0.0,
            total_fat: 0.0,
            foods,
        }
    }

    fn meal_with_macros(protein: f64, carbs: f64, fat: f64) -> MealRecord {
        MealRecord {
            total_protein: protein,
            total_carbs: carbs,
            total_fat: fat,
            ..meal_at_hour(12, Vec::new())
        }
    }

    #[test]
    fn empty_window_baseline() {
        let bio = compute_bio_impact(&[]);
        assert_eq!(bio.energy, 0);
        assert_eq!(bio.recovery, 0);
        assert_eq!(bio.focus, 20);
        assert_eq!(bio.stability, 100);
        assert_eq!(bio.antioxidants, 0);
        assert_eq!(bio.digestion, 100);
        assert_eq!(bio.organ_effects.heart, 100);
        assert_eq!(bio.organ_effects.liver, 100);
        assert_eq!(bio.organ_effects.kidney, 100);
        assert_eq!(bio.organ_effects.brain, 100);
        assert_eq!(bio.organ_effects.skin, 100);
        assert!(bio.negative_drivers.is_empty());
        assert_eq!(bio.totals.sugar, 0.0);
        assert_eq!(bio.totals.sodium, 0.0);
    }

    #[test]
    fn engine_is_idempotent() {
        let mut sweet = food("Chocolate Cake");
        sweet.sugar = 20.0;
        let meals = vec![
            meal_at_hour(22, vec![sweet, food("Diet Soda")]),
            meal_with_macros(40.0, 120.0, 30.0),
        ];
        let a = serde_json::to_string(&compute_bio_impact(&meals)).unwrap();
        let b = serde_json::to_string(&compute_bio_impact(&meals)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn high_sugar_food_drives_and_flags() {
        let mut cake = food("Chocolate Cake");
        cake.sugar = 20.0;
        let bio = compute_bio_impact(&[meal_at_hour(12, vec![cake])]);

        assert!(bio.negative_drivers.contains(&category::HIGH_SUGAR));
        let culprits = &bio.driver_foods[category::HIGH_SUGAR];
        assert_eq!(culprits.len(), 1, "keyword + threshold must not duplicate");
        let flag = &culprits[0].flags[0];
        assert_eq!(flag.label, "High Sugar");
        assert_eq!(flag.value, "20g");
        assert_eq!(flag.status, Severity::Critical);
    }

    #[test]
    fn late_night_boundary_is_hour_21() {
        let bio = compute_bio_impact(&[meal_at_hour(20, vec![])]);
        assert!(!bio.negative_drivers.contains(&category::LATE_NIGHT));

        let bio = compute_bio_impact(&[meal_at_hour(21, vec![])]);
        assert!(bio.negative_drivers.contains(&category::LATE_NIGHT));
        assert_eq!(bio.totals.late_meals, 1);
    }

    #[test]
    fn late_meal_culprit_carries_clock_label() {
        let bio = compute_bio_impact(&[meal_at_hour(22, vec![])]);
        let culprits = &bio.driver_foods[category::LATE_NIGHT];
        assert_eq!(culprits[0].name, "10:00 PM Meal");
        assert!(culprits[0].flags.is_empty());
    }

    #[test]
    fn same_name_same_timestamp_deduplicates_within_category() {
        let bio = compute_bio_impact(&[meal_at_hour(12, vec![food("Soda"), food("Soda")])]);
        assert_eq!(bio.driver_foods[category::HIGH_SUGAR].len(), 1);
    }

    #[test]
    fn same_name_different_timestamp_is_kept() {
        let meals = vec![
            meal_at_hour(9, vec![food("Soda")]),
            meal_at_hour(15, vec![food("Soda")]),
        ];
        let bio = compute_bio_impact(&meals);
        assert_eq!(bio.driver_foods[category::HIGH_SUGAR].len(), 2);
    }

    #[test]
    fn driver_order_preserves_first_occurrence() {
        let meals = vec![
            meal_at_hour(9, vec![food("French Fried Potatoes")]),
            meal_at_hour(12, vec![food("Candy Bar")]),
        ];
        let bio = compute_bio_impact(&meals);
        // fried hits both Processed Sodium and Processed Fats before candy
        assert_eq!(
            bio.negative_drivers,
            vec![
                category::PROCESSED_SODIUM,
                category::PROCESSED_FATS,
                category::HIGH_SUGAR
            ]
        );
    }

    #[test]
    fn sodium_threshold_triggers_without_keyword() {
        let mut soup = food("Miso Soup");
        soup.sodium = 950.0;
        let bio = compute_bio_impact(&[meal_at_hour(13, vec![soup])]);
        assert!(bio.negative_drivers.contains(&category::PROCESSED_SODIUM));
    }

    #[test]
    fn recovery_monotone_in_protein_and_stability_not_decreased() {
        let low = compute_bio_impact(&[meal_with_macros(30.0, 100.0, 40.0)]);
        let high = compute_bio_impact(&[meal_with_macros(60.0, 100.0, 40.0)]);
        assert!(high.recovery > low.recovery);
        assert!(high.stability >= low.stability);
    }

    #[test]
    fn recovery_clamps_at_100() {
        let bio = compute_bio_impact(&[meal_with_macros(100.0, 10.0, 10.0)]);
        assert_eq!(bio.recovery, 100);
    }

    #[test]
    fn organ_scores_clamp_to_range() {
        // bonus terms would push brain and skin past 100 without the clamp
        let meals = vec![meal_at_hour(
            12,
            vec![food("Kale Salad"), food("Spinach Salad"), food("Apple")],
        )];
        let bio = compute_bio_impact(&meals);
        assert_eq!(bio.organ_effects.brain, 100);
        assert_eq!(bio.organ_effects.skin, 100);

        let mut bomb = food("Fried Burger");
        bomb.sodium = 20_000.0;
        bomb.trans_fat = 30.0;
        let bio = compute_bio_impact(&[meal_at_hour(12, vec![bomb])]);
        assert_eq!(bio.organ_effects.heart, 0);
    }

    #[test]
    fn totals_accumulate_over_all_foods_regardless_of_triggers() {
        let mut plain = food("Plain Rice");
        plain.sodium = 5.0;
        plain.sugar = 1.0;
        let mut other = food("Steamed Fish");
        other.sodium = 10.0;
        let bio = compute_bio_impact(&[meal_at_hour(12, vec![plain, other])]);
        assert_eq!(bio.totals.sodium, 15.0);
        assert_eq!(bio.totals.sugar, 1.0);
        assert!(bio.negative_drivers.is_empty());
    }

    #[test]
    fn meal_without_foods_still_counts_macros_and_late_hour() {
        let mut meal = meal_at_hour(23, vec![]);
        meal.total_protein = 20.0;
        let bio = compute_bio_impact(&[meal]);
        assert_eq!(bio.totals.late_meals, 1);
        assert_eq!(bio.recovery, 100); // protein ratio 1.0 -> 250 -> clamp
    }
}
