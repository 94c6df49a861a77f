//! Rule tables for the bio-impact heuristics: driver categories with their
//! name-keyword triggers, numeric thresholds, per-food label flags, and the
//! tally keywords used by the score formulas. Kept as data so each rule can
//! be tested independently of the aggregation pass.

use serde::Serialize;

use crate::meals::FoodItem;

/// Driver category names. Display strings double as map keys.
pub mod category {
    pub const HIGH_SUGAR: &str = "High Sugar Foods";
    pub const PROCESSED_SODIUM: &str = "Processed Sodium";
    pub const PROCESSED_FATS: &str = "Processed Fats";
    pub const REFINED_CARBS: &str = "Refined Carbs";
    pub const ARTIFICIAL_SWEETENERS: &str = "Artificial Sweeteners";
    pub const ARTIFICIAL_DYES: &str = "Artificial Dyes";
    pub const HIDDEN_EMULSIFIERS: &str = "Hidden Emulsifiers";
    pub const LATE_NIGHT: &str = "Late Night Eating";
}

pub const SUGAR_LIMIT_G: f64 = 15.0;
pub const SODIUM_LIMIT_MG: f64 = 800.0;
pub const SATURATED_FAT_LIMIT_G: f64 = 10.0;

/// Meals at or after this hour count as late-night eating.
pub const LATE_MEAL_HOUR: u8 = 21;

pub const SWEETENER_KEYWORDS: &[&str] = &["diet", "light", "zero", "sweetener"];
pub const DYE_KEYWORDS: &[&str] = &["color", "red 40", "yellow 5", "blue 1"];
pub const EMULSIFIER_KEYWORDS: &[&str] = &["gum", "lecithin", "carrageenan"];
pub const GREEN_KEYWORDS: &[&str] = &["salad", "spinach", "broccoli", "kale"];
pub const FRUIT_KEYWORDS: &[&str] = &["berry", "apple", "orange", "fruit"];

pub struct CategoryRule {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
}

/// Name-keyword triggers per category. The sugar and sodium numeric
/// thresholds are OR'd with these by the detector; late-night eating is
/// triggered off the meal hour, not a food name.
pub const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        name: category::HIGH_SUGAR,
        keywords: &["soda", "sugar", "cookie", "cake", "candy"],
    },
    CategoryRule {
        name: category::PROCESSED_SODIUM,
        keywords: &["fried", "burger", "pizza", "fast food"],
    },
    CategoryRule {
        name: category::PROCESSED_FATS,
        keywords: &["fried", "donut", "margarine"],
    },
    CategoryRule {
        name: category::REFINED_CARBS,
        keywords: &["white bread", "pasta", "pastry", "white rice"],
    },
    CategoryRule {
        name: category::ARTIFICIAL_SWEETENERS,
        keywords: SWEETENER_KEYWORDS,
    },
    CategoryRule {
        name: category::ARTIFICIAL_DYES,
        keywords: DYE_KEYWORDS,
    },
    CategoryRule {
        name: category::HIDDEN_EMULSIFIERS,
        keywords: EMULSIFIER_KEYWORDS,
    },
];

/// Case-insensitive substring test; `name` must already be lowercased.
pub fn contains_any(name: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| name.contains(k))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Critical,
    Warning,
}

/// A per-food red-flag fact shown on the culprit detail card.
#[derive(Debug, Clone, Serialize)]
pub struct Flag {
    pub label: &'static str,
    pub value: String,
    pub status: Severity,
    pub desc: &'static str,
}

/// Render a nutrient quantity without a trailing `.0`.
pub(crate) fn fmt_quantity(v: f64) -> String {
    if (v - v.round()).abs() < 1e-9 {
        format!("{}", v.round() as i64)
    } else {
        format!("{v:.1}")
    }
}

/// Build the flag list for one food from its own fields. Every matching rule
/// produces a flag, independent of which driver category caused the food to
/// be visited.
pub fn flags_for(food: &FoodItem) -> Vec<Flag> {
    let name = food.name.to_lowercase();
    let mut flags = Vec::new();

    if food.sugar > SUGAR_LIMIT_G {
        flags.push(Flag {
            label: "High Sugar",
            value: format!("{}g", fmt_quantity(food.sugar)),
            status: Severity::Critical,
            desc: "Above the 15g per-serving mark where glucose spikes become hard to avoid.",
        });
    }
    if food.sodium > SODIUM_LIMIT_MG {
        flags.push(Flag {
            label: "High Sodium",
            value: format!("{}mg", fmt_quantity(food.sodium)),
            status: Severity::Critical,
            desc: "Over 800mg in a single serving, a large share of a full day's intake.",
        });
    }
    if food.trans_fat > 0.0 {
        flags.push(Flag {
            label: "Trans Fat",
            value: format!("{}g", fmt_quantity(food.trans_fat)),
            status: Severity::Critical,
            desc: "Industrial trans fat. No amount is considered safe to eat regularly.",
        });
    }
    if food.saturated_fat > SATURATED_FAT_LIMIT_G {
        flags.push(Flag {
            label: "Sat. Fat",
            value: format!("{}g", fmt_quantity(food.saturated_fat)),
            status: Severity::Warning,
            desc: "Heavy saturated fat load for one serving.",
        });
    }
    if contains_any(&name, DYE_KEYWORDS) {
        flags.push(Flag {
            label: "Artificial Dyes",
            value: "Detected".into(),
            status: Severity::Warning,
            desc: "Contains a synthetic colorant such as Red 40, Yellow 5 or Blue 1.",
        });
    }
    if contains_any(&name, EMULSIFIER_KEYWORDS) {
        flags.push(Flag {
            label: "Emulsifiers",
            value: "Detected".into(),
            status: Severity::Warning,
            desc: "Gums and emulsifiers can wear down the gut's protective mucus lining.",
        });
    }
    if contains_any(&name, SWEETENER_KEYWORDS) {
        flags.push(Flag {
            label: "Fake Sugars",
            value: "Detected".into(),
            status: Severity::Warning,
            desc: "Zero-calorie sweeteners that may disrupt gut bacteria and cravings.",
        });
    }

    flags
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> FoodItem {
        FoodItem {
            name: name.to_string(),
            ..FoodItem::default()
        }
    }

    #[test]
    fn keyword_matching_is_substring_based() {
        assert!(contains_any("diet soda", SWEETENER_KEYWORDS));
        assert!(contains_any("xanthan gum", EMULSIFIER_KEYWORDS));
        assert!(contains_any("red 40 lake", DYE_KEYWORDS));
        assert!(!contains_any("grilled chicken", DYE_KEYWORDS));
    }

    #[test]
    fn every_category_has_keywords_except_late_night() {
        for rule in CATEGORY_RULES {
            assert!(!rule.keywords.is_empty(), "{} has no keywords", rule.name);
            assert_ne!(rule.name, category::LATE_NIGHT);
        }
    }

    #[test]
    fn sugar_flag_is_critical_above_threshold() {
        let mut food = named("Chocolate Cake");
        food.sugar = 20.0;
        let flags = flags_for(&food);
        assert_eq!(flags.len(), 1);
        assert_eq!(flags[0].label, "High Sugar");
        assert_eq!(flags[0].value, "20g");
        assert_eq!(flags[0].status, Severity::Critical);
    }

    #[test]
    fn sugar_at_threshold_does_not_flag() {
        let mut food = named("Yogurt");
        food.sugar = 15.0;
        assert!(flags_for(&food).is_empty());
    }

    #[test]
    fn any_trans_fat_flags_critical() {
        let mut food = named("Margarine Spread");
        food.trans_fat = 0.5;
        let labels: Vec<&str> = flags_for(&food).iter().map(|f| f.label).collect();
        assert!(labels.contains(&"Trans Fat"));
    }

    #[test]
    fn name_rules_stack_with_nutrient_rules() {
        let mut food = named("Diet Soda with Red 40");
        food.sodium = 900.0;
        let labels: Vec<&str> = flags_for(&food).iter().map(|f| f.label).collect();
        assert_eq!(labels, vec!["High Sodium", "Artificial Dyes", "Fake Sugars"]);
    }

    #[test]
    fn quantities_render_without_trailing_zero() {
        assert_eq!(fmt_quantity(20.0), "20");
        assert_eq!(fmt_quantity(12.5), "12.5");
    }
}
