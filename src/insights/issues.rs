//! Turns low wellness scores into user-facing corrective insights: the
//! impacted dimension, the driver categories behind it, the specific culprit
//! foods, remediation copy, and label fact cards with live totals.

use serde::Serialize;

use super::engine::{BioImpact, CulpritFood};
use super::rules::{category, fmt_quantity, Severity};

pub const WELLNESS_THRESHOLD: i32 = 70;
pub const ANTIOXIDANT_THRESHOLD: i32 = 50;

/// Daily sodium intake above this is flagged Critical on the fact card.
const SODIUM_CRITICAL_MG: f64 = 2300.0;
const SUGAR_CRITICAL_G: f64 = 50.0;
const LATE_MEALS_CRITICAL: u32 = 2;

/// A label fact card: headline number plus why it matters.
#[derive(Debug, Clone, Serialize)]
pub struct HiddenLabel {
    pub label: &'static str,
    pub value: String,
    pub status: Severity,
    pub desc: &'static str,
}

/// One corrective insight, built on demand when a score sits below its
/// threshold. Never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct Issue {
    pub id: &'static str,
    pub title: &'static str,
    pub impact: &'static str,
    pub score: i32,
    pub drivers: Vec<&'static str>,
    pub culprit_foods: Vec<CulpritFood>,
    pub solution: &'static str,
    pub hidden_labels: Vec<HiddenLabel>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InsightReport {
    pub optimized: bool,
    pub issues: Vec<Issue>,
}

/// Drivers whose display name contains any of the given needles, in first
/// occurrence order.
fn filtered_drivers(bio: &BioImpact, needles: &[&str]) -> Vec<&'static str> {
    bio.negative_drivers
        .iter()
        .copied()
        .filter(|d| needles.iter().any(|n| d.contains(n)))
        .collect()
}

/// Union of the named categories' culprit lists, deduplicated again by
/// name + timestamp across the union.
fn culprits_from(bio: &BioImpact, categories: &[&'static str]) -> Vec<CulpritFood> {
    let mut out: Vec<CulpritFood> = Vec::new();
    for cat in categories {
        let Some(list) = bio.driver_foods.get(cat) else {
            continue;
        };
        for culprit in list {
            let seen = out
                .iter()
                .any(|c| c.name == culprit.name && c.timestamp == culprit.timestamp);
            if !seen {
                out.push(culprit.clone());
            }
        }
    }
    out
}

fn severity_if(critical: bool) -> Severity {
    if critical {
        Severity::Critical
    } else {
        Severity::Warning
    }
}

fn stability_issue(bio: &BioImpact) -> Issue {
    Issue {
        id: "stability",
        title: "Blood Sugar Rollercoaster",
        impact: "Stability",
        score: bio.stability,
        drivers: filtered_drivers(bio, &["Sugar", "Eating", "Sweeteners"]),
        culprit_foods: culprits_from(
            bio,
            &[
                category::HIGH_SUGAR,
                category::ARTIFICIAL_SWEETENERS,
                category::LATE_NIGHT,
            ],
        ),
        solution: "Swap refined sugar for whole fruit and close the kitchen by 9 PM. \
                   Pairing carbs with protein or fat slows the glucose spike and keeps \
                   your energy steady between meals.",
        hidden_labels: vec![
            HiddenLabel {
                label: "Added Sugar",
                value: format!("{}g", fmt_quantity(bio.totals.sugar)),
                status: severity_if(bio.totals.sugar > SUGAR_CRITICAL_G),
                desc: "Total sugar logged in this window. The WHO advises staying under \
                       25g of added sugar per day.",
            },
            HiddenLabel {
                label: "Sweeteners",
                value: format!("{} items", bio.totals.additives),
                status: severity_if(bio.totals.additives > 3),
                desc: "Zero-calorie sweeteners keep cravings alive and can disturb the \
                       gut bacteria that help regulate blood sugar.",
            },
        ],
    }
}

fn recovery_issue(bio: &BioImpact) -> Issue {
    Issue {
        id: "recovery",
        title: "Recovery Roadblock",
        impact: "Recovery",
        score: bio.recovery,
        drivers: filtered_drivers(bio, &["Fats", "Sodium"]),
        culprit_foods: culprits_from(bio, &[category::PROCESSED_FATS, category::PROCESSED_SODIUM]),
        solution: "Trade fried and heavily processed foods for omega-3 rich options like \
                   salmon, walnuts or olive oil, and put protein on every plate. That is \
                   the raw material your body repairs with overnight.",
        hidden_labels: vec![
            HiddenLabel {
                label: "Sodium",
                value: format!("{}mg", fmt_quantity(bio.totals.sodium)),
                status: severity_if(bio.totals.sodium > SODIUM_CRITICAL_MG),
                desc: "Sodium logged in this window. Above 2,300mg a day it raises blood \
                       pressure and blunts overnight recovery.",
            },
            HiddenLabel {
                label: "Trans Fat",
                value: format!("{}g", fmt_quantity(bio.totals.trans_fat)),
                status: severity_if(bio.totals.trans_fat > 0.0),
                desc: "Industrial trans fat drives the inflammation that slows muscle \
                       and tissue repair.",
            },
            HiddenLabel {
                label: "Sat. Fat",
                value: format!("{}g", fmt_quantity(bio.totals.saturated_fat)),
                status: severity_if(bio.totals.saturated_fat > 20.0),
                desc: "Saturated fat logged in this window; heavy loads crowd out the \
                       fats that actually aid repair.",
            },
        ],
    }
}

fn focus_issue(bio: &BioImpact) -> Issue {
    Issue {
        id: "focus",
        title: "Focus Disruptors Detected",
        impact: "Focus",
        score: bio.focus,
        drivers: filtered_drivers(bio, &["Dyes", "Sweeteners"]),
        culprit_foods: culprits_from(
            bio,
            &[category::ARTIFICIAL_DYES, category::ARTIFICIAL_SWEETENERS],
        ),
        solution: "Cut synthetic dyes and diet drinks for two weeks; most people notice \
                   clearer thinking within days. Steady protein and water intake carry \
                   the rest.",
        hidden_labels: vec![
            HiddenLabel {
                label: "Artificial Dyes",
                value: format!("{} foods", bio.totals.dyes),
                status: severity_if(bio.totals.dyes > 1),
                desc: "Petroleum-derived colorants like Red 40 are linked to attention \
                       problems in sensitive people.",
            },
            HiddenLabel {
                label: "Fake Sugars",
                value: format!("{} items", bio.totals.additives),
                status: Severity::Warning,
                desc: "Sweet taste without calories scrambles the brain's fuel \
                       prediction, leaving you foggy.",
            },
        ],
    }
}

fn digestion_issue(bio: &BioImpact) -> Issue {
    Issue {
        id: "digestion",
        title: "Digestive Stress",
        impact: "Digestion",
        score: bio.digestion,
        drivers: filtered_drivers(bio, &["Eating", "Emulsifiers"]),
        culprit_foods: culprits_from(bio, &[category::LATE_NIGHT, category::HIDDEN_EMULSIFIERS]),
        solution: "Finish eating at least three hours before bed so your gut can run its \
                   overnight cleanup cycle, and scan labels for gums and carrageenan.",
        hidden_labels: vec![
            HiddenLabel {
                label: "Late Meals",
                value: format!("{} meals", bio.totals.late_meals),
                status: severity_if(bio.totals.late_meals > LATE_MEALS_CRITICAL),
                desc: "Meals after 9 PM interrupt the migrating motor complex that \
                       sweeps the gut clean overnight.",
            },
            HiddenLabel {
                label: "Emulsifiers",
                value: format!("{} foods", bio.totals.emulsifiers),
                status: Severity::Warning,
                desc: "Gums, lecithin and carrageenan thin the mucus layer that keeps \
                       gut bacteria at a safe distance.",
            },
        ],
    }
}

fn antioxidant_issue(bio: &BioImpact) -> Issue {
    Issue {
        id: "antioxidants",
        title: "Antioxidant Gap",
        impact: "Antioxidants",
        score: bio.antioxidants,
        drivers: filtered_drivers(bio, &["Carbs"]),
        culprit_foods: culprits_from(bio, &[category::REFINED_CARBS]),
        solution: "Aim for two fists of colorful plants a day. Berries, leafy greens and \
                   cruciferous vegetables beat any supplement bottle.",
        hidden_labels: vec![
            HiddenLabel {
                label: "Greens",
                value: format!("{} servings", bio.totals.greens),
                status: severity_if(bio.totals.greens == 0),
                desc: "Leafy greens logged in this window.",
            },
            HiddenLabel {
                label: "Fruits",
                value: format!("{} servings", bio.totals.fruits),
                status: severity_if(bio.totals.fruits == 0),
                desc: "Whole fruit logged in this window.",
            },
        ],
    }
}

fn optimized_entry(bio: &BioImpact) -> Issue {
    let overall = (bio.energy
        + bio.recovery
        + bio.focus
        + bio.stability
        + bio.antioxidants
        + bio.digestion)
        / 6;
    Issue {
        id: "optimized",
        title: "Bio Rhythm Optimized",
        impact: "Overall",
        score: overall,
        drivers: Vec::new(),
        culprit_foods: Vec::new(),
        solution: "Your recent meals are fueling steady energy, deep recovery and a calm \
                   gut. Keep your plate colorful and your last meal early.",
        hidden_labels: Vec::new(),
    }
}

/// Compose the insight list for one engine pass. When the optimized gate
/// holds, the corrective list collapses to a single congratulatory entry.
pub fn compose_insights(bio: &BioImpact) -> InsightReport {
    if bio.is_optimized() {
        return InsightReport {
            optimized: true,
            issues: vec![optimized_entry(bio)],
        };
    }

    let mut issues = Vec::new();
    if bio.stability < WELLNESS_THRESHOLD {
        issues.push(stability_issue(bio));
    }
    if bio.recovery < WELLNESS_THRESHOLD {
        issues.push(recovery_issue(bio));
    }
    if bio.focus < WELLNESS_THRESHOLD {
        issues.push(focus_issue(bio));
    }
    if bio.digestion < WELLNESS_THRESHOLD {
        issues.push(digestion_issue(bio));
    }
    if bio.antioxidants < ANTIOXIDANT_THRESHOLD {
        issues.push(antioxidant_issue(bio));
    }

    InsightReport {
        optimized: false,
        issues,
    }
}
