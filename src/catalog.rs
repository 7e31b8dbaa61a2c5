//! Priority label pool and product catalog
//!
//! Both are fixed for the lifetime of the page; session resets never touch
//! them.

use serde::{Deserialize, Serialize};

/// Every priority term a target can carry
pub const PRIORITY_POOL: [&str; 23] = [
    "Patient Experience",
    "Retention",
    "Fill Open Shifts",
    "Reduce Contract Labor",
    "Reduce Call-ins & No-shows",
    "Improve Morale",
    "Reduce Burnout",
    "Sense of Belonging",
    "Recognition & Appreciation",
    "Team Communication",
    "Staff Satisfaction",
    "New Hire Mentorship",
    "Leadership Development",
    "Sepsis Prevention",
    "Fall Prevention",
    "Decrease HAC Rate",
    "Workplace Safety",
    "Hand Hygiene",
    "Documentation Adherence",
    "Medication Safety",
    "Patient Safety",
    "Infection Control",
    "HCAHPS Scores",
];

/// Target display colors, assigned by position in a batch
pub const TARGET_COLORS: [[f32; 3]; 8] = [
    [0.0, 1.0, 1.0], // cyan
    [1.0, 0.0, 1.0], // magenta
    [1.0, 1.0, 0.0], // yellow
    [0.0, 1.0, 0.0], // green
    [1.0, 0.4, 0.0], // orange
    [1.0, 0.4, 0.6], // pink
    [0.4, 1.0, 0.4], // light green
    [0.4, 0.6, 1.0], // light blue
];

/// Color for the `index`-th target of a batch
pub fn target_color(index: usize) -> [f32; 3] {
    TARGET_COLORS[index % TARGET_COLORS.len()]
}

/// A recommendable product and the priorities it addresses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub priorities: Vec<String>,
    pub description: String,
}

impl Product {
    pub fn new(name: &str, priorities: &[&str], description: &str) -> Self {
        Self {
            name: name.to_string(),
            priorities: priorities.iter().map(|p| p.to_string()).collect(),
            description: description.to_string(),
        }
    }
}

/// Ordered product table; order breaks relevance ties
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(vec![
            Product::new(
                "Compliments Circle",
                &[
                    "Patient Experience",
                    "Improve Morale",
                    "Staff Satisfaction",
                    "HCAHPS Scores",
                ],
                "Build culture & boost morale through peer recognition",
            ),
            Product::new(
                "Care IQ",
                &[
                    "Sepsis Prevention",
                    "Fall Prevention",
                    "Decrease HAC Rate",
                    "Workplace Safety",
                    "Hand Hygiene",
                    "Medication Safety",
                    "Patient Safety",
                    "Infection Control",
                ],
                "Clinical excellence & safety training gamified",
            ),
            Product::new(
                "Living Legends",
                &[
                    "Sense of Belonging",
                    "Recognition & Appreciation",
                    "Improve Morale",
                    "Staff Satisfaction",
                ],
                "Celebrate achievements & build belonging",
            ),
            Product::new(
                "New Hire Navigator",
                &["Retention", "Leadership Development", "New Hire Mentorship"],
                "Onboarding & retention through mentorship",
            ),
            Product::new(
                "Shift Pickup",
                &[
                    "Reduce Contract Labor",
                    "Fill Open Shifts",
                    "Reduce Call-ins & No-shows",
                ],
                "Fill shifts & reduce contract labor costs",
            ),
            Product::new(
                "Charting Champs",
                &["Documentation Adherence", "Recognition & Appreciation"],
                "Gamify documentation compliance",
            ),
        ])
    }
}
