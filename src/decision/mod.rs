//! Spice classification from color and shape evidence
//!
//! The [`Classifier`] walks an ordered table of [`rules::Rule`]s and stops
//! at the first one whose predicate holds.

pub mod rules;

use crate::analysis::{PixelVote, ShapeMetrics};
use crate::config::DecisionConfig;
use rules::{default_rules, Rule};
use serde::{Deserialize, Serialize};

/// Spice classes the classifier can predict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpiceClass {
    ChiliRed,
    ChiliGreen,
    Shallot,
    Garlic,
    Unrecognized,
}

impl SpiceClass {
    /// Display name
    pub fn label(&self) -> &'static str {
        match self {
            SpiceClass::ChiliRed => "RED CHILI",
            SpiceClass::ChiliGreen => "GREEN CHILI",
            SpiceClass::Shallot => "SHALLOT",
            SpiceClass::Garlic => "GARLIC",
            SpiceClass::Unrecognized => "UNRECOGNIZED",
        }
    }
}

impl std::fmt::Display for SpiceClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Color class that drove the decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DominantColor {
    Red,
    Green,
    White,
    Mixed,
}

impl DominantColor {
    pub fn label(&self) -> &'static str {
        match self {
            DominantColor::Red => "Red/Purple",
            DominantColor::Green => "Green",
            DominantColor::White => "White",
            DominantColor::Mixed => "Mixed",
        }
    }
}

impl std::fmt::Display for DominantColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of the decision table
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub class: SpiceClass,
    pub dominant_color: DominantColor,
    /// Name of the matching rule, `None` if no rule matched
    pub rule: Option<&'static str>,
    pub explanation: String,
}

impl Decision {
    /// Append the note shown when background pixels were discarded
    pub fn with_background_note(mut self) -> Self {
        self.explanation.push_str("\n(white background ignored)");
        self
    }
}

/// Fixed-priority classifier
#[derive(Debug, Clone)]
pub struct Classifier {
    config: DecisionConfig,
    rules: Vec<Rule>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(DecisionConfig::default())
    }
}

impl Classifier {
    /// Classifier over the default rule table
    pub fn new(config: DecisionConfig) -> Self {
        Self::with_rules(config, default_rules())
    }

    /// Classifier over a custom rule table, evaluated in order
    pub fn with_rules(config: DecisionConfig, rules: Vec<Rule>) -> Self {
        Self { config, rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Map the evidence to a class
    ///
    /// Falls back to `Unrecognized` / `Mixed` when no rule matches, which
    /// cannot happen with the default table.
    pub fn classify(&self, vote: &PixelVote, shape: &ShapeMetrics) -> Decision {
        let matched = self
            .rules
            .iter()
            .find(|rule| rule.matches(vote, shape, &self.config));

        let (class, dominant_color, rule) = match matched {
            Some(rule) => {
                tracing::debug!(rule = rule.name, rationale = rule.rationale, "rule matched");
                (rule.class, rule.dominant_color, Some(rule.name))
            }
            None => (SpiceClass::Unrecognized, DominantColor::Mixed, None),
        };

        Decision {
            class,
            dominant_color,
            rule,
            explanation: explain(class, dominant_color, shape),
        }
    }
}

fn explain(class: SpiceClass, dominant_color: DominantColor, shape: &ShapeMetrics) -> String {
    let mut text = format!(
        "Prediction: {}\nDominant color: {}\n",
        class.label(),
        dominant_color.label()
    );
    // Shape only decides within the red branch
    if dominant_color == DominantColor::Red {
        text.push_str(&format!(
            "Ratio: {:.2}, Solidity: {:.2}, Circularity: {:.2}",
            shape.aspect_ratio, shape.solidity, shape.circularity
        ));
    }
    text
}
