//! Ordered decision rules
//!
//! Each rule pairs a predicate over the color votes and shape metrics with
//! the outcome it produces and the reason it exists. Rules are evaluated
//! top-down and the first match wins, so the table order is the priority.

use super::{DominantColor, SpiceClass};
use crate::analysis::{PixelVote, ShapeMetrics};
use crate::config::DecisionConfig;

/// Rule predicate over the gathered evidence
pub type Predicate = fn(&PixelVote, &ShapeMetrics, &DecisionConfig) -> bool;

/// One entry of the decision table
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub predicate: Predicate,
    pub class: SpiceClass,
    pub dominant_color: DominantColor,
    pub rationale: &'static str,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("class", &self.class)
            .field("dominant_color", &self.dominant_color)
            .finish_non_exhaustive()
    }
}

impl Rule {
    pub fn matches(&self, vote: &PixelVote, shape: &ShapeMetrics, config: &DecisionConfig) -> bool {
        (self.predicate)(vote, shape, config)
    }
}

fn green_signal(vote: &PixelVote, _: &ShapeMetrics, config: &DecisionConfig) -> bool {
    vote.pct_green > config.green_pct
}

fn red_signal(vote: &PixelVote, _: &ShapeMetrics, config: &DecisionConfig) -> bool {
    vote.pct_red > config.red_pct
}

/// Elongated, non-convex or thin outline
fn chili_shaped(shape: &ShapeMetrics, config: &DecisionConfig) -> bool {
    shape.aspect_ratio > config.chili_aspect_ratio
        || shape.solidity < config.chili_max_solidity
        || shape.circularity < config.chili_max_circularity
}

fn red_elongated(vote: &PixelVote, shape: &ShapeMetrics, config: &DecisionConfig) -> bool {
    red_signal(vote, shape, config) && chili_shaped(shape, config)
}

fn always(_: &PixelVote, _: &ShapeMetrics, _: &DecisionConfig) -> bool {
    true
}

/// The fixed-priority table: green, red by shape, then the white default
pub fn default_rules() -> Vec<Rule> {
    vec![
        Rule {
            name: "green-signal",
            predicate: green_signal,
            class: SpiceClass::ChiliGreen,
            dominant_color: DominantColor::Green,
            rationale: "green chili skin rarely shows glare, so a small green share is already reliable",
        },
        Rule {
            name: "red-elongated",
            predicate: red_elongated,
            class: SpiceClass::ChiliRed,
            dominant_color: DominantColor::Red,
            rationale: "strong red on an elongated, curved or thin body",
        },
        Rule {
            name: "red-compact",
            predicate: red_signal,
            class: SpiceClass::Shallot,
            dominant_color: DominantColor::Red,
            rationale: "strong red on a compact, convex, near-circular body",
        },
        Rule {
            name: "white-default",
            predicate: always,
            class: SpiceClass::Garlic,
            dominant_color: DominantColor::White,
            rationale: "neither red nor green evidence is strong enough",
        },
    ]
}
