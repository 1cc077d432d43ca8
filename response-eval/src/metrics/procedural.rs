//! Command-line and system administration responses

use super::{CalculatorSet, Metric, ScoringContext};
use crate::profile::TaskType;

/// Rewards known-good command patterns; dangerous commands subtract their
/// penalty points from technical accuracy.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProceduralCalculators;

impl CalculatorSet for ProceduralCalculators {
    fn task_type(&self) -> TaskType {
        TaskType::Procedural
    }

    fn notes(&self, ctx: &ScoringContext<'_>) -> Vec<String> {
        ctx.profile
            .patterns
            .rule(Metric::TechnicalAccuracy)
            .matched_penalties(ctx.sample)
            .into_iter()
            .map(|pattern| format!("dangerous pattern: {}", pattern))
            .collect()
    }
}
