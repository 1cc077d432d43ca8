//! Fallback calculators for uncategorized responses

use super::{bounded, CalculatorSet, Metric, ScoringContext};
use crate::profile::TaskType;

const FORMATTING_SHARE: f64 = 0.2;
const TRANSITION_POINTS: f64 = 15.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct GeneralCalculators;

impl CalculatorSet for GeneralCalculators {
    fn task_type(&self) -> TaskType {
        TaskType::General
    }

    fn organization_quality(&self, ctx: &ScoringContext<'_>) -> f64 {
        bounded(
            ctx.rule_score(Metric::OrganizationQuality)
                + FORMATTING_SHARE * ctx.signals.formatting,
        )
    }

    /// Logic connectors plus sentence-to-sentence flow
    fn technical_accuracy(&self, ctx: &ScoringContext<'_>) -> f64 {
        bounded(
            ctx.rule_score(Metric::TechnicalAccuracy)
                + TRANSITION_POINTS * ctx.signals.coherence.transition_quality,
        )
    }
}
