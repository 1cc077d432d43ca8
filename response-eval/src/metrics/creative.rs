//! Open-ended, strategic and creative responses

use super::{bounded, CalculatorSet, Metric, ScoringContext};
use crate::profile::patterns::matched_points;
use crate::profile::TaskType;

const COHERENCE_POINTS: f64 = 20.0;
const DIVERSITY_POINTS: f64 = 15.0;
const CREATIVITY_BLEND: f64 = 0.5;

/// Blends lexical coherence and vocabulary richness into the table scores
#[derive(Debug, Clone, Copy, Default)]
pub struct CreativeCalculators;

impl CalculatorSet for CreativeCalculators {
    fn task_type(&self) -> TaskType {
        TaskType::Creative
    }

    fn organization_quality(&self, ctx: &ScoringContext<'_>) -> f64 {
        let coherence = ctx.signals.coherence.overall;
        bounded(ctx.rule_score(Metric::OrganizationQuality) + COHERENCE_POINTS * coherence)
    }

    /// Logical-coherence markers blended with creativity markers
    fn technical_accuracy(&self, ctx: &ScoringContext<'_>) -> f64 {
        let creativity = matched_points(ctx.profile.patterns.creativity_markers(), ctx.sample);
        bounded(ctx.rule_score(Metric::TechnicalAccuracy) + CREATIVITY_BLEND * creativity)
    }

    fn thoroughness(&self, ctx: &ScoringContext<'_>) -> f64 {
        let threshold = ctx.settings.vocabulary_diversity_threshold;
        let richness = if threshold > 0.0 {
            (ctx.signals.vocabulary_diversity / threshold).min(1.0)
        } else {
            1.0
        };
        bounded(ctx.rule_score(Metric::Thoroughness) + DIVERSITY_POINTS * richness)
    }
}
