//! Reasoning and analysis responses

use super::{bounded, CalculatorSet, Metric, ScoringContext};
use crate::profile::TaskType;

const FORMATTING_SHARE: f64 = 0.2;

/// Credits document structure and the profile's reasoning-style emphasis
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticalCalculators;

impl CalculatorSet for AnalyticalCalculators {
    fn task_type(&self) -> TaskType {
        TaskType::Analytical
    }

    fn organization_quality(&self, ctx: &ScoringContext<'_>) -> f64 {
        bounded(
            ctx.rule_score(Metric::OrganizationQuality)
                + FORMATTING_SHARE * ctx.signals.formatting,
        )
    }

    fn domain_appropriateness(&self, ctx: &ScoringContext<'_>) -> f64 {
        bounded(ctx.rule_score(Metric::DomainAppropriateness) + ctx.emphasis_bonus())
    }

    fn notes(&self, ctx: &ScoringContext<'_>) -> Vec<String> {
        let matched = ctx
            .profile
            .emphasis
            .iter()
            .filter(|i| i.matches(ctx.sample))
            .count();
        if ctx.profile.emphasis.is_empty() {
            Vec::new()
        } else {
            vec![format!(
                "{} of {} {} indicators present",
                matched,
                ctx.profile.emphasis.len(),
                ctx.profile.name
            )]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{LexicalSignals, TextSample};
    use crate::config::EvalConfig;
    use crate::profile::ProfileResolver;

    #[test]
    fn test_emphasis_raises_domain_score() {
        let config = EvalConfig::default();
        let resolver = ProfileResolver::from_config(&config).unwrap();
        let sample = TextSample::new(
            "Step 1: list the facts. First, the train leaves at noon. Second, it travels \
             at 60 km/h. Third, the distance is 180 km. Then it arrives three hours later, \
             therefore at 3 pm.",
        );
        let signals = LexicalSignals::analyze(&sample);

        let score = |name: &str| {
            let profile = resolver.profile(name).unwrap();
            let ctx = ScoringContext {
                sample: &sample,
                signals: &signals,
                profile: &profile,
                settings: &config.text_analysis,
            };
            (
                AnalyticalCalculators.domain_appropriateness(&ctx),
                AnalyticalCalculators.notes(&ctx),
            )
        };

        let (plain, plain_notes) = score("analytical");
        let (guided, guided_notes) = score("chain_of_thought");
        assert!(guided > plain);
        assert!(plain_notes.is_empty());
        assert_eq!(guided_notes.len(), 1);
        assert!(guided_notes[0].ends_with("of 10 chain_of_thought indicators present"));
    }
}
