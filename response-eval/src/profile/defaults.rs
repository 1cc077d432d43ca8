//! Built-in profiles, strategies and indicator tables

use indexmap::IndexMap;

use super::patterns::{Indicator, MetricRule, PatternSet, PatternTable, ReasoningLexicon};
use super::{ProfileConfig, TaskType};
use crate::ensemble::EvaluationStrategy;
use crate::metrics::Metric;

/// Current revision of the built-in pattern table
pub const PATTERN_TABLE_VERSION: u32 = 3;

fn phrases(list: &[(&str, f64)]) -> Vec<Indicator> {
    list.iter().map(|(p, pts)| Indicator::phrase(*p, *pts)).collect()
}

fn flat(list: &[&str], points: f64) -> Vec<Indicator> {
    list.iter().map(|p| Indicator::phrase(*p, points)).collect()
}

fn exact(list: &[(&str, f64)]) -> Vec<Indicator> {
    list.iter().map(|(p, pts)| Indicator::exact(*p, *pts)).collect()
}

fn words(list: &[&str], points: f64) -> Vec<Indicator> {
    list.iter().map(|w| Indicator::word(*w, points)).collect()
}

fn strings(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn weights(values: [f64; 7]) -> IndexMap<String, f64> {
    Metric::ALL
        .iter()
        .zip(values)
        .map(|(metric, w)| (metric.as_str().to_string(), w))
        .collect()
}

pub fn default_pattern_table() -> PatternTable {
    PatternTable {
        version: PATTERN_TABLE_VERSION,
        lexicon: default_lexicon(),
        procedural: procedural_patterns(),
        creative: creative_patterns(),
        analytical: analytical_patterns(),
        general: general_patterns(),
    }
}

fn default_lexicon() -> ReasoningLexicon {
    ReasoningLexicon {
        step: strings(&[
            "first", "second", "third", "next", "then", "finally", "step 1", "step 2", "step 3",
        ]),
        logic: strings(&[
            "because",
            "therefore",
            "consequently",
            "thus",
            "hence",
            "as a result",
            "due to",
            "since",
            "given that",
        ]),
        evidence: strings(&[
            "according to",
            "based on",
            "evidence shows",
            "data indicates",
            "studies show",
            "research suggests",
        ]),
        verification: strings(&[
            "verify",
            "validate",
            "confirm",
            "double-check",
            "review",
            "examine",
            "challenge",
            "question",
        ]),
        hedging: strings(&[
            "might",
            "perhaps",
            "possibly",
            "it seems",
            "arguably",
            "likely",
            "unclear",
            "not sure",
        ]),
        certainty: strings(&[
            "definitely",
            "certainly",
            "clearly",
            "undoubtedly",
            "without doubt",
            "always",
            "never",
            "guaranteed",
        ]),
    }
}

fn procedural_patterns() -> PatternSet {
    let mut organization = vec![Indicator::phrase("#!/bin/bash", 8.0)];
    organization.extend(words(&["if", "then", "else", "for", "while"], 8.0));
    organization.extend(flat(&["&&", "||", "sudo", "systemctl", "grep", "awk", "sed"], 8.0));

    PatternSet {
        organization_quality: MetricRule::new(20.0, 40.0, organization),
        technical_accuracy: MetricRule::new(
            30.0,
            35.0,
            flat(
                &[
                    "sudo", "systemctl", "chmod", "chown", "grep -", "awk", "sed", "ps aux",
                    "netstat", "ss -", "iptables", "firewall", "crontab",
                ],
                12.0,
            ),
        )
        .with_penalties(vec![
            Indicator::regex(r"(?m)rm\s+-(?:rf|fr)\s+/(?:\s|\*|$)", 30.0),
            Indicator::phrase("chmod 777", 30.0),
            Indicator::exact("* * * * *", 30.0),
            Indicator::phrase("> /dev/null 2>&1", 30.0),
        ]),
        completeness: MetricRule::new(
            50.0,
            45.0,
            flat(
                &[
                    "#!/bin/bash",
                    "error handling",
                    "logging",
                    "exit",
                    "return",
                    "status",
                    "check",
                    "validate",
                    "test",
                    "backup",
                    "monitoring",
                ],
                10.0,
            ),
        ),
        thoroughness: MetricRule::new(
            40.0,
            40.0,
            phrases(&[
                ("explanation", 12.0),
                ("comment", 8.0),
                ("documentation", 15.0),
                ("verbose", 10.0),
                ("detailed", 12.0),
                ("comprehensive", 15.0),
                ("step-by-step", 12.0),
                ("example", 10.0),
                ("troubleshooting", 12.0),
                ("debugging", 12.0),
                ("configuration", 10.0),
            ]),
        ),
        reliability: MetricRule::new(
            60.0,
            30.0,
            phrases(&[
                ("backup", 12.0),
                ("error", 8.0),
                ("check", 10.0),
                ("validate", 12.0),
                ("secure", 10.0),
                ("permission", 10.0),
                ("log", 8.0),
                ("monitor", 10.0),
                ("test", 10.0),
                ("verify", 12.0),
                ("robust", 15.0),
                ("stable", 12.0),
                ("reliable", 15.0),
                ("safe", 8.0),
            ]),
        ),
        scope_coverage: MetricRule::new(
            25.0,
            60.0,
            phrases(&[
                ("requirement", 8.0),
                ("specification", 10.0),
                ("edge case", 12.0),
                ("exception", 10.0),
                ("alternative", 8.0),
                ("option", 8.0),
                ("parameter", 8.0),
                ("configuration", 10.0),
                ("scenario", 8.0),
                ("use case", 10.0),
                ("implementation", 8.0),
                ("deployment", 10.0),
            ]),
        ),
        domain_appropriateness: MetricRule::new(
            80.0,
            25.0,
            phrases(&[
                ("command", 6.0),
                ("script", 8.0),
                ("bash", 8.0),
                ("shell", 6.0),
                ("system", 6.0),
                ("service", 8.0),
                ("daemon", 10.0),
                ("process", 6.0),
                ("file", 4.0),
                ("directory", 6.0),
                ("permission", 8.0),
                ("user", 4.0),
                ("group", 6.0),
                ("network", 6.0),
                ("server", 6.0),
                ("configuration", 8.0),
                ("administration", 10.0),
                ("management", 6.0),
                ("monitoring", 8.0),
            ]),
        ),
        creativity_markers: Vec::new(),
    }
}

fn creative_patterns() -> PatternSet {
    let mut organization = exact(&[("\n\n", 5.0)]);
    organization.extend(phrases(&[
        ("first", 8.0),
        ("second", 6.0),
        ("third", 6.0),
        ("finally", 8.0),
        ("however", 6.0),
        ("therefore", 6.0),
        ("in conclusion", 10.0),
        ("on the other hand", 8.0),
        ("furthermore", 6.0),
        ("moreover", 6.0),
    ]));

    PatternSet {
        organization_quality: MetricRule::new(20.0, 40.0, organization),
        technical_accuracy: MetricRule::new(
            30.0,
            35.0,
            flat(
                &[
                    "because",
                    "since",
                    "therefore",
                    "however",
                    "although",
                    "furthermore",
                    "moreover",
                    "consequently",
                    "nevertheless",
                    "meanwhile",
                ],
                8.0,
            ),
        ),
        completeness: MetricRule::new(
            50.0,
            45.0,
            phrases(&[
                ("requirement", 12.0),
                ("constraint", 12.0),
                ("criteria", 10.0),
                ("aspect", 8.0),
                ("dimension", 10.0),
                ("perspective", 10.0),
                ("approach", 8.0),
                ("consideration", 8.0),
                ("alternative", 10.0),
                ("option", 8.0),
                ("comprehensive", 15.0),
                ("thorough", 12.0),
                ("complete", 10.0),
                ("detailed", 8.0),
                ("extensive", 10.0),
            ]),
        ),
        thoroughness: MetricRule::new(
            40.0,
            40.0,
            phrases(&[
                ("explore", 10.0),
                ("consider", 8.0),
                ("alternative", 10.0),
                ("perspective", 10.0),
                ("angle", 8.0),
                ("approach", 8.0),
                ("innovative", 15.0),
                ("unique", 12.0),
                ("original", 12.0),
                ("creative", 10.0),
                ("imagination", 12.0),
                ("inventive", 12.0),
                ("novel", 10.0),
                ("unconventional", 15.0),
                ("breakthrough", 15.0),
                ("pioneering", 12.0),
            ]),
        ),
        reliability: MetricRule::new(
            60.0,
            30.0,
            phrases(&[
                ("consistent", 12.0),
                ("coherent", 12.0),
                ("logical", 10.0),
                ("reasonable", 10.0),
                ("appropriate", 10.0),
                ("suitable", 10.0),
                ("relevant", 10.0),
                ("applicable", 10.0),
                ("feasible", 12.0),
                ("practical", 10.0),
                ("viable", 12.0),
                ("realistic", 10.0),
                ("balanced", 10.0),
                ("proportionate", 12.0),
                ("well-reasoned", 15.0),
            ]),
        ),
        scope_coverage: MetricRule::new(
            35.0,
            70.0,
            phrases(&[
                ("aspect", 8.0),
                ("dimension", 10.0),
                ("perspective", 10.0),
                ("viewpoint", 10.0),
                ("angle", 8.0),
                ("consideration", 10.0),
                ("factor", 8.0),
                ("element", 8.0),
                ("possibility", 10.0),
                ("scenario", 8.0),
                ("variation", 10.0),
                ("option", 8.0),
                ("opportunity", 8.0),
                ("potential", 8.0),
                ("implication", 10.0),
            ]),
        ),
        domain_appropriateness: MetricRule::new(
            80.0,
            25.0,
            phrases(&[
                ("creative", 8.0),
                ("innovative", 10.0),
                ("original", 10.0),
                ("unique", 8.0),
                ("artistic", 10.0),
                ("imaginative", 10.0),
                ("inventive", 10.0),
                ("novel", 10.0),
                ("unconventional", 12.0),
                ("alternative", 8.0),
                ("breakthrough", 15.0),
                ("pioneering", 12.0),
                ("visionary", 15.0),
                ("groundbreaking", 15.0),
                ("revolutionary", 12.0),
                ("transformative", 12.0),
            ]),
        ),
        creativity_markers: phrases(&[
            ("innovative", 10.0),
            ("original", 10.0),
            ("unique", 8.0),
            ("imaginative", 10.0),
            ("novel", 10.0),
            ("unconventional", 12.0),
            ("what if", 8.0),
            ("reimagine", 10.0),
            ("metaphor", 8.0),
            ("inventive", 10.0),
        ]),
    }
}

fn analytical_patterns() -> PatternSet {
    let mut organization = phrases(&[
        ("introduction", 15.0),
        ("conclusion", 15.0),
        ("analysis", 12.0),
        ("summary", 10.0),
        ("overview", 10.0),
        ("methodology", 12.0),
        ("framework", 15.0),
        ("approach", 8.0),
        ("findings", 10.0),
    ]);
    organization.extend(exact(&[
        ("###", 10.0),
        ("##", 8.0),
        ("**", 5.0),
        ("| ", 15.0),
        ("1.", 8.0),
        ("2.", 6.0),
        ("3.", 6.0),
        ("- ", 5.0),
        ("• ", 5.0),
    ]));
    organization.extend(phrases(&[
        ("step", 6.0),
        ("first", 6.0),
        ("next", 4.0),
        ("then", 4.0),
        ("finally", 8.0),
        ("therefore", 6.0),
        ("thus", 6.0),
        ("hence", 6.0),
    ]));

    let mut technical = phrases(&[
        // logical connectors
        ("therefore", 10.0),
        ("consequently", 12.0),
        ("hence", 10.0),
        ("thus", 8.0),
        ("it follows that", 15.0),
        ("given that", 10.0),
        ("assuming", 8.0),
        ("conversely", 10.0),
        ("nevertheless", 10.0),
        ("furthermore", 8.0),
        // expertise
        ("analysis", 8.0),
        ("framework", 12.0),
        ("methodology", 15.0),
        ("systematic", 10.0),
        ("comprehensive", 10.0),
        ("empirical", 12.0),
        ("theoretical", 12.0),
        ("paradigm", 15.0),
        ("hypothesis", 12.0),
        ("premise", 10.0),
        ("conclusion", 8.0),
        ("inference", 10.0),
        ("deduction", 12.0),
        ("induction", 10.0),
        ("synthesis", 12.0),
        ("evaluation", 8.0),
        // professional terms
        ("equilibrium", 15.0),
        ("optimization", 12.0),
        ("correlation", 10.0),
        ("statistical", 10.0),
        ("probability", 12.0),
        ("strategy", 8.0),
        ("implementation", 8.0),
        ("assessment", 8.0),
        ("protocol", 10.0),
        ("specification", 10.0),
        ("validation", 12.0),
        ("verification", 12.0),
        // quantitative vocabulary
        ("percentage", 6.0),
        ("ratio", 8.0),
        ("coefficient", 12.0),
        ("variable", 8.0),
        ("parameter", 10.0),
        ("metric", 8.0),
    ]);
    technical.push(Indicator::regex(r"\d+%", 8.0));
    technical.push(Indicator::regex(r"\d+\.\d+", 5.0));

    PatternSet {
        organization_quality: MetricRule::new(20.0, 40.0, organization),
        technical_accuracy: MetricRule::new(30.0, 35.0, technical),
        completeness: MetricRule::new(
            50.0,
            45.0,
            phrases(&[
                // evidence
                ("evidence", 10.0),
                ("data", 8.0),
                ("according to", 12.0),
                ("based on", 10.0),
                ("research shows", 15.0),
                ("studies indicate", 15.0),
                ("analysis reveals", 12.0),
                ("findings suggest", 12.0),
                ("results demonstrate", 15.0),
                ("investigation shows", 12.0),
                // breadth of analysis
                ("multiple", 8.0),
                ("various", 8.0),
                ("several", 6.0),
                ("different", 6.0),
                ("range", 8.0),
                ("spectrum", 10.0),
                ("comprehensive", 15.0),
                ("extensive", 10.0),
                ("thorough", 12.0),
                ("complete", 8.0),
                ("detailed", 8.0),
                ("in-depth", 12.0),
                // perspectives
                ("perspective", 10.0),
                ("viewpoint", 10.0),
                ("angle", 8.0),
                ("standpoint", 10.0),
                ("approach", 8.0),
                ("lens", 10.0),
                ("framework", 12.0),
                ("context", 8.0),
                ("dimension", 10.0),
                ("aspect", 8.0),
                ("facet", 10.0),
                ("component", 8.0),
                // synthesis
                ("synthesis", 15.0),
                ("integration", 12.0),
                ("combination", 10.0),
                ("merge", 8.0),
                ("consolidation", 12.0),
                ("unification", 12.0),
                ("convergence", 10.0),
                ("connection", 8.0),
                ("relationship", 8.0),
                ("correlation", 10.0),
                ("interdependence", 12.0),
            ]),
        ),
        thoroughness: MetricRule::new(
            40.0,
            40.0,
            phrases(&[
                ("analyze", 12.0),
                ("synthesize", 15.0),
                ("evaluate", 12.0),
                ("interpret", 10.0),
                ("assess", 10.0),
                ("examine", 10.0),
                ("investigate", 12.0),
                ("scrutinize", 15.0),
                ("dissect", 12.0),
                ("deconstruct", 15.0),
                ("unpack", 10.0),
                ("elaborate", 8.0),
                ("rigorous", 15.0),
                ("systematic", 12.0),
                ("methodical", 12.0),
                ("meticulous", 15.0),
                ("precise", 10.0),
                ("accurate", 8.0),
                ("careful", 8.0),
                ("thorough", 12.0),
                ("comprehensive", 12.0),
                ("exhaustive", 15.0),
                ("detailed", 8.0),
                ("extensive", 10.0),
                ("complex", 10.0),
                ("sophisticated", 15.0),
                ("nuanced", 15.0),
                ("multifaceted", 15.0),
                ("intricate", 12.0),
                ("profound", 15.0),
                ("deep", 8.0),
                ("intensive", 12.0),
                ("substantial", 10.0),
                ("implications", 12.0),
                ("consequences", 12.0),
                ("ramifications", 15.0),
                ("significance", 10.0),
                ("importance", 8.0),
                ("relevance", 8.0),
                ("application", 10.0),
                ("implementation", 10.0),
                ("practical", 8.0),
                ("theoretical", 10.0),
                ("empirical", 12.0),
                ("conceptual", 10.0),
            ]),
        ),
        reliability: MetricRule::new(
            60.0,
            30.0,
            phrases(&[
                // verification
                ("verify", 12.0),
                ("check", 8.0),
                ("confirm", 10.0),
                ("validate", 12.0),
                ("double-check", 15.0),
                ("review", 8.0),
                ("examine", 8.0),
                ("test", 8.0),
                ("audit", 12.0),
                ("inspect", 10.0),
                ("scrutinize", 15.0),
                ("cross-check", 15.0),
                ("re-examine", 12.0),
                // quality
                ("accurate", 12.0),
                ("precise", 12.0),
                ("correct", 10.0),
                ("reliable", 15.0),
                ("trustworthy", 15.0),
                ("credible", 12.0),
                ("valid", 10.0),
                ("sound", 10.0),
                ("robust", 12.0),
                ("rigorous", 15.0),
                ("consistent", 12.0),
                ("coherent", 10.0),
                ("logical", 10.0),
                ("systematic", 12.0),
                // self-correction
                ("revise", 12.0),
                ("refine", 12.0),
                ("improve", 8.0),
                ("enhance", 8.0),
                ("optimize", 10.0),
                ("adjust", 8.0),
                ("modify", 8.0),
                ("update", 8.0),
                ("amend", 10.0),
                ("clarify", 10.0),
                ("specify", 8.0),
                ("on reflection", 12.0),
                ("let me reconsider", 15.0),
                ("i may have", 10.0),
                // stated confidence
                ("confident", 10.0),
                ("certain", 10.0),
                ("definite", 10.0),
                ("evident", 10.0),
                ("established", 12.0),
                ("proven", 12.0),
                ("demonstrated", 12.0),
                ("confirmed", 10.0),
                ("verified", 12.0),
            ]),
        ),
        scope_coverage: MetricRule::new(
            40.0,
            60.0,
            phrases(&[
                ("comprehensive", 12.0),
                ("extensive", 10.0),
                ("broad", 8.0),
                ("wide", 8.0),
                ("range", 8.0),
                ("spectrum", 10.0),
                ("variety", 8.0),
                ("diverse", 8.0),
                ("multiple", 8.0),
                ("various", 8.0),
                ("different", 6.0),
                ("several", 6.0),
                ("coverage", 10.0),
                ("includes", 6.0),
                ("encompasses", 10.0),
                ("addresses", 8.0),
                ("covers", 6.0),
                ("spans", 8.0),
                ("extends", 8.0),
                ("incorporates", 8.0),
                ("considers", 8.0),
                ("examines", 8.0),
                ("explores", 8.0),
                ("discusses", 6.0),
                ("interdisciplinary", 15.0),
                ("cross-disciplinary", 15.0),
                ("multi-faceted", 12.0),
                ("holistic", 12.0),
                ("integrated", 10.0),
                ("multidimensional", 15.0),
            ]),
        ),
        domain_appropriateness: MetricRule::new(
            80.0,
            25.0,
            phrases(&[
                ("analysis", 8.0),
                ("conclusion", 8.0),
                ("logic", 8.0),
                ("reasoning", 10.0),
                ("inference", 10.0),
                ("deduction", 10.0),
                ("induction", 10.0),
                ("argument", 8.0),
                ("evidence", 8.0),
                ("premise", 8.0),
                ("synthesis", 12.0),
                ("evaluation", 10.0),
                ("interpretation", 10.0),
                ("assessment", 8.0),
                ("paradigm", 15.0),
                ("framework", 12.0),
                ("methodology", 15.0),
                ("theoretical", 12.0),
                ("empirical", 12.0),
                ("systematic", 10.0),
                ("conceptual", 10.0),
                ("analytical", 10.0),
                ("epistemological", 20.0),
                ("ontological", 20.0),
                ("phenomenological", 20.0),
                ("philosophical", 12.0),
                ("metaphysical", 15.0),
                ("existential", 12.0),
                ("dialectical", 15.0),
                ("equilibrium", 15.0),
                ("optimization", 12.0),
                ("strategic", 10.0),
                ("tactical", 10.0),
                ("hypothesis", 12.0),
                ("statistical", 12.0),
                ("quantitative", 12.0),
                ("constitutional", 15.0),
                ("jurisprudence", 20.0),
                ("precedent", 12.0),
                ("statutory", 12.0),
                ("cognitive", 12.0),
                ("behavioral", 10.0),
                ("psychological", 12.0),
            ]),
        ),
        creativity_markers: Vec::new(),
    }
}

fn general_patterns() -> PatternSet {
    let mut organization = phrases(&[
        ("first", 6.0),
        ("second", 6.0),
        ("third", 6.0),
        ("finally", 8.0),
        ("step 1", 8.0),
        ("step 2", 6.0),
        ("step 3", 6.0),
        ("in summary", 8.0),
        ("in conclusion", 8.0),
    ]);
    organization.extend(words(&["next", "then"], 4.0));
    organization.extend(exact(&[("##", 8.0), ("1.", 6.0), ("- ", 5.0)]));

    let mut technical = phrases(&[
        ("because", 8.0),
        ("therefore", 10.0),
        ("consequently", 12.0),
        ("hence", 10.0),
        ("as a result", 10.0),
        ("due to", 8.0),
        ("given that", 10.0),
    ]);
    technical.extend(words(&["thus", "since"], 8.0));

    PatternSet {
        organization_quality: MetricRule::new(20.0, 40.0, organization),
        technical_accuracy: MetricRule::new(30.0, 35.0, technical),
        completeness: MetricRule::new(
            50.0,
            45.0,
            phrases(&[
                ("according to", 12.0),
                ("based on", 10.0),
                ("evidence shows", 15.0),
                ("data indicates", 15.0),
                ("studies show", 15.0),
                ("research suggests", 15.0),
                ("for example", 8.0),
                ("for instance", 8.0),
                ("evidence", 10.0),
            ]),
        ),
        thoroughness: MetricRule::new(
            40.0,
            40.0,
            phrases(&[
                ("analyze", 12.0),
                ("evaluate", 12.0),
                ("examine", 10.0),
                ("consider", 8.0),
                ("in detail", 10.0),
                ("implications", 12.0),
                ("consequences", 10.0),
                ("detailed", 8.0),
            ]),
        ),
        reliability: MetricRule::new(
            60.0,
            30.0,
            phrases(&[
                ("verify", 12.0),
                ("validate", 12.0),
                ("confirm", 10.0),
                ("double-check", 15.0),
                ("review", 8.0),
                ("examine", 8.0),
                ("challenge", 8.0),
                ("question", 6.0),
            ]),
        ),
        scope_coverage: MetricRule::new(
            40.0,
            60.0,
            phrases(&[
                ("multiple", 8.0),
                ("various", 8.0),
                ("several", 6.0),
                ("different", 6.0),
                ("alternative", 8.0),
                ("perspective", 10.0),
                ("aspect", 8.0),
            ]),
        ),
        domain_appropriateness: MetricRule::new(
            80.0,
            25.0,
            phrases(&[
                ("analysis", 8.0),
                ("conclusion", 8.0),
                ("reasoning", 10.0),
                ("argument", 8.0),
                ("evidence", 8.0),
                ("summary", 8.0),
                ("explanation", 8.0),
            ]),
        ),
        creativity_markers: Vec::new(),
    }
}

fn emphasis(keywords: &[&str], patterns: &[&str]) -> Vec<Indicator> {
    let mut indicators = flat(keywords, 15.0);
    indicators.extend(patterns.iter().map(|p| Indicator::regex(*p, 25.0)));
    indicators
}

fn profile(
    task_type: TaskType,
    values: [f64; 7],
    description: &str,
    emphasis: Vec<Indicator>,
) -> ProfileConfig {
    ProfileConfig {
        task_type,
        weights: weights(values),
        emphasis,
        description: description.to_string(),
    }
}

pub fn default_profiles() -> IndexMap<String, ProfileConfig> {
    let mut profiles = IndexMap::new();

    profiles.insert(
        "general".to_string(),
        profile(
            TaskType::General,
            [0.15, 0.20, 0.15, 0.15, 0.10, 0.10, 0.15],
            "Balanced weights for uncategorized responses",
            Vec::new(),
        ),
    );
    profiles.insert(
        "procedural".to_string(),
        profile(
            TaskType::Procedural,
            [0.20, 0.35, 0.15, 0.10, 0.15, 0.03, 0.02],
            "Command-line and system administration procedures",
            Vec::new(),
        ),
    );
    profiles.insert(
        "creative".to_string(),
        profile(
            TaskType::Creative,
            [0.15, 0.10, 0.20, 0.25, 0.15, 0.10, 0.05],
            "Open-ended, strategic and creative writing",
            Vec::new(),
        ),
    );
    profiles.insert(
        "analytical".to_string(),
        profile(
            TaskType::Analytical,
            [0.15, 0.20, 0.15, 0.15, 0.10, 0.10, 0.15],
            "General reasoning and analysis",
            Vec::new(),
        ),
    );
    profiles.insert(
        "chain_of_thought".to_string(),
        profile(
            TaskType::Analytical,
            [0.25, 0.25, 0.10, 0.15, 0.05, 0.10, 0.10],
            "Explicit step-by-step reasoning",
            emphasis(
                &["step", "first", "second", "then", "next", "finally", "therefore"],
                &[r"(?i)step \d+", r"(?is)first.+second.+third", r"(?is)then.+therefore"],
            ),
        ),
    );
    profiles.insert(
        "multi_hop".to_string(),
        profile(
            TaskType::Analytical,
            [0.10, 0.15, 0.30, 0.20, 0.05, 0.10, 0.10],
            "Evidence integration across several sources",
            emphasis(
                &["document", "source", "according to", "based on", "evidence from"],
                &[
                    r"document [A-Z]",
                    r"(?is)according to.+from.+",
                    r"(?is)evidence.+suggests.+because",
                ],
            ),
        ),
    );
    profiles.insert(
        "verification".to_string(),
        profile(
            TaskType::Analytical,
            [0.10, 0.15, 0.10, 0.15, 0.35, 0.05, 0.10],
            "Self-checking and validation of conclusions",
            emphasis(
                &["verify", "check", "confirm", "validate", "review", "double-check"],
                &[
                    r"(?is)let me.+check",
                    r"(?is)verify.+assumption",
                    r"(?is)review.+conclusion",
                ],
            ),
        ),
    );
    profiles.insert(
        "mathematical".to_string(),
        profile(
            TaskType::Analytical,
            [0.20, 0.30, 0.05, 0.20, 0.15, 0.05, 0.05],
            "Quantitative and probabilistic reasoning",
            emphasis(
                &["calculate", "equation", "formula", "probability", "statistics"],
                &[r"\d+%", r"(?is)probability.+\d", r"(?is)equation.+equals"],
            ),
        ),
    );
    profiles.insert(
        "backward".to_string(),
        profile(
            TaskType::Analytical,
            [0.15, 0.20, 0.20, 0.25, 0.10, 0.05, 0.05],
            "Reasoning from an outcome back to its causes",
            emphasis(
                &["work backward", "reverse", "trace", "reconstruct"],
                &[r"(?i)work(?:ing)? backwards?", r"(?is)starting from.+(?:result|outcome)"],
            ),
        ),
    );
    profiles.insert(
        "scaffolded".to_string(),
        profile(
            TaskType::Analytical,
            [0.30, 0.20, 0.15, 0.15, 0.10, 0.05, 0.05],
            "Staged analysis following a given structure",
            emphasis(
                &["analysis", "evidence", "reasoning", "conclusion"],
                &[r"(?i)(?:phase|stage|part) \d+", r"(?is)analysis.+evidence.+conclusion"],
            ),
        ),
    );

    profiles
}

pub fn default_strategies() -> Vec<EvaluationStrategy> {
    vec![
        EvaluationStrategy::new("standard"),
        EvaluationStrategy::new("conservative").with_bias(-0.2),
        EvaluationStrategy::new("aggressive").with_bias(0.2),
        EvaluationStrategy::new("analytical_lens").with_profile("analytical"),
        EvaluationStrategy::new("general_lens").with_profile("general"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_one() {
        for (name, profile) in default_profiles() {
            let sum: f64 = profile.weights.values().sum();
            assert!((sum - 1.0).abs() < 1e-6, "{} sums to {}", name, sum);
            assert_eq!(profile.weights.len(), 7, "{}", name);
        }
    }

    #[test]
    fn test_every_category_points_at_a_profile() {
        let profiles = default_profiles();
        for (category, profile) in super::super::default_categories() {
            assert!(profiles.contains_key(&profile), "{} -> {}", category, profile);
        }
    }

    #[test]
    fn test_dangerous_patterns_weigh_at_least_thirty() {
        let table = default_pattern_table();
        for penalty in &table.procedural.technical_accuracy.penalties {
            assert!(penalty.points >= 30.0);
        }
    }

    #[test]
    fn test_strategy_labels_are_unique() {
        let strategies = default_strategies();
        let mut labels: Vec<_> = strategies.iter().map(|s| s.label.as_str()).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), strategies.len());
    }
}
