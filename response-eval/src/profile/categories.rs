//! Task type definitions and the static category table

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Closed set of task types; each selects one calculator set
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    /// System administration, shell and command-line procedures
    Procedural,
    /// Open-ended, strategic and creative writing
    Creative,
    /// Reasoning and analysis
    Analytical,
    /// Fallback for unknown or absent categories
    General,
}

impl TaskType {
    pub fn all() -> Vec<TaskType> {
        vec![
            TaskType::Procedural,
            TaskType::Creative,
            TaskType::Analytical,
            TaskType::General,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Procedural => "procedural",
            TaskType::Creative => "creative",
            TaskType::Analytical => "analytical",
            TaskType::General => "general",
        }
    }
}

impl Default for TaskType {
    fn default() -> Self {
        TaskType::General
    }
}

impl std::fmt::Display for TaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TaskType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_category(s).as_str() {
            "procedural" | "linux" | "sysadmin" => Ok(TaskType::Procedural),
            "creative" | "strategic" => Ok(TaskType::Creative),
            "analytical" | "reasoning" | "analysis" => Ok(TaskType::Analytical),
            "general" | "default" => Ok(TaskType::General),
            _ => Err(format!("Unknown task type: {}", s)),
        }
    }
}

/// Lowercase a category and fold `-` and whitespace into `_`
pub fn normalize_category(category: &str) -> String {
    category
        .trim()
        .chars()
        .map(|c| {
            if c == '-' || c.is_whitespace() {
                '_'
            } else {
                c.to_ascii_lowercase()
            }
        })
        .collect()
}

/// Find the profile for a normalized category.
///
/// Exact keys win; otherwise the longest key contained in the category is
/// used, ties broken by key order.
pub fn match_category<'a>(table: &'a IndexMap<String, String>, normalized: &str) -> Option<&'a str> {
    if normalized.is_empty() {
        return None;
    }
    if let Some(profile) = table.get(normalized) {
        return Some(profile.as_str());
    }

    table
        .iter()
        .filter(|(key, _)| !key.is_empty() && normalized.contains(key.as_str()))
        .max_by(|(a, _), (b, _)| a.len().cmp(&b.len()).then_with(|| b.cmp(a)))
        .map(|(_, profile)| profile.as_str())
}

/// Default category table shipped with the evaluator
pub fn default_categories() -> IndexMap<String, String> {
    let groups: [(&str, &[&str]); 10] = [
        (
            "procedural",
            &[
                "linux",
                "log_analysis",
                "containerization",
                "security",
                "monitoring",
                "backup",
                "service_management",
                "networking",
                "process_management",
                "system_management",
                "troubleshooting",
                "database",
                "deployment",
                "procedural",
                "sysadmin",
            ],
        ),
        (
            "creative",
            &["creative", "strategic", "ambiguity", "metacognitive", "constraint"],
        ),
        ("analytical", &["reasoning", "analytical", "analysis", "logic"]),
        ("chain_of_thought", &["chain_of_thought", "chain"]),
        ("multi_hop", &["multi_hop", "multi_source"]),
        ("verification", &["verification", "self_check"]),
        ("mathematical", &["mathematical", "probability"]),
        ("backward", &["backward", "reverse"]),
        ("scaffolded", &["scaffolded", "structured"]),
        ("general", &["general"]),
    ];

    let mut table = IndexMap::new();
    for (profile, categories) in groups {
        for category in categories {
            table.insert(category.to_string(), profile.to_string());
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_type_aliases() {
        assert_eq!("linux".parse::<TaskType>(), Ok(TaskType::Procedural));
        assert_eq!("Reasoning".parse::<TaskType>(), Ok(TaskType::Analytical));
        assert_eq!("strategic".parse::<TaskType>(), Ok(TaskType::Creative));
        assert!("poetry".parse::<TaskType>().is_err());
    }

    #[test]
    fn test_normalize_category() {
        assert_eq!(normalize_category(" Multi-Hop Reasoning "), "multi_hop_reasoning");
        assert_eq!(normalize_category("LOG_ANALYSIS"), "log_analysis");
    }

    #[test]
    fn test_match_category_prefers_exact_then_longest() {
        let table = default_categories();
        assert_eq!(match_category(&table, "log_analysis"), Some("procedural"));
        assert_eq!(match_category(&table, "reasoning"), Some("analytical"));
        assert_eq!(
            match_category(&table, "reasoning_chain_of_thought"),
            Some("chain_of_thought")
        );
        assert_eq!(match_category(&table, "basic_reasoning"), Some("analytical"));
        assert_eq!(match_category(&table, "poetry"), None);
        assert_eq!(match_category(&table, ""), None);
    }
}
