//! Markdown and document-structure scoring

/// Score professional formatting from 0 to 100.
///
/// Each structural feature contributes once; matching is case-sensitive.
pub fn formatting_score(text: &str) -> f64 {
    let mut score = 0.0;

    if text.contains("###") || text.contains("##") || text.contains("**") {
        score += 15.0;
    }
    if text.contains("# ") {
        score += 10.0;
    }
    if text.contains("| ") && text.matches('|').count() >= 6 {
        score += 20.0;
    }
    if text.contains("---") || text.contains("===") {
        score += 10.0;
    }
    if text.contains("1.") && text.contains("2.") && text.contains("3.") {
        score += 15.0;
    }
    if text.matches("- ").count() >= 3 || text.matches("• ").count() >= 3 {
        score += 10.0;
    }
    if text.contains("Part I") || text.contains("Section") || text.contains("Chapter") {
        score += 15.0;
    }
    if text.contains("Introduction") && text.contains("Conclusion") {
        score += 15.0;
    }
    if text.contains("```") {
        score += 10.0;
    }
    if text.matches('`').count() >= 4 {
        score += 5.0;
    }
    if text.contains("**Example:**") || text.contains("**Note:**") {
        score += 10.0;
    }
    if text.matches("\n\n").count() >= 5 {
        score += 10.0;
    }

    f64::min(score, 100.0)
}
