//! Prompt text sent to the generation service

use crate::abilities::{AbilityKind, MAX_SCORE};
use crate::tasks::Resolution;

/// Greeting shown when the service cannot produce one
pub const FALLBACK_WELCOME: &str = "Welcome to the task tracker! Finish tasks and your abilities \
will be analyzed and levelled up automatically.";

/// Build the classification prompt for one resolved task
pub fn classification_prompt(content: &str, resolution: Resolution) -> String {
    let status = match resolution {
        Resolution::Completed => "completed",
        Resolution::Abandoned => "abandoned",
    };

    let keys = AbilityKind::all()
        .iter()
        .map(|kind| format!("  \"{}\": score", kind.label()))
        .collect::<Vec<_>>()
        .join(",\n");
    let glossary = AbilityKind::all()
        .iter()
        .map(|kind| format!("- {} = {}", kind.label(), kind.name()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are a task analysis assistant. Score the task below against every ability on a 0.0-{max:.1} scale.

TASK: {content}
STATUS: {status}

ABILITIES:
{glossary}

Return strictly this JSON object:
{{
{keys}
}}

SCORING:
0.0 = unrelated
1.0 = slightly related
2.0 = somewhat related
3.0 = clearly related
4.0 = highly related
5.0 = entirely about this ability

Fractional scores such as 1.5 are allowed. Return valid JSON with decimal numbers only, no extra text."#,
        max = MAX_SCORE,
        content = content.trim(),
        status = status,
        glossary = glossary,
        keys = keys,
    )
}

/// Build the short greeting prompt
pub fn welcome_prompt() -> String {
    let names = AbilityKind::all()
        .iter()
        .map(|kind| kind.name())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Write a short, friendly welcome message for a to-do application. Mention that:\n\
         1. it tracks which tasks get completed\n\
         2. finished tasks are analyzed automatically to raise related abilities\n\
         3. the abilities are: {}\n\
         4. every ability has levels and experience\n\
         Keep it under 100 words.",
        names
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_lists_every_label() {
        let prompt = classification_prompt("write a poem", Resolution::Completed);
        for kind in AbilityKind::all() {
            assert!(prompt.contains(&format!("\"{}\"", kind.label())));
        }
        assert!(prompt.contains("TASK: write a poem"));
        assert!(prompt.contains("STATUS: completed"));
    }

    #[test]
    fn test_prompt_marks_abandoned() {
        let prompt = classification_prompt("run 10km", Resolution::Abandoned);
        assert!(prompt.contains("STATUS: abandoned"));
    }

    #[test]
    fn test_welcome_prompt_names_abilities() {
        let prompt = welcome_prompt();
        assert!(prompt.contains("Financial Sense"));
        assert!(prompt.contains("Unknown Force"));
    }
}
