//! Prompt templates for Sayso.
//!
//! Templates use `{{name}}` placeholders and can be overridden in the `[prompts]`
//! section of the config file.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Prompt templates used by the summarizer and the analyzer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Prompts {
    /// System prompt for the chat summarizer.
    pub summary_system: String,
    /// Directive prepended to the merged context. Supports `{{keyword}}`.
    pub keyword_directive: String,
    /// Directive prepended to the joined chunk summaries before the final pass.
    pub combine_directive: String,
}

impl Default for Prompts {
    fn default() -> Self {
        Self {
            summary_system: r#"You summarize excerpts from video transcripts.

Guidelines:
- Use only the text you are given; never add outside facts
- Write two to four plain sentences
- Keep the speaker's own claims and numbers
- Do not mention that you are reading a transcript"#
                .to_string(),
            keyword_directive: "Summarize what the speaker said about {{keyword}}: ".to_string(),
            combine_directive: "Summarize the following points: ".to_string(),
        }
    }
}

impl Prompts {
    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// The keyword directive with `{{keyword}}` filled in.
    pub fn keyword_directive_for(&self, keyword: &str) -> String {
        let mut vars = HashMap::new();
        vars.insert("keyword".to_string(), keyword.to_string());
        Self::render(&self.keyword_directive, &vars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(!prompts.summary_system.is_empty());
        assert!(prompts.keyword_directive.contains("{{keyword}}"));
    }

    #[test]
    fn test_render_template() {
        let template = "Hello {{name}}, you have {{count}} messages.";
        let mut vars = HashMap::new();
        vars.insert("name".to_string(), "Alice".to_string());
        vars.insert("count".to_string(), "5".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Hello Alice, you have 5 messages.");
    }

    #[test]
    fn test_keyword_directive() {
        let prompts = Prompts::default();
        assert_eq!(
            prompts.keyword_directive_for("cats"),
            "Summarize what the speaker said about cats: "
        );
    }
}
