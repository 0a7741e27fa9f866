//! Prompt templates for tubeqa.
//!
//! Prompts can be customized by placing a `qa.toml` file in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Prompts {
    pub qa: QaPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// Prompts for question answering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QaPrompts {
    /// Answer only from the transcript context, or reply with the sentinel.
    pub strict: String,
    /// General-knowledge answer, used when the transcript has nothing.
    pub fallback: String,
}

impl Default for QaPrompts {
    fn default() -> Self {
        Self {
            strict: r#"Use ONLY the video context below to answer.
If answer is NOT in the context, respond EXACTLY: "NOT_FOUND"

Context:
{{context}}

Question:
{{question}}

Answer:
"#
            .to_string(),

            fallback: r#"You are a helpful, knowledgeable assistant.

If the user's question is NOT related to the video content:
- Give a complete, helpful general answer.
- DO NOT say things like:
   "I cannot see the video" or "provide a link" etc.

Just answer normally.

Question:
{{question}}

Answer:
"#
            .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let qa_path = custom_path.join("qa.toml");
            if qa_path.exists() {
                let content = std::fs::read_to_string(&qa_path)?;
                prompts.qa = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    ///
    /// The template is scanned once, so substituted text is never searched
    /// for further placeholders. Unknown placeholders are kept verbatim.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find("{{") {
            result.push_str(&rest[..start]);
            let after_open = &rest[start + 2..];

            match after_open.find("}}") {
                Some(end) => {
                    let key = &after_open[..end];
                    match vars.get(key) {
                        Some(value) => result.push_str(value),
                        None => {
                            result.push_str("{{");
                            result.push_str(key);
                            result.push_str("}}");
                        }
                    }
                    rest = &after_open[end + 2..];
                }
                None => {
                    result.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }

        result.push_str(rest);
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }

    /// The context-only prompt for a question.
    pub fn strict(&self, question: &str, context: &str) -> String {
        let mut vars = HashMap::new();
        vars.insert("question".to_string(), question.to_string());
        vars.insert("context".to_string(), context.to_string());
        self.render_with_custom(&self.qa.strict, &vars)
    }

    /// The general-knowledge prompt for a question.
    pub fn fallback(&self, question: &str) -> String {
        let mut vars = HashMap::new();
        vars.insert("question".to_string(), question.to_string());
        self.render_with_custom(&self.qa.fallback, &vars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rag::NOT_FOUND_SENTINEL;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(prompts.qa.strict.contains(NOT_FOUND_SENTINEL));
        assert!(!prompts.qa.fallback.contains(NOT_FOUND_SENTINEL));
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
    fn test_substituted_text_is_not_rendered_again() {
        let prompts = Prompts::default();

        for _ in 0..20 {
            let strict = prompts.strict("what does {{context}} mean?", "the transcript");
            assert!(strict.contains("Question:\nwhat does {{context}} mean?"));
            assert_eq!(strict.matches("the transcript").count(), 1);
        }
    }

    #[test]
    fn test_unknown_and_unclosed_placeholders_are_kept() {
        let mut vars = HashMap::new();
        vars.insert("name".to_string(), "Alice".to_string());

        assert_eq!(
            Prompts::render("{{name}} {{missing}} {{open", &vars),
            "Alice {{missing}} {{open"
        );
    }

    #[test]
    fn test_strict_and_fallback_fill_placeholders() {
        let prompts = Prompts::default();

        let strict = prompts.strict("what is said?", "hello world");
        assert!(strict.contains("Context:\nhello world"));
        assert!(strict.contains("Question:\nwhat is said?"));
        assert!(!strict.contains("{{"));

        let fallback = prompts.fallback("what is rust?");
        assert!(fallback.contains("Question:\nwhat is rust?"));
        assert!(!fallback.contains("{{"));
    }

    #[test]
    fn test_custom_variables_do_not_override_question() {
        let mut custom = HashMap::new();
        custom.insert("question".to_string(), "ignored".to_string());
        custom.insert("tone".to_string(), "friendly".to_string());

        let mut prompts = Prompts::load(None, Some(&custom)).unwrap();
        prompts.qa.fallback = "Be {{tone}}. {{question}}".to_string();

        assert_eq!(prompts.fallback("real"), "Be friendly. real");
    }

    #[test]
    fn test_load_custom_qa_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("qa.toml"),
            "fallback = \"Answer briefly: {{question}}\"\n",
        )
        .unwrap();

        let prompts = Prompts::load(dir.path().to_str(), None).unwrap();
        assert_eq!(prompts.fallback("why?"), "Answer briefly: why?");
        // strict keeps its default when the file omits it
        assert!(prompts.qa.strict.contains(NOT_FOUND_SENTINEL));
    }
}
