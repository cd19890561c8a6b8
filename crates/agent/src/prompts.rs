use serde_json::{Map, Value};
use tera::{Context, Tera};
use thiserror::Error;

use callcenter_core::domain::intent::Intent;
use callcenter_core::domain::tool::ToolId;

const INTENT_TEMPLATE: &str = "intent.txt.tera";
const SENTIMENT_TEMPLATE: &str = "sentiment.txt.tera";
const PARAPHRASE_TEMPLATE: &str = "paraphrase.txt.tera";
const GENERAL_TEMPLATE: &str = "general.txt.tera";

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("template error: {0}")]
    Template(String),
}

/// Prompt templates compiled into the binary.
#[derive(Clone, Debug)]
pub struct PromptLibrary {
    tera: Tera,
}

impl PromptLibrary {
    pub fn new() -> Result<Self, PromptError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            (INTENT_TEMPLATE, include_str!("../templates/intent.txt.tera")),
            (SENTIMENT_TEMPLATE, include_str!("../templates/sentiment.txt.tera")),
            (PARAPHRASE_TEMPLATE, include_str!("../templates/paraphrase.txt.tera")),
            (GENERAL_TEMPLATE, include_str!("../templates/general.txt.tera")),
        ])
        .map_err(|err| PromptError::Template(err.to_string()))?;
        Ok(Self { tera })
    }

    pub fn intent(&self, message: &str, history: &str) -> Result<String, PromptError> {
        let tools: Vec<&str> = ToolId::ALL.iter().map(|tool| tool.code()).collect();
        let intents: Vec<&str> = Intent::ALL.iter().map(|intent| intent.code()).collect();

        let mut context = Context::new();
        context.insert("message", message);
        context.insert("history", history);
        context.insert("tools", &tools);
        context.insert("intents", &intents.join(", "));
        self.render(INTENT_TEMPLATE, &context)
    }

    pub fn sentiment(&self, message: &str) -> Result<String, PromptError> {
        let mut context = Context::new();
        context.insert("message", message);
        self.render(SENTIMENT_TEMPLATE, &context)
    }

    pub fn paraphrase(&self, payload: &str) -> Result<String, PromptError> {
        let mut context = Context::new();
        context.insert("payload", payload);
        self.render(PARAPHRASE_TEMPLATE, &context)
    }

    pub fn general(
        &self,
        message: &str,
        history: &str,
        tool_lines: &[String],
        state_context: &Map<String, Value>,
    ) -> Result<String, PromptError> {
        let mut context = Context::new();
        context.insert("message", message);
        context.insert("history", history);
        context.insert("tool_lines", tool_lines);
        context.insert("context", &Value::Object(state_context.clone()).to_string());
        self.render(GENERAL_TEMPLATE, &context)
    }

    fn render(&self, template: &str, context: &Context) -> Result<String, PromptError> {
        self.tera.render(template, context).map_err(|err| PromptError::Template(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Map};

    use super::PromptLibrary;

    fn library() -> PromptLibrary {
        PromptLibrary::new().expect("templates should compile")
    }

    #[test]
    fn intent_prompt_lists_every_tool_and_intent() {
        let prompt = library().intent("Faturamı öğrenmek istiyorum", "user: merhaba");
        let prompt = prompt.expect("intent prompt should render");

        assert!(prompt.contains("Kullanıcının Son Mesajı: Faturamı öğrenmek istiyorum"));
        assert!(prompt.contains("user: merhaba"));
        assert!(prompt.contains("- bilgi_tabanı_ara"));
        assert!(prompt.contains("- musteri_bilgi_al"));
        assert!(prompt.contains("sozlesme_bilgi_al\n"));
        assert!(prompt.contains("\"response_type\": \"immediate|multi_step|clarification\""));
    }

    #[test]
    fn user_text_is_not_interpreted_as_template_syntax() {
        let prompt = library()
            .sentiment("{{ payload }} <b>kötü</b>")
            .expect("sentiment prompt should render");
        assert!(prompt.contains("Mesaj: {{ payload }} <b>kötü</b>"));
    }

    #[test]
    fn general_prompt_includes_tool_lines_and_context() {
        let mut state_context = Map::new();
        state_context.insert("period".to_string(), json!("current"));
        let lines = vec!["Hata (odeme_islem): eksik".to_string()];

        let prompt = library()
            .general("ödeme yapmak istiyorum", "user: ödeme", &lines, &state_context)
            .expect("general prompt should render");

        assert!(prompt.contains("Hata (odeme_islem): eksik"));
        assert!(prompt.contains("{\"period\":\"current\"}"));
        assert!(prompt.trim_end().ends_with("Yanıtın:"));
    }
}
