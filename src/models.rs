use chrono::{DateTime, Utc};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(alias = "中文")]
    Chinese,
    #[serde(alias = "日文")]
    Japanese,
    #[serde(alias = "英文")]
    English,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Chinese, Language::Japanese, Language::English];

    pub fn name(self) -> &'static str {
        match self {
            Language::Chinese => "Chinese",
            Language::Japanese => "Japanese",
            Language::English => "English",
        }
    }

    pub fn native_label(self) -> &'static str {
        match self {
            Language::Chinese => "中文",
            Language::Japanese => "日文",
            Language::English => "英文",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Style {
    #[default]
    Concise,
    Professional,
    SocialMedia,
    #[serde(rename = "SEO", alias = "Seo")]
    Seo,
}

impl Style {
    pub const ALL: [Style; 4] = [Style::Concise, Style::Professional, Style::SocialMedia, Style::Seo];

    /// Wording used inside prompts.
    pub fn label(self) -> &'static str {
        match self {
            Style::Concise => "concise and to the point",
            Style::Professional => "professional and authoritative",
            Style::SocialMedia => "casual social-media tone",
            Style::Seo => "SEO-optimized, keyword rich",
        }
    }
}

impl std::fmt::Display for Style {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Style::Concise => "Concise",
            Style::Professional => "Professional",
            Style::SocialMedia => "SocialMedia",
            Style::Seo => "SEO",
        };
        f.write_str(s)
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GenerationRequest {
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub keywords: String, // comma separated, passed through verbatim
    #[serde(default)]
    pub selling_points: String,
    #[serde(default)]
    pub languages: IndexSet<Language>, // selection order, duplicates collapse
    #[serde(default)]
    pub style: Style,
    #[serde(default = "default_true")]
    pub include_video_script: bool,
    #[serde(default)]
    pub include_faq: bool,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("product name is required")]
    MissingProductName,
    #[error("select at least one output language")]
    NoLanguages,
}

impl GenerationRequest {
    /// Presence-only checks that gate any generation attempt.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.product_name.trim().is_empty() {
            return Err(ValidationError::MissingProductName);
        }
        if self.languages.is_empty() {
            return Err(ValidationError::NoLanguages);
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GenerationResult {
    pub model_used: String,
    pub content: String,
}

/// Why a language (or the FAQ) produced no content.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureReason {
    #[error("model {model} failed: {message}")]
    ProviderError { model: String, message: String },
    #[error("rate limited on every candidate model ({})", .tried.join(", "))]
    Exhausted { tried: Vec<String> },
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GenerationReport {
    pub submission_id: Uuid,
    pub request: GenerationRequest,
    pub results: IndexMap<Language, GenerationResult>,
    #[serde(default)]
    pub failures: IndexMap<Language, FailureReason>,
    #[serde(default)]
    pub faq: Option<GenerationResult>,
    #[serde(default)]
    pub faq_failure: Option<FailureReason>,
    pub generated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn request_defaults_and_native_labels() {
        let req: GenerationRequest = serde_json::from_value(json!({
            "product_name": "Foldable Fan",
            "languages": ["中文", "English", "Chinese"]
        }))
        .unwrap();
        assert_eq!(req.languages.iter().copied().collect::<Vec<_>>(), vec![Language::Chinese, Language::English]);
        assert_eq!(req.style, Style::Concise);
        assert!(req.include_video_script);
        assert!(!req.include_faq);
        assert_eq!(req.keywords, "");
    }

    #[test]
    fn missing_product_name_reaches_validation() {
        let req: GenerationRequest = serde_json::from_value(json!({ "languages": ["English"] })).unwrap();
        assert_eq!(req.product_name, "");
        assert_eq!(req.validate(), Err(ValidationError::MissingProductName));
    }

    #[test]
    fn style_accepts_seo_spelling() {
        let s: Style = serde_json::from_value(json!("SEO")).unwrap();
        assert_eq!(s, Style::Seo);
        assert_eq!(serde_json::to_value(Style::SocialMedia).unwrap(), json!("SocialMedia"));
    }

    #[test]
    fn validation_is_presence_only() {
        let mut req = GenerationRequest {
            product_name: "   ".into(),
            keywords: String::new(),
            selling_points: String::new(),
            languages: IndexSet::from([Language::English]),
            style: Style::Concise,
            include_video_script: false,
            include_faq: false,
        };
        assert_eq!(req.validate(), Err(ValidationError::MissingProductName));
        req.product_name = "Fan".into();
        assert_eq!(req.validate(), Ok(()));
        req.languages.clear();
        assert_eq!(req.validate(), Err(ValidationError::NoLanguages));
    }

    #[test]
    fn failure_reason_is_tagged() {
        let v = serde_json::to_value(FailureReason::Exhausted { tried: vec!["a".into(), "b".into()] }).unwrap();
        assert_eq!(v, json!({"kind": "exhausted", "tried": ["a", "b"]}));
        assert_eq!(
            FailureReason::Exhausted { tried: vec!["a".into(), "b".into()] }.to_string(),
            "rate limited on every candidate model (a, b)"
        );
    }
}
