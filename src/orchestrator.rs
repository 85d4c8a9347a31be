use chrono::Utc;
use indexmap::IndexMap;
use thiserror::Error;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::invoker::{ModelCandidates, ModelInvoker};
use crate::models::{FailureReason, GenerationReport, GenerationRequest, Language, ValidationError};
use crate::prompt::{build_faq_prompt, build_prompt};

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("generation failed for every selected language")]
    TotalFailure { failures: IndexMap<Language, FailureReason> },
}

pub struct Orchestrator {
    invoker: ModelInvoker,
    candidates: ModelCandidates,
    faq_model: String,
}

impl Orchestrator {
    pub fn new(invoker: ModelInvoker, candidates: ModelCandidates, faq_model: String) -> Self {
        Self { invoker, candidates, faq_model }
    }

    pub async fn generate_all(&self, request: &GenerationRequest) -> Result<GenerationReport, GenerateError> {
        request.validate()?;

        let submission_id = Uuid::new_v4();
        let span = info_span!("submission", %submission_id, product = %request.product_name);
        self.run(submission_id, request).instrument(span).await
    }

    async fn run(&self, submission_id: Uuid, request: &GenerationRequest) -> Result<GenerationReport, GenerateError> {
        info!("🚀 Generating copy in {} language(s)", request.languages.len());

        let mut results = IndexMap::new();
        let mut failures = IndexMap::new();

        for &language in &request.languages {
            let prompt = build_prompt(request, language);
            match self.invoker.invoke(&prompt, &self.candidates).await {
                Ok(result) => {
                    info!("✅ {} copy ready ({})", language, result.model_used);
                    results.insert(language, result);
                }
                Err(reason) => {
                    error!("❌ {} copy failed: {}", language, reason);
                    failures.insert(language, reason);
                }
            }
        }

        if results.is_empty() {
            return Err(GenerateError::TotalFailure { failures });
        }

        let (faq, faq_failure) = if request.include_faq {
            let prompt = build_faq_prompt(request);
            match self.invoker.invoke(&prompt, &ModelCandidates::single(self.faq_model.as_str())).await {
                Ok(result) => (Some(result), None),
                Err(reason) => {
                    warn!("⚠️ FAQ generation failed: {}", reason);
                    (None, Some(reason))
                }
            }
        } else {
            (None, None)
        };

        info!("✅ Generated {} of {} language(s)", results.len(), request.languages.len());

        Ok(GenerationReport {
            submission_id,
            request: request.clone(),
            results,
            failures,
            faq,
            faq_failure,
            generated_at: Utc::now(),
        })
    }
}
