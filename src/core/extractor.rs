use crate::core::prompt::PromptBuilder;
use crate::domain::model::ExtractedFields;
use crate::domain::ports::ModelClient;
use crate::domain::schema::ComplaintInfo;
use crate::utils::error::EtlError;
use serde_json::Value;

/// Result of extracting one record. Failures are values here, never errors
/// bubbling up into the batch.
#[derive(Debug)]
pub enum ExtractionOutcome {
    Extracted(ExtractedFields),
    /// No text to work with; the model was not called.
    Skipped,
    Failed(EtlError),
}

impl ExtractionOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, ExtractionOutcome::Failed(_))
    }

    pub fn into_fields(self) -> ExtractedFields {
        match self {
            ExtractionOutcome::Extracted(fields) => fields,
            ExtractionOutcome::Skipped | ExtractionOutcome::Failed(_) => ExtractedFields::absent(),
        }
    }
}

pub struct ComplaintExtractor<M: ModelClient> {
    model: M,
    prompts: PromptBuilder,
    schema: Value,
}

impl<M: ModelClient> ComplaintExtractor<M> {
    pub fn new(model: M) -> Self {
        Self::with_prompts(model, PromptBuilder::default())
    }

    pub fn with_prompts(model: M, prompts: PromptBuilder) -> Self {
        Self {
            model,
            prompts,
            schema: ComplaintInfo::json_schema(),
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub async fn extract(&self, content: Option<&str>) -> ExtractionOutcome {
        let Some(prompt) = self.prompts.build(content) else {
            return ExtractionOutcome::Skipped;
        };

        match self.model.respond(&prompt, &self.schema).await {
            Ok(info) => ExtractionOutcome::Extracted(info.normalize()),
            Err(e) => ExtractionOutcome::Failed(e),
        }
    }

    pub async fn extract_fields(&self, content: Option<&str>) -> ExtractedFields {
        self.extract(content).await.into_fields()
    }
}
