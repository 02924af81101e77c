use crate::utils::error::{EtlError, Result};
use std::path::Path;

pub const CONTENT_PLACEHOLDER: &str = "{content}";

const DEFAULT_TEMPLATE: &str = "你是一个数据提取专家。请分析北京地铁投诉工单内容，提取关键信息。

工单内容：{content}

提取信息：
1. line: 地铁线路（如1号线、2号线、13号线等）
2. location: 小区名称、地点或站点
3. noise_type: 噪音问题类型（如列车噪音、施工噪音、机械噪音等）
4. vibration_type: 振动问题类型（如列车振动、施工振动等）

没有明确提及的信息返回null。";

/// Renders the per-record extraction instruction.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    template: String,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

impl PromptBuilder {
    pub fn with_template(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        if !template.contains(CONTENT_PLACEHOLDER) {
            return Err(EtlError::InvalidConfigValueError {
                field: "prompt.template_file".to_string(),
                value: template.chars().take(40).collect(),
                reason: format!("Template must contain the {} placeholder", CONTENT_PLACEHOLDER),
            });
        }
        Ok(Self { template })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let template = std::fs::read_to_string(&path)?;
        tracing::debug!("Loaded prompt template from {}", path.as_ref().display());
        Self::with_template(template)
    }

    /// Returns `None` when there is nothing to extract from, so the caller can
    /// skip the model call entirely.
    pub fn build(&self, content: Option<&str>) -> Option<String> {
        let content = content?;
        if content.trim().is_empty() {
            return None;
        }
        Some(self.template.replace(CONTENT_PLACEHOLDER, content))
    }
}
