use serde::{Deserialize, Serialize};

pub const CONTENT_COLUMN: &str = "工单内容";
pub const PHONE_COLUMN: &str = "来电号码";
pub const LINE_COLUMN: &str = "线路";
pub const LOCATION_COLUMN: &str = "小区/位置";
pub const NOISE_TYPE_COLUMN: &str = "噪音类型";
pub const VIBRATION_TYPE_COLUMN: &str = "振动类型";

/// One input row: a single logged citizen complaint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplaintRecord {
    #[serde(rename = "工单内容")]
    pub content: Option<String>,
    #[serde(rename = "来电号码")]
    pub phone: String,
}

impl ComplaintRecord {
    pub fn new(content: Option<&str>, phone: &str) -> Self {
        Self {
            content: content.map(str::to_string),
            phone: phone.to_string(),
        }
    }
}

/// Structured fields derived from one complaint. `None` means the text does
/// not mention the field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    pub line: Option<String>,
    pub location: Option<String>,
    pub noise_type: Option<String>,
    pub vibration_type: Option<String>,
}

impl ExtractedFields {
    pub fn absent() -> Self {
        Self::default()
    }

    pub fn is_absent(&self) -> bool {
        self.line.is_none()
            && self.location.is_none()
            && self.noise_type.is_none()
            && self.vibration_type.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRow {
    #[serde(rename = "工单内容")]
    pub content: Option<String>,
    #[serde(rename = "来电号码")]
    pub phone: String,
    #[serde(rename = "线路")]
    pub line: Option<String>,
    #[serde(rename = "小区/位置")]
    pub location: Option<String>,
    #[serde(rename = "噪音类型")]
    pub noise_type: Option<String>,
    #[serde(rename = "振动类型")]
    pub vibration_type: Option<String>,
}

impl ResultRow {
    pub fn new(record: &ComplaintRecord, fields: ExtractedFields) -> Self {
        Self {
            content: record.content.clone(),
            phone: record.phone.clone(),
            line: fields.line,
            location: fields.location,
            noise_type: fields.noise_type,
            vibration_type: fields.vibration_type,
        }
    }

    pub fn fields(&self) -> ExtractedFields {
        ExtractedFields {
            line: self.line.clone(),
            location: self.location.clone(),
            noise_type: self.noise_type.clone(),
            vibration_type: self.vibration_type.clone(),
        }
    }
}
