//! Structured output contract shared with the language model.
//!
//! The model is asked to answer with a JSON object holding four nullable
//! string fields. Models do not always honour the `null` literal and sometimes
//! answer with the string `"null"` instead, so the raw response
//! ([`ComplaintInfo`]) is kept apart from the normalized [`ExtractedFields`].

use crate::domain::model::ExtractedFields;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const SCHEMA_NAME: &str = "complaint_info";

const NULL_SENTINEL: &str = "null";

/// Raw structured answer as decoded from the model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplaintInfo {
    #[serde(default)]
    pub line: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub noise_type: Option<String>,
    #[serde(default)]
    pub vibration_type: Option<String>,
}

impl ComplaintInfo {
    /// JSON Schema sent as `response_format` with every request.
    pub fn json_schema() -> Value {
        let nullable_string = json!({ "type": ["string", "null"] });
        json!({
            "type": "object",
            "properties": {
                "line": nullable_string,
                "location": nullable_string,
                "noise_type": nullable_string,
                "vibration_type": nullable_string,
            },
            "required": ["line", "location", "noise_type", "vibration_type"],
            "additionalProperties": false,
        })
    }

    pub fn normalize(self) -> ExtractedFields {
        ExtractedFields {
            line: drop_null_sentinel(self.line),
            location: drop_null_sentinel(self.location),
            noise_type: drop_null_sentinel(self.noise_type),
            vibration_type: drop_null_sentinel(self.vibration_type),
        }
    }
}

impl From<ComplaintInfo> for ExtractedFields {
    fn from(info: ComplaintInfo) -> Self {
        info.normalize()
    }
}

fn drop_null_sentinel(value: Option<String>) -> Option<String> {
    value.filter(|v| v != NULL_SENTINEL)
}
