//! Settings form records returned by the remote's `getSettingsFormData` call.
//!
//! The remote exposes its settings UI as a list of subcategories, each a list
//! of named parameters. This tool only ever reads the "Replay Buffer"
//! subcategory of the "Output" category, but the records are generic.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One subcategory of a settings category form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsSubCategory {
    pub name_sub_category: String,

    #[serde(default)]
    pub parameters: Vec<SettingsParameter>,
}

/// One parameter of a settings subcategory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsParameter {
    pub name: String,

    /// Form widget type as reported by the remote ("OBS_PROPERTY_INT", ...).
    #[serde(rename = "type", default)]
    pub kind: String,

    /// Current value; the remote is inconsistent about whether numeric
    /// parameters arrive as JSON numbers or strings.
    #[serde(default)]
    pub current_value: Value,
}

impl SettingsParameter {
    /// Reads the current value as a non-negative integer, accepting both the
    /// number and string encodings the remote produces.
    pub fn current_value_as_u64(&self) -> Option<u64> {
        match &self.current_value {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subcategory_from_remote_json() {
        let json = r#"{
            "nameSubCategory": "Replay Buffer",
            "parameters": [
                {"name": "RecRB", "type": "OBS_PROPERTY_BOOL", "currentValue": true},
                {"name": "RecRBTime", "type": "OBS_PROPERTY_INT", "currentValue": 30}
            ]
        }"#;
        let sub: SettingsSubCategory = serde_json::from_str(json).unwrap();
        assert_eq!(sub.name_sub_category, "Replay Buffer");
        assert_eq!(sub.parameters[1].current_value_as_u64(), Some(30));
    }

    #[test]
    fn numeric_value_as_string() {
        let param: SettingsParameter =
            serde_json::from_str(r#"{"name": "RecRBTime", "currentValue": "45"}"#).unwrap();
        assert_eq!(param.current_value_as_u64(), Some(45));
    }

    #[test]
    fn non_numeric_value_is_none() {
        let param: SettingsParameter =
            serde_json::from_str(r#"{"name": "RecRBTime", "currentValue": "unset"}"#).unwrap();
        assert_eq!(param.current_value_as_u64(), None);

        let param: SettingsParameter =
            serde_json::from_str(r#"{"name": "RecRB", "currentValue": true}"#).unwrap();
        assert_eq!(param.current_value_as_u64(), None);
    }
}
