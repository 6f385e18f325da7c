//! Rehab plan records and the patient details they are saved with.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Storage-assigned plan identifier.
pub type PlanId = i64;

/// Placeholder stored when the age or gender of a patient is not supplied.
pub const UNKNOWN_PLACEHOLDER: &str = "N/A";

/// A stored rehabilitation plan (immutable after creation).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanRecord {
    /// Primary key, assigned by storage
    pub id: PlanId,
    /// Free-form age, not guaranteed numeric
    pub patient_age: String,
    pub patient_gender: String,
    /// Unvalidated surgery date as supplied
    pub surgery_date: String,
    pub conditions: Option<String>,
    pub additional_notes: Option<String>,
    /// Procedure name, used as the statistics grouping key
    pub procedure_identified: String,
    pub days_post_op: i64,
    /// Serialized plan (JSON text)
    pub plan_json: String,
    /// Insertion timestamp (RFC 3339, UTC)
    pub created_at: String,
    /// Name of the uploaded source file
    pub file_name: Option<String>,
}

impl PlanRecord {
    /// Decode the stored plan into a concrete type.
    pub fn plan<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_str(&self.plan_json)
    }

    /// Decode the stored plan into a generic JSON value.
    pub fn plan_value(&self) -> serde_json::Result<Value> {
        self.plan::<Value>()
    }
}

/// Patient details captured alongside a plan.
///
/// Every field is optional on input. Missing values fall back to the
/// placeholders exposed by the accessor methods rather than failing the save.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PatientInfo {
    #[serde(deserialize_with = "lenient_string")]
    pub age: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub gender: Option<String>,
    #[serde(
        rename = "surgeryDate",
        alias = "surgery_date",
        deserialize_with = "lenient_string"
    )]
    pub surgery_date: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub conditions: Option<String>,
}

impl PatientInfo {
    /// Build from a loosely-typed JSON mapping (e.g. a request body).
    ///
    /// Numbers and booleans are kept in their textual form; unknown keys are
    /// ignored.
    pub fn from_json(value: &Value) -> serde_json::Result<Self> {
        Self::deserialize(value)
    }

    pub fn age_or_default(&self) -> &str {
        self.age.as_deref().unwrap_or(UNKNOWN_PLACEHOLDER)
    }

    pub fn gender_or_default(&self) -> &str {
        self.gender.as_deref().unwrap_or(UNKNOWN_PLACEHOLDER)
    }

    pub fn surgery_date_or_default(&self) -> &str {
        self.surgery_date.as_deref().unwrap_or("")
    }

    pub fn conditions_or_default(&self) -> &str {
        self.conditions.as_deref().unwrap_or("")
    }
}

/// Accept strings, numbers, and booleans as text. `null` maps to `None`.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected a scalar patient field, got {}",
            other
        ))),
    }
}
