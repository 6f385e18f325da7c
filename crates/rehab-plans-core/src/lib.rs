//! Rehab Plans Core Library
//!
//! Local persistence for generated rehabilitation plans, with retrieval and
//! usage statistics.
//!
//! # Architecture
//!
//! ```text
//! Host (HTTP handlers / app) ──► RehabPlansCore (FFI) ──► PlanStore
//!                                                            │
//!                                            one connection per operation
//!                                                            │
//!                                                   SQLite: rehab_plans
//! ```
//!
//! Plan generation and procedure identification happen elsewhere; this crate
//! stores their output as-is.
//!
//! # Modules
//!
//! - [`db`]: SQLite store and plan operations
//! - [`models`]: Domain types (PlanRecord, PatientInfo, StatsSummary)
//! - [`config`]: Storage location configuration
//! - [`logging`]: Subscriber setup for the store's `tracing` events

pub mod config;
pub mod db;
pub mod logging;
pub mod models;

// Re-export commonly used types
pub use config::StoreConfig;
pub use db::{DbError, DbResult, PlanStore};
pub use models::{PatientInfo, PlanId, PlanRecord, StatsSummary};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::collections::HashMap;
use std::sync::Arc;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum RehabPlansError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<db::DbError> for RehabPlansError {
    fn from(e: db::DbError) -> Self {
        match e {
            DbError::Json(e) => RehabPlansError::SerializationError(e.to_string()),
            other => RehabPlansError::DatabaseError(other.to_string()),
        }
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a plan store at the given path.
#[uniffi::export]
pub fn open_plan_store(path: String) -> Result<Arc<RehabPlansCore>, RehabPlansError> {
    let store = PlanStore::open(&StoreConfig::new(path))?;
    Ok(Arc::new(RehabPlansCore { store }))
}

/// Create an in-memory plan store (for testing).
#[uniffi::export]
pub fn open_plan_store_in_memory() -> Result<Arc<RehabPlansCore>, RehabPlansError> {
    let store = PlanStore::open_in_memory()?;
    Ok(Arc::new(RehabPlansCore { store }))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe store wrapper for FFI.
#[derive(uniffi::Object)]
pub struct RehabPlansCore {
    store: PlanStore,
}

#[uniffi::export]
impl RehabPlansCore {
    /// Save a generated plan. Returns `None` if the insert failed.
    ///
    /// `plan_json` must be a JSON document; it is stored as given.
    pub fn save_plan(
        &self,
        patient: FfiPatientInfo,
        procedure: String,
        days_post_op: i64,
        plan_json: String,
        file_name: Option<String>,
        notes: Option<String>,
    ) -> Result<Option<i64>, RehabPlansError> {
        let plan: serde_json::Value = serde_json::from_str(&plan_json)
            .map_err(|e| RehabPlansError::InvalidInput(format!("plan_json: {}", e)))?;
        let patient: PatientInfo = patient.into();

        Ok(self.store.save(
            &patient,
            &procedure,
            days_post_op,
            &plan,
            file_name.as_deref(),
            notes.as_deref(),
        ))
    }

    /// Get a plan by ID.
    pub fn get_plan(&self, id: i64) -> Result<Option<FfiPlanRecord>, RehabPlansError> {
        let record = self.store.get_by_id(id)?;
        Ok(record.map(|r| r.into()))
    }

    /// List all stored plans.
    pub fn get_all_plans(&self) -> Result<Vec<FfiPlanRecord>, RehabPlansError> {
        let records = self.store.get_all()?;
        Ok(records.into_iter().map(|r| r.into()).collect())
    }

    /// Get usage statistics.
    pub fn get_stats(&self) -> Result<FfiStatsSummary, RehabPlansError> {
        let stats = self.store.get_stats()?;
        Ok(stats.into())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe patient details.
#[derive(Debug, Clone, Default, uniffi::Record)]
pub struct FfiPatientInfo {
    pub age: Option<String>,
    pub gender: Option<String>,
    pub surgery_date: Option<String>,
    pub conditions: Option<String>,
}

impl From<FfiPatientInfo> for PatientInfo {
    fn from(info: FfiPatientInfo) -> Self {
        PatientInfo {
            age: info.age,
            gender: info.gender,
            surgery_date: info.surgery_date,
            conditions: info.conditions,
        }
    }
}

/// FFI-safe plan record.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPlanRecord {
    pub id: i64,
    pub patient_age: String,
    pub patient_gender: String,
    pub surgery_date: String,
    pub conditions: Option<String>,
    pub additional_notes: Option<String>,
    pub procedure_identified: String,
    pub days_post_op: i64,
    pub plan_json: String,
    pub created_at: String,
    pub file_name: Option<String>,
}

impl From<PlanRecord> for FfiPlanRecord {
    fn from(record: PlanRecord) -> Self {
        Self {
            id: record.id,
            patient_age: record.patient_age,
            patient_gender: record.patient_gender,
            surgery_date: record.surgery_date,
            conditions: record.conditions,
            additional_notes: record.additional_notes,
            procedure_identified: record.procedure_identified,
            days_post_op: record.days_post_op,
            plan_json: record.plan_json,
            created_at: record.created_at,
            file_name: record.file_name,
        }
    }
}

/// FFI-safe usage statistics.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiStatsSummary {
    pub total_plans: u64,
    pub procedures: HashMap<String, u64>,
    pub average_age: Option<f64>,
    pub ages_excluded: u64,
}

impl From<StatsSummary> for FfiStatsSummary {
    fn from(stats: StatsSummary) -> Self {
        Self {
            total_plans: stats.total_plans,
            procedures: stats.procedures.into_iter().collect(),
            average_age: stats.average_age,
            ages_excluded: stats.ages_excluded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ffi_save_and_stats() {
        let core = open_plan_store_in_memory().unwrap();

        let patient = FfiPatientInfo {
            age: Some("45".into()),
            ..Default::default()
        };
        let id = core
            .save_plan(
                patient,
                "Hip Arthroscopy".into(),
                21,
                r#"{"goals":["walk unaided"]}"#.into(),
                None,
                None,
            )
            .unwrap()
            .unwrap();

        let record = core.get_plan(id).unwrap().unwrap();
        assert_eq!(record.patient_gender, "N/A");
        assert_eq!(record.plan_json, r#"{"goals":["walk unaided"]}"#);

        let stats = core.get_stats().unwrap();
        assert_eq!(stats.total_plans, 1);
        assert_eq!(stats.procedures.get("Hip Arthroscopy"), Some(&1));
        assert_eq!(stats.average_age, Some(45.0));
    }

    #[test]
    fn test_ffi_rejects_invalid_plan_json() {
        let core = open_plan_store_in_memory().unwrap();
        let result = core.save_plan(
            FfiPatientInfo::default(),
            "Hip Arthroscopy".into(),
            21,
            "not json".into(),
            None,
            None,
        );
        assert!(matches!(result, Err(RehabPlansError::InvalidInput(_))));
        assert!(core.get_all_plans().unwrap().is_empty());
    }

    #[test]
    fn test_ffi_missing_plan() {
        let core = open_plan_store_in_memory().unwrap();
        assert!(core.get_plan(7).unwrap().is_none());
    }
}
