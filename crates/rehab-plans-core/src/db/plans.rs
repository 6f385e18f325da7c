//! Rehab plan database operations.

use chrono::{SecondsFormat, Utc};
use rusqlite::{params, OptionalExtension, Row};
use serde::Serialize;
use tracing::{debug, error, info};

use super::{DbResult, PlanStore};
use crate::models::{PatientInfo, PlanId, PlanRecord, StatsAccumulator, StatsSummary};

const SELECT_PLAN: &str = r#"
    SELECT id, patient_age, patient_gender, surgery_date, conditions,
           additional_notes, procedure_identified, days_post_op, plan_json,
           created_at, file_name
    FROM rehab_plans
"#;

impl PlanStore {
    /// Save a generated plan, returning its id.
    ///
    /// Failures are rolled back and logged; the cause is not returned. Use
    /// [`PlanStore::try_save`] when the caller needs it.
    pub fn save<P: Serialize + ?Sized>(
        &self,
        patient: &PatientInfo,
        procedure: &str,
        days_post_op: i64,
        plan: &P,
        file_name: Option<&str>,
        notes: Option<&str>,
    ) -> Option<PlanId> {
        match self.try_save(patient, procedure, days_post_op, plan, file_name, notes) {
            Ok(id) => {
                info!(plan_id = id, procedure, "saved rehab plan");
                Some(id)
            }
            Err(err) => {
                error!(error = %err, procedure, "rehab plan save failed, rolled back");
                None
            }
        }
    }

    /// Save a generated plan as a single atomic insert.
    pub fn try_save<P: Serialize + ?Sized>(
        &self,
        patient: &PatientInfo,
        procedure: &str,
        days_post_op: i64,
        plan: &P,
        file_name: Option<&str>,
        notes: Option<&str>,
    ) -> DbResult<PlanId> {
        let plan_json = serde_json::to_string(plan)?;
        let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

        let mut conn = self.connect()?;
        // Dropping the transaction without commit rolls it back.
        let tx = conn.transaction()?;
        tx.execute(
            r#"
            INSERT INTO rehab_plans (
                patient_age, patient_gender, surgery_date, conditions,
                additional_notes, procedure_identified, days_post_op,
                plan_json, created_at, file_name
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                patient.age_or_default(),
                patient.gender_or_default(),
                patient.surgery_date_or_default(),
                patient.conditions_or_default(),
                notes.unwrap_or(""),
                procedure,
                days_post_op,
                plan_json,
                created_at,
                file_name,
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(id)
    }

    /// List all plans, in storage order.
    pub fn get_all(&self) -> DbResult<Vec<PlanRecord>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(SELECT_PLAN)?;
        let rows = stmt.query_map([], plan_from_row)?;
        let plans = rows.collect::<Result<Vec<_>, _>>()?;
        debug!(count = plans.len(), "listed rehab plans");
        Ok(plans)
    }

    /// Get a plan by id.
    pub fn get_by_id(&self, id: PlanId) -> DbResult<Option<PlanRecord>> {
        let conn = self.connect()?;
        let sql = format!("{SELECT_PLAN} WHERE id = ?");
        conn.query_row(&sql, [id], plan_from_row)
            .optional()
            .map_err(Into::into)
    }

    /// Compute usage statistics in one pass over all plans.
    ///
    /// Ages that are not numeric are left out of `average_age` and counted in
    /// `ages_excluded`.
    pub fn get_stats(&self) -> DbResult<StatsSummary> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare("SELECT procedure_identified, patient_age FROM rehab_plans")?;
        let mut rows = stmt.query([])?;

        let mut acc = StatsAccumulator::new();
        while let Some(row) = rows.next()? {
            let procedure: String = row.get(0)?;
            let age: String = row.get(1)?;
            acc.add(procedure, &age);
        }

        let stats = acc.finish();
        debug!(
            total_plans = stats.total_plans,
            ages_excluded = stats.ages_excluded,
            "computed plan stats"
        );
        Ok(stats)
    }
}

fn plan_from_row(row: &Row<'_>) -> rusqlite::Result<PlanRecord> {
    Ok(PlanRecord {
        id: row.get(0)?,
        patient_age: row.get(1)?,
        patient_gender: row.get(2)?,
        surgery_date: row.get(3)?,
        conditions: row.get(4)?,
        additional_notes: row.get(5)?,
        procedure_identified: row.get(6)?,
        days_post_op: row.get(7)?,
        plan_json: row.get(8)?,
        created_at: row.get(9)?,
        file_name: row.get(10)?,
    })
}
