//! SQLite schema definition.

/// Table holding one row per generated plan.
pub const PLANS_TABLE: &str = "rehab_plans";

/// Complete database schema for the plan store.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Rehab Plans (Append-Only - Immutable after creation)
-- ============================================================================

CREATE TABLE IF NOT EXISTS rehab_plans (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    patient_age TEXT NOT NULL,                   -- free-form, not guaranteed numeric
    patient_gender TEXT NOT NULL,
    surgery_date TEXT NOT NULL,
    conditions TEXT,
    additional_notes TEXT,
    procedure_identified TEXT NOT NULL,
    days_post_op INTEGER NOT NULL,
    plan_json TEXT NOT NULL,                     -- JSON-serialized plan
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    file_name TEXT
);
"#;
