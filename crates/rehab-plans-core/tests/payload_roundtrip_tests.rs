//! Stored plan payloads must decode back to what was saved.

use proptest::prelude::*;
use rehab_plans_core::db::PlanStore;
use rehab_plans_core::models::PatientInfo;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Exercise {
    name: String,
    sets: u8,
    reps: u16,
    hold_seconds: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Phase {
    title: String,
    week_start: u8,
    week_end: u8,
    exercises: Vec<Exercise>,
    precautions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct RehabPlan {
    summary: String,
    phases: Vec<Phase>,
}

fn exercise_strategy() -> impl Strategy<Value = Exercise> {
    (
        "[a-zA-Z ]{1,24}",
        1u8..6,
        1u16..30,
        prop::option::of(0u32..120),
    )
        .prop_map(|(name, sets, reps, hold_seconds)| Exercise {
            name,
            sets,
            reps,
            hold_seconds,
        })
}

fn phase_strategy() -> impl Strategy<Value = Phase> {
    (
        "\\PC{0,32}",
        0u8..12,
        0u8..12,
        prop::collection::vec(exercise_strategy(), 0..5),
        prop::collection::vec("\\PC{0,40}", 0..3),
    )
        .prop_map(|(title, a, b, exercises, precautions)| Phase {
            title,
            week_start: a.min(b),
            week_end: a.max(b),
            exercises,
            precautions,
        })
}

fn plan_strategy() -> impl Strategy<Value = RehabPlan> {
    ("\\PC{0,64}", prop::collection::vec(phase_strategy(), 0..4))
        .prop_map(|(summary, phases)| RehabPlan { summary, phases })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_plan_round_trips(plan in plan_strategy()) {
        let store = PlanStore::open_in_memory().unwrap();
        let id = store
            .save(&PatientInfo::default(), "Total Shoulder Arthroplasty", 30, &plan, None, None)
            .unwrap();

        let record = store.get_by_id(id).unwrap().unwrap();
        let decoded: RehabPlan = record.plan().unwrap();
        prop_assert_eq!(decoded, plan);
    }
}

#[test]
fn test_malformed_payload_surfaces_on_decode() {
    let store = PlanStore::open_in_memory().unwrap();
    let id = store
        .save(
            &PatientInfo::default(),
            "Total Shoulder Arthroplasty",
            30,
            &serde_json::json!({ "unexpected": true }),
            None,
            None,
        )
        .unwrap();

    let record = store.get_by_id(id).unwrap().unwrap();
    assert!(record.plan::<RehabPlan>().is_err());
    assert!(record.plan_value().is_ok());
}
