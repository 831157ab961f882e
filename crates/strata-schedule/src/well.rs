//! Wells and their step-indexed controls.

use serde::Serialize;
use strata_core::{Completion, CompletionSet, DeckRecord, Phase, Result, ScheduleError, Value};
use strata_state::{DynamicState, TimeMap};

/// A well declared through WELSPECS.
///
/// Control attributes are stored per report step and carry forward: a rate
/// set at step `t` applies to every later step until it is set again.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Well {
    name: String,
    created_at: usize,
    group: Option<String>,
    head: Option<(i32, i32)>,
    ref_depth: Value<f64>,
    preferred_phase: Option<Phase>,
    oil_rate: DynamicState<f64>,
    water_rate: DynamicState<f64>,
    gas_rate: DynamicState<f64>,
    injection_rate: DynamicState<f64>,
    in_prediction_mode: DynamicState<bool>,
    completions: DynamicState<CompletionSet>,
}

impl Well {
    pub(crate) fn new(name: impl Into<String>, created_at: usize) -> Self {
        Self {
            name: name.into(),
            created_at,
            group: None,
            head: None,
            ref_depth: Value::defaulted("REF_DEPTH"),
            preferred_phase: None,
            oil_rate: DynamicState::new(0.0),
            water_rate: DynamicState::new(0.0),
            gas_rate: DynamicState::new(0.0),
            injection_rate: DynamicState::new(0.0),
            in_prediction_mode: DynamicState::new(true),
            completions: DynamicState::new(CompletionSet::new()),
        }
    }

    /// Well name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Report step of the first WELSPECS naming this well.
    pub fn created_at(&self) -> usize {
        self.created_at
    }

    /// Group the well belongs to, if declared.
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Zero-based wellhead `(I, J)`, if declared.
    pub fn head(&self) -> Option<(i32, i32)> {
        self.head
    }

    /// Bottom-hole reference depth, possibly defaulted.
    pub fn ref_depth(&self) -> &Value<f64> {
        &self.ref_depth
    }

    /// Preferred phase, if declared.
    pub fn preferred_phase(&self) -> Option<Phase> {
        self.preferred_phase
    }

    /// Oil rate target at `step`.
    pub fn oil_rate(&self, step: usize) -> f64 {
        *self.oil_rate.get(step)
    }

    /// Water rate target at `step`.
    pub fn water_rate(&self, step: usize) -> f64 {
        *self.water_rate.get(step)
    }

    /// Gas rate target at `step`.
    pub fn gas_rate(&self, step: usize) -> f64 {
        *self.gas_rate.get(step)
    }

    /// Injection rate target at `step`.
    pub fn injection_rate(&self, step: usize) -> f64 {
        *self.injection_rate.get(step)
    }

    /// Whether the well runs on predictive (rather than historical) controls at `step`.
    pub fn is_in_prediction_mode(&self, step: usize) -> bool {
        *self.in_prediction_mode.get(step)
    }

    /// Completions in effect at `step`.
    pub fn completions(&self, step: usize) -> &CompletionSet {
        self.completions.get(step)
    }

    /// Record static data from a WELSPECS record. Absent or defaulted items leave the current value.
    pub(crate) fn apply_welspecs(&mut self, record: &DeckRecord) -> Result<()> {
        if let Some(group) = optional_string(record, "GROUP")? {
            self.group = Some(group.to_string());
        }

        let head_i = optional_int(record, "HEAD_I")?;
        let head_j = optional_int(record, "HEAD_J")?;
        if let (Some(i), Some(j)) = (head_i, head_j) {
            self.head = Some((head_index(&self.name, "HEAD_I", i)?, head_index(&self.name, "HEAD_J", j)?));
        }

        let ref_depth = Value::from_item("REF_DEPTH", record.find_item("REF_DEPTH"))?;
        if ref_depth.has_value() {
            self.ref_depth = ref_depth;
        }

        if let Some(phase) = optional_string(record, "PHASE")? {
            self.preferred_phase = Some(phase.parse()?);
        }

        Ok(())
    }

    pub(crate) fn set_oil_rate(&mut self, time_map: &TimeMap, step: usize, rate: f64) -> Result<()> {
        self.oil_rate.update(time_map, step, rate)
    }

    pub(crate) fn set_water_rate(&mut self, time_map: &TimeMap, step: usize, rate: f64) -> Result<()> {
        self.water_rate.update(time_map, step, rate)
    }

    pub(crate) fn set_gas_rate(&mut self, time_map: &TimeMap, step: usize, rate: f64) -> Result<()> {
        self.gas_rate.update(time_map, step, rate)
    }

    pub(crate) fn set_injection_rate(&mut self, time_map: &TimeMap, step: usize, rate: f64) -> Result<()> {
        self.injection_rate.update(time_map, step, rate)
    }

    pub(crate) fn set_in_prediction_mode(
        &mut self,
        time_map: &TimeMap,
        step: usize,
        prediction: bool,
    ) -> Result<()> {
        self.in_prediction_mode.update(time_map, step, prediction)
    }

    /// Upsert completions into the set in effect at `step` and store the result from `step` on.
    ///
    /// A completion replacing a cell keeps that cell's ordinal; a new cell is
    /// numbered after the last connection of the well.
    pub(crate) fn add_completions(
        &mut self,
        time_map: &TimeMap,
        step: usize,
        completions: Vec<Completion>,
    ) -> Result<()> {
        let mut set = self.completions.get(step).clone();
        for completion in completions {
            let (i, j, k) = completion.coordinate();
            let ordinal = set
                .find(i, j, k)
                .map_or(set.len() + 1, Completion::ordinal);
            set.add(completion.with_ordinal(ordinal));
        }
        self.completions.update(time_map, step, set)
    }
}

fn optional_string<'r>(record: &'r DeckRecord, name: &str) -> Result<Option<&'r str>> {
    match record.find_item(name) {
        Some(item) if !item.is_empty() => item.get_string_opt(0),
        _ => Ok(None),
    }
}

fn optional_int(record: &DeckRecord, name: &str) -> Result<Option<i64>> {
    match record.find_item(name) {
        Some(item) if !item.is_empty() => item.get_int_opt(0),
        _ => Ok(None),
    }
}

fn head_index(well: &str, item: &str, value: i64) -> Result<i32> {
    i32::try_from(value)
        .ok()
        .filter(|value| *value >= 1)
        .map(|value| value - 1)
        .ok_or_else(|| {
            ScheduleError::invalid_deck(
                format!("record for well {}", well),
                format!("{} must be a positive grid index, got {}", item, value),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;
    use strata_core::{CompletionState, Deck};

    fn time_map(steps: usize) -> TimeMap {
        let mut time_map = TimeMap::new(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
        for _ in 0..steps {
            time_map.add_time_step(1.0).unwrap();
        }
        time_map
    }

    fn record(items: serde_json::Value) -> DeckRecord {
        let deck = Deck::from_json_str(&json!([{"name": "WELSPECS", "records": [items]}]).to_string())
            .unwrap();
        deck.keyword_at(0).unwrap().record(0).unwrap().clone()
    }

    #[test]
    fn test_new_well_defaults() {
        let well = Well::new("OP_1", 3);
        assert_eq!(well.name(), "OP_1");
        assert_eq!(well.created_at(), 3);
        assert_eq!(well.oil_rate(0), 0.0);
        assert!(well.completions(10).is_empty());
        assert!(well.group().is_none());
        assert!(!well.ref_depth().has_value());
    }

    #[test]
    fn test_apply_welspecs() {
        let mut well = Well::new("OP_1", 0);
        well.apply_welspecs(&record(json!([
            {"name": "WELL", "values": ["OP_1"]},
            {"name": "GROUP", "values": ["FIELD"]},
            {"name": "HEAD_I", "values": [10]},
            {"name": "HEAD_J", "values": [20]},
            {"name": "REF_DEPTH", "values": [2500.5]},
            {"name": "PHASE", "values": ["OIL"]}
        ])))
        .unwrap();

        assert_eq!(well.group(), Some("FIELD"));
        assert_eq!(well.head(), Some((9, 19)));
        assert_eq!(well.ref_depth().get().unwrap(), 2500.5);
        assert_eq!(well.preferred_phase(), Some(Phase::Oil));

        well.apply_welspecs(&record(json!([
            {"name": "WELL", "values": ["OP_1"]},
            {"name": "GROUP", "values": [null]},
            {"name": "REF_DEPTH", "values": [null]}
        ])))
        .unwrap();
        assert_eq!(well.group(), Some("FIELD"));
        assert_eq!(well.ref_depth().get().unwrap(), 2500.5);
    }

    #[test]
    fn test_apply_welspecs_rejects_bad_values() {
        let mut well = Well::new("OP_1", 0);
        let err = well
            .apply_welspecs(&record(json!([{"name": "PHASE", "values": ["LIQ"]}])))
            .unwrap_err();
        assert!(matches!(err, ScheduleError::Value { .. }));

        let err = well
            .apply_welspecs(&record(json!([
                {"name": "HEAD_I", "values": [0]},
                {"name": "HEAD_J", "values": [1]}
            ])))
            .unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidDeck { .. }));
    }

    #[test]
    fn test_rates_carry_forward() {
        let time_map = time_map(3);
        let mut well = Well::new("OP_1", 0);

        well.set_oil_rate(&time_map, 1, 100.0).unwrap();
        well.set_in_prediction_mode(&time_map, 1, false).unwrap();
        well.set_oil_rate(&time_map, 3, 80.0).unwrap();

        assert_eq!(well.oil_rate(0), 0.0);
        assert_eq!(well.oil_rate(1), 100.0);
        assert_eq!(well.oil_rate(2), 100.0);
        assert_eq!(well.oil_rate(3), 80.0);
        assert!(well.is_in_prediction_mode(0));
        assert!(!well.is_in_prediction_mode(3));

        assert!(well.set_gas_rate(&time_map, 4, 1.0).is_err());
    }

    #[test]
    fn test_add_completions_copies_previous_step() {
        let time_map = time_map(2);
        let mut well = Well::new("OP_1", 0);

        well.add_completions(
            &time_map,
            0,
            vec![Completion::at(1, 1, 0).build(), Completion::at(1, 1, 1).build()],
        )
        .unwrap();
        well.add_completions(
            &time_map,
            2,
            vec![
                Completion::at(1, 1, 0).state(CompletionState::Shut).build(),
                Completion::at(1, 1, 2).build(),
            ],
        )
        .unwrap();

        let initial = well.completions(0);
        assert_eq!(initial.len(), 2);
        assert_eq!(initial.get(0).unwrap().state(), CompletionState::Open);
        assert_eq!(well.completions(1).len(), 2);

        let later = well.completions(2);
        assert_eq!(later.len(), 3);
        assert_eq!(later.get(0).unwrap().state(), CompletionState::Shut);
        assert_eq!(later.get(2).unwrap().k(), 2);
        assert_eq!(
            later.iter().map(Completion::ordinal).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }
}
