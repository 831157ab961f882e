//! Well completions (perforations).
//!
//! A completion connects a well to one grid cell. Its identity is the cell
//! coordinate; every other field describes the connection.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::deck::{DeckKeyword, DeckRecord};
use crate::error::{Result, ScheduleError};
use crate::types::CompletionState;
use crate::value::Value;

/// Deck item names read from a COMPDAT record.
const DEPTH: &str = "DEPTH";
const TRANSMISSIBILITY_FACTOR: &str = "CONNECTION_TRANSMISSIBILITY_FACTOR";
const DIAMETER: &str = "DIAMETER";
const SKIN: &str = "SKIN";

/// A single perforation of a well in a grid cell.
///
/// Coordinates are zero-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    i: i32,
    j: i32,
    k: i32,
    ordinal: usize,
    depth: Value<f64>,
    state: CompletionState,
    transmissibility_factor: Value<f64>,
    diameter: Value<f64>,
    skin_factor: Value<f64>,
    sat_table_id: i32,
}

impl Completion {
    /// Start building a completion in cell `(i, j, k)`.
    pub fn at(i: i32, j: i32, k: i32) -> CompletionBuilder {
        CompletionBuilder::new(i, j, k)
    }

    /// Zero-based I coordinate.
    pub fn i(&self) -> i32 {
        self.i
    }

    /// Zero-based J coordinate.
    pub fn j(&self) -> i32 {
        self.j
    }

    /// Zero-based K coordinate.
    pub fn k(&self) -> i32 {
        self.k
    }

    /// The `(i, j, k)` triple.
    pub fn coordinate(&self) -> (i32, i32, i32) {
        (self.i, self.j, self.k)
    }

    /// Completion number within its well (1-based).
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// Depth of the connection, defaulted until known.
    pub fn depth(&self) -> &Value<f64> {
        &self.depth
    }

    /// Open, auto or shut.
    pub fn state(&self) -> CompletionState {
        self.state
    }

    /// Connection transmissibility factor, possibly defaulted.
    pub fn transmissibility_factor(&self) -> &Value<f64> {
        &self.transmissibility_factor
    }

    /// Wellbore diameter, possibly defaulted.
    pub fn diameter(&self) -> &Value<f64> {
        &self.diameter
    }

    /// Skin factor, possibly defaulted.
    pub fn skin_factor(&self) -> &Value<f64> {
        &self.skin_factor
    }

    /// Saturation table used for the connection.
    pub fn sat_table_id(&self) -> i32 {
        self.sat_table_id
    }

    /// The same completion renumbered to `ordinal`.
    pub fn with_ordinal(mut self, ordinal: usize) -> Self {
        self.ordinal = ordinal;
        self
    }

    /// True iff both completions sit in the same cell. Other fields are ignored.
    pub fn same_coordinate(&self, other: &Completion) -> bool {
        self.coordinate() == other.coordinate()
    }

    /// Parse a COMPDAT keyword into completions grouped by well name.
    ///
    /// Each record covers the layers `K1..=K2` of column `(I, J)`; deck
    /// coordinates are 1-based. Completions keep record order within a well
    /// and are numbered per well starting at 1; a well renumbers them against
    /// its existing connections when they are registered.
    pub fn from_compdat(keyword: &DeckKeyword) -> Result<BTreeMap<String, Vec<Completion>>> {
        let mut completions: BTreeMap<String, Vec<Completion>> = BTreeMap::new();

        for record in keyword.records() {
            let well = record.item_named("WELL")?.get_string(0)?.to_string();
            let entry = completions.entry(well).or_default();
            for completion in Self::from_compdat_record(keyword.name(), record, entry.len())? {
                entry.push(completion);
            }
        }

        Ok(completions)
    }

    fn from_compdat_record(
        keyword: &str,
        record: &DeckRecord,
        already_added: usize,
    ) -> Result<Vec<Completion>> {
        let i = grid_index(keyword, record, "I")?;
        let j = grid_index(keyword, record, "J")?;
        let k1 = grid_index(keyword, record, "K1")?;
        let k2 = grid_index(keyword, record, "K2")?;
        if k2 < k1 {
            return Err(ScheduleError::invalid_deck(
                keyword,
                format!("K2 ({}) is above K1 ({})", k2 + 1, k1 + 1),
            ));
        }

        let state = match record.find_item("STATE") {
            Some(item) => match item.get_string_opt(0)? {
                Some(token) => CompletionState::from_token(token)?,
                None => CompletionState::default(),
            },
            None => CompletionState::default(),
        };
        let sat_table_id = match record.find_item("SAT_TABLE") {
            Some(item) => match item.get_int_opt(0)? {
                Some(id) => i32::try_from(id).map_err(|_| {
                    ScheduleError::invalid_deck(
                        keyword,
                        format!("SAT_TABLE {} is out of range", id),
                    )
                })?,
                None => 0,
            },
            None => 0,
        };
        let depth = Value::from_item(DEPTH, record.find_item(DEPTH))?;
        let transmissibility_factor =
            Value::from_item(TRANSMISSIBILITY_FACTOR, record.find_item(TRANSMISSIBILITY_FACTOR))?;
        let diameter = Value::from_item(DIAMETER, record.find_item(DIAMETER))?;
        let skin_factor = Value::from_item(SKIN, record.find_item(SKIN))?;

        Ok((k1..=k2)
            .enumerate()
            .map(|(offset, k)| Completion {
                i,
                j,
                k,
                ordinal: already_added + offset + 1,
                depth: depth.clone(),
                state,
                transmissibility_factor: transmissibility_factor.clone(),
                diameter: diameter.clone(),
                skin_factor: skin_factor.clone(),
                sat_table_id,
            })
            .collect())
    }
}

/// Read a 1-based grid coordinate and convert it to zero-based.
fn grid_index(keyword: &str, record: &DeckRecord, name: &str) -> Result<i32> {
    let value = record.item_named(name)?.get_int(0)?;
    if value < 1 || value > i64::from(i32::MAX) {
        return Err(ScheduleError::invalid_deck(
            keyword,
            format!("{} must be a positive grid index, got {}", name, value),
        ));
    }
    Ok(value as i32 - 1)
}

/// Builder for [`Completion`] values. Unset properties stay defaulted.
#[derive(Debug, Clone)]
pub struct CompletionBuilder {
    i: i32,
    j: i32,
    k: i32,
    ordinal: usize,
    depth: Value<f64>,
    state: CompletionState,
    transmissibility_factor: Value<f64>,
    diameter: Value<f64>,
    skin_factor: Value<f64>,
    sat_table_id: i32,
}

impl CompletionBuilder {
    /// Create a builder for cell `(i, j, k)`.
    pub fn new(i: i32, j: i32, k: i32) -> Self {
        Self {
            i,
            j,
            k,
            ordinal: 1,
            depth: Value::defaulted(DEPTH),
            state: CompletionState::Open,
            transmissibility_factor: Value::defaulted(TRANSMISSIBILITY_FACTOR),
            diameter: Value::defaulted(DIAMETER),
            skin_factor: Value::defaulted(SKIN),
            sat_table_id: 0,
        }
    }

    /// Set the completion number.
    pub fn ordinal(mut self, ordinal: usize) -> Self {
        self.ordinal = ordinal;
        self
    }

    /// Set an explicit depth.
    pub fn depth(mut self, depth: f64) -> Self {
        self.depth.set(depth);
        self
    }

    /// Set the state.
    pub fn state(mut self, state: CompletionState) -> Self {
        self.state = state;
        self
    }

    /// Set an explicit transmissibility factor.
    pub fn transmissibility_factor(mut self, factor: f64) -> Self {
        self.transmissibility_factor.set(factor);
        self
    }

    /// Set an explicit diameter.
    pub fn diameter(mut self, diameter: f64) -> Self {
        self.diameter.set(diameter);
        self
    }

    /// Set an explicit skin factor.
    pub fn skin_factor(mut self, skin: f64) -> Self {
        self.skin_factor.set(skin);
        self
    }

    /// Set the saturation table.
    pub fn sat_table_id(mut self, id: i32) -> Self {
        self.sat_table_id = id;
        self
    }

    /// Build the Completion.
    pub fn build(self) -> Completion {
        Completion {
            i: self.i,
            j: self.j,
            k: self.k,
            ordinal: self.ordinal,
            depth: self.depth,
            state: self.state,
            transmissibility_factor: self.transmissibility_factor,
            diameter: self.diameter,
            skin_factor: self.skin_factor,
            sat_table_id: self.sat_table_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::Deck;
    use serde_json::json;

    fn completion(i: i32, j: i32, k: i32) -> Completion {
        Completion::at(i, j, k)
            .state(CompletionState::Open)
            .transmissibility_factor(99.88)
            .diameter(22.33)
            .skin_factor(33.22)
            .build()
    }

    fn compdat(records: serde_json::Value) -> DeckKeyword {
        let deck = Deck::from_json_str(&json!([{"name": "COMPDAT", "records": records}]).to_string())
            .unwrap();
        deck.keyword("COMPDAT").unwrap().clone()
    }

    fn compdat_record(well: &str, i: i64, j: i64, k1: i64, k2: i64, state: &str) -> serde_json::Value {
        json!([
            {"name": "WELL", "values": [well]},
            {"name": "I", "values": [i]},
            {"name": "J", "values": [j]},
            {"name": "K1", "values": [k1]},
            {"name": "K2", "values": [k2]},
            {"name": "STATE", "values": [state]},
            {"name": "SAT_TABLE", "values": [2]},
            {"name": "CONNECTION_TRANSMISSIBILITY_FACTOR", "values": [null]},
            {"name": "DIAMETER", "values": [0.3]},
            {"name": "SKIN", "values": [null]}
        ])
    }

    #[test]
    fn test_get_functions() {
        let completion = Completion::at(10, 11, 12)
            .depth(0.0)
            .state(CompletionState::Open)
            .transmissibility_factor(99.88)
            .diameter(22.33)
            .skin_factor(33.22)
            .sat_table_id(0)
            .build();

        assert_eq!(completion.i(), 10);
        assert_eq!(completion.j(), 11);
        assert_eq!(completion.k(), 12);
        assert_eq!(completion.state(), CompletionState::Open);
        assert_eq!(completion.transmissibility_factor().get().unwrap(), 99.88);
        assert_eq!(completion.diameter().get().unwrap(), 22.33);
        assert_eq!(completion.skin_factor().get().unwrap(), 33.22);
        assert_eq!(completion.sat_table_id(), 0);
        assert_eq!(completion.ordinal(), 1);
        assert_eq!(completion.depth().get().unwrap(), 0.0);
        assert_eq!(completion.with_ordinal(4).ordinal(), 4);
    }

    #[test]
    fn test_same_coordinate() {
        let completion1 = completion(10, 10, 10);
        let completion2 = completion(10, 10, 10);
        let completion3 = completion(11, 10, 10);
        let completion4 = completion(10, 11, 10);
        let completion5 = completion(10, 10, 11);

        assert!(completion1.same_coordinate(&completion2));
        assert!(!completion1.same_coordinate(&completion3));
        assert!(!completion1.same_coordinate(&completion4));
        assert!(!completion1.same_coordinate(&completion5));
    }

    #[test]
    fn test_same_coordinate_ignores_properties() {
        let open = completion(4, 5, 6);
        let shut = Completion::at(4, 5, 6).state(CompletionState::Shut).sat_table_id(3).build();
        assert!(open.same_coordinate(&shut));
        assert_ne!(open, shut);
    }

    #[test]
    fn test_builder_leaves_properties_defaulted() {
        let completion = Completion::at(0, 0, 0).build();
        assert!(!completion.transmissibility_factor().has_value());
        assert!(!completion.diameter().has_value());
        assert!(!completion.skin_factor().has_value());
        assert!(!completion.depth().has_value());
        assert_eq!(completion.state(), CompletionState::Open);
    }

    #[test]
    fn test_from_compdat_expands_layers() {
        let keyword = compdat(json!([
            compdat_record("OP_1", 10, 20, 1, 3, "OPEN"),
            compdat_record("INJ", 1, 1, 5, 5, "SHUT"),
            compdat_record("OP_1", 11, 20, 4, 4, "AUTO"),
        ]));

        let completions = Completion::from_compdat(&keyword).unwrap();
        assert_eq!(completions.len(), 2);

        let producer = &completions["OP_1"];
        assert_eq!(producer.len(), 4);
        assert_eq!(producer[0].coordinate(), (9, 19, 0));
        assert_eq!(producer[2].coordinate(), (9, 19, 2));
        assert_eq!(producer[3].coordinate(), (10, 19, 3));
        assert_eq!(producer[3].state(), CompletionState::Auto);
        assert_eq!(
            producer.iter().map(Completion::ordinal).collect::<Vec<_>>(),
            vec![1, 2, 3, 4]
        );
        assert_eq!(producer[0].sat_table_id(), 2);
        assert_eq!(producer[0].diameter().get().unwrap(), 0.3);
        assert!(!producer[0].transmissibility_factor().has_value());
        assert!(!producer[0].skin_factor().has_value());

        let injector = &completions["INJ"];
        assert_eq!(injector.len(), 1);
        assert_eq!(injector[0].state(), CompletionState::Shut);
    }

    #[test]
    fn test_from_compdat_defaults_optional_items() {
        let keyword = compdat(json!([[
            {"name": "WELL", "values": ["OP_1"]},
            {"name": "I", "values": [1]},
            {"name": "J", "values": [2]},
            {"name": "K1", "values": [3]},
            {"name": "K2", "values": [3]},
            {"name": "STATE", "values": [null]}
        ]]));

        let completions = Completion::from_compdat(&keyword).unwrap();
        let completion = &completions["OP_1"][0];
        assert_eq!(completion.state(), CompletionState::Open);
        assert_eq!(completion.sat_table_id(), 0);
        assert!(!completion.diameter().has_value());
        assert!(!completion.depth().has_value());
    }

    #[test]
    fn test_from_compdat_reads_depth() {
        let keyword = compdat(json!([[
            {"name": "WELL", "values": ["OP_1"]},
            {"name": "I", "values": [1]},
            {"name": "J", "values": [1]},
            {"name": "K1", "values": [1]},
            {"name": "K2", "values": [2]},
            {"name": "DEPTH", "values": [1850.0]}
        ]]));

        let completions = Completion::from_compdat(&keyword).unwrap();
        assert!(completions["OP_1"]
            .iter()
            .all(|completion| completion.depth().get().unwrap() == 1850.0));
    }

    #[test]
    fn test_from_compdat_rejects_oversized_sat_table() {
        let keyword = compdat(json!([[
            {"name": "WELL", "values": ["OP_1"]},
            {"name": "I", "values": [1]},
            {"name": "J", "values": [1]},
            {"name": "K1", "values": [1]},
            {"name": "K2", "values": [1]},
            {"name": "SAT_TABLE", "values": [4_294_967_296_i64]}
        ]]));

        assert!(matches!(
            Completion::from_compdat(&keyword),
            Err(ScheduleError::InvalidDeck { .. })
        ));
    }

    #[test]
    fn test_from_compdat_rejects_unknown_state() {
        let keyword = compdat(json!([compdat_record("OP_1", 1, 1, 1, 1, "CLOSED")]));
        let err = Completion::from_compdat(&keyword).unwrap_err();
        assert!(matches!(err, ScheduleError::Value { .. }));
    }

    #[test]
    fn test_from_compdat_rejects_inverted_layers() {
        let keyword = compdat(json!([compdat_record("OP_1", 1, 1, 5, 2, "OPEN")]));
        assert!(matches!(
            Completion::from_compdat(&keyword),
            Err(ScheduleError::InvalidDeck { .. })
        ));

        let keyword = compdat(json!([compdat_record("OP_1", 0, 1, 1, 1, "OPEN")]));
        assert!(Completion::from_compdat(&keyword).is_err());
    }
}
