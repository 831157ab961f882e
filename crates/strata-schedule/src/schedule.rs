//! Single-pass compilation of a deck into a validated well model.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;
use strata_core::prelude::*;
use strata_state::TimeMap;
use tracing::{debug, info, warn};

use crate::config::ScheduleConfig;
use crate::section::{schedule_section, KeywordKind, SectionEntry};
use crate::well::Well;

/// Keyword holding the simulation start date.
const START: &str = "START";

/// The compiled schedule: one timeline and every declared well.
///
/// Built all-or-nothing; a deck that fails to compile yields no schedule.
#[derive(Debug, Clone, Serialize)]
pub struct Schedule {
    time_map: TimeMap,
    wells: HashMap<String, Well>,
}

impl Schedule {
    /// Compile `deck` with the default configuration.
    pub fn from_deck(deck: &Deck) -> Result<Self> {
        Self::with_config(deck, &ScheduleConfig::default())
    }

    /// Compile `deck`.
    pub fn with_config(deck: &Deck, config: &ScheduleConfig) -> Result<Self> {
        let section = schedule_section(deck)?;
        let time_map = create_time_map(deck, config)?;
        info!(
            "Compiling schedule of {} keywords starting {}",
            deck.len(),
            time_map.start_time()
        );

        let mut schedule = Self {
            time_map,
            wells: HashMap::new(),
        };
        for entry in section {
            let keyword = entry.keyword;
            schedule
                .apply(entry)
                .map_err(|err| rejected(keyword, err))?;
        }

        info!(
            "Compiled schedule: {} wells over {} report steps",
            schedule.num_wells(),
            schedule.num_report_steps()
        );
        Ok(schedule)
    }

    fn apply(&mut self, entry: SectionEntry<'_>) -> Result<()> {
        let SectionEntry {
            kind,
            keyword,
            step,
        } = entry;
        if kind.is_supported() {
            debug!(
                "Applying {} (deck index {}) at step {}",
                keyword.name(),
                keyword.index(),
                step
            );
        }

        match kind {
            KeywordKind::Dates => self.time_map.add_from_dates(keyword),
            KeywordKind::Tstep => self.handle_tstep(keyword),
            KeywordKind::Welspecs => self.handle_welspecs(keyword, step),
            KeywordKind::Wconhist => self.handle_wcon_producer(keyword, step, false),
            KeywordKind::Wconprod => self.handle_wcon_producer(keyword, step, true),
            KeywordKind::Wconinje => {
                self.handle_wcon_injector(keyword, step, "SURFACE_FLOW_TARGET", true)
            }
            KeywordKind::Wconinjh => self.handle_wcon_injector(keyword, step, "RATE", false),
            KeywordKind::Compdat => self.handle_compdat(keyword, step),
            KeywordKind::Unsupported => {
                debug!("Skipping unsupported keyword {}", keyword.name());
                Ok(())
            }
        }
    }

    fn handle_tstep(&mut self, keyword: &DeckKeyword) -> Result<()> {
        if keyword.len() > 1 {
            warn!(
                "TSTEP at deck index {} has {} records; only the first is used",
                keyword.index(),
                keyword.len()
            );
        }
        self.time_map.add_from_tstep(keyword)
    }

    fn handle_welspecs(&mut self, keyword: &DeckKeyword, step: usize) -> Result<()> {
        for record in keyword.records() {
            let name = record.item(0)?.get_string(0)?;
            let well = self.wells.entry(name.to_string()).or_insert_with(|| {
                debug!("Declaring well {} at step {}", name, step);
                Well::new(name, step)
            });
            well.apply_welspecs(record)?;
        }
        Ok(())
    }

    fn handle_wcon_producer(
        &mut self,
        keyword: &DeckKeyword,
        step: usize,
        prediction: bool,
    ) -> Result<()> {
        for record in keyword.records() {
            let well = resolve(&mut self.wells, record)?;
            let oil = rate(record, "ORAT")?;
            let water = rate(record, "WRAT")?;
            let gas = rate(record, "GRAT")?;

            well.set_oil_rate(&self.time_map, step, oil)?;
            well.set_water_rate(&self.time_map, step, water)?;
            well.set_gas_rate(&self.time_map, step, gas)?;
            well.set_in_prediction_mode(&self.time_map, step, prediction)?;
        }
        Ok(())
    }

    fn handle_wcon_injector(
        &mut self,
        keyword: &DeckKeyword,
        step: usize,
        rate_item: &str,
        prediction: bool,
    ) -> Result<()> {
        for record in keyword.records() {
            let well = resolve(&mut self.wells, record)?;
            let injection = rate(record, rate_item)?;

            well.set_injection_rate(&self.time_map, step, injection)?;
            well.set_in_prediction_mode(&self.time_map, step, prediction)?;
        }
        Ok(())
    }

    fn handle_compdat(&mut self, keyword: &DeckKeyword, step: usize) -> Result<()> {
        for (name, completions) in Completion::from_compdat(keyword)? {
            let well = self
                .wells
                .get_mut(&name)
                .ok_or_else(|| ScheduleError::unknown_well(&name))?;
            debug!(
                "Adding {} completions to well {} at step {}",
                completions.len(),
                name,
                step
            );
            well.add_completions(&self.time_map, step, completions)?;
        }
        Ok(())
    }

    /// Date of the first time point.
    pub fn start_date(&self) -> NaiveDate {
        self.time_map.start_date()
    }

    /// The report-step timeline.
    pub fn time_map(&self) -> &TimeMap {
        &self.time_map
    }

    /// Number of time points, i.e. valid report steps `0..num_report_steps()`.
    pub fn num_report_steps(&self) -> usize {
        self.time_map.len()
    }

    pub fn num_wells(&self) -> usize {
        self.wells.len()
    }

    pub fn has_well(&self, name: &str) -> bool {
        self.wells.contains_key(name)
    }

    /// Look up a declared well.
    pub fn well(&self, name: &str) -> Result<&Well> {
        self.wells
            .get(name)
            .ok_or_else(|| ScheduleError::unknown_well(name))
    }

    /// All declared wells, in no particular order.
    pub fn wells(&self) -> impl Iterator<Item = &Well> {
        self.wells.values()
    }
}

/// Attach the keyword to a failure and log why compilation stopped.
fn rejected(keyword: &DeckKeyword, err: ScheduleError) -> ScheduleError {
    let err = err.within(keyword.name());
    if let Some(name) = err.unresolved_name() {
        warn!(
            "{} at deck index {} names undeclared well {}",
            keyword.name(),
            keyword.index(),
            name
        );
    } else if err.is_input_error() {
        warn!(
            "Rejected {} at deck index {}: {}",
            keyword.name(),
            keyword.index(),
            err
        );
    }
    err
}

fn create_time_map(deck: &Deck, config: &ScheduleConfig) -> Result<TimeMap> {
    match deck.keyword(START) {
        Some(start) => {
            let time = TimeMap::date_from_record(start.record(0)?)
                .map_err(|err| err.within(START))?;
            Ok(TimeMap::starting_at(time))
        }
        None => Ok(TimeMap::new(config.default_start_date)),
    }
}

/// Find the well named by the record's `WELL` item.
fn resolve<'w>(wells: &'w mut HashMap<String, Well>, record: &DeckRecord) -> Result<&'w mut Well> {
    let name = record.item_named("WELL")?.get_string(0)?;
    wells
        .get_mut(name)
        .ok_or_else(|| ScheduleError::unknown_well(name))
}

/// A rate item, 0.0 when absent or defaulted.
fn rate(record: &DeckRecord, name: &str) -> Result<f64> {
    match record.find_item(name) {
        Some(item) if !item.is_empty() => item.get_double_or(0, 0.0),
        _ => Ok(0.0),
    }
}
