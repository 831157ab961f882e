//! Keyword classification and the stepped SCHEDULE section sequence.

use strata_core::{Deck, DeckItem, DeckKeyword, Result, ScheduleError};

/// Name of the keyword that opens the schedule section.
pub const SCHEDULE_MARKER: &str = "SCHEDULE";

/// Every keyword the compiler knows, plus a catch-all for the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordKind {
    /// Calendar dates, one report step per record.
    Dates,
    /// Day offsets, one report step per entry.
    Tstep,
    /// Well declarations.
    Welspecs,
    /// Historical production controls.
    Wconhist,
    /// Predictive production controls.
    Wconprod,
    /// Predictive injection controls.
    Wconinje,
    /// Historical injection controls.
    Wconinjh,
    /// Completion data.
    Compdat,
    /// Any other keyword. Skipped.
    Unsupported,
}

impl KeywordKind {
    /// Classify a keyword by name.
    pub fn classify(name: &str) -> Self {
        match name {
            "DATES" => KeywordKind::Dates,
            "TSTEP" => KeywordKind::Tstep,
            "WELSPECS" => KeywordKind::Welspecs,
            "WCONHIST" => KeywordKind::Wconhist,
            "WCONPROD" => KeywordKind::Wconprod,
            "WCONINJE" => KeywordKind::Wconinje,
            "WCONINJH" => KeywordKind::Wconinjh,
            "COMPDAT" => KeywordKind::Compdat,
            _ => KeywordKind::Unsupported,
        }
    }

    /// Whether the compiler acts on this kind.
    pub fn is_supported(self) -> bool {
        self != KeywordKind::Unsupported
    }

    /// Number of report steps a keyword of this kind adds to the timeline.
    ///
    /// TSTEP counts the entries of the first item of its first record only.
    pub fn step_advance(self, keyword: &DeckKeyword) -> usize {
        match self {
            KeywordKind::Dates => keyword.len(),
            KeywordKind::Tstep => keyword
                .records()
                .first()
                .and_then(|record| record.items().first())
                .map_or(0, DeckItem::len),
            KeywordKind::Welspecs
            | KeywordKind::Wconhist
            | KeywordKind::Wconprod
            | KeywordKind::Wconinje
            | KeywordKind::Wconinjh
            | KeywordKind::Compdat
            | KeywordKind::Unsupported => 0,
        }
    }
}

/// A keyword of the schedule section together with the report step it applies to.
#[derive(Debug, Clone, Copy)]
pub struct SectionEntry<'a> {
    /// Classified kind.
    pub kind: KeywordKind,
    /// The keyword itself.
    pub keyword: &'a DeckKeyword,
    /// Report step in effect when the keyword is reached.
    pub step: usize,
}

/// Lazily walk every keyword after the SCHEDULE marker, tracking the current report step.
///
/// Fails with a configuration error unless the deck has exactly one SCHEDULE keyword.
pub fn schedule_section<'a>(deck: &'a Deck) -> Result<impl Iterator<Item = SectionEntry<'a>> + 'a> {
    let marker = locate_marker(deck)?;

    Ok(deck
        .iter()
        .skip(marker.index() + 1)
        .scan(0usize, |step, keyword| {
            let kind = KeywordKind::classify(keyword.name());
            let entry = SectionEntry {
                kind,
                keyword,
                step: *step,
            };
            *step += kind.step_advance(keyword);
            Some(entry)
        }))
}

fn locate_marker(deck: &Deck) -> Result<&DeckKeyword> {
    let missing = || ScheduleError::Configuration {
        message: "Deck does not contain SCHEDULE section".to_string(),
    };
    match deck.count(SCHEDULE_MARKER) {
        0 => Err(missing()),
        1 => deck.keyword(SCHEDULE_MARKER).ok_or_else(missing),
        n => Err(ScheduleError::Configuration {
            message: format!("Deck contains {} SCHEDULE sections, expected one", n),
        }),
    }
}
