//! # Strata Schedule
//!
//! Compiles the SCHEDULE section of a deck into a [`Schedule`]: a report-step
//! timeline plus every declared [`Well`] with its step-indexed controls and
//! completions.
//!
//! ```no_run
//! use strata_core::Deck;
//! use strata_schedule::Schedule;
//!
//! # fn main() -> strata_core::Result<()> {
//! let deck = Deck::from_json_str(r#"[{"name": "SCHEDULE"}]"#)?;
//! let schedule = Schedule::from_deck(&deck)?;
//! assert_eq!(schedule.num_wells(), 0);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod schedule;
pub mod section;
pub mod well;

pub use config::ScheduleConfig;
pub use schedule::Schedule;
pub use section::{schedule_section, KeywordKind, SectionEntry};
pub use well::Well;
