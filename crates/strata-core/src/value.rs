//! Named values that may be left to a computed default.

use serde::{Deserialize, Serialize};

use crate::deck::DeckItem;
use crate::error::{Result, ScheduleError};

/// A named property that is either explicitly supplied or defaulted.
///
/// A defaulted value carries no number; downstream consumers compute it
/// (for example a connection factor derived from grid geometry).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Value<T> {
    name: String,
    value: Option<T>,
}

impl<T: Clone> Value<T> {
    /// Create a defaulted value.
    pub fn defaulted(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }

    /// Create an explicitly supplied value.
    pub fn new(name: impl Into<String>, value: T) -> Self {
        Self {
            name: name.into(),
            value: Some(value),
        }
    }

    /// Name of the property.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the value was explicitly supplied.
    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    /// The supplied value, or a `Value` error if it was defaulted.
    pub fn get(&self) -> Result<T> {
        self.value.clone().ok_or_else(|| {
            ScheduleError::invalid_value(format!("Value {} has not been assigned", self.name))
        })
    }

    /// The supplied value, if any.
    pub fn as_option(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Assign an explicit value.
    pub fn set(&mut self, value: T) {
        self.value = Some(value);
    }
}

impl Value<f64> {
    /// Read entry 0 of an optional deck item; absent or defaulted items yield a defaulted value.
    pub fn from_item(name: impl Into<String>, item: Option<&DeckItem>) -> Result<Self> {
        let name = name.into();
        let supplied = match item {
            Some(item) if !item.is_empty() => item.get_double_opt(0)?,
            _ => None,
        };
        Ok(Self {
            name,
            value: supplied,
        })
    }
}
