//! Tokenized deck input: keywords made of records made of items.
//!
//! The deck is produced by an external tokenizer. This module only fixes its
//! in-memory shape and the typed accessors the schedule compiler relies on.
//! A deck round-trips through JSON as an array of keywords, with `null`
//! marking a defaulted item entry:
//!
//! ```json
//! [{"name": "WELSPECS", "records": [[{"name": "WELL", "values": ["OP_1"]}]]}]
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};

/// A single typed entry of a deck item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeckValue {
    /// Integer entry.
    Int(i64),
    /// Floating point entry.
    Double(f64),
    /// String entry.
    Str(String),
}

impl DeckValue {
    fn type_name(&self) -> &'static str {
        match self {
            DeckValue::Int(_) => "int",
            DeckValue::Double(_) => "double",
            DeckValue::Str(_) => "string",
        }
    }
}

/// One named field of a record. Entries set to `None` were defaulted in the deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckItem {
    name: String,
    #[serde(default)]
    values: Vec<Option<DeckValue>>,
}

impl DeckItem {
    /// Create an item from its entries.
    pub fn new(name: impl Into<String>, values: Vec<Option<DeckValue>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Item name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw entries.
    pub fn values(&self) -> &[Option<DeckValue>] {
        &self.values
    }

    /// Whether entry `index` was defaulted.
    pub fn default_applied(&self, index: usize) -> Result<bool> {
        Ok(self.entry(index)?.is_none())
    }

    /// Integer entry.
    pub fn get_int(&self, index: usize) -> Result<i64> {
        self.get_int_opt(index)?
            .ok_or_else(|| self.defaulted_error(index))
    }

    /// Floating point entry; integers widen.
    pub fn get_double(&self, index: usize) -> Result<f64> {
        self.get_double_opt(index)?
            .ok_or_else(|| self.defaulted_error(index))
    }

    /// String entry.
    pub fn get_string(&self, index: usize) -> Result<&str> {
        self.get_string_opt(index)?
            .ok_or_else(|| self.defaulted_error(index))
    }

    /// Integer entry, `None` if defaulted.
    pub fn get_int_opt(&self, index: usize) -> Result<Option<i64>> {
        match self.entry(index)? {
            None => Ok(None),
            Some(DeckValue::Int(value)) => Ok(Some(*value)),
            Some(other) => Err(self.type_error(index, "int", other)),
        }
    }

    /// Floating point entry, `None` if defaulted.
    pub fn get_double_opt(&self, index: usize) -> Result<Option<f64>> {
        match self.entry(index)? {
            None => Ok(None),
            Some(DeckValue::Double(value)) => Ok(Some(*value)),
            Some(DeckValue::Int(value)) => Ok(Some(*value as f64)),
            Some(other) => Err(self.type_error(index, "double", other)),
        }
    }

    /// String entry, `None` if defaulted.
    pub fn get_string_opt(&self, index: usize) -> Result<Option<&str>> {
        match self.entry(index)? {
            None => Ok(None),
            Some(DeckValue::Str(value)) => Ok(Some(value.as_str())),
            Some(other) => Err(self.type_error(index, "string", other)),
        }
    }

    /// Integer entry, or `fallback` if defaulted.
    pub fn get_int_or(&self, index: usize, fallback: i64) -> Result<i64> {
        Ok(self.get_int_opt(index)?.unwrap_or(fallback))
    }

    /// Floating point entry, or `fallback` if defaulted.
    pub fn get_double_or(&self, index: usize, fallback: f64) -> Result<f64> {
        Ok(self.get_double_opt(index)?.unwrap_or(fallback))
    }

    /// String entry, or `fallback` if defaulted.
    pub fn get_string_or<'a>(&'a self, index: usize, fallback: &'a str) -> Result<&'a str> {
        Ok(self.get_string_opt(index)?.unwrap_or(fallback))
    }

    /// Every entry as a floating point number. Defaulted entries are an error.
    pub fn get_doubles(&self) -> Result<Vec<f64>> {
        (0..self.len()).map(|index| self.get_double(index)).collect()
    }

    fn entry(&self, index: usize) -> Result<Option<&DeckValue>> {
        self.values
            .get(index)
            .map(Option::as_ref)
            .ok_or_else(|| {
                ScheduleError::invalid_deck(
                    format!("item {}", self.name),
                    format!("no entry {} (item has {})", index, self.values.len()),
                )
            })
    }

    fn defaulted_error(&self, index: usize) -> ScheduleError {
        ScheduleError::invalid_deck(
            format!("item {}", self.name),
            format!("entry {} is defaulted but a value is required", index),
        )
    }

    fn type_error(&self, index: usize, expected: &str, found: &DeckValue) -> ScheduleError {
        ScheduleError::invalid_deck(
            format!("item {}", self.name),
            format!(
                "entry {} is a {}, expected {}",
                index,
                found.type_name(),
                expected
            ),
        )
    }
}

/// One row of a keyword.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeckRecord {
    items: Vec<DeckItem>,
}

impl DeckRecord {
    /// Create a record from its items.
    pub fn new(items: Vec<DeckItem>) -> Self {
        Self { items }
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in positional order.
    pub fn items(&self) -> &[DeckItem] {
        &self.items
    }

    /// Item by position.
    pub fn item(&self, index: usize) -> Result<&DeckItem> {
        self.items.get(index).ok_or_else(|| {
            ScheduleError::invalid_deck(
                "record",
                format!("no item at position {} (record has {})", index, self.items.len()),
            )
        })
    }

    /// Item by name.
    pub fn item_named(&self, name: &str) -> Result<&DeckItem> {
        self.find_item(name)
            .ok_or_else(|| ScheduleError::invalid_deck("record", format!("missing item {}", name)))
    }

    /// Item by name, if present.
    pub fn find_item(&self, name: &str) -> Option<&DeckItem> {
        self.items.iter().find(|item| item.name == name)
    }
}

/// A named section of the deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckKeyword {
    name: String,
    #[serde(default)]
    records: Vec<DeckRecord>,
    /// Position in the owning deck, assigned by [`Deck`].
    #[serde(skip)]
    index: usize,
}

impl DeckKeyword {
    /// Create a keyword. Its position is assigned when it is added to a [`Deck`].
    pub fn new(name: impl Into<String>, records: Vec<DeckRecord>) -> Self {
        Self {
            name: name.into(),
            records,
            index: 0,
        }
    }

    /// Keyword name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Position of this keyword in the deck.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Records in order.
    pub fn records(&self) -> &[DeckRecord] {
        &self.records
    }

    /// Record by position.
    pub fn record(&self, index: usize) -> Result<&DeckRecord> {
        self.records.get(index).ok_or_else(|| {
            ScheduleError::invalid_deck(
                self.name.clone(),
                format!("no record {} (keyword has {})", index, self.records.len()),
            )
        })
    }
}

/// Ordered sequence of keywords.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<DeckKeyword>", into = "Vec<DeckKeyword>")]
pub struct Deck {
    keywords: Vec<DeckKeyword>,
}

impl Deck {
    /// Create a deck, numbering keywords by position.
    pub fn new(keywords: Vec<DeckKeyword>) -> Self {
        let mut deck = Self::default();
        for keyword in keywords {
            deck.push(keyword);
        }
        deck
    }

    /// Parse a deck from its JSON form.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Append a keyword at the end of the deck.
    pub fn push(&mut self, mut keyword: DeckKeyword) {
        keyword.index = self.keywords.len();
        self.keywords.push(keyword);
    }

    /// Number of keywords.
    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Keywords in deck order.
    pub fn iter(&self) -> std::slice::Iter<'_, DeckKeyword> {
        self.keywords.iter()
    }

    /// Keyword at a deck position.
    pub fn keyword_at(&self, index: usize) -> Option<&DeckKeyword> {
        self.keywords.get(index)
    }

    /// Whether any keyword has this name.
    pub fn has_keyword(&self, name: &str) -> bool {
        self.keyword(name).is_some()
    }

    /// First keyword with this name.
    pub fn keyword(&self, name: &str) -> Option<&DeckKeyword> {
        self.keywords.iter().find(|keyword| keyword.name == name)
    }

    /// Number of keywords with this name.
    pub fn count(&self, name: &str) -> usize {
        self.keywords
            .iter()
            .filter(|keyword| keyword.name == name)
            .count()
    }
}

impl From<Vec<DeckKeyword>> for Deck {
    fn from(keywords: Vec<DeckKeyword>) -> Self {
        Deck::new(keywords)
    }
}

impl From<Deck> for Vec<DeckKeyword> {
    fn from(deck: Deck) -> Self {
        deck.keywords
    }
}

impl<'a> IntoIterator for &'a Deck {
    type Item = &'a DeckKeyword;
    type IntoIter = std::slice::Iter<'a, DeckKeyword>;

    fn into_iter(self) -> Self::IntoIter {
        self.keywords.iter()
    }
}
