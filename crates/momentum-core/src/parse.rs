//! Pipe-delimited command argument parsing.
//!
//! Free-text arguments are split on a literal `|`, each segment trimmed.
//! Positional meaning is fixed per entity kind; missing trailing segments
//! take documented defaults. Malformed input is rejected here, before the
//! store is ever called.

use crate::entities::{Difficulty, Mood, Priority};
use chrono::{Duration, NaiveDate, Utc};
use thiserror::Error;

/// Validation error for user-supplied arguments.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid {field} '{value}' (expected one of: {expected})")]
    InvalidValue {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("invalid date '{0}' (expected YYYY-MM-DD, 'today', or 'tomorrow')")]
    InvalidDate(String),
}

/// Split raw argument text into trimmed pipe-delimited segments.
fn segments(text: &str) -> Vec<&str> {
    text.split('|').map(str::trim).collect()
}

fn segment(parts: &[&str], idx: usize) -> Option<String> {
    parts
        .get(idx)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

/// Parsed `/add_habit` arguments: name | description | category | difficulty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitArgs {
    pub name: String,
    pub description: String,
    pub category: String,
    pub difficulty: Difficulty,
}

impl HabitArgs {
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let parts = segments(text);
        let name = segment(&parts, 0).ok_or(ParseError::MissingField("name"))?;
        let description = segment(&parts, 1).unwrap_or_default();
        let category = segment(&parts, 2).unwrap_or_else(|| "general".to_string());
        let difficulty = match segment(&parts, 3) {
            Some(raw) => raw.parse().map_err(|_| ParseError::InvalidValue {
                field: "difficulty",
                value: raw,
                expected: "easy, medium, hard",
            })?,
            None => Difficulty::Medium,
        };
        Ok(Self {
            name,
            description,
            category,
            difficulty,
        })
    }
}

/// Parsed `/add_task` arguments: title | description | priority | due date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskArgs {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
}

impl TaskArgs {
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let parts = segments(text);
        let title = segment(&parts, 0).ok_or(ParseError::MissingField("title"))?;
        let description = segment(&parts, 1).unwrap_or_default();
        let priority = match segment(&parts, 2) {
            Some(raw) => raw.parse().map_err(|_| ParseError::InvalidValue {
                field: "priority",
                value: raw,
                expected: "high, medium, low",
            })?,
            None => Priority::Medium,
        };
        let due_date = match segment(&parts, 3) {
            Some(raw) => Some(parse_due_date(&raw)?),
            None => None,
        };
        Ok(Self {
            title,
            description,
            priority,
            due_date,
        })
    }
}

/// Parsed `/add_note` arguments: title | content | category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteArgs {
    pub title: String,
    pub content: String,
    pub category: String,
}

impl NoteArgs {
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let parts = segments(text);
        let title = segment(&parts, 0).ok_or(ParseError::MissingField("title"))?;
        let content = segment(&parts, 1).unwrap_or_default();
        let category = segment(&parts, 2).unwrap_or_else(|| "general".to_string());
        Ok(Self {
            title,
            content,
            category,
        })
    }
}

/// Parsed `/mood` arguments: mood | notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodArgs {
    pub mood: Mood,
    pub notes: String,
}

impl MoodArgs {
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let parts = segments(text);
        let raw = segment(&parts, 0).ok_or(ParseError::MissingField("mood"))?;
        let mood = raw
            .to_lowercase()
            .parse()
            .map_err(|_| ParseError::InvalidValue {
                field: "mood",
                value: raw,
                expected: "awesome, happy, neutral, sad, angry",
            })?;
        let notes = segment(&parts, 1).unwrap_or_default();
        Ok(Self { mood, notes })
    }
}

/// Parse a due date: `YYYY-MM-DD`, `today`, or `tomorrow`.
pub fn parse_due_date(raw: &str) -> Result<NaiveDate, ParseError> {
    let today = Utc::now().date_naive();
    match raw {
        "today" => Ok(today),
        "tomorrow" => Ok(today + Duration::days(1)),
        other => NaiveDate::parse_from_str(other, "%Y-%m-%d")
            .map_err(|_| ParseError::InvalidDate(other.to_string())),
    }
}
