//! Typed entity records persisted by the store.
//!
//! All entities are scoped by an opaque numeric user id. Identifiers are
//! SQLite `AUTOINCREMENT` integers, so creation order is recoverable from id.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Habit difficulty level.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task priority. Ordering for lists: high before medium before low.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Sort rank used by task listings (unknown values rank last in SQL).
    pub fn rank(&self) -> i64 {
        match self {
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }
}

impl FromStr for Priority {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recorded mood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Awesome,
    Happy,
    Neutral,
    Sad,
    Angry,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Awesome => "awesome",
            Self::Happy => "happy",
            Self::Neutral => "neutral",
            Self::Sad => "sad",
            Self::Angry => "angry",
        }
    }

    pub const ALL: [Mood; 5] = [
        Mood::Awesome,
        Mood::Happy,
        Mood::Neutral,
        Mood::Sad,
        Mood::Angry,
    ];
}

impl FromStr for Mood {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "awesome" => Ok(Self::Awesome),
            "happy" => Ok(Self::Happy),
            "neutral" => Ok(Self::Neutral),
            "sad" => Ok(Self::Sad),
            "angry" => Ok(Self::Angry),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tracked habit. Per-day completion lives in the progress table and is
/// queried separately.
///
/// Invariant: `best_streak >= streak`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Habit {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub streak: i64,
    pub best_streak: i64,
    pub total_completed: i64,
    pub active: bool,
    pub created_at: String,
}

/// One day's completion record for a habit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayProgress {
    pub day: NaiveDate,
    pub completed: bool,
    pub notes: String,
    pub recorded_at: String,
}

/// A one-off task with a priority and optional due date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub completed: bool,
    pub created_at: String,
}

/// A free-form note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub content: String,
    pub category: String,
    pub created_at: String,
    pub updated_at: String,
}

/// An append-only mood log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodEntry {
    pub id: i64,
    pub user_id: i64,
    pub mood: Mood,
    pub notes: String,
    pub recorded_at: String,
}

/// A user's unlocked achievement. The (user_id, achievement_id) pair is
/// set-once; the first unlock timestamp is kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementUnlock {
    pub user_id: i64,
    pub achievement_id: String,
    pub unlocked_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_round_trips() {
        for d in ["easy", "medium", "hard"] {
            assert_eq!(d.parse::<Difficulty>().unwrap().as_str(), d);
        }
        for p in ["high", "medium", "low"] {
            assert_eq!(p.parse::<Priority>().unwrap().as_str(), p);
        }
        for m in Mood::ALL {
            assert_eq!(m.as_str().parse::<Mood>().unwrap(), m);
        }
        assert!("extreme".parse::<Difficulty>().is_err());
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn test_priority_rank_order() {
        assert!(Priority::High.rank() < Priority::Medium.rank());
        assert!(Priority::Medium.rank() < Priority::Low.rank());
    }
}
