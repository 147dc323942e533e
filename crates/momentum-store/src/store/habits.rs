//! Habit CRUD, per-day progress records, and streak updates.

use super::Store;
use chrono::{Duration, NaiveDate};
use momentum_core::entities::{DayProgress, Difficulty, Habit};
use momentum_core::error::MomentumError;

/// Raw habit row as stored.
pub(super) type HabitRow = (
    i64,    // id
    i64,    // user_id
    String, // name
    String, // description
    String, // category
    String, // difficulty
    i64,    // streak
    i64,    // best_streak
    i64,    // total_completed
    i64,    // active
    String, // created_at
);

const HABIT_COLS: &str =
    "id, user_id, name, description, category, difficulty, streak, best_streak, \
     total_completed, active, created_at";

pub(super) fn habit_from_row(row: HabitRow) -> Habit {
    Habit {
        id: row.0,
        user_id: row.1,
        name: row.2,
        description: row.3,
        category: row.4,
        difficulty: row.5.parse().unwrap_or(Difficulty::Medium),
        streak: row.6,
        best_streak: row.7,
        total_completed: row.8,
        active: row.9 != 0,
        created_at: row.10,
    }
}

fn day_key(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

impl Store {
    /// Create a habit with zeroed counters and an empty progress record.
    pub async fn create_habit(
        &self,
        user_id: i64,
        name: &str,
        description: &str,
        category: &str,
        difficulty: Difficulty,
    ) -> Result<i64, MomentumError> {
        let result = sqlx::query(
            "INSERT INTO habits (user_id, name, description, category, difficulty) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(name)
        .bind(description)
        .bind(category)
        .bind(difficulty.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| MomentumError::Store(format!("create habit failed: {e}")))?;

        Ok(result.last_insert_rowid())
    }

    /// Get a single habit by id.
    pub async fn habit(&self, habit_id: i64) -> Result<Option<Habit>, MomentumError> {
        let row: Option<HabitRow> =
            sqlx::query_as(&format!("SELECT {HABIT_COLS} FROM habits WHERE id = ?"))
                .bind(habit_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| MomentumError::Store(format!("get habit failed: {e}")))?;

        Ok(row.map(habit_from_row))
    }

    /// List a user's habits, ordered by streak descending, then newest first.
    /// The id tie-break keeps ordering stable for habits created in the same
    /// second (ids are monotonic).
    pub async fn list_habits(
        &self,
        user_id: i64,
        active_only: bool,
    ) -> Result<Vec<Habit>, MomentumError> {
        let sql = if active_only {
            format!(
                "SELECT {HABIT_COLS} FROM habits WHERE user_id = ? AND active = 1 \
                 ORDER BY streak DESC, created_at DESC, id DESC"
            )
        } else {
            format!(
                "SELECT {HABIT_COLS} FROM habits WHERE user_id = ? \
                 ORDER BY streak DESC, created_at DESC, id DESC"
            )
        };

        let rows: Vec<HabitRow> = sqlx::query_as(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| MomentumError::Store(format!("list habits failed: {e}")))?;

        Ok(rows.into_iter().map(habit_from_row).collect())
    }

    /// List a user's active habits together with whether each was completed
    /// on `day`. Drives the dashboard's quick-action buttons.
    pub async fn list_habits_on(
        &self,
        user_id: i64,
        day: NaiveDate,
    ) -> Result<Vec<(Habit, bool)>, MomentumError> {
        let sql = "SELECT h.id, h.user_id, h.name, h.description, h.category, h.difficulty, \
                    h.streak, h.best_streak, h.total_completed, h.active, h.created_at, \
                    COALESCE(p.completed, 0) \
             FROM habits h LEFT JOIN habit_progress p \
               ON p.habit_id = h.id AND p.day = ? \
             WHERE h.user_id = ? AND h.active = 1 \
             ORDER BY h.streak DESC, h.created_at DESC, h.id DESC";

        type JoinedRow = (
            i64,
            i64,
            String,
            String,
            String,
            String,
            i64,
            i64,
            i64,
            i64,
            String,
            i64,
        );
        let rows: Vec<JoinedRow> = sqlx::query_as(sql)
            .bind(day_key(day))
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| MomentumError::Store(format!("list habits failed: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|r| {
                let done = r.11 != 0;
                (
                    habit_from_row((
                        r.0, r.1, r.2, r.3, r.4, r.5, r.6, r.7, r.8, r.9, r.10,
                    )),
                    done,
                )
            })
            .collect())
    }

    /// Mark a habit complete for `day`. Returns `false` if the habit does
    /// not exist.
    ///
    /// Idempotent per calendar day: marking an already-completed day is a
    /// successful no-op and does not touch the streak. On a new day the
    /// streak extends by one when the previous completed day is exactly the
    /// day before, otherwise it restarts at 1; `best_streak` is raised when
    /// exceeded and `total_completed` incremented.
    pub async fn mark_habit_done(
        &self,
        habit_id: i64,
        day: NaiveDate,
        notes: &str,
    ) -> Result<bool, MomentumError> {
        let habit: Option<(i64,)> = sqlx::query_as("SELECT streak FROM habits WHERE id = ?")
            .bind(habit_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| MomentumError::Store(format!("mark habit fetch failed: {e}")))?;

        let Some((streak,)) = habit else {
            return Ok(false);
        };

        let already: Option<(i64,)> = sqlx::query_as(
            "SELECT completed FROM habit_progress WHERE habit_id = ? AND day = ?",
        )
        .bind(habit_id)
        .bind(day_key(day))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| MomentumError::Store(format!("progress check failed: {e}")))?;

        if matches!(already, Some((c,)) if c != 0) {
            return Ok(true);
        }

        let previous: Option<(String,)> = sqlx::query_as(
            "SELECT day FROM habit_progress \
             WHERE habit_id = ? AND completed = 1 AND day < ? \
             ORDER BY day DESC LIMIT 1",
        )
        .bind(habit_id)
        .bind(day_key(day))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| MomentumError::Store(format!("previous day lookup failed: {e}")))?;

        let consecutive = previous
            .and_then(|(d,)| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok())
            .map(|prev| prev + Duration::days(1) == day)
            .unwrap_or(false);

        let new_streak = if consecutive { streak + 1 } else { 1 };

        sqlx::query(
            "INSERT INTO habit_progress (habit_id, day, completed, notes) VALUES (?, ?, 1, ?) \
             ON CONFLICT(habit_id, day) DO UPDATE SET \
               completed = 1, notes = excluded.notes, recorded_at = datetime('now')",
        )
        .bind(habit_id)
        .bind(day_key(day))
        .bind(notes)
        .execute(&self.pool)
        .await
        .map_err(|e| MomentumError::Store(format!("record progress failed: {e}")))?;

        sqlx::query(
            "UPDATE habits SET streak = ?, best_streak = MAX(best_streak, ?), \
             total_completed = total_completed + 1 WHERE id = ?",
        )
        .bind(new_streak)
        .bind(new_streak)
        .bind(habit_id)
        .execute(&self.pool)
        .await
        .map_err(|e| MomentumError::Store(format!("streak update failed: {e}")))?;

        Ok(true)
    }

    /// Get a habit's completion record for one day.
    pub async fn habit_day(
        &self,
        habit_id: i64,
        day: NaiveDate,
    ) -> Result<Option<DayProgress>, MomentumError> {
        let row: Option<(String, i64, String, String)> = sqlx::query_as(
            "SELECT day, completed, notes, recorded_at \
             FROM habit_progress WHERE habit_id = ? AND day = ?",
        )
        .bind(habit_id)
        .bind(day_key(day))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| MomentumError::Store(format!("get progress failed: {e}")))?;

        Ok(row.and_then(progress_from_row))
    }

    /// Get a habit's completion records within `[from, to]`, ordered by day.
    pub async fn habit_progress_window(
        &self,
        habit_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DayProgress>, MomentumError> {
        let rows: Vec<(String, i64, String, String)> = sqlx::query_as(
            "SELECT day, completed, notes, recorded_at \
             FROM habit_progress WHERE habit_id = ? AND day >= ? AND day <= ? \
             ORDER BY day ASC",
        )
        .bind(habit_id)
        .bind(day_key(from))
        .bind(day_key(to))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| MomentumError::Store(format!("progress window failed: {e}")))?;

        Ok(rows.into_iter().filter_map(progress_from_row).collect())
    }

    /// Number of habits a user has ever created (active or not).
    pub async fn count_habits(&self, user_id: i64) -> Result<i64, MomentumError> {
        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM habits WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| MomentumError::Store(format!("count habits failed: {e}")))?;
        Ok(n)
    }

    /// Total habit completions across all of a user's habits.
    pub async fn total_habit_completions(&self, user_id: i64) -> Result<i64, MomentumError> {
        let (n,): (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(total_completed), 0) FROM habits WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| MomentumError::Store(format!("completion sum failed: {e}")))?;
        Ok(n)
    }
}

fn progress_from_row(row: (String, i64, String, String)) -> Option<DayProgress> {
    let day = NaiveDate::parse_from_str(&row.0, "%Y-%m-%d").ok()?;
    Some(DayProgress {
        day,
        completed: row.1 != 0,
        notes: row.2,
        recorded_at: row.3,
    })
}
