//! Admin-only operations: cross-user aggregates, full reset, export/import.

use super::habits::habit_from_row;
use super::moods::mood_from_row;
use super::notes::note_from_row;
use super::tasks::task_from_row;
use super::Store;
use chrono::NaiveDate;
use momentum_core::entities::{AchievementUnlock, DayProgress, Habit, MoodEntry, Note, Task};
use momentum_core::error::MomentumError;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Aggregate counts across every entity collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub users: i64,
    pub habits: i64,
    pub tasks: i64,
    pub tasks_completed: i64,
    pub notes: i64,
    pub moods: i64,
    pub achievements: i64,
}

/// A habit together with its full per-day completion record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitExport {
    pub habit: Habit,
    pub progress: Vec<DayProgress>,
}

/// Serialized snapshot of every entity collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub habits: Vec<HabitExport>,
    pub tasks: Vec<Task>,
    pub notes: Vec<Note>,
    pub moods: Vec<MoodEntry>,
    pub achievements: Vec<AchievementUnlock>,
}

impl Store {
    /// All user ids that own any entity, ascending.
    pub async fn list_all_users(&self) -> Result<Vec<i64>, MomentumError> {
        let rows: Vec<(i64,)> = sqlx::query_as(
            "SELECT DISTINCT user_id FROM ( \
               SELECT user_id FROM habits UNION \
               SELECT user_id FROM tasks UNION \
               SELECT user_id FROM notes UNION \
               SELECT user_id FROM moods UNION \
               SELECT user_id FROM achievements) \
             ORDER BY user_id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| MomentumError::Store(format!("list users failed: {e}")))?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Aggregate counts across all users.
    pub async fn totals(&self) -> Result<Totals, MomentumError> {
        let users = self.list_all_users().await?.len() as i64;
        let count = |sql: &'static str| {
            let pool = self.pool.clone();
            async move {
                let (n,): (i64,) = sqlx::query_as(sql)
                    .fetch_one(&pool)
                    .await
                    .map_err(|e| MomentumError::Store(format!("count failed: {e}")))?;
                Ok::<i64, MomentumError>(n)
            }
        };

        Ok(Totals {
            users,
            habits: count("SELECT COUNT(*) FROM habits").await?,
            tasks: count("SELECT COUNT(*) FROM tasks").await?,
            tasks_completed: count("SELECT COUNT(*) FROM tasks WHERE completed = 1").await?,
            notes: count("SELECT COUNT(*) FROM notes").await?,
            moods: count("SELECT COUNT(*) FROM moods").await?,
            achievements: count("SELECT COUNT(*) FROM achievements").await?,
        })
    }

    /// Destructive: clear every entity table and reset id counters.
    /// Callers are responsible for confirmation (verbatim token match).
    pub async fn reset_all(&self) -> Result<(), MomentumError> {
        for table in [
            "habit_progress",
            "habits",
            "tasks",
            "notes",
            "moods",
            "achievements",
        ] {
            sqlx::query(&format!("DELETE FROM {table}"))
                .execute(&self.pool)
                .await
                .map_err(|e| MomentumError::Store(format!("reset {table} failed: {e}")))?;
        }

        // sqlite_sequence only exists after the first AUTOINCREMENT insert.
        if let Err(e) = sqlx::query(
            "DELETE FROM sqlite_sequence WHERE name IN ('habits','tasks','notes','moods')",
        )
        .execute(&self.pool)
        .await
        {
            warn!("reset: could not clear sqlite_sequence: {e}");
        }

        Ok(())
    }

    /// Export every entity collection as a serializable snapshot.
    pub async fn export_all(&self) -> Result<Snapshot, MomentumError> {
        let habit_rows: Vec<super::habits::HabitRow> = sqlx::query_as(
            "SELECT id, user_id, name, description, category, difficulty, streak, \
             best_streak, total_completed, active, created_at FROM habits ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| MomentumError::Store(format!("export habits failed: {e}")))?;

        let mut habits = Vec::with_capacity(habit_rows.len());
        for row in habit_rows {
            let habit = habit_from_row(row);
            let progress: Vec<(String, i64, String, String)> = sqlx::query_as(
                "SELECT day, completed, notes, recorded_at FROM habit_progress \
                 WHERE habit_id = ? ORDER BY day ASC",
            )
            .bind(habit.id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| MomentumError::Store(format!("export progress failed: {e}")))?;

            let progress = progress
                .into_iter()
                .filter_map(|(day, completed, notes, recorded_at)| {
                    Some(DayProgress {
                        day: NaiveDate::parse_from_str(&day, "%Y-%m-%d").ok()?,
                        completed: completed != 0,
                        notes,
                        recorded_at,
                    })
                })
                .collect();

            habits.push(HabitExport { habit, progress });
        }

        let tasks: Vec<_> = sqlx::query_as(
            "SELECT id, user_id, title, description, priority, due_date, completed, created_at \
             FROM tasks ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| MomentumError::Store(format!("export tasks failed: {e}")))?
        .into_iter()
        .map(task_from_row)
        .collect();

        let notes: Vec<_> = sqlx::query_as(
            "SELECT id, user_id, title, content, category, created_at, updated_at \
             FROM notes ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| MomentumError::Store(format!("export notes failed: {e}")))?
        .into_iter()
        .map(note_from_row)
        .collect();

        let moods: Vec<_> = sqlx::query_as(
            "SELECT id, user_id, mood, notes, recorded_at FROM moods ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| MomentumError::Store(format!("export moods failed: {e}")))?
        .into_iter()
        .filter_map(mood_from_row)
        .collect();

        let achievements: Vec<(i64, String, String)> = sqlx::query_as(
            "SELECT user_id, achievement_id, unlocked_at FROM achievements \
             ORDER BY user_id ASC, achievement_id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| MomentumError::Store(format!("export achievements failed: {e}")))?;

        Ok(Snapshot {
            habits,
            tasks,
            notes,
            moods,
            achievements: achievements
                .into_iter()
                .map(|(user_id, achievement_id, unlocked_at)| AchievementUnlock {
                    user_id,
                    achievement_id,
                    unlocked_at,
                })
                .collect(),
        })
    }

    /// Populate the store from a snapshot, preserving ids. Intended for a
    /// freshly initialized (or reset) store.
    pub async fn import_all(&self, snapshot: &Snapshot) -> Result<(), MomentumError> {
        for export in &snapshot.habits {
            let h = &export.habit;
            sqlx::query(
                "INSERT INTO habits (id, user_id, name, description, category, difficulty, \
                 streak, best_streak, total_completed, active, created_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(h.id)
            .bind(h.user_id)
            .bind(&h.name)
            .bind(&h.description)
            .bind(&h.category)
            .bind(h.difficulty.as_str())
            .bind(h.streak)
            .bind(h.best_streak)
            .bind(h.total_completed)
            .bind(h.active as i64)
            .bind(&h.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| MomentumError::Store(format!("import habit failed: {e}")))?;

            for p in &export.progress {
                sqlx::query(
                    "INSERT INTO habit_progress (habit_id, day, completed, notes, recorded_at) \
                     VALUES (?, ?, ?, ?, ?)",
                )
                .bind(h.id)
                .bind(p.day.format("%Y-%m-%d").to_string())
                .bind(p.completed as i64)
                .bind(&p.notes)
                .bind(&p.recorded_at)
                .execute(&self.pool)
                .await
                .map_err(|e| MomentumError::Store(format!("import progress failed: {e}")))?;
            }
        }

        for t in &snapshot.tasks {
            sqlx::query(
                "INSERT INTO tasks (id, user_id, title, description, priority, due_date, \
                 completed, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(t.id)
            .bind(t.user_id)
            .bind(&t.title)
            .bind(&t.description)
            .bind(t.priority.as_str())
            .bind(t.due_date.map(|d| d.format("%Y-%m-%d").to_string()))
            .bind(t.completed as i64)
            .bind(&t.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| MomentumError::Store(format!("import task failed: {e}")))?;
        }

        for n in &snapshot.notes {
            sqlx::query(
                "INSERT INTO notes (id, user_id, title, content, category, created_at, updated_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(n.id)
            .bind(n.user_id)
            .bind(&n.title)
            .bind(&n.content)
            .bind(&n.category)
            .bind(&n.created_at)
            .bind(&n.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| MomentumError::Store(format!("import note failed: {e}")))?;
        }

        for m in &snapshot.moods {
            sqlx::query(
                "INSERT INTO moods (id, user_id, mood, notes, recorded_at) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(m.id)
            .bind(m.user_id)
            .bind(m.mood.as_str())
            .bind(&m.notes)
            .bind(&m.recorded_at)
            .execute(&self.pool)
            .await
            .map_err(|e| MomentumError::Store(format!("import mood failed: {e}")))?;
        }

        for a in &snapshot.achievements {
            sqlx::query(
                "INSERT INTO achievements (user_id, achievement_id, unlocked_at) VALUES (?, ?, ?)",
            )
            .bind(a.user_id)
            .bind(&a.achievement_id)
            .bind(&a.unlocked_at)
            .execute(&self.pool)
            .await
            .map_err(|e| MomentumError::Store(format!("import achievement failed: {e}")))?;
        }

        Ok(())
    }
}
