//! Append-only mood log with trailing-window queries.

use super::Store;
use momentum_core::entities::{Mood, MoodEntry};
use momentum_core::error::MomentumError;

type MoodRow = (i64, i64, String, String, String);

pub(super) fn mood_from_row(row: MoodRow) -> Option<MoodEntry> {
    Some(MoodEntry {
        id: row.0,
        user_id: row.1,
        mood: row.2.parse().ok()?,
        notes: row.3,
        recorded_at: row.4,
    })
}

impl Store {
    /// Append a mood entry.
    pub async fn record_mood(
        &self,
        user_id: i64,
        mood: Mood,
        notes: &str,
    ) -> Result<i64, MomentumError> {
        let result = sqlx::query("INSERT INTO moods (user_id, mood, notes) VALUES (?, ?, ?)")
            .bind(user_id)
            .bind(mood.as_str())
            .bind(notes)
            .execute(&self.pool)
            .await
            .map_err(|e| MomentumError::Store(format!("record mood failed: {e}")))?;

        Ok(result.last_insert_rowid())
    }

    /// List a user's mood entries within the trailing `window_days` days,
    /// newest first. Inclusive: entries recorded exactly at the window edge
    /// are returned.
    pub async fn list_moods_since(
        &self,
        user_id: i64,
        window_days: u32,
    ) -> Result<Vec<MoodEntry>, MomentumError> {
        let rows: Vec<MoodRow> = sqlx::query_as(
            "SELECT id, user_id, mood, notes, recorded_at FROM moods \
             WHERE user_id = ? AND recorded_at >= datetime('now', ?) \
             ORDER BY recorded_at DESC, id DESC",
        )
        .bind(user_id)
        .bind(format!("-{window_days} days"))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| MomentumError::Store(format!("list moods failed: {e}")))?;

        Ok(rows.into_iter().filter_map(mood_from_row).collect())
    }
}
