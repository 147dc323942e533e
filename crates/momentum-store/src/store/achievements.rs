//! Idempotent achievement unlocks.

use super::Store;
use momentum_core::entities::AchievementUnlock;
use momentum_core::error::MomentumError;

impl Store {
    /// Unlock an achievement for a user. Set-once: re-unlocking is a no-op
    /// and the first unlock timestamp is kept. Returns `true` only when the
    /// unlock is new, so callers can announce each threshold exactly once.
    pub async fn unlock_achievement(
        &self,
        user_id: i64,
        achievement_id: &str,
    ) -> Result<bool, MomentumError> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO achievements (user_id, achievement_id) VALUES (?, ?)",
        )
        .bind(user_id)
        .bind(achievement_id)
        .execute(&self.pool)
        .await
        .map_err(|e| MomentumError::Store(format!("unlock achievement failed: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// All achievements a user has unlocked, in unlock order.
    pub async fn list_achievements(
        &self,
        user_id: i64,
    ) -> Result<Vec<AchievementUnlock>, MomentumError> {
        let rows: Vec<(i64, String, String)> = sqlx::query_as(
            "SELECT user_id, achievement_id, unlocked_at FROM achievements \
             WHERE user_id = ? ORDER BY unlocked_at ASC, achievement_id ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| MomentumError::Store(format!("list achievements failed: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|(user_id, achievement_id, unlocked_at)| AchievementUnlock {
                user_id,
                achievement_id,
                unlocked_at,
            })
            .collect())
    }
}
