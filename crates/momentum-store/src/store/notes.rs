//! Note CRUD with category filtering.

use super::Store;
use momentum_core::entities::Note;
use momentum_core::error::MomentumError;

type NoteRow = (i64, i64, String, String, String, String, String);

const NOTE_COLS: &str = "id, user_id, title, content, category, created_at, updated_at";

pub(super) fn note_from_row(row: NoteRow) -> Note {
    Note {
        id: row.0,
        user_id: row.1,
        title: row.2,
        content: row.3,
        category: row.4,
        created_at: row.5,
        updated_at: row.6,
    }
}

impl Store {
    /// Create a note.
    pub async fn create_note(
        &self,
        user_id: i64,
        title: &str,
        content: &str,
        category: &str,
    ) -> Result<i64, MomentumError> {
        let result = sqlx::query(
            "INSERT INTO notes (user_id, title, content, category) VALUES (?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(title)
        .bind(content)
        .bind(category)
        .execute(&self.pool)
        .await
        .map_err(|e| MomentumError::Store(format!("create note failed: {e}")))?;

        Ok(result.last_insert_rowid())
    }

    /// List a user's notes, most recently updated first. Category filter is
    /// exact-match when provided.
    pub async fn list_notes(
        &self,
        user_id: i64,
        category: Option<&str>,
    ) -> Result<Vec<Note>, MomentumError> {
        let rows: Vec<NoteRow> = if let Some(cat) = category {
            sqlx::query_as(&format!(
                "SELECT {NOTE_COLS} FROM notes WHERE user_id = ? AND category = ? \
                 ORDER BY updated_at DESC, id DESC"
            ))
            .bind(user_id)
            .bind(cat)
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query_as(&format!(
                "SELECT {NOTE_COLS} FROM notes WHERE user_id = ? \
                 ORDER BY updated_at DESC, id DESC"
            ))
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
        }
        .map_err(|e| MomentumError::Store(format!("list notes failed: {e}")))?;

        Ok(rows.into_iter().map(note_from_row).collect())
    }

    /// Replace a note's content, bumping updated_at. The note must belong to
    /// `user_id`. Returns `false` if no matching note exists.
    pub async fn update_note(
        &self,
        note_id: i64,
        user_id: i64,
        content: &str,
    ) -> Result<bool, MomentumError> {
        let result = sqlx::query(
            "UPDATE notes SET content = ?, updated_at = datetime('now') \
             WHERE id = ? AND user_id = ?",
        )
        .bind(content)
        .bind(note_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| MomentumError::Store(format!("update note failed: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}
