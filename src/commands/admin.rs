//! Admin-only command handlers: /admin, /export, /reset_all.
//!
//! Authorization happens in the dispatcher; these handlers assume the caller
//! is already verified against the configured admin ids.

use super::Reply;
use momentum_store::Store;
use tracing::{info, warn};

pub(super) async fn handle_admin(store: &Store) -> Reply {
    let totals = match store.totals().await {
        Ok(t) => t,
        Err(e) => return Reply::text(format!("Error: {e}")),
    };
    let users = match store.list_all_users().await {
        Ok(u) => u,
        Err(e) => return Reply::text(format!("Error: {e}")),
    };
    let db_size = match store.db_size().await {
        Ok(s) => s,
        Err(e) => return Reply::text(format!("Error: {e}")),
    };

    let user_list = if users.is_empty() {
        "none".to_string()
    } else {
        users
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    };

    Reply::text(format!(
        "🛠 *Admin overview*\n\n\
         👥 users: {} ({user_list})\n\
         🎯 habits: {}\n\
         📋 tasks: {} ({} completed)\n\
         🗒 notes: {}\n\
         😊 moods: {}\n\
         🏆 achievements: {}\n\
         💾 database: {} KB\n\n\
         /export — full JSON snapshot\n\
         /reset_all <token> — wipe everything",
        totals.users,
        totals.habits,
        totals.tasks,
        totals.tasks_completed,
        totals.notes,
        totals.moods,
        totals.achievements,
        db_size / 1024,
    ))
}

pub(super) async fn handle_export(store: &Store) -> Reply {
    let snapshot = match store.export_all().await {
        Ok(s) => s,
        Err(e) => return Reply::text(format!("Error: {e}")),
    };

    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => {
            info!("admin export generated ({} bytes)", json.len());
            Reply::text(format!("📦 Full data export:\n\n```\n{json}\n```"))
        }
        Err(e) => Reply::text(format!("Error: {e}")),
    }
}

/// Wipe all data for every user. The confirmation token must match the
/// configured one verbatim; anything else only prompts.
pub(super) async fn handle_reset(store: &Store, reset_token: &str, args: &str) -> Reply {
    if args != reset_token {
        return Reply::text(
            "⚠️ This deletes *all* data for *every* user and cannot be undone.\n\
             To proceed, repeat the command followed by the configured confirmation token.",
        );
    }

    match store.reset_all().await {
        Ok(()) => {
            warn!("admin reset: all data wiped");
            Reply::text("🧹 All data has been wiped. Everyone starts fresh.")
        }
        Err(e) => Reply::text(format!("Error: {e}")),
    }
}
