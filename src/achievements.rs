//! Achievement catalog and threshold evaluation.
//!
//! Triggers are re-evaluated after the relevant mutation; the store's
//! idempotent unlock reports whether an unlock is new, so each threshold is
//! announced exactly once even though checks repeat.

use momentum_core::error::MomentumError;
use momentum_store::Store;

/// A named, user-scoped, one-time unlockable flag.
#[derive(Debug, Clone, Copy)]
pub struct AchievementDef {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

pub const CATALOG: &[AchievementDef] = &[
    AchievementDef {
        id: "first_habit",
        title: "First Step",
        description: "Create your first habit",
    },
    AchievementDef {
        id: "streak_3",
        title: "On a Roll",
        description: "Reach a 3-day streak",
    },
    AchievementDef {
        id: "streak_7",
        title: "One Full Week",
        description: "Reach a 7-day streak",
    },
    AchievementDef {
        id: "task_master",
        title: "Task Master",
        description: "Complete 5 tasks",
    },
    AchievementDef {
        id: "mood_tracker",
        title: "Mood Tracker",
        description: "Log 5 moods within 30 days",
    },
    AchievementDef {
        id: "power_user",
        title: "Power User",
        description: "10 habit completions and 10 completed tasks",
    },
];

/// Look up an achievement's display title; falls back to the raw id for
/// unlocks imported from older data.
pub fn title(id: &str) -> &str {
    CATALOG
        .iter()
        .find(|d| d.id == id)
        .map(|d| d.title)
        .unwrap_or(id)
}

async fn try_unlock(
    store: &Store,
    user_id: i64,
    id: &'static str,
    newly: &mut Vec<&'static AchievementDef>,
) -> Result<(), MomentumError> {
    if store.unlock_achievement(user_id, id).await? {
        if let Some(def) = CATALOG.iter().find(|d| d.id == id) {
            newly.push(def);
        }
    }
    Ok(())
}

/// Evaluate triggers after a habit is created.
pub async fn after_habit_created(
    store: &Store,
    user_id: i64,
) -> Result<Vec<&'static AchievementDef>, MomentumError> {
    let mut newly = Vec::new();
    if store.count_habits(user_id).await? >= 1 {
        try_unlock(store, user_id, "first_habit", &mut newly).await?;
    }
    Ok(newly)
}

/// Evaluate triggers after a habit is marked done. `streak` is the habit's
/// streak after the mark.
pub async fn after_habit_done(
    store: &Store,
    user_id: i64,
    streak: i64,
) -> Result<Vec<&'static AchievementDef>, MomentumError> {
    let mut newly = Vec::new();
    if streak >= 3 {
        try_unlock(store, user_id, "streak_3", &mut newly).await?;
    }
    if streak >= 7 {
        try_unlock(store, user_id, "streak_7", &mut newly).await?;
    }
    check_power_user(store, user_id, &mut newly).await?;
    Ok(newly)
}

/// Evaluate triggers after a task is completed.
pub async fn after_task_completed(
    store: &Store,
    user_id: i64,
) -> Result<Vec<&'static AchievementDef>, MomentumError> {
    let mut newly = Vec::new();
    if store.count_completed_tasks(user_id).await? >= 5 {
        try_unlock(store, user_id, "task_master", &mut newly).await?;
    }
    check_power_user(store, user_id, &mut newly).await?;
    Ok(newly)
}

/// Evaluate triggers after a mood entry is recorded.
pub async fn after_mood_recorded(
    store: &Store,
    user_id: i64,
) -> Result<Vec<&'static AchievementDef>, MomentumError> {
    let mut newly = Vec::new();
    if store.list_moods_since(user_id, 30).await?.len() >= 5 {
        try_unlock(store, user_id, "mood_tracker", &mut newly).await?;
    }
    Ok(newly)
}

async fn check_power_user(
    store: &Store,
    user_id: i64,
    newly: &mut Vec<&'static AchievementDef>,
) -> Result<(), MomentumError> {
    if store.total_habit_completions(user_id).await? >= 10
        && store.count_completed_tasks(user_id).await? >= 10
    {
        try_unlock(store, user_id, "power_user", newly).await?;
    }
    Ok(())
}

/// Format newly unlocked achievements as announcement lines, empty string if none.
pub fn announce(newly: &[&'static AchievementDef]) -> String {
    newly
        .iter()
        .map(|d| format!("\n\n🏆 *Achievement unlocked:* {} — {}", d.title, d.description))
        .collect()
}
