use super::Store;
use chrono::NaiveDate;
use momentum_core::entities::{Difficulty, Mood, Priority};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

/// Create an in-memory store for testing.
async fn test_store() -> Store {
    let opts = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(opts)
        .await
        .unwrap();
    Store::run_migrations(&pool).await.unwrap();
    Store { pool }
}

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[tokio::test]
async fn test_create_habit_initial_state() {
    let store = test_store().await;
    let id = store
        .create_habit(1, "Reading", "", "general", Difficulty::Medium)
        .await
        .unwrap();

    let habits = store.list_habits(1, true).await.unwrap();
    assert_eq!(habits.len(), 1);
    let h = &habits[0];
    assert_eq!(h.id, id);
    assert_eq!(h.name, "Reading");
    assert_eq!(h.streak, 0);
    assert_eq!(h.best_streak, 0);
    assert_eq!(h.total_completed, 0);
    assert!(h.active);
}

#[tokio::test]
async fn test_consecutive_days_accumulate_streak() {
    let store = test_store().await;
    let id = store
        .create_habit(1, "Run", "", "sport", Difficulty::Hard)
        .await
        .unwrap();

    for d in ["2026-03-01", "2026-03-02", "2026-03-03", "2026-03-04"] {
        assert!(store.mark_habit_done(id, day(d), "").await.unwrap());
    }

    let h = store.habit(id).await.unwrap().unwrap();
    assert_eq!(h.streak, 4);
    assert_eq!(h.best_streak, 4);
    assert_eq!(h.total_completed, 4);
}

#[tokio::test]
async fn test_same_day_mark_is_idempotent() {
    let store = test_store().await;
    let id = store
        .create_habit(1, "Reading", "", "general", Difficulty::Medium)
        .await
        .unwrap();

    assert!(store.mark_habit_done(id, day("2026-03-01"), "").await.unwrap());
    let h = store.habit(id).await.unwrap().unwrap();
    assert_eq!((h.streak, h.best_streak), (1, 1));

    // Second mark on the same day: successful no-op.
    assert!(store.mark_habit_done(id, day("2026-03-01"), "").await.unwrap());
    let h = store.habit(id).await.unwrap().unwrap();
    assert_eq!((h.streak, h.best_streak, h.total_completed), (1, 1, 1));
}

#[tokio::test]
async fn test_gap_resets_streak_but_keeps_best() {
    let store = test_store().await;
    let id = store
        .create_habit(1, "Meditate", "", "health", Difficulty::Easy)
        .await
        .unwrap();

    for d in ["2026-03-01", "2026-03-02", "2026-03-03"] {
        store.mark_habit_done(id, day(d), "").await.unwrap();
    }
    // Skip the 4th, resume on the 5th.
    store.mark_habit_done(id, day("2026-03-05"), "").await.unwrap();

    let h = store.habit(id).await.unwrap().unwrap();
    assert_eq!(h.streak, 1);
    assert_eq!(h.best_streak, 3);
    assert!(h.best_streak >= h.streak);
    assert_eq!(h.total_completed, 4);
}

#[tokio::test]
async fn test_mark_unknown_habit_returns_false() {
    let store = test_store().await;
    assert!(!store.mark_habit_done(999, day("2026-03-01"), "").await.unwrap());
}

#[tokio::test]
async fn test_list_habits_scoped_and_ordered() {
    let store = test_store().await;
    let a = store
        .create_habit(1, "A", "", "general", Difficulty::Medium)
        .await
        .unwrap();
    let b = store
        .create_habit(1, "B", "", "general", Difficulty::Medium)
        .await
        .unwrap();
    let _other = store
        .create_habit(2, "Other", "", "general", Difficulty::Medium)
        .await
        .unwrap();

    // Give A a streak so it sorts first.
    store.mark_habit_done(a, day("2026-03-01"), "").await.unwrap();

    let habits = store.list_habits(1, true).await.unwrap();
    assert_eq!(habits.len(), 2);
    assert!(habits.iter().all(|h| h.user_id == 1));
    assert_eq!(habits[0].id, a);
    assert_eq!(habits[1].id, b);

    // Zero-streak tie: newest first (higher id wins the same-second tie).
    let c = store
        .create_habit(1, "C", "", "general", Difficulty::Medium)
        .await
        .unwrap();
    let habits = store.list_habits(1, true).await.unwrap();
    assert_eq!(habits[0].id, a);
    assert_eq!(habits[1].id, c);
    assert_eq!(habits[2].id, b);
}

#[tokio::test]
async fn test_list_habits_on_flags_completed_today() {
    let store = test_store().await;
    let a = store
        .create_habit(1, "A", "", "general", Difficulty::Medium)
        .await
        .unwrap();
    let b = store
        .create_habit(1, "B", "", "general", Difficulty::Medium)
        .await
        .unwrap();

    let today = day("2026-03-01");
    store.mark_habit_done(a, today, "").await.unwrap();

    let habits = store.list_habits_on(1, today).await.unwrap();
    assert_eq!(habits.len(), 2);
    let done: Vec<(i64, bool)> = habits.iter().map(|(h, d)| (h.id, *d)).collect();
    assert!(done.contains(&(a, true)));
    assert!(done.contains(&(b, false)));
}

#[tokio::test]
async fn test_progress_window_and_notes() {
    let store = test_store().await;
    let id = store
        .create_habit(1, "Journal", "", "general", Difficulty::Easy)
        .await
        .unwrap();

    store
        .mark_habit_done(id, day("2026-03-01"), "long entry")
        .await
        .unwrap();
    store.mark_habit_done(id, day("2026-03-03"), "").await.unwrap();
    store.mark_habit_done(id, day("2026-03-20"), "").await.unwrap();

    let window = store
        .habit_progress_window(id, day("2026-03-01"), day("2026-03-07"))
        .await
        .unwrap();
    assert_eq!(window.len(), 2);
    assert_eq!(window[0].day, day("2026-03-01"));
    assert_eq!(window[0].notes, "long entry");
    assert!(window.iter().all(|p| p.completed));

    let single = store.habit_day(id, day("2026-03-01")).await.unwrap().unwrap();
    assert_eq!(single.notes, "long entry");
    assert!(store.habit_day(id, day("2026-03-02")).await.unwrap().is_none());
}

#[tokio::test]
async fn test_task_priority_ordering() {
    let store = test_store().await;
    store
        .create_task(1, "low one", "", Priority::Low, None)
        .await
        .unwrap();
    store
        .create_task(1, "high one", "", Priority::High, None)
        .await
        .unwrap();
    store
        .create_task(1, "medium one", "", Priority::Medium, None)
        .await
        .unwrap();

    let tasks = store.list_tasks(1, false).await.unwrap();
    let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["high one", "medium one", "low one"]);
}

#[tokio::test]
async fn test_complete_task_unknown_id_changes_nothing() {
    let store = test_store().await;
    store
        .create_task(1, "Keep me", "", Priority::Medium, None)
        .await
        .unwrap();

    let before = store.list_tasks(1, false).await.unwrap();
    assert!(!store.complete_task(999).await.unwrap());
    let after = store.list_tasks(1, false).await.unwrap();

    assert_eq!(before.len(), after.len());
    assert!(after.iter().all(|t| !t.completed));
}

#[tokio::test]
async fn test_complete_task_one_way() {
    let store = test_store().await;
    let id = store
        .create_task(1, "Ship it", "", Priority::High, None)
        .await
        .unwrap();

    assert!(store.complete_task(id).await.unwrap());
    assert!(store.list_tasks(1, false).await.unwrap().is_empty());
    let done = store.list_tasks(1, true).await.unwrap();
    assert_eq!(done.len(), 1);
    assert!(done[0].completed);

    // Completing again is still a success and stays completed.
    assert!(store.complete_task(id).await.unwrap());
    assert_eq!(store.count_completed_tasks(1).await.unwrap(), 1);
}

#[tokio::test]
async fn test_notes_category_filter_and_update() {
    let store = test_store().await;
    let idea = store
        .create_note(1, "Bot idea", "a finance bot", "ideas")
        .await
        .unwrap();
    store
        .create_note(1, "Groceries", "milk, bread", "personal")
        .await
        .unwrap();
    store
        .create_note(2, "Not mine", "other user", "ideas")
        .await
        .unwrap();

    let all = store.list_notes(1, None).await.unwrap();
    assert_eq!(all.len(), 2);
    let ideas = store.list_notes(1, Some("ideas")).await.unwrap();
    assert_eq!(ideas.len(), 1);
    assert_eq!(ideas[0].title, "Bot idea");

    assert!(store.update_note(idea, 1, "a habits bot").await.unwrap());
    let ideas = store.list_notes(1, Some("ideas")).await.unwrap();
    assert_eq!(ideas[0].content, "a habits bot");

    // Wrong owner: no-op.
    assert!(!store.update_note(idea, 2, "hijacked").await.unwrap());
}

#[tokio::test]
async fn test_mood_window_filters_old_entries() {
    let store = test_store().await;
    store.record_mood(1, Mood::Happy, "sunny").await.unwrap();
    store.record_mood(1, Mood::Sad, "").await.unwrap();

    // Backdate one entry beyond the window.
    sqlx::query(
        "INSERT INTO moods (user_id, mood, notes, recorded_at) \
         VALUES (1, 'angry', '', datetime('now', '-40 days'))",
    )
    .execute(store.pool())
    .await
    .unwrap();

    let recent = store.list_moods_since(1, 30).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert!(recent.iter().all(|m| m.mood != Mood::Angry));

    let wide = store.list_moods_since(1, 90).await.unwrap();
    assert_eq!(wide.len(), 3);
}

#[tokio::test]
async fn test_achievement_unlock_idempotent() {
    let store = test_store().await;
    assert!(store.unlock_achievement(1, "first_habit").await.unwrap());
    assert!(!store.unlock_achievement(1, "first_habit").await.unwrap());

    let unlocked = store.list_achievements(1).await.unwrap();
    assert_eq!(unlocked.len(), 1);
    assert_eq!(unlocked[0].achievement_id, "first_habit");

    // Other users are unaffected.
    assert!(store.list_achievements(2).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_all_users_and_totals() {
    let store = test_store().await;
    store
        .create_habit(1, "H", "", "general", Difficulty::Medium)
        .await
        .unwrap();
    store
        .create_task(2, "T", "", Priority::Low, None)
        .await
        .unwrap();
    store.create_note(3, "N", "", "general").await.unwrap();
    store.record_mood(4, Mood::Neutral, "").await.unwrap();

    assert_eq!(store.list_all_users().await.unwrap(), vec![1, 2, 3, 4]);

    let totals = store.totals().await.unwrap();
    assert_eq!(totals.users, 4);
    assert_eq!(totals.habits, 1);
    assert_eq!(totals.tasks, 1);
    assert_eq!(totals.tasks_completed, 0);
    assert_eq!(totals.notes, 1);
    assert_eq!(totals.moods, 1);
}

#[tokio::test]
async fn test_reset_all_clears_and_restarts_ids() {
    let store = test_store().await;
    let first = store
        .create_habit(1, "H", "", "general", Difficulty::Medium)
        .await
        .unwrap();
    store.mark_habit_done(first, day("2026-03-01"), "").await.unwrap();
    store
        .create_task(1, "T", "", Priority::High, None)
        .await
        .unwrap();
    store.unlock_achievement(1, "first_habit").await.unwrap();

    store.reset_all().await.unwrap();

    assert!(store.list_all_users().await.unwrap().is_empty());
    let totals = store.totals().await.unwrap();
    assert_eq!(totals.habits + totals.tasks + totals.achievements, 0);

    // Id counters start over.
    let again = store
        .create_habit(1, "H2", "", "general", Difficulty::Medium)
        .await
        .unwrap();
    assert_eq!(again, first);
}

#[tokio::test]
async fn test_export_import_round_trip() {
    let store = test_store().await;
    let h = store
        .create_habit(1, "Reading", "30 min", "learning", Difficulty::Hard)
        .await
        .unwrap();
    store.mark_habit_done(h, day("2026-03-01"), "ch. 1").await.unwrap();
    store.mark_habit_done(h, day("2026-03-02"), "").await.unwrap();
    store
        .create_task(1, "Ship", "", Priority::High, Some(day("2026-04-01")))
        .await
        .unwrap();
    store.create_note(2, "Idea", "notes bot", "ideas").await.unwrap();
    store.record_mood(2, Mood::Awesome, "").await.unwrap();
    store.unlock_achievement(1, "first_habit").await.unwrap();

    let snapshot = store.export_all().await.unwrap();

    // Snapshot survives serialization.
    let json = serde_json::to_string(&snapshot).unwrap();
    let snapshot: super::Snapshot = serde_json::from_str(&json).unwrap();

    let fresh = test_store().await;
    fresh.import_all(&snapshot).await.unwrap();

    for user in [1, 2] {
        let (a, b) = (
            store.list_habits(user, false).await.unwrap(),
            fresh.list_habits(user, false).await.unwrap(),
        );
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.id, y.id);
            assert_eq!(x.name, y.name);
            assert_eq!(x.streak, y.streak);
            assert_eq!(x.best_streak, y.best_streak);
            assert_eq!(x.total_completed, y.total_completed);
            assert_eq!(x.created_at, y.created_at);
        }

        let (a, b) = (
            store.list_tasks(user, false).await.unwrap(),
            fresh.list_tasks(user, false).await.unwrap(),
        );
        assert_eq!(
            a.iter().map(|t| (t.id, t.title.clone())).collect::<Vec<_>>(),
            b.iter().map(|t| (t.id, t.title.clone())).collect::<Vec<_>>()
        );

        let (a, b) = (
            store.list_notes(user, None).await.unwrap(),
            fresh.list_notes(user, None).await.unwrap(),
        );
        assert_eq!(
            a.iter().map(|n| (n.id, n.content.clone())).collect::<Vec<_>>(),
            b.iter().map(|n| (n.id, n.content.clone())).collect::<Vec<_>>()
        );
    }

    // Progress record survives too.
    let p = fresh
        .habit_progress_window(h, day("2026-03-01"), day("2026-03-02"))
        .await
        .unwrap();
    assert_eq!(p.len(), 2);
    assert_eq!(p[0].notes, "ch. 1");
}
