//! Habit command handlers: /add_habit, /habits, /done, and the dashboard's
//! one-tap completion buttons.

use super::Reply;
use crate::achievements;
use chrono::{Duration, Utc};
use momentum_core::entities::{Difficulty, Habit};
use momentum_core::parse::HabitArgs;
use momentum_store::Store;

pub(super) fn difficulty_icon(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Easy => "🟢",
        Difficulty::Medium => "🟡",
        Difficulty::Hard => "🔴",
    }
}

pub(super) async fn handle_add_habit(store: &Store, user_id: i64, args: &str) -> Reply {
    if args.is_empty() {
        return Reply::text(
            "Usage: /add_habit name | description | category | difficulty\n\
             Example: /add_habit Reading | 30 minutes a day | learning | medium\n\
             Only the name is required.",
        );
    }

    let parsed = match HabitArgs::parse(args) {
        Ok(p) => p,
        Err(e) => return Reply::text(format!("⚠️ {e}")),
    };

    let created = store
        .create_habit(
            user_id,
            &parsed.name,
            &parsed.description,
            &parsed.category,
            parsed.difficulty,
        )
        .await;

    match created {
        Ok(_) => {
            let mut text = format!(
                "✨ Habit added: *{}*\n{} {} • {}\nMark it done with /done or from /dashboard.",
                parsed.name,
                difficulty_icon(parsed.difficulty),
                parsed.difficulty,
                parsed.category,
            );
            match achievements::after_habit_created(store, user_id).await {
                Ok(newly) => text.push_str(&achievements::announce(&newly)),
                Err(e) => return Reply::text(format!("Error: {e}")),
            }
            Reply::text(text)
        }
        Err(e) => Reply::text(format!("Error: {e}")),
    }
}

pub(super) async fn handle_habits(store: &Store, user_id: i64) -> Reply {
    let habits = match store.list_habits(user_id, true).await {
        Ok(h) => h,
        Err(e) => return Reply::text(format!("Error: {e}")),
    };

    if habits.is_empty() {
        return Reply::text("No habits yet. Create one with /add_habit name | description.");
    }

    let today = Utc::now().date_naive();
    let week_start = today - Duration::days(6);

    let mut out = String::from("🎯 *Your habits*\n");
    for (i, habit) in habits.iter().enumerate() {
        out.push_str(&format!(
            "\n{}. {} *{}*\n   🔥 streak: {} (best: {}) • done {} times",
            i + 1,
            difficulty_icon(habit.difficulty),
            habit.name,
            habit.streak,
            habit.best_streak,
            habit.total_completed,
        ));
        // Trailing-week ratio: completed days out of days with any record.
        match store
            .habit_progress_window(habit.id, week_start, today)
            .await
        {
            Ok(window) if !window.is_empty() => {
                let done = window.iter().filter(|p| p.completed).count();
                out.push_str(&format!(" • last 7 days: {done}/{}", window.len()));
            }
            Ok(_) => {}
            Err(e) => return Reply::text(format!("Error: {e}")),
        }
    }
    out.push_str("\n\nMark one done: /done <number>");
    Reply::text(out)
}

pub(super) async fn handle_done(store: &Store, user_id: i64, args: &str) -> Reply {
    let habits = match store.list_habits(user_id, true).await {
        Ok(h) => h,
        Err(e) => return Reply::text(format!("Error: {e}")),
    };

    if habits.is_empty() {
        return Reply::text("No habits yet. Create one with /add_habit name | description.");
    }

    let Ok(index) = args.parse::<usize>() else {
        return Reply::text("Usage: /done <number> — the habit's number from /habits.");
    };

    let Some(habit) = index.checked_sub(1).and_then(|i| habits.get(i)) else {
        return Reply::text(format!(
            "No habit #{index}. You have {} — see /habits.",
            habits.len()
        ));
    };

    mark_done(store, user_id, habit.id, &habit.name).await
}

/// Handle a `habit_done:<id>` dashboard button.
pub(super) async fn handle_habit_button(store: &Store, user_id: i64, raw_id: &str) -> Reply {
    let Ok(habit_id) = raw_id.parse::<i64>() else {
        return Reply::text("That button has expired. Try /dashboard.");
    };

    // The habit must still exist and belong to the presser.
    let habit = match store.habit(habit_id).await {
        Ok(Some(h)) if h.user_id == user_id => h,
        Ok(_) => return Reply::text("That habit no longer exists. Try /dashboard."),
        Err(e) => return Reply::text(format!("Error: {e}")),
    };

    mark_done(store, user_id, habit.id, &habit.name).await
}

/// Shared completion path for /done and the dashboard buttons.
async fn mark_done(store: &Store, user_id: i64, habit_id: i64, name: &str) -> Reply {
    let today = Utc::now().date_naive();

    let marked = match store.mark_habit_done(habit_id, today, "").await {
        Ok(m) => m,
        Err(e) => return Reply::text(format!("Error: {e}")),
    };
    if !marked {
        return Reply::text("That habit no longer exists. Try /dashboard.");
    }

    // Re-read for the post-mark streak.
    let habit: Habit = match store.habit(habit_id).await {
        Ok(Some(h)) => h,
        Ok(None) => return Reply::text("That habit no longer exists. Try /dashboard."),
        Err(e) => return Reply::text(format!("Error: {e}")),
    };

    let mut text = format!(
        "✅ *{name}* done for today!\n🔥 Streak: {} day{} (best: {})",
        habit.streak,
        if habit.streak == 1 { "" } else { "s" },
        habit.best_streak,
    );

    match achievements::after_habit_done(store, user_id, habit.streak).await {
        Ok(newly) => text.push_str(&achievements::announce(&newly)),
        Err(e) => return Reply::text(format!("Error: {e}")),
    }

    Reply::text(text)
}
