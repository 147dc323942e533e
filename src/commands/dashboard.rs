//! Overview command handlers: /start, /help, /dashboard, /stats,
//! /achievements, and the quick-add button menu.

use super::tasks::priority_icon;
use super::Reply;
use crate::achievements;
use chrono::{Datelike, Utc};
use momentum_core::entities::Priority;
use momentum_core::message::Button;
use momentum_store::Store;

const QUOTES: &[&str] = &[
    "Small steps every day add up to big results.",
    "You don't have to be great to start, but you have to start to be great.",
    "Discipline is choosing between what you want now and what you want most.",
    "The chain is only as strong as today's link.",
    "Done is better than perfect.",
    "A year from now you'll wish you had started today.",
];

/// Deterministic daily quote, varied per user.
fn daily_quote(user_id: i64) -> &'static str {
    let day = Utc::now().date_naive().num_days_from_ce() as i64;
    let idx = (day + user_id).rem_euclid(QUOTES.len() as i64) as usize;
    QUOTES[idx]
}

/// Ten-segment progress bar, filled proportionally (floored).
pub(super) fn progress_bar(completed: usize, total: usize) -> String {
    let filled = if total == 0 {
        0
    } else {
        completed * 10 / total
    };
    format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled))
}

pub(super) fn handle_start(sender_name: Option<&str>) -> Reply {
    let greeting = match sender_name {
        Some(name) => format!("Hi {name}! 👋"),
        None => "Hi! 👋".to_string(),
    };
    Reply::text(format!(
        "{greeting} I'm *Momentum*, your personal productivity assistant.\n\n\
         I track your habits, tasks, notes, and moods — and celebrate your streaks.\n\n\
         Start with /dashboard for today's overview, or /help for every command."
    ))
    .with_buttons(vec![
        vec![Button::new("📊 Dashboard", "dashboard")],
        vec![Button::new("🎯 Add something", "quick_add")],
    ])
}

pub(super) fn handle_help() -> Reply {
    Reply::text(
        "*Momentum commands*\n\n\
         📊 /dashboard — today's habits and tasks at a glance\n\
         📈 /stats — your productivity statistics\n\n\
         🎯 *Habits*\n\
         /add_habit name | description | category | difficulty\n\
         /habits — list habits with streaks\n\
         /done <number> — mark a habit done today\n\n\
         📋 *Tasks*\n\
         /add_task title | description | priority | due date\n\
         /tasks — list open tasks\n\
         /complete <number> — finish a task\n\n\
         🗒 *Notes*\n\
         /add_note title | content | category\n\
         /notes [category] — list notes\n\
         /edit_note <number> | new content — rewrite a note\n\n\
         😊 *Moods*\n\
         /mood <mood> | notes — log how you feel\n\
         /moods — your mood log for the last 7 days\n\n\
         🏆 /achievements — what you've unlocked\n\n\
         Fields are separated by `|`; only the first is required.",
    )
}

pub(super) async fn handle_dashboard(store: &Store, user_id: i64) -> Reply {
    let today = Utc::now().date_naive();

    let habits = match store.list_habits_on(user_id, today).await {
        Ok(h) => h,
        Err(e) => return Reply::text(format!("Error: {e}")),
    };
    let open_tasks = match store.list_tasks(user_id, false).await {
        Ok(t) => t,
        Err(e) => return Reply::text(format!("Error: {e}")),
    };

    let done_today = habits.iter().filter(|(_, done)| *done).count();
    let total = habits.len();

    let mut out = format!("📊 *Momentum dashboard* • {today}\n");

    if total == 0 {
        out.push_str("\n🎯 No habits yet — /add_habit to start a streak.\n");
    } else {
        let pct = done_today * 100 / total;
        out.push_str(&format!(
            "\n🎯 *Habits today:* {done_today}/{total}\n{} {pct}%\n",
            progress_bar(done_today, total),
        ));
    }

    if open_tasks.is_empty() {
        out.push_str("\n📋 No open tasks.\n");
    } else {
        let high = count_priority(&open_tasks, Priority::High);
        let medium = count_priority(&open_tasks, Priority::Medium);
        let low = count_priority(&open_tasks, Priority::Low);
        out.push_str(&format!(
            "\n📋 *Open tasks:* {}\n   {} high: {high} • {} medium: {medium} • {} low: {low}\n",
            open_tasks.len(),
            priority_icon(Priority::High),
            priority_icon(Priority::Medium),
            priority_icon(Priority::Low),
        ));
    }

    out.push_str(&format!("\n💫 _{}_", daily_quote(user_id)));

    // One-tap buttons for up to three still-pending habits.
    let mut buttons: Vec<Vec<Button>> = habits
        .iter()
        .filter(|(_, done)| !done)
        .take(3)
        .map(|(habit, _)| {
            vec![Button::new(
                format!("✅ {}", habit.name),
                format!("habit_done:{}", habit.id),
            )]
        })
        .collect();
    if buttons.is_empty() && total > 0 {
        buttons.push(vec![Button::new("🎉 All habits done!", "celebrate")]);
    }
    buttons.push(vec![
        Button::new("📋 Tasks", "tasks"),
        Button::new("📈 Stats", "stats"),
    ]);
    buttons.push(vec![Button::new("🎯 Add something", "quick_add")]);

    Reply::text(out).with_buttons(buttons)
}

fn count_priority(tasks: &[momentum_core::entities::Task], priority: Priority) -> usize {
    tasks.iter().filter(|t| t.priority == priority).count()
}

pub(super) async fn handle_stats(store: &Store, user_id: i64) -> Reply {
    let habits = match store.list_habits(user_id, false).await {
        Ok(h) => h,
        Err(e) => return Reply::text(format!("Error: {e}")),
    };
    let open = match store.list_tasks(user_id, false).await {
        Ok(t) => t,
        Err(e) => return Reply::text(format!("Error: {e}")),
    };
    let completed = match store.count_completed_tasks(user_id).await {
        Ok(n) => n,
        Err(e) => return Reply::text(format!("Error: {e}")),
    };
    let notes = match store.list_notes(user_id, None).await {
        Ok(n) => n,
        Err(e) => return Reply::text(format!("Error: {e}")),
    };
    let moods = match store.list_moods_since(user_id, 30).await {
        Ok(m) => m,
        Err(e) => return Reply::text(format!("Error: {e}")),
    };
    let unlocked = match store.list_achievements(user_id).await {
        Ok(a) => a,
        Err(e) => return Reply::text(format!("Error: {e}")),
    };

    let best_streak = habits.iter().map(|h| h.best_streak).max().unwrap_or(0);
    let total_completions: i64 = habits.iter().map(|h| h.total_completed).sum();
    let total_tasks = open.len() as i64 + completed;
    let task_pct = if total_tasks == 0 {
        0
    } else {
        completed * 100 / total_tasks
    };

    // Per-habit 30-day consistency: completed days out of days with a record.
    let today = Utc::now().date_naive();
    let month_start = today - chrono::Duration::days(29);
    let mut consistency = String::new();
    for habit in habits.iter().filter(|h| h.active) {
        match store
            .habit_progress_window(habit.id, month_start, today)
            .await
        {
            Ok(window) if !window.is_empty() => {
                let done = window.iter().filter(|p| p.completed).count();
                consistency.push_str(&format!(
                    "\n   {}: {done}/{} days (30d)",
                    habit.name,
                    window.len()
                ));
            }
            Ok(_) => {}
            Err(e) => return Reply::text(format!("Error: {e}")),
        }
    }

    // Notes by category.
    let mut categories: Vec<(String, usize)> = Vec::new();
    for note in &notes {
        match categories.iter_mut().find(|(c, _)| *c == note.category) {
            Some((_, n)) => *n += 1,
            None => categories.push((note.category.clone(), 1)),
        }
    }
    let note_breakdown = if categories.is_empty() {
        String::new()
    } else {
        let parts: Vec<String> = categories
            .iter()
            .map(|(c, n)| format!("{c}: {n}"))
            .collect();
        format!("\n   {}", parts.join(" • "))
    };

    Reply::text(format!(
        "📈 *Your statistics*\n\n\
         🎯 *Habits:* {}\n   🔥 best streak: {best_streak} • total completions: {total_completions}{consistency}\n\n\
         📋 *Tasks:* {completed}/{total_tasks} completed ({task_pct}%)\n\n\
         🗒 *Notes:* {}{note_breakdown}\n\n\
         😊 *Moods logged (30 days):* {}\n\n\
         🏆 *Achievements:* {}/{}",
        habits.len(),
        notes.len(),
        moods.len(),
        unlocked.len(),
        achievements::CATALOG.len(),
    ))
}

pub(super) async fn handle_achievements(store: &Store, user_id: i64) -> Reply {
    let unlocked = match store.list_achievements(user_id).await {
        Ok(a) => a,
        Err(e) => return Reply::text(format!("Error: {e}")),
    };

    if unlocked.is_empty() {
        return Reply::text(
            "No achievements yet. Create a habit, keep a streak, finish tasks — they'll come. 🏆",
        );
    }

    let mut out = format!(
        "🏆 *Your achievements* ({}/{})\n",
        unlocked.len(),
        achievements::CATALOG.len()
    );
    for unlock in &unlocked {
        out.push_str(&format!(
            "\n• *{}* — unlocked {}",
            achievements::title(&unlock.achievement_id),
            unlock.unlocked_at,
        ));
    }
    Reply::text(out)
}

pub(super) fn handle_quick_add() -> Reply {
    Reply::text(
        "What do you want to add?\n\n\
         🎯 /add_habit name | description | category | difficulty\n\
         📋 /add_task title | description | priority | due date\n\
         🗒 /add_note title | content | category\n\
         😊 /mood <mood> | notes",
    )
}
