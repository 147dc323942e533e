//! Task command handlers: /add_task, /tasks, /complete.

use super::Reply;
use crate::achievements;
use momentum_core::entities::Priority;
use momentum_core::parse::TaskArgs;
use momentum_store::Store;

pub(super) fn priority_icon(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "🔴",
        Priority::Medium => "🟡",
        Priority::Low => "🟢",
    }
}

pub(super) async fn handle_add_task(store: &Store, user_id: i64, args: &str) -> Reply {
    if args.is_empty() {
        return Reply::text(
            "Usage: /add_task title | description | priority | due date\n\
             Example: /add_task Ship report | final numbers | high | tomorrow\n\
             Only the title is required. Due date: YYYY-MM-DD, today, or tomorrow.",
        );
    }

    let parsed = match TaskArgs::parse(args) {
        Ok(p) => p,
        Err(e) => return Reply::text(format!("⚠️ {e}")),
    };

    let created = store
        .create_task(
            user_id,
            &parsed.title,
            &parsed.description,
            parsed.priority,
            parsed.due_date,
        )
        .await;

    match created {
        Ok(_) => {
            let due = parsed
                .due_date
                .map(|d| format!(" • due {d}"))
                .unwrap_or_default();
            Reply::text(format!(
                "📝 Task added: *{}*\n{} {}{due}",
                parsed.title,
                priority_icon(parsed.priority),
                parsed.priority,
            ))
        }
        Err(e) => Reply::text(format!("Error: {e}")),
    }
}

pub(super) async fn handle_tasks(store: &Store, user_id: i64) -> Reply {
    let tasks = match store.list_tasks(user_id, false).await {
        Ok(t) => t,
        Err(e) => return Reply::text(format!("Error: {e}")),
    };

    if tasks.is_empty() {
        return Reply::text("No open tasks. Add one with /add_task title | description.");
    }

    let mut out = String::from("📋 *Your open tasks*\n");
    for (i, task) in tasks.iter().enumerate() {
        out.push_str(&format!(
            "\n{}. {} *{}*",
            i + 1,
            priority_icon(task.priority),
            task.title,
        ));
        if !task.description.is_empty() {
            out.push_str(&format!("\n   {}", task.description));
        }
        if let Some(due) = task.due_date {
            out.push_str(&format!("\n   📅 due {due}"));
        }
    }
    out.push_str("\n\nFinish one: /complete <number>");
    Reply::text(out)
}

pub(super) async fn handle_complete(store: &Store, user_id: i64, args: &str) -> Reply {
    let tasks = match store.list_tasks(user_id, false).await {
        Ok(t) => t,
        Err(e) => return Reply::text(format!("Error: {e}")),
    };

    if tasks.is_empty() {
        return Reply::text("No open tasks. Add one with /add_task title | description.");
    }

    let Ok(index) = args.parse::<usize>() else {
        return Reply::text("Usage: /complete <number> — the task's number from /tasks.");
    };

    let Some(task) = index.checked_sub(1).and_then(|i| tasks.get(i)) else {
        return Reply::text(format!(
            "No task #{index}. You have {} open — see /tasks.",
            tasks.len()
        ));
    };

    match store.complete_task(task.id).await {
        Ok(true) => {
            let mut text = format!("🎉 Task completed: *{}*", task.title);
            match achievements::after_task_completed(store, user_id).await {
                Ok(newly) => text.push_str(&achievements::announce(&newly)),
                Err(e) => return Reply::text(format!("Error: {e}")),
            }
            Reply::text(text)
        }
        Ok(false) => Reply::text("That task no longer exists. Try /tasks."),
        Err(e) => Reply::text(format!("Error: {e}")),
    }
}
