use super::*;
use momentum_core::config::StoreConfig;

use std::sync::atomic::{AtomicU64, Ordering};

static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Create a temporary on-disk store for testing (unique per call).
async fn test_store() -> Store {
    let id = TEST_COUNTER.fetch_add(1, Ordering::Relaxed);
    let dir =
        std::env::temp_dir().join(format!("__momentum_cmd_test_{}_{}__", std::process::id(), id));
    let _ = std::fs::create_dir_all(&dir);
    let db_path = dir.join("test.db").to_string_lossy().to_string();
    let _ = std::fs::remove_file(&db_path);
    let config = StoreConfig { db_path };
    Store::new(&config).await.unwrap()
}

fn admin_config(user_ids: Vec<i64>) -> AdminConfig {
    AdminConfig {
        user_ids,
        ..AdminConfig::default()
    }
}

async fn run(store: &Store, admin: &AdminConfig, user_id: i64, text: &str) -> Reply {
    let ctx = CommandContext {
        store,
        admin,
        user_id,
        sender_name: Some("Ada"),
        text,
    };
    match Command::parse(text) {
        Some(cmd) => handle(cmd, &ctx).await,
        None => handle_callback(text, &ctx).await,
    }
}

#[test]
fn test_parse_all_commands() {
    assert!(matches!(Command::parse("/start"), Some(Command::Start)));
    assert!(matches!(Command::parse("/help"), Some(Command::Help)));
    assert!(matches!(
        Command::parse("/dashboard"),
        Some(Command::Dashboard)
    ));
    assert!(matches!(Command::parse("/stats"), Some(Command::Stats)));
    assert!(matches!(
        Command::parse("/add_habit Reading"),
        Some(Command::AddHabit)
    ));
    assert!(matches!(Command::parse("/habits"), Some(Command::Habits)));
    assert!(matches!(Command::parse("/done 1"), Some(Command::Done)));
    assert!(matches!(
        Command::parse("/add_task Ship it"),
        Some(Command::AddTask)
    ));
    assert!(matches!(Command::parse("/tasks"), Some(Command::Tasks)));
    assert!(matches!(
        Command::parse("/complete 2"),
        Some(Command::Complete)
    ));
    assert!(matches!(
        Command::parse("/add_note Idea"),
        Some(Command::AddNote)
    ));
    assert!(matches!(Command::parse("/notes"), Some(Command::Notes)));
    assert!(matches!(
        Command::parse("/edit_note 1 | milk"),
        Some(Command::EditNote)
    ));
    assert!(matches!(Command::parse("/mood happy"), Some(Command::Mood)));
    assert!(matches!(Command::parse("/moods"), Some(Command::Moods)));
    assert!(matches!(
        Command::parse("/achievements"),
        Some(Command::Achievements)
    ));
    assert!(matches!(Command::parse("/admin"), Some(Command::Admin)));
    assert!(matches!(Command::parse("/export"), Some(Command::Export)));
    assert!(matches!(
        Command::parse("/reset_all RESET ALL"),
        Some(Command::ResetAll)
    ));
}

#[test]
fn test_parse_commands_with_botname_suffix() {
    assert!(matches!(
        Command::parse("/help@momentum_bot"),
        Some(Command::Help)
    ));
    assert!(matches!(
        Command::parse("/done@momentum_bot 1"),
        Some(Command::Done)
    ));
    // Unknown command with @botname should still return None.
    assert!(Command::parse("/unknown@momentum_bot").is_none());
}

#[test]
fn test_parse_unknown_returns_none() {
    assert!(Command::parse("/unknown").is_none());
    assert!(Command::parse("hello").is_none());
    assert!(Command::parse("").is_none());
}

#[test]
fn test_args_extraction() {
    assert_eq!(args("/add_habit Reading | books"), "Reading | books");
    assert_eq!(args("/habits"), "");
    assert_eq!(args("/done  3 "), "3");
}

#[test]
fn test_progress_bar() {
    assert_eq!(dashboard::progress_bar(0, 3), "░░░░░░░░░░");
    assert_eq!(dashboard::progress_bar(3, 3), "██████████");
    assert_eq!(dashboard::progress_bar(2, 3), "██████░░░░");
    // No habits: empty bar, no division by zero.
    assert_eq!(dashboard::progress_bar(0, 0), "░░░░░░░░░░");
}

#[tokio::test]
async fn test_add_habit_announces_first_step_once() {
    let store = test_store().await;
    let admin = admin_config(vec![]);

    let reply = run(&store, &admin, 1, "/add_habit Reading | 30 min | learning | hard").await;
    assert!(reply.text.contains("Habit added"), "got: {}", reply.text);
    assert!(reply.text.contains("First Step"), "got: {}", reply.text);

    // Second habit: no repeat announcement.
    let reply = run(&store, &admin, 1, "/add_habit Running").await;
    assert!(reply.text.contains("Habit added"));
    assert!(!reply.text.contains("First Step"));
}

#[tokio::test]
async fn test_add_habit_usage_and_validation() {
    let store = test_store().await;
    let admin = admin_config(vec![]);

    let reply = run(&store, &admin, 1, "/add_habit").await;
    assert!(reply.text.contains("Usage"));

    let reply = run(&store, &admin, 1, "/add_habit Reading | | | extreme").await;
    assert!(reply.text.contains("difficulty"), "got: {}", reply.text);
}

#[tokio::test]
async fn test_done_marks_and_is_idempotent_per_day() {
    let store = test_store().await;
    let admin = admin_config(vec![]);
    run(&store, &admin, 1, "/add_habit Reading").await;

    let reply = run(&store, &admin, 1, "/done 1").await;
    assert!(reply.text.contains("done for today"), "got: {}", reply.text);
    assert!(reply.text.contains("Streak: 1 day"));

    // Same day again: success, streak unchanged.
    let reply = run(&store, &admin, 1, "/done 1").await;
    assert!(reply.text.contains("Streak: 1 day"));
}

#[tokio::test]
async fn test_done_bad_index() {
    let store = test_store().await;
    let admin = admin_config(vec![]);
    run(&store, &admin, 1, "/add_habit Reading").await;

    let reply = run(&store, &admin, 1, "/done 5").await;
    assert!(reply.text.contains("No habit #5"), "got: {}", reply.text);

    let reply = run(&store, &admin, 1, "/done x").await;
    assert!(reply.text.contains("Usage"));
}

#[tokio::test]
async fn test_habits_listing_shows_streaks() {
    let store = test_store().await;
    let admin = admin_config(vec![]);

    let reply = run(&store, &admin, 1, "/habits").await;
    assert!(reply.text.contains("No habits yet"));

    run(&store, &admin, 1, "/add_habit Reading | | learning").await;
    run(&store, &admin, 1, "/done 1").await;

    let reply = run(&store, &admin, 1, "/habits").await;
    assert!(reply.text.contains("Reading"));
    assert!(reply.text.contains("streak: 1"));
    assert!(reply.text.contains("last 7 days: 1/1"));
}

#[tokio::test]
async fn test_task_flow_and_task_master() {
    let store = test_store().await;
    let admin = admin_config(vec![]);

    let reply = run(&store, &admin, 1, "/tasks").await;
    assert!(reply.text.contains("No open tasks"));

    for i in 0..5 {
        run(&store, &admin, 1, &format!("/add_task Task {i}")).await;
    }
    let reply = run(&store, &admin, 1, "/tasks").await;
    assert!(reply.text.contains("Task 0"));
    assert!(reply.text.contains("/complete <number>"));

    // Complete four: no announcement yet.
    for _ in 0..4 {
        let reply = run(&store, &admin, 1, "/complete 1").await;
        assert!(reply.text.contains("Task completed"));
        assert!(!reply.text.contains("Task Master"));
    }

    // Fifth completion crosses the threshold, announced exactly once.
    let reply = run(&store, &admin, 1, "/complete 1").await;
    assert!(reply.text.contains("Task Master"), "got: {}", reply.text);
}

#[tokio::test]
async fn test_complete_bad_index() {
    let store = test_store().await;
    let admin = admin_config(vec![]);
    run(&store, &admin, 1, "/add_task Ship").await;

    let reply = run(&store, &admin, 1, "/complete 9").await;
    assert!(reply.text.contains("No task #9"));
}

#[tokio::test]
async fn test_notes_with_category_filter() {
    let store = test_store().await;
    let admin = admin_config(vec![]);

    run(&store, &admin, 1, "/add_note Idea | finance bot | work").await;
    run(&store, &admin, 1, "/add_note Groceries | milk").await;

    let reply = run(&store, &admin, 1, "/notes").await;
    assert!(reply.text.contains("Idea"));
    assert!(reply.text.contains("Groceries"));

    let reply = run(&store, &admin, 1, "/notes work").await;
    assert!(reply.text.contains("Idea"));
    assert!(!reply.text.contains("Groceries"));

    let reply = run(&store, &admin, 1, "/notes personal").await;
    assert!(reply.text.contains("No notes in category 'personal'"));
}

#[tokio::test]
async fn test_edit_note_rewrites_content() {
    let store = test_store().await;
    let admin = admin_config(vec![]);
    run(&store, &admin, 1, "/add_note Groceries | milk").await;

    let reply = run(&store, &admin, 1, "/edit_note 1 | milk and eggs").await;
    assert!(reply.text.contains("Note updated"), "got: {}", reply.text);

    let reply = run(&store, &admin, 1, "/notes").await;
    assert!(reply.text.contains("milk and eggs"));
    assert!(!reply.text.contains("milk\n"));
}

#[tokio::test]
async fn test_edit_note_usage_and_bad_index() {
    let store = test_store().await;
    let admin = admin_config(vec![]);
    run(&store, &admin, 1, "/add_note Groceries | milk").await;

    let reply = run(&store, &admin, 1, "/edit_note").await;
    assert!(reply.text.contains("Usage"));
    let reply = run(&store, &admin, 1, "/edit_note 1 |  ").await;
    assert!(reply.text.contains("Usage"));
    let reply = run(&store, &admin, 1, "/edit_note 4 | x").await;
    assert!(reply.text.contains("No note #4"));

    // Another user's numbering never touches user 1's notes.
    let reply = run(&store, &admin, 2, "/edit_note 1 | x").await;
    assert!(reply.text.contains("No note #1"));
    let reply = run(&store, &admin, 1, "/notes").await;
    assert!(reply.text.contains("milk"));
}

#[tokio::test]
async fn test_mood_flow() {
    let store = test_store().await;
    let admin = admin_config(vec![]);

    let reply = run(&store, &admin, 1, "/mood").await;
    assert!(reply.text.contains("Usage"));

    let reply = run(&store, &admin, 1, "/mood ecstatic").await;
    assert!(reply.text.contains("invalid mood"), "got: {}", reply.text);

    let reply = run(&store, &admin, 1, "/mood happy | good workout").await;
    assert!(reply.text.contains("Mood logged"));

    let reply = run(&store, &admin, 1, "/moods").await;
    assert!(reply.text.contains("happy"));
    assert!(reply.text.contains("good workout"));
}

#[tokio::test]
async fn test_mood_tracker_fires_on_fifth_entry() {
    let store = test_store().await;
    let admin = admin_config(vec![]);

    for _ in 0..4 {
        let reply = run(&store, &admin, 1, "/mood neutral").await;
        assert!(!reply.text.contains("Mood Tracker"));
    }
    let reply = run(&store, &admin, 1, "/mood happy").await;
    assert!(reply.text.contains("Mood Tracker"), "got: {}", reply.text);

    // Never announced twice.
    let reply = run(&store, &admin, 1, "/mood happy").await;
    assert!(!reply.text.contains("Mood Tracker"));
}

#[tokio::test]
async fn test_achievements_listing() {
    let store = test_store().await;
    let admin = admin_config(vec![]);

    let reply = run(&store, &admin, 1, "/achievements").await;
    assert!(reply.text.contains("No achievements yet"));

    run(&store, &admin, 1, "/add_habit Reading").await;
    let reply = run(&store, &admin, 1, "/achievements").await;
    assert!(reply.text.contains("First Step"));
    assert!(reply.text.contains("1/6"));
}

#[tokio::test]
async fn test_dashboard_buttons() {
    let store = test_store().await;
    let admin = admin_config(vec![]);
    run(&store, &admin, 1, "/add_habit Reading").await;
    run(&store, &admin, 1, "/add_habit Running").await;

    let reply = run(&store, &admin, 1, "/dashboard").await;
    assert!(reply.text.contains("Habits today"));
    assert!(reply.text.contains("0/2"));
    let labels: Vec<&str> = reply
        .buttons
        .iter()
        .flatten()
        .map(|b| b.label.as_str())
        .collect();
    assert!(labels.iter().any(|l| l.contains("Reading")));
    assert!(labels.iter().any(|l| l.contains("Running")));

    // All done: one-tap buttons replaced by the celebrate button.
    run(&store, &admin, 1, "/done 1").await;
    run(&store, &admin, 1, "/done 2").await;
    let reply = run(&store, &admin, 1, "/dashboard").await;
    assert!(reply.text.contains("2/2"));
    let data: Vec<&str> = reply
        .buttons
        .iter()
        .flatten()
        .map(|b| b.data.as_str())
        .collect();
    assert!(data.contains(&"celebrate"));
    assert!(!data.iter().any(|d| d.starts_with("habit_done:")));
}

#[tokio::test]
async fn test_habit_done_button_checks_owner() {
    let store = test_store().await;
    let admin = admin_config(vec![]);
    run(&store, &admin, 1, "/add_habit Reading").await;

    let habit_id = store.list_habits(1, true).await.unwrap()[0].id;

    // Another user pressing a stale button must not mark user 1's habit.
    let reply = run(&store, &admin, 2, &format!("habit_done:{habit_id}")).await;
    assert!(reply.text.contains("no longer exists"), "got: {}", reply.text);

    let reply = run(&store, &admin, 1, &format!("habit_done:{habit_id}")).await;
    assert!(reply.text.contains("done for today"));
}

#[tokio::test]
async fn test_unknown_callback() {
    let store = test_store().await;
    let admin = admin_config(vec![]);
    let reply = run(&store, &admin, 1, "bogus_button").await;
    assert!(reply.text.contains("expired"));
}

#[tokio::test]
async fn test_admin_commands_are_gated() {
    let store = test_store().await;
    let admin = admin_config(vec![99]);

    for cmd in ["/admin", "/export", "/reset_all RESET ALL"] {
        let reply = run(&store, &admin, 1, cmd).await;
        assert!(reply.text.contains("admin-only"), "{cmd}: {}", reply.text);
    }

    let reply = run(&store, &admin, 99, "/admin").await;
    assert!(reply.text.contains("Admin overview"));
}

#[tokio::test]
async fn test_reset_all_requires_verbatim_token() {
    let store = test_store().await;
    let admin = admin_config(vec![99]);
    run(&store, &admin, 1, "/add_habit Reading").await;

    // Wrong or missing token only prompts.
    let reply = run(&store, &admin, 99, "/reset_all").await;
    assert!(reply.text.contains("cannot be undone"));
    let reply = run(&store, &admin, 99, "/reset_all reset all").await;
    assert!(reply.text.contains("cannot be undone"));
    assert_eq!(store.list_habits(1, true).await.unwrap().len(), 1);

    let reply = run(&store, &admin, 99, "/reset_all RESET ALL").await;
    assert!(reply.text.contains("wiped"));
    assert!(store.list_habits(1, true).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_export_contains_all_collections() {
    let store = test_store().await;
    let admin = admin_config(vec![99]);
    run(&store, &admin, 1, "/add_habit Reading").await;
    run(&store, &admin, 1, "/add_task Ship | | high").await;
    run(&store, &admin, 1, "/mood happy").await;

    let reply = run(&store, &admin, 99, "/export").await;
    assert!(reply.text.contains("\"habits\""));
    assert!(reply.text.contains("Reading"));
    assert!(reply.text.contains("Ship"));
    assert!(reply.text.contains("happy"));
}

#[tokio::test]
async fn test_stats_summary() {
    let store = test_store().await;
    let admin = admin_config(vec![]);
    run(&store, &admin, 1, "/add_habit Reading").await;
    run(&store, &admin, 1, "/done 1").await;
    run(&store, &admin, 1, "/add_task Ship").await;
    run(&store, &admin, 1, "/complete 1").await;
    run(&store, &admin, 1, "/add_note Idea | bot | work").await;
    run(&store, &admin, 1, "/add_note List | milk | work").await;

    let reply = run(&store, &admin, 1, "/stats").await;
    assert!(reply.text.contains("best streak: 1"));
    assert!(reply.text.contains("Reading: 1/1 days (30d)"));
    assert!(reply.text.contains("1/1 completed (100%)"));
    assert!(reply.text.contains("work: 2"));
}

#[tokio::test]
async fn test_start_and_help() {
    let store = test_store().await;
    let admin = admin_config(vec![]);

    let reply = run(&store, &admin, 1, "/start").await;
    assert!(reply.text.contains("Hi Ada"));
    assert!(!reply.buttons.is_empty());

    let reply = run(&store, &admin, 1, "/help").await;
    assert!(reply.text.contains("/add_habit"));
    // Admin commands are not advertised.
    assert!(!reply.text.contains("/reset_all"));
}
