//! Built-in assistant commands — every interaction is a command or a button press.

mod admin;
mod dashboard;
mod habits;
mod moods;
mod notes;
mod tasks;

#[cfg(test)]
mod tests;

use momentum_core::config::AdminConfig;
use momentum_core::message::Button;
use momentum_store::Store;

/// A handler response: text plus optional inline keyboard rows.
#[derive(Debug, Clone)]
pub struct Reply {
    pub text: String,
    pub buttons: Vec<Vec<Button>>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            buttons: Vec::new(),
        }
    }

    pub fn with_buttons(mut self, buttons: Vec<Vec<Button>>) -> Self {
        self.buttons = buttons;
        self
    }
}

/// Grouped context for command execution.
pub struct CommandContext<'a> {
    pub store: &'a Store,
    pub admin: &'a AdminConfig,
    pub user_id: i64,
    pub sender_name: Option<&'a str>,
    pub text: &'a str,
}

/// Known assistant commands.
pub enum Command {
    Start,
    Help,
    Dashboard,
    Stats,
    AddHabit,
    Habits,
    Done,
    AddTask,
    Tasks,
    Complete,
    AddNote,
    Notes,
    EditNote,
    Mood,
    Moods,
    Achievements,
    Admin,
    Export,
    ResetAll,
}

impl Command {
    /// Parse a command from message text. Returns `None` for anything that
    /// is not a recognized `/` command.
    pub fn parse(text: &str) -> Option<Self> {
        let first = text.split_whitespace().next()?;
        // Strip @botname suffix (e.g. "/help@momentum_bot" → "/help").
        let cmd = first.split('@').next().unwrap_or(first);
        match cmd {
            "/start" => Some(Self::Start),
            "/help" => Some(Self::Help),
            "/dashboard" => Some(Self::Dashboard),
            "/stats" => Some(Self::Stats),
            "/add_habit" => Some(Self::AddHabit),
            "/habits" => Some(Self::Habits),
            "/done" => Some(Self::Done),
            "/add_task" => Some(Self::AddTask),
            "/tasks" => Some(Self::Tasks),
            "/complete" => Some(Self::Complete),
            "/add_note" => Some(Self::AddNote),
            "/notes" => Some(Self::Notes),
            "/edit_note" => Some(Self::EditNote),
            "/mood" => Some(Self::Mood),
            "/moods" => Some(Self::Moods),
            "/achievements" => Some(Self::Achievements),
            "/admin" => Some(Self::Admin),
            "/export" => Some(Self::Export),
            "/reset_all" => Some(Self::ResetAll),
            _ => None,
        }
    }
}

/// Text after the command word, trimmed. Empty when the command stands alone.
fn args(text: &str) -> &str {
    match text.split_once(char::is_whitespace) {
        Some((_, rest)) => rest.trim(),
        None => "",
    }
}

fn is_admin(ctx: &CommandContext<'_>) -> bool {
    ctx.admin.user_ids.contains(&ctx.user_id)
}

/// Handle a command and return the response.
pub async fn handle(cmd: Command, ctx: &CommandContext<'_>) -> Reply {
    match cmd {
        Command::Start => dashboard::handle_start(ctx.sender_name),
        Command::Help => dashboard::handle_help(),
        Command::Dashboard => dashboard::handle_dashboard(ctx.store, ctx.user_id).await,
        Command::Stats => dashboard::handle_stats(ctx.store, ctx.user_id).await,
        Command::AddHabit => habits::handle_add_habit(ctx.store, ctx.user_id, args(ctx.text)).await,
        Command::Habits => habits::handle_habits(ctx.store, ctx.user_id).await,
        Command::Done => habits::handle_done(ctx.store, ctx.user_id, args(ctx.text)).await,
        Command::AddTask => tasks::handle_add_task(ctx.store, ctx.user_id, args(ctx.text)).await,
        Command::Tasks => tasks::handle_tasks(ctx.store, ctx.user_id).await,
        Command::Complete => tasks::handle_complete(ctx.store, ctx.user_id, args(ctx.text)).await,
        Command::AddNote => notes::handle_add_note(ctx.store, ctx.user_id, args(ctx.text)).await,
        Command::Notes => notes::handle_notes(ctx.store, ctx.user_id, args(ctx.text)).await,
        Command::EditNote => notes::handle_edit_note(ctx.store, ctx.user_id, args(ctx.text)).await,
        Command::Mood => moods::handle_mood(ctx.store, ctx.user_id, args(ctx.text)).await,
        Command::Moods => moods::handle_moods(ctx.store, ctx.user_id).await,
        Command::Achievements => dashboard::handle_achievements(ctx.store, ctx.user_id).await,
        Command::Admin => {
            if !is_admin(ctx) {
                return Reply::text("This command is admin-only.");
            }
            admin::handle_admin(ctx.store).await
        }
        Command::Export => {
            if !is_admin(ctx) {
                return Reply::text("This command is admin-only.");
            }
            admin::handle_export(ctx.store).await
        }
        Command::ResetAll => {
            if !is_admin(ctx) {
                return Reply::text("This command is admin-only.");
            }
            admin::handle_reset(ctx.store, &ctx.admin.reset_token, args(ctx.text)).await
        }
    }
}

/// Route a button press by its callback data.
pub async fn handle_callback(data: &str, ctx: &CommandContext<'_>) -> Reply {
    if let Some(raw_id) = data.strip_prefix("habit_done:") {
        return habits::handle_habit_button(ctx.store, ctx.user_id, raw_id).await;
    }
    match data {
        "dashboard" => dashboard::handle_dashboard(ctx.store, ctx.user_id).await,
        "stats" => dashboard::handle_stats(ctx.store, ctx.user_id).await,
        "habits" => habits::handle_habits(ctx.store, ctx.user_id).await,
        "tasks" => tasks::handle_tasks(ctx.store, ctx.user_id).await,
        "achievements" => dashboard::handle_achievements(ctx.store, ctx.user_id).await,
        "quick_add" => dashboard::handle_quick_add(),
        "celebrate" => Reply::text("🎉 Every habit done today. Keep the chain going tomorrow!"),
        _ => Reply::text("That button has expired. Try /dashboard."),
    }
}
