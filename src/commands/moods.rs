//! Mood command handlers: /mood, /moods.

use super::Reply;
use crate::achievements;
use momentum_core::entities::Mood;
use momentum_core::parse::MoodArgs;
use momentum_store::Store;

pub(super) fn mood_icon(mood: Mood) -> &'static str {
    match mood {
        Mood::Awesome => "🤩",
        Mood::Happy => "🙂",
        Mood::Neutral => "😐",
        Mood::Sad => "😔",
        Mood::Angry => "😠",
    }
}

pub(super) async fn handle_mood(store: &Store, user_id: i64, args: &str) -> Reply {
    if args.is_empty() {
        let options = Mood::ALL
            .iter()
            .map(|m| format!("{} {m}", mood_icon(*m)))
            .collect::<Vec<_>>()
            .join(", ");
        return Reply::text(format!(
            "Usage: /mood <mood> | notes\nMoods: {options}\n\
             Example: /mood happy | good workout"
        ));
    }

    let parsed = match MoodArgs::parse(args) {
        Ok(p) => p,
        Err(e) => return Reply::text(format!("⚠️ {e}")),
    };

    match store.record_mood(user_id, parsed.mood, &parsed.notes).await {
        Ok(_) => {
            let mut text = format!(
                "{} Mood logged: *{}*",
                mood_icon(parsed.mood),
                parsed.mood
            );
            match achievements::after_mood_recorded(store, user_id).await {
                Ok(newly) => text.push_str(&achievements::announce(&newly)),
                Err(e) => return Reply::text(format!("Error: {e}")),
            }
            Reply::text(text)
        }
        Err(e) => Reply::text(format!("Error: {e}")),
    }
}

pub(super) async fn handle_moods(store: &Store, user_id: i64) -> Reply {
    let entries = match store.list_moods_since(user_id, 7).await {
        Ok(m) => m,
        Err(e) => return Reply::text(format!("Error: {e}")),
    };

    if entries.is_empty() {
        return Reply::text("No moods logged in the last 7 days. Log one with /mood happy.");
    }

    let mut out = String::from("📖 *Your moods, last 7 days*\n");
    for entry in &entries {
        out.push_str(&format!(
            "\n{} {} — {}",
            mood_icon(entry.mood),
            entry.mood,
            entry.recorded_at,
        ));
        if !entry.notes.is_empty() {
            out.push_str(&format!("\n  {}", entry.notes));
        }
    }
    Reply::text(out)
}
