//! Note command handlers: /add_note, /notes, /edit_note.

use super::Reply;
use momentum_core::parse::NoteArgs;
use momentum_store::Store;

pub(super) async fn handle_add_note(store: &Store, user_id: i64, args: &str) -> Reply {
    if args.is_empty() {
        return Reply::text(
            "Usage: /add_note title | content | category\n\
             Example: /add_note Project idea | build a finance bot | work\n\
             Only the title is required.",
        );
    }

    let parsed = match NoteArgs::parse(args) {
        Ok(p) => p,
        Err(e) => return Reply::text(format!("⚠️ {e}")),
    };

    match store
        .create_note(user_id, &parsed.title, &parsed.content, &parsed.category)
        .await
    {
        Ok(_) => Reply::text(format!(
            "🗒 Note saved: *{}* ({})",
            parsed.title, parsed.category
        )),
        Err(e) => Reply::text(format!("Error: {e}")),
    }
}

pub(super) async fn handle_notes(store: &Store, user_id: i64, args: &str) -> Reply {
    let category = if args.is_empty() { None } else { Some(args) };

    let notes = match store.list_notes(user_id, category).await {
        Ok(n) => n,
        Err(e) => return Reply::text(format!("Error: {e}")),
    };

    if notes.is_empty() {
        return Reply::text(match category {
            Some(cat) => format!("No notes in category '{cat}'."),
            None => "No notes yet. Add one with /add_note title | content.".to_string(),
        });
    }

    let mut out = match category {
        Some(cat) => format!("🗒 *Your notes* ({cat})\n"),
        None => String::from("🗒 *Your notes*\n"),
    };
    for (i, note) in notes.iter().enumerate() {
        out.push_str(&format!(
            "\n{}. *{}* ({})",
            i + 1,
            note.title,
            note.category
        ));
        if !note.content.is_empty() {
            out.push_str(&format!("\n   {}", note.content));
        }
    }
    // Edit numbers follow the unfiltered listing.
    if category.is_none() {
        out.push_str("\n\nRewrite one: /edit_note <number> | new content");
    }
    Reply::text(out)
}

pub(super) async fn handle_edit_note(store: &Store, user_id: i64, args: &str) -> Reply {
    const USAGE: &str =
        "Usage: /edit_note <number> | new content — the note's number from /notes.";

    let Some((number, content)) = args.split_once('|') else {
        return Reply::text(USAGE);
    };
    let content = content.trim();
    let Ok(index) = number.trim().parse::<usize>() else {
        return Reply::text(USAGE);
    };
    if content.is_empty() {
        return Reply::text(USAGE);
    }

    let notes = match store.list_notes(user_id, None).await {
        Ok(n) => n,
        Err(e) => return Reply::text(format!("Error: {e}")),
    };

    let Some(note) = index.checked_sub(1).and_then(|i| notes.get(i)) else {
        return Reply::text(format!(
            "No note #{index}. You have {} — see /notes.",
            notes.len()
        ));
    };

    match store.update_note(note.id, user_id, content).await {
        Ok(true) => Reply::text(format!("🗒 Note updated: *{}*", note.title)),
        Ok(false) => Reply::text("That note no longer exists. Try /notes."),
        Err(e) => Reply::text(format!("Error: {e}")),
    }
}
