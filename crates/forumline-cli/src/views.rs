//! Plain-text rendering of forum data for the terminal.

use std::fmt::Write;

use forumline_core::auth::TokenClaims;
use forumline_core::models::{ForumStats, Message, Thread, ThreadDetail, User};
use forumline_core::utils::{format_date, format_optional, truncate_string, ANONYMOUS};

/// Width of the description preview in thread lists
const PREVIEW_LEN: usize = 60;

/// Width of the title column in thread lists
const TITLE_LEN: usize = 40;

fn date_or_dash(date: Option<&str>) -> String {
    date.map(format_date).unwrap_or_else(|| "-".to_string())
}

pub fn thread_list(threads: &[Thread]) -> String {
    if threads.is_empty() {
        return "No threads found.\n".to_string();
    }

    let mut out = String::new();
    for thread in threads {
        let _ = writeln!(
            out,
            "#{:<5} {:<width$}  {:<16} {}",
            thread.id,
            truncate_string(&thread.title, TITLE_LEN),
            truncate_string(thread.author_name(), 16),
            date_or_dash(thread.created_at.as_deref()),
            width = TITLE_LEN,
        );
        let preview = thread.preview(PREVIEW_LEN);
        if !preview.is_empty() {
            let _ = writeln!(out, "       {}", preview);
        }
        if !thread.tags.is_empty() {
            let _ = writeln!(out, "       [{}]", thread.tag_list());
        }
    }
    out
}

pub fn message(message: &Message) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "--- #{} {} on {}  (+{} / -{})",
        message.id,
        message.author_name(),
        date_or_dash(message.created_at.as_deref()),
        message.likes,
        message.dislikes,
    );
    let _ = writeln!(out, "{}", message.content.trim_end());
    if let Some(ref url) = message.image_url {
        let _ = writeln!(out, "[image: {}]", url);
    }
    out
}

/// Full thread view. `messages` wins over the messages embedded in the
/// detail when non-empty.
pub fn thread_detail(detail: &ThreadDetail, messages: &[Message]) -> String {
    let thread = &detail.thread;
    let mut out = String::new();

    let _ = writeln!(out, "{}", thread.title);
    let _ = writeln!(
        out,
        "by {} on {} | {} | {} views",
        thread.author_name(),
        date_or_dash(thread.created_at.as_deref()),
        format_optional(thread.status.as_deref(), "open"),
        detail.views.or(thread.view_count).unwrap_or(0),
    );
    if !thread.tags.is_empty() {
        let _ = writeln!(out, "tags: {}", thread.tag_list());
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", thread.description.trim_end());

    let messages = if messages.is_empty() {
        detail.messages.as_slice()
    } else {
        messages
    };
    let _ = writeln!(out);
    if messages.is_empty() {
        let _ = writeln!(out, "No replies yet.");
    }
    for m in messages {
        out.push_str(&message(m));
    }
    out
}

pub fn profile(user: &User) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} <{}>", user.username, user.email);
    let role = Some(user.role.as_str()).filter(|r| !r.is_empty());
    let _ = writeln!(out, "role:      {}", format_optional(role, "user"));
    if user.banned {
        let _ = writeln!(out, "status:    banned");
    }
    let _ = writeln!(out, "joined:    {}", date_or_dash(user.created_at.as_deref()));
    let _ = writeln!(out, "last seen: {}", date_or_dash(user.last_connection.as_deref()));
    let _ = writeln!(out, "threads:   {}", user.thread_count);
    let _ = writeln!(out, "messages:  {}", user.message_count);
    if let Some(ref picture) = user.profile_picture {
        let _ = writeln!(out, "picture:   {}", picture);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", user.biography_display());
    out
}

pub fn claims(claims: &TokenClaims) -> String {
    let role = if claims.role.is_empty() { "user" } else { claims.role.as_str() };
    format!("{} (id {}, {})\n", claims.username, claims.user_id, role)
}

pub fn stats(stats: &ForumStats) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} users, {} threads, {} messages",
        stats.user_count, stats.thread_count, stats.message_count
    );

    if !stats.recent_threads.is_empty() {
        let _ = writeln!(out, "\nRecent threads:");
        for thread in &stats.recent_threads {
            let _ = writeln!(
                out,
                "  #{:<5} {} ({}, {})",
                thread.id,
                truncate_string(&thread.title, TITLE_LEN),
                format_optional(thread.author.as_deref(), ANONYMOUS),
                date_or_dash(thread.created_at.as_deref()),
            );
        }
    }

    if !stats.active_users.is_empty() {
        let _ = writeln!(out, "\nMost active:");
        for user in &stats.active_users {
            let _ = writeln!(out, "  {:<20} {} messages", user.username, user.message_count);
        }
    }
    out
}
