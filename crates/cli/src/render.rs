//! Plain-text rendering of the dashboard screens.
//!
//! Every function returns a `String` so output can be asserted on in tests
//! and printed by the command layer.

use std::fmt::Write;

use bugdesk_core::board::{BugBoard, LoadState, ProjectBoard};
use bugdesk_core::bug::BugStatus;
use bugdesk_core::detail::BugDetail;
use bugdesk_core::listing::{ListView, Searchable};
use bugdesk_core::user::{initials, UserProfile, UserSummary};

const TITLE_WIDTH: usize = 36;

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

/// `new (red)`, `started (blue)`, ...
pub fn status_badge(status: BugStatus) -> String {
    format!("{} ({})", status, status.color_hint())
}

fn footer<T: Searchable>(out: &mut String, view: &ListView<T>) {
    if let Some(range) = view.range() {
        let _ = writeln!(
            out,
            "Showing {} to {} of {} entries (page {} of {})",
            range.start,
            range.end,
            range.total,
            view.page(),
            view.total_pages()
        );
    }
}

pub fn bug_board(board: &BugBoard) -> String {
    let mut out = String::new();
    if let Some(title) = board.project_title() {
        let _ = writeln!(out, "Project: {title}\n");
    }

    match board.state() {
        LoadState::Loading => return out + "Loading bugs...\n",
        LoadState::Failed => return out + "Failed to load bugs. Run the command again to retry.\n",
        LoadState::Loaded => {}
    }
    if board.is_empty_state() {
        return out + "No bugs exist\n";
    }

    let view = board.view();
    let visible = view.visible();
    if visible.is_empty() {
        let _ = writeln!(out, "No bugs match '{}'.", view.query());
        return out;
    }

    let _ = writeln!(
        out,
        "{:>5}  {:<TITLE_WIDTH$}  {:<8}  {:<16}  {:<9}  {:<10}  ASSIGNEES",
        "ID", "TITLE", "TYPE", "STATUS", "RISK", "DEADLINE"
    );
    for scored in visible {
        let bug = &scored.bug;
        let assignees = bug
            .assignees
            .iter()
            .map(|a| initials(&a.name))
            .collect::<Vec<_>>()
            .join(" ");
        let _ = writeln!(
            out,
            "{:>5}  {:<TITLE_WIDTH$}  {:<8}  {:<16}  {:<9}  {:<10}  {}",
            bug.id,
            truncate(&bug.title, TITLE_WIDTH),
            bug.kind,
            status_badge(bug.status),
            scored.risk.label,
            bug.deadline.as_deref().unwrap_or("-"),
            assignees
        );
    }
    out.push('\n');
    footer(&mut out, view);
    out
}

pub fn project_board(board: &ProjectBoard) -> String {
    let mut out = String::new();
    match board.state() {
        LoadState::Loading => return "Loading projects...\n".into(),
        LoadState::Failed => return "Failed to load projects. Run the command again to retry.\n".into(),
        LoadState::Loaded => {}
    }

    let view = board.view();
    let visible = view.visible();
    if visible.is_empty() {
        return "No projects found.\n".into();
    }
    for project in visible {
        let _ = writeln!(out, "[{}] {}", project.id, project.title);
        let _ = writeln!(out, "      {}", project.description);
    }
    out.push('\n');
    footer(&mut out, view);
    out
}

pub fn bug_detail(detail: &BugDetail) -> String {
    let bug = detail.bug();
    let mut out = String::new();
    let _ = writeln!(out, "#{} {}", bug.id, bug.title);
    let _ = writeln!(out, "  Type:     {}", bug.kind);
    let _ = writeln!(out, "  Status:   {}", status_badge(bug.status));
    let _ = writeln!(out, "  Deadline: {}", bug.deadline.as_deref().unwrap_or("-"));
    if let Some(created_by) = &bug.created_by {
        let _ = writeln!(out, "  Reporter: {created_by}");
    }
    let _ = writeln!(
        out,
        "  Screenshot: {}",
        if bug.has_screenshot() { "attached" } else { "none" }
    );
    let _ = writeln!(out, "\n{}", bug.description.as_deref().unwrap_or(""));

    out.push_str("\nAssignees:\n");
    if detail.assignees().is_empty() {
        out.push_str("  (none)\n");
    }
    for user in detail.assignees() {
        let _ = writeln!(out, "  [{}] {}", initials(&user.name), user.name);
    }
    out
}

pub fn profile(profile: &UserProfile) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "[{}] {}", initials(&profile.name), profile.name);
    let _ = writeln!(out, "  Email: {}", profile.email);
    let _ = writeln!(out, "  Phone: {}", profile.phone.as_deref().unwrap_or("-"));
    let _ = writeln!(out, "  Role:  {}", profile.role);
    out
}

pub fn user_list(heading: &str, users: &[UserSummary]) -> String {
    let mut out = format!("{heading}:\n");
    if users.is_empty() {
        out.push_str("  (none)\n");
    }
    for user in users {
        let _ = write!(out, "  {:>5}  {}", user.id, user.name);
        if let Some(email) = &user.email {
            let _ = write!(out, " <{email}>");
        }
        out.push('\n');
    }
    out
}
