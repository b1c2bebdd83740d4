use std::collections::BTreeMap;
use std::fmt::Write;

use crate::report::{RunReport, SessionSummary};

pub fn render_text(report: &RunReport) -> String {
    let mut out = String::new();
    if report.sessions.len() > 1 {
        for s in &report.sessions {
            render_session(&mut out, s);
            out.push('\n');
        }
    }

    let t = &report.totals;
    let _ = writeln!(out, "TOTAL");
    let _ = writeln!(out, "Completed sessions: {}", t.completed_sessions);
    let _ = writeln!(out, "Total duration: {}", format_duration(t.duration_secs));
    let _ = writeln!(
        out,
        "Total interactions: {}",
        stringify_interactions(&t.total_interactions)
    );
    let _ = writeln!(
        out,
        "Successful interactions: {}",
        stringify_interactions(&t.successful_interactions)
    );
    let _ = writeln!(out, "Total likes: {}", t.likes);
    let _ = writeln!(out, "Total followed: {}", t.followed);
    let _ = writeln!(out, "Total unfollowed: {}", t.unfollowed);
    render_optional_actions(&mut out, t.comments, t.private_messages, t.story_watches);
    out
}

fn render_session(out: &mut String, s: &SessionSummary) {
    let _ = writeln!(out, "SESSION #{}", s.index);
    let _ = writeln!(out, "Start time: {}", s.start_time.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(
        out,
        "Finish time: {}{}",
        s.finish_time.format("%Y-%m-%d %H:%M:%S"),
        if s.finished { "" } else { " (running)" }
    );
    let _ = writeln!(out, "Duration: {}", format_duration(s.duration_secs));
    let _ = writeln!(
        out,
        "Total interactions: {}",
        stringify_interactions(&s.total_interactions)
    );
    let _ = writeln!(
        out,
        "Successful interactions: {}",
        stringify_interactions(&s.successful_interactions)
    );
    let _ = writeln!(out, "Total likes: {}", s.likes);
    let _ = writeln!(out, "Total followed: {}", s.followed);
    let _ = writeln!(out, "Total unfollowed: {}", s.unfollowed);
    render_optional_actions(out, s.comments, s.private_messages, s.story_watches);
}

/// Comment, message and story lines only appear once something was done.
fn render_optional_actions(out: &mut String, comments: u64, messages: u64, stories: u64) {
    if comments > 0 {
        let _ = writeln!(out, "Total comments: {comments}");
    }
    if messages > 0 {
        let _ = writeln!(out, "Total private messages: {messages}");
    }
    if stories > 0 {
        let _ = writeln!(out, "Total story watches: {stories}");
    }
}

/// `@alice: 12, #cats: 3`, or `none`.
pub fn stringify_interactions(counts: &BTreeMap<String, u64>) -> String {
    if counts.is_empty() {
        return "none".to_string();
    }
    counts
        .iter()
        .map(|(k, v)| format!("{k}: {v}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `H:MM:SS`. Negative input (clock skew) renders as zero.
pub fn format_duration(secs: i64) -> String {
    let secs = secs.max(0);
    format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}
