//! Terminal rendering of page state.

use colored::Colorize;
use serde::Serialize;

use crate::pagination::PageSnapshot;

/// Page numbers separated by spaces, the current page highlighted and gaps shown
/// as an ellipsis.
pub fn render_window(pages: &[u32], current: u32) -> String {
    let mut parts = Vec::with_capacity(pages.len() * 2);
    let mut previous: Option<u32> = None;

    for &page in pages {
        if previous.is_some_and(|p| page > p + 1) {
            parts.push("…".dimmed().to_string());
        }
        parts.push(render_page(page, current));
        previous = Some(page);
    }

    parts.join(" ")
}

fn render_page(page: u32, current: u32) -> String {
    if page == current {
        format!("[{}]", page).bold().green().to_string()
    } else {
        page.to_string()
    }
}

pub fn render_summary<T>(snapshot: &PageSnapshot<T>) -> String {
    let mut summary = format!(
        "Page {} of {} ({} per page)",
        snapshot.current_page, snapshot.last_page, snapshot.results_per_page
    );
    if let Some(total) = snapshot.total {
        summary.push_str(&format!(", {} items in total", total));
    }
    summary
}

/// Summary line, page window and one compact JSON line per item.
pub fn render_page_state<T: Serialize>(snapshot: &PageSnapshot<T>) -> serde_json::Result<String> {
    let mut lines = vec![
        render_summary(snapshot).bold().to_string(),
        render_window(&snapshot.pages, snapshot.current_page),
    ];

    if snapshot.items.is_empty() {
        lines.push("No items on this page.".dimmed().to_string());
    }
    for item in &snapshot.items {
        lines.push(serde_json::to_string(item)?);
    }

    Ok(lines.join("\n"))
}
