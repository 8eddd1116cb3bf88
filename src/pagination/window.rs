/// Shape of the visible page-number window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowOptions {
    /// Number of consecutive pages around the current one
    pub range: u32,
    /// Always show the first and the last page as jump targets
    pub include_limits: bool,
}

impl WindowOptions {
    pub fn new(range: u32, include_limits: bool) -> Self {
        Self {
            range: range.max(1),
            include_limits,
        }
    }
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self::new(5, true)
    }
}

/// Compute the visible page numbers for `current` out of `last` pages.
///
/// The window stays centred on `current` and sticks to the end once `current` is
/// within half a range of `last`. Anchored to the end it starts at `last - range`,
/// so `last` itself is only shown through `include_limits`.
pub fn page_window(current: u32, last: u32, options: WindowOptions) -> Vec<u32> {
    let last = i64::from(last.max(1));
    let current = i64::from(current);
    let range = i64::from(options.range.max(1));

    let start = window_start(current, last, range);
    let end = last.min(start + range - 1);

    let mut pages: Vec<u32> = (start..=end).map(to_page).collect();

    if options.include_limits {
        pages.push(1);
        pages.push(to_page(last));
    }

    pages.sort_unstable();
    pages.dedup();
    pages
}

fn window_start(current: i64, last: i64, range: i64) -> i64 {
    // current >= last - range / 2, kept in integers
    if 2 * current >= 2 * last - range {
        (last - range).max(1)
    } else {
        (current - range / 2).max(1)
    }
}

fn to_page(value: i64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
