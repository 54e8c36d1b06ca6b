use std::time::Duration;

/// Slice of the item list to show for one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSlice {
    pub start: usize,
    pub end: usize,
    /// Unwrapped; the next call wraps it if it runs past the list.
    pub next_cursor: usize,
}

impl PageSlice {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Picks the page starting at `cursor`, wrapping to 0 when the cursor is stale.
pub fn select_page(item_count: usize, page_size: usize, cursor: usize) -> PageSlice {
    let page_size = page_size.max(1);
    let start = if cursor >= item_count { 0 } else { cursor };
    let next_cursor = start.saturating_add(page_size);

    PageSlice {
        start,
        end: next_cursor.min(item_count),
        next_cursor,
    }
}

/// Timing knobs for how long a page stays on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayPolicy {
    base_delay: Duration,
    single_page_delay: Duration,
    /// Damping constant `k`; larger values keep short last pages on screen longer.
    /// Always finite and non-negative.
    smoothing: f64,
}

impl Default for DelayPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(5000),
            single_page_delay: Duration::from_millis(1000),
            smoothing: 3.0,
        }
    }
}

impl DelayPolicy {
    pub fn new(base_delay: Duration, single_page_delay: Duration, smoothing: f64) -> Self {
        let smoothing = if smoothing.is_finite() && smoothing >= 0.0 {
            smoothing
        } else {
            0.0
        };
        Self {
            base_delay,
            single_page_delay,
            smoothing,
        }
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    pub fn single_page_delay(&self) -> Duration {
        self.single_page_delay
    }

    pub fn smoothing(&self) -> f64 {
        self.smoothing
    }

    /// How long to hold the page that started at `cursor_before_advance`.
    ///
    /// A partial last page is held for `base / ((ratio + k) / (k + 1))` where
    /// `ratio = page_size / items_on_last_page`.
    pub fn compute_delay(
        &self,
        item_count: usize,
        page_size: usize,
        cursor_before_advance: usize,
    ) -> Duration {
        let page_size = page_size.max(1);

        if item_count <= page_size {
            return self.single_page_delay;
        }

        let on_last_page = item_count.saturating_sub(cursor_before_advance);
        if on_last_page >= page_size {
            return self.base_delay;
        }
        if on_last_page == 0 {
            // stale cursor; select_page shows the first page in this case
            return self.base_delay;
        }

        let k = self.smoothing;
        let ratio = page_size as f64 / on_last_page as f64;
        let scale = (ratio + k) / (k + 1.0);

        Duration::from_secs_f64(self.base_delay.as_secs_f64() / scale)
    }
}
