//! Pagination over an ordered row sequence.

/// One page of rows with the corrected page number.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub rows: Vec<T>,
    /// Requested page clamped into `[1, total_pages]`
    pub current_page: usize,
    pub total_pages: usize,
}

/// Direction for the cyclic next/prev page buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStep {
    Next,
    Prev,
}

/// Number of pages for `len` rows; at least 1 even when empty.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1)).max(1)
}

/// Page reached by one cyclic step: next from the last page wraps to 1,
/// prev from page 1 wraps to the last page.
pub fn step_page(current_page: usize, total_pages: usize, step: PageStep) -> usize {
    let total = total_pages.max(1);
    let current = current_page.clamp(1, total);
    match step {
        PageStep::Next => current % total + 1,
        PageStep::Prev => (current + total - 2) % total + 1,
    }
}

/// Slice out `current_page` (1-based). Out-of-range requests are clamped,
/// never rejected; the last page may be short.
pub fn paginate<T: Clone>(rows: &[T], current_page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_pages = total_pages(rows.len(), page_size);
    let current_page = current_page.clamp(1, total_pages);
    let start = ((current_page - 1) * page_size).min(rows.len());
    let end = (start + page_size).min(rows.len());
    Page {
        rows: rows[start..end].to_vec(),
        current_page,
        total_pages,
    }
}
