/// Page strips longer than this collapse into endpoints, a window and ellipses.
pub const MAX_UNCOLLAPSED_PAGES: usize = 7;

#[derive(Debug, PartialEq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// Requested page, 1-based.
    pub page: usize,
    /// Never below 1, so controls stay well-defined for empty collections.
    pub total_pages: usize,
    pub total_items: usize,
}

#[cfg(test)]
impl<T> Page<'_, T> {
    pub fn has_prev(&self) -> bool {
        self.page > 1 && self.page <= self.total_pages
    }

    pub fn has_next(&self) -> bool {
        self.page >= 1 && self.page < self.total_pages
    }
}

pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    total_items.div_ceil(page_size.max(1)).max(1)
}

/// Slice `items` to 1-based `page`. Pages outside `[1, total_pages]` give an
/// empty slice.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> Page<'_, T> {
    let size = page_size.max(1);
    let total = total_pages(items.len(), size);
    let slice = if page == 0 || page > total {
        &items[0..0]
    } else {
        let start = (page - 1) * size;
        let end = (start + size).min(items.len());
        &items[start.min(items.len())..end]
    };
    Page {
        items: slice,
        page,
        total_pages: total,
        total_items: items.len(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMarker {
    Number(usize),
    Ellipsis,
}

/// Page-number strip: every page when there are at most seven, otherwise
/// the first page, `current ± 1` clipped to `[2, total - 1]`, the last page,
/// and an ellipsis wherever the window does not touch an endpoint.
pub fn page_strip(current: usize, total: usize) -> Vec<PageMarker> {
    if total <= MAX_UNCOLLAPSED_PAGES {
        return (1..=total).map(PageMarker::Number).collect();
    }

    let start = current.saturating_sub(1).max(2);
    let end = current.saturating_add(1).min(total - 1);

    let mut strip = vec![PageMarker::Number(1)];
    if start > 2 {
        strip.push(PageMarker::Ellipsis);
    }
    strip.extend((start..=end).map(PageMarker::Number));
    if end < total - 1 {
        strip.push(PageMarker::Ellipsis);
    }
    strip.push(PageMarker::Number(total));
    strip
}

/// Resolve a navigation request; anything outside `[1, total]` is a no-op.
pub fn navigate(requested: usize, total: usize) -> Option<usize> {
    (1..=total).contains(&requested).then_some(requested)
}

/// Window of story parts shown on one reader page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderWindow {
    /// First part number on the page, 1-based.
    pub first_part: u32,
    /// Parts requested for the page, clipped to the story length.
    pub count: u32,
    pub total_pages: usize,
}

impl ReaderWindow {
    pub fn last_part(&self) -> u32 {
        self.first_part + self.count.saturating_sub(1)
    }
}

/// Parts `[(page-1)*per_page + 1, page*per_page]` of a `total_parts` story.
/// Out-of-range pages give a window with `count == 0`.
pub fn reader_window(total_parts: u32, page: usize, parts_per_page: usize) -> ReaderWindow {
    let per_page = parts_per_page.max(1);
    let total = total_pages(total_parts as usize, per_page);
    if page == 0 || page > total {
        return ReaderWindow {
            first_part: 1,
            count: 0,
            total_pages: total,
        };
    }
    let first = (page - 1) * per_page + 1;
    let count = per_page.min((total_parts as usize + 1).saturating_sub(first));
    ReaderWindow {
        first_part: first as u32,
        count: count as u32,
        total_pages: total,
    }
}
