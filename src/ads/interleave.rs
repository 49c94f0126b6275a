use crate::models::ads::DEFAULT_LIST_INTERVAL;

/// How ads are spliced into a content list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListAdPlan {
    /// Items per chunk between ads.
    pub interval: usize,
    /// Short lists (fewer than `interval` items) get their single ad only
    /// when they hold at least this many items.
    pub min_items_for_ad: usize,
    /// Append the trailing ad.
    pub show_minimum_ad: bool,
}

impl Default for ListAdPlan {
    fn default() -> Self {
        ListAdPlan {
            interval: DEFAULT_LIST_INTERVAL,
            min_items_for_ad: 1,
            show_minimum_ad: true,
        }
    }
}

#[derive(Debug)]
pub struct Keyed<'a, T> {
    pub key: String,
    pub item: &'a T,
}

#[derive(Debug)]
pub enum Segment<'a, T> {
    Items { key: String, items: Vec<Keyed<'a, T>> },
    Ad { key: String },
}

impl<T> Segment<'_, T> {
    pub fn is_ad(&self) -> bool {
        matches!(self, Segment::Ad { .. })
    }

    pub fn key(&self) -> &str {
        match self {
            Segment::Items { key, .. } | Segment::Ad { key } => key,
        }
    }
}

/// Split `items` into chunks of `plan.interval` with an ad after every chunk
/// that is followed by another, plus one trailing ad. Lists shorter than the
/// interval render as one block with at most one trailing ad.
pub fn interleave<'a, T, F>(items: &'a [T], plan: &ListAdPlan, key: F) -> Vec<Segment<'a, T>>
where
    F: Fn(&T) -> String,
{
    let keyed = |chunk: &'a [T]| -> Vec<Keyed<'a, T>> {
        chunk
            .iter()
            .map(|item| Keyed { key: key(item), item })
            .collect()
    };

    if items.is_empty() {
        return vec![];
    }

    let interval = plan.interval.max(1);
    let mut segments = Vec::new();

    if items.len() < interval {
        segments.push(Segment::Items {
            key: "chunk-0".to_string(),
            items: keyed(items),
        });
        if plan.show_minimum_ad && items.len() >= plan.min_items_for_ad {
            segments.push(Segment::Ad {
                key: "ad-end".to_string(),
            });
        }
        return segments;
    }

    for (n, chunk) in items.chunks(interval).enumerate() {
        let offset = n * interval;
        segments.push(Segment::Items {
            key: format!("chunk-{}", offset),
            items: keyed(chunk),
        });
        if offset + interval < items.len() {
            segments.push(Segment::Ad {
                key: format!("ad-{}", offset),
            });
        }
    }

    if plan.show_minimum_ad {
        segments.push(Segment::Ad {
            key: "ad-end".to_string(),
        });
    }

    segments
}

#[derive(Debug, PartialEq)]
pub enum ReaderSegment<'a> {
    Part { number: u32, text: &'a str },
    /// Inline ad following part `after`.
    Ad { after: u32 },
}

/// Story parts on the current reader page, keyed by part number, with an
/// inline ad after every `cadence` displayed parts, never after the last one.
pub fn interleave_parts(parts: &[(u32, String)], cadence: usize) -> Vec<ReaderSegment<'_>> {
    let cadence = cadence.max(1);
    let last = parts.len().saturating_sub(1);
    let mut segments = Vec::with_capacity(parts.len() + parts.len() / cadence);

    for (i, (number, text)) in parts.iter().enumerate() {
        let number = *number;
        segments.push(ReaderSegment::Part { number, text });
        if (i + 1) % cadence == 0 && i < last {
            segments.push(ReaderSegment::Ad { after: number });
        }
    }

    segments
}
