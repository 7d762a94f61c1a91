use serde::{Serialize, Serializer};
use std::fmt;

pub const MAX_MARKERS: usize = 7;
const EDGE_RUN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageMarker {
    Page(usize),
    Ellipsis,
}

impl Serialize for PageMarker {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Page(page) => serializer.serialize_u64(*page as u64),
            Self::Ellipsis => serializer.serialize_str("ellipsis"),
        }
    }
}

impl fmt::Display for PageMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page(page) => write!(f, "{page}"),
            Self::Ellipsis => f.write_str("…"),
        }
    }
}

/// Bounded page-marker strip for a dot indicator.
///
/// Never longer than [`MAX_MARKERS`]; large ranges are compressed around the
/// first page, the last page, and the current page.
pub fn compute_window(current_page: usize, total_pages: usize) -> Vec<PageMarker> {
    if total_pages <= MAX_MARKERS {
        return (0..total_pages).map(PageMarker::Page).collect();
    }

    let last = total_pages - 1;
    let current = current_page.min(last);

    if current <= 3 {
        (0..EDGE_RUN)
            .map(PageMarker::Page)
            .chain([PageMarker::Ellipsis, PageMarker::Page(last)])
            .collect()
    } else if current >= total_pages - 4 {
        [PageMarker::Page(0), PageMarker::Ellipsis]
            .into_iter()
            .chain((total_pages - EDGE_RUN..total_pages).map(PageMarker::Page))
            .collect()
    } else {
        vec![
            PageMarker::Page(0),
            PageMarker::Ellipsis,
            PageMarker::Page(current - 1),
            PageMarker::Page(current),
            PageMarker::Page(current + 1),
            PageMarker::Ellipsis,
            PageMarker::Page(last),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::PageMarker::{Ellipsis, Page};
    use super::*;

    #[test]
    fn small_totals_list_every_page() {
        assert_eq!(compute_window(0, 0), vec![]);
        assert_eq!(compute_window(0, 1), vec![Page(0)]);
        assert_eq!(
            compute_window(3, 7),
            (0..7).map(Page).collect::<Vec<_>>()
        );
    }

    #[test]
    fn near_start() {
        assert_eq!(
            compute_window(0, 12),
            vec![Page(0), Page(1), Page(2), Page(3), Page(4), Ellipsis, Page(11)]
        );
        assert_eq!(compute_window(3, 12), compute_window(0, 12));
    }

    #[test]
    fn middle() {
        assert_eq!(
            compute_window(6, 12),
            vec![Page(0), Ellipsis, Page(5), Page(6), Page(7), Ellipsis, Page(11)]
        );
    }

    #[test]
    fn near_end() {
        assert_eq!(
            compute_window(8, 12),
            vec![Page(0), Ellipsis, Page(7), Page(8), Page(9), Page(10), Page(11)]
        );
        assert_eq!(compute_window(11, 12), compute_window(8, 12));
    }

    #[test]
    fn out_of_range_page_is_clamped() {
        assert_eq!(compute_window(40, 12), compute_window(11, 12));
    }

    #[test]
    fn invariants_hold_for_every_position() {
        for total in 0..30 {
            for current in 0..total {
                let window = compute_window(current, total);
                assert!(window.len() <= MAX_MARKERS, "total={total} current={current}");
                assert!(
                    window.windows(2).all(|w| !(w[0] == Ellipsis && w[1] == Ellipsis)),
                    "total={total} current={current}"
                );
                if total > 1 {
                    assert!(window.contains(&Page(current)), "total={total} current={current}");
                }
            }
        }
    }

    #[test]
    fn serializes_ellipsis_as_string() {
        let json = serde_json::to_string(&compute_window(6, 12)).unwrap();
        assert_eq!(json, r#"[0,"ellipsis",5,6,7,"ellipsis",11]"#);
    }
}
