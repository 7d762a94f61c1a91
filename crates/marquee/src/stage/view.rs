use crate::config::CarouselName;
use crate::stage::board::BoardEntry;
use rotator::{CarouselSnapshot, PageMarker, compute_window};

const NAME_WIDTH: usize = 14;

pub fn render_line(name: &CarouselName, entry: &BoardEntry) -> String {
    let s = &entry.snapshot;
    let name = name.as_str();

    if s.disposed {
        return format!("{name:<width$} (disposed)", width = NAME_WIDTH);
    }
    if s.item_count == 0 {
        return format!("{name:<width$} (empty)", width = NAME_WIDTH);
    }

    // Hidden content stays blank so the swap is never visible.
    let title = if s.is_content_visible() {
        entry.title.as_deref().unwrap_or_default()
    } else {
        ""
    };

    format!(
        "{name:<width$} {:>3}/{:<3} {:<10} {:<5} {:<8} {}  {}",
        s.current_index + 1,
        s.item_count,
        s.phase.to_string(),
        s.direction.to_string(),
        s.offset.to_string(),
        dots(s),
        title,
        width = NAME_WIDTH
    )
    .trim_end()
    .to_string()
}

pub fn dots(s: &CarouselSnapshot) -> String {
    compute_window(s.current_index, s.item_count)
        .iter()
        .map(|marker| match marker {
            PageMarker::Page(page) if *page == s.current_index => "●",
            PageMarker::Page(_) => "○",
            PageMarker::Ellipsis => "…",
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rotator::{Direction, Phase, SlideOffset};

    fn entry(current_index: usize, item_count: usize, phase: Phase) -> BoardEntry {
        let offset = match phase {
            Phase::SlideOut => SlideOffset::Leading,
            Phase::Reposition => SlideOffset::Trailing,
            _ => SlideOffset::Centered,
        };
        BoardEntry {
            snapshot: CarouselSnapshot {
                current_index,
                item_count,
                direction: Direction::Right,
                phase,
                offset,
                pending_target: None,
                disposed: false,
            },
            title: Some("Five habits".to_string()),
        }
    }

    #[test]
    fn idle_line_shows_title_and_dots() {
        let line = render_line(&"hero".into(), &entry(1, 3, Phase::Idle));
        assert!(line.starts_with("hero "));
        assert!(line.contains("2/3"));
        assert!(line.contains("○ ● ○"));
        assert!(line.ends_with("Five habits"));
    }

    #[test]
    fn hidden_phases_blank_the_title() {
        let line = render_line(&"hero".into(), &entry(1, 3, Phase::Reposition));
        assert!(line.contains("reposition"));
        assert!(line.contains("trailing"));
        assert!(!line.contains("Five habits"));
    }

    #[test]
    fn long_lists_are_compressed() {
        let s = entry(6, 12, Phase::Idle).snapshot;
        assert_eq!(dots(&s), "○ … ○ ● ○ … ○");
    }

    #[test]
    fn empty_and_disposed_carousels() {
        let empty = render_line(&"quotes".into(), &entry(0, 0, Phase::Idle));
        assert!(empty.ends_with("(empty)"));

        let mut gone = entry(0, 3, Phase::Idle);
        gone.snapshot.disposed = true;
        assert!(render_line(&"quotes".into(), &gone).ends_with("(disposed)"));
    }
}
