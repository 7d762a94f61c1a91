use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumString, Display,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    #[default]
    Right,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

pub fn next(current: usize, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    (current + 1) % count
}

pub fn prev(current: usize, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    (current % count + count - 1) % count
}

/// Direction of a direct jump from `current` to `target`.
///
/// Forward jumps read as [`Direction::Right`], backward jumps as
/// [`Direction::Left`]. With more than two items the two wraparound steps are
/// read as adjacent moves: last to first is forward, first to last is
/// backward, matching what [`next`] and [`prev`] would report.
pub fn direction_to(current: usize, target: usize, count: usize) -> Direction {
    if count > 2 {
        let last = count - 1;
        if current == last && target == 0 {
            return Direction::Right;
        }
        if current == 0 && target == last {
            return Direction::Left;
        }
    }

    if target > current {
        Direction::Right
    } else {
        Direction::Left
    }
}

pub fn clamp(index: usize, count: usize) -> usize {
    index.min(count.saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_and_prev_wrap() {
        assert_eq!(next(4, 5), 0);
        assert_eq!(next(0, 5), 1);
        assert_eq!(prev(0, 5), 4);
        assert_eq!(prev(3, 5), 2);
    }

    #[test]
    fn next_and_prev_are_inverses() {
        for count in 1..=9 {
            for i in 0..count {
                assert_eq!(prev(next(i, count), count), i, "count={count} i={i}");
                assert_eq!(next(prev(i, count), count), i, "count={count} i={i}");
            }
        }
    }

    #[test]
    fn empty_list_never_panics() {
        assert_eq!(next(0, 0), 0);
        assert_eq!(prev(0, 0), 0);
        assert_eq!(clamp(7, 0), 0);
    }

    #[test]
    fn direct_jumps_compare_indices() {
        assert_eq!(direction_to(1, 3, 5), Direction::Right);
        assert_eq!(direction_to(3, 1, 5), Direction::Left);
        assert_eq!(direction_to(0, 3, 5), Direction::Right);
    }

    #[test]
    fn wraparound_jumps_read_as_adjacent_steps() {
        assert_eq!(direction_to(4, 0, 5), Direction::Right);
        assert_eq!(direction_to(0, 4, 5), Direction::Left);
    }

    #[test]
    fn two_items_use_plain_comparison() {
        assert_eq!(direction_to(0, 1, 2), Direction::Right);
        assert_eq!(direction_to(1, 0, 2), Direction::Left);
    }

    #[test]
    fn clamp_keeps_index_in_range() {
        assert_eq!(clamp(2, 5), 2);
        assert_eq!(clamp(5, 5), 4);
        assert_eq!(clamp(9, 3), 2);
    }

    #[test]
    fn direction_parses_case_insensitively() {
        assert_eq!("LEFT".parse::<Direction>().unwrap(), Direction::Left);
        assert_eq!(Direction::Right.to_string(), "right");
        let parsed: Direction = serde_json::from_str("\"left\"").unwrap();
        assert_eq!(parsed, Direction::Left);
    }
}
