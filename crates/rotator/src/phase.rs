use crate::error::TimingError;
use crate::index::Direction;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

pub const DEFAULT_PHASE_DURATION_MS: u64 = 500;
pub const DEFAULT_FRAME_COMMITS: u8 = 2;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumString, Display,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    #[default]
    Idle,
    SlideOut,
    Reposition,
    SlideIn,
}

impl Phase {
    pub fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Where the content sits relative to its resting place.
///
/// `Leading` is the edge content travels toward when moving right, so a
/// rightward transition exits to `Leading` and re-enters from `Trailing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SlideOffset {
    Centered,
    Leading,
    Trailing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionTiming {
    phase_duration_ms: u64,
    frame_commits: u8,
}

impl TransitionTiming {
    pub fn new(phase_duration_ms: u64) -> Result<Self, TimingError> {
        Self::with_frame_commits(phase_duration_ms, DEFAULT_FRAME_COMMITS)
    }

    pub fn with_frame_commits(phase_duration_ms: u64, frame_commits: u8) -> Result<Self, TimingError> {
        if phase_duration_ms == 0 {
            return Err(TimingError::ZeroPhaseDuration);
        }
        if frame_commits == 0 {
            return Err(TimingError::ZeroFrameCommits);
        }
        Ok(Self {
            phase_duration_ms,
            frame_commits,
        })
    }

    pub fn phase_duration_ms(&self) -> u64 {
        self.phase_duration_ms
    }

    pub fn frame_commits(&self) -> u8 {
        self.frame_commits
    }

    /// Wall-clock length of one transition, excluding frame commits.
    pub fn transition_ms(&self) -> u64 {
        self.phase_duration_ms * 2
    }
}

impl Default for TransitionTiming {
    fn default() -> Self {
        Self {
            phase_duration_ms: DEFAULT_PHASE_DURATION_MS,
            frame_commits: DEFAULT_FRAME_COMMITS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEvent {
    /// Slide-out finished; the rendered item must now become `target`.
    Swap { target: usize },
    /// Reposition was committed and slide-in started.
    Entered,
    /// Slide-in finished; the machine is idle again.
    Settled,
}

#[derive(Debug, Clone)]
pub struct PhaseMachine {
    timing: TransitionTiming,
    phase: Phase,
    direction: Direction,
    target: Option<usize>,
    deadline: Option<u64>,
    frames_remaining: u8,
}

impl PhaseMachine {
    pub fn new(timing: TransitionTiming) -> Self {
        Self {
            timing,
            phase: Phase::Idle,
            direction: Direction::default(),
            target: None,
            deadline: None,
            frames_remaining: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn timing(&self) -> TransitionTiming {
        self.timing
    }

    /// Target of the in-flight transition, until it has been swapped in.
    pub fn pending_target(&self) -> Option<usize> {
        self.target
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.deadline
    }

    pub fn awaiting_frames(&self) -> bool {
        self.phase == Phase::Reposition && self.frames_remaining > 0
    }

    /// Starts a transition toward `target`. Dropped unless idle.
    pub fn begin(&mut self, target: usize, direction: Direction, now_ms: u64) -> bool {
        if !self.phase.is_idle() {
            return false;
        }
        self.phase = Phase::SlideOut;
        self.direction = direction;
        self.target = Some(target);
        self.deadline = Some(now_ms + self.timing.phase_duration_ms);
        true
    }

    /// Applies the phase deadline if it has passed.
    pub fn advance(&mut self, now_ms: u64) -> Option<PhaseEvent> {
        let deadline = self.deadline?;
        if now_ms < deadline {
            return None;
        }

        match self.phase {
            Phase::SlideOut => {
                self.phase = Phase::Reposition;
                self.deadline = None;
                self.frames_remaining = self.timing.frame_commits;
                self.target.take().map(|target| PhaseEvent::Swap { target })
            }
            Phase::SlideIn => {
                self.phase = Phase::Idle;
                self.deadline = None;
                Some(PhaseEvent::Settled)
            }
            Phase::Idle | Phase::Reposition => {
                self.deadline = None;
                None
            }
        }
    }

    /// Records one committed frame. The last required commit starts slide-in.
    pub fn commit_frame(&mut self, now_ms: u64) -> Option<PhaseEvent> {
        if !self.awaiting_frames() {
            return None;
        }
        self.frames_remaining -= 1;
        if self.frames_remaining > 0 {
            return None;
        }
        self.phase = Phase::SlideIn;
        self.deadline = Some(now_ms + self.timing.phase_duration_ms);
        Some(PhaseEvent::Entered)
    }

    pub fn cancel(&mut self) {
        self.phase = Phase::Idle;
        self.target = None;
        self.deadline = None;
        self.frames_remaining = 0;
    }

    pub fn offset(&self) -> SlideOffset {
        let exit = match self.direction {
            Direction::Right => SlideOffset::Leading,
            Direction::Left => SlideOffset::Trailing,
        };
        match self.phase {
            Phase::Idle | Phase::SlideIn => SlideOffset::Centered,
            Phase::SlideOut => exit,
            Phase::Reposition => match exit {
                SlideOffset::Leading => SlideOffset::Trailing,
                _ => SlideOffset::Leading,
            },
        }
    }

    /// Content is hidden while it is off-center or about to be swapped.
    pub fn is_content_visible(&self) -> bool {
        matches!(self.phase, Phase::Idle | Phase::SlideIn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine() -> PhaseMachine {
        PhaseMachine::new(TransitionTiming::default())
    }

    #[test]
    fn runs_through_all_phases() {
        let mut m = machine();
        assert!(m.begin(3, Direction::Right, 0));
        assert_eq!(m.phase(), Phase::SlideOut);
        assert_eq!(m.pending_target(), Some(3));

        assert_eq!(m.advance(499), None);
        assert_eq!(m.advance(500), Some(PhaseEvent::Swap { target: 3 }));
        assert_eq!(m.phase(), Phase::Reposition);
        assert_eq!(m.next_deadline(), None);

        assert_eq!(m.commit_frame(510), None);
        assert_eq!(m.phase(), Phase::Reposition);
        assert_eq!(m.commit_frame(520), Some(PhaseEvent::Entered));
        assert_eq!(m.phase(), Phase::SlideIn);
        assert_eq!(m.next_deadline(), Some(1020));

        assert_eq!(m.advance(1020), Some(PhaseEvent::Settled));
        assert!(m.phase().is_idle());
    }

    #[test]
    fn reposition_waits_for_frames_regardless_of_time() {
        let mut m = machine();
        m.begin(1, Direction::Left, 0);
        m.advance(500);
        assert_eq!(m.advance(10_000), None);
        assert_eq!(m.phase(), Phase::Reposition);
    }

    #[test]
    fn begin_is_dropped_while_busy() {
        let mut m = machine();
        assert!(m.begin(1, Direction::Right, 0));
        assert!(!m.begin(2, Direction::Left, 10));
        assert_eq!(m.pending_target(), Some(1));
        assert_eq!(m.direction(), Direction::Right);
    }

    #[test]
    fn reposition_enters_from_opposite_side() {
        let mut m = machine();
        m.begin(1, Direction::Right, 0);
        assert_eq!(m.offset(), SlideOffset::Leading);
        m.advance(500);
        assert_eq!(m.offset(), SlideOffset::Trailing);
        assert!(!m.is_content_visible());

        let mut m = machine();
        m.begin(1, Direction::Left, 0);
        assert_eq!(m.offset(), SlideOffset::Trailing);
        m.advance(500);
        assert_eq!(m.offset(), SlideOffset::Leading);
    }

    #[test]
    fn cancel_clears_deadlines() {
        let mut m = machine();
        m.begin(1, Direction::Right, 0);
        m.cancel();
        assert!(m.phase().is_idle());
        assert_eq!(m.next_deadline(), None);
        assert_eq!(m.advance(600), None);
    }

    #[test]
    fn timing_rejects_zero_values() {
        assert_eq!(TransitionTiming::new(0), Err(TimingError::ZeroPhaseDuration));
        assert_eq!(
            TransitionTiming::with_frame_commits(500, 0),
            Err(TimingError::ZeroFrameCommits)
        );
        assert_eq!(TransitionTiming::new(600).unwrap().transition_ms(), 1200);
    }

    #[test]
    fn phase_names_are_kebab_case() {
        assert_eq!(Phase::SlideOut.to_string(), "slide-out");
        assert_eq!("slide-in".parse::<Phase>().unwrap(), Phase::SlideIn);
    }
}
