use crate::autoplay::{AutoplayConfig, AutoplayScheduler};
use crate::index::{self, Direction};
use crate::phase::{Phase, PhaseEvent, PhaseMachine, SlideOffset, TransitionTiming};
use log::debug;
use serde::Serialize;
use strum::Display;
use tokio::sync::watch;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TickResult {
    NoRender,
    RenderRequested,
}

impl TickResult {
    fn from_changed(changed: bool) -> Self {
        if changed {
            Self::RenderRequested
        } else {
            Self::NoRender
        }
    }

    pub fn merge(self, other: Self) -> Self {
        Self::from_changed(self == Self::RenderRequested || other == Self::RenderRequested)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Manual,
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationRequest {
    pub target_index: usize,
    pub direction: Direction,
    pub origin: Origin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum IgnoreReason {
    Disposed,
    Inert,
    Busy,
    AlreadyCurrent,
    OutOfRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Started(NavigationRequest),
    Ignored(IgnoreReason),
}

impl Navigation {
    pub fn is_started(&self) -> bool {
        matches!(self, Self::Started(_))
    }
}

/// Read-only view of a controller, published on every state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CarouselSnapshot {
    pub current_index: usize,
    pub item_count: usize,
    pub direction: Direction,
    pub phase: Phase,
    pub offset: SlideOffset,
    pub pending_target: Option<usize>,
    pub disposed: bool,
}

impl CarouselSnapshot {
    pub fn is_animating(&self) -> bool {
        !self.phase.is_idle()
    }

    pub fn is_content_visible(&self) -> bool {
        matches!(self.phase, Phase::Idle | Phase::SlideIn)
    }
}

#[derive(Debug)]
pub struct CarouselController {
    current_index: usize,
    item_count: usize,
    machine: PhaseMachine,
    autoplay: AutoplayScheduler,
    disposed: bool,
    observers: watch::Sender<CarouselSnapshot>,
}

impl CarouselController {
    pub fn initialize(
        item_count: usize,
        autoplay: AutoplayConfig,
        timing: TransitionTiming,
        now_ms: u64,
    ) -> Self {
        let machine = PhaseMachine::new(timing);
        let (observers, _) = watch::channel(CarouselSnapshot {
            current_index: 0,
            item_count,
            direction: machine.direction(),
            phase: machine.phase(),
            offset: machine.offset(),
            pending_target: None,
            disposed: false,
        });

        let mut controller = Self {
            current_index: 0,
            item_count,
            machine,
            autoplay: AutoplayScheduler::new(autoplay),
            disposed: false,
            observers,
        };
        controller
            .autoplay
            .set_applicable(controller.can_rotate(), now_ms);
        controller
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn phase(&self) -> Phase {
        self.machine.phase()
    }

    pub fn direction(&self) -> Direction {
        self.machine.direction()
    }

    pub fn is_animating(&self) -> bool {
        !self.machine.phase().is_idle()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn timing(&self) -> TransitionTiming {
        self.machine.timing()
    }

    pub fn autoplay_config(&self) -> AutoplayConfig {
        self.autoplay.config()
    }

    pub fn is_autoplaying(&self) -> bool {
        self.autoplay.is_running()
    }

    /// True while the reposition phase is waiting for rendered frames.
    pub fn awaiting_frames(&self) -> bool {
        self.machine.awaiting_frames()
    }

    pub fn snapshot(&self) -> CarouselSnapshot {
        CarouselSnapshot {
            current_index: self.current_index,
            item_count: self.item_count,
            direction: self.machine.direction(),
            phase: self.machine.phase(),
            offset: self.machine.offset(),
            pending_target: self.machine.pending_target(),
            disposed: self.disposed,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<CarouselSnapshot> {
        self.observers.subscribe()
    }

    /// Earliest armed deadline, phase or autoplay.
    pub fn next_deadline(&self) -> Option<u64> {
        match (self.machine.next_deadline(), self.autoplay.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn can_rotate(&self) -> bool {
        self.item_count > 1
    }

    pub fn next(&mut self, now_ms: u64) -> Navigation {
        self.step(Direction::Right, Origin::Manual, now_ms)
    }

    pub fn prev(&mut self, now_ms: u64) -> Navigation {
        self.step(Direction::Left, Origin::Manual, now_ms)
    }

    fn step(&mut self, direction: Direction, origin: Origin, now_ms: u64) -> Navigation {
        let target_index = match direction {
            Direction::Right => index::next(self.current_index, self.item_count),
            Direction::Left => index::prev(self.current_index, self.item_count),
        };
        self.navigate(
            NavigationRequest {
                target_index,
                direction,
                origin,
            },
            now_ms,
        )
    }

    pub fn go_to(&mut self, target_index: usize, now_ms: u64) -> Navigation {
        if !self.disposed && self.can_rotate() {
            if target_index >= self.item_count {
                return self.ignore(IgnoreReason::OutOfRange, Origin::Manual);
            }
            if target_index == self.current_index {
                return self.ignore(IgnoreReason::AlreadyCurrent, Origin::Manual);
            }
        }

        let direction = index::direction_to(self.current_index, target_index, self.item_count);
        self.navigate(
            NavigationRequest {
                target_index,
                direction,
                origin: Origin::Manual,
            },
            now_ms,
        )
    }

    fn navigate(&mut self, request: NavigationRequest, now_ms: u64) -> Navigation {
        if self.disposed {
            return self.ignore(IgnoreReason::Disposed, request.origin);
        }
        if !self.can_rotate() {
            return self.ignore(IgnoreReason::Inert, request.origin);
        }
        if !self
            .machine
            .begin(request.target_index, request.direction, now_ms)
        {
            return self.ignore(IgnoreReason::Busy, request.origin);
        }

        debug!(
            "carousel: begin {} transition {} -> {} ({})",
            request.origin, self.current_index, request.target_index, request.direction
        );
        if request.origin == Origin::Manual {
            self.autoplay.restart(now_ms);
        }
        self.publish();
        Navigation::Started(request)
    }

    fn ignore(&self, reason: IgnoreReason, origin: Origin) -> Navigation {
        debug!("carousel: {} request ignored: {}", origin, reason);
        Navigation::Ignored(reason)
    }

    /// Fires every phase deadline at or before `now_ms`, then autoplay once.
    /// Missed autoplay ticks collapse into a single tick at `now_ms`.
    pub fn advance(&mut self, now_ms: u64) -> TickResult {
        if self.disposed {
            return TickResult::NoRender;
        }

        let mut changed = false;
        while let Some(due) = self.machine.next_deadline().filter(|&d| d <= now_ms) {
            changed |= self.fire_phase(due);
        }
        if self.autoplay.poll(now_ms) {
            changed |= self
                .step(Direction::Right, Origin::Auto, now_ms)
                .is_started();
        }

        if changed {
            self.publish();
        }
        TickResult::from_changed(changed)
    }

    fn fire_phase(&mut self, at_ms: u64) -> bool {
        match self.machine.advance(at_ms) {
            Some(PhaseEvent::Swap { target }) => {
                debug!("carousel: swap {} -> {}", self.current_index, target);
                self.current_index = target;
                true
            }
            Some(event) => {
                debug!("carousel: {:?}", event);
                true
            }
            None => false,
        }
    }

    /// Reports that the current state has been rendered once.
    pub fn commit_frame(&mut self, now_ms: u64) -> TickResult {
        if self.disposed {
            return TickResult::NoRender;
        }
        let entered = self.machine.commit_frame(now_ms).is_some();
        if entered {
            self.publish();
        }
        TickResult::from_changed(entered)
    }

    /// Applies a refetched list length. An in-flight transition survives unless
    /// its target or the current index falls off the end.
    pub fn on_item_count_change(&mut self, item_count: usize, now_ms: u64) -> TickResult {
        if self.disposed || item_count == self.item_count {
            return TickResult::NoRender;
        }

        debug!(
            "carousel: item count {} -> {} (index {})",
            self.item_count, item_count, self.current_index
        );
        let target_gone = self
            .machine
            .pending_target()
            .is_some_and(|target| target >= item_count);
        if target_gone || self.current_index >= item_count {
            self.machine.cancel();
        }
        self.item_count = item_count;
        self.current_index = index::clamp(self.current_index, item_count);
        self.autoplay.set_applicable(self.can_rotate(), now_ms);
        self.publish();
        TickResult::RenderRequested
    }

    /// Cancels every deadline. Further calls are no-ops.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.autoplay.stop();
        self.machine.cancel();
        self.disposed = true;
        self.publish();
    }

    fn publish(&self) {
        self.observers.send_replace(self.snapshot());
    }
}

impl Drop for CarouselController {
    fn drop(&mut self) {
        self.dispose();
    }
}
