pub mod autoplay;
pub mod controller;
pub mod error;
pub mod index;
pub mod pagination;
pub mod phase;

pub use autoplay::{AutoplayConfig, AutoplayScheduler};
pub use controller::{
    CarouselController, CarouselSnapshot, IgnoreReason, Navigation, NavigationRequest, Origin,
    TickResult,
};
pub use error::TimingError;
pub use index::Direction;
pub use pagination::{PageMarker, compute_window};
pub use phase::{
    DEFAULT_FRAME_COMMITS, DEFAULT_PHASE_DURATION_MS, Phase, PhaseMachine, SlideOffset,
    TransitionTiming,
};
