use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimingError {
    #[error("phase duration must be greater than zero")]
    ZeroPhaseDuration,
    #[error("at least one frame commit is required before sliding in")]
    ZeroFrameCommits,
    #[error("autoplay interval must be greater than zero")]
    ZeroInterval,
}
