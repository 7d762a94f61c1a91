use crate::config::CarouselName;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Next,
    Prev,
    GoTo(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Navigate(CarouselName, Action),
    ConfigReload,
    Shutdown,
}
