use crate::config::{self, CarouselConfig, CarouselName, Config};
use crate::events::{Action, AppEvent};
use crate::stage::board::{BoardEntry, SnapshotBoard};
use crate::stage::view;
use rotator::{CarouselController, Navigation, TickResult};
use std::collections::{BTreeMap, HashSet};
use std::io::{self, Write};

struct Hosted {
    config: CarouselConfig,
    controller: CarouselController,
    dirty: bool,
}

impl Hosted {
    fn entry(&self) -> BoardEntry {
        let snapshot = self.controller.snapshot();
        BoardEntry {
            snapshot,
            title: self.config.items.get(snapshot.current_index).cloned(),
        }
    }
}

/// Every mounted carousel. Owned by a single task, so no locking.
pub struct Stage {
    carousels: BTreeMap<CarouselName, Hosted>,
    board: SnapshotBoard,
}

impl Stage {
    pub fn new(config: &Config, board: SnapshotBoard, now_ms: u64) -> Self {
        let mut stage = Self {
            carousels: BTreeMap::new(),
            board,
        };
        for carousel in &config.carousels {
            stage.mount(carousel.clone(), now_ms);
        }
        stage
    }

    pub fn names(&self) -> impl Iterator<Item = &CarouselName> {
        self.carousels.keys()
    }

    pub fn entry(&self, name: &CarouselName) -> Option<BoardEntry> {
        self.carousels.get(name).map(Hosted::entry)
    }

    fn mount(&mut self, config: CarouselConfig, now_ms: u64) {
        let (timing, autoplay) = match (config.timing(), config.autoplay()) {
            (Ok(timing), Ok(autoplay)) => (timing, autoplay),
            (Err(e), _) | (_, Err(e)) => {
                log::error!("Skipping carousel '{}': {}", config.name, e);
                return;
            }
        };

        let controller =
            CarouselController::initialize(config.items.len(), autoplay, timing, now_ms);
        log::info!(
            "Mounted carousel '{}' ({} items, {}ms slides, autoplay {})",
            config.name,
            config.items.len(),
            timing.phase_duration_ms(),
            if controller.is_autoplaying() {
                format!("every {}ms", autoplay.interval_ms)
            } else {
                "off".to_string()
            }
        );
        self.carousels.insert(
            config.name.clone(),
            Hosted {
                config,
                controller,
                dirty: true,
            },
        );
    }

    fn unmount(&mut self, name: &CarouselName) {
        if let Some(mut hosted) = self.carousels.remove(name) {
            hosted.controller.dispose();
            self.board.remove(name);
            log::info!("Unmounted carousel '{}'", name);
        }
    }

    pub fn handle(&mut self, event: AppEvent, now_ms: u64) {
        match event {
            AppEvent::Navigate(name, action) => {
                self.navigate(&name, action, now_ms);
            }
            AppEvent::ConfigReload => match config::load_config() {
                Ok(new_config) => {
                    self.reload(&new_config, now_ms);
                    log::info!("Configuration reloaded");
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
            AppEvent::Shutdown => self.dispose_all(),
        }
    }

    pub fn navigate(
        &mut self,
        name: &CarouselName,
        action: Action,
        now_ms: u64,
    ) -> Option<Navigation> {
        let Some(hosted) = self.carousels.get_mut(name) else {
            log::warn!("Unknown carousel '{}'", name);
            return None;
        };

        let controller = &mut hosted.controller;
        let navigation = match action {
            Action::Next => controller.next(now_ms),
            Action::Prev => controller.prev(now_ms),
            Action::GoTo(index) => controller.go_to(index, now_ms),
        };
        if navigation.is_started() {
            hosted.dirty = true;
        }
        Some(navigation)
    }

    /// Applies a new configuration without disturbing unchanged carousels.
    pub fn reload(&mut self, config: &Config, now_ms: u64) {
        let wanted: HashSet<&CarouselName> = config.carousels.iter().map(|c| &c.name).collect();
        let stale: Vec<CarouselName> = self
            .carousels
            .keys()
            .filter(|name| !wanted.contains(name))
            .cloned()
            .collect();
        for name in &stale {
            self.unmount(name);
        }

        for carousel in &config.carousels {
            let remount = match self.carousels.get_mut(&carousel.name) {
                None => true,
                Some(hosted) if hosted.config.timing_differs(carousel) => true,
                Some(hosted) => {
                    hosted
                        .controller
                        .on_item_count_change(carousel.items.len(), now_ms);
                    hosted.config = carousel.clone();
                    hosted.dirty = true;
                    false
                }
            };
            if remount {
                self.unmount(&carousel.name);
                self.mount(carousel.clone(), now_ms);
            }
        }
    }

    pub fn advance(&mut self, now_ms: u64) -> TickResult {
        self.carousels
            .values_mut()
            .fold(TickResult::NoRender, |result, hosted| {
                let tick = hosted.controller.advance(now_ms);
                if tick == TickResult::RenderRequested {
                    hosted.dirty = true;
                }
                result.merge(tick)
            })
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.carousels
            .values()
            .filter_map(|hosted| hosted.controller.next_deadline())
            .min()
    }

    /// Renders every changed carousel, committing one frame per render until
    /// nothing is left to draw.
    pub fn render_pending<W: Write>(&mut self, now_ms: u64, out: &mut W) -> io::Result<()> {
        loop {
            let mut rendered = false;
            for (name, hosted) in self.carousels.iter_mut().filter(|(_, h)| h.dirty) {
                let entry = hosted.entry();
                writeln!(out, "{}", view::render_line(name, &entry))?;
                self.board.publish(name, entry);
                rendered = true;

                let tick = hosted.controller.commit_frame(now_ms);
                hosted.dirty =
                    tick == TickResult::RenderRequested || hosted.controller.awaiting_frames();
            }
            if !rendered {
                return out.flush();
            }
        }
    }

    pub fn dispose_all(&mut self) {
        for (name, hosted) in self.carousels.iter_mut() {
            hosted.controller.dispose();
            hosted.dirty = false;
            self.board.publish(name, hosted.entry());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rotator::{IgnoreReason, Phase};

    fn config(toml: &str) -> Config {
        config::parse_config(toml).unwrap()
    }

    fn hero(items: usize) -> String {
        let items: Vec<String> = (0..items).map(|i| format!("\"item {i}\"")).collect();
        format!(
            "[[carousels]]\nname = \"hero\"\ninterval_ms = 5000\nitems = [{}]\n",
            items.join(", ")
        )
    }

    fn settle(stage: &mut Stage, now: &mut u64, out: &mut Vec<u8>) {
        stage.render_pending(*now, out).unwrap();
        while let Some(deadline) = stage.next_deadline().filter(|&d| d <= *now + 1_000) {
            *now = deadline;
            stage.advance(*now);
            stage.render_pending(*now, out).unwrap();
        }
    }

    #[test]
    fn render_commits_frames_through_reposition() {
        let board = SnapshotBoard::default();
        let mut stage = Stage::new(&config(&hero(3)), board.clone(), 0);
        let name = CarouselName::from("hero");
        let mut out = Vec::new();
        let mut now = 0;

        stage.navigate(&name, Action::Next, now);
        settle(&mut stage, &mut now, &mut out);

        let entry = board.get(&name).unwrap();
        assert_eq!(entry.snapshot.current_index, 1);
        assert_eq!(entry.snapshot.phase, Phase::Idle);
        assert_eq!(entry.title.as_deref(), Some("item 1"));

        let text = String::from_utf8(out).unwrap();
        for phase in ["slide-out", "reposition", "slide-in"] {
            assert!(text.contains(phase), "missing {phase} in:\n{text}");
        }
        assert_eq!(text.matches("reposition").count(), 2);
    }

    #[test]
    fn unknown_carousel_is_ignored() {
        let mut stage = Stage::new(&config(&hero(3)), SnapshotBoard::default(), 0);
        assert_eq!(stage.navigate(&"nope".into(), Action::Next, 0), None);
    }

    #[test]
    fn out_of_range_goto_reports_reason() {
        let mut stage = Stage::new(&config(&hero(3)), SnapshotBoard::default(), 0);
        assert_eq!(
            stage.navigate(&"hero".into(), Action::GoTo(9), 0),
            Some(Navigation::Ignored(IgnoreReason::OutOfRange))
        );
    }

    #[test]
    fn reload_clamps_and_adds_and_removes() {
        let board = SnapshotBoard::default();
        let mut stage = Stage::new(&config(&hero(5)), board.clone(), 0);
        let hero_name = CarouselName::from("hero");
        let mut out = Vec::new();
        let mut now = 0;

        stage.navigate(&hero_name, Action::GoTo(4), now);
        settle(&mut stage, &mut now, &mut out);

        let quotes = "[[carousels]]\nname = \"quotes\"\nitems = [\"q\"]\n";
        stage.reload(&config(&format!("{}{}", hero(2), quotes)), now);
        stage.render_pending(now, &mut out).unwrap();

        assert_eq!(board.get(&hero_name).unwrap().snapshot.current_index, 1);
        assert_eq!(board.get(&hero_name).unwrap().snapshot.item_count, 2);
        assert!(board.get(&"quotes".into()).is_some());

        stage.reload(&config(quotes), now);
        assert!(board.get(&hero_name).is_none());
        assert_eq!(stage.names().count(), 1);
    }

    #[test]
    fn reload_with_new_timing_remounts() {
        let mut stage = Stage::new(&config(&hero(3)), SnapshotBoard::default(), 0);
        let name = CarouselName::from("hero");
        let mut out = Vec::new();
        let mut now = 0;
        stage.navigate(&name, Action::Next, now);
        settle(&mut stage, &mut now, &mut out);

        let slower = hero(3).replace("interval_ms = 5000", "interval_ms = 9000");
        stage.reload(&config(&slower), now);
        let entry = stage.entry(&name).unwrap();
        assert_eq!(entry.snapshot.current_index, 0);
        assert_eq!(stage.next_deadline(), Some(now + 9_000));
    }

    #[test]
    fn dispose_all_stops_every_timer() {
        let board = SnapshotBoard::default();
        let mut stage = Stage::new(&config(&hero(3)), board.clone(), 0);
        stage.navigate(&"hero".into(), Action::Next, 0);
        stage.dispose_all();

        assert_eq!(stage.next_deadline(), None);
        assert!(board.get(&"hero".into()).unwrap().snapshot.disposed);
        assert_eq!(
            stage.navigate(&"hero".into(), Action::Next, 10),
            Some(Navigation::Ignored(IgnoreReason::Disposed))
        );
    }
}
