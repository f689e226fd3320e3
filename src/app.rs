use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, error, info, warn};

use crate::config::Config;
use crate::core::input::{InputQueue, LaneSet, LaneState};
use crate::game::autoplay::Autoplay;
use crate::game::gameplay::{self, Session};
use crate::game::parsing::{LoadError, notes, songs};
use crate::game::song::{SongCatalog, SongEntry};
use crate::game::stage_stats::StageSummary;
use crate::game::timing_windows::TimingProfile;
use crate::screens::gameplay::{Frame, LogSink, PresentationSink};
use crate::screens::{Screen, ScreenAction};

/// Screen flow plus the one live session. Owns the input queue and lane state
/// so a song change can reset them together with the session.
pub struct AppState {
    current_screen: Screen,
    catalog: SongCatalog,
    notes_dir: PathBuf,
    timing: TimingProfile,
    session: Option<Session>,
    input: InputQueue,
    lanes: LaneState,
    last_summary: Option<StageSummary>,
}

impl AppState {
    pub fn new(catalog: SongCatalog, config: &Config) -> Self {
        let lane_set: LaneSet = config.lanes();
        Self {
            current_screen: Screen::Selection,
            catalog,
            notes_dir: config.notes_dir.clone(),
            timing: config.timing(),
            session: None,
            input: InputQueue::new(),
            lanes: LaneState::new(lane_set),
            last_summary: None,
        }
    }

    pub const fn current_screen(&self) -> Screen {
        self.current_screen
    }

    pub const fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn input_queue_mut(&mut self) -> &mut InputQueue {
        &mut self.input
    }

    pub const fn last_summary(&self) -> Option<&StageSummary> {
        self.last_summary.as_ref()
    }

    /// Handles "song N selected". The chart is loaded before anything is
    /// touched, so a failed load leaves the app exactly as it was.
    pub fn select_song(&mut self, number: usize, now: Instant) -> Result<Arc<SongEntry>, LoadError> {
        let loaded = self.catalog.get(number).and_then(|song| {
            let chart = notes::load_chart(&self.notes_dir, song.id, self.lanes.lanes())?;
            Ok((song, chart))
        });
        let (song, chart) = match loaded {
            Ok(v) => v,
            Err(e) => {
                error!("Cannot start song {number}: {e}");
                return Err(e);
            }
        };

        self.input.clear();
        self.lanes.release_all();
        self.last_summary = None;
        self.session = Some(Session::new(
            Arc::clone(&song),
            Arc::new(chart),
            self.timing,
            now,
        ));
        self.current_screen = Screen::Gameplay;
        match &song.poster_path {
            Some(path) => debug!("Poster: '{}'", path.display()),
            None => debug!("No poster for '{}'.", song.title),
        }
        Ok(song)
    }

    pub fn return_to_selection(&mut self) {
        if let Some(session) = self.session.take() {
            info!("Leaving '{}' at note {}.", session.song.title, session.cursor());
        }
        self.input.clear();
        self.lanes.release_all();
        self.current_screen = Screen::Selection;
    }

    /// One tick of the current screen.
    pub fn tick(&mut self, now: Instant, sink: &mut dyn PresentationSink) -> ScreenAction {
        let Some(session) = self.session.as_mut().filter(|_| self.current_screen == Screen::Gameplay)
        else {
            // Nothing consumes lane input off the gameplay screen.
            self.input.clear();
            return ScreenAction::None;
        };

        if !self.input.is_empty()
            && let Err(e) = self.input.process_input_edges(&mut self.lanes)
        {
            warn!("Dropped input edge: {e}");
        }

        let report = gameplay::update(session, now, &self.lanes);
        sink.frame(&Frame::new(session, &report, self.lanes.lanes(), now));

        if session.is_finished() {
            ScreenAction::FinishStage(Box::new(StageSummary::from_session(session)))
        } else {
            ScreenAction::None
        }
    }

    pub fn handle_action(
        &mut self,
        action: ScreenAction,
        now: Instant,
        sink: &mut dyn PresentationSink,
    ) -> Result<(), LoadError> {
        match action {
            ScreenAction::None => {}
            ScreenAction::SelectSong(number) => {
                self.select_song(number, now)?;
                sink.screen_changed(self.current_screen);
            }
            ScreenAction::Navigate(Screen::Selection) => {
                self.return_to_selection();
                sink.screen_changed(self.current_screen);
            }
            ScreenAction::Navigate(screen) => {
                warn!("Ignoring navigation to {} without a song.", screen.as_str());
            }
            ScreenAction::FinishStage(summary) => {
                sink.stage_finished(&summary);
                self.last_summary = Some(*summary);
                self.current_screen = Screen::Evaluation;
                sink.screen_changed(self.current_screen);
            }
        }
        Ok(())
    }
}

/// Headless main loop: selects the configured song, autoplays it at the
/// configured tick rate and logs the stage summary.
pub fn run(config: &Config) -> Result<(), Box<dyn Error>> {
    let catalog = songs::load_catalog(&config.songs_file, &config.posters_dir)?;
    let mut state = AppState::new(catalog, config);
    let mut sink = LogSink::new();

    if config.auto_select_song == 0 {
        info!("AutoSelectSong is 0; nothing to play.");
        return Ok(());
    }
    state.handle_action(
        ScreenAction::SelectSong(config.auto_select_song),
        Instant::now(),
        &mut sink,
    )?;

    let mut autoplay = state
        .session()
        .map(|s| Autoplay::new(&s.chart, &s.timing));
    let tick = Duration::from_secs_f64(1.0 / f64::from(config.tick_rate_hz.max(1)));
    let mut next_tick = Instant::now();

    while state.current_screen() == Screen::Gameplay {
        let now = Instant::now();
        if let Some(ap) = autoplay.as_mut().filter(|ap| !ap.is_done())
            && let Some(elapsed) = state.session().map(|s| s.clock().elapsed(now))
        {
            ap.poll(elapsed, state.input_queue_mut());
        }

        let action = state.tick(now, &mut sink);
        state.handle_action(action, now, &mut sink)?;

        next_tick += tick;
        match next_tick.checked_duration_since(Instant::now()) {
            Some(wait) => thread::sleep(wait),
            // Fell behind; don't try to catch up with a burst of ticks.
            None => next_tick = Instant::now(),
        }
    }

    if let Some(summary) = state.last_summary() {
        info!(
            "Finished '{}' with {} points.",
            summary.song.title, summary.score
        );
    }
    state.handle_action(
        ScreenAction::Navigate(Screen::Selection),
        Instant::now(),
        &mut sink,
    )?;
    Ok(())
}
