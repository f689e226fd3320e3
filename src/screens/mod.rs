pub mod evaluation;
pub mod gameplay;

use crate::game::stage_stats::StageSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Selection,
    Gameplay,
    Evaluation,
}

impl Screen {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Selection => "Selection",
            Self::Gameplay => "Gameplay",
            Self::Evaluation => "Evaluation",
        }
    }
}

/// What a tick asks the controller to do next.
#[derive(Debug, Clone)]
pub enum ScreenAction {
    None,
    Navigate(Screen),
    /// "Song N selected", 1-based.
    SelectSong(usize),
    FinishStage(Box<StageSummary>),
}
