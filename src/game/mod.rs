pub mod autoplay;
pub mod chart;
pub mod clock;
pub mod gameplay;
pub mod judgment;
pub mod note;
pub mod parsing;
pub mod scores;
pub mod song;
pub mod stage_stats;
pub mod timing_stats;
pub mod timing_windows;
