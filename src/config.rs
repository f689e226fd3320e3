use std::path::{Path, PathBuf};
use std::str::FromStr;

use ini::Ini;
use log::{info, warn};

use crate::core::input::{LaneSet, MAX_LANES};
use crate::game::timing_windows::{
    DEFAULT_COUNTDOWN_S, DEFAULT_HOLD_DURATION_S, DEFAULT_HOLD_SCORE, DEFAULT_TAP_SCORE,
    DEFAULT_TAP_WINDOW_S, TimingProfile,
};

pub const CONFIG_PATH: &str = "laneclock.ini";

const OPTIONS: &str = "Options";
const JUDGE: &str = "Judge";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::Error => "Error",
            Self::Warn => "Warn",
            Self::Info => "Info",
            Self::Debug => "Debug",
            Self::Trace => "Trace",
        }
    }

    pub const fn as_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Off => log::LevelFilter::Off,
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" | "none" => Ok(Self::Off),
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            other => Err(format!("'{other}' is not a valid LogLevel setting")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    // [Options]
    pub log_level: LogLevel,
    pub tick_rate_hz: u32,
    /// Song number selected on startup; 0 leaves the app on selection.
    pub auto_select_song: usize,
    pub songs_file: PathBuf,
    pub posters_dir: PathBuf,
    pub notes_dir: PathBuf,
    // [Judge]
    pub lane_count: u8,
    pub tap_window_s: f32,
    pub hold_duration_s: f32,
    pub countdown_s: f32,
    pub tap_score: u32,
    pub hold_score: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            tick_rate_hz: 60,
            auto_select_song: 1,
            songs_file: PathBuf::from("songs.txt"),
            posters_dir: PathBuf::from("posters"),
            notes_dir: PathBuf::from("notes"),
            lane_count: 4,
            tap_window_s: DEFAULT_TAP_WINDOW_S,
            hold_duration_s: DEFAULT_HOLD_DURATION_S,
            countdown_s: DEFAULT_COUNTDOWN_S,
            tap_score: DEFAULT_TAP_SCORE,
            hold_score: DEFAULT_HOLD_SCORE,
        }
    }
}

impl Config {
    #[inline(always)]
    pub fn lanes(&self) -> LaneSet {
        LaneSet::new(self.lane_count)
    }

    pub const fn timing(&self) -> TimingProfile {
        TimingProfile {
            tap_window_s: self.tap_window_s,
            hold_duration_s: self.hold_duration_s,
            countdown_s: self.countdown_s,
            tap_score: self.tap_score,
            hold_score: self.hold_score,
        }
    }

    /// Builds a config from parsed INI data. Missing keys take their default;
    /// invalid values warn and take their default.
    pub fn from_ini(conf: &Ini) -> Self {
        let default = Self::default();
        Self {
            log_level: read(conf, OPTIONS, "LogLevel", default.log_level, |_| true),
            tick_rate_hz: read(conf, OPTIONS, "TickRateHz", default.tick_rate_hz, |hz| {
                (1..=1000).contains(hz)
            }),
            auto_select_song: read(
                conf,
                OPTIONS,
                "AutoSelectSong",
                default.auto_select_song,
                |_| true,
            ),
            songs_file: read_path(conf, "SongsFile", default.songs_file),
            posters_dir: read_path(conf, "PostersDir", default.posters_dir),
            notes_dir: read_path(conf, "NotesDir", default.notes_dir),
            lane_count: read(conf, JUDGE, "LaneCount", default.lane_count, |n| {
                (1..=MAX_LANES as u8).contains(n)
            }),
            tap_window_s: read(conf, JUDGE, "TapWindowSeconds", default.tap_window_s, |s| {
                s.is_finite() && *s >= 0.0
            }),
            hold_duration_s: read(
                conf,
                JUDGE,
                "HoldDurationSeconds",
                default.hold_duration_s,
                |s| s.is_finite() && *s >= 0.0,
            ),
            countdown_s: read(conf, JUDGE, "CountdownSeconds", default.countdown_s, |s| {
                s.is_finite() && *s >= 0.0
            }),
            tap_score: read(conf, JUDGE, "TapScore", default.tap_score, |_| true),
            hold_score: read(conf, JUDGE, "HoldScore", default.hold_score, |_| true),
        }
    }

    pub fn to_ini(&self) -> Ini {
        let mut conf = Ini::new();
        // Keys in alphabetical order
        conf.with_section(Some(OPTIONS))
            .set("AutoSelectSong", self.auto_select_song.to_string())
            .set("LogLevel", self.log_level.as_str())
            .set("NotesDir", self.notes_dir.to_string_lossy())
            .set("PostersDir", self.posters_dir.to_string_lossy())
            .set("SongsFile", self.songs_file.to_string_lossy())
            .set("TickRateHz", self.tick_rate_hz.to_string());
        conf.with_section(Some(JUDGE))
            .set("CountdownSeconds", self.countdown_s.to_string())
            .set("HoldDurationSeconds", self.hold_duration_s.to_string())
            .set("HoldScore", self.hold_score.to_string())
            .set("LaneCount", self.lane_count.to_string())
            .set("TapScore", self.tap_score.to_string())
            .set("TapWindowSeconds", self.tap_window_s.to_string());
        conf
    }
}

fn read<T: FromStr + Copy>(
    conf: &Ini,
    section: &str,
    key: &str,
    default: T,
    valid: impl Fn(&T) -> bool,
) -> T {
    let Some(raw) = conf.get_from(Some(section), key) else {
        return default;
    };
    match raw.trim().parse::<T>() {
        Ok(v) if valid(&v) => v,
        _ => {
            warn!("Invalid value '{raw}' for [{section}] {key}; using default.");
            default
        }
    }
}

fn read_path(conf: &Ini, key: &str, default: PathBuf) -> PathBuf {
    match conf.get_from(Some(OPTIONS), key).map(str::trim) {
        Some("") => {
            warn!("Empty value for [{OPTIONS}] {key}; using default.");
            default
        }
        Some(v) => PathBuf::from(v),
        None => default,
    }
}

fn create_default_config_file(path: &Path) -> Result<(), std::io::Error> {
    info!("'{}' not found, creating with default values.", path.display());
    Config::default().to_ini().write_to_file(path)
}

/// Reads `laneclock.ini` from the working directory, writing a default one
/// first if it does not exist. Never fails; problems fall back to defaults.
pub fn load() -> Config {
    load_from(Path::new(CONFIG_PATH))
}

pub fn load_from(path: &Path) -> Config {
    if !path.exists()
        && let Err(e) = create_default_config_file(path)
    {
        warn!("Failed to create default config file: {e}");
    }

    match Ini::load_from_file(path) {
        Ok(conf) => {
            let cfg = Config::from_ini(&conf);
            info!("Configuration loaded from '{}'.", path.display());
            cfg
        }
        Err(e) => {
            warn!("Failed to load '{}': {e}. Using default values.", path.display());
            Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Config {
        Config::from_ini(&Ini::load_from_str(text).unwrap())
    }

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(parse(""), Config::default());
    }

    #[test]
    fn reads_options_and_judge_sections() {
        let cfg = parse(
            "[Options]\nLogLevel=debug\nTickRateHz=120\nAutoSelectSong=0\nNotesDir=charts\n\
             [Judge]\nLaneCount=6\nTapWindowSeconds=0.25\nHoldDurationSeconds=0.5\n\
             CountdownSeconds=3\nTapScore=50\nHoldScore=75\n",
        );
        assert_eq!(cfg.log_level, LogLevel::Debug);
        assert_eq!(cfg.tick_rate_hz, 120);
        assert_eq!(cfg.auto_select_song, 0);
        assert_eq!(cfg.notes_dir, PathBuf::from("charts"));
        assert_eq!(cfg.songs_file, PathBuf::from("songs.txt"));
        assert_eq!(cfg.lanes().count(), 6);

        let timing = cfg.timing();
        assert_eq!(timing.tap_window_s, 0.25);
        assert_eq!(timing.hold_duration_s, 0.5);
        assert_eq!(timing.countdown_s, 3.0);
        assert_eq!(timing.tap_score, 50);
        assert_eq!(timing.hold_score, 75);
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let cfg = parse(
            "[Options]\nLogLevel=loud\nTickRateHz=0\nSongsFile=\n\
             [Judge]\nLaneCount=9\nTapWindowSeconds=-1\nTapScore=lots\n",
        );
        let default = Config::default();
        assert_eq!(cfg.log_level, default.log_level);
        assert_eq!(cfg.tick_rate_hz, default.tick_rate_hz);
        assert_eq!(cfg.songs_file, default.songs_file);
        assert_eq!(cfg.lane_count, default.lane_count);
        assert_eq!(cfg.tap_window_s, default.tap_window_s);
        assert_eq!(cfg.tap_score, default.tap_score);
    }

    #[test]
    fn log_level_parses_case_insensitively() {
        assert_eq!("WARNING".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert_eq!(" trace ".parse::<LogLevel>(), Ok(LogLevel::Trace));
        assert!("verbose".parse::<LogLevel>().is_err());
        assert_eq!(LogLevel::Off.as_level_filter(), log::LevelFilter::Off);
    }

    #[test]
    fn default_file_round_trips() {
        let mut custom = Config::default();
        custom.lane_count = 5;
        custom.tap_window_s = 0.125;
        custom.log_level = LogLevel::Trace;
        let text = {
            let mut buf = Vec::new();
            custom.to_ini().write_to(&mut buf).unwrap();
            String::from_utf8(buf).unwrap()
        };
        assert_eq!(parse(&text), custom);
    }

    #[test]
    fn load_writes_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_PATH);
        let cfg = load_from(&path);
        assert_eq!(cfg, Config::default());
        assert!(path.exists());

        std::fs::write(&path, "[Judge]\nLaneCount=2\n").unwrap();
        assert_eq!(load_from(&path).lane_count, 2);
    }
}
