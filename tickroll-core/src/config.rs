use std::path::{Path, PathBuf};

use serde::Deserialize;

use tickroll_types::{Quantizer, DENOMINATORS, MAX_VELOCITY, MIN_VELOCITY};

use crate::history::DEFAULT_HISTORY_DEPTH;

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    quantize: QuantizeConfig,
    #[serde(default)]
    view: ViewConfig,
    #[serde(default)]
    editing: EditingConfig,
}

#[derive(Deserialize, Default)]
struct QuantizeConfig {
    timebase: Option<u32>,
    denominator: Option<u32>,
    dotted: Option<bool>,
    triplet: Option<bool>,
    enabled: Option<bool>,
}

#[derive(Deserialize, Default)]
struct ViewConfig {
    pixels_per_tick: Option<f64>,
    key_height: Option<f64>,
    control_height: Option<f64>,
    tempo_height: Option<f64>,
    max_bpm: Option<f64>,
    arrange_track_height: Option<f64>,
}

#[derive(Deserialize, Default)]
struct EditingConfig {
    history_depth: Option<usize>,
    new_note_velocity: Option<u8>,
}

/// Pixel densities and ranges for the editor views.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewSettings {
    pub pixels_per_tick: f64,
    pub key_height: f64,
    pub control_height: f64,
    pub tempo_height: f64,
    pub max_bpm: f64,
    pub arrange_track_height: f64,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            pixels_per_tick: 0.1,
            key_height: 16.0,
            control_height: 120.0,
            tempo_height: 240.0,
            max_bpm: 320.0,
            arrange_track_height: 64.0,
        }
    }
}

pub struct Config {
    quantize: QuantizeConfig,
    view: ViewConfig,
    editing: EditingConfig,
}

impl Config {
    /// Embedded defaults merged with the user's config file, if any.
    pub fn load() -> Self {
        match user_config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::embedded(),
        }
    }

    /// Embedded defaults merged with `path`. A missing, unreadable or malformed
    /// file leaves the defaults in place.
    pub fn load_from(path: &Path) -> Self {
        let mut config = Self::embedded();
        if !path.exists() {
            return config;
        }
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<ConfigFile>(&contents) {
                Ok(user) => config.merge(user),
                Err(e) => {
                    log::warn!(target: "config", "ignoring malformed config {}: {}", path.display(), e)
                }
            },
            Err(e) => {
                log::warn!(target: "config", "could not read config {}: {}", path.display(), e)
            }
        }
        config
    }

    fn embedded() -> Self {
        let base: ConfigFile =
            toml::from_str(DEFAULT_CONFIG).expect("Failed to parse embedded config.toml");
        Config {
            quantize: base.quantize,
            view: base.view,
            editing: base.editing,
        }
    }

    fn merge(&mut self, user: ConfigFile) {
        merge_quantize(&mut self.quantize, user.quantize);
        merge_view(&mut self.view, user.view);
        merge_editing(&mut self.editing, user.editing);
    }

    pub fn quantizer(&self) -> Quantizer {
        let fallback = Quantizer::default();
        let denominator = self
            .quantize
            .denominator
            .filter(|d| DENOMINATORS.contains(d))
            .unwrap_or(fallback.denominator);
        Quantizer::new(
            self.quantize
                .timebase
                .filter(|&t| t > 0)
                .unwrap_or(fallback.timebase),
            denominator,
        )
        .dotted(self.quantize.dotted.unwrap_or(false))
        .triplet(self.quantize.triplet.unwrap_or(false))
        .enabled(self.quantize.enabled.unwrap_or(true))
    }

    pub fn view(&self) -> ViewSettings {
        let fallback = ViewSettings::default();
        let positive = |v: Option<f64>, d: f64| v.filter(|x| *x > 0.0 && x.is_finite()).unwrap_or(d);
        ViewSettings {
            pixels_per_tick: positive(self.view.pixels_per_tick, fallback.pixels_per_tick),
            key_height: positive(self.view.key_height, fallback.key_height),
            control_height: positive(self.view.control_height, fallback.control_height),
            tempo_height: positive(self.view.tempo_height, fallback.tempo_height),
            max_bpm: positive(self.view.max_bpm, fallback.max_bpm),
            arrange_track_height: positive(
                self.view.arrange_track_height,
                fallback.arrange_track_height,
            ),
        }
    }

    /// Undo depth (at least 1).
    pub fn history_depth(&self) -> usize {
        self.editing
            .history_depth
            .unwrap_or(DEFAULT_HISTORY_DEPTH)
            .max(1)
    }

    pub fn new_note_velocity(&self) -> u8 {
        self.editing
            .new_note_velocity
            .unwrap_or(100)
            .clamp(MIN_VELOCITY, MAX_VELOCITY)
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tickroll").join("config.toml"))
}

fn merge_quantize(base: &mut QuantizeConfig, user: QuantizeConfig) {
    if user.timebase.is_some() {
        base.timebase = user.timebase;
    }
    if user.denominator.is_some() {
        base.denominator = user.denominator;
    }
    if user.dotted.is_some() {
        base.dotted = user.dotted;
    }
    if user.triplet.is_some() {
        base.triplet = user.triplet;
    }
    if user.enabled.is_some() {
        base.enabled = user.enabled;
    }
}

fn merge_view(base: &mut ViewConfig, user: ViewConfig) {
    if user.pixels_per_tick.is_some() {
        base.pixels_per_tick = user.pixels_per_tick;
    }
    if user.key_height.is_some() {
        base.key_height = user.key_height;
    }
    if user.control_height.is_some() {
        base.control_height = user.control_height;
    }
    if user.tempo_height.is_some() {
        base.tempo_height = user.tempo_height;
    }
    if user.max_bpm.is_some() {
        base.max_bpm = user.max_bpm;
    }
    if user.arrange_track_height.is_some() {
        base.arrange_track_height = user.arrange_track_height;
    }
}

fn merge_editing(base: &mut EditingConfig, user: EditingConfig) {
    if user.history_depth.is_some() {
        base.history_depth = user.history_depth;
    }
    if user.new_note_velocity.is_some() {
        base.new_note_velocity = user.new_note_velocity;
    }
}
