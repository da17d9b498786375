//! Preview configuration.
//!
//! Read once at startup from `sprite-preview.toml` in the working directory.
//! Every field has a default, so the file is optional and may be partial.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Configuration file name.
pub const CONFIG_FILE: &str = "sprite-preview.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    // === Window ===
    /// Canvas width in pixels
    pub window_width: usize,
    /// Canvas height in pixels
    pub window_height: usize,
    /// Frame limiter for the event loop
    pub target_fps: usize,
    /// Background fill behind everything (0x00RRGGBB)
    pub clear_color: u32,
    /// Draw the text overlay and key hints
    pub show_hud: bool,

    // === Timing ===
    /// Delay between held-key movement ticks
    pub move_interval_ms: u64,
    /// Delay between one-shot animation frames
    pub anim_interval_ms: u64,

    // === Camera (logical units) ===
    /// Distance walked per movement tick
    pub walk_speed: f32,
    /// How far inside the background edge the sprite must stay
    pub border_margin: f32,
    /// Zoom multiplier per wheel notch up
    pub zoom_step: f32,
    /// Zoom multiplier per wheel notch down
    pub zoom_out_step: f32,

    // === Assets ===
    pub hat_path: PathBuf,
    pub head_path: PathBuf,
    pub body_path: PathBuf,
    pub background_path: PathBuf,
    /// Logical size every background is resized to
    pub background_size: (u32, u32),
    /// Solid background used when no image loads (0x00RRGGBB)
    pub background_fill: u32,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            window_width: 500,
            window_height: 500,
            target_fps: 60,
            clear_color: 0x00_20_22_28,
            show_hud: true,

            move_interval_ms: 50,
            anim_interval_ms: 50,

            walk_speed: 4.0,
            border_margin: 32.0,
            zoom_step: 1.1,
            zoom_out_step: 0.9,

            hat_path: PathBuf::from("assets/hat.png"),
            head_path: PathBuf::from("assets/head.png"),
            body_path: PathBuf::from("assets/body.png"),
            background_path: PathBuf::from("assets/background.png"),
            background_size: (250, 250),
            background_fill: 0x00_00_FF_00,
        }
    }
}

impl PreviewConfig {
    /// Load from `sprite-preview.toml` in the working directory.
    pub fn load() -> Self {
        Self::load_from(CONFIG_FILE)
    }

    /// Load from a specific path. Missing or invalid files give the defaults.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file {} not found, using defaults", path.display());
            return Self::default();
        }

        let mut config: Self = match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    info!("Loaded config from {}", path.display());
                    config
                },
                Err(e) => {
                    warn!("Failed to parse config file: {e}");
                    Self::default()
                },
            },
            Err(e) => {
                warn!("Failed to read config file: {e}");
                Self::default()
            },
        };
        config.validate();
        config
    }

    /// Clamp values to ranges the preview can work with.
    pub fn validate(&mut self) {
        self.window_width = self.window_width.clamp(320, 3840);
        self.window_height = self.window_height.clamp(240, 2160);
        self.target_fps = self.target_fps.clamp(10, 240);

        self.move_interval_ms = self.move_interval_ms.clamp(10, 1000);
        self.anim_interval_ms = self.anim_interval_ms.clamp(10, 2000);

        self.walk_speed = finite_or(self.walk_speed, 4.0).clamp(0.1, 64.0);
        self.border_margin = finite_or(self.border_margin, 32.0).abs();
        self.zoom_step = finite_or(self.zoom_step, 1.1).clamp(1.01, 2.0);
        self.zoom_out_step = finite_or(self.zoom_out_step, 0.9).clamp(0.5, 0.99);
        self.background_fill &= 0x00_FF_FF_FF;

        self.background_size.0 = self.background_size.0.clamp(1, 4096);
        self.background_size.1 = self.background_size.1.clamp(1, 4096);
    }

    pub fn move_interval(&self) -> Duration {
        Duration::from_millis(self.move_interval_ms)
    }

    pub fn anim_interval(&self) -> Duration {
        Duration::from_millis(self.anim_interval_ms)
    }
}

fn finite_or(v: f32, fallback: f32) -> f32 {
    if v.is_finite() { v } else { fallback }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = PreviewConfig::default();
        assert_eq!(config.window_width, 500);
        assert_eq!(config.window_height, 500);
        assert_eq!(config.move_interval(), Duration::from_millis(50));
        assert_eq!(config.anim_interval(), Duration::from_millis(50));
        assert_eq!(config.background_size, (250, 250));
        assert_eq!((config.zoom_step, config.zoom_out_step), (1.1, 0.9));
        assert!(config.show_hud);
    }

    #[test]
    fn test_config_validation() {
        let mut config = PreviewConfig::default();
        config.window_width = 10;
        config.walk_speed = f32::NAN;
        config.border_margin = -50.0;
        config.zoom_step = 0.5;
        config.zoom_out_step = 1.5;
        config.anim_interval_ms = 0;

        config.validate();

        assert_eq!(config.window_width, 320);
        assert_eq!(config.walk_speed, 4.0);
        assert_eq!(config.border_margin, 50.0);
        assert!((config.zoom_step - 1.01).abs() < 1e-6);
        assert!((config.zoom_out_step - 0.99).abs() < 1e-6);
        assert_eq!(config.anim_interval_ms, 10);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("preview.toml");
        fs::write(&path, "walk_speed = 5.0\nhat_path = \"art/cap.png\"\n").expect("write config");

        let config = PreviewConfig::load_from(&path);
        assert_eq!(config.walk_speed, 5.0);
        assert_eq!(config.hat_path, PathBuf::from("art/cap.png"));
        assert_eq!(config.window_width, 500);
    }

    #[test]
    fn test_invalid_file_gives_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("broken.toml");
        fs::write(&path, "walk_speed = [nope").expect("write config");

        let config = PreviewConfig::load_from(&path);
        assert_eq!(config.walk_speed, 4.0);
    }

    #[test]
    fn test_config_load_missing_file() {
        let config = PreviewConfig::load_from("/nonexistent/path/sprite-preview.toml");
        assert_eq!(config.window_width, 500);
    }

    #[test]
    fn test_config_toml_serialization() {
        let toml_str = toml::to_string_pretty(&PreviewConfig::default()).expect("Failed to serialize");
        assert!(toml_str.contains("walk_speed"));
        assert!(toml_str.contains("background_path"));
    }
}
