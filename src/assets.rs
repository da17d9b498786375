// Loads layer sheets and the background from disk.
// A layer file that is missing or does not decode becomes a fully transparent
// placeholder of the expected size, so the frame tables still line up and
// the preview keeps running. The background is always resized to the
// configured logical size, and falls back to a solid fill.

use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use tracing::{info, warn};

use crate::compositor::LayerSet;
use crate::config::PreviewConfig;
use crate::error::Error;
use crate::frames::Layer;
use crate::units::DISPLAY_SCALE;

/// What a file-open prompt is loading into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadTarget {
    Layer(Layer),
    Background,
}

impl LoadTarget {
    pub fn label(self) -> &'static str {
        match self {
            LoadTarget::Layer(layer) => layer.label(),
            LoadTarget::Background => "BACKGROUND",
        }
    }
}

/// Decode any format the `image` crate understands into RGBA.
pub fn try_load(path: &Path) -> Result<RgbaImage, Error> {
    let img = image::open(path).map_err(|source| Error::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(img.to_rgba8())
}

/// Transparent stand-in for an image that failed to load.
pub fn placeholder(width: u32, height: u32) -> RgbaImage {
    RgbaImage::new(width, height)
}

/// Load or substitute a transparent placeholder of `fallback_size`.
/// The boolean tells whether the real file was used.
pub fn load_or_placeholder(path: &Path, fallback_size: (u32, u32)) -> (RgbaImage, bool) {
    match try_load(path) {
        Ok(img) => {
            info!("Loaded {} ({}x{})", path.display(), img.width(), img.height());
            (img, true)
        },
        Err(e) => {
            warn!("{e}; using a transparent {}x{} placeholder", fallback_size.0, fallback_size.1);
            (placeholder(fallback_size.0, fallback_size.1), false)
        },
    }
}

pub fn load_layer(layer: Layer, path: &Path) -> RgbaImage {
    load_or_placeholder(path, layer.sheet_size()).0
}

/// Opaque RGBA from a 0x00RRGGBB color.
fn opaque(color: u32) -> Rgba<u8> {
    Rgba([(color >> 16) as u8, (color >> 8) as u8, color as u8, 255])
}

/// Load a background and stretch it over `size` logical units, stored at
/// display resolution. On failure the whole area is `fill`.
pub fn load_background(path: &Path, size: (u32, u32), fill: u32) -> (RgbaImage, bool) {
    let (w, h) = (size.0 * DISPLAY_SCALE, size.1 * DISPLAY_SCALE);
    match try_load(path) {
        Ok(img) => {
            info!("Loaded background {} ({}x{} -> {w}x{h})", path.display(), img.width(), img.height());
            (imageops::resize(&img, w, h, FilterType::Nearest), true)
        },
        Err(e) => {
            warn!("{e}; using a solid {w}x{h} background");
            (RgbaImage::from_pixel(w, h, opaque(fill)), false)
        },
    }
}

/// Everything the renderer draws, plus where it came from.
pub struct Assets {
    pub layers: LayerSet,
    /// Display-resolution pixels covering `background_size` logical units.
    pub background: RgbaImage,
    background_size: (u32, u32),
    background_fill: u32,
    paths: [PathBuf; 4], // hat, head, body, background
}

impl Assets {
    pub fn load(config: &PreviewConfig) -> Self {
        Self {
            layers: LayerSet {
                body: load_layer(Layer::Body, &config.body_path),
                head: load_layer(Layer::Head, &config.head_path),
                hat: load_layer(Layer::Hat, &config.hat_path),
            },
            background: load_background(&config.background_path, config.background_size, config.background_fill).0,
            background_size: config.background_size,
            background_fill: config.background_fill,
            paths: [
                config.hat_path.clone(),
                config.head_path.clone(),
                config.body_path.clone(),
                config.background_path.clone(),
            ],
        }
    }

    fn slot(target: LoadTarget) -> usize {
        match target {
            LoadTarget::Layer(Layer::Hat) => 0,
            LoadTarget::Layer(Layer::Head) => 1,
            LoadTarget::Layer(Layer::Body) => 2,
            LoadTarget::Background => 3,
        }
    }

    /// Logical size of the background.
    pub fn background_size(&self) -> (u32, u32) {
        self.background_size
    }

    pub fn path(&self, target: LoadTarget) -> &Path {
        &self.paths[Self::slot(target)]
    }

    /// Replace one image wholesale. Returns true if the file loaded; on
    /// failure the slot holds its placeholder.
    pub fn reload(&mut self, target: LoadTarget, path: PathBuf) -> bool {
        let (img, ok) = match target {
            LoadTarget::Layer(layer) => load_or_placeholder(&path, layer.sheet_size()),
            LoadTarget::Background => load_background(&path, self.background_size, self.background_fill),
        };
        match target {
            LoadTarget::Layer(layer) => self.layers.replace(layer, img),
            LoadTarget::Background => self.background = img,
        }
        self.paths[Self::slot(target)] = path;
        ok
    }
}
