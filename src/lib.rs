//! # Sprite preview
//!
//! Composites a layered pixel-art character (body, head, hat) over a
//! scrollable background and animates it from keyboard and mouse input.
//!
//! - [`frames`]: pose -> source rectangles in the three layer sheets
//! - [`compositor`]: crop, stack and upscale the layers
//! - [`preview`]: input events and scheduled ticks -> pose and camera
//! - [`render`]: draw the scene into the window framebuffer

pub mod assets;
pub mod camera;
pub mod compass;
pub mod compositor;
pub mod config;
pub mod draw;
pub mod error;
pub mod frames;
pub mod input;
pub mod preview;
pub mod prompt;
pub mod render;
pub mod scheduler;
pub mod types;
pub mod units;
