// What you SEE:
// • A layered character (body, head, hat) standing in the middle of a background.
// • Arrow keys or WASD (or the on-screen compass) walk: the background slides, the sprite bobs.
// • I/J/K/L act facing back/left/front/right, G grabs, H takes damage, F dies.
// • Mouse wheel zooms around the character; R resets the view.
// • F1-F4 open a path prompt to swap the hat/head/body/background image.
// • ESC cancels the prompt, or quits.

use std::time::{Duration, Instant};

use anyhow::Result;
use minifb::Key;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sprite_preview::assets::{Assets, LoadTarget};
use sprite_preview::compass::{CompassGrip, GripEdge};
use sprite_preview::config::PreviewConfig;
use sprite_preview::draw::Drawer;
use sprite_preview::frames::Layer;
use sprite_preview::input;
use sprite_preview::preview::Preview;
use sprite_preview::prompt::PathPrompt;
use sprite_preview::render::Renderer;
use sprite_preview::types::FrameBuffer;

fn load_target(key: Key) -> Option<LoadTarget> {
    match key {
        Key::F1 => Some(LoadTarget::Layer(Layer::Hat)),
        Key::F2 => Some(LoadTarget::Layer(Layer::Head)),
        Key::F3 => Some(LoadTarget::Layer(Layer::Body)),
        Key::F4 => Some(LoadTarget::Background),
        _ => None,
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("sprite_preview=info".parse()?))
        .init();

    info!("Sprite preview starting, version {}", env!("CARGO_PKG_VERSION"));

    /* --- Config + window setup ---
       Visual: window opens at the configured size. */
    let config = PreviewConfig::load();
    let mut drawer = Drawer::new(
        "Sprite Preview",
        config.window_width,
        config.window_height,
        config.target_fps,
    )?;
    let mut screen = FrameBuffer::new(config.window_width, config.window_height);

    /* --- Images ---
       Visual: anything missing shows up as empty (transparent) space. */
    let mut assets = Assets::load(&config);

    /* --- State ---
       The preview owns pose/camera/ticks; the renderer owns the cached sprite. */
    let mut preview = Preview::new(&config);
    let mut renderer = Renderer::new(config.window_width, config.window_height, config.clear_color, config.show_hud);
    let mut prompt = PathPrompt::new();
    drawer.set_char_input(prompt.input_callback());
    let mut grip = CompassGrip::default();

    /* --- FPS --- */
    let start = Instant::now();
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut fps_text = String::from("FPS 0.0");

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() {
        let now = start.elapsed();

        /* 1) Keyboard. The prompt takes the keyboard while it is open. */
        let pressed = drawer.keys_pressed();
        if prompt.is_open() {
            if drawer.key_repeated(Key::Backspace) {
                prompt.backspace();
            }
            if pressed.contains(&Key::Escape) {
                prompt.cancel();
            } else if pressed.contains(&Key::Enter) || pressed.contains(&Key::NumPadEnter) {
                if let Some((target, path)) = prompt.submit() {
                    assets.reload(target, path);
                    if target == LoadTarget::Background {
                        preview.fit_background(assets.background_size());
                    }
                    renderer.invalidate_sprite();
                }
            }
            preview.mark_dirty(); // caret and text change every keystroke
        } else {
            if pressed.contains(&Key::Escape) {
                break;
            }
            for key in &pressed {
                if let Some(m) = input::move_key(*key) {
                    preview.press_move(m, now);
                } else if let Some(a) = input::action_key(*key) {
                    preview.trigger(a, now);
                } else if let Some(target) = load_target(*key) {
                    preview.release_all_moves(now);
                    grip.reset();
                    prompt.open(target, assets.path(target));
                    preview.mark_dirty();
                } else if *key == Key::R {
                    preview.reset_view();
                }
            }
            for key in drawer.keys_released() {
                if let Some(m) = input::move_key(key) {
                    preview.release_move(m, now);
                }
            }

            /* 2) Mouse: compass buttons act like held arrow keys. */
            for edge in grip.update(renderer.compass(), drawer.mouse_pos(), drawer.left_mouse_down()) {
                match edge {
                    GripEdge::Press(m) => preview.press_move(m, now),
                    GripEdge::Release(m) => preview.release_move(m, now),
                }
            }
        }

        /* 3) Wheel zoom works even with the prompt open. */
        let notches = drawer.wheel_notches();
        if notches != 0.0 {
            preview.wheel(notches);
        }

        /* 4) Run due movement ticks and animation steps. */
        preview.update(now);

        /* 5) Redraw only when something changed; otherwise just pump events. */
        if preview.take_dirty() {
            renderer.render(&mut screen, &preview, &assets, &prompt, &fps_text);
            drawer.present(&screen)?;
        } else {
            drawer.poll();
        }

        /* 6) FPS counter (HUD + debug log once per second) */
        frames_this_second += 1;
        let wall = Instant::now();
        if wall.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = wall.duration_since(last_fps_time).as_secs_f32();
            let fps = frames_this_second as f32 / secs;
            debug!("FPS: {:.1}", fps);
            fps_text = format!("FPS {:.1}", fps);
            preview.mark_dirty();
            frames_this_second = 0;
            last_fps_time = wall;
        }
    }

    /* Window closed: drop pending ticks before the window is torn down. */
    let dropped = preview.shutdown();
    info!(dropped, "Sprite preview shutdown complete");
    Ok(())
}
