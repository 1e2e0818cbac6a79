//! Browser bindings
//!
//! Thin wasm-bindgen wrapper around [`Session`]. The page owns the canvas,
//! the event listeners and the renderer; it forwards pointer events here and
//! reads back instance data every frame.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::renderer::{CubeletInstance, colors, hex_to_rgba};
use crate::session::{PointerButton, PointerEvent, Session};
use crate::settings::{DragMode, Settings};

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Logger already installed by an earlier module instance
        return;
    }
    log::info!("Spin Cube starting...");
}

fn button_from_js(button: i16) -> PointerButton {
    // MouseEvent.button: 0 primary, 1 middle, 2 secondary
    match button {
        1 => PointerButton::Middle,
        2 => PointerButton::Secondary,
        _ => PointerButton::Primary,
    }
}

fn event(pointer_id: i32, x: f32, y: f32, button: i16, shift: bool) -> PointerEvent {
    PointerEvent {
        pointer_id,
        pos: Vec2::new(x, y),
        button: button_from_js(button),
        shift,
    }
}

#[wasm_bindgen]
pub struct WebSession {
    session: Session,
}

#[wasm_bindgen]
impl WebSession {
    /// Create a session. `settings_json` comes from LocalStorage (may be
    /// empty or stale).
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: &str) -> WebSession {
        let settings = if settings_json.trim().is_empty() {
            Settings::default()
        } else {
            Settings::from_json(settings_json).unwrap_or_else(|e| {
                log::warn!("Ignoring stored settings: {}", e);
                Settings::default()
            })
        };
        let seed = js_sys::Date::now() as u64;
        WebSession {
            session: Session::new(settings, seed),
        }
    }

    /// Canvas size in CSS pixels
    pub fn resize(&mut self, width: f32, height: f32) {
        self.session.resize(width, height);
    }

    /// Returns `true` if the page should capture the pointer
    pub fn pointer_down(
        &mut self,
        pointer_id: i32,
        x: f32,
        y: f32,
        button: i16,
        shift: bool,
    ) -> bool {
        self.session.pointer_down(event(pointer_id, x, y, button, shift))
    }

    pub fn pointer_move(&mut self, pointer_id: i32, x: f32, y: f32) {
        self.session.pointer_move(event(pointer_id, x, y, 0, false));
    }

    pub fn pointer_up(&mut self, pointer_id: i32, x: f32, y: f32) {
        self.session.pointer_up(event(pointer_id, x, y, 0, false));
    }

    pub fn pointer_cancel(&mut self, pointer_id: i32) {
        self.session.pointer_cancel(event(pointer_id, 0.0, 0.0, 0, false));
    }

    pub fn wheel(&mut self, delta_y: f32) {
        self.session.wheel(delta_y);
    }

    /// Advance one frame. Returns `true` the frame the puzzle becomes solved.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.session.tick(dt).newly_solved
    }

    pub fn reset(&mut self) -> bool {
        self.session.reset()
    }

    pub fn scramble(&mut self) -> bool {
        self.session.scramble_default()
    }

    pub fn is_solved(&self) -> bool {
        self.session.is_solved()
    }

    pub fn is_scrambling(&self) -> bool {
        self.session.is_scrambling()
    }

    /// "auto", "horizontal" or "vertical". Unknown values are ignored.
    pub fn set_drag_mode(&mut self, mode: &str) {
        match DragMode::from_str(mode) {
            Some(mode) => self.session.set_drag_mode(mode),
            None => log::warn!("Unknown drag mode: {}", mode),
        }
    }

    pub fn set_camera_sensitivity(&mut self, value: f32) {
        self.session.set_camera_sensitivity(value);
    }

    /// Current settings as JSON, for LocalStorage
    pub fn settings_json(&self) -> String {
        self.session.settings().to_json().unwrap_or_default()
    }

    /// Packed instance buffer (see [`CubeletInstance`]), ready for upload
    pub fn instances(&self) -> Vec<u8> {
        let instances: Vec<CubeletInstance> = self.session.instances();
        bytemuck::cast_slice(&instances).to_vec()
    }

    /// RGBA clear color for the canvas
    pub fn clear_color(&self) -> Vec<f32> {
        hex_to_rgba(colors::BACKGROUND).to_vec()
    }

    /// Column-major view-projection matrix
    pub fn view_proj(&self, aspect: f32) -> Vec<f32> {
        self.session
            .camera_pose()
            .view_proj(aspect)
            .to_cols_array()
            .to_vec()
    }
}
