// Native window that shows the board and reports raw pointer/key state.
// No drawing logic lives here; main.rs turns this state into board events.

use minifb::{CursorStyle, Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use crate::error::Error;
use crate::types::Mode;

/// The on-screen view of a board, sized 1:1 with its surface.
pub struct BoardWindow {
    window: Window,
    width: usize,
    height: usize,
}

impl BoardWindow {
    /// Open a window exactly the size of the surface.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let mut window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(60);
        window.set_cursor_style(CursorStyle::Crosshair);
        Ok(Self {
            window,
            width,
            height,
        })
    }

    /// Push a 0x00RRGGBB frame of surface size to the screen.
    pub fn present(&mut self, frame: &[u32]) -> Result<(), Error> {
        self.window
            .update_with_buffer(frame, self.width, self.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))
    }

    /// False once the user closes the window.
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Held, not edge-triggered: quitting needs no debounce.
    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// Pointer in surface pixels, or `None` while it is outside the window.
    pub fn pointer(&self) -> Option<(f32, f32)> {
        self.window.get_mouse_pos(MouseMode::Discard)
    }

    /// Left button state this frame; the caller detects edges.
    pub fn left_down(&self) -> bool {
        self.window.get_mouse_down(MouseButton::Left)
    }

    /// Right button state this frame.
    pub fn right_down(&self) -> bool {
        self.window.get_mouse_down(MouseButton::Right)
    }

    /// True only on the frame `key` goes down (no auto-repeat).
    pub fn pressed_once(&self, key: Key) -> bool {
        self.window.is_key_pressed(key, KeyRepeat::No)
    }

    /// Mode feedback: title text plus a cursor that differs per mode.
    pub fn show_pen(&mut self, mode: Mode, width: f32) {
        self.window
            .set_title(&format!("ink-board | {mode} | {width}px"));
        let cursor = match mode {
            Mode::Draw => CursorStyle::Crosshair,
            Mode::Erase => CursorStyle::ClosedHand,
        };
        self.window.set_cursor_style(cursor);
    }
}
