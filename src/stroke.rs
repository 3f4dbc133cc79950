//! Pointer samples to ink.
//!
//! [`StrokeEngine`] is a small per-event state machine. It never owns the
//! surface; each event borrows it for the duration of the paint.

use tracing::debug;

use crate::draw::{erase_disc, fill_disc, stroke_segment};
use crate::types::{Mode, Point, Rgba, StrokeStyle, StrokeWidth, Surface};

/// Dot radius in draw mode, as a multiple of the line width.
pub const DRAW_RADIUS_FACTOR: f32 = 0.5;
/// Eraser disc radius, as a multiple of the line width.
pub const ERASE_RADIUS_FACTOR: f32 = 2.0;

/// Where the pointer is in the stroke lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum StrokeState {
    #[default]
    Idle,
    /// Pointer is down. `mode` is fixed for the whole stroke.
    Active { last_point: Point, mode: Mode },
}

#[derive(Debug, Default)]
pub struct StrokeEngine {
    state: StrokeState,
    mode: Mode,
    style: StrokeStyle,
}

impl StrokeEngine {
    pub fn new(mode: Mode, style: StrokeStyle) -> Self {
        Self {
            state: StrokeState::Idle,
            mode,
            style,
        }
    }

    pub fn state(&self) -> StrokeState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, StrokeState::Active { .. })
    }

    /// Mode the next stroke will use.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn style(&self) -> StrokeStyle {
        self.style
    }

    /// Flip draw/erase for the next stroke and report the new mode.
    /// A stroke already in progress keeps its mode.
    pub fn toggle_erase_mode(&mut self) -> Mode {
        self.mode = self.mode.toggled();
        debug!(mode = %self.mode, "mode toggled");
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn set_color(&mut self, color: Rgba) {
        self.style.color = color;
    }

    pub fn set_width(&mut self, width: StrokeWidth) {
        self.style.width = width;
    }

    /// Start a stroke and leave a mark even if the pointer never moves.
    /// A second down without an up restarts the stroke at the new point.
    pub fn pointer_down(&mut self, surface: &mut Surface, p: Point) {
        let mode = self.mode;
        self.state = StrokeState::Active { last_point: p, mode };
        let style = self.style;
        match mode {
            Mode::Draw => fill_disc(
                surface,
                p,
                style.width.get() * DRAW_RADIUS_FACTOR,
                style.color,
            ),
            Mode::Erase => erase_disc(surface, p, style.width.get() * ERASE_RADIUS_FACTOR),
        }
    }

    /// Extend the active stroke to `p`. Ignored while idle.
    pub fn pointer_move(&mut self, surface: &mut Surface, p: Point) {
        let StrokeState::Active { last_point, mode } = self.state else {
            return;
        };
        let style = self.style;
        match mode {
            Mode::Draw => stroke_segment(surface, last_point, p, &style),
            Mode::Erase => erase_along(surface, last_point, p, &style),
        }
        self.state = StrokeState::Active { last_point: p, mode };
    }

    pub fn pointer_up(&mut self) {
        self.state = StrokeState::Idle;
    }

    pub fn pointer_leave(&mut self) {
        self.state = StrokeState::Idle;
    }
}

/// Centres of the eraser stamps between `from` and `to`.
/// One stamp per pixel of travel (at least one); `to` itself is excluded and
/// gets stamped as the start of the next move.
pub fn erase_stamp_centers(from: Point, to: Point) -> impl Iterator<Item = Point> {
    let steps = (from.distance(to).floor() as usize).max(1);
    (0..steps).map(move |i| from.lerp(to, i as f32 / steps as f32))
}

fn erase_along(surface: &mut Surface, from: Point, to: Point, style: &StrokeStyle) {
    let radius = style.width.get() * ERASE_RADIUS_FACTOR;
    for c in erase_stamp_centers(from, to) {
        erase_disc(surface, c, radius);
    }
}
