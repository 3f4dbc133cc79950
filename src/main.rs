// What you get:
// • Hold Left Mouse to draw; right click flips between draw and erase.
// • C clears, + / - change the pen width, P (re)loads the --page image or PDF under the ink.
// • ESC quits.

use clap::Parser;
use minifb::Key;
use tracing::{info, warn};

use ink_board::config::Config;
use ink_board::window::BoardWindow;
use ink_board::{
    AnyPageDecoder, Error, PageCompositor, PendingPage, Rgba, Whiteboard, logging, spawn_load,
};

/// Colour behind transparent pixels on screen.
const PAPER: Rgba = Rgba::WHITE;

fn main() -> Result<(), Error> {
    let config = Config::parse();
    logging::init(config.debug);
    info!(
        width = config.width,
        height = config.height,
        mode = %config.mode,
        "starting ink-board"
    );

    let mut board = Whiteboard::new(config.width, config.height)
        .with_pen(config.mode, config.style())
        .with_compositor(PageCompositor::new(config.filter.into()));
    let mut window = BoardWindow::new("ink-board", config.width, config.height)?;
    window.show_pen(board.mode(), board.style().width.get());

    let mut pending = start_page_load(&config);
    let mut was_left = false;
    let mut was_right = false;

    while window.is_open() && !window.esc_pressed() {
        // 1) A page finished decoding: put it under whatever is drawn right now.
        if let Some(p) = pending.as_mut()
            && let Some(result) = p.poll()
        {
            let path = p.path().display();
            match result.and_then(|page| board.composite_page(&page)) {
                Ok(placement) => info!(%path, scale = placement.scale, "page ready"),
                Err(e) => warn!(%path, error = %e, "could not show page"),
            }
            pending = None;
        }

        // 2) Keys
        if window.pressed_once(Key::C) {
            board.clear_surface();
        }
        if window.pressed_once(Key::P) {
            pending = start_page_load(&config);
        }
        let width = board.style().width.get();
        let new_width = if window.pressed_once(Key::Equal) || window.pressed_once(Key::NumPadPlus) {
            Some(width + 1.0)
        } else if window.pressed_once(Key::Minus) || window.pressed_once(Key::NumPadMinus) {
            Some((width - 1.0).max(1.0))
        } else {
            None
        };
        if let Some(px) = new_width {
            match board.set_width(px) {
                Ok(()) => window.show_pen(board.mode(), px),
                Err(e) => warn!(error = %e, "width unchanged"),
            }
        }

        // 3) Right click flips the mode for the next stroke.
        let right = window.right_down();
        if right && !was_right {
            let mode = board.toggle_erase_mode();
            window.show_pen(mode, board.style().width.get());
        }
        was_right = right;

        // 4) Left button edges become pointer events.
        let left = window.left_down();
        match window.pointer() {
            Some((x, y)) => {
                if left && !was_left {
                    board.pointer_down(x, y);
                } else if left {
                    board.pointer_move(x, y);
                } else if was_left {
                    board.pointer_up();
                }
            }
            None => {
                if board.engine().is_active() {
                    board.pointer_leave();
                }
            }
        }
        was_left = left;

        // 5) Show it.
        window.present(&board.frame(PAPER))?;
    }

    Ok(())
}

fn start_page_load(config: &Config) -> Option<PendingPage> {
    let path = config.page.as_ref()?;
    info!(path = %path.display(), "loading page");
    match spawn_load(path, AnyPageDecoder::default()) {
        Ok(pending) => Some(pending),
        Err(e) => {
            warn!(error = %e, "could not start page load");
            None
        }
    }
}
