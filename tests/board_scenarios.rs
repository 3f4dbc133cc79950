use std::collections::{HashSet, VecDeque};
use std::io::Cursor;

use image::RgbaImage;
use ink_board::{Error, Mode, Rgba, Surface, Whiteboard};

fn png(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, image::Rgba(color));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

/// One-page PDF whose page content stream is `content`.
fn pdf(width: u32, height: u32, content: &str) -> Vec<u8> {
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {width} {height}] \
             /Resources << >> /Contents 4 0 R >>"
        ),
        format!("<< /Length {} >>\nstream\n{content}\nendstream", content.len()),
    ];
    let mut out = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::new();
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
    }
    let xref = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).as_bytes());
    for off in offsets {
        out.extend_from_slice(format!("{off:010} 00000 n \n").as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref}\n%%EOF\n",
            objects.len() + 1
        )
        .as_bytes(),
    );
    out
}

fn painted(surface: &Surface) -> HashSet<(i32, i32)> {
    let mut out = HashSet::new();
    for y in 0..surface.height() as i32 {
        for x in 0..surface.width() as i32 {
            if surface.get(x, y).is_some_and(|p| p.a > 0) {
                out.insert((x, y));
            }
        }
    }
    out
}

/// 8-connected flood fill over `set` starting at `from`.
fn reachable(set: &HashSet<(i32, i32)>, from: (i32, i32)) -> HashSet<(i32, i32)> {
    let mut seen = HashSet::from([from]);
    let mut queue = VecDeque::from([from]);
    while let Some((x, y)) = queue.pop_front() {
        for dy in -1..=1 {
            for dx in -1..=1 {
                let n = (x + dx, y + dy);
                if set.contains(&n) && seen.insert(n) {
                    queue.push_back(n);
                }
            }
        }
    }
    seen
}

#[test]
fn click_without_moving_leaves_a_dot() {
    let mut board = Whiteboard::new(800, 600);
    board.set_width(4.0).unwrap();
    board.pointer_down(100.0, 100.0);
    board.pointer_up();

    let hits = painted(board.surface());
    let expected: HashSet<(i32, i32)> = (95..105)
        .flat_map(|y| (95..105).map(move |x| (x, y)))
        .filter(|&(x, y)| {
            let (cx, cy) = (x as f32 + 0.5 - 100.0, y as f32 + 0.5 - 100.0);
            cx * cx + cy * cy <= 4.0
        })
        .collect();
    assert_eq!(hits, expected);
    assert_eq!(hits.len(), 12);
    for &(x, y) in &hits {
        assert_eq!(board.surface().get(x, y), Some(Rgba::BLACK));
    }
}

#[test]
fn drawn_path_is_connected_despite_big_jumps() {
    let mut board = Whiteboard::new(400, 300);
    let path = [
        (10.0, 10.0),
        (390.0, 20.0),
        (15.0, 290.0),
        (200.0, 150.0),
        (201.0, 151.0),
        (380.0, 280.0),
    ];
    board.pointer_down(path[0].0, path[0].1);
    for &(x, y) in &path[1..] {
        board.pointer_move(x, y);
    }
    board.pointer_up();

    let hits = painted(board.surface());
    let start = (10, 10);
    let end = (380, 280);
    assert!(hits.contains(&start) && hits.contains(&end));
    assert!(reachable(&hits, start).contains(&end));
}

#[test]
fn erasing_touches_only_the_swept_band() {
    let mut board = Whiteboard::new(200, 100);
    board.composite(&png(200, 100, [30, 60, 90, 255])).unwrap();
    board.set_mode(Mode::Erase);
    board.set_width(2.0).unwrap();
    board.pointer_down(20.0, 50.0);
    board.pointer_move(180.0, 50.0);
    board.pointer_up();

    let s = board.surface();
    // Radius 4 band around y = 50.
    assert_eq!(s.get(100, 46), Some(Rgba::TRANSPARENT));
    assert_eq!(s.get(100, 53), Some(Rgba::TRANSPARENT));
    assert_eq!(s.get(100, 44), Some(Rgba::opaque(30, 60, 90)));
    assert_eq!(s.get(100, 55), Some(Rgba::opaque(30, 60, 90)));
    assert_eq!(s.get(10, 50), Some(Rgba::opaque(30, 60, 90)));
}

#[test]
fn page_lands_centred_and_scaled_on_empty_board() {
    let mut board = Whiteboard::new(800, 600);
    let placement = board.composite(&png(400, 800, [120, 130, 140, 255])).unwrap();

    assert_eq!(placement.scale, 0.75);
    assert_eq!((placement.scaled_width, placement.scaled_height), (300, 600));
    assert_eq!((placement.offset_x, placement.offset_y), (250, 0));

    let s = board.surface();
    let page = Rgba::opaque(120, 130, 140);
    assert_eq!(s.get(250, 0), Some(page));
    assert_eq!(s.get(549, 599), Some(page));
    assert_eq!(s.get(249, 300), Some(Rgba::TRANSPARENT));
    assert_eq!(s.get(550, 300), Some(Rgba::TRANSPARENT));
    assert_eq!(painted(s).len(), 300 * 600);
}

#[test]
fn pdf_first_page_lands_like_an_image() {
    let mut board = Whiteboard::new(800, 600);
    board.pointer_down(20.0, 20.0);
    board.pointer_move(60.0, 20.0);
    board.pointer_up();

    // 200x100pt black box, 100pt from the left and top of a 400x800pt page.
    let bytes = pdf(400, 800, "0 0 0 rg 100 600 200 100 re f");
    let placement = board.composite(&bytes).unwrap();
    assert_eq!((placement.scaled_width, placement.scaled_height), (300, 600));
    assert_eq!((placement.offset_x, placement.offset_y), (250, 0));

    let s = board.surface();
    assert_eq!(s.get(400, 110), Some(Rgba::BLACK));
    assert_eq!(s.get(260, 10), Some(Rgba::WHITE));
    assert_eq!(s.get(400, 400), Some(Rgba::WHITE));
    assert_eq!(s.get(100, 300), Some(Rgba::TRANSPARENT));
    // Ink drawn before the page is still there.
    assert_eq!(s.get(40, 19), Some(Rgba::BLACK));
}

#[test]
fn stroke_stays_visible_over_composited_page() {
    let mut board = Whiteboard::new(300, 200);
    let red = Rgba::opaque(220, 0, 0);
    board.set_color(red);
    board.set_width(6.0).unwrap();
    board.pointer_down(40.0, 100.0);
    board.pointer_move(260.0, 100.0);
    board.pointer_up();
    let ink = board.surface().clone();
    let inked = painted(&ink);

    let placement = board.composite(&png(300, 200, [250, 250, 240, 255])).unwrap();
    let s = board.surface();
    for y in 0..200 {
        for x in 0..300 {
            let px = s.get(x, y).unwrap();
            if inked.contains(&(x, y)) {
                assert_eq!(px, red, "ink lost at ({x}, {y})");
            } else if placement.contains(x, y) {
                assert_eq!(px, Rgba::opaque(250, 250, 240), "page missing at ({x}, {y})");
            }
        }
    }
}

#[test]
fn compositing_twice_is_stable() {
    let mut board = Whiteboard::new(160, 120);
    board.pointer_down(30.0, 30.0);
    board.pointer_move(120.0, 90.0);
    board.pointer_up();
    // Semi-transparent source pixels get flattened onto paper, so a repeat adds nothing.
    let bytes = png(90, 70, [0, 120, 255, 100]);

    board.composite(&bytes).unwrap();
    let once = board.surface().clone();
    board.composite(&bytes).unwrap();
    assert_eq!(board.surface(), &once);
}

#[test]
fn failed_composite_changes_nothing() {
    let mut board = Whiteboard::new(64, 48);
    board.pointer_down(10.0, 10.0);
    board.pointer_move(50.0, 40.0);
    let before = board.surface().clone();

    let err = board.composite(b"definitely not a page").unwrap_err();
    assert!(matches!(err, Error::PageDecode(_)));
    assert_eq!(board.surface(), &before);
    // The stroke in progress carries on.
    assert!(board.engine().is_active());
}

#[test]
fn toggling_twice_is_a_round_trip() {
    let mut board = Whiteboard::new(50, 50);
    board.pointer_down(25.0, 25.0);
    board.pointer_up();
    let before = board.surface().clone();

    assert_eq!(board.toggle_erase_mode(), Mode::Erase);
    assert_eq!(board.toggle_erase_mode(), Mode::Draw);
    assert_eq!(board.surface(), &before);
}

#[test]
fn clear_then_draw_starts_from_blank() {
    let mut board = Whiteboard::new(50, 50);
    board.composite(&png(50, 50, [0, 0, 0, 255])).unwrap();
    board.clear_surface();
    assert!(painted(board.surface()).is_empty());
}
