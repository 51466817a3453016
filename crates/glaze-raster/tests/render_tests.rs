//! Paints of styled boxes rasterized with tiny-skia, checked pixel by pixel.

use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use glaze_css::paint::background::paint_background;
use glaze_css::paint::border::paint_border;
use glaze_css::paint::render::{render_check, render_layout};
use glaze_css::values::Image;
use glaze_css::{
    ComputedStyle, CornerMaskCache, CssProvider, JunctionSides, PropertyId, Resolver, SideFlags,
    StateFlags, StyleNode, TextLayout,
};
use glaze_raster::{FileImageLoader, FontLayout, PixmapCanvas, system_font};

fn style(css: &str) -> Rc<ComputedStyle> {
    Resolver::new(CssProvider::from_data(css)).style_for(&StyleNode::new("box"))
}

fn paint_box(style: &ComputedStyle, canvas: &mut PixmapCanvas, x: f64, y: f64, width: f64, height: f64) {
    let mut cache = CornerMaskCache::new();
    paint_background(style, canvas, x, y, width, height, JunctionSides::empty(), &mut cache);
    paint_border(style, canvas, x, y, width, height, SideFlags::empty(), JunctionSides::empty());
}

const WHITE: [u8; 4] = [255, 255, 255, 255];
const BLACK: [u8; 4] = [0, 0, 0, 255];

#[test]
fn test_rounded_box_pixels() {
    let style = style(
        "box {
            border: 2px solid rgba(0, 0, 0, 1);
            background-color: rgba(255, 255, 255, 1);
            border-radius: 8px;
        }",
    );
    let mut canvas = PixmapCanvas::new(100, 40).unwrap();
    paint_box(&style, &mut canvas, 0.0, 0.0, 100.0, 40.0);

    assert_eq!(canvas.pixel(50, 20), WHITE);
    assert_eq!(canvas.pixel(50, 0), BLACK);
    assert_eq!(canvas.pixel(50, 1), BLACK);
    assert_eq!(canvas.pixel(50, 38), BLACK);
    assert_eq!(canvas.pixel(0, 20), BLACK);
    assert_eq!(canvas.pixel(50, 2), WHITE);
    // Outside the rounded corners nothing is painted.
    assert_eq!(canvas.pixel(0, 0), [0; 4]);
    assert_eq!(canvas.pixel(99, 39), [0; 4]);
}

#[test]
fn test_drop_shadow_pixels() {
    let style = style(
        "box {
            border: 2px solid rgba(0, 0, 0, 1);
            background-color: rgba(255, 255, 255, 1);
            border-radius: 8px;
            box-shadow: 0 2px 4px rgba(0, 0, 0, 0.5);
        }",
    );
    let mut canvas = PixmapCanvas::new(120, 60).unwrap();
    paint_box(&style, &mut canvas, 10.0, 10.0, 100.0, 40.0);

    // The box covers its shadow.
    assert_eq!(canvas.pixel(60, 30), WHITE);

    let below = canvas.pixel(60, 51);
    let above = canvas.pixel(60, 9);
    assert!(below[3] > 0);
    assert_eq!(&below[..3], &[0, 0, 0]);
    assert!(below[3] > above[3]);
    assert!(below[3] <= 128);
}

#[test]
fn test_check_mark_pixels() {
    let style = style("box { color: rgba(0, 0, 0, 1); }");
    let node = StyleNode::new("box");
    node.set_state(StateFlags::CHECKED);

    let mut canvas = PixmapCanvas::new(16, 16).unwrap();
    render_check(&style, &node, &mut canvas, 0.0, 0.0, 16.0, 16.0);

    let mut inked = 0;
    for y in 0..16 {
        for x in 0..16 {
            let [r, g, b, a] = canvas.pixel(x, y);
            assert_eq!((r, g, b), (0, 0, 0));
            if a > 0 {
                // Everything lies in the clipped 11px interior.
                assert!((2..13).contains(&x) && (2..13).contains(&y), "ink at {x},{y}");
            }
            if a >= 128 {
                inked += 1;
            }
        }
    }
    assert!(inked >= 8);
}

#[test]
fn test_check_mark_pixels_are_reproducible() {
    let style = style("box { color: black; }");
    let node = StyleNode::new("box");
    node.set_state(StateFlags::CHECKED);
    let draw = || {
        let mut canvas = PixmapCanvas::new(16, 16).unwrap();
        render_check(&style, &node, &mut canvas, 0.0, 0.0, 16.0, 16.0);
        canvas.into_pixmap().take()
    };
    assert_eq!(draw(), draw());
}

#[test]
fn test_double_border_pixels() {
    let style = style("box { border: 4px double rgba(0, 0, 0, 1); }");
    let mut canvas = PixmapCanvas::new(20, 20).unwrap();
    paint_border(
        &style,
        &mut canvas,
        0.0,
        0.0,
        20.0,
        20.0,
        SideFlags::empty(),
        JunctionSides::empty(),
    );
    // Stripes at 0..1 and 3..4 from the top, a gap in between.
    assert_eq!(canvas.pixel(10, 0), BLACK);
    assert_eq!(canvas.pixel(10, 1), [0; 4]);
    assert_eq!(canvas.pixel(10, 2), [0; 4]);
    assert_eq!(canvas.pixel(10, 3), BLACK);
    assert_eq!(canvas.pixel(10, 10), [0; 4]);
}

#[test]
fn test_linear_gradient_background() {
    let style = style(
        "box { background-image: -glaze-gradient(linear, left top, right top, from(black), to(white)); }",
    );
    let mut canvas = PixmapCanvas::new(100, 10).unwrap();
    paint_box(&style, &mut canvas, 0.0, 0.0, 100.0, 10.0);
    let left = canvas.pixel(1, 5);
    let middle = canvas.pixel(50, 5);
    let right = canvas.pixel(98, 5);
    assert!(left[0] < middle[0] && middle[0] < right[0]);
    assert!((120..=136).contains(&middle[0]));
}

fn theme_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("glaze-raster-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("dot.svg"),
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="4"><rect width="4" height="4" fill="#0000ff"/></svg>"##,
    )
    .unwrap();
    dir
}

#[test]
fn test_url_background_through_file_loader() {
    let dir = theme_dir();
    let mut provider = CssProvider::from_data(
        "box { background-image: url(dot.svg); background-repeat: no-repeat; background-position: 2px 2px; }
         label { background-image: url(missing.png); }",
    );
    provider.set_image_loader(Box::new(FileImageLoader::new(&dir)));
    let mut resolver = Resolver::new(provider);

    let style = resolver.style_for(&StyleNode::new("box"));
    assert!(matches!(
        style.image(PropertyId::BackgroundImage),
        Some(Image::Url { surface: Some(_), .. })
    ));
    let mut canvas = PixmapCanvas::new(10, 10).unwrap();
    paint_box(&style, &mut canvas, 0.0, 0.0, 10.0, 10.0);
    assert_eq!(canvas.pixel(3, 3), [0, 0, 255, 255]);
    assert_eq!(canvas.pixel(0, 0), [0; 4]);
    assert_eq!(canvas.pixel(7, 7), [0; 4]);

    let style = resolver.style_for(&StyleNode::new("label"));
    assert!(style.image(PropertyId::BackgroundImage).is_some_and(Image::is_none));

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn test_text_with_shadow() {
    // Hosts without a system font have nothing to draw.
    let Some(font) = system_font() else {
        return;
    };
    let layout = FontLayout::new(Rc::new(font), "Glaze", 16.0);
    assert!(!layout.pixel_extents().is_empty());
    assert!(layout.logical_size().0 > 0.0);

    let style = style("box { color: white; text-shadow: 2px 2px 3px black; }");
    let mut canvas = PixmapCanvas::new(80, 30).unwrap();
    render_layout(&style, &mut canvas, 4.0, 4.0, &layout);

    let mut white = 0;
    let mut shadow = 0;
    for y in 0..30 {
        for x in 0..80 {
            let [r, _, _, a] = canvas.pixel(x, y);
            if a > 200 && r > 200 {
                white += 1;
            } else if a > 0 && r < a {
                shadow += 1;
            }
        }
    }
    assert!(white > 0);
    assert!(shadow > 0);

    // The blurred mask is cached on the layout.
    assert_eq!(layout.shadow_cache().len(), 1);
    let serial = layout.serial();
    let mut canvas = PixmapCanvas::new(80, 30).unwrap();
    render_layout(&style, &mut canvas, 4.0, 4.0, &layout);
    assert_eq!(layout.serial(), serial);
    assert_eq!(layout.shadow_cache().len(), 1);
}

#[test]
fn test_relayout_changes_serial() {
    let Some(font) = system_font() else {
        return;
    };
    let mut layout = FontLayout::new(Rc::new(font), "a", 12.0);
    let serial = layout.serial();
    layout.set_text("ab");
    assert_ne!(layout.serial(), serial);
    let serial = layout.serial();
    layout.set_text("ab");
    assert_eq!(layout.serial(), serial);
}
