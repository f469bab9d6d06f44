use super::*;

fn canvas() -> Canvas {
    Canvas::new(64, 48).unwrap()
}

#[test]
fn presets_match_named_styles() {
    let t = TextStyle::preset("title");
    assert_eq!(t.font_size, 50.0);
    assert_eq!(t.fill, [255, 255, 255]);
    assert!(t.bold);
    assert_eq!(t.stroke_width, 3.0);

    let s = TextStyle::preset("Subtitle");
    assert_eq!(s.fill, [255, 255, 0]);
    assert!(!s.bold);

    assert_eq!(TextStyle::preset("cta").fill, [0, 255, 0]);
    assert_eq!(TextStyle::preset("nonsense"), TextStyle::content());
}

#[test]
fn styles_scale_with_canvas_width() {
    let s = TextStyle::title().for_canvas(Canvas::new(1440, 2560).unwrap());
    assert_eq!(s.font_size, 100.0);
    assert_eq!(s.stroke_width, 6.0);
}

#[test]
fn wrap_is_greedy_and_keeps_long_words() {
    assert_eq!(
        wrap_words("one two three four", 9),
        vec!["one two", "three", "four"]
    );
    assert_eq!(wrap_words("extraordinarily big", 5), vec!["extraordinarily", "big"]);
    assert!(wrap_words("   ", 10).is_empty());
}

#[test]
fn text_svg_escapes_markup() {
    let svg = OverlayContent::text("Tom & <Jerry>", TextStyle::content())
        .to_svg(Canvas::new(720, 1280).unwrap())
        .unwrap();
    assert!(svg.contains("Tom &amp; &lt;Jerry&gt;"));
    assert!(svg.contains(r#"fill="rgb(255,255,255)""#));
    assert!(svg.contains(r#"stroke="rgb(255,0,0)""#));
}

#[test]
fn wrapped_text_emits_one_text_node_per_line() {
    let style = TextStyle {
        max_width: Some(10.5 * TextStyle::content().char_width()),
        ..TextStyle::content()
    };
    let body = "one two three four five six";
    let expected = wrap_words(body, 10).len();
    assert!(expected > 1);
    let svg = OverlayContent::text(body, style).to_svg(canvas()).unwrap();
    assert_eq!(svg.matches("<text ").count(), expected);
    assert!(svg.starts_with("<svg ") && svg.ends_with("</svg>"));
    assert!(usvg::Tree::from_str(&svg, &usvg::Options::default()).is_ok());
}

#[test]
fn empty_content_is_rejected() {
    let c = canvas();
    assert!(OverlayContent::text("  ", TextStyle::content()).to_svg(c).is_err());
    assert!(OverlayContent::rect(0.0, 4.0, [1, 2, 3]).to_svg(c).is_err());
    assert!(
        OverlayContent::Svg {
            markup: String::new()
        }
        .to_svg(c)
        .is_err()
    );
}

#[test]
fn shape_draws_exact_pixels() {
    let fonts = FontLibrary::system();
    let prepared =
        PreparedOverlay::prepare(&OverlayContent::rect(10.0, 6.0, [200, 10, 20]), canvas(), &fonts)
            .unwrap();
    assert_eq!(prepared.size(), Vec2::new(10.0, 6.0));

    let mut frame = FrameRgb8::black(canvas()).unwrap();
    prepared
        .draw(&mut frame, Affine::translate((4.0, 5.0)), 1.0)
        .unwrap();
    assert_eq!(frame.pixel(4, 5), Some([200, 10, 20]));
    assert_eq!(frame.pixel(13, 10), Some([200, 10, 20]));
    assert_eq!(frame.pixel(14, 5), Some([0, 0, 0]));
    assert_eq!(frame.pixel(3, 5), Some([0, 0, 0]));
}

#[test]
fn offscreen_and_invisible_draws_are_noops() {
    let fonts = FontLibrary::system();
    let prepared =
        PreparedOverlay::prepare(&OverlayContent::rect(10.0, 10.0, [255, 255, 255]), canvas(), &fonts)
            .unwrap();
    let mut frame = FrameRgb8::black(canvas()).unwrap();
    prepared
        .draw(&mut frame, Affine::translate((500.0, 500.0)), 1.0)
        .unwrap();
    prepared.draw(&mut frame, Affine::IDENTITY, 0.0).unwrap();
    assert!(frame.data.iter().all(|&v| v == 0));
}

#[test]
fn partially_visible_shape_is_clipped() {
    let fonts = FontLibrary::system();
    let prepared =
        PreparedOverlay::prepare(&OverlayContent::rect(10.0, 10.0, [255, 255, 255]), canvas(), &fonts)
            .unwrap();
    let mut frame = FrameRgb8::black(canvas()).unwrap();
    prepared
        .draw(&mut frame, Affine::translate((-5.0, 60.0 - 20.0)), 1.0)
        .unwrap();
    assert_eq!(frame.pixel(0, 40), Some([255, 255, 255]));
    assert_eq!(frame.pixel(4, 47), Some([255, 255, 255]));
    assert_eq!(frame.pixel(5, 40), Some([0, 0, 0]));
}

#[test]
fn raw_svg_is_accepted() {
    let markup = r#"<svg xmlns="http://www.w3.org/2000/svg" width="8" height="8"><circle cx="4" cy="4" r="4" fill="blue"/></svg>"#;
    let prepared = PreparedOverlay::prepare(
        &OverlayContent::Svg {
            markup: markup.to_string(),
        },
        canvas(),
        &FontLibrary::system(),
    )
    .unwrap();
    assert_eq!(prepared.size(), Vec2::new(8.0, 8.0));
}

#[test]
fn malformed_svg_is_invalid_parameter() {
    let err = PreparedOverlay::prepare(
        &OverlayContent::Svg {
            markup: "<svg".to_string(),
        },
        canvas(),
        &FontLibrary::system(),
    )
    .unwrap_err();
    assert!(matches!(err, ReelError::InvalidParameter(_)));
}
