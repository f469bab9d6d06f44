use super::*;
use crate::{
    animation::anim::Animation,
    background::motion::BackgroundMotion,
    background::synth::SynthParams,
    content::category::Category,
    render::overlay::OverlayContent,
    timeline::dsl::{OverlayBuilder, TimelineBuilder},
    timeline::model::Position,
};

const RED: [u8; 3] = [255, 0, 0];
const BLUE: [u8; 3] = [0, 0, 255];

fn square(id: &str, fill: [u8; 3], start: f64, duration: f64) -> OverlayElement {
    square_at(id, fill, start, duration, Position::px(10.0, 10.0))
}

fn square_at(id: &str, fill: [u8; 3], start: f64, duration: f64, at: Position) -> OverlayElement {
    OverlayBuilder::new(id, OverlayContent::rect(20.0, 20.0, fill))
        .span(start, duration)
        .position(at)
        .build()
        .unwrap()
}

fn compositor(elements: Vec<OverlayElement>) -> Compositor {
    let mut b = TimelineBuilder::new(Canvas::new(64, 64).unwrap(), 10.0, Category::Tech)
        .synth(SynthParams::default().without_noise())
        .motion(BackgroundMotion::still());
    for e in elements {
        b = b.element(e).unwrap();
    }
    Compositor::new(b.build().unwrap(), &CatalogConfig::builtin(), &FontLibrary::system()).unwrap()
}

#[test]
fn half_open_windows_pick_the_right_element() {
    let c = compositor(vec![
        square("a", RED, 0.0, 5.0),
        square_at("b", BLUE, 5.0, 5.0, Position::px(36.0, 36.0)),
    ]);
    assert_eq!(c.render(2.0).unwrap().pixel(20, 20), Some(RED));
    let bg_before = c.render_background(2.0).unwrap();
    assert_eq!(c.render(2.0).unwrap().pixel(46, 46), bg_before.pixel(46, 46));

    let frame = c.render(5.0).unwrap();
    let bg = c.render_background(5.0).unwrap();
    assert_eq!(frame.pixel(20, 20), bg.pixel(20, 20));
    assert_ne!(frame.pixel(20, 20), Some(RED));
    assert_eq!(frame.pixel(46, 46), Some(BLUE));
}

#[test]
fn last_declared_wins_on_overlap() {
    let c = compositor(vec![square("a", RED, 0.0, 10.0), square("b", BLUE, 0.0, 10.0)]);
    assert_eq!(c.render(3.0).unwrap().pixel(15, 15), Some(BLUE));
}

#[test]
fn inactive_regions_show_background() {
    let c = compositor(vec![square("a", RED, 0.0, 5.0)]);
    let frame = c.render(6.0).unwrap();
    let bg = c.render_background(6.0).unwrap();
    assert_eq!(frame, bg);
}

#[test]
fn zero_opacity_animation_hides_element() {
    let hidden = OverlayBuilder::new("h", OverlayContent::rect(20.0, 20.0, RED))
        .span(0.0, 10.0)
        .position(Position::px(10.0, 10.0))
        .animation(Animation::FadeIn {
            secs: 2.0,
            ease: crate::animation::ease::Ease::Linear,
        })
        .build()
        .unwrap();
    let c = compositor(vec![hidden]);
    let frame = c.render(0.0).unwrap();
    assert_eq!(frame, c.render_background(0.0).unwrap());
}

#[test]
fn scale_animation_pivots_on_element_center() {
    let grown = OverlayBuilder::new("g", OverlayContent::rect(20.0, 20.0, RED))
        .span(0.0, 10.0)
        .position(Position::px(20.0, 20.0))
        .animation(Animation::custom(|_| ElementTransform {
            scale: 1.5,
            ..ElementTransform::IDENTITY
        }))
        .build()
        .unwrap();
    let c = compositor(vec![grown]);
    let frame = c.render(1.0).unwrap();
    // 20px square centered at (30, 30) scaled to 30px covers [15, 45).
    assert_eq!(frame.pixel(16, 16), Some(RED));
    assert_eq!(frame.pixel(43, 43), Some(RED));
    assert_ne!(frame.pixel(13, 30), Some(RED));
}

#[test]
fn timestamps_outside_clip_are_rejected() {
    let c = compositor(vec![]);
    assert!(matches!(c.render(-0.1), Err(ReelError::InvalidParameter(_))));
    assert!(c.render(10.5).is_err());
    assert!(c.render(f64::NAN).is_err());
    assert!(c.render(10.0).is_ok());
}

#[test]
fn crossfade_darkens_clip_edges() {
    let b = TimelineBuilder::new(Canvas::new(16, 16).unwrap(), 10.0, Category::Finance)
        .synth(SynthParams::default().without_noise())
        .motion(BackgroundMotion::default());
    let c = Compositor::new(b.build().unwrap(), &CatalogConfig::builtin(), &FontLibrary::system())
        .unwrap();
    assert!(c.render(0.0).unwrap().data.iter().all(|&v| v == 0));
    let mid = c.render(5.0).unwrap().mean_rgb();
    assert!(mid[1] > 10.0);
}
