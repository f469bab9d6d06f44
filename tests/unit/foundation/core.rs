use super::*;

#[test]
fn time_span_is_half_open() {
    let s = TimeSpan::new(2.0, 3.0).unwrap();
    assert!(!s.contains(1.999));
    assert!(s.contains(2.0));
    assert!(s.contains(4.999));
    assert!(!s.contains(5.0));
    assert_eq!(s.elapsed(3.5), 1.5);
}

#[test]
fn time_span_rejects_non_positive_duration() {
    assert!(matches!(
        TimeSpan::new(0.0, 0.0),
        Err(ReelError::InvalidParameter(_))
    ));
    assert!(TimeSpan::new(0.0, -1.0).is_err());
    assert!(TimeSpan::new(f64::NAN, 1.0).is_err());
    assert!(TimeSpan::new(-2.0, 1.0).is_ok());
}

#[test]
fn between_keeps_exact_bounds() {
    let s = TimeSpan::between(0.1, 0.7).unwrap();
    assert_eq!(s.end(), 0.7);
    assert!(!s.contains(0.7));
    assert!(TimeSpan::between(1.0, 1.0).is_err());
    assert!(TimeSpan::between(0.0, f64::INFINITY).is_err());
}

#[test]
fn adjacent_spans_do_not_overlap() {
    let a = TimeSpan::new(0.0, 5.0).unwrap();
    let b = TimeSpan::new(5.0, 5.0).unwrap();
    assert!(!a.overlaps(b));
    assert!(a.overlaps(TimeSpan::new(4.0, 2.0).unwrap()));
}

#[test]
fn canvas_validation_and_display() {
    assert!(Canvas::new(0, 10).is_err());
    let c = Canvas::new(720, 1280).unwrap();
    assert_eq!(c.to_string(), "720x1280");
    assert_eq!(c.pixel_count(), 720 * 1280);
    assert_eq!(c.center(), Vec2::new(360.0, 640.0));
}

#[test]
fn transform_to_affine_identity_and_translation() {
    let t = Transform2D::default();
    assert_eq!(t.to_affine(), Affine::IDENTITY);

    let t = Transform2D {
        translate: Vec2::new(10.0, -2.5),
        ..Transform2D::default()
    };
    assert_eq!(t.to_affine(), Affine::translate(Vec2::new(10.0, -2.5)));
}

#[test]
fn anchored_scale_keeps_pivot_fixed() {
    let t = Transform2D {
        scale: Vec2::new(2.0, 2.0),
        anchor: Vec2::new(5.0, 5.0),
        ..Transform2D::default()
    };
    let p = t.to_affine() * Point::new(5.0, 5.0);
    assert!((p.x - 5.0).abs() < 1e-9 && (p.y - 5.0).abs() < 1e-9);
}
