use super::*;
use crate::content::category::Category;

fn script(points: usize) -> ScriptStructure {
    let mut main_points: Vec<String> = (0..points.saturating_sub(1))
        .map(|i| format!("Point {i}"))
        .collect();
    main_points.push("Finale".to_string());
    ScriptStructure {
        hook: "Banks HATE this simple trick".into(),
        opening: "In today's video, I'll show you saving".into(),
        main_points,
        retention: "But here's where it gets interesting...".into(),
        call_to_action: "Follow for more secrets like this!".into(),
        category: Category::Finance,
        engagement_score: 0.6,
    }
}

fn spec(duration: f64) -> TimelineSpec {
    TimelineSpec {
        canvas: Canvas::new(720, 1280).unwrap(),
        duration,
        policy: LayoutPolicy::default(),
        synth: SynthParams::default(),
        motion: BackgroundMotion::default(),
    }
}

#[test]
fn thirty_seconds_matches_classic_layout() {
    let plan = LayoutPolicy::default().plan(30.0, 8).unwrap();
    assert_eq!(plan.hook, TimeSpan::new(0.0, 3.0).unwrap());
    assert_eq!(plan.opening, TimeSpan::new(3.0, 3.0).unwrap());
    let starts: Vec<f64> = plan.points.iter().map(|p| p.start).collect();
    assert_eq!(starts, vec![6.0, 12.0, 18.0]);
    assert!(plan.points.iter().all(|p| p.duration() == 6.0));
    assert_eq!(plan.retention, TimeSpan::new(24.0, 3.0).unwrap());
    assert_eq!(plan.cta, TimeSpan::new(27.0, 3.0).unwrap());
}

#[test]
fn slots_tile_without_gaps_for_every_duration() {
    let policy = LayoutPolicy::default();
    for tenths in 150..=600 {
        let d = f64::from(tenths) / 10.0;
        for available in 1..=8 {
            let plan = policy.plan(d, available).unwrap();
            assert_eq!(plan.hook.end, plan.opening.start);
            let mut cursor = plan.opening.end;
            for p in &plan.points {
                assert_eq!(p.start, cursor, "gap or overlap before point at {d}s");
                assert!(p.duration() >= policy.min_point_secs - 1e-9);
                cursor = p.end;
            }
            assert_eq!(plan.retention.start, cursor, "last point vs retention at {d}s");
            assert_eq!(plan.retention.end, plan.cta.start);
            assert_eq!(plan.cta.end, d);
        }
    }
}

#[test]
fn point_boundary_instant_shows_exactly_one_slot() {
    let plan = LayoutPolicy::default().plan(26.9, 3).unwrap();
    let last = plan.points[plan.points.len() - 1];
    let instants = [last.end, f64::from_bits(last.end.to_bits() - 1)];
    for t in instants {
        let visible = plan.points.iter().filter(|p| p.contains(t)).count()
            + usize::from(plan.retention.contains(t));
        assert_eq!(visible, 1, "at t={t}");
    }
}

#[test]
fn point_count_is_limited_by_available_points() {
    let plan = LayoutPolicy::default().plan(60.0, 2).unwrap();
    assert_eq!(plan.points.len(), 2);
    assert_eq!(plan.points[0].duration(), 21.0);
}

#[test]
fn too_short_durations_are_rejected() {
    assert!(matches!(
        LayoutPolicy::default().plan(14.0, 8),
        Err(ReelError::InvalidParameter(_))
    ));
    assert!(LayoutPolicy::default().plan(15.0, 8).is_ok());
}

#[test]
fn timeline_orders_hook_first_and_cta_last() {
    let tl = build_timeline(&script(8), &spec(30.0)).unwrap();
    let ids: Vec<&str> = tl.elements.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["hook", "opening", "point-0", "point-1", "point-2", "retention", "cta"]
    );
    assert!(tl.element("hook").unwrap().animation.is_some());
    assert!(tl.element("cta").unwrap().animation.is_some());
    assert!(tl.element("opening").unwrap().animation.is_none());
    assert_eq!(tl.background.category, Category::Finance);
}

#[test]
fn finale_is_always_the_last_point() {
    let tl = build_timeline(&script(8), &spec(30.0)).unwrap();
    match &tl.element("point-2").unwrap().content {
        OverlayContent::Text { text, .. } => assert_eq!(text, "Finale"),
        other => panic!("unexpected content {other:?}"),
    }
}
