use super::*;
use crate::content::catalog::TemplateKind;

const PROMPT: &str = "How to make money with AI in 2024";

#[test]
fn money_and_ai_resolves_to_finance() {
    let orch = Orchestrator::with_seed(CatalogConfig::builtin(), 1).unwrap();
    let (timeline, meta) = orch.compose(&ComposeRequest::new(PROMPT, 30.0)).unwrap();
    assert_eq!(meta.category, Category::Finance);
    assert_eq!(timeline.background.category, Category::Finance);
    assert_eq!(meta.optimization, "viral_shorts");
    assert_eq!(meta.duration, 30.0);
    assert_eq!(meta.fps, 30);
    assert!((0.0..=1.0).contains(&meta.engagement_score));
    assert_eq!(
        meta.script.opening,
        "In today's video, I'll show you how to make money with ai in 2024"
    );
}

#[test]
fn seeded_requests_are_reproducible() {
    let orch = Orchestrator::new(CatalogConfig::builtin()).unwrap();
    let req = ComposeRequest::new("Morning routine for better sleep", 30.0).seed(42);
    let (a, ma) = orch.compose(&req).unwrap();
    let (b, mb) = orch.compose(&req).unwrap();
    assert_eq!(ma.script, mb.script);
    assert_eq!(a.background, b.background);
    assert_eq!(a.background.synth.noise_seed, 42);
}

#[test]
fn duration_outside_range_is_invalid() {
    let orch = Orchestrator::with_seed(CatalogConfig::builtin(), 0).unwrap();
    for d in [0.0, 10.0, 61.0, f64::NAN] {
        let err = orch.compose(&ComposeRequest::new(PROMPT, d)).unwrap_err();
        assert!(matches!(err, ReelError::InvalidParameter(_)), "{d}: {err}");
    }
}

#[test]
fn empty_pool_is_a_configuration_error() {
    let mut catalog = CatalogConfig::builtin();
    catalog
        .entry_mut(Category::Finance)
        .unwrap()
        .pool_mut(TemplateKind::Hook)
        .clear();

    assert!(matches!(
        Orchestrator::new(catalog.clone()),
        Err(ReelError::Configuration(_))
    ));

    let mut rng = StdRng::seed_from_u64(3);
    let err = compose(
        &catalog,
        &ComposeSettings::default(),
        &ComposeRequest::new(PROMPT, 30.0),
        &mut rng,
    )
    .unwrap_err();
    assert!(matches!(err, ReelError::Configuration(_)));

    // Other categories are still usable with the free function.
    let ok = compose(
        &catalog,
        &ComposeSettings::default(),
        &ComposeRequest::new(PROMPT, 30.0).category(Category::Tech),
        &mut rng,
    );
    assert!(ok.is_ok());
}

#[test]
fn platform_request_clips_and_resizes() {
    let req = ComposeRequest::for_platform(PROMPT, 45.0, Platform::Tiktok);
    assert_eq!(req.duration, 30.0);
    assert_eq!(req.canvas, Canvas { width: 720, height: 1280 });
    let req = ComposeRequest::for_platform(PROMPT, 45.0, Platform::YoutubeShorts);
    assert_eq!(req.duration, 45.0);
}

#[test]
fn metadata_serializes_with_script() {
    let orch = Orchestrator::with_seed(CatalogConfig::builtin(), 9).unwrap();
    let (_, meta) = orch.compose(&ComposeRequest::new(PROMPT, 20.0)).unwrap();
    let json: serde_json::Value = serde_json::from_str(&meta.to_json_pretty().unwrap()).unwrap();
    assert_eq!(json["category"], "finance");
    assert_eq!(json["resolution"]["width"], 720);
    assert!(json["script"]["main_points"].as_array().is_some());
    assert_eq!(meta.frame_sequence().unwrap().frame_count(), 600);
}

#[test]
fn hook_override_is_scored() {
    let orch = Orchestrator::with_seed(CatalogConfig::builtin(), 5).unwrap();
    let mut req = ComposeRequest::new(PROMPT, 30.0);
    req.hook = Some("plain words".into());
    let (_, meta) = orch.compose(&req).unwrap();
    assert_eq!(meta.script.hook, "plain words");
    assert!((meta.engagement_score - 0.6).abs() < 1e-12);
}
