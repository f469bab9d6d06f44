use super::*;

#[test]
fn no_matches_equals_base_times_multiplier() {
    for category in Category::ALL {
        let s = score("plain words only", category);
        assert_eq!(s, 0.5 * multiplier(category));
    }
}

#[test]
fn increments_are_additive_before_the_multiplier() {
    // engagement: "secret" -> +0.10
    let s = score("the secret", Category::Lifestyle);
    assert!((s - 0.6).abs() < 1e-12);
    // emotional: "hate" -> +0.15, urgency: "now" -> +0.05
    let s = score("they hate it now", Category::Lifestyle);
    assert!((s - 0.7).abs() < 1e-12);
    // 0.6 * 1.1
    let s = score("secret", Category::Tech);
    assert!((s - 0.66).abs() < 1e-12);
}

#[test]
fn score_is_capped_at_one() {
    let hook = "SECRET shock amazing incredible proven guaranteed hate love crazy insane now";
    assert_eq!(score(hook, Category::Finance), 1.0);
}

#[test]
fn score_stays_in_unit_interval_for_any_input() {
    let inputs = [
        "",
        "Banks HATE this simple trick",
        "This ONE secret made me $10k in 30 days",
        "\u{1F4B0} unicode \u{00E9}t\u{00E9}",
        "now now now now",
    ];
    for hook in inputs {
        for category in Category::ALL {
            let s = score(hook, category);
            assert!((0.0..=1.0).contains(&s), "{hook:?} {category} -> {s}");
        }
    }
}

#[test]
fn hits_count_distinct_words() {
    let hits = ScoreHits::of("Banks HATE this secret trick before today");
    assert_eq!(
        hits,
        ScoreHits {
            engagement: 1,
            emotional: 1,
            urgency: 2,
        }
    );
}
