use crate::{
    animation::anim::Animation,
    background::motion::BackgroundMotion,
    background::synth::SynthParams,
    content::script::ScriptStructure,
    foundation::core::{Canvas, TimeSpan, ensure_positive_secs},
    foundation::error::{ReelError, ReelResult},
    render::overlay::{OverlayContent, TextStyle},
    timeline::dsl::{OverlayBuilder, TimelineBuilder},
    timeline::model::{Coord, Position, Timeline},
};

/// Slot widths used to tile a script over the clip.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayoutPolicy {
    pub hook_secs: f64,
    pub opening_secs: f64,
    pub cta_secs: f64,
    /// Retention line starts at this fraction of the clip (before clamping).
    pub retention_mark: f64,
    pub min_point_secs: f64,
    pub min_retention_secs: f64,
}

impl Default for LayoutPolicy {
    fn default() -> Self {
        Self {
            hook_secs: 3.0,
            opening_secs: 3.0,
            cta_secs: 3.0,
            retention_mark: 0.8,
            min_point_secs: 5.0,
            min_retention_secs: 1.0,
        }
    }
}

/// Time windows for every script part. Main points tile `[points_start, retention.start)`.
#[derive(Clone, Debug, PartialEq)]
pub struct SlotPlan {
    pub hook: TimeSpan,
    pub opening: TimeSpan,
    pub points: Vec<TimeSpan>,
    pub retention: TimeSpan,
    pub cta: TimeSpan,
}

impl LayoutPolicy {
    pub fn validate(&self) -> ReelResult<()> {
        ensure_positive_secs(self.hook_secs, "hook_secs")?;
        ensure_positive_secs(self.opening_secs, "opening_secs")?;
        ensure_positive_secs(self.cta_secs, "cta_secs")?;
        ensure_positive_secs(self.min_point_secs, "min_point_secs")?;
        ensure_positive_secs(self.min_retention_secs, "min_retention_secs")?;
        if !(self.retention_mark.is_finite() && (0.0..=1.0).contains(&self.retention_mark)) {
            return Err(ReelError::configuration("retention_mark must be in [0, 1]"));
        }
        Ok(())
    }

    /// Shortest clip that fits one main point.
    pub fn min_duration(&self) -> f64 {
        self.hook_secs + self.opening_secs + self.min_point_secs + self.min_retention_secs + self.cta_secs
    }

    /// Tile a clip of `duration` seconds with up to `available_points` main points.
    pub fn plan(&self, duration: f64, available_points: usize) -> ReelResult<SlotPlan> {
        self.validate()?;
        ensure_positive_secs(duration, "duration")?;
        if available_points == 0 {
            return Err(ReelError::configuration("no main points to lay out"));
        }
        if duration + 1e-9 < self.min_duration() {
            return Err(ReelError::invalid_parameter(format!(
                "duration {duration}s is shorter than the {}s layout minimum",
                self.min_duration()
            )));
        }

        let points_start = self.hook_secs + self.opening_secs;
        let cta_start = duration - self.cta_secs;
        let lo = points_start + self.min_point_secs;
        let hi = (cta_start - self.min_retention_secs).max(lo);
        let retention_start = (self.retention_mark * duration).round().clamp(lo, hi);

        let room = retention_start - points_start;
        let n = ((room / self.min_point_secs + 1e-9).floor() as usize).clamp(1, available_points);
        let width = room / n as f64;
        // Shared boundaries; the last one is pinned to the retention start.
        let bound = |i: usize| {
            if i == n {
                retention_start
            } else {
                points_start + i as f64 * width
            }
        };
        let points = (0..n)
            .map(|i| TimeSpan::between(bound(i), bound(i + 1)))
            .collect::<ReelResult<Vec<_>>>()?;

        Ok(SlotPlan {
            hook: TimeSpan::new(0.0, self.hook_secs)?,
            opening: TimeSpan::between(self.hook_secs, points_start)?,
            points,
            retention: TimeSpan::between(retention_start, cta_start)?,
            cta: TimeSpan::between(cta_start, duration)?,
        })
    }
}

/// Vertical placements, as fractions of a 720 px tall reference frame.
const HOOK_Y: f64 = 150.0 / 720.0;
const OPENING_Y: f64 = 350.0 / 720.0;
const POINT_Y: f64 = 400.0 / 720.0;
const POINT_STEP_Y: f64 = 50.0 / 720.0;
const RETENTION_Y: f64 = 200.0 / 720.0;
const CTA_Y: f64 = 600.0 / 720.0;

fn pulse() -> Animation {
    Animation::Pulse {
        amplitude: 0.1,
        angular_speed: 4.0,
    }
}

fn at_y(fraction: f64) -> Position {
    Position {
        x: Coord::Center,
        y: Coord::Fraction(fraction),
    }
}

/// Everything needed to turn a script into a [`Timeline`].
#[derive(Clone, Debug)]
pub struct TimelineSpec {
    pub canvas: Canvas,
    pub duration: f64,
    pub policy: LayoutPolicy,
    pub synth: SynthParams,
    pub motion: BackgroundMotion,
}

/// Lay out `script` as hook, opening, main points, retention line and CTA.
pub fn build_timeline(script: &ScriptStructure, spec: &TimelineSpec) -> ReelResult<Timeline> {
    let plan = spec.policy.plan(spec.duration, script.main_points.len())?;
    let style = |name: &str| TextStyle::preset(name).for_canvas(spec.canvas);
    let text = |id: String, body: &str, style_name: &str, span: TimeSpan, pos: Position| {
        let b = OverlayBuilder::new(id, OverlayContent::text(body, style(style_name)))
            .during(span)
            .position(pos);
        let b = match style_name {
            "title" | "cta" => b.animation(pulse()),
            _ => b,
        };
        b.build()
    };

    let mut builder = TimelineBuilder::new(spec.canvas, spec.duration, script.category)
        .synth(spec.synth)
        .motion(spec.motion)
        .element(text("hook".into(), &script.hook, "title", plan.hook, at_y(HOOK_Y))?)?
        .element(text(
            "opening".into(),
            &script.opening,
            "subtitle",
            plan.opening,
            at_y(OPENING_Y),
        )?)?;

    // Clips shorter than the full list drop middle points; the finale always stays last.
    let points = select_points(&script.main_points, plan.points.len());
    for (i, (point, span)) in points.iter().zip(&plan.points).enumerate() {
        let y = POINT_Y + (i % 4) as f64 * POINT_STEP_Y;
        builder = builder.element(text(format!("point-{i}"), point, "content", *span, at_y(y))?)?;
    }

    builder
        .element(text(
            "retention".into(),
            &script.retention,
            "subtitle",
            plan.retention,
            at_y(RETENTION_Y),
        )?)?
        .element(text("cta".into(), &script.call_to_action, "cta", plan.cta, at_y(CTA_Y))?)?
        .build()
}

fn select_points(points: &[String], n: usize) -> Vec<&str> {
    let Some((finale, lead)) = points.split_last() else {
        return Vec::new();
    };
    let n = n.clamp(1, points.len());
    lead.iter()
        .take(n - 1)
        .map(String::as_str)
        .chain(std::iter::once(finale.as_str()))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/layout.rs"]
mod tests;
