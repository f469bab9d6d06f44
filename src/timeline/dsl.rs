use crate::{
    animation::anim::Animation,
    background::motion::BackgroundMotion,
    background::synth::SynthParams,
    content::category::Category,
    foundation::core::{Canvas, TimeSpan},
    foundation::error::{ReelError, ReelResult},
    render::overlay::{OverlayContent, TextStyle},
    timeline::model::{BackgroundSpec, OverlayElement, Position, Timeline},
};

pub struct TimelineBuilder {
    canvas: Canvas,
    duration: f64,
    background: BackgroundSpec,
    elements: Vec<OverlayElement>,
}

impl TimelineBuilder {
    pub fn new(canvas: Canvas, duration: f64, category: Category) -> Self {
        Self {
            canvas,
            duration,
            background: BackgroundSpec::new(category),
            elements: Vec::new(),
        }
    }

    pub fn synth(mut self, params: SynthParams) -> Self {
        self.background.synth = params;
        self
    }

    pub fn motion(mut self, motion: BackgroundMotion) -> Self {
        self.background.motion = motion;
        self
    }

    pub fn element(mut self, element: OverlayElement) -> ReelResult<Self> {
        if self.elements.iter().any(|e| e.id == element.id) {
            return Err(ReelError::invalid_parameter(format!(
                "duplicate overlay id '{}'",
                element.id
            )));
        }
        self.elements.push(element);
        Ok(self)
    }

    /// Text overlay with a named style preset scaled to the canvas.
    pub fn text(
        self,
        id: impl Into<String>,
        text: impl Into<String>,
        style: &str,
        start: f64,
        duration: f64,
    ) -> ReelResult<Self> {
        let style = TextStyle::preset(style).for_canvas(self.canvas);
        let element = OverlayBuilder::new(id, OverlayContent::text(text, style))
            .span(start, duration)
            .build()?;
        self.element(element)
    }

    pub fn build(self) -> ReelResult<Timeline> {
        let timeline = Timeline {
            canvas: self.canvas,
            duration: self.duration,
            background: self.background,
            elements: self.elements,
        };
        timeline.validate()?;
        Ok(timeline)
    }
}

pub struct OverlayBuilder {
    id: String,
    content: OverlayContent,
    span: Option<ReelResult<TimeSpan>>,
    position: Position,
    animation: Option<Animation>,
}

impl OverlayBuilder {
    pub fn new(id: impl Into<String>, content: OverlayContent) -> Self {
        Self {
            id: id.into(),
            content,
            span: None,
            position: Position::CENTER,
            animation: None,
        }
    }

    /// Bad bounds are reported by [`OverlayBuilder::build`].
    pub fn span(mut self, start: f64, duration: f64) -> Self {
        self.span = Some(TimeSpan::new(start, duration));
        self
    }

    pub fn during(mut self, span: TimeSpan) -> Self {
        self.span = Some(Ok(span));
        self
    }

    pub fn position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn animation(mut self, animation: Animation) -> Self {
        self.animation = Some(animation);
        self
    }

    pub fn build(self) -> ReelResult<OverlayElement> {
        let span = self.span.ok_or_else(|| {
            ReelError::invalid_parameter(format!("overlay '{}' has no time span", self.id))
        })??;
        let element = OverlayElement {
            id: self.id,
            content: self.content,
            span,
            position: self.position,
            animation: self.animation,
        };
        element.validate()?;
        Ok(element)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/dsl.rs"]
mod tests;
