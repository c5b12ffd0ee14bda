use strata_core::control::{checked_size, Control, Renderable, Resizable, Updatable};
use strata_core::geometry::{Point, Rectangle};
use strata_core::input::InputContext;
use strata_core::render::RenderContext;
use strata_core::text::{TextAlign, TextSample, WrapMode};
use strata_skin::Color;

use crate::context::WidgetContext;

/// Static text.
///
/// The sample is reshaped whenever the text or the size changes, and wraps
/// at word boundaries when it does not fit the width.
pub struct Label {
    ctx: WidgetContext,
    text: String,
    align: TextAlign,
    color: Option<Color>,
    size: Point,
    sample: TextSample,
}

impl Label {
    /// A label showing `text`, sized to fit it.
    pub fn new(ctx: &WidgetContext, text: impl Into<String>) -> Self {
        let text = text.into();
        let sample = ctx.shape_plain(&text);
        Self {
            ctx: ctx.clone(),
            text,
            align: TextAlign::Left,
            color: None,
            size: sample.size(),
            sample,
        }
    }

    /// Set the horizontal alignment.
    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self.reshape();
        self
    }

    /// Override the skin's text colour.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// The text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.text {
            self.text = text;
            self.reshape();
        }
    }

    /// The current sample.
    pub fn sample(&self) -> &TextSample {
        &self.sample
    }

    fn reshape(&mut self) {
        let style = self
            .ctx
            .style()
            .with_max_size(self.size)
            .with_align(self.align)
            .with_wrap(WrapMode::Word);
        if let Some(sample) = self.ctx.shape(&self.text, &style) {
            self.sample = sample;
        }
    }
}

impl Renderable for Label {
    fn render(&self, ctx: &mut RenderContext<'_>) {
        let color = self.color.unwrap_or(self.ctx.skin.text);
        ctx.draw_text_in(color, &self.sample, Rectangle::from_size(self.size), self.align);
    }
}

impl Updatable for Label {
    fn update(&mut self, _input: &mut InputContext<'_>, _dt: f64) {}
}

impl Resizable for Label {
    fn size(&self) -> Point {
        self.size
    }

    fn resize(&mut self, size: Point) {
        let size = checked_size(size);
        if size != self.size {
            self.size = size;
            self.reshape();
        }
    }
}

impl Control for Label {
    fn dispose(&mut self) {
        self.sample = TextSample::empty(self.sample.line_height());
    }
}

#[cfg(test)]
mod tests {
    use strata_core::render::DrawList;
    use strata_core::session::GuiSession;

    use super::*;

    #[test]
    fn sized_to_text_and_rewrapped_on_resize() {
        let ctx = WidgetContext::headless();
        let mut label = Label::new(&ctx, "one two");
        // 7 characters at 7px each, one 17.5px line
        assert_eq!(label.size(), Point::new(49.0, 17.5));

        label.resize(Point::new(30.0, 40.0));
        assert_eq!(label.sample().size().y, 35.0);
    }

    #[test]
    fn renders_centred() {
        let ctx = WidgetContext::headless();
        let mut label = Label::new(&ctx, "ab").with_align(TextAlign::Center);
        label.resize(Point::new(100.0, 17.5));
        let mut list = DrawList::new();
        GuiSession::new().render(&label, &mut list);
        let (rect, text) = list.texts().next().unwrap();
        assert_eq!(text, "ab");
        // the sample spans the label and centres its glyphs itself
        assert_eq!(rect, Rectangle::from_xywh(0.0, 0.0, 100.0, 17.5));
        assert_eq!(label.sample().glyphs()[0].bounds.left(), 43.0);
    }

    #[test]
    fn dispose_drops_the_sample() {
        let ctx = WidgetContext::headless();
        let mut label = Label::new(&ctx, "text");
        label.dispose();
        label.dispose();
        assert!(label.sample().is_empty());
    }
}
