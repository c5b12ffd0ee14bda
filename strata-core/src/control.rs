use crate::geometry::{Point, Rectangle};
use crate::input::InputContext;
use crate::render::RenderContext;

/// A boxed control.
pub type BoxedControl = Box<dyn Control>;

/// Something that can draw itself in its local space.
///
/// The origin of the context is the control's top-left corner. Parents
/// position children with [RenderContext::translate] before calling this.
pub trait Renderable {
    /// Draw the control.
    fn render(&self, ctx: &mut RenderContext<'_>);
}

/// Something that reacts to input once per frame.
pub trait Updatable {
    /// Process input. `dt` is the time since the previous update in seconds.
    fn update(&mut self, input: &mut InputContext<'_>, dt: f64);
}

/// Something with a size.
pub trait Resizable {
    /// Current size.
    fn size(&self) -> Point;

    /// Change the size. Negative components are a caller bug; see [checked_size].
    fn resize(&mut self, size: Point);
}

/// The base trait for everything in a control tree.
///
/// # Lifecycle
///
/// 1. **Update**: [Updatable::update] walks the tree once per frame, parents
///    first, children in whatever order the parent decides.
/// 2. **Render**: [Renderable::render] draws the tree back to front.
/// 3. **Dispose**: [Control::dispose] releases resources. Parents dispose
///    their children first. Calling it twice must be harmless.
pub trait Control: Renderable + Updatable + Resizable {
    /// Release resources held by the control and its children.
    fn dispose(&mut self) {}
}

/// Where a layer sits inside its container.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Placement {
    /// Top-left corner in container space.
    pub position: Point,
}

impl Placement {
    /// A placement at `position`.
    pub fn at(position: Point) -> Self {
        Self { position }
    }
}

/// A control that can live as a layer of a
/// [LayerContainer](crate::layer::LayerContainer).
pub trait LayerControl: Control {
    /// The layer's placement.
    fn placement(&self) -> &Placement;

    /// The layer's placement, mutably.
    fn placement_mut(&mut self) -> &mut Placement;

    /// Top-left corner in container space.
    fn position(&self) -> Point {
        self.placement().position
    }

    /// Move the layer.
    fn set_position(&mut self, position: Point) {
        self.placement_mut().position = position;
    }

    /// The area the layer covers in container space.
    fn bounds(&self) -> Rectangle {
        Rectangle::new(self.position(), self.size())
    }
}

/// Validate a size passed to [Resizable::resize].
///
/// Debug builds panic on negative components, release builds clamp them to zero.
pub fn checked_size(size: Point) -> Point {
    debug_assert!(
        size.x >= 0.0 && size.y >= 0.0,
        "negative control size {:?}",
        size
    );
    Point::new(size.x.max(0.0), size.y.max(0.0))
}
