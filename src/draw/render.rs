//! Cairo-based rendering functions for the drawing surface.

use super::color::Color;
use super::style::StrokeStyle;
use crate::util::Point;

/// Fills the entire canvas with an opaque background color.
///
/// Used once when the surface is created and again by every clear.
pub fn render_background(ctx: &cairo::Context, color: Color) -> Result<(), cairo::Error> {
    ctx.save()?;
    ctx.set_operator(cairo::Operator::Source);
    ctx.set_source_rgba(color.r, color.g, color.b, color.a);
    let result = ctx.paint();
    ctx.restore()?;
    result
}

/// Renders one straight stroke segment from `from` to `to`.
///
/// Both line join and cap are round, so a zero-length segment leaves a dot
/// of diameter `style.thickness`.
pub fn render_segment(
    ctx: &cairo::Context,
    from: Point,
    to: Point,
    style: StrokeStyle,
) -> Result<(), cairo::Error> {
    let color = style.color;
    ctx.set_operator(cairo::Operator::Over);
    ctx.set_source_rgba(color.r, color.g, color.b, color.a);
    ctx.set_line_width(style.thickness);
    ctx.set_line_cap(cairo::LineCap::Round);
    ctx.set_line_join(cairo::LineJoin::Round);

    ctx.new_path();
    ctx.move_to(from.x, from.y);
    ctx.line_to(to.x, to.y);
    ctx.stroke()
}
