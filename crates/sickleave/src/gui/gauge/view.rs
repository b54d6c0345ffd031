use super::model::Frame;
use super::{
    CAPTION, CAPTION_GAP, MARKER_FONT_SIZE, READOUT_DROP, READOUT_FONT_SIZE, READOUT_RADIUS,
    scene_origin,
};
use crate::gui::theme::ThemeColors;
use arcstep::geometry::{self, MARKER_RADIUS, SCENE_WIDTH, STROKE_WIDTH, StepPosition};
use cairo::Context;
use palette::Srgba;
use std::f64::consts::PI;

// below this the flipped marker is squashed to a sliver, cairo rejects a zero scale
const MIN_FLIP_SCALE: f64 = 0.02;

fn set_color(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

struct MarkerRenderer<'a> {
    step: &'a StepPosition,
    flip: f64,
    hovered: bool,
}

impl<'a> MarkerRenderer<'a> {
    fn new(step: &'a StepPosition, flip: f64, hovered: bool) -> Self {
        Self {
            step,
            flip,
            hovered,
        }
    }

    fn draw(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let c = self.step.marker_center();

        cr.save()?;
        cr.translate(c.x, c.y);
        self.draw_shadow(cr, colors)?;

        // flip around the vertical axis, the face swaps halfway through
        let squash = (PI * self.flip).cos().abs().max(MIN_FLIP_SCALE);
        cr.scale(squash, 1.0);

        let state = MarkerState::resolve(self.flip, self.hovered);
        self.draw_disc(cr, colors, state)?;
        if self.flip >= 0.5 {
            self.draw_check(cr, colors)?;
        } else {
            self.draw_number(cr, colors)?;
        }
        cr.restore()
    }

    fn draw_shadow(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        set_color(cr, colors.shadow);
        cr.arc(0.0, 2.0, MARKER_RADIUS + 1.0, 0.0, 2.0 * PI);
        cr.fill()
    }

    fn draw_disc(
        &self,
        cr: &Context,
        colors: &ThemeColors,
        state: MarkerState,
    ) -> Result<(), cairo::Error> {
        set_color(cr, colors.marker);
        cr.arc(0.0, 0.0, MARKER_RADIUS, 0.0, 2.0 * PI);
        cr.fill()?;

        if let Some((ring, width)) = state.ring(colors) {
            set_color(cr, ring);
            cr.set_line_width(width);
            cr.arc(0.0, 0.0, MARKER_RADIUS - width / 2.0, 0.0, 2.0 * PI);
            cr.stroke()?;
        }
        Ok(())
    }

    fn draw_number(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        set_color(cr, colors.marker_text);
        draw_centered_text(
            cr,
            &self.step.number().to_string(),
            MARKER_FONT_SIZE,
            cairo::FontWeight::Normal,
        )
    }

    fn draw_check(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        set_color(cr, colors.revealed);
        cr.set_line_width(2.0);
        cr.set_line_cap(cairo::LineCap::Round);
        cr.set_line_join(cairo::LineJoin::Round);
        cr.move_to(-5.0, 0.0);
        cr.line_to(-1.5, 4.0);
        cr.line_to(5.5, -4.0);
        cr.stroke()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MarkerState {
    Hovered,
    Revealed,
    Idle,
}

impl MarkerState {
    /// Hover wins over the revealed ring so the click target is always visible.
    fn resolve(flip: f64, hovered: bool) -> Self {
        if hovered {
            Self::Hovered
        } else if flip >= 0.5 {
            Self::Revealed
        } else {
            Self::Idle
        }
    }

    fn ring(&self, colors: &ThemeColors) -> Option<(Srgba<f64>, f64)> {
        match self {
            Self::Hovered => Some((colors.hovered_ring, 2.0)),
            Self::Revealed => Some((colors.revealed_ring, 1.0)),
            Self::Idle => None,
        }
    }
}

fn draw_centered_text(
    cr: &Context,
    text: &str,
    size: f64,
    weight: cairo::FontWeight,
) -> Result<(), cairo::Error> {
    cr.select_font_face("Sans", cairo::FontSlant::Normal, weight);
    cr.set_font_size(size);
    if let Ok(ext) = cr.text_extents(text) {
        cr.move_to(
            -ext.width() / 2.0 - ext.x_bearing(),
            -ext.height() / 2.0 - ext.y_bearing(),
        );
        cr.show_text(text)?;
    }
    Ok(())
}

pub fn draw(
    cr: &Context,
    frame: &Frame,
    colors: &ThemeColors,
    width: f64,
) -> Result<(), cairo::Error> {
    let origin = scene_origin(width);
    cr.save()?;
    cr.translate(origin.x, origin.y);

    draw_track(cr, colors)?;
    draw_progress(cr, frame.progress, colors)?;

    for (step, flip) in frame.scene.steps.iter().zip(&frame.flips) {
        MarkerRenderer::new(step, *flip, frame.hover_index == Some(step.index)).draw(cr, colors)?;
    }

    draw_readout(cr, frame, colors)?;
    cr.restore()
}

fn draw_track(cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
    let c = geometry::center();
    set_color(cr, colors.track);
    cr.set_line_width(STROKE_WIDTH);
    cr.set_line_cap(cairo::LineCap::Butt);
    cr.new_path();
    cr.arc(c.x, c.y, geometry::radius(), PI, 2.0 * PI);
    cr.stroke()
}

fn draw_progress(cr: &Context, progress: f64, colors: &ThemeColors) -> Result<(), cairo::Error> {
    let path = geometry::describe_arc(progress);
    if path.sweep() <= 0.0 {
        return Ok(());
    }

    let gradient = cairo::LinearGradient::new(0.0, 0.0, SCENE_WIDTH, 0.0);
    for (offset, color) in [(0.0, colors.arc_start), (1.0, colors.arc_end)] {
        let (r, g, b, a) = color.into_components();
        gradient.add_color_stop_rgba(offset, r, g, b, a);
    }

    // cairo angles grow clockwise on screen, so the sweep over the top is added to π
    let c = geometry::center();
    cr.set_source(&gradient)?;
    cr.set_line_width(STROKE_WIDTH);
    cr.set_line_cap(cairo::LineCap::Round);
    cr.new_path();
    cr.arc(c.x, c.y, path.radius, PI, PI + path.sweep());
    cr.stroke()
}

fn draw_readout(cr: &Context, frame: &Frame, colors: &ThemeColors) -> Result<(), cairo::Error> {
    let c = geometry::center();
    let bubble_y = c.y + READOUT_DROP;

    cr.save()?;
    cr.translate(c.x, bubble_y - READOUT_RADIUS - CAPTION_GAP);
    set_color(cr, colors.marker_text);
    draw_centered_text(cr, CAPTION, 12.0, cairo::FontWeight::Normal)?;
    cr.restore()?;

    let band = colors.band(frame.scene.readout.band);
    let gradient = cairo::RadialGradient::new(
        c.x - READOUT_RADIUS / 3.0,
        bubble_y - READOUT_RADIUS / 3.0,
        0.0,
        c.x,
        bubble_y,
        READOUT_RADIUS,
    );
    for (offset, color) in [(0.0, band.inner), (1.0, band.outer)] {
        let (r, g, b, a) = color.into_components();
        gradient.add_color_stop_rgba(offset, r, g, b, a);
    }

    set_color(cr, colors.shadow);
    cr.arc(c.x, bubble_y + 3.0, READOUT_RADIUS + 2.0, 0.0, 2.0 * PI);
    cr.fill()?;

    cr.set_source(&gradient)?;
    cr.arc(c.x, bubble_y, READOUT_RADIUS, 0.0, 2.0 * PI);
    cr.fill()?;

    cr.save()?;
    cr.translate(c.x, bubble_y);
    cr.set_source_rgb(1.0, 1.0, 1.0);
    draw_centered_text(
        cr,
        &frame.scene.readout.value.to_string(),
        READOUT_FONT_SIZE,
        cairo::FontWeight::Bold,
    )?;
    cr.restore()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_state_priority() {
        assert_eq!(MarkerState::resolve(1.0, true), MarkerState::Hovered);
        assert_eq!(MarkerState::resolve(1.0, false), MarkerState::Revealed);
        assert_eq!(MarkerState::resolve(0.4, false), MarkerState::Idle);
    }
}
