//! Static SVG rendering of a [`GaugeScene`].

use crate::days::Band;
use crate::gauge::GaugeScene;
use crate::geometry::{self, MARKER_RADIUS, SCENE_HEIGHT, SCENE_WIDTH, STROKE_WIDTH, StepPosition};
use std::fmt::Write;

const PADDING: f64 = 24.0;
const READOUT_RADIUS: f64 = 24.0;

const TRACK_COLOR: &str = "#f3f4f6";
const ARC_START: &str = "#0346aa";
const ARC_END: &str = "#93c5fd";
const IDLE_TEXT: &str = "#9ca3af";
const REVEALED: &str = "#3b82f6";
const REVEALED_RING: &str = "#bfdbfe";

fn band_colors(band: Band) -> (&'static str, &'static str) {
    match band {
        Band::Critical => ("#f87171", "#dc2626"),
        Band::Warning => ("#fde047", "#ca8a04"),
        Band::Nominal => ("#4ade80", "#16a34a"),
    }
}

pub fn render(scene: &GaugeScene) -> Result<String, std::fmt::Error> {
    let width = SCENE_WIDTH + 2.0 * PADDING;
    let height = SCENE_HEIGHT + READOUT_RADIUS + 2.0 * PADDING;

    let mut out = String::new();
    write_document(&mut out, scene, width, height)?;
    Ok(out)
}

fn write_document(
    out: &mut String,
    scene: &GaugeScene,
    width: f64,
    height: f64,
) -> std::fmt::Result {
    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="{} {} {width} {height}">"#,
        -PADDING, -PADDING
    )?;
    write_defs(out, scene.readout.band)?;

    let track = geometry::describe_arc(100.0);
    writeln!(
        out,
        r#"  <path d="{track}" stroke="{TRACK_COLOR}" stroke-width="{STROKE_WIDTH}" fill="none"/>"#
    )?;
    writeln!(
        out,
        r#"  <path class="progress" d="{}" stroke="url(#progressGradient)" stroke-width="{STROKE_WIDTH}" fill="none" stroke-linecap="round" stroke-dasharray="{}" stroke-dashoffset="{}"/>"#,
        scene.arc.path, scene.arc.total_length, scene.arc.dash_offset
    )?;

    for step in &scene.steps {
        write_marker(out, step, scene.is_revealed(step.index))?;
    }
    write_readout(out, scene)?;
    writeln!(out, "</svg>")
}

fn write_defs(out: &mut String, band: Band) -> std::fmt::Result {
    let (inner, outer) = band_colors(band);
    writeln!(out, "  <defs>")?;
    writeln!(
        out,
        r#"    <linearGradient id="progressGradient" gradientUnits="userSpaceOnUse" x1="0" y1="0" x2="{SCENE_WIDTH}" y2="0">"#
    )?;
    writeln!(out, r#"      <stop offset="0%" stop-color="{ARC_START}"/>"#)?;
    writeln!(out, r#"      <stop offset="100%" stop-color="{ARC_END}"/>"#)?;
    writeln!(out, "    </linearGradient>")?;
    writeln!(out, r#"    <radialGradient id="readoutGradient">"#)?;
    writeln!(out, r#"      <stop offset="0%" stop-color="{inner}"/>"#)?;
    writeln!(out, r#"      <stop offset="100%" stop-color="{outer}"/>"#)?;
    writeln!(out, "    </radialGradient>")?;
    writeln!(out, "  </defs>")
}

fn write_marker(out: &mut String, step: &StepPosition, revealed: bool) -> std::fmt::Result {
    let c = step.marker_center();
    let (ring, text) = if revealed {
        (REVEALED_RING, REVEALED)
    } else {
        ("none", IDLE_TEXT)
    };

    writeln!(
        out,
        r#"  <g class="marker" data-step="{}" transform="translate({} {})">"#,
        step.number(),
        c.x,
        c.y
    )?;
    writeln!(
        out,
        r#"    <circle r="{MARKER_RADIUS}" fill="white" stroke="{ring}"/>"#
    )?;
    if revealed {
        writeln!(
            out,
            r#"    <path d="M -5 0 L -1.5 4 L 5.5 -4" stroke="{text}" stroke-width="2" fill="none" stroke-linecap="round" stroke-linejoin="round"/>"#
        )?;
    } else {
        writeln!(
            out,
            r#"    <text text-anchor="middle" dominant-baseline="central" fill="{text}" font-size="14">{}</text>"#,
            step.number()
        )?;
    }
    writeln!(out, "  </g>")
}

fn write_readout(out: &mut String, scene: &GaugeScene) -> std::fmt::Result {
    let c = geometry::center();
    writeln!(
        out,
        r#"  <g class="readout" data-band="{}" transform="translate({} {})">"#,
        scene.readout.band, c.x, c.y
    )?;
    writeln!(
        out,
        r#"    <circle r="{READOUT_RADIUS}" fill="url(#readoutGradient)"/>"#
    )?;
    writeln!(
        out,
        r#"    <text text-anchor="middle" dominant-baseline="central" fill="white" font-size="20" font-weight="600">{}</text>"#,
        scene.readout.value
    )?;
    writeln!(out, "  </g>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gauge::GaugeInputs;
    use crate::reveal::RevealState;

    fn settled_scene(total: usize, left: usize) -> GaugeScene {
        let inputs = GaugeInputs::new(total, left, left);
        let reveal = RevealState {
            progress_percent: left as f64 / total as f64 * 100.0,
            revealed_steps: (0..left).collect(),
        };
        GaugeScene::compose(inputs, &reveal)
    }

    #[test]
    fn test_one_marker_per_step() {
        let svg = render(&settled_scene(7, 2)).unwrap();
        assert_eq!(svg.matches(r#"class="marker""#).count(), 7);
        assert!(svg.contains(r#"data-step="7""#));
    }

    #[test]
    fn test_revealed_markers_show_checks() {
        let svg = render(&settled_scene(5, 3)).unwrap();
        assert_eq!(svg.matches("M -5 0 L -1.5 4 L 5.5 -4").count(), 3);
        assert!(svg.contains(r#"font-size="14">4</text>"#));
        assert!(!svg.contains(r#"font-size="14">1</text>"#));
    }

    #[test]
    fn test_readout_and_band() {
        let svg = render(&settled_scene(5, 3)).unwrap();
        assert!(svg.contains(r#"data-band="warning""#));
        assert!(svg.contains(r#"font-weight="600">2</text>"#));
    }

    #[test]
    fn test_full_gauge_has_no_dash_offset() {
        let svg = render(&settled_scene(4, 4)).unwrap();
        assert!(svg.contains(r#"stroke-dashoffset="0""#));
    }
}
