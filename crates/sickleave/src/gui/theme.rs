use crate::config::{ColorConfig, HexColor};
use arcstep::days::Band;
use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;

pub struct BandColors {
    pub inner: Srgba<f64>,
    pub outer: Srgba<f64>,
}

pub struct ThemeColors {
    pub track: Srgba<f64>,
    pub arc_start: Srgba<f64>,
    pub arc_end: Srgba<f64>,
    pub marker: Srgba<f64>,
    pub marker_text: Srgba<f64>,
    pub revealed: Srgba<f64>,
    pub revealed_ring: Srgba<f64>,
    pub hovered_ring: Srgba<f64>,
    pub shadow: Srgba<f64>,
    pub critical: BandColors,
    pub warning: BandColors,
    pub nominal: BandColors,
}

fn from_hex(color: HexColor) -> Srgba<f64> {
    let rgb = color.0.into_format::<f64>();
    Srgba::new(rgb.red, rgb.green, rgb.blue, 1.0)
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext, config: &ColorConfig) -> Self {
        Self {
            track: Self::lookup_color(
                context,
                "theme_unfocused_bg_color",
                Srgba::new(0.953, 0.957, 0.965, 1.0),
                Some(1.0),
            ),
            arc_start: from_hex(config.arc_start),
            arc_end: from_hex(config.arc_end),
            marker: Srgba::new(1.0, 1.0, 1.0, 1.0),
            marker_text: Srgba::new(0.612, 0.639, 0.686, 1.0),
            revealed: Self::lookup_color(
                context,
                "accent_color",
                Srgba::new(0.231, 0.510, 0.965, 1.0),
                None,
            ),
            revealed_ring: Srgba::new(0.749, 0.859, 0.996, 1.0),
            hovered_ring: Srgba::new(0.576, 0.773, 0.992, 1.0),
            shadow: Srgba::new(0.0, 0.0, 0.0, 0.1),
            critical: BandColors {
                inner: Srgba::new(0.973, 0.443, 0.443, 1.0),
                outer: Srgba::new(0.863, 0.149, 0.149, 1.0),
            },
            warning: BandColors {
                inner: Srgba::new(0.992, 0.878, 0.278, 1.0),
                outer: Srgba::new(0.792, 0.541, 0.016, 1.0),
            },
            nominal: BandColors {
                inner: Srgba::new(0.290, 0.871, 0.502, 1.0),
                outer: Srgba::new(0.086, 0.639, 0.290, 1.0),
            },
        }
    }

    pub fn band(&self, band: Band) -> &BandColors {
        match band {
            Band::Critical => &self.critical,
            Band::Warning => &self.warning,
            Band::Nominal => &self.nominal,
        }
    }

    fn lookup_color(
        context: &gtk::StyleContext,
        name: &str,
        fallback: Srgba<f64>,
        alpha_override: Option<f64>,
    ) -> Srgba<f64> {
        context
            .lookup_color(name)
            .map(|c| {
                let (r, g, b, a) = (
                    c.red() as f64,
                    c.green() as f64,
                    c.blue() as f64,
                    c.alpha() as f64,
                );
                Srgba::new(r, g, b, alpha_override.unwrap_or(a))
            })
            .unwrap_or(fallback)
    }
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.sickleave-card {
    background-color: white;
    border-radius: 16px;
    padding: 24px;
}
.sickleave-title {
    font-size: 1.25em;
    font-weight: 600;
    color: #1f2937;
}
.sickleave-muted {
    color: #9ca3af;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_colors_convert_to_unit_range() {
        let c = from_hex(HexColor::rgb(0xff, 0x00, 0x80));
        assert_eq!(c.red, 1.0);
        assert_eq!(c.green, 0.0);
        assert!((c.blue - 128.0 / 255.0).abs() < 1e-9);
        assert_eq!(c.alpha, 1.0);
    }
}
