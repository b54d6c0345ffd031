use arcstep::geometry::{Point, SCENE_HEIGHT, SCENE_WIDTH};

pub mod model;
pub mod timers;
pub mod view;

pub use model::{Frame, GaugeModel};
pub use timers::GlibTimers;
pub use view::draw;

pub const CANVAS_WIDTH: i32 = 300;
pub const CANVAS_HEIGHT: i32 = 204;
pub const TOP_MARGIN: f64 = 16.0;
pub const READOUT_RADIUS: f64 = 24.0;
pub const READOUT_DROP: f64 = 12.0; // bubble center below the track center
pub const CAPTION: &str = "Sick days left";
pub const CAPTION_GAP: f64 = 8.0;
pub const MARKER_FONT_SIZE: f64 = 14.0;
pub const READOUT_FONT_SIZE: f64 = 20.0;

/// Where the scene's top-left corner sits inside a canvas `width` wide.
pub fn scene_origin(width: f64) -> Point {
    Point::new((width - SCENE_WIDTH) / 2.0, TOP_MARGIN)
}

pub fn to_scene(point: Point, width: f64) -> Point {
    let origin = scene_origin(width);
    Point::new(point.x - origin.x, point.y - origin.y)
}

/// Bottom of everything drawn, in scene coordinates.
pub fn scene_bottom() -> f64 {
    SCENE_HEIGHT + READOUT_DROP + READOUT_RADIUS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_fits_scene() {
        assert!(f64::from(CANVAS_WIDTH) >= SCENE_WIDTH);
        assert!(f64::from(CANVAS_HEIGHT) >= TOP_MARGIN + scene_bottom());
    }

    #[test]
    fn test_to_scene_centers_horizontally() {
        let width = f64::from(CANVAS_WIDTH);
        let p = to_scene(Point::new(width / 2.0, TOP_MARGIN + SCENE_HEIGHT), width);
        assert_eq!(p, Point::new(SCENE_WIDTH / 2.0, SCENE_HEIGHT));
    }
}
