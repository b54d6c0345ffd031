use std::f64::consts::PI;
use std::fmt;

pub const SCENE_WIDTH: f64 = 280.0;
pub const SCENE_HEIGHT: f64 = 140.0;
pub const STROKE_WIDTH: f64 = 32.0;
pub const MARKER_SIZE: f64 = 28.0;
pub const MARKER_RADIUS: f64 = MARKER_SIZE / 2.0;

// Applied to every marker unless the index has an entry in STEP_NUDGE_OVERRIDES.
const DEFAULT_NUDGE: Point = Point::new(0.0, 12.0);

/// Hand-tuned visual corrections, keyed by step index.
const STEP_NUDGE_OVERRIDES: &[(usize, Point)] = &[(2, Point::new(2.0, 14.0))];

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, other: Point) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Track radius: the centerline of the stroked semicircle.
pub fn radius() -> f64 {
    (SCENE_WIDTH / 2.0) - (STROKE_WIDTH / 2.0)
}

/// Center of the semicircle, bottom middle of the scene.
pub fn center() -> Point {
    Point::new(SCENE_WIDTH / 2.0, SCENE_HEIGHT)
}

pub fn arc_length() -> f64 {
    PI * radius()
}

fn nudge_for(index: usize) -> Point {
    STEP_NUDGE_OVERRIDES
        .iter()
        .find(|(i, _)| *i == index)
        .map_or(DEFAULT_NUDGE, |(_, nudge)| *nudge)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepPosition {
    pub index: usize,
    /// Position on the track relative to the semicircle center, y pointing down.
    pub offset: Point,
    pub is_completed: bool,
}

impl StepPosition {
    pub fn number(&self) -> usize {
        self.index + 1
    }

    /// Offset with the per-index visual correction applied.
    pub fn marker_offset(&self) -> Point {
        self.offset.offset(nudge_for(self.index))
    }

    /// Center of the marker disc in scene coordinates.
    pub fn marker_center(&self) -> Point {
        center()
            .offset(self.marker_offset())
            .offset(Point::new(0.0, -MARKER_RADIUS))
    }

    pub fn contains(&self, point: Point) -> bool {
        self.marker_center().distance(point) <= MARKER_RADIUS
    }
}

fn step_angle(index: usize, total_steps: usize) -> f64 {
    // a single step has no span to divide, park it at the apex
    if total_steps <= 1 {
        return PI / 2.0;
    }
    PI - (index as f64 / (total_steps - 1) as f64) * PI
}

/// Lays `total_steps` markers out evenly from the left end of the track to the right end.
///
/// `total_steps` is treated as at least 1 and the threshold is clamped to it, so any input
/// produces a well-formed layout.
pub fn compute_step_positions(total_steps: usize, completed_threshold: usize) -> Vec<StepPosition> {
    let total_steps = total_steps.max(1);
    let completed_threshold = completed_threshold.min(total_steps);
    let r = radius();

    (0..total_steps)
        .map(|index| {
            let angle = step_angle(index, total_steps);
            StepPosition {
                index,
                offset: Point::new(r * angle.cos(), -r * angle.sin()),
                is_completed: index < completed_threshold,
            }
        })
        .collect()
}

/// Returns the marker under `point` (scene coordinates), preferring the closest one.
pub fn marker_at(steps: &[StepPosition], point: Point) -> Option<usize> {
    steps
        .iter()
        .filter(|s| s.contains(point))
        .min_by(|a, b| {
            a.marker_center()
                .distance(point)
                .total_cmp(&b.marker_center().distance(point))
        })
        .map(|s| s.index)
}

/// A clockwise arc from the left end of the track to the point reached at some percentage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcPath {
    pub start: Point,
    pub end: Point,
    pub radius: f64,
    /// Angle of `end` in the usual math orientation (y up), π at the left end.
    pub end_angle: f64,
}

impl ArcPath {
    /// Angle swept from the start point, in radians.
    pub fn sweep(&self) -> f64 {
        PI - self.end_angle
    }

    pub fn length(&self) -> f64 {
        self.radius * self.sweep()
    }
}

impl fmt::Display for ArcPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "M {} {} A {} {} 0 0 1 {} {}",
            self.start.x, self.start.y, self.radius, self.radius, self.end.x, self.end.y
        )
    }
}

pub fn describe_arc(percent: f64) -> ArcPath {
    let percent = clamp_percent(percent);
    let (c, r) = (center(), radius());

    // measured from the left end so 0% lands exactly on the start point
    let swept = (percent / 100.0) * PI;
    ArcPath {
        start: Point::new(c.x - r, c.y),
        end: Point::new(c.x - r * swept.cos(), c.y - r * swept.sin()),
        radius: r,
        end_angle: PI - swept,
    }
}

pub fn clamp_percent(percent: f64) -> f64 {
    if percent.is_nan() {
        return 0.0;
    }
    percent.clamp(0.0, 100.0)
}

/// What the progress arc needs to be drawn: the full track path dashed so that only
/// `progress` percent of it is visible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcDescriptor {
    pub path: ArcPath,
    pub total_length: f64,
    pub dash_offset: f64,
}

impl ArcDescriptor {
    pub fn from_progress(progress: f64) -> Self {
        let total_length = arc_length();
        Self {
            path: describe_arc(100.0),
            total_length,
            dash_offset: total_length * (1.0 - clamp_percent(progress) / 100.0),
        }
    }

    pub fn visible_length(&self) -> f64 {
        self.total_length - self.dash_offset
    }

    pub fn path_command(&self) -> String {
        self.path.to_string()
    }
}
