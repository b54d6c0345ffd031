use arcstep::gauge::{Gauge, GaugeInputs, GaugeScene};
use arcstep::geometry::Point;
use arcstep::reveal::{RevealAction, RevealTiming, Ticket, TimerHost};
use arcstep::tween::{ARC_TRANSITION, FLIP_TRANSITION, Tween};
use std::collections::HashMap;
use std::time::Instant;

/// Everything the view needs for one frame.
#[derive(Debug, Clone)]
pub struct Frame {
    pub scene: GaugeScene,
    /// Tweened arc fill, in percent.
    pub progress: f64,
    /// Per step: 0 shows the number, 1 shows the check.
    pub flips: Vec<f64>,
    pub hover_index: Option<usize>,
}

/// Gauge state plus the in-between values of its running transitions.
pub struct GaugeModel<T: TimerHost> {
    gauge: Gauge<T::Handle>,
    timers: T,
    arc: Tween,
    arc_started: Instant,
    flips: HashMap<usize, Instant>,
    pub hover_index: Option<usize>,
}

impl<T: TimerHost> GaugeModel<T> {
    pub fn new(timing: RevealTiming, timers: T, on_step_selected: impl FnMut(u32) + 'static) -> Self {
        Self {
            gauge: Gauge::new(timing).with_callback(on_step_selected),
            timers,
            arc: Tween::settled(0.0),
            arc_started: Instant::now(),
            flips: HashMap::new(),
            hover_index: None,
        }
    }

    pub fn gauge(&self) -> &Gauge<T::Handle> {
        &self.gauge
    }

    pub fn set_timing(&mut self, timing: RevealTiming) {
        self.gauge.set_timing(timing);
    }

    /// Returns `true` if the reveal was restarted.
    pub fn set_inputs(&mut self, inputs: GaugeInputs, now: Instant) -> bool {
        let restarted = self.gauge.set_inputs(&mut self.timers, inputs);
        if self.hover_index.is_some_and(|i| i >= self.gauge.steps().len()) {
            self.hover_index = None;
        }
        if restarted {
            self.rewind(now);
        }
        restarted
    }

    pub fn replay(&mut self, now: Instant) {
        self.gauge.replay(&mut self.timers);
        self.rewind(now);
    }

    fn rewind(&mut self, now: Instant) {
        self.retarget_arc(0.0, now);
        self.flips.clear();
    }

    fn retarget_arc(&mut self, to: f64, now: Instant) {
        let elapsed = now.saturating_duration_since(self.arc_started);
        self.arc = self.arc.retarget(elapsed, to);
        self.arc.duration = ARC_TRANSITION;
        self.arc_started = now;
    }

    /// Applies a fired reveal timer. Returns `true` if anything changed.
    pub fn fire(&mut self, ticket: Ticket, now: Instant) -> bool {
        if !self.gauge.fire(ticket) {
            return false;
        }
        match ticket.action {
            RevealAction::SetProgress(percent) => self.retarget_arc(percent, now),
            RevealAction::RevealStep(index) => {
                self.flips.insert(index, now);
            }
        }
        true
    }

    /// Tracks the marker under the pointer. Returns `true` if the hovered marker changed.
    pub fn hover(&mut self, point: Option<Point>) -> bool {
        let new_idx = point.and_then(|p| self.gauge.marker_at(p));
        let changed = self.hover_index != new_idx;
        self.hover_index = new_idx;
        changed
    }

    pub fn click(&mut self, point: Point) -> Option<u32> {
        self.gauge.click(point)
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        !self
            .arc
            .is_finished(now.saturating_duration_since(self.arc_started))
            || self
                .flips
                .values()
                .any(|&at| now.saturating_duration_since(at) < FLIP_TRANSITION)
    }

    fn flip_at(&self, index: usize, now: Instant) -> f64 {
        self.flips.get(&index).map_or(0.0, |&at| {
            Tween::new(0.0, 1.0, FLIP_TRANSITION).value_at(now.saturating_duration_since(at))
        })
    }

    pub fn frame(&self, now: Instant) -> Frame {
        let scene = self.gauge.scene();
        let flips = scene
            .steps
            .iter()
            .map(|s| self.flip_at(s.index, now))
            .collect();

        Frame {
            progress: self
                .arc
                .value_at(now.saturating_duration_since(self.arc_started)),
            flips,
            hover_index: self.hover_index,
            scene,
        }
    }

    pub fn teardown(&mut self) {
        self.gauge.teardown(&mut self.timers);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcstep::days::LeaveDays;
    use arcstep::reveal::ManualClock;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    fn model() -> GaugeModel<ManualClock> {
        GaugeModel::new(RevealTiming::default(), ManualClock::new(), |_| {})
    }

    /// Moves the virtual timers and the wall clock together.
    fn run(model: &mut GaugeModel<ManualClock>, start: Instant, ms: u64) -> Instant {
        let now = start + Duration::from_millis(ms);
        for ticket in model.timers.advance_to(Duration::from_millis(ms)) {
            model.fire(ticket, now);
        }
        now
    }

    #[test]
    fn test_arc_tweens_towards_fired_progress() {
        let mut model = model();
        let start = Instant::now();
        model.set_inputs(LeaveDays::new(4, 2).into(), start);

        let fired = run(&mut model, start, 100);
        assert_eq!(model.frame(fired).progress, 0.0);
        assert!(model.is_animating(fired));

        let halfway = fired + Duration::from_millis(500);
        assert!((model.frame(halfway).progress - 25.0).abs() < 1e-9);

        let settled = fired + ARC_TRANSITION;
        assert_eq!(model.frame(settled).progress, 50.0);
    }

    #[test]
    fn test_markers_flip_after_reveal() {
        let mut model = model();
        let start = Instant::now();
        model.set_inputs(LeaveDays::new(5, 2).into(), start);

        let t = run(&mut model, start, 600);
        let frame = model.frame(t);
        assert_eq!(frame.flips[0], 0.0);
        assert_eq!(frame.flips[1], 0.0);

        let frame = model.frame(t + FLIP_TRANSITION);
        assert_eq!(frame.flips[0], 1.0);
        assert_eq!(frame.flips[1], 0.0);

        let t = run(&mut model, start, 2000);
        assert_eq!(
            model.frame(t + FLIP_TRANSITION).flips,
            vec![1.0, 1.0, 0.0, 0.0, 0.0]
        );
        assert!(!model.is_animating(t + ARC_TRANSITION));
    }

    #[test]
    fn test_new_inputs_unflip_markers() {
        let mut model = model();
        let start = Instant::now();
        model.set_inputs(LeaveDays::new(5, 3).into(), start);
        let t = run(&mut model, start, 3000);

        assert!(model.set_inputs(LeaveDays::new(6, 3).into(), t));
        assert!(model.frame(t).flips.iter().all(|&f| f == 0.0));
    }

    #[test]
    fn test_hover_tracks_markers() {
        let mut model = model();
        model.set_inputs(LeaveDays::new(5, 3).into(), Instant::now());

        let second = model.gauge().steps()[1].marker_center();
        assert!(model.hover(Some(second)));
        assert_eq!(model.hover_index, Some(1));
        assert!(!model.hover(Some(second)));
        assert!(model.hover(None));
        assert_eq!(model.hover_index, None);
    }

    #[test]
    fn test_hover_is_cleared_when_steps_shrink() {
        let mut model = model();
        model.set_inputs(LeaveDays::new(5, 3).into(), Instant::now());
        let last = model.gauge().steps()[4].marker_center();
        model.hover(Some(last));

        model.set_inputs(LeaveDays::new(3, 3).into(), Instant::now());
        assert_eq!(model.hover_index, None);
    }

    #[test]
    fn test_click_reports_upward() {
        let selected = Rc::new(RefCell::new(None));
        let sink = selected.clone();
        let mut model = GaugeModel::new(RevealTiming::default(), ManualClock::new(), move |v| {
            *sink.borrow_mut() = Some(v);
        });
        model.set_inputs(LeaveDays::new(5, 3).into(), Instant::now());

        let first = model.gauge().steps()[0].marker_center();
        assert_eq!(model.click(first), Some(1));
        assert_eq!(*selected.borrow(), Some(1));
    }

    #[test]
    fn test_teardown_stops_timers() {
        let mut model = model();
        model.set_inputs(LeaveDays::new(5, 5).into(), Instant::now());
        model.teardown();
        assert_eq!(model.timers.pending(), 0);
    }
}
