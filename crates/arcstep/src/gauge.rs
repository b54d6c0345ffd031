//! The gauge as a whole: step layout, reveal sequencing, readout and click handling.
//!
//! Renderers (cairo in the app, SVG in the CLI) only ever look at a [`GaugeScene`].

use crate::days::{Band, LeaveDays, MAX_TOTAL_DAYS};
use crate::geometry::{self, ArcDescriptor, Point, StepPosition};
use crate::reveal::{RevealSequencer, RevealState, RevealTiming, Ticket, TimerHost};
use std::collections::BTreeSet;

/// What the parent hands down on every change.
///
/// `completed_days` drives the reveal animation while `days_left` drives marker completion,
/// the readout and click targets. The app passes the same value for both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GaugeInputs {
    pub total_steps: usize,
    pub days_left: usize,
    pub completed_days: usize,
}

impl GaugeInputs {
    pub fn new(total_steps: usize, days_left: usize, completed_days: usize) -> Self {
        Self {
            total_steps,
            days_left,
            completed_days,
        }
    }

    /// Clamps into a well-formed gauge: between one and `MAX_TOTAL_DAYS` steps, counts no
    /// larger than the total.
    pub fn sanitized(self) -> Self {
        let total_steps = self.total_steps.clamp(1, MAX_TOTAL_DAYS as usize);
        Self {
            total_steps,
            days_left: self.days_left.min(total_steps),
            completed_days: self.completed_days.min(total_steps),
        }
    }
}

impl From<LeaveDays> for GaugeInputs {
    fn from(days: LeaveDays) -> Self {
        let left = days.left() as usize;
        Self::new(days.total() as usize, left, left)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Readout {
    /// Days used, the complement of days left.
    pub value: usize,
    pub band: Band,
}

impl Readout {
    pub fn new(inputs: GaugeInputs) -> Self {
        let inputs = inputs.sanitized();
        Self {
            value: inputs.total_steps - inputs.days_left,
            band: Band::classify(inputs.days_left as u32, inputs.total_steps as u32),
        }
    }
}

/// Value handed to the selection callback when marker `index` is clicked.
pub fn days_left_for_marker(index: usize) -> u32 {
    index as u32 + 1
}

/// A snapshot of everything needed to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeScene {
    pub steps: Vec<StepPosition>,
    pub revealed: BTreeSet<usize>,
    pub arc: ArcDescriptor,
    pub readout: Readout,
}

impl GaugeScene {
    pub fn compose(inputs: GaugeInputs, reveal: &RevealState) -> Self {
        let inputs = inputs.sanitized();
        Self {
            steps: geometry::compute_step_positions(inputs.total_steps, inputs.days_left),
            revealed: reveal.revealed_steps.clone(),
            arc: ArcDescriptor::from_progress(reveal.progress_percent),
            readout: Readout::new(inputs),
        }
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.revealed.contains(&index)
    }
}

type StepCallback = Box<dyn FnMut(u32)>;

pub struct Gauge<H> {
    inputs: GaugeInputs,
    steps: Vec<StepPosition>,
    sequencer: RevealSequencer<H>,
    on_step_selected: Option<StepCallback>,
}

impl<H> Gauge<H> {
    pub fn new(timing: RevealTiming) -> Self {
        let inputs = GaugeInputs::new(1, 0, 0);
        Self {
            inputs,
            steps: geometry::compute_step_positions(inputs.total_steps, inputs.days_left),
            sequencer: RevealSequencer::new(timing),
            on_step_selected: None,
        }
    }

    pub fn with_callback(mut self, callback: impl FnMut(u32) + 'static) -> Self {
        self.on_step_selected = Some(Box::new(callback));
        self
    }

    pub fn inputs(&self) -> GaugeInputs {
        self.inputs
    }

    pub fn steps(&self) -> &[StepPosition] {
        &self.steps
    }

    pub fn reveal(&self) -> &RevealState {
        self.sequencer.state()
    }

    pub fn set_timing(&mut self, timing: RevealTiming) {
        self.sequencer.set_timing(timing);
    }

    /// Applies new inputs. Returns `true` if the reveal sequence was restarted.
    pub fn set_inputs<T>(&mut self, host: &mut T, inputs: GaugeInputs) -> bool
    where
        T: TimerHost<Handle = H>,
    {
        let inputs = inputs.sanitized();
        if (inputs.total_steps, inputs.days_left)
            != (self.inputs.total_steps, self.inputs.days_left)
            || self.steps.len() != inputs.total_steps
        {
            self.steps = geometry::compute_step_positions(inputs.total_steps, inputs.days_left);
        }
        self.inputs = inputs;
        self.sequencer
            .update(host, inputs.completed_days, inputs.total_steps)
    }

    /// Plays the whole reveal again for the current inputs.
    pub fn replay<T>(&mut self, host: &mut T)
    where
        T: TimerHost<Handle = H>,
    {
        self.sequencer
            .restart(host, self.inputs.completed_days, self.inputs.total_steps);
    }

    pub fn fire(&mut self, ticket: Ticket) -> bool {
        self.sequencer.fire(ticket)
    }

    pub fn teardown<T>(&mut self, host: &mut T)
    where
        T: TimerHost<Handle = H>,
    {
        self.sequencer.teardown(host);
    }

    pub fn readout(&self) -> Readout {
        Readout::new(self.inputs)
    }

    pub fn marker_at(&self, point: Point) -> Option<usize> {
        geometry::marker_at(&self.steps, point)
    }

    /// Handles a click at `point` (scene coordinates). Returns the days-left value reported
    /// upward, if a marker was hit.
    pub fn click(&mut self, point: Point) -> Option<u32> {
        self.marker_at(point).map(|index| self.select_step(index))
    }

    /// Jumps days left to the marker's display number, whatever the current value is.
    pub fn select_step(&mut self, index: usize) -> u32 {
        let value = days_left_for_marker(index);
        log::debug!("Marker {} selected, reporting {} days left", index, value);
        if let Some(callback) = self.on_step_selected.as_mut() {
            callback(value);
        }
        value
    }

    pub fn scene(&self) -> GaugeScene {
        GaugeScene::compose(self.inputs, self.sequencer.state())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::ControlCommand;
    use crate::reveal::{ManualClock, TimerId};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    fn run(clock: &mut ManualClock, gauge: &mut Gauge<TimerId>, ms: u64) {
        for ticket in clock.advance_to(Duration::from_millis(ms)) {
            gauge.fire(ticket);
        }
    }

    #[test]
    fn test_end_to_end_warning_gauge() {
        let selected = Rc::new(RefCell::new(Vec::new()));
        let sink = selected.clone();
        let mut clock = ManualClock::new();
        let mut gauge = Gauge::new(RevealTiming::default())
            .with_callback(move |v| sink.borrow_mut().push(v));

        gauge.set_inputs(&mut clock, LeaveDays::new(5, 3).into());
        let readout = gauge.readout();
        assert_eq!(readout.value, 2);
        assert_eq!(readout.band, Band::Warning);

        assert_eq!(gauge.select_step(0), 1);
        assert_eq!(*selected.borrow(), vec![1]);
    }

    #[test]
    fn test_nominal_gauge() {
        let mut clock = ManualClock::new();
        let mut gauge = Gauge::new(RevealTiming::default());
        gauge.set_inputs(&mut clock, LeaveDays::new(5, 5).into());
        assert_eq!(gauge.readout(), Readout { value: 0, band: Band::Nominal });
    }

    #[test]
    fn test_click_on_marker_reports_its_number() {
        let mut clock = ManualClock::new();
        let mut gauge = Gauge::new(RevealTiming::default());
        gauge.set_inputs(&mut clock, GaugeInputs::new(5, 3, 3));

        let fourth = gauge.steps()[3].marker_center();
        assert_eq!(gauge.click(fourth), Some(4));
        assert_eq!(gauge.click(Point::new(140.0, 140.0)), None);
    }

    #[test]
    fn test_scene_settles_to_inputs() {
        let mut clock = ManualClock::new();
        let mut gauge = Gauge::new(RevealTiming::default());
        gauge.set_inputs(&mut clock, GaugeInputs::new(4, 2, 2));

        let scene = gauge.scene();
        assert!(scene.revealed.is_empty());
        assert!((scene.arc.dash_offset - scene.arc.total_length).abs() < 1e-9);

        run(&mut clock, &mut gauge, 2000);
        let scene = gauge.scene();
        assert_eq!(scene.steps.len(), 4);
        assert_eq!(scene.revealed.iter().copied().collect::<Vec<_>>(), vec![0, 1]);
        assert!((scene.arc.visible_length() - scene.arc.total_length / 2.0).abs() < 1e-9);
        assert!(scene.steps[1].is_completed && !scene.steps[2].is_completed);
    }

    #[test]
    fn test_changing_total_restarts_sequence() {
        let mut clock = ManualClock::new();
        let mut gauge = Gauge::new(RevealTiming::default());
        gauge.set_inputs(&mut clock, LeaveDays::new(5, 3).into());
        run(&mut clock, &mut gauge, 2000);
        assert_eq!(gauge.reveal().revealed_steps.len(), 3);

        let days = LeaveDays::new(5, 3).update_total_days(7);
        assert!(gauge.set_inputs(&mut clock, days.into()));
        assert!(gauge.reveal().revealed_steps.is_empty());
        assert_eq!(gauge.steps().len(), 7);
    }

    #[test]
    fn test_same_inputs_do_not_restart() {
        let mut clock = ManualClock::new();
        let mut gauge = Gauge::new(RevealTiming::default());
        assert!(gauge.set_inputs(&mut clock, GaugeInputs::new(5, 3, 3)));
        assert!(!gauge.set_inputs(&mut clock, GaugeInputs::new(5, 3, 3)));
    }

    #[test]
    fn test_divergent_inputs_are_kept_apart() {
        let mut clock = ManualClock::new();
        let mut gauge = Gauge::new(RevealTiming::default());
        gauge.set_inputs(&mut clock, GaugeInputs::new(5, 4, 1));
        run(&mut clock, &mut gauge, 5000);

        let scene = gauge.scene();
        assert_eq!(scene.steps.iter().filter(|s| s.is_completed).count(), 4);
        assert_eq!(scene.revealed.len(), 1);
        assert_eq!(scene.readout.value, 1);
    }

    #[test]
    fn test_inputs_are_sanitized() {
        let inputs = GaugeInputs::new(0, 9, 9).sanitized();
        assert_eq!(inputs, GaugeInputs::new(1, 1, 1));
    }

    #[test]
    fn test_oversized_total_is_capped() {
        let cmd: ControlCommand = "total 4000000000".parse().unwrap();
        let ControlCommand::SetTotalDays(total) = cmd else {
            panic!("expected a total command, got {cmd:?}");
        };
        let inputs = GaugeInputs::from(LeaveDays::new(5, 3).update_total_days(total));
        assert_eq!(inputs.total_steps, MAX_TOTAL_DAYS as usize);

        let mut clock = ManualClock::new();
        let mut gauge = Gauge::new(RevealTiming::default());
        gauge.set_inputs(&mut clock, GaugeInputs::new(usize::MAX, 3, 3));
        assert_eq!(gauge.steps().len(), MAX_TOTAL_DAYS as usize);
    }

    #[test]
    fn test_replay_restarts_from_empty() {
        let mut clock = ManualClock::new();
        let mut gauge = Gauge::new(RevealTiming::default());
        gauge.set_inputs(&mut clock, GaugeInputs::new(3, 3, 3));
        run(&mut clock, &mut gauge, 3000);
        gauge.replay(&mut clock);
        assert_eq!(gauge.reveal(), &RevealState::default());
        run(&mut clock, &mut gauge, 6000);
        assert_eq!(gauge.reveal().revealed_steps.len(), 3);
    }
}
