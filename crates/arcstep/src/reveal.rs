//! Staged reveal of gauge progress.
//!
//! Whenever the inputs change, the sequencer resets to an empty gauge and schedules a fresh
//! generation of deferred actions: the arc fills first, then completed steps flip one by one.
//! Timers are owned by a [`TimerHost`], so the same sequencer runs on the GTK main loop and on
//! the virtual [`ManualClock`] used by tests and the CLI.

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Display, From, Into)]
pub struct Generation(u64);

impl Generation {
    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RevealAction {
    SetProgress(f64),
    RevealStep(usize),
}

/// One deferred action, tagged with the generation that scheduled it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ticket {
    pub generation: Generation,
    pub id: usize,
    pub action: RevealAction,
}

pub trait TimerHost {
    type Handle;

    fn schedule(&mut self, delay: Duration, ticket: Ticket) -> Self::Handle;
    fn cancel(&mut self, handle: Self::Handle);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealTiming {
    pub progress_delay_ms: u64,
    pub first_reveal_ms: u64,
    pub stagger_ms: u64,
}

impl Default for RevealTiming {
    fn default() -> Self {
        Self {
            progress_delay_ms: 100,
            first_reveal_ms: 600,
            stagger_ms: 200,
        }
    }
}

impl RevealTiming {
    pub fn progress_delay(&self) -> Duration {
        Duration::from_millis(self.progress_delay_ms)
    }

    pub fn reveal_delay(&self, index: usize) -> Duration {
        Duration::from_millis(self.first_reveal_ms + index as u64 * self.stagger_ms)
    }

    /// Every action of one generation with its delay, in firing order for the default timing.
    pub fn plan(&self, completed_steps: usize, total_steps: usize) -> Vec<(Duration, RevealAction)> {
        let total_steps = total_steps.max(1);
        let completed_steps = completed_steps.min(total_steps);
        let percent = completed_steps as f64 / total_steps as f64 * 100.0;

        std::iter::once((self.progress_delay(), RevealAction::SetProgress(percent)))
            .chain((0..completed_steps).map(|i| (self.reveal_delay(i), RevealAction::RevealStep(i))))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RevealState {
    pub progress_percent: f64,
    pub revealed_steps: BTreeSet<usize>,
}

impl RevealState {
    pub fn is_revealed(&self, index: usize) -> bool {
        self.revealed_steps.contains(&index)
    }
}

struct PendingTimer<H> {
    id: usize,
    handle: H,
}

pub struct RevealSequencer<H> {
    generation: Generation,
    pending: Vec<PendingTimer<H>>,
    state: RevealState,
    timing: RevealTiming,
    inputs: Option<(usize, usize)>,
}

impl<H> RevealSequencer<H> {
    pub fn new(timing: RevealTiming) -> Self {
        Self {
            generation: Generation::default(),
            pending: Vec::new(),
            state: RevealState::default(),
            timing,
            inputs: None,
        }
    }

    pub fn state(&self) -> &RevealState {
        &self.state
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Takes effect on the next restart.
    pub fn set_timing(&mut self, timing: RevealTiming) {
        self.timing = timing;
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Restarts the sequence only if `(completed_steps, total_steps)` differs from the last run.
    pub fn update<T>(&mut self, host: &mut T, completed_steps: usize, total_steps: usize) -> bool
    where
        T: TimerHost<Handle = H>,
    {
        if self.inputs == Some((completed_steps, total_steps)) {
            return false;
        }
        self.restart(host, completed_steps, total_steps);
        true
    }

    pub fn restart<T>(&mut self, host: &mut T, completed_steps: usize, total_steps: usize)
    where
        T: TimerHost<Handle = H>,
    {
        self.cancel_pending(host);
        self.generation = self.generation.next();
        self.state = RevealState::default();
        self.inputs = Some((completed_steps, total_steps));

        let plan = self.timing.plan(completed_steps, total_steps);
        log::debug!(
            "Reveal generation {} scheduling {} actions for {}/{} steps",
            self.generation,
            plan.len(),
            completed_steps,
            total_steps
        );

        for (id, (delay, action)) in plan.into_iter().enumerate() {
            let ticket = Ticket {
                generation: self.generation,
                id,
                action,
            };
            let handle = host.schedule(delay, ticket);
            self.pending.push(PendingTimer { id, handle });
        }
    }

    /// Applies a delivered ticket. Tickets from superseded generations, or ones already
    /// applied, leave the state untouched and return `false`.
    pub fn fire(&mut self, ticket: Ticket) -> bool {
        if ticket.generation != self.generation {
            log::debug!(
                "Dropping stale reveal ticket from generation {} (current {})",
                ticket.generation,
                self.generation
            );
            return false;
        }

        let Some(pos) = self.pending.iter().position(|p| p.id == ticket.id) else {
            return false;
        };
        self.pending.swap_remove(pos);

        match ticket.action {
            RevealAction::SetProgress(percent) => {
                self.state.progress_percent = percent.clamp(0.0, 100.0);
            }
            RevealAction::RevealStep(index) => {
                self.state.revealed_steps.insert(index);
            }
        }
        true
    }

    /// Cancels everything still pending, e.g. when the view goes away.
    pub fn teardown<T>(&mut self, host: &mut T)
    where
        T: TimerHost<Handle = H>,
    {
        self.cancel_pending(host);
        self.inputs = None;
    }

    fn cancel_pending<T>(&mut self, host: &mut T)
    where
        T: TimerHost<Handle = H>,
    {
        if !self.pending.is_empty() {
            log::debug!(
                "Cancelling {} pending reveal timers of generation {}",
                self.pending.len(),
                self.generation
            );
        }
        for pending in self.pending.drain(..) {
            host.cancel(pending.handle);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct ScheduledTicket {
    id: TimerId,
    due: Duration,
    ticket: Ticket,
}

/// Virtual-time timer host. Time only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Duration,
    next_id: u64,
    queue: Vec<ScheduledTicket>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Moves time forward to `t` and returns every ticket that came due, oldest first.
    pub fn advance_to(&mut self, t: Duration) -> Vec<Ticket> {
        self.now = self.now.max(t);
        let now = self.now;

        let (mut due, rest): (Vec<_>, Vec<_>) = self.queue.drain(..).partition(|s| s.due <= now);
        self.queue = rest;

        due.sort_by_key(|s| (s.due, s.id.0));
        due.into_iter().map(|s| s.ticket).collect()
    }

    /// Advances to `t`, delivering due tickets to `sequencer`. Returns how many were applied.
    pub fn run_until(&mut self, sequencer: &mut RevealSequencer<TimerId>, t: Duration) -> usize {
        self.advance_to(t)
            .into_iter()
            .filter(|ticket| sequencer.fire(*ticket))
            .count()
    }
}

impl TimerHost for ManualClock {
    type Handle = TimerId;

    fn schedule(&mut self, delay: Duration, ticket: Ticket) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.queue.push(ScheduledTicket {
            id,
            due: self.now + delay,
            ticket,
        });
        id
    }

    fn cancel(&mut self, handle: TimerId) {
        self.queue.retain(|s| s.id != handle);
    }
}
