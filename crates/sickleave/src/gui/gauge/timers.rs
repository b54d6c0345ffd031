use arcstep::reveal::{Ticket, TimerHost};
use glib::SourceId;
use std::rc::Rc;
use std::time::Duration;

/// Reveal timers on the glib main loop. Fired tickets are handed to `deliver`.
pub struct GlibTimers {
    deliver: Rc<dyn Fn(Ticket)>,
}

impl GlibTimers {
    pub fn new(deliver: impl Fn(Ticket) + 'static) -> Self {
        Self {
            deliver: Rc::new(deliver),
        }
    }
}

impl TimerHost for GlibTimers {
    type Handle = SourceId;

    fn schedule(&mut self, delay: Duration, ticket: Ticket) -> SourceId {
        let deliver = self.deliver.clone();
        glib::timeout_add_local_once(delay, move || deliver(ticket))
    }

    fn cancel(&mut self, handle: SourceId) {
        // the source is gone once it has fired, removing it again would abort
        if let Some(source) = glib::MainContext::default().find_source_by_id(&handle) {
            source.destroy();
        }
    }
}
