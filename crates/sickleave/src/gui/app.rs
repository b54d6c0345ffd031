use crate::config::{self, ColorConfig, Config};
use crate::events::AppEvent;
use crate::gui::gauge::{self, CANVAS_HEIGHT, CANVAS_WIDTH, GaugeModel, GlibTimers};
use crate::gui::theme::{self, ThemeColors};
use arcstep::control::ControlCommand;
use arcstep::days::{LeaveDays, MAX_TOTAL_DAYS};
use arcstep::geometry::Point;
use arcstep::reveal::Ticket;
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Instant;

const SUBTITLE: &str = "Shows the number of sick leave days prescribed by the doctor.";

pub struct AppModel {
    pub days: LeaveDays,
    pub gauge: Rc<RefCell<GaugeModel<GlibTimers>>>,
    pub colors: Rc<Cell<ColorConfig>>,
    pub drawing_area: gtk::DrawingArea,
}

#[derive(Debug)]
pub enum AppMsg {
    TotalDaysChanged(u32),
    DaysLeftSelected(u32),
    Reveal(Ticket),
    CanvasClick(Point),
    CanvasMotion(Option<Point>),
    Control(ControlCommand),
    ConfigReload,
    OpenConfig,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::Control(cmd) => AppMsg::Control(cmd),
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

impl AppModel {
    fn set_days(&mut self, days: LeaveDays) {
        self.days = days;
        let restarted = self
            .gauge
            .borrow_mut()
            .set_inputs(days.into(), Instant::now());
        if restarted {
            log::info!("{} of {} sick days left", days.left(), days.total());
        }
        self.drawing_area.queue_draw();
    }

    fn canvas_width(&self) -> f64 {
        f64::from(self.drawing_area.width())
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (Config, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        gtk::ApplicationWindow {
            set_title: Some("Sick leave"),
            set_resizable: false,

            gtk::Box {
                set_orientation: gtk::Orientation::Vertical,
                set_spacing: 16,
                set_margin_all: 24,

                gtk::Box {
                    set_orientation: gtk::Orientation::Horizontal,
                    set_spacing: 8,
                    set_halign: gtk::Align::Center,

                    gtk::Label {
                        set_label: "Total Days:",
                    },

                    #[name = "total_spin"]
                    gtk::SpinButton::with_range(1.0, f64::from(MAX_TOTAL_DAYS), 1.0) {
                        set_digits: 0,
                        #[watch]
                        #[block_signal(total_handler)]
                        set_value: f64::from(model.days.total()),
                        connect_value_changed[sender] => move |spin| {
                            let total = spin.value_as_int().max(1) as u32;
                            sender.input(AppMsg::TotalDaysChanged(total));
                        } @total_handler,
                    },
                },

                gtk::Box {
                    set_orientation: gtk::Orientation::Vertical,
                    set_spacing: 8,
                    add_css_class: "sickleave-card",

                    gtk::Box {
                        set_orientation: gtk::Orientation::Horizontal,

                        gtk::Box {
                            set_orientation: gtk::Orientation::Vertical,
                            set_hexpand: true,

                            gtk::Label {
                                set_label: "Sick leave",
                                set_xalign: 0.0,
                                add_css_class: "sickleave-title",
                            },
                            gtk::Label {
                                set_label: SUBTITLE,
                                set_xalign: 0.0,
                                set_wrap: true,
                                set_max_width_chars: 32,
                                add_css_class: "sickleave-muted",
                            },
                        },

                        gtk::Button {
                            set_icon_name: "view-more-symbolic",
                            set_valign: gtk::Align::Start,
                            set_tooltip_text: Some("Open settings"),
                            add_css_class: "flat",
                            connect_clicked => AppMsg::OpenConfig,
                        },
                    },

                    #[name = "drawing_area"]
                    gtk::DrawingArea {
                        set_content_width: CANVAS_WIDTH,
                        set_content_height: CANVAS_HEIGHT,
                        set_halign: gtk::Align::Center,

                        add_controller = gtk::EventControllerMotion {
                            connect_motion[sender] => move |_, x, y| {
                                sender.input(AppMsg::CanvasMotion(Some(Point::new(x, y))));
                            },
                            connect_leave[sender] => move |_| {
                                sender.input(AppMsg::CanvasMotion(None));
                            },
                        },

                        add_controller = gtk::GestureClick {
                            connect_released[sender] => move |_, _, x, y| {
                                sender.input(AppMsg::CanvasClick(Point::new(x, y)));
                            }
                        }
                    },

                    gtk::Box {
                        set_orientation: gtk::Orientation::Horizontal,
                        set_homogeneous: true,

                        gtk::Label {
                            set_label: "Start",
                            set_xalign: 0.0,
                            add_css_class: "sickleave-muted",
                        },
                        gtk::Label {
                            set_label: "Finish",
                            set_xalign: 1.0,
                            add_css_class: "sickleave-muted",
                        },
                    },
                },
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (config, rx) = init;

        theme::load_css();

        let timers = {
            let sender = sender.clone();
            GlibTimers::new(move |ticket| sender.input(AppMsg::Reveal(ticket)))
        };
        let on_step_selected = {
            let sender = sender.clone();
            move |days_left: u32| sender.input(AppMsg::DaysLeftSelected(days_left))
        };

        let model = AppModel {
            days: config.leave_days(),
            gauge: Rc::new(RefCell::new(GaugeModel::new(
                config.timing,
                timers,
                on_step_selected,
            ))),
            colors: Rc::new(Cell::new(config.colors)),
            drawing_area: gtk::DrawingArea::default(),
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();

        let gauge_draw = model.gauge.clone();
        let colors_draw = model.colors.clone();
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, width, _| {
                let style_context = drawing_area.style_context();
                let colors = ThemeColors::from_context(&style_context, &colors_draw.get());
                let frame = gauge_draw.borrow().frame(Instant::now());
                if let Err(e) = gauge::draw(cr, &frame, &colors, f64::from(width)) {
                    log::error!("Drawing error: {}", e);
                }
            });

        // keep drawing while a transition runs, plus one frame to land on its end value
        let gauge_tick = model.gauge.clone();
        let was_animating = Cell::new(false);
        widgets.drawing_area.add_tick_callback(move |area, _| {
            let animating = gauge_tick.borrow().is_animating(Instant::now());
            if animating || was_animating.get() {
                area.queue_draw();
            }
            was_animating.set(animating);
            glib::ControlFlow::Continue
        });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        model.set_days(model.days);

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            AppMsg::TotalDaysChanged(total) => self.set_days(self.days.update_total_days(total)),
            AppMsg::DaysLeftSelected(left) => self.set_days(self.days.with_days_left(left)),
            AppMsg::Reveal(ticket) => {
                if self.gauge.borrow_mut().fire(ticket, Instant::now()) {
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::CanvasClick(point) => {
                let point = gauge::to_scene(point, self.canvas_width());
                if let Some(left) = self.gauge.borrow_mut().click(point) {
                    log::debug!("Marker click requests {} days left", left);
                }
            }
            AppMsg::CanvasMotion(point) => {
                let width = self.canvas_width();
                let mut gauge = self.gauge.borrow_mut();
                if gauge.hover(point.map(|p| gauge::to_scene(p, width))) {
                    let cursor = gauge.hover_index.map(|_| "pointer");
                    self.drawing_area.set_cursor_from_name(cursor);
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::Control(cmd) => {
                log::info!("Control command: {}", cmd);
                match cmd {
                    ControlCommand::SetDaysLeft(left) => {
                        self.set_days(self.days.with_days_left(left))
                    }
                    ControlCommand::SetTotalDays(total) => {
                        self.set_days(self.days.update_total_days(total))
                    }
                    ControlCommand::Replay => {
                        self.gauge.borrow_mut().replay(Instant::now());
                        self.drawing_area.queue_draw();
                    }
                }
            }
            AppMsg::ConfigReload => match config::load_config() {
                Ok(new_config) => {
                    self.gauge.borrow_mut().set_timing(new_config.timing);
                    self.colors.set(new_config.colors);
                    self.drawing_area.queue_draw();
                    log::info!("Configuration reloaded");
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
            AppMsg::OpenConfig => match config::write_default_config() {
                Ok(path) => {
                    if let Err(e) = std::process::Command::new("xdg-open").arg(&path).spawn() {
                        log::error!("Failed to open {}: {}", path.display(), e);
                    }
                }
                Err(e) => log::error!("Failed to write default config: {}", e),
            },
        }
    }

    fn shutdown(&mut self, _widgets: &mut Self::Widgets, _output: relm4::Sender<Self::Output>) {
        self.gauge.borrow_mut().teardown();
    }
}
