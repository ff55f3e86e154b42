// Calendar day view demo
// Main entry point

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration as StdDuration;

use anyhow::{anyhow, Context as _};
use calendar_day_view::models::event::{into_refs, Event, EventBuilder, EventRef};
use calendar_day_view::models::style::CalendarStyle;
use calendar_day_view::services::event_source::{
    EventDataSource, EventDate, EventRequester, InMemoryEventSource,
};
use calendar_day_view::ui_egui::controller::DayViewController;
use calendar_day_view::ui_egui::day_view::DayViewDelegate;
use calendar_day_view::utils::date::{end_of_day, start_of_day};
use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};
use directories::ProjectDirs;

/// Days either side of today seeded into the synchronous calendar.
const SEEDED_DAYS: i64 = 60;
/// Simulated round trip of the asynchronous backend.
const FETCH_LATENCY: StdDuration = StdDuration::from_millis(350);

fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::init();

    let asynchronous = std::env::args().skip(1).any(|arg| arg == "--async");
    let style = load_style();
    log::info!(
        "Starting day view demo ({} loading)",
        if asynchronous { "asynchronous" } else { "synchronous" }
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 720.0])
            .with_min_inner_size([320.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Calendar Day View",
        options,
        Box::new(move |cc| {
            let app = DemoApp::new(cc, style, asynchronous)?;
            Ok(Box::new(app))
        }),
    )
    .map_err(|err| anyhow!("failed to run the day view demo: {}", err))
}

fn style_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "KenBoyle", "CalendarDayView")
        .map(|dirs| dirs.config_dir().join("style.toml"))
}

/// User style from the config directory, or the preset matching the system theme.
fn load_style() -> CalendarStyle {
    if let Some(path) = style_path().filter(|path| path.exists()) {
        match CalendarStyle::load(&path) {
            Ok(style) => {
                log::info!("Loaded style from {}", path.display());
                return style;
            }
            Err(err) => log::warn!("Ignoring {}: {}", path.display(), err),
        }
    }
    match dark_light::detect() {
        dark_light::Mode::Dark => CalendarStyle::dark(),
        dark_light::Mode::Light | dark_light::Mode::Default => CalendarStyle::light(),
    }
}

fn local_at(date: NaiveDate, hour: u32, minute: u32) -> Option<chrono::DateTime<Local>> {
    date.and_hms_opt(hour, minute, 0)?
        .and_local_timezone(Local)
        .earliest()
}

fn timed(date: NaiveDate, (hour, minute): (u32, u32), minutes: i64, title: &str) -> EventBuilder {
    let builder = Event::builder().title(title);
    match local_at(date, hour, minute) {
        Some(start) => builder.start(start).end(start + Duration::minutes(minutes)),
        None => builder,
    }
}

fn all_day(date: NaiveDate, title: &str) -> EventBuilder {
    let mut builder = Event::builder().title(title).all_day(true);
    if let (Some(start), Some(end)) = (start_of_day(date), end_of_day(date)) {
        builder = builder.start(start).end(end);
    }
    builder
}

/// A believable week of events, repeating every week.
fn sample_events(date: NaiveDate) -> Vec<Event> {
    let weekday = date.weekday();
    let mut builders = Vec::new();

    if weekday.number_from_monday() <= 5 {
        builders.push(timed(date, (9, 0), 30, "Stand-up").color("#4A90D9"));
        builders.push(timed(date, (12, 30), 60, "Lunch").color("#7CB342"));
    }
    match weekday {
        Weekday::Mon => {
            builders.push(all_day(date, "Sprint starts"));
            builders.push(timed(date, (10, 0), 90, "Sprint planning").location("Room 4"));
            builders.push(timed(date, (10, 30), 60, "1:1 with Sam").color("#E67E22"));
        }
        Weekday::Wed => {
            builders.push(timed(date, (14, 0), 120, "Design review").location("Studio"));
            builders.push(timed(date, (15, 0), 60, "Customer call").color("#8E44AD"));
            builders.push(timed(date, (15, 30), 45, "Interview").color("#C0392B"));
        }
        Weekday::Fri => {
            builders.push(timed(date, (16, 0), 60, "Retrospective"));
            builders.push(timed(date, (23, 0), 120, "Release window").color("#C0392B"));
        }
        Weekday::Sat => {
            builders.push(timed(date, (8, 0), 90, "Long run").location("Riverside park"));
        }
        _ => {}
    }
    if date.day() == 1 {
        builders.push(all_day(date, "Rent due").color("#F1C40F"));
    }

    builders
        .into_iter()
        .filter_map(|builder| match builder.build() {
            Ok(event) => Some(event),
            Err(err) => {
                log::warn!("Skipping sample event on {}: {}", date, err);
                None
            }
        })
        .collect()
}

/// Notifications a host shows in the status bar.
#[derive(Default)]
struct ActivityLog {
    last: Option<String>,
}

impl ActivityLog {
    fn record(&mut self, message: String) {
        log::info!("{}", message);
        self.last = Some(message);
    }
}

impl DayViewDelegate for ActivityLog {
    fn did_select_event(&mut self, event: &EventRef) {
        self.record(format!("Selected \"{}\"", event.text()));
    }

    fn did_long_press_event(&mut self, event: &EventRef) {
        self.record(format!("Long pressed \"{}\"", event.text()));
    }

    fn did_long_press_timeline_at_hour(&mut self, hour: u32) {
        self.record(format!("Long pressed the timeline at {:02}:00", hour));
    }

    fn did_move_to(&mut self, date: NaiveDate) {
        self.record(format!("Moved to {}", date.format("%A %-d %B")));
    }
}

/// Host answering from an in-memory store.
struct SampleCalendar {
    activity: ActivityLog,
    store: InMemoryEventSource,
}

impl SampleCalendar {
    fn seeded_around(today: NaiveDate) -> Self {
        let store = InMemoryEventSource::new(Vec::new());
        for offset in -SEEDED_DAYS..=SEEDED_DAYS {
            let date = today + Duration::days(offset);
            for event in into_refs(sample_events(date)) {
                store.add(event);
            }
        }
        log::debug!("Seeded {} sample events", store.len());
        Self {
            activity: ActivityLog::default(),
            store,
        }
    }
}

impl DayViewDelegate for SampleCalendar {
    fn did_select_event(&mut self, event: &EventRef) {
        self.activity.did_select_event(event);
    }

    fn did_long_press_event(&mut self, event: &EventRef) {
        self.activity.did_long_press_event(event);
    }

    fn did_long_press_timeline_at_hour(&mut self, hour: u32) {
        self.activity.did_long_press_timeline_at_hour(hour);
    }

    fn did_move_to(&mut self, date: NaiveDate) {
        self.activity.did_move_to(date);
    }
}

impl EventDataSource for SampleCalendar {
    fn events_for_date(&self, date: NaiveDate) -> Vec<EventRef> {
        self.store.events_for_date(date)
    }
}

/// Host forwarding requests to a background worker.
struct RemoteCalendar {
    activity: ActivityLog,
    requests: Sender<EventDate>,
}

impl DayViewDelegate for RemoteCalendar {
    fn did_select_event(&mut self, event: &EventRef) {
        self.activity.did_select_event(event);
    }

    fn did_long_press_event(&mut self, event: &EventRef) {
        self.activity.did_long_press_event(event);
    }

    fn did_long_press_timeline_at_hour(&mut self, hour: u32) {
        self.activity.did_long_press_timeline_at_hour(hour);
    }

    fn did_move_to(&mut self, date: NaiveDate) {
        self.activity.did_move_to(date);
    }
}

impl EventRequester for RemoteCalendar {
    fn trigger(&mut self, date: EventDate) {
        log::debug!("Requesting events for {}", date);
        if self.requests.send(date).is_err() {
            log::warn!("Event worker has stopped, request for {} dropped", date);
        }
    }
}

fn spawn_worker(
    ctx: egui::Context,
) -> anyhow::Result<(Sender<EventDate>, Receiver<(EventDate, Vec<Event>)>)> {
    let (request_tx, request_rx) = mpsc::channel::<EventDate>();
    let (response_tx, response_rx) = mpsc::channel();
    thread::Builder::new()
        .name("event-worker".to_string())
        .spawn(move || {
            for date in request_rx {
                thread::sleep(FETCH_LATENCY);
                if response_tx.send((date, sample_events(date.value))).is_err() {
                    break;
                }
                ctx.request_repaint();
            }
            log::debug!("Event worker finished");
        })
        .context("failed to start the event worker")?;
    Ok((request_tx, response_rx))
}

enum Calendar {
    Local(DayViewController<SampleCalendar>),
    Remote {
        controller: DayViewController<RemoteCalendar>,
        responses: Receiver<(EventDate, Vec<Event>)>,
    },
}

struct DemoApp {
    calendar: Calendar,
    style: CalendarStyle,
}

impl DemoApp {
    fn new(
        cc: &eframe::CreationContext<'_>,
        style: CalendarStyle,
        asynchronous: bool,
    ) -> anyhow::Result<Self> {
        let today = Local::now().date_naive();
        let calendar = if asynchronous {
            let (requests, responses) = spawn_worker(cc.egui_ctx.clone())?;
            let host = RemoteCalendar {
                activity: ActivityLog::default(),
                requests,
            };
            Calendar::Remote {
                controller: DayViewController::asynchronous(host),
                responses,
            }
        } else {
            Calendar::Local(DayViewController::new(SampleCalendar::seeded_around(today)))
        };

        let mut app = Self { calendar, style };
        app.apply_style(&cc.egui_ctx);
        app.with_day_view(|view| {
            view.set_auto_scroll_to_first_event(true);
            view.set_corner_label(Some(Local::now().format("%Z").to_string()));
        });
        Ok(app)
    }

    fn with_day_view(&mut self, f: impl FnOnce(&mut calendar_day_view::DayView)) {
        match &mut self.calendar {
            Calendar::Local(controller) => f(controller.day_view_mut()),
            Calendar::Remote { controller, .. } => f(controller.day_view_mut()),
        }
    }

    fn apply_style(&mut self, ctx: &egui::Context) {
        let dark = self.style.timeline.background.r() < 128;
        ctx.set_visuals(if dark {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        });
        match &mut self.calendar {
            Calendar::Local(controller) => controller.update_style(&self.style),
            Calendar::Remote { controller, .. } => controller.update_style(&self.style),
        }
    }

    fn toggle_style(&mut self, ctx: &egui::Context) {
        self.style = if self.style == CalendarStyle::dark() {
            CalendarStyle::light()
        } else {
            CalendarStyle::dark()
        };
        self.apply_style(ctx);
        if let Some(path) = style_path() {
            if let Some(dir) = path.parent() {
                if let Err(err) = std::fs::create_dir_all(dir) {
                    log::warn!("Failed to create {}: {}", dir.display(), err);
                    return;
                }
            }
            if let Err(err) = self.style.save(&path) {
                log::warn!("Failed to save style: {}", err);
            }
        }
    }

    fn deliver_responses(&mut self) {
        if let Calendar::Remote { controller, responses } = &mut self.calendar {
            while let Ok((date, events)) = responses.try_recv() {
                log::debug!("Received {} events for {}", events.len(), date);
                controller.receive(into_refs(events), date);
            }
        }
    }

    fn last_activity(&self) -> Option<String> {
        match &self.calendar {
            Calendar::Local(controller) => controller.host().borrow().activity.last.clone(),
            Calendar::Remote { controller, .. } => controller.host().borrow().activity.last.clone(),
        }
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let mut target = None;
            let mut header_visible = None;
            let mut reload = false;
            self.with_day_view(|view| {
                let selected = view.state().selected_date();
                if ui.button("◀").clicked() {
                    target = selected.pred_opt();
                }
                if ui.button("Today").clicked() {
                    target = Some(Local::now().date_naive());
                }
                if ui.button("▶").clicked() {
                    target = selected.succ_opt();
                }
                ui.separator();
                let mut visible = view.is_header_visible();
                if ui.checkbox(&mut visible, "Header").changed() {
                    header_visible = Some(visible);
                }
                reload = ui.button("Reload").clicked();
            });
            let toggle = ui.button("Light / Dark").clicked();

            self.with_day_view(|view| {
                if let Some(date) = target {
                    view.move_to(date);
                }
                if let Some(visible) = header_visible {
                    view.set_header_visible(visible);
                }
                if reload {
                    view.reload_data();
                }
            });
            if toggle {
                self.toggle_style(ui.ctx());
            }
        });
    }
}

impl eframe::App for DemoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.deliver_responses();

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.toolbar(ui));
        let status = self.last_activity();
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.label(status.as_deref().unwrap_or("Tap an event or long press the timeline"));
        });
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| match &mut self.calendar {
                Calendar::Local(controller) => controller.show(ui),
                Calendar::Remote { controller, .. } => controller.show(ui),
            });
    }
}
