//! A single day page of the timeline.
//!
//! Draws the 24 hour rows, places the page's events in columns so overlapping
//! events sit side by side, and turns pointer input into [`TimelineGesture`]s.
//! Gestures refer to events by their index in [`TimelineView::events`].

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Timelike};
use egui::{Align2, FontId, Pos2, Rect, Sense, Stroke, Vec2};

use super::palette::{event_colors, TimelinePalette};
use crate::models::event::EventRef;
use crate::models::style::TimelineStyle;
use crate::utils::date::fractional_hour;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineGesture {
    EventTapped(usize),
    EventLongPressed(usize),
    LongPressedAtHour(u32),
}

/// Vertical placement of one timed event, relative to the top of the timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventLayout {
    pub index: usize,
    pub top: f32,
    pub bottom: f32,
    pub column: usize,
    pub columns: usize,
}

impl EventLayout {
    /// Frame inside `content`, which spans the area right of the hour labels.
    pub fn frame(&self, content: Rect, gap: f32) -> Rect {
        let column_width = content.width() / self.columns.max(1) as f32;
        let left = content.left() + column_width * self.column as f32;
        Rect::from_min_max(
            Pos2::new(left, content.top() + self.top),
            Pos2::new(left + column_width - gap, content.top() + self.bottom),
        )
    }
}

fn hours_into_day(date: NaiveDate, at: NaiveDateTime) -> f32 {
    if at.date() > date {
        24.0
    } else {
        fractional_hour(at.time())
    }
}

/// Place the timed events for `date` into columns.
///
/// Events are grouped into clusters of transitively overlapping events; inside
/// a cluster each event takes the first column that is free at its start.
/// All-day events and events not touching `date` get no layout.
pub fn layout_events(date: NaiveDate, events: &[EventRef], style: &TimelineStyle) -> Vec<EventLayout> {
    let min_height = style.hour_height / 4.0;

    let mut timed: Vec<(usize, f32, f32)> = events
        .iter()
        .enumerate()
        .filter(|(_, event)| !event.is_all_day())
        .filter_map(|(index, event)| {
            let (start, end) = event.segment_for_date(date)?;
            let top = style.offset_for_hour(hours_into_day(date, start)) - style.vertical_inset;
            let bottom = style.offset_for_hour(hours_into_day(date, end)) - style.vertical_inset;
            Some((index, top, bottom.max(top + min_height)))
        })
        .collect();
    timed.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));

    let mut layouts = Vec::with_capacity(timed.len());
    let mut cluster: Vec<EventLayout> = Vec::new();
    let mut column_ends: Vec<f32> = Vec::new();
    let mut cluster_bottom = f32::MIN;

    for (index, top, bottom) in timed {
        if top >= cluster_bottom && !cluster.is_empty() {
            flush_cluster(&mut cluster, &mut layouts, column_ends.len());
            column_ends.clear();
        }

        let column = match column_ends.iter().position(|end| *end <= top) {
            Some(free) => free,
            None => {
                column_ends.push(f32::MIN);
                column_ends.len() - 1
            }
        };
        column_ends[column] = bottom;
        cluster_bottom = if cluster.is_empty() {
            bottom
        } else {
            cluster_bottom.max(bottom)
        };

        cluster.push(EventLayout {
            index,
            top: top + style.vertical_inset,
            bottom: bottom + style.vertical_inset,
            column,
            columns: 1,
        });
    }
    flush_cluster(&mut cluster, &mut layouts, column_ends.len());

    layouts
}

fn flush_cluster(cluster: &mut Vec<EventLayout>, layouts: &mut Vec<EventLayout>, columns: usize) {
    layouts.extend(cluster.drain(..).map(|layout| EventLayout {
        columns: columns.max(1),
        ..layout
    }));
}

#[derive(Debug)]
pub struct TimelineView {
    date: NaiveDate,
    events: Vec<EventRef>,
    layout: Vec<EventLayout>,
}

impl TimelineView {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            events: Vec::new(),
            layout: Vec::new(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn events(&self) -> &[EventRef] {
        &self.events
    }

    pub fn event_layout(&self) -> &[EventLayout] {
        &self.layout
    }

    pub fn set_events(&mut self, events: Vec<EventRef>, style: &TimelineStyle) {
        self.events = events;
        self.relayout(style);
    }

    pub fn relayout(&mut self, style: &TimelineStyle) {
        self.layout = layout_events(self.date, &self.events, style);
    }

    pub fn event(&self, index: usize) -> Option<&EventRef> {
        self.events.get(index)
    }

    /// Start hour of the earliest timed event on this page.
    pub fn first_event_hour(&self) -> Option<f32> {
        self.events
            .iter()
            .filter(|event| !event.is_all_day())
            .filter_map(|event| event.segment_for_date(self.date))
            .map(|(start, _)| hours_into_day(self.date, start))
            .min_by(f32::total_cmp)
    }

    fn all_day_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.events
            .iter()
            .enumerate()
            .filter(|(_, event)| event.is_all_day() && event.touches_date(self.date))
            .map(|(index, _)| index)
    }

    /// Row of all-day events above the hour grid.
    pub fn show_all_day(&self, ui: &mut egui::Ui, style: &TimelineStyle) -> Vec<TimelineGesture> {
        let mut gestures = Vec::new();
        let indices: Vec<usize> = self.all_day_indices().collect();
        if indices.is_empty() {
            return gestures;
        }

        let palette = TimelinePalette::from_style(style);
        let now = Local::now();
        egui::Frame::none()
            .fill(palette.all_day_bg)
            .inner_margin(egui::Margin::symmetric(style.leading_inset, 4.0))
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    for index in indices {
                        let event = &self.events[index];
                        let (_, accent) = event_colors(event.as_ref(), style, now);
                        let button = egui::Button::new(
                            egui::RichText::new(event.text()).color(palette.event_text),
                        )
                        .fill(accent.linear_multiply(0.5));
                        let response = ui.add(button);
                        if response.clicked() {
                            gestures.push(TimelineGesture::EventTapped(index));
                        } else if response.secondary_clicked() || response.long_touched() {
                            gestures.push(TimelineGesture::EventLongPressed(index));
                        }
                    }
                });
            });

        gestures
    }

    /// Paint the hour grid and timed events; returns the gestures of this frame.
    pub fn show(
        &self,
        ui: &mut egui::Ui,
        style: &TimelineStyle,
        now: DateTime<Local>,
    ) -> Vec<TimelineGesture> {
        let palette = TimelinePalette::from_style(style);
        let width = ui.available_width();
        let (rect, background) =
            ui.allocate_exact_size(Vec2::new(width, style.full_height()), Sense::click());

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, palette.background);

        let line_left = rect.left() + style.leading_inset;
        for hour in 0..=24u32 {
            let y = rect.top() + style.offset_for_hour(hour as f32);
            painter.hline(line_left..=rect.right(), y, Stroke::new(1.0, palette.hour_line));
            if hour < 24 {
                let half = y + style.hour_height / 2.0;
                painter.hline(
                    line_left..=rect.right(),
                    half,
                    Stroke::new(0.5, palette.half_hour_line),
                );
            }
            painter.text(
                Pos2::new(line_left - 6.0, y),
                Align2::RIGHT_CENTER,
                style.time_format.hour_label(hour),
                FontId::proportional(11.0),
                palette.hour_text,
            );
        }

        let content = Rect::from_min_max(
            Pos2::new(line_left + 2.0, rect.top()),
            Pos2::new(rect.right() - 2.0, rect.bottom()),
        );

        let mut gestures = Vec::new();
        for layout in &self.layout {
            let event = &self.events[layout.index];
            let frame = layout.frame(content, style.event_gap);
            let (fill, accent) = event_colors(event.as_ref(), style, now);

            painter.rect_filled(frame, 2.0, fill);
            painter.rect_filled(
                Rect::from_min_size(frame.min, Vec2::new(3.0, frame.height())),
                1.0,
                accent,
            );

            let text_rect = frame.shrink2(Vec2::new(6.0, 2.0));
            let mut text = event.text().to_string();
            if let Some(location) = event.location() {
                text.push('\n');
                text.push_str(location);
            }
            let job = egui::text::LayoutJob::simple(
                text,
                FontId::proportional(12.0),
                palette.event_text,
                text_rect.width().max(1.0),
            );
            let galley = ui.fonts(|fonts| fonts.layout_job(job));
            painter
                .with_clip_rect(frame)
                .galley(text_rect.min + Vec2::new(2.0, 0.0), galley, palette.event_text);

            let response = ui.interact(
                frame,
                ui.id().with(("timeline_event", self.date, layout.index)),
                Sense::click(),
            );
            if response.clicked() {
                gestures.push(TimelineGesture::EventTapped(layout.index));
            } else if response.secondary_clicked() || response.long_touched() {
                gestures.push(TimelineGesture::EventLongPressed(layout.index));
            }
        }

        if style.show_now_line && now.date_naive() == self.date {
            let y = rect.top() + style.offset_for_hour(fractional_hour(now.time()));
            painter.circle_filled(Pos2::new(line_left, y), 3.0, palette.now_line);
            painter.hline(line_left..=rect.right(), y, Stroke::new(1.5, palette.now_line));
            painter.text(
                Pos2::new(line_left - 6.0, y),
                Align2::RIGHT_CENTER,
                format!("{:02}:{:02}", now.hour(), now.minute()),
                FontId::proportional(10.0),
                palette.now_line,
            );
        }

        if background.secondary_clicked() || background.long_touched() {
            if let Some(pos) = background.interact_pointer_pos() {
                let hour = style.hour_at_offset(pos.y - rect.top());
                gestures.push(TimelineGesture::LongPressedAtHour(hour));
            }
        }

        gestures
    }
}
