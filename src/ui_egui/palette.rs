use chrono::{DateTime, Local};
use egui::Color32;

use crate::models::event::EventDescriptor;
use crate::models::style::{hex_to_color, DayHeaderStyle, TimelineStyle};

pub(crate) fn with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

pub(crate) fn blend(a: Color32, b: Color32, t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |c1: u8, c2: u8| -> u8 { ((c1 as f32 * (1.0 - t)) + (c2 as f32 * t)).round() as u8 };
    Color32::from_rgb(lerp(a.r(), b.r()), lerp(a.g(), b.g()), lerp(a.b(), b.b()))
}

#[derive(Clone, Copy)]
pub(crate) struct HeaderPalette {
    pub background: Color32,
    pub separator: Color32,
    pub symbol: Color32,
    pub weekend_symbol: Color32,
    pub date: Color32,
    pub selected_bg: Color32,
    pub selected_text: Color32,
    pub today_text: Color32,
    pub today_selected_bg: Color32,
    pub hover_bg: Color32,
    pub swipe_label: Color32,
}

impl HeaderPalette {
    pub fn from_style(style: &DayHeaderStyle) -> Self {
        Self {
            background: style.background,
            separator: style.separator,
            symbol: style.day_symbol_text,
            weekend_symbol: style.weekend_text,
            date: style.date_text,
            selected_bg: style.selected_background,
            selected_text: style.selected_text,
            today_text: style.today_text,
            today_selected_bg: style.today_background,
            hover_bg: with_alpha(style.selected_background, 40),
            swipe_label: style.swipe_label_text,
        }
    }
}

#[derive(Clone, Copy)]
pub(crate) struct TimelinePalette {
    pub background: Color32,
    pub hour_line: Color32,
    pub half_hour_line: Color32,
    pub hour_text: Color32,
    pub now_line: Color32,
    pub all_day_bg: Color32,
    pub event_text: Color32,
}

impl TimelinePalette {
    pub fn from_style(style: &TimelineStyle) -> Self {
        Self {
            background: style.background,
            hour_line: style.separator,
            half_hour_line: with_alpha(style.separator, 110),
            hour_text: style.hour_text,
            now_line: style.now_line,
            all_day_bg: blend(style.background, style.all_day_background, 0.8),
            event_text: style.event_text,
        }
    }
}

/// Fill and accent colours for an event box; past events are dimmed.
pub(crate) fn event_colors(
    event: &dyn EventDescriptor,
    style: &TimelineStyle,
    now: DateTime<Local>,
) -> (Color32, Color32) {
    let base = event
        .color()
        .and_then(|hex| hex_to_color(hex).ok())
        .unwrap_or(style.event_default);

    let base = if event.end() < now {
        blend(base, style.background, 0.55)
    } else {
        base
    };

    (with_alpha(base, 90), base)
}
