//! Day header: a week strip of selectable days above the timeline.

use chrono::{Datelike, Local, NaiveDate, Weekday};
use egui::{Align2, FontId, Pos2, Rect, Sense, Stroke, Vec2};

use super::palette::HeaderPalette;
use crate::models::layout::HorizontalSizeClass;
use crate::models::state::DayViewState;
use crate::models::style::DayHeaderStyle;

/// Header height while the header is shown.
pub const HEADER_VISIBLE_HEIGHT: f32 = 88.0;

const SYMBOL_ROW_HEIGHT: f32 = 20.0;
const DATE_CELL_SIZE: f32 = 34.0;

pub struct DayHeaderView {
    state: DayViewState,
    style: DayHeaderStyle,
    size_class: HorizontalSizeClass,
    corner_label: Option<String>,
}

impl DayHeaderView {
    pub fn new(state: DayViewState) -> Self {
        Self {
            state,
            style: DayHeaderStyle::default(),
            size_class: HorizontalSizeClass::default(),
            corner_label: None,
        }
    }

    pub fn state(&self) -> &DayViewState {
        &self.state
    }

    pub fn set_state(&mut self, state: DayViewState) {
        self.state = state;
    }

    pub fn style(&self) -> &DayHeaderStyle {
        &self.style
    }

    pub fn update_style(&mut self, style: DayHeaderStyle) {
        self.style = style;
    }

    pub fn size_class(&self) -> HorizontalSizeClass {
        self.size_class
    }

    pub fn transition_to_horizontal_size_class(&mut self, size_class: HorizontalSizeClass) {
        self.size_class = size_class;
    }

    pub fn corner_label(&self) -> Option<&str> {
        self.corner_label.as_deref()
    }

    pub fn set_corner_label(&mut self, label: Option<String>) {
        self.corner_label = label;
    }

    /// Weekday label above a date cell: "M" when compact, "Mon" otherwise.
    pub fn day_symbol(&self, date: NaiveDate) -> String {
        let short = date.format("%a").to_string();
        if self.size_class.is_regular() {
            short
        } else {
            short.chars().take(1).collect()
        }
    }

    /// Full date of the selection shown under the strip.
    pub fn swipe_label(&self) -> String {
        let date = self.state.selected_date();
        if self.size_class.is_regular() {
            date.format("%A, %B %-d, %Y").to_string()
        } else {
            date.format("%a, %b %-d").to_string()
        }
    }

    /// Draw the header into the next `height` points; returns a tapped date.
    ///
    /// The header does not select the tapped day itself. The owner moves the
    /// view there so the move is announced like any other.
    pub fn show(&mut self, ui: &mut egui::Ui, height: f32) -> Option<NaiveDate> {
        let palette = HeaderPalette::from_style(&self.style);
        let (rect, _) =
            ui.allocate_exact_size(Vec2::new(ui.available_width(), height), Sense::hover());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, palette.background);

        let leading = if self.corner_label.is_some() { 53.0 } else { 8.0 };
        if let Some(label) = &self.corner_label {
            painter.text(
                Pos2::new(rect.left() + leading / 2.0, rect.top() + SYMBOL_ROW_HEIGHT),
                Align2::CENTER_CENTER,
                label,
                FontId::proportional(12.0),
                palette.symbol,
            );
        }

        let today = Local::now().date_naive();
        let selected = self.state.selected_date();
        let week = self.state.selected_week();
        let strip = Rect::from_min_max(
            Pos2::new(rect.left() + leading, rect.top() + 4.0),
            Pos2::new(rect.right() - 8.0, rect.top() + 4.0 + SYMBOL_ROW_HEIGHT + DATE_CELL_SIZE),
        );
        let cell_width = strip.width() / week.len() as f32;

        let mut tapped = None;
        for (column, date) in week.iter().copied().enumerate() {
            let cell = Rect::from_min_size(
                Pos2::new(strip.left() + cell_width * column as f32, strip.top()),
                Vec2::new(cell_width, strip.height()),
            );
            let weekend = matches!(date.weekday(), Weekday::Sat | Weekday::Sun);
            painter.text(
                Pos2::new(cell.center().x, cell.top() + SYMBOL_ROW_HEIGHT / 2.0),
                Align2::CENTER_CENTER,
                self.day_symbol(date),
                FontId::proportional(11.0),
                if weekend { palette.weekend_symbol } else { palette.symbol },
            );

            let center = Pos2::new(cell.center().x, cell.top() + SYMBOL_ROW_HEIGHT + DATE_CELL_SIZE / 2.0);
            let response = ui.interact(cell, ui.id().with(("day_header_cell", date)), Sense::click());

            let text_color = if date == selected {
                let fill = if date == today { palette.today_selected_bg } else { palette.selected_bg };
                painter.circle_filled(center, DATE_CELL_SIZE / 2.0, fill);
                palette.selected_text
            } else {
                if response.hovered() {
                    painter.circle_filled(center, DATE_CELL_SIZE / 2.0, palette.hover_bg);
                }
                if date == today { palette.today_text } else { palette.date }
            };
            painter.text(
                center,
                Align2::CENTER_CENTER,
                date.day().to_string(),
                FontId::proportional(16.0),
                text_color,
            );

            if response.clicked() {
                tapped = Some(date);
            }
        }

        painter.text(
            Pos2::new(rect.center().x, strip.bottom() + (rect.bottom() - strip.bottom()) / 2.0),
            Align2::CENTER_CENTER,
            self.swipe_label(),
            FontId::proportional(14.0),
            palette.swipe_label,
        );
        painter.hline(rect.x_range(), rect.bottom() - 0.5, Stroke::new(1.0, palette.separator));

        tapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_on(y: i32, m: u32, d: u32) -> DayHeaderView {
        DayHeaderView::new(DayViewState::new(NaiveDate::from_ymd_opt(y, m, d).unwrap()))
    }

    #[test]
    fn test_day_symbols_follow_size_class() {
        let mut header = header_on(2025, 5, 7);
        let wednesday = NaiveDate::from_ymd_opt(2025, 5, 7).unwrap();

        header.transition_to_horizontal_size_class(HorizontalSizeClass::Compact);
        assert_eq!(header.day_symbol(wednesday), "W");

        header.transition_to_horizontal_size_class(HorizontalSizeClass::Regular);
        assert_eq!(header.day_symbol(wednesday), "Wed");
    }

    #[test]
    fn test_swipe_label_formats() {
        let mut header = header_on(2025, 5, 7);
        header.transition_to_horizontal_size_class(HorizontalSizeClass::Regular);
        assert_eq!(header.swipe_label(), "Wednesday, May 7, 2025");

        header.transition_to_horizontal_size_class(HorizontalSizeClass::Compact);
        assert_eq!(header.swipe_label(), "Wed, May 7");
    }

    #[test]
    fn test_header_reads_shared_state() {
        let state = DayViewState::new(NaiveDate::from_ymd_opt(2025, 5, 7).unwrap());
        let header = DayHeaderView::new(state.clone());
        state.move_to(NaiveDate::from_ymd_opt(2025, 5, 8).unwrap());
        assert_eq!(header.swipe_label(), "Thu, May 8");
        assert!(header.state().ptr_eq(&state));
    }

    #[test]
    fn test_corner_label() {
        let mut header = header_on(2025, 5, 7);
        assert_eq!(header.corner_label(), None);
        header.set_corner_label(Some("GMT+2".to_string()));
        assert_eq!(header.corner_label(), Some("GMT+2"));
    }
}
