//! Visual configuration for the day view.
//!
//! A [`CalendarStyle`] is a plain value: the day view clones it on apply and
//! hands the `header` part to the header and the `timeline` part to the pager.
//! Styles round-trip through TOML with colours written as `#RRGGBB` strings.

use egui::Color32;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StyleError {
    #[error("failed to access style file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid style configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize style: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid colour '{0}', expected #RRGGBB or #RGB")]
    InvalidColor(String),
}

/// Convert Color32 to hex string for display
pub fn color_to_hex(color: Color32) -> String {
    format!("#{:02X}{:02X}{:02X}", color.r(), color.g(), color.b())
}

/// Parse `#RRGGBB` or `#RGB` (leading `#` optional) into a colour.
pub fn hex_to_color(hex: &str) -> Result<Color32, StyleError> {
    let digits = hex.trim().trim_start_matches('#');
    let invalid = || StyleError::InvalidColor(hex.to_string());

    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
    match digits.len() {
        6 => Ok(Color32::from_rgb(
            channel(&digits[0..2])?,
            channel(&digits[2..4])?,
            channel(&digits[4..6])?,
        )),
        3 => {
            // #RGB expands each nibble: F -> FF
            let short = |i: usize| channel(&digits[i..i + 1]).map(|v| v * 17);
            Ok(Color32::from_rgb(short(0)?, short(1)?, short(2)?))
        }
        _ => Err(invalid()),
    }
}

mod hex_color {
    use super::{color_to_hex, hex_to_color};
    use egui::Color32;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(color: &Color32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&color_to_hex(*color))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Color32, D::Error> {
        let raw = String::deserialize(deserializer)?;
        hex_to_color(&raw).map_err(serde::de::Error::custom)
    }
}

/// How hour labels are written on the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeFormat {
    TwelveHour,
    TwentyFourHour,
}

impl TimeFormat {
    /// Label for an hour row; `hour` may be 24 for the closing midnight line.
    pub fn hour_label(self, hour: u32) -> String {
        let hour = hour % 24;
        match self {
            TimeFormat::TwentyFourHour => format!("{:02}:00", hour),
            TimeFormat::TwelveHour => match hour {
                0 => "12 AM".to_string(),
                12 => "Noon".to_string(),
                h if h < 12 => format!("{} AM", h),
                h => format!("{} PM", h - 12),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DayHeaderStyle {
    #[serde(with = "hex_color")]
    pub background: Color32,
    #[serde(with = "hex_color")]
    pub day_symbol_text: Color32,
    #[serde(with = "hex_color")]
    pub weekend_text: Color32,
    #[serde(with = "hex_color")]
    pub date_text: Color32,
    #[serde(with = "hex_color")]
    pub selected_background: Color32,
    #[serde(with = "hex_color")]
    pub selected_text: Color32,
    #[serde(with = "hex_color")]
    pub today_text: Color32,
    #[serde(with = "hex_color")]
    pub today_background: Color32,
    #[serde(with = "hex_color")]
    pub swipe_label_text: Color32,
    #[serde(with = "hex_color")]
    pub separator: Color32,
}

impl DayHeaderStyle {
    pub fn light() -> Self {
        Self {
            background: Color32::from_rgb(245, 245, 245),
            day_symbol_text: Color32::from_rgb(100, 100, 100),
            weekend_text: Color32::from_rgb(150, 150, 150),
            date_text: Color32::from_rgb(40, 40, 40),
            selected_background: Color32::from_rgb(40, 40, 40),
            selected_text: Color32::from_rgb(245, 245, 245),
            today_text: Color32::from_rgb(100, 150, 255),
            today_background: Color32::from_rgb(100, 150, 255),
            swipe_label_text: Color32::from_rgb(40, 40, 40),
            separator: Color32::from_rgb(220, 220, 220),
        }
    }

    pub fn dark() -> Self {
        Self {
            background: Color32::from_rgb(30, 30, 30),
            day_symbol_text: Color32::from_rgb(170, 170, 170),
            weekend_text: Color32::from_rgb(120, 120, 120),
            date_text: Color32::from_rgb(240, 240, 240),
            selected_background: Color32::from_rgb(240, 240, 240),
            selected_text: Color32::from_rgb(20, 20, 20),
            today_text: Color32::from_rgb(100, 150, 255),
            today_background: Color32::from_rgb(100, 150, 255),
            swipe_label_text: Color32::from_rgb(240, 240, 240),
            separator: Color32::from_rgb(60, 60, 60),
        }
    }
}

impl Default for DayHeaderStyle {
    fn default() -> Self {
        Self::light()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineStyle {
    #[serde(with = "hex_color")]
    pub background: Color32,
    #[serde(with = "hex_color")]
    pub separator: Color32,
    #[serde(with = "hex_color")]
    pub hour_text: Color32,
    #[serde(with = "hex_color")]
    pub now_line: Color32,
    #[serde(with = "hex_color")]
    pub event_default: Color32,
    #[serde(with = "hex_color")]
    pub event_text: Color32,
    #[serde(with = "hex_color")]
    pub all_day_background: Color32,
    /// Vertical distance between two hour lines.
    pub hour_height: f32,
    /// Space above the 00:00 line and below the 24:00 line.
    pub vertical_inset: f32,
    /// Width reserved for hour labels.
    pub leading_inset: f32,
    /// Horizontal gap between side-by-side events.
    pub event_gap: f32,
    pub show_now_line: bool,
    pub time_format: TimeFormat,
}

impl TimelineStyle {
    pub fn light() -> Self {
        Self {
            background: Color32::from_rgb(255, 255, 255),
            separator: Color32::from_rgb(220, 220, 220),
            hour_text: Color32::GRAY,
            now_line: Color32::from_rgb(255, 100, 100),
            event_default: Color32::from_rgb(100, 150, 200),
            event_text: Color32::from_rgb(20, 20, 20),
            all_day_background: Color32::from_rgb(230, 240, 255),
            hour_height: 48.0,
            vertical_inset: 10.0,
            leading_inset: 53.0,
            event_gap: 2.0,
            show_now_line: true,
            time_format: TimeFormat::TwentyFourHour,
        }
    }

    pub fn dark() -> Self {
        Self {
            background: Color32::from_rgb(40, 40, 40),
            separator: Color32::from_rgb(60, 60, 60),
            hour_text: Color32::from_rgb(170, 170, 170),
            event_text: Color32::from_rgb(240, 240, 240),
            all_day_background: Color32::from_rgb(50, 60, 80),
            ..Self::light()
        }
    }

    /// Height of the full 24-hour timeline including insets.
    pub fn full_height(&self) -> f32 {
        self.hour_height * 24.0 + self.vertical_inset * 2.0
    }

    /// Vertical offset of `hour24` (fractional) from the top of the timeline.
    pub fn offset_for_hour(&self, hour24: f32) -> f32 {
        self.vertical_inset + hour24.clamp(0.0, 24.0) * self.hour_height
    }

    /// Whole hour under the vertical offset `y`, clamped to `0..=23`.
    pub fn hour_at_offset(&self, y: f32) -> u32 {
        if self.hour_height <= 0.0 {
            return 0;
        }
        let hour = ((y - self.vertical_inset) / self.hour_height).floor();
        hour.clamp(0.0, 23.0) as u32
    }
}

impl Default for TimelineStyle {
    fn default() -> Self {
        Self::light()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarStyle {
    pub header: DayHeaderStyle,
    pub timeline: TimelineStyle,
}

impl CalendarStyle {
    pub fn light() -> Self {
        Self {
            header: DayHeaderStyle::light(),
            timeline: TimelineStyle::light(),
        }
    }

    pub fn dark() -> Self {
        Self {
            header: DayHeaderStyle::dark(),
            timeline: TimelineStyle::dark(),
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, StyleError> {
        Ok(toml::from_str(text)?)
    }

    pub fn to_toml_string(&self) -> Result<String, StyleError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, StyleError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| StyleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StyleError> {
        let path = path.as_ref();
        let text = self.to_toml_string()?;
        fs::write(path, text).map_err(|source| StyleError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
