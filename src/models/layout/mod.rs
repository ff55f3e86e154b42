// Layout classes reported by the host window

/// Coarse horizontal size class of the area a day view is laid out in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalSizeClass {
    #[default]
    Unspecified,
    Compact,
    Regular,
}

impl HorizontalSizeClass {
    /// Widths below this are treated as compact (phone-sized) layouts.
    pub const REGULAR_MIN_WIDTH: f32 = 600.0;

    pub fn from_width(width: f32) -> Self {
        if !width.is_finite() || width <= 0.0 {
            HorizontalSizeClass::Unspecified
        } else if width < Self::REGULAR_MIN_WIDTH {
            HorizontalSizeClass::Compact
        } else {
            HorizontalSizeClass::Regular
        }
    }

    pub fn is_regular(self) -> bool {
        self == HorizontalSizeClass::Regular
    }
}
