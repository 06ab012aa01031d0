//! Color constants for the TUI.

use ratatui::style::Color;

use crate::charts::Series;

/// Header bar foreground.
pub const HEADER_FG: Color = Color::White;
/// Header bar background.
pub const HEADER_BG: Color = Color::DarkGray;
/// Busy indicator color.
pub const BUSY: Color = Color::Yellow;
/// Idle indicator color.
pub const IDLE: Color = Color::Green;
/// Axis tick color.
pub const AXIS: Color = Color::Rgb(0x8e, 0x8e, 0x93);
/// Stat card value color.
pub const STAT_VALUE: Color = Color::White;
/// Footer help text color.
pub const FOOTER_FG: Color = Color::DarkGray;
/// Notice border color.
pub const NOTICE_BORDER: Color = Color::Red;

/// Line or bar color for a dataset.
pub fn series_color(series: Series) -> Color {
    match series {
        Series::Demand => Color::Rgb(0xff, 0x45, 0x3a),
        Series::Solar => Color::Rgb(0xff, 0xb3, 0x40),
        Series::Wind => Color::Rgb(0x32, 0xd7, 0x4b),
        Series::NetGrid => Color::Rgb(0x5e, 0x5c, 0xe6),
        Series::StateOfCharge => Color::Rgb(0x00, 0x71, 0xe3),
        Series::Action => Color::Rgb(0x5e, 0x5c, 0xe6),
    }
}
