use colored::Color;

pub const PRIMARY: Color = Color::TrueColor { r: 94, g: 179, b: 255 };
pub const ACCENT: Color = Color::TrueColor { r: 255, g: 196, b: 87 };
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::TrueColor { r: 208, g: 208, b: 208 };

pub const REACHABLE: Color = Color::Green;
pub const NOT_REACHABLE: Color = Color::Red;
pub const NOT_AVAILABLE: Color = Color::BrightBlack;
pub const SESSION_FAILED: Color = Color::Yellow;
