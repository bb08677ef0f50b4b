use colored::Color;

pub const PRIMARY: Color = Color::TrueColor { r: 112, g: 214, b: 255 };
pub const ACCENT: Color = Color::TrueColor { r: 255, g: 214, b: 112 };
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::TrueColor { r: 205, g: 214, b: 224 };
pub const FOUND: Color = Color::BrightGreen;
pub const FAILED: Color = Color::Red;
