use colored::Color;

pub const ACCENT: Color = Color::Cyan;
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;

pub const IPV4_ADDR: Color = Color::BrightBlue;
pub const HOSTNAME: Color = Color::Blue;
pub const MAC_ADDR: Color = Color::Yellow;
pub const LABEL: Color = Color::Magenta;

pub const LATENCY_FAST: Color = Color::Green;
pub const LATENCY_FAIR: Color = Color::Yellow;
pub const LATENCY_SLOW: Color = Color::Red;
pub const NO_REPLY: Color = Color::BrightRed;
