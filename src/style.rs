use iced::Color;

// Background colors
pub const BG_DARK: Color = Color::from_rgb(0.05, 0.06, 0.09);
pub const BG_CARD: Color = Color::from_rgb(0.10, 0.12, 0.17);
pub const BG_CARD_ACTIVE: Color = Color::from_rgb(0.11, 0.20, 0.16);
pub const BG_CARD_NEXT: Color = Color::from_rgb(0.20, 0.16, 0.10);

// Stroke/border colors
pub const STROKE_DIM: Color = Color::from_rgb(0.2, 0.22, 0.28);

// Accent colors
pub const ACCENT_BLUE: Color = Color::from_rgb(0.35, 0.65, 0.95);
pub const ACCENT_GREEN: Color = Color::from_rgb(0.2, 0.85, 0.5);
pub const ACCENT_ORANGE: Color = Color::from_rgb(1.0, 0.6, 0.2);
pub const ACCENT_RED: Color = Color::from_rgb(1.0, 0.35, 0.35);

// Text colors
pub const TEXT_BRIGHT: Color = Color::from_rgb(0.96, 0.97, 0.99);
pub const TEXT_MUTED: Color = Color::from_rgb(0.6, 0.63, 0.7);

// Overlay colors
pub const MODAL_BACKDROP: Color = Color::from_rgba(0.0, 0.0, 0.0, 0.6);
pub const ERROR_BG: Color = Color::from_rgba(1.0, 0.35, 0.35, 0.12);
