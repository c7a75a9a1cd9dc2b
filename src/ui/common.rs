//! Shared colors and conversions for the egui joystick demo.

use crate::state::Offset;
use eframe::egui::{Color32, Pos2, Vec2};

/// Dark palette used by the demo.
pub struct UiColors;

impl UiColors {
    /// Panel background (RGB: 30, 30, 30)
    pub const MAIN_BG: Color32 = Color32::from_rgb(30, 30, 30);

    /// Base fill (RGB: 25, 25, 25)
    pub const INNER_BG: Color32 = Color32::from_rgb(25, 25, 25);

    /// Base outline and clamp circle (RGB: 60, 60, 60)
    pub const BORDER: Color32 = Color32::from_rgb(60, 60, 60);

    /// Handle while enabled (RGB: 50, 200, 20)
    pub const ACTIVE: Color32 = Color32::from_rgb(50, 200, 20);

    /// Handle while disabled (RGB: 200, 50, 20)
    pub const INACTIVE: Color32 = Color32::from_rgb(200, 50, 20);
}

pub fn to_vec2(offset: Offset) -> Vec2 {
    Vec2::new(offset.x as f32, offset.y as f32)
}

pub fn to_offset(pos: Pos2) -> Offset {
    Offset::new(pos.x as f64, pos.y as f64)
}
