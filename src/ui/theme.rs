//! # 粉蓝主题
//!
//! 侧边面板与画布底色的配色，以及应用到 egui Style 的函数。
//! 格子本身的颜色在 `rendering::template`。

use egui::{Color32, Rounding, Stroke, Visuals};

// ═══════════════════════════════════════════════════════════
// 调色板
// ═══════════════════════════════════════════════════════════

/// 粉色（主强调色）
pub const PINK: Color32 = Color32::from_rgb(245, 169, 184);
/// 蓝色（次强调色）
pub const BLUE: Color32 = Color32::from_rgb(91, 206, 250);
pub const BLUE_LIGHT: Color32 = Color32::from_rgb(145, 225, 255);

/// 画布底色
pub const BG_DARK: Color32 = Color32::from_rgb(30, 30, 40);
pub const BG_PANEL: Color32 = Color32::from_rgb(38, 38, 52);
/// 控件底色
pub const BG_WIDGET: Color32 = Color32::from_rgb(50, 50, 68);
pub const BG_WIDGET_HOVER: Color32 = Color32::from_rgb(62, 62, 82);

pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(235, 235, 245);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(180, 180, 200);
pub const TEXT_MUTED: Color32 = Color32::from_rgb(120, 120, 145);

/// 分隔线
pub const SEPARATOR: Color32 = Color32::from_rgb(65, 65, 85);

// ═══════════════════════════════════════════════════════════
// 应用主题
// ═══════════════════════════════════════════════════════════

pub fn apply_theme(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();
    let mut visuals = Visuals::dark();

    visuals.panel_fill = BG_PANEL;
    visuals.extreme_bg_color = BG_DARK;
    visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, SEPARATOR);

    let rounding = Rounding::same(4.0);

    visuals.widgets.inactive.bg_fill = BG_WIDGET;
    visuals.widgets.inactive.weak_bg_fill = BG_WIDGET;
    visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, TEXT_PRIMARY);
    visuals.widgets.inactive.rounding = rounding;

    visuals.widgets.hovered.bg_fill = BG_WIDGET_HOVER;
    visuals.widgets.hovered.weak_bg_fill = BG_WIDGET_HOVER;
    visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, BLUE);
    visuals.widgets.hovered.rounding = rounding;

    visuals.widgets.active.bg_stroke = Stroke::new(1.5, PINK);
    visuals.widgets.active.rounding = rounding;

    // 滑块轨道 / 选中项
    visuals.selection.bg_fill = Color32::from_rgba_unmultiplied(91, 206, 250, 80);
    visuals.selection.stroke = Stroke::new(1.0, BLUE_LIGHT);

    style.visuals = visuals;
    style.spacing.item_spacing = egui::vec2(6.0, 4.0);
    style.spacing.slider_width = 180.0;

    ctx.set_style(style);
}
