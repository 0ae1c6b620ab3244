use egui::{DragValue, Slider, Ui};

use crate::config::grid::SizeRange;
use crate::storage::preferences::TemplateChoice;
use crate::ui::theme;

// ── action returned to the app ──────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct ControlAction {
    /// 新的格子尺寸（滑块被拖动时）
    pub grid_size: Option<f64>,
    pub template_changed: bool,
    /// 请求把该编号的格子移到中心
    pub jump_to: Option<u64>,
}

impl ControlAction {
    /// 没有需要持久化的改动
    pub fn is_empty(&self) -> bool {
        self.grid_size.is_none() && !self.template_changed
    }
}

// ── panel rendering ─────────────────────────────────────────

pub fn show_control_panel(
    ui: &mut Ui,
    grid_size: f64,
    range: SizeRange,
    template: &mut TemplateChoice,
    jump_index: &mut u64,
) -> ControlAction {
    let mut action = ControlAction::default();

    ui.heading("Thiings Grid");
    ui.colored_label(theme::TEXT_SECONDARY, "拖拽平移，松手惯性滑行，滚轮平移");
    ui.separator();

    // ── size ──
    ui.colored_label(theme::PINK, "◈ 格子尺寸");
    let mut size = grid_size as f32;
    let slider = Slider::new(&mut size, range.min as f32..=range.max as f32)
        .step_by(1.0)
        .suffix(" px");
    if ui.add(slider).changed() {
        action.grid_size = Some(size as f64);
    }

    ui.separator();

    // ── template ──
    ui.colored_label(theme::PINK, "◈ 格子模板");
    let before = *template;
    ui.radio_value(template, TemplateChoice::Index, "编号");
    ui.radio_value(template, TemplateChoice::Palette, "色块");
    action.template_changed = *template != before;

    ui.separator();

    // ── jump ──
    ui.colored_label(theme::PINK, "◈ 定位编号");
    ui.horizontal(|ui| {
        ui.add(DragValue::new(jump_index).speed(1.0).prefix("#"));
        if ui.button("居中").clicked() {
            action.jump_to = Some(*jump_index);
        }
    });

    action
}
