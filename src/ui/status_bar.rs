use egui::Ui;

use crate::core::geometry::distance;
use crate::core::grid::ThiingsGrid;
use crate::core::interaction::DragPhase;
use crate::ui::theme;

pub fn show_status_bar(ui: &mut Ui, grid: &ThiingsGrid, fps: f32, message: &str) {
    let offset = grid.offset();
    let phase = match grid.phase() {
        DragPhase::Idle => "静止",
        DragPhase::Dragging => "拖拽",
        DragPhase::Inertial => "惯性",
    };

    ui.horizontal_wrapped(|ui| {
        ui.label(format!("状态: {message}"));
        ui.separator();
        ui.label(format!("偏移: ({:.0}, {:.0})", offset.x, offset.y));
        ui.separator();
        ui.label(format!("阶段: {phase}{}", if grid.is_moving() { " · 移动中" } else { "" }));
        ui.separator();
        ui.label(format!("速度: {:.2} px/ms", grid.velocity().length()));
        ui.colored_label(
            theme::TEXT_MUTED,
            format!("距静止点 {:.0} px", distance(grid.rest_position(), offset)),
        );
        ui.separator();
        ui.label(format!("可见格: {}", grid.items().len()));
        ui.separator();
        ui.colored_label(theme::TEXT_MUTED, format!("FPS: {:.0}", fps));
    });
}
