use eframe::egui;
use tracing::{info, warn};

use crate::config::grid::{GridConfig, SizeRange};
use crate::core::grid::ThiingsGrid;
use crate::rendering::template::{IndexTemplate, ItemTemplate, PaletteTemplate};
use crate::storage::preferences::{GridPreferences, TemplateChoice};
use crate::ui::control_panel::show_control_panel;
use crate::ui::grid_view::GridView;
use crate::ui::status_bar::show_status_bar;
use crate::ui::theme;

pub struct ThiingsApp {
    grid: ThiingsGrid,
    view: GridView,
    size_range: SizeRange,
    preferences: GridPreferences,
    index_template: IndexTemplate,
    palette_template: PaletteTemplate,
    jump_index: u64,
    last_status: String,
}

impl ThiingsApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: GridConfig) -> Self {
        theme::apply_theme(&cc.egui_ctx);

        let preferences = GridPreferences::load();
        let grid_size = preferences.resolved_grid_size(config.grid_size, &config.size_range);
        let mut grid = ThiingsGrid::new(&config);
        grid.set_grid_size(grid_size);
        info!(grid_size, template = ?preferences.template, "app initialised");

        Self {
            grid,
            view: GridView::default(),
            size_range: config.size_range,
            preferences,
            index_template: IndexTemplate,
            palette_template: PaletteTemplate::new(&config.palette),
            jump_index: 0,
            last_status: "就绪".to_string(),
        }
    }

    fn save_preferences(&mut self) {
        self.preferences.grid_size = Some(self.grid.grid_size());
        if let Err(error) = self.preferences.save() {
            warn!(%error, "failed to save grid preferences");
            self.last_status = format!("偏好保存失败: {error}");
        }
    }
}

impl eframe::App for ThiingsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::SidePanel::left("control_panel")
            .resizable(true)
            .default_width(240.0)
            .show(ctx, |ui| {
                let action = show_control_panel(
                    ui,
                    self.grid.grid_size(),
                    self.size_range,
                    &mut self.preferences.template,
                    &mut self.jump_index,
                );
                if let Some(size) = action.grid_size {
                    self.grid.set_grid_size(size);
                }
                if let Some(index) = action.jump_to {
                    self.last_status = match self.grid.center_on_index(index) {
                        Some(cell) => format!("定位: #{index} @ ({}, {})", cell.x, cell.y),
                        None => format!("编号 #{index} 超出可寻址范围"),
                    };
                }
                if !action.is_empty() {
                    self.save_preferences();
                }
            });

        egui::TopBottomPanel::bottom("status_bar")
            .resizable(false)
            .min_height(28.0)
            .show(ctx, |ui| {
                let fps = ctx.input(|i| {
                    if i.stable_dt > 0.0 {
                        1.0 / i.stable_dt
                    } else {
                        0.0
                    }
                });
                show_status_bar(ui, &self.grid, fps, &self.last_status);
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let template: &dyn ItemTemplate = match self.preferences.template {
                    TemplateChoice::Index => &self.index_template,
                    TemplateChoice::Palette => &self.palette_template,
                };
                if let Some(click) = self.view.show(ui, &mut self.grid, template) {
                    info!(index = click.grid_index, x = click.position.x, y = click.position.y, "cell clicked");
                    self.last_status = format!(
                        "点击: #{} @ ({}, {})",
                        click.grid_index, click.position.x, click.position.y
                    );
                }
            });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.grid.unmount();
    }
}
