//! # 格子模板
//!
//! 宿主提供的「每格渲染」能力。网格核心只给出 [`ItemConfig`]，
//! 画什么由模板决定；未指定时使用 [`IndexTemplate`] 显示编号。

use egui::{Align2, Color32, FontId, Painter, Rect, Rounding, Stroke};

use crate::core::grid::ItemConfig;

// ── cell colours ────────────────────────────────────────────

const CELL_FILL: Color32 = Color32::from_rgb(50, 50, 68);
const CELL_STROKE: Color32 = Color32::from_rgb(65, 65, 85);
const LABEL_LIGHT: Color32 = Color32::from_rgb(235, 235, 245);
/// 色块上的深色编号
const LABEL_DARK: Color32 = Color32::from_rgb(30, 30, 40);
/// 调色板为空时的唯一颜色
const FALLBACK_FILL: Color32 = Color32::from_rgb(245, 169, 184);

pub trait ItemTemplate {
    /// 在 `rect`（已按格子尺寸居中）内绘制一个格子
    fn paint(&self, painter: &Painter, rect: Rect, item: &ItemConfig);
}

/// 默认模板：居中显示螺旋编号
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexTemplate;

impl ItemTemplate for IndexTemplate {
    fn paint(&self, painter: &Painter, rect: Rect, item: &ItemConfig) {
        let inner = rect.shrink(4.0);
        painter.rect_filled(inner, Rounding::same(6.0), CELL_FILL);
        painter.rect_stroke(inner, Rounding::same(6.0), Stroke::new(1.0, CELL_STROKE));
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            item.grid_index.to_string(),
            label_font(rect),
            LABEL_LIGHT,
        );
    }
}

/// 按编号循环取色的色块模板
#[derive(Debug, Clone)]
pub struct PaletteTemplate {
    colors: Vec<Color32>,
}

impl PaletteTemplate {
    pub fn new(palette: &[[u8; 3]]) -> Self {
        let mut colors: Vec<Color32> = palette
            .iter()
            .map(|[r, g, b]| Color32::from_rgb(*r, *g, *b))
            .collect();
        if colors.is_empty() {
            colors.push(FALLBACK_FILL);
        }
        Self { colors }
    }

    pub fn color_for(&self, grid_index: u64) -> Color32 {
        self.colors[(grid_index % self.colors.len() as u64) as usize]
    }
}

impl ItemTemplate for PaletteTemplate {
    fn paint(&self, painter: &Painter, rect: Rect, item: &ItemConfig) {
        let fill = self.color_for(item.grid_index);
        // 移动中淡化，停下后恢复
        let fill = if item.is_moving { fill.gamma_multiply(0.7) } else { fill };
        painter.rect_filled(rect.shrink(4.0), Rounding::same(8.0), fill);
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            item.grid_index.to_string(),
            label_font(rect),
            LABEL_DARK,
        );
    }
}

fn label_font(rect: Rect) -> FontId {
    FontId::monospace((rect.height() * 0.22).clamp(9.0, 28.0))
}
