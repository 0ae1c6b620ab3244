use crate::core::geometry::{self, CellCoord, Point, Size};

/// 视口：容器尺寸 + 格子尺寸 + 整体平移
#[derive(Debug, Clone)]
pub struct ViewportState {
    /// 尚未完成首次布局时为 `None`
    pub size: Option<Size>,
    pub grid_size: f64,
    pub offset: Point,
}

impl ViewportState {
    pub fn new(grid_size: f64, offset: Point) -> Self {
        Self {
            size: None,
            grid_size,
            offset,
        }
    }

    pub fn pan(&mut self, delta: Point) {
        self.offset += delta;
    }

    /// 可见格子；容器未测量时为空
    pub fn visible_cells(&self) -> Vec<CellCoord> {
        match self.size {
            Some(size) => {
                geometry::visible_positions(size.width, size.height, self.grid_size, self.offset)
            }
            None => Vec::new(),
        }
    }

    /// 格子中心相对图层原点的位置
    pub fn cell_translation(&self, cell: CellCoord) -> Point {
        geometry::screen_transform(cell, self.grid_size, self.size.unwrap_or_default())
    }

    /// 容器内坐标下的格子命中
    pub fn cell_at(&self, point: Point) -> Option<CellCoord> {
        let size = self.size?;
        geometry::cell_at(point, self.grid_size, self.offset, size)
    }
}
