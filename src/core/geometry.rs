//! # 网格几何
//!
//! 纯函数集合，不持有任何状态：
//! - [`spiral_index`] / [`spiral_position`]：整数格坐标 ↔ 螺旋编号的双射
//! - [`visible_positions`]：根据视口尺寸、格子尺寸和平移量枚举可见格
//! - [`screen_transform`] / [`cell_at`]：格坐标与屏幕坐标互换
//!
//! ## 螺旋编号
//!
//! 以原点为中心，按切比雪夫距离把平面分成一圈圈的方环（layer）。
//! 第 `layer` 圈占用编号区间 `[(2·layer−1)², (2·layer+1)²)`，
//! 每圈从右侧中点 `(layer, 0)` 开始沿四条边各走 `2·layer` 格。
//!
//! ## 可寻址范围
//!
//! 坐标限定在 `[-MAX_CELL, MAX_CELL]`，对应编号 `[0, INDEX_LIMIT)`，
//! 正好填满 `u64`（最后一圈 `(2·MAX_CELL+1)² − 1 < 2⁶⁴`）。
//! 范围外的坐标 / 编号返回 `None`；可见格枚举与命中测试都不会越界。

use std::ops::{Add, AddAssign, Mul, Sub};

use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════
// 基础类型
// ═══════════════════════════════════════════════════════════

/// 屏幕空间的点（像素），也用于速度（像素/毫秒）
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// 欧氏范数
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// 格子坐标（格空间，不是像素）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CellCoord {
    pub x: i64,
    pub y: i64,
}

impl CellCoord {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// 所在方环（切比雪夫距离），对 `i64::MIN` 也不会溢出
    pub fn layer(self) -> u64 {
        self.x.unsigned_abs().max(self.y.unsigned_abs())
    }

    pub fn is_addressable(self) -> bool {
        self.layer() <= MAX_CELL as u64
    }
}

/// 容器像素尺寸
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

// ═══════════════════════════════════════════════════════════
// 距离 / 舍入
// ═══════════════════════════════════════════════════════════

pub fn distance(a: Point, b: Point) -> f64 {
    (b - a).length()
}

/// 半数向 +∞ 舍入（-2.5 → -2，2.5 → 3）。
///
/// `f64::round` 对 -2.5 给出 -3，会让中心格在负半轴上偏移一格。
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

// ═══════════════════════════════════════════════════════════
// 螺旋编号
// ═══════════════════════════════════════════════════════════

/// 可寻址坐标的绝对值上限
pub const MAX_CELL: i64 = i32::MAX as i64;

/// 可寻址编号的上界（不含），即 `(2·MAX_CELL+1)²`
pub const INDEX_LIMIT: u64 = ((2 * MAX_CELL + 1) as u64).pow(2);

/// 格坐标 → 螺旋编号，坐标越出 `MAX_CELL` 时为 `None`。
///
/// 六条判定按顺序执行，边角格同时满足多条时以先命中者为准；
/// 调整顺序会改变编号并破坏双射。
pub fn spiral_index(cell: CellCoord) -> Option<u64> {
    if !cell.is_addressable() {
        return None;
    }
    if cell == CellCoord::ORIGIN {
        return Some(0);
    }

    // (2·layer+1)² 超出 i64，统一在 i128 里算
    let (x, y) = (i128::from(cell.x), i128::from(cell.y));
    let layer = i128::from(cell.layer());
    let inner = (2 * layer - 1) * (2 * layer - 1);

    let position_in_layer = if y == 0 && x == layer {
        0
    } else if y < 0 && x == layer {
        -y
    } else if y == -layer && x > -layer {
        layer + (layer - x)
    } else if x == -layer && y < layer {
        3 * layer + (layer + y)
    } else if y == layer && x < layer {
        5 * layer + (layer + x)
    } else {
        // 回绕段：x == layer && y > 0
        7 * layer + (layer - y)
    };

    u64::try_from(inner + position_in_layer).ok()
}

/// 螺旋编号 → 格坐标，[`spiral_index`] 的逆映射。编号不小于 [`INDEX_LIMIT`] 时为 `None`。
pub fn spiral_position(index: u64) -> Option<CellCoord> {
    if index >= INDEX_LIMIT {
        return None;
    }
    if index == 0 {
        return Some(CellCoord::ORIGIN);
    }

    // 第 layer 圈的编号满足 (2l-1)² ≤ index < (2l+1)²，故 isqrt ∈ {2l-1, 2l}
    let layer = i128::from((index.isqrt() + 1) / 2);
    let inner = (2 * layer - 1) * (2 * layer - 1);
    let p = i128::from(index) - inner;

    let (x, y) = if p == 0 {
        (layer, 0)
    } else if p <= layer {
        (layer, -p)
    } else if p < 3 * layer {
        (2 * layer - p, -layer)
    } else if p < 5 * layer {
        (-layer, p - 4 * layer)
    } else if p < 7 * layer {
        (p - 6 * layer, layer)
    } else {
        (layer, 8 * layer - p)
    };
    Some(CellCoord::new(i64::try_from(x).ok()?, i64::try_from(y).ok()?))
}

// ═══════════════════════════════════════════════════════════
// 可见格枚举 / 屏幕变换
// ═══════════════════════════════════════════════════════════

/// 单轴最多枚举的格数（不含外扩），防止极小的格子尺寸撑爆可见集合
pub const MAX_CELLS_PER_AXIS: i64 = 1024;

/// 枚举视口内（外扩一圈）的全部格坐标，行优先（y 外层，x 内层）。
///
/// 这是保守的超集，不做精确裁剪。`cell_size` 非正或非有限时返回空；
/// 结果只含可寻址格，超过 [`MAX_CELLS_PER_AXIS`] 的部分截掉。
pub fn visible_positions(width: f64, height: f64, cell_size: f64, offset: Point) -> Vec<CellCoord> {
    if !(cell_size.is_finite() && cell_size > 0.0) || !width.is_finite() || !height.is_finite() {
        return Vec::new();
    }

    let (min_x, max_x) = axis_span(width, cell_size, offset.x);
    let (min_y, max_y) = axis_span(height, cell_size, offset.y);

    let capacity = ((max_x - min_x + 1) * (max_y - min_y + 1)).max(0) as usize;
    let mut positions = Vec::with_capacity(capacity);
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            positions.push(CellCoord::new(x, y));
        }
    }
    positions
}

/// 单轴上的可见闭区间 `[center − half, center + half]`，夹在可寻址范围内
fn axis_span(extent: f64, cell_size: f64, offset: f64) -> (i64, i64) {
    let cells = ((extent.max(0.0) / cell_size).ceil() as i64).min(MAX_CELLS_PER_AXIS);
    let half = (cells + 1) / 2;

    let limit = MAX_CELL as f64;
    // NaN 经 `as` 转为 0
    let center = (-round_half_up(offset / cell_size)).clamp(-limit, limit) as i64;

    ((center - half).max(-MAX_CELL), (center + half).min(MAX_CELL))
}

/// 格子中心相对图层原点的平移（尚未叠加整体 offset）
pub fn screen_transform(cell: CellCoord, cell_size: f64, viewport: Size) -> Point {
    Point::new(
        cell.x as f64 * cell_size + viewport.width / 2.0,
        cell.y as f64 * cell_size + viewport.height / 2.0,
    )
}

/// 容器内坐标 → 该处绘制的格子。格子以变换点为中心绘制，范围外为 `None`。
pub fn cell_at(point: Point, cell_size: f64, offset: Point, viewport: Size) -> Option<CellCoord> {
    if !(cell_size.is_finite() && cell_size > 0.0) {
        return None;
    }
    let local = point - offset - Point::new(viewport.width / 2.0, viewport.height / 2.0);
    let to_cell = |v: f64| {
        let rounded = round_half_up(v / cell_size);
        (rounded.abs() <= MAX_CELL as f64).then_some(rounded as i64)
    };
    Some(CellCoord::new(to_cell(local.x)?, to_cell(local.y)?))
}
