//! # ThiingsGrid
//!
//! 组件实例的全部可变状态都在这里，由宿主以 `&mut self` 独占访问。
//!
//! 宿主的职责：
//! 1. 布局完成后 [`ThiingsGrid::mount`]，尺寸变化时 [`ThiingsGrid::set_container_size`]
//! 2. 把输入事件交给 [`ThiingsGrid::handle_input`]
//! 3. 每次重绘调用 [`ThiingsGrid::tick`]，并依据 [`ThiingsGrid::needs_frame`] /
//!    [`ThiingsGrid::next_deadline`] 安排下一次重绘
//! 4. 用 [`ThiingsGrid::item_configs`] 绘制格子
//!
//! 时间一律是宿主时钟的毫秒数。

use tracing::{debug, info, trace, warn};

use crate::config::grid::{GridConfig, PhysicsConfig, is_valid_grid_size};
use crate::core::geometry::{self, CellCoord, Point, Size};
use crate::core::interaction::{DragPhase, Gesture, GridInput, Interaction};
use crate::core::schedule::{Debounce, FrameSlot, Throttle};
use crate::core::velocity::friction_step;
use crate::rendering::viewport::ViewportState;

/// 可见集合中的一项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridItem {
    pub position: CellCoord,
    pub grid_index: u64,
}

/// 交给格子模板的数据
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemConfig {
    pub grid_index: u64,
    pub position: CellCoord,
    pub is_moving: bool,
}

/// 格子点击通知
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellClick {
    pub grid_index: u64,
    pub position: CellCoord,
}

#[derive(Debug)]
pub struct ThiingsGrid {
    physics: PhysicsConfig,
    viewport: ViewportState,
    rest_pos: Point,
    velocity: Point,
    is_moving: bool,
    interaction: Interaction,
    frame: FrameSlot,
    /// 上一次真正执行惯性步进的时间
    last_update_time: f64,
    stop_moving: Debounce,
    refresh: Throttle,
    items: Vec<GridItem>,
    mounted: bool,
}

impl ThiingsGrid {
    pub fn new(config: &GridConfig) -> Self {
        Self::with_physics(config.grid_size, config.initial_position, config.physics.clone())
    }

    pub fn with_physics(grid_size: f64, initial_position: Point, physics: PhysicsConfig) -> Self {
        Self {
            viewport: ViewportState::new(grid_size, initial_position),
            rest_pos: initial_position,
            velocity: Point::ZERO,
            is_moving: false,
            interaction: Interaction::new(physics.velocity_history_size),
            frame: FrameSlot::default(),
            last_update_time: f64::NEG_INFINITY,
            stop_moving: Debounce::new(physics.stop_debounce_ms),
            refresh: Throttle::new(physics.update_interval_ms),
            items: Vec::new(),
            mounted: false,
            physics,
        }
    }

    // ── lifecycle ───────────────────────────────────────────

    pub fn mount(&mut self, container: Option<Size>) {
        self.mounted = true;
        self.viewport.size = container;
        self.refresh_items();
        info!(
            grid_size = self.viewport.grid_size,
            cells = self.items.len(),
            "grid mounted"
        );
    }

    /// 取消所有挂起的帧请求与计时器，清空可见集合
    pub fn unmount(&mut self) {
        self.mounted = false;
        if let Some(handle) = self.frame.cancel() {
            trace!(?handle, "frame request cancelled on unmount");
        }
        self.stop_moving.cancel();
        self.refresh.cancel();
        self.interaction.reset();
        self.velocity = Point::ZERO;
        self.items.clear();
        info!("grid unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// 记录容器尺寸；下一次重算生效
    pub fn set_container_size(&mut self, size: Option<Size>) {
        self.viewport.size = size;
    }

    /// 修改格子尺寸并立即重算（不经节流）
    pub fn set_grid_size(&mut self, grid_size: f64) {
        if !is_valid_grid_size(grid_size) {
            warn!(grid_size, "ignoring invalid grid size");
            return;
        }
        if grid_size == self.viewport.grid_size {
            return;
        }
        debug!(from = self.viewport.grid_size, to = grid_size, "grid size changed");
        self.viewport.grid_size = grid_size;
        if self.mounted {
            self.refresh_items();
        }
    }

    // ── input ───────────────────────────────────────────────

    pub fn handle_input(&mut self, input: GridInput, now: f64) {
        if !self.mounted {
            return;
        }
        let Some(gesture) = input.normalize() else {
            return;
        };
        match gesture {
            Gesture::Press(pointer) => self.start_drag(pointer, now),
            Gesture::Drag(pointer) => self.drag_to(pointer, now),
            Gesture::Release => self.end_drag(now),
            Gesture::Wheel(delta) => self.wheel(delta, now),
        }
    }

    fn start_drag(&mut self, pointer: Point, now: f64) {
        // 先撤销挂起的惯性帧，避免旧的惯性步进与新拖拽互相覆盖
        if let Some(handle) = self.frame.cancel() {
            trace!(?handle, "inertia frame cancelled by press");
        }
        self.velocity = Point::ZERO;
        self.interaction.press(pointer, self.viewport.offset, now);
        debug!(x = pointer.x, y = pointer.y, "drag started");
    }

    fn drag_to(&mut self, pointer: Point, now: f64) {
        let Some(sample) = self.interaction.drag(pointer, now) else {
            return;
        };
        self.velocity = sample.velocity;
        self.viewport.offset = sample.offset;

        if self.refresh.request(now) {
            self.refresh_items();
        }
        self.mark_moved(now);
    }

    fn end_drag(&mut self, now: f64) {
        if !self.interaction.release() {
            return;
        }
        debug!(
            vx = self.velocity.x,
            vy = self.velocity.y,
            "drag released"
        );
        self.animate(now);
    }

    /// 把编号为 `index` 的格子移到容器中心。
    ///
    /// 视为一次瞬移：撤销惯性与拖拽，新位置直接成为静止点。编号越界时返回 `None`。
    pub fn center_on_index(&mut self, index: u64) -> Option<CellCoord> {
        let cell = geometry::spiral_position(index)?;
        if let Some(handle) = self.frame.cancel() {
            trace!(?handle, "inertia frame cancelled by jump");
        }
        self.interaction.reset();
        self.velocity = Point::ZERO;
        self.stop_moving.cancel();
        self.is_moving = false;

        let size = self.viewport.grid_size;
        self.viewport.offset = Point::new(-(cell.x as f64) * size, -(cell.y as f64) * size);
        self.rest_pos = self.viewport.offset;
        if self.mounted {
            self.refresh_items();
        }
        debug!(index, x = cell.x, y = cell.y, "centred on cell");
        Some(cell)
    }

    fn wheel(&mut self, delta: Point, now: f64) {
        self.viewport.offset = self.viewport.offset - delta;
        self.velocity = Point::ZERO;
        if self.refresh.request(now) {
            self.refresh_items();
        }
    }

    // ── frame / timers ──────────────────────────────────────

    /// 宿主每次重绘调用：先处理到期计时器，再执行挂起的帧
    pub fn tick(&mut self, now: f64) {
        if !self.mounted {
            return;
        }
        if self.refresh.fire_due(now) {
            self.refresh_items();
        }
        if self.stop_moving.fire_due(now) {
            self.is_moving = false;
            self.rest_pos = self.viewport.offset;
            trace!("movement stopped");
        }
        if self.frame.take().is_some() {
            self.animate(now);
        }
    }

    /// 惯性步进。节奏不足 `update_interval_ms` 的帧只负责续约。
    fn animate(&mut self, now: f64) {
        if !self.mounted {
            return;
        }

        if now - self.last_update_time >= self.physics.update_interval_ms {
            let Some(next_velocity) = friction_step(self.velocity, &self.physics) else {
                self.velocity = Point::ZERO;
                self.last_update_time = now;
                self.interaction.settle();
                debug!(
                    x = self.viewport.offset.x,
                    y = self.viewport.offset.y,
                    "inertia settled"
                );
                return;
            };

            self.viewport.pan(self.velocity);
            self.velocity = next_velocity;
            self.last_update_time = now;

            self.refresh_items();
            self.mark_moved(now);
        }

        self.frame.request();
    }

    fn mark_moved(&mut self, now: f64) {
        self.is_moving =
            geometry::distance(self.viewport.offset, self.rest_pos) > self.physics.moving_threshold_px;
        self.stop_moving.schedule(now);
    }

    /// 重算可见集合，整体替换
    fn refresh_items(&mut self) {
        self.items = self
            .viewport
            .visible_cells()
            .into_iter()
            .filter_map(|position| {
                let grid_index = geometry::spiral_index(position)?;
                Some(GridItem { position, grid_index })
            })
            .collect();
    }

    // ── host queries ────────────────────────────────────────

    /// 宿主是否需要在下一帧调用 `tick`
    pub fn needs_frame(&self) -> bool {
        self.mounted && self.frame.is_pending()
    }

    /// 最近的计时器截止时间
    pub fn next_deadline(&self) -> Option<f64> {
        if !self.mounted {
            return None;
        }
        match (self.refresh.deadline(), self.stop_moving.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn items(&self) -> &[GridItem] {
        &self.items
    }

    pub fn item_configs(&self) -> impl Iterator<Item = ItemConfig> + '_ {
        let is_moving = self.is_moving;
        self.items.iter().map(move |item| ItemConfig {
            grid_index: item.grid_index,
            position: item.position,
            is_moving,
        })
    }

    /// 容器内坐标命中的格子
    pub fn hit_test(&self, point: Point) -> Option<CellClick> {
        if !self.mounted {
            return None;
        }
        let position = self.viewport.cell_at(point)?;
        Some(CellClick {
            grid_index: geometry::spiral_index(position)?,
            position,
        })
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn offset(&self) -> Point {
        self.viewport.offset
    }

    pub fn grid_size(&self) -> f64 {
        self.viewport.grid_size
    }

    pub fn velocity(&self) -> Point {
        self.velocity
    }

    pub fn phase(&self) -> DragPhase {
        self.interaction.phase()
    }

    pub fn is_dragging(&self) -> bool {
        self.interaction.is_dragging()
    }

    pub fn is_moving(&self) -> bool {
        self.is_moving
    }

    pub fn rest_position(&self) -> Point {
        self.rest_pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mounted_grid() -> ThiingsGrid {
        let mut grid = ThiingsGrid::with_physics(80.0, Point::ZERO, PhysicsConfig::default());
        grid.mount(Some(Size::new(320.0, 320.0)));
        grid
    }

    /// 以 16ms 帧节奏推进，直到不再请求帧或超过 max_frames
    fn run_frames(grid: &mut ThiingsGrid, mut now: f64, max_frames: usize) -> f64 {
        for _ in 0..max_frames {
            if !grid.needs_frame() {
                break;
            }
            now += 16.0;
            grid.tick(now);
        }
        now
    }

    #[test]
    fn test_mount_builds_visible_set() {
        let grid = mounted_grid();
        assert_eq!(grid.items().len(), 25);
        let center = grid.items().iter().find(|i| i.position == CellCoord::ORIGIN);
        assert_eq!(center.map(|i| i.grid_index), Some(0));
        assert!(grid.item_configs().all(|c| !c.is_moving));
    }

    #[test]
    fn test_unmeasured_container_yields_empty_set() {
        let mut grid = ThiingsGrid::with_physics(80.0, Point::ZERO, PhysicsConfig::default());
        grid.mount(None);
        assert!(grid.items().is_empty());
    }

    #[test]
    fn test_initial_position_applied() {
        let mut grid =
            ThiingsGrid::with_physics(80.0, Point::new(160.0, 0.0), PhysicsConfig::default());
        grid.mount(Some(Size::new(320.0, 320.0)));
        assert_eq!(grid.offset(), Point::new(160.0, 0.0));
        assert_eq!(grid.rest_position(), Point::new(160.0, 0.0));
        assert_eq!(grid.items().first().map(|i| i.position), Some(CellCoord::new(-4, -2)));
    }

    #[test]
    fn test_drag_round_trip_without_inertia() {
        let mut grid = mounted_grid();
        let before = grid.offset();
        grid.handle_input(GridInput::PointerDown(Point::new(100.0, 100.0)), 1000.0);
        assert!(grid.is_dragging());
        grid.handle_input(GridInput::PointerMove(Point::new(140.0, 70.0)), 1100.0);
        assert_eq!(grid.offset(), before + Point::new(40.0, -30.0));
        assert!(grid.is_moving());
        // |v| = 0.5 会触发惯性；原地停留把平滑窗口填满零样本
        grid.handle_input(GridInput::PointerMove(Point::new(140.0, 70.0)), 2100.0);
        grid.handle_input(GridInput::PointerMove(Point::new(140.0, 70.0)), 3100.0);
        grid.handle_input(GridInput::PointerMove(Point::new(140.0, 70.0)), 4100.0);
        grid.handle_input(GridInput::PointerMove(Point::new(140.0, 70.0)), 5100.0);
        grid.handle_input(GridInput::PointerMove(Point::new(140.0, 70.0)), 6100.0);
        assert_eq!(grid.velocity(), Point::ZERO);

        grid.handle_input(GridInput::PointerUp, 6100.0);
        assert!(!grid.is_dragging());
        assert!(!grid.needs_frame());
        assert_eq!(grid.phase(), DragPhase::Idle);
        assert_eq!(grid.offset(), before + Point::new(40.0, -30.0));
    }

    #[test]
    fn test_slow_release_settles_within_debounce() {
        let mut grid = mounted_grid();
        grid.handle_input(GridInput::PointerDown(Point::ZERO), 0.0);
        // 20px / 2000ms = 0.01 px/ms
        grid.handle_input(GridInput::PointerMove(Point::new(20.0, 0.0)), 2000.0);
        assert!(grid.is_moving());
        assert!(grid.velocity().length() < 0.2);

        grid.handle_input(GridInput::PointerUp, 2000.0);
        let released_at = grid.offset();
        assert!(!grid.needs_frame());
        assert_eq!(grid.velocity(), Point::ZERO);

        grid.tick(2100.0);
        assert!(grid.is_moving());
        grid.tick(2200.0);
        assert!(!grid.is_moving());
        assert_eq!(grid.offset(), released_at);
        assert_eq!(grid.rest_position(), released_at);
    }

    #[test]
    fn test_fast_release_coasts_and_terminates() {
        let mut grid = mounted_grid();
        grid.handle_input(GridInput::PointerDown(Point::ZERO), 0.0);
        for i in 1..=5 {
            grid.handle_input(GridInput::PointerMove(Point::new(i as f64 * 32.0, 0.0)), i as f64 * 16.0);
        }
        assert_eq!(grid.velocity(), Point::new(2.0, 0.0));
        let released_at = grid.offset();

        grid.handle_input(GridInput::PointerUp, 80.0);
        assert_eq!(grid.phase(), DragPhase::Inertial);
        // 松手即执行第一步
        assert_eq!(grid.offset(), released_at + Point::new(2.0, 0.0));
        assert!(grid.needs_frame());

        let end = run_frames(&mut grid, 80.0, 1000);
        assert!(!grid.needs_frame());
        assert_eq!(grid.phase(), DragPhase::Idle);
        assert_eq!(grid.velocity(), Point::ZERO);
        assert!(grid.offset().x > released_at.x + 2.0);
        // 几何级数 2 / (1 - 0.9) 给出滑行距离上限
        assert!(grid.offset().x < released_at.x + 20.0);

        grid.tick(end + 200.0);
        assert!(!grid.is_moving());
        assert_eq!(grid.rest_position(), grid.offset());
    }

    #[test]
    fn test_fast_frames_are_no_ops() {
        let mut grid = mounted_grid();
        grid.handle_input(GridInput::PointerDown(Point::ZERO), 0.0);
        grid.handle_input(GridInput::PointerMove(Point::new(30.0, 0.0)), 10.0);
        grid.handle_input(GridInput::PointerUp, 10.0);
        let after_first = grid.offset();

        grid.tick(15.0);
        assert_eq!(grid.offset(), after_first);
        assert!(grid.needs_frame());

        grid.tick(26.0);
        assert!(grid.offset().x > after_first.x);
    }

    #[test]
    fn test_press_cancels_inertia() {
        let mut grid = mounted_grid();
        grid.handle_input(GridInput::PointerDown(Point::ZERO), 0.0);
        grid.handle_input(GridInput::PointerMove(Point::new(50.0, 0.0)), 10.0);
        grid.handle_input(GridInput::PointerUp, 10.0);
        assert!(grid.needs_frame());

        grid.handle_input(GridInput::PointerDown(Point::new(200.0, 200.0)), 20.0);
        assert!(!grid.needs_frame());
        assert_eq!(grid.velocity(), Point::ZERO);
        let held = grid.offset();
        grid.tick(100.0);
        assert_eq!(grid.offset(), held);
        assert_eq!(grid.phase(), DragPhase::Dragging);
    }

    #[test]
    fn test_wheel_pans_without_drag() {
        let mut grid = mounted_grid();
        grid.handle_input(GridInput::Wheel(Point::new(10.0, -25.0)), 0.0);
        assert_eq!(grid.offset(), Point::new(-10.0, 25.0));
        assert_eq!(grid.phase(), DragPhase::Idle);
        assert_eq!(grid.velocity(), Point::ZERO);
        assert!(!grid.needs_frame());
    }

    #[test]
    fn test_wheel_refresh_is_throttled() {
        let mut grid = mounted_grid();
        grid.handle_input(GridInput::Wheel(Point::new(80.0, 0.0)), 100.0);
        assert_eq!(grid.items().first().map(|i| i.position), Some(CellCoord::new(-1, -2)));

        // 窗口内的第二次滚动先不重算
        grid.handle_input(GridInput::Wheel(Point::new(80.0, 0.0)), 105.0);
        assert_eq!(grid.items().first().map(|i| i.position), Some(CellCoord::new(-1, -2)));
        assert_eq!(grid.next_deadline(), Some(116.0));

        grid.tick(116.0);
        assert_eq!(grid.items().first().map(|i| i.position), Some(CellCoord::new(0, -2)));
        assert_eq!(grid.next_deadline(), None);
    }

    #[test]
    fn test_touch_without_point_ignored() {
        let mut grid = mounted_grid();
        grid.handle_input(GridInput::TouchStart(None), 0.0);
        assert_eq!(grid.phase(), DragPhase::Idle);
        grid.handle_input(GridInput::TouchStart(Some(Point::new(5.0, 5.0))), 0.0);
        grid.handle_input(GridInput::TouchMove(None), 10.0);
        assert_eq!(grid.offset(), Point::ZERO);
        grid.handle_input(GridInput::TouchMove(Some(Point::new(15.0, 5.0))), 20.0);
        assert_eq!(grid.offset(), Point::new(10.0, 0.0));
    }

    #[test]
    fn test_grid_size_change_refreshes_immediately() {
        let mut grid = mounted_grid();
        grid.handle_input(GridInput::Wheel(Point::new(1.0, 0.0)), 0.0);
        grid.set_grid_size(160.0);
        // 320 / 160 = 2 格 → 半宽 1 → 3×3
        assert_eq!(grid.items().len(), 9);
        grid.set_grid_size(0.0);
        grid.set_grid_size(f64::NAN);
        assert_eq!(grid.grid_size(), 160.0);
    }

    #[test]
    fn test_unmount_cancels_pending_work() {
        let mut grid = mounted_grid();
        grid.handle_input(GridInput::PointerDown(Point::ZERO), 0.0);
        grid.handle_input(GridInput::PointerMove(Point::new(60.0, 0.0)), 10.0);
        grid.handle_input(GridInput::PointerUp, 10.0);
        assert!(grid.needs_frame());

        grid.unmount();
        assert!(!grid.needs_frame());
        assert_eq!(grid.next_deadline(), None);
        assert!(grid.items().is_empty());

        let frozen = grid.offset();
        grid.tick(1000.0);
        grid.handle_input(GridInput::Wheel(Point::new(5.0, 5.0)), 1000.0);
        assert_eq!(grid.offset(), frozen);
        assert!(grid.items().is_empty());
    }

    #[test]
    fn test_hit_test_resolves_spiral_index() {
        let grid = mounted_grid();
        // 容器中心右侧一格
        let click = grid.hit_test(Point::new(160.0 + 80.0, 160.0)).unwrap();
        assert_eq!(click.position, CellCoord::new(1, 0));
        assert_eq!(click.grid_index, 1);
    }

    #[test]
    fn test_one_move_per_frame_keeps_true_velocity() {
        let mut grid = mounted_grid();
        grid.handle_input(GridInput::PointerDown(Point::ZERO), 0.0);
        grid.handle_input(GridInput::PointerMove(Point::new(16.0, 0.0)), 16.0);
        assert_eq!(grid.velocity(), Point::new(1.0, 0.0));
        grid.handle_input(GridInput::PointerMove(Point::new(48.0, 0.0)), 32.0);
        // 平均 (1 + 2) / 2
        assert_eq!(grid.velocity(), Point::new(1.5, 0.0));
    }

    #[test]
    fn test_center_on_index_jumps_and_stops_inertia() {
        let mut grid = mounted_grid();
        grid.handle_input(GridInput::PointerDown(Point::ZERO), 0.0);
        grid.handle_input(GridInput::PointerMove(Point::new(50.0, 0.0)), 10.0);
        grid.handle_input(GridInput::PointerUp, 10.0);
        assert!(grid.needs_frame());

        // 7 号格在 (0, 1)
        assert_eq!(grid.center_on_index(7), Some(CellCoord::new(0, 1)));
        assert_eq!(grid.offset(), Point::new(0.0, -80.0));
        assert_eq!(grid.rest_position(), grid.offset());
        assert!(!grid.needs_frame());
        assert!(!grid.is_moving());
        assert_eq!(grid.phase(), DragPhase::Idle);
        assert_eq!(grid.next_deadline(), None);

        let click = grid.hit_test(Point::new(160.0, 160.0)).unwrap();
        assert_eq!(click.grid_index, 7);

        let held = grid.offset();
        assert_eq!(grid.center_on_index(u64::MAX), None);
        assert_eq!(grid.offset(), held);
    }

    #[test]
    fn test_tiny_grid_size_rejected() {
        let mut grid = mounted_grid();
        grid.set_grid_size(1e-6);
        assert_eq!(grid.grid_size(), 80.0);
        assert_eq!(grid.items().len(), 25);
    }
}
