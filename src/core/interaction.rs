//! # 交互状态机
//!
//! 把鼠标 / 触摸 / 滚轮事件归一化为 [`Gesture`]，并维护拖拽生命周期：
//!
//! ```text
//! Idle ──press──▶ Dragging ──release──▶ Inertial ──settle──▶ Idle
//!   ▲                ▲                     │
//!   └────────────────┴────────press────────┘
//! ```
//!
//! 这里只负责拖拽相关的坐标与速度采样；offset 的所有权在 `ThiingsGrid`。

use crate::core::geometry::Point;
use crate::core::velocity::VelocityTracker;

/// 两次移动采样间隔的下限（ms）
pub const MIN_SAMPLE_DT_MS: f64 = 1.0;

/// 宿主送入的原始输入
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridInput {
    PointerDown(Point),
    PointerMove(Point),
    PointerUp,
    PointerLeave,
    /// 第一个触点；没有触点时为 `None`
    TouchStart(Option<Point>),
    TouchMove(Option<Point>),
    TouchEnd,
    /// 滚轮增量，正值表示内容向左 / 向上滚走
    Wheel(Point),
}

/// 归一化后的手势
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Press(Point),
    Drag(Point),
    Release,
    Wheel(Point),
}

impl GridInput {
    /// 没有触点的触摸事件不构成手势
    pub fn normalize(self) -> Option<Gesture> {
        match self {
            Self::PointerDown(p) => Some(Gesture::Press(p)),
            Self::PointerMove(p) => Some(Gesture::Drag(p)),
            Self::PointerUp | Self::PointerLeave | Self::TouchEnd => Some(Gesture::Release),
            Self::TouchStart(touch) => touch.map(Gesture::Press),
            Self::TouchMove(touch) => touch.map(Gesture::Drag),
            Self::Wheel(delta) => Some(Gesture::Wheel(delta)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    Dragging,
    /// 松手后的惯性减速
    Inertial,
}

/// 一次拖拽移动的结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSample {
    pub offset: Point,
    pub velocity: Point,
}

#[derive(Debug, Clone)]
pub struct Interaction {
    phase: DragPhase,
    /// 指针位置与 offset 的差，拖拽期间保持不变
    start_pos: Point,
    last_pos: Point,
    last_move_time: f64,
    tracker: VelocityTracker,
}

impl Interaction {
    pub fn new(history_size: usize) -> Self {
        Self {
            phase: DragPhase::Idle,
            start_pos: Point::ZERO,
            last_pos: Point::ZERO,
            last_move_time: 0.0,
            tracker: VelocityTracker::new(history_size),
        }
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn is_dragging(&self) -> bool {
        self.phase == DragPhase::Dragging
    }

    /// 按下：进入 Dragging，清空速度样本
    pub fn press(&mut self, pointer: Point, offset: Point, now: f64) {
        self.phase = DragPhase::Dragging;
        self.start_pos = pointer - offset;
        self.last_pos = pointer;
        self.last_move_time = now;
        self.tracker.clear();
    }

    /// 拖拽移动；非拖拽状态返回 `None`
    pub fn drag(&mut self, pointer: Point, now: f64) -> Option<DragSample> {
        if !self.is_dragging() {
            return None;
        }

        // NaN 经 max 也落到下限
        let dt = (now - self.last_move_time).max(MIN_SAMPLE_DT_MS);
        let delta = pointer - self.last_pos;
        let raw = Point::new(delta.x / dt, delta.y / dt);
        let velocity = self.tracker.push(raw);

        self.last_pos = pointer;
        self.last_move_time = now;

        Some(DragSample {
            offset: pointer - self.start_pos,
            velocity,
        })
    }

    /// 松手：Dragging → Inertial。返回是否真的结束了一次拖拽。
    pub fn release(&mut self) -> bool {
        if !self.is_dragging() {
            return false;
        }
        self.phase = DragPhase::Inertial;
        true
    }

    /// 惯性结束：Inertial → Idle
    pub fn settle(&mut self) {
        if self.phase == DragPhase::Inertial {
            self.phase = DragPhase::Idle;
        }
    }

    /// 卸载时强制回到 Idle
    pub fn reset(&mut self) {
        self.phase = DragPhase::Idle;
        self.tracker.clear();
    }
}
