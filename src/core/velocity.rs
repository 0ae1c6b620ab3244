//! # 速度采样与摩擦衰减
//!
//! - [`VelocityTracker`]：保存最近若干次原始速度样本，取算术平均作平滑
//! - [`friction_step`]：惯性阶段的一步减速，速度过小时给出终止信号
//!
//! 速度单位是「像素/毫秒」，惯性阶段每个有效帧把它直接加到 offset 上。

use std::collections::VecDeque;

use crate::config::grid::PhysicsConfig;
use crate::core::geometry::Point;

/// 低于此速度时惯性动画终止
pub const MIN_VELOCITY: f64 = 0.2;
/// 两次惯性步进之间的最小间隔（ms），也是重算节流间隔
pub const UPDATE_INTERVAL_MS: f64 = 16.0;
/// 平滑窗口容量
pub const VELOCITY_HISTORY_SIZE: usize = 5;
/// 常规每步衰减系数
pub const FRICTION: f64 = 0.9;
/// 低于此速度时按比例加大衰减（软着陆）
pub const VELOCITY_THRESHOLD: f64 = 0.3;

/// 滚动窗口速度平滑器
#[derive(Debug, Clone)]
pub struct VelocityTracker {
    history: VecDeque<Point>,
    capacity: usize,
}

impl Default for VelocityTracker {
    fn default() -> Self {
        Self::new(VELOCITY_HISTORY_SIZE)
    }
}

impl VelocityTracker {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            history: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// 丢弃全部样本（拖拽开始时调用）
    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// 压入一个原始样本，超出容量时淘汰最旧的，返回平滑后的速度。
    pub fn push(&mut self, raw: Point) -> Point {
        self.history.push_back(raw);
        while self.history.len() > self.capacity {
            self.history.pop_front();
        }
        self.smoothed()
    }

    /// 窗口内样本的算术平均，无样本时为零
    pub fn smoothed(&self) -> Point {
        if self.history.is_empty() {
            return Point::ZERO;
        }
        let n = self.history.len() as f64;
        let sum = self.history.iter().fold(Point::ZERO, |acc, v| acc + *v);
        Point::new(sum.x / n, sum.y / n)
    }
}

/// 当前速率对应的衰减系数
pub fn deceleration_factor(speed: f64, physics: &PhysicsConfig) -> f64 {
    if speed < physics.velocity_threshold {
        physics.friction * (speed / physics.velocity_threshold)
    } else {
        physics.friction
    }
}

/// 一步摩擦衰减。
///
/// 返回 `None` 表示速率已低于 `min_velocity`，本轮惯性结束；
/// 否则返回衰减后的下一帧速度。
pub fn friction_step(velocity: Point, physics: &PhysicsConfig) -> Option<Point> {
    let speed = velocity.length();
    if !speed.is_finite() || speed < physics.min_velocity {
        return None;
    }
    Some(velocity * deceleration_factor(speed, physics))
}
