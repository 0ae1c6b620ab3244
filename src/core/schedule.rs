//! # 调度原语
//!
//! 单线程、回调驱动：这里没有真正的计时器，只有「截止时间」。
//! 宿主每帧以当前时间（ms）调用 `fire_due` / `take`，到期即触发。
//!
//! - [`Debounce`]：尾沿防抖，只有最后一次 `schedule` 的截止时间有效
//! - [`Throttle`]：限频调用，前沿立即执行，区间内的请求合并为一次尾沿执行
//! - [`FrameSlot`]：帧请求槽，对应宿主的帧节奏原语

/// 可取消的延迟回调（尾沿防抖）
#[derive(Debug, Clone)]
pub struct Debounce {
    wait_ms: f64,
    deadline: Option<f64>,
}

impl Debounce {
    pub fn new(wait_ms: f64) -> Self {
        Self {
            wait_ms,
            deadline: None,
        }
    }

    /// 重新计时，旧的截止时间作废
    pub fn schedule(&mut self, now: f64) {
        self.deadline = Some(now + self.wait_ms);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn deadline(&self) -> Option<f64> {
        self.deadline
    }

    /// 到期返回 `true` 并清除，每次计时最多触发一次
    pub fn fire_due(&mut self, now: f64) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// 限频调用：任意 `limit_ms` 窗口内最多执行一次。
///
/// 窗口外的请求立即执行；窗口内的请求登记一次尾沿执行，
/// 截止时间为上次执行时间 + `limit_ms`，多次请求只保留一次。
#[derive(Debug, Clone)]
pub struct Throttle {
    limit_ms: f64,
    last_run: Option<f64>,
    trailing: Option<f64>,
}

impl Throttle {
    pub fn new(limit_ms: f64) -> Self {
        Self {
            limit_ms,
            last_run: None,
            trailing: None,
        }
    }

    /// 请求执行。返回 `true` 表示调用方应立即执行。
    pub fn request(&mut self, now: f64) -> bool {
        match self.last_run {
            Some(last) if now - last < self.limit_ms => {
                self.trailing = Some(last + self.limit_ms);
                false
            }
            _ => {
                self.last_run = Some(now);
                self.trailing = None;
                true
            }
        }
    }

    /// 尾沿到期返回 `true`，并记为一次执行
    pub fn fire_due(&mut self, now: f64) -> bool {
        match self.trailing {
            Some(deadline) if now >= deadline => {
                self.trailing = None;
                self.last_run = Some(now);
                true
            }
            _ => false,
        }
    }

    pub fn deadline(&self) -> Option<f64> {
        self.trailing
    }

    pub fn cancel(&mut self) {
        self.trailing = None;
    }
}

/// 帧请求句柄，仅用于日志与调试
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHandle(u64);

/// 单槽帧请求：同一时刻最多挂起一个。
#[derive(Debug, Clone, Default)]
pub struct FrameSlot {
    next_id: u64,
    pending: Option<FrameHandle>,
}

impl FrameSlot {
    /// 请求下一帧；已有挂起请求时沿用它
    pub fn request(&mut self) -> FrameHandle {
        if let Some(handle) = self.pending {
            return handle;
        }
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending = Some(handle);
        handle
    }

    pub fn cancel(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }

    /// 宿主帧到来时取出挂起请求
    pub fn take(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
