use std::time::Duration;

use egui::{CursorIcon, Event, PointerButton, Pos2, Rect, Sense, TouchId, TouchPhase, Ui, Vec2};

use crate::core::geometry::{Point, Size};
use crate::core::grid::{CellClick, ThiingsGrid};
use crate::core::interaction::GridInput;
use crate::rendering::template::ItemTemplate;
use crate::ui::theme;

/// egui 宿主：事件翻译、帧节奏与格子绘制。
///
/// 只保存触摸跟踪状态，网格状态全部在 [`ThiingsGrid`] 里。
#[derive(Debug, Default)]
pub struct GridView {
    /// 只跟随第一个落下的触点
    active_touch: Option<TouchId>,
}

impl GridView {
    pub fn show(
        &mut self,
        ui: &mut Ui,
        grid: &mut ThiingsGrid,
        template: &dyn ItemTemplate,
    ) -> Option<CellClick> {
        let available = ui.available_size();
        let (rect, response) = ui.allocate_exact_size(available, Sense::click_and_drag());
        let now = ui.input(|i| i.time) * 1000.0;

        // 每帧重新测量容器
        let size = Some(Size::new(rect.width() as f64, rect.height() as f64));
        if grid.is_mounted() {
            grid.set_container_size(size);
        } else {
            grid.mount(size);
        }

        // ── input ────────────────────────────────────────────
        let (events, scroll) = ui.input(|i| (i.events.clone(), i.smooth_scroll_delta));
        for input in self.translate(&events, rect) {
            grid.handle_input(input, now);
        }
        if response.hovered() && scroll != Vec2::ZERO {
            // egui 的滚动量与浏览器 wheel delta 方向相反
            let delta = Point::new(-scroll.x as f64, -scroll.y as f64);
            grid.handle_input(GridInput::Wheel(delta), now);
        }
        grid.tick(now);

        // ── cells ────────────────────────────────────────────
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, theme::BG_DARK);

        // offset 只作用一次于整个图层
        let offset = grid.offset();
        let origin = rect.min + Vec2::new(offset.x as f32, offset.y as f32);
        let cell_size = Vec2::splat(grid.grid_size() as f32);
        for item in grid.item_configs() {
            let t = grid.viewport().cell_translation(item.position);
            let center = origin + Vec2::new(t.x as f32, t.y as f32);
            let cell_rect = Rect::from_center_size(center, cell_size);
            if rect.intersects(cell_rect) {
                template.paint(&painter, cell_rect, &item);
            }
        }

        // ── cursor ───────────────────────────────────────────
        if grid.is_dragging() {
            ui.ctx().set_cursor_icon(CursorIcon::Grabbing);
        } else if response.hovered() {
            ui.ctx().set_cursor_icon(CursorIcon::Grab);
        }

        // ── repaint pacing ───────────────────────────────────
        if grid.needs_frame() {
            ui.ctx().request_repaint();
        } else if let Some(deadline) = grid.next_deadline() {
            let wait_ms = (deadline - now).max(0.0);
            ui.ctx()
                .request_repaint_after(Duration::from_secs_f64(wait_ms / 1000.0));
        }

        // ── click ────────────────────────────────────────────
        if !response.clicked() {
            return None;
        }
        let pos = response.interact_pointer_pos()?;
        grid.hit_test(to_point(pos, rect))
    }

    /// egui 事件 → 网格输入。同一帧里出现触摸事件时忽略模拟出来的指针事件。
    ///
    /// 一帧内的事件共用同一个时间戳，连续的移动只保留最后一个，
    /// 否则后续样本的 dt 为零，速度会被放大。
    fn translate(&mut self, events: &[Event], rect: Rect) -> Vec<GridInput> {
        let has_touch = events.iter().any(|e| matches!(e, Event::Touch { .. }));
        let mut inputs = Vec::new();

        for event in events {
            let input = match event {
                Event::Touch { id, phase, pos, .. } => self.touch_input(*id, *phase, *pos, rect),
                _ if has_touch => None,
                Event::PointerButton {
                    pos,
                    button: PointerButton::Primary,
                    pressed,
                    ..
                } => {
                    if *pressed {
                        rect.contains(*pos)
                            .then(|| GridInput::PointerDown(to_point(*pos, rect)))
                    } else {
                        Some(GridInput::PointerUp)
                    }
                }
                Event::PointerMoved(pos) => Some(if rect.contains(*pos) {
                    GridInput::PointerMove(to_point(*pos, rect))
                } else {
                    GridInput::PointerLeave
                }),
                Event::PointerGone => Some(GridInput::PointerLeave),
                _ => None,
            };
            if let Some(input) = input {
                push_coalesced(&mut inputs, input);
            }
        }

        inputs
    }

    fn touch_input(&mut self, id: TouchId, phase: TouchPhase, pos: Pos2, rect: Rect) -> Option<GridInput> {
        match phase {
            TouchPhase::Start => {
                if self.active_touch.is_some() || !rect.contains(pos) {
                    return None;
                }
                self.active_touch = Some(id);
                Some(GridInput::TouchStart(Some(to_point(pos, rect))))
            }
            TouchPhase::Move => (self.active_touch == Some(id))
                .then(|| GridInput::TouchMove(Some(to_point(pos, rect)))),
            TouchPhase::End | TouchPhase::Cancel => {
                if self.active_touch != Some(id) {
                    return None;
                }
                self.active_touch = None;
                Some(GridInput::TouchEnd)
            }
        }
    }
}

/// 追加输入；与上一个同类的移动合并为最新位置
fn push_coalesced(inputs: &mut Vec<GridInput>, input: GridInput) {
    let same_move = matches!(
        (inputs.last(), &input),
        (Some(GridInput::PointerMove(_)), GridInput::PointerMove(_))
            | (Some(GridInput::TouchMove(_)), GridInput::TouchMove(_))
    );
    if same_move {
        inputs.pop();
    }
    inputs.push(input);
}

/// 屏幕坐标 → 容器内坐标
fn to_point(pos: Pos2, rect: Rect) -> Point {
    Point::new((pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64)
}
