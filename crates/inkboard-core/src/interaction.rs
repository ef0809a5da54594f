//! Pointer-driven interaction state machine.
//!
//! The [`Engine`] turns normalized input events into scene mutations. Every
//! handler returns the [`Action`]s the host needs to react to; painting is
//! requested through the [`FrameScheduler`] and fetched with
//! [`Engine::take_frame`].

use crate::canvas::{Canvas, LoadNotice};
use crate::input::{Instant, MouseButton, PointerEvent, WheelEvent};
use crate::scheduler::{FrameRequest, FrameScheduler};
use crate::selection::{DragState, find_top_hit};
use crate::shapes::{Freehand, Shape, ShapeId, ShapeStyle, StickyNote, Text};
use crate::tools::{ToolKind, constrain_end};
use kurbo::{Point, Vec2};
use std::mem;

/// Stroke points closer than this (world units) to the previous point are
/// dropped.
pub const MIN_POINT_DISTANCE: f64 = 2.0;

/// Effects of an input event that the host may need to act on.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ElementAdded(ShapeId),
    ElementsRemoved(Vec<ShapeId>),
    SelectionChanged,
    ToolChanged(ToolKind),
    ViewChanged,
    /// The scheduler has work; poll [`Engine::take_frame`] on the next
    /// animation frame or at [`Engine::next_deadline`].
    RequestFrame,
}

/// Discrete editor commands, normally bound to keys or toolbar buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Undo,
    Redo,
    DeleteSelected,
    ClearAll,
    SelectAll,
    ClearSelection,
    ZoomIn,
    ZoomOut,
    ResetView,
    ZoomToFit,
    ToggleGrid,
}

/// Source of text for the text and sticky-note tools.
///
/// Called synchronously on pointer-down; `None` means the user cancelled.
pub trait TextPrompt {
    fn prompt(&mut self, tool: ToolKind, at: Point) -> Option<String>;
}

impl<F> TextPrompt for F
where
    F: FnMut(ToolKind, Point) -> Option<String>,
{
    fn prompt(&mut self, tool: ToolKind, at: Point) -> Option<String> {
        self(tool, at)
    }
}

/// The gesture in progress, tied to the pointer that started it.
#[derive(Debug, Clone, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Panning {
        pointer: u64,
        /// Screen position at pointer-down.
        origin: Point,
        pan_start: Vec2,
    },
    DrawingFreehand {
        pointer: u64,
        id: ShapeId,
    },
    DrawingShape {
        pointer: u64,
        tool: ToolKind,
        /// World position at pointer-down.
        start: Point,
        preview: Shape,
    },
    Erasing {
        pointer: u64,
    },
    Dragging {
        pointer: u64,
        drag: DragState,
    },
    Lassoing {
        pointer: u64,
        points: Vec<Point>,
    },
}

impl InteractionState {
    /// The pointer that owns the gesture, `None` when idle.
    pub fn pointer(&self) -> Option<u64> {
        match self {
            InteractionState::Idle => None,
            InteractionState::Panning { pointer, .. }
            | InteractionState::DrawingFreehand { pointer, .. }
            | InteractionState::DrawingShape { pointer, .. }
            | InteractionState::Erasing { pointer }
            | InteractionState::Dragging { pointer, .. }
            | InteractionState::Lassoing { pointer, .. } => Some(*pointer),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionState::Idle)
    }

    fn name(&self) -> &'static str {
        match self {
            InteractionState::Idle => "idle",
            InteractionState::Panning { .. } => "panning",
            InteractionState::DrawingFreehand { .. } => "drawing-freehand",
            InteractionState::DrawingShape { .. } => "drawing-shape",
            InteractionState::Erasing { .. } => "erasing",
            InteractionState::Dragging { .. } => "dragging",
            InteractionState::Lassoing { .. } => "lassoing",
        }
    }
}

/// Whiteboard interaction engine.
pub struct Engine {
    pub canvas: Canvas,
    state: InteractionState,
    scheduler: FrameScheduler,
    pan_modifier: bool,
    prompt: Option<Box<dyn TextPrompt>>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Canvas::new())
    }
}

impl Engine {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            state: InteractionState::Idle,
            scheduler: FrameScheduler::new(),
            pan_modifier: false,
            prompt: None,
        }
    }

    /// Install the text source used by the text and sticky tools.
    pub fn with_text_prompt(mut self, prompt: impl TextPrompt + 'static) -> Self {
        self.prompt = Some(Box::new(prompt));
        self
    }

    pub fn set_text_prompt(&mut self, prompt: impl TextPrompt + 'static) {
        self.prompt = Some(Box::new(prompt));
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn tool(&self) -> ToolKind {
        self.canvas.tool
    }

    /// Shape being dragged out, not yet part of the scene.
    pub fn preview(&self) -> Option<&Shape> {
        match &self.state {
            InteractionState::DrawingShape { preview, .. } => Some(preview),
            _ => None,
        }
    }

    /// Lasso polygon in progress.
    pub fn lasso_points(&self) -> Option<&[Point]> {
        match &self.state {
            InteractionState::Lassoing { points, .. } => Some(points),
            _ => None,
        }
    }

    /// Hold or release the pan modifier (space bar).
    pub fn set_pan_modifier(&mut self, held: bool) {
        self.pan_modifier = held;
    }

    pub fn pan_modifier(&self) -> bool {
        self.pan_modifier
    }

    pub fn set_style(&mut self, style: ShapeStyle) {
        self.canvas.settings.style = style;
    }

    /// Switch tools, abandoning any gesture in progress. Leaving the
    /// selection tools drops the selection.
    pub fn set_tool(&mut self, tool: ToolKind) -> Vec<Action> {
        let mut actions = self.cancel_gesture();
        if self.canvas.tool == tool {
            return actions;
        }

        log::debug!("Tool {} -> {}", self.canvas.tool.name(), tool.name());
        self.canvas.tool = tool;
        actions.push(Action::ToolChanged(tool));
        if !matches!(tool, ToolKind::Select | ToolKind::Lasso) && self.canvas.clear_selection() {
            actions.push(Action::SelectionChanged);
        }
        self.request_full(&mut actions);
        actions
    }

    /// Abandon the current gesture. Shapes already in the scene stay; a
    /// shape preview or lasso is dropped.
    pub fn cancel_gesture(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        let state = mem::take(&mut self.state);
        if !state.is_idle() {
            log::debug!("Cancelled {} gesture", state.name());
            self.request_full(&mut actions);
        }
        actions
    }

    pub fn pointer_down(&mut self, event: PointerEvent) -> Vec<Action> {
        let mut actions = Vec::new();
        if let Some(active) = self.state.pointer() {
            if active != event.id {
                log::trace!("Ignoring pointer {} while pointer {} is active", event.id, active);
                return actions;
            }
            // The matching up was lost; drop the stale gesture.
            log::debug!("Pointer {} pressed again mid-gesture", active);
            actions.extend(self.cancel_gesture());
        }

        let pointer = event.id;
        let world = self.canvas.viewport.to_world(event.position);
        let tool = self.canvas.tool;

        let pan = event.button == MouseButton::Middle
            || (event.button == MouseButton::Left && self.pan_modifier)
            || (event.button == MouseButton::Left && tool == ToolKind::Hand);
        if pan {
            self.enter(InteractionState::Panning {
                pointer,
                origin: event.position,
                pan_start: self.canvas.viewport.pan,
            });
            return actions;
        }
        if event.button != MouseButton::Left {
            return actions;
        }

        match tool {
            ToolKind::Select => {
                let hit = find_top_hit(world, &self.canvas.scene);
                let mods = event.modifiers;
                if self
                    .canvas
                    .selection
                    .select_with_modifiers(hit, mods.command(), mods.shift)
                {
                    actions.push(Action::SelectionChanged);
                    self.request_full(&mut actions);
                }
                if hit.is_some() && !self.canvas.selection.is_empty() {
                    let drag = DragState::begin(&self.canvas.selection, &self.canvas.scene, world);
                    self.enter(InteractionState::Dragging { pointer, drag });
                }
            }
            ToolKind::Eraser => {
                self.canvas.history.commit();
                self.enter(InteractionState::Erasing { pointer });
                self.erase(world, event.time, &mut actions);
            }
            ToolKind::Pen => {
                let stroke = Freehand::new(world, self.canvas.settings.style.clone());
                let id = self.canvas.commit_shape(Shape::Freehand(stroke));
                actions.push(Action::ElementAdded(id));
                self.request_segment(id, 0, &mut actions);
                self.enter(InteractionState::DrawingFreehand { pointer, id });
            }
            ToolKind::Rect
            | ToolKind::Circle
            | ToolKind::Line
            | ToolKind::Arrow
            | ToolKind::Diamond => {
                if let Some(preview) = self.canvas.settings.build_shape(tool, world, world) {
                    self.enter(InteractionState::DrawingShape {
                        pointer,
                        tool,
                        start: world,
                        preview,
                    });
                    self.request_full(&mut actions);
                }
            }
            ToolKind::Lasso => {
                self.enter(InteractionState::Lassoing {
                    pointer,
                    points: vec![world],
                });
                self.request_full(&mut actions);
            }
            ToolKind::Text | ToolKind::Sticky => {
                if let Some(shape) = self.text_entry(tool, world) {
                    let id = self.canvas.commit_shape(shape);
                    actions.push(Action::ElementAdded(id));
                    self.request_full(&mut actions);
                }
            }
            ToolKind::Hand => {}
        }
        actions
    }

    pub fn pointer_move(&mut self, event: PointerEvent) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.state.pointer() != Some(event.id) {
            return actions;
        }
        let world = self.canvas.viewport.to_world(event.position);

        match &mut self.state {
            InteractionState::Idle => {}
            InteractionState::Panning {
                origin, pan_start, ..
            } => {
                self.canvas.viewport.pan = *pan_start + (event.position - *origin);
                actions.push(Action::ViewChanged);
                self.request_full(&mut actions);
            }
            InteractionState::DrawingFreehand { id, .. } => {
                let id = *id;
                let appended_from = self
                    .canvas
                    .scene
                    .get_mut(id)
                    .and_then(Shape::as_freehand_mut)
                    .and_then(|stroke| {
                        let last = stroke.len().saturating_sub(1);
                        stroke
                            .add_point_filtered(world, MIN_POINT_DISTANCE)
                            .then_some(last)
                    });
                if let Some(from) = appended_from {
                    self.request_segment(id, from, &mut actions);
                }
            }
            InteractionState::DrawingShape {
                tool,
                start,
                preview,
                ..
            } => {
                let end = if event.modifiers.shift {
                    constrain_end(*tool, *start, world)
                } else {
                    world
                };
                if let Some(geometry) = preview.as_box_mut() {
                    geometry.end = end;
                }
                self.request_full(&mut actions);
            }
            InteractionState::Erasing { .. } => {
                self.erase(world, event.time, &mut actions);
            }
            InteractionState::Dragging { drag, .. } => {
                drag.update(&mut self.canvas.scene, world);
                self.request_full(&mut actions);
            }
            InteractionState::Lassoing { points, .. } => {
                points.push(world);
                self.request_full(&mut actions);
            }
        }
        actions
    }

    pub fn pointer_up(&mut self, event: PointerEvent) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.state.pointer() != Some(event.id) {
            return actions;
        }

        let state = mem::take(&mut self.state);
        log::debug!("Finished {} gesture", state.name());
        match state {
            InteractionState::Idle
            | InteractionState::Panning { .. }
            | InteractionState::Erasing { .. } => {}
            InteractionState::DrawingFreehand { .. } | InteractionState::Dragging { .. } => {
                self.request_full(&mut actions);
            }
            InteractionState::DrawingShape { preview, .. } => {
                let id = self.canvas.commit_shape(preview);
                actions.push(Action::ElementAdded(id));
                self.request_full(&mut actions);
            }
            InteractionState::Lassoing { points, .. } => {
                if points.len() >= 3 {
                    self.canvas
                        .selection
                        .lasso_select(&self.canvas.scene, &points);
                    log::debug!("Lasso selected {} shape(s)", self.canvas.selection.len());
                    actions.push(Action::SelectionChanged);
                    self.canvas.tool = ToolKind::Select;
                    actions.push(Action::ToolChanged(ToolKind::Select));
                }
                self.request_full(&mut actions);
            }
        }
        actions
    }

    /// Ctrl/meta + wheel zooms around the pointer; a plain wheel pans.
    pub fn wheel(&mut self, event: WheelEvent) -> Vec<Action> {
        let mut actions = Vec::new();
        if event.modifiers.command() {
            self.canvas.viewport.wheel_zoom(event.position, event.delta.y);
        } else {
            self.canvas.viewport.pan_by_wheel(event.delta);
        }
        actions.push(Action::ViewChanged);
        self.request_full(&mut actions);
        actions
    }

    pub fn execute(&mut self, command: Command) -> Vec<Action> {
        let mut actions = Vec::new();
        match command {
            Command::Undo => {
                actions.extend(self.cancel_gesture());
                if let Some(id) = self.canvas.undo() {
                    actions.push(Action::ElementsRemoved(vec![id]));
                }
            }
            Command::Redo => {
                actions.extend(self.cancel_gesture());
                if let Some(id) = self.canvas.redo() {
                    actions.push(Action::ElementAdded(id));
                }
            }
            Command::DeleteSelected => {
                actions.extend(self.cancel_gesture());
                let removed = self.canvas.delete_selected();
                if !removed.is_empty() {
                    actions.push(Action::ElementsRemoved(removed));
                    actions.push(Action::SelectionChanged);
                }
            }
            Command::ClearAll => {
                actions.extend(self.cancel_gesture());
                let removed = self.canvas.clear_all();
                if !removed.is_empty() {
                    actions.push(Action::ElementsRemoved(removed));
                }
                actions.push(Action::SelectionChanged);
            }
            Command::SelectAll => {
                if self.canvas.tool != ToolKind::Select {
                    actions.extend(self.set_tool(ToolKind::Select));
                }
                self.canvas.select_all();
                actions.push(Action::SelectionChanged);
            }
            Command::ClearSelection => {
                if self.canvas.clear_selection() {
                    actions.push(Action::SelectionChanged);
                }
            }
            Command::ZoomIn => {
                self.canvas.viewport.zoom_in();
                actions.push(Action::ViewChanged);
            }
            Command::ZoomOut => {
                self.canvas.viewport.zoom_out();
                actions.push(Action::ViewChanged);
            }
            Command::ResetView => {
                self.canvas.viewport.reset();
                actions.push(Action::ViewChanged);
            }
            Command::ZoomToFit => {
                self.canvas.fit_to_content();
                actions.push(Action::ViewChanged);
            }
            Command::ToggleGrid => {
                self.canvas.show_grid = !self.canvas.show_grid;
            }
        }
        self.request_full(&mut actions);
        actions
    }

    /// Next paint job due at `now`, if any.
    pub fn take_frame(&mut self, now: Instant) -> Option<FrameRequest> {
        self.scheduler.poll(now)
    }

    /// When the host should poll again for delayed work.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    /// Replace the board from a saved record; see [`Canvas::load_record`].
    pub fn load_record(&mut self, json: &str) -> (Vec<Action>, Option<LoadNotice>) {
        let mut actions = self.cancel_gesture();
        let notice = self.canvas.load_record(json);
        actions.push(Action::SelectionChanged);
        actions.push(Action::ViewChanged);
        self.request_full(&mut actions);
        (actions, notice)
    }

    fn enter(&mut self, state: InteractionState) {
        log::debug!("Entering {} state", state.name());
        self.state = state;
    }

    fn erase(&mut self, world: Point, now: Instant, actions: &mut Vec<Action>) {
        let selected_before = self.canvas.selection.len();
        let removed = self.canvas.erase_at(world);
        if removed.is_empty() {
            return;
        }
        actions.push(Action::ElementsRemoved(removed));
        if self.canvas.selection.len() != selected_before {
            actions.push(Action::SelectionChanged);
        }
        self.scheduler.request_debounced(now);
        actions.push(Action::RequestFrame);
    }

    fn text_entry(&mut self, tool: ToolKind, world: Point) -> Option<Shape> {
        let answer = self.prompt.as_mut().and_then(|p| p.prompt(tool, world));
        let settings = &self.canvas.settings;
        match tool {
            ToolKind::Text => {
                let text = answer.filter(|t| !t.is_empty())?;
                Some(Shape::Text(
                    Text::new(world, text)
                        .with_font_size(settings.font_size)
                        .with_style(settings.style.clone()),
                ))
            }
            ToolKind::Sticky => {
                let text = answer.filter(|t| !t.is_empty());
                Some(Shape::StickyNote(
                    StickyNote::at(world, text).with_style(settings.style.clone()),
                ))
            }
            _ => None,
        }
    }

    fn request_full(&mut self, actions: &mut Vec<Action>) {
        if self.scheduler.request_full() {
            actions.push(Action::RequestFrame);
        }
    }

    fn request_segment(&mut self, id: ShapeId, from: usize, actions: &mut Vec<Action>) {
        if self.scheduler.request_segment(id, from) {
            actions.push(Action::RequestFrame);
        }
    }
}
