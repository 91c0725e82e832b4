//! # Drag-Interaction Controller
//!
//! State machine over a single pointer gesture:
//!
//! ```text
//! Idle ──pointer_down──→ Pressed ──moved ≥ threshold──→ Dragging
//!  ↑                        │                              │
//!  └──── pointer_up (click) ┘      pointer_up / cancel ────┘
//! ```
//!
//! Resolving the pointer position to a column and insertion index is the
//! host's job (it owns the geometry); it reports the result through
//! [`DragController::hover`]. The controller owns what a drop *means*: a
//! palette drop creates and inserts an element, an element drop moves it.

use funnel_model::{create_element, ElementKind};
use tracing::{debug, info};

use crate::config::EditorConfig;
use crate::mutations::{Mutation, MutationOutcome};
use crate::sink::MutationSink;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn crossed_threshold(self, current: Point, threshold: f64) -> bool {
        let dx = current.x - self.x;
        let dy = current.y - self.y;
        dx * dx + dy * dy >= threshold * threshold
    }
}

/// What is being dragged
#[derive(Debug, Clone, PartialEq)]
pub enum DragPayload {
    FromPalette(ElementKind),
    ExistingElement(String),
}

/// Resolved drop position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropTarget {
    pub section_id: String,
    pub row_id: String,
    pub column_id: String,
    pub index_hint: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DragState {
    Idle,
    /// Pointer down, activation distance not yet crossed
    Pressed { payload: DragPayload, origin: Point },
    Dragging {
        payload: DragPayload,
        position: Point,
        target: Option<DropTarget>,
    },
}

/// How a gesture ended
#[derive(Debug, Clone, PartialEq)]
pub enum DragEnd {
    /// Released before the activation distance: a click, not a drop
    Click(DragPayload),
    /// Released over nothing, or cancelled
    Cancelled,
    /// Released over a target; the outcome of the applied mutation
    Dropped(MutationOutcome),
    /// No gesture was in progress
    NotDragging,
}

#[derive(Debug, Clone)]
pub struct DragController {
    activation_distance: f64,
    state: DragState,
}

impl DragController {
    pub fn new(activation_distance: f64) -> Self {
        Self {
            activation_distance,
            state: DragState::Idle,
        }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(config.drag_activation_distance)
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn payload(&self) -> Option<&DragPayload> {
        match &self.state {
            DragState::Idle => None,
            DragState::Pressed { payload, .. } | DragState::Dragging { payload, .. } => {
                Some(payload)
            }
        }
    }

    pub fn target(&self) -> Option<&DropTarget> {
        match &self.state {
            DragState::Dragging { target, .. } => target.as_ref(),
            _ => None,
        }
    }

    /// Start a gesture. Ignored while another gesture is in progress.
    pub fn pointer_down(&mut self, payload: DragPayload, at: Point) -> bool {
        if !matches!(self.state, DragState::Idle) {
            debug!("Pointer down during active gesture, ignoring");
            return false;
        }

        self.state = DragState::Pressed {
            payload,
            origin: at,
        };
        true
    }

    /// Returns true when this move started the drag
    pub fn pointer_move(&mut self, at: Point) -> bool {
        match &mut self.state {
            DragState::Pressed { payload, origin } => {
                if !origin.crossed_threshold(at, self.activation_distance) {
                    return false;
                }
                debug!(?payload, "Drag started");
                self.state = DragState::Dragging {
                    payload: payload.clone(),
                    position: at,
                    target: None,
                };
                true
            }
            DragState::Dragging { position, .. } => {
                *position = at;
                false
            }
            DragState::Idle => false,
        }
    }

    /// Host-resolved drop target under the pointer
    pub fn hover(&mut self, resolved: Option<DropTarget>) {
        if let DragState::Dragging { target, .. } = &mut self.state {
            *target = resolved;
        }
    }

    /// Abort the gesture without mutating anything
    pub fn cancel(&mut self) -> bool {
        let was_active = !matches!(self.state, DragState::Idle);
        if was_active {
            debug!("Drag cancelled");
        }
        self.state = DragState::Idle;
        was_active
    }

    /// Finish the gesture, committing through `sink` when there is a target
    pub fn pointer_up(&mut self, sink: &mut impl MutationSink) -> DragEnd {
        match std::mem::replace(&mut self.state, DragState::Idle) {
            DragState::Idle => DragEnd::NotDragging,
            DragState::Pressed { payload, .. } => DragEnd::Click(payload),
            DragState::Dragging { target: None, .. } => {
                debug!("Dropped outside any column");
                DragEnd::Cancelled
            }
            DragState::Dragging {
                payload,
                target: Some(target),
                ..
            } => DragEnd::Dropped(commit(sink, payload, target)),
        }
    }
}

impl Default for DragController {
    fn default() -> Self {
        Self::from_config(&EditorConfig::default())
    }
}

fn commit(sink: &mut impl MutationSink, payload: DragPayload, target: DropTarget) -> MutationOutcome {
    match payload {
        DragPayload::FromPalette(kind) => {
            let element = create_element(kind);
            info!(kind = %element.kind, column_id = %target.column_id, "Dropping new element");

            let outcome = sink.apply(Mutation::InsertElement {
                section_id: target.section_id,
                row_id: target.row_id,
                column_id: target.column_id,
                element,
                index: Some(target.index_hint),
            });
            if let Some(id) = outcome.created_id() {
                sink.select(Some(id));
            }
            outcome
        }
        DragPayload::ExistingElement(element_id) => {
            info!(%element_id, column_id = %target.column_id, "Dropping existing element");

            sink.apply(Mutation::MoveElement {
                element_id,
                target_column_id: target.column_id,
                index: target.index_hint,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_movement_stays_pressed() {
        let mut drag = DragController::new(5.0);
        assert!(drag.pointer_down(DragPayload::FromPalette(ElementKind::Text), Point::new(0.0, 0.0)));

        assert!(!drag.pointer_move(Point::new(3.0, 3.0)));
        assert!(!drag.is_dragging());

        assert!(drag.pointer_move(Point::new(3.0, 4.0)));
        assert!(drag.is_dragging());
    }

    #[test]
    fn test_second_pointer_down_is_ignored() {
        let mut drag = DragController::new(5.0);
        drag.pointer_down(DragPayload::ExistingElement("a".into()), Point::default());
        drag.pointer_move(Point::new(10.0, 0.0));

        assert!(!drag.pointer_down(DragPayload::ExistingElement("b".into()), Point::default()));
        assert_eq!(drag.payload(), Some(&DragPayload::ExistingElement("a".into())));
    }

    #[test]
    fn test_hover_only_applies_while_dragging() {
        let mut drag = DragController::new(5.0);
        let target = DropTarget {
            section_id: "s".into(),
            row_id: "r".into(),
            column_id: "c".into(),
            index_hint: 0,
        };

        drag.hover(Some(target.clone()));
        assert_eq!(drag.target(), None);

        drag.pointer_down(DragPayload::FromPalette(ElementKind::Button), Point::default());
        drag.pointer_move(Point::new(0.0, 8.0));
        drag.hover(Some(target.clone()));
        assert_eq!(drag.target(), Some(&target));

        assert!(drag.cancel());
        assert_eq!(drag.state(), &DragState::Idle);
    }
}
