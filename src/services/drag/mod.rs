//! Drag and drop engine.
//!
//! A gesture is classified into a [`DragSession`](crate::models::drag::DragSession),
//! tracked by the [`DragController`] while the pointer moves (including
//! dwelling at the view edges to change month), then either committed to the
//! store or cancelled.

pub mod classifier;
pub mod commit;
pub mod controller;
pub mod layout;
pub mod navigator;

pub use classifier::classify;
pub use commit::CommitReport;
pub use controller::{CancelReason, DragController, DragEnv, DragPhase, DropOutcome};
pub use layout::{GridLayout, HitTarget, Point, Rect, Side};
pub use navigator::{BoundaryAffordance, BoundaryNavigator, CrossBoundaryCarry};
