//! Domain services module

pub mod field_kinds;
pub mod renderer;
pub mod reorder;
pub mod validation;

pub use field_kinds::{kind_for, FieldKind};
pub use renderer::{render, render_fields, InputControl, InputType, RenderNode, RenderTree, RenderedStep};
pub use reorder::move_item;
pub use validation::{
    validate, validate_fields, validate_step, FailureKind, FieldFailure, ValidationError, ValidationReport,
};
