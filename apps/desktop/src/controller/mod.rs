//! Controller layer: workflow events, pure state transitions, and the workflow holder.

pub mod events;
pub mod orchestration;
pub mod reducer;
