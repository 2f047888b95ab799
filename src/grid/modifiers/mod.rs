//! Grid modifiers: wrappers that compose with any [`super::GridTrait`] (spec §4.3).

mod bijection;
mod bound_by;
mod mask;
mod nested;

pub use bijection::BijectionModifier;
pub use bound_by::BoundByModifier;
pub use mask::MaskModifier;
pub use nested::NestedModifier;
