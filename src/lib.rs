// src/lib.rs

//! `interface_inputs` provides the input components of a model demo interface:
//! converting submitted widget values into model-ready data, and producing
//! leave-one-out neighbor sets so a model's prediction can be attributed back to
//! parts of its input.

// Declare the main modules of the crate
pub mod algorithms;
pub mod component;
pub mod components;
pub mod core;
pub mod shortcuts;
pub mod traits;
pub mod utils;

// Re-export key components for easier use by library consumers
pub use crate::component::{Component, ComponentKind, ComponentSpec, WireNeighbors};
pub use crate::components::*;
pub use crate::core::{
    AuxPayload, ComponentError, Interpretation, NativeValue, Neighbors, Result, Samples,
};
pub use crate::shortcuts::{shortcut, shortcuts};
pub use crate::traits::{InputComponent, Interpretable, Rebuild};
