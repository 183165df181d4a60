pub mod occlusion;
pub mod slic;

pub use occlusion::{accumulate_masks, linspace, rescale_positive, window_boundaries};
pub use slic::{count_labels, slic, SlicParams};
