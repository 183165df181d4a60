pub mod embedding;
pub mod mfcc;
pub mod processing;
pub mod samples;

pub use embedding::embed_text;
pub use mfcc::mfcc_features;
pub use samples::{sample_image_uri, sample_wav_uri};
