pub mod accumulator;
pub mod denoise;
pub mod normalize;

pub use accumulator::{AudioUnit, ChunkAccumulator};
pub use normalize::{AudioNormalizer, NormalizedWaveform, TARGET_SAMPLE_RATE};
