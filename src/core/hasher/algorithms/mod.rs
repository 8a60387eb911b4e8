//! Hash algorithm implementations. Every algorithm yields 64 bits.

mod average;
mod difference;
mod perceptual;

pub use average::AverageHasher;
pub use difference::DifferenceHasher;
pub use perceptual::PerceptualHasher;
