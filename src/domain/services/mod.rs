//! Domain Services - stateless algorithms

pub mod resampler;
pub mod scaling;

pub use resampler::draw_image;
