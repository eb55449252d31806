//! Decomposition engines: spectral and singular value decomposition.

mod spectral;
mod svd;

pub use spectral::{SpectralDecomposition, Spectrum};
pub use svd::SvdDecomposition;
