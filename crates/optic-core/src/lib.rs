pub mod constants;
pub mod element;
pub mod error;
pub mod material;
pub mod prescription;
pub mod system;

pub use element::{FlatLens, LensElement, NullLayer, Occluder, SphericalLens};
pub use error::PrescriptionError;
pub use material::OpticalProperty;
pub use system::LensSystem;
