//! Bundled prescriptions.

use optic_core::{LensSystem, PrescriptionError};

/// Double-Gauss objective from US 2,532,751.
pub const DOUBLE_GAUSS: &str = include_str!("../../../data/prescriptions/double_gauss.json");

/// Lens system used when the caller provides no prescription.
pub fn default_lens_system() -> Result<LensSystem, PrescriptionError> {
    LensSystem::deserialize(DOUBLE_GAUSS)
}
