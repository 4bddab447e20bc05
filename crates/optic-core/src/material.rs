use serde::{Deserialize, Serialize};

/// Optical property pair of a material at the d-line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpticalProperty {
    /// Refractive index n_d.
    pub refractive_index: f64,
    /// Abbe dispersion number V_d. `+inf` for non-dispersive media.
    pub abbe_number: f64,
}

impl OpticalProperty {
    /// Fallback for names missing from the catalog.
    ///
    /// Note this differs from the `VACUUM` entry, whose Abbe number is `+inf`.
    /// The asymmetry is kept as observed behavior because existing
    /// prescriptions may depend on it.
    pub const UNKNOWN: OpticalProperty = OpticalProperty {
        refractive_index: 1.0,
        abbe_number: 0.0,
    };

    pub const fn new(refractive_index: f64, abbe_number: f64) -> Self {
        Self {
            refractive_index,
            abbe_number,
        }
    }
}

impl Default for OpticalProperty {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

/// Catalog entries, keyed by upper-case name.
static CATALOG: &[(&str, OpticalProperty)] = &[
    ("VACUUM", OpticalProperty::new(1.0, f64::INFINITY)),
    ("AIR", OpticalProperty::new(1.000293, f64::INFINITY)),
    ("OCCLUDER", OpticalProperty::new(1.0, f64::INFINITY)),
    ("F2", OpticalProperty::new(1.620, 36.37)),
    ("F15", OpticalProperty::new(1.60570, 37.831)),
    ("UVFS", OpticalProperty::new(1.458, 67.82)),
    ("BK10", OpticalProperty::new(1.49780, 66.954)),
    ("N-BAF10", OpticalProperty::new(1.67003, 47.11)),
    ("N-BK7", OpticalProperty::new(1.51680, 64.17)),
    ("N-SF1", OpticalProperty::new(1.71736, 29.62)),
    ("N-SF2", OpticalProperty::new(1.64769, 33.82)),
    ("N-SF4", OpticalProperty::new(1.75513, 27.38)),
    ("N-SF5", OpticalProperty::new(1.67271, 32.25)),
    ("N-SF6", OpticalProperty::new(1.80518, 25.36)),
    ("N-SF6HT", OpticalProperty::new(1.80518, 25.36)),
    ("N-SF8", OpticalProperty::new(1.68894, 31.31)),
    ("N-SF10", OpticalProperty::new(1.72828, 28.53)),
    ("N-SF11", OpticalProperty::new(1.78472, 25.68)),
    ("SF1", OpticalProperty::new(1.71736, 29.51)),
    ("SF2", OpticalProperty::new(1.64769, 33.85)),
    ("SF4", OpticalProperty::new(1.75520, 27.58)),
    ("SF5", OpticalProperty::new(1.67270, 32.21)),
    ("SF6", OpticalProperty::new(1.80518, 25.43)),
    ("SF18", OpticalProperty::new(1.72150, 29.245)),
    ("BAF10", OpticalProperty::new(1.67, 47.05)),
    ("SK1", OpticalProperty::new(1.61030, 56.712)),
    ("SK16", OpticalProperty::new(1.62040, 60.306)),
    ("SSK4", OpticalProperty::new(1.61770, 55.116)),
    ("B270", OpticalProperty::new(1.52290, 58.50)),
    ("S-NPH1", OpticalProperty::new(1.8078, 22.76)),
    ("D-K59", OpticalProperty::new(1.5175, 63.50)),
    ("FLINT", OpticalProperty::new(1.6200, 36.37)),
    ("PMMA", OpticalProperty::new(1.491756, 58.00)),
    ("POLYCARB", OpticalProperty::new(1.585470, 30.00)),
];

/// Look up a material by name, ignoring ASCII case.
/// Unknown names resolve to [`OpticalProperty::UNKNOWN`].
pub fn lookup(name: &str) -> OpticalProperty {
    find(name).unwrap_or_else(|| {
        log::debug!("Unknown material '{}', using default optical property", name);
        OpticalProperty::UNKNOWN
    })
}

/// Look up a material by name, ignoring ASCII case. Returns None if not found.
pub fn find(name: &str) -> Option<OpticalProperty> {
    CATALOG
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, property)| *property)
}

/// All catalog entries in table order.
pub fn entries() -> impl Iterator<Item = (&'static str, OpticalProperty)> {
    CATALOG.iter().map(|(name, property)| (*name, *property))
}
