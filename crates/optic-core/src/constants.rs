//! Single source of truth for names and sizes shared between Rust and the
//! generated shader. The compiler and the element model both read these, so a
//! rename here changes the emitted source and the host bindings together.

/// Name of the generated constant-buffer struct.
pub const LENS_DATA_STRUCT: &str = "LensSystemData";

/// Name of the bound constant-buffer instance inside the generated source.
pub const LENS_DATA_INSTANCE: &str = "lens_system_data";

/// Ray state type provided by the renderer's shader library.
pub const RAY_TYPE: &str = "RayInfo";

/// Prefix of the per-element debug observation buffers (`ray_observation_<id>`).
pub const OBSERVATION_BUFFER_PREFIX: &str = "ray_observation";

/// Indentation unit used for every emitted line.
pub const INDENT: &str = "    ";

/// Fixed global fields at the top of the constant buffer:
/// `film_size`, `film_resolution`, `film_distance`.
pub const GLOBAL_FIELD_COUNT: usize = 3;

/// Scalar footprint of the global fields (float2 + int2 + float).
pub const GLOBAL_SCALAR_COUNT: usize = 5;

/// Parameter fields contributed by a pass-through marker.
pub const NULL_FIELD_COUNT: usize = 1;

/// Parameter fields contributed by an aperture stop.
pub const OCCLUDER_FIELD_COUNT: usize = 3;

/// Parameter fields contributed by a spherical refracting surface.
pub const SPHERICAL_FIELD_COUNT: usize = 7;

/// Parameter fields contributed by a flat refracting surface.
pub const FLAT_FIELD_COUNT: usize = 4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_scalars_cover_fields() {
        // float2 + int2 + float
        assert_eq!(GLOBAL_SCALAR_COUNT, 2 + 2 + 1);
        assert!(GLOBAL_SCALAR_COUNT >= GLOBAL_FIELD_COUNT);
    }
}
