//! Fixed shader text shared by every compiled lens system.
//!
//! Coordinates: the optical axis is +z, the film sits at `z = -film_distance`
//! and the first surface at `z = axial_pos` of element 0.

/// Includes and imports at the top of every generated source.
pub const HEADER: &str = r#"#include "utils/random.slangh"
#include "utils/ray.h"
import Utils.Math.MathHelpers;
"#;

/// Snell refraction shared by the refracting surfaces. Zeroes the weight on
/// total internal reflection.
pub const REFRACT: &str = r#"
float3 refract_dir(float3 dir, float3 normal, float ior_in, float ior_out, inout float3 weight)
{
    // orient the normal against the incoming ray
    if (dot(dir, normal) > 0.0) {
        normal = -normal;
    }
    float eta = ior_in / ior_out;
    float cosi = -dot(dir, normal);
    float k = 1.0 - eta * eta * (1.0 - cosi * cosi);
    if (k < 0.0) {
        weight = 0;
        return dir;
    }
    return normalize(eta * dir + (eta * cosi - sqrt(k)) * normal);
}
"#;

pub const SPHERE_INTERSECTION: &str = r#"
RayInfo intersect_sphere(
    RayInfo ray,
    inout float3 weight,
    float radius,
    float center_pos,
    float theta_range,
    float ior_in,
    float refractive_index,
    float abbe_number)
{
    float3 sphere_center = float3(0, 0, center_pos);
    float3 oc = ray.Origin - sphere_center;

    float a = dot(ray.Direction, ray.Direction);
    float b = 2.0 * dot(oc, ray.Direction);
    float c = dot(oc, oc) - radius * radius;
    float discriminant = b * b - 4.0 * a * c;
    if (discriminant < 0.0) {
        weight = 0;
        return ray;
    }

    // the vertex faces -z for positive radii, +z for negative ones
    float t1 = (-b - sqrt(discriminant)) / (2.0 * a);
    float t2 = (-b + sqrt(discriminant)) / (2.0 * a);
    float t = (radius > 0.0) ? t1 : t2;
    if (t < 0.0) {
        weight = 0;
        return ray;
    }

    float3 hit = ray.Origin + t * ray.Direction;
    float3 normal = normalize(hit - sphere_center);

    // clear aperture, measured as the angle between the normal and the axis
    if (acos(abs(normal.z)) > theta_range) {
        weight = 0;
        return ray;
    }

    RayInfo next;
    next.Origin = hit;
    next.TMin = 0;
    next.Direction = refract_dir(ray.Direction, normal, ior_in, refractive_index, weight);
    next.TMax = 1000.f;
    return next;
}
"#;

pub const FLAT_INTERSECTION: &str = r#"
RayInfo intersect_flat(
    RayInfo ray,
    inout float3 weight,
    float diameter,
    float center_pos,
    float ior_in,
    float refractive_index,
    float abbe_number)
{
    float t = (center_pos - ray.Origin.z) / ray.Direction.z;
    float3 hit = ray.Origin + t * ray.Direction;
    if (t < 0.0 || length(hit.xy) > 0.5 * diameter) {
        weight = 0;
        return ray;
    }

    RayInfo next;
    next.Origin = hit;
    next.TMin = 0;
    next.Direction = refract_dir(ray.Direction, float3(0, 0, 1), ior_in, refractive_index, weight);
    next.TMax = 1000.f;
    return next;
}
"#;

pub const OCCLUDER_INTERSECTION: &str = r#"
RayInfo intersect_occluder(
    RayInfo ray,
    inout float3 weight,
    float radius,
    float center_pos)
{
    float t = (center_pos - ray.Origin.z) / ray.Direction.z;
    float3 hit = ray.Origin + t * ray.Direction;
    if (t < 0.0 || length(hit.xy) > radius) {
        weight = 0;
    }

    RayInfo next = ray;
    next.Origin = hit;
    return next;
}
"#;

/// Compiler-owned members at the top of the constant-buffer struct.
pub const GLOBAL_DECLARATIONS: &str = "    float2 film_size;\n    int2 film_resolution;\n    float film_distance;\n";

/// Start of the ray generation routine, up to the first surface.
pub const RAYGEN_PROLOGUE: &str = r#"RayInfo raygen(int2 pixel_id, inout float3 weight, inout uint seed)
{
    RayInfo ray;
    float2 film_uv = (0.5f + float2(pixel_id)) / float2(lens_system_data.film_resolution);
    float2 film_pos = -(film_uv - 0.5f) * lens_system_data.film_size;
    ray.Origin = float3(film_pos, -lens_system_data.film_distance);
    ray.Direction = normalize(float3(-film_pos, lens_system_data.film_distance));
    ray.TMin = 0;
    ray.TMax = 1000;
    weight = 1;
    float current_ior = 1.0;
"#;

pub const RAYGEN_EPILOGUE: &str = "\n    return ray;\n}\n";

/// All intersection routines, in emission order.
pub fn intrinsics() -> String {
    [
        REFRACT,
        SPHERE_INTERSECTION,
        FLAT_INTERSECTION,
        OCCLUDER_INTERSECTION,
    ]
    .concat()
}
