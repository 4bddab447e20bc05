use glam::DVec2;

use crate::constants::{
    FLAT_FIELD_COUNT, INDENT, LENS_DATA_INSTANCE, NULL_FIELD_COUNT, OCCLUDER_FIELD_COUNT,
    RAY_TYPE, SPHERICAL_FIELD_COUNT,
};
use crate::error::PrescriptionError;
use crate::material::{self, OpticalProperty};
use crate::prescription::PrescriptionRecord;

/// Parameter layout of a pass-through marker.
pub const NULL_FIELDS: [&str; NULL_FIELD_COUNT] = ["refractive_index"];

/// Parameter layout of an aperture stop.
pub const OCCLUDER_FIELDS: [&str; OCCLUDER_FIELD_COUNT] =
    ["radius", "axial_pos", "refractive_index"];

/// Parameter layout of a spherical refracting surface.
pub const SPHERICAL_FIELDS: [&str; SPHERICAL_FIELD_COUNT] = [
    "diameter",
    "radius_of_curvature",
    "theta_range",
    "sphere_center_x",
    "axial_pos",
    "refractive_index",
    "abbe_number",
];

/// Parameter layout of a flat refracting surface.
pub const FLAT_FIELDS: [&str; FLAT_FIELD_COUNT] =
    ["diameter", "axial_pos", "refractive_index", "abbe_number"];

/// Non-refracting marker (image plane, pure spacing).
#[derive(Debug, Clone, PartialEq)]
pub struct NullLayer {
    pub axial_pos: f64,
    pub optical_property: OpticalProperty,
}

impl NullLayer {
    pub fn new(axial_pos: f64) -> Self {
        Self {
            axial_pos,
            optical_property: OpticalProperty::default(),
        }
    }

    pub fn from_prescription_record(
        record: &PrescriptionRecord<'_>,
        axial_pos: f64,
    ) -> Result<Self, PrescriptionError> {
        Ok(Self {
            axial_pos,
            optical_property: material::lookup(record.material()?),
        })
    }

    fn write_fields(&self, dst: &mut [f64]) {
        dst[0] = self.optical_property.refractive_index;
    }

    fn emit_statements(&self, id: usize) -> String {
        format!(
            "{INDENT}// surface {id}: marker\n\
             {INDENT}{RAY_TYPE} next_ray_{id} = ray;\n\
             {INDENT}current_ior = {data}.refractive_index_{id};\n",
            data = LENS_DATA_INSTANCE,
        )
    }
}

/// Opaque aperture stop.
#[derive(Debug, Clone, PartialEq)]
pub struct Occluder {
    pub radius: f64,
    pub axial_pos: f64,
    pub optical_property: OpticalProperty,
}

impl Occluder {
    pub fn new(radius: f64, axial_pos: f64) -> Self {
        Self {
            radius,
            axial_pos,
            optical_property: OpticalProperty::default(),
        }
    }

    /// `diameter` is required; the stop radius is half of it.
    pub fn from_prescription_record(
        record: &PrescriptionRecord<'_>,
        axial_pos: f64,
    ) -> Result<Self, PrescriptionError> {
        Ok(Self {
            radius: record.number("diameter")? / 2.0,
            axial_pos,
            optical_property: material::lookup(record.material()?),
        })
    }

    fn write_fields(&self, dst: &mut [f64]) {
        dst[0] = self.radius;
        dst[1] = self.axial_pos;
        dst[2] = self.optical_property.refractive_index;
    }

    fn emit_statements(&self, id: usize) -> String {
        format!(
            "{INDENT}// surface {id}: aperture stop\n\
             {INDENT}{RAY_TYPE} next_ray_{id} = intersect_occluder(ray, weight, \
             {data}.radius_{id}, {data}.axial_pos_{id});\n",
            data = LENS_DATA_INSTANCE,
        )
    }
}

/// Spherical refracting surface.
///
/// `theta_range` and `sphere_center` are derived and recomputed by every
/// setter, so `write_fields` and the emitted code always observe the same
/// geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct SphericalLens {
    diameter: f64,
    radius_of_curvature: f64,
    axial_pos: f64,
    theta_range: f64,
    /// Sphere center in (axial, height) coordinates.
    sphere_center: DVec2,
    pub optical_property: OpticalProperty,
}

impl SphericalLens {
    pub fn new(diameter: f64, radius_of_curvature: f64, axial_pos: f64) -> Self {
        let mut lens = Self {
            diameter,
            radius_of_curvature,
            axial_pos,
            theta_range: 0.0,
            sphere_center: DVec2::ZERO,
            optical_property: OpticalProperty::default(),
        };
        lens.update_derived();
        lens
    }

    /// `diameter` and a non-zero `roc` are required.
    pub fn from_prescription_record(
        record: &PrescriptionRecord<'_>,
        axial_pos: f64,
    ) -> Result<Self, PrescriptionError> {
        let mut lens = Self::new(record.number("diameter")?, record.number("roc")?, axial_pos);
        lens.optical_property = material::lookup(record.material()?);
        Ok(lens)
    }

    pub fn diameter(&self) -> f64 {
        self.diameter
    }

    pub fn radius_of_curvature(&self) -> f64 {
        self.radius_of_curvature
    }

    pub fn axial_pos(&self) -> f64 {
        self.axial_pos
    }

    /// Half-angle subtended by the clear aperture, seen from the sphere center.
    pub fn theta_range(&self) -> f64 {
        self.theta_range
    }

    pub fn sphere_center_x(&self) -> f64 {
        self.sphere_center.x
    }

    pub fn set_diameter(&mut self, diameter: f64) {
        self.diameter = diameter;
        self.update_derived();
    }

    pub fn set_radius_of_curvature(&mut self, radius_of_curvature: f64) {
        self.radius_of_curvature = radius_of_curvature;
        self.update_derived();
    }

    pub fn set_axial_pos(&mut self, axial_pos: f64) {
        self.axial_pos = axial_pos;
        self.update_derived();
    }

    fn update_derived(&mut self) {
        // Apertures wider than the sphere clamp to a hemisphere instead of NaN.
        let ratio = (self.diameter / (2.0 * self.radius_of_curvature)).clamp(-1.0, 1.0);
        self.theta_range = ratio.asin().abs();
        self.sphere_center = DVec2::new(self.axial_pos + self.radius_of_curvature, 0.0);
    }

    fn write_fields(&self, dst: &mut [f64]) {
        dst[0] = self.diameter;
        dst[1] = self.radius_of_curvature;
        dst[2] = self.theta_range;
        dst[3] = self.sphere_center.x;
        dst[4] = self.axial_pos;
        dst[5] = self.optical_property.refractive_index;
        dst[6] = self.optical_property.abbe_number;
    }

    fn emit_statements(&self, id: usize) -> String {
        format!(
            "{INDENT}// surface {id}: spherical\n\
             {INDENT}{RAY_TYPE} next_ray_{id} = intersect_sphere(ray, weight, \
             {data}.radius_of_curvature_{id}, {data}.sphere_center_x_{id}, \
             {data}.theta_range_{id}, current_ior, \
             {data}.refractive_index_{id}, {data}.abbe_number_{id});\n\
             {INDENT}current_ior = {data}.refractive_index_{id};\n",
            data = LENS_DATA_INSTANCE,
        )
    }
}

/// Flat refracting surface (`roc == 0`).
#[derive(Debug, Clone, PartialEq)]
pub struct FlatLens {
    pub diameter: f64,
    pub axial_pos: f64,
    pub optical_property: OpticalProperty,
}

impl FlatLens {
    pub fn new(diameter: f64, axial_pos: f64) -> Self {
        Self {
            diameter,
            axial_pos,
            optical_property: OpticalProperty::default(),
        }
    }

    pub fn from_prescription_record(
        record: &PrescriptionRecord<'_>,
        axial_pos: f64,
    ) -> Result<Self, PrescriptionError> {
        Ok(Self {
            diameter: record.number("diameter")?,
            axial_pos,
            optical_property: material::lookup(record.material()?),
        })
    }

    fn write_fields(&self, dst: &mut [f64]) {
        dst[0] = self.diameter;
        dst[1] = self.axial_pos;
        dst[2] = self.optical_property.refractive_index;
        dst[3] = self.optical_property.abbe_number;
    }

    fn emit_statements(&self, id: usize) -> String {
        format!(
            "{INDENT}// surface {id}: flat\n\
             {INDENT}{RAY_TYPE} next_ray_{id} = intersect_flat(ray, weight, \
             {data}.diameter_{id}, {data}.axial_pos_{id}, current_ior, \
             {data}.refractive_index_{id}, {data}.abbe_number_{id});\n\
             {INDENT}current_ior = {data}.refractive_index_{id};\n",
            data = LENS_DATA_INSTANCE,
        )
    }
}

/// One surface of the optical stack.
#[derive(Debug, Clone, PartialEq)]
pub enum LensElement {
    Null(NullLayer),
    Occluder(Occluder),
    Spherical(SphericalLens),
    Flat(FlatLens),
}

impl LensElement {
    /// Short variant name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            LensElement::Null(_) => "null",
            LensElement::Occluder(_) => "occluder",
            LensElement::Spherical(_) => "spherical",
            LensElement::Flat(_) => "flat",
        }
    }

    /// Ordered names of the parameter fields this element contributes.
    pub fn field_names(&self) -> &'static [&'static str] {
        match self {
            LensElement::Null(_) => &NULL_FIELDS,
            LensElement::Occluder(_) => &OCCLUDER_FIELDS,
            LensElement::Spherical(_) => &SPHERICAL_FIELDS,
            LensElement::Flat(_) => &FLAT_FIELDS,
        }
    }

    /// Number of parameter fields this element contributes to the block.
    pub fn field_count(&self) -> usize {
        self.field_names().len()
    }

    pub fn axial_pos(&self) -> f64 {
        match self {
            LensElement::Null(e) => e.axial_pos,
            LensElement::Occluder(e) => e.axial_pos,
            LensElement::Spherical(e) => e.axial_pos(),
            LensElement::Flat(e) => e.axial_pos,
        }
    }

    pub fn set_axial_pos(&mut self, axial_pos: f64) {
        match self {
            LensElement::Null(e) => e.axial_pos = axial_pos,
            LensElement::Occluder(e) => e.axial_pos = axial_pos,
            LensElement::Spherical(e) => e.set_axial_pos(axial_pos),
            LensElement::Flat(e) => e.axial_pos = axial_pos,
        }
    }

    pub fn optical_property(&self) -> OpticalProperty {
        match self {
            LensElement::Null(e) => e.optical_property,
            LensElement::Occluder(e) => e.optical_property,
            LensElement::Spherical(e) => e.optical_property,
            LensElement::Flat(e) => e.optical_property,
        }
    }

    /// Write this element's parameters into `dst[..field_count()]`.
    ///
    /// # Panics
    ///
    /// Panics if `dst` is shorter than `field_count()`.
    pub fn write_fields(&self, dst: &mut [f64]) {
        let dst = &mut dst[..self.field_count()];
        match self {
            LensElement::Null(e) => e.write_fields(dst),
            LensElement::Occluder(e) => e.write_fields(dst),
            LensElement::Spherical(e) => e.write_fields(dst),
            LensElement::Flat(e) => e.write_fields(dst),
        }
    }

    /// Constant-buffer struct members for this element, one `float` per field.
    pub fn emit_declarations(&self, id: usize) -> String {
        self.field_names()
            .iter()
            .map(|name| format!("{INDENT}float {name}_{id};\n"))
            .collect()
    }

    /// Ray/surface interaction for this element. Assigns `next_ray_<id>`.
    pub fn emit_statements(&self, id: usize) -> String {
        match self {
            LensElement::Null(e) => e.emit_statements(id),
            LensElement::Occluder(e) => e.emit_statements(id),
            LensElement::Spherical(e) => e.emit_statements(id),
            LensElement::Flat(e) => e.emit_statements(id),
        }
    }

    /// Copy this element's fields out of a flat tensor starting at `offset`.
    pub fn emit_data_load(&self, id: usize, offset: usize) -> String {
        self.field_names()
            .iter()
            .enumerate()
            .map(|(k, name)| {
                format!(
                    "{INDENT}data.{name}_{id} = tensor[uint({})];\n",
                    offset + k
                )
            })
            .collect()
    }
}

impl From<NullLayer> for LensElement {
    fn from(e: NullLayer) -> Self {
        LensElement::Null(e)
    }
}

impl From<Occluder> for LensElement {
    fn from(e: Occluder) -> Self {
        LensElement::Occluder(e)
    }
}

impl From<SphericalLens> for LensElement {
    fn from(e: SphericalLens) -> Self {
        LensElement::Spherical(e)
    }
}

impl From<FlatLens> for LensElement {
    fn from(e: FlatLens) -> Self {
        LensElement::Flat(e)
    }
}
