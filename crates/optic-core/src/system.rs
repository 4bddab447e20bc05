use std::path::Path;

use crate::element::{FlatLens, LensElement, NullLayer, Occluder, SphericalLens};
use crate::error::PrescriptionError;
use crate::prescription::{ElementTag, PrescriptionDocument, PrescriptionRecord};

/// Ordered optical stack. Insertion order is both the traversal order of the
/// generated ray routine and the layout order of the parameter block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LensSystem {
    elements: Vec<LensElement>,
    origin: Option<String>,
}

impl LensSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a lens system from a prescription JSON document.
    ///
    /// Each record's `distance` is added to the running axial position before
    /// its element is built, so an element sits at the cumulative spacing
    /// including its own. Either every record is accepted or no system is
    /// returned.
    pub fn deserialize(prescription: &str) -> Result<Self, PrescriptionError> {
        let document = PrescriptionDocument::parse(prescription)?;
        let mut system = LensSystem {
            elements: Vec::with_capacity(document.data.len()),
            origin: document.originate.clone(),
        };

        let mut accumulated_distance = 0.0;
        for record in document.records() {
            accumulated_distance += record.distance()?;
            system.append(element_from_record(&record, accumulated_distance)?);
        }

        log::info!(
            "Deserialized lens system{}: {} elements, total length {:.4}",
            system
                .origin
                .as_deref()
                .map(|o| format!(" '{o}'"))
                .unwrap_or_default(),
            system.element_count(),
            system.total_length(),
        );
        Ok(system)
    }

    /// Read and deserialize a prescription file.
    pub fn deserialize_file(path: impl AsRef<Path>) -> Result<Self, PrescriptionError> {
        let json = std::fs::read_to_string(path)?;
        Self::deserialize(&json)
    }

    pub fn append(&mut self, element: impl Into<LensElement>) {
        self.elements.push(element.into());
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> &[LensElement] {
        &self.elements
    }

    pub fn get(&self, index: usize) -> Option<&LensElement> {
        self.elements.get(index)
    }

    /// Source reference carried by the prescription's `Originate` field.
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    /// Axial position of the last element, or 0 for an empty system.
    pub fn total_length(&self) -> f64 {
        self.elements.last().map_or(0.0, LensElement::axial_pos)
    }

    /// Sum of all element field counts.
    pub fn field_count(&self) -> usize {
        self.elements.iter().map(LensElement::field_count).sum()
    }
}

fn element_from_record(
    record: &PrescriptionRecord<'_>,
    axial_pos: f64,
) -> Result<LensElement, PrescriptionError> {
    if record.contains("additional_params") {
        log::warn!(
            "Record {}: ignoring additional_params (aspheric terms are not modelled)",
            record.index()
        );
    }

    let element: LensElement = match record.tag()? {
        ElementTag::Marker => NullLayer::from_prescription_record(record, axial_pos)?.into(),
        ElementTag::Aperture => Occluder::from_prescription_record(record, axial_pos)?.into(),
        ElementTag::Surface => {
            if record.number("roc")? != 0.0 {
                SphericalLens::from_prescription_record(record, axial_pos)?.into()
            } else {
                FlatLens::from_prescription_record(record, axial_pos)?.into()
            }
        }
    };
    Ok(element)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::OpticalProperty;

    #[test]
    fn test_aperture_then_flat() {
        let json = r#"{ "data": [
            { "type": "A", "distance": 5, "diameter": 10, "material": "OCCLUDER" },
            { "type": "S", "distance": 0, "diameter": 8, "roc": 0, "material": "N-BK7" }
        ] }"#;
        let system = LensSystem::deserialize(json).expect("should deserialize");
        assert_eq!(system.element_count(), 2);

        match system.get(0) {
            Some(LensElement::Occluder(o)) => {
                assert_eq!(o.radius, 5.0);
                assert_eq!(o.axial_pos, 5.0);
            }
            other => panic!("expected occluder, got {:?}", other),
        }
        match system.get(1) {
            Some(LensElement::Flat(f)) => {
                assert_eq!(f.diameter, 8.0);
                assert_eq!(f.axial_pos, 5.0);
                assert_eq!(f.optical_property.refractive_index, 1.51680);
            }
            other => panic!("expected flat lens, got {:?}", other),
        }
        assert_eq!(system.field_count(), 7);
    }

    #[test]
    fn test_single_marker() {
        let json = r#"{ "data": [ { "type": "O", "distance": 3, "material": "AIR" } ] }"#;
        let system = LensSystem::deserialize(json).expect("should deserialize");
        assert_eq!(system.element_count(), 1);
        let element = system.get(0).expect("one element");
        assert!(matches!(element, LensElement::Null(_)));
        assert_eq!(element.field_count(), 1);
        assert_eq!(element.axial_pos(), 3.0);
        assert_eq!(element.optical_property().refractive_index, 1.000293);
    }

    #[test]
    fn test_zero_roc_selects_flat() {
        for diameter in [0.0, 1.0, 250.0] {
            let json = format!(
                r#"{{ "data": [ {{ "type": "S", "distance": 1, "diameter": {diameter}, "roc": 0, "material": "SK1" }} ] }}"#
            );
            let system = LensSystem::deserialize(&json).expect("should deserialize");
            assert!(matches!(system.get(0), Some(LensElement::Flat(_))));
        }

        let json = r#"{ "data": [ { "type": "S", "distance": 1, "diameter": 4, "roc": -12.5, "material": "SK1" } ] }"#;
        let system = LensSystem::deserialize(json).expect("should deserialize");
        match system.get(0) {
            Some(LensElement::Spherical(s)) => {
                assert_eq!(s.radius_of_curvature(), -12.5);
                assert_eq!(s.sphere_center_x(), 1.0 - 12.5);
            }
            other => panic!("expected spherical lens, got {:?}", other),
        }
    }

    #[test]
    fn test_distance_accumulates_before_construction() {
        let json = r#"{ "data": [
            { "type": "O", "distance": 1.5, "material": "VACUUM" },
            { "type": "S", "distance": 2.0, "diameter": 4, "roc": 10, "material": "F2" },
            { "type": "A", "distance": 0.5, "diameter": 3, "material": "OCCLUDER" }
        ] }"#;
        let system = LensSystem::deserialize(json).expect("should deserialize");
        let positions: Vec<f64> = system.elements().iter().map(|e| e.axial_pos()).collect();
        assert_eq!(positions, vec![1.5, 3.5, 4.0]);
        assert_eq!(system.total_length(), 4.0);
    }

    #[test]
    fn test_unknown_material_resolves_to_default() {
        let json = r#"{ "data": [ { "type": "O", "distance": 0, "material": "UNOBTAINIUM" } ] }"#;
        let system = LensSystem::deserialize(json).expect("unknown material is not an error");
        assert_eq!(
            system.get(0).expect("one element").optical_property(),
            OpticalProperty::UNKNOWN
        );
    }

    #[test]
    fn test_unknown_element_type_rejected() {
        let json = r#"{ "data": [
            { "type": "O", "distance": 0, "material": "VACUUM" },
            { "type": "I", "distance": 17.4, "diameter": 20.6, "roc": 0, "material": "VACUUM" }
        ] }"#;
        match LensSystem::deserialize(json) {
            Err(PrescriptionError::UnknownElementType { index, tag }) => {
                assert_eq!(index, 1);
                assert_eq!(tag, "I");
            }
            other => panic!("expected UnknownElementType, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_required_fields_rejected() {
        let cases = [
            (r#"{ "type": "A", "distance": 1, "material": "OCCLUDER" }"#, "diameter"),
            (r#"{ "type": "S", "distance": 1, "diameter": 4, "material": "SK1" }"#, "roc"),
            (r#"{ "type": "S", "distance": 1, "roc": 4, "material": "SK1" }"#, "diameter"),
            (r#"{ "type": "S", "distance": 1, "roc": 0, "material": "SK1" }"#, "diameter"),
            (r#"{ "type": "O", "material": "AIR" }"#, "distance"),
            (r#"{ "type": "O", "distance": 1 }"#, "material"),
            (r#"{ "type": "S", "distance": 1, "diameter": "wide", "roc": 3, "material": "SK1" }"#, "diameter"),
        ];
        for (record, expected) in cases {
            let json = format!(r#"{{ "data": [ {record} ] }}"#);
            match LensSystem::deserialize(&json) {
                Err(PrescriptionError::MalformedRecord { index, field, .. }) => {
                    assert_eq!(index, 0);
                    assert_eq!(field, expected, "record {record}");
                }
                other => panic!("expected MalformedRecord for {record}, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_invalid_json_rejected() {
        let result = LensSystem::deserialize(r#"{ "data": [ { "type": "O", "#);
        assert!(matches!(result, Err(PrescriptionError::ParseError(_))));
    }

    #[test]
    fn test_origin_kept() {
        let json = r#"{ "Originate": "US02532751-1", "data": [] }"#;
        let system = LensSystem::deserialize(json).expect("should deserialize");
        assert_eq!(system.origin(), Some("US02532751-1"));
        assert!(system.is_empty());
        assert_eq!(system.total_length(), 0.0);
    }

    #[test]
    fn test_append_programmatic() {
        let mut system = LensSystem::new();
        system.append(NullLayer::new(0.0));
        system.append(SphericalLens::new(10.0, 20.0, 1.0));
        system.append(LensElement::Flat(FlatLens::new(10.0, 2.0)));
        assert_eq!(system.element_count(), 3);
        assert_eq!(system.field_count(), 1 + 7 + 4);
    }

    #[test]
    fn test_additional_params_ignored() {
        let json = r#"{ "data": [
            { "type": "S", "distance": 0, "roc": 13.35, "diameter": 17.4, "material": "SSK4",
              "additional_params": [0.005, 1e-6, 1e-8, -3e-10] }
        ] }"#;
        let system = LensSystem::deserialize(json).expect("extra fields are ignored");
        assert!(matches!(system.get(0), Some(LensElement::Spherical(_))));
        assert_eq!(system.field_count(), 7);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = LensSystem::deserialize_file("/nonexistent/prescription.json");
        assert!(matches!(result, Err(PrescriptionError::Io(_))));
    }
}
