use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::PrescriptionError;

/// Top-level prescription document.
///
/// Records stay as raw JSON objects so that a missing or mistyped field is
/// reported against its record instead of failing the whole document.
#[derive(Debug, Clone, Deserialize)]
pub struct PrescriptionDocument {
    /// Source reference of the design (patent number, catalogue id).
    #[serde(rename = "Originate", default)]
    pub originate: Option<String>,
    /// Ordered element records, first surface first.
    pub data: Vec<Map<String, Value>>,
}

impl PrescriptionDocument {
    /// Parse a prescription JSON string.
    pub fn parse(json: &str) -> Result<Self, PrescriptionError> {
        serde_json::from_str(json).map_err(|e| PrescriptionError::ParseError(e.to_string()))
    }

    /// Iterate the records with their position in the `data` list.
    pub fn records(&self) -> impl Iterator<Item = PrescriptionRecord<'_>> {
        self.data
            .iter()
            .enumerate()
            .map(|(index, fields)| PrescriptionRecord { index, fields })
    }
}

/// Element type tag of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementTag {
    /// `"O"`: pass-through marker.
    Marker,
    /// `"A"`: aperture stop.
    Aperture,
    /// `"S"`: refracting surface, spherical or flat depending on `roc`.
    Surface,
}

/// One element record of a prescription, borrowed from its document.
#[derive(Debug, Clone, Copy)]
pub struct PrescriptionRecord<'a> {
    index: usize,
    fields: &'a Map<String, Value>,
}

impl<'a> PrescriptionRecord<'a> {
    pub fn new(index: usize, fields: &'a Map<String, Value>) -> Self {
        Self { index, fields }
    }

    /// Position of this record in the document's `data` list.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Read a required numeric field.
    pub fn number(&self, field: &'static str) -> Result<f64, PrescriptionError> {
        match self.fields.get(field) {
            Some(value) => value.as_f64().ok_or_else(|| self.malformed(field, value)),
            None => Err(self.missing(field)),
        }
    }

    /// Read a required string field.
    pub fn string(&self, field: &'static str) -> Result<&'a str, PrescriptionError> {
        match self.fields.get(field) {
            Some(value) => value.as_str().ok_or_else(|| self.malformed(field, value)),
            None => Err(self.missing(field)),
        }
    }

    /// Spacing from the previous surface along the optical axis.
    pub fn distance(&self) -> Result<f64, PrescriptionError> {
        self.number("distance")
    }

    pub fn material(&self) -> Result<&'a str, PrescriptionError> {
        self.string("material")
    }

    /// Decode the `type` tag.
    pub fn tag(&self) -> Result<ElementTag, PrescriptionError> {
        match self.string("type")? {
            "O" => Ok(ElementTag::Marker),
            "A" => Ok(ElementTag::Aperture),
            "S" => Ok(ElementTag::Surface),
            other => Err(PrescriptionError::UnknownElementType {
                index: self.index,
                tag: other.to_string(),
            }),
        }
    }

    fn missing(&self, field: &'static str) -> PrescriptionError {
        PrescriptionError::MalformedRecord {
            index: self.index,
            field,
            reason: "is missing".to_string(),
        }
    }

    fn malformed(&self, field: &'static str, value: &Value) -> PrescriptionError {
        PrescriptionError::MalformedRecord {
            index: self.index,
            field,
            reason: format!("has unexpected value {value}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_parses_records_in_order() {
        let json = r#"{
            "Originate": "US02532751-1",
            "data": [
                { "type": "O", "distance": 1.0, "material": "AIR" },
                { "type": "A", "distance": 2.0, "diameter": 4.0, "material": "OCCLUDER" }
            ]
        }"#;
        let doc = PrescriptionDocument::parse(json).expect("should parse");
        assert_eq!(doc.originate.as_deref(), Some("US02532751-1"));
        let indices: Vec<_> = doc.records().map(|r| r.index()).collect();
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn test_missing_data_list_rejected() {
        let result = PrescriptionDocument::parse(r#"{ "Originate": "x" }"#);
        assert!(matches!(result, Err(PrescriptionError::ParseError(_))));
    }

    #[test]
    fn test_record_field_errors() {
        let doc = PrescriptionDocument::parse(
            r#"{ "data": [ { "type": "S", "distance": "far", "material": 7 } ] }"#,
        )
        .expect("should parse");
        let record = doc.records().next().expect("one record");

        match record.distance() {
            Err(PrescriptionError::MalformedRecord { index: 0, field, .. }) => {
                assert_eq!(field, "distance")
            }
            other => panic!("expected MalformedRecord, got {:?}", other),
        }
        assert!(matches!(
            record.material(),
            Err(PrescriptionError::MalformedRecord { field: "material", .. })
        ));
        match record.number("roc") {
            Err(PrescriptionError::MalformedRecord { reason, .. }) => {
                assert_eq!(reason, "is missing")
            }
            other => panic!("expected MalformedRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_tag_decoding() {
        let doc = PrescriptionDocument::parse(
            r#"{ "data": [ { "type": "A" }, { "type": "I" }, { "distance": 0.0 } ] }"#,
        )
        .expect("should parse");
        let records: Vec<_> = doc.records().collect();

        assert_eq!(records[0].tag().expect("valid tag"), ElementTag::Aperture);
        match records[1].tag() {
            Err(PrescriptionError::UnknownElementType { index, tag }) => {
                assert_eq!(index, 1);
                assert_eq!(tag, "I");
            }
            other => panic!("expected UnknownElementType, got {:?}", other),
        }
        assert!(matches!(
            records[2].tag(),
            Err(PrescriptionError::MalformedRecord { field: "type", .. })
        ));
    }
}
