use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Flat parameter block produced by a compile pass.
///
/// `offsets[i]` is the first parameter of element `i`. The per-element ranges
/// tile `[0, cb_size)` in element order with no gaps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledDataBlock {
    /// Element parameters, `cb_size` entries.
    pub parameters: Vec<f64>,
    /// Element index to starting offset, in element order.
    pub offsets: Vec<usize>,
    /// Total number of element parameters.
    pub cb_size: usize,
}

/// Offset table and size of a block, without the parameter values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockLayout {
    pub offsets: Vec<usize>,
    pub cb_size: usize,
}

/// Compiler-owned globals at the top of the constant buffer.
/// 20 bytes, matching `float2 film_size; int2 film_resolution; float film_distance;`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FilmParameters {
    pub film_size: [f32; 2],
    pub film_resolution: [i32; 2],
    pub film_distance: f32,
}

impl FilmParameters {
    pub fn new(film_size: glam::Vec2, film_resolution: glam::IVec2, film_distance: f32) -> Self {
        Self {
            film_size: film_size.to_array(),
            film_resolution: film_resolution.to_array(),
            film_distance,
        }
    }
}

impl CompiledDataBlock {
    /// Number of elements with a recorded offset.
    pub fn element_count(&self) -> usize {
        self.offsets.len()
    }

    pub fn offset(&self, element: usize) -> Option<usize> {
        self.offsets.get(element).copied()
    }

    /// Parameter range of one element, derived from the next offset (or
    /// `cb_size` for the last element).
    pub fn element_range(&self, element: usize) -> Option<Range<usize>> {
        let start = self.offset(element)?;
        let end = self.offset(element + 1).unwrap_or(self.cb_size);
        Some(start..end)
    }

    pub fn element_parameters(&self, element: usize) -> Option<&[f64]> {
        self.element_range(element)
            .and_then(|range| self.parameters.get(range))
    }

    pub fn layout(&self) -> BlockLayout {
        BlockLayout {
            offsets: self.offsets.clone(),
            cb_size: self.cb_size,
        }
    }

    /// Same offsets and size, all parameters zero.
    pub fn zeroed(&self) -> Self {
        Self {
            parameters: vec![0.0; self.cb_size],
            offsets: self.offsets.clone(),
            cb_size: self.cb_size,
        }
    }

    /// Parameters narrowed to `f32` for device upload.
    pub fn to_f32_vec(&self) -> Vec<f32> {
        self.parameters.iter().map(|&p| p as f32).collect()
    }

    /// Byte image of the whole constant-buffer struct: globals, then every
    /// element parameter as `f32`. Scalar members never straddle a 16-byte
    /// register, so they pack back to back after the globals.
    pub fn constant_buffer_bytes(&self, film: &FilmParameters) -> Vec<u8> {
        let params = self.to_f32_vec();
        let mut bytes = Vec::with_capacity(std::mem::size_of::<FilmParameters>() + params.len() * 4);
        bytes.extend_from_slice(bytemuck::bytes_of(film));
        bytes.extend_from_slice(bytemuck::cast_slice(&params));
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use optic_core::constants::GLOBAL_SCALAR_COUNT;

    fn sample_block() -> CompiledDataBlock {
        CompiledDataBlock {
            parameters: vec![5.0, 5.0, 1.0, 8.0, 5.0, 1.5168, 64.17],
            offsets: vec![0, 3],
            cb_size: 7,
        }
    }

    #[test]
    fn test_element_ranges_tile_block() {
        let block = sample_block();
        assert_eq!(block.element_range(0), Some(0..3));
        assert_eq!(block.element_range(1), Some(3..7));
        assert_eq!(block.element_range(2), None);
        assert_eq!(block.element_parameters(1), Some(&block.parameters[3..7]));
    }

    #[test]
    fn test_zeroed_keeps_layout() {
        let block = sample_block();
        let zeroed = block.zeroed();
        assert_eq!(zeroed.layout(), block.layout());
        assert!(zeroed.parameters.iter().all(|&p| p == 0.0));
        assert_ne!(zeroed, block);
    }

    #[test]
    fn test_film_parameters_size() {
        assert_eq!(
            std::mem::size_of::<FilmParameters>(),
            GLOBAL_SCALAR_COUNT * 4
        );
    }

    #[test]
    fn test_constant_buffer_bytes() {
        let block = sample_block();
        let film = FilmParameters::new(glam::Vec2::new(36.0, 24.0), glam::IVec2::new(64, 48), 50.0);
        let bytes = block.constant_buffer_bytes(&film);
        assert_eq!(bytes.len(), (GLOBAL_SCALAR_COUNT + block.cb_size) * 4);

        let floats: Vec<f32> = bytes
            .chunks_exact(4)
            .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        assert_eq!(floats[0], 36.0);
        assert_eq!(floats[4], 50.0);
        assert_eq!(&floats[GLOBAL_SCALAR_COUNT..], block.to_f32_vec().as_slice());
        let resolution_x = i32::from_ne_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
        assert_eq!(resolution_x, 64);
    }

    #[test]
    fn test_layout_serializes() {
        let layout = sample_block().layout();
        let json = serde_json::to_string(&layout).expect("should serialize");
        assert_eq!(json, r#"{"offsets":[0,3],"cb_size":7}"#);
    }
}
