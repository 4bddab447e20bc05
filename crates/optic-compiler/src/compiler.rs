use optic_core::constants::{
    INDENT, LENS_DATA_INSTANCE, LENS_DATA_STRUCT, OBSERVATION_BUFFER_PREFIX, RAY_TYPE,
};
use optic_core::LensSystem;

use crate::block::CompiledDataBlock;
use crate::shader;

/// Text and bookkeeping accumulated over one compile pass.
#[derive(Default)]
struct EmitState {
    declarations: String,
    data_load: String,
    statements: String,
    observation_buffers: String,
    offsets: Vec<usize>,
    cb_size: usize,
}

/// Compile a lens system into shader source and its parameter block.
///
/// Element `i`'s offset is recorded before its text is emitted, so the
/// struct members, the tensor data-load indices and the block layout all come
/// from the same bookkeeping. With `emit_debug_taps`, every surface also
/// writes the ray arriving at it into `ray_observation_<i>`, so buffer 0 holds
/// the film-plane ray; taps never change the layout.
pub fn compile(system: &LensSystem, emit_debug_taps: bool) -> (String, CompiledDataBlock) {
    let mut state = EmitState {
        offsets: Vec::with_capacity(system.element_count()),
        ..EmitState::default()
    };

    for (id, element) in system.elements().iter().enumerate() {
        let offset = state.cb_size;
        state.offsets.push(offset);

        state.declarations.push_str(&element.emit_declarations(id));
        state.data_load.push_str(&element.emit_data_load(id, offset));
        state.statements.push('\n');
        state.statements.push_str(&element.emit_statements(id));

        if emit_debug_taps {
            state.statements.push_str(&format!(
                "{INDENT}{OBSERVATION_BUFFER_PREFIX}_{id}[pixel_id.y * {LENS_DATA_INSTANCE}.film_resolution.x + pixel_id.x] = ray;\n"
            ));
            state.observation_buffers.push_str(&format!(
                "RWStructuredBuffer<{RAY_TYPE}> {OBSERVATION_BUFFER_PREFIX}_{id};\n"
            ));
        }

        state.statements.push_str(&format!("{INDENT}ray = next_ray_{id};\n"));
        state.cb_size += element.field_count();

        log::debug!(
            "Compiled element {} ({}) at offset {}, {} fields",
            id,
            element.kind(),
            offset,
            element.field_count()
        );
    }

    let mut parameters = vec![0.0; state.cb_size];
    for (element, &offset) in system.elements().iter().zip(&state.offsets) {
        element.write_fields(&mut parameters[offset..]);
    }

    let source = assemble_source(&state);

    log::info!(
        "Compiled lens system: {} elements, cb_size {}, {} bytes of source{}",
        system.element_count(),
        state.cb_size,
        source.len(),
        if emit_debug_taps { ", debug taps on" } else { "" }
    );

    let block = CompiledDataBlock {
        parameters,
        offsets: state.offsets,
        cb_size: state.cb_size,
    };
    (source, block)
}

fn assemble_source(state: &EmitState) -> String {
    let mut source = String::new();
    source.push_str(shader::HEADER);
    source.push_str(&shader::intrinsics());
    source.push('\n');

    // constant buffer
    source.push_str(&format!("struct {LENS_DATA_STRUCT}\n{{\n"));
    source.push_str(shader::GLOBAL_DECLARATIONS);
    source.push_str(&state.declarations);
    source.push_str("};\n");
    source.push_str(&format!(
        "ConstantBuffer<{LENS_DATA_STRUCT}> {LENS_DATA_INSTANCE};\n"
    ));
    source.push_str(&state.observation_buffers);
    source.push('\n');

    // flat tensor load
    source.push_str(&format!(
        "{LENS_DATA_STRUCT} load_lens_system_data(StructuredBuffer<float> tensor)\n{{\n"
    ));
    source.push_str(&format!("{INDENT}{LENS_DATA_STRUCT} data;\n"));
    for global in ["film_size", "film_resolution", "film_distance"] {
        source.push_str(&format!(
            "{INDENT}data.{global} = {LENS_DATA_INSTANCE}.{global};\n"
        ));
    }
    source.push_str(&state.data_load);
    source.push_str(&format!("{INDENT}return data;\n}}\n\n"));

    // ray generation
    source.push_str(shader::RAYGEN_PROLOGUE);
    source.push_str(&state.statements);
    source.push_str(shader::RAYGEN_EPILOGUE);
    source
}

/// Rewrite `block.parameters` from the current state of `system`, using the
/// block's existing offsets. Offsets and `cb_size` are never recomputed.
///
/// # Panics
///
/// Panics if the block's offset table was not produced for `system`
/// (different element count, or a range running past `cb_size`).
pub fn fill_block_data(system: &LensSystem, block: &mut CompiledDataBlock) {
    assert_eq!(
        block.offsets.len(),
        system.element_count(),
        "offset table has {} entries for {} elements",
        block.offsets.len(),
        system.element_count()
    );
    assert_eq!(
        block.parameters.len(),
        block.cb_size,
        "parameter block holds {} values for cb_size {}",
        block.parameters.len(),
        block.cb_size
    );

    for (element, &offset) in system.elements().iter().zip(&block.offsets) {
        assert!(
            offset + element.field_count() <= block.cb_size,
            "element at offset {} with {} fields overruns cb_size {}",
            offset,
            element.field_count(),
            block.cb_size
        );
        element.write_fields(&mut block.parameters[offset..]);
    }
}
