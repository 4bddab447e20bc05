pub mod block;
pub mod compiler;
pub mod defaults;
pub mod shader;

pub use block::{BlockLayout, CompiledDataBlock, FilmParameters};
pub use compiler::{compile, fill_block_data};
