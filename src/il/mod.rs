//! Intermediate code generation.

mod error;
pub mod flow;
mod frame_allocator;
mod generator;
mod label_allocator;
mod tac;
mod writer;

pub use error::CodegenError;
pub use frame_allocator::FrameAllocator;
pub use generator::Generator;
pub use label_allocator::LabelAllocator;
pub use tac::*;
pub use writer::TacFile;
