//! Local persistence of generated minutes

mod writer;

pub use writer::OutputWriter;
