mod filename;

pub use filename::*;
