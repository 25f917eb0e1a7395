mod parse;
pub use parse::*;
mod scanner;
pub use scanner::*;
mod pipeline;
pub use pipeline::*;

pub use auto_external_core as core;
