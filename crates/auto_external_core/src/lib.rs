mod options;
pub use options::*;
mod error;
pub use error::*;
mod usage;
pub use usage::*;
mod decision;
pub use decision::*;
mod external_module;
pub use external_module::*;
mod html;
pub use html::*;
mod injection;
pub use injection::*;
mod plugin;
pub use plugin::*;
mod auto_external;
pub use auto_external::*;
pub mod loader;
mod utils;
pub use utils::*;
