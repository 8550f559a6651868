pub mod extractor;
pub mod formatter;
pub mod loaders;
pub mod split;
pub mod summaries;

pub use extractor::*;
pub use formatter::*;
pub use loaders::*;
pub use split::*;
pub use summaries::*;
