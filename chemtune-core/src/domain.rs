pub mod config;
pub mod params;
pub mod representation;
pub mod run;
pub mod sample;
pub mod table;

pub use config::*;
pub use params::*;
pub use representation::*;
pub use run::*;
pub use sample::*;
pub use table::*;
