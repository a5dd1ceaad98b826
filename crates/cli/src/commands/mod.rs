//! CLI commands for the hoops warehouse ETL.

pub mod daily;
pub mod load_lineups;
pub mod load_spine;
pub mod migrate;
pub mod setup;

pub use daily::run_daily;
pub use load_lineups::{run_load_lineups, LoadLineupsArgs};
pub use load_spine::{run_load_spine, LoadSpineArgs};
pub use migrate::run_migrate;
pub use setup::GlobalArgs;
