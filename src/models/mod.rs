mod place;
mod press_release;
mod snapshot;

pub use place::*;
pub use press_release::*;
pub use snapshot::*;
