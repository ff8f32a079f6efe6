pub mod device;
pub mod time;
pub mod ui;

pub use device::*;
pub use time::*;
pub use ui::*;
