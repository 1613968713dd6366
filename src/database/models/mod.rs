pub mod bike;
pub mod driver;
pub mod garage;
pub mod macros;
pub mod maintenance;
pub mod shift;

pub use bike::*;
pub use driver::*;
pub use garage::*;
pub use maintenance::*;
pub use shift::*;
