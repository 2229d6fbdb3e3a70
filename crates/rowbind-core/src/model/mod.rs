mod meta;
mod property;
mod target;
mod universe;

pub use self::meta::*;
pub use self::property::*;
pub use self::target::*;
pub use self::universe::*;
