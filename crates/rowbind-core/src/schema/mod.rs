mod classify;
mod walk;

pub use self::classify::*;
pub use self::walk::*;
