mod bits;
mod kind;
mod overwrite;
mod value;

pub use bits::*;
pub use kind::*;
pub use overwrite::*;
pub use value::*;
