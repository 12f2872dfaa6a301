use std::fmt::{Debug, Display};

use num_traits::{Float as NumFloat, FloatConst, FromPrimitive};

/// Marker trait for the primitive float the AD types are built over.
///
/// AD wrapper types never implement this. Only `f64` has a thread-local tape
/// slot, so it is the only implementor.
pub trait Float:
    NumFloat + FloatConst + FromPrimitive + Copy + Send + Sync + Default + Debug + Display + 'static
{
}

impl Float for f64 {}
