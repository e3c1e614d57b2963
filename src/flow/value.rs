//! Dynamically typed values passed between compiled flow steps.
//!
//! The compiler composes flows whose step types are only known at runtime
//! (they come from the diagram), so the compiled program moves `Value`s.
//! Hosts downcast at the edges of their own flow parts.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// A cheap-to-clone dynamic value. Cloning aliases the underlying data;
/// shared mutation goes through interior mutability in the host's model types.
#[derive(Clone)]
pub struct Value(Rc<dyn Any>);

impl Value {
    pub fn new<T: 'static>(value: T) -> Self {
        Value(Rc::new(value))
    }

    /// The conventional input for flows that ignore their input.
    pub fn unit() -> Self {
        Value::new(())
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }

    /// Takes the value as a shared handle to `T`, or gives it back unchanged.
    pub fn downcast<T: 'static>(self) -> Result<Rc<T>, Value> {
        self.0.downcast().map_err(Value)
    }

    pub fn is<T: 'static>(&self) -> bool {
        self.0.is::<T>()
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Value(..)")
    }
}
