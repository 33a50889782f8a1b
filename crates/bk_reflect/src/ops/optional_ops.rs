use crate::Reflect;

// -----------------------------------------------------------------------------
// Optional

/// A reflected value that may be absent.
pub trait Optional: Reflect {
    fn value(&self) -> Option<&dyn Reflect>;

    fn value_mut(&mut self) -> Option<&mut dyn Reflect>;

    /// Stores a present value, giving it back if it is not of the inner type.
    fn set_some(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>;

    /// Makes the value absent.
    fn clear(&mut self);
}

// -----------------------------------------------------------------------------
// Pointer

/// A reflected owning pointer, always holding a pointee.
pub trait Pointer: Reflect {
    fn pointee(&self) -> &dyn Reflect;

    fn pointee_mut(&mut self) -> &mut dyn Reflect;
}
