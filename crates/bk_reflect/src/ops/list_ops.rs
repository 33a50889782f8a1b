use crate::Reflect;

/// A reflected growable sequence.
///
/// ```
/// use bk_reflect::{Reflect, ops::List};
///
/// let mut list: Vec<u32> = vec![1];
/// list.push_boxed(Box::new(2_u32)).unwrap();
/// assert!(list.push_boxed(Box::new("x".to_string())).is_err());
/// assert_eq!(List::len(&list), 2);
/// ```
pub trait List: Reflect {
    fn len(&self) -> usize;

    fn get(&self, index: usize) -> Option<&dyn Reflect>;

    /// Appends a value, giving it back if it is not of the item type.
    fn push_boxed(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>;

    fn clear(&mut self);
}

impl dyn List {
    /// Iterates the items in order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Reflect> {
        (0..self.len()).filter_map(move |index| self.get(index))
    }
}
