use std::cell::{Ref, RefCell};
use std::ops::Deref;
use std::rc::Rc;

/// Reduces an integer to a byte by keeping its low eight bits.
pub fn mask(value: i64) -> u8 {
    (value & 0xFF) as u8
}

/// Shared, mutable byte buffer.
#[derive(Clone, Default, PartialEq)]
pub struct ByteArray(Rc<RefCell<Vec<u8>>>);

impl ByteArray {
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        ByteArray(Rc::new(RefCell::new(bytes)))
    }

    pub fn from_masked(values: impl IntoIterator<Item = i64>) -> Self {
        Self::from_vec(values.into_iter().map(mask).collect())
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<u8> {
        self.0.borrow().get(index).copied()
    }

    /// Stores `mask(value)` at `index`. Returns `false` when `index` is past the end.
    pub fn set(&self, index: usize, value: i64) -> bool {
        match self.0.borrow_mut().get_mut(index) {
            Some(slot) => {
                *slot = mask(value);
                true
            }
            None => false,
        }
    }

    pub fn push(&self, value: i64) {
        self.0.borrow_mut().push(mask(value));
    }

    pub fn pop(&self) -> Option<u8> {
        self.0.borrow_mut().pop()
    }

    pub fn snapshot(&self) -> Vec<u8> {
        self.0.borrow().clone()
    }

    /// Immutable copy of the current contents.
    pub fn freeze(&self) -> Bytes {
        Bytes::from(self.0.borrow().as_slice())
    }

    pub fn borrow(&self) -> Ref<'_, Vec<u8>> {
        self.0.borrow()
    }

    pub fn ptr_eq(&self, other: &ByteArray) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Immutable byte string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Bytes(Rc<[u8]>);

impl Deref for Bytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl Default for Bytes {
    fn default() -> Self {
        Bytes(Rc::from(&[][..]))
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(bytes: Vec<u8>) -> Self {
        Bytes(bytes.into())
    }
}

impl From<&[u8]> for Bytes {
    fn from(bytes: &[u8]) -> Self {
        Bytes(bytes.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ingestion_masks_low_byte() {
        let bytes = ByteArray::from_masked([300, -1, 255, 256]);
        assert_eq!(bytes.snapshot(), vec![44, 255, 255, 0]);
        bytes.push(-2);
        assert_eq!(bytes.get(4), Some(254));
    }

    #[test]
    fn set_masks_and_ignores_out_of_range() {
        let bytes = ByteArray::from_vec(vec![0; 2]);
        assert!(bytes.set(0, 511));
        assert!(!bytes.set(2, 1));
        assert_eq!(bytes.snapshot(), vec![255, 0]);
    }

    #[test]
    fn frozen_copy_is_detached() {
        let bytes = ByteArray::from_vec(vec![0; 3]);
        let frozen = bytes.freeze();
        bytes.set(0, 7);
        assert_eq!(&*frozen, &[0, 0, 0]);
        assert_eq!(bytes.pop(), Some(0));
        assert_eq!(bytes.len(), 2);
    }

    #[test]
    fn cloned_handle_shares_the_buffer() {
        let bytes = ByteArray::from_vec(vec![0; 2]);
        let alias = bytes.clone();
        alias.set(1, 300);
        alias.push(-1);
        assert_eq!(bytes.snapshot(), vec![0, 44, 255]);
        assert!(bytes.ptr_eq(&alias));
        assert!(!bytes.ptr_eq(&ByteArray::from_vec(bytes.snapshot())));
    }
}
