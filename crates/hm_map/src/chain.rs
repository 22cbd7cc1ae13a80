//! A singly-linked list of key/value nodes, one per [`ChainedMap`] bucket.
//!
//! [`ChainedMap`]: crate::ChainedMap

use std::{fmt, iter::FusedIterator};

struct Node<V> {
    key: String,
    value: V,
    next: Link<V>,
}

type Link<V> = Option<Box<Node<V>>>;

pub struct Chain<V> {
    head: Link<V>,
    len: usize,
}

impl<V> Chain<V> {
    #[must_use]
    pub const fn new() -> Self {
        Self { head: None, len: 0 }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Link a new node in front of the chain.
    ///
    /// This does not check for an existing node with the same key.
    pub fn insert(&mut self, key: String, value: V) {
        let next = self.head.take();
        self.head = Some(Box::new(Node { key, value, next }));
        self.len += 1;
    }

    /// Unlink the first node holding `key`, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let mut cursor = &mut self.head;
        while cursor.as_ref().is_some_and(|node| node.key != key) {
            cursor = &mut cursor.as_mut()?.next;
        }

        let node = cursor.take()?;
        *cursor = node.next;
        self.len -= 1;

        Some(node.value)
    }

    /// Unlink the head node.
    pub fn pop_front(&mut self) -> Option<(String, V)> {
        let node = self.head.take()?;
        let Node { key, value, next } = *node;
        self.head = next;
        self.len -= 1;

        Some((key, value))
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&V> {
        self.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let mut cursor = self.head.as_deref_mut();
        while let Some(node) = cursor {
            if node.key == key {
                return Some(&mut node.value);
            }
            cursor = node.next.as_deref_mut();
        }

        None
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterate from the head of the chain.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            next: self.head.as_deref(),
            remaining: self.len,
        }
    }
}

impl<V> Default for Chain<V> {
    fn default() -> Self {
        Self::new()
    }
}

// Unlink node by node; the default recursive drop can overflow the stack on
// a long chain.
impl<V> Drop for Chain<V> {
    fn drop(&mut self) {
        let mut link = self.head.take();
        while let Some(mut node) = link {
            link = node.next.take();
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for Chain<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<V: fmt::Display> fmt::Display for Chain<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{key}: {value}")?;
        }

        Ok(())
    }
}

impl<'a, V> IntoIterator for &'a Chain<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Iter<'a, V> {
        self.iter()
    }
}

impl<V> IntoIterator for Chain<V> {
    type Item = (String, V);
    type IntoIter = IntoIter<V>;

    fn into_iter(self) -> IntoIter<V> {
        IntoIter(self)
    }
}

pub struct IntoIter<V>(Chain<V>);

impl<V> Iterator for IntoIter<V> {
    type Item = (String, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.0.len, Some(self.0.len))
    }
}

impl<V> ExactSizeIterator for IntoIter<V> {}

pub struct Iter<'a, V> {
    next: Option<&'a Node<V>>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = node.next.as_deref();
        self.remaining -= 1;

        Some((node.key.as_str(), &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}
impl<V> FusedIterator for Iter<'_, V> {}
