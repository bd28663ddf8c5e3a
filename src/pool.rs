/// Typed entity collections.
///
/// A `Pool` owns its entities outright. Moving entities between pools is a
/// move of values (`drain` into the other pool's `extend`), so an entity can
/// never be reachable from two pools at once.

#[derive(Clone, Debug, PartialEq)]
pub struct Pool<T> {
    items: Vec<T>,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> Pool<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    /// Advance every entity in place; entities for which `step` returns
    /// `false` are compacted out. Each entity is visited exactly once and
    /// survivors keep their relative order.
    pub fn update<F>(&mut self, step: F)
    where
        F: FnMut(&mut T) -> bool,
    {
        self.items.retain_mut(step);
    }

    /// Remove one entity, keeping the order of the rest. Callers that remove
    /// while scanning walk indices from the back so earlier slots stay valid.
    pub fn remove(&mut self, index: usize) -> T {
        self.items.remove(index)
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, T> {
        self.items.drain(..)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T> Extend<T> for Pool<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl<T> FromIterator<T> for Pool<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self { items: iter.into_iter().collect() }
    }
}

impl<'a, T> IntoIterator for &'a Pool<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
