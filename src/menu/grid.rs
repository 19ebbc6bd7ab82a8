use std::collections::btree_set::{self, BTreeSet};
use std::mem;
use std::ops::Index;

use crate::error::MenuError;
use super::SlotComponent;

/// Fixed-size slot storage of a menu.
///
/// Every change is recorded as a dirty slot until the next [`dirty_slots`](ComponentGrid::dirty_slots).
pub struct ComponentGrid {
    slots: Vec<Option<SlotComponent>>,
    dirty: BTreeSet<usize>,
}

impl ComponentGrid {
    pub fn new(size: usize) -> Result<Self, MenuError> {
        if size == 0 {
            return Err(MenuError::InvalidSize);
        }
        Ok(ComponentGrid {
            slots: (0..size).map(|_| None).collect(),
            dirty: BTreeSet::new(),
        })
    }

    pub fn size(&self) -> usize {
        self.slots.len()
    }

    fn check(&self, index: usize) -> Result<(), MenuError> {
        if index < self.slots.len() {
            Ok(())
        } else {
            Err(MenuError::OutOfBounds { index, size: self.slots.len() })
        }
    }

    /// Puts `component` into `index`, returning what was there before.
    pub fn bind(&mut self, index: usize, component: SlotComponent) -> Result<Option<SlotComponent>, MenuError> {
        self.check(index)?;
        Ok(self.replace(index, Some(component)))
    }

    pub fn unbind(&mut self, index: usize) -> Result<Option<SlotComponent>, MenuError> {
        self.check(index)?;
        Ok(self.replace(index, None))
    }

    /// Caller guarantees `index < size`.
    pub(super) fn replace(&mut self, index: usize, component: Option<SlotComponent>) -> Option<SlotComponent> {
        self.dirty.insert(index);
        mem::replace(&mut self.slots[index], component)
    }

    pub fn component_at(&self, index: usize) -> Option<&SlotComponent> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn is_empty(&self, index: usize) -> bool {
        self.component_at(index).is_none()
    }

    /// Occupied slots in ascending order.
    pub fn iter(&self) -> impl Iterator<Item=(usize, &SlotComponent)> {
        self.slots.iter().enumerate().filter_map(|(i, s)| s.as_ref().map(|c| (i, c)))
    }

    /// Takes the set of slots changed since the last call.
    pub fn dirty_slots(&mut self) -> DirtySlots {
        DirtySlots(mem::replace(&mut self.dirty, BTreeSet::new()).into_iter())
    }

    pub fn has_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    pub fn mark_all_dirty(&mut self) {
        self.dirty.extend(0..self.slots.len());
    }

    pub fn clear(&mut self) {
        for index in 0..self.slots.len() {
            if self.slots[index].take().is_some() {
                self.dirty.insert(index);
            }
        }
    }
}

impl Index<usize> for ComponentGrid {
    type Output = Option<SlotComponent>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.slots[index]
    }
}

/// One-shot, ascending sequence of dirty slot indices.
#[derive(Debug)]
pub struct DirtySlots(btree_set::IntoIter<usize>);

impl Iterator for DirtySlots {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        self.0.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl ExactSizeIterator for DirtySlots {}

#[cfg(test)]
mod test {
    use super::*;
    use crate::menu::Icon;

    fn component(material: &str) -> SlotComponent {
        SlotComponent::new(Icon::new(material))
    }

    #[test]
    fn bind_then_lookup() {
        for size in 1..30 {
            let mut grid = ComponentGrid::new(size).unwrap();
            for i in 0..size {
                let material = format!("M{}", i);
                assert!(grid.bind(i, component(&material)).unwrap().is_none());
                assert_eq!(grid.component_at(i).unwrap().display().material(), material.as_str());
            }
            match grid.bind(size, component("X")) {
                Err(MenuError::OutOfBounds { index, size: s }) => {
                    assert_eq!(index, size);
                    assert_eq!(s, size);
                }
                other => panic!("expected out of bounds, got {:?}", other),
            }
            assert!(grid.unbind(size + 10).is_err());
            assert!(grid.component_at(size).is_none());
        }
    }

    #[test]
    fn zero_size_rejected() {
        assert!(ComponentGrid::new(0).is_err());
    }

    #[test]
    fn rebind_replaces() {
        let mut grid = ComponentGrid::new(9).unwrap();
        grid.bind(4, component("A")).unwrap();
        let old = grid.bind(4, component("B")).unwrap();
        assert_eq!(old.unwrap().display().material(), "A");
        assert_eq!(grid.iter().count(), 1);
        assert_eq!(grid[4].as_ref().unwrap().display().material(), "B");
        assert!(grid.unbind(4).unwrap().is_some());
        assert!(grid.is_empty(4));
    }

    #[test]
    fn dirty_slots_are_one_shot() {
        let mut grid = ComponentGrid::new(9).unwrap();
        grid.bind(7, component("A")).unwrap();
        grid.bind(2, component("B")).unwrap();
        grid.bind(7, component("C")).unwrap();
        grid.unbind(5).unwrap();
        assert!(grid.has_dirty());
        let dirty = grid.dirty_slots();
        assert_eq!(dirty.len(), 3);
        assert_eq!(dirty.collect::<Vec<_>>(), vec![2, 5, 7]);
        assert_eq!(grid.dirty_slots().count(), 0);
        assert!(!grid.has_dirty());
    }

    #[test]
    fn clear_marks_only_occupied() {
        let mut grid = ComponentGrid::new(5).unwrap();
        grid.bind(1, component("A")).unwrap();
        grid.bind(3, component("B")).unwrap();
        let _ = grid.dirty_slots();
        grid.clear();
        assert_eq!(grid.dirty_slots().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(grid.iter().count(), 0);
        grid.mark_all_dirty();
        assert_eq!(grid.dirty_slots().count(), 5);
    }
}
