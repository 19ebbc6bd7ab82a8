use std::collections::HashSet;
use std::fmt;

use crate::menu::Menu;

/// Non-owning handle to a menu in a [`MenuStore`].
///
/// Handles carry the generation of their slot, so a handle to a menu that
/// has been dropped never resolves to whatever reuses the slot later.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct MenuId {
    index: u32,
    generation: u32,
}

impl fmt::Display for MenuId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "menu#{}v{}", self.index, self.generation)
    }
}

struct StoreEntry {
    generation: u32,
    pinned: bool,
    retired: bool,
    menu: Option<Menu>,
}

/// Owns every live menu.
#[derive(Default)]
pub struct MenuStore {
    entries: Vec<StoreEntry>,
    free: Vec<u32>,
    len: usize,
}

impl MenuStore {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn insert(&mut self, menu: Menu) -> MenuId {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let entry = &mut self.entries[index as usize];
            entry.generation = entry.generation.wrapping_add(1);
            entry.pinned = false;
            entry.retired = false;
            entry.menu = Some(menu);
            MenuId { index, generation: entry.generation }
        } else {
            self.entries.push(StoreEntry { generation: 0, pinned: false, retired: false, menu: Some(menu) });
            MenuId { index: self.entries.len() as u32 - 1, generation: 0 }
        }
    }

    fn entry(&self, id: MenuId) -> Option<&StoreEntry> {
        self.entries.get(id.index as usize)
            .filter(|e| e.generation == id.generation && e.menu.is_some())
    }

    fn entry_mut(&mut self, id: MenuId) -> Option<&mut StoreEntry> {
        self.entries.get_mut(id.index as usize)
            .filter(|e| e.generation == id.generation && e.menu.is_some())
    }

    pub fn get(&self, id: MenuId) -> Option<&Menu> {
        self.entry(id).and_then(|e| e.menu.as_ref())
    }

    pub fn get_mut(&mut self, id: MenuId) -> Option<&mut Menu> {
        self.entry_mut(id).and_then(|e| e.menu.as_mut())
    }

    pub fn contains(&self, id: MenuId) -> bool {
        self.entry(id).is_some()
    }

    pub fn remove(&mut self, id: MenuId) -> Option<Menu> {
        let menu = self.entry_mut(id)?.menu.take();
        self.free.push(id.index);
        self.len -= 1;
        menu
    }

    /// Keeps the menu alive while it is closed, until [`unpin`](MenuStore::unpin) or removal.
    pub fn pin(&mut self, id: MenuId) -> bool {
        self.set_pinned(id, true)
    }

    pub fn unpin(&mut self, id: MenuId) -> bool {
        self.set_pinned(id, false)
    }

    fn set_pinned(&mut self, id: MenuId, pinned: bool) -> bool {
        match self.entry_mut(id) {
            Some(e) => {
                e.pinned = pinned;
                true
            }
            None => false,
        }
    }

    pub fn is_pinned(&self, id: MenuId) -> bool {
        self.entry(id).map_or(false, |e| e.pinned)
    }

    /// Marks a menu as closed, making it a candidate for [`collect`](MenuStore::collect).
    pub fn retire(&mut self, id: MenuId) {
        if let Some(e) = self.entry_mut(id) {
            e.retired = true;
        }
    }

    pub fn revive(&mut self, id: MenuId) {
        if let Some(e) = self.entry_mut(id) {
            e.retired = false;
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every retired menu that is neither pinned nor reachable through
    /// `previous` links from one of the `open` menus. Returns the number dropped.
    ///
    /// Menus that were inserted but never opened are left alone.
    pub fn collect<I>(&mut self, open: I) -> usize
        where I: IntoIterator<Item=MenuId>
    {
        let mut reachable = HashSet::new();
        for id in open {
            let mut next = Some(id);
            while let Some(id) = next {
                if !reachable.insert(id) {
                    break;
                }
                next = self.get(id).and_then(|m| m.previous());
            }
        }
        let mut dropped = 0;
        for index in 0..self.entries.len() {
            let id = MenuId { index: index as u32, generation: self.entries[index].generation };
            let entry = &self.entries[index];
            if entry.menu.is_some() && entry.retired && !entry.pinned && !reachable.contains(&id) {
                self.remove(id);
                dropped += 1;
            }
        }
        dropped
    }

    pub fn clear(&mut self) {
        for index in 0..self.entries.len() {
            let id = MenuId { index: index as u32, generation: self.entries[index].generation };
            self.remove(id);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn menu() -> Menu {
        Menu::new("test", 9).unwrap()
    }

    #[test]
    fn stale_handles_do_not_resolve() {
        let mut store = MenuStore::new();
        let a = store.insert(menu());
        assert!(store.remove(a).is_some());
        let b = store.insert(menu());
        assert_ne!(a, b);
        assert!(store.get(a).is_none());
        assert!(store.remove(a).is_none());
        assert!(store.get(b).is_some());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn collect_keeps_back_chain_and_pinned() {
        let mut store = MenuStore::new();
        let root = store.insert(menu());
        let middle = store.insert(menu().with_previous(root));
        let top = store.insert(menu().with_previous(middle));
        let orphan = store.insert(menu());
        let pinned = store.insert(menu());
        let fresh = store.insert(menu());
        store.pin(pinned);
        for &id in &[root, middle, top, orphan, pinned] {
            store.retire(id);
        }

        assert_eq!(store.collect(vec![top]), 1);
        assert!(store.contains(root) && store.contains(middle) && store.contains(top));
        assert!(!store.contains(orphan));
        assert!(store.contains(pinned));
        assert!(store.contains(fresh));

        assert_eq!(store.collect(None::<MenuId>), 3);
        assert_eq!(store.len(), 2);
        store.unpin(pinned);
        store.revive(fresh);
        store.collect(None::<MenuId>);
        assert_eq!(store.len(), 1);
        assert!(store.contains(fresh));
    }

    #[test]
    fn collect_survives_previous_cycles() {
        let mut store = MenuStore::new();
        let a = store.insert(menu());
        let b = store.insert(menu().with_previous(a));
        store.get_mut(a).unwrap().set_previous(Some(b));
        store.retire(a);
        store.retire(b);
        assert_eq!(store.collect(Some(a)), 0);
        assert_eq!(store.len(), 2);
    }
}
