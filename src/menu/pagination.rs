//! Paged lists projected onto a contiguous range of menu slots.

use std::any::Any;
use std::marker::PhantomData;
use std::ops::Range;

use crate::error::MenuError;
use super::{ClickContext, ComponentAction, ComponentGrid, Icon, SlotComponent};

/// Index of a section inside its menu.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct SectionId(pub(super) usize);

/// Typed handle to a [`PaginatedSection`] attached to a menu.
pub struct SectionHandle<T> {
    id: SectionId,
    _items: PhantomData<fn() -> T>,
}

impl<T> SectionHandle<T> {
    pub(super) fn new(id: SectionId) -> Self {
        SectionHandle { id, _items: PhantomData }
    }

    pub fn id(&self) -> SectionId {
        self.id
    }
}

impl<T> Clone for SectionHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SectionHandle<T> {}

/// How a navigation control looks when there is no page in its direction.
#[derive(Clone, Debug)]
pub enum NavBoundary {
    Hide,
    Disabled(Icon),
}

#[derive(Clone, Debug)]
pub struct NavControls {
    pub previous_slot: usize,
    pub next_slot: usize,
    pub previous_icon: Icon,
    pub next_icon: Icon,
    pub at_boundary: NavBoundary,
}

impl NavControls {
    pub fn new(previous_slot: usize, next_slot: usize) -> Self {
        NavControls {
            previous_slot,
            next_slot,
            previous_icon: Icon::new("ARROW").named("Previous page"),
            next_icon: Icon::new("ARROW").named("Next page"),
            at_boundary: NavBoundary::Hide,
        }
    }

    pub fn icons(mut self, previous: Icon, next: Icon) -> Self {
        self.previous_icon = previous;
        self.next_icon = next;
        self
    }

    pub fn at_boundary(mut self, boundary: NavBoundary) -> Self {
        self.at_boundary = boundary;
        self
    }
}

/// Type-erased paging operations, shared by every `PaginatedSection<T>`.
pub trait Section: Any {
    fn slots(&self) -> Range<usize>;
    fn page(&self) -> usize;
    fn page_count(&self) -> usize;
    /// Whether `slot` is an item slot or a nav control of this section.
    fn claims(&self, slot: usize) -> bool;
    /// Clamps `page` and re-renders the section's slots if anything changed.
    /// Slots outside `grid` are skipped.
    fn set_page(&mut self, page: usize, grid: &mut ComponentGrid);
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

pub struct PaginatedSection<T> {
    id: SectionId,
    items: Vec<T>,
    page_size: usize,
    page: usize,
    slots: Range<usize>,
    render_item: Box<dyn Fn(&T) -> SlotComponent>,
    nav: Option<NavControls>,
    stale: bool,
}

impl<T: 'static> PaginatedSection<T> {
    pub fn new<F>(items: Vec<T>, page_size: usize, slots: Range<usize>, render_item: F) -> Result<Self, MenuError>
        where F: Fn(&T) -> SlotComponent + 'static
    {
        if page_size == 0 {
            return Err(MenuError::InvalidPageSize);
        }
        let range_len = slots.end.saturating_sub(slots.start);
        if page_size > range_len {
            return Err(MenuError::PageSizeExceedsRange { page_size, range_len });
        }
        Ok(PaginatedSection {
            id: SectionId(0),
            items,
            page_size,
            page: 0,
            slots,
            render_item: Box::new(render_item),
            nav: None,
            stale: true,
        })
    }

    pub fn with_nav(mut self, nav: NavControls) -> Self {
        self.nav = Some(nav);
        self
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn nav(&self) -> Option<&NavControls> {
        self.nav.as_ref()
    }

    /// Items shown on the current page.
    pub fn visible_items(&self) -> &[T] {
        let start = (self.page * self.page_size).min(self.items.len());
        let end = (start + self.page_size).min(self.items.len());
        &self.items[start..end]
    }

    /// Item slots followed by nav control slots.
    pub fn claimed_slots(&self) -> Vec<usize> {
        let mut claimed: Vec<usize> = self.slots.clone().collect();
        if let Some(ref nav) = self.nav {
            claimed.push(nav.previous_slot);
            claimed.push(nav.next_slot);
        }
        claimed
    }

    pub(super) fn attach(&mut self, id: SectionId, grid: &mut ComponentGrid) -> Result<(), MenuError> {
        let size = grid.size();
        if self.slots.start >= self.slots.end || self.slots.end > size {
            return Err(MenuError::SlotRangeOutOfBounds { start: self.slots.start, end: self.slots.end, size });
        }
        if let Some(ref nav) = self.nav {
            for &slot in &[nav.previous_slot, nav.next_slot] {
                if slot >= size {
                    return Err(MenuError::OutOfBounds { index: slot, size });
                }
                if self.slots.contains(&slot) {
                    return Err(MenuError::SlotConflict { slot });
                }
            }
            if nav.previous_slot == nav.next_slot {
                return Err(MenuError::SlotConflict { slot: nav.next_slot });
            }
        }
        self.id = id;
        self.stale = true;
        let page = self.page;
        self.set_page(page, grid);
        Ok(())
    }

    fn set_items(&mut self, items: Vec<T>, grid: &mut ComponentGrid) {
        self.items = items;
        self.stale = true;
        let page = self.page;
        self.set_page(page, grid);
    }

    fn render(&mut self, grid: &mut ComponentGrid) {
        let first = self.page * self.page_size;
        let size = grid.size();
        for (offset, slot) in self.slots.clone().enumerate() {
            if slot >= size {
                break;
            }
            let component = if offset < self.page_size {
                self.items.get(first + offset).map(|item| (self.render_item)(item))
            } else {
                None
            };
            if component.is_some() || !grid.is_empty(slot) {
                grid.replace(slot, component);
            }
        }
        if let Some(nav) = self.nav.clone() {
            let id = self.id;
            let has_previous = self.page > 0;
            let has_next = self.page + 1 < self.page_count();
            let previous = nav_button(has_previous, nav.previous_icon, &nav.at_boundary, move |ctx| {
                if let Some(mut pager) = ctx.pager(id) {
                    pager.previous_page();
                }
                ComponentAction::Refresh
            });
            let next = nav_button(has_next, nav.next_icon, &nav.at_boundary, move |ctx| {
                if let Some(mut pager) = ctx.pager(id) {
                    pager.next_page();
                }
                ComponentAction::Refresh
            });
            if nav.previous_slot < size {
                grid.replace(nav.previous_slot, previous);
            }
            if nav.next_slot < size {
                grid.replace(nav.next_slot, next);
            }
        }
    }
}

fn nav_button<F>(active: bool, icon: Icon, boundary: &NavBoundary, on_click: F) -> Option<SlotComponent>
    where F: Fn(&mut ClickContext) -> ComponentAction + 'static
{
    if active {
        Some(SlotComponent::button(icon, on_click))
    } else {
        match *boundary {
            NavBoundary::Hide => None,
            NavBoundary::Disabled(ref icon) => Some(SlotComponent::new(icon.clone())),
        }
    }
}

impl<T: 'static> Section for PaginatedSection<T> {
    fn slots(&self) -> Range<usize> {
        self.slots.clone()
    }

    fn page(&self) -> usize {
        self.page
    }

    fn claims(&self, slot: usize) -> bool {
        self.slots.contains(&slot)
            || self.nav.as_ref().map_or(false, |nav| nav.previous_slot == slot || nav.next_slot == slot)
    }

    fn page_count(&self) -> usize {
        ((self.items.len() + self.page_size - 1) / self.page_size).max(1)
    }

    fn set_page(&mut self, page: usize, grid: &mut ComponentGrid) {
        let page = page.min(self.page_count() - 1);
        if page == self.page && !self.stale {
            return;
        }
        self.page = page;
        self.stale = false;
        self.render(grid);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A section borrowed together with the grid it renders into.
pub struct Pager<'a, S: ?Sized> {
    section: &'a mut S,
    grid: &'a mut ComponentGrid,
}

impl<'a, S: Section + ?Sized> Pager<'a, S> {
    pub(super) fn new(section: &'a mut S, grid: &'a mut ComponentGrid) -> Self {
        Pager { section, grid }
    }

    pub fn get(&self) -> &S {
        self.section
    }

    pub fn page(&self) -> usize {
        self.section.page()
    }

    pub fn page_count(&self) -> usize {
        self.section.page_count()
    }

    pub fn set_page(&mut self, page: usize) {
        self.section.set_page(page, self.grid);
    }

    /// No-op on the last page.
    pub fn next_page(&mut self) {
        let page = self.section.page();
        if page + 1 < self.section.page_count() {
            self.set_page(page + 1);
        }
    }

    /// No-op on the first page.
    pub fn previous_page(&mut self) {
        let page = self.section.page();
        if page > 0 {
            self.set_page(page - 1);
        }
    }
}

impl<'a, T: 'static> Pager<'a, PaginatedSection<T>> {
    pub fn items(&self) -> &[T] {
        self.section.items()
    }

    /// Replaces the backing list, re-clamping the current page.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.section.set_items(items, self.grid);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn section(items: usize, page_size: usize, slots: Range<usize>) -> PaginatedSection<usize> {
        PaginatedSection::new((0..items).collect(), page_size, slots, |i: &usize| {
            SlotComponent::new(Icon::new(format!("ITEM_{}", i)))
        }).unwrap()
    }

    fn materials(grid: &ComponentGrid, slots: Range<usize>) -> Vec<Option<String>> {
        slots.map(|s| grid.component_at(s).map(|c| c.display().material().to_string())).collect()
    }

    fn attached(s: &mut PaginatedSection<usize>, size: usize) -> ComponentGrid {
        let mut grid = ComponentGrid::new(size).unwrap();
        s.attach(SectionId(0), &mut grid).unwrap();
        grid
    }

    #[test]
    fn page_count() {
        for &(len, size, expected) in &[(0, 3, 1), (1, 3, 1), (3, 3, 1), (4, 3, 2), (7, 3, 3), (9, 3, 3), (10, 1, 10)] {
            assert_eq!(section(len, size, 0..size).page_count(), expected, "len {} size {}", len, size);
        }
    }

    #[test]
    fn invalid_construction() {
        match PaginatedSection::new(vec![1], 0, 0..3, |_: &i32| SlotComponent::new(Icon::empty())) {
            Err(MenuError::InvalidPageSize) => {}
            _ => panic!("zero page size accepted"),
        }
        match PaginatedSection::new(vec![1], 4, 0..3, |_: &i32| SlotComponent::new(Icon::empty())) {
            Err(MenuError::PageSizeExceedsRange { page_size: 4, range_len: 3 }) => {}
            _ => panic!("oversized page accepted"),
        }
        let mut s = section(3, 3, 7..10);
        let mut grid = ComponentGrid::new(9).unwrap();
        assert!(s.attach(SectionId(0), &mut grid).is_err());
    }

    #[test]
    fn set_page_clamps_and_clears_leftovers() {
        let mut s = section(7, 3, 0..3);
        let mut grid = attached(&mut s, 9);
        assert_eq!(s.page_count(), 3);
        assert_eq!(materials(&grid, 0..3), vec![Some("ITEM_0".to_string()), Some("ITEM_1".to_string()), Some("ITEM_2".to_string())]);

        s.set_page(5, &mut grid);
        assert_eq!(s.page(), 2);
        assert_eq!(materials(&grid, 0..3), vec![Some("ITEM_6".to_string()), None, None]);
        assert_eq!(s.visible_items(), &[6]);
    }

    #[test]
    fn set_page_is_idempotent() {
        let mut s = section(7, 3, 0..3);
        let mut grid = attached(&mut s, 9);
        s.set_page(1, &mut grid);
        let _ = grid.dirty_slots();
        s.set_page(1, &mut grid);
        assert_eq!(grid.dirty_slots().count(), 0);
    }

    #[test]
    fn next_and_previous_stop_at_boundaries() {
        let mut s = section(5, 2, 2..4);
        let mut grid = attached(&mut s, 9);
        {
            let mut pager = Pager::new(&mut s, &mut grid);
            pager.previous_page();
            assert_eq!(pager.page(), 0);
            pager.next_page();
            pager.next_page();
            assert_eq!(pager.page(), 2);
            pager.next_page();
            assert_eq!(pager.page(), 2);
        }
        assert_eq!(materials(&grid, 2..4), vec![Some("ITEM_4".to_string()), None]);
    }

    #[test]
    fn set_items_reclamps() {
        let mut s = section(9, 3, 0..3);
        let mut grid = attached(&mut s, 9);
        s.set_page(2, &mut grid);
        {
            let mut pager = Pager::new(&mut s, &mut grid);
            pager.set_items(vec![10, 11, 12, 13]);
            assert_eq!(pager.page(), 1);
            assert_eq!(pager.items().len(), 4);
        }
        assert_eq!(materials(&grid, 0..3), vec![Some("ITEM_13".to_string()), None, None]);

        Pager::new(&mut s, &mut grid).set_items(Vec::new());
        assert_eq!(s.page(), 0);
        assert_eq!(s.page_count(), 1);
        assert_eq!(materials(&grid, 0..3), vec![None, None, None]);
    }

    #[test]
    fn range_longer_than_page() {
        let mut s = section(4, 2, 0..4);
        let grid = attached(&mut s, 9);
        assert_eq!(materials(&grid, 0..4), vec![Some("ITEM_0".to_string()), Some("ITEM_1".to_string()), None, None]);
    }

    #[test]
    fn unattached_section_skips_slots_outside_grid() {
        let mut s = section(4, 2, 8..10).with_nav(NavControls::new(7, 20));
        let mut grid = ComponentGrid::new(9).unwrap();
        s.set_page(0, &mut grid);
        assert_eq!(materials(&grid, 7..9), vec![None, Some("ITEM_0".to_string())]);

        let mut far = section(1, 1, 20..21);
        let mut grid = ComponentGrid::new(9).unwrap();
        far.set_page(0, &mut grid);
        assert_eq!(grid.iter().count(), 0);
    }

    #[test]
    fn nav_slots_must_not_collide() {
        let mut inside = section(5, 3, 0..3).with_nav(NavControls::new(0, 2));
        match inside.attach(SectionId(0), &mut ComponentGrid::new(9).unwrap()) {
            Err(MenuError::SlotConflict { slot: 0 }) => {}
            other => panic!("nav inside item range accepted: {:?}", other.is_ok()),
        }
        let mut shared = section(5, 3, 0..3).with_nav(NavControls::new(8, 8));
        match shared.attach(SectionId(0), &mut ComponentGrid::new(9).unwrap()) {
            Err(MenuError::SlotConflict { slot: 8 }) => {}
            other => panic!("shared nav slot accepted: {:?}", other.is_ok()),
        }
        let s = section(5, 3, 0..3).with_nav(NavControls::new(7, 8));
        assert_eq!(s.claimed_slots(), vec![0, 1, 2, 7, 8]);
        assert!(s.claims(8));
        assert!(!s.claims(5));
    }

    #[test]
    fn nav_controls_follow_boundaries() {
        let mut s = section(5, 2, 0..2).with_nav(
            NavControls::new(7, 8).at_boundary(NavBoundary::Disabled(Icon::new("GRAY_PANE")))
        );
        let mut grid = attached(&mut s, 9);
        assert!(!grid.component_at(7).unwrap().is_clickable());
        assert_eq!(grid.component_at(7).unwrap().display().material(), "GRAY_PANE");
        assert!(grid.component_at(8).unwrap().is_clickable());

        s.set_page(2, &mut grid);
        assert!(grid.component_at(7).unwrap().is_clickable());
        assert!(!grid.component_at(8).unwrap().is_clickable());

        let mut hidden = section(2, 2, 0..2).with_nav(NavControls::new(7, 8));
        let grid = attached(&mut hidden, 9);
        assert!(grid.is_empty(7));
        assert!(grid.is_empty(8));
    }
}
