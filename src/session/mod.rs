use std::collections::hash_map::{self, Entry, HashMap};
use std::fmt;

pub use self::store::{MenuId, MenuStore};

mod store;

/// Identity of a player looking at menus, as assigned by the host.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Debug)]
pub struct ViewerId(pub u64);

/// One host-rendered inventory instance. A fresh surface is allocated for every open.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Debug)]
pub struct SurfaceId(pub u64);

impl ViewerId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl SurfaceId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ViewerId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "viewer#{}", self.0)
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "surface#{}", self.0)
    }
}

/// The focused menu of one viewer and the surface it is shown on.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Session {
    pub menu: MenuId,
    pub surface: SurfaceId,
}

/// Maps each viewer to the one menu they currently have focused.
///
/// The registry is a plain value owned by the [`Dispatcher`](crate::Dispatcher);
/// it is created with [`init`](SessionRegistry::init) at host startup and
/// emptied with [`clear`](SessionRegistry::clear) at shutdown.
#[derive(Default, Debug)]
pub struct SessionRegistry {
    sessions: HashMap<ViewerId, Session>,
}

impl SessionRegistry {
    pub fn init() -> Self {
        SessionRegistry { sessions: HashMap::new() }
    }

    /// Installs `session` as the viewer's focus.
    ///
    /// If the viewer already had a session, `close_previous` runs with it and
    /// returns before the new entry becomes visible.
    pub fn focus<F>(&mut self, viewer: ViewerId, session: Session, close_previous: F)
        where F: FnOnce(Session)
    {
        match self.sessions.entry(viewer) {
            Entry::Occupied(mut e) => {
                close_previous(*e.get());
                e.insert(session);
            }
            Entry::Vacant(e) => {
                e.insert(session);
            }
        }
    }

    pub fn current(&self, viewer: ViewerId) -> Option<Session> {
        self.sessions.get(&viewer).cloned()
    }

    /// Removes the viewer's entry, but only while it still equals `expected`.
    pub fn release(&mut self, viewer: ViewerId, expected: Session) -> bool {
        match self.sessions.entry(viewer) {
            Entry::Occupied(e) => {
                if *e.get() == expected {
                    e.remove();
                    true
                } else {
                    false
                }
            }
            Entry::Vacant(_) => false,
        }
    }

    pub fn viewer_of(&self, menu: MenuId) -> Option<ViewerId> {
        self.sessions.iter().find(|&(_, s)| s.menu == menu).map(|(&v, _)| v)
    }

    pub fn iter(&self) -> hash_map::Iter<ViewerId, Session> {
        self.sessions.iter()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Empties the registry, returning every session that was still focused.
    pub fn clear(&mut self) -> Vec<(ViewerId, Session)> {
        let mut drained: Vec<_> = self.sessions.drain().collect();
        drained.sort_by_key(|&(v, _)| v);
        drained
    }
}
