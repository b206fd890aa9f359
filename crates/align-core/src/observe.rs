use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Reaction<T> = Rc<dyn Fn(&T)>;

/// Ordered list of reactions notified on every write of the value it guards.
///
/// Reactions run synchronously in registration order. The list is snapshotted
/// before the first reaction runs, so a reaction may watch, unwatch or write
/// other observed values while it is being notified. Mutual triggering is not
/// detected.
pub struct Dep<T: ?Sized> {
    reactions: RefCell<Vec<(SubscriptionId, Reaction<T>)>>,
    next_id: Cell<u64>,
}

impl<T: ?Sized> Default for Dep<T> {
    fn default() -> Self {
        Self {
            reactions: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }
}

impl<T: ?Sized> Dep<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn watch(&self, reaction: impl Fn(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.reactions.borrow_mut().push((id, Rc::new(reaction)));
        id
    }

    pub fn unwatch(&self, id: SubscriptionId) -> bool {
        let mut reactions = self.reactions.borrow_mut();
        let before = reactions.len();
        reactions.retain(|(existing, _)| *existing != id);
        reactions.len() != before
    }

    pub fn notify(&self, value: &T) {
        let snapshot: Vec<Reaction<T>> = self
            .reactions
            .borrow()
            .iter()
            .map(|(_, reaction)| reaction.clone())
            .collect();
        for reaction in snapshot {
            reaction(value);
        }
    }

    pub fn len(&self) -> usize {
        self.reactions.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.reactions.borrow_mut().clear();
    }
}

impl<T: ?Sized> fmt::Debug for Dep<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dep")
            .field("reactions", &self.len())
            .finish()
    }
}

/// A value behind explicit `get`/`set` whose writes notify reactions with the
/// previous value. Writes are never deduplicated: assigning an equal value
/// still notifies.
pub struct Observable<T> {
    value: RefCell<T>,
    dep: Dep<T>,
}

impl<T: Clone> Observable<T> {
    pub fn new(initial: T) -> Self {
        Self {
            value: RefCell::new(initial),
            dep: Dep::new(),
        }
    }

    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.borrow())
    }

    pub fn set(&self, value: T) {
        // The borrow ends before reactions run so they can read the new value.
        let previous = self.value.replace(value);
        self.dep.notify(&previous);
    }

    pub fn watch(&self, reaction: impl Fn(&T) + 'static) -> SubscriptionId {
        self.dep.watch(reaction)
    }

    pub fn unwatch(&self, id: SubscriptionId) -> bool {
        self.dep.unwatch(id)
    }

    pub fn reactions(&self) -> usize {
        self.dep.len()
    }

    pub(crate) fn clear_reactions(&self) {
        self.dep.clear();
    }
}

impl<T: Clone + Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("value", &self.value.borrow())
            .field("reactions", &self.dep.len())
            .finish()
    }
}
