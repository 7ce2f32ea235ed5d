use crate::error::PointerError;
use crate::notify::{ChangeNotifier, ObserveError};
use crate::path::LocationSpec;
use crate::resolve::retrieve_child;
use crate::values::map::{Map, MapRef};
use crate::values::value::Value;
use log::{debug, trace};
use std::cell::RefCell;
use std::fmt::{self, Debug};
use std::rc::{Rc, Weak};

/// The root a pointer resolves against: either a raw container or another
/// pointer, whose own resolved location then acts as the container.
#[derive(Clone)]
enum Root {
    Map(MapRef),
    Pointer(Pointer),
}

/// Accepted root inputs for [`Pointer::new`] and [`Pointer::set_root`].
///
/// A dynamic [`Value`] is accepted too, but only a map value passes
/// validation — anything else fails with [`PointerError::InvalidRoot`].
#[derive(Clone)]
pub enum RootSpec {
    Map(MapRef),
    Pointer(Pointer),
    Value(Value),
}

impl RootSpec {
    fn into_root(self) -> Result<Root, PointerError> {
        match self {
            RootSpec::Map(map) => Ok(Root::Map(map)),
            RootSpec::Pointer(pointer) => Ok(Root::Pointer(pointer)),
            RootSpec::Value(Value::Map(map)) => Ok(Root::Map(map)),
            RootSpec::Value(_) => Err(PointerError::InvalidRoot),
        }
    }
}

impl From<MapRef> for RootSpec {
    fn from(map: MapRef) -> Self {
        RootSpec::Map(map)
    }
}

impl From<&MapRef> for RootSpec {
    fn from(map: &MapRef) -> Self {
        RootSpec::Map(Rc::clone(map))
    }
}

impl From<Map> for RootSpec {
    fn from(map: Map) -> Self {
        RootSpec::Map(map.into_ref())
    }
}

impl From<Pointer> for RootSpec {
    fn from(pointer: Pointer) -> Self {
        RootSpec::Pointer(pointer)
    }
}

impl From<&Pointer> for RootSpec {
    fn from(pointer: &Pointer) -> Self {
        RootSpec::Pointer(pointer.clone())
    }
}

impl From<Value> for RootSpec {
    fn from(value: Value) -> Self {
        RootSpec::Value(value)
    }
}

struct PointerState {
    root: Root,
    location: Vec<String>,
    /// Lazily computed container at `root` + `location`. Only maps are ever
    /// cached; an absent or non-map resolution leaves this empty.
    resolved: Option<MapRef>,
    /// The one live subscription on the chained parent's notifier.
    parent_subscription: Option<u32>,
}

/// Points at a position inside a nested map container and reads, writes,
/// creates and deletes everything nested below that position.
///
/// A pointer's root can be another pointer. Such a chained pointer resolves
/// relative to its parent's current location and re-resolves automatically
/// whenever the parent's root or location changes.
///
/// `Pointer` is a cheap clone handle; clones observe and mutate the same
/// pointer state.
#[derive(Clone)]
pub struct Pointer {
    state: Rc<RefCell<PointerState>>,
    notifier: Rc<ChangeNotifier>,
}

impl Pointer {
    /// Creates a pointer over `root` at `location`.
    ///
    /// Same semantics as [`Pointer::set_root`] on an existing pointer.
    pub fn new(
        root: impl Into<RootSpec>,
        location: impl Into<LocationSpec>,
    ) -> Result<Self, PointerError> {
        let root = root.into().into_root()?;
        let location = location.into().normalize()?;
        let pointer = Pointer {
            state: Rc::new(RefCell::new(PointerState {
                root: root.clone(),
                location,
                resolved: None,
                parent_subscription: None,
            })),
            notifier: Rc::new(ChangeNotifier::new()),
        };
        if let Root::Pointer(parent) = &root {
            pointer.hook(parent);
        }
        pointer.refresh();
        pointer.notifier.emit();
        Ok(pointer)
    }

    /// Reassigns the root and location of this pointer.
    ///
    /// Unhooks from a previously chained parent, hooks onto the new one if
    /// `root` is a pointer, re-resolves the cache and emits a single change
    /// notification covering both assignments.
    pub fn set_root(
        &self,
        root: impl Into<RootSpec>,
        location: impl Into<LocationSpec>,
    ) -> Result<(), PointerError> {
        let root = root.into().into_root()?;
        let location = location.into().normalize()?;

        self.unhook();
        let chained = if let Root::Pointer(parent) = &root {
            self.hook(parent);
            true
        } else {
            false
        };
        self.state.borrow_mut().root = root;
        self.assign_location(location);
        debug!(
            "pointer root reassigned (chained: {chained}, location: {:?})",
            self.state.borrow().location
        );
        self.notifier.emit();
        Ok(())
    }

    /// Moves this pointer to a new location below its current root and
    /// emits a change notification.
    pub fn set_location(&self, location: impl Into<LocationSpec>) -> Result<(), PointerError> {
        let location = location.into().normalize()?;
        self.assign_location(location);
        self.notifier.emit();
        Ok(())
    }

    /// Assigns the already-normalized location and re-resolves the cache,
    /// without notifying. `set_root` batches this with the root assignment
    /// into one emission.
    fn assign_location(&self, location: Vec<String>) {
        self.state.borrow_mut().location = location;
        self.refresh();
    }

    /// The ultimate raw container at the top of the pointer chain.
    pub fn root(&self) -> MapRef {
        let root = self.state.borrow().root.clone();
        match root {
            Root::Map(map) => map,
            Root::Pointer(parent) => parent.root(),
        }
    }

    /// The normalized location of this pointer below its root.
    pub fn location(&self) -> Vec<String> {
        self.state.borrow().location.clone()
    }

    /// Whether this pointer's root is another pointer.
    pub fn is_chained(&self) -> bool {
        matches!(self.state.borrow().root, Root::Pointer(_))
    }

    /// Registers a callback that is invoked whenever this pointer's root or
    /// location changes. Returns an id for [`Pointer::unobserve`].
    pub fn observe<F: Fn() + 'static>(&self, observer: F) -> u32 {
        self.notifier.subscribe(observer)
    }

    /// Removes a change observer by its id.
    pub fn unobserve(&self, id: u32) -> Result<(), ObserveError> {
        self.notifier.unsubscribe(id)
    }

    /// The container this pointer addresses, if it currently exists.
    ///
    /// Uses the cached resolution when present; a missing path or a non-map
    /// value at the location yields `None` and is never cached.
    pub fn location_object(&self) -> Option<MapRef> {
        self.resolve()
    }

    /// The container this pointer addresses, creating every missing level
    /// along the way.
    pub fn ensure_location_object(&self) -> MapRef {
        self.resolve_forced()
    }

    fn resolve(&self) -> Option<MapRef> {
        if let Some(cached) = self.state.borrow().resolved.clone() {
            return Some(cached);
        }
        let (root, location) = {
            let state = self.state.borrow();
            (state.root.clone(), state.location.clone())
        };
        let base = match root {
            Root::Map(map) => map,
            Root::Pointer(parent) => parent.resolve()?,
        };
        match retrieve_child(&base, &location, false)? {
            Value::Map(map) => {
                self.state.borrow_mut().resolved = Some(Rc::clone(&map));
                Some(map)
            }
            _ => None,
        }
    }

    fn resolve_forced(&self) -> MapRef {
        if let Some(cached) = self.state.borrow().resolved.clone() {
            return cached;
        }
        let (root, location) = {
            let state = self.state.borrow();
            (state.root.clone(), state.location.clone())
        };
        let base = match root {
            Root::Map(map) => map,
            Root::Pointer(parent) => parent.resolve_forced(),
        };
        match retrieve_child(&base, &location, true) {
            Some(Value::Map(map)) => {
                self.state.borrow_mut().resolved = Some(Rc::clone(&map));
                map
            }
            _ => unreachable!("a forced walk always ends on a map"),
        }
    }

    /// Invalidates the cached resolution and eagerly re-resolves without
    /// creating anything.
    fn refresh(&self) {
        self.state.borrow_mut().resolved = None;
        let _ = self.resolve();
    }

    /// Subscribes to the chained parent: any change of the parent
    /// invalidates and re-resolves this pointer, then re-emits so that
    /// pointers chained onto *this* one cascade as well.
    fn hook(&self, parent: &Pointer) {
        let state = Rc::downgrade(&self.state);
        let notifier = Rc::clone(&self.notifier);
        let id = parent.notifier.subscribe(move || {
            if let Some(state) = state.upgrade() {
                let child = Pointer::from_parts(state, Rc::clone(&notifier));
                child.refresh();
                child.notifier.emit();
            }
        });
        trace!("pointer hooked onto chained parent (subscription {id})");
        self.state.borrow_mut().parent_subscription = Some(id);
    }

    /// Removes the subscription held on the current root, if it is a
    /// chained parent.
    fn unhook(&self) {
        let (parent, subscription) = {
            let mut state = self.state.borrow_mut();
            let subscription = state.parent_subscription.take();
            let parent = match &state.root {
                Root::Pointer(parent) => Some(parent.clone()),
                Root::Map(_) => None,
            };
            (parent, subscription)
        };
        if let (Some(parent), Some(id)) = (parent, subscription) {
            trace!("pointer unhooked from chained parent (subscription {id})");
            let _ = parent.notifier.unsubscribe(id);
        }
    }

    fn from_parts(state: Rc<RefCell<PointerState>>, notifier: Rc<ChangeNotifier>) -> Self {
        Pointer { state, notifier }
    }

    /// Creates the nested containers up to `location` below this pointer's
    /// own location and returns the container found there. Existing non-map
    /// values along the way are replaced by fresh containers.
    pub fn create(&self, location: impl Into<LocationSpec>) -> Result<MapRef, PointerError> {
        let location = location.into().normalize()?;
        Ok(self.create_at(&location))
    }

    fn create_at(&self, keys: &[String]) -> MapRef {
        let base = self.resolve_forced();
        match retrieve_child(&base, keys, true) {
            Some(Value::Map(map)) => map,
            _ => unreachable!("a forced walk always ends on a map"),
        }
    }

    /// Sets a value. The final element of `location` is the key to assign;
    /// the prefix is created as needed.
    pub fn set(
        &self,
        location: impl Into<LocationSpec>,
        value: impl Into<Value>,
    ) -> Result<(), PointerError> {
        let mut keys = location.into().normalize()?;
        let Some(key) = keys.pop() else {
            return Err(PointerError::EmptyLocation);
        };
        let target = self.create_at(&keys);
        target.borrow_mut().set(key, value.into());
        Ok(())
    }

    /// Reads the value at `location`, or `None` if any level of the path is
    /// absent. An empty location returns the resolved container itself.
    pub fn get(&self, location: impl Into<LocationSpec>) -> Result<Option<Value>, PointerError> {
        let keys = location.into().normalize()?;
        Ok(self.value_at(keys))
    }

    /// Like [`Pointer::get`], but falls back to `default` when no value
    /// exists at `location`.
    pub fn get_or(
        &self,
        location: impl Into<LocationSpec>,
        default: impl Into<Value>,
    ) -> Result<Value, PointerError> {
        Ok(self.get(location)?.unwrap_or_else(|| default.into()))
    }

    fn value_at(&self, mut keys: Vec<String>) -> Option<Value> {
        let base = self.resolve()?;
        let Some(key) = keys.pop() else {
            return Some(Value::Map(base));
        };
        let parent = if keys.is_empty() {
            base
        } else {
            match retrieve_child(&base, &keys, false)? {
                Value::Map(map) => map,
                _ => return None,
            }
        };
        let guard = parent.borrow();
        guard.get(&key).cloned()
    }

    /// Deletes the value at `location`.
    ///
    /// The key is only deleted while it holds a *truthy* value — keys
    /// holding `false`, `0` or empty text survive. This is a truthiness
    /// check, not a presence check, kept for compatibility with the
    /// behavior this crate reimplements. When a deletion leaves an ancestor
    /// container empty, the ancestor is deleted as well, cascading upward
    /// until a non-empty container or the pointer's own location is
    /// reached.
    pub fn clear(&self, location: impl Into<LocationSpec>) -> Result<(), PointerError> {
        let keys = location.into().normalize()?;
        self.clear_at(keys)
    }

    fn clear_at(&self, mut keys: Vec<String>) -> Result<(), PointerError> {
        let Some(key) = keys.pop() else {
            return Err(PointerError::EmptyLocation);
        };
        if keys.is_empty() {
            if let Some(map) = self.resolve() {
                let delete = map.borrow().get(&key).is_some_and(Value::is_truthy);
                if delete {
                    map.borrow_mut().remove(&key);
                }
            }
            return Ok(());
        }
        let Some(Value::Map(parent)) = self.value_at(keys.clone()) else {
            return Ok(());
        };
        let delete = parent.borrow().get(&key).is_some_and(Value::is_truthy);
        if delete {
            parent.borrow_mut().remove(&key);
            if parent.borrow().is_empty() {
                return self.clear_at(keys);
            }
        }
        Ok(())
    }
}

impl Debug for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Pointer")
            .field("location", &state.location)
            .field("chained", &matches!(state.root, Root::Pointer(_)))
            .field("resolved", &state.resolved.is_some())
            .field("observers", &self.notifier.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn set_root_replaces_root_and_location() {
        let pointer = Pointer::new(Map::new().into_ref(), ()).unwrap();
        let replacement = Map::new().into_ref();
        pointer.set_root(&replacement, ()).unwrap();

        assert!(Rc::ptr_eq(&pointer.root(), &replacement));
        assert!(pointer.location().is_empty());
        // empty location resolves to the root container itself
        assert!(Rc::ptr_eq(&pointer.location_object().unwrap(), &replacement));
    }

    #[test]
    fn missing_location_does_not_resolve() {
        let container = Map::new().into_ref();
        let pointer = Pointer::new(&container, "test").unwrap();
        assert_eq!(pointer.location(), vec!["test"]);
        assert!(pointer.location_object().is_none());

        let inner = Map::new().into_ref();
        let filled = Map::new().into_ref();
        filled.borrow_mut().set("test", Rc::clone(&inner));
        pointer.set_root(&filled, "test").unwrap();
        assert!(Rc::ptr_eq(&pointer.location_object().unwrap(), &inner));
    }

    #[test]
    fn root_resolves_recursively_through_the_chain() {
        let container = Map::new().into_ref();
        let parent = Pointer::new(&container, ()).unwrap();
        let child = Pointer::new(&parent, ()).unwrap();
        assert!(child.is_chained());
        assert!(Rc::ptr_eq(&child.root(), &container));
    }

    #[test]
    fn scalar_roots_are_rejected() {
        assert_eq!(
            Pointer::new(Value::from(5), ()).unwrap_err(),
            PointerError::InvalidRoot
        );
        let pointer = Pointer::new(Map::new().into_ref(), ()).unwrap();
        assert_eq!(
            pointer.set_root(Value::from("text"), ()).unwrap_err(),
            PointerError::InvalidRoot
        );
        // a map value is a valid root
        assert!(Pointer::new(Value::from(Map::new()), ()).is_ok());
    }

    #[test]
    fn bad_location_specifiers_are_rejected() {
        let container = Map::new().into_ref();
        assert_eq!(
            Pointer::new(&container, Value::from(5)).unwrap_err(),
            PointerError::InvalidLocation
        );
        let pointer = Pointer::new(&container, ()).unwrap();
        assert_eq!(
            pointer.set_location(Value::from(true)).unwrap_err(),
            PointerError::InvalidLocation
        );
    }

    #[test]
    fn create_builds_the_nested_containers() {
        let container = Map::new().into_ref();
        let pointer = Pointer::new(&container, "test").unwrap();
        let created = pointer.create("location").unwrap();
        assert!(created.borrow().is_empty());

        let expected = Map::from(vec![(
            "test",
            Value::from(Map::from(vec![("location", Value::from(Map::new()))])),
        )]);
        assert_eq!(*container.borrow(), expected);
    }

    #[test]
    fn set_and_clear_need_depth() {
        let pointer = Pointer::new(Map::new().into_ref(), ()).unwrap();
        assert_eq!(
            pointer.set((), "value").unwrap_err(),
            PointerError::EmptyLocation
        );
        assert_eq!(pointer.clear("").unwrap_err(), PointerError::EmptyLocation);
    }

    #[test]
    fn observers_fire_on_location_change() {
        let pointer = Pointer::new(Map::new().into_ref(), ()).unwrap();
        let changes = Rc::new(Cell::new(0u32));

        let changes_clone = Rc::clone(&changes);
        let id = pointer.observe(move || changes_clone.set(changes_clone.get() + 1));

        pointer.set_location("a").unwrap();
        assert_eq!(changes.get(), 1);
        // root + location change in one batched emission
        pointer.set_root(Map::new().into_ref(), "b").unwrap();
        assert_eq!(changes.get(), 2);

        pointer.unobserve(id).unwrap();
        pointer.set_location("c").unwrap();
        assert_eq!(changes.get(), 2);
    }

    #[test]
    fn chained_pointer_follows_parent_location_changes() {
        let container = Map::new().into_ref();
        let parent = Pointer::new(&container, "a").unwrap();
        let child = Pointer::new(&parent, "b").unwrap();

        child.set("value", 1).unwrap();
        assert_eq!(
            parent.get(["b", "value"]).unwrap(),
            Some(Value::from(1))
        );

        parent.set_location("other").unwrap();
        child.set("value", 2).unwrap();

        let expected = Map::from(vec![
            (
                "a",
                Value::from(Map::from(vec![(
                    "b",
                    Value::from(Map::from(vec![("value", Value::from(1))])),
                )])),
            ),
            (
                "other",
                Value::from(Map::from(vec![(
                    "b",
                    Value::from(Map::from(vec![("value", Value::from(2))])),
                )])),
            ),
        ]);
        assert_eq!(*container.borrow(), expected);
    }

    #[test]
    fn chain_invalidation_is_transitive() {
        let first = Map::new().into_ref();
        let top = Pointer::new(&first, ()).unwrap();
        let middle = Pointer::new(&top, "mid").unwrap();
        let bottom = Pointer::new(&middle, "leaf").unwrap();

        let second = Map::new().into_ref();
        top.set_root(&second, ()).unwrap();
        bottom.set("key", "value").unwrap();

        assert!(first.borrow().is_empty());
        let expected = Map::from(vec![(
            "mid",
            Value::from(Map::from(vec![(
                "leaf",
                Value::from(Map::from(vec![("key", Value::from("value"))])),
            )])),
        )]);
        assert_eq!(*second.borrow(), expected);
    }
}
