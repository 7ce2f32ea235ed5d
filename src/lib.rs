//! Typed pointers into nested, shared, mutable map containers.
//!
//! A [`Pointer`] names a location inside a container tree by an ordered
//! sequence of keys and offers read, write, lazily-create and delete
//! operations at that location. A pointer's root can itself be another
//! pointer; such a chained pointer re-resolves automatically whenever its
//! parent changes.
//!
//! ```
//! use object_pointer::{Map, Pointer, Value};
//!
//! let container = Map::new().into_ref();
//! let pointer = Pointer::new(&container, "config")?;
//! pointer.set(["server", "port"], 8080)?;
//! assert_eq!(pointer.get(["server", "port"])?, Some(Value::from(8080)));
//! # Ok::<(), object_pointer::PointerError>(())
//! ```

pub mod error;
#[cfg(feature = "flexi_logger")]
pub mod logger;
pub mod notify;
pub mod path;
pub mod pointer;
pub mod resolve;
pub mod values;

pub use error::PointerError;
pub use notify::{ChangeNotifier, ObserveError};
pub use path::LocationSpec;
pub use pointer::{Pointer, RootSpec};
pub use values::map::{Map, MapRef};
pub use values::value::Value;
