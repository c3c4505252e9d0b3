//! Named constructor registry.
//!
//! Configuration names an implementation by key (usually its fully qualified
//! name). Constructors are registered at startup; resolving a key runs the
//! zero-argument constructor and hands back a fresh instance.
//!
//! ```
//! use ob_common::InstanceRegistry;
//!
//! trait Greeter {
//!     fn greet(&self) -> String;
//! }
//!
//! struct English;
//!
//! impl Greeter for English {
//!     fn greet(&self) -> String {
//!         "hello".into()
//!     }
//! }
//!
//! let registry = InstanceRegistry::<dyn Greeter>::new()
//!     .with("com.example.English", || Ok(Box::new(English)))
//!     .unwrap();
//!
//! let greeter = registry.instantiate("com.example.English").unwrap();
//! assert_eq!(greeter.greet(), "hello");
//! assert!(registry.instantiate("com.example.Missing").is_err());
//! ```

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{CommonError, CommonResult};

type Constructor<T> = Box<dyn Fn() -> Result<Box<T>, String> + Send + Sync>;

/// Registry of zero-argument constructors keyed by name.
pub struct InstanceRegistry<T: ?Sized> {
    constructors: BTreeMap<String, Constructor<T>>,
}

impl<T: ?Sized> InstanceRegistry<T> {
    pub fn new() -> Self {
        Self {
            constructors: BTreeMap::new(),
        }
    }

    /// Register a constructor. Keys must be unique.
    pub fn register<F>(&mut self, key: impl Into<String>, constructor: F) -> CommonResult<()>
    where
        F: Fn() -> Result<Box<T>, String> + Send + Sync + 'static,
    {
        let key = key.into();
        if self.constructors.contains_key(&key) {
            return Err(CommonError::Config {
                message: format!("constructor already registered: {}", key),
            });
        }
        self.constructors.insert(key, Box::new(constructor));
        Ok(())
    }

    /// Builder form of [`register`](Self::register).
    pub fn with<F>(mut self, key: impl Into<String>, constructor: F) -> CommonResult<Self>
    where
        F: Fn() -> Result<Box<T>, String> + Send + Sync + 'static,
    {
        self.register(key, constructor)?;
        Ok(self)
    }

    /// Build a new instance of the implementation registered under `key`.
    pub fn instantiate(&self, key: &str) -> CommonResult<Box<T>> {
        let Some(constructor) = self.constructors.get(key) else {
            return Err(CommonError::TypeNotFound {
                type_name: sanitize(key),
            });
        };
        constructor().map_err(|reason| CommonError::Instantiation {
            type_name: sanitize(key),
            reason,
        })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.constructors.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}

impl<T: ?Sized> Default for InstanceRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for InstanceRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceRegistry")
            .field("keys", &self.constructors.keys().collect::<Vec<_>>())
            .finish()
    }
}

// Keys come from configuration and end up in error messages.
fn sanitize(key: &str) -> String {
    key.replace(['\r', '\n'], "")
}
