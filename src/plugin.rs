//! Compile time registration of extension points.
//!
//! A [`Plugin`] creates an object implementing an extension point, such as a [`Convention`](crate::convention::Convention).
//! Plugins are registered at compile time using the [inventory] crate and collected on first use.

/// A plugin.
pub struct Plugin<TPlugin> {
    /// the identifier of the plugin.
    identifier: &'static str,
    /// Create an implementation of this plugin.
    create_fn: fn() -> TPlugin,
}

impl<TPlugin> Plugin<TPlugin> {
    /// Create a new plugin for registration.
    pub const fn new(identifier: &'static str, create_fn: fn() -> TPlugin) -> Self {
        Self {
            identifier,
            create_fn,
        }
    }

    /// Create a `TPlugin` plugin.
    #[must_use]
    pub fn create(&self) -> TPlugin {
        (self.create_fn)()
    }

    /// Returns the identifier of the plugin.
    #[must_use]
    pub const fn identifier(&self) -> &'static str {
        self.identifier
    }
}
