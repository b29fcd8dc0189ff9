//! `ncgrid` global configuration options.

use std::sync::OnceLock;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Global configuration options for the ncgrid crate.
///
/// Retrieve the global [`Config`] with [`global_config`] and modify it with [`global_config_mut`].
///
/// # Convention Configuration Options
///
/// ## Projection Name Attributes
///  > default: [`ProjectionNameAttributes::EndScan`]
///
/// Controls how [`Convention::projection`](crate::convention::Convention::projection) handles attributes
/// with a name ending in `_name` (for example `grid_mapping_name` or `horizontal_datum_name`).
/// See [`ProjectionNameAttributes`].
///
/// # Reader Configuration Options
///
/// ## Transfer Buffer Size
///  > default: `8192`
///
/// The size in bytes of the buffer of a [`ChannelDataInput`](crate::io::ChannelDataInput) created without an explicit capacity.
#[derive(Debug)]
pub struct Config {
    projection_name_attributes: ProjectionNameAttributes,
    transfer_buffer_size: usize,
}

/// The handling of `*_name` attributes while collecting map projection parameters.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ProjectionNameAttributes {
    /// The first `*_name` attribute with a text value ends the attribute scan and is not stored.
    ///
    /// Since `grid_mapping_name` itself ends with `_name`, the scan ends at that attribute:
    /// only numeric parameters declared before it are collected.
    #[default]
    EndScan,
    /// `*_name` attributes other than `grid_mapping_name` are stored as text and the scan continues.
    Store,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            projection_name_attributes: ProjectionNameAttributes::default(),
            transfer_buffer_size: 8192,
        }
    }
}

impl Config {
    /// Get the [projection name attributes](#projection-name-attributes) configuration.
    #[must_use]
    pub fn projection_name_attributes(&self) -> ProjectionNameAttributes {
        self.projection_name_attributes
    }

    /// Set the [projection name attributes](#projection-name-attributes) configuration.
    pub fn set_projection_name_attributes(&mut self, handling: ProjectionNameAttributes) {
        self.projection_name_attributes = handling;
    }

    /// Get the [transfer buffer size](#transfer-buffer-size) configuration.
    #[must_use]
    pub fn transfer_buffer_size(&self) -> usize {
        self.transfer_buffer_size
    }

    /// Set the [transfer buffer size](#transfer-buffer-size) configuration.
    pub fn set_transfer_buffer_size(&mut self, transfer_buffer_size: usize) {
        self.transfer_buffer_size = transfer_buffer_size;
    }
}

static CONFIG: OnceLock<RwLock<Config>> = OnceLock::new();

/// Returns a reference to the global ncgrid configuration.
///
/// Deadlocks if the global config is already held mutably by the current thread.
pub fn global_config() -> RwLockReadGuard<'static, Config> {
    CONFIG.get_or_init(|| RwLock::new(Config::default())).read()
}

/// Returns a mutable reference to the global ncgrid configuration.
///
/// Deadlocks if the global config is already held by the current thread.
pub fn global_config_mut() -> RwLockWriteGuard<'static, Config> {
    CONFIG.get_or_init(|| RwLock::new(Config::default())).write()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_transfer_buffer_size() {
        assert_eq!(Config::default().transfer_buffer_size(), 8192);
        let mut config = Config::default();
        config.set_transfer_buffer_size(16);
        assert_eq!(config.transfer_buffer_size(), 16);
    }

    #[test]
    fn config_projection_name_attributes() {
        let mut config = Config::default();
        assert_eq!(
            config.projection_name_attributes(),
            ProjectionNameAttributes::EndScan
        );
        config.set_projection_name_attributes(ProjectionNameAttributes::Store);
        assert_eq!(
            config.projection_name_attributes(),
            ProjectionNameAttributes::Store
        );
        assert_eq!(
            global_config().projection_name_attributes(),
            ProjectionNameAttributes::EndScan
        );
    }
}
