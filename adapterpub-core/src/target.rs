//! Object store key naming for published adapters.

use crate::config::PublishMode;
use crate::descriptor::AdapterDescriptor;

pub const CODE_OBJECT: &str = "index.js";
pub const ICON_OBJECT: &str = "icon.png";

pub const CODE_CONTENT_TYPE: &str = "application/javascript";
pub const ICON_CONTENT_TYPE: &str = "image/png";

/// Keys one adapter publishes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishTarget {
    pub code_key: String,
    /// Only versioned publishes carry an icon.
    pub icon_key: Option<String>,
}

impl PublishTarget {
    /// `{id}/{version}/index.js` and `{id}/{version}/icon.png`.
    pub fn versioned(id: &str, version: &str) -> Self {
        Self {
            code_key: format!("{}/{}/{}", id, version, CODE_OBJECT),
            icon_key: Some(format!("{}/{}/{}", id, version, ICON_OBJECT)),
        }
    }

    /// `{id}/index.js`, overwritten on every publish.
    pub fn latest(id: &str) -> Self {
        Self {
            code_key: format!("{}/{}", id, CODE_OBJECT),
            icon_key: None,
        }
    }

    pub fn for_descriptor(descriptor: &AdapterDescriptor, mode: PublishMode) -> Self {
        match mode {
            PublishMode::Versioned => Self::versioned(&descriptor.id, &descriptor.version),
            PublishMode::Latest => Self::latest(&descriptor.id),
        }
    }

    /// Keys that must not exist before a versioned publish.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.code_key.as_str()).chain(self.icon_key.as_deref())
    }

    /// Public URL of the icon under `public_url`, if this target has one.
    pub fn icon_url(&self, public_url: &str) -> Option<String> {
        self.icon_key
            .as_ref()
            .map(|key| format!("{}/{}", public_url.trim_end_matches('/'), key))
    }
}
