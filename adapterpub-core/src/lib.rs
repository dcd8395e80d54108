//! Core library for publishing changed adapters.

pub mod change;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod publisher;
pub mod registry;
pub mod reporter;
pub mod store;
pub mod target;
pub mod toolchain;

pub use change::{ChangeDetector, ChangeSet, CommitRange};
pub use config::{Layout, PublishConfig, PublishMode, Settings, ToolchainKind};
pub use descriptor::AdapterDescriptor;
pub use error::{Error, Result};
pub use publisher::{PublishOutcome, PublishedAdapter, Publisher};
pub use registry::{HttpRegistry, RegistryPayload, RegistrySink};
pub use reporter::{PublishReporter, SilentReporter};
pub use store::{FilesystemStore, ObjectStore, S3Store};
pub use target::PublishTarget;
pub use toolchain::{BuildStatus, Toolchain};
