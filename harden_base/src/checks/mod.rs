//! Check module contract, registry and profiles

pub mod errors;
pub mod profile;
pub mod registry;
pub mod traits;

pub use errors::{ModuleError, RegistryError};
pub use profile::{Profile, ProfileCatalog};
pub use registry::ModuleRegistry;
pub use traits::CheckModule;
