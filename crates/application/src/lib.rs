//! Application services and ports.

#![forbid(unsafe_code)]

mod detail_profile_provisioner;
mod role_cache_synchronizer;
mod role_profile_ports;
mod role_profile_service;
mod role_profile_store;

pub use detail_profile_provisioner::{DetailProfileProvisioner, ProvisionedDetail};
pub use role_cache_synchronizer::RoleCacheSynchronizer;
pub use role_profile_ports::{RoleAuditEvent, RoleProfileRepository, RoleProfileTransaction};
pub use role_profile_service::{RoleActivation, RoleCacheReconcileReport, RoleProfileService};
