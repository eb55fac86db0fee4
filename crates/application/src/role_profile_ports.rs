mod audit;
mod repository;
mod transaction;

pub use audit::RoleAuditEvent;
pub use repository::RoleProfileRepository;
pub use transaction::RoleProfileTransaction;
