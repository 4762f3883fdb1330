pub mod app_config;
pub mod database;
pub mod fleet_repo;
pub mod flight_repo;
pub mod order_repo;
pub mod reference_repo;
pub mod route_repo;
pub mod user_repo;

pub use database::DbClient;

use skyport_core::DomainError;

/// Map a database failure into the domain taxonomy. Constraint violations
/// carry a SQLSTATE: 23505 is a uniqueness violation, 23503 a missing
/// foreign key. Everything else is opaque.
pub(crate) fn map_db_err(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(ref db) = err {
        match db.code().as_deref() {
            Some("23505") => {
                return DomainError::Conflict("a record with these values already exists".into())
            }
            Some("23503") => {
                return DomainError::Validation("a referenced record does not exist".into())
            }
            Some("23514") => {
                // CHECK constraint (non-negative population, positive rows etc.)
                return DomainError::Validation(format!(
                    "value rejected by constraint {}",
                    db.constraint().unwrap_or("unknown")
                ));
            }
            _ => {}
        }
    }
    DomainError::Internal(err.to_string())
}
