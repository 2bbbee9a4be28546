//! Service layer providing the business operations on top of models.
//! - Separates business logic from data access.
//! - Reuses validation and entity definitions in `models` crate.
//! - Every operation takes the calling [`authz::Actor`] and stays inside its tenant.

pub mod errors;
pub mod authz;
pub mod auth;
pub mod pagination;
pub mod lookup;
pub mod accounts_service;
pub mod catalog_service;
pub mod inventory_service;
pub mod order_service;
pub mod pet_service;
pub mod feedback_service;
pub mod booking;
#[cfg(test)]
pub mod test_support;
