//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Registration, login, token verification and account self-service live here.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::AuthService;
