pub mod errors;
pub mod db;
pub mod status;
pub mod permission;
pub mod tenant;
pub mod user;
pub mod user_credentials;
pub mod login_activity;
pub mod catalog;
pub mod product;
pub mod order;
pub mod pet_profile;
pub mod feedback;
pub mod appointment;
