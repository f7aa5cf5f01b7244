//! Protected API route handlers.

pub mod companies;
pub mod dashboard;
pub mod departments;
pub mod documents;
pub mod grants;
pub mod health;
pub mod settings;
pub mod users;
