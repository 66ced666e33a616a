pub mod health;
pub mod permissions;
