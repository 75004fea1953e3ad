pub mod code;
pub mod health;
