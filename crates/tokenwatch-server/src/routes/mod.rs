pub mod actions;
pub mod inventory;
