pub mod action;
pub mod list;
pub mod serve;
