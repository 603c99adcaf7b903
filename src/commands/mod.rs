pub mod add;
pub mod auth;
pub mod list;
pub mod run;
