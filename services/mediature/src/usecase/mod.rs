pub mod access;
pub mod agent;
pub mod invitation;
pub mod user;
