pub mod auth;

pub mod renewal;
