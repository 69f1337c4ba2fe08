pub mod logger;

pub mod runner;
