mod common;
mod renewal_test;
