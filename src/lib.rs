/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 17/10/26
******************************************************************************/

pub mod config;

pub mod constants;

pub mod error;

pub mod session;

pub mod transport;

pub mod utils;
