//! Plaza API library.
//!
//! This crate provides the marketplace API as a library, allowing it to
//! be tested in-process and reused. The same HTTP surface runs against
//! either of two storage backends (relational SQLite via [`db`], or the
//! embedded document store via [`docstore`]); handlers only ever see
//! the trait objects in [`store`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod docstore;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
