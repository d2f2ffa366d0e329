#![doc = "The `timetag` library crate."]
#![doc = ""]
#![doc = "A small time-tracking backend: user registration and JWT login, plus"]
#![doc = "per-user tasks (time-bounded, taggable) and tags persisted in Postgres."]
#![doc = "The binary (`main.rs`) wires these modules into an actix-web server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
