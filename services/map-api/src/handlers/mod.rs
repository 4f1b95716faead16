//! HTTP request handlers.

pub mod common;
pub mod health;
pub mod modules;
pub mod pages;
