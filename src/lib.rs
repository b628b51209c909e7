//! Nutrilog Library
//!
//! Calorie and macro tracking: energy targets from body metrics, food
//! lookup, serving scaling, and a dated meal diary.

pub mod build_info;
pub mod config;
pub mod db;
pub mod lookup;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod tools;
