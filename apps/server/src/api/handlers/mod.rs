//! HTTP handlers

pub mod auth;
pub mod catalog;
pub mod contacts;
pub mod favorites;
pub mod health;
pub mod patients;
pub mod providers;
pub mod search;
