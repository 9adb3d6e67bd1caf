//! JurisAcademy Chat - Legal Education Assistant Backend
//!
//! This crate implements the chat backend for the JurisAcademy platform:
//! authenticated students exchange messages with an AI study assistant
//! specialized in Brazilian law courses.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
