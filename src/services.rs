pub mod auth;
pub mod employee_service;
