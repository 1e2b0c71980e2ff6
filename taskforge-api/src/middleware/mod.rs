/// Middleware modules for the API server
///
/// This module contains custom middleware:
/// - Security headers

pub mod security;
