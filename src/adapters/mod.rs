//! Infrastructure adapters. Implement outbound ports.
//!
//! HTTP backends, file transforms, terminal UI. Map errors to DomainError.

pub mod export;
pub mod files;
pub mod memory;
pub mod sheets;
pub mod supabase;
pub mod ui;
