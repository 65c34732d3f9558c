//! Domain layer: products, policies, claims, and ruby-text annotation

pub mod catalog;
pub mod model;
pub mod repository;
pub mod service;

pub use model::*;
pub use repository::{ClaimRepository, PolicyRepository};
pub use service::ruby::{annotate, RubyText, TextSegment};
