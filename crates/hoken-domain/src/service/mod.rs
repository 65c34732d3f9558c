//! Domain services

pub mod ruby;

pub use ruby::{annotate, normalize_breaks, render, RubyText, TextSegment};
