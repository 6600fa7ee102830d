//! Translate the untranslated and fuzzy strings of a gettext catalog with a
//! large language model, and write the results to CSV for proofreading.

pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod parsers;
pub mod services;
