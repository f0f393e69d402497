//! Utility modules for the template expander.

pub mod assets;
pub mod category;
pub mod css;
pub mod exec;
pub mod hash;
pub mod minify;
