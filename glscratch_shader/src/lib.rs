//! Shader asset handling for glscratch.
//!
//! A `.shader` asset keeps both programmable stages of a pipeline in one text file, separated by
//! `#shader vertex` and `#shader fragment` lines. This crate knows nothing about OpenGL; it only
//! turns such a file into the two source strings the graphics code compiles.

#[macro_use] extern crate log;

pub mod source;

pub use source::{parse_file, parse_reader, parse_source, ShaderSourcePair, ShaderStage, SourceError};
