//! glscratch: safe, scoped wrappers over raw OpenGL buffers, shaders and error checking, and the
//! demo window that drives them.

#[macro_use] extern crate clap;
#[macro_use] extern crate lazy_static;
#[macro_use] extern crate log;

#[macro_use]
pub mod graphics;
pub mod interface;
pub mod app;
