//! A small set of safe wrappers around the OpenGL API.
//!
//! Drawing a colored rectangle takes a few dozen cryptic, unsafe function calls, and every object
//! they create has to be freed by hand. This module wraps those calls in a safe interface: GPU
//! objects are owned values that free themselves when dropped, and every call is checked for GL
//! errors on the way through (see [`call`]).
//!
//! Obviously, a knowledge of OpenGL is *necessary* to understand any of this. [Learn
//! OpenGL][learnopengl] is a classic set of tutorials on understanding and using OpenGL, and
//! [Rust and OpenGL from scratch][rs-opengl-from-scratch] is a brilliant tutorial on writing a safe
//! interface over the unsafe bindings.
//!
//! [learnopengl]: https://learnopengl.com/
//! [rs-opengl-from-scratch]: http://nercury.github.io/rust/opengl/tutorial/2018/02/09/opengl-in-rust-from-scratch-02-opengl-context.html

#[macro_use]
pub mod call;

pub mod api;
pub mod buffer;
pub mod context;
pub mod error;
pub mod renderer;
pub mod shader;
pub mod vertex_array;
pub(crate) mod utils;

#[cfg(test)]
pub(crate) mod fake;

pub use self::api::{GlApi, NativeGl};
pub use self::buffer::{GpuBuffer, IndexBuffer, VertexBuffer};
pub use self::context::{BufferKind, GlContext};
pub use self::error::{GlError, GlResult};
pub use self::renderer::Renderer;
pub use self::shader::{Program, Shader};
pub use self::vertex_array::{VertexArray, VertexAttribute, VertexBufferLayout};
