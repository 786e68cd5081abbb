use gl::types::GLenum;
use glscratch_shader::{ShaderStage, SourceError};
use thiserror::Error;

use super::context::BufferKind;

/// Everything that can go wrong setting up GPU resources. Failed *calls* don't show up here:
/// those are caught by the call checks and abort on the spot.
#[derive(Debug, Error)]
pub enum GlError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("the driver did not allocate a {0} buffer")]
    Allocation(BufferKind),

    #[error("uploading {kind} buffer data failed with GL error {code}")]
    Upload { kind: BufferKind, code: GLenum },

    #[error("the driver did not create a vertex array")]
    VertexArray,

    #[error("the driver did not create a {0} shader")]
    CreateShader(ShaderStage),

    #[error("{0} shader source contains a nul byte")]
    Nul(ShaderStage),

    #[error("{stage} shader failed to compile:\n{log}")]
    Compile { stage: ShaderStage, log: String },

    #[error("the driver did not create a program")]
    CreateProgram,

    #[error("program failed to link:\n{0}")]
    Link(String),

    #[error("cannot draw {0} vertices in one call")]
    DrawCount(usize),

    #[error("uniform `{0}` is not active in the program")]
    UnknownUniform(String),
}

pub type GlResult<T> = Result<T, GlError>;
