//! Compiled shaders and linked programs.
//!
//! A shader is one compiled pipeline stage. A program links a vertex and a fragment shader into the
//! pipeline a draw call runs. Both are driver objects that have to be deleted by hand in C, so
//! here they're tied to `Drop` like the buffers.

use std::ffi::CString;
use std::path::Path;

use gl::types::*;
use glscratch_shader::{ShaderSourcePair, ShaderStage};

use super::api::{GlApi, NativeGl};
use super::context::GlContext;
use super::error::{GlError, GlResult};

fn shader_kind(stage: ShaderStage) -> GLenum {
    match stage {
        ShaderStage::Vertex => gl::VERTEX_SHADER,
        ShaderStage::Fragment => gl::FRAGMENT_SHADER,
    }
}

/// Represents a compiled shader.
pub struct Shader<'ctx, A: GlApi = NativeGl> {
    ctx: &'ctx GlContext<A>,
    id: GLuint,
    stage: ShaderStage,
}

impl<'ctx, A: GlApi> Shader<'ctx, A> {
    /// Compiles `source` as the given stage. On failure the driver's compile log is logged and
    /// returned in the error.
    pub fn compile(ctx: &'ctx GlContext<A>, stage: ShaderStage, source: &str) -> GlResult<Self> {
        let source = CString::new(source).map_err(|_| GlError::Nul(stage))?;
        let api = ctx.api();

        let id = gl_call!(api, api.create_shader(shader_kind(stage)));
        if id == 0 {
            return Err(GlError::CreateShader(stage));
        }
        let shader = Self { ctx, id, stage };

        gl_call!(api, api.shader_source(id, &source));
        gl_call!(api, api.compile_shader(id));

        let success = gl_call!(api, api.shader_iv(id, gl::COMPILE_STATUS));
        if success == 0 {
            let log = gl_call!(api, api.shader_info_log(id));
            error!("Failed to compile {} shader:\n{}", stage, log);
            return Err(GlError::Compile { stage, log });
        }

        Ok(shader)
    }

    pub fn id(&self) -> GLuint { self.id }

    pub fn stage(&self) -> ShaderStage { self.stage }
}

impl<'ctx, A: GlApi> Drop for Shader<'ctx, A> {
    fn drop(&mut self) {
        let api = self.ctx.api();
        gl_call!(api, api.delete_shader(self.id));
    }
}

/// Represents the graphics pipeline.
pub struct Program<'ctx, A: GlApi = NativeGl> {
    ctx: &'ctx GlContext<A>,
    id: GLuint,
}

impl<'ctx, A: GlApi> Program<'ctx, A> {
    /// Links already-compiled shaders into a program. The shaders are detached afterwards so
    /// dropping them actually frees them.
    pub fn link(ctx: &'ctx GlContext<A>, shaders: &[Shader<'ctx, A>]) -> GlResult<Self> {
        let api = ctx.api();

        let id = gl_call!(api, api.create_program());
        if id == 0 {
            return Err(GlError::CreateProgram);
        }
        let program = Self { ctx, id };

        for shader in shaders {
            gl_call!(api, api.attach_shader(id, shader.id()));
        }

        gl_call!(api, api.link_program(id));

        let success = gl_call!(api, api.program_iv(id, gl::LINK_STATUS));
        if success == 0 {
            let log = gl_call!(api, api.program_info_log(id));
            error!("Failed to link program:\n{}", log);
            return Err(GlError::Link(log));
        }

        // Validation depends on whatever state is bound right now, so a failure here is only a hint
        gl_call!(api, api.validate_program(id));
        if gl_call!(api, api.program_iv(id, gl::VALIDATE_STATUS)) == 0 {
            warn!("Program {} did not validate:\n{}", id, gl_call!(api, api.program_info_log(id)));
        }

        for shader in shaders {
            gl_call!(api, api.detach_shader(id, shader.id()));
        }

        debug!("Linked program {} from {} shader(s)", id, shaders.len());

        Ok(program)
    }

    /// Compiles both halves of a parsed `.shader` asset and links them
    pub fn from_sources(ctx: &'ctx GlContext<A>, sources: &ShaderSourcePair) -> GlResult<Self> {
        let vertex = Shader::compile(ctx, ShaderStage::Vertex, &sources.vertex)?;
        let fragment = Shader::compile(ctx, ShaderStage::Fragment, &sources.fragment)?;

        Self::link(ctx, &[vertex, fragment])
    }

    /// Reads, splits, compiles and links the `.shader` asset at `path`
    pub fn from_file<P: AsRef<Path>>(ctx: &'ctx GlContext<A>, path: P) -> GlResult<Self> {
        let sources = glscratch_shader::parse_file(path)?;
        Self::from_sources(ctx, &sources)
    }

    pub fn id(&self) -> GLuint { self.id }

    pub fn bind(&self) {
        let api = self.ctx.api();
        gl_call!(api, api.use_program(self.id));
    }

    pub fn unbind(&self) {
        let api = self.ctx.api();
        gl_call!(api, api.use_program(0));
    }

    /// Looks up a uniform by name. The lookup isn't cached; programs here have a handful of
    /// uniforms at most.
    pub fn uniform_location(&self, name: &str) -> GlResult<GLint> {
        let unknown = || GlError::UnknownUniform(name.to_string());

        let c_name = CString::new(name).map_err(|_| unknown())?;
        let api = self.ctx.api();
        let location = gl_call!(api, api.uniform_location(self.id, &c_name));
        if location < 0 {
            return Err(unknown());
        }

        Ok(location)
    }

    /// Sets a `vec4` uniform. Binds the program to do so.
    pub fn set_uniform_4f(&self, name: &str, value: [f32; 4]) -> GlResult<()> {
        let location = self.uniform_location(name)?;
        self.bind();

        let api = self.ctx.api();
        gl_call!(api, api.uniform_4f(location, value));
        Ok(())
    }
}

impl<'ctx, A: GlApi> Drop for Program<'ctx, A> {
    fn drop(&mut self) {
        let api = self.ctx.api();
        gl_call!(api, api.delete_program(self.id));
    }
}
