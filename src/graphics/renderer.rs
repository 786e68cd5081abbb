use std::convert::TryFrom;

use gl::types::*;

use super::api::{GlApi, NativeGl};
use super::buffer::IndexBuffer;
use super::context::GlContext;
use super::error::{GlError, GlResult};
use super::shader::Program;
use super::vertex_array::VertexArray;

/// Issues the per-frame calls: clearing, and drawing a vertex array with a program
pub struct Renderer<'ctx, A: GlApi = NativeGl> {
    ctx: &'ctx GlContext<A>,
}

impl<'ctx, A: GlApi> Renderer<'ctx, A> {
    pub fn new(ctx: &'ctx GlContext<A>) -> Self {
        Self { ctx }
    }

    pub fn set_clear_color(&self, [r, g, b, a]: [f32; 4]) {
        let api = self.ctx.api();
        gl_call!(api, api.clear_color(r, g, b, a));
    }

    pub fn clear(&self) {
        let api = self.ctx.api();
        gl_call!(api, api.clear(gl::COLOR_BUFFER_BIT));
    }

    pub fn viewport(&self, x: GLint, y: GLint, width: GLsizei, height: GLsizei) {
        let api = self.ctx.api();
        gl_call!(api, api.viewport(x, y, width, height));
    }

    /// Draws every index in `indices` as triangles, then unbinds everything it bound
    pub fn draw(
        &self,
        vertices: &VertexArray<'ctx, A>,
        indices: &IndexBuffer<'ctx, A>,
        program: &Program<'ctx, A>,
    ) -> GlResult<()> {
        let count = draw_count(indices.count())?;

        program.bind();
        vertices.bind();
        indices.bind();

        let api = self.ctx.api();
        gl_call!(api, api.draw_elements(gl::TRIANGLES, count, gl::UNSIGNED_INT, 0));

        // The vertex array goes first, or it'd record the index buffer being unbound
        vertices.unbind();
        indices.unbind();
        program.unbind();
        Ok(())
    }

    /// Draws the first `count` vertices as triangles, with no index buffer
    pub fn draw_arrays(&self, vertices: &VertexArray<'ctx, A>, program: &Program<'ctx, A>, count: usize) -> GlResult<()> {
        let count = draw_count(count)?;

        program.bind();
        vertices.bind();

        let api = self.ctx.api();
        gl_call!(api, api.draw_arrays(gl::TRIANGLES, 0, count));

        vertices.unbind();
        program.unbind();
        Ok(())
    }
}

fn draw_count(count: usize) -> GlResult<GLsizei> {
    GLsizei::try_from(count).map_err(|_| GlError::DrawCount(count))
}
