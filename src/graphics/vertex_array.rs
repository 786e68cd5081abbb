//! Vertex arrays and the layouts that describe them.
//!
//! A vertex buffer is just bytes. A [`VertexBufferLayout`] says how to read them: how many
//! components each attribute has, of what type, and how far apart consecutive vertices are. Adding
//! a buffer to a [`VertexArray`] with a layout records all of that, so one bind of the vertex array
//! restores it at draw time.

use std::mem::size_of;

use gl::types::*;

use super::api::{GlApi, NativeGl};
use super::buffer::VertexBuffer;
use super::context::{BufferKind, GlContext};
use super::error::{GlError, GlResult};

/// An object that abstracts over the arguments of [gl::VertexAttribPointer][glvertexattribpointer],
/// minus the parts the layout works out for itself (index, stride and offset).
///
/// [glvertexattribpointer]: http://docs.gl/gl3/glVertexAttribPointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub count: GLint,
    pub kind: GLenum,
    pub normalized: bool,
}

impl VertexAttribute {
    pub fn size_in_bytes(&self) -> usize {
        self.count as usize * size_of_gl_type(self.kind)
    }
}

fn size_of_gl_type(kind: GLenum) -> usize {
    match kind {
        gl::FLOAT => size_of::<f32>(),
        gl::UNSIGNED_INT => size_of::<u32>(),
        gl::UNSIGNED_BYTE => size_of::<u8>(),
        _ => 0,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexBufferLayout {
    attributes: Vec<VertexAttribute>,
    stride: usize,
}

impl VertexBufferLayout {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, attribute: VertexAttribute) -> &mut Self {
        self.stride += attribute.size_in_bytes();
        self.attributes.push(attribute);
        self
    }

    pub fn push_f32(&mut self, count: GLint) -> &mut Self {
        self.push(VertexAttribute { count, kind: gl::FLOAT, normalized: false })
    }

    pub fn push_u32(&mut self, count: GLint) -> &mut Self {
        self.push(VertexAttribute { count, kind: gl::UNSIGNED_INT, normalized: false })
    }

    /// Bytes are read as normalized values, e.g. 8-bit color channels arriving as 0.0..=1.0
    pub fn push_u8(&mut self, count: GLint) -> &mut Self {
        self.push(VertexAttribute { count, kind: gl::UNSIGNED_BYTE, normalized: true })
    }

    /// The size of one whole vertex in bytes
    pub fn stride(&self) -> usize { self.stride }

    pub fn attributes(&self) -> &[VertexAttribute] { &self.attributes }

    /// Each attribute with its shader location and its byte offset into a vertex
    pub fn iter(&self) -> impl Iterator<Item = (GLuint, usize, &VertexAttribute)> {
        self.attributes.iter()
            .scan(0, |offset, attribute| {
                let start = *offset;
                *offset += attribute.size_in_bytes();
                Some((start, attribute))
            })
            .enumerate()
            .map(|(index, (offset, attribute))| (index as GLuint, offset, attribute))
    }
}

pub struct VertexArray<'ctx, A: GlApi = NativeGl> {
    ctx: &'ctx GlContext<A>,
    id: GLuint,
}

impl<'ctx, A: GlApi> VertexArray<'ctx, A> {
    pub fn new(ctx: &'ctx GlContext<A>) -> GlResult<Self> {
        let api = ctx.api();
        let id = gl_call!(api, api.gen_vertex_array());
        if id == 0 {
            return Err(GlError::VertexArray);
        }

        Ok(Self { ctx, id })
    }

    pub fn id(&self) -> GLuint { self.id }

    /// Hooks `buffer` up to this vertex array, one attribute location per layout entry. Leaves
    /// both bound.
    pub fn add_buffer(&self, buffer: &VertexBuffer<'ctx, A>, layout: &VertexBufferLayout) {
        self.bind();
        buffer.bind();

        let api = self.ctx.api();
        let stride = layout.stride() as GLsizei;
        for (index, offset, attribute) in layout.iter() {
            gl_call!(api, api.enable_vertex_attrib_array(index));
            gl_call!(api, api.vertex_attrib_pointer(
                index,
                attribute.count,
                attribute.kind,
                attribute.normalized,
                stride,
                offset
            ));
        }
    }

    /// Binds this vertex array, which also brings back whatever index buffer it recorded. The
    /// context stops claiming to know the index binding until one is bound again.
    pub fn bind(&self) {
        let api = self.ctx.api();
        gl_call!(api, api.bind_vertex_array(self.id));
        self.ctx.forget_buffer(BufferKind::Index);
    }

    pub fn unbind(&self) {
        let api = self.ctx.api();
        gl_call!(api, api.bind_vertex_array(0));
        self.ctx.forget_buffer(BufferKind::Index);
    }
}

impl<'ctx, A: GlApi> Drop for VertexArray<'ctx, A> {
    fn drop(&mut self) {
        let api = self.ctx.api();
        gl_call!(api, api.delete_vertex_array(self.id));
    }
}
