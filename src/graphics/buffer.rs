//! GPU buffers.
//!
//! A [vertex buffer object (VBO)][vbo] holds vertex data that's sent to the graphics card. Vertices
//! don't have to be spatial; they can carry color, normals, or anything else the shaders read. An
//! index buffer (GL calls it an *element* buffer) is a list of vertex ID's, so shared vertices only
//! have to be sent once. Drawing a rectangle takes four vertices and six indices instead of six
//! vertices.
//!
//! Each wrapper owns exactly one GPU allocation. It's made in `new` and freed when the wrapper is
//! dropped, and since the wrapper can't be copied or cloned there's no way to free it twice.
//!
//! [vbo]: https://en.wikipedia.org/wiki/Vertex_buffer_object

use std::mem::size_of;
use std::ops::Deref;

use gl::types::*;

use super::api::{GlApi, NativeGl};
use super::call::{clear_errors, drain_errors, CallSite};
use super::context::{BufferKind, GlContext};
use super::error::{GlError, GlResult};

/// One GPU buffer allocation, for either kind of data
pub struct GpuBuffer<'ctx, A: GlApi = NativeGl> {
    ctx: &'ctx GlContext<A>,
    id: GLuint,
    kind: BufferKind,
    len: usize,
}

impl<'ctx, A: GlApi> GpuBuffer<'ctx, A> {
    /// Allocates a buffer and uploads `data` to it once, hinting to the driver that it won't
    /// change. Leaves the new buffer bound.
    pub fn create<T: Copy>(ctx: &'ctx GlContext<A>, kind: BufferKind, data: &[T]) -> GlResult<Self> {
        let api = ctx.api();

        let id = gl_call!(api, api.gen_buffer());
        if id == 0 {
            return Err(GlError::Allocation(kind));
        }

        // From here on the allocation is owned, so any early return frees it
        let buffer = Self { ctx, id, kind, len: data.len() };
        buffer.bind();

        // Running out of memory here is the caller's problem to handle, not an abort
        let site = CallSite { call: "glBufferData", file: file!(), line: line!() };
        clear_errors(api);
        api.buffer_data(kind.target(), data, gl::STATIC_DRAW);
        if let Some(failure) = drain_errors(api, &site).first() {
            return Err(GlError::Upload { kind, code: failure.code });
        }

        debug!("Created {} buffer {} ({} elements)", kind, id, data.len());

        Ok(buffer)
    }

    pub fn id(&self) -> GLuint { self.id }

    pub fn kind(&self) -> BufferKind { self.kind }

    /// How many elements were uploaded
    pub fn len(&self) -> usize { self.len }

    pub fn is_empty(&self) -> bool { self.len == 0 }

    /// Makes this the active buffer for its binding point
    pub fn bind(&self) {
        self.ctx.bind_buffer(self.kind, self.id);
    }

    /// Clears this buffer's binding point, whichever buffer is bound there
    pub fn unbind(&self) {
        self.ctx.unbind_buffer(self.kind);
    }

    pub fn is_bound(&self) -> bool {
        self.ctx.bound_buffer(self.kind) == Some(self.id)
    }
}

impl<'ctx, A: GlApi> Drop for GpuBuffer<'ctx, A> {
    fn drop(&mut self) {
        // The driver would unbind it anyway, but then our record of the binding would go stale
        if self.is_bound() {
            self.unbind();
        }

        let api = self.ctx.api();
        gl_call!(api, api.delete_buffer(self.id));
        trace!("Deleted {} buffer {}", self.kind, self.id);
    }
}

/// A buffer of `f32` vertex data
pub struct VertexBuffer<'ctx, A: GlApi = NativeGl>(GpuBuffer<'ctx, A>);

impl<'ctx, A: GlApi> VertexBuffer<'ctx, A> {
    pub fn new(ctx: &'ctx GlContext<A>, data: &[f32]) -> GlResult<Self> {
        GpuBuffer::create(ctx, BufferKind::Vertex, data).map(Self)
    }

    /// The size of the uploaded data in bytes
    pub fn size(&self) -> usize {
        self.0.len() * size_of::<f32>()
    }
}

impl<'ctx, A: GlApi> Deref for VertexBuffer<'ctx, A> {
    type Target = GpuBuffer<'ctx, A>;

    fn deref(&self) -> &Self::Target { &self.0 }
}

/// A buffer of `u32` indices into a vertex buffer
pub struct IndexBuffer<'ctx, A: GlApi = NativeGl>(GpuBuffer<'ctx, A>);

impl<'ctx, A: GlApi> IndexBuffer<'ctx, A> {
    pub fn new(ctx: &'ctx GlContext<A>, indices: &[u32]) -> GlResult<Self> {
        GpuBuffer::create(ctx, BufferKind::Index, indices).map(Self)
    }

    /// How many indices there are, which is also how many vertices a draw from this buffer emits
    pub fn count(&self) -> usize {
        self.0.len()
    }
}

impl<'ctx, A: GlApi> Deref for IndexBuffer<'ctx, A> {
    type Target = GpuBuffer<'ctx, A>;

    fn deref(&self) -> &Self::Target { &self.0 }
}
