use std::cell::Cell;
use std::ffi::c_void;
use std::fmt;
use std::marker::PhantomData;

use gl::types::*;

use super::api::{GlApi, NativeGl};

/// Which binding point a buffer belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferKind {
    Vertex,
    Index,
}

impl BufferKind {
    pub fn target(self) -> GLenum {
        match self {
            BufferKind::Vertex => gl::ARRAY_BUFFER,
            BufferKind::Index => gl::ELEMENT_ARRAY_BUFFER,
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for BufferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferKind::Vertex => f.write_str("vertex"),
            BufferKind::Index => f.write_str("index"),
        }
    }
}

/// A loaded GL context, plus the binding-point state the wrappers keep track of.
///
/// There should be one of these per window, created once its GL context is current and dropped
/// before the window is. Every GPU resource borrows it, so none of them can outlive it. GL contexts
/// belong to a single thread and so does this: it is neither `Send` nor `Sync`.
pub struct GlContext<A: GlApi = NativeGl> {
    api: A,
    bound: [Cell<Option<GLuint>>; 2],
    _not_send: PhantomData<*const ()>,
}

impl GlContext<NativeGl> {
    /// Loads the GL function pointers through `loader` (usually the windowing library's
    /// `get_proc_address`). The window's context must already be current on this thread.
    pub fn load_with<F>(loader: F) -> Self
    where
        F: FnMut(&'static str) -> *const c_void,
    {
        gl::load_with(loader);
        Self::new(NativeGl)
    }
}

impl<A: GlApi> GlContext<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            bound: [Cell::new(None), Cell::new(None)],
            _not_send: PhantomData,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// The driver's version string, if it will give one
    pub fn version(&self) -> Option<String> {
        self.api.get_string(gl::VERSION)
    }

    /// The buffer currently bound for `kind`, as far as the wrappers know.
    ///
    /// The index binding belongs to whichever vertex array is bound, so switching vertex arrays
    /// resets the `Index` slot to `None` until an index buffer is bound again.
    pub fn bound_buffer(&self, kind: BufferKind) -> Option<GLuint> {
        self.bound[kind.slot()].get()
    }

    pub(crate) fn bind_buffer(&self, kind: BufferKind, id: GLuint) {
        gl_call!(&self.api, self.api.bind_buffer(kind.target(), id));
        self.bound[kind.slot()].set(Some(id));
    }

    pub(crate) fn unbind_buffer(&self, kind: BufferKind) {
        gl_call!(&self.api, self.api.bind_buffer(kind.target(), 0));
        self.bound[kind.slot()].set(None);
    }

    /// Drops the record for `kind` without touching the driver
    pub(crate) fn forget_buffer(&self, kind: BufferKind) {
        self.bound[kind.slot()].set(None);
    }
}

impl<A: GlApi> fmt::Debug for GlContext<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlContext")
            .field("vertex_buffer", &self.bound_buffer(BufferKind::Vertex))
            .field("index_buffer", &self.bound_buffer(BufferKind::Index))
            .finish()
    }
}
