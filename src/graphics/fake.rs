//! A recording stand-in for the GL driver, so the wrappers can be tested without a window.

use std::cell::{Ref, RefCell, RefMut};
use std::collections::{HashMap, HashSet, VecDeque};
use std::ffi::CStr;
use std::mem::size_of_val;

use gl::types::*;

use super::api::GlApi;
use super::call::ErrorSource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeShader {
    pub kind: GLenum,
    pub source: String,
    pub compiled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttribPointer {
    pub index: GLuint,
    pub size: GLint,
    pub kind: GLenum,
    pub normalized: bool,
    pub stride: GLsizei,
    pub offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Draw {
    Arrays { mode: GLenum, first: GLint, count: GLsizei },
    Elements { mode: GLenum, count: GLsizei, kind: GLenum },
}

#[derive(Debug, Default)]
pub struct FakeState {
    next_id: GLuint,

    pub errors: VecDeque<GLenum>,

    pub live_buffers: HashSet<GLuint>,
    pub deleted_buffers: Vec<GLuint>,
    pub bindings: HashMap<GLenum, GLuint>,
    /// (target, bytes, usage) for every upload
    pub uploads: Vec<(GLenum, usize, GLenum)>,
    pub refuse_allocation: bool,
    pub bind_error: Option<GLenum>,
    pub upload_error: Option<GLenum>,

    pub vertex_arrays: HashSet<GLuint>,
    pub deleted_vertex_arrays: Vec<GLuint>,
    pub bound_vertex_array: GLuint,
    pub enabled_attributes: Vec<GLuint>,
    pub attrib_pointers: Vec<AttribPointer>,

    pub shaders: HashMap<GLuint, FakeShader>,
    pub deleted_shaders: Vec<GLuint>,
    pub compile_log: Option<String>,

    pub programs: HashSet<GLuint>,
    pub attached: HashSet<(GLuint, GLuint)>,
    pub current_program: GLuint,
    pub link_log: Option<String>,
    pub validation_fails: bool,
    pub uniforms: Vec<String>,
    pub uniform_values: Vec<(GLint, [f32; 4])>,

    pub clear_color: [f32; 4],
    pub clears: Vec<GLbitfield>,
    pub viewport: (GLint, GLint, GLsizei, GLsizei),
    pub draws: Vec<Draw>,
}

impl FakeState {
    fn next_id(&mut self) -> GLuint {
        self.next_id += 1;
        self.next_id
    }

    /// What's bound to `target`, with 0 meaning nothing
    pub fn bound(&self, target: GLenum) -> GLuint {
        self.bindings.get(&target).copied().unwrap_or(0)
    }
}

#[derive(Debug, Default)]
pub struct FakeGl {
    state: RefCell<FakeState>,
}

impl FakeGl {
    /// A fake whose programs all expose the given uniforms, at locations in list order
    pub fn with_uniforms(names: &[&str]) -> Self {
        let fake = Self::default();
        fake.state_mut().uniforms = names.iter().map(|n| n.to_string()).collect();
        fake
    }

    pub fn state(&self) -> Ref<'_, FakeState> {
        self.state.borrow()
    }

    pub fn state_mut(&self) -> RefMut<'_, FakeState> {
        self.state.borrow_mut()
    }

    /// Queues an error flag, as if the last call had raised it
    pub fn raise(&self, code: GLenum) {
        self.state_mut().errors.push_back(code);
    }
}

impl ErrorSource for FakeGl {
    fn next_error(&self) -> GLenum {
        self.state_mut().errors.pop_front().unwrap_or(gl::NO_ERROR)
    }
}

impl GlApi for FakeGl {
    fn gen_buffer(&self) -> GLuint {
        let mut state = self.state_mut();
        if state.refuse_allocation {
            return 0;
        }
        let id = state.next_id();
        state.live_buffers.insert(id);
        id
    }

    fn bind_buffer(&self, target: GLenum, id: GLuint) {
        let mut state = self.state_mut();
        if let Some(code) = state.bind_error {
            state.errors.push_back(code);
            return;
        }
        state.bindings.insert(target, id);
    }

    fn buffer_data<T: Copy>(&self, target: GLenum, data: &[T], usage: GLenum) {
        let mut state = self.state_mut();
        if let Some(code) = state.upload_error {
            state.errors.push_back(code);
            return;
        }
        state.uploads.push((target, size_of_val(data), usage));
    }

    fn delete_buffer(&self, id: GLuint) {
        let mut state = self.state_mut();
        state.live_buffers.remove(&id);
        state.deleted_buffers.push(id);
        // Deleting a bound buffer unbinds it, as the real thing does
        for bound in state.bindings.values_mut() {
            if *bound == id {
                *bound = 0;
            }
        }
    }

    fn gen_vertex_array(&self) -> GLuint {
        let mut state = self.state_mut();
        let id = state.next_id();
        state.vertex_arrays.insert(id);
        id
    }

    fn bind_vertex_array(&self, id: GLuint) {
        self.state_mut().bound_vertex_array = id;
    }

    fn delete_vertex_array(&self, id: GLuint) {
        let mut state = self.state_mut();
        state.vertex_arrays.remove(&id);
        state.deleted_vertex_arrays.push(id);
    }

    fn enable_vertex_attrib_array(&self, index: GLuint) {
        self.state_mut().enabled_attributes.push(index);
    }

    fn vertex_attrib_pointer(
        &self,
        index: GLuint,
        size: GLint,
        kind: GLenum,
        normalized: bool,
        stride: GLsizei,
        offset: usize,
    ) {
        self.state_mut().attrib_pointers.push(AttribPointer { index, size, kind, normalized, stride, offset });
    }

    fn create_shader(&self, kind: GLenum) -> GLuint {
        let mut state = self.state_mut();
        let id = state.next_id();
        state.shaders.insert(id, FakeShader { kind, source: String::new(), compiled: false });
        id
    }

    fn shader_source(&self, id: GLuint, source: &CStr) {
        if let Some(shader) = self.state_mut().shaders.get_mut(&id) {
            shader.source = source.to_string_lossy().into_owned();
        }
    }

    fn compile_shader(&self, id: GLuint) {
        let mut state = self.state_mut();
        let ok = state.compile_log.is_none();
        if let Some(shader) = state.shaders.get_mut(&id) {
            shader.compiled = ok;
        }
    }

    fn shader_iv(&self, id: GLuint, pname: GLenum) -> GLint {
        let state = self.state();
        match pname {
            gl::COMPILE_STATUS => state.shaders.get(&id).map_or(0, |s| s.compiled as GLint),
            gl::INFO_LOG_LENGTH => state.compile_log.as_ref().map_or(0, |log| log.len() as GLint + 1),
            _ => 0,
        }
    }

    fn shader_info_log(&self, _id: GLuint) -> String {
        self.state().compile_log.clone().unwrap_or_default()
    }

    fn delete_shader(&self, id: GLuint) {
        let mut state = self.state_mut();
        state.shaders.remove(&id);
        state.deleted_shaders.push(id);
    }

    fn create_program(&self) -> GLuint {
        let mut state = self.state_mut();
        let id = state.next_id();
        state.programs.insert(id);
        id
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        self.state_mut().attached.insert((program, shader));
    }

    fn detach_shader(&self, program: GLuint, shader: GLuint) {
        self.state_mut().attached.remove(&(program, shader));
    }

    fn link_program(&self, _program: GLuint) {}

    fn validate_program(&self, _program: GLuint) {}

    fn program_iv(&self, _program: GLuint, pname: GLenum) -> GLint {
        let state = self.state();
        match pname {
            gl::LINK_STATUS => state.link_log.is_none() as GLint,
            gl::VALIDATE_STATUS => !state.validation_fails as GLint,
            _ => 0,
        }
    }

    fn program_info_log(&self, _program: GLuint) -> String {
        self.state().link_log.clone().unwrap_or_default()
    }

    fn use_program(&self, program: GLuint) {
        self.state_mut().current_program = program;
    }

    fn delete_program(&self, program: GLuint) {
        self.state_mut().programs.remove(&program);
    }

    fn uniform_location(&self, _program: GLuint, name: &CStr) -> GLint {
        let name = name.to_string_lossy();
        self.state().uniforms.iter()
            .position(|uniform| *uniform == name)
            .map_or(-1, |location| location as GLint)
    }

    fn uniform_4f(&self, location: GLint, value: [f32; 4]) {
        self.state_mut().uniform_values.push((location, value));
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        self.state_mut().clear_color = [r, g, b, a];
    }

    fn clear(&self, mask: GLbitfield) {
        self.state_mut().clears.push(mask);
    }

    fn viewport(&self, x: GLint, y: GLint, width: GLsizei, height: GLsizei) {
        self.state_mut().viewport = (x, y, width, height);
    }

    fn draw_arrays(&self, mode: GLenum, first: GLint, count: GLsizei) {
        self.state_mut().draws.push(Draw::Arrays { mode, first, count });
    }

    fn draw_elements(&self, mode: GLenum, count: GLsizei, kind: GLenum, _offset: usize) {
        self.state_mut().draws.push(Draw::Elements { mode, count, kind });
    }

    fn get_string(&self, name: GLenum) -> Option<String> {
        match name {
            gl::VERSION => Some("3.3 (fake)".to_string()),
            _ => None,
        }
    }
}
