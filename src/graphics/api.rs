//! The OpenGL entry points glscratch actually uses, behind a trait.
//!
//! Everything above this module talks to [`GlApi`] instead of calling `gl::*` directly. The real
//! implementation, [`NativeGl`], is the only place with `unsafe` GL calls in the crate. Keeping the
//! seam here means the buffer, shader and call-checking logic can be exercised against a fake
//! driver in tests, without a window or a GPU.

use std::ffi::{c_void, CStr};
use std::mem::size_of_val;
use std::ptr::{null, null_mut};

use gl::types::*;

use super::call::ErrorSource;
use super::utils::{info_log_buffer, info_log_to_string};

/// A safe view of the GL functions the wrappers need. Methods take `&self` because GL keeps its
/// state on the driver side, not in the value.
pub trait GlApi: ErrorSource {
    fn gen_buffer(&self) -> GLuint;
    fn bind_buffer(&self, target: GLenum, id: GLuint);
    fn buffer_data<T: Copy>(&self, target: GLenum, data: &[T], usage: GLenum);
    fn delete_buffer(&self, id: GLuint);

    fn gen_vertex_array(&self) -> GLuint;
    fn bind_vertex_array(&self, id: GLuint);
    fn delete_vertex_array(&self, id: GLuint);
    fn enable_vertex_attrib_array(&self, index: GLuint);
    fn vertex_attrib_pointer(
        &self,
        index: GLuint,
        size: GLint,
        kind: GLenum,
        normalized: bool,
        stride: GLsizei,
        offset: usize,
    );

    fn create_shader(&self, kind: GLenum) -> GLuint;
    fn shader_source(&self, id: GLuint, source: &CStr);
    fn compile_shader(&self, id: GLuint);
    fn shader_iv(&self, id: GLuint, pname: GLenum) -> GLint;
    fn shader_info_log(&self, id: GLuint) -> String;
    fn delete_shader(&self, id: GLuint);

    fn create_program(&self) -> GLuint;
    fn attach_shader(&self, program: GLuint, shader: GLuint);
    fn detach_shader(&self, program: GLuint, shader: GLuint);
    fn link_program(&self, program: GLuint);
    fn validate_program(&self, program: GLuint);
    fn program_iv(&self, program: GLuint, pname: GLenum) -> GLint;
    fn program_info_log(&self, program: GLuint) -> String;
    fn use_program(&self, program: GLuint);
    fn delete_program(&self, program: GLuint);
    fn uniform_location(&self, program: GLuint, name: &CStr) -> GLint;
    fn uniform_4f(&self, location: GLint, value: [f32; 4]);

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32);
    fn clear(&self, mask: GLbitfield);
    fn viewport(&self, x: GLint, y: GLint, width: GLsizei, height: GLsizei);
    fn draw_arrays(&self, mode: GLenum, first: GLint, count: GLsizei);
    fn draw_elements(&self, mode: GLenum, count: GLsizei, kind: GLenum, offset: usize);

    /// `glGetString`, or `None` if the driver hands back a null pointer
    fn get_string(&self, name: GLenum) -> Option<String>;
}

/// The real driver, through the function pointers loaded by [`gl::load_with`]
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeGl;

impl ErrorSource for NativeGl {
    fn next_error(&self) -> GLenum {
        unsafe { gl::GetError() }
    }
}

impl GlApi for NativeGl {
    fn gen_buffer(&self) -> GLuint {
        let mut id = 0;
        unsafe { gl::GenBuffers(1, &mut id) };
        id
    }

    fn bind_buffer(&self, target: GLenum, id: GLuint) {
        unsafe { gl::BindBuffer(target, id) };
    }

    fn buffer_data<T: Copy>(&self, target: GLenum, data: &[T], usage: GLenum) {
        unsafe {
            gl::BufferData(
                target,
                size_of_val(data) as GLsizeiptr,
                data.as_ptr() as *const c_void,
                usage
            );
        }
    }

    fn delete_buffer(&self, id: GLuint) {
        unsafe { gl::DeleteBuffers(1, &id) };
    }

    fn gen_vertex_array(&self) -> GLuint {
        let mut id = 0;
        unsafe { gl::GenVertexArrays(1, &mut id) };
        id
    }

    fn bind_vertex_array(&self, id: GLuint) {
        unsafe { gl::BindVertexArray(id) };
    }

    fn delete_vertex_array(&self, id: GLuint) {
        unsafe { gl::DeleteVertexArrays(1, &id) };
    }

    fn enable_vertex_attrib_array(&self, index: GLuint) {
        unsafe { gl::EnableVertexAttribArray(index) };
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
        unsafe {
            gl::VertexAttribPointer(
                index,
                size,
                kind,
                if normalized { gl::TRUE } else { gl::FALSE },
                stride,
                offset as *const c_void
            );
        }
    }

    fn create_shader(&self, kind: GLenum) -> GLuint {
        unsafe { gl::CreateShader(kind) }
    }

    fn shader_source(&self, id: GLuint, source: &CStr) {
        unsafe { gl::ShaderSource(id, 1, &source.as_ptr(), null()) };
    }

    fn compile_shader(&self, id: GLuint) {
        unsafe { gl::CompileShader(id) };
    }

    fn shader_iv(&self, id: GLuint, pname: GLenum) -> GLint {
        let mut value = 0;
        unsafe { gl::GetShaderiv(id, pname, &mut value) };
        value
    }

    fn shader_info_log(&self, id: GLuint) -> String {
        let len = self.shader_iv(id, gl::INFO_LOG_LENGTH);
        let mut log = info_log_buffer(len);
        unsafe {
            gl::GetShaderInfoLog(id, len, null_mut(), log.as_mut_ptr() as *mut GLchar);
        }
        info_log_to_string(log)
    }

    fn delete_shader(&self, id: GLuint) {
        unsafe { gl::DeleteShader(id) };
    }

    fn create_program(&self) -> GLuint {
        unsafe { gl::CreateProgram() }
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        unsafe { gl::AttachShader(program, shader) };
    }

    fn detach_shader(&self, program: GLuint, shader: GLuint) {
        unsafe { gl::DetachShader(program, shader) };
    }

    fn link_program(&self, program: GLuint) {
        unsafe { gl::LinkProgram(program) };
    }

    fn validate_program(&self, program: GLuint) {
        unsafe { gl::ValidateProgram(program) };
    }

    fn program_iv(&self, program: GLuint, pname: GLenum) -> GLint {
        let mut value = 0;
        unsafe { gl::GetProgramiv(program, pname, &mut value) };
        value
    }

    fn program_info_log(&self, program: GLuint) -> String {
        let len = self.program_iv(program, gl::INFO_LOG_LENGTH);
        let mut log = info_log_buffer(len);
        unsafe {
            gl::GetProgramInfoLog(program, len, null_mut(), log.as_mut_ptr() as *mut GLchar);
        }
        info_log_to_string(log)
    }

    fn use_program(&self, program: GLuint) {
        unsafe { gl::UseProgram(program) };
    }

    fn delete_program(&self, program: GLuint) {
        unsafe { gl::DeleteProgram(program) };
    }

    fn uniform_location(&self, program: GLuint, name: &CStr) -> GLint {
        unsafe { gl::GetUniformLocation(program, name.as_ptr()) }
    }

    fn uniform_4f(&self, location: GLint, [r, g, b, a]: [f32; 4]) {
        unsafe { gl::Uniform4f(location, r, g, b, a) };
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        unsafe { gl::ClearColor(r, g, b, a) };
    }

    fn clear(&self, mask: GLbitfield) {
        unsafe { gl::Clear(mask) };
    }

    fn viewport(&self, x: GLint, y: GLint, width: GLsizei, height: GLsizei) {
        unsafe { gl::Viewport(x, y, width, height) };
    }

    fn draw_arrays(&self, mode: GLenum, first: GLint, count: GLsizei) {
        unsafe { gl::DrawArrays(mode, first, count) };
    }

    fn draw_elements(&self, mode: GLenum, count: GLsizei, kind: GLenum, offset: usize) {
        unsafe { gl::DrawElements(mode, count, kind, offset as *const c_void) };
    }

    fn get_string(&self, name: GLenum) -> Option<String> {
        let ptr = unsafe { gl::GetString(name) };
        if ptr.is_null() {
            return None;
        }

        let s = unsafe { CStr::from_ptr(ptr as *const GLchar) };
        Some(s.to_string_lossy().into_owned())
    }
}
