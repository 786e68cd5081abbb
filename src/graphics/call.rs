//! Checked GL calls.
//!
//! OpenGL reports errors through a sticky queue of flags that you have to poll with `glGetError`.
//! If nobody polls, a flag raised by one call gets blamed on whatever call happens to check next.
//! Every call that goes through [`checked_call`] (usually via [`gl_call!`]) is therefore
//! bracketed: the queue is drained before the call, and anything found afterwards belongs to that
//! call alone. A non-empty queue after the call is logged one line per flag and then treated as a
//! failed assertion, since there's no sensible way to keep rendering with the driver in an unknown
//! state.
//!
//! With the `checked-calls` feature disabled the wrapper runs the call and nothing else.

use std::collections::HashMap;
use std::fmt;
use std::panic::Location;

use gl::types::GLenum;

/// Anything that can be polled for pending GL error flags. `gl::NO_ERROR` means the queue is empty.
pub trait ErrorSource {
    fn next_error(&self) -> GLenum;
}

/// Where a checked call was made, and what it looked like in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    pub call: &'static str,
    pub file: &'static str,
    pub line: u32,
}

/// One error flag found after a checked call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Diagnostic {
    pub code: GLenum,
    pub site: CallSite,
}

impl Diagnostic {
    pub fn name(&self) -> &'static str {
        error_name(self.code)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "OpenGL Error: {} function: {} file: {} line: {}",
            self.code, self.site.call, self.site.file, self.site.line
        )
    }
}

lazy_static! {
    static ref ERROR_NAMES: HashMap<GLenum, &'static str> = {
        let mut names = HashMap::new();
        names.insert(gl::INVALID_ENUM, "GL_INVALID_ENUM");
        names.insert(gl::INVALID_VALUE, "GL_INVALID_VALUE");
        names.insert(gl::INVALID_OPERATION, "GL_INVALID_OPERATION");
        names.insert(gl::STACK_OVERFLOW, "GL_STACK_OVERFLOW");
        names.insert(gl::STACK_UNDERFLOW, "GL_STACK_UNDERFLOW");
        names.insert(gl::OUT_OF_MEMORY, "GL_OUT_OF_MEMORY");
        names.insert(gl::INVALID_FRAMEBUFFER_OPERATION, "GL_INVALID_FRAMEBUFFER_OPERATION");
        names
    };
}

/// The symbolic name of a GL error code
pub fn error_name(code: GLenum) -> &'static str {
    ERROR_NAMES.get(&code).copied().unwrap_or("unknown GL error")
}

/// Throws away every pending error flag. Returns how many there were.
pub fn clear_errors<E: ErrorSource + ?Sized>(errors: &E) -> usize {
    let mut cleared = 0;
    while errors.next_error() != gl::NO_ERROR {
        cleared += 1;
    }
    cleared
}

/// Pulls every pending error flag, logging one diagnostic line for each
pub fn drain_errors<E: ErrorSource + ?Sized>(errors: &E, site: &CallSite) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    loop {
        let code = errors.next_error();
        if code == gl::NO_ERROR {
            break;
        }

        let diagnostic = Diagnostic { code, site: *site };
        error!("{}", diagnostic);
        diagnostics.push(diagnostic);
    }
    diagnostics
}

/// Runs `call` with the error queue drained beforehand and checked afterwards.
///
/// # Panics
///
/// If the call left any error flags set. Each flag is logged before the panic.
pub fn checked_call<E, T, F>(errors: &E, site: CallSite, call: F) -> T
where
    E: ErrorSource + ?Sized,
    F: FnOnce() -> T,
{
    if !cfg!(feature = "checked-calls") {
        return call();
    }

    let stale = clear_errors(errors);
    if stale > 0 {
        debug!("Discarded {} stale GL error(s) before {}", stale, site.call);
    }

    let result = call();

    let diagnostics = drain_errors(errors, &site);
    if !diagnostics.is_empty() {
        call_failed(&diagnostics);
    }

    result
}

/// Same as [`checked_call`], taking the file and line from wherever this is called
#[track_caller]
pub fn validated<E, T, F>(errors: &E, call_text: &'static str, call: F) -> T
where
    E: ErrorSource + ?Sized,
    F: FnOnce() -> T,
{
    let location = Location::caller();
    let site = CallSite { call: call_text, file: location.file(), line: location.line() };
    checked_call(errors, site, call)
}

#[cold]
fn call_failed(diagnostics: &[Diagnostic]) -> ! {
    let report = diagnostics.iter()
        .map(|d| format!("{} ({})", d, d.name()))
        .collect::<Vec<_>>()
        .join("\n");

    panic!("GL call failed:\n{}", report);
}

/// Wraps a GL call in [`checked_call`], recording the call's source text, file and line.
///
/// ```ignore
/// gl_call!(ctx.api(), ctx.api().bind_buffer(gl::ARRAY_BUFFER, id));
/// ```
#[macro_export]
macro_rules! gl_call {
    ($errors:expr, $call:expr) => {
        $crate::graphics::call::checked_call(
            $errors,
            $crate::graphics::call::CallSite {
                call: stringify!($call),
                file: file!(),
                line: line!(),
            },
            || $call,
        )
    };
}
