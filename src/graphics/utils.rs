use gl::types::GLint;

/// Makes a space-filled buffer for the driver to write an info log into. The driver reports the
/// log length including the nul terminator, and may report nothing at all, so negative and zero
/// lengths just give an empty buffer.
pub fn info_log_buffer(len: GLint) -> Vec<u8> {
    let len = len.max(0) as usize;
    let mut buf: Vec<u8> = Vec::with_capacity(len + 1);
    buf.extend([b' '].iter().cycle().take(len)); // Adds a bunch of spaces to the buffer
    buf
}

/// The driver writes the log and its nul over the front of the buffer, so cut at the first nul and
/// drop the trailing newline most drivers add.
pub fn info_log_to_string(buf: Vec<u8>) -> String {
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    String::from_utf8_lossy(&buf[..end]).trim_end().to_string()
}
