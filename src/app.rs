//! The demo: one window, one rectangle, one pulsing color.

use anyhow::{anyhow, Context};
use glutin::dpi::LogicalSize;
use glutin::event::{Event, WindowEvent};
use glutin::event_loop::{ControlFlow, EventLoop};
use glutin::platform::desktop::EventLoopExtDesktop;
use glutin::window::WindowBuilder;
use glutin::{Api, ContextBuilder, GlProfile, GlRequest};

use glscratch_shader::ShaderSourcePair;

use crate::graphics::{
    GlApi, GlContext, GlResult, IndexBuffer, NativeGl, Program, Renderer, VertexArray,
    VertexBuffer, VertexBufferLayout,
};
use crate::interface::cli::Config;

/// The uniform the fragment shader reads its color from
pub const COLOR_UNIFORM: &str = "u_Color";

const RECTANGLE: [f32; 8] = [
    // Position
    -0.5, -0.5,
     0.5, -0.5,
     0.5,  0.5,
    -0.5,  0.5,
];

const RECTANGLE_INDICES: [u32; 6] = [
    0, 1, 2,
    2, 3, 0,
];

/// Steps the red channel back and forth between 0 and 1, a little each frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pulse {
    red: f32,
    step: f32,
}

impl Default for Pulse {
    fn default() -> Self {
        Self { red: 0.0, step: 0.05 }
    }
}

impl Pulse {
    pub fn color(&self) -> [f32; 4] {
        [self.red, 0.3, 0.8, 1.0]
    }

    /// Returns this frame's color, then moves on to the next one
    pub fn next(&mut self) -> [f32; 4] {
        let color = self.color();

        if self.red > 1.0 {
            self.step = -0.05;
        } else if self.red < 0.0 {
            self.step = 0.05;
        }
        self.red += self.step;

        color
    }
}

/// All the GPU objects the demo draws with. Field order is drop order.
pub struct Scene<'ctx, A: GlApi = NativeGl> {
    vertex_array: VertexArray<'ctx, A>,
    vertices: VertexBuffer<'ctx, A>,
    indices: IndexBuffer<'ctx, A>,
    program: Program<'ctx, A>,
}

impl<'ctx, A: GlApi> Scene<'ctx, A> {
    pub fn new(ctx: &'ctx GlContext<A>, sources: &ShaderSourcePair) -> GlResult<Self> {
        let vertex_array = VertexArray::new(ctx)?;
        let vertices = VertexBuffer::new(ctx, &RECTANGLE)?;

        let mut layout = VertexBufferLayout::new();
        layout.push_f32(2);
        vertex_array.add_buffer(&vertices, &layout);

        let indices = IndexBuffer::new(ctx, &RECTANGLE_INDICES)?;
        let program = Program::from_sources(ctx, sources)?;

        // Leave the context clean; everything gets rebound per draw
        vertex_array.unbind();
        vertices.unbind();
        indices.unbind();

        Ok(Self { vertex_array, vertices, indices, program })
    }

    pub fn draw(&self, renderer: &Renderer<'ctx, A>, color: [f32; 4]) -> GlResult<()> {
        self.program.set_uniform_4f(COLOR_UNIFORM, color)?;
        renderer.draw(&self.vertex_array, &self.indices, &self.program)
    }

    pub fn vertices(&self) -> &VertexBuffer<'ctx, A> { &self.vertices }
}

/// Opens the window and draws until it's closed
pub fn run(config: &Config) -> anyhow::Result<()> {
    let sources = glscratch_shader::parse_file(&config.shader)?;
    if !sources.is_complete() {
        warn!("{} is missing a vertex or fragment section", config.shader.display());
    }

    let mut events = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title(config.title.as_str())
        .with_inner_size(LogicalSize::new(config.width as f64, config.height as f64));

    let windowed = ContextBuilder::new()
        .with_gl(GlRequest::Specific(Api::OpenGl, (3, 3)))
        .with_gl_profile(GlProfile::Core)
        .with_vsync(config.vsync)
        .build_windowed(window, &events)
        .map_err(|e| anyhow!("could not create a window with a GL 3.3 context: {}", e))?;

    let windowed = unsafe { windowed.make_current() }
        .map_err(|(_, e)| anyhow!("could not make the GL context current: {}", e))?;

    let ctx = GlContext::load_with(|s| windowed.get_proc_address(s) as *const _);
    info!("OpenGL {}", ctx.version().unwrap_or_else(|| String::from("(version unknown)")));

    let scene = Scene::new(&ctx, &sources)
        .with_context(|| format!("setting up the scene from {}", config.shader.display()))?;
    let renderer = Renderer::new(&ctx);
    renderer.set_clear_color([0.0, 0.0, 0.0, 1.0]);

    let mut pulse = Pulse::default();
    let mut failure = None;

    events.run_return(|event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => *control_flow = ControlFlow::Exit,
                WindowEvent::Resized(size) => {
                    windowed.resize(size);
                    renderer.viewport(0, 0, size.width as i32, size.height as i32);
                }
                _ => {}
            },
            Event::MainEventsCleared => windowed.window().request_redraw(),
            Event::RedrawRequested(_) => {
                renderer.clear();

                if let Err(e) = scene.draw(&renderer, pulse.next()) {
                    failure = Some(anyhow::Error::new(e));
                    *control_flow = ControlFlow::Exit;
                    return;
                }

                if let Err(e) = windowed.swap_buffers() {
                    failure = Some(anyhow!("could not swap buffers: {}", e));
                    *control_flow = ControlFlow::Exit;
                }
            }
            _ => {}
        }
    });

    info!("Window closed");

    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::graphics::fake::{Draw, FakeGl};
    use crate::graphics::BufferKind;

    fn sources() -> ShaderSourcePair {
        glscratch_shader::parse_file("res/shaders/basic.shader").unwrap()
    }

    #[test]
    fn bundled_shader_has_both_stages() {
        let sources = sources();

        assert!(sources.is_complete());
        assert!(sources.fragment.contains(COLOR_UNIFORM));
    }

    #[test]
    fn scene_builds_a_rectangle_and_leaves_nothing_bound() {
        let ctx = GlContext::new(FakeGl::with_uniforms(&[COLOR_UNIFORM]));
        let scene = Scene::new(&ctx, &sources()).unwrap();

        assert_eq!(scene.vertices().size(), 8 * 4);
        assert_eq!(ctx.bound_buffer(BufferKind::Vertex), None);
        assert_eq!(ctx.bound_buffer(BufferKind::Index), None);
        assert_eq!(ctx.api().state().bound_vertex_array, 0);
    }

    #[test]
    fn each_frame_sets_the_color_then_draws_six_indices() {
        let ctx = GlContext::new(FakeGl::with_uniforms(&[COLOR_UNIFORM]));
        let scene = Scene::new(&ctx, &sources()).unwrap();
        let renderer = Renderer::new(&ctx);
        let mut pulse = Pulse::default();

        scene.draw(&renderer, pulse.next()).unwrap();
        scene.draw(&renderer, pulse.next()).unwrap();

        let state = ctx.api().state();
        assert_eq!(state.draws.len(), 2);
        assert_eq!(state.draws[0], Draw::Elements { mode: gl::TRIANGLES, count: 6, kind: gl::UNSIGNED_INT });
        assert_eq!(state.uniform_values.len(), 2);
        assert!(state.uniform_values[1].1[0] > state.uniform_values[0].1[0]);
    }

    #[test]
    fn shader_without_the_color_uniform_fails_to_draw() {
        let ctx = GlContext::new(FakeGl::default());
        let scene = Scene::new(&ctx, &sources()).unwrap();

        assert!(scene.draw(&Renderer::new(&ctx), Pulse::default().color()).is_err());
        assert!(ctx.api().state().draws.is_empty());
    }

    #[test]
    fn dropping_the_scene_frees_everything() {
        let ctx = GlContext::new(FakeGl::with_uniforms(&[COLOR_UNIFORM]));
        drop(Scene::new(&ctx, &sources()).unwrap());

        let state = ctx.api().state();
        assert!(state.live_buffers.is_empty());
        assert!(state.vertex_arrays.is_empty());
        assert!(state.programs.is_empty());
        assert_eq!(state.deleted_buffers.len(), 2);
    }

    #[test]
    fn pulse_bounces_between_zero_and_one() {
        let mut pulse = Pulse::default();
        let reds: Vec<f32> = (0..100).map(|_| pulse.next()[0]).collect();

        assert!(reds.iter().all(|&r| r >= -0.05 - 1e-4 && r <= 1.05 + 1e-4));
        assert!(reds.windows(2).any(|w| w[1] < w[0]));
        assert!(reds.windows(2).any(|w| w[1] > w[0]));
    }
}
