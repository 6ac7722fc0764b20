//! Shader: a two-stage WGSL program for fullscreen drawing.
//!
//! A program is loaded from a base path (`demo` → `demo.vert.wgsl` +
//! `demo.frag.wgsl`), compile-checked stage by stage without touching the
//! GPU, then linked into a render pipeline targeting the display's surface.
//! A built [`Shader`] is immutable; bind it into a pass and draw.

mod error;
mod stage;

pub use error::BuildError;
pub use stage::{ShaderStage, StageSet, StageSource};

use std::path::Path;

use crate::display::{DEPTH_FORMAT, RenderContext};

/// A linked two-stage shader program.
///
/// A value of this type only exists for a program whose stages compiled and
/// whose pipeline linked; the pipeline keeps the compiled stages alive.
pub struct Shader {
    pipeline: wgpu::RenderPipeline,
}

impl Shader {
    /// Loads, compiles and links the program rooted at `base`.
    ///
    /// `base` is extended per stage: `shaders/julia` reads
    /// `shaders/julia.vert.wgsl` and `shaders/julia.frag.wgsl`.
    pub fn new(ctx: &RenderContext, base: impl AsRef<Path>) -> Result<Self, BuildError> {
        let set = StageSet::load(base)?;
        Self::build(ctx, &set)
    }

    /// Builds a program from in-memory stage sources.
    pub fn from_sources(
        ctx: &RenderContext,
        vertex: &str,
        fragment: &str,
    ) -> Result<Self, BuildError> {
        let set = StageSet::new(vec![
            StageSource::inline(ShaderStage::Vertex, vertex),
            StageSource::inline(ShaderStage::Fragment, fragment),
        ])?;
        Self::build(ctx, &set)
    }

    fn build(ctx: &RenderContext, set: &StageSet) -> Result<Self, BuildError> {
        set.check()?;
        let pipeline = link(ctx.device(), ctx.surface_format(), set)?;

        log::debug!(
            "shader program linked: {} + {}",
            set.vertex().origin,
            set.fragment().origin
        );

        Ok(Self { pipeline })
    }

    /// Sets this program's pipeline on a render pass.
    ///
    /// After `bind`, `pass.draw(0..3, 0..1)` draws the fullscreen triangle
    /// the vertex stage is expected to emit.
    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
    }

    /// Number of stages the program was linked from.
    pub fn stage_count(&self) -> usize {
        ShaderStage::COUNT
    }
}

/// Creates the stage modules and the render pipeline under a validation
/// error scope; anything wgpu rejects surfaces as a link error.
///
/// Pipeline shape: no vertex buffers (the vertex stage synthesizes a
/// fullscreen triangle from `vertex_index`), one color target in the
/// surface format, and the display's depth attachment declared with writes
/// off so fractal fills never occlude each other.
fn link(
    device: &wgpu::Device,
    surface_format: wgpu::TextureFormat,
    set: &StageSet,
) -> Result<wgpu::RenderPipeline, BuildError> {
    // The guard pops its scope when dropped, so it must stay alive across
    // every create call below.
    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);

    let vertex = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(set.vertex().origin.as_str()),
        source: wgpu::ShaderSource::Wgsl(set.vertex().source.as_str().into()),
    });

    let fragment = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(set.fragment().origin.as_str()),
        source: wgpu::ShaderSource::Wgsl(set.fragment().source.as_str().into()),
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("feigen shader pipeline layout"),
        bind_group_layouts: &[],
        immediate_size: 0,
    });

    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("feigen shader pipeline"),
        layout: Some(&layout),

        vertex: wgpu::VertexState {
            module: &vertex,
            entry_point: Some(ShaderStage::Vertex.entry_point()),
            compilation_options: Default::default(),
            buffers: &[],
        },

        fragment: Some(wgpu::FragmentState {
            module: &fragment,
            entry_point: Some(ShaderStage::Fragment.entry_point()),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },

        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: false,
            depth_compare: wgpu::CompareFunction::Always,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),

        multiview_mask: None,
        cache: None,
    });

    if let Some(err) = pollster::block_on(scope.pop()) {
        return Err(BuildError::Link {
            log: stage::non_empty_log(err.to_string()),
        });
    }

    Ok(pipeline)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN_VERT: &str = r#"
@vertex
fn vs_main(@builtin(vertex_index) vi: u32) -> @builtin(position) vec4<f32> {
    return vec4<f32>(f32(vi), 0.0, 0.0, 1.0);
}
"#;

    const PLAIN_FRAG: &str = r#"
@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0, 0.0, 1.0, 1.0);
}
"#;

    // Valid on its own, but wants an interpolant PLAIN_VERT never writes.
    const UV_FRAG: &str = r#"
@fragment
fn fs_main(@location(0) uv: vec2<f32>) -> @location(0) vec4<f32> {
    return vec4<f32>(uv, 0.0, 1.0);
}
"#;

    fn headless_device() -> Option<wgpu::Device> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .ok()?;

        let (device, _queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("shader link test device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        }))
        .ok()?;

        Some(device)
    }

    fn pair(vertex: &str, fragment: &str) -> StageSet {
        StageSet::new(vec![
            StageSource::inline(ShaderStage::Vertex, vertex),
            StageSource::inline(ShaderStage::Fragment, fragment),
        ])
        .unwrap()
    }

    // ── link ──────────────────────────────────────────────────────────────

    #[test]
    #[ignore = "requires a GPU adapter"]
    fn link_accepts_matching_stages() {
        let device = headless_device().expect("no GPU adapter available");

        let set = pair(PLAIN_VERT, PLAIN_FRAG);
        set.check().unwrap();

        link(&device, wgpu::TextureFormat::Rgba8UnormSrgb, &set).unwrap();
    }

    #[test]
    #[ignore = "requires a GPU adapter"]
    fn link_rejects_stage_interface_mismatch() {
        let device = headless_device().expect("no GPU adapter available");

        // Both stages pass their own compile checks; the failure is strictly
        // a property of the pair.
        let set = pair(PLAIN_VERT, UV_FRAG);
        set.check().unwrap();

        match link(&device, wgpu::TextureFormat::Rgba8UnormSrgb, &set) {
            Err(BuildError::Link { log }) => assert!(!log.trim().is_empty(), "{log}"),
            Err(other) => panic!("expected a link error, got {other:?}"),
            Ok(_) => panic!("mismatched stages must not link"),
        }
    }
}
