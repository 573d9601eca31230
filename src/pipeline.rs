use wgpu::{
    BindGroupLayout, BlendState, ColorTargetState, ColorWrites, Device, FragmentState,
    MultisampleState, PipelineCompilationOptions, PipelineLayoutDescriptor, PrimitiveState,
    PrimitiveTopology, RenderPipeline, RenderPipelineDescriptor, ShaderModule,
    ShaderModuleDescriptor, TextureFormat, VertexAttribute, VertexState, VertexStepMode,
};

use crate::bind::VertexBufferEntry;

/// Bundles shader module, pipeline layout and render pipeline creation.
///
/// ```ignore
/// let pipeline = PipelineBuilder::new()
///     .with_shader(source)
///     .with_topology(PrimitiveTopology::TriangleStrip)
///     .with_bind(&layout)
///     .build(&device);
/// ```
pub struct PipelineBuilder<'a> {
    binds: Vec<&'a BindGroupLayout>,
    shader_src: Option<&'a str>,
    vertex_entry: &'a str,
    fragment_entry: &'a str,
    primitive_state: PrimitiveState,
    format: TextureFormat,
    vertex_entries: Vec<VertexBufferEntry>,
}

impl<'a> PipelineBuilder<'a> {
    pub fn new() -> Self {
        Self {
            binds: Vec::new(),
            shader_src: None,
            vertex_entry: "vertex",
            fragment_entry: "fragment",
            primitive_state: PrimitiveState::default(),
            format: TextureFormat::Rgba8Unorm,
            vertex_entries: Vec::new(),
        }
    }

    pub fn with_topology(mut self, topology: PrimitiveTopology) -> Self {
        self.primitive_state.topology = topology;
        self
    }

    pub fn with_shader(mut self, shader_src: &'a str) -> Self {
        self.shader_src = Some(shader_src);
        self
    }

    pub fn with_entry_points(mut self, vertex: &'a str, fragment: &'a str) -> Self {
        self.vertex_entry = vertex;
        self.fragment_entry = fragment;
        self
    }

    pub fn with_format(mut self, format: TextureFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_bind(mut self, layout: &'a BindGroupLayout) -> Self {
        self.binds.push(layout);
        self
    }

    pub fn with_vb<T>(mut self, step_mode: VertexStepMode, attributes: &[VertexAttribute]) -> Self {
        self.vertex_entries.push(VertexBufferEntry {
            array_stride: std::mem::size_of::<T>() as u64,
            step_mode,
            attributes: attributes.into(),
        });
        self
    }

    fn create_module(&self, device: &Device) -> Option<ShaderModule> {
        let source = self.shader_src?;
        Some(device.create_shader_module(ShaderModuleDescriptor {
            label: Some("glyph shader"),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        }))
    }

    /// Returns `None` when no shader source was set.
    pub fn build(&self, device: &Device) -> Option<RenderPipeline> {
        let module = self.create_module(device)?;

        let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: None,
            bind_group_layouts: self.binds.as_slice(),
            push_constant_ranges: &[],
        });

        let vbs = self
            .vertex_entries
            .iter()
            .map(|ent| ent.layout())
            .collect::<Vec<_>>();

        let pipeline = device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some("glyph pipeline"),
            layout: Some(&pipeline_layout),
            vertex: VertexState {
                module: &module,
                entry_point: self.vertex_entry,
                buffers: vbs.as_slice(),
                compilation_options: PipelineCompilationOptions::default(),
            },
            primitive: self.primitive_state,
            depth_stencil: None,
            multisample: MultisampleState::default(),
            fragment: Some(FragmentState {
                module: &module,
                entry_point: self.fragment_entry,
                targets: &[Some(ColorTargetState {
                    format: self.format,
                    blend: Some(BlendState::ALPHA_BLENDING),
                    write_mask: ColorWrites::all(),
                })],
                compilation_options: PipelineCompilationOptions::default(),
            }),
            multiview: None,
        });

        Some(pipeline)
    }
}

impl Default for PipelineBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}
