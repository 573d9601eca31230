use wgpu::{
    AddressMode, BufferUsages, Device, Extent3d, FilterMode, PrimitiveTopology, RenderPipeline,
    SamplerBindingType, SamplerDescriptor, ShaderStages, TextureFormat, TextureSampleType,
    TextureUsages, TextureViewDimension, VertexAttribute, VertexFormat,
};

use crate::{
    bind::{BindEntry, BindEntryType},
    geometry::GlyphVertex,
    pipeline::PipelineBuilder,
    settings::ColorUniform,
    target::{ShaderBindings, Slot},
};

/// The glyph texture starts at 1x1 and is reallocated to each uploaded bitmap's size.
pub const INITIAL_GLYPH_SIZE: Extent3d = Extent3d {
    width: 1,
    height: 1,
    depth_or_array_layers: 1,
};

pub fn glyph_bind_entries(bindings: ShaderBindings, sampler: Slot) -> Vec<BindEntry<'static>> {
    vec![
        // glyph bitmap
        BindEntry {
            binding: bindings.tex.binding,
            visibility: ShaderStages::FRAGMENT,
            ty: BindEntryType::Texture {
                sample_type: TextureSampleType::Float { filterable: true },
                view_dimension: TextureViewDimension::D2,
                format: TextureFormat::R8Unorm,
                size: INITIAL_GLYPH_SIZE,
                usage: TextureUsages::COPY_DST | TextureUsages::TEXTURE_BINDING,
            },
        },
        // clamp-to-edge, linear
        BindEntry {
            binding: sampler.binding,
            visibility: ShaderStages::FRAGMENT,
            ty: BindEntryType::Sampler {
                binding_type: SamplerBindingType::Filtering,
                descriptor: SamplerDescriptor {
                    label: Some("glyph sampler"),
                    address_mode_u: AddressMode::ClampToEdge,
                    address_mode_v: AddressMode::ClampToEdge,
                    address_mode_w: AddressMode::ClampToEdge,
                    mag_filter: FilterMode::Linear,
                    min_filter: FilterMode::Linear,
                    ..Default::default()
                },
            },
        },
        // text color
        BindEntry {
            binding: bindings.color.binding,
            visibility: ShaderStages::VERTEX | ShaderStages::FRAGMENT,
            ty: BindEntryType::BufferUniform {
                size: std::mem::size_of::<ColorUniform>() as u64,
                usages: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            },
        },
    ]
}

/// Triangle-strip pipeline feeding one `vec4<f32>` per vertex into the `coord` location.
pub fn glyph_pipeline(
    device: &Device,
    shader: &str,
    entry_points: (&str, &str),
    bindings: ShaderBindings,
    layout: &wgpu::BindGroupLayout,
    format: TextureFormat,
) -> Option<RenderPipeline> {
    PipelineBuilder::new()
        .with_shader(shader)
        .with_entry_points(entry_points.0, entry_points.1)
        .with_topology(PrimitiveTopology::TriangleStrip)
        .with_format(format)
        .with_bind(layout)
        .with_vb::<GlyphVertex>(
            wgpu::VertexStepMode::Vertex,
            &[VertexAttribute {
                format: VertexFormat::Float32x4,
                offset: 0,
                shader_location: bindings.coord,
            }],
        )
        .build(device)
}
