use wgpu::{
    BindGroup, BindGroupDescriptor, BindGroupEntry, BindGroupLayout, BindGroupLayoutDescriptor,
    BindGroupLayoutEntry, Buffer, BufferBinding, BufferDescriptor, BufferUsages, Device, Extent3d,
    Sampler, SamplerBindingType, SamplerDescriptor, ShaderStages, Texture, TextureDescriptor,
    TextureFormat, TextureSampleType, TextureUsages, TextureView, TextureViewDescriptor,
    TextureViewDimension, VertexAttribute, VertexBufferLayout, VertexStepMode,
};

#[derive(Clone, Debug)]
pub enum BindEntryType<'a> {
    BufferUniform {
        size: u64,
        usages: BufferUsages,
    },
    Sampler {
        binding_type: SamplerBindingType,
        descriptor: SamplerDescriptor<'a>,
    },
    Texture {
        sample_type: TextureSampleType,
        view_dimension: TextureViewDimension,
        format: TextureFormat,
        size: Extent3d,
        usage: TextureUsages,
    },
}

#[derive(Debug)]
pub enum BindEntryResource {
    Buffer(Buffer),
    Texture(Texture, TextureView),
    Sampler(Sampler),
}

impl BindEntryResource {
    pub fn buffer(&self) -> Option<&Buffer> {
        match self {
            BindEntryResource::Buffer(buffer) => Some(buffer),
            _ => None,
        }
    }

    pub fn texture(&self) -> Option<&Texture> {
        match self {
            BindEntryResource::Texture(texture, _) => Some(texture),
            _ => None,
        }
    }

    fn destroy(&self) {
        match self {
            BindEntryResource::Buffer(buffer) => buffer.destroy(),
            BindEntryResource::Texture(texture, _) => texture.destroy(),
            BindEntryResource::Sampler(_) => {}
        }
    }
}

/// One binding of a bind group, numbered the way the shader declares it.
#[derive(Clone, Debug)]
pub struct BindEntry<'a> {
    pub binding: u32,
    pub visibility: ShaderStages,
    pub ty: BindEntryType<'a>,
}

impl<'a> BindEntry<'a> {
    pub fn layout_entry(&self) -> BindGroupLayoutEntry {
        BindGroupLayoutEntry {
            binding: self.binding,
            visibility: self.visibility,
            ty: match &self.ty {
                BindEntryType::BufferUniform { .. } => wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                BindEntryType::Sampler { binding_type, .. } => {
                    wgpu::BindingType::Sampler(*binding_type)
                }
                BindEntryType::Texture {
                    sample_type,
                    view_dimension,
                    ..
                } => wgpu::BindingType::Texture {
                    sample_type: *sample_type,
                    view_dimension: *view_dimension,
                    multisampled: false,
                },
            },
            count: None,
        }
    }

    pub fn group_entry<'b>(&self, resource: &'b BindEntryResource) -> BindGroupEntry<'b> {
        let binding_resource = match resource {
            BindEntryResource::Buffer(buffer) => wgpu::BindingResource::Buffer(BufferBinding {
                buffer,
                offset: 0,
                size: None,
            }),
            BindEntryResource::Sampler(sampler) => wgpu::BindingResource::Sampler(sampler),
            BindEntryResource::Texture(_, view) => wgpu::BindingResource::TextureView(view),
        };

        BindGroupEntry {
            binding: self.binding,
            resource: binding_resource,
        }
    }

    pub fn texture(
        &self,
        device: &Device,
        size: Extent3d,
        view_dimension: TextureViewDimension,
        format: TextureFormat,
        usage: TextureUsages,
    ) -> (Texture, TextureView) {
        let texture = device.create_texture(&TextureDescriptor {
            label: Some("glyph texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: view_dimension.compatible_texture_dimension(),
            format,
            usage,
            view_formats: &[],
        });
        let view = texture.create_view(&TextureViewDescriptor::default());
        (texture, view)
    }

    pub fn binding_resource(&self, device: &Device) -> BindEntryResource {
        match &self.ty {
            BindEntryType::BufferUniform { size, usages } => {
                BindEntryResource::Buffer(device.create_buffer(&BufferDescriptor {
                    label: None,
                    size: *size,
                    usage: *usages,
                    mapped_at_creation: false,
                }))
            }
            BindEntryType::Sampler { descriptor, .. } => {
                BindEntryResource::Sampler(device.create_sampler(descriptor))
            }
            BindEntryType::Texture {
                view_dimension,
                format,
                size,
                usage,
                ..
            } => {
                let (texture, view) =
                    self.texture(device, *size, *view_dimension, *format, *usage);
                BindEntryResource::Texture(texture, view)
            }
        }
    }
}

/// A bind group together with its layout and the resources it points at.
pub struct Bind<'a> {
    pub bg: BindGroup,
    pub bgl: BindGroupLayout,
    pub resources: Vec<BindEntryResource>,
    pub bind_entries: Vec<BindEntry<'a>>,
}

impl<'a> Bind<'a> {
    pub fn new(bind_entries: Vec<BindEntry<'a>>, device: &Device) -> Self {
        let layout_entries = bind_entries
            .iter()
            .map(|entry| entry.layout_entry())
            .collect::<Vec<_>>();

        let bgl = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: None,
            entries: &layout_entries,
        });
        let resources = bind_entries
            .iter()
            .map(|entry| entry.binding_resource(device))
            .collect::<Vec<_>>();

        let bg = Self::create_bind_group(&bgl, &bind_entries, &resources, device);

        Self {
            bg,
            bgl,
            resources,
            bind_entries,
        }
    }

    fn create_bind_group(
        bgl: &BindGroupLayout,
        bind_entries: &[BindEntry<'a>],
        resources: &[BindEntryResource],
        device: &Device,
    ) -> BindGroup {
        let group_entries = bind_entries
            .iter()
            .zip(resources)
            .map(|(entry, resource)| entry.group_entry(resource))
            .collect::<Vec<_>>();
        device.create_bind_group(&BindGroupDescriptor {
            label: None,
            layout: bgl,
            entries: &group_entries,
        })
    }

    fn position(&self, binding: u32) -> Option<usize> {
        self.bind_entries
            .iter()
            .position(|entry| entry.binding == binding)
    }

    pub fn resource(&self, binding: u32) -> Option<&BindEntryResource> {
        self.position(binding)
            .and_then(|idx| self.resources.get(idx))
    }

    pub fn replace_resource(
        &mut self,
        new_resource: BindEntryResource,
        binding: u32,
        device: &Device,
    ) {
        let Some(idx) = self.position(binding) else {
            return;
        };
        let old = std::mem::replace(&mut self.resources[idx], new_resource);
        old.destroy();

        self.bg = Self::create_bind_group(&self.bgl, &self.bind_entries, &self.resources, device);
    }

    /// Reallocates the texture at `binding` with a new size, keeping its format and usage.
    pub fn resize_texture(&mut self, binding: u32, size: Extent3d, device: &Device) {
        let Some(entry) = self.position(binding).map(|idx| &self.bind_entries[idx]) else {
            return;
        };
        let BindEntryType::Texture {
            view_dimension,
            format,
            usage,
            ..
        } = entry.ty
        else {
            return;
        };
        let (texture, view) = entry.texture(device, size, view_dimension, format, usage);
        self.replace_resource(BindEntryResource::Texture(texture, view), binding, device);
    }

    pub fn destroy(self) {
        for resource in &self.resources {
            resource.destroy();
        }
    }
}

pub struct VertexBufferEntry {
    pub array_stride: u64,
    pub step_mode: VertexStepMode,
    pub attributes: Vec<VertexAttribute>,
}

impl VertexBufferEntry {
    pub fn layout(&self) -> VertexBufferLayout {
        VertexBufferLayout {
            array_stride: self.array_stride,
            step_mode: self.step_mode,
            attributes: self.attributes.as_slice(),
        }
    }
}
