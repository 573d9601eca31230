use std::sync::mpsc;

use anyhow::{anyhow, Context, Result};
use image::RgbaImage;
use log::{debug, warn};
use naga::ShaderStage;
use wgpu::{
    Buffer, BufferDescriptor, BufferUsages, Color, CommandEncoderDescriptor, Device,
    DeviceDescriptor, Extent3d, ImageCopyBuffer, ImageDataLayout, Instance, LoadOp, Operations,
    Queue, RenderPassColorAttachment, RenderPassDescriptor, RenderPipeline,
    RequestAdapterOptions, StoreOp, Texture, TextureDescriptor, TextureDimension, TextureFormat,
    TextureUsages, TextureView, TextureViewDescriptor,
};

use crate::{
    bind::Bind,
    error::InitError,
    geometry::{Geometry, GlyphQuad},
    plain::Plain,
    program::WgslProgram,
    settings::{self, ColorUniform},
    target::{GlyphTarget, ShaderBindings, Slot, Viewport},
    text::pipeline::{glyph_bind_entries, glyph_pipeline},
    texture::GlyphBitmap,
};

pub const OUTPUT_FORMAT: TextureFormat = TextureFormat::Rgba8Unorm;

struct GlyphResources {
    pipeline: RenderPipeline,
    bind: Bind<'static>,
    vertex_buffer: Buffer,
    tex: u32,
    color: u32,
    glyph_size: Extent3d,
    glyph_ready: bool,
    vertex_count: u32,
}

/// [`GlyphTarget`] that draws into an offscreen RGBA texture with wgpu.
pub struct WgpuTarget {
    device: Device,
    queue: Queue,
    output: Texture,
    output_view: TextureView,
    viewport: Viewport,
    resources: Option<GlyphResources>,
}

impl WgpuTarget {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let instance = Instance::default();

        let (device, queue) = pollster::block_on(async {
            let adapter = instance
                .request_adapter(&RequestAdapterOptions::default())
                .await
                .ok_or(anyhow!("No suitable adapter found."))?;

            let (device, queue) = adapter
                .request_device(&DeviceDescriptor::default(), None)
                .await?;

            Ok::<(wgpu::Device, wgpu::Queue), anyhow::Error>((device, queue))
        })?;

        let (output, output_view) = create_output(&device, width, height);

        Ok(Self {
            device,
            queue,
            output,
            output_view,
            viewport: Viewport::new(width, height),
            resources: None,
        })
    }

    pub fn clear(&mut self, color: settings::Color) {
        self.encode_pass(LoadOp::Clear(Color::from(color)), None);
    }

    /// Submits one render pass over the output; with `glyph` set it draws the uploaded quad.
    fn encode_pass(&self, load: LoadOp<Color>, glyph: Option<&GlyphResources>) {
        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor { label: None });
        {
            let mut rpass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("glyph pass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &self.output_view,
                    resolve_target: None,
                    ops: Operations {
                        load,
                        store: StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            if let Some(resources) = glyph {
                rpass.set_pipeline(&resources.pipeline);
                rpass.set_bind_group(0, &resources.bind.bg, &[]);
                rpass.set_vertex_buffer(0, resources.vertex_buffer.slice(..));
                rpass.draw(0..resources.vertex_count, 0..1);
            }
        }
        self.queue.submit([encoder.finish()]);
    }

    /// Copies the offscreen target back into an image.
    pub fn read_pixels(&self) -> Result<RgbaImage> {
        let Viewport { width, height } = self.viewport;
        let bytes_per_row = width * 4;
        let padded_bytes_per_row = align_to(bytes_per_row, wgpu::COPY_BYTES_PER_ROW_ALIGNMENT);

        let readback = self.device.create_buffer(&BufferDescriptor {
            label: Some("glyph readback"),
            size: padded_bytes_per_row as u64 * height as u64,
            usage: BufferUsages::COPY_DST | BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor { label: None });
        encoder.copy_texture_to_buffer(
            self.output.as_image_copy(),
            ImageCopyBuffer {
                buffer: &readback,
                layout: ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_bytes_per_row),
                    rows_per_image: Some(height),
                },
            },
            Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        self.queue.submit([encoder.finish()]);

        let slice = readback.slice(..);
        let (sender, receiver) = mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });
        let _ = self.device.poll(wgpu::Maintain::Wait);
        receiver
            .recv()
            .context("failed to receive buffer map response")?
            .context("failed to map readback buffer")?;

        let mapped = slice.get_mapped_range();
        let mut pixels = Vec::with_capacity((bytes_per_row * height) as usize);
        for row in mapped.chunks(padded_bytes_per_row as usize) {
            pixels.extend_from_slice(&row[..bytes_per_row as usize]);
        }
        drop(mapped);
        readback.unmap();

        RgbaImage::from_raw(width, height, pixels).context("failed to build RgbaImage")
    }

    fn create_glyph_resources(
        &self,
        program: &WgslProgram,
        bindings: ShaderBindings,
    ) -> Result<GlyphResources, InitError> {
        let group = bindings.tex.group;
        if group != 0 || bindings.color.group != group {
            return Err(InitError::Resources(
                "`tex` and `color` must both live in bind group 0".into(),
            ));
        }
        let sampler = program.sampler(group).ok_or_else(|| {
            InitError::Resources("no filtering sampler declared next to `tex`".into())
        })?;
        let entry_points = program
            .entry_point(ShaderStage::Vertex)
            .zip(program.entry_point(ShaderStage::Fragment))
            .ok_or_else(|| {
                InitError::Resources("program needs a vertex and a fragment entry point".into())
            })?;

        self.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let bind = Bind::new(glyph_bind_entries(bindings, sampler), &self.device);
        let pipeline = glyph_pipeline(
            &self.device,
            program.source(),
            entry_points,
            bindings,
            &bind.bgl,
            OUTPUT_FORMAT,
        );
        let vertex_buffer = self.device.create_buffer(&BufferDescriptor {
            label: Some("glyph quad"),
            size: std::mem::size_of::<GlyphQuad>() as u64,
            usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        if let Some(err) = pollster::block_on(self.device.pop_error_scope()) {
            return Err(InitError::Resources(err.to_string()));
        }
        let pipeline =
            pipeline.ok_or_else(|| InitError::Resources("program has no source".into()))?;

        Ok(GlyphResources {
            pipeline,
            bind,
            vertex_buffer,
            tex: bindings.tex.binding,
            color: bindings.color.binding,
            glyph_size: crate::text::pipeline::INITIAL_GLYPH_SIZE,
            glyph_ready: false,
            vertex_count: 0,
        })
    }
}

impl GlyphTarget for WgpuTarget {
    type Program = WgslProgram;

    fn uniform_location(&self, program: &WgslProgram, name: &str) -> Option<Slot> {
        program.uniform(name)
    }

    fn attribute_location(&self, program: &WgslProgram, name: &str) -> Option<u32> {
        program.attribute(name)
    }

    fn create_resources(
        &mut self,
        program: &WgslProgram,
        bindings: ShaderBindings,
    ) -> Result<(), InitError> {
        let resources = self.create_glyph_resources(program, bindings)?;
        debug!("created glyph texture, sampler and quad buffer");
        self.resources = Some(resources);
        Ok(())
    }

    fn release_resources(&mut self) {
        if let Some(resources) = self.resources.take() {
            resources.vertex_buffer.destroy();
            resources.bind.destroy();
        }
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn begin(&mut self, color: settings::Color) {
        let Some(resources) = self.resources.as_mut() else {
            warn!("drawing without glyph resources");
            return;
        };
        resources.glyph_ready = false;
        if let Some(buffer) = resources
            .bind
            .resource(resources.color)
            .and_then(|resource| resource.buffer())
        {
            self.queue
                .write_buffer(buffer, 0, ColorUniform::from(color).as_bytes());
        }
    }

    fn upload_bitmap(&mut self, bitmap: &GlyphBitmap) {
        let Some(resources) = self.resources.as_mut() else {
            return;
        };
        if bitmap.is_empty() {
            resources.glyph_ready = false;
            return;
        }

        let size = bitmap.extent();
        if size != resources.glyph_size {
            resources.bind.resize_texture(resources.tex, size, &self.device);
            resources.glyph_size = size;
        }

        let Some(texture) = resources
            .bind
            .resource(resources.tex)
            .and_then(|resource| resource.texture())
        else {
            return;
        };
        self.queue.write_texture(
            texture.as_image_copy(),
            &bitmap.data,
            ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(bitmap.bytes_per_row()),
                rows_per_image: Some(bitmap.height),
            },
            size,
        );
        resources.glyph_ready = true;
    }

    fn upload_quad(&mut self, quad: &GlyphQuad) {
        let Some(resources) = self.resources.as_mut() else {
            return;
        };
        self.queue
            .write_buffer(&resources.vertex_buffer, 0, quad.contents());
        resources.vertex_count = quad.length();
    }

    fn draw_strip(&mut self) {
        let Some(resources) = self.resources.as_ref() else {
            return;
        };
        // whitespace: nothing was uploaded
        if !resources.glyph_ready {
            return;
        }
        self.encode_pass(LoadOp::Load, Some(resources));
    }
}

fn create_output(device: &Device, width: u32, height: u32) -> (Texture, TextureView) {
    let output = device.create_texture(&TextureDescriptor {
        label: Some("glyph output"),
        size: Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: TextureDimension::D2,
        format: OUTPUT_FORMAT,
        usage: TextureUsages::RENDER_ATTACHMENT | TextureUsages::COPY_SRC,
        view_formats: &[],
    });
    let view = output.create_view(&TextureViewDescriptor::default());
    (output, view)
}

fn align_to(value: u32, alignment: u32) -> u32 {
    value.div_ceil(alignment) * alignment
}
