//! [`GpuBackend`] implementation on top of wgpu.

use std::borrow::Cow;

use glam::Mat4;
use wgpu::util::DeviceExt;

use super::{
    backend::{BufferHandle, GpuBackend, GpuError, ProgramHandle},
    program::{AttributeBindings, ProgramLayout, VertexBufferInfo},
    render_context::RenderContext,
    texture::{depth_stencil_state, DepthTarget},
};
use crate::lattice::LatticePoint;

/// A linked program with its pipeline and uniform storage.
struct GpuProgram {
    layout: ProgramLayout,
    pipeline: wgpu::RenderPipeline,
    /// One buffer per uniform block, keyed by binding.
    uniform_buffers: Vec<(u32, wgpu::Buffer)>,
    bind_group: wgpu::BindGroup,
    bindings: AttributeBindings,
}

struct GpuVertexBuffer {
    buffer: wgpu::Buffer,
    info: VertexBufferInfo,
}

/// Draws lattice points into a window surface through wgpu.
pub struct WgpuBackend {
    context: RenderContext,
    depth: DepthTarget,
    programs: Vec<GpuProgram>,
    buffers: Vec<GpuVertexBuffer>,
    active: Option<ProgramHandle>,
    clear_color: wgpu::Color,
}

impl WgpuBackend {
    /// Wrap a render context. Frames are cleared to `clear_color` (RGBA).
    #[must_use]
    pub fn new(context: RenderContext, clear_color: [f64; 4]) -> Self {
        let (width, height) = context.size();
        let depth = DepthTarget::new(&context.device, width, height);
        let [r, g, b, a] = clear_color;
        Self {
            context,
            depth,
            programs: Vec::new(),
            buffers: Vec::new(),
            active: None,
            clear_color: wgpu::Color { r, g, b, a },
        }
    }

    /// Reconfigure the surface at its existing size after it was lost or
    /// became outdated.
    pub fn reconfigure(&mut self) {
        self.context.reconfigure();
        let (width, height) = self.context.size();
        self.depth = DepthTarget::new(&self.context.device, width, height);
    }

    fn program(&self, handle: ProgramHandle) -> Result<&GpuProgram, GpuError> {
        self.programs
            .get(handle.0)
            .ok_or(GpuError::UnknownProgram(handle))
    }
}

/// Uniform buffers, their bind group and its layout for one program.
struct UniformResources {
    layout: wgpu::BindGroupLayout,
    buffers: Vec<(u32, wgpu::Buffer)>,
    bind_group: wgpu::BindGroup,
}

fn create_uniform_resources(
    device: &wgpu::Device,
    layout: &ProgramLayout,
) -> UniformResources {
    let layout_entries: Vec<wgpu::BindGroupLayoutEntry> = layout
        .uniform_blocks()
        .iter()
        .map(|block| wgpu::BindGroupLayoutEntry {
            binding: block.binding,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        })
        .collect();
    let bind_group_layout =
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Uniform Bind Group Layout"),
            entries: &layout_entries,
        });

    let buffers: Vec<(u32, wgpu::Buffer)> = layout
        .uniform_blocks()
        .iter()
        .map(|block| {
            let buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Uniform Buffer"),
                size: block.size,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            (block.binding, buffer)
        })
        .collect();
    let group_entries: Vec<wgpu::BindGroupEntry> = buffers
        .iter()
        .map(|(binding, buffer)| wgpu::BindGroupEntry {
            binding: *binding,
            resource: buffer.as_entire_binding(),
        })
        .collect();
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Uniform Bind Group"),
        layout: &bind_group_layout,
        entries: &group_entries,
    });

    UniformResources {
        layout: bind_group_layout,
        buffers,
        bind_group,
    }
}

/// One attribute per buffer slot, each tightly packed.
fn vertex_attributes(layout: &ProgramLayout) -> Vec<[wgpu::VertexAttribute; 1]> {
    layout
        .attributes()
        .iter()
        .map(|a| {
            [wgpu::VertexAttribute {
                format: a.format,
                offset: 0,
                shader_location: a.location,
            }]
        })
        .collect()
}

fn vertex_buffer_layouts<'a>(
    layout: &ProgramLayout,
    attributes: &'a [[wgpu::VertexAttribute; 1]],
) -> Vec<wgpu::VertexBufferLayout<'a>> {
    layout
        .attributes()
        .iter()
        .zip(attributes)
        .map(|(a, attributes)| wgpu::VertexBufferLayout {
            array_stride: a.format.size(),
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes,
        })
        .collect()
}

fn build_program(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    layout: ProgramLayout,
) -> GpuProgram {
    let vertex = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Lattice Vertex Shader"),
        source: wgpu::ShaderSource::Naga(Cow::Owned(
            layout.vertex_module().clone(),
        )),
    });
    let fragment = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Lattice Fragment Shader"),
        source: wgpu::ShaderSource::Naga(Cow::Owned(
            layout.fragment_module().clone(),
        )),
    });

    let uniforms = create_uniform_resources(device, &layout);
    let pipeline_layout =
        device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Lattice Pipeline Layout"),
            bind_group_layouts: &[&uniforms.layout],
            push_constant_ranges: &[],
        });

    let attributes = vertex_attributes(&layout);
    let buffer_layouts = vertex_buffer_layouts(&layout, &attributes);

    let pipeline =
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Lattice Point Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex,
                entry_point: Some(layout.vertex_entry()),
                buffers: &buffer_layouts,
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &fragment,
                entry_point: Some(layout.fragment_entry()),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::PointList,
                ..Default::default()
            },
            depth_stencil: Some(depth_stencil_state()),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

    let bindings = AttributeBindings::new(&layout);
    GpuProgram {
        layout,
        pipeline,
        uniform_buffers: uniforms.buffers,
        bind_group: uniforms.bind_group,
        bindings,
    }
}

impl GpuBackend for WgpuBackend {
    fn create_program(
        &mut self,
        vertex_src: &str,
        fragment_src: &str,
    ) -> Result<ProgramHandle, GpuError> {
        let layout = ProgramLayout::link(vertex_src, fragment_src)?;

        // naga already accepted both stages; anything wgpu still rejects is
        // an interface mismatch with the pipeline.
        let device = &self.context.device;
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let program = build_program(device, self.context.format(), layout);
        if let Some(error) = pollster::block_on(device.pop_error_scope()) {
            return Err(GpuError::ProgramLink(error.to_string()));
        }

        let handle = ProgramHandle(self.programs.len());
        self.programs.push(program);
        self.active = Some(handle);
        log::info!("linked lattice program {handle:?}");
        Ok(handle)
    }

    fn use_program(&mut self, program: ProgramHandle) -> Result<(), GpuError> {
        let _ = self.program(program)?;
        self.active = Some(program);
        Ok(())
    }

    fn upload_vertex_buffer(
        &mut self,
        points: &[LatticePoint],
    ) -> Result<BufferHandle, GpuError> {
        let buffer =
            self.context
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Lattice Vertex Buffer"),
                    contents: bytemuck::cast_slice(points),
                    usage: wgpu::BufferUsages::VERTEX,
                });
        let handle = BufferHandle(self.buffers.len());
        self.buffers.push(GpuVertexBuffer {
            buffer,
            info: VertexBufferInfo {
                handle,
                stride: size_of::<LatticePoint>() as u64,
                vertex_count: u32::try_from(points.len()).unwrap_or(u32::MAX),
            },
        });
        log::debug!("uploaded {} lattice points as {handle:?}", points.len());
        Ok(handle)
    }

    fn bind_attribute(
        &mut self,
        program: ProgramHandle,
        name: &str,
        buffer: BufferHandle,
    ) -> Result<(), GpuError> {
        let info = self
            .buffers
            .get(buffer.0)
            .map(|b| b.info)
            .ok_or(GpuError::UnknownBuffer(buffer))?;
        let program = self
            .programs
            .get_mut(program.0)
            .ok_or(GpuError::UnknownProgram(program))?;
        program.bindings.bind(&program.layout, name, info)
    }

    fn set_uniform_matrix4(
        &mut self,
        program: ProgramHandle,
        name: &str,
        matrix: &Mat4,
    ) -> Result<(), GpuError> {
        let program = self.program(program)?;
        let uniform = program
            .layout
            .uniform_matrix(name)
            .ok_or_else(|| GpuError::UnknownUniform(name.to_owned()))?;
        let buffer = program
            .uniform_buffers
            .iter()
            .find(|(binding, _)| *binding == uniform.binding)
            .map(|(_, buffer)| buffer)
            .ok_or_else(|| GpuError::UnknownUniform(name.to_owned()))?;
        self.context.queue.write_buffer(
            buffer,
            uniform.offset,
            bytemuck::cast_slice(&matrix.to_cols_array()),
        );
        Ok(())
    }

    fn clear_and_draw_points(&mut self, vertex_count: u32) -> Result<(), GpuError> {
        let handle = self.active.ok_or(GpuError::NoActiveProgram)?;
        let program = self.program(handle)?;
        program.bindings.check_draw(&program.layout, vertex_count)?;

        let frame = self.context.get_next_frame().map_err(GpuError::Surface)?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.context.create_encoder();
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Lattice Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(
                    wgpu::RenderPassDepthStencilAttachment {
                        view: &self.depth.view,
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(1.0),
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    },
                ),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if vertex_count > 0 {
                pass.set_pipeline(&program.pipeline);
                pass.set_bind_group(0, &program.bind_group, &[]);
                for (slot, info) in program.bindings.bound() {
                    pass.set_vertex_buffer(slot, self.buffers[info.handle.0].buffer.slice(..));
                }
                pass.draw(0..vertex_count, 0..1);
            }
        }
        self.context.submit(encoder);
        frame.present();
        log::trace!("drew {vertex_count} points");
        Ok(())
    }
}
