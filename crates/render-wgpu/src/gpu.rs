use crate::shaders;
use bytemuck::{Pod, Zeroable};
use pixelsand_render::sprite::QUAD_VERTEX_COUNT;
use pixelsand_render::{ColorStage, Frame, PointSprite, SpriteBatch};
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
struct SpriteUniforms {
    point_size: f32,
    _pad: [f32; 3],
}

/// Per-instance point data. Field order fixes the attribute offsets.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
struct GpuPoint {
    position: [f32; 2],
    color: [f32; 3],
}

impl From<&PointSprite> for GpuPoint {
    fn from(p: &PointSprite) -> Self {
        Self {
            position: p.position.to_array(),
            color: p.color.to_array(),
        }
    }
}

const POINT_ATTRIBUTES: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
    0 => Float32x2,
    3 => Float32x3,
];

/// Instances allocated for a layer before it first grows.
const INITIAL_CAPACITY: u32 = 1024;

/// Instance capacity for `needed` points: powers of two, never shrinking.
fn grown_capacity(current: u32, needed: u32) -> u32 {
    if needed <= current {
        current
    } else {
        needed.next_power_of_two().max(INITIAL_CAPACITY)
    }
}

/// GPU resources owned by one frame layer.
struct LayerResources {
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    instance_buffer: wgpu::Buffer,
    capacity: u32,
}

impl LayerResources {
    fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, index: usize) -> Self {
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(format!("sprite_uniforms_{index}").as_str()),
            contents: bytemuck::bytes_of(&SpriteUniforms {
                point_size: 0.0,
                _pad: [0.0; 3],
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(format!("sprite_bind_group_{index}").as_str()),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        Self {
            instance_buffer: create_instance_buffer(device, INITIAL_CAPACITY, index),
            uniform_buffer,
            bind_group,
            capacity: INITIAL_CAPACITY,
        }
    }

    /// Upload one batch, growing the instance buffer if needed.
    fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        batch: &SpriteBatch,
        index: usize,
    ) {
        let needed = batch.sprites.len() as u32;
        let capacity = grown_capacity(self.capacity, needed);
        if capacity != self.capacity {
            tracing::debug!(
                layer = batch.label,
                from = self.capacity,
                to = capacity,
                "growing instance buffer"
            );
            self.instance_buffer = create_instance_buffer(device, capacity, index);
            self.capacity = capacity;
        }

        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&SpriteUniforms {
                point_size: batch.params.point_size(),
                _pad: [0.0; 3],
            }),
        );

        if needed > 0 {
            let points: Vec<GpuPoint> = batch.sprites.iter().map(GpuPoint::from).collect();
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&points));
        }
    }
}

fn create_instance_buffer(device: &wgpu::Device, capacity: u32, index: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(format!("sprite_instances_{index}").as_str()),
        size: capacity as u64 * std::mem::size_of::<GpuPoint>() as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_sprite_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    fragment_entry: &str,
    surface_format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(fragment_entry),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_sprite"),
            compilation_options: Default::default(),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<GpuPoint>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &POINT_ATTRIBUTES,
            }],
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(fragment_entry),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleStrip,
            strip_index_format: None,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: Default::default(),
        multiview: None,
        cache: None,
    })
}

/// wgpu point-sprite renderer: draws each [`Frame`] layer as one instanced
/// triangle-strip call.
pub struct SpriteRenderer {
    tinted_pipeline: wgpu::RenderPipeline,
    plain_pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    layers: Vec<LayerResources>,
}

impl SpriteRenderer {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sprite_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sprite_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sprite_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::SPRITE_SHADER.into()),
        });

        let tinted_pipeline =
            create_sprite_pipeline(device, &pipeline_layout, &shader, "fs_tinted", surface_format);
        let plain_pipeline =
            create_sprite_pipeline(device, &pipeline_layout, &shader, "fs_plain", surface_format);

        tracing::debug!(?surface_format, "sprite pipelines created");

        Self {
            tinted_pipeline,
            plain_pipeline,
            bind_group_layout,
            layers: Vec::new(),
        }
    }

    fn pipeline_for(&self, stage: ColorStage) -> &wgpu::RenderPipeline {
        match stage {
            ColorStage::Tinted => &self.tinted_pipeline,
            ColorStage::Plain => &self.plain_pipeline,
        }
    }

    /// Render one frame: clear, then each layer in order.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        frame: &Frame,
    ) {
        while self.layers.len() < frame.layers.len() {
            let index = self.layers.len();
            self.layers
                .push(LayerResources::new(device, &self.bind_group_layout, index));
        }
        for (index, (resources, batch)) in self.layers.iter_mut().zip(&frame.layers).enumerate() {
            resources.upload(device, queue, batch, index);
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("sprite_encoder"),
        });

        {
            let [r, g, b, a] = frame.clear_color.map(f64::from);
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("sprite_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            for (resources, batch) in self.layers.iter().zip(&frame.layers) {
                if batch.sprites.is_empty() {
                    continue;
                }
                pass.set_pipeline(self.pipeline_for(batch.stage));
                pass.set_bind_group(0, &resources.bind_group, &[]);
                pass.set_vertex_buffer(0, resources.instance_buffer.slice(..));
                pass.draw(0..QUAD_VERTEX_COUNT, 0..batch.sprites.len() as u32);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }
}
