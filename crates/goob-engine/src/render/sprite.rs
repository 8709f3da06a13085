use std::collections::{HashMap, HashSet};
use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::coords::{Transform, Vec2};
use crate::render::{RenderCtx, RenderTarget, Texture, TextureId, TextureStore};
use crate::scene::DrawList;

use super::common::{premul_alpha_blend, QuadVertex, ViewportUniform, QUAD_INDICES, QUAD_VERTICES};

// ── geometry ──────────────────────────────────────────────────────────────

/// Screen-space placement of one sprite: a parallelogram plus the texture
/// rectangle mapped onto it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SpriteQuad {
    /// Corner that maps to `uv_min` (top-left before rotation).
    pub origin: Vec2,
    /// Edge from `origin` towards the top-right corner.
    pub axis_x: Vec2,
    /// Edge from `origin` towards the bottom-left corner.
    pub axis_y: Vec2,
    pub uv_min: Vec2,
    pub uv_max: Vec2,
    pub alpha: f32,
}

impl SpriteQuad {
    /// Corners in order top-left, top-right, bottom-right, bottom-left.
    pub fn corners(&self) -> [Vec2; 4] {
        let o = self.origin;
        [o, o + self.axis_x, o + self.axis_x + self.axis_y, o + self.axis_y]
    }
}

/// Computes where `texture` lands for `transform`.
///
/// The destination size is the clip size times `transform.scale`; `anchor`
/// selects which point of it sits at `transform.pos` and `pivot` the
/// rotation centre, both relative to the destination rectangle. Rotation is
/// clockwise in radians.
///
/// Returns `None` when nothing would be visible: an empty clip area, both
/// scales near zero, or zero alpha.
pub fn sprite_quad(texture: &Texture, transform: &Transform, anchor: Vec2, pivot: Vec2) -> Option<SpriteQuad> {
    let clip = texture.clip;
    if clip.size.x <= 1e-8 || clip.size.y <= 1e-8 {
        return None;
    }
    if transform.scale.x.abs() < 1e-8 && transform.scale.y.abs() < 1e-8 {
        return None;
    }
    if texture.alpha() == 0.0 {
        return None;
    }

    let size = clip.size.mul_elem(transform.scale);
    let dst_origin = transform.pos - size.mul_elem(anchor);
    let pivot_pt = dst_origin + size.mul_elem(pivot);
    let rot = transform.rot;

    let tex_size = texture.size();
    let mut uv_min = Vec2::new(clip.origin.x / tex_size.x, clip.origin.y / tex_size.y);
    let mut uv_max = Vec2::new(clip.max().x / tex_size.x, clip.max().y / tex_size.y);
    if texture.flip.h {
        std::mem::swap(&mut uv_min.x, &mut uv_max.x);
    }
    if texture.flip.v {
        std::mem::swap(&mut uv_min.y, &mut uv_max.y);
    }

    Some(SpriteQuad {
        origin: pivot_pt + (dst_origin - pivot_pt).rotated(rot),
        axis_x: Vec2::new(size.x, 0.0).rotated(rot),
        axis_y: Vec2::new(0.0, size.y).rotated(rot),
        uv_min,
        uv_max,
        alpha: texture.alpha(),
    })
}

// ── renderer ──────────────────────────────────────────────────────────────

struct GpuTexture {
    // Kept alive for the bind group's view.
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

/// Draws the sprites of a [`DrawList`] as instanced textured quads.
///
/// Textures are uploaded on first use and cached by [`TextureId`]. Items
/// are drawn in paint order with one draw call per run of consecutive items
/// sharing a texture.
#[derive(Default)]
pub struct SpriteRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    viewport_bgl: Option<wgpu::BindGroupLayout>,
    texture_bgl: Option<wgpu::BindGroupLayout>,
    viewport_bind_group: Option<wgpu::BindGroup>,
    viewport_ubo: Option<wgpu::Buffer>,
    sampler: Option<wgpu::Sampler>,

    quad_vbo: Option<wgpu::Buffer>,
    quad_ibo: Option<wgpu::Buffer>,
    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,

    gpu_textures: HashMap<TextureId, GpuTexture>,
    oversized: HashSet<TextureId>,

    // Per-frame scratch, kept for its capacity.
    instances: Vec<SpriteInstance>,
    runs: Vec<(TextureId, Range<u32>)>,

    warned_missing_texture: bool,
}

impl SpriteRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of textures currently resident on the GPU.
    pub fn uploaded_textures(&self) -> usize {
        self.gpu_textures.len()
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draw_list: &mut DrawList,
        textures: &TextureStore,
    ) {
        self.ensure_pipeline(ctx);
        self.ensure_static_buffers(ctx);
        self.ensure_bindings(ctx);

        let mut instances = std::mem::take(&mut self.instances);
        let mut runs = std::mem::take(&mut self.runs);
        instances.clear();
        runs.clear();

        for item in draw_list.iter_in_paint_order() {
            let cmd = &item.cmd;
            let Some(texture) = textures.get(cmd.texture) else {
                if !self.warned_missing_texture {
                    log::warn!("SpriteRenderer: unknown {:?}; sprites using it are skipped", cmd.texture);
                    self.warned_missing_texture = true;
                }
                continue;
            };
            let Some(quad) = sprite_quad(texture, &cmd.transform, cmd.anchor, cmd.pivot) else {
                continue;
            };
            if !self.ensure_texture(ctx, cmd.texture, texture) {
                continue;
            }

            let index = instances.len() as u32;
            instances.push(SpriteInstance::from(quad));
            match runs.last_mut() {
                Some((id, range)) if *id == cmd.texture => range.end = index + 1,
                _ => runs.push((cmd.texture, index..index + 1)),
            }
        }

        if !instances.is_empty() {
            self.write_viewport_uniform(ctx);
            self.ensure_instance_capacity(ctx, instances.len());
            self.draw(ctx, target, &instances, &runs);
        }

        self.instances = instances;
        self.runs = runs;
    }

    fn draw(
        &self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        instances: &[SpriteInstance],
        runs: &[(TextureId, Range<u32>)],
    ) {
        let (Some(pipeline), Some(viewport_bg), Some(quad_vbo), Some(quad_ibo), Some(instance_vbo)) = (
            self.pipeline.as_ref(),
            self.viewport_bind_group.as_ref(),
            self.quad_vbo.as_ref(),
            self.quad_ibo.as_ref(),
            self.instance_vbo.as_ref(),
        ) else {
            return;
        };

        ctx.queue.write_buffer(instance_vbo, 0, bytemuck::cast_slice(instances));

        let mut rpass = target.begin_load_pass("goob sprite pass");
        ctx.apply_viewport(&mut rpass);
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, viewport_bg, &[]);
        rpass.set_vertex_buffer(0, quad_vbo.slice(..));
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));
        rpass.set_index_buffer(quad_ibo.slice(..), wgpu::IndexFormat::Uint16);

        for (id, range) in runs {
            let Some(gpu_tex) = self.gpu_textures.get(id) else { continue };
            rpass.set_bind_group(1, &gpu_tex.bind_group, &[]);
            rpass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, range.clone());
        }
    }

    /// Uploads `texture` if it is not resident yet. Returns `false` if it
    /// cannot be drawn.
    fn ensure_texture(&mut self, ctx: &RenderCtx<'_>, id: TextureId, texture: &Texture) -> bool {
        if self.gpu_textures.contains_key(&id) {
            return true;
        }
        if self.oversized.contains(&id) {
            return false;
        }
        let (Some(bgl), Some(sampler)) = (self.texture_bgl.as_ref(), self.sampler.as_ref()) else {
            return false;
        };

        let max_dim = ctx.device.limits().max_texture_dimension_2d;
        if texture.width() > max_dim || texture.height() > max_dim {
            log::warn!(
                "SpriteRenderer: {id:?} is {}x{}, above the device limit of {max_dim}; not drawn",
                texture.width(),
                texture.height()
            );
            self.oversized.insert(id);
            return false;
        }

        let size = wgpu::Extent3d {
            width: texture.width(),
            height: texture.height(),
            depth_or_array_layers: 1,
        };
        let gpu = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("goob sprite texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &gpu,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            texture.pixels(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * texture.width()),
                rows_per_image: Some(texture.height()),
            },
            size,
        );

        let view = gpu.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("goob sprite texture bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(&view) },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::Sampler(sampler) },
            ],
        });

        log::debug!("uploaded {id:?} ({}x{})", texture.width(), texture.height());
        self.gpu_textures.insert(id, GpuTexture { _texture: gpu, bind_group });
        true
    }

    // ── lazy-init helpers ──────────────────────────────────────────────────

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("goob sprite shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/sprite.wgsl").into()),
        });

        let viewport_bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("goob sprite viewport bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: Some(ViewportUniform::SIZE),
                },
                count: None,
            }],
        });

        let texture_bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("goob sprite texture bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("goob sprite pipeline layout"),
            bind_group_layouts: &[&viewport_bgl, &texture_bgl],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("goob sprite pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout(), SpriteInstance::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(premul_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Negative scales mirror the quad and flip its winding.
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.viewport_bgl = Some(viewport_bgl);
        self.texture_bgl = Some(texture_bgl);

        // Bind groups reference the old layouts.
        self.viewport_bind_group = None;
        self.viewport_ubo = None;
        self.gpu_textures.clear();
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.sampler.is_none() {
            self.sampler = Some(ctx.device.create_sampler(&wgpu::SamplerDescriptor {
                label: Some("goob sprite sampler"),
                address_mode_u: wgpu::AddressMode::ClampToEdge,
                address_mode_v: wgpu::AddressMode::ClampToEdge,
                address_mode_w: wgpu::AddressMode::ClampToEdge,
                mag_filter: wgpu::FilterMode::Linear,
                min_filter: wgpu::FilterMode::Linear,
                mipmap_filter: wgpu::MipmapFilterMode::Nearest,
                ..Default::default()
            }));
        }

        if self.viewport_bind_group.is_some() && self.viewport_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.viewport_bgl.as_ref() else { return };

        let viewport_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("goob sprite viewport ubo"),
            size: size_of::<ViewportUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("goob sprite viewport bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_ubo.as_entire_binding(),
            }],
        });

        self.viewport_ubo = Some(viewport_ubo);
        self.viewport_bind_group = Some(bind_group);
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.quad_vbo.is_some() && self.quad_ibo.is_some() {
            return;
        }
        self.quad_vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("goob sprite quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        }));
        self.quad_ibo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("goob sprite quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }

    fn write_viewport_uniform(&self, ctx: &RenderCtx<'_>) {
        let Some(ubo) = self.viewport_ubo.as_ref() else { return };
        let vp = ctx.viewport();
        let u = ViewportUniform {
            viewport: [vp.width.max(1.0), vp.height.max(1.0)],
            _pad: [0.0; 2],
        };
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&u));
    }

    fn ensure_instance_capacity(&mut self, ctx: &RenderCtx<'_>, required: usize) {
        if required <= self.instance_capacity && self.instance_vbo.is_some() {
            return;
        }
        let new_cap = required.next_power_of_two().max(256);
        self.instance_vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("goob sprite instance vbo"),
            size: (new_cap * size_of::<SpriteInstance>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.instance_capacity = new_cap;
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// Instance layout (64 bytes):
///
///  offset  0  origin  [f32; 2]   loc 1
///  offset  8  axis_x  [f32; 2]   loc 2
///  offset 16  axis_y  [f32; 2]   loc 3
///  offset 24  uv_min  [f32; 2]   loc 4
///  offset 32  uv_max  [f32; 2]   loc 5
///  offset 40  tint    [f32; 4]   loc 6
///  offset 56  _pad    [f32; 2]
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct SpriteInstance {
    origin: [f32; 2],
    axis_x: [f32; 2],
    axis_y: [f32; 2],
    uv_min: [f32; 2],
    uv_max: [f32; 2],
    tint: [f32; 4],
    _pad: [f32; 2],
}

impl From<SpriteQuad> for SpriteInstance {
    fn from(q: SpriteQuad) -> Self {
        Self {
            origin: [q.origin.x, q.origin.y],
            axis_x: [q.axis_x.x, q.axis_x.y],
            axis_y: [q.axis_y.x, q.axis_y.y],
            uv_min: [q.uv_min.x, q.uv_min.y],
            uv_max: [q.uv_max.x, q.uv_max.y],
            // Premultiplied white scaled by the texture's alpha.
            tint: [q.alpha; 4],
            _pad: [0.0; 2],
        }
    }
}

impl SpriteInstance {
    const ATTRS: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
        1 => Float32x2, // origin
        2 => Float32x2, // axis_x
        3 => Float32x2, // axis_y
        4 => Float32x2, // uv_min
        5 => Float32x2, // uv_max
        6 => Float32x4  // tint
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<SpriteInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}
