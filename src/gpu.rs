//! wgpu backend for particle uniforms.
//!
//! [`UniformBlock`] is a [`MaterialSink`] that packs every buffer-backed
//! uniform into one `#[repr(C)]` struct matching [`PARTICLE_UNIFORMS_WGSL`].
//! [`GpuMaterial`] owns the uniform buffer and writes the block through a
//! [`wgpu::Queue`]. Keywords are not uniforms: prepend
//! [`UniformBlock::shader_prelude`] to the shader source instead.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::binder::Binding;
use crate::config::TextureHandle;
use crate::keywords::{Keyword, KeywordSet};
use crate::plane::MAX_COLLISION_PLANES;
use crate::sink::{Applied, MaterialSink, MeshTarget};
use crate::uniforms::{names, UniformValue};

/// WGSL declaration matching [`ParticleUniformsGpu`].
pub const PARTICLE_UNIFORMS_WGSL: &str = r#"struct ParticleUniforms {
    start_color: vec4<f32>,
    collision_planes: array<vec4<f32>, 4>,
    start_size: f32,
    rate_over_time: f32,
    start_speed: f32,
    start_lifetime: f32,
    start_delay: f32,
    cone_angle: f32,
    gravity_modifier: f32,
    max_particles: i32,
};"#;

/// GPU layout of the particle uniforms. 112 bytes, no padding.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ParticleUniformsGpu {
    pub start_color: [f32; 4],
    pub collision_planes: [[f32; 4]; MAX_COLLISION_PLANES],
    pub start_size: f32,
    pub rate_over_time: f32,
    pub start_speed: f32,
    pub start_lifetime: f32,
    pub start_delay: f32,
    pub cone_angle: f32,
    pub gravity_modifier: f32,
    pub max_particles: i32,
}

/// CPU-side staging copy of a particle material.
#[derive(Clone, Debug, Default)]
pub struct UniformBlock {
    data: ParticleUniformsGpu,
    keywords: KeywordSet,
    texture: Option<TextureHandle>,
}

impl UniformBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(&self) -> &ParticleUniformsGpu {
        &self.data
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(&self.data)
    }

    pub fn keywords(&self) -> KeywordSet {
        self.keywords
    }

    /// Texture the renderer should bind next to the uniform buffer.
    pub fn texture(&self) -> Option<TextureHandle> {
        self.texture
    }

    /// Keyword constants followed by the uniform struct declaration.
    pub fn shader_prelude(&self) -> String {
        format!(
            "{}\n\n{}\n",
            self.keywords.to_wgsl_constants(),
            PARTICLE_UNIFORMS_WGSL
        )
    }

    fn set_f32(&mut self, name: &str, v: f32) {
        let d = &mut self.data;
        match name {
            names::START_SIZE => d.start_size = v,
            names::RATE_OVER_TIME => d.rate_over_time = v,
            names::START_SPEED => d.start_speed = v,
            names::START_LIFETIME => d.start_lifetime = v,
            names::START_DELAY => d.start_delay = v,
            names::CONE_ANGLE => d.cone_angle = v,
            names::GRAVITY_MODIFIER => d.gravity_modifier = v,
            _ => log::debug!("Ignoring unknown float uniform {}", name),
        }
    }

    fn set_vec4(&mut self, name: &str, v: glam::Vec4) {
        if name == names::START_COLOR {
            self.data.start_color = v.to_array();
        } else if let Some(i) = names::COLLISION_PLANE_EQUATION
            .iter()
            .position(|n| *n == name)
        {
            self.data.collision_planes[i] = v.to_array();
        } else {
            log::debug!("Ignoring unknown vec4 uniform {}", name);
        }
    }
}

impl MaterialSink for UniformBlock {
    fn set_uniform(&mut self, name: &str, value: &UniformValue) {
        match *value {
            UniformValue::F32(v) => self.set_f32(name, v),
            UniformValue::I32(v) if name == names::MAX_PARTICLES => self.data.max_particles = v,
            UniformValue::I32(_) => log::debug!("Ignoring unknown int uniform {}", name),
            UniformValue::Vec4(v) => self.set_vec4(name, v),
            UniformValue::Texture(t) => self.texture = Some(t),
        }
    }

    fn set_keyword(&mut self, keyword: Keyword, enabled: bool) {
        self.keywords.set(keyword, enabled);
    }

    fn clear_uniform(&mut self, name: &str) {
        if name == names::TEXTURE {
            self.texture = None;
        } else if let Some(i) = names::COLLISION_PLANE_EQUATION
            .iter()
            .position(|n| *n == name)
        {
            self.data.collision_planes[i] = [0.0; 4];
        }
    }
}

/// Uniform buffer holding a [`ParticleUniformsGpu`].
pub struct GpuMaterial {
    block: UniformBlock,
    buffer: wgpu::Buffer,
}

impl GpuMaterial {
    pub fn new(device: &wgpu::Device) -> Self {
        let block = UniformBlock::new();
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Particle Billboard Uniforms"),
            contents: block.as_bytes(),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        Self { block, buffer }
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    pub fn block(&self) -> &UniformBlock {
        &self.block
    }

    /// Layout entry for binding the uniform buffer at `binding`.
    pub fn layout_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
        wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: wgpu::BufferSize::new(
                    std::mem::size_of::<ParticleUniformsGpu>() as u64,
                ),
            },
            count: None,
        }
    }

    /// Apply a binding and write the result to the GPU.
    pub fn upload(
        &mut self,
        queue: &wgpu::Queue,
        binding: &Binding,
        mesh: Option<&mut dyn MeshTarget>,
    ) -> Applied {
        let applied = binding.apply(Some(&mut self.block), mesh);
        queue.write_buffer(&self.buffer, 0, self.block.as_bytes());
        applied
    }
}
