//! Point-sprite starfield material
//!
//! Sprites are camera-facing quads; the vertex stage carries the particle
//! center so the shader can derive the twinkle phase from its local Y. The
//! `time` uniform is the only thing that has to change per frame to animate
//! a static field.

use bevy::asset::RenderAssetUsages;
use bevy::mesh::{Indices, MeshVertexAttribute, MeshVertexBufferLayoutRef, PrimitiveTopology};
use bevy::pbr::{MaterialPipeline, MaterialPipelineKey};
use bevy::prelude::*;
use bevy::render::render_resource::{
    AsBindGroup, RenderPipelineDescriptor, SpecializedMeshPipelineError, VertexFormat,
};
use bevy::shader::ShaderRef;
use rand::Rng;

/// Per-particle sprite size, replicated on each corner vertex.
pub const ATTRIBUTE_SPRITE_SIZE: MeshVertexAttribute =
    MeshVertexAttribute::new("Vertex_SpriteSize", 988_540_917, VertexFormat::Float32);

/// Fixed palette star tints are drawn from.
pub const STAR_PALETTE: [Color; 4] = [
    Color::srgb(1.0, 1.0, 1.0),
    Color::srgb(1.0, 0.667, 0.0),
    Color::srgb(0.0, 0.667, 1.0),
    Color::srgb(0.667, 0.667, 1.0),
];

/// Pick a palette color once at construction time.
pub fn pick_star_color<R: Rng>(rng: &mut R) -> Color {
    STAR_PALETTE[rng.gen_range(0..STAR_PALETTE.len())]
}

#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct StarfieldMaterial {
    #[uniform(0)]
    pub color: LinearRgba,
    #[uniform(1)]
    pub time: f32,
}

impl StarfieldMaterial {
    pub fn new(color: Color) -> Self {
        Self {
            color: color.to_linear(),
            time: 0.0,
        }
    }
}

impl Material for StarfieldMaterial {
    fn vertex_shader() -> ShaderRef {
        "shaders/starfield.wgsl".into()
    }

    fn fragment_shader() -> ShaderRef {
        "shaders/starfield.wgsl".into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        AlphaMode::Blend
    }

    fn specialize(
        _pipeline: &MaterialPipeline,
        descriptor: &mut RenderPipelineDescriptor,
        layout: &MeshVertexBufferLayoutRef,
        _key: MaterialPipelineKey<Self>,
    ) -> Result<(), SpecializedMeshPipelineError> {
        let vertex_layout = layout.0.get_layout(&[
            Mesh::ATTRIBUTE_POSITION.at_shader_location(0),
            Mesh::ATTRIBUTE_UV_0.at_shader_location(1),
            ATTRIBUTE_SPRITE_SIZE.at_shader_location(2),
        ])?;
        descriptor.vertex.buffers = vec![vertex_layout];
        descriptor.primitive.cull_mode = None;
        if let Some(depth_stencil) = descriptor.depth_stencil.as_mut() {
            depth_stencil.depth_write_enabled = false;
        }
        Ok(())
    }
}

pub struct StarfieldMaterialPlugin;

impl Plugin for StarfieldMaterialPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(MaterialPlugin::<StarfieldMaterial>::default());
    }
}

const QUAD_CORNERS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

/// Build a sprite mesh from particle centers and sizes: one quad per
/// particle, the center replicated on all four corners. The corner offset
/// lives in UV space and is expanded to a camera-facing billboard in the
/// vertex shader.
pub fn sprite_mesh(positions: &[Vec3], sizes: &[f32]) -> Mesh {
    debug_assert_eq!(positions.len(), sizes.len());

    let count = positions.len();
    let mut centers = Vec::with_capacity(count * 4);
    let mut corners = Vec::with_capacity(count * 4);
    let mut sprite_sizes = Vec::with_capacity(count * 4);
    let mut indices = Vec::with_capacity(count * 6);

    for (i, (p, s)) in positions.iter().zip(sizes.iter()).enumerate() {
        for corner in QUAD_CORNERS {
            centers.push([p.x, p.y, p.z]);
            corners.push(corner);
            sprite_sizes.push(*s);
        }
        let base = (i * 4) as u32;
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::default(),
    );
    mesh.insert_indices(Indices::U32(indices));
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, centers);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, corners);
    mesh.insert_attribute(ATTRIBUTE_SPRITE_SIZE, sprite_sizes);
    mesh
}

/// Rewrite the particle centers of a mesh built by [`sprite_mesh`].
pub fn write_sprite_centers(mesh: &mut Mesh, positions: &[Vec3]) {
    let mut centers = Vec::with_capacity(positions.len() * 4);
    for p in positions {
        for _ in 0..4 {
            centers.push([p.x, p.y, p.z]);
        }
    }
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, centers);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_sprite_mesh_layout() {
        let positions = vec![Vec3::X, Vec3::Y, Vec3::new(1.0, 2.0, 3.0)];
        let sizes = vec![1.0, 2.0, 0.5];
        let mesh = sprite_mesh(&positions, &sizes);

        assert_eq!(mesh.count_vertices(), 12);
        let Some(Indices::U32(indices)) = mesh.indices() else {
            panic!("expected u32 indices");
        };
        assert_eq!(indices.len(), 18);
        // Two triangles per particle, all indices inside the vertex range.
        assert!(indices.iter().all(|&i| i < 12));
    }

    #[test]
    fn test_write_sprite_centers_replicates_per_corner() {
        let mut mesh = sprite_mesh(&[Vec3::ZERO], &[1.0]);
        write_sprite_centers(&mut mesh, &[Vec3::new(4.0, 5.0, 6.0)]);

        let positions = mesh
            .attribute(Mesh::ATTRIBUTE_POSITION)
            .and_then(|a| a.as_float3())
            .expect("position attribute");
        assert_eq!(positions.len(), 4);
        for p in positions {
            assert_eq!(*p, [4.0, 5.0, 6.0]);
        }
    }

    #[test]
    fn test_pick_star_color_stays_in_palette() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..32 {
            let c = pick_star_color(&mut rng);
            assert!(STAR_PALETTE.contains(&c));
        }
    }
}
