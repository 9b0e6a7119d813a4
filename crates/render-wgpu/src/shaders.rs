/// WGSL point-sprite shader.
///
/// WebGPU has no geometry stage, so each point is an instance and the four
/// quad corners come from `vertex_index` of a 4-vertex triangle strip.
/// Corner order matches `pixelsand_render::sprite::QUAD_CORNERS`.
pub const SPRITE_SHADER: &str = r#"
struct SpriteUniforms {
    point_size: f32,
    _pad0: f32,
    _pad1: f32,
    _pad2: f32,
};

@group(0) @binding(0)
var<uniform> uniforms: SpriteUniforms;

struct PointInput {
    @location(0) position: vec2<f32>,
    @location(3) color: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
};

@vertex
fn vs_sprite(@builtin(vertex_index) corner: u32, point: PointInput) -> VertexOutput {
    let offset = vec2<f32>(
        f32(corner & 1u) * 2.0 - 1.0,
        f32(corner >> 1u) * 2.0 - 1.0,
    );

    var out: VertexOutput;
    out.clip_position = vec4<f32>(point.position + offset * uniforms.point_size, 0.0, 1.0);
    out.color = point.color;
    return out;
}

@fragment
fn fs_tinted(in: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(in.color.r * 0.5, in.color.g, in.color.b, 1.0);
}

@fragment
fn fs_plain(in: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(in.color, 1.0);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shader_declares_pipeline_contract() {
        assert!(SPRITE_SHADER.contains("@location(0) position: vec2<f32>"));
        assert!(SPRITE_SHADER.contains("@location(3) color: vec3<f32>"));
        assert!(SPRITE_SHADER.contains("point_size: f32"));
        for entry in ["fn vs_sprite", "fn fs_tinted", "fn fs_plain"] {
            assert!(SPRITE_SHADER.contains(entry), "missing {entry}");
        }
    }

    #[test]
    fn corner_formula_matches_cpu_order() {
        // Mirror of the WGSL corner arithmetic.
        let corners: Vec<[f32; 2]> = (0u32..4)
            .map(|i| [(i & 1) as f32 * 2.0 - 1.0, (i >> 1) as f32 * 2.0 - 1.0])
            .collect();
        assert_eq!(corners, pixelsand_render::sprite::QUAD_CORNERS.to_vec());
    }
}
