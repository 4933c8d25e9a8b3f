/// Instanced rig cubes. Each instance carries its world matrix as four
/// column vectors plus a flat colour; shading is one directional light
/// over a fixed ambient term.
pub const MODEL_SHADER: &str = r#"
struct Camera {
    view_proj: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> camera: Camera;

struct CubeVertex {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct PartInstance {
    @location(2) world_x: vec4<f32>,
    @location(3) world_y: vec4<f32>,
    @location(4) world_z: vec4<f32>,
    @location(5) world_w: vec4<f32>,
    @location(6) tint: vec4<f32>,
};

struct Shaded {
    @builtin(position) clip: vec4<f32>,
    @location(0) normal: vec3<f32>,
    @location(1) tint: vec4<f32>,
};

const SUN: vec3<f32> = vec3<f32>(-0.4, 1.0, -0.6);
const AMBIENT: f32 = 0.35;

@vertex
fn vs_main(v: CubeVertex, part: PartInstance) -> Shaded {
    let world = mat4x4<f32>(part.world_x, part.world_y, part.world_z, part.world_w);

    var out: Shaded;
    out.clip = camera.view_proj * world * vec4<f32>(v.position, 1.0);
    // Rig parts are only rotated and translated, so the world matrix can
    // carry normals directly.
    out.normal = normalize((world * vec4<f32>(v.normal, 0.0)).xyz);
    out.tint = part.tint;
    return out;
}

@fragment
fn fs_main(in: Shaded) -> @location(0) vec4<f32> {
    let lambert = max(dot(in.normal, normalize(SUN)), 0.0);
    let light = mix(AMBIENT, 1.0, lambert);
    return vec4<f32>(in.tint.rgb * light, in.tint.a);
}
"#;

/// Floor grid drawn as a line list. Lines blend into the clear colour as
/// they move away from the origin so the grid edge is not visible.
pub const GRID_SHADER: &str = r#"
struct Camera {
    view_proj: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> camera: Camera;

struct LinePoint {
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
};

struct Line {
    @builtin(position) clip: vec4<f32>,
    @location(0) color: vec4<f32>,
    @location(1) ground: vec2<f32>,
};

const BACKDROP: vec3<f32> = vec3<f32>(0.1, 0.25, 0.5);
const FADE_START: f32 = 20.0;
const FADE_END: f32 = 50.0;

@vertex
fn vs_grid(p: LinePoint) -> Line {
    var out: Line;
    out.clip = camera.view_proj * vec4<f32>(p.position, 1.0);
    out.color = p.color;
    out.ground = p.position.xz;
    return out;
}

@fragment
fn fs_grid(in: Line) -> @location(0) vec4<f32> {
    let fade = smoothstep(FADE_START, FADE_END, length(in.ground));
    return vec4<f32>(mix(in.color.rgb, BACKDROP, fade), 1.0);
}
"#;
