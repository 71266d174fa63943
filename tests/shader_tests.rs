use std::fs;
use std::path::Path;

fn read_shader(name: &str) -> String {
    let shader_path = Path::new("src/shaders").join(name);
    fs::read_to_string(&shader_path).expect("Failed to read shader file")
}

#[test]
fn test_shader_files_exist() {
    for name in ["triangle.wgsl", "compute.wgsl"] {
        let shader_path = Path::new("src/shaders").join(name);
        assert!(shader_path.exists(), "Shader file should exist at {:?}", shader_path);
    }
}

#[test]
fn test_triangle_shader_entry_points() {
    let shader_content = read_shader("triangle.wgsl");

    assert!(shader_content.contains("@vertex"), "Shader should contain vertex entry point");
    assert!(shader_content.contains("@fragment"), "Shader should contain fragment entry point");
    assert!(shader_content.contains("fn vertex_main"), "Shader should have vertex_main function");
    assert!(shader_content.contains("fn fragment_main"), "Shader should have fragment_main function");
}

#[test]
fn test_triangle_shader_vertex_attributes() {
    let shader_content = read_shader("triangle.wgsl");

    assert!(shader_content.contains("@location(0) position: vec4<f32>"), "Position should be a vec4 at location 0");
    assert!(shader_content.contains("@location(1) color: vec4<f32>"), "Color should be a vec4 at location 1");
}

#[test]
fn test_compute_shader_binding_and_workgroup() {
    let shader_content = read_shader("compute.wgsl");

    assert!(shader_content.contains("@compute @workgroup_size(64)"), "Kernel should use 64-wide workgroups");
    assert!(shader_content.contains("fn main"), "Kernel entry point should be main");
    assert!(shader_content.contains("@group(0) @binding(0)"), "Storage buffer should be bound at slot 0");
    assert!(shader_content.contains("var<storage, read_write>"), "Output should be a writable storage buffer");
    assert!(shader_content.contains("arrayLength(&output)"), "Kernel should guard against out-of-range invocations");
}
