use std::path::PathBuf;

/// Where the demo finds its shaders & texture, relative to the working directory
pub struct DemoConfig {
    pub color_vertex_shader: PathBuf,
    pub color_fragment_shader: PathBuf,
    pub textured_vertex_shader: PathBuf,
    pub textured_fragment_shader: PathBuf,
    /// Texture for the quad; `None` draws the triangle alone
    pub texture: Option<PathBuf>,
    pub clear_color: [f64; 4],
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            color_vertex_shader: "shaders/color.vert.wgsl".into(),
            color_fragment_shader: "shaders/color.frag.wgsl".into(),
            textured_vertex_shader: "shaders/textured.vert.wgsl".into(),
            textured_fragment_shader: "shaders/textured.frag.wgsl".into(),
            texture: Some("assets/checker.png".into()),
            clear_color: [0.0, 0.5, 1.0, 1.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trigon_render::{Stage, TextureImage, shader::validate_stage};

    #[test]
    fn default_shaders_exist_and_validate() {
        let config = DemoConfig::default();
        let stages = [
            (Stage::Vertex, &config.color_vertex_shader),
            (Stage::Fragment, &config.color_fragment_shader),
            (Stage::Vertex, &config.textured_vertex_shader),
            (Stage::Fragment, &config.textured_fragment_shader),
        ];

        for (stage, path) in stages {
            let source = std::fs::read_to_string(path).unwrap();
            assert!(validate_stage(stage, &source).is_ok(), "{}", path.display());
        }
    }

    #[test]
    fn default_texture_decodes() {
        let path = DemoConfig::default().texture.unwrap();
        let image = TextureImage::open(path).unwrap();
        let (width, _) = image.dimensions();
        assert_eq!(image.stride(), width * 4);
    }
}
