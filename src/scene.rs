use trigon_render::{
    Bindings, ColorVertex, Mesh, MeshData, RenderError, Renderer, ShaderProgram, Texture,
    TextureImage, TexturedVertex,
};

use crate::config::DemoConfig;

struct TexturedQuad {
    program: ShaderProgram,
    mesh: Mesh<TexturedVertex>,
    texture: Texture,
}

/// Everything uploaded before the first frame; nothing here changes afterwards
pub struct Scene {
    program: ShaderProgram,
    triangle: Mesh<ColorVertex>,
    quad: Option<TexturedQuad>,
}

impl Scene {
    pub fn load(renderer: &Renderer, config: &DemoConfig) -> Result<Self, RenderError> {
        let program = renderer.build_program::<ColorVertex>(
            "color",
            &config.color_vertex_shader,
            &config.color_fragment_shader,
            false,
        )?;
        let triangle = renderer.upload_mesh(&MeshData::triangle());

        let quad = match &config.texture {
            Some(path) => {
                let image = TextureImage::open(path)?;
                Some(TexturedQuad {
                    program: renderer.build_program::<TexturedVertex>(
                        "textured",
                        &config.textured_vertex_shader,
                        &config.textured_fragment_shader,
                        true,
                    )?,
                    mesh: renderer.upload_mesh(&MeshData::quad()),
                    texture: renderer.upload_texture(&image),
                })
            }
            None => None,
        };

        Ok(Self {
            program,
            triangle,
            quad,
        })
    }

    /// Clears, draws the quad (if any) & the triangle, then presents
    pub fn draw(&self, renderer: &mut Renderer) {
        let Some(mut frame) = renderer.begin_frame() else {
            return;
        };

        {
            let mut pass = renderer.begin_render_pass(&mut frame);
            if let Some(quad) = &self.quad {
                let bindings = Bindings::new(&quad.program).with_texture(&quad.texture);
                renderer.draw(&mut pass, &bindings, &quad.mesh);
            }
            renderer.draw(&mut pass, &Bindings::new(&self.program), &self.triangle);
        }

        renderer.end_frame(frame);
    }
}
