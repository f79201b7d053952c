use crate::{shader::ShaderProgram, texture::Texture};

/// What a draw call binds, passed explicitly to every draw
///
/// There is no "currently bound" state anywhere else; a draw uses exactly the
/// program & texture named here (plus the renderer's tint uniform at group 0)
#[derive(Clone, Copy)]
pub struct Bindings<'a> {
    pub program: &'a ShaderProgram,
    pub texture: Option<&'a Texture>,
}

impl<'a> Bindings<'a> {
    pub fn new(program: &'a ShaderProgram) -> Self {
        Self {
            program,
            texture: None,
        }
    }

    pub fn with_texture(mut self, texture: &'a Texture) -> Self {
        self.texture = Some(texture);
        self
    }

    /// True if everything the program samples is bound
    pub fn is_complete(&self) -> bool {
        !self.program.textured() || self.texture.is_some()
    }
}
