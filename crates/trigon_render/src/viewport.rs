use wgpu::RenderPass;

/// Tracks the framebuffer size & hands out one viewport update per resize
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    size: (u32, u32),
    pending: Option<(u32, u32)>,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            pending: None,
        }
    }

    /// Records a new framebuffer size, returning false for zero-sized (minimized) windows
    ///
    /// Several resizes before the next frame collapse into the last one
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.pending = Some((width, height));
        true
    }

    /// Takes the pending update, if any; a second call before the next resize returns `None`
    pub fn take_update(&mut self) -> Option<(u32, u32)> {
        let update = self.pending.take()?;
        self.size = update;
        Some(update)
    }

    /// Applies the pending update to `pass`
    pub fn apply(&mut self, pass: &mut RenderPass<'_>) {
        let (old_w, old_h) = self.size;
        if let Some((w, h)) = self.take_update() {
            log::debug!("viewport {old_w}x{old_h} -> {w}x{h}");
            pass.set_viewport(0.0, 0.0, w as f32, h as f32, 0.0, 1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_yields_exactly_one_update() {
        let mut viewport = Viewport::new(800, 600);
        assert_eq!(viewport.take_update(), None);

        assert!(viewport.resize(1024, 768));
        assert_eq!(viewport.take_update(), Some((1024, 768)));
        assert_eq!(viewport.take_update(), None);
        assert_eq!(viewport.size, (1024, 768));
    }

    #[test]
    fn resizes_between_frames_collapse_to_the_latest() {
        let mut viewport = Viewport::new(800, 600);
        viewport.resize(640, 480);
        viewport.resize(1280, 720);

        assert_eq!(viewport.pending, Some((1280, 720)));
        assert_eq!(viewport.size, (800, 600));
        assert_eq!(viewport.take_update(), Some((1280, 720)));
        assert_eq!(viewport.take_update(), None);
    }

    #[test]
    fn minimized_window_is_ignored() {
        let mut viewport = Viewport::new(800, 600);
        assert!(!viewport.resize(0, 0));
        assert!(!viewport.resize(800, 0));
        assert_eq!(viewport.take_update(), None);
        assert_eq!(viewport.size, (800, 600));
    }
}
