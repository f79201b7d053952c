mod config;
mod scene;

use std::{process, sync::Arc};

use config::DemoConfig;
use scene::Scene;
use trigon_app::{
    AppConfig, AppHandler, AppRunner, BoxError, Window, input::Input, time::FrameTimer,
};
use trigon_render::{Renderer, TintUniform};

struct Demo {
    config: DemoConfig,
    scene: Option<Scene>,
}

impl AppHandler<Renderer> for Demo {
    async fn with_resource(&mut self, window: Arc<Window>) -> Result<Renderer, BoxError> {
        let size = window.inner_size();
        let mut renderer = Renderer::new(size.width, size.height, window).await?;
        renderer.set_clear_color(self.config.clear_color);
        Ok(renderer)
    }

    fn load(&mut self, renderer: &mut Renderer) -> Result<(), BoxError> {
        self.scene = Some(Scene::load(renderer, &self.config)?);
        Ok(())
    }

    fn frame(&mut self, renderer: &mut Renderer, _input: &Input, timer: &FrameTimer) {
        if let Some(scene) = &self.scene {
            renderer.set_tint(TintUniform::at(timer.elapsed()));
            scene.draw(renderer);
        }
    }

    fn resize(&mut self, w: u32, h: u32, renderer: &mut Renderer) {
        renderer.resize(w, h);
    }

    fn on_quit(&mut self) {
        log::info!("shutting down");
    }
}

fn main() {
    let demo = Demo {
        config: DemoConfig::default(),
        scene: None,
    };

    if let Err(err) = AppRunner::new(demo, AppConfig::default()).run() {
        eprintln!("trigon: {err}");
        process::exit(1);
    }
}
