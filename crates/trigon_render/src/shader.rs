use std::{fmt, fs, path::Path};

use naga::valid::{Capabilities, ValidationFlags, Validator};
use wgpu::{
    BindGroupLayout, BlendState, ColorTargetState, ColorWrites, CompareFunction,
    DepthStencilState, Device, ErrorFilter, FragmentState, PipelineLayoutDescriptor, RenderPass,
    RenderPipeline, RenderPipelineDescriptor, ShaderModule, ShaderModuleDescriptor, ShaderSource,
    TextureFormat, VertexBufferLayout, VertexState,
};

use crate::error::RenderError;

/// A single programmable stage of a render pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Vertex,
    Fragment,
}

impl Stage {
    fn naga(self) -> naga::ShaderStage {
        match self {
            Stage::Vertex => naga::ShaderStage::Vertex,
            Stage::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Vertex => "vertex",
            Stage::Fragment => "fragment",
        })
    }
}

/// Compiles stages & links them into programs
///
/// Compiled stages are plain owned values; dropping one releases it. The builder
/// relies on that to release every stage exactly once, whichever way it returns
pub trait ShaderBackend {
    type Stage;
    type Program;

    /// Compiles `source` as `stage`, returning the diagnostic log on failure
    fn compile_stage(&self, stage: Stage, source: &str) -> Result<Self::Stage, String>;

    /// Links two compiled stages, returning the diagnostic log on failure
    fn link(&self, vertex: &Self::Stage, fragment: &Self::Stage) -> Result<Self::Program, String>;
}

/// Compiles the vertex & fragment sources and links them into a program
pub fn build<B: ShaderBackend>(
    backend: &B,
    vertex_source: &str,
    fragment_source: &str,
) -> Result<B::Program, RenderError> {
    let vertex = compile(backend, Stage::Vertex, vertex_source)?;
    let fragment = compile(backend, Stage::Fragment, fragment_source)?;

    let program = backend
        .link(&vertex, &fragment)
        .map_err(|log| RenderError::ProgramLink {
            log: non_empty(log, "link failed without a diagnostic"),
        })?;

    log::debug!("linked shader program");
    Ok(program)
}

/// Reads both stage files from disk, then [`build`]s them
pub fn build_from_files<B: ShaderBackend>(
    backend: &B,
    vertex_path: impl AsRef<Path>,
    fragment_path: impl AsRef<Path>,
) -> Result<B::Program, RenderError> {
    let vertex_source = read_source(vertex_path.as_ref())?;
    let fragment_source = read_source(fragment_path.as_ref())?;
    build(backend, &vertex_source, &fragment_source)
}

fn read_source(path: &Path) -> Result<String, RenderError> {
    log::info!("loading shader {}", path.display());
    fs::read_to_string(path).map_err(|source| RenderError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

fn compile<B: ShaderBackend>(
    backend: &B,
    stage: Stage,
    source: &str,
) -> Result<B::Stage, RenderError> {
    backend
        .compile_stage(stage, source)
        .map_err(|log| RenderError::ShaderCompile {
            stage,
            code: source.to_owned(),
            log: non_empty(log, "compilation failed without a diagnostic"),
        })
}

fn non_empty(log: String, fallback: &str) -> String {
    if log.trim().is_empty() {
        fallback.to_owned()
    } else {
        log
    }
}

/// Parses & validates WGSL, returning the name of the entry point for `stage`
///
/// On failure the diagnostic is rendered against `source` so it carries line
/// & column information
pub fn validate_stage(stage: Stage, source: &str) -> Result<String, String> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| e.emit_to_string(source))?;

    Validator::new(ValidationFlags::all(), Capabilities::all())
        .validate(&module)
        .map_err(|e| e.emit_to_string(source))?;

    module
        .entry_points
        .iter()
        .find(|ep| ep.stage == stage.naga())
        .map(|ep| ep.name.clone())
        .ok_or_else(|| format!("no @{stage} entry point in module"))
}

/// Everything a program needs to know about the pipeline it will run in
pub struct ProgramLayout<'a> {
    pub label: &'a str,
    pub bind_group_layouts: &'a [&'a BindGroupLayout],
    pub vertex_buffers: &'a [VertexBufferLayout<'a>],
    pub color_format: TextureFormat,
    pub depth_format: Option<TextureFormat>,
}

/// A WGSL stage compiled into a `wgpu` shader module
pub struct CompiledStage {
    module: ShaderModule,
    entry_point: String,
}

/// A linked program, ready to bind in a render pass
pub struct ShaderProgram {
    pipeline: RenderPipeline,
    textured: bool,
}

impl ShaderProgram {
    /// True if the program samples a texture from bind group 1
    pub fn textured(&self) -> bool {
        self.textured
    }

    pub fn bind(&self, pass: &mut RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
    }
}

/// [`ShaderBackend`] that compiles through `naga` & links into a `wgpu` pipeline
pub struct GpuBackend<'a> {
    device: &'a Device,
    layout: ProgramLayout<'a>,
}

impl<'a> GpuBackend<'a> {
    pub fn new(device: &'a Device, layout: ProgramLayout<'a>) -> Self {
        Self { device, layout }
    }

    /// Runs `f` inside a validation error scope, turning any captured device error into a log
    fn scoped<T>(&self, f: impl FnOnce() -> T) -> Result<T, String> {
        self.device.push_error_scope(ErrorFilter::Validation);
        let value = f();
        match pollster::block_on(self.device.pop_error_scope()) {
            Some(err) => Err(err.to_string()),
            None => Ok(value),
        }
    }
}

/// Names a stage module after its program, e.g. "color vertex"
fn stage_label(program: &str, stage: Stage) -> String {
    format!("{program} {stage}")
}

impl ShaderBackend for GpuBackend<'_> {
    type Stage = CompiledStage;
    type Program = ShaderProgram;

    fn compile_stage(&self, stage: Stage, source: &str) -> Result<CompiledStage, String> {
        let entry_point = validate_stage(stage, source)?;
        let label = stage_label(self.layout.label, stage);
        let module = self.scoped(|| {
            self.device.create_shader_module(ShaderModuleDescriptor {
                label: Some(&label),
                source: ShaderSource::Wgsl(source.into()),
            })
        })?;

        Ok(CompiledStage {
            module,
            entry_point,
        })
    }

    fn link(
        &self,
        vertex: &CompiledStage,
        fragment: &CompiledStage,
    ) -> Result<ShaderProgram, String> {
        let layout = &self.layout;
        let pipeline = self.scoped(|| {
            let pipeline_layout = self.device.create_pipeline_layout(&PipelineLayoutDescriptor {
                label: Some(layout.label),
                bind_group_layouts: layout.bind_group_layouts,
                push_constant_ranges: &[],
            });

            self.device.create_render_pipeline(&RenderPipelineDescriptor {
                label: Some(layout.label),
                layout: Some(&pipeline_layout),
                vertex: VertexState {
                    module: &vertex.module,
                    entry_point: Some(vertex.entry_point.as_str()),
                    buffers: layout.vertex_buffers,
                    compilation_options: Default::default(),
                },
                primitive: Default::default(),
                depth_stencil: layout.depth_format.map(|format| DepthStencilState {
                    format,
                    depth_write_enabled: true,
                    depth_compare: CompareFunction::Less,
                    stencil: Default::default(),
                    bias: Default::default(),
                }),
                multisample: Default::default(),
                fragment: Some(FragmentState {
                    module: &fragment.module,
                    entry_point: Some(fragment.entry_point.as_str()),
                    targets: &[Some(ColorTargetState {
                        format: layout.color_format,
                        blend: Some(BlendState::REPLACE),
                        write_mask: ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                multiview: None,
                cache: None,
            })
        })?;

        Ok(ShaderProgram {
            pipeline,
            textured: layout.bind_group_layouts.len() > 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::RefCell, rc::Rc};

    type Released = Rc<RefCell<Vec<Stage>>>;

    struct MockStage {
        stage: Stage,
        released: Released,
    }

    impl Drop for MockStage {
        fn drop(&mut self) {
            self.released.borrow_mut().push(self.stage);
        }
    }

    #[derive(Default)]
    struct MockBackend {
        released: Released,
        link_log: Option<String>,
    }

    impl ShaderBackend for MockBackend {
        type Stage = MockStage;
        type Program = (Stage, Stage);

        fn compile_stage(&self, stage: Stage, source: &str) -> Result<MockStage, String> {
            if source.contains("!!") {
                return Err(format!("0:1(1): error: syntax error, unexpected '!' in {stage}"));
            }
            if source.contains("quiet") {
                return Err(String::new());
            }
            Ok(MockStage {
                stage,
                released: self.released.clone(),
            })
        }

        fn link(&self, vertex: &MockStage, fragment: &MockStage) -> Result<Self::Program, String> {
            match &self.link_log {
                Some(log) => Err(log.clone()),
                None => Ok((vertex.stage, fragment.stage)),
            }
        }
    }

    fn released(backend: &MockBackend) -> Vec<Stage> {
        let mut stages = backend.released.borrow().clone();
        stages.sort_by_key(|s| *s as u8);
        stages
    }

    #[test]
    fn successful_build_releases_both_stages_once() {
        let backend = MockBackend::default();
        let program = build(&backend, "vs", "fs").unwrap();

        assert_eq!(program, (Stage::Vertex, Stage::Fragment));
        assert_eq!(released(&backend), vec![Stage::Vertex, Stage::Fragment]);
    }

    #[test]
    fn invalid_vertex_source_reports_stage_source_and_log() {
        let backend = MockBackend::default();
        let err = build(&backend, "!! nonsense", "fs").unwrap_err();

        match err {
            RenderError::ShaderCompile { stage, code, log } => {
                assert_eq!(stage, Stage::Vertex);
                assert_eq!(code, "!! nonsense");
                assert!(!log.is_empty());
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(released(&backend).is_empty());
    }

    #[test]
    fn invalid_fragment_source_still_releases_vertex_stage() {
        let backend = MockBackend::default();
        let err = build(&backend, "vs", "!! nonsense").unwrap_err();

        assert!(matches!(
            err,
            RenderError::ShaderCompile {
                stage: Stage::Fragment,
                ..
            }
        ));
        assert_eq!(released(&backend), vec![Stage::Vertex]);
    }

    #[test]
    fn link_failure_releases_both_stages_once() {
        let backend = MockBackend {
            link_log: Some("location 0 is not provided by the previous stage".into()),
            ..Default::default()
        };
        let err = build(&backend, "vs", "fs").unwrap_err();

        match err {
            RenderError::ProgramLink { log } => assert!(log.contains("location 0")),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(released(&backend), vec![Stage::Vertex, Stage::Fragment]);
    }

    #[test]
    fn empty_diagnostics_are_never_reported() {
        let backend = MockBackend::default();
        let compile = build(&backend, "quiet", "fs").unwrap_err();
        assert!(matches!(compile, RenderError::ShaderCompile { log, .. } if !log.is_empty()));

        let backend = MockBackend {
            link_log: Some(String::new()),
            ..Default::default()
        };
        let link = build(&backend, "vs", "fs").unwrap_err();
        assert!(matches!(link, RenderError::ProgramLink { log } if !log.is_empty()));
    }

    #[test]
    fn missing_shader_file_is_a_read_error() {
        let backend = MockBackend::default();
        let err = build_from_files(&backend, "does/not/exist.wgsl", "fs.wgsl").unwrap_err();

        match err {
            RenderError::FileRead { path, .. } => {
                assert_eq!(path, Path::new("does/not/exist.wgsl"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn shipped_shaders_validate() {
        let sources = [
            (Stage::Vertex, include_str!("../../../shaders/color.vert.wgsl")),
            (Stage::Fragment, include_str!("../../../shaders/color.frag.wgsl")),
            (Stage::Vertex, include_str!("../../../shaders/textured.vert.wgsl")),
            (Stage::Fragment, include_str!("../../../shaders/textured.frag.wgsl")),
        ];

        for (stage, source) in sources {
            let entry = validate_stage(stage, source).unwrap();
            assert!(!entry.is_empty());
        }
    }

    #[test]
    fn syntax_errors_carry_a_diagnostic() {
        let log = validate_stage(Stage::Vertex, "@vertex fn main( -> {").unwrap_err();
        assert!(!log.is_empty());
    }

    #[test]
    fn type_errors_carry_a_diagnostic() {
        let source = "@fragment fn fs_main() -> @location(0) vec4<f32> { return 1.0; }";
        let log = validate_stage(Stage::Fragment, source).unwrap_err();
        assert!(!log.is_empty());
    }

    #[test]
    fn stage_without_matching_entry_point_is_rejected() {
        let fragment = include_str!("../../../shaders/color.frag.wgsl");
        let log = validate_stage(Stage::Vertex, fragment).unwrap_err();
        assert!(log.contains("@vertex"));
    }

    #[test]
    fn stage_modules_are_labelled_per_stage() {
        assert_eq!(stage_label("color", Stage::Vertex), "color vertex");
        assert_eq!(stage_label("color", Stage::Fragment), "color fragment");
    }
}
