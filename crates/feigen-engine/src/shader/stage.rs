use std::fmt;
use std::path::{Path, PathBuf};

use super::error::BuildError;

/// One of the two programmable stages a shader program is built from.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// Number of stages in a complete program.
    pub const COUNT: usize = 2;

    /// Entry point name the stage's module must export.
    pub fn entry_point(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vs_main",
            ShaderStage::Fragment => "fs_main",
        }
    }

    /// File name suffix appended to a program's base path.
    pub fn file_suffix(self) -> &'static str {
        match self {
            ShaderStage::Vertex => ".vert.wgsl",
            ShaderStage::Fragment => ".frag.wgsl",
        }
    }

    /// Source file path for this stage of the program rooted at `base`.
    pub fn source_path(self, base: &Path) -> PathBuf {
        let mut os = base.as_os_str().to_os_string();
        os.push(self.file_suffix());
        PathBuf::from(os)
    }

    fn naga_stage(self) -> naga::ShaderStage {
        match self {
            ShaderStage::Vertex => naga::ShaderStage::Vertex,
            ShaderStage::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

/// One stage's WGSL source plus its origin for diagnostics.
#[derive(Debug, Clone)]
pub struct StageSource {
    pub stage: ShaderStage,
    /// File path or inline label; prefixes diagnostics.
    pub origin: String,
    pub source: String,
}

impl StageSource {
    /// Reads a stage source from a file.
    pub fn from_file(stage: ShaderStage, path: impl Into<PathBuf>) -> Result<Self, BuildError> {
        let path = path.into();
        let source = std::fs::read_to_string(&path).map_err(|error| BuildError::Read {
            path: path.clone(),
            error,
        })?;

        Ok(Self {
            stage,
            origin: path.display().to_string(),
            source,
        })
    }

    /// Wraps an in-memory source string.
    pub fn inline(stage: ShaderStage, source: impl Into<String>) -> Self {
        Self {
            stage,
            origin: format!("<inline {stage}>"),
            source: source.into(),
        }
    }

    /// Compile-checks the stage without a GPU.
    ///
    /// Parses the WGSL, validates the module, and requires the stage's entry
    /// point to exist with the right stage kind. The returned error's log is
    /// never empty.
    pub fn check(&self) -> Result<(), BuildError> {
        let module =
            naga::front::wgsl::parse_str(&self.source).map_err(|e| BuildError::Compile {
                stage: self.stage,
                log: non_empty_log(e.emit_to_string(&self.source)),
            })?;

        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        );
        validator.validate(&module).map_err(|e| {
            let inner = e.into_inner();
            BuildError::Compile {
                stage: self.stage,
                log: non_empty_log(render_error_chain(&inner)),
            }
        })?;

        let entry = self.stage.entry_point();
        match module.entry_points.iter().find(|ep| ep.name == entry) {
            None => Err(BuildError::Compile {
                stage: self.stage,
                log: format!("{}: missing entry point `{entry}`", self.origin),
            }),
            Some(ep) if ep.stage != self.stage.naga_stage() => Err(BuildError::Compile {
                stage: self.stage,
                log: format!(
                    "{}: entry point `{entry}` is not a {} entry point",
                    self.origin, self.stage
                ),
            }),
            Some(_) => Ok(()),
        }
    }
}

/// The validated pair of stage sources making up one program.
///
/// Construction enforces the stage set: exactly one vertex and one fragment
/// stage, nothing else.
#[derive(Debug, Clone)]
pub struct StageSet {
    vertex: StageSource,
    fragment: StageSource,
}

impl StageSet {
    /// Builds the set from loose sources, rejecting duplicates and gaps.
    pub fn new(sources: Vec<StageSource>) -> Result<Self, BuildError> {
        let mut vertex = None;
        let mut fragment = None;

        for src in sources {
            let slot = match src.stage {
                ShaderStage::Vertex => &mut vertex,
                ShaderStage::Fragment => &mut fragment,
            };
            if slot.is_some() {
                return Err(BuildError::DuplicateStage(src.stage));
            }
            *slot = Some(src);
        }

        Ok(Self {
            vertex: vertex.ok_or(BuildError::MissingStage(ShaderStage::Vertex))?,
            fragment: fragment.ok_or(BuildError::MissingStage(ShaderStage::Fragment))?,
        })
    }

    /// Loads both stages of the program rooted at `base`.
    ///
    /// `shaders/julia` reads `shaders/julia.vert.wgsl` and
    /// `shaders/julia.frag.wgsl`.
    pub fn load(base: impl AsRef<Path>) -> Result<Self, BuildError> {
        let base = base.as_ref();
        Ok(Self {
            vertex: StageSource::from_file(
                ShaderStage::Vertex,
                ShaderStage::Vertex.source_path(base),
            )?,
            fragment: StageSource::from_file(
                ShaderStage::Fragment,
                ShaderStage::Fragment.source_path(base),
            )?,
        })
    }

    pub fn vertex(&self) -> &StageSource {
        &self.vertex
    }

    pub fn fragment(&self) -> &StageSource {
        &self.fragment
    }

    /// Compile-checks both stages, vertex first.
    pub fn check(&self) -> Result<(), BuildError> {
        self.vertex.check()?;
        self.fragment.check()?;
        Ok(())
    }
}

/// Diagnostics must never be empty; substitute a marker if a library hands
/// back a blank message.
pub(super) fn non_empty_log(log: String) -> String {
    if log.trim().is_empty() {
        "no diagnostics reported".to_string()
    } else {
        log
    }
}

fn render_error_chain(err: &dyn std::error::Error) -> String {
    let mut log = err.to_string();
    let mut source = err.source();
    while let Some(e) = source {
        log.push_str(": ");
        log.push_str(&e.to_string());
        source = e.source();
    }
    log
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_VERT: &str = r#"
@vertex
fn vs_main(@builtin(vertex_index) vi: u32) -> @builtin(position) vec4<f32> {
    let x = f32(vi);
    return vec4<f32>(x, 0.0, 0.0, 1.0);
}
"#;

    const VALID_FRAG: &str = r#"
@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0, 0.0, 1.0, 1.0);
}
"#;

    // ── stage metadata ────────────────────────────────────────────────────

    #[test]
    fn entry_points_follow_convention() {
        assert_eq!(ShaderStage::Vertex.entry_point(), "vs_main");
        assert_eq!(ShaderStage::Fragment.entry_point(), "fs_main");
    }

    #[test]
    fn source_path_appends_stage_suffix() {
        let base = Path::new("shaders/julia");
        assert_eq!(
            ShaderStage::Vertex.source_path(base),
            PathBuf::from("shaders/julia.vert.wgsl")
        );
        assert_eq!(
            ShaderStage::Fragment.source_path(base),
            PathBuf::from("shaders/julia.frag.wgsl")
        );
    }

    // ── check ─────────────────────────────────────────────────────────────

    #[test]
    fn valid_stages_pass_check() {
        StageSource::inline(ShaderStage::Vertex, VALID_VERT)
            .check()
            .unwrap();
        StageSource::inline(ShaderStage::Fragment, VALID_FRAG)
            .check()
            .unwrap();
    }

    #[test]
    fn syntax_error_reports_nonempty_log() {
        let src = StageSource::inline(ShaderStage::Fragment, "@fragment fn fs_main( -> {");
        match src.check() {
            Err(BuildError::Compile { stage, log }) => {
                assert_eq!(stage, ShaderStage::Fragment);
                assert!(!log.trim().is_empty());
            }
            other => panic!("expected compile error, got {other:?}"),
        }
    }

    #[test]
    fn type_error_reports_nonempty_log() {
        let src = StageSource::inline(
            ShaderStage::Fragment,
            "@fragment fn fs_main() -> @location(0) vec4<f32> { return 1.0; }",
        );
        match src.check() {
            Err(BuildError::Compile { log, .. }) => assert!(!log.trim().is_empty()),
            other => panic!("expected compile error, got {other:?}"),
        }
    }

    #[test]
    fn missing_entry_point_is_named_in_log() {
        // A valid module, but the vertex entry point is absent.
        let src = StageSource::inline(ShaderStage::Vertex, VALID_FRAG);
        match src.check() {
            Err(BuildError::Compile { log, .. }) => assert!(log.contains("vs_main"), "{log}"),
            other => panic!("expected compile error, got {other:?}"),
        }
    }

    #[test]
    fn entry_point_of_wrong_kind_is_rejected() {
        // Correct name, wrong stage attribute.
        let src = StageSource::inline(
            ShaderStage::Vertex,
            r#"
@fragment
fn vs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(0.0, 0.0, 0.0, 1.0);
}
"#,
        );
        match src.check() {
            Err(BuildError::Compile { log, .. }) => {
                assert!(log.contains("not a vertex entry point"), "{log}");
            }
            other => panic!("expected compile error, got {other:?}"),
        }
    }

    // ── stage set ─────────────────────────────────────────────────────────

    #[test]
    fn set_accepts_exactly_vertex_and_fragment() {
        let set = StageSet::new(vec![
            StageSource::inline(ShaderStage::Fragment, VALID_FRAG),
            StageSource::inline(ShaderStage::Vertex, VALID_VERT),
        ])
        .unwrap();
        assert_eq!(set.vertex().stage, ShaderStage::Vertex);
        assert_eq!(set.fragment().stage, ShaderStage::Fragment);
        set.check().unwrap();
    }

    #[test]
    fn set_rejects_missing_fragment() {
        let err = StageSet::new(vec![StageSource::inline(ShaderStage::Vertex, VALID_VERT)])
            .unwrap_err();
        assert!(matches!(err, BuildError::MissingStage(ShaderStage::Fragment)));
    }

    #[test]
    fn set_rejects_duplicate_vertex() {
        let err = StageSet::new(vec![
            StageSource::inline(ShaderStage::Vertex, VALID_VERT),
            StageSource::inline(ShaderStage::Vertex, VALID_VERT),
        ])
        .unwrap_err();
        assert!(matches!(err, BuildError::DuplicateStage(ShaderStage::Vertex)));
    }

    // ── load ──────────────────────────────────────────────────────────────

    #[test]
    fn load_reads_both_stage_files() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("demo");
        std::fs::write(ShaderStage::Vertex.source_path(&base), VALID_VERT).unwrap();
        std::fs::write(ShaderStage::Fragment.source_path(&base), VALID_FRAG).unwrap();

        let set = StageSet::load(&base).unwrap();
        set.check().unwrap();
        assert!(set.vertex().origin.ends_with(".vert.wgsl"));
    }

    #[test]
    fn load_names_the_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("demo");
        std::fs::write(ShaderStage::Vertex.source_path(&base), VALID_VERT).unwrap();

        match StageSet::load(&base) {
            Err(BuildError::Read { path, .. }) => {
                assert!(path.to_string_lossy().ends_with("demo.frag.wgsl"), "{path:?}");
            }
            other => panic!("expected read error, got {other:?}"),
        }
    }

    // ── log hygiene ───────────────────────────────────────────────────────

    #[test]
    fn blank_logs_are_replaced() {
        assert_eq!(non_empty_log("  \n".to_string()), "no diagnostics reported");
        assert_eq!(non_empty_log("real".to_string()), "real");
    }
}
