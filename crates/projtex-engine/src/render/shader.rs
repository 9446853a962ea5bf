use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Pipeline stage a shader source is compiled for.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn naga(self) -> naga::ShaderStage {
        match self {
            ShaderStage::Vertex => naga::ShaderStage::Vertex,
            ShaderStage::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("failed to read {stage} shader {path}")]
    Read {
        stage: ShaderStage,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{stage} shader {name} failed to parse:\n{message}")]
    Parse {
        stage: ShaderStage,
        name: String,
        message: String,
    },

    #[error("{stage} shader {name} failed validation:\n{message}")]
    Validation {
        stage: ShaderStage,
        name: String,
        message: String,
    },

    #[error("{stage} shader {name} has no {stage} entry point {entry_point:?}")]
    MissingEntryPoint {
        stage: ShaderStage,
        name: String,
        entry_point: String,
    },

    #[error("shaders {vertex} and {fragment} do not link: {message}")]
    Link {
        vertex: String,
        fragment: String,
        message: String,
    },
}

/// A validated WGSL source for one pipeline stage.
#[derive(Debug, Clone)]
pub struct ShaderSource {
    stage: ShaderStage,
    name: String,
    entry_point: String,
    source: String,
    module: naga::Module,
}

impl ShaderSource {
    /// Parses and validates `source` and checks that it declares `entry_point`
    /// for `stage`.
    ///
    /// Validation happens here rather than in wgpu so a broken shader surfaces
    /// as a typed error instead of a device error.
    pub fn from_wgsl(
        stage: ShaderStage,
        name: impl Into<String>,
        entry_point: impl Into<String>,
        source: impl Into<String>,
    ) -> Result<Self, ShaderError> {
        let name = name.into();
        let entry_point = entry_point.into();
        let source = source.into();

        let module = naga::front::wgsl::parse_str(&source).map_err(|e| ShaderError::Parse {
            stage,
            name: name.clone(),
            message: e.emit_to_string_with_path(&source, &name),
        })?;

        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        );
        validator
            .validate(&module)
            .map_err(|e| ShaderError::Validation {
                stage,
                name: name.clone(),
                message: e.emit_to_string_with_path(&source, &name),
            })?;

        let found = module
            .entry_points
            .iter()
            .any(|ep| ep.stage == stage.naga() && ep.name == entry_point);
        if !found {
            return Err(ShaderError::MissingEntryPoint {
                stage,
                name,
                entry_point,
            });
        }

        Ok(Self {
            stage,
            name,
            entry_point,
            source,
            module,
        })
    }

    /// Reads and validates a WGSL file.
    pub fn load(
        stage: ShaderStage,
        path: impl AsRef<Path>,
        entry_point: impl Into<String>,
    ) -> Result<Self, ShaderError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ShaderError::Read {
            stage,
            path: path.to_path_buf(),
            source,
        })?;

        let shader = Self::from_wgsl(stage, path.display().to_string(), entry_point, source)?;
        log::info!("{stage} shader {} compiled", path.display());
        Ok(shader)
    }

    #[inline]
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    #[inline]
    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    fn entry(&self) -> Option<&naga::EntryPoint> {
        self.module
            .entry_points
            .iter()
            .find(|ep| ep.stage == self.stage.naga() && ep.name == self.entry_point)
    }

    pub fn create_module(&self, device: &wgpu::Device) -> wgpu::ShaderModule {
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&self.name),
            source: wgpu::ShaderSource::Wgsl(self.source.as_str().into()),
        })
    }
}

/// Gathers the `@location` slots of an entry-point value, looking through
/// structs whose members carry the bindings.
fn collect_locations<'m>(
    module: &'m naga::Module,
    ty: naga::Handle<naga::Type>,
    binding: Option<&naga::Binding>,
    out: &mut BTreeMap<u32, &'m naga::TypeInner>,
) {
    match binding {
        Some(naga::Binding::Location { location, .. }) => {
            out.insert(*location, &module.types[ty].inner);
        }
        Some(_) => {}
        None => {
            if let naga::TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for member in members {
                    collect_locations(module, member.ty, member.binding.as_ref(), out);
                }
            }
        }
    }
}

/// Checks that every fragment input location is written by the vertex stage
/// with the same type.
pub fn check_interface(vertex: &ShaderSource, fragment: &ShaderSource) -> Result<(), ShaderError> {
    let link_error = |message: String| ShaderError::Link {
        vertex: vertex.name.clone(),
        fragment: fragment.name.clone(),
        message,
    };

    if vertex.stage != ShaderStage::Vertex || fragment.stage != ShaderStage::Fragment {
        return Err(link_error(format!(
            "expected vertex + fragment, got {} + {}",
            vertex.stage, fragment.stage
        )));
    }
    let (Some(vs), Some(fs)) = (vertex.entry(), fragment.entry()) else {
        return Err(link_error("entry point missing".to_string()));
    };

    let mut outputs = BTreeMap::new();
    if let Some(result) = &vs.function.result {
        collect_locations(&vertex.module, result.ty, result.binding.as_ref(), &mut outputs);
    }
    let mut inputs = BTreeMap::new();
    for arg in &fs.function.arguments {
        collect_locations(&fragment.module, arg.ty, arg.binding.as_ref(), &mut inputs);
    }

    for (location, input) in &inputs {
        match outputs.get(location) {
            None => {
                return Err(link_error(format!(
                    "fragment input @location({location}) is not written by the vertex stage"
                )));
            }
            Some(output) if output != input => {
                return Err(link_error(format!(
                    "@location({location}) is {output:?} in the vertex stage but {input:?} in the fragment stage"
                )));
            }
            Some(_) => {}
        }
    }

    log::debug!(
        "shaders {} and {} link ({} varyings)",
        vertex.name,
        fragment.name,
        inputs.len()
    );
    Ok(())
}
