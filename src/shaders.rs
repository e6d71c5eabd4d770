//! Shader source text for the lattice program.

use std::path::Path;

use crate::{error::MandelbulbError, options::ShaderOptions};

/// Vertex and fragment WGSL source, read before any program is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSources {
    /// Vertex stage source.
    pub vertex: String,
    /// Fragment stage source.
    pub fragment: String,
}

impl ShaderSources {
    /// Read both stages from the configured files.
    ///
    /// # Errors
    ///
    /// [`MandelbulbError::ResourceFetch`] naming the first file that could
    /// not be read. Nothing should be compiled or drawn after this fails.
    pub fn load(options: &ShaderOptions) -> Result<Self, MandelbulbError> {
        let vertex = read_source(&options.vertex)?;
        let fragment = read_source(&options.fragment)?;
        log::info!(
            "loaded shaders {} and {}",
            options.vertex.display(),
            options.fragment.display()
        );
        Ok(Self { vertex, fragment })
    }

    /// The default shaders compiled into the binary.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            vertex: include_str!("../assets/shaders/lattice.vert.wgsl").to_owned(),
            fragment: include_str!("../assets/shaders/lattice.frag.wgsl")
                .to_owned(),
        }
    }
}

fn read_source(path: &Path) -> Result<String, MandelbulbError> {
    std::fs::read_to_string(path).map_err(|source| MandelbulbError::ResourceFetch {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn default_paths_match_builtin_sources() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR"));
        let defaults = ShaderOptions::default();
        let options = ShaderOptions {
            vertex: root.join(&defaults.vertex),
            fragment: root.join(&defaults.fragment),
        };
        assert_eq!(ShaderSources::load(&options).unwrap(), ShaderSources::builtin());
    }

    #[test]
    fn missing_file_is_a_fetch_failure() {
        let options = ShaderOptions {
            vertex: PathBuf::from("does/not/exist.vert.wgsl"),
            ..ShaderOptions::default()
        };
        match ShaderSources::load(&options) {
            Err(MandelbulbError::ResourceFetch { path, .. }) => {
                assert_eq!(path, PathBuf::from("does/not/exist.vert.wgsl"));
            }
            other => panic!("expected fetch failure, got {other:?}"),
        }
    }

    #[test]
    fn builtin_sources_declare_the_shading_contract() {
        let sources = ShaderSources::builtin();
        assert!(sources.vertex.contains("aPosition"));
        assert!(sources.vertex.contains("uModelViewMatrix"));
        assert!(sources.vertex.contains("uProjectionMatrix"));
    }
}
