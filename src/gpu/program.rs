//! WGSL compilation and program reflection.
//!
//! Shaders are parsed and validated with naga before wgpu ever sees them, so
//! compile errors surface as [`GpuError::ShaderCompile`] with a rendered
//! diagnostic instead of an uncaptured device error. Linking checks that the
//! two stages agree and reflects the vertex inputs and matrix uniforms the
//! backends address by name.

use naga::{
    valid::{Capabilities, ValidationFlags, Validator},
    AddressSpace, Binding, Handle, Module, ScalarKind, Type, TypeInner,
    VectorSize,
};

use super::backend::{BufferHandle, GpuError, ShaderStage};

/// Size in bytes of a `mat4x4<f32>`.
const MAT4_SIZE: u64 = 64;

/// A vertex input of the linked program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Name of the shader input.
    pub name: String,
    /// `@location` index.
    pub location: u32,
    /// Vertex format the input reads.
    pub format: wgpu::VertexFormat,
}

/// A uniform buffer binding in bind group 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformBlock {
    /// `@binding` index within group 0.
    pub binding: u32,
    /// Buffer size in bytes.
    pub size: u64,
}

/// A `mat4x4<f32>` uniform addressable by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformMatrix {
    /// Struct member (or global) name.
    pub name: String,
    /// Binding of the block holding it.
    pub binding: u32,
    /// Byte offset inside the block.
    pub offset: u64,
}

/// Parse and validate one WGSL stage.
///
/// # Errors
///
/// [`GpuError::ShaderCompile`] carrying naga's rendered diagnostic.
pub fn compile(stage: ShaderStage, source: &str) -> Result<Module, GpuError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| {
        GpuError::ShaderCompile {
            stage,
            message: e.emit_to_string(source),
        }
    })?;
    let _info = Validator::new(ValidationFlags::all(), Capabilities::empty())
        .validate(&module)
        .map_err(|e| GpuError::ShaderCompile {
            stage,
            message: e.emit_to_string(source),
        })?;
    Ok(module)
}

/// Two compiled stages plus everything reflected from them.
#[derive(Debug, Clone)]
pub struct ProgramLayout {
    vertex: Module,
    fragment: Module,
    vertex_entry: String,
    fragment_entry: String,
    attributes: Vec<VertexAttribute>,
    blocks: Vec<UniformBlock>,
    matrices: Vec<UniformMatrix>,
}

impl ProgramLayout {
    /// Compile both stages and check that they form a program.
    ///
    /// # Errors
    ///
    /// [`GpuError::ShaderCompile`] if either source is invalid, and
    /// [`GpuError::ProgramLink`] if an entry point is missing, the fragment
    /// stage reads a location the vertex stage never writes, or an input or
    /// uniform uses a layout the backends cannot feed.
    pub fn link(
        vertex_src: &str,
        fragment_src: &str,
    ) -> Result<Self, GpuError> {
        let vertex = compile(ShaderStage::Vertex, vertex_src)?;
        let fragment = compile(ShaderStage::Fragment, fragment_src)?;

        let vs = vertex
            .entry_points
            .iter()
            .find(|ep| ep.stage == naga::ShaderStage::Vertex)
            .ok_or_else(|| link_error("vertex source has no @vertex entry point"))?;
        let fs = fragment
            .entry_points
            .iter()
            .find(|ep| ep.stage == naga::ShaderStage::Fragment)
            .ok_or_else(|| {
                link_error("fragment source has no @fragment entry point")
            })?;

        let produced = vs.function.result.as_ref().map_or_else(Vec::new, |r| {
            io_locations(&vertex, r.binding.as_ref(), r.ty)
        });
        for arg in &fs.function.arguments {
            for location in io_locations(&fragment, arg.binding.as_ref(), arg.ty) {
                if !produced.contains(&location) {
                    return Err(link_error(&format!(
                        "fragment input at location {location} is not \
                         written by the vertex stage"
                    )));
                }
            }
        }

        let attributes = vertex_attributes(&vertex, &vs.function.arguments)?;

        let mut blocks = Vec::new();
        let mut matrices = Vec::new();
        collect_uniforms(&vertex, &mut blocks, &mut matrices)?;
        collect_uniforms(&fragment, &mut blocks, &mut matrices)?;

        let vertex_entry = vs.name.clone();
        let fragment_entry = fs.name.clone();
        Ok(Self {
            vertex,
            fragment,
            vertex_entry,
            fragment_entry,
            attributes,
            blocks,
            matrices,
        })
    }

    /// Vertex inputs ordered by location. The index in this slice is the
    /// vertex buffer slot the backends use for it.
    #[must_use]
    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }

    /// Buffer slot and description of the input called `name`.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<(usize, &VertexAttribute)> {
        self.attributes
            .iter()
            .enumerate()
            .find(|(_, a)| a.name == name)
    }

    /// Uniform blocks in bind group 0.
    #[must_use]
    pub fn uniform_blocks(&self) -> &[UniformBlock] {
        &self.blocks
    }

    /// The matrix uniform called `name`.
    #[must_use]
    pub fn uniform_matrix(&self, name: &str) -> Option<&UniformMatrix> {
        self.matrices.iter().find(|m| m.name == name)
    }

    /// Compiled vertex stage.
    #[must_use]
    pub fn vertex_module(&self) -> &Module {
        &self.vertex
    }

    /// Compiled fragment stage.
    #[must_use]
    pub fn fragment_module(&self) -> &Module {
        &self.fragment
    }

    /// Name of the `@vertex` entry point.
    #[must_use]
    pub fn vertex_entry(&self) -> &str {
        &self.vertex_entry
    }

    /// Name of the `@fragment` entry point.
    #[must_use]
    pub fn fragment_entry(&self) -> &str {
        &self.fragment_entry
    }
}

/// A vertex buffer as seen by attribute binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexBufferInfo {
    /// Backend handle.
    pub handle: BufferHandle,
    /// Bytes per vertex.
    pub stride: u64,
    /// Number of vertices stored.
    pub vertex_count: u32,
}

/// Which buffer feeds each vertex input of one program.
#[derive(Debug, Clone, Default)]
pub struct AttributeBindings {
    slots: Vec<Option<VertexBufferInfo>>,
}

impl AttributeBindings {
    /// Empty bindings sized for `layout`.
    #[must_use]
    pub fn new(layout: &ProgramLayout) -> Self {
        Self {
            slots: vec![None; layout.attributes().len()],
        }
    }

    /// Bind `buffer` to the input called `name`.
    ///
    /// # Errors
    ///
    /// [`GpuError::UnknownAttribute`] or [`GpuError::AttributeLayout`].
    pub fn bind(
        &mut self,
        layout: &ProgramLayout,
        name: &str,
        buffer: VertexBufferInfo,
    ) -> Result<(), GpuError> {
        let (slot, attribute) = layout
            .attribute(name)
            .ok_or_else(|| GpuError::UnknownAttribute(name.to_owned()))?;
        let expected = attribute.format.size();
        if buffer.stride != expected {
            return Err(GpuError::AttributeLayout {
                name: name.to_owned(),
                expected,
                actual: buffer.stride,
            });
        }
        self.slots[slot] = Some(buffer);
        Ok(())
    }

    /// Check that a draw of `vertex_count` vertices is fully fed.
    ///
    /// # Errors
    ///
    /// [`GpuError::UnboundAttribute`] or [`GpuError::DrawRange`].
    pub fn check_draw(
        &self,
        layout: &ProgramLayout,
        vertex_count: u32,
    ) -> Result<(), GpuError> {
        for (slot, attribute) in layout.attributes().iter().enumerate() {
            let Some(buffer) = self.slots.get(slot).copied().flatten() else {
                return Err(GpuError::UnboundAttribute(attribute.name.clone()));
            };
            if buffer.vertex_count < vertex_count {
                return Err(GpuError::DrawRange {
                    requested: vertex_count,
                    available: buffer.vertex_count,
                });
            }
        }
        Ok(())
    }

    /// Bound buffers with their vertex buffer slot.
    pub fn bound(&self) -> impl Iterator<Item = (u32, &VertexBufferInfo)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, b)| b.as_ref().map(|b| (slot as u32, b)))
    }
}

fn link_error(msg: &str) -> GpuError {
    GpuError::ProgramLink(msg.to_owned())
}

fn is_f32(scalar: naga::Scalar) -> bool {
    scalar.kind == ScalarKind::Float && scalar.width == 4
}

fn is_mat4(inner: &TypeInner) -> bool {
    matches!(
        inner,
        TypeInner::Matrix {
            columns: VectorSize::Quad,
            rows: VectorSize::Quad,
            scalar,
        } if is_f32(*scalar)
    )
}

/// `@location`s carried by an entry point argument or result, looking
/// through struct members when the binding sits on the members.
fn io_locations(
    module: &Module,
    binding: Option<&Binding>,
    ty: Handle<Type>,
) -> Vec<u32> {
    match binding {
        Some(Binding::Location { location, .. }) => vec![*location],
        Some(_) => Vec::new(),
        None => match &module.types[ty].inner {
            TypeInner::Struct { members, .. } => members
                .iter()
                .filter_map(|m| match m.binding {
                    Some(Binding::Location { location, .. }) => Some(location),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        },
    }
}

fn vertex_attributes(
    module: &Module,
    arguments: &[naga::FunctionArgument],
) -> Result<Vec<VertexAttribute>, GpuError> {
    let mut attributes = Vec::new();
    for arg in arguments {
        match &arg.binding {
            Some(Binding::Location { location, .. }) => attributes.push(
                vertex_attribute(module, arg.name.as_deref(), arg.ty, *location)?,
            ),
            Some(_) => {}
            None => {
                if let TypeInner::Struct { members, .. } = &module.types[arg.ty].inner
                {
                    for member in members {
                        if let Some(Binding::Location { location, .. }) = member.binding {
                            attributes.push(vertex_attribute(
                                module,
                                member.name.as_deref(),
                                member.ty,
                                location,
                            )?);
                        }
                    }
                }
            }
        }
    }
    attributes.sort_by_key(|a| a.location);
    Ok(attributes)
}

fn vertex_attribute(
    module: &Module,
    name: Option<&str>,
    ty: Handle<Type>,
    location: u32,
) -> Result<VertexAttribute, GpuError> {
    let name = name.ok_or_else(|| {
        link_error(&format!("vertex input at location {location} has no name"))
    })?;
    let format = match &module.types[ty].inner {
        TypeInner::Scalar(scalar) if is_f32(*scalar) => wgpu::VertexFormat::Float32,
        TypeInner::Vector { size, scalar } if is_f32(*scalar) => match size {
            VectorSize::Bi => wgpu::VertexFormat::Float32x2,
            VectorSize::Tri => wgpu::VertexFormat::Float32x3,
            VectorSize::Quad => wgpu::VertexFormat::Float32x4,
        },
        _ => {
            return Err(link_error(&format!(
                "vertex input `{name}` must be an f32 scalar or vector"
            )))
        }
    };
    Ok(VertexAttribute {
        name: name.to_owned(),
        location,
        format,
    })
}

fn collect_uniforms(
    module: &Module,
    blocks: &mut Vec<UniformBlock>,
    matrices: &mut Vec<UniformMatrix>,
) -> Result<(), GpuError> {
    for (_, var) in module.global_variables.iter() {
        if !matches!(var.space, AddressSpace::Uniform) {
            continue;
        }
        let label = var.name.as_deref().unwrap_or("<unnamed>");
        let Some(resource) = &var.binding else {
            return Err(link_error(&format!("uniform `{label}` has no binding")));
        };
        if resource.group != 0 {
            return Err(link_error(&format!(
                "uniform `{label}` must live in bind group 0"
            )));
        }

        let inner = &module.types[var.ty].inner;
        let (size, members): (u64, Vec<(String, u64)>) = match inner {
            TypeInner::Struct { members, span } => (
                u64::from(*span),
                members
                    .iter()
                    .filter(|m| is_mat4(&module.types[m.ty].inner))
                    .filter_map(|m| {
                        m.name.clone().map(|n| (n, u64::from(m.offset)))
                    })
                    .collect(),
            ),
            _ if is_mat4(inner) => (
                MAT4_SIZE,
                var.name.clone().map(|n| (n, 0)).into_iter().collect(),
            ),
            _ => {
                return Err(link_error(&format!(
                    "uniform `{label}` must be a struct or mat4x4<f32>"
                )))
            }
        };

        let binding = resource.binding;
        match blocks.iter_mut().find(|b| b.binding == binding) {
            Some(block) => block.size = block.size.max(size),
            None => blocks.push(UniformBlock { binding, size }),
        }
        for (name, offset) in members {
            if matrices.iter().all(|m| m.name != name) {
                matrices.push(UniformMatrix {
                    name,
                    binding,
                    offset,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        gpu::backend::{MODEL_VIEW_UNIFORM, POSITION_ATTRIBUTE, PROJECTION_UNIFORM},
        shaders::ShaderSources,
    };

    fn builtin_layout() -> ProgramLayout {
        let sources = ShaderSources::builtin();
        ProgramLayout::link(&sources.vertex, &sources.fragment).unwrap()
    }

    #[test]
    fn builtin_shaders_link() {
        let layout = builtin_layout();
        assert_eq!(layout.vertex_entry(), "vs_main");
        assert_eq!(layout.fragment_entry(), "fs_main");
    }

    #[test]
    fn reflects_position_attribute() {
        let layout = builtin_layout();
        let (slot, attribute) = layout.attribute(POSITION_ATTRIBUTE).unwrap();
        assert_eq!(slot, 0);
        assert_eq!(attribute.location, 0);
        assert_eq!(attribute.format, wgpu::VertexFormat::Float32x3);
        assert!(layout.attribute("aNormal").is_none());
    }

    #[test]
    fn reflects_matrix_uniform_offsets() {
        let layout = builtin_layout();
        let model_view = layout.uniform_matrix(MODEL_VIEW_UNIFORM).unwrap();
        let projection = layout.uniform_matrix(PROJECTION_UNIFORM).unwrap();
        assert_eq!(model_view.offset, 0);
        assert_eq!(projection.offset, 64);
        assert_eq!(model_view.binding, projection.binding);
        assert_eq!(
            layout.uniform_blocks(),
            &[UniformBlock {
                binding: 0,
                size: 128
            }]
        );
    }

    #[test]
    fn syntax_error_is_a_compile_failure() {
        let err = compile(ShaderStage::Vertex, "fn broken( {").unwrap_err();
        assert!(matches!(
            err,
            GpuError::ShaderCompile {
                stage: ShaderStage::Vertex,
                ..
            }
        ));
    }

    #[test]
    fn type_error_is_a_compile_failure() {
        let src = r"
@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec3<f32>(1.0, 1.0, 1.0);
}
";
        let err = compile(ShaderStage::Fragment, src).unwrap_err();
        assert!(matches!(
            err,
            GpuError::ShaderCompile {
                stage: ShaderStage::Fragment,
                ..
            }
        ));
    }

    #[test]
    fn missing_entry_point_fails_link() {
        let sources = ShaderSources::builtin();
        let err = ProgramLayout::link(&sources.fragment, &sources.fragment)
            .unwrap_err();
        assert!(matches!(err, GpuError::ProgramLink(_)));
    }

    #[test]
    fn unmatched_fragment_input_fails_link() {
        let sources = ShaderSources::builtin();
        let fragment = r"
@fragment
fn fs_main(@location(2) tint: vec3<f32>) -> @location(0) vec4<f32> {
    return vec4<f32>(tint, 1.0);
}
";
        let err = ProgramLayout::link(&sources.vertex, fragment).unwrap_err();
        assert!(matches!(err, GpuError::ProgramLink(_)));
    }

    #[test]
    fn matched_varyings_link() {
        let vertex = r"
struct Out {
    @builtin(position) clip: vec4<f32>,
    @location(0) tint: vec3<f32>,
};

@vertex
fn vs_main(@location(0) aPosition: vec3<f32>) -> Out {
    var out: Out;
    out.clip = vec4<f32>(aPosition, 1.0);
    out.tint = aPosition;
    return out;
}
";
        let fragment = r"
@fragment
fn fs_main(@location(0) tint: vec3<f32>) -> @location(0) vec4<f32> {
    return vec4<f32>(tint, 1.0);
}
";
        let layout = ProgramLayout::link(vertex, fragment).unwrap();
        assert!(layout.uniform_blocks().is_empty());
        assert_eq!(layout.attributes().len(), 1);
    }

    #[test]
    fn bindings_enforce_stride_and_range() {
        let layout = builtin_layout();
        let mut bindings = AttributeBindings::new(&layout);
        assert!(matches!(
            bindings.check_draw(&layout, 1),
            Err(GpuError::UnboundAttribute(_))
        ));

        let narrow = VertexBufferInfo {
            handle: BufferHandle(0),
            stride: 8,
            vertex_count: 10,
        };
        assert!(matches!(
            bindings.bind(&layout, POSITION_ATTRIBUTE, narrow),
            Err(GpuError::AttributeLayout {
                expected: 12,
                actual: 8,
                ..
            })
        ));

        let points = VertexBufferInfo {
            stride: 12,
            ..narrow
        };
        bindings.bind(&layout, POSITION_ATTRIBUTE, points).unwrap();
        assert!(bindings.check_draw(&layout, 10).is_ok());
        assert!(matches!(
            bindings.check_draw(&layout, 11),
            Err(GpuError::DrawRange {
                requested: 11,
                available: 10
            })
        ));
        assert_eq!(bindings.bound().count(), 1);
    }
}
