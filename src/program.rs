use naga::{Binding, Module, ShaderStage, TypeInner};
use thiserror::Error;

use crate::target::Slot;

#[derive(Debug, Error)]
pub enum ProgramError {
    #[error("could not parse WGSL:\n{0}")]
    Parse(String),
}

/// A WGSL shader program plus the naga module it parses to, so bindings can be looked up
/// by name before any GPU object exists.
#[derive(Debug)]
pub struct WgslProgram {
    source: String,
    module: Module,
}

impl WgslProgram {
    pub fn parse(source: &str) -> Result<Self, ProgramError> {
        let module = naga::front::wgsl::parse_str(source)
            .map_err(|err| ProgramError::Parse(err.emit_to_string(source)))?;
        Ok(Self {
            source: source.into(),
            module,
        })
    }

    /// The bundled glyph shader.
    pub fn glyph() -> Result<Self, ProgramError> {
        Self::parse(include_str!("../shaders/glyph.wgsl"))
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Resource slot of the global variable called `name`.
    pub fn uniform(&self, name: &str) -> Option<Slot> {
        self.module
            .global_variables
            .iter()
            .find(|(_, var)| var.name.as_deref() == Some(name))
            .and_then(|(_, var)| var.binding.as_ref())
            .map(|rb| Slot {
                group: rb.group,
                binding: rb.binding,
            })
    }

    /// First filtering sampler declared in `group`.
    pub fn sampler(&self, group: u32) -> Option<Slot> {
        self.module
            .global_variables
            .iter()
            .filter(|(_, var)| {
                matches!(
                    self.module.types[var.ty].inner,
                    TypeInner::Sampler { comparison: false }
                )
            })
            .filter_map(|(_, var)| var.binding.as_ref())
            .find(|rb| rb.group == group)
            .map(|rb| Slot {
                group: rb.group,
                binding: rb.binding,
            })
    }

    /// `@location` of the vertex input called `name`, either a plain argument of the vertex
    /// entry point or a member of a struct argument.
    pub fn attribute(&self, name: &str) -> Option<u32> {
        let entry = self
            .module
            .entry_points
            .iter()
            .find(|ep| ep.stage == ShaderStage::Vertex)?;

        entry.function.arguments.iter().find_map(|arg| {
            if arg.name.as_deref() == Some(name) {
                return location(arg.binding.as_ref());
            }
            match &self.module.types[arg.ty].inner {
                TypeInner::Struct { members, .. } => members
                    .iter()
                    .find(|member| member.name.as_deref() == Some(name))
                    .and_then(|member| location(member.binding.as_ref())),
                _ => None,
            }
        })
    }

    pub fn entry_point(&self, stage: ShaderStage) -> Option<&str> {
        self.module
            .entry_points
            .iter()
            .find(|ep| ep.stage == stage)
            .map(|ep| ep.name.as_str())
    }
}

fn location(binding: Option<&Binding>) -> Option<u32> {
    match binding {
        Some(Binding::Location { location, .. }) => Some(*location),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_shader_exposes_glyph_bindings() {
        let program = WgslProgram::glyph().unwrap();
        assert_eq!(program.uniform("tex"), Some(Slot { group: 0, binding: 0 }));
        assert_eq!(program.uniform("color"), Some(Slot { group: 0, binding: 2 }));
        assert_eq!(program.sampler(0), Some(Slot { group: 0, binding: 1 }));
        assert_eq!(program.attribute("coord"), Some(0));
        assert_eq!(program.entry_point(ShaderStage::Vertex), Some("vertex"));
        assert_eq!(program.entry_point(ShaderStage::Fragment), Some("fragment"));
    }

    #[test]
    fn unknown_names_are_not_found() {
        let program = WgslProgram::glyph().unwrap();
        assert_eq!(program.uniform("colour"), None);
        assert_eq!(program.attribute("position"), None);
        assert_eq!(program.sampler(1), None);
    }

    #[test]
    fn struct_vertex_inputs_are_searched() {
        let program = WgslProgram::parse(
            r#"
            struct VertexInput {
                @location(3) coord: vec4<f32>,
            };

            @vertex
            fn main(input: VertexInput) -> @builtin(position) vec4<f32> {
                return vec4<f32>(input.coord.xy, 0.0, 1.0);
            }
            "#,
        )
        .unwrap();
        assert_eq!(program.attribute("coord"), Some(3));
        assert_eq!(program.uniform("tex"), None);
    }

    #[test]
    fn invalid_source_is_reported() {
        let err = WgslProgram::parse("fn broken( {").unwrap_err();
        assert!(matches!(err, ProgramError::Parse(_)));
    }
}
