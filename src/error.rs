use std::{fmt, io, path::PathBuf};

use thiserror::Error;

/// Failures reported by a [`FontEngine`](crate::text::font::FontEngine).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("font engine is not initialized")]
    NotInitialized,
    #[error("could not read font file")]
    Io(#[from] io::Error),
    #[error("could not parse font: {0}")]
    Parse(String),
    #[error("face handle no longer refers to a loaded face")]
    StaleFace,
    #[error("face has no pixel size set")]
    NoPixelSize,
    #[error("could not rasterize '{0}'")]
    Rasterize(char),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BindingKind {
    Uniform,
    Attribute,
}

impl fmt::Display for BindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingKind::Uniform => f.write_str("uniform"),
            BindingKind::Attribute => f.write_str("attribute"),
        }
    }
}

#[derive(Debug, Error)]
pub enum InitError {
    #[error("glyph renderer has already been initialized")]
    AlreadyInitialized,
    #[error("could not initialize the font engine")]
    Engine(#[source] EngineError),
    #[error("could not bind {kind} `{name}`")]
    MissingBinding {
        kind: BindingKind,
        name: &'static str,
    },
    #[error("could not create glyph resources: {0}")]
    Resources(String),
}

#[derive(Debug, Error)]
pub enum FontLoadError {
    #[error("glyph renderer is not initialized")]
    NotInitialized,
    #[error("could not open font '{}'", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: EngineError,
    },
    #[error("could not load character for font '{}'", .family.as_deref().unwrap_or("<unknown>"))]
    Sentinel {
        family: Option<String>,
        #[source]
        source: EngineError,
    },
}

#[derive(Debug, Error)]
pub enum FontSetError {
    #[error("glyph renderer is not initialized")]
    NotInitialized,
    #[error("could not load character for font '{}' at {size}px", .family.as_deref().unwrap_or("<unknown>"))]
    Rasterize {
        family: Option<String>,
        size: u32,
        #[source]
        source: EngineError,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DrawError {
    #[error("glyph renderer is not initialized")]
    NotInitialized,
    #[error("no font face has been set")]
    NoFace,
    #[error("viewport has zero area")]
    EmptyViewport,
}

/// Any failure surfaced by the glyph renderer.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Init(#[from] InitError),
    #[error(transparent)]
    FontLoad(#[from] FontLoadError),
    #[error(transparent)]
    FontSet(#[from] FontSetError),
    #[error(transparent)]
    Draw(#[from] DrawError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failing_piece() {
        let err = InitError::MissingBinding {
            kind: BindingKind::Attribute,
            name: "coord",
        };
        assert_eq!(err.to_string(), "could not bind attribute `coord`");

        let err = FontLoadError::Sentinel {
            family: Some("DejaVuSans".into()),
            source: EngineError::Rasterize('X'),
        };
        assert_eq!(
            err.to_string(),
            "could not load character for font 'DejaVuSans'"
        );

        let err = FontSetError::Rasterize {
            family: None,
            size: 0,
            source: EngineError::NoPixelSize,
        };
        assert_eq!(
            err.to_string(),
            "could not load character for font '<unknown>' at 0px"
        );
    }
}
