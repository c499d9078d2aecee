//! Generic, transform, image, counter and legacy IE functions.

use std::fmt::{self, Write};
use std::hash::{Hash, Hasher};

use crate::lexical::escape::{write_identifier, write_identifier_with};
use crate::lexical::unit::{is_progid, sequence_to_string, write_sequence};
use crate::lexical::LexicalUnit;
use crate::value::{Format, Value};

const TRANSFORM_FUNCTIONS: &[&str] = &[
    "matrix", "matrix3d", "translate", "translatex", "translatey", "translatez", "translate3d",
    "scale", "scalex", "scaley", "scalez", "scale3d", "rotate", "rotatex", "rotatey", "rotatez",
    "rotate3d", "skew", "skewx", "skewy", "perspective",
];

const IMAGE_FUNCTIONS: &[&str] = &[
    "linear-gradient",
    "radial-gradient",
    "conic-gradient",
    "repeating-linear-gradient",
    "repeating-radial-gradient",
    "repeating-conic-gradient",
    "-webkit-linear-gradient",
    "-webkit-radial-gradient",
    "image-set",
    "-webkit-image-set",
    "cross-fade",
    "image",
    "paint",
];

const SHAPE_FUNCTIONS: &[&str] = &["inset", "circle", "ellipse", "polygon", "xywh"];

const COUNTER_FUNCTIONS: &[&str] = &["counter", "counters"];

fn is_one_of(name: &str, names: &[&str]) -> bool {
    names.iter().any(|n| name.eq_ignore_ascii_case(n))
}

/// What a function produces, as far as grammar matching is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    Generic,
    /// `translate()`, `rotate()`, ...: a `<transform-function>`.
    Transform,
    /// Gradients, `image-set()`, `cross-fade()`: an `<image>`.
    Image,
    /// `circle()`, `polygon()`, ...: a `<basic-shape>`.
    Shape,
    /// `counter()`, `counters()`.
    Counter,
    /// `expression()`, `eval()` and `progid:...` filters.
    IeCompat,
}

impl FunctionKind {
    /// Classify a function by name. IE functions are only recognised when
    /// compatibility mode produced them.
    pub fn classify(name: &str, ie_compat: bool) -> Self {
        if is_one_of(name, TRANSFORM_FUNCTIONS) {
            FunctionKind::Transform
        } else if is_one_of(name, IMAGE_FUNCTIONS) {
            FunctionKind::Image
        } else if is_one_of(name, SHAPE_FUNCTIONS) {
            FunctionKind::Shape
        } else if is_one_of(name, COUNTER_FUNCTIONS) {
            FunctionKind::Counter
        } else if ie_compat && (is_one_of(name, &["expression", "eval"]) || is_progid(name)) {
            FunctionKind::IeCompat
        } else {
            FunctionKind::Generic
        }
    }
}

/// Arguments of a function.
#[derive(Debug, Clone)]
pub enum FunctionArgs {
    /// Comma-separated arguments, each possibly a space or slash list.
    Values(Vec<Value>),
    /// Arguments with no value structure, such as IE expressions, kept as
    /// lexical units.
    Raw(Vec<LexicalUnit>),
}

/// A function value: `name(args)`.
#[derive(Debug, Clone)]
pub struct FunctionValue {
    name: String,
    kind: FunctionKind,
    args: FunctionArgs,
}

impl FunctionValue {
    pub fn new(name: impl Into<String>, kind: FunctionKind, args: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            kind,
            args: FunctionArgs::Values(args),
        }
    }

    pub fn raw(name: impl Into<String>, kind: FunctionKind, args: Vec<LexicalUnit>) -> Self {
        Self {
            name: name.into(),
            kind,
            args: FunctionArgs::Raw(args),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FunctionKind {
        self.kind
    }

    pub fn args(&self) -> &FunctionArgs {
        &self.args
    }

    /// The structured arguments, if the function has them.
    pub fn values(&self) -> Option<&[Value]> {
        match &self.args {
            FunctionArgs::Values(values) => Some(values),
            FunctionArgs::Raw(_) => None,
        }
    }

    /// Return a copy with the arguments replaced.
    pub fn with_args(&self, args: Vec<Value>) -> Self {
        Self::new(self.name.clone(), self.kind, args)
    }

    pub(crate) fn write_to<W: Write>(&self, dest: &mut W, format: Format) -> fmt::Result {
        if is_progid(&self.name) {
            write_identifier_with(dest, &self.name, true)?;
        } else {
            write_identifier(dest, &self.name)?;
        }
        dest.write_char('(')?;
        match &self.args {
            FunctionArgs::Values(values) => {
                for (i, arg) in values.iter().enumerate() {
                    if i > 0 {
                        dest.write_str(if format.minify { "," } else { ", " })?;
                    }
                    arg.write_to(dest, format)?;
                }
            }
            FunctionArgs::Raw(units) => {
                let minify = format.minify
                    && !(self.kind == FunctionKind::IeCompat && format.keep_ie_spacing);
                write_sequence(dest, units, minify)?;
            }
        }
        dest.write_char(')')
    }
}

impl PartialEq for FunctionValue {
    fn eq(&self, other: &Self) -> bool {
        if !self.name.eq_ignore_ascii_case(&other.name) || self.kind != other.kind {
            return false;
        }
        // Typed and raw arguments are distinct forms.
        match (&self.args, &other.args) {
            (FunctionArgs::Values(a), FunctionArgs::Values(b)) => a == b,
            (FunctionArgs::Raw(a), FunctionArgs::Raw(b)) => {
                sequence_to_string(a) == sequence_to_string(b)
            }
            _ => false,
        }
    }
}

impl Eq for FunctionValue {}

impl Hash for FunctionValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.to_ascii_lowercase().hash(state);
        self.kind.hash(state);
        match &self.args {
            FunctionArgs::Values(values) => {
                0u8.hash(state);
                values.hash(state);
            }
            FunctionArgs::Raw(units) => {
                1u8.hash(state);
                sequence_to_string(units).hash(state);
            }
        }
    }
}

impl fmt::Display for FunctionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f, Format::CANONICAL)
    }
}
