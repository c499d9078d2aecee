//! Parsing of `<syntax>` descriptor strings such as `<length> | auto` or
//! `<custom-ident>#`.

use std::fmt;

use crate::error::CssError;

/// Errors from compiling a syntax descriptor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
    #[error("syntax descriptor is empty")]
    EmptyInput,
    #[error("expected '|' between components at byte {0}")]
    ExpectedPipeBetweenComponents(usize),
    #[error("unclosed data type name")]
    UnclosedDataTypeName,
    #[error("unknown data type name <{0}>")]
    UnknownDataTypeName(String),
    #[error("unexpected end of descriptor")]
    UnexpectedEof,
    #[error("invalid start of component name at byte {0}")]
    InvalidNameStart(usize),
    #[error("'{0}' cannot be used as a component name")]
    InvalidName(String),
    #[error("<{0}> already repeats and takes no multiplier")]
    MultiplierOnPremultiplied(String),
}

impl From<SyntaxError> for CssError {
    fn from(err: SyntaxError) -> Self {
        CssError::Syntax(err.to_string())
    }
}

/// A data type name usable inside `<...>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Angle,
    BasicShape,
    Color,
    CustomIdent,
    Flex,
    Frequency,
    Image,
    Integer,
    Length,
    LengthPercentage,
    Number,
    Percentage,
    Resolution,
    String,
    Time,
    TransformFunction,
    /// Pre-multiplied: stands for `<transform-function>+`.
    TransformList,
    Url,
}

impl DataType {
    pub fn from_name(name: &str) -> Option<DataType> {
        Some(match name {
            "angle" => DataType::Angle,
            "basic-shape" => DataType::BasicShape,
            "color" => DataType::Color,
            "custom-ident" => DataType::CustomIdent,
            "flex" => DataType::Flex,
            "frequency" => DataType::Frequency,
            "image" => DataType::Image,
            "integer" => DataType::Integer,
            "length" => DataType::Length,
            "length-percentage" => DataType::LengthPercentage,
            "number" => DataType::Number,
            "percentage" => DataType::Percentage,
            "resolution" => DataType::Resolution,
            "string" => DataType::String,
            "time" => DataType::Time,
            "transform-function" => DataType::TransformFunction,
            "transform-list" => DataType::TransformList,
            "url" => DataType::Url,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            DataType::Angle => "angle",
            DataType::BasicShape => "basic-shape",
            DataType::Color => "color",
            DataType::CustomIdent => "custom-ident",
            DataType::Flex => "flex",
            DataType::Frequency => "frequency",
            DataType::Image => "image",
            DataType::Integer => "integer",
            DataType::Length => "length",
            DataType::LengthPercentage => "length-percentage",
            DataType::Number => "number",
            DataType::Percentage => "percentage",
            DataType::Resolution => "resolution",
            DataType::String => "string",
            DataType::Time => "time",
            DataType::TransformFunction => "transform-function",
            DataType::TransformList => "transform-list",
            DataType::Url => "url",
        }
    }

    /// The component a pre-multiplied type stands for.
    fn unpremultiply(self) -> Option<Component> {
        match self {
            DataType::TransformList => Some(Component {
                name: ComponentName::DataType(DataType::TransformFunction),
                multiplier: Some(Multiplier::Space),
            }),
            _ => None,
        }
    }

    /// Returns `true` for types whose values are numeric.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            DataType::Angle
                | DataType::Flex
                | DataType::Frequency
                | DataType::Integer
                | DataType::Length
                | DataType::LengthPercentage
                | DataType::Number
                | DataType::Percentage
                | DataType::Resolution
                | DataType::Time
        )
    }
}

/// How a component repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Multiplier {
    /// `+`: one or more, space separated.
    Space,
    /// `#`: one or more, comma separated.
    Comma,
}

/// A data type or a literal identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ComponentName {
    DataType(DataType),
    Ident(String),
}

impl fmt::Display for ComponentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentName::DataType(t) => write!(f, "<{}>", t.name()),
            ComponentName::Ident(name) => f.write_str(name),
        }
    }
}

/// One alternative of a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Component {
    name: ComponentName,
    multiplier: Option<Multiplier>,
}

impl Component {
    pub fn new(name: ComponentName, multiplier: Option<Multiplier>) -> Self {
        Self { name, multiplier }
    }

    pub fn name(&self) -> &ComponentName {
        &self.name
    }

    pub fn multiplier(&self) -> Option<Multiplier> {
        self.multiplier
    }

    /// `<transform-list>` becomes `<transform-function>+`; anything else is
    /// returned as is.
    pub fn unpremultiplied(&self) -> Component {
        match &self.name {
            ComponentName::DataType(t) => t.unpremultiply().unwrap_or_else(|| self.clone()),
            ComponentName::Ident(_) => self.clone(),
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        match self.multiplier {
            Some(Multiplier::Space) => f.write_str("+"),
            Some(Multiplier::Comma) => f.write_str("#"),
            None => Ok(()),
        }
    }
}

/// A compiled syntax descriptor: the universal `*` or a set of alternatives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Descriptor {
    components: Vec<Component>,
}

impl Descriptor {
    /// The universal descriptor `*`.
    pub fn universal() -> Self {
        Self::default()
    }

    /// Compile `text`.
    pub fn parse(text: &str) -> Result<Self, SyntaxError> {
        let input = text.trim_matches(|c: char| c.is_ascii_whitespace());
        if input.is_empty() {
            return Err(SyntaxError::EmptyInput);
        }
        if input == "*" {
            return Ok(Self::universal());
        }
        let mut parser = Parser { input, position: 0 };
        let components = parser.parse()?;
        Ok(Self { components })
    }

    /// Returns `true` for `*`.
    pub fn is_universal(&self) -> bool {
        self.components.is_empty()
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }
}

impl std::str::FromStr for Descriptor {
    type Err = SyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Descriptor::parse(s)
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_universal() {
            return f.write_str("*");
        }
        for (i, component) in self.components.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "{component}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

struct Parser<'a> {
    input: &'a str,
    position: usize,
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

fn is_name_char(c: char) -> bool {
    is_name_start(c) || c.is_ascii_digit() || c == '-'
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn bump(&mut self, c: char) {
        self.position += c.len_utf8();
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek().filter(|c| c.is_ascii_whitespace()) {
            self.bump(c);
        }
    }

    fn parse(&mut self) -> Result<Vec<Component>, SyntaxError> {
        let mut components = Vec::new();
        loop {
            components.push(self.parse_component()?);
            self.skip_whitespace();
            match self.peek() {
                None => return Ok(components),
                Some('|') => self.bump('|'),
                Some(_) => return Err(SyntaxError::ExpectedPipeBetweenComponents(self.position)),
            }
        }
    }

    fn parse_component(&mut self) -> Result<Component, SyntaxError> {
        self.skip_whitespace();
        let name = self.parse_name()?;
        let multiplier = self.parse_multiplier();
        if let ComponentName::DataType(t) = &name {
            if multiplier.is_some() && t.unpremultiply().is_some() {
                return Err(SyntaxError::MultiplierOnPremultiplied(t.name().to_string()));
            }
        }
        Ok(Component { name, multiplier })
    }

    fn parse_name(&mut self) -> Result<ComponentName, SyntaxError> {
        let c = self.peek().ok_or(SyntaxError::UnexpectedEof)?;
        if c == '<' {
            self.bump(c);
            return self.parse_data_type_name().map(ComponentName::DataType);
        }
        if !is_name_start(c) {
            return Err(SyntaxError::InvalidNameStart(self.position));
        }

        let start = self.position;
        while let Some(c) = self.peek().filter(|c| is_name_char(*c)) {
            self.bump(c);
        }
        let name = &self.input[start..self.position];
        if is_reserved_ident(name) {
            return Err(SyntaxError::InvalidName(name.to_string()));
        }
        Ok(ComponentName::Ident(name.to_string()))
    }

    fn parse_data_type_name(&mut self) -> Result<DataType, SyntaxError> {
        let rest = &self.input[self.position..];
        let end = rest.find('>').ok_or(SyntaxError::UnclosedDataTypeName)?;
        let name = &rest[..end];
        let ty = DataType::from_name(name)
            .ok_or_else(|| SyntaxError::UnknownDataTypeName(name.to_string()))?;
        self.position += end + 1;
        Ok(ty)
    }

    fn parse_multiplier(&mut self) -> Option<Multiplier> {
        let multiplier = match self.peek()? {
            '+' => Multiplier::Space,
            '#' => Multiplier::Comma,
            _ => return None,
        };
        self.position += 1;
        Some(multiplier)
    }
}

/// CSS-wide keywords and `default` are not valid custom identifiers.
fn is_reserved_ident(name: &str) -> bool {
    ["inherit", "initial", "unset", "revert", "revert-layer", "default"]
        .iter()
        .any(|r| name.eq_ignore_ascii_case(r))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Descriptor {
        Descriptor::parse(text).unwrap()
    }

    // ── Parsing ──────────────────────────────────────────────────────

    #[test]
    fn test_universal() {
        assert!(parse("*").is_universal());
        assert!(parse("  * ").is_universal());
        assert_eq!(parse("*").to_string(), "*");
    }

    #[test]
    fn test_alternatives() {
        let d = parse("<length> | <percentage>+ | auto");
        assert_eq!(d.components().len(), 3);
        assert_eq!(
            d.components()[0],
            Component::new(ComponentName::DataType(DataType::Length), None)
        );
        assert_eq!(d.components()[1].multiplier(), Some(Multiplier::Space));
        assert_eq!(d.components()[2].name(), &ComponentName::Ident("auto".into()));
        assert_eq!(d.to_string(), "<length> | <percentage>+ | auto");
    }

    #[test]
    fn test_comma_multiplier() {
        let d = parse("<custom-ident>#");
        assert_eq!(d.components()[0].multiplier(), Some(Multiplier::Comma));
        assert_eq!(d.to_string(), "<custom-ident>#");
    }

    #[test]
    fn test_transform_list_unpremultiplies() {
        let d = parse("<transform-list>");
        let inner = d.components()[0].unpremultiplied();
        assert_eq!(inner.name(), &ComponentName::DataType(DataType::TransformFunction));
        assert_eq!(inner.multiplier(), Some(Multiplier::Space));
    }

    #[test]
    fn test_from_str() {
        let d: Descriptor = "<color>".parse().unwrap();
        assert_eq!(d, parse(" <color> "));
    }

    // ── Errors ───────────────────────────────────────────────────────

    #[test]
    fn test_errors() {
        assert_eq!(Descriptor::parse("  "), Err(SyntaxError::EmptyInput));
        assert_eq!(Descriptor::parse("<length"), Err(SyntaxError::UnclosedDataTypeName));
        assert_eq!(
            Descriptor::parse("<lenght>"),
            Err(SyntaxError::UnknownDataTypeName("lenght".into()))
        );
        assert_eq!(
            Descriptor::parse("<length> <number>"),
            Err(SyntaxError::ExpectedPipeBetweenComponents(9))
        );
        assert_eq!(Descriptor::parse("<length> |"), Err(SyntaxError::UnexpectedEof));
        assert_eq!(Descriptor::parse("1px"), Err(SyntaxError::InvalidNameStart(0)));
        assert_eq!(
            Descriptor::parse("inherit"),
            Err(SyntaxError::InvalidName("inherit".into()))
        );
        assert_eq!(
            Descriptor::parse("<transform-list>#"),
            Err(SyntaxError::MultiplierOnPremultiplied("transform-list".into()))
        );
    }

    #[test]
    fn test_error_converts_to_syntax() {
        let err: CssError = SyntaxError::EmptyInput.into();
        assert_eq!(err.kind(), crate::error::ErrorKind::Syntax);
    }
}
