//! Token type / modifier catalog

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_kind {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Cow<'static, str>);

        impl $name {
            pub const fn new_static(name: &'static str) -> Self {
                Self(Cow::Borrowed(name))
            }

            pub fn new(name: impl Into<String>) -> Self {
                Self(Cow::Owned(name.into()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_kind! {
    /// Semantic token type name
    SemanticTokenType
}

string_kind! {
    /// Semantic token modifier name
    SemanticTokenModifier
}

impl SemanticTokenType {
    pub const NAMESPACE: Self = Self::new_static("namespace");
    pub const TYPE: Self = Self::new_static("type");
    pub const CLASS: Self = Self::new_static("class");
    pub const ENUM: Self = Self::new_static("enum");
    pub const INTERFACE: Self = Self::new_static("interface");
    pub const STRUCT: Self = Self::new_static("struct");
    pub const TYPE_PARAMETER: Self = Self::new_static("typeParameter");
    pub const PARAMETER: Self = Self::new_static("parameter");
    pub const VARIABLE: Self = Self::new_static("variable");
    pub const PROPERTY: Self = Self::new_static("property");
    pub const ENUM_MEMBER: Self = Self::new_static("enumMember");
    pub const EVENT: Self = Self::new_static("event");
    pub const FUNCTION: Self = Self::new_static("function");
    pub const METHOD: Self = Self::new_static("method");
    pub const MACRO: Self = Self::new_static("macro");
    pub const KEYWORD: Self = Self::new_static("keyword");
    pub const MODIFIER: Self = Self::new_static("modifier");
    pub const COMMENT: Self = Self::new_static("comment");
    pub const STRING: Self = Self::new_static("string");
    pub const NUMBER: Self = Self::new_static("number");
    pub const REGEXP: Self = Self::new_static("regexp");
    pub const OPERATOR: Self = Self::new_static("operator");
    pub const DECORATOR: Self = Self::new_static("decorator");
    pub const LABEL: Self = Self::new_static("label");

    /// Standard LSP token types, in legend order
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::NAMESPACE,
            Self::TYPE,
            Self::CLASS,
            Self::ENUM,
            Self::INTERFACE,
            Self::STRUCT,
            Self::TYPE_PARAMETER,
            Self::PARAMETER,
            Self::VARIABLE,
            Self::PROPERTY,
            Self::ENUM_MEMBER,
            Self::EVENT,
            Self::FUNCTION,
            Self::METHOD,
            Self::MACRO,
            Self::KEYWORD,
            Self::MODIFIER,
            Self::COMMENT,
            Self::STRING,
            Self::NUMBER,
            Self::REGEXP,
            Self::OPERATOR,
            Self::DECORATOR,
            Self::LABEL,
        ]
    }
}

impl SemanticTokenModifier {
    pub const DECLARATION: Self = Self::new_static("declaration");
    pub const DEFINITION: Self = Self::new_static("definition");
    pub const READONLY: Self = Self::new_static("readonly");
    pub const STATIC: Self = Self::new_static("static");
    pub const DEPRECATED: Self = Self::new_static("deprecated");
    pub const ABSTRACT: Self = Self::new_static("abstract");
    pub const ASYNC: Self = Self::new_static("async");
    pub const MODIFICATION: Self = Self::new_static("modification");
    pub const DOCUMENTATION: Self = Self::new_static("documentation");
    pub const DEFAULT_LIBRARY: Self = Self::new_static("defaultLibrary");

    /// Standard LSP token modifiers, in legend order
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::DECLARATION,
            Self::DEFINITION,
            Self::READONLY,
            Self::STATIC,
            Self::DEPRECATED,
            Self::ABSTRACT,
            Self::ASYNC,
            Self::MODIFICATION,
            Self::DOCUMENTATION,
            Self::DEFAULT_LIBRARY,
        ]
    }
}

/// Legend shape as exchanged during capability negotiation
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLegend {
    token_types: Vec<SemanticTokenType>,
    token_modifiers: Vec<SemanticTokenModifier>,
}

/// Semantic tokens legend
///
/// Lookup tables are built once in [`SemanticTokensLegend::new`]; a legend
/// never changes after construction. Build a new one to change the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawLegend", into = "RawLegend")]
pub struct SemanticTokensLegend {
    token_types: Vec<SemanticTokenType>,
    token_modifiers: Vec<SemanticTokenModifier>,
    type_ids: HashMap<String, u32>,
    modifier_bits: HashMap<String, u32>,
}

impl SemanticTokensLegend {
    pub fn new(
        token_types: Vec<SemanticTokenType>,
        token_modifiers: Vec<SemanticTokenModifier>,
    ) -> Self {
        let mut type_ids = HashMap::with_capacity(token_types.len());
        for (index, token_type) in token_types.iter().enumerate() {
            type_ids.entry(token_type.as_str().to_string()).or_insert(index as u32);
        }

        let mut modifier_bits = HashMap::with_capacity(token_modifiers.len());
        for (index, modifier) in token_modifiers.iter().enumerate() {
            match 1u32.checked_shl(index as u32) {
                Some(bit) => {
                    modifier_bits.entry(modifier.as_str().to_string()).or_insert(bit);
                }
                None => tracing::warn!(
                    modifier = modifier.as_str(),
                    index,
                    "Token modifier does not fit in a 32-bit mask"
                ),
            }
        }

        Self {
            token_types,
            token_modifiers,
            type_ids,
            modifier_bits,
        }
    }

    /// Build a legend from plain name lists
    pub fn from_names<T, M>(token_types: T, token_modifiers: M) -> Self
    where
        T: IntoIterator,
        T::Item: Into<String>,
        M: IntoIterator,
        M::Item: Into<String>,
    {
        Self::new(
            token_types.into_iter().map(SemanticTokenType::new).collect(),
            token_modifiers.into_iter().map(SemanticTokenModifier::new).collect(),
        )
    }

    pub fn token_types(&self) -> &[SemanticTokenType] {
        &self.token_types
    }

    pub fn token_modifiers(&self) -> &[SemanticTokenModifier] {
        &self.token_modifiers
    }

    /// Numeric id of a token type; empty or unknown names map to 0
    pub fn type_id(&self, name: &str) -> u32 {
        if name.is_empty() {
            return 0;
        }
        self.type_ids.get(name).copied().unwrap_or(0)
    }

    /// Numeric id of an optional token type
    pub fn token_type_id(&self, token_type: Option<&SemanticTokenType>) -> u32 {
        token_type.map_or(0, |t| self.type_id(t.as_str()))
    }

    /// Bitmask for a set of modifier names; unknown names contribute nothing
    pub fn modifier_mask<I>(&self, names: I) -> u32
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        names
            .into_iter()
            .filter_map(|name| self.modifier_bits.get(name.as_ref()).copied())
            .fold(0, |mask, bit| mask | bit)
    }

    pub fn token_type_name(&self, id: u32) -> Option<&str> {
        self.token_types.get(id as usize).map(|t| t.as_str())
    }

    pub fn modifier_names(&self, mask: u32) -> Vec<&str> {
        self.token_modifiers
            .iter()
            .take(u32::BITS as usize)
            .enumerate()
            .filter(|(i, _)| mask & (1u32 << *i) != 0)
            .map(|(_, m)| m.as_str())
            .collect()
    }
}

impl Default for SemanticTokensLegend {
    fn default() -> Self {
        Self::new(SemanticTokenType::defaults(), SemanticTokenModifier::defaults())
    }
}

impl From<RawLegend> for SemanticTokensLegend {
    fn from(raw: RawLegend) -> Self {
        Self::new(raw.token_types, raw.token_modifiers)
    }
}

impl From<SemanticTokensLegend> for RawLegend {
    fn from(legend: SemanticTokensLegend) -> Self {
        Self {
            token_types: legend.token_types,
            token_modifiers: legend.token_modifiers,
        }
    }
}
