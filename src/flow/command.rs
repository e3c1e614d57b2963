//! Commands: the runtime branching tokens of compiled flows.
//!
//! Interactive steps complete with a `Command`; decision flows route on the
//! command's operation. Operations are resolved enum constants so that
//! diagram matchers and host components agree on identity by name.

use std::fmt;

use super::value::Value;

/// A resolved enum constant: the enum's simple type name plus constant name.
///
/// Two constants are the same operation exactly when both names match, which
/// is what lets matcher steps in a diagram line up with commands produced at
/// runtime by host components.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct EnumConstant {
    type_name: String,
    name: String,
}

impl EnumConstant {
    pub fn new(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        EnumConstant {
            type_name: type_name.into(),
            name: name.into(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for EnumConstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.type_name, self.name)
    }
}

/// Outcome of an interactive or computational step: an operation plus the
/// value to seed the next flow with.
#[derive(Clone, Debug)]
pub struct Command {
    pub op: EnumConstant,
    pub value: Value,
}

impl Command {
    pub fn new(op: EnumConstant, value: Value) -> Self {
        Command { op, value }
    }
}

/// The built-in operations of multi-step interactive forms.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum FormOperation {
    Cancel,
    Previous,
    Next,
    Submit,
}

impl FormOperation {
    pub const TYPE_NAME: &'static str = "FormOperation";

    pub const ALL: [FormOperation; 4] = [
        FormOperation::Cancel,
        FormOperation::Previous,
        FormOperation::Next,
        FormOperation::Submit,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FormOperation::Cancel => "CANCEL",
            FormOperation::Previous => "PREVIOUS",
            FormOperation::Next => "NEXT",
            FormOperation::Submit => "SUBMIT",
        }
    }

    /// The enum-constant form used in commands and matcher mappings.
    pub fn constant(&self) -> EnumConstant {
        EnumConstant::new(Self::TYPE_NAME, self.name())
    }

    /// Recognizes a constant as a form operation; `None` for anything else.
    pub fn from_constant(constant: &EnumConstant) -> Option<Self> {
        if constant.type_name() != Self::TYPE_NAME {
            return None;
        }
        Self::ALL
            .into_iter()
            .find(|op| op.name() == constant.name())
    }
}
