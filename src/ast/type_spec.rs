use std::fmt::{self, Display};

/// The resolved type of a symbol, as recorded by the upstream type checker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSpec {
    Int,
    Double,
    Boolean,
    Str,
    Function(Vec<TypeSpec>, Box<TypeSpec>),
    None,
}
impl Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TypeSpec::Int => f.write_str("int"),
            TypeSpec::Double => f.write_str("double"),
            TypeSpec::Boolean => f.write_str("boolean"),
            TypeSpec::Str => f.write_str("string"),
            TypeSpec::Function(params, ret) => {
                let params = params
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "({}) -> {}", params, ret)
            }
            TypeSpec::None => f.write_str("none"),
        }
    }
}

/// Whether a name denotes one of the built-in value types rather than a
/// variable. Identifiers naming a built-in type resolve to no address.
pub fn is_builtin_type_name(name: &str) -> bool {
    matches!(name, "int" | "double" | "boolean" | "string")
}
