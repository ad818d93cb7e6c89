use std::fmt::{Display, Formatter};

use serde::Serialize;

/// The numeric types of the language, totally ordered by promotion rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Type {
    Int,
    Long,
    Float,
}

impl Type {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "int" => Some(Type::Int),
            "long" => Some(Type::Long),
            "float" => Some(Type::Float),
            _ => None,
        }
    }

    /// Promotion rank. A binary operand of lower rank is widened to the
    /// other operand's type, never the reverse.
    pub fn rank(self) -> u16 {
        match self {
            Type::Int => 10,
            Type::Long => 100,
            Type::Float => 1000,
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Long => write!(f, "long"),
            Type::Float => write!(f, "float"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cast {
    None,
    Left(Type),
    Right(Type),
}

/// Decides which side of a binary operation must be widened, if any.
pub fn needs_cast(lhs: Type, rhs: Type) -> Cast {
    if lhs == rhs {
        Cast::None
    } else if lhs.rank() < rhs.rank() {
        Cast::Left(rhs)
    } else {
        Cast::Right(lhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_types_need_no_cast() {
        assert_eq!(needs_cast(Type::Int, Type::Int), Cast::None);
        assert_eq!(needs_cast(Type::Long, Type::Long), Cast::None);
        assert_eq!(needs_cast(Type::Float, Type::Float), Cast::None);
    }

    #[test]
    fn lower_rank_is_widened() {
        assert_eq!(needs_cast(Type::Int, Type::Long), Cast::Left(Type::Long));
        assert_eq!(needs_cast(Type::Long, Type::Int), Cast::Right(Type::Long));
        assert_eq!(needs_cast(Type::Int, Type::Float), Cast::Left(Type::Float));
        assert_eq!(
            needs_cast(Type::Float, Type::Long),
            Cast::Right(Type::Float)
        );
    }

    #[test]
    fn keywords() {
        assert_eq!(Type::from_keyword("int"), Some(Type::Int));
        assert_eq!(Type::from_keyword("long"), Some(Type::Long));
        assert_eq!(Type::from_keyword("float"), Some(Type::Float));
        assert_eq!(Type::from_keyword("read"), None);
    }
}
