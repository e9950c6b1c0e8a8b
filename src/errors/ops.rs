use std::fmt::{self, Display};

/// 比较运算符，用于超参数校验的错误提示
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    GreaterOrEqual,
    LessOrEqual,
    GreaterThan,
    LessThan,
}

impl ComparisonOperator {
    /// `lhs {self} rhs`是否成立（NaN一律不成立）
    pub fn holds(self, lhs: f32, rhs: f32) -> bool {
        match self {
            Self::GreaterOrEqual => lhs >= rhs,
            Self::LessOrEqual => lhs <= rhs,
            Self::GreaterThan => lhs > rhs,
            Self::LessThan => lhs < rhs,
        }
    }
}

impl Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operator_name = match self {
            Self::GreaterOrEqual => "≥",
            Self::LessOrEqual => "≤",
            Self::GreaterThan => ">",
            Self::LessThan => "<",
        };
        write!(f, "{}", operator_name)
    }
}
