use thiserror::Error;

/// Abi codec error variant
#[derive(Debug, Error)]
pub enum AbiError {
    #[error("Unsupport abi type, {0}")]
    UnsupportType(String),

    #[error("Tuple type expect components, {0}")]
    TupleComponents(String),

    #[error("Expect {expect} values, got {got}")]
    Arity { expect: usize, got: usize },

    #[error("Value {value} is not a valid {param}")]
    InvalidValue { param: String, value: String },

    #[error("Value {value} out of {param} range")]
    OutOfRange { param: String, value: String },

    #[error("Try read next element failed,{0}")]
    InsufficentInputs(String),

    #[error("Decode {0} failed, invalid encoding")]
    InvalidData(String),
}

impl AbiError {
    pub(crate) fn invalid_value<P: ToString, V: ToString>(param: P, value: V) -> Self {
        Self::InvalidValue {
            param: param.to_string(),
            value: value.to_string(),
        }
    }

    pub(crate) fn out_of_range<P: ToString, V: ToString>(param: P, value: V) -> Self {
        Self::OutOfRange {
            param: param.to_string(),
            value: value.to_string(),
        }
    }
}
