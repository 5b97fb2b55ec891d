use core::fmt;
use core::str::FromStr;

/// Scalar base type used for declared destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScalarType {
    #[default]
    Float,
    Half,
    Min16Float,
}

impl ScalarType {
    pub fn keyword(self) -> &'static str {
        match self {
            ScalarType::Float => "float",
            ScalarType::Half => "half",
            ScalarType::Min16Float => "min16float",
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for ScalarType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "float" => Ok(ScalarType::Float),
            "half" => Ok(ScalarType::Half),
            "min16float" => Ok(ScalarType::Min16Float),
            other => Err(format!(
                "unknown scalar type {other:?} (expected float, half or min16float)"
            )),
        }
    }
}

/// Output knobs for [`crate::Translator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TranslateOptions {
    pub scalar: ScalarType,
    /// Prefix assignments with the destination type (`float2 r0.xy = ...`).
    pub declare_types: bool,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            scalar: ScalarType::Float,
            declare_types: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_type_parses_its_keyword() {
        for ty in [ScalarType::Float, ScalarType::Half, ScalarType::Min16Float] {
            assert_eq!(ty.keyword().parse::<ScalarType>(), Ok(ty));
        }
        assert!("double".parse::<ScalarType>().is_err());
    }
}
