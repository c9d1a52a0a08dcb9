use serde::{Deserialize, Serialize};

/// Target language of the generated test code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    JavaJunit4,
    JavaJunit5,
    KotlinJunit4,
    KotlinJunit5,
}

impl OutputFormat {
    pub fn is_kotlin(&self) -> bool {
        matches!(self, OutputFormat::KotlinJunit4 | OutputFormat::KotlinJunit5)
    }

    pub fn is_java(&self) -> bool {
        !self.is_kotlin()
    }
}

/// How a printable value is going to be embedded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RenderMode {
    #[default]
    Raw,
    Xml,
}

/// Semantic sub-type of a string, inferred from how the SUT consumes it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StringSpecialization {
    DateYyyyMmDd,
    Integer,
    Constant,
    DateFormatPattern,
    DateFormatUnknownPattern,
    Regex,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StringSpecializationInfo {
    pub specialization: StringSpecialization,
    /// Extra payload, eg the constant the tainted value was compared against
    pub value: String,
}

impl StringSpecializationInfo {
    pub fn new(specialization: StringSpecialization, value: impl Into<String>) -> Self {
        Self {
            specialization,
            value: value.into(),
        }
    }
}
