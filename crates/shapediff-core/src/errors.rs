use thiserror::Error;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure the diff engine can report maps to one of these kinds. Each
/// kind has a stable error code suitable for CI tooling and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Model construction
    InvalidShapeId,
    DuplicateShape,
    UnresolvedTarget,
    InvalidMember,
    /// A model document could not be decoded into a shape graph
    InvalidModel,

    // Caller-supplied inputs
    InvalidSuppression,
    InvalidConfig,

    // Engine preconditions
    /// A shape id was placed in more than one of added/removed/matched
    PartitionViolation,
    /// An evaluator emitted an event for a shape absent from both models
    ContractViolation,

    // Encoding
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidShapeId => "ERR_INVALID_SHAPE_ID",
            ExErrorKind::DuplicateShape => "ERR_DUPLICATE_SHAPE",
            ExErrorKind::UnresolvedTarget => "ERR_UNRESOLVED_TARGET",
            ExErrorKind::InvalidMember => "ERR_INVALID_MEMBER",
            ExErrorKind::InvalidModel => "ERR_INVALID_MODEL",
            ExErrorKind::InvalidSuppression => "ERR_INVALID_SUPPRESSION",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::PartitionViolation => "ERR_PARTITION_VIOLATION",
            ExErrorKind::ContractViolation => "ERR_CONTRACT_VIOLATION",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// True for kinds that indicate a bug in the engine or a collaborator
    /// rather than bad caller input.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            ExErrorKind::PartitionViolation
                | ExErrorKind::ContractViolation
                | ExErrorKind::Internal
        )
    }
}

/// Canonical structured error type
///
/// Carries a classification kind for programmatic handling plus optional
/// context (operation, shape id) for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    shape_id: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            shape_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add shape ID context
    pub fn with_shape_id(mut self, id: impl Into<String>) -> Self {
        self.shape_id = Some(id.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the shape ID context, if any
    pub fn shape_id(&self) -> Option<&str> {
        self.shape_id.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(shape_id) = &self.shape_id {
            write!(f, " (shape_id: {})", shape_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Failures raised while assembling a shape graph
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// The text is not a well-formed `namespace#name[$member]` id
    #[error("Invalid shape id `{id}`: {reason}")]
    InvalidShapeId { id: String, reason: String },

    /// Two shapes share the same id
    #[error("Duplicate shape id: {shape_id}")]
    DuplicateShape { shape_id: String },

    /// A member targets a shape that is not defined in the same model
    #[error("Member {member_id} targets unknown shape {target}")]
    UnresolvedTarget { member_id: String, target: String },

    /// A member id does not belong to its container, or the container kind
    /// cannot carry members
    #[error("Invalid member {member_id}: {reason}")]
    InvalidMember { member_id: String, reason: String },

    /// A top-level shape was given a member id
    #[error("Top-level shape {shape_id} must not carry a member name")]
    MemberIdAtTopLevel { shape_id: String },
}

impl From<ModelError> for ExError {
    fn from(err: ModelError) -> Self {
        let message = err.to_string();
        match err {
            ModelError::InvalidShapeId { id, .. } => ExError::new(ExErrorKind::InvalidShapeId)
                .with_shape_id(id)
                .with_message(message),
            ModelError::DuplicateShape { shape_id } => ExError::new(ExErrorKind::DuplicateShape)
                .with_shape_id(shape_id)
                .with_op("build_model")
                .with_message(message),
            ModelError::UnresolvedTarget { member_id, .. } => {
                ExError::new(ExErrorKind::UnresolvedTarget)
                    .with_shape_id(member_id)
                    .with_op("build_model")
                    .with_message(message)
            }
            ModelError::InvalidMember { member_id, .. } => ExError::new(ExErrorKind::InvalidMember)
                .with_shape_id(member_id)
                .with_op("build_model")
                .with_message(message),
            ModelError::MemberIdAtTopLevel { shape_id } => {
                ExError::new(ExErrorKind::InvalidMember)
                    .with_shape_id(shape_id)
                    .with_op("build_model")
                    .with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for ExError {
    fn from(err: serde_json::Error) -> Self {
        ExError::new(ExErrorKind::Serialization).with_message(err.to_string())
    }
}

impl From<toml::de::Error> for ExError {
    fn from(err: toml::de::Error) -> Self {
        ExError::new(ExErrorKind::InvalidConfig).with_message(err.to_string())
    }
}
