use schema::HazardKind;
use std::fmt;

use crate::battle::field::SideId;

/// Main error type for the Monster Arena combat engine.
///
/// In-game non-events (a miss, an immune status, an unregistered effect) are
/// deliberately NOT errors: they resolve to ordinary message actions and
/// empty reaction lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A contract violation detected before the first turn runs
    Setup(SetupError),
    /// An internal-consistency failure; the battle must be abandoned
    Internal(InternalError),
    /// Error related to content catalog lookup or parsing
    Content(ContentError),
}

/// Setup-time contract violations. These are programmer/integration errors
/// and fail fast from constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    /// A side was configured with no roster members
    EmptyRoster(SideId),
    /// Slot count per side must be 1, 2, or 3
    InvalidSlotCount(usize),
    /// A roster member references content missing from the catalogs
    UnknownContent { creature: String, id: String },
    /// A roster member was built with no usable moves
    NoMoves(String),
}

/// Fatal engine bugs. These abort the battle rather than silently truncate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalError {
    /// The battle queue exceeded its iteration ceiling, which means an
    /// effect graph is feeding reactions back into itself
    ReactionLimitExceeded { executed: usize, limit: usize },
}

/// Errors related to content catalog operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    MoveNotFound(String),
    SpeciesNotFound(String),
    AbilityNotFound(String),
    ItemNotFound(String),
    /// A hazard kind appeared in content the engine has no rule for
    UnknownHazard(HazardKind),
    /// Catalog data failed to parse or was structurally invalid
    Malformed(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Setup(err) => write!(f, "setup error: {}", err),
            EngineError::Internal(err) => write!(f, "internal engine failure: {}", err),
            EngineError::Content(err) => write!(f, "content error: {}", err),
        }
    }
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupError::EmptyRoster(side) => write!(f, "side {:?} has an empty roster", side),
            SetupError::InvalidSlotCount(count) => {
                write!(f, "invalid slot count: {} (must be 1-3)", count)
            }
            SetupError::UnknownContent { creature, id } => {
                write!(f, "{} references unknown content id '{}'", creature, id)
            }
            SetupError::NoMoves(creature) => write!(f, "{} has no usable moves", creature),
        }
    }
}

impl fmt::Display for InternalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InternalError::ReactionLimitExceeded { executed, limit } => write!(
                f,
                "battle queue executed {} actions, exceeding the ceiling of {}; \
                 the effect graph is malformed",
                executed, limit
            ),
        }
    }
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentError::MoveNotFound(id) => write!(f, "move not found: '{}'", id),
            ContentError::SpeciesNotFound(id) => write!(f, "species not found: '{}'", id),
            ContentError::AbilityNotFound(id) => write!(f, "ability not found: '{}'", id),
            ContentError::ItemNotFound(id) => write!(f, "item not found: '{}'", id),
            ContentError::UnknownHazard(kind) => write!(f, "no rule for hazard {:?}", kind),
            ContentError::Malformed(details) => write!(f, "malformed catalog data: {}", details),
        }
    }
}

impl std::error::Error for EngineError {}
impl std::error::Error for SetupError {}
impl std::error::Error for InternalError {}
impl std::error::Error for ContentError {}

impl From<SetupError> for EngineError {
    fn from(err: SetupError) -> Self {
        EngineError::Setup(err)
    }
}

impl From<InternalError> for EngineError {
    fn from(err: InternalError) -> Self {
        EngineError::Internal(err)
    }
}

impl From<ContentError> for EngineError {
    fn from(err: ContentError) -> Self {
        EngineError::Content(err)
    }
}

/// Type alias for Results using EngineError
pub type EngineResult<T> = Result<T, EngineError>;

/// Type alias for Results using ContentError
pub type ContentResult<T> = Result<T, ContentError>;
