//! Error type shared by all measurement stages.

/// Coarse classification of a [`MorphError`].
///
/// Callers that drive batches usually only need the kind to decide whether a
/// case should be retried with another point set or flagged for review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Too few points, a singular system, a fit that is not a circle, or an
    /// oversized resampling request.
    DegenerateInput,
    /// Candidate subsets cannot be generated from the given points.
    InsufficientPoints,
    /// A spline was evaluated outside of its fitted domain.
    OutOfRange,
    /// A resampling interval collapsed to nothing.
    EmptyRange,
}

/// Errors produced by fitting, interpolation and measurement.
#[derive(Debug, Clone, PartialEq)]
pub enum MorphError {
    /// Too few points for the requested operation.
    TooFewPoints {
        /// Required minimum number of points.
        needed: usize,
        /// Provided number of points.
        got: usize,
    },
    /// A landmark index does not address any point.
    IndexOutOfBounds {
        /// Offending index.
        index: usize,
        /// Number of available points.
        len: usize,
    },
    /// The algebraic fit degenerated to a line (quadratic coefficient ≈ 0).
    LineLikeFit,
    /// The algebraic fit produced no real, finite circle.
    NonCircularFit,
    /// A matrix that has to be inverted or decomposed was singular.
    SingularSystem(&'static str),
    /// Knots handed to the spline are not strictly increasing in y.
    NotStrictlyIncreasing {
        /// Position of the first knot that fails the ordering.
        index: usize,
    },
    /// A line is vertical (or otherwise has no finite slope).
    VerticalLine,
    /// Two points that should define a line or direction coincide.
    CoincidentPoints,
    /// Fewer than six points were given to the circle selector.
    InsufficientPoints {
        /// Required minimum number of points.
        needed: usize,
        /// Provided number of points.
        got: usize,
    },
    /// Spline evaluated outside of `[min, max]`.
    OutOfRange {
        /// Requested abscissa.
        value: f64,
        /// Lower end of the fitted domain.
        min: f64,
        /// Upper end of the fitted domain.
        max: f64,
    },
    /// A resampling range would need more than `max` samples.
    TooManySamples {
        /// Sample count the range and step ask for.
        requested: f64,
        /// Largest accepted sample count.
        max: usize,
    },
    /// Paired landmark lists differ in length.
    MismatchedPairs {
        /// Number of left-hand landmarks.
        left: usize,
        /// Number of right-hand landmarks.
        right: usize,
    },
    /// The two nearest boundary points share the same y coordinate.
    EmptyRange {
        /// Shared y coordinate.
        y: f64,
    },
}

impl MorphError {
    /// Coarse classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TooFewPoints { .. }
            | Self::IndexOutOfBounds { .. }
            | Self::LineLikeFit
            | Self::NonCircularFit
            | Self::SingularSystem(_)
            | Self::NotStrictlyIncreasing { .. }
            | Self::VerticalLine
            | Self::CoincidentPoints
            | Self::TooManySamples { .. }
            | Self::MismatchedPairs { .. } => ErrorKind::DegenerateInput,
            Self::InsufficientPoints { .. } => ErrorKind::InsufficientPoints,
            Self::OutOfRange { .. } => ErrorKind::OutOfRange,
            Self::EmptyRange { .. } => ErrorKind::EmptyRange,
        }
    }
}

impl std::fmt::Display for MorphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooFewPoints { needed, got } => {
                write!(f, "too few points: need {}, got {}", needed, got)
            }
            Self::IndexOutOfBounds { index, len } => {
                write!(f, "landmark index {} out of bounds for {} points", index, len)
            }
            Self::LineLikeFit => write!(f, "points are fitted by a line, not a circle"),
            Self::NonCircularFit => write!(f, "algebraic fit has no real circle"),
            Self::SingularSystem(what) => write!(f, "singular system: {}", what),
            Self::NotStrictlyIncreasing { index } => {
                write!(f, "spline knots not strictly increasing at knot {}", index)
            }
            Self::VerticalLine => write!(f, "line has no finite slope"),
            Self::CoincidentPoints => write!(f, "points defining a line coincide"),
            Self::InsufficientPoints { needed, got } => {
                write!(
                    f,
                    "insufficient points for subset selection: need {}, got {}",
                    needed, got
                )
            }
            Self::OutOfRange { value, min, max } => {
                write!(f, "{} outside of spline domain [{}, {}]", value, min, max)
            }
            Self::TooManySamples { requested, max } => {
                write!(f, "resampling asks for {} samples, at most {} allowed", requested, max)
            }
            Self::MismatchedPairs { left, right } => {
                write!(f, "{} left landmarks paired with {} right landmarks", left, right)
            }
            Self::EmptyRange { y } => {
                write!(f, "empty resampling range: both nearest points at y = {}", y)
            }
        }
    }
}

impl std::error::Error for MorphError {}
