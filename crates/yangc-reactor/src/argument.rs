//! Typed statement arguments.
//!
//! Raw arguments are parsed into [`Argument`] values once, when the
//! statement context is created. Phase hooks and effective statements
//! only ever see the typed form.

use std::fmt;

use url::Url;
use yangc_model::{NumericRange, RangeError, Revision};

/// The typed argument of a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    /// Statement takes no argument.
    None,
    /// Identifier or free-form string.
    Str(String),
    /// Namespace URI.
    Uri(Url),
    /// Revision date.
    Revision(Revision),
    /// Range restriction bounds.
    Range(RangeArg),
    /// Boolean flag.
    Bool(bool),
}

impl Argument {
    /// The argument as a string, when it is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Argument::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The argument as a URI, when it is one.
    pub fn as_uri(&self) -> Option<&Url> {
        match self {
            Argument::Uri(u) => Some(u),
            _ => None,
        }
    }

    /// The argument as a revision, when it is one.
    pub fn as_revision(&self) -> Option<Revision> {
        match self {
            Argument::Revision(r) => Some(*r),
            _ => None,
        }
    }

    /// The argument as a range restriction, when it is one.
    pub fn as_range(&self) -> Option<&RangeArg> {
        match self {
            Argument::Range(r) => Some(r),
            _ => None,
        }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::None => Ok(()),
            Argument::Str(s) => write!(f, "{}", s),
            Argument::Uri(u) => write!(f, "{}", u),
            Argument::Revision(r) => write!(f, "{}", r),
            Argument::Range(r) => write!(f, "{}", r),
            Argument::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// One bound of a declared range restriction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeBound {
    /// The `min` keyword: the base type's lower bound.
    Min,
    /// The `max` keyword: the base type's upper bound.
    Max,
    /// An explicit integer literal.
    Value(i128),
}

impl fmt::Display for RangeBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeBound::Min => write!(f, "min"),
            RangeBound::Max => write!(f, "max"),
            RangeBound::Value(v) => write!(f, "{}", v),
        }
    }
}

/// A declared range restriction, before resolution against a base type.
///
/// Written `lo..hi` or as a single value; the `min`/`max` keywords stand
/// for the base type's bounds and resolve only once the base is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeArg {
    /// Lower bound.
    pub lo: RangeBound,
    /// Upper bound.
    pub hi: RangeBound,
}

impl RangeArg {
    /// Parse a range argument of the form `lo..hi` or a single value.
    pub fn parse(s: &str) -> Result<Self, String> {
        let parse_bound = |part: &str| -> Result<RangeBound, String> {
            match part.trim() {
                "min" => Ok(RangeBound::Min),
                "max" => Ok(RangeBound::Max),
                lit => lit
                    .parse::<i128>()
                    .map(RangeBound::Value)
                    .map_err(|_| format!("invalid range bound '{}'", lit)),
            }
        };

        match s.split_once("..") {
            Some((lo, hi)) => Ok(RangeArg {
                lo: parse_bound(lo)?,
                hi: parse_bound(hi)?,
            }),
            None => {
                let v = parse_bound(s)?;
                Ok(RangeArg { lo: v, hi: v })
            }
        }
    }

    /// Resolve the declared bounds against the base type's range and
    /// narrow the base accordingly.
    pub fn resolve(&self, base: &NumericRange) -> Result<NumericRange, RangeError> {
        let lo = match self.lo {
            RangeBound::Min => base.min(),
            RangeBound::Max => base.max(),
            RangeBound::Value(v) => v,
        };
        let hi = match self.hi {
            RangeBound::Min => base.min(),
            RangeBound::Max => base.max(),
            RangeBound::Value(v) => v,
        };
        base.narrow(NumericRange::new(lo, hi)?)
    }
}

impl fmt::Display for RangeArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.lo, self.hi)
    }
}
