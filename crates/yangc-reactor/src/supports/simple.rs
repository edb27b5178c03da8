//! Supports for token statements.
//!
//! Most statements carry a single argument and no resolution behavior of
//! their own (prefix, description, revision, config, ...). They share one
//! [`SimpleSupport`] parameterized by keyword, argument parser and an
//! optional cardinality table; their meaning lives in the hooks of the
//! statements that contain them.

use url::Url;
use yangc_model::{Revision, SourceRef};

use crate::argument::{Argument, RangeArg};
use crate::error::{ErrorKind, SourceError};
use crate::support::{StatementSupport, SubstatementValidator};

/// Parses a raw argument for one keyword.
pub type ArgumentParser =
    fn(keyword: &str, raw: Option<&str>, at: &SourceRef) -> Result<Argument, SourceError>;

/// A statement kind with no phase behavior.
pub struct SimpleSupport {
    keyword: &'static str,
    parser: ArgumentParser,
    validator: Option<SubstatementValidator>,
}

impl SimpleSupport {
    /// Create a simple support with unconstrained substatements.
    pub fn new(keyword: &'static str, parser: ArgumentParser) -> Self {
        Self {
            keyword,
            parser,
            validator: None,
        }
    }

    /// Constrain the substatement set.
    pub fn with_validator(mut self, validator: SubstatementValidator) -> Self {
        self.validator = Some(validator);
        self
    }
}

impl StatementSupport for SimpleSupport {
    fn keyword(&self) -> &str {
        self.keyword
    }

    fn parse_argument(
        &self,
        raw: Option<&str>,
        at: &SourceRef,
    ) -> Result<Argument, SourceError> {
        (self.parser)(self.keyword, raw, at)
    }

    fn substatement_validator(&self) -> Option<&SubstatementValidator> {
        self.validator.as_ref()
    }
}

/// Reject a missing argument.
pub fn require_argument<'a>(
    keyword: &str,
    raw: Option<&'a str>,
    at: &SourceRef,
) -> Result<&'a str, SourceError> {
    raw.ok_or_else(|| {
        SourceError::new(
            ErrorKind::Syntax,
            at.clone(),
            format!("'{}' requires an argument", keyword),
        )
    })
}

/// Identifier argument (module names, prefixes, node names).
pub fn identifier(
    keyword: &str,
    raw: Option<&str>,
    at: &SourceRef,
) -> Result<Argument, SourceError> {
    let arg = require_argument(keyword, raw, at)?;
    if arg.is_empty() || !arg.chars().all(|c| c.is_ascii_alphanumeric() || "-_.:".contains(c)) {
        return Err(SourceError::new(
            ErrorKind::Syntax,
            at.clone(),
            format!("'{}' argument '{}' is not a valid identifier", keyword, arg),
        ));
    }
    Ok(Argument::Str(arg.to_string()))
}

/// Free-form text argument (description, organization, ...).
pub fn text(keyword: &str, raw: Option<&str>, at: &SourceRef) -> Result<Argument, SourceError> {
    let arg = require_argument(keyword, raw, at)?;
    Ok(Argument::Str(arg.to_string()))
}

/// Namespace URI argument.
pub fn uri(keyword: &str, raw: Option<&str>, at: &SourceRef) -> Result<Argument, SourceError> {
    let arg = require_argument(keyword, raw, at)?;
    Url::parse(arg)
        .map(Argument::Uri)
        .map_err(|e| {
            SourceError::new(
                ErrorKind::Syntax,
                at.clone(),
                format!("'{}' argument '{}' is not a valid URI: {}", keyword, arg, e),
            )
        })
}

/// `YYYY-MM-DD` revision date argument.
pub fn revision_date(
    keyword: &str,
    raw: Option<&str>,
    at: &SourceRef,
) -> Result<Argument, SourceError> {
    let arg = require_argument(keyword, raw, at)?;
    Revision::parse(arg)
        .map(Argument::Revision)
        .map_err(|e| SourceError::new(ErrorKind::Syntax, at.clone(), e.to_string()))
}

/// `true`/`false` argument.
pub fn boolean(keyword: &str, raw: Option<&str>, at: &SourceRef) -> Result<Argument, SourceError> {
    let arg = require_argument(keyword, raw, at)?;
    match arg {
        "true" => Ok(Argument::Bool(true)),
        "false" => Ok(Argument::Bool(false)),
        other => Err(SourceError::new(
            ErrorKind::Syntax,
            at.clone(),
            format!("'{}' argument must be 'true' or 'false', got '{}'", keyword, other),
        )),
    }
}

/// `1`/`1.1` yang-version argument.
pub fn yang_version(
    keyword: &str,
    raw: Option<&str>,
    at: &SourceRef,
) -> Result<Argument, SourceError> {
    let arg = require_argument(keyword, raw, at)?;
    match arg {
        "1" | "1.1" => Ok(Argument::Str(arg.to_string())),
        other => Err(SourceError::new(
            ErrorKind::Syntax,
            at.clone(),
            format!("unsupported yang-version '{}'", other),
        )),
    }
}

/// `current`/`deprecated`/`obsolete` status argument.
pub fn status(keyword: &str, raw: Option<&str>, at: &SourceRef) -> Result<Argument, SourceError> {
    let arg = require_argument(keyword, raw, at)?;
    match arg {
        "current" | "deprecated" | "obsolete" => Ok(Argument::Str(arg.to_string())),
        other => Err(SourceError::new(
            ErrorKind::Syntax,
            at.clone(),
            format!("'{}' argument '{}' is not a valid status", keyword, other),
        )),
    }
}

/// Range restriction argument.
pub fn range(keyword: &str, raw: Option<&str>, at: &SourceRef) -> Result<Argument, SourceError> {
    let arg = require_argument(keyword, raw, at)?;
    RangeArg::parse(arg)
        .map(Argument::Range)
        .map_err(|e| SourceError::new(ErrorKind::Syntax, at.clone(), e))
}
