//! Evaluation options.
//!
//! Hosts build an [`EvalOptions`] directly, parse the individual modes from
//! the usual option spellings, or (with the `serde` feature) deserialize the
//! whole struct from their own configuration files.

use std::fmt;
use std::str::FromStr;

/// When arithmetic is evaluated rather than emitted literally. Ordered from
/// most to least permissive.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum MathMode {
    /// Every operator is evaluated.
    Always,
    /// Division only inside parentheses; other operators everywhere.
    #[default]
    ParensDivision,
    /// Every operator only inside parentheses.
    Parens,
    /// Legacy spelling of [`MathMode::Parens`]; evaluated the same way.
    Strict,
}

impl MathMode {
    pub fn as_str(self) -> &'static str {
        match self {
            MathMode::Always => "always",
            MathMode::ParensDivision => "parens-division",
            MathMode::Parens => "parens",
            MathMode::Strict => "strict",
        }
    }
}

/// How relative `url()` paths are rewritten against the file's root path.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum RewriteUrls {
    #[default]
    Off,
    /// Only paths starting with `.`.
    Local,
    /// Every relative path.
    All,
}

impl RewriteUrls {
    pub fn as_str(self) -> &'static str {
        match self {
            RewriteUrls::Off => "off",
            RewriteUrls::Local => "local",
            RewriteUrls::All => "all",
        }
    }
}

/// An option value that is not one of the accepted spellings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseOptionError {
    pub option: &'static str,
    pub value: String,
}

impl fmt::Display for ParseOptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid value `{}` for option `{}`", self.value, self.option)
    }
}

impl std::error::Error for ParseOptionError {}

impl FromStr for MathMode {
    type Err = ParseOptionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "always" | "0" => Ok(MathMode::Always),
            "parens-division" | "1" => Ok(MathMode::ParensDivision),
            "parens" | "2" => Ok(MathMode::Parens),
            "strict" | "3" => Ok(MathMode::Strict),
            _ => Err(ParseOptionError {
                option: "math",
                value: value.to_string(),
            }),
        }
    }
}

impl FromStr for RewriteUrls {
    type Err = ParseOptionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "off" | "false" => Ok(RewriteUrls::Off),
            "local" => Ok(RewriteUrls::Local),
            "all" | "true" => Ok(RewriteUrls::All),
            _ => Err(ParseOptionError {
                option: "rewrite-urls",
                value: value.to_string(),
            }),
        }
    }
}

impl fmt::Display for MathMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for RewriteUrls {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options read during evaluation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, rename_all = "kebab-case")
)]
pub struct EvalOptions {
    pub math: MathMode,
    /// Reject mismatched units in arithmetic and compound units in output.
    pub strict_units: bool,
    pub rewrite_urls: RewriteUrls,
    /// Prefix for rewritten urls when a file carries no root path of its own.
    pub rootpath: String,
    /// Query appended to every non-`data:` url.
    pub url_args: String,
    pub num_precision: u32,
    pub compress: bool,
    pub max_mixin_depth: usize,
}

impl Default for EvalOptions {
    fn default() -> Self {
        EvalOptions {
            math: MathMode::default(),
            strict_units: false,
            rewrite_urls: RewriteUrls::default(),
            rootpath: String::new(),
            url_args: String::new(),
            num_precision: 8,
            compress: false,
            max_mixin_depth: 500,
        }
    }
}

impl EvalOptions {
    /// Generation options matching these evaluation options.
    pub fn css_context(&self) -> less_ir::CssContext {
        less_ir::CssContext {
            compress: self.compress,
            strict_units: self.strict_units,
            num_precision: Some(self.num_precision),
        }
    }
}
