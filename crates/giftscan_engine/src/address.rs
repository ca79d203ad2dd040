use giftscan_core::Identifier;
use thiserror::Error;
use url::Url;

/// Template for collectible gift pages; `{name}` is replaced by the collection name.
pub const DEFAULT_BASE_TEMPLATE: &str = "https://t.me/nft/{name}-";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("collection name must not be empty")]
    EmptyName,
    #[error("collection name {0:?} contains characters not allowed in a url path")]
    InvalidName(String),
    #[error("base address {base:?} is not a valid url: {message}")]
    InvalidBase { base: String, message: String },
    #[error("unsupported url scheme {0:?}, expected http or https")]
    UnsupportedScheme(String),
}

/// Base address that a page identifier is appended to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetAddress {
    base: String,
}

impl TargetAddress {
    pub fn new(base: impl Into<String>) -> Result<Self, AddressError> {
        let base = base.into();
        // Validate with a representative identifier appended.
        let probe = Url::parse(&format!("{base}1")).map_err(|err| AddressError::InvalidBase {
            base: base.clone(),
            message: err.to_string(),
        })?;
        match probe.scheme() {
            "http" | "https" => Ok(Self { base }),
            other => Err(AddressError::UnsupportedScheme(other.to_string())),
        }
    }

    /// Builds the base address for a named collection from a `{name}` template.
    pub fn for_collection(template: &str, name: &str) -> Result<Self, AddressError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AddressError::EmptyName);
        }
        if name
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#' | '%' | '\\'))
        {
            return Err(AddressError::InvalidName(name.to_string()));
        }
        Self::new(template.replace("{name}", name))
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn url_for(&self, identifier: Identifier) -> Result<Url, url::ParseError> {
        Url::parse(&format!("{}{}", self.base, identifier))
    }
}
