//! Credential profile loading
//!
//! Reads one named section from an INI-style credential file (the format of
//! `~/.aws/credentials`) into a validated [`CredentialProfile`].

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use url::Url;

use crate::error::{Error, Result};

/// Credential file used when none is given on the command line
pub const DEFAULT_CREDENTIAL_PATH: &str = "~/.aws/credentials";

/// Profile section used when none is given on the command line
pub const DEFAULT_PROFILE: &str = "default";

/// Region used when the profile does not set one
pub const DEFAULT_REGION: &str = "us-east-1";

/// How bucket names are placed in request URLs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressingStyle {
    /// Path-style when a custom endpoint is configured, virtual-hosted otherwise
    #[default]
    Auto,
    /// `https://endpoint/bucket/key`
    Path,
    /// `https://bucket.endpoint/key`
    Virtual,
}

impl FromStr for AddressingStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "path" => Ok(Self::Path),
            "virtual" => Ok(Self::Virtual),
            other => Err(Error::Config(format!(
                "addressing_style must be 'auto', 'path' or 'virtual', got '{other}'"
            ))),
        }
    }
}

/// Connection parameters read from one credential file section
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialProfile {
    pub name: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
    pub region: String,
    pub endpoint_url: Option<Url>,
    pub addressing_style: AddressingStyle,
}

impl fmt::Debug for CredentialProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialProfile")
            .field("name", &self.name)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .field("region", &self.region)
            .field("endpoint_url", &self.endpoint_url.as_ref().map(Url::as_str))
            .field("addressing_style", &self.addressing_style)
            .finish()
    }
}

impl CredentialProfile {
    /// Load `section` from the credential file at `path`.
    ///
    /// A leading `~` in `path` is expanded to the user's home directory.
    pub fn load(path: &str, section: &str) -> Result<Self> {
        let path = expand_tilde(path);
        if !path.is_file() {
            return Err(Error::CredentialFileNotFound(path));
        }

        let content = std::fs::read_to_string(&path).map_err(|e| {
            tracing::debug!(path = %path.display(), error = %e, "Failed to read credential file");
            Error::CredentialFileNotFound(path.clone())
        })?;

        Self::parse(&content, section, &path)
    }

    /// Parse `section` out of credential file `content`.
    ///
    /// `path` is only used for error messages.
    pub fn parse(content: &str, section: &str, path: &Path) -> Result<Self> {
        let mut found = false;
        let mut in_section = false;
        let mut access_key_id = None;
        let mut secret_access_key = None;
        let mut session_token = None;
        let mut region = None;
        let mut endpoint_url = None;
        let mut addressing_style = AddressingStyle::default();

        for line in content.lines() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                in_section = line[1..line.len() - 1].trim() == section;
                found |= in_section;
                continue;
            }

            if !in_section {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                tracing::warn!(line = line, "Ignoring malformed credential line");
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            match key {
                "aws_access_key_id" => access_key_id = Some(value.to_string()),
                "aws_secret_access_key" => secret_access_key = Some(value.to_string()),
                "aws_session_token" => session_token = Some(value.to_string()),
                "region" => region = Some(value.to_string()),
                "endpoint_url" => endpoint_url = Some(parse_endpoint(value)?),
                "addressing_style" => addressing_style = value.parse()?,
                other => {
                    tracing::warn!(key = other, section = section, "Ignoring unknown credential key")
                }
            }
        }

        if !found {
            return Err(Error::CredentialSectionMissing {
                section: section.to_string(),
                path: path.to_path_buf(),
            });
        }

        let access_key_id = non_empty(access_key_id)
            .ok_or_else(|| missing_key("aws_access_key_id", section))?;
        let secret_access_key = non_empty(secret_access_key)
            .ok_or_else(|| missing_key("aws_secret_access_key", section))?;

        Ok(Self {
            name: section.to_string(),
            access_key_id,
            secret_access_key,
            session_token: non_empty(session_token),
            region: non_empty(region).unwrap_or_else(|| DEFAULT_REGION.to_string()),
            endpoint_url,
            addressing_style,
        })
    }

    /// Whether requests should use path-style bucket addressing
    pub fn force_path_style(&self) -> bool {
        match self.addressing_style {
            AddressingStyle::Path => true,
            AddressingStyle::Virtual => false,
            AddressingStyle::Auto => self.endpoint_url.is_some(),
        }
    }
}

/// Expand a leading `~` to the current user's home directory
pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}

fn parse_endpoint(value: &str) -> Result<Url> {
    let url = Url::parse(value)
        .map_err(|e| Error::Config(format!("invalid endpoint_url '{value}': {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(Error::Config(format!(
            "endpoint_url must use http or https, got '{scheme}'"
        ))),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn missing_key(key: &str, section: &str) -> Error {
    Error::Config(format!("{key} is required in section [{section}]"))
}
