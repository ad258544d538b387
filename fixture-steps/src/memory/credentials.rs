// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Credential collaborators.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::error::{FixtureError, FixtureResult};
use crate::ports::CredentialPort;

/// Secrets read from a credentials file.
///
/// One `name=value` pair per line; blank lines and lines starting with `#`
/// are skipped. An unknown name is an error.
#[derive(Debug, Default)]
pub struct FileCredentials {
    secrets: HashMap<String, String>,
}

impl FileCredentials {
    /// Parse credentials file content.
    pub fn parse(content: &str) -> FixtureResult<Self> {
        let mut secrets = HashMap::new();

        for (line_no, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (name, value) = line.split_once('=').ok_or_else(|| {
                FixtureError::invalid_input(format!(
                    "credentials line {} is not a name=value pair",
                    line_no + 1
                ))
            })?;
            let name = name.trim();
            if name.is_empty() {
                return Err(FixtureError::invalid_input(format!(
                    "credentials line {} has an empty name",
                    line_no + 1
                )));
            }
            secrets.insert(name.to_string(), value.trim().to_string());
        }

        debug!("Loaded {} credential(s)", secrets.len());
        Ok(Self { secrets })
    }

    /// Read a credentials file.
    pub fn from_path(path: impl AsRef<Path>) -> FixtureResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Number of known secrets.
    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }
}

impl CredentialPort for FileCredentials {
    fn get_secret(&self, name: &str) -> FixtureResult<Option<String>> {
        self.secrets
            .get(name)
            .cloned()
            .map(Some)
            .ok_or_else(|| FixtureError::secret(name, "no entry in credentials file"))
    }
}

/// Map-backed secrets. Unknown names resolve to `None`.
#[derive(Debug, Default)]
pub struct MemoryCredentials {
    secrets: HashMap<String, String>,
}

impl MemoryCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a secret.
    pub fn with_secret(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.secrets.insert(name.into(), value.into());
        self
    }
}

impl CredentialPort for MemoryCredentials {
    fn get_secret(&self, name: &str) -> FixtureResult<Option<String>> {
        Ok(self.secrets.get(name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CREDENTIALS: &str = "\
# Test credentials
magento/tfa/OTP_SHARED_SECRET = ABCDEFGHIJKLMNOP

magento/carriers_fedex_password=p@ss=word
";

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let store = FileCredentials::parse(CREDENTIALS).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(
            store.get_secret("magento/tfa/OTP_SHARED_SECRET").unwrap(),
            Some("ABCDEFGHIJKLMNOP".to_string())
        );
    }

    #[test]
    fn test_value_may_contain_equals() {
        let store = FileCredentials::parse(CREDENTIALS).unwrap();
        assert_eq!(
            store.get_secret("magento/carriers_fedex_password").unwrap(),
            Some("p@ss=word".to_string())
        );
    }

    #[test]
    fn test_unknown_name_is_an_error() {
        let store = FileCredentials::parse(CREDENTIALS).unwrap();
        let err = store.get_secret("magento/missing").unwrap_err();
        assert!(matches!(err, FixtureError::Secret { ref name, .. } if name == "magento/missing"));
    }

    #[test]
    fn test_malformed_line_rejected() {
        assert!(matches!(
            FileCredentials::parse("just-a-name").unwrap_err(),
            FixtureError::InvalidInput(_)
        ));
        assert!(FileCredentials::parse("=value").is_err());
    }

    #[test]
    fn test_from_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "api/token=t0k3n").unwrap();

        let store = FileCredentials::from_path(file.path()).unwrap();
        assert_eq!(store.get_secret("api/token").unwrap(), Some("t0k3n".to_string()));
    }

    #[test]
    fn test_memory_credentials_absent_for_unknown() {
        let store = MemoryCredentials::new().with_secret("a", "1");
        assert_eq!(store.get_secret("a").unwrap(), Some("1".to_string()));
        assert_eq!(store.get_secret("b").unwrap(), None);
    }
}
