//! The logged-in scribe, kept in a small JSON file between runs.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{ANONYMOUS, ClientError};

pub const SESSION_FILE_NAME: &str = ".citadel_user.json";

#[derive(Serialize, Deserialize)]
struct StoredSession {
    username: String,
}

/// Read once at startup. Only [`Session::login`] and [`Session::logout`]
/// change it afterwards.
#[derive(Debug)]
pub struct Session {
    /// `None` when there is nowhere to keep the session.
    path: Option<PathBuf>,
    username: Option<String>,
}

impl Session {
    /// `$HOME/.citadel_user.json`
    pub fn default_path() -> Result<PathBuf, ClientError> {
        std::env::var_os("HOME")
            .filter(|home| !home.is_empty())
            .map(|home| PathBuf::from(home).join(SESSION_FILE_NAME))
            .ok_or(ClientError::NoHome)
    }

    /// A missing or unreadable session file means nobody is logged in.
    pub fn load(path: PathBuf) -> Self {
        let username = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<StoredSession>(&raw) {
                Ok(stored) if !stored.username.trim().is_empty() => Some(stored.username),
                Ok(_) => None,
                Err(e) => {
                    tracing::warn!(path = %path.display(), "ignoring corrupt session file: {e}");
                    None
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(path = %path.display(), "could not read session file: {e}");
                None
            }
        };

        Session {
            path: Some(path),
            username,
        }
    }

    /// An anonymous session with no file behind it. Reading commands work as
    /// usual; logging in or out fails with [`ClientError::NoHome`].
    pub fn detached() -> Self {
        Session {
            path: None,
            username: None,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// The name mutating requests are made under.
    pub fn identity(&self) -> &str {
        self.username().unwrap_or(ANONYMOUS)
    }

    pub fn login(&mut self, username: &str) -> Result<(), ClientError> {
        let path = self.path.as_ref().ok_or(ClientError::NoHome)?;
        let raw = serde_json::to_string(&StoredSession {
            username: username.to_string(),
        })?;

        fs::write(path, raw).map_err(|source| ClientError::Session {
            path: path.clone(),
            source,
        })?;

        self.username = Some(username.to_string());
        Ok(())
    }

    pub fn logout(&mut self) -> Result<(), ClientError> {
        let path = self.path.as_ref().ok_or(ClientError::NoHome)?;
        match fs::remove_file(path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(source) => {
                return Err(ClientError::Session {
                    path: path.clone(),
                    source,
                });
            }
        }

        self.username = None;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_missing_file_is_anonymous() {
        let dir = tempdir().unwrap();
        let session = Session::load(dir.path().join(SESSION_FILE_NAME));

        assert_eq!(session.username(), None);
        assert_eq!(session.identity(), ANONYMOUS);
    }

    #[test]
    fn test_login_survives_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SESSION_FILE_NAME);

        let mut session = Session::load(path.clone());
        session.login("arya").unwrap();
        assert_eq!(session.identity(), "arya");

        let reloaded = Session::load(path.clone());
        assert_eq!(reloaded.username(), Some("arya"));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            r#"{"username":"arya"}"#
        );
    }

    #[test]
    fn test_logout_removes_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SESSION_FILE_NAME);

        let mut session = Session::load(path.clone());
        session.login("arya").unwrap();
        session.logout().unwrap();

        assert!(!path.exists());
        assert_eq!(session.identity(), ANONYMOUS);

        // logging out twice is fine
        session.logout().unwrap();
    }

    #[test]
    fn test_corrupt_file_is_anonymous() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SESSION_FILE_NAME);
        fs::write(&path, "{not json").unwrap();

        assert_eq!(Session::load(path).identity(), ANONYMOUS);
    }

    #[test]
    fn test_blank_username_is_anonymous() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SESSION_FILE_NAME);
        fs::write(&path, r#"{"username":"  "}"#).unwrap();

        assert_eq!(Session::load(path).username(), None);
    }

    #[test]
    fn test_login_into_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let mut session = Session::load(dir.path().join("nope").join(SESSION_FILE_NAME));

        assert!(matches!(
            session.login("arya"),
            Err(ClientError::Session { .. })
        ));
        assert_eq!(session.username(), None);
    }

    #[test]
    fn test_detached_session_reads_but_cannot_log_in() {
        let mut session = Session::detached();

        assert_eq!(session.path(), None);
        assert_eq!(session.identity(), ANONYMOUS);
        assert!(matches!(session.login("arya"), Err(ClientError::NoHome)));
        assert!(matches!(session.logout(), Err(ClientError::NoHome)));
        assert_eq!(session.username(), None);
    }
}
