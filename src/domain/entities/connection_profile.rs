use url::Url;

use crate::domain::errors::ConfigurationError;
use crate::domain::value_objects::DriverKind;

/// Database login. The password never shows up in Debug output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Immutable description of the target database.
///
/// Building a profile derives the driver-specific connection descriptor but
/// never opens a connection.
#[derive(Debug, Clone)]
pub struct ConnectionProfile {
    kind: DriverKind,
    host: String,
    database: String,
    credentials: Credentials,
    descriptor: Url,
}

impl ConnectionProfile {
    /// Build a profile from raw settings, rejecting unknown driver kinds
    pub fn configure(
        driver: &str,
        host: &str,
        database: &str,
        username: &str,
        password: &str,
    ) -> Result<Self, ConfigurationError> {
        let kind: DriverKind = driver.parse()?;
        Self::new(kind, host, database, Credentials::new(username, password))
    }

    pub fn new(
        kind: DriverKind,
        host: &str,
        database: &str,
        credentials: Credentials,
    ) -> Result<Self, ConfigurationError> {
        let host = host.trim();
        let database = database.trim();

        if database.is_empty() {
            return Err(ConfigurationError::invalid_setting(
                "database",
                "cannot be empty",
            ));
        }
        if host.is_empty() && kind != DriverKind::Sqlite {
            return Err(ConfigurationError::invalid_setting(
                "host",
                format!("cannot be empty for {} connections", kind),
            ));
        }

        let descriptor = Self::build_descriptor(kind, host, database)?;

        Ok(Self {
            kind,
            host: host.to_string(),
            database: database.to_string(),
            credentials,
            descriptor,
        })
    }

    fn build_descriptor(
        kind: DriverKind,
        host: &str,
        database: &str,
    ) -> Result<Url, ConfigurationError> {
        if kind == DriverKind::Sqlite {
            return Ok(Url::parse(&format!("sqlite:{}.sqlite?mode=rwc", database))?);
        }

        let mut url = Url::parse(&format!("{}://{}", kind, host))?;
        url.set_path(&format!("/{}", database));

        if url.port().is_none() {
            if let Some(port) = kind.default_port() {
                url.set_port(Some(port)).map_err(|_| {
                    ConfigurationError::invalid_setting("host", "does not accept a port")
                })?;
            }
        }
        if kind == DriverKind::Mysql {
            url.query_pairs_mut().append_pair("charset", "utf8mb4");
        }

        Ok(url)
    }

    pub fn kind(&self) -> DriverKind {
        self.kind
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Driver-specific connection string without credentials; safe to log
    pub fn connection_string(&self) -> &str {
        self.descriptor.as_str()
    }

    /// Connection URL with credentials applied (percent-encoded).
    /// File-backed SQLite descriptors carry no credentials.
    pub fn connection_url(&self) -> Result<Url, ConfigurationError> {
        let mut url = self.descriptor.clone();
        if self.kind == DriverKind::Sqlite || self.credentials.username.is_empty() {
            return Ok(url);
        }

        url.set_username(&self.credentials.username).map_err(|_| {
            ConfigurationError::invalid_setting("username", "cannot be applied to descriptor")
        })?;
        if !self.credentials.password.is_empty() {
            url.set_password(Some(&self.credentials.password)).map_err(|_| {
                ConfigurationError::invalid_setting("password", "cannot be applied to descriptor")
            })?;
        }

        Ok(url)
    }
}
