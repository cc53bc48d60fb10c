use std::env;

/// Name of the environment variable holding the PostgreSQL connection URL.
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Database configuration.
///
/// Persistence is optional for planwright: when no URL is configured the
/// service still generates plans, it just never stores them.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Full PostgreSQL connection URL.
    pub database_url: String,
}

impl DbConfig {
    /// Build a config from `DATABASE_URL`, or `None` when it is unset or blank.
    pub fn from_env() -> Option<Self> {
        env::var(DATABASE_URL_VAR)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .map(Self::new)
    }

    /// Build a config from an explicit URL (CLI flags and tests).
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
        }
    }

    /// Extract the database name from the URL, ignoring any query string.
    ///
    /// Returns `None` if the URL has no path component.
    pub fn database_name(&self) -> Option<&str> {
        let without_query = self
            .database_url
            .split_once('?')
            .map_or(self.database_url.as_str(), |(base, _)| base);
        let authority_and_path = without_query
            .split_once("://")
            .map_or(without_query, |(_, rest)| rest);
        let (_, name) = authority_and_path.split_once('/')?;
        Some(name).filter(|s| !s.is_empty())
    }

    /// Return a URL pointing at the `postgres` maintenance database on the
    /// same server, keeping any query string. Used by `db-init` to issue
    /// `CREATE DATABASE`.
    pub fn maintenance_url(&self) -> String {
        let (base, query) = match self.database_url.split_once('?') {
            Some((base, query)) => (base, Some(query)),
            None => (self.database_url.as_str(), None),
        };
        let mut url = match base.rfind('/') {
            Some(pos) if self.database_name().is_some() => base[..pos].to_owned(),
            _ => base.trim_end_matches('/').to_owned(),
        };
        url.push_str("/postgres");
        if let Some(query) = query {
            url.push('?');
            url.push_str(query);
        }
        url
    }

    /// The URL with any password replaced by `***`, for log output.
    pub fn redacted_url(&self) -> String {
        let Some((scheme, rest)) = self.database_url.split_once("://") else {
            return self.database_url.clone();
        };
        let Some((userinfo, host)) = rest.split_once('@') else {
            return self.database_url.clone();
        };
        match userinfo.split_once(':') {
            Some((user, _)) => format!("{scheme}://{user}:***@{host}"),
            None => self.database_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_name_extraction() {
        let cfg = DbConfig::new("postgresql://localhost:5432/plans");
        assert_eq!(cfg.database_name(), Some("plans"));
    }

    #[test]
    fn database_name_ignores_query_string() {
        let cfg = DbConfig::new("postgres://u:p@db:5432/planwright?sslmode=require");
        assert_eq!(cfg.database_name(), Some("planwright"));
    }

    #[test]
    fn database_name_missing() {
        let cfg = DbConfig::new("postgresql://localhost:5432");
        assert_eq!(cfg.database_name(), None);
    }

    #[test]
    fn maintenance_url_replaces_db() {
        let cfg = DbConfig::new("postgresql://localhost:5432/planwright");
        assert_eq!(cfg.maintenance_url(), "postgresql://localhost:5432/postgres");
    }

    #[test]
    fn maintenance_url_keeps_query() {
        let cfg = DbConfig::new("postgresql://localhost:5432/planwright?sslmode=disable");
        assert_eq!(
            cfg.maintenance_url(),
            "postgresql://localhost:5432/postgres?sslmode=disable"
        );
    }

    #[test]
    fn redacts_password() {
        let cfg = DbConfig::new("postgresql://app:hunter2@db:5432/planwright");
        assert_eq!(cfg.redacted_url(), "postgresql://app:***@db:5432/planwright");

        let no_password = DbConfig::new("postgresql://db:5432/planwright");
        assert_eq!(no_password.redacted_url(), "postgresql://db:5432/planwright");
    }
}
