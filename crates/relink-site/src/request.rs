//! Synthetic requests built from link targets.

use std::borrow::Cow;

use percent_encoding::percent_decode_str;
use url::Url;

/// Error returned when an href cannot be turned into a request.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// The href is not a parseable absolute URL.
    #[error("Malformed URL \"{href}\": {source}")]
    Malformed {
        /// The offending href.
        href: String,
        /// Parser error.
        #[source]
        source: url::ParseError,
    },
    /// The URL uses a scheme that cannot be requested (e.g., `t3`, `ftp`).
    #[error("Unsupported scheme \"{scheme}\" in \"{href}\"")]
    UnsupportedScheme {
        /// The offending href.
        href: String,
        /// Its scheme.
        scheme: String,
    },
}

/// A GET request that is only ever used to probe site matching and routing.
///
/// It is never dispatched; it lives for one resolution attempt.
#[derive(Clone, Debug)]
pub struct SyntheticRequest {
    uri: Url,
}

impl SyntheticRequest {
    /// Build a request from an absolute `http`/`https` URL.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] for unparseable URLs and non-HTTP schemes.
    pub fn new(href: &str) -> Result<Self, RequestError> {
        let uri = Url::parse(href).map_err(|source| RequestError::Malformed {
            href: href.to_owned(),
            source,
        })?;

        if !matches!(uri.scheme(), "http" | "https") {
            return Err(RequestError::UnsupportedScheme {
                href: href.to_owned(),
                scheme: uri.scheme().to_owned(),
            });
        }

        Ok(Self { uri })
    }

    /// The parsed URL.
    pub fn uri(&self) -> &Url {
        &self.uri
    }

    /// Lower-cased host name.
    pub fn host(&self) -> &str {
        self.uri.host_str().unwrap_or_default()
    }

    /// Explicit port, or the scheme's default.
    pub fn port(&self) -> Option<u16> {
        self.uri.port_or_known_default()
    }

    /// Percent-encoded path, always starting with `/`.
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Path with percent-encoding removed, for filesystem and storage lookups.
    pub fn decoded_path(&self) -> Cow<'_, str> {
        percent_decode_str(self.uri.path()).decode_utf8_lossy()
    }

    /// Query string without `?`; empty when absent.
    pub fn query(&self) -> &str {
        self.uri.query().unwrap_or_default()
    }

    /// Fragment without `#`; empty when absent.
    pub fn fragment(&self) -> &str {
        self.uri.fragment().unwrap_or_default()
    }
}
