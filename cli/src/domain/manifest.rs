//! Compose manifest model: pure text assembly, no I/O.
//!
//! A manifest is a preamble, a list of service sections and a trailer. Each
//! service section owns its identity line (`container_name: ...`) and blocks
//! can only be spliced directly after it, so a splice can never miss its
//! anchor because of a template edit. The document is serialized once and
//! never parsed back.

use crate::domain::error::ManifestError;

const SERVICE_INDENT: &str = "  ";
const PROPERTY_INDENT: &str = "    ";

/// One service in the `services:` mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSection {
    key: &'static str,
    container_name: &'static str,
    leading: Vec<String>,
    spliced: Vec<String>,
    trailing: Vec<String>,
}

impl ServiceSection {
    /// Start a service whose identity line is `container_name: <container_name>`.
    #[must_use]
    pub fn new(key: &'static str, container_name: &'static str) -> Self {
        Self {
            key,
            container_name,
            leading: Vec::new(),
            spliced: Vec::new(),
            trailing: Vec::new(),
        }
    }

    /// Property lines rendered before the identity line.
    ///
    /// Lines are relative to the service body (`"image: x"`, `"  - net"`).
    #[must_use]
    pub fn before_identity<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.leading.extend(lines.into_iter().map(Into::into));
        self
    }

    /// Property lines rendered after the identity line and any spliced block.
    #[must_use]
    pub fn after_identity<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.trailing.extend(lines.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn key(&self) -> &str {
        self.key
    }

    /// The anchor line exactly as rendered.
    #[must_use]
    pub fn identity_line(&self) -> String {
        format!("{PROPERTY_INDENT}container_name: {}", self.container_name)
    }

    fn render_into(&self, out: &mut Vec<String>) {
        out.push(format!("{SERVICE_INDENT}{}:", self.key));
        let indent = |l: &String| format!("{PROPERTY_INDENT}{l}");
        out.extend(self.leading.iter().map(indent));
        out.push(self.identity_line());
        out.extend(self.spliced.iter().map(indent));
        out.extend(self.trailing.iter().map(indent));
    }
}

/// A compose document under construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestDocument {
    preamble: Vec<String>,
    services: Vec<ServiceSection>,
    trailer: Vec<String>,
}

impl ManifestDocument {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Top-level lines rendered before `services:` (e.g. named volumes).
    #[must_use]
    pub fn with_preamble<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preamble.extend(lines.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_service(mut self, service: ServiceSection) -> Self {
        self.services.push(service);
        self
    }

    /// Top-level lines rendered after the services (e.g. networks).
    #[must_use]
    pub fn with_trailer<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.trailer.extend(lines.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn service(&self, key: &str) -> Option<&ServiceSection> {
        self.services.iter().find(|s| s.key == key)
    }

    /// Insert `block` immediately after the identity line of service `key`.
    ///
    /// Repeated splices into the same service keep their order.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::AnchorMissing`] if the document has no such
    /// service.
    pub fn splice_after_identity(&mut self, key: &str, block: Vec<String>) -> Result<(), ManifestError> {
        let service = self
            .services
            .iter_mut()
            .find(|s| s.key == key)
            .ok_or_else(|| ManifestError::AnchorMissing {
                service: key.to_string(),
            })?;
        service.spliced.extend(block);
        Ok(())
    }

    /// The serialized document as lines.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let mut out = self.preamble.clone();
        out.push("services:".to_string());
        for (i, service) in self.services.iter().enumerate() {
            if i > 0 {
                out.push(String::new());
            }
            service.render_into(&mut out);
        }
        if !self.trailer.is_empty() {
            out.push(String::new());
            out.extend(self.trailer.iter().cloned());
        }
        out
    }

    /// The serialized document, newline-terminated.
    #[must_use]
    pub fn render(&self) -> String {
        let mut text = self.lines().join("\n");
        text.push('\n');
        text
    }
}

/// Render `value` as a YAML sequence item, quoting only when a plain scalar
/// would be misread.
#[must_use]
pub fn list_item(value: &str) -> String {
    format!("- {}", scalar(value))
}

/// Plain scalar when safe, otherwise a double-quoted one.
#[must_use]
pub fn scalar(value: &str) -> String {
    if needs_quotes(value) {
        let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
        format!("\"{escaped}\"")
    } else {
        value.to_string()
    }
}

fn needs_quotes(value: &str) -> bool {
    const LEADING: &[char] = &[
        '-', '?', ':', ',', '[', ']', '{', '}', '#', '&', '*', '!', '|', '>', '\'', '"', '%', '@',
        '`',
    ];
    value.is_empty()
        || value.starts_with(LEADING)
        || value.starts_with(char::is_whitespace)
        || value.ends_with(char::is_whitespace)
        || value.ends_with(':')
        || value.contains(": ")
        || value.contains(" #")
        || value.contains(['\n', '\r', '\t', '"', '\\'])
}
