//! Contents of the `debug.xml` placed in debug driver archives.

use crate::config::DebugConfig;
use crate::context::PackagingContext;
use crate::error::{PackError, Result};
use log::debug;
use std::fs;
use std::io::ErrorKind;

/// Renders a debug descriptor pointing the driver at `config`'s endpoint.
///
/// # Examples
///
/// ```
/// use shellfoundry_packager::config::DebugConfig;
/// use shellfoundry_packager::debug_descriptor::render;
///
/// let xml = render(&DebugConfig::default());
/// assert!(xml.contains("<Host>localhost</Host>"));
/// assert!(xml.contains("<Port>5678</Port>"));
/// ```
#[must_use]
pub fn render(config: &DebugConfig) -> String {
    format!(
        concat!(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n",
            "<Debug>\n",
            "  <Enabled>true</Enabled>\n",
            "  <Host>{host}</Host>\n",
            "  <Port>{port}</Port>\n",
            "</Debug>\n",
        ),
        host = escape(&config.host),
        port = config.port,
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Returns the descriptor bytes for a debug package.
///
/// The project's own `debug.xml` is used verbatim when present; otherwise one
/// is rendered from `config`.
///
/// # Errors
///
/// Returns [`PackError::Io`] if the project file exists but cannot be read.
pub fn load_or_render(context: &PackagingContext, config: &DebugConfig) -> Result<Vec<u8>> {
    let path = context.debug_descriptor_path();
    match fs::read(&path) {
        Ok(bytes) => {
            debug!("using project debug descriptor {path}");
            Ok(bytes)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("generating debug descriptor for {}:{}", config.host, config.port);
            Ok(render(config).into_bytes())
        }
        Err(e) => Err(PackError::Io(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    fn project() -> (TempDir, PackagingContext) {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let root = Utf8PathBuf::try_from(temp_dir.path().to_owned()).expect("non-UTF8 temp path");
        (temp_dir, PackagingContext::new(root, true))
    }

    #[test]
    fn project_file_takes_precedence() {
        let (_temp_dir, context) = project();
        fs::write(context.debug_descriptor_path(), "<Debug>custom</Debug>").expect("write");

        let bytes = load_or_render(&context, &DebugConfig::default()).expect("descriptor");

        assert_eq!(bytes, b"<Debug>custom</Debug>");
    }

    #[test]
    fn generated_descriptor_uses_configured_endpoint() {
        let (_temp_dir, context) = project();
        let config = DebugConfig {
            host: "10.0.0.5".to_owned(),
            port: 3000,
        };

        let bytes = load_or_render(&context, &config).expect("descriptor");
        let xml = String::from_utf8(bytes).expect("utf-8");

        assert!(xml.contains("<Host>10.0.0.5</Host>"));
        assert!(xml.contains("<Port>3000</Port>"));
    }

    #[test]
    fn host_is_escaped() {
        let config = DebugConfig {
            host: "a<b&c".to_owned(),
            port: 1,
        };

        assert!(render(&config).contains("<Host>a&lt;b&amp;c</Host>"));
    }
}
