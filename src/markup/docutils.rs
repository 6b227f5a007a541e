//! docutils-backed markup engine
//!
//! Each render spawns the Python interpreter with a small driver script.
//! The request is a JSON document on the child's stdin and the reply a JSON
//! document on its stdout.

use crate::error::{FilterError, Result};
use crate::markup::MarkupEngine;
use serde::{Deserialize, Serialize};
use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};

/// Driver run inside the interpreter. Reads one request, writes one reply.
const DRIVER_SCRIPT: &str = r#"
import json, sys
import docutils.core
import docutils.parsers.rst.roles
import docutils.writers.html4css1

request = json.loads(sys.stdin.buffer.read().decode("utf-8"))
docutils.parsers.rst.roles.DEFAULT_INTERPRETED_ROLE = request["default_role"]
try:
    parts = docutils.core.publish_parts(
        request["text"],
        writer=docutils.writers.html4css1.Writer(),
        settings_overrides=request["settings"],
    )
except Exception as exc:
    sys.stdout.write(json.dumps({"error": "%s: %s" % (type(exc).__name__, exc)}))
    sys.exit(1)
sys.stdout.write(json.dumps({"html_body": parts["html_body"]}))
"#;

/// docutils settings overrides applied to every render
///
/// Raw HTML passthrough, file insertion and config file discovery are off
/// so a comment cannot inject markup or read files through the renderer.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RenderSettings {
    pub halt_level: u8,
    pub traceback: bool,
    pub default_reference_context: &'static str,
    pub stylesheet_path: &'static str,
    pub raw_enabled: bool,
    pub file_insertion_enabled: bool,
    #[serde(rename = "_disable_config")]
    pub disable_config: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            halt_level: 5,
            traceback: true,
            default_reference_context: "title-reference",
            stylesheet_path: "",
            raw_enabled: false,
            file_insertion_enabled: false,
            disable_config: true,
        }
    }
}

#[derive(Debug, Serialize)]
struct RenderRequest<'a> {
    text: &'a str,
    default_role: &'static str,
    settings: &'a RenderSettings,
}

#[derive(Debug, Deserialize)]
struct RenderResponse {
    #[serde(default)]
    html_body: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Markup engine that shells out to docutils
#[derive(Debug, Clone)]
pub struct DocutilsEngine {
    python: String,
    settings: RenderSettings,
}

impl DocutilsEngine {
    pub fn new(python: &str) -> Self {
        Self {
            python: python.to_string(),
            settings: RenderSettings::default(),
        }
    }

    fn request_body(&self, text: &str) -> Result<Vec<u8>> {
        let request = RenderRequest {
            text,
            default_role: "title-reference",
            settings: &self.settings,
        };
        serde_json::to_vec(&request)
            .map_err(|e| FilterError::EngineFailed(format!("Failed to encode request: {}", e)))
    }
}

impl MarkupEngine for DocutilsEngine {
    fn name(&self) -> &'static str {
        "docutils"
    }

    fn render(&self, text: &str) -> Result<String> {
        let body = self.request_body(text)?;

        let mut child = Command::new(&self.python)
            .arg("-c")
            .arg(DRIVER_SCRIPT)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| FilterError::EngineUnavailable {
                program: self.python.clone(),
                reason: e.to_string(),
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            // The driver may exit early (e.g. docutils missing); its stderr says why
            if let Err(e) = stdin.write_all(&body) {
                if e.kind() != ErrorKind::BrokenPipe {
                    return Err(FilterError::Io(e));
                }
            }
        }

        let output = child.wait_with_output()?;
        parse_response(&output.stdout, &output.stderr, output.status.success())
    }
}

fn parse_response(stdout: &[u8], stderr: &[u8], success: bool) -> Result<String> {
    match serde_json::from_slice::<RenderResponse>(stdout) {
        Ok(RenderResponse {
            error: Some(message),
            ..
        }) => Err(FilterError::Markup(message)),
        Ok(RenderResponse {
            html_body: Some(html),
            ..
        }) if success => Ok(html),
        _ => {
            let stderr = String::from_utf8_lossy(stderr);
            Err(FilterError::EngineFailed(format!(
                "no usable reply from docutils driver: {}",
                stderr.trim()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_settings_disable_unsafe_features() {
        let value = serde_json::to_value(RenderSettings::default()).unwrap();

        assert_eq!(value["raw_enabled"], Value::Bool(false));
        assert_eq!(value["file_insertion_enabled"], Value::Bool(false));
        assert_eq!(value["_disable_config"], Value::Bool(true));
        assert_eq!(value["halt_level"], 5);
        assert_eq!(value["stylesheet_path"], "");
        assert_eq!(value["default_reference_context"], "title-reference");
        assert!(value.get("disable_config").is_none());
    }

    #[test]
    fn test_request_carries_text_and_role() {
        let engine = DocutilsEngine::new("python3");
        let body = engine.request_body("Some *text*\n\n- a ✓").unwrap();
        let value: Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(value["text"], "Some *text*\n\n- a ✓");
        assert_eq!(value["default_role"], "title-reference");
        assert_eq!(value["settings"]["traceback"], Value::Bool(true));
    }

    #[test]
    fn test_parse_response_html() {
        let html = parse_response(br#"{"html_body": "<p>hi</p>\n"}"#, b"", true).unwrap();
        assert_eq!(html, "<p>hi</p>\n");
    }

    #[test]
    fn test_parse_response_markup_error() {
        let result = parse_response(
            br#"{"error": "SystemMessage: <string>:1: (SEVERE/4) Title overline too short."}"#,
            b"",
            false,
        );
        match result {
            Err(FilterError::Markup(msg)) => assert!(msg.contains("SEVERE")),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_parse_response_driver_crash() {
        let result = parse_response(
            b"",
            b"ModuleNotFoundError: No module named 'docutils'\n",
            false,
        );
        match result {
            Err(FilterError::EngineFailed(msg)) => assert!(msg.contains("docutils")),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_missing_interpreter_is_unavailable() {
        let engine = DocutilsEngine::new("/nonexistent/bin/python-for-tests");
        let result = engine.render("text");
        assert!(matches!(
            result,
            Err(FilterError::EngineUnavailable { .. })
        ));
    }

    /// Engine backed by the local python3, or None when docutils is not installed
    fn installed_engine() -> Option<DocutilsEngine> {
        let status = Command::new("python3")
            .args(["-c", "import docutils"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .ok()?;
        status.success().then(|| DocutilsEngine::new("python3"))
    }

    #[test]
    fn test_render_returns_body_fragment() {
        let Some(engine) = installed_engine() else {
            eprintln!("docutils not installed, skipping");
            return;
        };

        let html = engine.render("Some *text*").unwrap();

        assert!(html.contains("<em>text</em>"), "got {}", html);
        assert!(!html.contains("<html"));
        assert!(!html.contains("<head"));
        assert!(!html.contains("<body"));
    }

    #[test]
    fn test_render_default_role_is_title_reference() {
        let Some(engine) = installed_engine() else {
            eprintln!("docutils not installed, skipping");
            return;
        };

        let html = engine.render("See `ref` for details").unwrap();
        assert!(html.contains("<cite>ref</cite>"), "got {}", html);
    }

    #[test]
    fn test_render_blocks_raw_html() {
        let Some(engine) = installed_engine() else {
            eprintln!("docutils not installed, skipping");
            return;
        };

        let html = engine
            .render(".. raw:: html\n\n   <script>alert(1)</script>\n")
            .unwrap();
        assert!(!html.contains("<script>"), "got {}", html);
    }

    #[test]
    fn test_render_blocks_file_inclusion() {
        let Some(engine) = installed_engine() else {
            eprintln!("docutils not installed, skipping");
            return;
        };

        let html = engine.render(".. include:: /etc/passwd\n").unwrap();
        assert!(!html.contains("root:"), "got {}", html);
    }
}
