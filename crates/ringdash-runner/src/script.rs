use serde::Deserialize;

use ringdash_core::input::Key;

use crate::error::RunnerError;

/// Keys held over the frame range `from..to`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScriptSpan {
    pub from: u64,
    pub to: u64,
    #[serde(default)]
    pub keys: Vec<Key>,
}

/// Held-key playback. Overlapping spans combine; frames outside every span
/// hold nothing.
///
/// ```toml
/// [[span]]
/// from = 0
/// to = 240
/// keys = ["right"]
///
/// [[span]]
/// from = 100
/// to = 110
/// keys = ["jump"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InputScript {
    #[serde(default, rename = "span")]
    pub spans: Vec<ScriptSpan>,
}

impl InputScript {
    pub fn parse(text: &str, path: &str) -> Result<Self, RunnerError> {
        let script: InputScript = toml::from_str(text).map_err(|e| RunnerError::Script {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        if let Some(bad) = script.spans.iter().find(|s| s.from > s.to) {
            return Err(RunnerError::Script {
                path: path.to_string(),
                message: format!("span {}..{} ends before it starts", bad.from, bad.to),
            });
        }
        Ok(script)
    }

    pub fn load(path: &str) -> Result<Self, RunnerError> {
        let text = std::fs::read_to_string(path).map_err(|e| RunnerError::Script {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        let script = Self::parse(&text, path)?;
        tracing::info!(path, spans = script.spans.len(), "Loaded input script");
        Ok(script)
    }

    /// Keys held on `frame`.
    pub fn keys_at(&self, frame: u64) -> Vec<Key> {
        let mut keys: Vec<Key> = Vec::new();
        for span in self.spans.iter().filter(|s| (s.from..s.to).contains(&frame)) {
            for key in &span.keys {
                if !keys.contains(key) {
                    keys.push(*key);
                }
            }
        }
        keys
    }

    /// First frame after the last span.
    pub fn end_frame(&self) -> u64 {
        self.spans.iter().map(|s| s.to).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = r#"
[[span]]
from = 0
to = 10
keys = ["right"]

[[span]]
from = 5
to = 6
keys = ["jump", "right"]
"#;

    #[test]
    fn spans_combine() {
        let script = InputScript::parse(SCRIPT, "test.toml").unwrap();
        assert_eq!(script.keys_at(0), vec![Key::Right]);
        assert_eq!(script.keys_at(5), vec![Key::Right, Key::Jump]);
        assert_eq!(script.keys_at(10), Vec::<Key>::new(), "Span end is exclusive");
        assert_eq!(script.end_frame(), 10);
    }

    #[test]
    fn empty_script_holds_nothing() {
        let script = InputScript::parse("", "empty.toml").unwrap();
        assert!(script.keys_at(0).is_empty());
        assert_eq!(script.end_frame(), 0);
    }

    #[test]
    fn rejects_unknown_key_and_reversed_span() {
        let err = InputScript::parse("[[span]]\nfrom = 0\nto = 1\nkeys = [\"fire\"]\n", "bad.toml")
            .unwrap_err();
        assert!(err.to_string().contains("bad.toml"));

        let err = InputScript::parse("[[span]]\nfrom = 9\nto = 1\n", "rev.toml").unwrap_err();
        assert!(
            err.to_string().contains("ends before it starts"),
            "got: {err}"
        );
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(matches!(
            InputScript::load("/nonexistent/script.toml"),
            Err(RunnerError::Script { .. })
        ));
    }
}
