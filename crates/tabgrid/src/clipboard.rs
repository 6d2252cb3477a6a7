use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::io::Write;
use tabgrid_core::clipboard::ClipboardWriter;
use tabgrid_core::clipboard::CopyError;

/// System clipboard with a terminal fallback.
///
/// The primary path goes through the OS clipboard. When that is unavailable
/// (headless session, missing display server) the text is sent as an OSC 52
/// escape sequence instead, letting the terminal emulator own the clipboard.
pub struct SystemClipboard {
    backend: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        let backend = match arboard::Clipboard::new() {
            Ok(clipboard) => Some(clipboard),
            Err(err) => {
                log::warn!("system clipboard unavailable, using OSC 52: {err}");
                None
            }
        };
        Self { backend }
    }

    /// Forces the OSC 52 path. Useful over SSH where the OS clipboard on the
    /// remote host is not the one the user wants.
    pub fn osc52_only() -> Self {
        Self { backend: None }
    }

    fn write_osc52(text: &str) -> Result<(), CopyError> {
        let encoded = STANDARD.encode(text.as_bytes());
        let mut out = std::io::stdout().lock();
        out.write_all(format!("\x1b]52;c;{encoded}\x07").as_bytes())
            .and_then(|_| out.flush())
            .map_err(|err| CopyError::Backend(err.to_string()))
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipboardWriter for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), CopyError> {
        if let Some(backend) = &mut self.backend {
            match backend.set_text(text) {
                Ok(()) => return Ok(()),
                Err(err) => {
                    log::warn!("clipboard write failed, falling back to OSC 52: {err}");
                }
            }
        }
        Self::write_osc52(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn osc52_payload_is_base64() {
        let encoded = STANDARD.encode("a\tb\r\nc\td".as_bytes());
        assert_eq!(encoded, "YQliDQpjCWQ=");
    }
}
