use std::io;

use tracing::{debug, Level, Metadata};
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::MakeWriter;
#[cfg(not(target_arch = "wasm32"))]
use tracing_subscriber::EnvFilter;
use wasm_bindgen::JsValue;

/// Install the global subscriber. Safe to call more than once.
///
/// In the browser events go to the devtools console at `level`; natively
/// `RUST_LOG` wins when set.
pub fn init(level: &str) {
    let level: Level = level.parse().unwrap_or(Level::INFO);

    #[cfg(target_arch = "wasm32")]
    let result = fmt()
        .with_writer(MakeConsoleWriter)
        .with_ansi(false)
        .without_time()
        .with_max_level(level)
        .try_init();

    #[cfg(not(target_arch = "wasm32"))]
    let result = fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase())),
        )
        .try_init();

    if result.is_err() {
        debug!("Logging already initialised");
    }
}

/// Hands out one [`ConsoleWriter`] per event
pub struct MakeConsoleWriter;

impl<'a> MakeWriter<'a> for MakeConsoleWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(*meta.level())
    }
}

/// Buffers one formatted event and emits it as a single console call on
/// flush or drop, using the console method that matches the level
pub struct ConsoleWriter {
    buf: Vec<u8>,
    level: Level,
}

impl ConsoleWriter {
    fn new(level: Level) -> Self {
        ConsoleWriter {
            buf: Vec::new(),
            level,
        }
    }
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        let text = String::from_utf8_lossy(&self.buf);
        let msg = JsValue::from_str(text.trim_end());

        if self.level == Level::ERROR {
            web_sys::console::error_1(&msg);
        } else if self.level == Level::WARN {
            web_sys::console::warn_1(&msg);
        } else if self.level == Level::INFO {
            web_sys::console::info_1(&msg);
        } else {
            web_sys::console::debug_1(&msg);
        }

        self.buf.clear();
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let _ = io::Write::flush(self);
    }
}
