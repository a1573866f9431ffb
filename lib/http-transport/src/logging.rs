use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

/// Default log level.
const DEFAULT_LOG_LEVEL: &str = "warn";

/// Initialize a `tracing` subscriber that shows which transport gets picked.
///
/// The `filter` follows the [`$RUST_LOG` format][format], e.g.
/// `http_transport=debug`. When no `filter` is provided, only warnings and
/// errors are shown.
///
/// This function can only be called once. Subsequent calls return an error.
///
/// [format]: https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html#directives
pub fn initialize_logger(filter: Option<&str>) -> Result<(), anyhow::Error> {
    let max_level = tracing::level_filters::STATIC_MAX_LEVEL
        .into_level()
        .unwrap_or(tracing::Level::ERROR);

    let filter = EnvFilter::builder()
        .with_regex(false)
        .with_default_directive(max_level.into())
        .parse_lossy(filter.unwrap_or(DEFAULT_LOG_LEVEL));

    let builder = tracing_subscriber::fmt::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE);

    #[cfg(target_arch = "wasm32")]
    let builder = builder
        .with_writer(console::ConsoleLogger::spawn())
        .without_time()
        .with_ansi(false);
    #[cfg(not(target_arch = "wasm32"))]
    let builder = builder.with_writer(std::io::stderr);

    builder.try_init().map_err(|e| anyhow::anyhow!(e))?;

    Ok(())
}

#[cfg(target_arch = "wasm32")]
mod console {
    use std::io::{ErrorKind, Write};

    use tracing::Level;
    use tracing_subscriber::fmt::MakeWriter;
    use wasm_bindgen::JsValue;

    /// A [`std::io::Write`] implementation which will log all message using
    /// [`web_sys::console`].
    #[derive(Debug)]
    pub(super) struct ConsoleLogger {
        buffer: Vec<u8>,
        level: Option<Level>,
    }

    impl ConsoleLogger {
        pub(super) fn spawn() -> impl for<'w> MakeWriter<'w> + 'static {
            struct MakeConsoleLogger;

            impl<'a> MakeWriter<'a> for MakeConsoleLogger {
                type Writer = ConsoleLogger;

                fn make_writer(&self) -> Self::Writer {
                    ConsoleLogger {
                        buffer: Vec::new(),
                        level: None,
                    }
                }

                fn make_writer_for(&self, meta: &tracing::Metadata) -> Self::Writer {
                    ConsoleLogger {
                        buffer: Vec::new(),
                        level: Some(*meta.level()),
                    }
                }
            }

            MakeConsoleLogger
        }
    }

    impl Write for ConsoleLogger {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.buffer.extend(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            let buffer = std::mem::take(&mut self.buffer);
            let text = String::from_utf8(buffer)
                .map_err(|e| std::io::Error::new(ErrorKind::InvalidInput, e))?;
            let js_string = JsValue::from(text);

            match self.level {
                Some(Level::DEBUG) => web_sys::console::debug_1(&js_string),
                Some(Level::INFO) => web_sys::console::info_1(&js_string),
                Some(Level::ERROR) => web_sys::console::error_1(&js_string),
                Some(Level::WARN) => web_sys::console::warn_1(&js_string),
                Some(Level::TRACE) => web_sys::console::trace_1(&js_string),
                None => web_sys::console::log_1(&js_string),
            }

            Ok(())
        }
    }

    impl Drop for ConsoleLogger {
        fn drop(&mut self) {
            if !self.buffer.is_empty() {
                let _ = self.flush();
            }
        }
    }
}
