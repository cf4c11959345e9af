//! Conversion pipeline
//!
//! Byte-level entry points: decode, parse and validate on the way in;
//! validate, write and encode on the way out.

use std::io::Write;

use tracing::debug;

use super::parser::{self, Parsed};
use super::validator;
use super::writer::{self, Rendered};
use crate::config::{LineEnding, Settings};
use crate::error::Sie4iResult;
use crate::format::encoding;
use crate::models::Sie4iModel;

/// How a model is written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteOptions {
    /// Emit the `#KSUMMA` checksum lines
    pub checksum: bool,
    pub line_ending: LineEnding,
}

impl WriteOptions {
    /// Options taken from user settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            checksum: settings.write_checksum,
            line_ending: settings.line_ending,
        }
    }

    pub fn with_checksum(mut self, checksum: bool) -> Self {
        self.checksum = checksum;
        self
    }
}

/// Decode codepage 437 bytes, parse and validate
pub fn parse_bytes(bytes: &[u8]) -> Sie4iResult<Parsed> {
    let text = encoding::decode(bytes);
    parse_lines(encoding::split_lines(&text))
}

/// Parse and validate already-decoded lines
pub fn parse_lines<I, S>(lines: I) -> Sie4iResult<Parsed>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let parsed = parser::parse(lines)?;
    validator::validate(&parsed.model)?;
    Ok(parsed)
}

/// Validate and render as decoded lines
pub fn render_lines(model: &Sie4iModel, checksum: bool) -> Sie4iResult<Rendered> {
    validator::validate(model)?;
    Ok(writer::write(model, checksum))
}

/// Validate, render and encode; every line gets a terminator
pub fn write_bytes(model: &Sie4iModel, options: &WriteOptions) -> Sie4iResult<Vec<u8>> {
    let rendered = render_lines(model, options.checksum)?;
    let terminator = options.line_ending.as_str().as_bytes();

    let mut bytes = Vec::new();
    for line in &rendered.lines {
        bytes.extend_from_slice(&encoding::encode(line));
        bytes.extend_from_slice(terminator);
    }
    debug!(
        lines = rendered.lines.len(),
        bytes = bytes.len(),
        checksum = ?rendered.checksum_value(),
        "model written"
    );
    Ok(bytes)
}

/// [`write_bytes`] into a sink; sink errors are returned unchanged
pub fn write_to<W: Write>(sink: &mut W, model: &Sie4iModel, options: &WriteOptions) -> Sie4iResult<()> {
    let bytes = write_bytes(model, options)?;
    sink.write_all(&bytes)?;
    sink.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Sie4iError;
    use std::io;

    const INPUT: &[u8] = b"#FLAGGA 0\r\n\
        #PROGRAM Prog 1.0\r\n\
        #GEN 20210115\r\n\
        #SIETYP 4\r\n\
        #FNAMN \"K\x94pmannen AB\"\r\n\
        \r\n\
        #KONTO 1910 Kassa\r\n\
        #KTYP 1910 T\r\n\
        \r\n\
        #KONTO 3000 F\x94rs\x84ljning\r\n\
        #KTYP 3000 I\r\n\
        \r\n\
        #VER A 1 20210101 \"\"\r\n\
        {\r\n\
        #TRANS 1910 {} 100.00\r\n\
        #TRANS 3000 {} -100.00\r\n\
        }\r\n";

    #[test]
    fn test_parse_bytes_decodes_cp437() {
        let parsed = parse_bytes(INPUT).unwrap();
        assert_eq!(
            parsed.model.identification.company_name.as_deref(),
            Some("Köpmannen AB")
        );
        assert_eq!(parsed.model.accounts[1].name, "Försäljning");
    }

    #[test]
    fn test_write_bytes_encodes_and_terminates() {
        let model = parse_bytes(INPUT).unwrap().model;
        let options = WriteOptions {
            checksum: false,
            line_ending: LineEnding::Lf,
        };
        let bytes = write_bytes(&model, &options).unwrap();
        assert!(bytes.starts_with(b"#FLAGGA 0\n#PROGRAM Prog 1.0\n"));
        assert!(bytes.ends_with(b"}\n"));
        assert!(bytes
            .windows(b"F\x94rs\x84ljning".len())
            .any(|w| w == b"F\x94rs\x84ljning"));
    }

    #[test]
    fn test_parse_rejects_invalid_model() {
        let input = b"#FLAGGA 0\r\n#PROGRAM Prog 1.0\r\n#SIETYP 4\r\n";
        let err = parse_bytes(input).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.code(), Some(2101));
    }

    #[test]
    fn test_write_validates_first() {
        let model = Sie4iModel::default();
        let err = write_bytes(&model, &WriteOptions::default()).unwrap_err();
        assert!(matches!(err, Sie4iError::Validation(_)));
    }

    struct ClosedSink;

    impl io::Write for ClosedSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_sink_error_is_passed_through() {
        let model = parse_bytes(INPUT).unwrap().model;
        let err = write_to(&mut ClosedSink, &model, &WriteOptions::default()).unwrap_err();
        match err {
            Sie4iError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_options_from_settings() {
        let mut settings = Settings::default();
        settings.write_checksum = true;
        let options = WriteOptions::from_settings(&settings);
        assert!(options.checksum);
        assert_eq!(options.line_ending, LineEnding::Crlf);
        assert!(!options.with_checksum(false).checksum);
    }
}
