use alloc::{string::String, vec::Vec};

use crate::{JsonReader, ReaderError, ReaderOptions, TokenType};


/// Reads `input` to the end and renders every token on one line.
pub(crate) fn render(input: &[u8]) -> Result<Vec<String>, ReaderError> {
    let mut reader = JsonReader::new(input, ReaderOptions::default());
    let mut out = Vec::new();
    while reader.read()? {
        out.push(render_token(&reader));
    }
    Ok(out)
}

pub(crate) fn render_token(reader: &JsonReader<'_>) -> String {
    use core::fmt::Write;

    let mut line = String::new();
    let depth = reader.current_depth();
    let _ = match reader.token_type() {
        TokenType::PropertyName => write!(line, "{depth} PropertyName({})", reader.get_str().unwrap_or_default()),
        TokenType::Value => write!(
            line,
            "{depth} Value({:?}, {})",
            reader.value_kind(),
            reader.value_text().unwrap_or_default()
        ),
        other => write!(line, "{depth} {other:?}"),
    };
    line
}

/// Reads `input` until the first error and returns it.
pub(crate) fn read_err(input: &[u8]) -> ReaderError {
    let mut reader = JsonReader::new(input, ReaderOptions::default());
    loop {
        match reader.read() {
            Ok(true) => {}
            Ok(false) => panic!("expected an error for {:?}", bstr::BStr::new(input)),
            Err(err) => return err,
        }
    }
}
