use encoding_rs::UTF_8;

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("not valid UTF-8 text (first bad byte near offset {offset})")]
    InvalidUtf8 { offset: usize },
}

/// Decode notebook bytes as UTF-8, dropping a leading BOM. Malformed input is
/// an error rather than being patched with replacement characters.
pub fn decode_notebook(bytes: &[u8]) -> Result<String, DecodeError> {
    let (text, had_errors) = UTF_8.decode_with_bom_removal(bytes);
    if had_errors {
        let offset = std::str::from_utf8(bytes)
            .err()
            .map(|err| err.valid_up_to())
            .unwrap_or(0);
        return Err(DecodeError::InvalidUtf8 { offset });
    }
    Ok(text.into_owned())
}
