//! Reading the buffer to inspect.

use std::io::Read;
use std::path::Path;

/// Errors raised while inspecting a buffer
#[derive(Debug)]
pub enum InspectError {
    Io(std::io::Error),
    Hex(hex::FromHexError),
    Decode(xxp::Error),
}

impl std::error::Error for InspectError {}

impl std::fmt::Display for InspectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read input: {}", e),
            Self::Hex(e) => write!(f, "invalid hex input: {}", e),
            Self::Decode(e) => write!(f, "failed to decode: {}", e),
        }
    }
}

impl From<std::io::Error> for InspectError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<hex::FromHexError> for InspectError {
    fn from(e: hex::FromHexError) -> Self {
        Self::Hex(e)
    }
}

impl From<xxp::Error> for InspectError {
    fn from(e: xxp::Error) -> Self {
        Self::Decode(e)
    }
}

/// Reads everything from a file, or from stdin if no path is given
pub fn read_input(path: Option<&Path>) -> Result<Vec<u8>, InspectError> {
    let mut buf = vec![];

    match path {
        Some(path) => {
            log::debug!("reading {}", path.display());
            std::fs::File::open(path)?.read_to_end(&mut buf)?;
        }
        None => {
            log::debug!("reading stdin");
            std::io::stdin().lock().read_to_end(&mut buf)?;
        }
    }

    Ok(buf)
}

/// Decodes hex text. Whitespace is ignored, so dumps can be split over lines.
pub fn from_hex_text(text: &[u8]) -> Result<Vec<u8>, InspectError> {
    let digits = text
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect::<Vec<_>>();

    Ok(hex::decode(digits)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_text() {
        let text = b"00 00 1E 4E\n00 00 00 00 00 00 00 05\n41 6c 6c 65 6e\n";

        assert_eq!(
            from_hex_text(text).unwrap(),
            [0x00, 0x00, 0x1E, 0x4E, 0, 0, 0, 0, 0, 0, 0, 5, 0x41, 0x6C, 0x6C, 0x65, 0x6E]
        );
        assert!(from_hex_text(b"").unwrap().is_empty());
    }

    #[test]
    fn test_bad_hex_text() {
        assert!(matches!(from_hex_text(b"0"), Err(InspectError::Hex(_))));
        assert!(matches!(from_hex_text(b"zz"), Err(InspectError::Hex(_))));
    }
}
