use std::path::Path;

use anyhow::{Context, Result};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::debug;

use crate::config::InputFormat;

/// Read everything until EOF
pub async fn read_all<R: AsyncRead + Unpin>(reader: &mut R) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf).await?;
    Ok(buf)
}

/// Read raw input from `path`, or from stdin when no path is given
pub async fn read_source(path: Option<&Path>) -> Result<Vec<u8>> {
    let raw = match path {
        Some(path) => tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => read_all(&mut tokio::io::stdin())
            .await
            .context("failed to read stdin")?,
    };
    debug!("Read {} input bytes", raw.len());
    Ok(raw)
}

/// Turn raw input into wire bytes according to `format`.
///
/// Hex input may contain whitespace and an optional `0x` prefix.
pub fn parse_input(raw: &[u8], format: InputFormat) -> Result<Vec<u8>> {
    match format {
        InputFormat::Binary => Ok(raw.to_vec()),
        InputFormat::Hex => {
            let text = std::str::from_utf8(raw).context("hex input is not valid UTF-8")?;
            let compact: String = text.split_whitespace().collect();
            let digits = compact
                .strip_prefix("0x")
                .or_else(|| compact.strip_prefix("0X"))
                .unwrap_or(&compact);
            hex::decode(digits).context("invalid hex input")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_until_eof() {
        let mut reader: &[u8] = b"00e1f505";
        assert_eq!(read_all(&mut reader).await.unwrap(), b"00e1f505".to_vec());
    }

    #[test]
    fn hex_with_whitespace_and_prefix() {
        let bytes = parse_input(b"0x00e1 f505\n0000 0000\n03abcdef\n", InputFormat::Hex).unwrap();
        assert_eq!(bytes, hex::decode("00e1f5050000000003abcdef").unwrap());
    }

    #[test]
    fn binary_passes_through() {
        assert_eq!(parse_input(&[0xFF, 0x00], InputFormat::Binary).unwrap(), vec![0xFF, 0x00]);
    }

    #[test]
    fn bad_hex() {
        assert!(parse_input(b"abc", InputFormat::Hex).is_err());
        assert!(parse_input(b"zz", InputFormat::Hex).is_err());
    }
}
