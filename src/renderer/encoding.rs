use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;

/// Text encodings understood by the inclusion helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Utf8,
    /// Every byte maps to the code point of the same value
    Latin1,
}

impl FromStr for Encoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(Encoding::Utf8),
            "latin1" | "latin-1" | "binary" => Ok(Encoding::Latin1),
            other => Err(format!("unsupported encoding '{other}'")),
        }
    }
}

impl Encoding {
    pub fn decode(self, bytes: Vec<u8>) -> io::Result<String> {
        match self {
            Encoding::Utf8 => {
                String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
            }
            Encoding::Latin1 => Ok(bytes.into_iter().map(char::from).collect()),
        }
    }

    /// Reads the whole file at `path` and decodes it.
    pub fn read_to_string<P: AsRef<Path>>(self, path: P) -> io::Result<String> {
        self.decode(fs::read(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!("utf8".parse::<Encoding>().unwrap(), Encoding::Utf8);
        assert_eq!("UTF-8".parse::<Encoding>().unwrap(), Encoding::Utf8);
        assert_eq!("latin1".parse::<Encoding>().unwrap(), Encoding::Latin1);
        assert_eq!("binary".parse::<Encoding>().unwrap(), Encoding::Latin1);
        assert!("utf16".parse::<Encoding>().is_err());
    }

    #[test]
    fn test_latin1_maps_bytes_to_code_points() {
        let decoded = Encoding::Latin1.decode(vec![b'c', b'a', b'f', 0xE9]).unwrap();
        assert_eq!(decoded, "café");
    }

    #[test]
    fn test_invalid_utf8_is_invalid_data() {
        let err = Encoding::Utf8.decode(vec![0xFF, 0xFE]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
