//! Character-encoding fallback for fleet telemetry exports
//!
//! Monitoring platforms export `;`-delimited text in whatever encoding the
//! office machine happened to use — UTF-8, Latin-1 or Windows CP1252 are
//! all seen in the wild. Decoding walks a prioritized chain and the first
//! encoding that produces a clean decode wins.

/// Candidate encodings, tried in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    Latin1,
    Iso8859_1,
    Cp1252,
}

impl Encoding {
    /// The prioritized fallback chain.
    pub const CHAIN: [Encoding; 4] = [
        Encoding::Utf8,
        Encoding::Latin1,
        Encoding::Iso8859_1,
        Encoding::Cp1252,
    ];

    /// Label used in error messages and logs
    pub fn label(&self) -> &'static str {
        match self {
            Encoding::Utf8 => "utf-8",
            Encoding::Latin1 => "latin1",
            Encoding::Iso8859_1 => "iso-8859-1",
            Encoding::Cp1252 => "cp1252",
        }
    }
}

/// CP1252 mappings for the 0x80–0x9F block, where it diverges from
/// Latin-1. `None` marks the five bytes CP1252 leaves undefined.
const CP1252_HIGH: [Option<char>; 32] = [
    Some('€'),
    None,
    Some('‚'),
    Some('ƒ'),
    Some('„'),
    Some('…'),
    Some('†'),
    Some('‡'),
    Some('ˆ'),
    Some('‰'),
    Some('Š'),
    Some('‹'),
    Some('Œ'),
    None,
    Some('Ž'),
    None,
    None,
    Some('‘'),
    Some('’'),
    Some('“'),
    Some('”'),
    Some('•'),
    Some('–'),
    Some('—'),
    Some('˜'),
    Some('™'),
    Some('š'),
    Some('›'),
    Some('œ'),
    None,
    Some('ž'),
    Some('Ÿ'),
];

/// Attempt to decode `bytes` with one specific encoding.
///
/// Returns `None` when the bytes are not valid in that encoding (invalid
/// UTF-8 sequences, or CP1252-undefined bytes). Latin-1/ISO-8859-1 map
/// every byte and therefore never fail — they are the chain's safety net.
pub fn decode(bytes: &[u8], encoding: Encoding) -> Option<String> {
    match encoding {
        Encoding::Utf8 => std::str::from_utf8(bytes).ok().map(|s| s.to_string()),
        Encoding::Latin1 | Encoding::Iso8859_1 => {
            Some(bytes.iter().map(|&b| b as char).collect())
        }
        Encoding::Cp1252 => {
            let mut out = String::with_capacity(bytes.len());
            for &b in bytes {
                match b {
                    0x80..=0x9F => {
                        let ch = CP1252_HIGH[(b - 0x80) as usize]?;
                        out.push(ch);
                    }
                    _ => out.push(b as char),
                }
            }
            Some(out)
        }
    }
}
