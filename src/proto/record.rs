use super::error::Result;
use super::wire::{Reader, Wire};
use bytes::{BufMut, BytesMut};

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
}

impl Artist {
    /// An artist known only by display name; the name doubles as the id.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Artist {
            id: name.clone(),
            name,
        }
    }
}

impl Wire for Artist {
    fn encode(&self, buf: &mut BytesMut) {
        self.id.encode(buf);
        self.name.encode(buf);
    }

    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Artist {
            id: String::decode(reader)?,
            name: String::decode(reader)?,
        })
    }
}

/// A single timed word. Times are milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LyricWord {
    pub start_time: u64,
    pub end_time: u64,
    pub word: String,
}

impl Wire for LyricWord {
    fn encode(&self, buf: &mut BytesMut) {
        self.start_time.encode(buf);
        self.end_time.encode(buf);
        self.word.encode(buf);
    }

    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        Ok(LyricWord {
            start_time: reader.read_u64()?,
            end_time: reader.read_u64()?,
            word: String::decode(reader)?,
        })
    }
}

/// A timed lyric line with its words and optional translation/romanization.
///
/// `flag` is carried opaquely.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LyricLine {
    pub start_time: u64,
    pub end_time: u64,
    pub words: Vec<LyricWord>,
    pub translated_lyric: String,
    pub roman_lyric: String,
    pub flag: u8,
}

impl Wire for LyricLine {
    fn encode(&self, buf: &mut BytesMut) {
        self.start_time.encode(buf);
        self.end_time.encode(buf);
        self.words.encode(buf);
        self.translated_lyric.encode(buf);
        self.roman_lyric.encode(buf);
        buf.put_u8(self.flag);
    }

    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        Ok(LyricLine {
            start_time: reader.read_u64()?,
            end_time: reader.read_u64()?,
            words: reader.read_vec()?,
            translated_lyric: String::decode(reader)?,
            roman_lyric: String::decode(reader)?,
            flag: reader.read_u8()?,
        })
    }
}
