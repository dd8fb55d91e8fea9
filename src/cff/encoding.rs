//! Encodings map character codes to glyphs in fonts that are not CID-keyed.

use std::convert::TryFrom;

use crate::binary::read::{ReadArray, ReadBinary, ReadCtxt, ReadFrom, ReadScope};
use crate::binary::{U16Be, U8};
use crate::cff::{expert_encoding_name, sid_name, standard_encoding_name, Index, Range, SID};
use crate::error::ParseError;

const SUPPLEMENT_FLAG: u8 = 0x80;

#[derive(Clone, Debug)]
pub enum Encoding<'a> {
    Standard,
    Expert,
    Custom(CustomEncoding<'a>),
}

#[derive(Clone, Debug)]
pub enum CustomEncoding<'a> {
    Format0 {
        codes: ReadArray<'a, U8>,
        supplements: ReadArray<'a, Supplement>,
    },
    Format1 {
        ranges: ReadArray<'a, Range<u8, u8>>,
        supplements: ReadArray<'a, Supplement>,
    },
}

/// An additional code for a glyph, named by SID
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Supplement {
    pub code: u8,
    pub glyph: SID,
}

/// The glyph name for each character code
#[derive(Debug, Clone, PartialEq)]
pub enum EncodingTable {
    Standard,
    Expert,
    Custom(Vec<String>),
}

impl<'a> Encoding<'a> {
    /// Read the encoding at `offset` in `scope`, or one of the predefined encodings.
    pub fn read(scope: ReadScope<'a>, offset: usize) -> Result<Encoding<'a>, ParseError> {
        match offset {
            0 => Ok(Encoding::Standard),
            1 => Ok(Encoding::Expert),
            _ => scope
                .offset(offset)
                .read::<CustomEncoding<'_>>()
                .map(Encoding::Custom),
        }
    }
}

impl ReadFrom for Supplement {
    type ReadType = (U8, U16Be);
    fn read_from((code, glyph): (u8, SID)) -> Self {
        Supplement { code, glyph }
    }
}

impl<'b> ReadBinary for CustomEncoding<'b> {
    type HostType<'a> = CustomEncoding<'a>;

    fn read<'a>(ctxt: &mut ReadCtxt<'a>) -> Result<Self::HostType<'a>, ParseError> {
        let format = ctxt.read_u8()?;
        // The high bit indicates supplements follow the format data
        let encoding = match format & !SUPPLEMENT_FLAG {
            0 => {
                let ncodes = ctxt.read_u8()?;
                let codes = ctxt.read_array::<U8>(usize::from(ncodes))?;
                let supplements = read_supplements(ctxt, format)?;
                CustomEncoding::Format0 { codes, supplements }
            }
            1 => {
                let nranges = ctxt.read_u8()?;
                let ranges = ctxt.read_array::<Range<u8, u8>>(usize::from(nranges))?;
                let supplements = read_supplements(ctxt, format)?;
                CustomEncoding::Format1 {
                    ranges,
                    supplements,
                }
            }
            _ => return Err(ParseError::MalformedFont),
        };

        Ok(encoding)
    }
}

fn read_supplements<'a>(
    ctxt: &mut ReadCtxt<'a>,
    format: u8,
) -> Result<ReadArray<'a, Supplement>, ParseError> {
    if format & SUPPLEMENT_FLAG == 0 {
        return Ok(ReadArray::empty());
    }

    let nsups = ctxt.read_u8()?;
    ctxt.read_array::<Supplement>(usize::from(nsups))
}

impl<'a> CustomEncoding<'a> {
    /// The code the format data assigns to `glyph_id`, if any.
    pub fn code_for_glyph(&self, glyph_id: u16) -> Option<u8> {
        // .notdef is never encoded
        let index = usize::from(glyph_id.checked_sub(1)?);
        match self {
            CustomEncoding::Format0 { codes, .. } => codes.get_item(index),
            CustomEncoding::Format1 { ranges, .. } => ranges
                .iter()
                .scan(0usize, |glyphs_covered, range| {
                    *glyphs_covered += range.len();
                    Some((*glyphs_covered, range))
                })
                .find(|(glyphs_covered, _range)| index < *glyphs_covered)
                .and_then(|(glyphs_covered, range)| {
                    let offset = index - (glyphs_covered - range.len());
                    u8::try_from(usize::from(range.first) + offset).ok()
                }),
        }
    }

    pub fn supplements(&self) -> &ReadArray<'a, Supplement> {
        match self {
            CustomEncoding::Format0 { supplements, .. }
            | CustomEncoding::Format1 { supplements, .. } => supplements,
        }
    }
}

impl EncodingTable {
    /// Build the encoding table of a font.
    ///
    /// `glyph_names` holds the names of the glyphs in glyph id order. Only the first 256 glyphs
    /// can be encoded.
    pub fn build(
        encoding: &Encoding<'_>,
        glyph_names: &[String],
        strings: &Index<'_>,
    ) -> EncodingTable {
        match encoding {
            Encoding::Standard => EncodingTable::Standard,
            Encoding::Expert => EncodingTable::Expert,
            Encoding::Custom(custom) => {
                let mut names = vec![String::from(".notdef"); 256];
                for (glyph_id, name) in glyph_names.iter().enumerate().take(256) {
                    let code = u16::try_from(glyph_id)
                        .ok()
                        .and_then(|glyph_id| custom.code_for_glyph(glyph_id));
                    if let Some(code) = code {
                        names[usize::from(code)] = name.clone();
                    }
                }
                for supplement in custom.supplements() {
                    names[usize::from(supplement.code)] =
                        sid_name(strings, i32::from(supplement.glyph));
                }
                EncodingTable::Custom(names)
            }
        }
    }

    /// The name of the glyph encoded by `code`.
    pub fn glyph_name(&self, code: u8) -> &str {
        match self {
            EncodingTable::Standard => standard_encoding_name(code),
            EncodingTable::Expert => expert_encoding_name(code),
            EncodingTable::Custom(names) => names
                .get(usize::from(code))
                .map_or(".notdef", String::as_str),
        }
    }
}
