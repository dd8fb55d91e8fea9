//! Charsets map glyph ids to the SID of the glyph name, or to a CID in CID-keyed fonts.

use std::convert::TryFrom;

use num_traits as num;

use crate::binary::read::{
    CheckIndex, ReadArray, ReadArrayCow, ReadBinaryDep, ReadCtxt, ReadFrom, ReadScope,
    ReadUnchecked,
};
use crate::binary::U16Be;
use crate::cff::{Range, EXPERT_CHARSET, EXPERT_SUBSET_CHARSET, SID};
use crate::error::ParseError;

const ISO_ADOBE_LAST_SID: u16 = 228;

#[derive(Clone, Debug)]
pub enum Charset<'a> {
    ISOAdobe,
    Expert,
    ExpertSubset,
    Custom(CustomCharset<'a>),
}

#[derive(Clone, Debug)]
pub enum CustomCharset<'a> {
    Format0 {
        glyphs: ReadArrayCow<'a, U16Be>,
    },
    Format1 {
        ranges: ReadArrayCow<'a, Range<SID, u8>>,
    },
    Format2 {
        ranges: ReadArrayCow<'a, Range<SID, u16>>,
    },
}

impl<'a> Charset<'a> {
    /// Read the charset at `offset` in `scope`, or one of the predefined charsets.
    ///
    /// `n_glyphs` is the number of glyphs in the font, including `.notdef`.
    pub fn read(
        scope: ReadScope<'a>,
        offset: usize,
        n_glyphs: usize,
    ) -> Result<Charset<'a>, ParseError> {
        match offset {
            0 => Ok(Charset::ISOAdobe),
            1 => Ok(Charset::Expert),
            2 => Ok(Charset::ExpertSubset),
            _ => scope
                .offset(offset)
                .read_dep::<CustomCharset<'_>>(n_glyphs)
                .map(Charset::Custom),
        }
    }

    /// Returns the SID (Type 1 font) or CID (CID keyed font) of the supplied glyph
    pub fn id_for_glyph(&self, glyph_id: u16) -> Result<u16, ParseError> {
        match self {
            // In ISOAdobe glyph ID maps to SID
            Charset::ISOAdobe => {
                if glyph_id <= ISO_ADOBE_LAST_SID {
                    Ok(glyph_id)
                } else {
                    Err(ParseError::OutOfRange)
                }
            }
            Charset::Expert => EXPERT_CHARSET
                .get(usize::from(glyph_id))
                .copied()
                .ok_or(ParseError::OutOfRange),
            Charset::ExpertSubset => EXPERT_SUBSET_CHARSET
                .get(usize::from(glyph_id))
                .copied()
                .ok_or(ParseError::OutOfRange),
            Charset::Custom(custom) => custom.id_for_glyph(glyph_id),
        }
    }

    /// Copy the charset out of the font data.
    pub fn to_owned_charset(&self) -> Charset<'static> {
        match self {
            Charset::ISOAdobe => Charset::ISOAdobe,
            Charset::Expert => Charset::Expert,
            Charset::ExpertSubset => Charset::ExpertSubset,
            Charset::Custom(CustomCharset::Format0 { glyphs }) => {
                Charset::Custom(CustomCharset::Format0 {
                    glyphs: glyphs.to_owned_array(),
                })
            }
            Charset::Custom(CustomCharset::Format1 { ranges }) => {
                Charset::Custom(CustomCharset::Format1 {
                    ranges: ranges.to_owned_array(),
                })
            }
            Charset::Custom(CustomCharset::Format2 { ranges }) => {
                Charset::Custom(CustomCharset::Format2 {
                    ranges: ranges.to_owned_array(),
                })
            }
        }
    }
}

impl<'b> ReadBinaryDep for CustomCharset<'b> {
    type Args<'a> = usize;
    type HostType<'a> = CustomCharset<'a>;

    fn read_dep<'a>(
        ctxt: &mut ReadCtxt<'a>,
        n_glyphs: usize,
    ) -> Result<Self::HostType<'a>, ParseError> {
        // (There is one less element in the glyph charset array than the n_glyphs because the
        // .notdef glyph name is omitted.)
        let n_glyphs = n_glyphs.checked_sub(1).ok_or(ParseError::MalformedFont)?;
        match ctxt.read_u8()? {
            0 => {
                // Some fonts have a charset shorter than the glyph count
                let glyphs = ctxt.read_array_upto_hack::<U16Be>(n_glyphs)?;
                Ok(CustomCharset::Format0 {
                    glyphs: ReadArrayCow::Borrowed(glyphs),
                })
            }
            1 => {
                let ranges = read_range_array(ctxt, n_glyphs)?;
                Ok(CustomCharset::Format1 {
                    ranges: ReadArrayCow::Borrowed(ranges),
                })
            }
            2 => {
                let ranges = read_range_array(ctxt, n_glyphs)?;
                Ok(CustomCharset::Format2 {
                    ranges: ReadArrayCow::Borrowed(ranges),
                })
            }
            _ => Err(ParseError::MalformedFont),
        }
    }
}

impl<'a> CustomCharset<'a> {
    /// Returns the SID (Type 1 font) or CID (CID keyed font) of the supplied glyph
    pub fn id_for_glyph(&self, glyph_id: u16) -> Result<u16, ParseError> {
        // Section 11 of Technical Note #5176:
        // By definition the first glyph (GID 0) is “.notdef” and must be present in all fonts.
        // Since this is always the case, it is not necessary to represent either the encoding
        // (unencoded) or name (.notdef) for GID 0. Consequently, taking advantage of this
        // optimization, the encoding and charset arrays always begin with GID 1.
        if glyph_id == 0 {
            return Ok(0);
        }

        match self {
            CustomCharset::Format0 { glyphs } => {
                let index = usize::from(glyph_id - 1);
                glyphs.check_index(index)?;
                glyphs.get_item(index).ok_or(ParseError::OutOfRange)
            }
            CustomCharset::Format1 { ranges } => Self::id_for_glyph_in_ranges(ranges, glyph_id),
            CustomCharset::Format2 { ranges } => Self::id_for_glyph_in_ranges(ranges, glyph_id),
        }
    }

    fn id_for_glyph_in_ranges<F, N>(
        ranges: &ReadArrayCow<'a, Range<F, N>>,
        glyph_id: u16,
    ) -> Result<u16, ParseError>
    where
        F: num::Unsigned + Copy,
        N: num::Unsigned + Copy,
        usize: From<N> + From<F>,
        Range<F, N>: ReadFrom,
        <Range<F, N> as ReadUnchecked>::HostType: Copy,
    {
        let glyph_id = usize::from(glyph_id);

        ranges
            .iter()
            .scan(0usize, |glyphs_covered, range| {
                *glyphs_covered += range.len();
                Some((*glyphs_covered, range))
            })
            .find(|(glyphs_covered, _range)| glyph_id <= *glyphs_covered)
            .and_then(|(glyphs_covered, range)| {
                u16::try_from(
                    usize::from(range.first) + (glyph_id - (glyphs_covered - range.len()) - 1),
                )
                .ok()
            })
            .ok_or(ParseError::OutOfRange)
    }
}

/// Read ranges until `n_glyphs` glyphs are covered or the data runs out.
fn read_range_array<'a, F, N>(
    ctxt: &mut ReadCtxt<'a>,
    n_glyphs: usize,
) -> Result<ReadArray<'a, Range<F, N>>, ParseError>
where
    Range<F, N>: ReadFrom,
    usize: From<N>,
    N: num::Unsigned + Copy,
{
    let mut peek = ctxt.scope().ctxt();
    let mut range_count = 0;
    let mut glyphs_covered = 0;
    while glyphs_covered < n_glyphs {
        match peek.read::<Range<F, N>>() {
            Ok(range) => {
                range_count += 1;
                glyphs_covered += range.len();
            }
            Err(_) => break,
        }
    }

    ctxt.read_array::<Range<F, N>>(range_count)
}
