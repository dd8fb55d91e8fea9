//! FDSelect maps the glyphs of a CID-keyed font to the Font DICT that applies to them.

use std::iter;

use itertools::Itertools;

use crate::binary::read::{CheckIndex, ReadArrayCow, ReadBinaryDep, ReadCtxt};
use crate::binary::U8;
use crate::cff::Range;
use crate::error::ParseError;

/// Font DICT select as described in Section 19 of Technical Note #5176
#[derive(Clone, Debug)]
pub enum FDSelect<'a> {
    Format0 {
        glyph_font_dict_indices: ReadArrayCow<'a, U8>,
    },
    // Formats 1 and 2 are not defined
    Format3 {
        ranges: ReadArrayCow<'a, Range<u16, u8>>,
        sentinel: u16,
    },
}

impl<'b> ReadBinaryDep for FDSelect<'b> {
    type Args<'a> = usize;
    type HostType<'a> = FDSelect<'a>;

    fn read_dep<'a>(
        ctxt: &mut ReadCtxt<'a>,
        n_glyphs: usize,
    ) -> Result<Self::HostType<'a>, ParseError> {
        match ctxt.read_u8()? {
            0 => {
                let glyph_font_dict_indices = ctxt.read_array::<U8>(n_glyphs)?;
                Ok(FDSelect::Format0 {
                    glyph_font_dict_indices: ReadArrayCow::Borrowed(glyph_font_dict_indices),
                })
            }
            3 => {
                let nranges = usize::from(ctxt.read_u16be()?);
                let ranges = ctxt.read_array(nranges)?;
                let sentinel = ctxt.read_u16be()?;
                Ok(FDSelect::Format3 {
                    ranges: ReadArrayCow::Borrowed(ranges),
                    sentinel,
                })
            }
            _ => Err(ParseError::MalformedFont),
        }
    }
}

impl<'a> FDSelect<'a> {
    /// Returns the index of the Font DICT for the supplied `glyph_id`
    pub fn font_dict_index(&self, glyph_id: u16) -> Result<u8, ParseError> {
        match self {
            FDSelect::Format0 {
                glyph_font_dict_indices,
            } => {
                let index = usize::from(glyph_id);
                glyph_font_dict_indices.check_index(index)?;
                glyph_font_dict_indices
                    .get_item(index)
                    .ok_or(ParseError::OutOfRange)
            }
            FDSelect::Format3 { ranges, sentinel } => {
                // In Format3 n_left holds the Font DICT index
                let range_windows = ranges
                    .iter()
                    .map(|Range { first, n_left }| (first, Some(n_left)))
                    .chain(iter::once((*sentinel, None)))
                    .tuple_windows();

                for ((first, fd_index), (last, _)) in range_windows {
                    if glyph_id >= first && glyph_id < last {
                        return fd_index.ok_or(ParseError::OutOfRange);
                    }
                }

                Err(ParseError::OutOfRange)
            }
        }
    }

    /// Copy the FDSelect out of the font data.
    pub fn to_owned_fd_select(&self) -> FDSelect<'static> {
        match self {
            FDSelect::Format0 {
                glyph_font_dict_indices,
            } => FDSelect::Format0 {
                glyph_font_dict_indices: glyph_font_dict_indices.to_owned_array(),
            },
            FDSelect::Format3 { ranges, sentinel } => FDSelect::Format3 {
                ranges: ranges.to_owned_array(),
                sentinel: *sentinel,
            },
        }
    }
}
