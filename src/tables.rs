//! Location of a CFF table inside an OpenType (sfnt) container.

use log::debug;

use crate::binary::read::{ReadArray, ReadBinary, ReadCtxt, ReadFrom, ReadScope};
use crate::binary::U32Be;
use crate::error::ParseError;
use crate::size;
use crate::tag::{self, DisplayTag};

use std::convert::TryFrom;

/// Magic value identifying a CFF flavoured OpenType font (`OTTO`)
pub const CFF_MAGIC: u32 = tag::OTTO;

/// Magic number identifying TrueType 1.0
///
/// The version number 1.0 as a 16.16 fixed-point value, indicating TrueType glyph data.
pub const TTF_MAGIC: u32 = 0x00010000;

/// Magic value used by some Apple fonts (`true`)
pub const TRUE_MAGIC: u32 = tag::TRUE;

/// OpenType Offset Table
///
/// <https://docs.microsoft.com/en-us/typography/opentype/spec/otff#organization-of-an-opentype-font>
#[derive(Clone)]
pub struct OffsetTable<'a> {
    pub sfnt_version: u32,
    pub search_range: u16,
    pub entry_selector: u16,
    pub range_shift: u16,
    pub table_records: ReadArray<'a, TableRecord>,
}

/// An entry in the Offset Table
///
/// <https://docs.microsoft.com/en-us/typography/opentype/spec/otff#organization-of-an-opentype-font>
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Hash)]
pub struct TableRecord {
    pub table_tag: u32,
    pub checksum: u32,
    pub offset: u32,
    pub length: u32,
}

/// Returns true if `magic` is the version of an sfnt container.
pub fn is_sfnt_magic(magic: u32) -> bool {
    matches!(magic, TTF_MAGIC | CFF_MAGIC | TRUE_MAGIC)
}

/// Narrow `scope` to the CFF data it holds.
///
/// Bare CFF data is returned unchanged. An sfnt container is searched for its `CFF ` table.
pub fn locate_cff_table<'a>(scope: ReadScope<'a>) -> Result<ReadScope<'a>, ParseError> {
    let mut peek = scope.ctxt();
    let magic = peek.read_u32be().map_err(|_| ParseError::NotAFont)?;
    if !is_sfnt_magic(magic) {
        return Ok(scope);
    }

    let offset_table = scope.read::<OffsetTable<'_>>()?;
    let table_record = offset_table
        .find_table_record(tag::CFF)
        .ok_or(ParseError::NotAFont)?;
    if table_record.offset == 0 || table_record.length == 0 {
        return Err(ParseError::NotAFont);
    }
    debug!(
        "found '{}' table at {} ({} bytes)",
        DisplayTag(table_record.table_tag),
        table_record.offset,
        table_record.length
    );
    table_record.read_table(&scope)
}

impl<'b> ReadBinary for OffsetTable<'b> {
    type HostType<'a> = OffsetTable<'a>;

    fn read<'a>(ctxt: &mut ReadCtxt<'a>) -> Result<Self::HostType<'a>, ParseError> {
        let sfnt_version = ctxt.read_u32be()?;
        ctxt.check_version(is_sfnt_magic(sfnt_version))?;
        let num_tables = ctxt.read_u16be()?;
        let search_range = ctxt.read_u16be()?;
        let entry_selector = ctxt.read_u16be()?;
        let range_shift = ctxt.read_u16be()?;
        let table_records = ctxt.read_array::<TableRecord>(usize::from(num_tables))?;
        Ok(OffsetTable {
            sfnt_version,
            search_range,
            entry_selector,
            range_shift,
            table_records,
        })
    }
}

impl ReadFrom for TableRecord {
    type ReadType = ((U32Be, U32Be), (U32Be, U32Be));
    fn read_from(((table_tag, checksum), (offset, length)): ((u32, u32), (u32, u32))) -> Self {
        TableRecord {
            table_tag,
            checksum,
            offset,
            length,
        }
    }
}

impl<'a> OffsetTable<'a> {
    pub fn find_table_record(&self, tag: u32) -> Option<TableRecord> {
        self.table_records
            .iter()
            .find(|table_record| table_record.table_tag == tag)
    }
}

impl TableRecord {
    pub const SIZE: usize = 4 * size::U32;

    pub fn read_table<'a>(&self, scope: &ReadScope<'a>) -> Result<ReadScope<'a>, ParseError> {
        let offset = usize::try_from(self.offset)?;
        let length = usize::try_from(self.length)?;
        scope.offset_length(offset, length)
    }
}
