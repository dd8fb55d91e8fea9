//! Assembly of a decoded font from the tables of a CFF font.
//!
//! Decoding copies everything a charstring interpreter needs out of the font data: the
//! charstrings keyed by glyph name (or by CID for CID-keyed fonts), the global and local
//! subroutines, and either the encoding or the FDArray/FDSelect of the font. The font data can be
//! dropped once [decode] returns.

use std::convert::TryFrom;

use log::{debug, warn};
use rustc_hash::FxHashMap;

use crate::binary::read::{ReadScope, ReadScopeOwned};
use crate::cff::charset::Charset;
use crate::cff::dict::{DictReader, FontAttributes, FontMatrix, Ros, TableOffsets};
use crate::cff::encoding::{Encoding, EncodingTable};
use crate::cff::fd_select::FDSelect;
use crate::cff::{sid_name, standard_encoding_name, subr_bias, Header, Index};
use crate::error::ParseError;
use crate::tables::locate_cff_table;

const NOTDEF: &str = ".notdef";

/// The CFF data of a font, copied out of the data it was supplied in.
///
/// If the supplied data is an OpenType font only its `CFF ` table is kept.
pub struct RawFont {
    data: ReadScopeOwned,
}

/// Charstrings keyed by glyph name, or by decimal CID in CID-keyed fonts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CharstringTable(FxHashMap<String, Vec<u8>>);

/// Subroutines copied out of a Subrs INDEX, along with their bias.
#[derive(Debug, Clone, PartialEq)]
pub struct SubrTable {
    subrs: Vec<Vec<u8>>,
    bias: i32,
}

/// A Font DICT of a CID-keyed font.
#[derive(Debug, Clone, PartialEq)]
pub struct SubFont {
    pub attributes: FontAttributes,
    pub local_subrs: SubrTable,
}

#[derive(Debug, Clone)]
pub struct CidFont {
    pub fd_array: Vec<SubFont>,
    /// Absent when the FDArray has a single entry and the font has no FDSelect.
    pub fd_select: Option<FDSelect<'static>>,
    /// Maps glyph ids to CIDs. Fonts that are treated as CID-keyed have none, their glyph ids are
    /// their CIDs.
    pub charset: Option<Charset<'static>>,
    /// Number of bytes at the start of each charstring holding its Font DICT index
    pub fd_bytes: u8,
    /// True when an ordinary font is presented as a CID-keyed font
    pub forced: bool,
}

#[derive(Debug, Clone)]
pub enum FontKind {
    Type1 { encoding: EncodingTable },
    Cid(CidFont),
}

/// A font decoded from CFF data.
#[derive(Debug, Clone)]
pub struct DecodedFont {
    pub attributes: FontAttributes,
    pub char_strings: CharstringTable,
    pub global_subrs: SubrTable,
    /// Subroutines of the top-level Private DICT
    pub local_subrs: SubrTable,
    pub kind: FontKind,
    num_glyphs: usize,
}

/// Decode the CFF font in `data`, which may be bare CFF data or an OpenType font.
///
/// When `force_cid` is set an ordinary font is presented as an Adobe-Identity-0 CID-keyed font
/// whose CIDs are its glyph ids.
pub fn decode(data: &[u8], force_cid: bool) -> Result<DecodedFont, ParseError> {
    let cff = locate_cff_table(ReadScope::new(data))?;
    // CFF offsets are relative to the start of the CFF data
    decode_cff(ReadScope::new(cff.data()), force_cid)
}

impl RawFont {
    pub fn new(data: &[u8]) -> Result<RawFont, ParseError> {
        let cff = locate_cff_table(ReadScope::new(data))?;
        let data = ReadScopeOwned::new(ReadScope::new(cff.data()))?;
        Ok(RawFont { data })
    }

    pub fn scope(&self) -> ReadScope<'_> {
        self.data.scope()
    }

    pub fn decode(&self, force_cid: bool) -> Result<DecodedFont, ParseError> {
        decode_cff(self.scope(), force_cid)
    }
}

fn decode_cff(scope: ReadScope<'_>, force_cid: bool) -> Result<DecodedFont, ParseError> {
    let mut ctxt = scope.ctxt();
    let _header = ctxt.read::<Header>()?;
    let name_index = ctxt.read::<Index<'_>>()?;
    match name_index.len() {
        0 => return Err(ParseError::MalformedFont),
        1 => {}
        count => {
            debug!("CFF font set with {} fonts", count);
            return Err(ParseError::UnsupportedFont);
        }
    }
    let top_dict_index = ctxt.read::<Index<'_>>()?;
    if top_dict_index.is_empty() {
        return Err(ParseError::MalformedFont);
    }
    let string_index = ctxt.read::<Index<'_>>()?;
    let global_subr_index = ctxt.read::<Index<'_>>().unwrap_or_else(|err| {
        warn!("unable to read global subroutines: {}", err);
        Index::empty()
    });

    let mut attributes = FontAttributes {
        font_name: Some(String::from_utf8_lossy(name_index.read_object(0)?).into_owned()),
        ..FontAttributes::default()
    };
    let mut offsets = TableOffsets::default();
    let reader = DictReader::new(scope, &string_index);
    reader.read_dict(
        top_dict_index.read_scope(0)?,
        true,
        &mut attributes,
        &mut offsets,
    )?;

    let char_strings_offset = offsets.char_strings.ok_or(ParseError::MalformedFont)?;
    let char_strings_index = scope.offset(char_strings_offset).read::<Index<'_>>()?;
    // There is always a .notdef glyph
    if char_strings_index.is_empty() {
        return Err(ParseError::MalformedFont);
    }

    let global_subrs = SubrTable::from_index(&global_subr_index)?;
    let local_subrs = SubrTable::read_local(scope, offsets.local_subrs)?;

    let font = Glyphs {
        scope,
        strings: &string_index,
        char_strings: &char_strings_index,
    };
    let (char_strings, kind) = if offsets.has_ros {
        let (char_strings, cid_font) = font.read_cid(&reader, &offsets)?;
        (char_strings, FontKind::Cid(cid_font))
    } else if force_cid {
        attributes.ros = Some(Ros {
            registry: String::from("Adobe"),
            ordering: String::from("Identity"),
            supplement: 0,
        });
        let (char_strings, cid_font) = font.read_forced_cid(&attributes, &local_subrs)?;
        (char_strings, FontKind::Cid(cid_font))
    } else {
        let (char_strings, encoding) = font.read_type1(&offsets)?;
        (char_strings, FontKind::Type1 { encoding })
    };

    debug!(
        "decoded {} glyphs, {} global and {} local subroutines",
        char_strings.len(),
        global_subrs.len(),
        local_subrs.len()
    );

    Ok(DecodedFont {
        attributes,
        char_strings,
        global_subrs,
        local_subrs,
        kind,
        num_glyphs: char_strings_index.len(),
    })
}

/// The tables needed to key and copy out the charstrings of a font.
struct Glyphs<'a, 'b> {
    scope: ReadScope<'a>,
    strings: &'b Index<'a>,
    char_strings: &'b Index<'a>,
}

impl<'a, 'b> Glyphs<'a, 'b> {
    fn n_glyphs(&self) -> usize {
        self.char_strings.len()
    }

    fn read_type1(
        &self,
        offsets: &TableOffsets,
    ) -> Result<(CharstringTable, EncodingTable), ParseError> {
        let charset = Charset::read(self.scope, offsets.charset, self.n_glyphs())?;
        let mut char_strings = CharstringTable::with_capacity(self.n_glyphs())?;
        // Only the first 256 glyphs can be encoded
        let mut glyph_names = Vec::new();
        glyph_names.try_reserve_exact(self.n_glyphs().min(256))?;

        for glyph_index in 0..self.n_glyphs() {
            let glyph_id = u16::try_from(glyph_index)?;
            let name = match glyph_id {
                0 => String::from(NOTDEF),
                _ => sid_name(self.strings, i32::from(charset.id_for_glyph(glyph_id)?)),
            };
            let data = copy_bytes(self.char_strings.read_object(glyph_index)?)?;
            if glyph_index < 256 {
                glyph_names.push(name.clone());
            }
            if glyph_id != 0 && name == NOTDEF {
                debug!("glyph {} is named .notdef, keeping glyph 0", glyph_id);
                continue;
            }
            char_strings.insert(name, data);
        }

        let encoding = Encoding::read(self.scope, offsets.encoding)?;
        let encoding = EncodingTable::build(&encoding, &glyph_names, self.strings);
        Ok((char_strings, encoding))
    }

    fn read_cid(
        &self,
        reader: &DictReader<'a, '_>,
        offsets: &TableOffsets,
    ) -> Result<(CharstringTable, CidFont), ParseError> {
        let fd_array_offset = offsets.fd_array.ok_or(ParseError::MalformedFont)?;
        let fd_array_index = self.scope.offset(fd_array_offset).read::<Index<'_>>()?;
        let mut fd_array = Vec::new();
        fd_array.try_reserve_exact(fd_array_index.len())?;
        for fd_index in 0..fd_array_index.len() {
            let mut attributes = FontAttributes::default();
            let mut fd_offsets = TableOffsets::default();
            reader.read_dict(
                fd_array_index.read_scope(fd_index)?,
                true,
                &mut attributes,
                &mut fd_offsets,
            )?;
            // The default matrix stays with the top-level font, so a Font DICT matrix is
            // relative to 1000 units per em
            if !offsets.has_matrix && fd_offsets.has_matrix {
                attributes.font_matrix = FontMatrix::scale(1000.0).concat(&attributes.font_matrix);
            }
            let local_subrs = SubrTable::read_local(self.scope, fd_offsets.local_subrs)?;
            fd_array.push(SubFont {
                attributes,
                local_subrs,
            });
        }

        let fd_select = match offsets.fd_select {
            Some(offset) => Some(
                self.scope
                    .offset(offset)
                    .read_dep::<FDSelect<'_>>(self.n_glyphs())?,
            ),
            None if fd_array.len() <= 1 => None,
            None => return Err(ParseError::MalformedFont),
        };
        let charset = Charset::read(self.scope, offsets.charset, self.n_glyphs())?;

        let mut char_strings = CharstringTable::with_capacity(self.n_glyphs())?;
        for glyph_index in 0..self.n_glyphs() {
            let glyph_id = u16::try_from(glyph_index)?;
            let fd_index = match &fd_select {
                Some(fd_select) if fd_array.len() > 1 => fd_select.font_dict_index(glyph_id)?,
                _ => 0,
            };
            if usize::from(fd_index) >= fd_array.len() {
                return Err(ParseError::MalformedFont);
            }
            let cid = match glyph_id {
                0 => 0,
                _ => charset.id_for_glyph(glyph_id)?,
            };
            if glyph_id != 0 && cid == 0 {
                debug!("glyph {} has CID 0, keeping glyph 0", glyph_id);
                continue;
            }
            let data = self.char_strings.read_object(glyph_index)?;
            char_strings.insert(cid.to_string(), prefixed_bytes(fd_index, data)?);
        }

        let cid_font = CidFont {
            fd_array,
            fd_select: fd_select.map(|fd_select| fd_select.to_owned_fd_select()),
            charset: Some(charset.to_owned_charset()),
            fd_bytes: 1,
            forced: false,
        };
        Ok((char_strings, cid_font))
    }

    fn read_forced_cid(
        &self,
        attributes: &FontAttributes,
        local_subrs: &SubrTable,
    ) -> Result<(CharstringTable, CidFont), ParseError> {
        let mut char_strings = CharstringTable::with_capacity(self.n_glyphs())?;
        for glyph_index in 0..self.n_glyphs() {
            let data = copy_bytes(self.char_strings.read_object(glyph_index)?)?;
            char_strings.insert(glyph_index.to_string(), data);
        }

        // The wrapper carries the font's matrix, leaving the hints of the Private DICT in the
        // units of the sub-font
        let mut sub_attributes = attributes.clone();
        sub_attributes.font_matrix = FontMatrix::IDENTITY;
        let cid_font = CidFont {
            fd_array: vec![SubFont {
                attributes: sub_attributes,
                local_subrs: local_subrs.clone(),
            }],
            fd_select: None,
            charset: None,
            fd_bytes: 0,
            forced: true,
        };
        Ok((char_strings, cid_font))
    }
}

fn copy_bytes(data: &[u8]) -> Result<Vec<u8>, ParseError> {
    let mut copy = Vec::new();
    copy.try_reserve_exact(data.len())?;
    copy.extend_from_slice(data);
    Ok(copy)
}

fn prefixed_bytes(prefix: u8, data: &[u8]) -> Result<Vec<u8>, ParseError> {
    let mut copy = Vec::new();
    copy.try_reserve_exact(data.len() + 1)?;
    copy.push(prefix);
    copy.extend_from_slice(data);
    Ok(copy)
}

impl CharstringTable {
    fn with_capacity(capacity: usize) -> Result<CharstringTable, ParseError> {
        let mut map = FxHashMap::default();
        map.try_reserve(capacity)?;
        Ok(CharstringTable(map))
    }

    fn insert(&mut self, key: String, data: Vec<u8>) {
        if self.0.contains_key(&key) {
            debug!("duplicate glyph '{}' replaces an earlier charstring", key);
        }
        self.0.insert(key, data);
    }

    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.0.get(key).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl SubrTable {
    pub fn empty() -> SubrTable {
        SubrTable {
            subrs: Vec::new(),
            bias: subr_bias(0),
        }
    }

    /// Copy the subroutines out of `index`.
    ///
    /// A subroutine that can't be read is replaced by an empty one.
    pub fn from_index(index: &Index<'_>) -> Result<SubrTable, ParseError> {
        let mut subrs = Vec::new();
        subrs.try_reserve_exact(index.len())?;
        for subr_index in 0..index.len() {
            let subr = match index.read_object(subr_index) {
                Ok(data) => copy_bytes(data)?,
                Err(err) => {
                    warn!("unable to read subroutine {}: {}", subr_index, err);
                    Vec::new()
                }
            };
            subrs.push(subr);
        }

        Ok(SubrTable {
            bias: subr_bias(subrs.len()),
            subrs,
        })
    }

    /// Read the Subrs INDEX of a Private DICT, if it has one.
    fn read_local(scope: ReadScope<'_>, offset: Option<usize>) -> Result<SubrTable, ParseError> {
        let offset = match offset {
            Some(offset) => offset,
            None => return Ok(SubrTable::empty()),
        };
        match scope.offset(offset).read::<Index<'_>>() {
            Ok(index) => SubrTable::from_index(&index),
            Err(err) => {
                warn!("unable to read local subroutines at {}: {}", offset, err);
                Ok(SubrTable::empty())
            }
        }
    }

    /// The subroutine at `index`, which has already had the bias added.
    pub fn get(&self, index: usize) -> Option<&[u8]> {
        self.subrs.get(index).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.subrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subrs.is_empty()
    }

    pub fn bias(&self) -> i32 {
        self.bias
    }
}

impl DecodedFont {
    /// The charstring of the glyph named `key`.
    ///
    /// In CID-keyed fonts `key` is a decimal CID and the charstring may begin with the index of its
    /// Font DICT, see [DecodedFont::lookup_cid].
    pub fn lookup_glyph(&self, key: &str) -> Option<&[u8]> {
        self.char_strings.get(key)
    }

    /// Look up a subroutine.
    ///
    /// Local subroutines come from the Font DICT at `subfont` in CID-keyed fonts, or from the
    /// top-level Private DICT when `subfont` is `None`.
    pub fn lookup_subr(&self, index: usize, global: bool, subfont: Option<usize>) -> Option<&[u8]> {
        if global {
            return self.global_subrs.get(index);
        }
        match subfont {
            Some(fd_index) => self.subfont(fd_index)?.local_subrs.get(index),
            None => self.local_subrs.get(index),
        }
    }

    /// The charstring of the glyph that the Standard encoding assigns to `code`, as used by the
    /// accented characters of the `seac` operator.
    pub fn lookup_accent_component(&self, code: u8) -> Option<&[u8]> {
        match self.kind {
            FontKind::Type1 { .. } => self.lookup_glyph(standard_encoding_name(code)),
            FontKind::Cid(_) => None,
        }
    }

    /// The Font DICT index and bare charstring of `cid`.
    pub fn lookup_cid(&self, cid: u32) -> Option<(usize, &[u8])> {
        let cid_font = match &self.kind {
            FontKind::Cid(cid_font) => cid_font,
            FontKind::Type1 { .. } => return None,
        };
        let data = self.lookup_glyph(&cid.to_string())?;
        match cid_font.fd_bytes {
            0 => Some((0, data)),
            _ => data
                .split_first()
                .map(|(fd_index, data)| (usize::from(*fd_index), data)),
        }
    }

    /// The CID of `glyph_id` in a CID-keyed font.
    pub fn cid_for_glyph(&self, glyph_id: u16) -> Option<u16> {
        match &self.kind {
            FontKind::Cid(CidFont {
                charset: Some(charset),
                ..
            }) => match glyph_id {
                0 => Some(0),
                _ => charset.id_for_glyph(glyph_id).ok(),
            },
            FontKind::Cid(CidFont { charset: None, .. }) => {
                Some(glyph_id).filter(|&glyph_id| usize::from(glyph_id) < self.num_glyphs())
            }
            FontKind::Type1 { .. } => None,
        }
    }

    /// The name of the glyph that `code` maps to in a font that is not CID-keyed.
    pub fn glyph_name_for_code(&self, code: u8) -> Option<&str> {
        match &self.kind {
            FontKind::Type1 { encoding } => Some(encoding.glyph_name(code)),
            FontKind::Cid(_) => None,
        }
    }

    pub fn subfont(&self, fd_index: usize) -> Option<&SubFont> {
        match &self.kind {
            FontKind::Cid(cid_font) => cid_font.fd_array.get(fd_index),
            FontKind::Type1 { .. } => None,
        }
    }

    pub fn glyph_keys(&self) -> impl Iterator<Item = &str> {
        self.char_strings.keys()
    }

    pub fn is_cid(&self) -> bool {
        matches!(self.kind, FontKind::Cid(_))
    }

    /// The number of glyphs in the CharStrings INDEX, which may exceed the number of keys when
    /// glyphs share a name.
    pub fn num_glyphs(&self) -> usize {
        self.num_glyphs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::writer::{self, TtfType::*};
    use crate::tests::{wrap_in_otto, CidParts, FontBuilder, PrivateParts};

    fn charstrings(count: u8) -> Vec<Vec<u8>> {
        (0..count).map(|glyph| vec![139 + glyph, 14]).collect()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "{} != {}",
            actual,
            expected
        );
    }

    #[test]
    fn test_single_glyph() {
        let mut builder = FontBuilder::new(vec![vec![14]]);
        builder.name = b"Single".to_vec();
        let font = decode(&builder.build(), false).unwrap();
        assert_eq!(font.attributes.font_name.as_deref(), Some("Single"));
        assert_eq!(font.lookup_glyph(NOTDEF), Some(&[14][..]));
        assert_eq!(font.num_glyphs(), 1);
        assert!(!font.is_cid());
    }

    #[test]
    fn test_iso_adobe_names() {
        let font = decode(&FontBuilder::new(charstrings(3)).build(), false).unwrap();
        // SIDs 1 and 2 are space and exclam
        assert_eq!(font.lookup_glyph("space"), Some(&[140, 14][..]));
        assert_eq!(font.lookup_glyph("exclam"), Some(&[141, 14][..]));
        let mut keys = font.glyph_keys().collect::<Vec<_>>();
        keys.sort_unstable();
        assert_eq!(keys, vec![".notdef", "exclam", "space"]);
    }

    #[test]
    fn test_custom_charset_and_strings() {
        let mut builder = FontBuilder::new(charstrings(3));
        builder.strings = vec![b"alpha".to_vec()];
        builder.charset = Some(writer::convert(&[UInt8(0), UInt16(391), UInt16(500)]));
        let font = decode(&builder.build(), false).unwrap();
        assert_eq!(font.lookup_glyph("alpha"), Some(&[140, 14][..]));
        assert_eq!(font.lookup_glyph("sid-500"), Some(&[141, 14][..]));
    }

    #[test]
    fn test_charset_too_short() {
        let mut builder = FontBuilder::new(charstrings(3));
        builder.charset = Some(writer::convert(&[UInt8(0), UInt16(5)]));
        assert!(matches!(
            decode(&builder.build(), false),
            Err(ParseError::OutOfRange)
        ));
    }

    #[test]
    fn test_duplicate_names() {
        let mut builder = FontBuilder::new(charstrings(3));
        builder.charset = Some(writer::convert(&[UInt8(0), UInt16(34), UInt16(34)]));
        let font = decode(&builder.build(), false).unwrap();
        assert_eq!(font.num_glyphs(), 3);
        assert_eq!(font.char_strings.len(), 2);
        assert_eq!(font.lookup_glyph("A"), Some(&[141, 14][..]));
    }

    #[test]
    fn test_notdef_not_replaced() {
        let mut builder = FontBuilder::new(vec![vec![14], vec![0xAA, 14]]);
        builder.charset = Some(writer::convert(&[UInt8(0), UInt16(0)]));
        let font = decode(&builder.build(), false).unwrap();
        assert_eq!(font.lookup_glyph(NOTDEF), Some(&[14][..]));
        assert_eq!(font.num_glyphs(), 2);
        assert_eq!(font.char_strings.len(), 1);
    }

    #[test]
    fn test_cid_zero_not_replaced() {
        let mut builder = FontBuilder::new(vec![vec![14], vec![0xAA, 14], vec![0xBB, 14]]);
        builder.charset = Some(writer::convert(&[UInt8(0), UInt16(0), UInt16(7)]));
        builder.cid = Some(CidParts {
            registry_sid: 391,
            ordering_sid: 392,
            supplement: 0,
            font_dicts: vec![(Vec::new(), None)],
            fd_select: None,
        });
        let font = decode(&builder.build(), false).unwrap();
        assert_eq!(font.lookup_glyph("0"), Some(&[0, 14][..]));
        assert_eq!(font.lookup_cid(7), Some((0, &[0xBB, 14][..])));
        assert_eq!(font.cid_for_glyph(1), Some(0));
    }

    #[test]
    fn test_missing_char_strings() {
        let mut builder = FontBuilder::new(Vec::new());
        builder.name = b"Empty".to_vec();
        assert!(matches!(
            decode(&builder.build(), false),
            Err(ParseError::MalformedFont)
        ));
    }

    #[test]
    fn test_subrs() {
        let mut builder = FontBuilder::new(charstrings(1));
        builder.global_subrs = vec![vec![11], vec![1, 11]];
        builder.private = Some(PrivateParts {
            dict: Vec::new(),
            subrs: Some(vec![vec![2, 11]]),
        });
        let font = decode(&builder.build(), false).unwrap();
        assert_eq!(font.global_subrs.len(), 2);
        assert_eq!(font.global_subrs.bias(), 107);
        assert_eq!(font.lookup_subr(1, true, None), Some(&[1, 11][..]));
        assert_eq!(font.lookup_subr(0, false, None), Some(&[2, 11][..]));
        assert_eq!(font.lookup_subr(1, false, None), None);
        assert_eq!(font.lookup_subr(0, false, Some(0)), None);
    }

    #[test]
    fn test_bad_local_subrs_replaced() {
        let mut builder = FontBuilder::new(charstrings(1));
        // Subrs offset beyond the end of the data
        let mut dict = writer::convert(&[CFFInt(10_000)]);
        dict.push(19);
        builder.private = Some(PrivateParts { dict, subrs: None });
        let font = decode(&builder.build(), false).unwrap();
        assert!(font.local_subrs.is_empty());
        assert_eq!(font.local_subrs.bias(), 107);
    }

    #[test]
    fn test_private_attributes() {
        let mut builder = FontBuilder::new(charstrings(1));
        builder.private = Some(PrivateParts {
            dict: writer::convert(&[CFFInt(250), CFFOp(20), CFFInt(10), CFFOp(21)]),
            subrs: None,
        });
        let font = decode(&builder.build(), false).unwrap();
        assert_close(font.attributes.private.default_width_x, 250.0);
        assert_close(font.attributes.private.nominal_width_x, 10.0);
    }

    #[test]
    fn test_encoding() {
        let mut builder = FontBuilder::new(charstrings(3));
        builder.charset = Some(writer::convert(&[UInt8(0), UInt16(34), UInt16(35)]));
        builder.encoding = Some(writer::convert(&[UInt8(0), UInt8(2), UInt8(0x61), UInt8(0x62)]));
        let font = decode(&builder.build(), false).unwrap();
        assert_eq!(font.glyph_name_for_code(0x61), Some("A"));
        assert_eq!(font.glyph_name_for_code(0x62), Some("B"));
        assert_eq!(font.glyph_name_for_code(0x41), Some(NOTDEF));
    }

    #[test]
    fn test_accent_component() {
        let mut builder = FontBuilder::new(charstrings(3));
        builder.charset = Some(writer::convert(&[UInt8(0), UInt16(34), UInt16(125)]));
        let font = decode(&builder.build(), false).unwrap();
        assert_eq!(font.glyph_name_for_code(0x41), Some("A"));
        assert_eq!(font.lookup_accent_component(0x41), Some(&[140, 14][..]));
        // acute in the Standard encoding
        assert_eq!(font.lookup_accent_component(0xC2), Some(&[141, 14][..]));
        assert_eq!(font.lookup_accent_component(0x42), None);
    }

    #[test]
    fn test_cid_font() {
        let mut builder = FontBuilder::new(charstrings(3));
        builder.charset = Some(writer::convert(&[UInt8(2), UInt16(100), UInt16(1)]));
        builder.strings = vec![b"Adobe".to_vec(), b"Japan1".to_vec()];
        builder.cid = Some(CidParts {
            registry_sid: 391,
            ordering_sid: 392,
            supplement: 6,
            font_dicts: vec![
                (Vec::new(), None),
                (
                    Vec::new(),
                    Some(PrivateParts {
                        dict: Vec::new(),
                        subrs: Some(vec![vec![3, 11]]),
                    }),
                ),
            ],
            fd_select: Some(writer::convert(&[UInt8(0), UInt8(0), UInt8(1), UInt8(0)])),
        });
        let font = decode(&builder.build(), false).unwrap();
        assert!(font.is_cid());
        let ros = font.attributes.ros.as_ref().unwrap();
        assert_eq!(ros.registry, "Adobe");
        assert_eq!(ros.ordering, "Japan1");
        assert_eq!(ros.supplement, 6);

        assert_eq!(font.lookup_glyph("0"), Some(&[0, 139, 14][..]));
        assert_eq!(font.lookup_glyph("100"), Some(&[1, 140, 14][..]));
        assert_eq!(font.lookup_cid(101), Some((0, &[141, 14][..])));
        assert_eq!(font.cid_for_glyph(2), Some(101));
        assert_eq!(font.cid_for_glyph(3), None);
        assert_eq!(font.lookup_subr(0, false, Some(1)), Some(&[3, 11][..]));
        assert_eq!(font.lookup_subr(0, false, Some(0)), None);
        assert_eq!(font.glyph_name_for_code(0x41), None);
        assert_eq!(font.lookup_accent_component(0x41), None);
    }

    #[test]
    fn test_cid_font_dict_out_of_range() {
        let mut builder = FontBuilder::new(charstrings(2));
        builder.cid = Some(CidParts {
            registry_sid: 391,
            ordering_sid: 392,
            supplement: 0,
            font_dicts: vec![(Vec::new(), None), (Vec::new(), None)],
            fd_select: Some(writer::convert(&[UInt8(0), UInt8(0), UInt8(2)])),
        });
        assert!(matches!(
            decode(&builder.build(), false),
            Err(ParseError::MalformedFont)
        ));
    }

    #[test]
    fn test_cid_single_font_dict_without_fd_select() {
        let mut builder = FontBuilder::new(charstrings(2));
        builder.cid = Some(CidParts {
            registry_sid: 391,
            ordering_sid: 392,
            supplement: 0,
            font_dicts: vec![(Vec::new(), None)],
            fd_select: None,
        });
        let font = decode(&builder.build(), false).unwrap();
        // sid-391 as there is no String INDEX
        let ros = font.attributes.ros.as_ref().unwrap();
        assert_eq!(ros.registry, "sid-391");
        assert_eq!(font.lookup_cid(1), Some((0, &[140, 14][..])));
    }

    #[test]
    fn test_cid_font_dict_matrix_scaled() {
        let mut builder = FontBuilder::new(charstrings(1));
        let font_dict = writer::convert(&[
            CFFReal("0.002"),
            CFFInt(0),
            CFFInt(0),
            CFFReal("0.002"),
            CFFInt(0),
            CFFInt(0),
            CFFEscapedOp(7),
        ]);
        builder.cid = Some(CidParts {
            registry_sid: 391,
            ordering_sid: 392,
            supplement: 0,
            font_dicts: vec![(font_dict, None)],
            fd_select: None,
        });
        let font = decode(&builder.build(), false).unwrap();
        assert_eq!(font.attributes.font_matrix, FontMatrix::default());
        let subfont = font.subfont(0).unwrap();
        assert_close(subfont.attributes.font_matrix.0[0], 2.0);
        assert_close(subfont.attributes.font_matrix.0[3], 2.0);
    }

    #[test]
    fn test_force_cid() {
        let mut builder = FontBuilder::new(charstrings(2));
        builder.private = Some(PrivateParts {
            dict: Vec::new(),
            subrs: Some(vec![vec![4, 11]]),
        });
        let font = decode(&builder.build(), true).unwrap();
        assert!(font.is_cid());
        let ros = font.attributes.ros.as_ref().unwrap();
        assert_eq!(
            (ros.registry.as_str(), ros.ordering.as_str(), ros.supplement),
            ("Adobe", "Identity", 0)
        );
        assert_eq!(font.lookup_glyph("1"), Some(&[140, 14][..]));
        assert_eq!(font.lookup_cid(0), Some((0, &[139, 14][..])));
        assert_eq!(font.cid_for_glyph(1), Some(1));
        assert_eq!(font.cid_for_glyph(2), None);
        assert_eq!(font.lookup_subr(0, false, Some(0)), Some(&[4, 11][..]));

        match &font.kind {
            FontKind::Cid(cid_font) => {
                assert!(cid_font.forced);
                assert_eq!(cid_font.fd_bytes, 0);
                assert_eq!(cid_font.fd_array.len(), 1);
                assert_eq!(
                    cid_font.fd_array[0].attributes.font_matrix,
                    FontMatrix::IDENTITY
                );
            }
            FontKind::Type1 { .. } => panic!("expected a CID-keyed font"),
        }
    }

    #[test]
    fn test_raw_font() {
        let cff = FontBuilder::new(charstrings(2)).build();
        let raw_font = RawFont::new(&wrap_in_otto(&cff)).unwrap();
        assert_eq!(raw_font.scope().data(), cff.as_slice());
        assert_eq!(raw_font.scope().base(), 0);
        let font = raw_font.decode(false).unwrap();
        assert_eq!(font.lookup_glyph("space"), Some(&[140, 14][..]));
    }
}
