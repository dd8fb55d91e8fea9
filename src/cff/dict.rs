//! CFF DICT parsing.
//!
//! A DICT is a sequence of operands followed by an operator. Each operator is applied to a
//! [FontAttributes] record as soon as it is read, and the locations of the other tables are
//! collected in [TableOffsets].

use std::convert::TryFrom;

use log::debug;
use tinyvec::TinyVec;

use crate::binary::read::{ReadBinary, ReadCtxt, ReadScope};
use crate::binary::{I16Be, I32Be};
use crate::cff::{sid_name, Index};
use crate::error::ParseError;

/// Maximum number of operands that may precede a DICT operator
pub const MAX_OPERANDS: usize = 48;

const END_OF_FLOAT_FLAG: u8 = 0xf;

const FLOAT_BUF_LEN: usize = 64;

/// An item read from a DICT
#[derive(Debug, PartialEq, Clone)]
pub enum Op {
    Operator(Operator),
    Operand(Operand),
    /// An operator code with no assigned meaning
    Unknown(u16),
    /// A byte reserved by the format
    Reserved(u8),
}

#[derive(Debug, PartialEq, Clone)]
pub enum Operand {
    Integer(i32),
    Real(Real),
}

/// The nibbles of a real number operand
#[derive(Debug, PartialEq, Clone)]
pub struct Real(TinyVec<[u8; 7]>);

#[repr(u16)]
#[derive(Debug, PartialEq, Copy, Clone)]
pub enum Operator {
    Version = 0,
    Notice = 1,
    FullName = 2,
    FamilyName = 3,
    Weight = 4,
    FontBBox = 5,
    BlueValues = 6,
    OtherBlues = 7,
    FamilyBlues = 8,
    FamilyOtherBlues = 9,
    StdHW = 10,
    StdVW = 11,
    UniqueID = 13,
    XUID = 14,
    Charset = 15,
    Encoding = 16,
    CharStrings = 17,
    Private = 18,
    Subrs = 19,
    DefaultWidthX = 20,
    NominalWidthX = 21,
    Copyright = op2(0),
    IsFixedPitch = op2(1),
    ItalicAngle = op2(2),
    UnderlinePosition = op2(3),
    UnderlineThickness = op2(4),
    PaintType = op2(5),
    CharstringType = op2(6),
    FontMatrix = op2(7),
    StrokeWidth = op2(8),
    BlueScale = op2(9),
    BlueShift = op2(10),
    BlueFuzz = op2(11),
    StemSnapH = op2(12),
    StemSnapV = op2(13),
    ForceBold = op2(14),
    LanguageGroup = op2(17),
    ExpansionFactor = op2(18),
    InitialRandomSeed = op2(19),
    SyntheticBase = op2(20),
    PostScript = op2(21),
    BaseFontName = op2(22),
    BaseFontBlend = op2(23),
    ROS = op2(30),
    CIDFontVersion = op2(31),
    CIDFontRevision = op2(32),
    CIDFontType = op2(33),
    CIDCount = op2(34),
    UIDBase = op2(35),
    FDArray = op2(36),
    FDSelect = op2(37),
    FontName = op2(38),
}

/// A 2x3 affine transformation matrix `[xx xy yx yy tx ty]`
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FontMatrix(pub [f64; 6]);

/// Registry, Ordering and Supplement of a CID-keyed font
#[derive(Debug, Clone, PartialEq)]
pub struct Ros {
    pub registry: String,
    pub ordering: String,
    pub supplement: i32,
}

/// Hinting parameters, usually found in the Private DICT
#[derive(Debug, Clone, PartialEq)]
pub struct PrivateAttributes {
    pub blue_values: Vec<f64>,
    pub other_blues: Vec<f64>,
    pub family_blues: Vec<f64>,
    pub family_other_blues: Vec<f64>,
    pub std_hw: Option<f64>,
    pub std_vw: Option<f64>,
    pub stem_snap_h: Vec<f64>,
    pub stem_snap_v: Vec<f64>,
    pub blue_scale: f64,
    pub blue_shift: f64,
    pub blue_fuzz: f64,
    pub force_bold: bool,
    pub language_group: i32,
    pub expansion_factor: f64,
    pub initial_random_seed: i32,
    pub default_width_x: f64,
    pub nominal_width_x: f64,
}

/// Attributes decoded from a Top DICT (or FDArray DICT) and the Private DICT it refers to
#[derive(Debug, Clone, PartialEq)]
pub struct FontAttributes {
    pub font_name: Option<String>,
    pub full_name: Option<String>,
    pub family_name: Option<String>,
    pub weight: Option<String>,
    pub unique_id: Option<i32>,
    pub uid_base: Option<i32>,
    pub font_matrix: FontMatrix,
    pub font_bbox: [f64; 4],
    pub is_fixed_pitch: bool,
    pub italic_angle: f64,
    pub underline_position: f64,
    pub underline_thickness: f64,
    pub paint_type: i32,
    /// 2 for Type 2 charstrings, 1 for Type 1
    pub charstring_type: i32,
    pub stroke_width: f64,
    pub ros: Option<Ros>,
    pub cid_count: i32,
    pub private: PrivateAttributes,
}

/// Size and offset of a Private DICT
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PrivateRange {
    pub size: usize,
    pub offset: usize,
}

/// Locations of tables named by a DICT, relative to the start of the CFF data
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableOffsets {
    /// Charset offset, or one of the predefined charset ids 0, 1, 2
    pub charset: usize,
    /// Encoding offset, or one of the predefined encoding ids 0, 1
    pub encoding: usize,
    pub char_strings: Option<usize>,
    pub private: Option<PrivateRange>,
    pub local_subrs: Option<usize>,
    pub fd_array: Option<usize>,
    pub fd_select: Option<usize>,
    pub has_ros: bool,
    pub has_matrix: bool,
}

/// Parses DICT data, following the Private DICT reference of a top-level DICT.
pub struct DictReader<'a, 'b> {
    scope: ReadScope<'a>,
    strings: &'b Index<'a>,
}

const fn op2(value: u8) -> u16 {
    (12 << 8) | (value as u16)
}

impl ReadBinary for Op {
    type HostType<'b> = Self;

    fn read<'a>(ctxt: &mut ReadCtxt<'a>) -> Result<Self, ParseError> {
        let b0 = ctxt.read_u8()?;

        match b0 {
            0..=11 | 13..=21 => Ok(operator(u16::from(b0))),
            12 => Ok(operator(op2(ctxt.read_u8()?))),
            28 | 29 | 32..=254 => {
                read_cff_integer(ctxt, b0).map(|value| Op::Operand(Operand::Integer(value)))
            }
            30 => {
                let slice = ctxt.read_until_nibble(END_OF_FLOAT_FLAG)?;
                Ok(Op::Operand(Operand::Real(Real(TinyVec::from(slice)))))
            }
            22..=27 | 31 | 255 => Ok(Op::Reserved(b0)),
        }
    }
}

fn operator(code: u16) -> Op {
    Operator::try_from(code).map_or(Op::Unknown(code), Op::Operator)
}

/// Read the remainder of an integer operand that began with `b0`.
///
/// Refer to Table 3 Operand Encoding in section 4 of Technical Note #5176.
pub fn read_cff_integer(ctxt: &mut ReadCtxt<'_>, b0: u8) -> Result<i32, ParseError> {
    match b0 {
        28 => Ok(i32::from(ctxt.read::<I16Be>()?)),
        29 => ctxt.read::<I32Be>(),
        32..=246 => Ok(i32::from(b0) - 139),
        247..=250 => {
            let b1 = ctxt.read_u8()?;
            Ok((i32::from(b0) - 247) * 256 + i32::from(b1) + 108)
        }
        251..=254 => {
            let b1 = ctxt.read_u8()?;
            Ok(-(i32::from(b0) - 251) * 256 - i32::from(b1) - 108)
        }
        _ => Err(ParseError::MalformedFont),
    }
}

/// Read a real number operand, not including its leading 30 byte.
///
/// A real that runs to the end of the data without a terminating nibble is accepted.
pub fn read_cff_real(ctxt: &mut ReadCtxt<'_>) -> Result<f64, ParseError> {
    let slice = ctxt.read_until_nibble(END_OF_FLOAT_FLAG)?;
    f64::try_from(&Real(TinyVec::from(slice)))
}

impl TryFrom<&Real> for f64 {
    type Error = ParseError;

    /// Try to parse this `Real` into an `f64`.
    fn try_from(real: &Real) -> Result<Self, Self::Error> {
        let mut buf = [0u8; FLOAT_BUF_LEN];
        let mut used = 0;

        'bytes: for &byte in real.0.iter() {
            for nibble in [byte >> 4, byte & 0xF] {
                if nibble == END_OF_FLOAT_FLAG {
                    break 'bytes;
                }
                parse_float_nibble(nibble, &mut used, &mut buf)?;
            }
        }

        let s = std::str::from_utf8(&buf[..used]).map_err(|_| ParseError::MalformedFont)?;
        // A truncated real can stop part way through its exponent
        let s = s.trim_end_matches(|c| c == 'E' || c == '-');
        if s.is_empty() {
            return Ok(0.0);
        }
        s.parse().map_err(|_| ParseError::MalformedFont)
    }
}

// Adobe Technical Note #5176, Table 5 Nibble Definitions
fn parse_float_nibble(nibble: u8, idx: &mut usize, data: &mut [u8]) -> Result<(), ParseError> {
    if *idx == FLOAT_BUF_LEN {
        return Err(ParseError::MalformedFont);
    }

    match nibble {
        0..=9 => {
            data[*idx] = b'0' + nibble;
        }
        10 => {
            data[*idx] = b'.';
        }
        11 => {
            data[*idx] = b'E';
        }
        12 => {
            if *idx + 1 == FLOAT_BUF_LEN {
                return Err(ParseError::MalformedFont);
            }

            data[*idx] = b'E';
            *idx += 1;
            data[*idx] = b'-';
        }
        // reserved
        13 => return Ok(()),
        14 => {
            data[*idx] = b'-';
        }
        _ => return Err(ParseError::MalformedFont),
    }

    *idx += 1;
    Ok(())
}

impl TryFrom<u16> for Operator {
    type Error = ParseError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        if (value & 0xFF00) == (12 << 8) {
            match value as u8 {
                0 => Ok(Operator::Copyright),
                1 => Ok(Operator::IsFixedPitch),
                2 => Ok(Operator::ItalicAngle),
                3 => Ok(Operator::UnderlinePosition),
                4 => Ok(Operator::UnderlineThickness),
                5 => Ok(Operator::PaintType),
                6 => Ok(Operator::CharstringType),
                7 => Ok(Operator::FontMatrix),
                8 => Ok(Operator::StrokeWidth),
                9 => Ok(Operator::BlueScale),
                10 => Ok(Operator::BlueShift),
                11 => Ok(Operator::BlueFuzz),
                12 => Ok(Operator::StemSnapH),
                13 => Ok(Operator::StemSnapV),
                14 => Ok(Operator::ForceBold),
                17 => Ok(Operator::LanguageGroup),
                18 => Ok(Operator::ExpansionFactor),
                19 => Ok(Operator::InitialRandomSeed),
                20 => Ok(Operator::SyntheticBase),
                21 => Ok(Operator::PostScript),
                22 => Ok(Operator::BaseFontName),
                23 => Ok(Operator::BaseFontBlend),
                30 => Ok(Operator::ROS),
                31 => Ok(Operator::CIDFontVersion),
                32 => Ok(Operator::CIDFontRevision),
                33 => Ok(Operator::CIDFontType),
                34 => Ok(Operator::CIDCount),
                35 => Ok(Operator::UIDBase),
                36 => Ok(Operator::FDArray),
                37 => Ok(Operator::FDSelect),
                38 => Ok(Operator::FontName),
                _ => Err(ParseError::MalformedFont),
            }
        } else {
            match value {
                0 => Ok(Operator::Version),
                1 => Ok(Operator::Notice),
                2 => Ok(Operator::FullName),
                3 => Ok(Operator::FamilyName),
                4 => Ok(Operator::Weight),
                5 => Ok(Operator::FontBBox),
                6 => Ok(Operator::BlueValues),
                7 => Ok(Operator::OtherBlues),
                8 => Ok(Operator::FamilyBlues),
                9 => Ok(Operator::FamilyOtherBlues),
                10 => Ok(Operator::StdHW),
                11 => Ok(Operator::StdVW),
                13 => Ok(Operator::UniqueID),
                14 => Ok(Operator::XUID),
                15 => Ok(Operator::Charset),
                16 => Ok(Operator::Encoding),
                17 => Ok(Operator::CharStrings),
                18 => Ok(Operator::Private),
                19 => Ok(Operator::Subrs),
                20 => Ok(Operator::DefaultWidthX),
                21 => Ok(Operator::NominalWidthX),
                _ => Err(ParseError::MalformedFont),
            }
        }
    }
}

impl Operand {
    pub fn to_i32(&self) -> Result<i32, ParseError> {
        match self {
            Operand::Integer(value) => Ok(*value),
            Operand::Real(real) => f64::try_from(real).map(|value| value as i32),
        }
    }

    pub fn to_f64(&self) -> Result<f64, ParseError> {
        match self {
            Operand::Integer(value) => Ok(f64::from(*value)),
            Operand::Real(real) => f64::try_from(real),
        }
    }

    /// Interpret this operand as an offset or size, which may not be negative.
    pub fn to_offset(&self) -> Result<usize, ParseError> {
        Ok(usize::try_from(self.to_i32()?)?)
    }
}

impl FontMatrix {
    pub const IDENTITY: FontMatrix = FontMatrix([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    pub const fn scale(factor: f64) -> FontMatrix {
        FontMatrix([factor, 0.0, 0.0, factor, 0.0, 0.0])
    }

    /// The matrix that applies `self` and then `other`.
    pub fn concat(&self, other: &FontMatrix) -> FontMatrix {
        let [a_xx, a_xy, a_yx, a_yy, a_tx, a_ty] = self.0;
        let [b_xx, b_xy, b_yx, b_yy, b_tx, b_ty] = other.0;
        FontMatrix([
            a_xx * b_xx + a_xy * b_yx,
            a_xx * b_xy + a_xy * b_yy,
            a_yx * b_xx + a_yy * b_yx,
            a_yx * b_xy + a_yy * b_yy,
            a_tx * b_xx + a_ty * b_yx + b_tx,
            a_tx * b_xy + a_ty * b_yy + b_ty,
        ])
    }
}

impl Default for FontMatrix {
    fn default() -> Self {
        FontMatrix::scale(0.001)
    }
}

impl Default for PrivateAttributes {
    fn default() -> Self {
        PrivateAttributes {
            blue_values: Vec::new(),
            other_blues: Vec::new(),
            family_blues: Vec::new(),
            family_other_blues: Vec::new(),
            std_hw: None,
            std_vw: None,
            stem_snap_h: Vec::new(),
            stem_snap_v: Vec::new(),
            blue_scale: 0.039625,
            blue_shift: 7.0,
            blue_fuzz: 1.0,
            force_bold: false,
            language_group: 0,
            expansion_factor: 0.06,
            initial_random_seed: 0,
            default_width_x: 0.0,
            nominal_width_x: 0.0,
        }
    }
}

impl Default for FontAttributes {
    fn default() -> Self {
        FontAttributes {
            font_name: None,
            full_name: None,
            family_name: None,
            weight: None,
            unique_id: None,
            uid_base: None,
            font_matrix: FontMatrix::default(),
            font_bbox: [0.0; 4],
            is_fixed_pitch: false,
            italic_angle: 0.0,
            underline_position: -100.0,
            underline_thickness: 50.0,
            paint_type: 0,
            charstring_type: 2,
            stroke_width: 0.0,
            ros: None,
            cid_count: 8720,
            private: PrivateAttributes::default(),
        }
    }
}

impl PrivateRange {
    fn from_operands(operands: &[Operand]) -> Result<PrivateRange, ParseError> {
        match operands {
            [size, offset, ..] => Ok(PrivateRange {
                size: size.to_offset()?,
                offset: offset.to_offset()?,
            }),
            _ => Err(ParseError::MalformedFont),
        }
    }
}

impl<'a, 'b> DictReader<'a, 'b> {
    /// `scope` is the whole CFF data, which Private DICT offsets are relative to.
    pub fn new(scope: ReadScope<'a>, strings: &'b Index<'a>) -> Self {
        DictReader { scope, strings }
    }

    /// Parse the DICT in `dict`, updating `attributes` and `offsets`.
    ///
    /// A Private DICT named by a top-level DICT is parsed once the top-level DICT is complete. A
    /// Private operator inside a DICT that is not top-level is rejected.
    pub fn read_dict(
        &self,
        dict: ReadScope<'a>,
        is_top_level: bool,
        attributes: &mut FontAttributes,
        offsets: &mut TableOffsets,
    ) -> Result<(), ParseError> {
        let mut ctxt = dict.ctxt();
        let mut operands = Vec::with_capacity(MAX_OPERANDS);
        let mut private = None;

        while ctxt.bytes_available() {
            let b0 = ctxt.scope().data().first().copied();
            let op = match ctxt.read::<Op>() {
                Ok(op) => op,
                Err(ParseError::MalformedFont) if matches!(b0, Some(28 | 29 | 247..=254)) => {
                    debug!("truncated operand ends DICT at {}", dict.base() + ctxt.offset());
                    break;
                }
                Err(err) => return Err(err),
            };

            match op {
                Op::Operand(operand) => {
                    if operands.len() == MAX_OPERANDS {
                        debug!("more than {} operands in DICT", MAX_OPERANDS);
                        return Err(ParseError::MalformedFont);
                    }
                    operands.push(operand);
                }
                Op::Operator(Operator::Private) => {
                    if !is_top_level {
                        debug!("Private operator in a Private DICT");
                        return Err(ParseError::MalformedFont);
                    }
                    let range = PrivateRange::from_operands(&operands)?;
                    offsets.private = Some(range);
                    private = Some(range);
                    operands.clear();
                }
                Op::Operator(operator) => {
                    self.apply(operator, &operands, dict.base(), attributes, offsets)?;
                    operands.clear();
                }
                Op::Unknown(code) => {
                    debug!("ignoring unknown DICT operator 0x{:04x}", code);
                    operands.clear();
                }
                Op::Reserved(byte) => debug!("skipping reserved DICT byte {}", byte),
            }
        }

        match private {
            Some(range) => self.read_private(range, attributes, offsets),
            None => Ok(()),
        }
    }

    fn read_private(
        &self,
        range: PrivateRange,
        attributes: &mut FontAttributes,
        offsets: &mut TableOffsets,
    ) -> Result<(), ParseError> {
        if range.size == 0 {
            return Ok(());
        }

        let available = self.scope.data().len();
        if range.offset >= available {
            return Err(ParseError::MalformedFont);
        }
        let length = range.size.min(available - range.offset);
        let private = self.scope.offset_length(range.offset, length)?;

        self.read_dict(private, false, attributes, offsets)
    }

    fn apply(
        &self,
        operator: Operator,
        operands: &[Operand],
        dict_base: usize,
        attributes: &mut FontAttributes,
        offsets: &mut TableOffsets,
    ) -> Result<(), ParseError> {
        let hints = &mut attributes.private;
        match operator {
            Operator::FullName => set(&mut attributes.full_name, self.name(operands)?),
            Operator::FamilyName => set(&mut attributes.family_name, self.name(operands)?),
            Operator::Weight => set(&mut attributes.weight, self.name(operands)?),
            Operator::FontName => set(&mut attributes.font_name, self.name(operands)?),
            Operator::FontBBox => {
                if let [x_min, y_min, x_max, y_max, ..] = operands {
                    attributes.font_bbox = [
                        x_min.to_f64()?,
                        y_min.to_f64()?,
                        x_max.to_f64()?,
                        y_max.to_f64()?,
                    ];
                }
            }
            Operator::FontMatrix => {
                if operands.len() >= 6 {
                    let mut matrix = [0.0; 6];
                    for (value, operand) in matrix.iter_mut().zip(operands) {
                        *value = operand.to_f64()?;
                    }
                    attributes.font_matrix = FontMatrix(matrix);
                    offsets.has_matrix = true;
                }
            }
            Operator::UniqueID => set(&mut attributes.unique_id, first_i32(operands)?),
            Operator::UIDBase => set(&mut attributes.uid_base, first_i32(operands)?),
            Operator::IsFixedPitch => {
                set_value(&mut attributes.is_fixed_pitch, first_bool(operands)?)
            }
            Operator::ItalicAngle => set_value(&mut attributes.italic_angle, first_f64(operands)?),
            Operator::UnderlinePosition => {
                set_value(&mut attributes.underline_position, first_f64(operands)?)
            }
            Operator::UnderlineThickness => {
                set_value(&mut attributes.underline_thickness, first_f64(operands)?)
            }
            Operator::PaintType => set_value(&mut attributes.paint_type, first_i32(operands)?),
            Operator::CharstringType => {
                set_value(&mut attributes.charstring_type, first_i32(operands)?)
            }
            Operator::StrokeWidth => set_value(&mut attributes.stroke_width, first_f64(operands)?),
            Operator::CIDCount => set_value(&mut attributes.cid_count, first_i32(operands)?),
            Operator::ROS => match operands {
                [registry, ordering, supplement, ..] => {
                    attributes.ros = Some(Ros {
                        registry: sid_name(self.strings, registry.to_i32()?),
                        ordering: sid_name(self.strings, ordering.to_i32()?),
                        supplement: supplement.to_i32()?,
                    });
                    offsets.has_ros = true;
                }
                _ => return Err(ParseError::MalformedFont),
            },

            Operator::BlueValues => set_deltas(&mut hints.blue_values, operands)?,
            Operator::OtherBlues => set_deltas(&mut hints.other_blues, operands)?,
            Operator::FamilyBlues => set_deltas(&mut hints.family_blues, operands)?,
            Operator::FamilyOtherBlues => set_deltas(&mut hints.family_other_blues, operands)?,
            Operator::StemSnapH => set_deltas(&mut hints.stem_snap_h, operands)?,
            Operator::StemSnapV => set_deltas(&mut hints.stem_snap_v, operands)?,
            Operator::StdHW => set(&mut hints.std_hw, first_f64(operands)?),
            Operator::StdVW => set(&mut hints.std_vw, first_f64(operands)?),
            Operator::BlueScale => set_value(&mut hints.blue_scale, first_f64(operands)?),
            Operator::BlueShift => set_value(&mut hints.blue_shift, first_f64(operands)?),
            Operator::BlueFuzz => set_value(&mut hints.blue_fuzz, first_f64(operands)?),
            Operator::ForceBold => set_value(&mut hints.force_bold, first_bool(operands)?),
            Operator::LanguageGroup => set_value(&mut hints.language_group, first_i32(operands)?),
            Operator::ExpansionFactor => {
                set_value(&mut hints.expansion_factor, first_f64(operands)?)
            }
            Operator::InitialRandomSeed => {
                set_value(&mut hints.initial_random_seed, first_i32(operands)?)
            }
            Operator::DefaultWidthX => set_value(&mut hints.default_width_x, first_f64(operands)?),
            Operator::NominalWidthX => set_value(&mut hints.nominal_width_x, first_f64(operands)?),

            Operator::Charset => offsets.charset = required_offset(operands)?,
            Operator::Encoding => offsets.encoding = required_offset(operands)?,
            Operator::CharStrings => offsets.char_strings = Some(required_offset(operands)?),
            Operator::FDArray => offsets.fd_array = Some(required_offset(operands)?),
            Operator::FDSelect => offsets.fd_select = Some(required_offset(operands)?),
            Operator::Subrs => {
                // Relative to the start of the DICT holding the operator
                let offset = dict_base
                    .checked_add(required_offset(operands)?)
                    .ok_or(ParseError::MalformedFont)?;
                offsets.local_subrs = Some(offset);
            }

            // Private is handled by read_dict
            Operator::Private
            | Operator::Version
            | Operator::Notice
            | Operator::Copyright
            | Operator::XUID
            | Operator::SyntheticBase
            | Operator::PostScript
            | Operator::BaseFontName
            | Operator::BaseFontBlend
            | Operator::CIDFontVersion
            | Operator::CIDFontRevision
            | Operator::CIDFontType => {}
        }

        Ok(())
    }

    fn name(&self, operands: &[Operand]) -> Result<Option<String>, ParseError> {
        Ok(first_i32(operands)?.map(|sid| sid_name(self.strings, sid)))
    }
}

fn set<T>(field: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *field = value;
    }
}

fn set_value<T>(field: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *field = value;
    }
}

fn first_i32(operands: &[Operand]) -> Result<Option<i32>, ParseError> {
    operands.first().map(Operand::to_i32).transpose()
}

fn first_f64(operands: &[Operand]) -> Result<Option<f64>, ParseError> {
    operands.first().map(Operand::to_f64).transpose()
}

fn first_bool(operands: &[Operand]) -> Result<Option<bool>, ParseError> {
    Ok(first_f64(operands)?.map(|value| value != 0.0))
}

fn required_offset(operands: &[Operand]) -> Result<usize, ParseError> {
    operands
        .first()
        .ok_or(ParseError::MalformedFont)?
        .to_offset()
}

/// Expand a delta encoded array, where each value is relative to the one before it.
fn set_deltas(field: &mut Vec<f64>, operands: &[Operand]) -> Result<(), ParseError> {
    if operands.is_empty() {
        return Ok(());
    }

    let mut values = Vec::with_capacity(operands.len());
    let mut current = 0.0;
    for operand in operands {
        current += operand.to_f64()?;
        values.push(current);
    }
    *field = values;
    Ok(())
}
