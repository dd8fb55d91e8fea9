mod common;

use cff_font::cff::dict::FontMatrix;
use cff_font::cff::{subr_bias, FontKind};
use cff_font::{decode, ParseError};

use common::{cff_index, wrap_in_otto, CidParts, FontBuilder, PrivateParts};

fn assert_matrix_close(actual: &FontMatrix, expected: &FontMatrix) {
    for (a, b) in actual.0.iter().zip(expected.0.iter()) {
        assert!((a - b).abs() < 1e-9, "{:?} != {:?}", actual, expected);
    }
}

/// Encode a DICT real operand.
fn dict_real(value: &str) -> Vec<u8> {
    let mut nibbles = value
        .bytes()
        .map(|b| match b {
            b'0'..=b'9' => b - b'0',
            b'.' => 0xA,
            b'-' => 0xE,
            _ => panic!("unsupported real {}", value),
        })
        .collect::<Vec<_>>();
    nibbles.push(0xF);
    if nibbles.len() % 2 == 1 {
        nibbles.push(0xF);
    }
    let mut data = vec![30];
    data.extend(nibbles.chunks(2).map(|pair| (pair[0] << 4) | pair[1]));
    data
}

fn font_matrix_dict(values: [&str; 6]) -> Vec<u8> {
    let mut dict = values.iter().flat_map(|value| dict_real(value)).collect::<Vec<_>>();
    dict.extend([12, 7]);
    dict
}

#[test]
fn one_glyph_round_trip() {
    let glyph = vec![0x8B, 0x8B, 0x15, 0x0E];
    let mut builder = FontBuilder::new(vec![vec![0x0E], glyph.clone()]);
    builder.strings = vec![b"uni4E00".to_vec()];
    builder.charset = Some(vec![0, 0x01, 0x87]); // format 0, SID 391
    let font = decode(&builder.build(), false).unwrap();

    assert_eq!(font.lookup_glyph("uni4E00"), Some(glyph.as_slice()));
    assert_eq!(font.lookup_glyph(".notdef"), Some(&[0x0E][..]));
    assert_eq!(font.lookup_glyph("A"), None);
    assert_eq!(font.attributes.font_name.as_deref(), Some("Test"));
}

#[test]
fn opentype_container() {
    let cff = FontBuilder::new(vec![vec![0x0E], vec![0x0E]]).build();
    let font = decode(&wrap_in_otto(&cff), false).unwrap();
    assert_eq!(font.lookup_glyph("space"), Some(&[0x0E][..]));
}

#[test]
fn opentype_container_without_cff_table() {
    let cff = FontBuilder::new(vec![vec![0x0E]]).build();
    let mut data = wrap_in_otto(&cff);
    // Rename the CFF table record
    data[12..16].copy_from_slice(b"glyf");
    assert!(matches!(decode(&data, false), Err(ParseError::NotAFont)));
}

#[test]
fn not_a_font() {
    assert!(matches!(decode(&[], false), Err(ParseError::NotAFont)));
    assert!(matches!(
        decode(&[2, 0, 4, 1, 0, 0], false),
        Err(ParseError::NotAFont)
    ));
    assert!(matches!(
        decode(b"%PDF-1.7", false),
        Err(ParseError::NotAFont)
    ));
}

#[test]
fn font_set_unsupported() {
    let mut data = vec![1, 0, 4, 1];
    data.extend(cff_index(&[b"One".to_vec(), b"Two".to_vec()]));
    data.extend(cff_index(&[Vec::new(), Vec::new()]));
    data.extend(cff_index(&[]));
    data.extend(cff_index(&[]));
    assert!(matches!(
        decode(&data, false),
        Err(ParseError::UnsupportedFont)
    ));
}

#[test]
fn missing_char_strings_offset() {
    let mut data = vec![1, 0, 4, 1];
    data.extend(cff_index(&[b"Test".to_vec()]));
    data.extend(cff_index(&[Vec::new()]));
    data.extend(cff_index(&[]));
    data.extend(cff_index(&[]));
    assert!(matches!(decode(&data, false), Err(ParseError::MalformedFont)));
}

#[test]
fn truncated_font() {
    let data = FontBuilder::new(vec![vec![0x0E], vec![0x0E]]).build();
    for len in [4, 10, data.len() - 1] {
        assert!(decode(&data[..len], false).is_err(), "length {}", len);
    }
}

#[test]
fn subroutine_bias() {
    let mut builder = FontBuilder::new(vec![vec![0x0E]]);
    builder.global_subrs = vec![vec![0x0B]; 1240];
    builder.private = Some(PrivateParts {
        dict: Vec::new(),
        subrs: Some(vec![vec![0x0B]; 5]),
    });
    let font = decode(&builder.build(), false).unwrap();
    assert_eq!(font.global_subrs.bias(), subr_bias(1240));
    assert_eq!(font.global_subrs.bias(), 1131);
    assert_eq!(font.local_subrs.bias(), 107);
    assert_eq!(font.lookup_subr(1239, true, None), Some(&[0x0B][..]));
    assert_eq!(font.lookup_subr(1240, true, None), None);
}

#[test]
fn force_cid_keeps_font_matrix() {
    let original = ["0.002", "0", "0.0005", "0.002", "5", "-10"];
    let mut builder = FontBuilder::new(vec![vec![0x0E], vec![0x8B, 0x0E]]);
    builder.top_dict = font_matrix_dict(original);
    let plain = decode(&builder.build(), false).unwrap();
    let forced = decode(&builder.build(), true).unwrap();

    let ros = forced.attributes.ros.as_ref().unwrap();
    assert_eq!(ros.registry, "Adobe");
    assert_eq!(ros.ordering, "Identity");
    assert_eq!(ros.supplement, 0);

    let cid_font = match &forced.kind {
        FontKind::Cid(cid_font) => cid_font,
        FontKind::Type1 { .. } => panic!("expected a CID-keyed font"),
    };
    assert_eq!(cid_font.fd_array.len(), 1);
    let effective = cid_font.fd_array[0]
        .attributes
        .font_matrix
        .concat(&forced.attributes.font_matrix);
    assert_matrix_close(&effective, &plain.attributes.font_matrix);
    assert_matrix_close(
        &plain.attributes.font_matrix,
        &FontMatrix([0.002, 0.0, 0.0005, 0.002, 5.0, -10.0]),
    );

    assert_eq!(forced.lookup_glyph("1"), plain.lookup_glyph("space"));
    assert_eq!(forced.lookup_cid(1), Some((0, &[0x8B, 0x0E][..])));
}

#[test]
fn cid_font_with_ranged_fd_select() {
    let char_strings = (0..25u8).map(|glyph| vec![glyph, 0x0E]).collect::<Vec<_>>();
    let mut builder = FontBuilder::new(char_strings);
    builder.strings = vec![b"Adobe".to_vec(), b"GB1".to_vec()];
    // format 2 charset: GIDs 1..=24 are CIDs 1001..=1024
    builder.charset = Some(vec![2, 0x03, 0xE9, 0x00, 0x17]);
    builder.cid = Some(CidParts {
        registry_sid: 391,
        ordering_sid: 392,
        supplement: 4,
        font_dicts: vec![
            (Vec::new(), None),
            (
                Vec::new(),
                Some(PrivateParts {
                    dict: Vec::new(),
                    subrs: Some(vec![vec![0x0B]]),
                }),
            ),
        ],
        fd_select: Some(vec![
            3,
            0x00, 0x02,       // nRanges
            0x00, 0x00, 0x00, // GIDs 0..10 use FD 0
            0x00, 0x0A, 0x01, // GIDs 10..25 use FD 1
            0x00, 0x19,       // sentinel
        ]),
    });
    let font = decode(&builder.build(), false).unwrap();

    assert!(font.is_cid());
    assert_eq!(font.num_glyphs(), 25);
    assert_eq!(font.lookup_glyph("0"), Some(&[0, 0, 0x0E][..]));
    assert_eq!(font.lookup_cid(1005), Some((0, &[5, 0x0E][..])));
    assert_eq!(font.lookup_cid(1015), Some((1, &[15, 0x0E][..])));
    assert_eq!(font.lookup_cid(5), None);
    assert_eq!(font.cid_for_glyph(24), Some(1024));
    assert_eq!(font.lookup_subr(0, false, Some(1)), Some(&[0x0B][..]));
    assert_eq!(font.lookup_subr(0, false, Some(2)), None);

    let ros = font.attributes.ros.as_ref().unwrap();
    assert_eq!(ros.registry, "Adobe");
    assert_eq!(ros.ordering, "GB1");
    assert_eq!(ros.supplement, 4);
}

#[test]
fn cid_font_beyond_fd_select_sentinel() {
    let char_strings = (0..25u8).map(|glyph| vec![glyph, 0x0E]).collect::<Vec<_>>();
    let mut builder = FontBuilder::new(char_strings);
    builder.cid = Some(CidParts {
        registry_sid: 391,
        ordering_sid: 392,
        supplement: 0,
        font_dicts: vec![(Vec::new(), None), (Vec::new(), None)],
        fd_select: Some(vec![3, 0x00, 0x02, 0x00, 0x00, 0x00, 0x00, 0x0A, 0x01, 0x00, 0x14]),
    });
    assert!(matches!(
        decode(&builder.build(), false),
        Err(ParseError::OutOfRange)
    ));
}

#[test]
fn encoding_and_accents() {
    let mut builder = FontBuilder::new(vec![vec![0x0E], vec![1, 0x0E], vec![2, 0x0E], vec![3, 0x0E]]);
    // A, grave, and a custom glyph
    builder.strings = vec![b"logo".to_vec()];
    builder.charset = Some(vec![0, 0x00, 0x22, 0x00, 0x7C, 0x01, 0x87]);
    // format 1 with supplements: codes 0x41..=0x43, then 0x80 also maps to logo
    builder.encoding = Some(vec![0x81, 1, 0x41, 2, 1, 0x80, 0x01, 0x87]);
    let font = decode(&builder.build(), false).unwrap();

    assert_eq!(font.glyph_name_for_code(0x41), Some("A"));
    assert_eq!(font.glyph_name_for_code(0x42), Some("grave"));
    assert_eq!(font.glyph_name_for_code(0x43), Some("logo"));
    assert_eq!(font.glyph_name_for_code(0x80), Some("logo"));
    assert_eq!(font.glyph_name_for_code(0x44), Some(".notdef"));

    // seac components are always addressed through the Standard encoding
    assert_eq!(font.lookup_accent_component(0x41), Some(&[1, 0x0E][..]));
    assert_eq!(font.lookup_accent_component(0xC1), Some(&[2, 0x0E][..]));
    assert_eq!(font.lookup_accent_component(0x43), None);
}
