// Builders for small CFF fonts used by the tests.
//
// Offsets written into DICTs always use the five byte integer form so that the size of a DICT
// is known before the offsets it holds are.

/// Encode `items` as a CFF INDEX using the smallest offset size that fits.
#[allow(dead_code)]
pub fn cff_index(items: &[Vec<u8>]) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(&(items.len() as u16).to_be_bytes());
    if items.is_empty() {
        return data;
    }

    let last_offset = items.iter().map(Vec::len).sum::<usize>() + 1;
    let off_size: usize = match last_offset {
        0..=0xFF => 1,
        0x100..=0xFFFF => 2,
        0x10000..=0xFF_FFFF => 3,
        _ => 4,
    };
    data.push(off_size as u8);
    let mut offset = 1u32;
    for item in items.iter().map(Vec::len).chain(std::iter::once(0)) {
        data.extend_from_slice(&offset.to_be_bytes()[4 - off_size..]);
        offset += item as u32;
    }
    for item in items {
        data.extend_from_slice(item);
    }
    data
}

/// Encode a DICT integer operand using the five byte form.
#[allow(dead_code)]
pub fn dict_int32(value: i32) -> Vec<u8> {
    let mut data = vec![29];
    data.extend_from_slice(&value.to_be_bytes());
    data
}

/// A Private DICT and the local subroutines stored after it.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct PrivateParts {
    pub dict: Vec<u8>,
    pub subrs: Option<Vec<Vec<u8>>>,
}

impl PrivateParts {
    #[allow(dead_code)]
    fn encode(&self) -> Vec<u8> {
        let mut data = self.dict.clone();
        if let Some(subrs) = &self.subrs {
            // Subrs operator: 5 byte operand plus 1 byte operator
            let subrs_offset = data.len() + 6;
            data.extend(dict_int32(subrs_offset as i32));
            data.push(19);
            data.extend(cff_index(subrs));
        }
        data
    }

    #[allow(dead_code)]
    fn dict_len(&self) -> usize {
        match self.subrs {
            Some(_) => self.dict.len() + 6,
            None => self.dict.len(),
        }
    }
}

/// The CID specific parts of a font.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct CidParts {
    pub registry_sid: i32,
    pub ordering_sid: i32,
    pub supplement: i32,
    pub font_dicts: Vec<(Vec<u8>, Option<PrivateParts>)>,
    pub fd_select: Option<Vec<u8>>,
}

#[allow(dead_code)]
#[derive(Clone)]
pub struct FontBuilder {
    pub name: Vec<u8>,
    pub top_dict: Vec<u8>,
    pub strings: Vec<Vec<u8>>,
    pub global_subrs: Vec<Vec<u8>>,
    pub char_strings: Vec<Vec<u8>>,
    pub charset: Option<Vec<u8>>,
    pub encoding: Option<Vec<u8>>,
    pub private: Option<PrivateParts>,
    pub cid: Option<CidParts>,
}

impl FontBuilder {
    #[allow(dead_code)]
    pub fn new(char_strings: Vec<Vec<u8>>) -> Self {
        FontBuilder {
            name: b"Test".to_vec(),
            top_dict: Vec::new(),
            strings: Vec::new(),
            global_subrs: Vec::new(),
            char_strings,
            charset: None,
            encoding: None,
            private: None,
            cid: None,
        }
    }

    #[allow(dead_code)]
    pub fn build(&self) -> Vec<u8> {
        let header = [1u8, 0, 4, 4];
        let name_index = cff_index(&[self.name.clone()]);
        let string_index = cff_index(&self.strings);
        let global_subr_index = cff_index(&self.global_subrs);
        let char_strings_index = cff_index(&self.char_strings);

        // Size of the Top DICT once the offset operators are appended
        let mut top_dict_len = self.top_dict.len() + 6; // CharStrings
        if self.charset.is_some() {
            top_dict_len += 6;
        }
        if self.encoding.is_some() {
            top_dict_len += 6;
        }
        if self.private.is_some() {
            top_dict_len += 11;
        }
        if let Some(cid) = &self.cid {
            top_dict_len += 17; // ROS
            top_dict_len += 7; // FDArray
            if cid.fd_select.is_some() {
                top_dict_len += 7;
            }
        }
        let top_dict_index_len = cff_index(&[vec![0; top_dict_len]]).len();

        let mut pos = header.len()
            + name_index.len()
            + top_dict_index_len
            + string_index.len()
            + global_subr_index.len();
        let mut tail = Vec::new();

        let char_strings_offset = pos;
        tail.extend(&char_strings_index);
        pos += char_strings_index.len();

        let charset_offset = pos;
        if let Some(charset) = &self.charset {
            tail.extend(charset);
            pos += charset.len();
        }

        let encoding_offset = pos;
        if let Some(encoding) = &self.encoding {
            tail.extend(encoding);
            pos += encoding.len();
        }

        let private_offset = pos;
        let mut private_len = 0;
        if let Some(private) = &self.private {
            let data = private.encode();
            private_len = private.dict_len();
            pos += data.len();
            tail.extend(data);
        }

        let mut top_dict = Vec::new();
        if let Some(cid) = &self.cid {
            top_dict.extend(dict_int32(cid.registry_sid));
            top_dict.extend(dict_int32(cid.ordering_sid));
            top_dict.extend(dict_int32(cid.supplement));
            top_dict.extend([12, 30]);

            let fd_select_offset = pos;
            if let Some(fd_select) = &cid.fd_select {
                tail.extend(fd_select);
                pos += fd_select.len();
                top_dict.extend(dict_int32(fd_select_offset as i32));
                top_dict.extend([12, 37]);
            }

            let fd_array_offset = pos;
            let sized_dicts = cid
                .font_dicts
                .iter()
                .map(|(dict, private)| {
                    let len = dict.len() + if private.is_some() { 11 } else { 0 };
                    vec![0; len]
                })
                .collect::<Vec<_>>();
            let fd_array_len = cff_index(&sized_dicts).len();
            let mut fd_private_pos = fd_array_offset + fd_array_len;
            let mut fd_privates = Vec::new();
            let mut font_dicts = Vec::new();
            for (dict, private) in &cid.font_dicts {
                let mut dict = dict.clone();
                if let Some(private) = private {
                    let data = private.encode();
                    dict.extend(dict_int32(private.dict_len() as i32));
                    dict.extend(dict_int32(fd_private_pos as i32));
                    dict.push(18);
                    fd_private_pos += data.len();
                    fd_privates.extend(data);
                }
                font_dicts.push(dict);
            }
            tail.extend(cff_index(&font_dicts));
            tail.extend(fd_privates);
            top_dict.extend(dict_int32(fd_array_offset as i32));
            top_dict.extend([12, 36]);
        }

        top_dict.extend(&self.top_dict);
        top_dict.extend(dict_int32(char_strings_offset as i32));
        top_dict.push(17);
        if self.charset.is_some() {
            top_dict.extend(dict_int32(charset_offset as i32));
            top_dict.push(15);
        }
        if self.encoding.is_some() {
            top_dict.extend(dict_int32(encoding_offset as i32));
            top_dict.push(16);
        }
        if self.private.is_some() {
            top_dict.extend(dict_int32(private_len as i32));
            top_dict.extend(dict_int32(private_offset as i32));
            top_dict.push(18);
        }
        assert_eq!(top_dict.len(), top_dict_len);

        let mut data = header.to_vec();
        data.extend(name_index);
        data.extend(cff_index(&[top_dict]));
        data.extend(string_index);
        data.extend(global_subr_index);
        data.extend(tail);
        data
    }
}

/// Wrap `cff` in a minimal `OTTO` container holding a single `CFF ` table.
#[allow(dead_code)]
pub fn wrap_in_otto(cff: &[u8]) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(b"OTTO");
    data.extend_from_slice(&2u16.to_be_bytes()); // numTables
    data.extend_from_slice(&[0; 6]);
    let offset = 12 + 2 * 16;
    data.extend_from_slice(b"CFF ");
    data.extend_from_slice(&0u32.to_be_bytes());
    data.extend_from_slice(&(offset as u32).to_be_bytes());
    data.extend_from_slice(&(cff.len() as u32).to_be_bytes());
    data.extend_from_slice(b"post");
    data.extend_from_slice(&0u32.to_be_bytes());
    data.extend_from_slice(&((offset + cff.len()) as u32).to_be_bytes());
    data.extend_from_slice(&4u32.to_be_bytes());
    data.extend_from_slice(cff);
    data.extend_from_slice(&[0xFF; 4]);
    data
}
