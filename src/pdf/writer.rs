//! PDF object table and file serialization.

use std::fmt;

/// PDF header: version line plus a binary marker comment.
const HEADER: &[u8] = b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n";

/// Identifier of an indirect object (generation is always 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(pub usize);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} 0 R", self.0)
    }
}

/// Indirect objects of a document, numbered from 1 in allocation order.
///
/// Ids may be reserved before their bodies exist so that parents and
/// children can refer to each other.
#[derive(Debug, Default)]
pub struct ObjectTable {
    bodies: Vec<Option<Vec<u8>>>,
}

impl ObjectTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next id.
    pub fn reserve(&mut self) -> ObjectId {
        self.bodies.push(None);
        ObjectId(self.bodies.len())
    }

    /// Set the body of a reserved object.
    pub fn set(&mut self, id: ObjectId, body: impl Into<Vec<u8>>) {
        if let Some(slot) = id.0.checked_sub(1).and_then(|i| self.bodies.get_mut(i)) {
            *slot = Some(body.into());
        }
    }

    /// Add an object and return its id.
    pub fn add(&mut self, body: impl Into<Vec<u8>>) -> ObjectId {
        let id = self.reserve();
        self.set(id, body);
        id
    }

    /// Number of objects, excluding the free entry 0.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Serialize the file: header, objects, cross-reference table and trailer.
    ///
    /// Objects still unset are written as `null`.
    pub fn serialize(&self, root: ObjectId, info: Option<ObjectId>) -> Vec<u8> {
        let mut out = Vec::with_capacity(
            HEADER.len() + self.bodies.iter().flatten().map(Vec::len).sum::<usize>() + 64 * self.len(),
        );
        out.extend_from_slice(HEADER);

        let mut offsets = Vec::with_capacity(self.len());
        for (index, body) in self.bodies.iter().enumerate() {
            offsets.push(out.len());
            out.extend_from_slice(format!("{} 0 obj\n", index + 1).as_bytes());
            match body {
                Some(body) => out.extend_from_slice(body),
                None => out.extend_from_slice(b"null"),
            }
            out.extend_from_slice(b"\nendobj\n");
        }

        let xref_start = out.len();
        out.extend_from_slice(format!("xref\n0 {}\n", self.len() + 1).as_bytes());
        out.extend_from_slice(b"0000000000 65535 f \n");
        for offset in &offsets {
            out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
        }

        let mut trailer = format!("trailer\n<< /Size {} /Root {}", self.len() + 1, root);
        if let Some(info) = info {
            trailer.push_str(&format!(" /Info {}", info));
        }
        trailer.push_str(&format!(" >>\nstartxref\n{}\n%%EOF\n", xref_start));
        out.extend_from_slice(trailer.as_bytes());
        out
    }
}

/// A stream object: dictionary entries plus data, `/Length` filled in.
pub fn stream_object(dict_entries: &str, data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + dict_entries.len() + 48);
    let dict = if dict_entries.is_empty() {
        format!("<< /Length {} >>\nstream\n", data.len())
    } else {
        format!("<< {} /Length {} >>\nstream\n", dict_entries, data.len())
    };
    out.extend_from_slice(dict.as_bytes());
    out.extend_from_slice(data);
    out.extend_from_slice(b"\nendstream");
    out
}
