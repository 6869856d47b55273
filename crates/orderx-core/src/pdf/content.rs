//! Content stream walker producing positioned text fragments.
//!
//! Tracks just enough graphics and text state to place each text run:
//! the CTM stack (`q`/`Q`/`cm`), the text and line matrices, leading and
//! font size. Coordinates are PDF user space, so Y grows up the page.

use std::collections::BTreeMap;

use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object};
use tracing::trace;

use crate::layout::PositionedFragment;

/// Affine matrix `[a b c d e f]`.
type Matrix = [f32; 6];

const IDENTITY: Matrix = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// Average glyph width as a fraction of the font size.
const GLYPH_WIDTH: f32 = 0.5;

fn multiply(m: &Matrix, n: &Matrix) -> Matrix {
    [
        m[0] * n[0] + m[1] * n[2],
        m[0] * n[1] + m[1] * n[3],
        m[2] * n[0] + m[3] * n[2],
        m[2] * n[1] + m[3] * n[3],
        m[4] * n[0] + m[5] * n[2] + n[4],
        m[4] * n[1] + m[5] * n[3] + n[5],
    ]
}

fn translation(tx: f32, ty: f32) -> Matrix {
    [1.0, 0.0, 0.0, 1.0, tx, ty]
}

fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

fn numbers<const N: usize>(operands: &[Object]) -> Option<[f32; N]> {
    if operands.len() < N {
        return None;
    }
    let mut out = [0.0; N];
    for (slot, operand) in out.iter_mut().zip(operands) {
        *slot = get_number(operand)?;
    }
    Some(out)
}

struct TextState<'a> {
    doc: &'a Document,
    fonts: &'a BTreeMap<Vec<u8>, &'a Dictionary>,
    ctm: Matrix,
    ctm_stack: Vec<Matrix>,
    text_matrix: Matrix,
    line_matrix: Matrix,
    font: Vec<u8>,
    font_size: f32,
    leading: f32,
    fragments: Vec<PositionedFragment>,
}

impl<'a> TextState<'a> {
    fn new(doc: &'a Document, fonts: &'a BTreeMap<Vec<u8>, &'a Dictionary>) -> Self {
        Self {
            doc,
            fonts,
            ctm: IDENTITY,
            ctm_stack: Vec::new(),
            text_matrix: IDENTITY,
            line_matrix: IDENTITY,
            font: Vec::new(),
            font_size: 12.0,
            leading: 0.0,
            fragments: Vec::new(),
        }
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix = multiply(&translation(tx, ty), &self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        self.move_line(0.0, -self.leading);
    }

    fn decode(&self, bytes: &[u8]) -> String {
        if let Some(font_dict) = self.fonts.get(&self.font) {
            if let Ok(encoding) = font_dict.get_font_encoding(self.doc) {
                if let Ok(text) = Document::decode_text(&encoding, bytes) {
                    return text;
                }
            }
        }

        if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
            let utf16: Vec<u16> = bytes[2..]
                .chunks_exact(2)
                .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
                .collect();
            return String::from_utf16_lossy(&utf16);
        }

        bytes.iter().map(|&b| b as char).collect()
    }

    /// Emit a text run at the current position and advance past it.
    fn show(&mut self, text: String) {
        let origin = multiply(&self.text_matrix, &self.ctm);
        let advance = text.chars().count() as f32 * self.font_size * GLYPH_WIDTH;

        if !text.trim().is_empty() {
            trace!("Text run {:?} at ({}, {})", text, origin[4], origin[5]);
            self.fragments
                .push(PositionedFragment::new(text, origin[4], origin[5]));
        }

        self.text_matrix = multiply(&translation(advance, 0.0), &self.text_matrix);
    }

    fn show_string(&mut self, operand: Option<&Object>) {
        if let Some(Object::String(bytes, _)) = operand {
            let text = self.decode(bytes);
            self.show(text);
        }
    }

    fn show_array(&mut self, operand: Option<&Object>) {
        let Some(Object::Array(items)) = operand else {
            return;
        };

        let mut text = String::new();
        for item in items {
            match item {
                Object::String(bytes, _) => text.push_str(&self.decode(bytes)),
                // Large negative kerning reads as a word gap.
                other => {
                    if get_number(other).is_some_and(|n| n < -200.0) && !text.ends_with(' ') {
                        text.push(' ');
                    }
                }
            }
        }
        self.show(text);
    }

    fn apply(&mut self, operator: &str, operands: &[Object]) {
        match operator {
            "q" => self.ctm_stack.push(self.ctm),
            "Q" => {
                if let Some(ctm) = self.ctm_stack.pop() {
                    self.ctm = ctm;
                }
            }
            "cm" => {
                if let Some(m) = numbers::<6>(operands) {
                    self.ctm = multiply(&m, &self.ctm);
                }
            }
            "BT" => {
                self.text_matrix = IDENTITY;
                self.line_matrix = IDENTITY;
            }
            "Tf" => {
                if let Some(Ok(name)) = operands.first().map(Object::as_name) {
                    self.font = name.to_vec();
                }
                if let Some(size) = operands.get(1).and_then(get_number) {
                    self.font_size = size;
                }
            }
            "TL" => {
                if let Some([leading]) = numbers::<1>(operands) {
                    self.leading = leading;
                }
            }
            "Td" => {
                if let Some([tx, ty]) = numbers::<2>(operands) {
                    self.move_line(tx, ty);
                }
            }
            "TD" => {
                if let Some([tx, ty]) = numbers::<2>(operands) {
                    self.leading = -ty;
                    self.move_line(tx, ty);
                }
            }
            "Tm" => {
                if let Some(m) = numbers::<6>(operands) {
                    self.text_matrix = m;
                    self.line_matrix = m;
                }
            }
            "T*" => self.next_line(),
            "Tj" => self.show_string(operands.first()),
            "TJ" => self.show_array(operands.first()),
            "'" => {
                self.next_line();
                self.show_string(operands.first());
            }
            "\"" => {
                self.next_line();
                self.show_string(operands.get(2));
            }
            _ => {}
        }
    }
}

/// Walk a decoded content stream and collect its text runs.
pub(crate) fn collect_fragments(
    doc: &Document,
    fonts: &BTreeMap<Vec<u8>, &Dictionary>,
    content: &Content,
) -> Vec<PositionedFragment> {
    let mut state = TextState::new(doc, fonts);
    for op in &content.operations {
        state.apply(op.operator.as_str(), &op.operands);
    }
    state.fragments
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::Operation;

    fn walk(operations: Vec<Operation>) -> Vec<PositionedFragment> {
        let doc = Document::with_version("1.5");
        let fonts = BTreeMap::new();
        collect_fragments(&doc, &fonts, &Content { operations })
    }

    #[test]
    fn test_td_positions_text() {
        let fragments = walk(vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 10.into()]),
            Operation::new("Td", vec![72.into(), 700.into()]),
            Operation::new("Tj", vec![Object::string_literal("Hello")]),
            Operation::new("ET", vec![]),
        ]);

        assert_eq!(fragments, vec![PositionedFragment::new("Hello", 72.0, 700.0)]);
    }

    #[test]
    fn test_runs_advance_horizontally() {
        let fragments = walk(vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 10.into()]),
            Operation::new("Td", vec![0.into(), 500.into()]),
            Operation::new("Tj", vec![Object::string_literal("ab")]),
            Operation::new("Tj", vec![Object::string_literal("cd")]),
            Operation::new("ET", vec![]),
        ]);

        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[1].x, 10.0);
        assert_eq!(fragments[1].y, 500.0);
    }

    #[test]
    fn test_leading_and_next_line() {
        let fragments = walk(vec![
            Operation::new("BT", vec![]),
            Operation::new("TD", vec![50.into(), Object::Integer(-14)]),
            Operation::new("T*", vec![]),
            Operation::new("Tj", vec![Object::string_literal("second")]),
            Operation::new("'", vec![Object::string_literal("third")]),
            Operation::new("ET", vec![]),
        ]);

        assert_eq!(fragments[0].y, -28.0);
        assert_eq!(fragments[1].y, -42.0);
        assert_eq!(fragments[1].x, 50.0);
    }

    #[test]
    fn test_tm_and_cm() {
        let fragments = walk(vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![1.into(), 0.into(), 0.into(), 1.into(), 10.into(), 20.into()],
            ),
            Operation::new("BT", vec![]),
            Operation::new(
                "Tm",
                vec![1.into(), 0.into(), 0.into(), 1.into(), 100.into(), 200.into()],
            ),
            Operation::new("Tj", vec![Object::string_literal("inside")]),
            Operation::new("ET", vec![]),
            Operation::new("Q", vec![]),
            Operation::new("BT", vec![]),
            Operation::new("Td", vec![5.into(), 5.into()]),
            Operation::new("Tj", vec![Object::string_literal("outside")]),
            Operation::new("ET", vec![]),
        ]);

        assert_eq!(fragments[0], PositionedFragment::new("inside", 110.0, 220.0));
        assert_eq!(fragments[1], PositionedFragment::new("outside", 5.0, 5.0));
    }

    #[test]
    fn test_tj_array_and_blank_runs() {
        let fragments = walk(vec![
            Operation::new("BT", vec![]),
            Operation::new("Tj", vec![Object::string_literal("   ")]),
            Operation::new(
                "TJ",
                vec![Object::Array(vec![
                    Object::string_literal("Qty"),
                    Object::Integer(-250),
                    Object::string_literal("Shipped"),
                    Object::Integer(-10),
                ])],
            ),
            Operation::new("ET", vec![]),
        ]);

        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].text, "Qty Shipped");
    }
}
