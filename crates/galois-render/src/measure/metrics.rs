//! Width estimates for MathML.
//!
//! The estimate walks the element tree once and combines child widths according to each
//! layout element's shape. Token advances are averages for a typical math font; everything is
//! measured in em so the caller can scale by the font size.

use memchr::memchr;

/// Advance of one identifier glyph (italic letters).
const IDENTIFIER_EM: f32 = 0.55;
/// Advance of one digit or text glyph.
const DIGIT_EM: f32 = 0.5;
/// Binary operators and relations carry thick spaces on both sides.
const SPACED_OPERATOR_EM: f32 = 0.78;
/// Fences, punctuation and other operators.
const OPERATOR_EM: f32 = 0.4;
/// Scripts are set at roughly 71% of the base size.
const SCRIPT_SCALE: f32 = 0.71;
/// Width of the radical sign itself.
const RADICAL_EM: f32 = 0.85;
/// Root indices sit partly over the radical sign.
const ROOT_INDEX_SCALE: f32 = 0.5;
/// Padding on both sides of a fraction bar.
const FRACTION_PADDING_EM: f32 = 0.2;

const SPACED_OPERATORS: &[&str] = &[
    "+", "-", "−", "=", "⋅", "·", "×", "±", "∓", "<", ">", "&lt;", "&gt;", "≤", "≥", "≠",
    "≅", "≃", "∼", "→", "⋊", "≀", ":", "∶",
];

#[derive(Debug, Clone, Copy, PartialEq)]
enum Element {
    Identifier,
    Number,
    Operator,
    Text,
    /// `msub`, `msup`: a base followed by scripts.
    Script,
    SubSup,
    UnderOver,
    Fraction,
    Sqrt,
    Root,
    Space(f32),
    Hidden,
    Row,
}

impl Element {
    fn classify(name: &str, attributes: &str) -> Self {
        match name {
            "mi" => Element::Identifier,
            "mn" => Element::Number,
            "mo" => Element::Operator,
            "mtext" | "ms" => Element::Text,
            "msub" | "msup" => Element::Script,
            "msubsup" | "mmultiscripts" => Element::SubSup,
            "munder" | "mover" | "munderover" => Element::UnderOver,
            "mfrac" => Element::Fraction,
            "msqrt" => Element::Sqrt,
            "mroot" => Element::Root,
            "mspace" => Element::Space(attribute(attributes, "width").map_or(0.0, length_em)),
            "annotation" | "annotation-xml" | "mphantom" => Element::Hidden,
            _ => Element::Row,
        }
    }
}

struct Frame<'a> {
    element: Element,
    text: &'a str,
    children: Vec<f32>,
}

impl<'a> Frame<'a> {
    fn new(element: Element) -> Self {
        Frame {
            element,
            text: "",
            children: Vec::new(),
        }
    }

    fn width(&self) -> f32 {
        let children = &self.children;
        let first = children.first().copied().unwrap_or(0.0);
        let rest = children.iter().skip(1);
        match self.element {
            Element::Identifier => glyph_count(self.text) as f32 * IDENTIFIER_EM,
            Element::Number | Element::Text => glyph_count(self.text) as f32 * DIGIT_EM,
            Element::Operator => {
                let text = self.text.trim();
                if SPACED_OPERATORS.contains(&text) {
                    SPACED_OPERATOR_EM
                } else {
                    glyph_count(text) as f32 * OPERATOR_EM
                }
            }
            Element::Script => first + SCRIPT_SCALE * rest.sum::<f32>(),
            Element::SubSup => first + SCRIPT_SCALE * rest.fold(0.0, |a, &b| f32::max(a, b)),
            Element::UnderOver => children.iter().fold(0.0, |a, &b| f32::max(a, b)),
            Element::Fraction => {
                children.iter().fold(0.0, |a, &b| f32::max(a, b)) + FRACTION_PADDING_EM
            }
            Element::Sqrt => RADICAL_EM + children.iter().sum::<f32>(),
            Element::Root => {
                let index = children.get(1).copied().unwrap_or(0.0);
                first + RADICAL_EM + ROOT_INDEX_SCALE * index
            }
            Element::Space(width) => width,
            Element::Hidden => 0.0,
            Element::Row => children.iter().sum(),
        }
    }
}

/// Estimated width of a MathML fragment, in em.
pub fn mathml_width_em(mathml: &str) -> f32 {
    let mut stack = vec![Frame::new(Element::Row)];
    let mut rest = mathml;

    while let Some(lt) = memchr(b'<', rest.as_bytes()) {
        let text = &rest[..lt];
        if !text.trim().is_empty()
            && let Some(top) = stack.last_mut()
        {
            top.text = text;
        }
        let Some(gt) = memchr(b'>', &rest.as_bytes()[lt..]) else {
            break;
        };
        let tag = &rest[lt + 1..lt + gt];
        rest = &rest[lt + gt + 1..];

        if tag.starts_with('/') {
            close(&mut stack);
        } else if tag.starts_with('!') || tag.starts_with('?') {
            continue;
        } else {
            let (tag, self_closing) = match tag.strip_suffix('/') {
                Some(tag) => (tag, true),
                None => (tag, false),
            };
            let (name, attributes) = tag.split_once(char::is_whitespace).unwrap_or((tag, ""));
            stack.push(Frame::new(Element::classify(name, attributes)));
            if self_closing {
                close(&mut stack);
            }
        }
    }

    while stack.len() > 1 {
        close(&mut stack);
    }
    stack.first().map_or(0.0, Frame::width)
}

fn close(stack: &mut Vec<Frame<'_>>) {
    if stack.len() < 2 {
        return;
    }
    if let Some(frame) = stack.pop()
        && let Some(parent) = stack.last_mut()
    {
        parent.children.push(frame.width());
    }
}

/// Number of glyphs in token text, counting each character reference as one glyph.
fn glyph_count(text: &str) -> usize {
    let text = text.trim();
    let mut count = 0;
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch == '&' {
            let lookahead = chars.clone();
            if let Some(len) = lookahead.take(10).position(|c| c == ';') {
                chars.nth(len);
            }
        }
        count += 1;
    }
    count
}

fn attribute<'a>(attributes: &'a str, name: &str) -> Option<&'a str> {
    let mut rest = attributes;
    while let Some(at) = rest.find(name) {
        let after = &rest[at + name.len()..];
        let preceded_by_space = rest[..at].chars().next_back().is_none_or(char::is_whitespace);
        if preceded_by_space && let Some(value) = after.strip_prefix("=\"") {
            return value.split_once('"').map(|(value, _)| value);
        }
        rest = after;
    }
    None
}

/// Converts a length in `em`, `ex` or unitless form to em.
fn length_em(length: &str) -> f32 {
    let length = length.trim();
    let (number, scale) = if let Some(number) = length.strip_suffix("em") {
        (number, 1.0)
    } else if let Some(number) = length.strip_suffix("ex") {
        (number, 0.43)
    } else {
        (length, 1.0)
    };
    number.trim().parse::<f32>().map_or(0.0, |value| value * scale)
}
