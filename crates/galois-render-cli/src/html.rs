use galois_render::{MathCoreEngine, RenderPlan};

/// Escapes `&`, `<` and `>` in `input` for safe inclusion in HTML content.
pub fn escape_html_content(output: &mut String, input: &str) {
    let mut rest = input;
    while let Some(index) = memchr::memchr3(b'&', b'<', b'>', rest.as_bytes()) {
        // All three are ASCII, so `index` is a char boundary.
        let (before, after) = rest.split_at(index);
        output.push_str(before);
        output.push_str(match after.as_bytes()[0] {
            b'&' => "&amp;",
            b'<' => "&lt;",
            _ => "&gt;",
        });
        rest = &after[1..];
    }
    output.push_str(rest);
}

/// Escapes `&` and `"` in `input` for an attribute enclosed in double quotes.
pub fn escape_double_quoted_html_attribute(output: &mut String, input: &str) {
    for ch in input.chars() {
        match ch {
            '&' => output.push_str("&amp;"),
            '"' => output.push_str("&quot;"),
            _ => output.push(ch),
        }
    }
}

/// Appends one displayed field to `output`.
///
/// Every line of the plan becomes a `<math>` element at the plan's font size. Lines the engine
/// rejects, and every line when there is no engine, are shown as their markup in a `<code>`
/// element instead.
pub fn render_field(
    output: &mut String,
    name: &str,
    plan: &RenderPlan,
    engine: Option<&MathCoreEngine>,
) {
    let mut size = dtoa::Buffer::new();
    let size = size.format(plan.font_size);

    output.push_str("<div class=\"field\" data-field=\"");
    escape_double_quoted_html_attribute(output, name);
    output.push('"');
    if !plan.fits {
        output.push_str(" data-overflow");
    }
    output.push_str(">\n");
    for line in &plan.lines {
        output.push_str("  ");
        match engine.map(|engine| engine.to_mathml(line)) {
            Some(Ok(mathml)) => push_sized_math(output, &mathml, size),
            _ => {
                output.push_str("<code style=\"font-size: ");
                output.push_str(size);
                output.push_str("px\">");
                escape_html_content(output, line.as_str());
                output.push_str("</code>");
            }
        }
        output.push('\n');
    }
    output.push_str("</div>\n");
}

fn push_sized_math(output: &mut String, mathml: &str, size: &str) {
    let Some(rest) = mathml.strip_prefix("<math") else {
        output.push_str(mathml);
        return;
    };
    output.push_str("<math style=\"font-size: ");
    output.push_str(size);
    output.push_str("px\"");
    output.push_str(rest);
}
