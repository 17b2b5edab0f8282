use std::ops::Range;

use ariadne::{Label, Report, ReportKind};
use galois_render::Insertion;

/// A report pointing at every place a multiplication sign was inserted into `source_name`.
///
/// Returns `None` when nothing was inserted.
pub fn insertion_report<'name>(
    source_name: &'name str,
    insertions: &[Insertion],
    with_color: bool,
) -> Option<Report<'static, (&'name str, Range<usize>)>> {
    let first = insertions.first()?;
    let mut config = ariadne::Config::default().with_index_type(ariadne::IndexType::Byte);
    if !with_color {
        config = config.with_color(false);
    }
    let message = match insertions.len() {
        1 => "inserted 1 multiplication sign".to_string(),
        n => format!("inserted {n} multiplication signs"),
    };
    let labels = insertions.iter().map(|insertion| {
        Label::new((source_name, insertion.span.clone()))
            .with_message(<&str>::from(insertion.rule))
    });
    let report = Report::build(ReportKind::Advice, (source_name, first.span.clone()))
        .with_config(config)
        .with_message(message)
        .with_labels(labels)
        .finish();
    Some(report)
}
