//! Operation tables
//!
//!     Each operation is defined by a table whose first column labels groups of rows:
//!
//!         | Operation           | `math/sub`      | Subtraction
//!         | Input value sockets | `floatN a`      | First operand      (rowspan 2)
//!         |                     | `floatN b`      | Second operand
//!         | Output value sockets| `floatN value`  | Difference
//!
//!     The label cell of a group spans as many rows as the group has elements. Rows covered by
//!     the span carry no label cell, so their declaration and description sit one column to the
//!     left. The parser walks the body with a row cursor and uses the label's row span to decide
//!     how many rows belong to the group.
//!
//!     Only a missing `Operation` header is fatal, and only for the one table. Everything else is
//!     reported as a diagnostic and parsing carries on with a best-effort fallback.

use super::catalog::{ConfigurationElementDescription, NodeDescription, SocketDescription};
use super::declaration::{parse_declaration, strip_literal_markers};
use super::diagnostics::{codes, Diagnostic, DiagnosticSeverity, Diagnostics};
use super::document::Row;

/// Label of the header row.
pub const OPERATION_LABEL: &str = "Operation";

/// The row groups an operation table can list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldGroup {
    Configuration,
    InputFlowSockets,
    InputValueSockets,
    OutputFlowSockets,
    OutputValueSockets,
}

impl FieldGroup {
    pub const ALL: [FieldGroup; 5] = [
        FieldGroup::Configuration,
        FieldGroup::InputFlowSockets,
        FieldGroup::InputValueSockets,
        FieldGroup::OutputFlowSockets,
        FieldGroup::OutputValueSockets,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FieldGroup::Configuration => "Configuration",
            FieldGroup::InputFlowSockets => "Input flow sockets",
            FieldGroup::InputValueSockets => "Input value sockets",
            FieldGroup::OutputFlowSockets => "Output flow sockets",
            FieldGroup::OutputValueSockets => "Output value sockets",
        }
    }
}

/// Classification of a row's first cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowLabel {
    Operation,
    Group(FieldGroup),
}

impl RowLabel {
    /// Match a label exactly (case-sensitive, no trimming beyond what the reader did).
    pub fn parse(text: &str) -> Option<RowLabel> {
        if text == OPERATION_LABEL {
            return Some(RowLabel::Operation);
        }
        FieldGroup::ALL
            .into_iter()
            .find(|group| group.label() == text)
            .map(RowLabel::Group)
    }
}

/// Parse one operation table body into a node description titled `title`.
///
/// Returns `None` when the first row is not an `Operation` row.
pub fn parse_operation_table(
    body: &[Row],
    title: &str,
    diagnostics: &mut Diagnostics,
) -> Option<NodeDescription> {
    let first_label = body.first().map(|row| row.text(0)).unwrap_or("");
    if RowLabel::parse(first_label) != Some(RowLabel::Operation) {
        diagnostics.report(
            Diagnostic::new(
                DiagnosticSeverity::Error,
                codes::TABLE_NOT_OPERATION,
                format!(
                    "Expected an '{}' table, found '{}'. Ignoring.",
                    OPERATION_LABEL, first_label
                ),
            )
            .with_context(title),
        );
        return None;
    }

    let mut node = NodeDescription::default();
    let mut i = 0;
    while i < body.len() {
        let label_cell = body[i].cells.first();
        let label = label_cell.map(|cell| cell.text.as_str()).unwrap_or("");
        match RowLabel::parse(label) {
            Some(RowLabel::Operation) if i == 0 => {
                node.name = strip_literal_markers(body[i].text(1)).to_string();
                node.description = body[i].text(2).to_string();
                i += 1;
            }
            Some(RowLabel::Group(group)) => {
                let span = label_cell.map(|cell| cell.rowspan).unwrap_or(1).max(1);
                let rows = group_rows(body, i, span, group, title, diagnostics);
                parse_group(&mut node, group, rows, title, diagnostics);
                i += span;
            }
            Some(RowLabel::Operation) | None => {
                diagnostics.warning(
                    codes::UNRECOGNIZED_ROW,
                    format!("Unexpected row in table: '{}' - ignoring", label),
                    title,
                );
                i += 1;
            }
        }
    }

    log::debug!("Parsed node description {:?}", node.name);
    node.title = title.to_string();
    Some(node)
}

/// The rows of a group, clipped to the end of the body.
fn group_rows<'a>(
    body: &'a [Row],
    start: usize,
    span: usize,
    group: FieldGroup,
    title: &str,
    diagnostics: &mut Diagnostics,
) -> &'a [Row] {
    let end = start.saturating_add(span);
    if end > body.len() {
        diagnostics.warning(
            codes::ROW_SPAN_OVERFLOW,
            format!(
                "'{}' spans {} rows but only {} remain",
                group.label(),
                span,
                body.len() - start
            ),
            title,
        );
    }
    &body[start..end.min(body.len())]
}

fn parse_group(
    node: &mut NodeDescription,
    group: FieldGroup,
    rows: &[Row],
    title: &str,
    diagnostics: &mut Diagnostics,
) {
    match group {
        FieldGroup::Configuration => {
            for entry in group_entries(rows) {
                let element = configuration_element(entry, title, diagnostics);
                node.configuration.push(element);
            }
        }
        FieldGroup::InputFlowSockets => node.input_flow_sockets.extend(sockets(rows)),
        FieldGroup::InputValueSockets => node.input_value_sockets.extend(sockets(rows)),
        FieldGroup::OutputFlowSockets => node.output_flow_sockets.extend(sockets(rows)),
        FieldGroup::OutputValueSockets => node.output_value_sockets.extend(sockets(rows)),
    }
}

/// Declaration and description of one group row.
struct GroupEntry<'a> {
    declaration: &'a str,
    description: &'a str,
}

/// The first row of a group still holds the label cell; the rows below it do not.
fn group_entries(rows: &[Row]) -> impl Iterator<Item = GroupEntry<'_>> {
    rows.iter().enumerate().map(|(j, row)| {
        let offset = if j == 0 { 1 } else { 0 };
        GroupEntry {
            declaration: strip_literal_markers(row.text(offset)),
            description: row.text(offset + 1),
        }
    })
}

fn sockets(rows: &[Row]) -> impl Iterator<Item = SocketDescription> + '_ {
    group_entries(rows).map(|entry| match parse_declaration(entry.declaration) {
        Some(declaration) => {
            SocketDescription::typed(declaration.type_name, declaration.name, entry.description)
        }
        // Flow sockets are declared by name only
        None => SocketDescription::untyped(entry.declaration, entry.description),
    })
}

fn configuration_element(
    entry: GroupEntry<'_>,
    title: &str,
    diagnostics: &mut Diagnostics,
) -> ConfigurationElementDescription {
    match parse_declaration(entry.declaration) {
        Some(declaration) => ConfigurationElementDescription::typed(
            declaration.type_name,
            declaration.name,
            entry.description,
        ),
        None => {
            diagnostics.warning(
                codes::DECLARATION_UNPARSED,
                format!(
                    "Could not extract type and name from \"{}\"",
                    entry.declaration
                ),
                title,
            );
            ConfigurationElementDescription {
                description: entry.description.to_string(),
                ..Default::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leztew::document::Cell;
    use crate::leztew::testing::factories::{row, spanned_row};
    use rstest::rstest;

    #[rstest]
    #[case("Operation", Some(RowLabel::Operation))]
    #[case("Configuration", Some(RowLabel::Group(FieldGroup::Configuration)))]
    #[case("Input flow sockets", Some(RowLabel::Group(FieldGroup::InputFlowSockets)))]
    #[case("Input value sockets", Some(RowLabel::Group(FieldGroup::InputValueSockets)))]
    #[case("Output flow sockets", Some(RowLabel::Group(FieldGroup::OutputFlowSockets)))]
    #[case("Output value sockets", Some(RowLabel::Group(FieldGroup::OutputValueSockets)))]
    #[case("input value sockets", None)]
    #[case("Notes", None)]
    #[case("", None)]
    fn test_row_label(#[case] text: &str, #[case] expected: Option<RowLabel>) {
        assert_eq!(RowLabel::parse(text), expected);
    }

    #[test]
    fn test_header_row() {
        let body = vec![row(&["Operation", "`math/sub`", "Subtraction"])];
        let mut diagnostics = Diagnostics::new();
        let node = parse_operation_table(&body, "Subtract", &mut diagnostics).unwrap();
        assert_eq!(node.name, "math/sub");
        assert_eq!(node.description, "Subtraction");
        assert_eq!(node.title, "Subtract");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_non_operation_table_is_skipped() {
        let body = vec![
            row(&["Type", "Description"]),
            row(&["float", "A scalar"]),
        ];
        let mut diagnostics = Diagnostics::new();
        assert!(parse_operation_table(&body, "Types", &mut diagnostics).is_none());
        assert_eq!(
            diagnostics.with_code(codes::TABLE_NOT_OPERATION).count(),
            1
        );
    }

    #[test]
    fn test_empty_body_is_skipped() {
        let mut diagnostics = Diagnostics::new();
        assert!(parse_operation_table(&[], "Empty", &mut diagnostics).is_none());
    }

    #[test]
    fn test_configuration_span_reads_shifted_columns() {
        let body = vec![
            row(&["Operation", "`math/select`", "Select"]),
            spanned_row(3, &["Configuration", "`int count`", "How many"]),
            row(&["`bool wrap`", "Wrap around"]),
            row(&["`float scale`", "Scale factor"]),
        ];
        let mut diagnostics = Diagnostics::new();
        let node = parse_operation_table(&body, "Select", &mut diagnostics).unwrap();

        assert_eq!(
            node.configuration,
            vec![
                ConfigurationElementDescription::typed("int", "count", "How many"),
                ConfigurationElementDescription::typed("bool", "wrap", "Wrap around"),
                ConfigurationElementDescription::typed("float", "scale", "Scale factor"),
            ]
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_unparsable_configuration_is_kept_empty() {
        let body = vec![
            row(&["Operation", "`variable/get`", "Get"]),
            row(&["Configuration", "`variable`", "The variable index"]),
        ];
        let mut diagnostics = Diagnostics::new();
        let node = parse_operation_table(&body, "Get", &mut diagnostics).unwrap();

        assert_eq!(node.configuration.len(), 1);
        assert_eq!(node.configuration[0].name, "");
        assert_eq!(node.configuration[0].type_name, None);
        assert_eq!(node.configuration[0].description, "The variable index");
        assert_eq!(
            diagnostics.with_code(codes::DECLARATION_UNPARSED).count(),
            1
        );
    }

    #[test]
    fn test_flow_sockets_are_untyped_without_diagnostics() {
        let body = vec![
            row(&["Operation", "`flow/sequence`", "Sequence"]),
            row(&["Input flow sockets", "`in`", "Entry"]),
            spanned_row(2, &["Output flow sockets", "`0`", "First"]),
            row(&["`1`", "Second"]),
        ];
        let mut diagnostics = Diagnostics::new();
        let node = parse_operation_table(&body, "Sequence", &mut diagnostics).unwrap();

        assert_eq!(node.input_flow_sockets, vec![SocketDescription::untyped("in", "Entry")]);
        assert_eq!(
            node.output_flow_sockets,
            vec![
                SocketDescription::untyped("0", "First"),
                SocketDescription::untyped("1", "Second"),
            ]
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_unrecognized_row_is_skipped() {
        let body = vec![
            row(&["Operation", "`math/abs`", "Absolute value"]),
            row(&["Notes", "whatever", "else"]),
            row(&["Output value sockets", "`floatN value`", "Result"]),
        ];
        let mut diagnostics = Diagnostics::new();
        let node = parse_operation_table(&body, "Absolute Value", &mut diagnostics).unwrap();

        assert_eq!(node.output_value_sockets.len(), 1);
        assert_eq!(diagnostics.with_code(codes::UNRECOGNIZED_ROW).count(), 1);
    }

    #[test]
    fn test_repeated_operation_row_is_unrecognized() {
        let body = vec![
            row(&["Operation", "`math/abs`", "Absolute value"]),
            row(&["Operation", "`math/neg`", "Negation"]),
        ];
        let mut diagnostics = Diagnostics::new();
        let node = parse_operation_table(&body, "Absolute Value", &mut diagnostics).unwrap();

        assert_eq!(node.name, "math/abs");
        assert_eq!(diagnostics.with_code(codes::UNRECOGNIZED_ROW).count(), 1);
    }

    #[test]
    fn test_zero_row_span_counts_as_one() {
        let body = vec![
            row(&["Operation", "`math/abs`", "Absolute value"]),
            Row::new(vec![
                Cell::new("Input value sockets").spanning_rows(0),
                Cell::new("`floatN a`"),
                Cell::new("Argument"),
            ]),
            row(&["Output value sockets", "`floatN value`", "Result"]),
        ];
        let mut diagnostics = Diagnostics::new();
        let node = parse_operation_table(&body, "Absolute Value", &mut diagnostics).unwrap();

        assert_eq!(node.input_value_sockets.len(), 1);
        assert_eq!(node.output_value_sockets.len(), 1);
    }

    #[test]
    fn test_span_past_end_is_clipped() {
        let body = vec![
            row(&["Operation", "`math/abs`", "Absolute value"]),
            spanned_row(4, &["Input value sockets", "`floatN a`", "Argument"]),
        ];
        let mut diagnostics = Diagnostics::new();
        let node = parse_operation_table(&body, "Absolute Value", &mut diagnostics).unwrap();

        assert_eq!(node.input_value_sockets.len(), 1);
        assert_eq!(diagnostics.with_code(codes::ROW_SPAN_OVERFLOW).count(), 1);
    }
}
