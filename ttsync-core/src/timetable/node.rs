//! Raw markup inspection for the timetable page.
//!
//! This is the only place that looks at tags and classes. Everything past
//! [`container_nodes`] works on [`Node`] values.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

static CONTAINER: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.studtimetable").unwrap());

const DATE_MARKER_CLASS: &str = "ttdate";
const LESSON_TABLE_CLASS: &str = "table";
const HEADER_ROW_CLASS: &str = "head";

/// A direct child of the timetable container, classified by its marker class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Raw text of a date marker (expected `dd.mm.yyyy`)
    DateMarker(String),
    LessonTable(Vec<Row>),
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    Header,
    /// Trimmed text of each cell, in document order
    Cells(Vec<String>),
}

/// Classify the children of the first timetable container in the document.
///
/// Returns `None` if the document has no container.
pub fn container_nodes(document: &Html) -> Option<Vec<Node>> {
    let container = document.select(&CONTAINER).next()?;

    Some(child_elements(container).map(classify).collect())
}

fn classify(element: ElementRef) -> Node {
    if has_class(element, DATE_MARKER_CLASS) {
        Node::DateMarker(text_of(element))
    } else if has_class(element, LESSON_TABLE_CLASS) {
        Node::LessonTable(rows_of(element))
    } else {
        Node::Other
    }
}

fn rows_of(table: ElementRef) -> Vec<Row> {
    let mut rows = Vec::new();

    for child in child_elements(table) {
        // html5ever inserts <tbody> into real tables; look through it
        if matches!(child.value().name(), "tbody" | "thead" | "tfoot") {
            rows.extend(child_elements(child).map(row_of));
        } else {
            rows.push(row_of(child));
        }
    }

    rows
}

fn row_of(row: ElementRef) -> Row {
    if has_class(row, HEADER_ROW_CLASS) {
        return Row::Header;
    }

    Row::Cells(child_elements(row).map(text_of).collect())
}

fn child_elements<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.children().filter_map(ElementRef::wrap)
}

fn has_class(element: ElementRef, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}

fn text_of(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifies_children_by_marker_class() {
        let html = Html::parse_document(
            r#"<div class="studtimetable">
                <div class="ttdate"> 01.09.2025 </div>
                <div class="table">
                    <div class="tr head"><div>Time</div></div>
                    <div class="tr"><div>09:00-10:30</div><div> Math </div></div>
                </div>
                <div class="legend">ignored</div>
            </div>"#,
        );

        let nodes = container_nodes(&html).expect("container should be found");

        assert_eq!(
            nodes,
            vec![
                Node::DateMarker("01.09.2025".to_string()),
                Node::LessonTable(vec![
                    Row::Header,
                    Row::Cells(vec!["09:00-10:30".to_string(), "Math".to_string()]),
                ]),
                Node::Other,
            ]
        );
    }

    #[test]
    fn test_looks_through_implicit_tbody() {
        let html = Html::parse_document(
            r#"<div class="studtimetable">
                <table class="table">
                    <tr class="head"><th>Time</th></tr>
                    <tr><td>09:00-10:30</td></tr>
                </table>
            </div>"#,
        );

        let nodes = container_nodes(&html).unwrap();

        assert_eq!(
            nodes,
            vec![Node::LessonTable(vec![
                Row::Header,
                Row::Cells(vec!["09:00-10:30".to_string()]),
            ])]
        );
    }

    #[test]
    fn test_missing_container() {
        let html = Html::parse_document("<div class=\"other\"></div>");
        assert!(container_nodes(&html).is_none());
    }
}
