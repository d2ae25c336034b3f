use anyhow::{Result, anyhow};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};

use crate::model::{Cell, Table};

pub struct TableExtractor {
    table: Selector,
    row: Selector,
    link: Selector,
}

impl TableExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            table: parse_selector("table.wikitable")?,
            row: parse_selector("tr")?,
            link: parse_selector("a")?,
        })
    }

    pub fn extract_tables(&self, html: &str) -> Vec<Table> {
        let document = Html::parse_document(html);
        let mut tables = Vec::new();

        for element in document.select(&self.table) {
            let table = self.extract_table(element);
            if table.headers.is_empty() || table.rows.is_empty() {
                continue;
            }

            debug!(
                columns = table.headers.len(),
                rows = table.rows.len(),
                "found table"
            );
            tables.push(table);
        }

        info!(count = tables.len(), "extracted tables");
        tables
    }

    fn extract_table(&self, table: ElementRef<'_>) -> Table {
        let rows = table
            .select(&self.row)
            .filter(|row| belongs_to(*row, table))
            .collect::<Vec<_>>();

        let mut headers = rows
            .iter()
            .enumerate()
            .find(|(index, row)| {
                (*index == 0 || in_thead(**row)) && child_cells(**row, "th").next().is_some()
            })
            .map(|(_, row)| child_cells(*row, "th").map(cell_text).collect::<Vec<_>>())
            .unwrap_or_default();

        if headers.is_empty()
            && let Some(first) = rows.first()
        {
            headers = child_cells(*first, "td").map(cell_text).collect();
        }

        let body = rows
            .iter()
            .map(|row| {
                child_cells(*row, "td")
                    .map(|cell| self.extract_cell(cell))
                    .collect::<Vec<_>>()
            })
            .filter(|cells| !cells.is_empty())
            .collect();

        Table {
            headers,
            rows: body,
        }
    }

    fn extract_cell(&self, cell: ElementRef<'_>) -> Cell {
        let text = cell_text(cell);
        if cell.select(&self.link).next().is_some() {
            Cell::linked(text)
        } else {
            Cell::plain(text)
        }
    }
}

fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|err| anyhow!("failed to parse selector {css}: {err:?}"))
}

fn in_thead(row: ElementRef<'_>) -> bool {
    row.parent()
        .and_then(ElementRef::wrap)
        .is_some_and(|parent| parent.value().name() == "thead")
}

fn belongs_to(row: ElementRef<'_>, table: ElementRef<'_>) -> bool {
    row.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|element| element.value().name() == "table")
        .is_some_and(|nearest| nearest.id() == table.id())
}

fn child_cells<'a>(row: ElementRef<'a>, name: &'a str) -> impl Iterator<Item = ElementRef<'a>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(move |child| child.value().name() == name)
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str) -> Vec<Table> {
        TableExtractor::new()
            .expect("selectors parse")
            .extract_tables(html)
    }

    #[test]
    fn marks_cells_with_links() {
        let tables = extract(
            r#"
            <table class="wikitable">
              <tr><th>Column 1</th><th>Column 2</th></tr>
              <tr><td>1.46 m</td><td><a href="/wiki/Someone">Someone</a></td></tr>
            </table>
            "#,
        );

        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].headers, vec!["Column 1", "Column 2"]);
        assert_eq!(
            tables[0].rows,
            vec![vec![Cell::plain("1.46 m"), Cell::linked("Someone")]]
        );
    }

    #[test]
    fn ignores_tables_without_wikitable_class() {
        let tables = extract(
            r#"
            <table class="infobox"><tr><th>A</th></tr><tr><td>1</td></tr></table>
            <table class="wikitable sortable"><tr><th>B</th></tr><tr><td>2</td></tr></table>
            "#,
        );

        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].headers, vec!["B"]);
    }

    #[test]
    fn uses_first_data_row_as_headers_when_no_th() {
        let tables = extract(
            r#"
            <table class="wikitable">
              <tbody>
                <tr><td>Year</td><td>Mark</td></tr>
                <tr><td>1922</td><td>1.46</td></tr>
              </tbody>
            </table>
            "#,
        );

        assert_eq!(tables[0].headers, vec!["Year", "Mark"]);
        assert_eq!(tables[0].rows.len(), 2);
        assert_eq!(tables[0].rows[1][1], Cell::plain("1.46"));
    }

    #[test]
    fn row_headers_do_not_become_cells() {
        let tables = extract(
            r#"
            <table class="wikitable">
              <thead><tr><th>Rank</th><th>Mark</th></tr></thead>
              <tbody>
                <tr><th>1</th><td>2.09 m</td></tr>
                <tr><th>2</th><td>2.08 m</td></tr>
              </tbody>
            </table>
            "#,
        );

        assert_eq!(tables[0].headers, vec!["Rank", "Mark"]);
        assert_eq!(
            tables[0].rows,
            vec![vec![Cell::plain("2.09 m")], vec![Cell::plain("2.08 m")]]
        );
    }

    #[test]
    fn section_rows_below_the_top_are_not_headers() {
        let tables = extract(
            r#"
            <table class="wikitable">
              <tr><td>Nancy</td><td>1.46</td><td>USA</td></tr>
              <tr><td>Jean</td><td>1.48</td><td>USA</td></tr>
              <tr><th colspan="3">1930s</th></tr>
              <tr><td>Sophie</td><td>1.52</td><td>GBR</td></tr>
              <tr><td>Phyllis</td><td>1.55</td><td>GBR</td></tr>
            </table>
            "#,
        );

        assert_eq!(tables[0].headers, vec!["Nancy", "1.46", "USA"]);
        assert_eq!(tables[0].column_count(), 3);
        assert_eq!(tables[0].rows.len(), 4);
        assert_eq!(
            tables[0]
                .column(1)
                .iter()
                .map(|cell| cell.text.as_str())
                .collect::<Vec<_>>(),
            vec!["1.46", "1.48", "1.52", "1.55"]
        );
    }

    #[test]
    fn thead_row_wins_over_later_section_rows() {
        let tables = extract(
            r#"
            <table class="wikitable">
              <thead><tr><th>Athlete</th><th>Mark</th></tr></thead>
              <tbody>
                <tr><th colspan="2">1920s</th></tr>
                <tr><td>Nancy</td><td>1.46</td></tr>
              </tbody>
            </table>
            "#,
        );

        assert_eq!(tables[0].headers, vec!["Athlete", "Mark"]);
        assert_eq!(tables[0].rows, vec![vec![Cell::plain("Nancy"), Cell::plain("1.46")]]);
    }

    #[test]
    fn nested_tables_keep_their_own_rows() {
        let tables = extract(
            r#"
            <table class="wikitable">
              <tr><th>Outer</th></tr>
              <tr><td>
                <table class="wikitable">
                  <tr><th>Inner</th></tr>
                  <tr><td>7</td></tr>
                </table>
              </td></tr>
            </table>
            "#,
        );

        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].headers, vec!["Outer"]);
        assert_eq!(tables[0].rows.len(), 1);
        assert_eq!(tables[1].headers, vec!["Inner"]);
        assert_eq!(tables[1].rows, vec![vec![Cell::plain("7")]]);
    }

    #[test]
    fn normalizes_whitespace_in_cells() {
        let tables = extract(
            "<table class=\"wikitable\"><tr><th> Height\n (m) </th></tr>\
             <tr><td>\n  1.46\u{a0}m <sup>[1]</sup>\n</td></tr></table>",
        );

        assert_eq!(tables[0].headers, vec!["Height (m)"]);
        assert_eq!(tables[0].rows[0][0].text, "1.46 m [1]");
    }

    #[test]
    fn drops_tables_without_body_rows() {
        let tables = extract(
            r#"<table class="wikitable"><tr><th>Only</th><th>Headers</th></tr></table>"#,
        );

        assert!(tables.is_empty());
    }

    #[test]
    fn page_without_tables_yields_nothing() {
        assert!(extract("<html><body><p>No data</p></body></html>").is_empty());
    }
}
