use std::path::PathBuf;

use genpdf::{elements, style, Alignment, Element};

use super::layout::{
    Block, BlockBody, Column, ReportLayout, Section, CHECKLIST_HEADER, LINE_HEIGHT_MM,
};
use crate::core::config::ReportConfig;
use crate::core::error::AppError;

const BODY_FONT_SIZE: u8 = 10;
const HEADING_FONT_SIZE: u8 = 12;
const TITLE_FONT_SIZE: u8 = 18;
const FOOTER_FONT_SIZE: u8 = 8;

/// Vertical gap between two layout offsets, in body-font lines
fn gap_in_lines(previous_bottom: f32, next_top: f32) -> f64 {
    f64::from((next_top - previous_bottom).max(0.0) / LINE_HEIGHT_MM)
}

/// Draws a [`ReportLayout`] with genpdf.
///
/// Page breaks follow the layout exactly. Within a page the millimetre offsets
/// are approximate: the gap between two blocks becomes a genpdf `Break` of
/// `gap / LINE_HEIGHT_MM` lines, and genpdf sizes those lines from the body
/// font metrics rather than the layout's fixed line height. At the body font
/// size a drawn line is shorter than `LINE_HEIGHT_MM`, so blocks sit slightly
/// higher than their `y_mm` and never overrun the page the layout chose.
///
/// Rendering is CPU and disk bound; call it from `spawn_blocking`.
pub struct PdfRenderer {
    fonts_dir: PathBuf,
    font_family: String,
}

impl PdfRenderer {
    pub fn new(config: &ReportConfig) -> Self {
        Self {
            fonts_dir: config.fonts_dir.clone(),
            font_family: config.font_family.clone(),
        }
    }

    pub fn render(&self, layout: &ReportLayout) -> Result<Vec<u8>, AppError> {
        let fonts = genpdf::fonts::from_files(&self.fonts_dir, &self.font_family, None)
            .map_err(|e| {
                AppError::Internal(format!(
                    "Failed to load font family '{}' from {}: {}",
                    self.font_family,
                    self.fonts_dir.display(),
                    e
                ))
            })?;

        let mut doc = genpdf::Document::new(fonts);
        doc.set_title(layout.title.clone());
        doc.set_font_size(BODY_FONT_SIZE);

        // SimplePageDecorator only draws headers, so the page stamp sits on top
        let footers: Vec<String> = layout.pages.iter().map(|p| p.footer.clone()).collect();
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        decorator.set_header(move |page| {
            let text = page
                .checked_sub(1)
                .and_then(|index| footers.get(index))
                .cloned()
                .unwrap_or_default();
            let mut stamp = elements::Paragraph::new(text);
            stamp.set_alignment(Alignment::Right);
            stamp.styled(style::Style::new().italic().with_font_size(FOOTER_FONT_SIZE))
        });
        doc.set_page_decorator(decorator);

        for (index, page) in layout.pages.iter().enumerate() {
            if index > 0 {
                doc.push(elements::PageBreak::new());
            }

            let mut previous_bottom: Option<f32> = None;
            let mut blocks = page.blocks.iter().peekable();
            while let Some(block) = blocks.next() {
                if let Some(bottom) = previous_bottom {
                    doc.push(elements::Break::new(gap_in_lines(bottom, block.y_mm)));
                }

                match block.column {
                    Column::Full if block.section == Section::General => {
                        let mut title = elements::Paragraph::new(block.heading.clone());
                        title.set_alignment(Alignment::Center);
                        doc.push(title.styled(style::Style::new().bold().with_font_size(TITLE_FONT_SIZE)));
                        previous_bottom = Some(block.bottom());
                    }
                    Column::Full => {
                        doc.push(block_element(block)?);
                        previous_bottom = Some(block.bottom());
                    }
                    Column::Left | Column::Right => {
                        let partner = blocks
                            .next_if(|next| next.y_mm == block.y_mm && next.column != block.column);
                        let (left, right) = match (block.column, partner) {
                            (Column::Right, None) => (None, Some(block)),
                            (_, partner) => (Some(block), partner),
                        };

                        let mut columns = elements::TableLayout::new(vec![1, 1]);
                        columns
                            .row()
                            .element(half_cell(left)?)
                            .element(half_cell(right)?)
                            .push()
                            .map_err(render_error)?;
                        doc.push(columns);

                        let bottom = [left, right]
                            .into_iter()
                            .flatten()
                            .map(Block::bottom)
                            .fold(block.bottom(), f32::max);
                        previous_bottom = Some(bottom);
                    }
                }
            }
        }

        let mut buffer = Vec::new();
        doc.render(&mut buffer).map_err(render_error)?;
        Ok(buffer)
    }
}

fn render_error(e: genpdf::error::Error) -> AppError {
    AppError::Internal(format!("Failed to render report: {}", e))
}

fn heading(text: &str) -> impl Element {
    elements::Paragraph::new(text.to_string())
        .styled(style::Style::new().bold().with_font_size(HEADING_FONT_SIZE))
}

fn lines_element(lines: &[String]) -> elements::LinearLayout {
    let mut column = elements::LinearLayout::vertical();
    for line in lines {
        column.push(elements::Paragraph::new(line.clone()));
    }
    column
}

fn half_cell(block: Option<&Block>) -> Result<elements::LinearLayout, AppError> {
    match block {
        Some(block) => block_element(block),
        None => Ok(elements::LinearLayout::vertical().element(elements::Paragraph::new(""))),
    }
}

fn block_element(block: &Block) -> Result<elements::LinearLayout, AppError> {
    let mut column = elements::LinearLayout::vertical().element(heading(&block.heading));
    column.push(elements::Break::new(0.5));

    match &block.body {
        BlockBody::Lines(lines) => column.push(lines_element(lines)),
        BlockBody::Checklist(rows) => {
            let mut table = elements::TableLayout::new(vec![3, 1, 4]);
            table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

            let bold = style::Style::new().bold();
            let mut header = table.row();
            for title in CHECKLIST_HEADER {
                header = header.element(elements::Paragraph::new(title).styled(bold));
            }
            header.push().map_err(render_error)?;

            for row in rows {
                table
                    .row()
                    .element(elements::Paragraph::new(row.label))
                    .element(elements::Paragraph::new(row.done))
                    .element(lines_element(&row.notes))
                    .push()
                    .map_err(render_error)?;
            }
            column.push(table);
        }
    }

    Ok(column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gap_is_measured_in_layout_lines() {
        assert_eq!(gap_in_lines(135.0, 145.0), 2.0);
        assert_eq!(gap_in_lines(100.0, 102.5), 0.5);
    }

    #[test]
    fn test_overlapping_blocks_get_no_gap() {
        assert_eq!(gap_in_lines(150.0, 140.0), 0.0);
    }
}
